use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Characters that are not safe inside a storage public id.
    /// Anything outside `[A-Za-z0-9._-]` is replaced with `_`.
    pub static ref UNSAFE_PUBLIC_ID_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();

    /// Runs of `_` left behind after replacement
    static ref REPEATED_UNDERSCORES: Regex = Regex::new(r"_{2,}").unwrap();
}

/// Lowercased extension of a filename, without the dot
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Filename without its last extension
pub fn file_stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}

/// Case-insensitive extension allow-list check
pub fn has_allowed_extension(filename: &str, allowed: &[String]) -> bool {
    file_extension(filename)
        .map(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext)))
        .unwrap_or(false)
}

/// Make a filename safe to embed in a storage public id
pub fn sanitize_filename(filename: &str) -> String {
    // Browsers on Windows may send the full client path
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let replaced = UNSAFE_PUBLIC_ID_CHARS.replace_all(base.trim(), "_");
    let collapsed = REPEATED_UNDERSCORES.replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches('_');

    if trimmed.is_empty() {
        "model".to_string()
    } else {
        trimmed.to_string()
    }
}
