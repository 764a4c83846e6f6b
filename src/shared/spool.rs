//! Scoped temporary storage for multipart uploads.
//!
//! Incoming file parts are streamed to disk instead of being buffered in the
//! request body. The backing file lives exactly as long as the [`SpooledFile`]
//! value: it is removed when the value is dropped, whichever way the request
//! ends.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Raised when a write would take the spool past its size ceiling
#[derive(Debug)]
pub enum SpoolError {
    TooLarge { limit: usize },
    Io(io::Error),
}

impl From<io::Error> for SpoolError {
    fn from(e: io::Error) -> Self {
        SpoolError::Io(e)
    }
}

pub struct SpooledFile {
    // Declared before `temp` so the handle closes before the file is unlinked
    writer: File,
    temp: NamedTempFile,
    len: usize,
    limit: usize,
}

impl SpooledFile {
    /// Create an empty spool in `dir` (system temp dir when `None`)
    pub fn create(dir: Option<&PathBuf>, limit: usize) -> io::Result<Self> {
        let temp = match dir {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };
        let writer = File::from_std(temp.as_file().try_clone()?);

        Ok(Self {
            writer,
            temp,
            len: 0,
            limit,
        })
    }

    /// Append a chunk, enforcing the size ceiling before anything is written
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), SpoolError> {
        let next_len = self.len + chunk.len();
        if next_len > self.limit {
            return Err(SpoolError::TooLarge { limit: self.limit });
        }

        self.writer.write_all(chunk).await?;
        self.len = next_len;
        Ok(())
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Flush and read the whole spool back into memory
    pub async fn read_all(&mut self) -> io::Result<Vec<u8>> {
        self.writer.flush().await?;
        tokio::fs::read(self.temp.path()).await
    }
}
