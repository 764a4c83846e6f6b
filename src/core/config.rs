use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::modules::storage::signature::SignatureAlgorithm;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub swagger: SwaggerConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Base URL of the viewer site, used to build `viewUrl` in upload responses
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Cloudinary-compatible storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Account (cloud) name
    pub cloud_name: String,
    /// Public API key, safe to hand to browsers
    pub api_key: String,
    /// Server-held secret used to sign upload requests
    pub api_secret: String,
    /// API base URL, without the cloud name (e.g. `https://api.cloudinary.com/v1_1`)
    pub api_base_url: String,
    /// Folder for uploaded model files
    pub models_folder: String,
    /// Folder for thumbnails uploaded directly by the browser
    pub thumbnails_folder: String,
    /// Timeout for a single storage API call
    pub request_timeout: Duration,
    /// Digest the account verifies signatures with
    pub signature_algorithm: SignatureAlgorithm,
}

/// Limits applied by the upload handler
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
    /// Directory for spooled uploads (system temp dir when unset)
    pub temp_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            upload: UploadConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            public_base_url,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Furniture Viewer API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Upload and view furniture 3D models".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl StorageConfig {
    const DEFAULT_API_BASE_URL: &'static str = "https://api.cloudinary.com/v1_1";
    const DEFAULT_MODELS_FOLDER: &'static str = "furniture-models";
    const DEFAULT_THUMBNAILS_FOLDER: &'static str = "furniture-thumbnails";
    const DEFAULT_TIMEOUT_SECS: u64 = 120;

    pub fn from_env() -> Result<Self, String> {
        let cloud_name = env::var("CLOUDINARY_CLOUD_NAME")
            .map_err(|_| "CLOUDINARY_CLOUD_NAME environment variable is required".to_string())?;

        let api_key = env::var("CLOUDINARY_API_KEY")
            .map_err(|_| "CLOUDINARY_API_KEY environment variable is required".to_string())?;

        let api_secret = env::var("CLOUDINARY_API_SECRET")
            .map_err(|_| "CLOUDINARY_API_SECRET environment variable is required".to_string())?;

        let api_base_url = env::var("CLOUDINARY_API_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let models_folder = env::var("CLOUDINARY_MODELS_FOLDER")
            .unwrap_or_else(|_| Self::DEFAULT_MODELS_FOLDER.to_string());

        let thumbnails_folder = env::var("CLOUDINARY_THUMBNAILS_FOLDER")
            .unwrap_or_else(|_| Self::DEFAULT_THUMBNAILS_FOLDER.to_string());

        let timeout_secs = env::var("CLOUDINARY_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CLOUDINARY_TIMEOUT_SECS must be a valid number".to_string())?;

        let signature_algorithm = env::var("CLOUDINARY_SIGNATURE_ALGORITHM")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<SignatureAlgorithm>())
            .transpose()
            .map_err(|e| format!("Invalid CLOUDINARY_SIGNATURE_ALGORITHM: {}", e))?
            .unwrap_or_default();

        Ok(Self {
            cloud_name,
            api_key,
            api_secret,
            api_base_url,
            models_folder,
            thumbnails_folder,
            request_timeout: Duration::from_secs(timeout_secs),
            signature_algorithm,
        })
    }

    /// Upload endpoint for the given resource type (`raw`, `image`, ...)
    pub fn upload_url(&self, resource_type: &str) -> String {
        format!(
            "{}/{}/{}/upload",
            self.api_base_url, self.cloud_name, resource_type
        )
    }

    /// Destroy endpoint for the given resource type
    pub fn destroy_url(&self, resource_type: &str) -> String {
        format!(
            "{}/{}/{}/destroy",
            self.api_base_url, self.cloud_name, resource_type
        )
    }
}

impl UploadConfig {
    /// 100 MiB
    pub const DEFAULT_MAX_FILE_SIZE: usize = 100 * 1024 * 1024;

    pub fn from_env() -> Result<Self, String> {
        let max_file_size = env::var("UPLOAD_MAX_FILE_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_FILE_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "UPLOAD_MAX_FILE_SIZE must be a valid number".to_string())?;

        let temp_dir = env::var("UPLOAD_TEMP_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            max_file_size,
            temp_dir,
            ..Self::default()
        })
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: vec!["glb".to_string(), "gltf".to_string()],
            temp_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_defaults() {
        let config = UploadConfig::default();
        assert_eq!(config.max_file_size, 104_857_600);
        assert_eq!(config.allowed_extensions, vec!["glb", "gltf"]);
        assert!(config.temp_dir.is_none());
    }

    #[test]
    fn test_storage_urls() {
        let config = StorageConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            api_base_url: "https://api.cloudinary.com/v1_1".to_string(),
            models_folder: "furniture-models".to_string(),
            thumbnails_folder: "furniture-thumbnails".to_string(),
            request_timeout: Duration::from_secs(10),
            signature_algorithm: SignatureAlgorithm::Sha1,
        };

        assert_eq!(
            config.upload_url("raw"),
            "https://api.cloudinary.com/v1_1/demo/raw/upload"
        );
        assert_eq!(
            config.destroy_url("image"),
            "https://api.cloudinary.com/v1_1/demo/image/destroy"
        );
    }

    #[test]
    fn test_swagger_credentials() {
        let mut config = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(config.credentials(), None);

        config.password = Some("secret".to_string());
        assert_eq!(config.credentials(), Some("admin:secret".to_string()));
    }
}
