pub mod models;
pub mod upload_config;
