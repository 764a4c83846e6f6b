mod upload_config_service;

pub use upload_config_service::UploadConfigService;
