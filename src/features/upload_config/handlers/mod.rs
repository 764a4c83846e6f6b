mod config_handler;

pub use config_handler::*;
