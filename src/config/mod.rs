//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, ChatConfig, IngestionConfig, LogFormat, LoggingConfig, ProviderConfig,
    SearchConfig, ServerConfig, API_KEY_ENV,
};
