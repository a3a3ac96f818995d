//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, EmbeddingConfig, EmbeddingProviderKind, LlmConfig, LlmProviderKind, LogFormat,
    LoggingConfig, RagConfig, ServerConfig, StorageConfig,
};
