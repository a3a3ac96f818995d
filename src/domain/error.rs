use std::time::Duration;

use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Extraction error: {message}")]
    Extraction { message: String },

    #[error("Not implemented: {message}")]
    NotImplemented { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Quota exceeded: {provider} - {message}")]
    QuotaExceeded {
        provider: String,
        message: String,
        retry_after: Option<Duration>,
        quota_limit: Option<String>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn quota_exceeded(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::QuotaExceeded {
            provider: provider.into(),
            message: message.into(),
            retry_after: None,
            quota_limit: None,
        }
    }

    /// Attach a retry-after hint; no-op on other variants
    pub fn with_retry_after(mut self, after: Duration) -> Self {
        if let Self::QuotaExceeded { retry_after, .. } = &mut self {
            *retry_after = Some(after);
        }
        self
    }

    /// Attach the quota limit reported upstream; no-op on other variants
    pub fn with_quota_limit(mut self, limit: impl Into<String>) -> Self {
        if let Self::QuotaExceeded { quota_limit, .. } = &mut self {
            *quota_limit = Some(limit.into());
        }
        self
    }

    /// Attribute a provider or quota error to the named provider
    pub fn for_provider(mut self, name: &str) -> Self {
        if let Self::Provider { provider, .. } | Self::QuotaExceeded { provider, .. } = &mut self {
            *provider = name.to_string();
        }
        self
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}
