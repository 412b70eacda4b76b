use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SiteConfigError {
    #[error("site configuration file not found: {0}")]
    ConfigNotFound(String),
    #[error("base-url must be an absolute http(s) URL, got {0:?}")]
    InvalidBaseUrl(String),
    #[error("Config Error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for SiteConfigError {
    fn from(e: config::ConfigError) -> Self {
        Self::ConfigError(e.to_string())
    }
}
