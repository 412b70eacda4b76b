use crate::platform::PlatformError;
use thiserror::Error;

/// Configuration mistakes made while setting up routes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("route id must not be empty (got {0:?})")]
    EmptyRouteId(String),
    #[error("router used before `init` set a content area")]
    NotInitialized,
}

/// Why a route's markup could not be loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("HTTP {status} {status_text}")]
    Http { status: u16, status_text: String },
    #[error("{0}")]
    Network(#[from] PlatformError),
}

/// Returned by hooks and injected callbacks. Errors are logged and otherwise
/// ignored by the router.
pub type CallbackError = Box<dyn std::error::Error>;
