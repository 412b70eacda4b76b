use crate::{
    error::LoadError,
    normalize_page_id,
    platform::Fetch,
    registry::{ReadyHook, RouteRegistry},
    HOME,
};
use folio_meta::LoadStatus;
use html_escape::encode_text;
use std::fmt;

pub const NOT_FOUND_TITLE: &str = "Not Found";
pub const ERROR_TITLE: &str = "Error";

/// The outcome of resolving a route to markup.
#[derive(Clone)]
pub enum LoadResult {
    Success {
        /// The route's own title, if it has one.
        title: Option<String>,
        html: String,
        on_ready: Option<ReadyHook>,
        source_title: String,
    },
    NotFound {
        title: String,
        html: String,
    },
    Error {
        title: String,
        html: String,
        error: LoadError,
        /// Title of the route whose content failed to load.
        source_title: String,
    },
}

impl LoadResult {
    /// The result for an id with no registered route.
    pub fn not_found(raw_id: &str) -> Self {
        Self::NotFound {
            title: NOT_FOUND_TITLE.to_string(),
            html: format!(
                r#"<div class="page-section active">Page not found: {}</div>"#,
                encode_text(raw_id)
            ),
        }
    }

    /// The result for a route whose content could not be loaded.
    pub fn error(source_title: &str, error: LoadError) -> Self {
        let message = format!("Failed to load {source_title}: {error}");
        Self::Error {
            title: ERROR_TITLE.to_string(),
            html: error_markup(&message),
            error,
            source_title: source_title.to_string(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Success { title, .. } => title.as_deref(),
            Self::NotFound { title, .. } | Self::Error { title, .. } => {
                Some(title)
            }
        }
    }

    pub fn html(&self) -> &str {
        match self {
            Self::Success { html, .. }
            | Self::NotFound { html, .. }
            | Self::Error { html, .. } => html,
        }
    }

    pub fn status(&self) -> LoadStatus {
        match self {
            Self::Success { .. } => LoadStatus::Success,
            Self::NotFound { .. } => LoadStatus::NotFound,
            Self::Error { .. } => LoadStatus::Error,
        }
    }

    /// The route's ready hook, for successful loads only.
    pub fn on_ready(&self) -> Option<&ReadyHook> {
        match self {
            Self::Success { on_ready, .. } => on_ready.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Debug for LoadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success {
                title,
                html,
                on_ready,
                source_title,
            } => f
                .debug_struct("Success")
                .field("title", title)
                .field("html", html)
                .field("on_ready", &on_ready.is_some())
                .field("source_title", source_title)
                .finish(),
            Self::NotFound { title, html } => f
                .debug_struct("NotFound")
                .field("title", title)
                .field("html", html)
                .finish(),
            Self::Error {
                title,
                html,
                error,
                source_title,
            } => f
                .debug_struct("Error")
                .field("title", title)
                .field("html", html)
                .field("error", error)
                .field("source_title", source_title)
                .finish(),
        }
    }
}

/// Wraps an error message in the shared page-section chrome.
pub fn error_markup(message: &str) -> String {
    format!(
        r#"<div class="page-section active"><p class="error-message">{}</p></div>"#,
        encode_text(message)
    )
}

/// Resolves `route_id` to markup.
///
/// The home route, and any route without a `path`, is rendered from
/// `initial_home_html` without touching the network. Everything else is
/// fetched once from its path; failures come back as [`LoadResult::Error`]
/// and are never retried.
pub async fn fetch_page_markup<F>(
    fetch: &F,
    registry: &RouteRegistry,
    route_id: &str,
    initial_home_html: Option<&str>,
) -> LoadResult
where
    F: Fetch + ?Sized,
{
    let id = normalize_page_id(Some(route_id));
    let route = registry.get(&id);

    if route.is_none() && id != HOME {
        return LoadResult::not_found(route_id);
    }

    let title = route.and_then(|route| route.title.clone());
    let source_title = title.clone().unwrap_or_else(|| id.clone());
    let on_ready = route.and_then(|route| route.on_load.clone());

    let path = match route.and_then(|route| route.path.as_deref()) {
        Some(path) if id != HOME => path,
        _ => {
            if initial_home_html.is_none() && id != HOME {
                crate::warn!(
                    "Route \"{id}\" has no path and no initial markup was \
                     captured; rendering empty content"
                );
            }
            return LoadResult::Success {
                title,
                html: initial_home_html.unwrap_or_default().to_string(),
                on_ready,
                source_title,
            };
        }
    };

    match fetch.fetch_text(path).await {
        Ok(response) if response.ok() => LoadResult::Success {
            title,
            html: response.body,
            on_ready,
            source_title,
        },
        Ok(response) => LoadResult::error(
            &source_title,
            LoadError::Http {
                status: response.status,
                status_text: response.status_text,
            },
        ),
        Err(err) => LoadResult::error(&source_title, LoadError::Network(err)),
    }
}
