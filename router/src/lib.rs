#![forbid(unsafe_code)]
//! A fragment-based client-side router for a single-page portfolio site.
//!
//! Every page of the site lives behind a URL fragment (`#projects`,
//! `#resume`, …). Navigating fades the content area out, loads the page's
//! HTML fragment, swaps it in, runs page-specific setup, updates the document
//! title, SEO metadata and session history, and fades the content back in.
//!
//! ```rust,no_run
//! use folio_config::SiteConfig;
//! use folio_router::{
//!     platform::dom::BrowserPlatform, RouteDescriptor, RouteRegistry, Router,
//!     RouterCallbacks,
//! };
//!
//! # async fn start() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = RouteRegistry::from_routes([
//!     RouteDescriptor::new("home").title("Home"),
//!     RouteDescriptor::new("projects")
//!         .path("pages/projects.html")
//!         .title("Projects"),
//! ])?;
//! let platform = BrowserPlatform::new()?;
//! let content = platform.element_by_id("content");
//! let router = Router::new(platform, registry, SiteConfig::default());
//! router.init(content, None, None, RouterCallbacks::new());
//! router.intercept_links();
//! router.listen_popstate();
//! router.load_page_content("projects", true).await;
//! # Ok(())
//! # }
//! ```
//!
//! All browser access goes through the traits in [`platform`], so the whole
//! navigation sequence runs unchanged against
//! [`MockPlatform`](platform::mock_dom::MockPlatform) in tests.

pub mod logging;

pub mod animation;
mod error;
pub mod history;
pub mod link;
pub mod loader;
pub mod platform;
mod registry;
mod router;

pub use error::*;
pub use loader::LoadResult;
pub use registry::*;
pub use router::*;

/// The id of the landing page.
pub const HOME: &str = "home";

/// Normalizes a page id as given by a link, a history entry or a caller.
///
/// One leading `#` is stripped; a missing or empty id, and `index.html`,
/// mean the home page.
///
/// ```
/// use folio_router::normalize_page_id;
///
/// assert_eq!(normalize_page_id(Some("#projects")), "projects");
/// assert_eq!(normalize_page_id(Some("#")), "home");
/// assert_eq!(normalize_page_id(Some("index.html")), "home");
/// assert_eq!(normalize_page_id(None), "home");
/// ```
pub fn normalize_page_id(page_id: Option<&str>) -> String {
    match page_id.map(registry::normalize_route_id) {
        None | Some("") | Some("index.html") => HOME.to_string(),
        Some(id) => id.to_string(),
    }
}
