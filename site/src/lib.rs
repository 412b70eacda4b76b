//! The portfolio site's browser entry point.

pub mod chrome;
pub mod routes;

use folio_config::SiteConfig;
use folio_router::{platform::dom::BrowserPlatform, Router};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Site-wide settings, compiled in.
pub const SITE_TOML: &str = include_str!("../site.toml");

/// Element whose content the router replaces.
const CONTENT_ID: &str = "content";
const HEADLINE_SELECTOR: &str = ".app-bar .headline";

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Boots the router: captures the landing page's markup as the home page,
/// wires link and back/forward handling, and renders the page named by the
/// URL fragment without adding a history entry.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let site = SiteConfig::from_toml_str(SITE_TOML).map_err(js_error)?;
    let registry = routes::routes().map_err(js_error)?;
    let platform = BrowserPlatform::new()
        .map_err(js_error)?
        .with_nav_link_selector(site.nav_link_selector.clone());

    let content = platform.element_by_id(CONTENT_ID);
    if content.is_none() {
        folio_router::error!("No #{CONTENT_ID} element; navigation is disabled");
    }
    let headline = platform.query_selector(HEADLINE_SELECTOR);
    let initial_home_html = content.as_ref().map(|el| el.inner_html());
    let initial_page = platform.location_hash();
    let callbacks = chrome::callbacks(&platform);

    let router = Router::new(platform, registry, site);
    router.init(content, headline, initial_home_html, callbacks);
    router.intercept_links();
    router.listen_popstate();

    spawn_local(async move {
        router.load_page_content(initial_page.as_deref(), false).await;
    });
    Ok(())
}
