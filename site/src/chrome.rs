use folio_router::{platform::dom::BrowserPlatform, RouterCallbacks};
use thiserror::Error;
use wasm_bindgen::JsValue;
use web_sys::Document;

const OVERLAY_ID: &str = "loading-overlay";
const DRAWER_SELECTOR: &str = ".nav-drawer";

#[derive(Error, Debug)]
pub enum ChromeError {
    #[error("no element with id {0:?}")]
    Missing(&'static str),
    #[error("{0}")]
    Js(String),
}

impl From<JsValue> for ChromeError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

fn set_overlay(document: &Document, visible: bool) -> Result<(), ChromeError> {
    let overlay = document
        .get_element_by_id(OVERLAY_ID)
        .ok_or(ChromeError::Missing(OVERLAY_ID))?;
    overlay.class_list().toggle_with_force("visible", visible)?;
    overlay.set_attribute("aria-hidden", if visible { "false" } else { "true" })?;
    Ok(())
}

/// Closes the modal drawer. Layouts without one have nothing to close.
fn close_drawer(document: &Document) -> Result<(), ChromeError> {
    if let Some(drawer) = document.query_selector(DRAWER_SELECTOR)? {
        drawer.remove_attribute("opened")?;
    }
    Ok(())
}

/// The loading overlay and drawer behaviour shared by every page.
pub fn callbacks(platform: &BrowserPlatform) -> RouterCallbacks {
    let document = platform.document();
    let show = document.clone();
    let hide = document.clone();
    let drawer = document.clone();
    RouterCallbacks::new()
        .show_overlay(move || set_overlay(&show, true))
        .hide_overlay(move || set_overlay(&hide, false))
        .close_drawer(move || close_drawer(&drawer))
}
