use crate::platform::{Dom, History, HistoryState};
use folio_config::SiteConfig;

/// Shows `page_title` in the app-bar headline (if there is one) and sets
/// `document.title` to the title followed by the site's suffix.
pub fn update_title<D: Dom + ?Sized>(
    dom: &D,
    site: &SiteConfig,
    headline: Option<&D::Element>,
    page_title: &str,
) {
    if let Some(headline) = headline {
        dom.set_text_content(headline, page_title);
    }
    dom.set_document_title(&site.document_title(page_title));
}

/// Pushes `{ page: page_id }` with the URL `#url_fragment`.
///
/// Does nothing when `should_update` is false (navigations replaying a
/// `popstate`) or when the platform has no history API. Returns whether an
/// entry was pushed.
pub fn push_state<H: History + ?Sized>(
    history: &H,
    page_id: &str,
    page_title: &str,
    url_fragment: &str,
    should_update: bool,
) -> bool {
    if !should_update || !history.history_available() {
        return false;
    }
    let state = HistoryState {
        page: page_id.to_string(),
    };
    let url = format!("#{}", url_fragment.trim_start_matches('#'));
    match history.push_state(&state, page_title, &url) {
        Ok(()) => true,
        Err(e) => {
            crate::warn!("Could not push history entry for \"{page_id}\": {e}");
            false
        }
    }
}
