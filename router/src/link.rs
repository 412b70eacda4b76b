use crate::{normalize_page_id, platform::Dom, registry::RouteRegistry};

/// What the router needs to know about a click to decide whether to handle it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkClick<'a> {
    /// The raw `href` attribute of the clicked link.
    pub href: Option<&'a str>,
    /// The link's `target` attribute.
    pub target: Option<&'a str>,
    /// `MouseEvent.button`; `0` is the primary button.
    pub button: i16,
    /// Whether any of Meta, Alt, Ctrl or Shift was held.
    pub modifier_key: bool,
    pub default_prevented: bool,
}

/// Returns the route a click should navigate to, or `None` to let the browser
/// handle it.
///
/// Only fragment links (`href="#…"`) that name a registered route are taken
/// over. Links opening another browsing context, modified or non-primary
/// clicks, and clicks something else already handled are left alone.
pub fn resolve_link_target(
    registry: &RouteRegistry,
    click: &LinkClick<'_>,
) -> Option<String> {
    if click.default_prevented || click.button != 0 || click.modifier_key {
        return None;
    }
    if click
        .target
        .is_some_and(|target| !target.is_empty() && target != "_self")
    {
        return None;
    }
    let href = click.href.filter(|href| href.starts_with('#'))?;
    let id = normalize_page_id(Some(href));
    registry.contains(&id).then_some(id)
}

/// Marks the drawer links pointing at `active_id` as current and expands the
/// collapsed section holding them.
pub fn highlight_active_link<D: Dom + ?Sized>(dom: &D, active_id: &str) {
    for link in dom.nav_links() {
        let is_active = dom
            .attribute(&link, "href")
            .is_some_and(|href| normalize_page_id(Some(&href)) == active_id);
        dom.toggle_class(&link, "active", is_active);
        dom.set_attribute(
            &link,
            "aria-current",
            is_active.then_some("page"),
        );
        if is_active {
            if let Some(section) = dom.collapsed_section(&link) {
                dom.expand_section(&section);
            }
        }
    }
}
