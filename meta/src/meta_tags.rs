use serde::{Deserialize, Serialize};

/// Per-route document metadata.
///
/// Every field is optional. Whatever a route leaves out is derived from the
/// page title or from the site-wide defaults in
/// [`SiteConfig`](folio_config::SiteConfig) when
/// [`update_for_route`](crate::update_for_route) runs.
///
/// ```
/// use folio_meta::{OpenGraph, RouteMeta};
///
/// let meta = RouteMeta {
///     description: Some("Things I have built.".into()),
///     keywords: vec!["rust".into(), "wasm".into()],
///     open_graph: OpenGraph {
///         image: Some("https://ada.example/og/projects.png".into()),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// assert!(meta.canonical.is_none());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RouteMeta {
    /// The `description` meta tag.
    pub description: Option<String>,
    /// Joined with `", "` into the `keywords` meta tag.
    pub keywords: Vec<String>,
    /// Overrides the slug used to build the canonical URL. Absolute
    /// `http(s)` URLs are used as-is.
    pub canonical: Option<String>,
    /// [Open Graph](https://ogp.me/) fields.
    pub open_graph: OpenGraph,
    /// [Twitter Card](https://developer.x.com/en/docs/x-for-websites/cards/overview/markup) fields.
    pub twitter: TwitterCard,
}

/// Open Graph (`og:*`) properties.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OpenGraph {
    /// `og:title`; defaults to the page title.
    pub title: Option<String>,
    /// `og:description`; defaults to the route description.
    pub description: Option<String>,
    /// `og:type`; defaults to the site's `og-type`.
    pub kind: Option<String>,
    /// `og:image`; defaults to the site's `default-image`.
    pub image: Option<String>,
    /// `og:image:alt`.
    pub image_alt: Option<String>,
    /// `og:site_name`; defaults to the site name.
    pub site_name: Option<String>,
}

/// Twitter Card (`twitter:*`) properties.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TwitterCard {
    /// `twitter:card`; defaults to the site's `twitter-card`.
    pub card: Option<String>,
    /// `twitter:title`; defaults to the Open Graph title.
    pub title: Option<String>,
    /// `twitter:description`; defaults to the Open Graph description.
    pub description: Option<String>,
    /// `twitter:image`; defaults to the Open Graph image.
    pub image: Option<String>,
    /// `twitter:site`.
    pub site: Option<String>,
    /// `twitter:creator`.
    pub creator: Option<String>,
}
