#![deny(missing_docs)]
#![forbid(unsafe_code)]

//! # Folio Meta
//!
//! Keeps the `<meta>` and `<link rel="canonical">` tags in a document's
//! `<head>` in step with the route that is currently on screen.
//!
//! The crate does not touch the DOM directly. It talks to the head through the
//! [`HeadDom`] trait, which the router's platform layer implements for the
//! browser (and for its in-memory mock DOM).
//!
//! ```
//! use folio_config::SiteConfig;
//! use folio_meta::{canonical_url, LoadStatus, MetaOptions};
//!
//! let site = SiteConfig::builder().base_url("https://ada.example/").build();
//! let options = MetaOptions {
//!     page_id: "projects",
//!     page_title: "Projects",
//!     load_status: LoadStatus::Success,
//! };
//! assert_eq!(
//!     canonical_url(&site.base_url, options.page_id),
//!     "https://ada.example/#projects"
//! );
//! ```

use folio_config::SiteConfig;

mod link;
mod meta_tags;
pub use link::*;
pub use meta_tags::*;

/// Identifies a single tag in the document head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadSelector<'a> {
    /// `<meta name="…">`
    MetaName(&'a str),
    /// `<meta property="…">`, used by Open Graph.
    MetaProperty(&'a str),
    /// `<link rel="canonical">`
    CanonicalLink,
}

impl HeadSelector<'_> {
    /// The tag name of the element this selector matches.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::MetaName(_) | Self::MetaProperty(_) => "meta",
            Self::CanonicalLink => "link",
        }
    }

    /// The attribute (and its value) that identifies the element.
    pub fn key(&self) -> (&'static str, &str) {
        match self {
            Self::MetaName(name) => ("name", name),
            Self::MetaProperty(property) => ("property", property),
            Self::CanonicalLink => ("rel", "canonical"),
        }
    }

    /// The attribute that carries the element's value.
    pub fn value_attribute(&self) -> &'static str {
        match self {
            Self::MetaName(_) | Self::MetaProperty(_) => "content",
            Self::CanonicalLink => "href",
        }
    }

    /// A CSS selector matching the element, e.g. `meta[name="description"]`.
    /// Quotes and backslashes in the value are escaped.
    pub fn to_css(&self) -> String {
        let (attr, value) = self.key();
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            if matches!(c, '"' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        format!("{}[{attr}=\"{escaped}\"]", self.tag_name())
    }
}

/// Minimal access to the document head.
pub trait HeadDom {
    /// A handle to an element in the head.
    type Tag;

    /// Returns the first element matching `selector`, if any.
    fn find_head_tag(&self, selector: &HeadSelector<'_>) -> Option<Self::Tag>;

    /// Creates an element carrying the selector's identifying attribute and
    /// appends it to the head. Returns `None` if there is no head to append to.
    fn create_head_tag(&self, selector: &HeadSelector<'_>)
        -> Option<Self::Tag>;

    /// Sets an attribute on a head element.
    fn set_tag_attribute(&self, tag: &Self::Tag, name: &str, value: &str);

    /// Detaches an element from the head.
    fn remove_head_tag(&self, tag: &Self::Tag);
}

/// How the route's content was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadStatus {
    /// The content loaded.
    Success,
    /// No route matched the requested id.
    NotFound,
    /// The route matched but its content could not be fetched.
    Error,
}

impl LoadStatus {
    /// Value for the `robots` meta tag.
    pub fn robots(self) -> &'static str {
        match self {
            Self::Success => "index, follow",
            Self::NotFound | Self::Error => "noindex",
        }
    }
}

/// Per-call inputs to [`update_for_route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaOptions<'a> {
    /// The normalized route id.
    pub page_id: &'a str,
    /// The title the page is being shown with.
    pub page_title: &'a str,
    /// Outcome of the content load.
    pub load_status: LoadStatus,
}

/// The values [`update_for_route`] wrote to the head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMeta {
    /// The canonical URL of the page.
    pub canonical_url: String,
    /// The `description` meta tag.
    pub description: String,
    /// The `keywords` meta tag.
    pub keywords: String,
    /// The `og:title` meta tag.
    pub og_title: String,
    /// The `twitter:title` meta tag.
    pub twitter_title: String,
}

/// Synchronizes the document head with the given route.
///
/// For each tag, the route's explicit value wins, then a value derived from
/// the other tags or the page title, then the site-wide default. Existing tags
/// are updated in place and missing ones are created, so calling this twice
/// with the same arguments leaves the head unchanged.
///
/// `route` is `None` when no route matched; the canonical URL and titles are
/// then derived from `options` alone.
pub fn update_for_route<H: HeadDom>(
    head: &H,
    site: &SiteConfig,
    route: Option<&RouteMeta>,
    options: &MetaOptions<'_>,
) -> AppliedMeta {
    let empty = RouteMeta::default();
    let meta = route.unwrap_or(&empty);
    let og = &meta.open_graph;
    let twitter = &meta.twitter;

    let slug = meta.canonical.as_deref().unwrap_or(options.page_id);
    let canonical = canonical_url(&site.base_url, slug);

    let description = meta
        .description
        .clone()
        .unwrap_or_else(|| site.default_description.clone());
    let keywords = if meta.keywords.is_empty() {
        site.default_keywords.join(", ")
    } else {
        meta.keywords.join(", ")
    };

    let og_title = og
        .title
        .clone()
        .unwrap_or_else(|| options.page_title.to_string());
    let og_description =
        og.description.clone().unwrap_or_else(|| description.clone());
    let og_image = og.image.as_ref().or(site.default_image.as_ref());
    let og_image_alt = og.image_alt.as_ref().or(site.default_image_alt.as_ref());

    let twitter_title =
        twitter.title.clone().unwrap_or_else(|| og_title.clone());
    let twitter_description = twitter
        .description
        .clone()
        .unwrap_or_else(|| og_description.clone());
    let twitter_image = twitter.image.as_ref().or(og_image);
    let twitter_site = twitter.site.as_ref().or(site.twitter_site.as_ref());
    let twitter_creator =
        twitter.creator.as_ref().or(site.twitter_creator.as_ref());

    use HeadSelector::{MetaName, MetaProperty};

    set_meta_tag(head, MetaName("description"), &description);
    set_meta_tag(head, MetaName("keywords"), &keywords);
    set_meta_tag(head, MetaName("robots"), options.load_status.robots());

    set_meta_tag(head, MetaProperty("og:title"), &og_title);
    set_meta_tag(head, MetaProperty("og:description"), &og_description);
    set_meta_tag(
        head,
        MetaProperty("og:type"),
        og.kind.as_deref().unwrap_or(&site.og_type),
    );
    set_meta_tag(head, MetaProperty("og:url"), &canonical);
    set_meta_tag(
        head,
        MetaProperty("og:site_name"),
        og.site_name.as_deref().unwrap_or(&site.site_name),
    );
    sync_meta_tag(head, MetaProperty("og:image"), og_image);
    sync_meta_tag(head, MetaProperty("og:image:alt"), og_image_alt);

    set_meta_tag(
        head,
        MetaName("twitter:card"),
        twitter.card.as_deref().unwrap_or(&site.twitter_card),
    );
    set_meta_tag(head, MetaName("twitter:title"), &twitter_title);
    set_meta_tag(head, MetaName("twitter:description"), &twitter_description);
    sync_meta_tag(head, MetaName("twitter:image"), twitter_image);
    sync_meta_tag(head, MetaName("twitter:site"), twitter_site);
    sync_meta_tag(head, MetaName("twitter:creator"), twitter_creator);

    set_canonical_link(head, &canonical);

    AppliedMeta {
        canonical_url: canonical,
        description,
        keywords,
        og_title,
        twitter_title,
    }
}

/// Sets the `content` of the meta tag matching `selector`, creating the tag if
/// the head does not have one yet.
pub fn set_meta_tag<H: HeadDom>(
    head: &H,
    selector: HeadSelector<'_>,
    content: &str,
) {
    if let Some(tag) = head
        .find_head_tag(&selector)
        .or_else(|| head.create_head_tag(&selector))
    {
        head.set_tag_attribute(&tag, selector.value_attribute(), content);
    }
}

/// Removes the meta tag matching `selector`, if the head has one.
pub fn remove_meta_tag<H: HeadDom>(head: &H, selector: HeadSelector<'_>) {
    if let Some(tag) = head.find_head_tag(&selector) {
        head.remove_head_tag(&tag);
    }
}

/// Optional tags: written when there is a value, removed when there is none,
/// so nothing from a previous route lingers.
fn sync_meta_tag<H: HeadDom>(
    head: &H,
    selector: HeadSelector<'_>,
    content: Option<&String>,
) {
    match content {
        Some(content) => set_meta_tag(head, selector, content),
        None => remove_meta_tag(head, selector),
    }
}
