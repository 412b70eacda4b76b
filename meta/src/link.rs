use crate::{HeadDom, HeadSelector};

/// Builds the canonical URL for a route slug.
///
/// Leading `#` and `/` characters are stripped from the slug. An empty slug or
/// `home` maps to `base_url` itself; anything else becomes `base_url#slug`.
/// Absolute `http(s)` URLs are returned unchanged.
///
/// ```
/// use folio_meta::canonical_url;
///
/// let base = "https://ada.example/";
/// assert_eq!(canonical_url(base, ""), base);
/// assert_eq!(canonical_url(base, "#home"), base);
/// assert_eq!(canonical_url(base, "/#projects"), "https://ada.example/#projects");
/// assert_eq!(
///     canonical_url(base, "https://elsewhere.example/post"),
///     "https://elsewhere.example/post"
/// );
/// ```
pub fn canonical_url(base_url: &str, slug: &str) -> String {
    let slug = slug.trim();
    if is_absolute_http(slug) {
        return slug.to_string();
    }
    let slug = slug.trim_start_matches(['#', '/']);
    if slug.is_empty() || slug == "home" {
        base_url.to_string()
    } else {
        format!("{base_url}#{slug}")
    }
}

fn is_absolute_http(value: &str) -> bool {
    let lower = value.get(..8).unwrap_or(value).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Points the document's `<link rel="canonical">` at `href`, creating the
/// element if the head does not have one yet.
pub fn set_canonical_link<H: HeadDom>(head: &H, href: &str) {
    let selector = HeadSelector::CanonicalLink;
    if let Some(tag) = head
        .find_head_tag(&selector)
        .or_else(|| head.create_head_tag(&selector))
    {
        head.set_tag_attribute(&tag, selector.value_attribute(), href);
    }
}
