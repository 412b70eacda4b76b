use folio_meta::{OpenGraph, RouteMeta, TwitterCard};
use folio_router::{RouteDescriptor, RouteRegistry, RouterError, HOME};

/// Pages reachable from the drawer, in drawer order: id, title, description
/// and keywords.
static PAGES: [(&str, &str, &str, &[&str]); 5] = [
    (
        "projects",
        "Projects",
        "Software and hardware projects, with write-ups and source links.",
        &["projects", "open source", "rust"],
    ),
    (
        "resume",
        "Resume",
        "Work history, education and skills.",
        &["resume", "cv", "experience"],
    ),
    (
        "songs",
        "Songs",
        "Original songs and recordings.",
        &["music", "songs", "recordings"],
    ),
    (
        "blog",
        "Blog",
        "Notes on programming, music and everything in between.",
        &["blog", "writing"],
    ),
    (
        "faq",
        "FAQ",
        "Answers to the questions people ask most.",
        &["faq", "questions"],
    ),
];

fn page_meta(title: &str, description: &str, keywords: &[&str]) -> RouteMeta {
    RouteMeta {
        description: Some(description.to_string()),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        open_graph: OpenGraph {
            title: Some(title.to_string()),
            ..Default::default()
        },
        twitter: TwitterCard {
            card: Some("summary".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// The site's route table. The home page is rendered from the markup the
/// page was served with; every other page is fetched from `pages/<id>.html`.
pub fn routes() -> Result<RouteRegistry, RouterError> {
    let home = RouteDescriptor::new(HOME).title("Home").meta(RouteMeta {
        open_graph: OpenGraph {
            kind: Some("profile".to_string()),
            ..Default::default()
        },
        ..Default::default()
    });
    let pages = PAGES.iter().map(|(id, title, description, keywords)| {
        RouteDescriptor::new(*id)
            .path(format!("pages/{id}.html"))
            .title(*title)
            .meta(page_meta(title, description, keywords))
    });
    RouteRegistry::from_routes(std::iter::once(home).chain(pages))
}
