mod common;

use common::*;
use folio_meta::LoadStatus;
use folio_router::{
    loader::{fetch_page_markup, LoadResult, ERROR_TITLE, NOT_FOUND_TITLE},
    platform::mock_dom::{MockPlatform, MockResponse},
    LoadError, RouteDescriptor, RouteRegistry,
};
use futures::executor::block_on;

fn load(platform: &MockPlatform, id: &str, home: Option<&str>) -> LoadResult {
    block_on(fetch_page_markup(platform, &registry(), id, home))
}

#[test]
fn fetched_route_succeeds() {
    let platform = MockPlatform::new();
    platform.respond("pages/projects.html", MockResponse::Html("<p>x</p>".into()));
    let result = load(&platform, "#projects", None);
    assert_eq!(result.status(), LoadStatus::Success);
    assert_eq!(result.title(), Some("Projects"));
    assert_eq!(result.html(), "<p>x</p>");
    assert_eq!(platform.fetch_count(), 1);
}

#[test]
fn home_never_fetches() {
    let platform = MockPlatform::new();
    let result = load(&platform, "home", Some(HOME_HTML));
    assert_eq!(result.html(), HOME_HTML);
    assert_eq!(result.title(), Some("Home"));

    let (result, logs) = capture_logs(|| load(&platform, "", None));
    assert_eq!(result.status(), LoadStatus::Success);
    assert_eq!(result.html(), "");
    assert!(logs.is_empty());
    assert_eq!(platform.fetch_count(), 0);
}

#[test]
fn home_resolves_without_registration() {
    let platform = MockPlatform::new();
    let result = block_on(fetch_page_markup(
        &platform,
        &RouteRegistry::new(),
        "home",
        Some(HOME_HTML),
    ));
    assert_eq!(result.status(), LoadStatus::Success);
    assert_eq!(result.title(), None);
    assert_eq!(result.html(), HOME_HTML);
}

#[test]
fn pathless_route_uses_initial_markup() {
    let platform = MockPlatform::new();
    let registry =
        RouteRegistry::from_routes([RouteDescriptor::new("about")]).unwrap();

    let result =
        block_on(fetch_page_markup(&platform, &registry, "about", Some("<p>hi</p>")));
    assert_eq!(result.html(), "<p>hi</p>");

    let (result, logs) = capture_logs(|| {
        block_on(fetch_page_markup(&platform, &registry, "about", None))
    });
    assert_eq!(result.html(), "");
    assert!(logs.contains("Route \"about\" has no path"));
    assert_eq!(platform.fetch_count(), 0);
}

#[test]
fn unknown_route_is_not_found() {
    let platform = MockPlatform::new();
    let result = load(&platform, "#missing", None);
    assert_eq!(result.status(), LoadStatus::NotFound);
    assert_eq!(result.title(), Some(NOT_FOUND_TITLE));
    assert!(result.html().contains("Page not found: #missing"));
    assert_eq!(platform.fetch_count(), 0);
}

#[test]
fn failures_carry_their_cause() {
    let platform = MockPlatform::new();
    platform.respond(
        "pages/projects.html",
        MockResponse::Status(503, "Service Unavailable".into()),
    );
    let result = load(&platform, "projects", None);
    assert_eq!(result.title(), Some(ERROR_TITLE));
    assert!(result.on_ready().is_none());
    match result {
        LoadResult::Error {
            error,
            source_title,
            ..
        } => {
            assert_eq!(
                error,
                LoadError::Http {
                    status: 503,
                    status_text: "Service Unavailable".into()
                }
            );
            assert_eq!(source_title, "Projects");
        }
        other => panic!("expected an error, got {other:?}"),
    }
}

#[test]
fn error_markup_is_escaped() {
    let result = LoadResult::error(
        "<b>Blog</b>",
        LoadError::Http {
            status: 404,
            status_text: "Not Found".into(),
        },
    );
    assert_eq!(
        result.html(),
        r#"<div class="page-section active"><p class="error-message">Failed to load &lt;b&gt;Blog&lt;/b&gt;: HTTP 404 Not Found</p></div>"#
    );
}
