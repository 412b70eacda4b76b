#![allow(dead_code)]

use folio_config::SiteConfig;
use folio_meta::RouteMeta;
use folio_router::{
    platform::mock_dom::{MockCall, MockElement, MockPlatform, MockResponse},
    CallbackError, RouteDescriptor, RouteRegistry, Router, RouterCallbacks,
};
use std::{
    io,
    sync::{Arc, Mutex},
};

pub const HOME_HTML: &str = r#"<section id="hero">Hello</section>"#;
pub const PROJECTS_HTML: &str = r#"<div class="page-section">Projects</div>"#;

pub struct Fixture {
    pub platform: MockPlatform,
    pub router: Router<MockPlatform>,
    pub content: MockElement,
    pub headline: MockElement,
}

impl Fixture {
    /// Number of times the callback with this label ran.
    pub fn count(&self, label: &str) -> usize {
        let note = MockCall::Note(label.to_string());
        self.platform
            .journal()
            .iter()
            .filter(|call| **call == note)
            .count()
    }

    pub fn pushed_pages(&self) -> Vec<String> {
        self.platform
            .history()
            .into_iter()
            .map(|state| state.page)
            .collect()
    }
}

pub fn site() -> SiteConfig {
    SiteConfig::builder()
        .base_url("https://ada.example/")
        .default_description("Engines and notes.")
        .build()
}

pub fn registry() -> RouteRegistry {
    RouteRegistry::from_routes([
        RouteDescriptor::new("home").title("Home"),
        RouteDescriptor::new("projects")
            .path("pages/projects.html")
            .title("Projects")
            .meta(RouteMeta {
                description: Some("Things I built.".into()),
                ..Default::default()
            }),
        RouteDescriptor::new("resume")
            .path("pages/resume.html")
            .title("Resume"),
    ])
    .unwrap()
}

/// A callback that records `label` in the platform journal.
pub fn noted(
    platform: &MockPlatform,
    label: &'static str,
) -> impl Fn() -> Result<(), CallbackError> + 'static {
    let platform = platform.clone();
    move || {
        platform.note(label);
        Ok(())
    }
}

/// Overlay and drawer callbacks that record themselves.
pub fn chrome(platform: &MockPlatform) -> RouterCallbacks {
    RouterCallbacks::new()
        .show_overlay(noted(platform, "show_overlay"))
        .hide_overlay(noted(platform, "hide_overlay"))
        .close_drawer(noted(platform, "close_drawer"))
}

pub fn fixture_with(
    registry: RouteRegistry,
    callbacks: impl FnOnce(&MockPlatform) -> RouterCallbacks,
) -> Fixture {
    let platform = MockPlatform::new();
    platform.respond(
        "pages/projects.html",
        MockResponse::Html(PROJECTS_HTML.into()),
    );
    let content = MockElement::new("main");
    content.set_offset_height(412.0);
    let headline = MockElement::new("span");
    let router = Router::new(platform.clone(), registry, site());
    router.init(
        Some(content.clone()),
        Some(headline.clone()),
        Some(HOME_HTML.to_string()),
        callbacks(&platform),
    );
    Fixture {
        platform,
        router,
        content,
        headline,
    }
}

pub fn fixture() -> Fixture {
    fixture_with(registry(), chrome)
}

/// Runs `f` with a subscriber that records every router log line.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = {
        let buffer = Arc::clone(&buffer);
        move || LogWriter(Arc::clone(&buffer))
    };
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .without_time()
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    (out, logs)
}

struct LogWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
