mod common;

use common::*;
use folio_meta::HeadSelector;
use folio_router::{
    platform::{
        mock_dom::{MockCall, MockElement, MockResponse},
        HistoryState,
    },
    CallbackError, RouteDescriptor, RouteRegistry, RouterCallbacks,
};
use futures::executor::block_on;
use std::{cell::Cell, rc::Rc, time::Duration};

fn position(journal: &[MockCall], pred: impl Fn(&MockCall) -> bool) -> usize {
    journal.iter().position(pred).unwrap()
}

#[test]
fn navigates_to_a_fetched_page() {
    let f = fixture();
    block_on(f.router.load_page_content("projects", true));

    assert_eq!(f.content.inner_html(), PROJECTS_HTML);
    assert_eq!(f.headline.text(), "Projects");
    assert_eq!(f.platform.document_title(), "Projects - Portfolio");
    assert_eq!(f.pushed_pages(), ["projects"]);
    assert!(f.platform.journal().contains(&MockCall::PushState {
        state: HistoryState {
            page: "projects".into()
        },
        title: "Projects".into(),
        url: "#projects".into(),
    }));
    assert_eq!(
        f.platform.head_value(HeadSelector::CanonicalLink).as_deref(),
        Some("https://ada.example/#projects")
    );
    assert_eq!(
        f.platform
            .head_value(HeadSelector::MetaName("description"))
            .as_deref(),
        Some("Things I built.")
    );
    assert_eq!(
        f.platform
            .head_value(HeadSelector::MetaName("robots"))
            .as_deref(),
        Some("index, follow")
    );
    assert_eq!(f.content.style("opacity").as_deref(), Some("1"));
    assert_eq!(f.content.style("min-height"), None);
    assert_eq!(f.count("show_overlay"), 1);
    assert_eq!(f.count("close_drawer"), 1);
    assert_eq!(f.count("hide_overlay"), 1);
}

#[test]
fn steps_run_in_order() {
    let f = fixture();
    block_on(f.router.load_page_content("#projects", true));

    let journal = f.platform.journal();
    let show = position(&journal, |c| {
        *c == MockCall::Note("show_overlay".into())
    });
    let fade_out = position(&journal, |c| matches!(c, MockCall::Animate { .. }));
    let fetch = position(&journal, |c| matches!(c, MockCall::Fetch(_)));
    let swap = position(&journal, |c| matches!(c, MockCall::SetInnerHtml(_)));
    let push = position(&journal, |c| matches!(c, MockCall::PushState { .. }));
    let scroll = position(&journal, |c| *c == MockCall::ScrollToOrigin);
    let fade_in = journal
        .iter()
        .rposition(|c| matches!(c, MockCall::Animate { .. }))
        .unwrap();
    let hide = position(&journal, |c| {
        *c == MockCall::Note("hide_overlay".into())
    });

    assert!(show < fade_out);
    assert!(fade_out < fetch);
    assert!(fetch < swap);
    assert!(swap < push);
    assert!(push < scroll);
    assert!(scroll < fade_in);
    assert!(fade_in < hide);
}

#[test]
fn unknown_route_renders_not_found() {
    let f = fixture();
    let (_, logs) =
        capture_logs(|| block_on(f.router.load_page_content("nope", true)));

    assert_eq!(
        f.content.inner_html(),
        r#"<div class="page-section active">Page not found: nope</div>"#
    );
    assert_eq!(f.platform.document_title(), "Not Found - Portfolio");
    assert_eq!(f.headline.text(), "Not Found");
    assert_eq!(
        f.platform
            .head_value(HeadSelector::MetaName("robots"))
            .as_deref(),
        Some("noindex")
    );
    assert!(f.pushed_pages().is_empty());
    assert_eq!(f.platform.fetch_count(), 0);
    assert_eq!(f.count("hide_overlay"), 1);
    assert!(logs.contains("No route registered for \"nope\""));
}

#[test]
fn not_found_markup_is_escaped() {
    let f = fixture();
    block_on(f.router.load_page_content("<img src=x>", true));
    assert_eq!(
        f.content.inner_html(),
        r#"<div class="page-section active">Page not found: &lt;img src=x&gt;</div>"#
    );
}

#[test]
fn http_failure_renders_error() {
    let f = fixture();
    f.platform.respond(
        "pages/projects.html",
        MockResponse::Status(500, "Internal Server Error".into()),
    );
    let (_, logs) = capture_logs(|| {
        block_on(f.router.load_page_content("projects", true))
    });

    let html = f.content.inner_html();
    assert!(html.contains(r#"<p class="error-message">"#));
    assert!(html.contains(
        "Failed to load Projects: HTTP 500 Internal Server Error"
    ));
    assert_eq!(f.platform.document_title(), "Error - Portfolio");
    assert_eq!(
        f.platform
            .head_value(HeadSelector::MetaName("robots"))
            .as_deref(),
        Some("noindex")
    );
    assert_eq!(f.count("hide_overlay"), 1);
    assert_eq!(f.content.style("min-height"), None);
    assert!(logs.contains("Failed to load page \"Projects\""));
}

#[test]
fn network_failure_renders_error() {
    let f = fixture();
    f.platform.respond(
        "pages/projects.html",
        MockResponse::NetworkError("boom".into()),
    );
    let (_, logs) = capture_logs(|| {
        block_on(f.router.load_page_content("projects", true))
    });

    assert!(f.content.inner_html().contains("Failed"));
    assert!(f.content.inner_html().contains("boom"));
    assert_eq!(f.count("hide_overlay"), 1);
    let line = logs
        .lines()
        .find(|line| line.contains("Failed to load page"))
        .unwrap();
    assert!(line.contains("Projects"));
    assert!(line.contains("boom"));
}

#[test]
fn home_uses_initial_markup() {
    let f = fixture_with(registry(), |platform| {
        chrome(platform).on_home_load(noted(platform, "on_home_load"))
    });
    for id in [None, Some("#"), Some(""), Some("index.html"), Some("#home")] {
        block_on(f.router.load_page_content(id, true));
        assert_eq!(f.content.inner_html(), HOME_HTML);
    }
    assert_eq!(f.platform.fetch_count(), 0);
    assert_eq!(f.count("on_home_load"), 5);
    assert_eq!(f.platform.document_title(), "Home - Portfolio");
    assert_eq!(
        f.platform.head_value(HeadSelector::CanonicalLink).as_deref(),
        Some("https://ada.example/")
    );
    assert!(f.pushed_pages().iter().all(|page| page == "home"));
}

#[test]
fn replayed_navigation_does_not_push_history() {
    let f = fixture();
    block_on(f.router.load_page_content("projects", false));
    assert_eq!(f.content.inner_html(), PROJECTS_HTML);
    assert!(f.pushed_pages().is_empty());
}

#[test]
fn missing_history_api_is_tolerated() {
    let f = fixture();
    f.platform.set_history_available(false);
    block_on(f.router.load_page_content("projects", true));
    assert_eq!(f.content.inner_html(), PROJECTS_HTML);
    assert!(f.pushed_pages().is_empty());
}

#[test]
fn uninitialized_router_logs_and_hides_overlay() {
    let f = fixture();
    f.router.init(None, None, None, chrome(&f.platform));
    let (_, logs) = capture_logs(|| {
        block_on(f.router.load_page_content("projects", true))
    });
    assert!(logs.contains("Cannot navigate"));
    assert_eq!(f.platform.fetch_count(), 0);
    assert_eq!(f.count("show_overlay"), 1);
    assert_eq!(f.count("hide_overlay"), 1);
}

#[test]
fn fast_navigations_wait_out_the_minimum() {
    let f = fixture();
    block_on(f.router.load_page_content("projects", true));
    assert!(f
        .platform
        .journal()
        .contains(&MockCall::Sleep(Duration::from_millis(600))));

    f.platform.clear_journal();
    f.platform.set_fetch_latency(Duration::from_millis(250));
    block_on(f.router.load_page_content("projects", true));
    assert!(f
        .platform
        .journal()
        .contains(&MockCall::Sleep(Duration::from_millis(350))));
}

#[test]
fn slow_navigations_do_not_wait() {
    let f = fixture();
    f.platform.set_fetch_latency(Duration::from_millis(700));
    block_on(f.router.load_page_content("projects", true));
    assert!(!f
        .platform
        .journal()
        .iter()
        .any(|call| matches!(call, MockCall::Sleep(_))));
}

#[test]
fn minimum_duration_can_be_disabled() {
    let f = fixture();
    let router = f.router.clone().with_min_load_duration(Duration::ZERO);
    assert_eq!(router.min_load_duration(), Duration::ZERO);
    block_on(router.load_page_content("projects", true));
    assert!(!f
        .platform
        .journal()
        .iter()
        .any(|call| matches!(call, MockCall::Sleep(_))));
}

#[test]
fn overlay_hides_after_minimum_wait() {
    let f = fixture();
    block_on(f.router.load_page_content("projects", true));
    let journal = f.platform.journal();
    let sleep = position(&journal, |c| matches!(c, MockCall::Sleep(_)));
    let hide = position(&journal, |c| {
        *c == MockCall::Note("hide_overlay".into())
    });
    assert!(sleep < hide);
}

#[test]
fn failing_callbacks_are_logged_and_skipped() {
    let f = fixture_with(registry(), |platform| {
        RouterCallbacks::new()
            .show_overlay(|| Err("overlay missing"))
            .close_drawer(|| Err("drawer missing"))
            .hide_overlay(noted(platform, "hide_overlay"))
    });
    let (_, logs) = capture_logs(|| {
        block_on(f.router.load_page_content("projects", true))
    });
    assert_eq!(f.content.inner_html(), PROJECTS_HTML);
    assert_eq!(f.count("hide_overlay"), 1);
    assert!(logs.contains("show_overlay callback failed: overlay missing"));
    assert!(logs.contains("close_drawer callback failed: drawer missing"));
}

#[test]
fn page_handlers_take_precedence_over_ready_hooks() {
    let hook_runs = Rc::new(Cell::new(0));
    let registry = {
        let hook_runs = Rc::clone(&hook_runs);
        RouteRegistry::from_routes([
            RouteDescriptor::new("home"),
            RouteDescriptor::new("projects")
                .path("pages/projects.html")
                .title("Projects")
                .on_load(move |id: &str| {
                    assert_eq!(id, "projects");
                    hook_runs.set(hook_runs.get() + 1);
                    Ok::<_, CallbackError>(())
                }),
        ])
        .unwrap()
    };

    let f = fixture_with(registry.clone(), chrome);
    block_on(f.router.load_page_content("projects", true));
    assert_eq!(hook_runs.get(), 1);

    let f = fixture_with(registry, |platform| {
        let platform = platform.clone();
        chrome(&platform).page_handler("#projects", move |id: &str| {
            platform.note(format!("handler:{id}"));
            Ok::<_, CallbackError>(())
        })
    });
    block_on(f.router.load_page_content("projects", true));
    assert_eq!(hook_runs.get(), 1);
    assert_eq!(f.count("handler:projects"), 1);
}

#[test]
fn ready_hook_errors_are_logged() {
    let registry = RouteRegistry::from_routes([RouteDescriptor::new(
        "projects",
    )
    .path("pages/projects.html")
    .on_load(|_: &str| Err("grid missing"))])
    .unwrap();
    let f = fixture_with(registry, chrome);
    let (_, logs) = capture_logs(|| {
        block_on(f.router.load_page_content("projects", true))
    });
    assert!(logs.contains("ready hook for \"projects\" failed: grid missing"));
    assert_eq!(f.count("hide_overlay"), 1);
}

#[test]
fn ready_hook_is_skipped_when_loading_fails() {
    let ran = Rc::new(Cell::new(false));
    let registry = {
        let ran = Rc::clone(&ran);
        RouteRegistry::from_routes([RouteDescriptor::new("resume")
            .path("pages/resume.html")
            .on_load(move |_: &str| {
                ran.set(true);
                Ok::<_, CallbackError>(())
            })])
        .unwrap()
    };
    let f = fixture_with(registry, chrome);
    // no response scripted for pages/resume.html, so the mock answers 404
    block_on(f.router.load_page_content("resume", true));
    assert!(f.content.inner_html().contains("HTTP 404 Not Found"));
    assert!(!ran.get());
}

#[test]
fn route_without_title_falls_back_to_default_title() {
    let registry = RouteRegistry::from_routes([
        RouteDescriptor::new("projects").path("pages/projects.html")
    ])
    .unwrap();
    let f = fixture_with(registry, chrome);
    block_on(f.router.load_page_content("projects", true));
    assert_eq!(f.headline.text(), "Portfolio");
    assert_eq!(f.platform.document_title(), "Portfolio - Portfolio");
}

#[test]
fn active_nav_link_is_highlighted() {
    let f = fixture();
    let section = MockElement::new("details");
    let projects = f.platform.add_nav_link("#projects");
    let projects = projects.within(&section);
    let resume = f.platform.add_nav_link("#resume");

    block_on(f.router.load_page_content("projects", true));
    assert!(projects.has_class("active"));
    assert_eq!(projects.attribute("aria-current").as_deref(), Some("page"));
    assert_eq!(section.attribute("open").as_deref(), Some(""));
    assert!(!resume.has_class("active"));

    block_on(f.router.load_page_content("resume", true));
    assert!(!projects.has_class("active"));
    assert_eq!(projects.attribute("aria-current"), None);
    assert!(resume.has_class("active"));
}
