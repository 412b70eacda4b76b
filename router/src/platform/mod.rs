//! The router's view of the host environment.
//!
//! Everything the router does to the outside world goes through the traits in
//! this module. [`dom::BrowserPlatform`] implements them on top of `web-sys`;
//! [`mock_dom::MockPlatform`] implements them in memory so the navigation state
//! machine can be tested without a browser.

pub use folio_meta::HeadDom;
use futures::future::LocalBoxFuture;
use std::time::Duration;
use thiserror::Error;

/// A DOM platform backed by `web-sys`.
pub mod dom;
/// A mock platform, for tests.
pub mod mock_dom;

/// Failures reported by the host environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// A JavaScript exception, rendered to a string.
    #[error("{0}")]
    Js(String),
    /// The host does not provide the named primitive.
    #[error("{0} is not supported in this environment")]
    Unsupported(&'static str),
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
}

/// The parts of a response to a `fetch` the router needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl FetchResponse {
    /// Whether the status is in the 2xx range.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One frame of a keyframe animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub opacity: f64,
    pub transform: Option<String>,
    pub filter: Option<String>,
}

/// Timing options for a keyframe animation. Effects always fill forwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationTiming {
    pub duration: Duration,
    pub easing: String,
}

/// The `state` object pushed onto the history stack for every navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryState {
    pub page: String,
}

/// Settles when an animation has finished.
pub type AnimationFuture = LocalBoxFuture<'static, Result<(), PlatformError>>;

/// Element-level operations.
pub trait Dom {
    type Element: Clone + 'static;

    fn set_inner_html(&self, el: &Self::Element, html: &str);

    fn set_text_content(&self, el: &Self::Element, text: &str);

    /// The element's rendered height, in CSS pixels.
    fn offset_height(&self, el: &Self::Element) -> f64;

    /// Reads an inline style property. Empty values are reported as `None`.
    fn style_property(&self, el: &Self::Element, name: &str) -> Option<String>;

    /// Sets an inline style property, or removes it if `value` is `None`.
    fn set_style_property(
        &self,
        el: &Self::Element,
        name: &str,
        value: Option<&str>,
    );

    /// Whether `el` can run keyframe animations.
    fn supports_animation(&self, el: &Self::Element) -> bool;

    /// Whether the user asked for reduced motion.
    fn prefers_reduced_motion(&self) -> bool;

    /// Starts a keyframe animation on `el`.
    ///
    /// The outer `Result` reports a synchronous failure to start; the future
    /// reports a failure while running.
    fn animate(
        &self,
        el: &Self::Element,
        keyframes: &[Keyframe],
        timing: &AnimationTiming,
    ) -> Result<AnimationFuture, PlatformError>;

    fn set_document_title(&self, title: &str);

    fn scroll_to_origin(&self);

    /// Every navigation link in the drawer.
    fn nav_links(&self) -> Vec<Self::Element>;

    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;

    /// Sets an attribute, or removes it if `value` is `None`.
    fn set_attribute(&self, el: &Self::Element, name: &str, value: Option<&str>);

    fn toggle_class(&self, el: &Self::Element, class: &str, on: bool);

    /// The nearest collapsed section (e.g. a closed `<details>`) containing `el`.
    fn collapsed_section(&self, el: &Self::Element) -> Option<Self::Element>;

    fn expand_section(&self, section: &Self::Element);
}

/// Session history.
pub trait History {
    /// Whether `pushState` can be used.
    fn history_available(&self) -> bool;

    fn push_state(
        &self,
        state: &HistoryState,
        title: &str,
        url: &str,
    ) -> Result<(), PlatformError>;
}

/// Network access.
pub trait Fetch {
    fn fetch_text(
        &self,
        path: &str,
    ) -> LocalBoxFuture<'static, Result<FetchResponse, PlatformError>>;
}

/// Time.
pub trait Clock {
    /// Milliseconds since some fixed point; only differences are meaningful.
    fn now(&self) -> f64;

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Everything the router needs from its host.
pub trait Platform: Dom + HeadDom + History + Fetch + Clock + 'static {}

impl<T> Platform for T where T: Dom + HeadDom + History + Fetch + Clock + 'static {}
