//! A stupidly-simple mock platform that can be used for testing.
//!
//! Do not use this for anything real.

use super::{
    AnimationFuture, AnimationTiming, Clock, Dom, Fetch, FetchResponse,
    History, HistoryState, Keyframe, PlatformError,
};
use folio_meta::{HeadDom, HeadSelector};
use futures::{
    channel::oneshot,
    future::{self, LocalBoxFuture},
    FutureExt,
};
use indexmap::IndexMap;
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    rc::Rc,
    time::Duration,
};

/// A mock element. Clones are handles to the same element.
#[derive(Clone, Default)]
pub struct MockElement(Rc<RefCell<ElementData>>);

#[derive(Debug, Default)]
struct ElementData {
    tag: String,
    attributes: IndexMap<String, String>,
    classes: Vec<String>,
    styles: IndexMap<String, String>,
    inner_html: String,
    text: String,
    offset_height: f64,
    parent: Option<MockElement>,
}

impl PartialEq for MockElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for MockElement {}

impl fmt::Debug for MockElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("MockElement")
            .field("tag", &data.tag)
            .field("attributes", &data.attributes)
            .field("classes", &data.classes)
            .finish_non_exhaustive()
    }
}

impl MockElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(ElementData {
            tag: tag.to_string(),
            ..Default::default()
        })))
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Makes `parent` this element's parent.
    pub fn within(self, parent: &MockElement) -> Self {
        self.0.borrow_mut().parent = Some(parent.clone());
        self
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn inner_html(&self) -> String {
        self.0.borrow().inner_html.clone()
    }

    pub fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn style(&self, name: &str) -> Option<String> {
        self.0.borrow().styles.get(name).cloned()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    pub fn set_offset_height(&self, height: f64) {
        self.0.borrow_mut().offset_height = height;
    }

    fn parent(&self) -> Option<MockElement> {
        self.0.borrow().parent.clone()
    }
}

/// How [`MockPlatform`] responds to `animate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnimationSupport {
    /// Animations start and finish immediately.
    #[default]
    Native,
    /// Elements have no `animate` method.
    Missing,
    /// `animate` fails before returning.
    ThrowsSync,
    /// The animation starts, then its `finished` promise rejects.
    Rejects,
}

/// A scripted reply to a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// `200 OK` with this body.
    Html(String),
    /// A response with this status and status text, and an empty body.
    Status(u16, String),
    /// The request fails without a response.
    NetworkError(String),
}

/// Everything the router did to the mock platform, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    SetInnerHtml(String),
    SetTextContent(String),
    Animate {
        keyframes: Vec<Keyframe>,
        timing: AnimationTiming,
    },
    SetDocumentTitle(String),
    ScrollToOrigin,
    PushState {
        state: HistoryState,
        title: String,
        url: String,
    },
    Fetch(String),
    Sleep(Duration),
    /// Recorded by a test through [`MockPlatform::note`].
    Note(String),
}

/// Holds back a fetch until released.
#[derive(Debug)]
pub struct FetchGate(oneshot::Sender<()>);

impl FetchGate {
    /// Lets the gated fetch complete. Dropping the gate does the same.
    pub fn release(self) {
        _ = self.0.send(());
    }
}

#[derive(Default)]
struct MockState {
    journal: RefCell<Vec<MockCall>>,
    now: Cell<f64>,
    fetch_latency: Cell<f64>,
    responses: RefCell<HashMap<String, MockResponse>>,
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    animation_support: Cell<AnimationSupport>,
    reduced_motion: Cell<bool>,
    history_unavailable: Cell<bool>,
    history: RefCell<Vec<HistoryState>>,
    document_title: RefCell<String>,
    head: RefCell<Vec<MockElement>>,
    nav_links: RefCell<Vec<MockElement>>,
}

/// A [`Platform`](super::Platform) that runs entirely in memory.
///
/// Time only moves when the router sleeps or a fetch with latency completes.
/// Fetches for paths with no scripted response fail with a 404.
#[derive(Clone, Default)]
pub struct MockPlatform(Rc<MockState>);

impl fmt::Debug for MockPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockPlatform")
            .field("now", &self.0.now.get())
            .field("journal", &self.0.journal.borrow().len())
            .finish_non_exhaustive()
    }
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: MockCall) {
        self.0.journal.borrow_mut().push(call);
    }

    /// Appends a marker to the journal.
    pub fn note(&self, label: impl Into<String>) {
        self.record(MockCall::Note(label.into()));
    }

    pub fn journal(&self) -> Vec<MockCall> {
        self.0.journal.borrow().clone()
    }

    pub fn clear_journal(&self) {
        self.0.journal.borrow_mut().clear();
    }

    /// Scripts the reply for every fetch of `path`.
    pub fn respond(&self, path: &str, response: MockResponse) {
        self.0
            .responses
            .borrow_mut()
            .insert(path.to_string(), response);
    }

    /// Holds the next fetch of `path` until the returned gate is released.
    pub fn gate(&self, path: &str) -> FetchGate {
        let (tx, rx) = oneshot::channel();
        self.0.gates.borrow_mut().insert(path.to_string(), rx);
        FetchGate(tx)
    }

    /// How far the clock advances while each fetch is in flight.
    pub fn set_fetch_latency(&self, latency: Duration) {
        self.0.fetch_latency.set(latency.as_secs_f64() * 1000.0);
    }

    pub fn advance(&self, by: Duration) {
        self.0.now.set(self.0.now.get() + by.as_secs_f64() * 1000.0);
    }

    pub fn set_animation_support(&self, support: AnimationSupport) {
        self.0.animation_support.set(support);
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.0.reduced_motion.set(reduced);
    }

    pub fn set_history_available(&self, available: bool) {
        self.0.history_unavailable.set(!available);
    }

    /// Every state pushed so far, oldest first.
    pub fn history(&self) -> Vec<HistoryState> {
        self.0.history.borrow().clone()
    }

    pub fn document_title(&self) -> String {
        self.0.document_title.borrow().clone()
    }

    /// Adds a drawer link with this `href`.
    pub fn add_nav_link(&self, href: &str) -> MockElement {
        let link = MockElement::new("a").with_attribute("href", href);
        self.0.nav_links.borrow_mut().push(link.clone());
        link
    }

    /// The value attribute of the head tag matching `selector`.
    pub fn head_value(&self, selector: HeadSelector<'_>) -> Option<String> {
        self.find_head_tag(&selector)
            .and_then(|tag| tag.attribute(selector.value_attribute()))
    }

    /// Number of fetches recorded in the journal.
    pub fn fetch_count(&self) -> usize {
        self.0
            .journal
            .borrow()
            .iter()
            .filter(|call| matches!(call, MockCall::Fetch(_)))
            .count()
    }
}

impl Dom for MockPlatform {
    type Element = MockElement;

    fn set_inner_html(&self, el: &MockElement, html: &str) {
        self.record(MockCall::SetInnerHtml(html.to_string()));
        el.0.borrow_mut().inner_html = html.to_string();
    }

    fn set_text_content(&self, el: &MockElement, text: &str) {
        self.record(MockCall::SetTextContent(text.to_string()));
        el.0.borrow_mut().text = text.to_string();
    }

    fn offset_height(&self, el: &MockElement) -> f64 {
        el.0.borrow().offset_height
    }

    fn style_property(&self, el: &MockElement, name: &str) -> Option<String> {
        el.style(name).filter(|value| !value.is_empty())
    }

    fn set_style_property(
        &self,
        el: &MockElement,
        name: &str,
        value: Option<&str>,
    ) {
        let mut data = el.0.borrow_mut();
        match value {
            Some(value) => {
                data.styles.insert(name.to_string(), value.to_string());
            }
            None => {
                data.styles.shift_remove(name);
            }
        }
    }

    fn supports_animation(&self, _el: &MockElement) -> bool {
        self.0.animation_support.get() != AnimationSupport::Missing
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.0.reduced_motion.get()
    }

    fn animate(
        &self,
        _el: &MockElement,
        keyframes: &[Keyframe],
        timing: &AnimationTiming,
    ) -> Result<AnimationFuture, PlatformError> {
        match self.0.animation_support.get() {
            AnimationSupport::Missing => {
                Err(PlatformError::Unsupported("Element.animate"))
            }
            AnimationSupport::ThrowsSync => {
                Err(PlatformError::Js("SyntaxError: bad keyframes".into()))
            }
            support => {
                self.record(MockCall::Animate {
                    keyframes: keyframes.to_vec(),
                    timing: timing.clone(),
                });
                let result = if support == AnimationSupport::Rejects {
                    Err(PlatformError::Js("AbortError: aborted".into()))
                } else {
                    Ok(())
                };
                Ok(future::ready(result).boxed_local())
            }
        }
    }

    fn set_document_title(&self, title: &str) {
        self.record(MockCall::SetDocumentTitle(title.to_string()));
        *self.0.document_title.borrow_mut() = title.to_string();
    }

    fn scroll_to_origin(&self) {
        self.record(MockCall::ScrollToOrigin);
    }

    fn nav_links(&self) -> Vec<MockElement> {
        self.0.nav_links.borrow().clone()
    }

    fn attribute(&self, el: &MockElement, name: &str) -> Option<String> {
        el.attribute(name)
    }

    fn set_attribute(&self, el: &MockElement, name: &str, value: Option<&str>) {
        let mut data = el.0.borrow_mut();
        match value {
            Some(value) => {
                data.attributes.insert(name.to_string(), value.to_string());
            }
            None => {
                data.attributes.shift_remove(name);
            }
        }
    }

    fn toggle_class(&self, el: &MockElement, class: &str, on: bool) {
        let mut data = el.0.borrow_mut();
        data.classes.retain(|c| c != class);
        if on {
            data.classes.push(class.to_string());
        }
    }

    fn collapsed_section(&self, el: &MockElement) -> Option<MockElement> {
        let mut next = el.parent();
        while let Some(parent) = next {
            if parent.tag() == "details" {
                return parent.attribute("open").is_none().then_some(parent);
            }
            next = parent.parent();
        }
        None
    }

    fn expand_section(&self, section: &MockElement) {
        self.set_attribute(section, "open", Some(""));
    }
}

impl HeadDom for MockPlatform {
    type Tag = MockElement;

    fn find_head_tag(&self, selector: &HeadSelector<'_>) -> Option<MockElement> {
        let (attr, value) = selector.key();
        self.0
            .head
            .borrow()
            .iter()
            .find(|tag| {
                tag.tag() == selector.tag_name()
                    && tag.attribute(attr).as_deref() == Some(value)
            })
            .cloned()
    }

    fn create_head_tag(
        &self,
        selector: &HeadSelector<'_>,
    ) -> Option<MockElement> {
        let (attr, value) = selector.key();
        let tag = MockElement::new(selector.tag_name()).with_attribute(attr, value);
        self.0.head.borrow_mut().push(tag.clone());
        Some(tag)
    }

    fn set_tag_attribute(&self, tag: &MockElement, name: &str, value: &str) {
        self.set_attribute(tag, name, Some(value));
    }

    fn remove_head_tag(&self, tag: &MockElement) {
        self.0.head.borrow_mut().retain(|existing| existing != tag);
    }
}

impl History for MockPlatform {
    fn history_available(&self) -> bool {
        !self.0.history_unavailable.get()
    }

    fn push_state(
        &self,
        state: &HistoryState,
        title: &str,
        url: &str,
    ) -> Result<(), PlatformError> {
        if !self.history_available() {
            return Err(PlatformError::Unsupported("history.pushState"));
        }
        self.record(MockCall::PushState {
            state: state.clone(),
            title: title.to_string(),
            url: url.to_string(),
        });
        self.0.history.borrow_mut().push(state.clone());
        Ok(())
    }
}

impl Fetch for MockPlatform {
    fn fetch_text(
        &self,
        path: &str,
    ) -> LocalBoxFuture<'static, Result<FetchResponse, PlatformError>> {
        self.record(MockCall::Fetch(path.to_string()));
        let gate = self.0.gates.borrow_mut().remove(path);
        let response = self.0.responses.borrow().get(path).cloned();
        let this = self.clone();
        async move {
            if let Some(gate) = gate {
                // a dropped gate releases the fetch too
                _ = gate.await;
            }
            this.0.now.set(this.0.now.get() + this.0.fetch_latency.get());
            match response {
                Some(MockResponse::Html(body)) => Ok(FetchResponse {
                    status: 200,
                    status_text: "OK".into(),
                    body,
                }),
                Some(MockResponse::Status(status, status_text)) => {
                    Ok(FetchResponse {
                        status,
                        status_text,
                        body: String::new(),
                    })
                }
                Some(MockResponse::NetworkError(message)) => {
                    Err(PlatformError::Network(message))
                }
                None => Ok(FetchResponse {
                    status: 404,
                    status_text: "Not Found".into(),
                    body: String::new(),
                }),
            }
        }
        .boxed_local()
    }
}

impl Clock for MockPlatform {
    fn now(&self) -> f64 {
        self.0.now.get()
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        self.record(MockCall::Sleep(duration));
        self.advance(duration);
        future::ready(()).boxed_local()
    }
}
