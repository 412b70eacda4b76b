use super::{
    AnimationFuture, AnimationTiming, Clock, Dom, Fetch, FetchResponse,
    History, HistoryState, Keyframe, PlatformError,
};
use crate::{
    link::{resolve_link_target, LinkClick},
    Router,
};
use folio_meta::{HeadDom, HeadSelector};
use futures::{future::LocalBoxFuture, FutureExt};
use gloo_net::http::Request;
use js_sys::{Array, Function, Object, Promise, Reflect};
use std::time::Duration;
use wasm_bindgen::{closure::Closure, intern, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, HtmlElement, MouseEvent, PopStateEvent, Window};

/// Drawer links, unless configured otherwise.
pub const DEFAULT_NAV_LINK_SELECTOR: &str =
    ".nav-drawer a[href^='#'], .nav-drawer md-list-item[href^='#']";

/// Elements whose clicks may be navigations.
const LINK_SELECTOR: &str = "a[href], md-list-item[href]";

fn js_error(value: JsValue) -> PlatformError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    PlatformError::Js(message)
}

fn set_property(
    target: &Object,
    key: &str,
    value: &JsValue,
) -> Result<(), PlatformError> {
    Reflect::set(target, &JsValue::from_str(intern(key)), value)
        .map(|_| ())
        .map_err(js_error)
}

/// The real browser, through `web-sys`.
#[derive(Debug, Clone)]
pub struct BrowserPlatform {
    window: Window,
    document: Document,
    nav_link_selector: String,
}

impl BrowserPlatform {
    pub fn new() -> Result<Self, PlatformError> {
        let window =
            web_sys::window().ok_or(PlatformError::Unsupported("window"))?;
        let document = window
            .document()
            .ok_or(PlatformError::Unsupported("document"))?;
        Ok(Self {
            window,
            document,
            nav_link_selector: DEFAULT_NAV_LINK_SELECTOR.to_string(),
        })
    }

    /// Sets the CSS selector that finds the drawer's navigation links.
    pub fn with_nav_link_selector(mut self, selector: impl Into<String>) -> Self {
        self.nav_link_selector = selector.into();
        self
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    /// The current URL fragment, including its `#`, if there is one.
    pub fn location_hash(&self) -> Option<String> {
        self.window
            .location()
            .hash()
            .ok()
            .filter(|hash| !hash.is_empty())
    }

    fn animate_method(&self, el: &Element) -> Option<Function> {
        Reflect::get(el, &JsValue::from_str(intern("animate")))
            .ok()
            .and_then(|animate| animate.dyn_into::<Function>().ok())
    }
}

impl Dom for BrowserPlatform {
    type Element = Element;

    fn set_inner_html(&self, el: &Element, html: &str) {
        el.set_inner_html(html);
    }

    fn set_text_content(&self, el: &Element, text: &str) {
        el.set_text_content(Some(text));
    }

    fn offset_height(&self, el: &Element) -> f64 {
        el.dyn_ref::<HtmlElement>()
            .map(|el| el.offset_height() as f64)
            .unwrap_or_default()
    }

    fn style_property(&self, el: &Element, name: &str) -> Option<String> {
        el.dyn_ref::<HtmlElement>()?
            .style()
            .get_property_value(name)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style_property(&self, el: &Element, name: &str, value: Option<&str>) {
        let Some(el) = el.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = el.style();
        let result = match value {
            Some(value) => style.set_property(name, value),
            None => style.remove_property(name).map(|_| ()),
        };
        if let Err(e) = result {
            crate::debug_warn!("Could not set style {name}: {}", js_error(e));
        }
    }

    fn supports_animation(&self, el: &Element) -> bool {
        self.animate_method(el).is_some()
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }

    fn animate(
        &self,
        el: &Element,
        keyframes: &[Keyframe],
        timing: &AnimationTiming,
    ) -> Result<AnimationFuture, PlatformError> {
        let animate = self
            .animate_method(el)
            .ok_or(PlatformError::Unsupported("Element.animate"))?;

        let frames = Array::new();
        for keyframe in keyframes {
            let frame = Object::new();
            set_property(&frame, "opacity", &keyframe.opacity.into())?;
            if let Some(transform) = &keyframe.transform {
                set_property(&frame, "transform", &transform.as_str().into())?;
            }
            if let Some(filter) = &keyframe.filter {
                set_property(&frame, "filter", &filter.as_str().into())?;
            }
            frames.push(&frame);
        }
        let options = Object::new();
        set_property(
            &options,
            "duration",
            &(timing.duration.as_secs_f64() * 1000.0).into(),
        )?;
        set_property(&options, "easing", &timing.easing.as_str().into())?;
        set_property(&options, "fill", &"forwards".into())?;

        let animation = animate.call2(el, &frames, &options).map_err(js_error)?;
        let finished = Reflect::get(&animation, &JsValue::from_str("finished"))
            .map_err(js_error)?
            .dyn_into::<Promise>()
            .map_err(|_| PlatformError::Unsupported("Animation.finished"))?;
        Ok(async move {
            JsFuture::from(finished).await.map(|_| ()).map_err(js_error)
        }
        .boxed_local())
    }

    fn set_document_title(&self, title: &str) {
        self.document.set_title(title);
    }

    fn scroll_to_origin(&self) {
        self.window.scroll_to_with_x_and_y(0.0, 0.0);
    }

    fn nav_links(&self) -> Vec<Element> {
        let Ok(links) = self.document.query_selector_all(&self.nav_link_selector)
        else {
            crate::warn!("Invalid nav link selector {:?}", self.nav_link_selector);
            return Vec::new();
        };
        (0..links.length())
            .filter_map(|idx| links.get(idx))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn attribute(&self, el: &Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_attribute(&self, el: &Element, name: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => el.set_attribute(name, value),
            None => el.remove_attribute(name),
        };
        if let Err(e) = result {
            crate::debug_warn!("Could not set attribute {name}: {}", js_error(e));
        }
    }

    fn toggle_class(&self, el: &Element, class: &str, on: bool) {
        _ = el.class_list().toggle_with_force(class, on);
    }

    fn collapsed_section(&self, el: &Element) -> Option<Element> {
        el.closest("details")
            .ok()
            .flatten()
            .filter(|details| !details.has_attribute("open"))
    }

    fn expand_section(&self, section: &Element) {
        _ = section.set_attribute("open", "");
    }
}

impl HeadDom for BrowserPlatform {
    type Tag = Element;

    fn find_head_tag(&self, selector: &HeadSelector<'_>) -> Option<Element> {
        self.document
            .head()?
            .query_selector(&selector.to_css())
            .ok()
            .flatten()
    }

    fn create_head_tag(&self, selector: &HeadSelector<'_>) -> Option<Element> {
        let head = self.document.head()?;
        let tag = self.document.create_element(selector.tag_name()).ok()?;
        let (attr, value) = selector.key();
        tag.set_attribute(attr, value).ok()?;
        head.append_child(&tag).ok()?;
        Some(tag)
    }

    fn set_tag_attribute(&self, tag: &Element, name: &str, value: &str) {
        _ = tag.set_attribute(name, value);
    }

    fn remove_head_tag(&self, tag: &Element) {
        tag.remove();
    }
}

impl History for BrowserPlatform {
    fn history_available(&self) -> bool {
        self.window.history().is_ok()
    }

    fn push_state(
        &self,
        state: &HistoryState,
        title: &str,
        url: &str,
    ) -> Result<(), PlatformError> {
        let history = self.window.history().map_err(js_error)?;
        let js_state = Object::new();
        set_property(&js_state, "page", &state.page.as_str().into())?;
        history
            .push_state_with_url(&js_state, title, Some(url))
            .map_err(js_error)
    }
}

impl Fetch for BrowserPlatform {
    fn fetch_text(
        &self,
        path: &str,
    ) -> LocalBoxFuture<'static, Result<FetchResponse, PlatformError>> {
        let path = path.to_string();
        async move {
            let response = Request::get(&path)
                .send()
                .await
                .map_err(|e| PlatformError::Network(e.to_string()))?;
            let body = if response.ok() {
                response
                    .text()
                    .await
                    .map_err(|e| PlatformError::Network(e.to_string()))?
            } else {
                String::new()
            };
            Ok(FetchResponse {
                status: response.status(),
                status_text: response.status_text(),
                body,
            })
        }
        .boxed_local()
    }
}

impl Clock for BrowserPlatform {
    fn now(&self) -> f64 {
        self.window
            .performance()
            .map(|performance| performance.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let window = self.window.clone();
        let ms = duration.as_millis().min(i32::MAX as u128) as i32;
        let promise = Promise::new(&mut |resolve, _reject| {
            if window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    &resolve, ms,
                )
                .is_err()
            {
                _ = resolve.call0(&JsValue::UNDEFINED);
            }
        });
        async move {
            _ = JsFuture::from(promise).await;
        }
        .boxed_local()
    }
}

impl Router<BrowserPlatform> {
    /// Routes clicks on registered fragment links through the router.
    ///
    /// Installs one capturing `click` listener on the document; calling this
    /// again does nothing.
    pub fn intercept_links(&self) {
        if self.inner.links_intercepted.replace(true) {
            return;
        }
        let router = self.clone();
        let closure = Closure::wrap(Box::new(move |ev: MouseEvent| {
            let Some(link) = ev
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(LINK_SELECTOR).ok().flatten())
            else {
                return;
            };
            let href = link.get_attribute("href");
            let target = link.get_attribute("target");
            let click = LinkClick {
                href: href.as_deref(),
                target: target.as_deref(),
                button: ev.button(),
                modifier_key: ev.meta_key()
                    || ev.alt_key()
                    || ev.ctrl_key()
                    || ev.shift_key(),
                default_prevented: ev.default_prevented(),
            };
            let Some(page_id) = resolve_link_target(router.registry(), &click)
            else {
                return;
            };
            ev.prevent_default();
            let router = router.clone();
            spawn_local(async move {
                router.load_page_content(page_id.as_str(), true).await;
            });
        }) as Box<dyn FnMut(MouseEvent)>)
        .into_js_value();

        if let Err(e) = self
            .inner
            .platform
            .document
            .add_event_listener_with_callback_and_bool(
                "click",
                closure.unchecked_ref(),
                true,
            )
        {
            self.inner.links_intercepted.set(false);
            crate::error!("Could not listen for link clicks: {}", js_error(e));
        }
    }

    /// Replays back/forward navigation without pushing new history entries.
    ///
    /// The page comes from the entry's `{ page }` state, falling back to the
    /// URL fragment. Calling this again does nothing.
    pub fn listen_popstate(&self) {
        if self.inner.popstate_listening.replace(true) {
            return;
        }
        let router = self.clone();
        let closure = Closure::wrap(Box::new(move |ev: PopStateEvent| {
            let page = Reflect::get(&ev.state(), &JsValue::from_str("page"))
                .ok()
                .and_then(|page| page.as_string())
                .or_else(|| router.platform().location_hash());
            let router = router.clone();
            spawn_local(async move {
                router.load_page_content(page.as_deref(), false).await;
            });
        }) as Box<dyn FnMut(PopStateEvent)>)
        .into_js_value();

        if let Err(e) = self
            .inner
            .platform
            .window
            .add_event_listener_with_callback(
                "popstate",
                closure.unchecked_ref(),
            )
        {
            self.inner.popstate_listening.set(false);
            crate::error!("Could not listen for popstate: {}", js_error(e));
        }
    }
}
