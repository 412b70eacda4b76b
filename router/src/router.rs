use crate::{
    animation::TransitionAnimator,
    error::{CallbackError, RouterError},
    history,
    link::highlight_active_link,
    loader::{self, LoadResult, NOT_FOUND_TITLE},
    normalize_page_id,
    platform::Platform,
    registry::RouteRegistry,
    HOME,
};
use folio_config::SiteConfig;
use folio_meta::{update_for_route, LoadStatus, MetaOptions, RouteMeta};
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    rc::Rc,
    time::Duration,
};

/// A side effect the host page wants run at a fixed point of every navigation.
pub type Callback = Rc<dyn Fn() -> Result<(), CallbackError>>;

/// Page-specific initialization, keyed by route id. Receives the route id.
pub type PageHandler = Rc<dyn Fn(&str) -> Result<(), CallbackError>>;

/// Hooks the host page injects into the router. Anything left unset is a
/// no-op.
#[derive(Clone, Default)]
pub struct RouterCallbacks {
    show_overlay: Option<Callback>,
    hide_overlay: Option<Callback>,
    close_drawer: Option<Callback>,
    on_home_load: Option<Callback>,
    page_handlers: HashMap<String, PageHandler>,
}

fn callback<F, E>(f: F) -> Callback
where
    F: Fn() -> Result<(), E> + 'static,
    E: Into<CallbackError>,
{
    Rc::new(move || f().map_err(Into::into))
}

impl RouterCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called before each navigation begins.
    pub fn show_overlay<F, E>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), E> + 'static,
        E: Into<CallbackError>,
    {
        self.show_overlay = Some(callback(f));
        self
    }

    /// Called once a navigation settles, whether it succeeded or not.
    pub fn hide_overlay<F, E>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), E> + 'static,
        E: Into<CallbackError>,
    {
        self.hide_overlay = Some(callback(f));
        self
    }

    /// Called before each navigation begins.
    pub fn close_drawer<F, E>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), E> + 'static,
        E: Into<CallbackError>,
    {
        self.close_drawer = Some(callback(f));
        self
    }

    /// Called after the home page's markup is inserted.
    pub fn on_home_load<F, E>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), E> + 'static,
        E: Into<CallbackError>,
    {
        self.on_home_load = Some(callback(f));
        self
    }

    /// Runs `f` after the markup for `page_id` is inserted, instead of the
    /// route's own ready hook.
    pub fn page_handler<F, E>(mut self, page_id: &str, f: F) -> Self
    where
        F: Fn(&str) -> Result<(), E> + 'static,
        E: Into<CallbackError>,
    {
        self.page_handlers.insert(
            normalize_page_id(Some(page_id)),
            Rc::new(move |id: &str| f(id).map_err(Into::into)),
        );
        self
    }
}

impl fmt::Debug for RouterCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterCallbacks")
            .field("show_overlay", &self.show_overlay.is_some())
            .field("hide_overlay", &self.hide_overlay.is_some())
            .field("close_drawer", &self.close_drawer.is_some())
            .field("on_home_load", &self.on_home_load.is_some())
            .field("page_handlers", &self.page_handlers.keys())
            .finish()
    }
}

/// Runs a callback if one is set, logging (not propagating) its error.
/// Returns whether there was a callback to run.
fn run_callback(label: &str, callback: Option<&Callback>) -> bool {
    let Some(callback) = callback else {
        return false;
    };
    if let Err(e) = callback() {
        crate::error!("{label} failed: {e}");
    }
    true
}

struct RouterState<E> {
    content_area: Option<E>,
    headline: Option<E>,
    initial_home_html: Option<String>,
    callbacks: RouterCallbacks,
}

impl<E: Clone> Clone for RouterState<E> {
    fn clone(&self) -> Self {
        Self {
            content_area: self.content_area.clone(),
            headline: self.headline.clone(),
            initial_home_html: self.initial_home_html.clone(),
            callbacks: self.callbacks.clone(),
        }
    }
}

impl<E> Default for RouterState<E> {
    fn default() -> Self {
        Self {
            content_area: None,
            headline: None,
            initial_home_html: None,
            callbacks: RouterCallbacks::default(),
        }
    }
}

pub(crate) struct RouterInner<P: Platform> {
    pub(crate) platform: P,
    registry: RouteRegistry,
    site: SiteConfig,
    transitions: TransitionAnimator,
    min_load_duration: Cell<Duration>,
    state: RefCell<RouterState<P::Element>>,
    /// Bumped by every navigation; only the latest may touch shared state.
    generation: Cell<u64>,
    /// The navigation that pinned the content area's `min-height`, if any.
    pinned_by: Cell<Option<u64>>,
    pub(crate) links_intercepted: Cell<bool>,
    pub(crate) popstate_listening: Cell<bool>,
}

impl<P: Platform> RouterInner<P> {
    fn begin_navigation(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    fn superseded(&self, generation: u64, id: &str) -> bool {
        let superseded = !self.is_current(generation);
        if superseded {
            crate::log!("Navigation to \"{id}\" was superseded; abandoning it");
        }
        superseded
    }
}

/// The navigation context: owns the platform, the route registry and the
/// site configuration, and drives every page change.
///
/// `Router` is a cheap handle; clones share the same state.
pub struct Router<P: Platform> {
    pub(crate) inner: Rc<RouterInner<P>>,
}

impl<P: Platform> Clone for Router<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P: Platform> fmt::Debug for Router<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("registry", &self.inner.registry)
            .field("site", &self.inner.site)
            .field("generation", &self.inner.generation.get())
            .finish_non_exhaustive()
    }
}

impl<P: Platform> Router<P> {
    pub fn new(platform: P, registry: RouteRegistry, site: SiteConfig) -> Self {
        Self::with_transitions(
            platform,
            registry,
            site,
            TransitionAnimator::new(),
        )
    }

    pub fn with_transitions(
        platform: P,
        registry: RouteRegistry,
        site: SiteConfig,
        transitions: TransitionAnimator,
    ) -> Self {
        Self {
            inner: Rc::new(RouterInner {
                platform,
                registry,
                transitions,
                min_load_duration: Cell::new(site.min_load_duration()),
                site,
                state: RefCell::new(RouterState::default()),
                generation: Cell::new(0),
                pinned_by: Cell::new(None),
                links_intercepted: Cell::new(false),
                popstate_listening: Cell::new(false),
            }),
        }
    }

    /// Replaces the minimum load duration taken from the site configuration.
    pub fn with_min_load_duration(self, duration: Duration) -> Self {
        self.inner.min_load_duration.set(duration);
        self
    }

    /// Wires the router to the page. May be called again to rewire it; the
    /// new wiring applies to navigations that start afterwards.
    pub fn init(
        &self,
        content_area: Option<P::Element>,
        headline: Option<P::Element>,
        initial_home_html: Option<String>,
        callbacks: RouterCallbacks,
    ) {
        *self.inner.state.borrow_mut() = RouterState {
            content_area,
            headline,
            initial_home_html,
            callbacks,
        };
    }

    pub fn platform(&self) -> &P {
        &self.inner.platform
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.inner.registry
    }

    pub fn site(&self) -> &SiteConfig {
        &self.inner.site
    }

    /// How long a navigation is held, at least, before it settles.
    pub fn min_load_duration(&self) -> Duration {
        self.inner.min_load_duration.get()
    }

    /// Navigates to `page_id` (`None` meaning the home page).
    ///
    /// The content area fades out, the route's markup is loaded and swapped
    /// in, page handlers run, metadata, title and history are updated, and the
    /// content fades back in. Fast navigations are held until the minimum load
    /// duration has passed. The overlay is hidden and the content area's
    /// pinned height released on every exit path.
    ///
    /// Never fails: unknown routes and load failures are rendered into the
    /// content area, and callback errors are logged. If another navigation
    /// starts before this one finishes, this one stops applying changes.
    pub async fn load_page_content<'a>(
        &self,
        page_id: impl Into<Option<&'a str>>,
        update_history: bool,
    ) {
        let page_id = page_id.into();
        let inner = &self.inner;
        let platform = &inner.platform;
        let started = platform.now();
        let generation = inner.begin_navigation();
        let state = inner.state.borrow().clone();
        let callbacks = &state.callbacks;

        let mut guard = NavigationGuard {
            inner: Rc::clone(inner),
            generation,
            hide_overlay: callbacks.hide_overlay.clone(),
            pinned: None,
        };

        run_callback("show_overlay callback", callbacks.show_overlay.as_ref());
        run_callback("close_drawer callback", callbacks.close_drawer.as_ref());

        let Some(content_area) = state.content_area.as_ref() else {
            crate::error!("Cannot navigate: {}", RouterError::NotInitialized);
            return;
        };

        let id = normalize_page_id(page_id);
        let Some(route) = inner.registry.get(&id) else {
            crate::warn!("No route registered for \"{id}\"");
            let result = LoadResult::not_found(page_id.unwrap_or(&id));
            platform.set_inner_html(content_area, result.html());
            // an abandoned navigation may have left the area faded out
            if platform.style_property(content_area, "opacity").is_some() {
                platform.set_style_property(content_area, "opacity", Some("1"));
            }
            self.update_document(
                state.headline.as_ref(),
                &id,
                None,
                result.title().unwrap_or(NOT_FOUND_TITLE),
                LoadStatus::NotFound,
            );
            return;
        };

        inner
            .transitions
            .fade_out(platform, Some(content_area), None)
            .await;
        if inner.superseded(generation, &id) {
            return;
        }

        guard.pin_height(content_area);

        let result = loader::fetch_page_markup(
            platform,
            &inner.registry,
            &id,
            state.initial_home_html.as_deref(),
        )
        .await;
        if let LoadResult::Error {
            error,
            source_title,
            ..
        } = &result
        {
            crate::error!("Failed to load page \"{source_title}\": {error}");
        }
        if inner.superseded(generation, &id) {
            return;
        }

        platform.set_inner_html(content_area, result.html());
        run_page_handlers(callbacks, &id, &result);

        let page_title = result
            .title()
            .or(route.title.as_deref())
            .unwrap_or(&inner.site.default_title)
            .to_string();
        self.update_document(
            state.headline.as_ref(),
            &id,
            Some(&route.meta),
            &page_title,
            result.status(),
        );
        history::push_state(platform, &id, &page_title, &id, update_history);
        platform.scroll_to_origin();
        highlight_active_link(platform, &id);

        inner
            .transitions
            .fade_in(platform, Some(content_area), None)
            .await;
        guard.release_height();

        if inner.superseded(generation, &id) {
            return;
        }
        let elapsed = platform.now() - started;
        let min_ms = self.min_load_duration().as_secs_f64() * 1000.0;
        if elapsed < min_ms {
            let remaining = ((min_ms - elapsed) * 1000.0).round() as u64;
            platform.sleep(Duration::from_micros(remaining)).await;
        }
    }

    fn update_document(
        &self,
        headline: Option<&P::Element>,
        id: &str,
        meta: Option<&RouteMeta>,
        page_title: &str,
        load_status: LoadStatus,
    ) {
        let inner = &self.inner;
        update_for_route(
            &inner.platform,
            &inner.site,
            meta,
            &MetaOptions {
                page_id: id,
                page_title,
                load_status,
            },
        );
        history::update_title(&inner.platform, &inner.site, headline, page_title);
    }
}

/// Injected handlers take precedence: the route's own ready hook only runs
/// when neither `on_home_load` nor a page handler applied.
fn run_page_handlers(callbacks: &RouterCallbacks, id: &str, result: &LoadResult) {
    let mut handled = false;
    if id == HOME {
        handled |= run_callback(
            "on_home_load callback",
            callbacks.on_home_load.as_ref(),
        );
    }
    if let Some(handler) = callbacks.page_handlers.get(id) {
        handled = true;
        if let Err(e) = handler(id) {
            crate::error!("page handler for \"{id}\" failed: {e}");
        }
    }
    if handled {
        return;
    }
    if let Some(hook) = result.on_ready() {
        if let Err(e) = hook(id) {
            crate::error!("ready hook for \"{id}\" failed: {e}");
        }
    }
}

/// Cleanup that must happen however a navigation ends, including when its
/// future is dropped part-way.
struct NavigationGuard<P: Platform> {
    inner: Rc<RouterInner<P>>,
    generation: u64,
    hide_overlay: Option<Callback>,
    pinned: Option<P::Element>,
}

impl<P: Platform> NavigationGuard<P> {
    /// Holds the content area at its current height while its content is
    /// replaced.
    fn pin_height(&mut self, el: &P::Element) {
        let platform = &self.inner.platform;
        let height = platform.offset_height(el);
        platform.set_style_property(
            el,
            "min-height",
            Some(&format!("{height}px")),
        );
        self.inner.pinned_by.set(Some(self.generation));
        self.pinned = Some(el.clone());
    }

    /// Releases the pin, unless a later navigation has re-pinned since.
    fn release_height(&mut self) {
        let Some(el) = self.pinned.take() else {
            return;
        };
        if self.inner.pinned_by.get() == Some(self.generation) {
            self.inner.platform.set_style_property(&el, "min-height", None);
            self.inner.pinned_by.set(None);
        }
    }
}

impl<P: Platform> Drop for NavigationGuard<P> {
    fn drop(&mut self) {
        self.release_height();
        // a newer navigation owns the overlay now
        if self.inner.is_current(self.generation) {
            run_callback("hide_overlay callback", self.hide_overlay.as_ref());
        }
    }
}
