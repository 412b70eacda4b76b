use crate::error::{CallbackError, RouterError};
use folio_meta::RouteMeta;
use indexmap::IndexMap;
use std::{fmt, rc::Rc};

/// Runs after a route's markup has been inserted. Receives the normalized
/// route id.
pub type ReadyHook = Rc<dyn Fn(&str) -> Result<(), CallbackError>>;

/// Strips one leading `#`. An empty id is returned as-is; mapping it to
/// `home` is [`normalize_page_id`](crate::normalize_page_id)'s job.
pub fn normalize_route_id(id: &str) -> &str {
    id.strip_prefix('#').unwrap_or(id)
}

/// A navigable page.
#[derive(Clone, Default)]
pub struct RouteDescriptor {
    pub id: String,
    /// Where the page's HTML fragment is fetched from. Routes without a path
    /// are rendered from markup the router already has.
    pub path: Option<String>,
    pub title: Option<String>,
    pub on_load: Option<ReadyHook>,
    pub meta: RouteMeta,
}

impl RouteDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn on_load<F, E>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> Result<(), E> + 'static,
        E: Into<CallbackError>,
    {
        self.on_load =
            Some(Rc::new(move |id: &str| hook(id).map_err(Into::into)));
        self
    }
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("title", &self.title)
            .field("on_load", &self.on_load.is_some())
            .field("meta", &self.meta)
            .finish()
    }
}

/// All routes known to the router, keyed by normalized id.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: IndexMap<String, RouteDescriptor>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every route in order; later duplicates overwrite earlier ones.
    pub fn from_routes(
        routes: impl IntoIterator<Item = RouteDescriptor>,
    ) -> Result<Self, RouterError> {
        let mut registry = Self::new();
        for route in routes {
            registry.register(route)?;
        }
        Ok(registry)
    }

    /// Adds a route, replacing (with a warning) any route with the same id.
    pub fn register(
        &mut self,
        mut route: RouteDescriptor,
    ) -> Result<&RouteDescriptor, RouterError> {
        let id = normalize_route_id(&route.id).to_string();
        if id.is_empty() {
            return Err(RouterError::EmptyRouteId(route.id));
        }
        route.id = id.clone();
        if self.routes.contains_key(&id) {
            crate::warn!("Route \"{id}\" is already registered; overwriting");
        }
        let (idx, _) = self.routes.insert_full(id, route);
        Ok(&self.routes[idx])
    }

    /// Looks a route up by id, with or without a leading `#`.
    pub fn get(&self, id: &str) -> Option<&RouteDescriptor> {
        self.routes.get(normalize_route_id(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.routes.contains_key(normalize_route_id(id))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn normalize_strips_one_hash() {
        assert_eq!(normalize_route_id("#projects"), "projects");
        assert_eq!(normalize_route_id("##projects"), "#projects");
        assert_eq!(normalize_route_id("projects"), "projects");
        assert_eq!(normalize_route_id(""), "");
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = RouteRegistry::new();
        registry
            .register(
                RouteDescriptor::new("#projects")
                    .path("pages/projects.html")
                    .title("Projects"),
            )
            .unwrap();

        let route = registry.get("projects").unwrap();
        assert_eq!(route.id, "projects");
        assert_eq!(route.path.as_deref(), Some("pages/projects.html"));
        assert!(registry.contains("#projects"));
        assert!(registry.get("resume").is_none());
        assert!(!registry.contains(""));
    }

    #[test]
    fn register_rejects_empty_ids() {
        let mut registry = RouteRegistry::new();
        assert_eq!(
            registry.register(RouteDescriptor::new("")).unwrap_err(),
            RouterError::EmptyRouteId(String::new())
        );
        assert_eq!(
            registry.register(RouteDescriptor::new("#")).unwrap_err(),
            RouterError::EmptyRouteId("#".into())
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn reregistration_overwrites() {
        let registry = RouteRegistry::from_routes([
            RouteDescriptor::new("blog").title("Blog"),
            RouteDescriptor::new("faq").title("FAQ"),
            RouteDescriptor::new("blog").title("Writing"),
        ])
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("blog").unwrap().title.as_deref(),
            Some("Writing")
        );
        let ids: Vec<_> = registry.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["blog", "faq"]);
    }

    #[test]
    fn on_load_hook_receives_id() {
        let seen = Rc::new(Cell::new(false));
        let route = RouteDescriptor::new("songs").on_load({
            let seen = Rc::clone(&seen);
            move |id: &str| -> Result<(), CallbackError> {
                seen.set(id == "songs");
                Ok(())
            }
        });
        (route.on_load.unwrap())("songs").unwrap();
        assert!(seen.get());
    }
}
