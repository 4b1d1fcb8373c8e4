//! In-memory route storage.
//!
//! # Responsibilities
//! - Store route options keyed by (method, normalized URI)
//! - Exact-match retrieval, removal, and full iteration
//! - Module-scoped declaration helpers used at boot
//!
//! # Design Decisions
//! - Last write wins on duplicate keys; declaring twice is not an error
//! - URIs are normalized at store time so lookups never depend on
//!   leading or trailing slashes
//! - The repository is only mutated during boot; `Router::freeze`
//!   takes ownership and nothing mutates the table afterwards

use std::collections::BTreeMap;

use crate::http::method::Method;
use crate::http::response::ResponseFormat;
use crate::routing::segment;

/// Dispatch options declared for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOptions {
    /// Owning module name (e.g. `"Frontend"`).
    pub module: String,
    /// Controller short name (e.g. `"FrontendController"`).
    pub controller: String,
    /// Action method name on the controller.
    pub action: String,
    /// Optional permission/assets tag.
    pub assets: Option<String>,
    /// Response envelope, fixed at declaration time.
    pub format: ResponseFormat,
}

impl RouteOptions {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            module: String::new(),
            controller: controller.into(),
            action: action.into(),
            assets: None,
            format: ResponseFormat::View,
        }
    }

    pub fn assets(mut self, assets: impl Into<String>) -> Self {
        self.assets = Some(assets.into());
        self
    }

    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }
}

/// Mapping from (method, URI pattern) to route options.
#[derive(Debug, Default, Clone)]
pub struct RouteRepository {
    routes: BTreeMap<Method, BTreeMap<String, RouteOptions>>,
}

impl RouteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the route stored under (method, uri).
    pub fn store(&mut self, method: Method, uri: &str, options: RouteOptions) {
        self.routes
            .entry(method)
            .or_default()
            .insert(segment::normalize(uri), options);
    }

    /// Delete the entry; silently does nothing when absent.
    pub fn remove(&mut self, method: Method, uri: &str) {
        if let Some(routes) = self.routes.get_mut(&method) {
            routes.remove(&segment::normalize(uri));
        }
    }

    /// Exact-match lookup by (method, uri).
    pub fn retrieve(&self, method: Method, uri: &str) -> Option<&RouteOptions> {
        self.routes.get(&method)?.get(&segment::normalize(uri))
    }

    /// The full stored mapping, for iteration by the matcher.
    pub fn stored(&self) -> impl Iterator<Item = (Method, &str, &RouteOptions)> {
        self.routes.iter().flat_map(|(method, routes)| {
            routes
                .iter()
                .map(move |(uri, options)| (*method, uri.as_str(), options))
        })
    }

    /// Total number of declared routes.
    pub fn len(&self) -> usize {
        self.routes.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Begin declaring routes for a module; the returned declarer
    /// stamps the module name into every stored option set.
    pub fn module(&mut self, name: impl Into<String>) -> ModuleRoutes<'_> {
        ModuleRoutes {
            repository: self,
            module: name.into(),
        }
    }
}

/// Route declarer scoped to one module, the engine's equivalent of a
/// module's route-declaration file.
pub struct ModuleRoutes<'a> {
    repository: &'a mut RouteRepository,
    module: String,
}

impl ModuleRoutes<'_> {
    /// Declare a route for this module.
    pub fn route(&mut self, method: Method, uri: &str, mut options: RouteOptions) -> &mut Self {
        options.module = self.module.clone();
        self.repository.store(method, uri, options);
        self
    }

    /// Declare a route answering with the JSON envelope.
    pub fn api(&mut self, method: Method, uri: &str, options: RouteOptions) -> &mut Self {
        self.route(method, uri, options.format(ResponseFormat::ApiJson))
    }

    pub fn get(&mut self, uri: &str, options: RouteOptions) -> &mut Self {
        self.route(Method::Get, uri, options)
    }

    pub fn post(&mut self, uri: &str, options: RouteOptions) -> &mut Self {
        self.route(Method::Post, uri, options)
    }
}
