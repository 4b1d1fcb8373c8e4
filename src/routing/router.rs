//! The frozen route table and dispatch entry point.
//!
//! # Responsibilities
//! - Own the declared routes and controller registry after boot
//! - Resolve (method, path) to a request-scoped [`ModuleContext`]
//! - Drive dispatch end to end for HTTP and CLI entry points
//!
//! # Design Decisions
//! - Built once at startup, immutable at runtime; shared via `Arc`
//!   with no locks
//! - Resolution is deterministic: the same method and path always
//!   produce the same dispatch target
//! - A miss is an explicit `RouteNotFound`, never a silent default

use crate::error::{Error, Result};
use crate::http::method::Method;
use crate::http::response::ActionResponse;
use crate::routing::dispatcher::{ControllerRegistry, ModuleContext};
use crate::routing::matcher::match_route;
use crate::routing::repository::{ModuleRoutes, RouteRepository};

/// A self-contained engine module.
///
/// At boot each module declares its routes through a scoped declarer
/// and registers the controllers those routes dispatch to.
pub trait Module {
    /// Module name routes and controllers are registered under.
    fn name(&self) -> &'static str;

    /// Declare this module's routes.
    fn routes(&self, routes: &mut ModuleRoutes<'_>);

    /// Register this module's controller factories.
    fn controllers(&self, registry: &mut ControllerRegistry);
}

/// Outcome of a full dispatch: the resolved context plus the action's
/// response, ready for envelope rendering.
#[derive(Debug)]
pub struct Dispatched {
    pub context: ModuleContext,
    pub response: ActionResponse,
}

/// Immutable routing engine, frozen from boot-time declarations.
pub struct Router {
    repository: RouteRepository,
    registry: ControllerRegistry,
}

impl Router {
    /// Freeze the boot-time declarations into an immutable router.
    pub fn freeze(repository: RouteRepository, registry: ControllerRegistry) -> Self {
        tracing::info!(
            routes = repository.len(),
            controllers = registry.len(),
            "route table frozen"
        );
        Self {
            repository,
            registry,
        }
    }

    /// Collect every module's declarations and freeze the result.
    pub fn from_modules(modules: &[&dyn Module]) -> Self {
        let mut repository = RouteRepository::new();
        let mut registry = ControllerRegistry::new();

        for module in modules {
            module.routes(&mut repository.module(module.name()));
            module.controllers(&mut registry);
        }

        Self::freeze(repository, registry)
    }

    /// Resolve a request to its dispatch target without running it.
    pub fn resolve(&self, method: Method, path: &str) -> Result<ModuleContext> {
        match match_route(&self.repository, method, path) {
            Some(matched) => Ok(ModuleContext::from(matched)),
            None => Err(Error::RouteNotFound {
                method: method.to_string(),
                path: path.to_string(),
            }),
        }
    }

    /// Resolve and run the controller action for a request.
    pub fn dispatch(&self, method: Method, path: &str) -> Result<Dispatched> {
        let context = self.resolve(method, path)?;

        tracing::debug!(
            module = %context.module,
            controller = %context.controller,
            action = %context.action,
            parameters = context.parameters.len(),
            "dispatching"
        );

        let response = context.run(&self.registry)?;
        Ok(Dispatched { context, response })
    }

    /// Dispatch a console invocation against the CLI route method.
    pub fn dispatch_cli(&self, path: &str) -> Result<Dispatched> {
        self.dispatch(Method::Cli, path)
    }

    /// The frozen route table (read-only).
    pub fn repository(&self) -> &RouteRepository {
        &self.repository
    }
}
