//! Module dispatch: resolving a matched route into a controller action.
//!
//! # Responsibilities
//! - Build the fully-qualified controller name for a matched route
//! - Instantiate the controller through the boot-time registry
//! - Invoke the routed action with captured parameters, positionally
//!
//! # Design Decisions
//! - Controllers register under `Modules.<Module>.Controller.<Name>`,
//!   preserving the engine's module addressing scheme
//! - A missing controller or action is fatal for the request, never
//!   retried
//! - The response envelope comes from the route's declaration-time
//!   format tag, not from inspecting the module name at dispatch time

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::http::response::{ActionResponse, ResponseFormat};
use crate::routing::matcher::MatchedRoute;

/// A dispatchable controller.
///
/// One implementation covers all actions of a controller; the
/// dispatcher asks `has_action` before invoking, so `call` only ever
/// sees action names the controller claimed.
pub trait Controller: Send + Sync {
    /// Whether the controller exposes the named action.
    fn has_action(&self, action: &str) -> bool;

    /// Invoke the named action with the captured route parameters in
    /// declaration order.
    fn call(&self, action: &str, parameters: &[String]) -> Result<ActionResponse>;
}

type Factory = Box<dyn Fn() -> Box<dyn Controller> + Send + Sync>;

/// Boot-time registry of controller factories, keyed by
/// fully-qualified name.
#[derive(Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, Factory>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The addressing scheme controllers are registered under.
    pub fn qualified_name(module: &str, controller: &str) -> String {
        format!("Modules.{module}.Controller.{controller}")
    }

    /// Register a controller factory for `module`.
    pub fn register<C, F>(&mut self, module: &str, controller: &str, factory: F)
    where
        C: Controller + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.factories.insert(
            Self::qualified_name(module, controller),
            Box::new(move || Box::new(factory())),
        );
    }

    /// Instantiate the controller registered under the given name.
    pub fn instantiate(&self, qualified: &str) -> Option<Box<dyn Controller>> {
        self.factories.get(qualified).map(|f| f())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// The resolved dispatch target for one request.
///
/// Created once per request from the matched route and immutable
/// afterwards; dropped when the request ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContext {
    pub module: String,
    pub controller: String,
    pub action: String,
    /// Captured dynamic segment values, in declaration order.
    pub parameters: Vec<String>,
    pub assets: Option<String>,
    pub format: ResponseFormat,
}

impl From<MatchedRoute> for ModuleContext {
    fn from(matched: MatchedRoute) -> Self {
        ModuleContext {
            module: matched.options.module,
            controller: matched.options.controller,
            action: matched.options.action,
            parameters: matched
                .parameters
                .into_iter()
                .map(|(_, value)| value)
                .collect(),
            assets: matched.options.assets,
            format: matched.options.format,
        }
    }
}

impl ModuleContext {
    /// Fully-qualified name of the target controller.
    pub fn qualified_controller(&self) -> String {
        ControllerRegistry::qualified_name(&self.module, &self.controller)
    }

    /// Resolve the controller and run the routed action.
    pub fn run(&self, registry: &ControllerRegistry) -> Result<ActionResponse> {
        let qualified = self.qualified_controller();

        let Some(instance) = registry.instantiate(&qualified) else {
            return Err(Error::ControllerNotFound(qualified));
        };

        if !instance.has_action(&self.action) {
            return Err(Error::UnknownAction {
                controller: qualified,
                action: self.action.clone(),
            });
        }

        instance.call(&self.action, &self.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::method::Method;
    use crate::routing::matcher::match_route;
    use crate::routing::repository::{RouteOptions, RouteRepository};
    use serde_json::json;

    struct UserController;

    impl Controller for UserController {
        fn has_action(&self, action: &str) -> bool {
            matches!(action, "show" | "index")
        }

        fn call(&self, action: &str, parameters: &[String]) -> Result<ActionResponse> {
            match action {
                "show" => Ok(ActionResponse::Json(json!({ "id": parameters[0] }))),
                "index" => Ok(ActionResponse::view("user list", "main")),
                _ => unreachable!("dispatcher checks has_action first"),
            }
        }
    }

    fn registry() -> ControllerRegistry {
        let mut registry = ControllerRegistry::new();
        registry.register("Frontend", "UserController", || UserController);
        registry
    }

    fn context(action: &str, parameters: Vec<String>) -> ModuleContext {
        ModuleContext {
            module: "Frontend".into(),
            controller: "UserController".into(),
            action: action.into(),
            parameters,
            assets: None,
            format: ResponseFormat::View,
        }
    }

    #[test]
    fn dispatches_action_with_positional_parameters() {
        let response = context("show", vec!["42".into()]).run(&registry()).unwrap();
        assert_eq!(response, ActionResponse::Json(json!({ "id": "42" })));
    }

    #[test]
    fn missing_controller_is_fatal() {
        let mut ctx = context("show", vec![]);
        ctx.controller = "GhostController".into();

        let err = ctx.run(&registry()).unwrap_err();
        assert!(matches!(err, Error::ControllerNotFound(name)
            if name == "Modules.Frontend.Controller.GhostController"));
    }

    #[test]
    fn unknown_action_is_fatal() {
        let err = context("missing", vec![]).run(&registry()).unwrap_err();
        assert!(matches!(err, Error::UnknownAction { .. }));
    }

    #[test]
    fn context_from_matched_route_keeps_parameter_order() {
        let mut repo = RouteRepository::new();
        repo.module("Frontend").get(
            "/users/(id:int)/(slug:any)",
            RouteOptions::new("UserController", "show"),
        );

        let matched = match_route(&repo, Method::Get, "/users/9/alice").unwrap();
        let ctx = ModuleContext::from(matched);
        assert_eq!(ctx.parameters, vec!["9".to_string(), "alice".to_string()]);
        assert_eq!(ctx.module, "Frontend");
    }
}
