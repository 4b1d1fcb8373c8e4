//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path)
//!     → segment.rs (split live path into segments)
//!     → matcher.rs (rewrite stored patterns, exact comparison)
//!     → dispatcher.rs (controller lookup, action invocation)
//!     → Return: ActionResponse or explicit error
//!
//! Route declaration (at boot):
//!     module routes + controller registrations
//!     → RouteRepository (normalized, last write wins)
//!     → Router::freeze (immutable table, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Routes declared at boot, immutable at runtime
//! - Matching is pure; captured parameters live in a request-scoped
//!   MatchedRoute, never in the shared table
//! - Deterministic: same input always resolves the same target

pub mod dispatcher;
pub mod matcher;
pub mod repository;
pub mod router;
pub mod segment;

pub use dispatcher::{Controller, ControllerRegistry, ModuleContext};
pub use matcher::MatchedRoute;
pub use repository::{ModuleRoutes, RouteOptions, RouteRepository};
pub use router::{Module, Router};
