//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (axum catch-all handler, middleware)
//!     → method.rs (engine method taxonomy)
//!     → routing subsystem (match + dispatch)
//!     → response.rs (envelope rendering per route format)
//! ```
//!
//! # Design Decisions
//! - The engine owns routing; axum carries transport, timeouts, and
//!   request correlation only
//! - Response shape is decided by the route's declared format, never
//!   by inspecting names at request time

pub mod method;
pub mod request;
pub mod response;
pub mod server;

pub use method::Method;
pub use response::{ActionResponse, ResponseFormat};
pub use server::HttpServer;
