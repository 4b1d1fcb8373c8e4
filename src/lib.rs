//! Modular MVC routing and persistence engine.

pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod orm;
pub mod routing;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use http::{ActionResponse, HttpServer, Method, ResponseFormat};
pub use orm::{Model, Query, SqliteExecutor, StatementExecutor};
pub use routing::{
    Controller, ControllerRegistry, Module, RouteOptions, RouteRepository, Router,
};
