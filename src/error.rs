//! Engine-wide error taxonomy.
//!
//! Every failure in the dispatch and query paths is terminal for the
//! current request: there is no retry policy anywhere in the engine.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors surfaced by the routing, dispatch, and query subsystems.
#[derive(Debug, Error)]
pub enum Error {
    /// No stored route matched the request method and path.
    #[error("no route matches {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// Empty or unrecognized HTTP method string.
    #[error("unsupported HTTP method: {0:?}")]
    InvalidHttpMethod(String),

    /// The dispatch target controller was never registered.
    #[error("controller {0} not found")]
    ControllerNotFound(String),

    /// The controller exists but does not expose the routed action.
    #[error("controller {controller} has no action {action}")]
    UnknownAction { controller: String, action: String },

    /// `run()` was called with a method outside the recognized set.
    #[error("invalid query method: {0}")]
    InvalidQueryMethod(String),

    /// Clause state that does not belong to the requested statement kind.
    #[error("{kind} statement cannot carry {clause} clauses")]
    ConflictingClauses {
        kind: &'static str,
        clause: &'static str,
    },

    /// A writing statement was built with no column/value pairs.
    #[error("{0} statement requires at least one column")]
    EmptyStatement(&'static str),

    /// ORDER BY direction outside `asc`/`desc`.
    #[error("invalid order direction: {0:?}")]
    InvalidOrderDirection(String),

    /// The same bind parameter name was produced twice in one statement.
    #[error("bind parameter :{0} bound twice in one statement")]
    BindCollision(String),

    /// Failure reported by the statement executor.
    #[error("statement execution failed: {0}")]
    Executor(String),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status the front end answers with when this error reaches it.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidHttpMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            Error::UnknownAction { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Executor(e.to_string())
    }
}
