//! Lightweight ORM: fluent query building over a statement executor.
//!
//! # Data Flow
//! ```text
//! Query (fluent clause accumulation)
//!     → builder.rs (typed per-kind statement assembly)
//!     → (SQL text, named BindMap)
//!     → executor.rs (StatementExecutor collaborator)
//!     → rows → model.rs (attribute-bag hydration)
//! ```
//!
//! # Design Decisions
//! - The builder owns no connection; executors are injected
//! - Statement kinds are typed so clause conflicts fail loudly
//! - Bind names are namespaced by clause role; collisions are errors

pub mod builder;
pub mod executor;
pub mod model;
pub mod query;
pub mod value;

pub use builder::Direction;
pub use executor::{SqliteExecutor, StatementExecutor};
pub use model::Model;
pub use query::{Query, QueryMethod};
pub use value::{BindMap, Row, Value};
