//! HTTP method taxonomy.
//!
//! # Responsibilities
//! - Define the methods the engine routes on (including CLI)
//! - Reject empty or unrecognized method strings at request start
//!
//! # Design Decisions
//! - CLI is a first-class method so console entry points share the
//!   same route table as HTTP requests
//! - An unknown method is a hard failure, not a fallthrough

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Request methods recognized by the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    /// Console invocation of the engine.
    Cli,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Cli,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Cli => "CLI",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "CLI" => Ok(Method::Cli),
            _ => Err(Error::InvalidHttpMethod(s.to_string())),
        }
    }
}

impl TryFrom<&axum::http::Method> for Method {
    type Error = Error;

    fn try_from(m: &axum::http::Method) -> Result<Self, Self::Error> {
        m.as_str().parse()
    }
}
