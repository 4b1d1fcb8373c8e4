//! Scalar values, result rows, and named bind maps.
//!
//! # Responsibilities
//! - Carry column values between the builder, executor, and models
//! - Accumulate named bind parameters with collision detection
//!
//! # Design Decisions
//! - The engine owns its own scalar type so the builder core stays
//!   executor-agnostic; the SQLite adapter converts at the boundary
//! - Binding the same parameter name twice in one statement is an
//!   error, never a silent overwrite

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// A scalar column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Blob(Vec<u8>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Integer(i) => (*i).into(),
            Value::Real(r) => serde_json::json!(r),
            Value::Text(s) => s.clone().into(),
            Value::Bool(b) => (*b).into(),
            Value::Blob(b) => serde_json::json!(b),
        }
    }
}

/// One fetched database row: column name to value, column order not
/// preserved.
pub type Row = BTreeMap<String, Value>;

/// Named bind parameters for one statement.
///
/// Names are stored without the `:` sigil; the executor adds it when
/// talking to the driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindMap {
    binds: BTreeMap<String, Value>,
}

impl BindMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`; rebinding an existing name is a
    /// [`Error::BindCollision`].
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> Result<()> {
        let name = name.into();
        if self.binds.contains_key(&name) {
            return Err(Error::BindCollision(name));
        }
        self.binds.insert(name, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.binds.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.binds.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.binds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }
}
