//! Attribute-bag models.
//!
//! Hydration is deliberately schema-free: a model is a named bag of
//! column values populated from a fetched row, with a few accessors
//! and a `save` that routes to insert or update.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::Result;
use crate::orm::executor::StatementExecutor;
use crate::orm::query::Query;
use crate::orm::value::{Row, Value};

/// A hydrated record: model identity plus its column attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    table: String,
    guarded: Vec<String>,
    attributes: BTreeMap<String, Value>,
}

impl Model {
    /// Fresh model for `table`, with the table name as its identity.
    pub fn new(table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            name: table.clone(),
            table,
            guarded: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Hydrate a model from a fetched row.
    pub fn from_row(name: &str, table: &str, row: Row) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            guarded: Vec::new(),
            attributes: row,
        }
    }

    /// Mark attributes that `save` must never write back.
    pub fn guard<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.guarded.extend(attributes.into_iter().map(Into::into));
        self
    }

    /// Model identity tag.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// All attributes of the model.
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub fn get_attribute(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    pub fn set_attribute(&mut self, attribute: impl Into<String>, value: Value) {
        self.attributes.insert(attribute.into(), value);
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// Attributes as a JSON object, for API-enveloped responses.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.attributes
                .iter()
                .map(|(name, value)| (name.clone(), serde_json::Value::from(value)))
                .collect(),
        )
    }

    /// Persist the model: update when an `id` attribute exists, insert
    /// otherwise (backfilling `id` from the executor).
    ///
    /// Guarded attributes are stripped from the written set; when that
    /// leaves nothing to write, `save` is a no-op returning `false`.
    pub fn save(&mut self, executor: Arc<dyn StatementExecutor>) -> Result<bool> {
        let written: Vec<(String, Value)> = self
            .attributes
            .iter()
            .filter(|(name, _)| !self.guarded.contains(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        if let Some(id) = self.attributes.get("id").cloned() {
            let written: Vec<(String, Value)> = written
                .into_iter()
                .filter(|(name, _)| name != "id")
                .collect();
            if written.is_empty() {
                return Ok(false);
            }
            Query::table(executor, &self.table)
                .filter("id", "=", id)
                .edit(written)
        } else {
            if written.is_empty() {
                return Ok(false);
            }
            let saved = Query::table(executor.clone(), &self.table).create(written)?;
            if saved {
                self.set_attribute("id", Value::Integer(executor.last_insert_id()));
            }
            Ok(saved)
        }
    }
}
