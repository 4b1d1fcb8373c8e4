//! Statement execution.
//!
//! # Responsibilities
//! - Define the executor contract the query builder runs against
//! - Provide the SQLite implementation used by the engine
//!
//! # Design Decisions
//! - The builder never owns connection lifecycle; it only hands SQL
//!   plus binds to whatever executor it was constructed with
//! - One connection behind a mutex: at most one in-flight statement
//!   per connection
//! - Statements that return no columns are executed, not queried, so
//!   INSERT/UPDATE/DELETE run through the same entry point as SELECT

use std::sync::{Arc, Mutex};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, ToSql};

use crate::error::{Error, Result};
use crate::orm::value::{BindMap, Row, Value};

/// Executes bound SQL and returns rows.
pub trait StatementExecutor: Send + Sync {
    /// Run `sql` with the given named binds, returning fetched rows
    /// (empty for statements that produce none).
    fn execute(&self, sql: &str, binds: &BindMap) -> Result<Vec<Row>>;

    /// Row id produced by the most recent INSERT on this executor.
    fn last_insert_id(&self) -> i64;
}

/// SQLite-backed executor over a shared connection.
pub struct SqliteExecutor {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteExecutor {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Direct access for schema setup and migrations.
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        use rusqlite::types::ToSqlOutput;
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Owned(rusqlite::types::Value::Real(*r)),
            Value::Text(s) => ToSqlOutput::Owned(rusqlite::types::Value::Text(s.clone())),
            Value::Bool(b) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*b as i64)),
            Value::Blob(b) => ToSqlOutput::Owned(rusqlite::types::Value::Blob(b.clone())),
        })
    }
}

fn value_from_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

impl StatementExecutor for SqliteExecutor {
    fn execute(&self, sql: &str, binds: &BindMap) -> Result<Vec<Row>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| Error::Executor("connection mutex poisoned".into()))?;

        let mut stmt = conn.prepare(sql)?;

        let named: Vec<(String, &Value)> = binds
            .iter()
            .map(|(name, value)| (format!(":{name}"), value))
            .collect();
        let params: Vec<(&str, &dyn ToSql)> = named
            .iter()
            .map(|(name, value)| (name.as_str(), *value as &dyn ToSql))
            .collect();

        if stmt.column_count() == 0 {
            stmt.execute(params.as_slice())?;
            return Ok(Vec::new());
        }

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut fetched = Vec::new();
        let mut rows = stmt.query(params.as_slice())?;
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (index, column) in columns.iter().enumerate() {
                record.insert(column.clone(), value_from_ref(row.get_ref(index)?));
            }
            fetched.push(record);
        }
        Ok(fetched)
    }

    fn last_insert_id(&self) -> i64 {
        self.conn
            .lock()
            .map(|conn| conn.last_insert_rowid())
            .unwrap_or(0)
    }
}
