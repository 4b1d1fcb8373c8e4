//! The fluent query facade.
//!
//! # Responsibilities
//! - Accumulate clause state through chainable calls
//! - Validate the clause mix, then delegate to the typed statement
//!   builders and run the result through the executor
//! - Hydrate fetched rows into model attribute bags
//!
//! # Design Decisions
//! - A `Query` is single-use: terminal calls consume it
//! - The query method is validated before anything else, so an
//!   invalid method never reaches the executor
//! - Clause state foreign to the requested statement kind is an
//!   explicit error, never a silently malformed statement

use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::orm::builder::{
    DeleteStatement, DescribeStatement, Direction, InsertStatement, OrderClause, SelectStatement,
    UpdateStatement, WhereClause,
};
use crate::orm::executor::StatementExecutor;
use crate::orm::model::Model;
use crate::orm::value::{Row, Value};

/// The five recognized query methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMethod {
    Create,
    Read,
    Update,
    Delete,
    Describe,
}

impl FromStr for QueryMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(QueryMethod::Create),
            "read" => Ok(QueryMethod::Read),
            "update" => Ok(QueryMethod::Update),
            "delete" => Ok(QueryMethod::Delete),
            "describe" => Ok(QueryMethod::Describe),
            _ => Err(Error::InvalidQueryMethod(s.to_string())),
        }
    }
}

impl QueryMethod {
    fn kind(&self) -> &'static str {
        match self {
            QueryMethod::Create => "insert",
            QueryMethod::Read => "select",
            QueryMethod::Update => "update",
            QueryMethod::Delete => "delete",
            QueryMethod::Describe => "describe",
        }
    }
}

/// Fluent query bound to one table and an optional model-identity tag.
pub struct Query {
    executor: Arc<dyn StatementExecutor>,
    table: String,
    model: Option<String>,
    select: Vec<String>,
    wheres: Vec<WhereClause>,
    orders: Vec<OrderClause>,
    insert: Vec<(String, Value)>,
    update: Vec<(String, Value)>,
    limit: Option<(u64, u64)>,
}

impl Query {
    /// Start a query on `table` with no model tag.
    pub fn table(executor: Arc<dyn StatementExecutor>, table: impl Into<String>) -> Self {
        Self {
            executor,
            table: table.into(),
            model: None,
            select: Vec::new(),
            wheres: Vec::new(),
            orders: Vec::new(),
            insert: Vec::new(),
            update: Vec::new(),
            limit: None,
        }
    }

    /// Start a query whose fetched rows hydrate into the named model.
    pub fn for_model(
        executor: Arc<dyn StatementExecutor>,
        table: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let mut query = Self::table(executor, table);
        query.model = Some(model.into());
        query
    }

    /// Add columns to the SELECT clause.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add a WHERE condition; conditions are ANDed. An empty operator
    /// defaults to `=`.
    pub fn filter(
        mut self,
        column: impl Into<String>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.wheres
            .push(WhereClause::new(column, operator, value.into()));
        self
    }

    /// Add an ORDER BY term.
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.orders.push(OrderClause {
            column: column.into(),
            direction,
        });
        self
    }

    /// Merge column/value pairs into the INSERT clause.
    pub fn insert<I, S>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        self.insert
            .extend(data.into_iter().map(|(c, v)| (c.into(), v)));
        self
    }

    /// Merge column/value pairs into the UPDATE clause.
    pub fn update<I, S>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        self.update
            .extend(data.into_iter().map(|(c, v)| (c.into(), v)));
        self
    }

    /// Fetch window as (offset, count).
    pub fn limit(mut self, offset: u64, count: u64) -> Self {
        self.limit = Some((offset, count));
        self
    }

    /// Run the query in the given mode and return the fetched rows.
    ///
    /// The method string is validated first; an unknown method fails
    /// without touching the executor.
    pub fn run(&self, method: &str) -> Result<Vec<Row>> {
        let method = QueryMethod::from_str(method)?;
        self.reject_foreign_clauses(method)?;

        let (sql, binds) = match method {
            QueryMethod::Read => SelectStatement {
                table: &self.table,
                columns: &self.select,
                wheres: &self.wheres,
                orders: &self.orders,
                limit: self.limit,
            }
            .build()?,
            QueryMethod::Create => InsertStatement {
                table: &self.table,
                values: &self.insert,
            }
            .build()?,
            QueryMethod::Update => UpdateStatement {
                table: &self.table,
                sets: &self.update,
                wheres: &self.wheres,
            }
            .build()?,
            QueryMethod::Delete => DeleteStatement {
                table: &self.table,
                wheres: &self.wheres,
            }
            .build()?,
            QueryMethod::Describe => DescribeStatement { table: &self.table }.build()?,
        };

        tracing::trace!(sql = %sql, binds = binds.len(), "executing statement");
        self.executor.execute(&sql, &binds)
    }

    fn reject_foreign_clauses(&self, method: QueryMethod) -> Result<()> {
        let conflict = |clause: &'static str| {
            Err(Error::ConflictingClauses {
                kind: method.kind(),
                clause,
            })
        };

        match method {
            QueryMethod::Read => {
                if !self.insert.is_empty() {
                    return conflict("insert");
                }
                if !self.update.is_empty() {
                    return conflict("update");
                }
            }
            QueryMethod::Create => {
                if !self.select.is_empty() {
                    return conflict("select");
                }
                if !self.wheres.is_empty() {
                    return conflict("where");
                }
                if !self.orders.is_empty() {
                    return conflict("order by");
                }
                if !self.update.is_empty() {
                    return conflict("update");
                }
                if self.limit.is_some() {
                    return conflict("limit");
                }
            }
            QueryMethod::Update => {
                if !self.select.is_empty() {
                    return conflict("select");
                }
                if !self.insert.is_empty() {
                    return conflict("insert");
                }
                if !self.orders.is_empty() {
                    return conflict("order by");
                }
                if self.limit.is_some() {
                    return conflict("limit");
                }
            }
            QueryMethod::Delete => {
                if !self.select.is_empty() {
                    return conflict("select");
                }
                if !self.insert.is_empty() {
                    return conflict("insert");
                }
                if !self.update.is_empty() {
                    return conflict("update");
                }
                if !self.orders.is_empty() {
                    return conflict("order by");
                }
                if self.limit.is_some() {
                    return conflict("limit");
                }
            }
            QueryMethod::Describe => {
                if !self.select.is_empty()
                    || !self.wheres.is_empty()
                    || !self.orders.is_empty()
                    || !self.insert.is_empty()
                    || !self.update.is_empty()
                    || self.limit.is_some()
                {
                    return conflict("any");
                }
            }
        }
        Ok(())
    }

    /// Run in read mode and hydrate every row into a model.
    pub fn all(self) -> Result<Vec<Model>> {
        let identity = self.model.clone().unwrap_or_else(|| self.table.clone());
        let table = self.table.clone();
        let rows = self.run("read")?;
        Ok(rows
            .into_iter()
            .map(|row| Model::from_row(&identity, &table, row))
            .collect())
    }

    /// Run in read mode and return the raw rows, unhydrated.
    pub fn rows(self) -> Result<Vec<Row>> {
        self.run("read")
    }

    /// Run in read mode and hydrate the first row; `None` when the
    /// result set is empty.
    pub fn first(self) -> Result<Option<Model>> {
        let identity = self.model.clone().unwrap_or_else(|| self.table.clone());
        let table = self.table.clone();
        let mut rows = self.run("read")?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(Model::from_row(&identity, &table, rows.remove(0))))
    }

    /// Merge attributes into the INSERT clause and run create.
    pub fn create<I, S>(mut self, attributes: I) -> Result<bool>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        self.insert
            .extend(attributes.into_iter().map(|(c, v)| (c.into(), v)));
        self.run("create")?;
        Ok(true)
    }

    /// Merge attributes into the UPDATE clause and run update.
    pub fn edit<I, S>(mut self, attributes: I) -> Result<bool>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        self.update
            .extend(attributes.into_iter().map(|(c, v)| (c.into(), v)));
        self.run("update")?;
        Ok(true)
    }

    /// Column metadata for the bound table.
    pub fn describe(self) -> Result<Vec<Row>> {
        self.run("describe")
    }

    /// Row id of the most recent INSERT on this query's executor.
    pub fn last_insert_id(&self) -> i64 {
        self.executor.last_insert_id()
    }
}
