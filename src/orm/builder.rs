//! Typed statement builders.
//!
//! # Responsibilities
//! - Assemble parameterized SQL text from clause state, one builder
//!   per statement kind
//! - Produce the named bind map alongside the SQL
//!
//! # Design Decisions
//! - Each kind only models the clauses it can legally carry, so a
//!   malformed clause mix is unrepresentable here; the fluent facade
//!   rejects foreign clauses before constructing a builder
//! - WHERE values bind as `:<column>`; UPDATE `SET` values bind as
//!   `:set_<column>` so the two roles can never collide
//! - ORDER BY directions are typed; caller strings are parsed, never
//!   spliced into SQL verbatim

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::orm::value::{BindMap, Value};

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(Error::InvalidOrderDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One WHERE condition; conditions are ANDed, no OR or grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub column: String,
    pub operator: String,
    pub value: Value,
}

impl WhereClause {
    /// An empty operator defaults to `=`.
    pub fn new(column: impl Into<String>, operator: &str, value: Value) -> Self {
        let operator = if operator.is_empty() { "=" } else { operator };
        Self {
            column: column.into(),
            operator: operator.to_string(),
            value,
        }
    }
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub column: String,
    pub direction: Direction,
}

fn where_fragment(wheres: &[WhereClause], binds: &mut BindMap) -> Result<String> {
    if wheres.is_empty() {
        return Ok(String::new());
    }

    let mut conditions = Vec::with_capacity(wheres.len());
    for clause in wheres {
        binds.bind(clause.column.clone(), clause.value.clone())?;
        conditions.push(format!(
            "{} {} :{}",
            clause.column, clause.operator, clause.column
        ));
    }
    Ok(format!(" WHERE {}", conditions.join(" AND ")))
}

fn order_fragment(orders: &[OrderClause]) -> String {
    if orders.is_empty() {
        return String::new();
    }
    let terms: Vec<String> = orders
        .iter()
        .map(|o| format!("{} {}", o.column, o.direction.as_sql()))
        .collect();
    format!(" ORDER BY {}", terms.join(", "))
}

/// `SELECT` builder: columns, filters, ordering, limit.
#[derive(Debug)]
pub struct SelectStatement<'a> {
    pub table: &'a str,
    pub columns: &'a [String],
    pub wheres: &'a [WhereClause],
    pub orders: &'a [OrderClause],
    /// (offset, count)
    pub limit: Option<(u64, u64)>,
}

impl SelectStatement<'_> {
    pub fn build(&self) -> Result<(String, BindMap)> {
        let mut binds = BindMap::new();

        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };

        let mut sql = format!("SELECT {} FROM {}", columns, self.table);
        sql.push_str(&where_fragment(self.wheres, &mut binds)?);
        sql.push_str(&order_fragment(self.orders));

        if let Some((offset, count)) = self.limit {
            sql.push_str(&format!(" LIMIT {count} OFFSET {offset}"));
        }

        Ok((sql, binds))
    }
}

/// `INSERT` builder: column/value pairs in declaration order.
#[derive(Debug)]
pub struct InsertStatement<'a> {
    pub table: &'a str,
    pub values: &'a [(String, Value)],
}

impl InsertStatement<'_> {
    pub fn build(&self) -> Result<(String, BindMap)> {
        if self.values.is_empty() {
            return Err(Error::EmptyStatement("insert"));
        }

        let mut binds = BindMap::new();
        let mut columns = Vec::with_capacity(self.values.len());
        let mut placeholders = Vec::with_capacity(self.values.len());

        for (column, value) in self.values {
            binds.bind(column.clone(), value.clone())?;
            columns.push(column.as_str());
            placeholders.push(format!(":{column}"));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        );
        Ok((sql, binds))
    }
}

/// `UPDATE` builder: SET pairs plus WHERE conditions.
#[derive(Debug)]
pub struct UpdateStatement<'a> {
    pub table: &'a str,
    pub sets: &'a [(String, Value)],
    pub wheres: &'a [WhereClause],
}

impl UpdateStatement<'_> {
    pub fn build(&self) -> Result<(String, BindMap)> {
        if self.sets.is_empty() {
            return Err(Error::EmptyStatement("update"));
        }

        let mut binds = BindMap::new();
        let mut assignments = Vec::with_capacity(self.sets.len());

        for (column, value) in self.sets {
            let bind_name = format!("set_{column}");
            binds.bind(bind_name.clone(), value.clone())?;
            assignments.push(format!("{column} = :{bind_name}"));
        }

        let mut sql = format!("UPDATE {} SET {}", self.table, assignments.join(", "));
        sql.push_str(&where_fragment(self.wheres, &mut binds)?);
        Ok((sql, binds))
    }
}

/// `DELETE` builder: WHERE conditions only.
#[derive(Debug)]
pub struct DeleteStatement<'a> {
    pub table: &'a str,
    pub wheres: &'a [WhereClause],
}

impl DeleteStatement<'_> {
    pub fn build(&self) -> Result<(String, BindMap)> {
        let mut binds = BindMap::new();
        let mut sql = format!("DELETE FROM {}", self.table);
        sql.push_str(&where_fragment(self.wheres, &mut binds)?);
        Ok((sql, binds))
    }
}

/// Column-metadata builder (SQLite dialect).
#[derive(Debug)]
pub struct DescribeStatement<'a> {
    pub table: &'a str,
}

impl DescribeStatement<'_> {
    pub fn build(&self) -> Result<(String, BindMap)> {
        Ok((format!("PRAGMA table_info({})", self.table), BindMap::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheres(clauses: &[(&str, &str, Value)]) -> Vec<WhereClause> {
        clauses
            .iter()
            .map(|(c, o, v)| WhereClause::new(*c, o, v.clone()))
            .collect()
    }

    #[test]
    fn select_with_all_clauses() {
        let columns = vec!["id".to_string(), "name".to_string()];
        let wheres = wheres(&[("id", "=", Value::Integer(5))]);
        let orders = vec![OrderClause {
            column: "id".into(),
            direction: Direction::Asc,
        }];

        let (sql, binds) = SelectStatement {
            table: "users",
            columns: &columns,
            wheres: &wheres,
            orders: &orders,
            limit: Some((0, 10)),
        }
        .build()
        .unwrap();

        assert_eq!(
            sql,
            "SELECT id, name FROM users WHERE id = :id ORDER BY id ASC LIMIT 10 OFFSET 0"
        );
        assert_eq!(binds.get("id"), Some(&Value::Integer(5)));
    }

    #[test]
    fn select_without_columns_is_star() {
        let (sql, _) = SelectStatement {
            table: "users",
            columns: &[],
            wheres: &[],
            orders: &[],
            limit: None,
        }
        .build()
        .unwrap();
        assert_eq!(sql, "SELECT * FROM users");
    }

    #[test]
    fn empty_operator_defaults_to_equals() {
        let clause = WhereClause::new("id", "", Value::Integer(1));
        assert_eq!(clause.operator, "=");
    }

    #[test]
    fn repeated_where_column_is_a_collision() {
        let wheres = wheres(&[
            ("id", ">", Value::Integer(1)),
            ("id", "<", Value::Integer(9)),
        ]);
        let err = SelectStatement {
            table: "users",
            columns: &[],
            wheres: &wheres,
            orders: &[],
            limit: None,
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::BindCollision(name) if name == "id"));
    }

    #[test]
    fn insert_binds_every_column() {
        let values = vec![
            ("name".to_string(), Value::Text("a".into())),
            ("email".to_string(), Value::Text("a@b".into())),
        ];
        let (sql, binds) = InsertStatement {
            table: "users",
            values: &values,
        }
        .build()
        .unwrap();

        assert_eq!(
            sql,
            "INSERT INTO users (name, email) VALUES (:name, :email)"
        );
        assert_eq!(binds.len(), 2);
    }

    #[test]
    fn update_namespaces_set_binds() {
        let sets = vec![("name".to_string(), Value::Text("new".into()))];
        let wheres = wheres(&[("name", "=", Value::Text("old".into()))]);

        let (sql, binds) = UpdateStatement {
            table: "users",
            sets: &sets,
            wheres: &wheres,
        }
        .build()
        .unwrap();

        // A SET column sharing its name with a WHERE column must not
        // collide in the bind map.
        assert_eq!(sql, "UPDATE users SET name = :set_name WHERE name = :name");
        assert_eq!(binds.get("set_name"), Some(&Value::Text("new".into())));
        assert_eq!(binds.get("name"), Some(&Value::Text("old".into())));
    }

    #[test]
    fn delete_with_filter() {
        let wheres = wheres(&[("id", "=", Value::Integer(3))]);
        let (sql, _) = DeleteStatement {
            table: "users",
            wheres: &wheres,
        }
        .build()
        .unwrap();
        assert_eq!(sql, "DELETE FROM users WHERE id = :id");
    }

    #[test]
    fn writing_statements_reject_an_empty_column_set() {
        let err = InsertStatement {
            table: "users",
            values: &[],
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::EmptyStatement("insert")));

        let wheres = wheres(&[("id", "=", Value::Integer(1))]);
        let err = UpdateStatement {
            table: "users",
            sets: &[],
            wheres: &wheres,
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::EmptyStatement("update")));
    }

    #[test]
    fn direction_parse_rejects_arbitrary_strings() {
        assert_eq!("ASC".parse::<Direction>().unwrap(), Direction::Asc);
        assert_eq!("desc".parse::<Direction>().unwrap(), Direction::Desc);
        assert!("asc; DROP TABLE users".parse::<Direction>().is_err());
    }
}
