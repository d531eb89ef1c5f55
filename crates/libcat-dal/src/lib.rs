pub mod author;
pub mod book;
pub mod error;

use std::fmt::Display;

pub use error::Error;
pub use sqlx::Error as SqlxError;
use sqlx::sqlite::SqlitePoolOptions;

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type ChosenRow = sqlx::sqlite::SqliteRow;
pub type Pool = sqlx::Pool<ChosenDB>;

pub async fn new_pool(database_url: &str) -> Result<Pool, Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(50)
        .connect(database_url)
        .await?;
    Ok(pool)
}

#[derive(Debug, Clone)]
pub enum Order {
    Asc(String),
    Desc(String),
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::Asc(s) => write!(f, "{}", s),
            Order::Desc(s) => write!(f, "{} DESC", s),
        }
    }
}

impl AsRef<str> for Order {
    fn as_ref(&self) -> &str {
        match self {
            Order::Asc(s) => s.as_str(),
            Order::Desc(s) => s.as_str(),
        }
    }
}

impl Order {
    pub fn clause(&self, valid_fields: &[&str]) -> Result<String> {
        if valid_fields.contains(&self.as_ref()) {
            Ok(self.to_string())
        } else {
            Err(Error::InvalidOrderByField(self.as_ref().to_string()))
        }
    }
}

/// Per-field filter predicate, either exact match or presence check.
#[derive(Debug, Clone)]
pub enum FilterValue {
    Equals(String),
    Exists(bool),
}

/// Conjunction of per-field predicates; empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    fields: Vec<(String, FilterValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .push((field.into(), FilterValue::Equals(value.into())));
        self
    }

    pub fn exists(mut self, field: impl Into<String>, present: bool) -> Self {
        self.fields
            .push((field.into(), FilterValue::Exists(present)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn where_clause(&self, valid_fields: &[&str]) -> Result<(String, Vec<&str>)> {
        let mut conditions = Vec::new();
        let mut binds = Vec::new();
        for (field, value) in &self.fields {
            if !valid_fields.contains(&field.as_str()) {
                return Err(Error::InvalidFilterField(field.clone()));
            }
            match value {
                FilterValue::Equals(v) => {
                    conditions.push(format!("{field} = ?"));
                    binds.push(v.as_str());
                }
                FilterValue::Exists(true) => conditions.push(format!("{field} IS NOT NULL")),
                FilterValue::Exists(false) => conditions.push(format!("{field} IS NULL")),
            }
        }
        let sql = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        Ok((sql, binds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_clause_validates_field() {
        let order = Order::Desc("family_name".to_string());
        assert_eq!(
            order.clause(&["family_name", "first_name"]).unwrap(),
            "family_name DESC"
        );

        let bogus = Order::Asc("family_name; DROP TABLE author".to_string());
        assert!(matches!(
            bogus.clause(&["family_name", "first_name"]),
            Err(Error::InvalidOrderByField(_))
        ));
    }

    #[test]
    fn filter_where_clause() {
        let filter = Filter::new()
            .equals("first_name", "Jane")
            .exists("date_of_death", true);
        let (sql, binds) = filter
            .where_clause(&["first_name", "date_of_death"])
            .unwrap();
        assert_eq!(sql, " WHERE first_name = ? AND date_of_death IS NOT NULL");
        assert_eq!(binds, vec!["Jane"]);

        let empty = Filter::new();
        let (sql, binds) = empty.where_clause(&[]).unwrap();
        assert!(sql.is_empty());
        assert!(binds.is_empty());
    }

    #[test]
    fn filter_rejects_unknown_field() {
        let filter = Filter::new().equals("password", "x");
        assert!(matches!(
            filter.where_clause(&["first_name"]),
            Err(Error::InvalidFilterField(_))
        ));
    }
}
