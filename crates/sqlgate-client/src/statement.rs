//! Raw SQL statements and their parameter bindings.
//!
//! A [`Statement`] is an immutable pair of SQL text and parameter values,
//! opaque to the client beyond execution. Parameters are either positional
//! (`?1`, `?2`, ...) or named (`:name`, `@name`, `$name`); named parameters
//! may be supplied without their prefix and are normalized at bind time.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Parameter values bound to one statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Params {
    /// Values bound by position, in order.
    Positional(Vec<Value>),
    /// Values bound by parameter name.
    Named(Vec<(String, Value)>),
}

impl Params {
    /// Number of bound values.
    pub fn len(&self) -> usize {
        match self {
            Params::Positional(v) => v.len(),
            Params::Named(v) => v.len(),
        }
    }

    /// Whether no values are bound.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::Positional(Vec::new())
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Params::Positional(values)
    }
}

impl From<Vec<(String, Value)>> for Params {
    fn from(pairs: Vec<(String, Value)>) -> Self {
        Params::Named(pairs)
    }
}

impl From<Vec<(&str, Value)>> for Params {
    fn from(pairs: Vec<(&str, Value)>) -> Self {
        Params::Named(
            pairs
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }
}

/// One SQL statement plus its bound parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// The SQL text, passed to the engine verbatim.
    pub sql: String,
    /// The bound parameter values.
    pub params: Params,
}

impl Statement {
    /// A statement with no bound parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Params::default(),
        }
    }

    /// A statement with positional or named parameters.
    pub fn with_params(sql: impl Into<String>, params: impl Into<Params>) -> Self {
        Self {
            sql: sql.into(),
            params: params.into(),
        }
    }
}

impl From<&str> for Statement {
    fn from(sql: &str) -> Self {
        Statement::new(sql)
    }
}

impl From<String> for Statement {
    fn from(sql: String) -> Self {
        Statement::new(sql)
    }
}

impl From<(String, Vec<Value>)> for Statement {
    fn from((sql, params): (String, Vec<Value>)) -> Self {
        Statement::with_params(sql, params)
    }
}

impl From<(&str, Vec<Value>)> for Statement {
    fn from((sql, params): (&str, Vec<Value>)) -> Self {
        Statement::with_params(sql, params)
    }
}
