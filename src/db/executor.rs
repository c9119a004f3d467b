/// Graph query execution abstraction
///
/// The recommendation engine only ever needs one thing from the database: run a
/// parameterized Cypher statement and hand back its rows. Each row is a JSON
/// object with a single key (the query's result column), which keeps the
/// engine independent of the Bolt driver's value types.
use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::models::NodeId;

/// A single result row, keyed by result column name
pub type Row = Map<String, Value>;

/// Ordered result rows of one query
pub type Rows = Vec<Row>;

/// Errors raised by the graph collaborator
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    #[error("Graph connection error: {0}")]
    Connection(String),

    #[error("Graph query failed: {0}")]
    Execution(String),

    #[error("Malformed graph response: {0}")]
    Decode(String),
}

impl From<neo4rs::Error> for QueryError {
    fn from(err: neo4rs::Error) -> Self {
        QueryError::Execution(err.to_string())
    }
}

/// Scalar query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// Limits and counts. Values above `i64::MAX` saturate; callers bound limits
/// well below that before building a query.
impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

/// Node ids keep their stored type so `{id: $param}` patterns match
impl From<&NodeId> for ParamValue {
    fn from(id: &NodeId) -> Self {
        match id {
            NodeId::Number(number) => ParamValue::Integer(*number),
            NodeId::Text(text) => ParamValue::Text(text.clone()),
        }
    }
}

/// A named, parameterized Cypher statement
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQuery {
    /// Short name used in logs
    pub name: &'static str,
    pub text: &'static str,
    pub params: BTreeMap<String, ParamValue>,
    /// Result column copied into each returned row
    pub column: &'static str,
}

impl GraphQuery {
    pub fn new(name: &'static str, text: &'static str, column: &'static str) -> Self {
        Self {
            name,
            text,
            params: BTreeMap::new(),
            column,
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

/// Executes Cypher queries against a property graph
///
/// Implementations must acquire whatever connection they need for the call and
/// release it before returning, on success and on failure alike.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GraphExecutor: Send + Sync {
    /// Runs the query and collects every row
    async fn execute(&self, query: &GraphQuery) -> Result<Rows, QueryError>;

    /// Executor name for logging and debugging
    fn name(&self) -> &'static str;
}
