pub mod executor;
pub mod neo4j;

pub use executor::{GraphExecutor, GraphQuery, ParamValue, QueryError, Row, Rows};
pub use neo4j::Neo4jExecutor;

#[cfg(test)]
pub use executor::MockGraphExecutor;
