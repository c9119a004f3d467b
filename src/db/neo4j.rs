use neo4rs::{query, ConfigBuilder, Graph, Query};
use serde_json::Value;

use super::executor::{GraphExecutor, GraphQuery, ParamValue, QueryError, Row, Rows};
use crate::config::Config;

/// Neo4j-backed graph executor
///
/// Holds a Bolt connection pool. Every `execute` call borrows one connection,
/// drains the row stream and drops it before returning, which hands the
/// connection back to the pool on every exit path.
#[derive(Clone)]
pub struct Neo4jExecutor {
    graph: Graph,
}

impl Neo4jExecutor {
    /// Connects to Neo4j using the application configuration
    pub async fn connect(config: &Config) -> Result<Self, QueryError> {
        let mut builder = ConfigBuilder::default()
            .uri(config.neo4j_uri.as_str())
            .user(config.neo4j_username.as_str())
            .password(config.neo4j_password.as_str())
            .fetch_size(config.neo4j_fetch_size)
            .max_connections(config.neo4j_max_connections);

        if let Some(database) = &config.neo4j_database {
            builder = builder.db(database.as_str());
        }

        let neo_config = builder
            .build()
            .map_err(|e| QueryError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| QueryError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.neo4j_uri, "Connected to Neo4j");

        Ok(Self { graph })
    }

    fn to_bolt_query(graph_query: &GraphQuery) -> Query {
        graph_query
            .params
            .iter()
            .fold(query(graph_query.text), |q, (key, value)| match value {
                ParamValue::Text(text) => q.param(key, text.as_str()),
                ParamValue::Integer(number) => q.param(key, *number),
            })
    }
}

#[async_trait::async_trait]
impl GraphExecutor for Neo4jExecutor {
    async fn execute(&self, graph_query: &GraphQuery) -> Result<Rows, QueryError> {
        let mut stream = self
            .graph
            .execute(Self::to_bolt_query(graph_query))
            .await?;

        let mut rows = Rows::new();
        while let Some(row) = stream.next().await? {
            let value: Value = row.get(graph_query.column).map_err(|e| {
                QueryError::Decode(format!("column `{}`: {}", graph_query.column, e))
            })?;

            let mut mapped = Row::new();
            mapped.insert(graph_query.column.to_string(), value);
            rows.push(mapped);
        }

        tracing::debug!(query = graph_query.name, rows = rows.len(), "Graph query finished");

        Ok(rows)
    }

    fn name(&self) -> &'static str {
        "neo4j"
    }
}
