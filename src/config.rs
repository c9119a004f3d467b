use serde::Deserialize;

use crate::services::{recommendations::DEFAULT_LIMIT, ScoringMode};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Neo4j Bolt URI
    #[serde(default = "default_neo4j_uri")]
    pub neo4j_uri: String,

    /// Neo4j user name
    #[serde(default = "default_neo4j_username")]
    pub neo4j_username: String,

    /// Neo4j password
    pub neo4j_password: String,

    /// Target database; the server default is used when unset
    #[serde(default)]
    pub neo4j_database: Option<String>,

    /// Rows fetched per Bolt round trip
    #[serde(default = "default_neo4j_fetch_size")]
    pub neo4j_fetch_size: usize,

    /// Size of the Bolt connection pool
    #[serde(default = "default_neo4j_max_connections")]
    pub neo4j_max_connections: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Where ranking happens: inside the Cypher query or in this process
    #[serde(default)]
    pub scoring_mode: ScoringMode,

    /// Recommendation count used when a request gives no limit
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Largest limit a request may ask for
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

fn default_neo4j_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_neo4j_username() -> String {
    "neo4j".to_string()
}

fn default_neo4j_fetch_size() -> usize {
    200
}

fn default_neo4j_max_connections() -> usize {
    16
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_max_limit() -> usize {
    100
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
