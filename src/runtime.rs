//! Interface to the container runtime collaborator.
//!
//! Only the boundary lives here: no runtime client ships with this crate.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("no such container: {name}")]
    NotFound { name: String },

    #[error("container runtime unavailable: {0}")]
    Transport(String),
}

/// Short listing entry for one container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerSummary {
    pub id: String,
    pub name: String,
    pub status: String,
    pub image: Vec<String>,
    pub short_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub log: Vec<Value>,
}

#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// running containers, or every container when `all` is set
    async fn list(&self, all: bool) -> Result<Vec<ContainerSummary>, RuntimeError>;

    /// one-shot resource usage statistics
    async fn stats(&self, name: &str) -> Result<Value, RuntimeError>;

    /// full inspection attributes
    async fn inspect(&self, name: &str) -> Result<Value, RuntimeError>;

    /// last `tail` log lines
    async fn logs(&self, name: &str, tail: usize) -> Result<String, RuntimeError>;

    async fn health(&self, name: &str) -> Result<HealthReport, RuntimeError> {
        let attrs = self.inspect(name).await?;
        Ok(health_from_inspect(&attrs))
    }
}

/// Healthcheck state from inspection attributes. Containers without a
/// healthcheck report status `none` and an empty log.
pub fn health_from_inspect(attrs: &Value) -> HealthReport {
    let health = attrs.pointer("/State/Health");
    let status = health
        .and_then(|h| h.get("Status"))
        .and_then(Value::as_str)
        .unwrap_or("none")
        .to_string();
    let log = health
        .and_then(|h| h.get("Log"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    HealthReport { status, log }
}
