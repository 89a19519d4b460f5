use async_trait::async_trait;

use crate::error::Result;

/// A unit of work invocable by name with JSON arguments.
#[async_trait]
pub trait Task: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, args: serde_json::Value) -> Result<serde_json::Value>;
}
