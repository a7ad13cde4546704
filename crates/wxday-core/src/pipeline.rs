use anyhow::Result;
use serde_json::Value;

use crate::ForecastOutput;

/// Supplies decoded forecast payloads, one batch per call
#[async_trait::async_trait]
pub trait PayloadSource: Send + Sync {
    async fn next_payload(&mut self) -> Result<Value>;
}

/// Receives the engine's output for presentation
#[async_trait::async_trait]
pub trait OutputSink: Send + Sync {
    async fn emit(&mut self, output: &ForecastOutput) -> Result<()>;
}
