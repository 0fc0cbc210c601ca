use std::time::Duration;

use crate::client_pool::ClientPool;
use crate::errors::GatewayError;
use crate::io_struct::PipelineRequest;
use crate::pipeline::{build_pipeline, run_pipeline};
use crate::registry::StepRegistry;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub log_level: String,
    /// Per-call timeout for backend requests, in seconds.
    pub timeout: u64,
}

/// Process-wide state shared by all request handlers: the immutable step
/// catalogue and the per-authority client pool.
#[derive(Debug)]
pub struct GatewayState {
    pub registry: StepRegistry,
    pub pool: ClientPool,
}

impl GatewayState {
    pub fn new(registry: StepRegistry, timeout: Duration) -> Self {
        GatewayState {
            registry,
            pool: ClientPool::new(timeout),
        }
    }

    /// Drives one validated request through build and execution.
    pub async fn process(&self, request: PipelineRequest) -> Result<String, GatewayError> {
        let pipeline = build_pipeline(&self.registry, &request.steps, request.format)?;
        run_pipeline(&self.pool, &pipeline, request.text).await
    }
}
