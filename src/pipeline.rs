use std::time::Instant;

use crate::client_pool::ClientPool;
use crate::errors::GatewayError;
use crate::io_struct::OutputFormat;
use crate::registry::{CONVERSION_STEP, StepRegistry};

/// Ordered endpoint URLs for one request, immutable once built.
#[derive(Debug, PartialEq, Eq)]
pub struct ResolvedPipeline {
    endpoints: Vec<String>,
}

impl ResolvedPipeline {
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }
}

/// Resolves the requested steps to endpoint URLs, in request order.
///
/// Every backend emits the native annotation format; JSON output needs
/// one extra conversion hop. That hop is injected here, explicitly: when
/// the caller asked for JSON and the last requested step is not already
/// the conversion step, the configured kaf2json endpoint is appended.
/// A step list already ending in kaf2json is left untouched.
pub fn build_pipeline(
    registry: &StepRegistry,
    steps: &[String],
    format: OutputFormat,
) -> Result<ResolvedPipeline, GatewayError> {
    let mut endpoints = steps
        .iter()
        .map(|step| registry.resolve(step).map(str::to_owned))
        .collect::<Result<Vec<_>, _>>()?;

    let ends_in_conversion = steps
        .last()
        .is_some_and(|step| step.eq_ignore_ascii_case(CONVERSION_STEP));
    if format == OutputFormat::Json && !ends_in_conversion {
        endpoints.push(registry.conversion_url()?.to_owned());
    }

    Ok(ResolvedPipeline { endpoints })
}

/// Runs the pipeline strictly in order, feeding each step's response
/// body to the next step. A single failed call aborts the whole run; no
/// later step is attempted and nothing of the partial output survives.
pub async fn run_pipeline(
    pool: &ClientPool,
    pipeline: &ResolvedPipeline,
    mut text: String,
) -> Result<String, GatewayError> {
    for endpoint in pipeline.endpoints() {
        log::info!("calling {}", endpoint);
        let started = Instant::now();
        text = call_step(pool, endpoint, text).await?;
        log::info!(
            "done calling {} in {:.3}s",
            endpoint,
            started.elapsed().as_secs_f64()
        );
    }
    Ok(text)
}

/// One backend call: a form-encoded POST with the single `input` field,
/// returning the response body on 2xx.
async fn call_step(
    pool: &ClientPool,
    endpoint: &str,
    input: String,
) -> Result<String, GatewayError> {
    let client = pool.acquire(endpoint)?;
    let response = client
        .post(endpoint)
        .form(&[("input", input.as_str())])
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| GatewayError::upstream(endpoint, e))?;
    response
        .text()
        .await
        .map_err(|e| GatewayError::upstream(endpoint, e))
}
