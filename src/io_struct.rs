use serde::Deserialize;
use serde_json::Value;

use crate::errors::GatewayError;
use crate::registry::StepRegistry;

/// Output content types the gateway can negotiate, in preference order;
/// the first entry is the default when the caller states no preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Xml,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Json, OutputFormat::Xml];

    pub fn mime(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Xml => "application/xml",
        }
    }

    /// Negotiates the output format from an `Accept` header value. A
    /// missing header or `*/*` means no preference; anything else must
    /// match a supported type exactly.
    pub fn from_accept(accept: Option<&str>) -> Result<Self, GatewayError> {
        match accept {
            None | Some("*/*") => Ok(Self::ALL[0]),
            Some(value) => Self::ALL
                .into_iter()
                .find(|format| format.mime() == value)
                .ok_or_else(|| {
                    GatewayError::invalid(format!(
                        "unknown accept header {}, please specify one of: {}",
                        value,
                        Self::supported()
                    ))
                }),
        }
    }

    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(|format| format.mime())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Raw `/opener/` request body. Unknown fields are collected and ignored.
#[derive(Debug, Deserialize)]
pub struct OpenerReqInput {
    pub text: Option<String>,
    pub steps: Option<Vec<String>>,

    #[serde(flatten)]
    pub other: Value,
}

/// A validated request: non-empty payload, non-empty ordered step list,
/// negotiated output format. Lives for one request only.
#[derive(Debug)]
pub struct PipelineRequest {
    pub text: String,
    pub steps: Vec<String>,
    pub format: OutputFormat,
}

/// Validates the inbound body and `Accept` header into a
/// [`PipelineRequest`]. No outbound call is made on any failure path.
pub fn parse_request(
    input: OpenerReqInput,
    accept: Option<&str>,
    registry: &StepRegistry,
) -> Result<PipelineRequest, GatewayError> {
    let text = match input.text {
        Some(text) if !text.is_empty() => text,
        _ => {
            return Err(GatewayError::invalid(
                "no input defined to process, please specify \"text\" request property",
            ));
        }
    };

    let steps = match input.steps {
        Some(steps) if !steps.is_empty() => steps,
        _ => {
            return Err(GatewayError::invalid(format!(
                "no steps specified for nlp processing, please specify \
                 at least one step, all steps are: {}",
                registry.step_names().join(", ")
            )));
        }
    };

    let format = OutputFormat::from_accept(accept)?;

    Ok(PipelineRequest {
        text,
        steps,
        format,
    })
}
