use std::collections::BTreeMap;

use crate::errors::GatewayError;

const KEY_PREFIX: &str = "OPENER_";
const KEY_SUFFIX: &str = "_URL";

/// Step appended to JSON pipelines when the caller did not request it.
pub const CONVERSION_STEP: &str = "KAF2JSON";

/// Immutable step-name -> backend-URL catalogue, built once at startup.
///
/// Steps come from environment variables of the form `OPENER_<STEP>_URL`;
/// names are folded to uppercase so lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct StepRegistry {
    urls: BTreeMap<String, String>,
}

impl StepRegistry {
    pub fn from_env() -> Self {
        Self::from_pairs(std::env::vars())
    }

    /// Builds the registry from raw `(key, value)` pairs, keeping only
    /// keys shaped like `OPENER_<STEP>_URL`.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let urls = pairs
            .into_iter()
            .filter_map(|(key, url)| {
                let step = key
                    .strip_prefix(KEY_PREFIX)?
                    .strip_suffix(KEY_SUFFIX)?
                    .to_uppercase();
                (!step.is_empty()).then_some((step, url))
            })
            .collect();
        StepRegistry { urls }
    }

    pub fn resolve(&self, step: &str) -> Result<&str, GatewayError> {
        self.urls
            .get(&step.to_uppercase())
            .map(String::as_str)
            .ok_or_else(|| {
                GatewayError::invalid(format!(
                    "unknown step {}, all steps are: {}",
                    step,
                    self.step_names().join(", ")
                ))
            })
    }

    /// The configured kaf2json endpoint, required for JSON output.
    pub fn conversion_url(&self) -> Result<&str, GatewayError> {
        self.urls
            .get(CONVERSION_STEP)
            .map(String::as_str)
            .ok_or_else(|| {
                GatewayError::invalid(format!(
                    "application/json requested but {}{}{} is not set",
                    KEY_PREFIX, CONVERSION_STEP, KEY_SUFFIX
                ))
            })
    }

    /// All configured step names, sorted, as shown in error messages and
    /// the status endpoint.
    pub fn step_names(&self) -> Vec<&str> {
        self.urls.keys().map(String::as_str).collect()
    }

    /// The raw configuration view: `OPENER_<STEP>_URL` -> backend URL.
    pub fn url_map(&self) -> BTreeMap<String, &str> {
        self.urls
            .iter()
            .map(|(step, url)| {
                (
                    format!("{}{}{}", KEY_PREFIX, step, KEY_SUFFIX),
                    url.as_str(),
                )
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
