use actix_web::{HttpResponse, ResponseError, http::StatusCode};

/// Request-handling errors, split along the caller/backend fault line.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The caller's input cannot be turned into a runnable pipeline.
    #[error("{0}")]
    InvalidRequest(String),

    /// A backend step call failed; the pipeline is aborted.
    #[error("unable to call {endpoint}: {cause}")]
    Upstream { endpoint: String, cause: String },
}

impl GatewayError {
    pub fn invalid(message: impl Into<String>) -> Self {
        GatewayError::InvalidRequest(message.into())
    }

    pub fn upstream(endpoint: &str, cause: impl std::fmt::Display) -> Self {
        GatewayError::Upstream {
            endpoint: endpoint.to_string(),
            cause: cause.to_string(),
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_maps_to_400() {
        let err = GatewayError::invalid("missing text");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "missing text");
    }

    #[test]
    fn upstream_maps_to_500_and_names_the_endpoint() {
        let err = GatewayError::upstream("http://a/tok", "connection refused");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "unable to call http://a/tok: connection refused"
        );
    }
}
