//! Transit API error types.

/// Errors from the OneBusAway HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status, either on the HTTP
    /// response or inside the response envelope.
    #[error("remote API error {status}: {body}")]
    RemoteApi { status: u16, body: String },

    /// A success response whose body is not JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// JSON that does not have the shape the endpoint promises
    #[error("malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },
}

impl TransitError {
    /// HTTP-like status of a remote failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransitError::RemoteApi { status, .. } => Some(*status),
            TransitError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub(crate) fn malformed(endpoint: &str, message: impl Into<String>) -> Self {
        TransitError::MalformedResponse {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }
}
