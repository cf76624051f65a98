//! Error types for the API client.

use crate::types::ApiResponse;

/// Errors that can surface from [`Client::send`](crate::Client::send) and
/// [`classify`](crate::classify).
///
/// Transport failures are not represented here: `send` turns them into a
/// failure-shaped value of the caller's result type instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The server answered 400 or 404 with a result envelope. `payload` is
    /// that envelope, forced to `isSuccess: false` / `statusCode: 400`, after
    /// a trip through the caller's result type.
    #[error("Request rejected with status {status}: {payload}")]
    ClientFailure { status: u16, payload: String },
    /// The server answered a non-success status with a body that is not a
    /// result envelope. `payload` is the body re-serialized through the
    /// caller's result type.
    #[error("Unrecognized error response with status {status}: {payload}")]
    UnrecognizedBody { status: u16, payload: String },
    /// A response body could not be read as the caller's result type.
    /// `send` converts this into a failure-shaped result; only `classify`
    /// and `to_failure_result` return it directly.
    #[error("Failed to deserialize response: {0}")]
    Deserialize(#[source] serde_json::Error),
    /// Serializing a failure value failed. Not recoverable.
    #[error("Failed to serialize failure payload: {0}")]
    Serialization(#[source] serde_json::Error),
    /// The configured base URL is not an absolute URL.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client")]
    Build(#[from] reqwest::Error),
}

impl Error {
    /// The serialized failure carried by the two raising branches.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::ClientFailure { payload, .. } | Self::UnrecognizedBody { payload, .. } => {
                Some(payload)
            }
            _ => None,
        }
    }

    /// Parses the carried payload back into a result envelope, when it is one.
    pub fn envelope(&self) -> Option<ApiResponse> {
        self.payload()
            .and_then(|payload| serde_json::from_str(payload).ok())
    }

    /// Error messages from the carried envelope, or this error's own text.
    pub fn messages(&self) -> Vec<String> {
        match self.envelope() {
            Some(envelope) if !envelope.error_messages.is_empty() => envelope.error_messages,
            _ => vec![self.to_string()],
        }
    }
}
