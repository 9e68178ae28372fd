//! Geocoder error types.

/// Errors from the Nominatim client.
///
/// An address that matches nothing is not an error; see
/// [`GeocodeOutcome::NotFound`](super::GeocodeOutcome::NotFound).
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoder error {status}: {body}")]
    RemoteApi { status: u16, body: String },

    /// The response parsed as JSON but a result could not be interpreted
    #[error("malformed geocoder response: {0}")]
    MalformedResponse(String),

    #[error("address must not be blank")]
    BlankAddress,
}
