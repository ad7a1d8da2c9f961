/// Errors from the remote backend (tables, storage, auth).
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Remote API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A filtered single-row operation matched nothing.
    #[error("No row matched in {table}")]
    NotFound { table: String },

    /// The access token was rejected.
    #[error("Session rejected by remote service")]
    Unauthorized,

    /// The response body did not have the expected shape.
    #[error("Unexpected response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RemoteError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RemoteError::Unauthorized)
    }
}
