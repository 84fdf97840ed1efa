#[derive(Debug)]
/// An error that can occur when interacting with the client.
pub enum ClientError {
    /// An error that occurred when making a request.
    ReqwestError(reqwest::Error),
    /// An error that occurred when deserializing a response.
    DeserializationError(serde_json::Error),
    /// The server returned an error.
    ApiError {
        /// The HTTP status code of the response.
        status: u16,
        /// The error message, if the server provided one.
        message: Option<String>,
    },
}
impl ClientError {
    /// Whether the error indicates that the backend itself is unreachable,
    /// as opposed to a single request going wrong.
    pub fn is_connection_error(&self) -> bool {
        match self {
            ClientError::ReqwestError(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::ReqwestError(e) => write!(f, "Reqwest error: {e}"),
            ClientError::DeserializationError(e) => write!(f, "Deserialization error: {e}"),
            ClientError::ApiError { status, message } => {
                write!(f, "API error: {status}")?;
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
        }
    }
}
impl std::error::Error for ClientError {}
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::ReqwestError(e)
    }
}
impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::DeserializationError(e)
    }
}
/// A result type for the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// A client for an Invidious-compatible API.
pub struct Client {
    pub(crate) base_url: String,
    pub(crate) client: reqwest::Client,
}
impl Client {
    /// Create a new client against the given instance base URL
    /// (e.g. `https://invidious.example.org`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// The instance base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
