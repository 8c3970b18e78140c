use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("SSL Error: {0}. Check verify_ssl setting.")]
    Tls(String),

    #[error("Cannot reach {backend} host: {host}")]
    Connect { backend: &'static str, host: String },

    #[error("Request timed out")]
    Timeout,

    #[error("{backend} API failed: {source}")]
    Request {
        backend: &'static str,
        source: reqwest::Error,
    },

    #[error("{backend} API failed: {status} - {body}")]
    Status {
        backend: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{backend} API returned an unreadable body: {message}")]
    Decode {
        backend: &'static str,
        message: String,
    },

    /// Logical failure reported inside a successful HTTP response.
    #[error("{backend} API Error: {message}")]
    Remote {
        backend: &'static str,
        message: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown command '{command}'. Valid: {}", .valid.join(", "))]
    UnknownCommand { command: String, valid: Vec<String> },

    #[error("{command} requires a '{field}' argument")]
    MissingArgument { command: String, field: &'static str },

    #[error("{command} requires a non-empty '{field}' string")]
    BlankArgument { command: String, field: &'static str },

    #[error("{command}: '{field}' {reason}")]
    InvalidArgument {
        command: String,
        field: &'static str,
        reason: String,
    },

    #[error("Service '{service}' not allowed. Valid: {}", .allowed.join(", "))]
    ServiceNotAllowed {
        service: String,
        allowed: Vec<&'static str>,
    },
}

impl Error {
    /// Raised locally before any request leaves the process.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownCommand { .. }
                | Self::MissingArgument { .. }
                | Self::BlankArgument { .. }
                | Self::InvalidArgument { .. }
                | Self::ServiceNotAllowed { .. }
        )
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Tls(_)
                | Self::Connect { .. }
                | Self::Timeout
                | Self::Request { .. }
                | Self::Status { .. }
                | Self::Decode { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
