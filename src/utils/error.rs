use thiserror::Error;

#[derive(Error, Debug)]
pub enum FacadeError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with {status} {reason}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Response decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl FacadeError {
    /// HTTP status of the failed exchange, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FacadeError::Status { status, .. } => Some(*status),
            FacadeError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Reason phrase for status failures, otherwise the error text.
    pub fn status_text(&self) -> String {
        match self {
            FacadeError::Status { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }

    /// Raw response body returned alongside a non-success status.
    pub fn response_body(&self) -> &str {
        match self {
            FacadeError::Status { body, .. } => body,
            _ => "",
        }
    }
}

pub type Result<T> = std::result::Result<T, FacadeError>;
