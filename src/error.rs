//! Error types for the Play Music client.

use serde::Deserialize;
use thiserror::Error;

/// Main error type for all client operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No auth token was supplied to the builder.
    #[error("auth token is required; obtain one through the login flow first")]
    MissingToken,

    /// HTTP request failed.
    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O failure raised by a custom transport.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header value contains characters HTTP does not allow.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),

    /// The default TLS profile could not be assembled.
    #[error("TLS setup failed: {0}")]
    Tls(String),

    /// The service answered with an error status.
    #[error("Remote error (HTTP {status}): {error}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Parsed server error body.
        error: ServerError,
    },

    /// Building the client failed. Bootstrap never partially succeeds.
    #[error("Initialization failed while {stage}: {source}")]
    Initialization {
        /// Bootstrap step that failed.
        stage: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<ApiError>,
    },

    /// A streaming signature could not be derived.
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The account has no Android device to stream with.
    #[error("No Android device registered to this account")]
    NoAndroidDevice,

    /// A successful call was expected to carry a body but did not.
    #[error("Response with status {status} carried no usable body")]
    EmptyBody {
        /// HTTP status code.
        status: u16,
    },

    /// The streaming endpoint did not answer with a `Location` header.
    #[error("Response with status {status} carried no Location header")]
    MissingRedirect {
        /// HTTP status code.
        status: u16,
    },

    /// A config was built without one of its required fields.
    #[error("Config is missing {0}")]
    IncompleteConfig(&'static str),
}

impl ApiError {
    /// Wrap an error raised during a bootstrap step.
    pub(crate) fn initialization(stage: &'static str, source: ApiError) -> Self {
        ApiError::Initialization {
            stage,
            source: Box::new(source),
        }
    }

    /// HTTP status of a remote failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            ApiError::Initialization { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Failure to derive a `{salt, signature}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// The catalog item carries no seed (store ID).
    #[error("catalog item has no signing seed")]
    MissingSeed,

    /// The seed contains characters the service never issues.
    #[error("malformed signing seed: {0:?}")]
    MalformedSeed(String),
}

/// Error body returned by the service.
///
/// Decoded from the `{"error": {"code", "message", "errors": [...]}}`
/// envelope. Bodies that do not match keep their raw text in `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerError {
    /// Error code from the body, if any.
    pub code: Option<u16>,
    /// Human readable message.
    pub message: String,
    /// Detailed reasons.
    pub errors: Vec<ServerErrorDetail>,
}

/// One entry of the `errors` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerErrorDetail {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ServerErrorDetail>,
}

impl ServerError {
    /// Parse a raw error body.
    pub fn parse(body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorEnvelope>(body) {
            Ok(envelope) => Self {
                code: envelope.error.code,
                message: envelope.error.message,
                errors: envelope.error.errors,
            },
            Err(_) => Self {
                code: None,
                message: String::from_utf8_lossy(body).trim().to_string(),
                errors: Vec::new(),
            },
        }
    }

    /// First `reason` reported by the server.
    pub fn reason(&self) -> Option<&str> {
        self.errors.first().map(|e| e.reason.as_str())
    }
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason() {
            Some(reason) if !reason.is_empty() => write!(f, "{} ({})", self.message, reason),
            _ => f.write_str(&self.message),
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;
