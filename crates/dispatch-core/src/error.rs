//! Error types for the voice dispatch console

use std::{error::Error as StdError, fmt};

/// Main error type for the console
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Client-side validation error; no request was issued
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// The backend answered with a failure status or a failure envelope
    Api {
        /// HTTP status code of the response
        status: u16,
        /// Failure text supplied by the backend, if any
        detail: Option<String>,
    },

    /// The request never produced a response (connect, DNS, TLS, ...)
    Transport(String),

    /// Serialization error
    Serialization(serde_json::Error),

    /// Not found error
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// Real-time session could not be established
    Session(String),

    /// The service started a call but returned no session credentials
    SessionNotGranted {
        /// Call record the service created, if it reported one
        call_id: Option<String>,
    },

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an API error
    pub fn api(status: u16, detail: Option<String>) -> Self {
        Self::Api { status, detail }
    }

    /// Failure text the backend supplied, if this error carries one
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => Some(detail),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::Api {
                status,
                detail: Some(detail),
            } => write!(f, "API returned error {status}: {detail}"),
            Self::Api {
                status,
                detail: None,
            } => write!(f, "API returned error: {status}"),
            Self::Transport(msg) => write!(f, "Request failed: {msg}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::NotFound { resource } => write!(f, "Resource not found: {resource}"),
            Self::Session(msg) => write!(f, "Real-time session error: {msg}"),
            Self::SessionNotGranted { .. } => {
                write!(f, "Call started but no session token was returned")
            }
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_error_display() {
        let error = Error::validation("name", "Configuration name is required");

        assert_eq!(
            format!("{}", error),
            "Validation error: name - Configuration name is required"
        );
    }

    #[test]
    fn test_api_error_display_with_and_without_detail() {
        let error = Error::api(404, Some("Agent config not found".to_string()));
        assert_eq!(
            error.to_string(),
            "API returned error 404: Agent config not found"
        );

        let error = Error::api(500, None);
        assert_eq!(error.to_string(), "API returned error: 500");
    }

    #[test]
    fn test_detail_only_for_api_errors_with_text() {
        assert_eq!(
            Error::api(400, Some("bad phone".to_string())).detail(),
            Some("bad phone")
        );
        assert_eq!(Error::api(400, Some(String::new())).detail(), None);
        assert_eq!(Error::api(502, None).detail(), None);
        assert_eq!(Error::Transport("refused".to_string()).detail(), None);
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{oops}").unwrap_err();
        let error = Error::from(json_error);

        assert!(matches!(error, Error::Serialization(_)));
        assert!(error.source().is_some());
        assert!(error.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_source_is_none_for_message_errors() {
        let errors = vec![
            Error::Configuration {
                message: "test".to_string(),
            },
            Error::Transport("test".to_string()),
            Error::Session("test".to_string()),
            Error::SessionNotGranted { call_id: None },
            Error::Other("test".to_string()),
        ];

        for error in errors {
            assert!(error.source().is_none(), "{error:?}");
        }
    }
}
