//! Client error type
//!
//! Every failed call is eventually shown to the user as a single line;
//! `ClientError::user_message` produces it.

use condo_core::AdminError;
use serde_json::Value;
use thiserror::Error;

/// Message used when the server gives no usable explanation
pub const GENERIC_MESSAGE: &str = "Error";

/// Errors that can occur when talking to the backend
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        /// `detail`, else `error`, else the generic message
        message: String,
    },

    /// The server rejected the session token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to deserialize the response body
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The client was configured with an unusable value
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Build an error from a failed response's status and parsed body
    pub fn from_response(status: u16, body: Option<&Value>) -> Self {
        let message = server_message(body);
        if status == 401 {
            Self::Unauthorized(message)
        } else {
            Self::Api { status, message }
        }
    }

    /// Whether this is a 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Whether the session was rejected
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// The flat message shown in the page error banner
    ///
    /// Only the server's own explanation is surfaced; transport failures
    /// read the same as any other unexplained error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Unauthorized(message) => message.clone(),
            Self::Request(_) | Self::Parse(_) | Self::Config(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}

/// Pick the server's explanation out of an error body
pub fn server_message(body: Option<&Value>) -> String {
    let pick = |key: &str| {
        body.and_then(|b| b.get(key))
            .and_then(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Null => None,
                Value::String(_) => None,
                other => Some(other.to_string()),
            })
    };
    pick("detail")
        .or_else(|| pick("error"))
        .unwrap_or_else(|| GENERIC_MESSAGE.to_string())
}

impl From<ClientError> for AdminError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized(_) => AdminError::Unauthorized,
            ClientError::Config(msg) => AdminError::InvalidConfig(msg),
            other => AdminError::api(other.user_message()),
        }
    }
}

/// Result type for client calls
pub type ClientResult<T> = Result<T, ClientError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_message_prefers_detail() {
        let body = json!({"detail": "No encontrado", "error": "otro"});
        assert_eq!(server_message(Some(&body)), "No encontrado");
    }

    #[test]
    fn test_message_falls_back_to_error_then_generic() {
        assert_eq!(server_message(Some(&json!({"error": "Duplicado"}))), "Duplicado");
        assert_eq!(server_message(Some(&json!({"detail": ""}))), "Error");
        assert_eq!(server_message(Some(&json!({"nombre": ["requerido"]}))), "Error");
        assert_eq!(server_message(None), "Error");
    }

    #[test]
    fn test_status_classification() {
        let err = ClientError::from_response(401, None);
        assert!(err.is_unauthorized());
        assert!(matches!(AdminError::from(err), AdminError::Unauthorized));

        let err = ClientError::from_response(404, Some(&json!({"detail": "No existe"})));
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "No existe");
        assert_eq!(AdminError::from(err).to_string(), "No existe");
    }
}
