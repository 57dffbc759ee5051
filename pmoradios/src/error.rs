//! Error types for the online radios client

/// Result type alias for radio directory operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using the radio directory client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Any failure while talking to the directory (transport, HTTP status,
    /// body decoding or JSON parsing)
    #[error("Connection to {url} failed: {source}")]
    Connection {
        url: String,
        #[source]
        source: ConnectionCause,
    },

    /// Unknown station attribute requested by name
    #[error("Station has no attribute '{0}'")]
    AttributeNotFound(String),

    /// Station details requested but no directory client is reachable
    #[error("No directory client available to load details of station {0}")]
    DetailsUnavailable(u64),

    /// Configuration error (from pmoconfig/anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

/// Underlying cause of an [`Error::Connection`]
#[derive(Debug, thiserror::Error)]
pub enum ConnectionCause {
    /// HTTP request failed (DNS, refused connection, non-2xx status...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),

    /// IO error while reading the body
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Body bytes are not valid in the advertised charset
    #[error("Response body is not valid {0}")]
    Decode(&'static str),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a connection error for `url`
    pub fn connection(url: impl Into<String>, source: impl Into<ConnectionCause>) -> Self {
        Self::Connection {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Create an attribute error
    pub fn attribute_not_found(name: impl Into<String>) -> Self {
        Self::AttributeNotFound(name.into())
    }

    /// Check if this error comes from a remote call
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_display() {
        let err = Error::connection("http://rad.io/info/foo", ConnectionCause::Status(503));
        assert!(err.is_connection());
        assert_eq!(
            err.to_string(),
            "Connection to http://rad.io/info/foo failed: HTTP status 503"
        );
    }

    #[test]
    fn test_json_cause_is_wrapped() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = Error::connection("http://rad.io/info/foo", json_err);
        assert!(matches!(
            err,
            Error::Connection {
                source: ConnectionCause::Json(_),
                ..
            }
        ));
    }
}
