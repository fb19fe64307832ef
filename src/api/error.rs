//! Game service client error types.

use derive_more::{Display, Error};

/// Error raised by a game service call.
///
/// Both variants are recoverable: the session the call belonged to is
/// still live on the service, so the caller may retry the same request.
#[derive(Debug, Clone, Display, Error)]
pub enum ClientError {
    /// The request never completed: connection refused, timeout, or the
    /// response body could not be read.
    #[display("Could not reach the game service: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },
    /// The service answered, but not in the shape the protocol promises:
    /// a non-success HTTP status, unparseable JSON, an unrecognized
    /// status tag, or a reply missing required fields.
    #[display("Unexpected reply from the game service: {message}")]
    Protocol {
        /// Description of the protocol violation, or the service's own
        /// `detail` message when one was provided.
        message: String,
    },
}

impl ClientError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Whether this is a transport-level failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::protocol(format!("Malformed response body: {}", err))
        } else {
            Self::transport(err.to_string())
        }
    }
}
