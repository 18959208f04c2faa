use tcc_core::board::BoardError;
use tcc_core::error::CoreError;
use tcc_core::forms::FormErrors;
use tcc_core::schedule::ScheduleError;
use tcc_core::work_status::TransitionError;

/// Generic alert shown for any failure the caller cannot act on.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing the request.";

/// Errors from the REST client and the workflows built on it.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The Entity Store returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A 2xx body did not have the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A long-running operation of this kind is already in flight.
    #[error("{0} already in progress")]
    Busy(&'static str),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Text for the user-facing alert. Local rejections explain themselves;
    /// remote failures get the generic message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Core(e) => e.to_string(),
            ClientError::Busy(op) => format!("Please wait, {op} is still running."),
            ClientError::Config(msg) => msg.clone(),
            ClientError::Api { status: 401, .. } => "Your session has expired. Please log in again.".into(),
            ClientError::Api { status: 403, .. } => "You are not allowed to perform this action.".into(),
            _ => GENERIC_ERROR_MESSAGE.into(),
        }
    }
}

macro_rules! core_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for ClientError {
                fn from(e: $ty) -> Self {
                    ClientError::Core(CoreError::from(e))
                }
            }
        )+
    };
}

core_from!(FormErrors, ScheduleError, BoardError, TransitionError);
