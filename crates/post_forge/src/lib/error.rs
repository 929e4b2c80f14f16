use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied an empty or malformed required field. Raised before any
    /// external process or remote call is made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The transcription process exited non-zero or its output could not be parsed.
    #[error("{message}")]
    ExternalProcess {
        message: String,
        stderr: String,
        exit_code: Option<i32>,
    },

    /// A remote inference call returned a non-success status or an unrecognized body.
    #[error("{message}")]
    ExternalService {
        status: Option<u16>,
        message: String,
    },
}

impl Error {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub fn service(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::ExternalService {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        let message = if e.is_timeout() {
            format!("Request timed out: {e}")
        } else {
            format!("HTTP error: {e}")
        };

        Error::ExternalService {
            status: e.status().map(|s| s.as_u16()),
            message,
        }
    }
}
