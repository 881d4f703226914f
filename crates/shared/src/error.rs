#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("{message}")]
    Server {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("malformed payload: {0}")]
    Parse(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid date range: {0}")]
    InvalidRange(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

impl Error {
    /// Status code reported by the backend, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
