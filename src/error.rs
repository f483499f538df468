use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    StoreUnavailable,
    UpstreamUnavailable,
    MalformedData,
    InvalidInput,
}

#[derive(Debug)]
pub enum Error {
    NotFound { match_id: String },
    StoreUnavailable(String),
    UpstreamUnavailable(String),
    MalformedData(String),
    InvalidInput(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            Error::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            Error::MalformedData(_) => ErrorKind::MalformedData,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    pub fn store(context: &str, err: impl fmt::Display) -> Self {
        Error::StoreUnavailable(format!("{context}: {err}"))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound { match_id } => write!(f, "match {match_id} not found in store"),
            Error::StoreUnavailable(msg) => write!(f, "store unavailable: {msg}"),
            Error::UpstreamUnavailable(msg) => write!(f, "match feed unavailable: {msg}"),
            Error::MalformedData(msg) => write!(f, "malformed data: {msg}"),
            Error::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::StoreUnavailable(err.to_string())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::StoreUnavailable(err.to_string())
    }
}
