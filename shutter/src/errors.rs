use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for Shutter operations.
///
/// Each kind describes a category of failure. Note that a missing document is
/// *not* an error anywhere in the store: lookups return `Option` and deletes
/// return `bool`, so `ErrorKind` only covers genuine failures.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// Generic IO error
    IOError,
    /// The file was not found
    FileNotFound,
    /// Permission denied for file operation
    PermissionDenied,
    /// Durable record data is corrupted
    FileCorrupted,
    /// Error encoding or decoding data
    EncodingError,
    /// Error mapping an entity to/from its stored representation
    ObjectMappingError,
    /// Generic validation error
    ValidationError,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Error from a storage backend
    BackendError,
    /// Store has already been closed
    StoreAlreadyClosed,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::FileCorrupted => write!(f, "File corrupted"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::StoreAlreadyClosed => write!(f, "Store already closed"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom Shutter error type.
///
/// `ShutterError` carries an error message, a kind, and an optional cause.
/// It supports error chaining and backtraces for debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use shutter::errors::{ErrorKind, ShutterError, ShutterResult};
///
/// fn example() -> ShutterResult<()> {
///     Err(ShutterError::new("journal is closed", ErrorKind::StoreAlreadyClosed))
/// }
/// ```
#[derive(Clone)]
pub struct ShutterError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<ShutterError>>,
    backtrace: Atomic<Backtrace>,
}

impl ShutterError {
    /// Creates a new `ShutterError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        ShutterError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `ShutterError` with a cause error attached.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: ShutterError) -> Self {
        ShutterError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&ShutterError> {
        self.cause.as_deref()
    }
}

impl Display for ShutterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for ShutterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for ShutterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for Shutter operations.
pub type ShutterResult<T> = Result<T, ShutterError>;

impl From<std::io::Error> for ShutterError {
    fn from(error: std::io::Error) -> Self {
        let kind = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IOError,
        };
        ShutterError::new(&error.to_string(), kind)
    }
}

impl From<serde_json::Error> for ShutterError {
    fn from(error: serde_json::Error) -> Self {
        ShutterError::new(&error.to_string(), ErrorKind::EncodingError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_exposes_message_and_kind() {
        let err = ShutterError::new("journal unavailable", ErrorKind::BackendError);
        assert_eq!(err.message(), "journal unavailable");
        assert_eq!(err.kind(), &ErrorKind::BackendError);
        assert!(err.cause().is_none());
        assert_eq!(format!("{}", err), "journal unavailable");
    }

    #[test]
    fn error_chain_preserves_cause() {
        let cause = ShutterError::new("disk detached", ErrorKind::IOError);
        let err = ShutterError::new_with_cause("append failed", ErrorKind::BackendError, cause);
        assert_eq!(err.cause().unwrap().kind(), &ErrorKind::IOError);
        assert!(err.source().is_some());
        assert!(format!("{:?}", err).contains("Caused by"));
    }

    #[test]
    fn io_error_maps_to_file_kinds() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ShutterError = missing.into();
        assert_eq!(err.kind(), &ErrorKind::FileNotFound);

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        let err: ShutterError = denied.into();
        assert_eq!(err.kind(), &ErrorKind::PermissionDenied);
    }

    #[test]
    fn json_error_maps_to_encoding() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ShutterError = bad.into();
        assert_eq!(err.kind(), &ErrorKind::EncodingError);
    }
}
