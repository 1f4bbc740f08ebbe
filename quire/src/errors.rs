use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for Quire operations.
///
/// Input errors (`InvalidInput`, `AlreadyIndexed`, `NotIndexed`) and `NotFound`
/// never mutate state. Storage errors raised by a partition or an index store are
/// propagated to the caller unchanged.
///
/// # Examples
///
/// ```rust,ignore
/// use quire::errors::{QuireError, ErrorKind, QuireResult};
///
/// fn example() -> QuireResult<()> {
///     Err(QuireError::new("No index on path a!b", ErrorKind::NotIndexed))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Lookup errors
    /// The partition holds no record for the identifier
    NotFound,

    // Input errors
    /// The caller supplied an invalid document, path or value
    InvalidInput,
    /// An index already exists on the path
    AlreadyIndexed,
    /// No index exists on the path
    NotIndexed,

    // Data encoding errors
    /// Stored bytes could not be decoded into a document
    DecodeError,
    /// A document could not be encoded into bytes
    EncodingError,

    // Storage errors
    /// The partition already holds a record for the identifier
    DuplicateId,
    /// Generic IO error
    IOError,
    /// The partition or index store has been closed
    StoreClosed,

    // Database errors
    /// The owning database has been closed or dropped
    DatabaseClosed,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Invalid or late configuration change
    ConfigError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::InvalidInput => write!(f, "Invalid input"),
            ErrorKind::AlreadyIndexed => write!(f, "Already indexed"),
            ErrorKind::NotIndexed => write!(f, "Not indexed"),
            ErrorKind::DecodeError => write!(f, "Decode error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::DuplicateId => write!(f, "Duplicate id"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::StoreClosed => write!(f, "Store closed"),
            ErrorKind::DatabaseClosed => write!(f, "Database closed"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::ConfigError => write!(f, "Configuration error"),
        }
    }
}

/// Custom Quire error type.
///
/// `QuireError` carries a message, an [ErrorKind] and an optional cause, and
/// captures a backtrace at construction for debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use quire::errors::{QuireError, ErrorKind};
///
/// let cause = QuireError::new("disk unplugged", ErrorKind::IOError);
/// let err = QuireError::new_with_cause("Failed to write document 7", ErrorKind::IOError, cause);
/// ```
#[derive(Clone)]
pub struct QuireError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<QuireError>>,
    backtrace: Arc<Backtrace>,
}

impl QuireError {
    /// Creates a new `QuireError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        QuireError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `QuireError` that wraps an underlying cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: QuireError) -> Self {
        QuireError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&QuireError> {
        self.cause.as_deref()
    }
}

impl Display for QuireError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for QuireError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for QuireError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for Quire operations.
pub type QuireResult<T> = Result<T, QuireError>;

impl From<std::io::Error> for QuireError {
    fn from(err: std::io::Error) -> Self {
        QuireError::new(&format!("IO error: {}", err), ErrorKind::IOError)
    }
}

impl From<serde_json::Error> for QuireError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Syntax | Category::Data | Category::Eof => QuireError::new(
                &format!("Failed to decode document: {}", err),
                ErrorKind::DecodeError,
            ),
            Category::Io => QuireError::new(
                &format!("Failed to encode document: {}", err),
                ErrorKind::EncodingError,
            ),
        }
    }
}
