//! Error types for batched writes.
//!
//! Every recoverable failure of a `put` call is one of the variants below and
//! aborts the whole call. Nothing is retried internally: upserts are
//! idempotent, so callers fix the cause and put the same rows again.

use std::error::Error as StdError;
use std::fmt;

/// Boxed error returned by hooks and carried as a source.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Result alias used throughout bulkput.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error type.
#[derive(Debug)]
pub enum Error {
    /// The record type does not have exactly one primary key.
    Schema(SchemaError),
    /// A preprocessing hook failed.
    Hook(HookError),
    /// A surviving row failed validation.
    Validation(ValidationError),
    /// The destination rejected a batch.
    Write(WriteError),
    /// Free-form error, mostly raised by destination implementations.
    Custom(String),
}

/// The record type exposes zero or several primary-key fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub table: String,
    /// Columns found to be primary-key candidates.
    pub primary_keys: Vec<String>,
}

/// A hook reported failure while processing a row.
#[derive(Debug)]
pub struct HookError {
    /// 1-based index of the row in the input.
    pub row: usize,
    /// Position of the failing hook in the chain.
    pub hook: usize,
    pub source: BoxError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The primary key holds the zero value for its type.
    ZeroPrimaryKey,
    /// The record has no field for a projected column.
    MissingField,
}

/// A row that survived the hooks cannot be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// 1-based index of the row in the input.
    pub row: usize,
    pub column: String,
}

/// A batch failed at the destination.
///
/// Batches written before the failing one stay written.
#[derive(Debug)]
pub struct WriteError {
    pub table: String,
    /// 0-based index of the failing batch.
    pub batch: usize,
    /// Rows committed by earlier batches of the same call.
    pub rows_written: u64,
    pub source: Box<Error>,
}

impl Error {
    /// Whether the destination may hold a partial write of this call.
    #[must_use]
    pub fn is_partial_write(&self) -> bool {
        matches!(self, Error::Write(e) if e.rows_written > 0)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Schema(e) => write!(f, "{}", e),
            Error::Hook(e) => write!(f, "{}", e),
            Error::Validation(e) => write!(f, "{}", e),
            Error::Write(e) => write!(f, "{}", e),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table `{}` must have exactly one primary column, but has {:?}",
            self.table, self.primary_keys
        )
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at row {}, hook #{} failed: {}",
            self.row, self.hook, self.source
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ValidationErrorKind::ZeroPrimaryKey => write!(
                f,
                "at row {}, primary field `{}` value is zero, but is required",
                self.row, self.column
            ),
            ValidationErrorKind::MissingField => write!(
                f,
                "at row {}, record has no field for column `{}`",
                self.row, self.column
            ),
        }
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "writing batch {} to `{}` failed after {} rows: {}",
            self.batch, self.table, self.rows_written, self.source
        )
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Hook(e) => Some(e.source.as_ref()),
            Error::Write(e) => Some(e.source.as_ref()),
            _ => None,
        }
    }
}

impl StdError for SchemaError {}
impl StdError for ValidationError {}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Error::Schema(err)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}
