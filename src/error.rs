//! The public error type.
//!
//! Internally the crate works with `anyhow` and attaches context as errors bubble up. At the
//! public boundary an error is tagged with an `ErrorType` so that a caller can tell a missing
//! entry apart from a malformed ledger file or a rejected amount.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt::{Debug, Display, Formatter};

/// The internal result type.
pub(crate) type Res<T> = anyhow::Result<T>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of failure that occurred.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The ledger file, or the requested transaction, does not exist.
    NotFound,
    /// The ledger file is missing required columns or holds rows that cannot be parsed.
    Schema,
    /// An input value was rejected, e.g. a negative amount.
    Validation,
    /// The data directory or its config file is missing or invalid.
    Config,
    /// Reading or writing a file failed.
    Io,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

pub struct Error {
    error_type: ErrorType,
    source: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, source: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            source: source.into(),
        }
    }

    /// Creates an error of `error_type` from a plain message.
    pub(crate) fn msg<M>(error_type: ErrorType, message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self::new(error_type, anyhow::Error::msg(message))
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The alternate form prints the whole context chain on one line.
        write!(f, "{:#}", self.source)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.source)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Converts an internal result into the public `Result`, tagging any error with an `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::str::FromStr;

    #[test]
    fn test_error_type_display() {
        assert_eq!(ErrorType::NotFound.to_string(), "not_found");
        assert_eq!(ErrorType::from_str("schema").unwrap(), ErrorType::Schema);
    }

    #[test]
    fn test_pub_result_keeps_context() {
        let res: Res<()> = Err(anyhow::anyhow!("inner")).context("outer");
        let err = res.pub_result(ErrorType::Io).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Io);
        assert_eq!(err.to_string(), "outer: inner");
    }

    #[test]
    fn test_msg() {
        let err = Error::msg(ErrorType::Validation, "Debit amount cannot be negative");
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert!(err.to_string().contains("negative"));
    }
}
