//! Error types for index construction

use crate::index::quotes::QuoteError;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuildError>;

/// Reasons a source cannot be turned into an index.
///
/// Every variant is fatal: no partial index is ever returned.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("failed to read source: {0}")]
    SourceRead(#[source] io::Error),

    #[error("malformed csv: {0}")]
    Format(#[source] FormatError),

    #[error("source has no header record")]
    MissingHeader,

    #[error("header {0} is duplicated")]
    DuplicateColumn(String),

    #[error("id is absent in header")]
    MissingIdColumn,

    #[error("row {row} (line {line}) has {got} fields, but {want} needed")]
    RowShape {
        row: usize,
        line: u64,
        got: usize,
        want: usize,
    },

    #[error("id {0} already exists")]
    DuplicateId(String),

    #[error("failed to render row {row}: {source}")]
    Render {
        row: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Structural problems in the CSV text itself
#[derive(Error, Debug)]
pub enum FormatError {
    #[error(transparent)]
    Csv(csv::Error),

    #[error(transparent)]
    Quote(QuoteError),
}

impl From<csv::Error> for BuildError {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return BuildError::Format(FormatError::Csv(err));
        }
        match err.into_kind() {
            csv::ErrorKind::Io(e) => BuildError::from(e),
            other => BuildError::SourceRead(io::Error::other(format!("{:?}", other))),
        }
    }
}

impl From<io::Error> for BuildError {
    /// Quote errors travel through the reader as `InvalidData` I/O errors
    fn from(err: io::Error) -> Self {
        let quote = err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<QuoteError>())
            .copied();
        match quote {
            Some(q) => BuildError::Format(FormatError::Quote(q)),
            None => BuildError::SourceRead(err),
        }
    }
}
