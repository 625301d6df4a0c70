use arrow::error::ArrowError;
use std::io;
use thiserror::Error;

/// Structural failures that abort a render.
///
/// Unparsable cells never show up here: they are absorbed by the normalizer
/// and surface only as a missing value in the rendered table.
#[derive(Debug, Error)]
pub enum Error {
    /// The loader could not read the named sheet/range.
    #[error("source unavailable: {location} [{sheet}]: {reason}")]
    SourceUnavailable {
        location: String,
        sheet: String,
        reason: String,
    },

    /// Nothing usable survived alignment, or a required column is gone.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A column was asked for by name but is not part of the table.
    #[error("column `{0}` is not present in the table")]
    MissingColumn(String),

    #[error("invalid column range `{0}`")]
    InvalidRange(String),

    #[error("invalid dataset config: {0}")]
    Config(String),

    #[error(transparent)]
    Arrow(#[from] ArrowError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn unavailable(
        location: impl Into<String>,
        sheet: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Error::SourceUnavailable {
            location: location.into(),
            sheet: sheet.into(),
            reason: reason.to_string(),
        }
    }
}
