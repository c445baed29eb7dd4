use super::Format;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("no reader for files named like '{}'", .0.display())]
    UnrecognizedExtension(PathBuf),

    #[error("refusing to overwrite existing file '{}'", .0.display())]
    AlreadyExists(PathBuf),

    #[error(transparent)]
    Field(#[from] crate::field::Error),
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }
}
