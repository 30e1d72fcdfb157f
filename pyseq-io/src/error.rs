use std::fmt;
use std::path::PathBuf;

/// A single error type that threads from file I/O up through the CLI.
///
/// The core crate does not pull in `thiserror`/`anyhow`; each variant carries
/// just enough context for the binary to print one diagnostic line and exit.
#[derive(Debug)]
pub enum PyseqError {
    /// `k <= 0`, `m <= 0`, `m > k`, or `max_ambiguous` outside `[0, 1]`.
    InvalidParameter(String),
    /// A file could not be opened, read, written, or decompressed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Malformed FASTA/FASTQ, bins.json, or database record.
    Format(String),
}

impl fmt::Display for PyseqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PyseqError::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            PyseqError::Io { path, source } => {
                write!(f, "I/O error on {}: {source}", path.display())
            }
            PyseqError::Format(msg) => write!(f, "format error: {msg}"),
        }
    }
}

impl std::error::Error for PyseqError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PyseqError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl PyseqError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PyseqError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PyseqError>;
