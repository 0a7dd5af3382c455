//! Source-level failures. Any of these zeroes out the affected pipeline's batch
//! but never stops the other pipelines.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("source file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("unreadable source {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    #[error("failed reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("embedded modifier catalog is invalid: {0}")]
    Catalog(#[from] serde_json::Error),
}

impl SourceError {
    pub fn format(path: &Path, reason: impl Into<String>) -> Self {
        Self::Format {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }
}

/// Why a single source row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowRejection {
    MissingCode,
    InvalidCode,
    TooFewFields,
    NotACodeLine,
}

impl RowRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingCode => "missing_code",
            Self::InvalidCode => "invalid_code",
            Self::TooFewFields => "too_few_fields",
            Self::NotACodeLine => "not_a_code_line",
        }
    }
}
