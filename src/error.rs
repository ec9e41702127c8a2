use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{context}, line {line}: {message}")]
    Parse {
        context: &'static str,
        line: usize,
        message: String,
    },
    #[error("invalid replacement row at line {line}: {message}")]
    InvalidRow { line: usize, message: String },
    #[error(
        "length mismatch at line {line}: {source_tokens} source tokens vs {alignment_tokens} alignment tokens"
    )]
    LengthMismatch {
        line: usize,
        source_tokens: usize,
        alignment_tokens: usize,
    },
    #[error("vocab file {} does not exist", path.display())]
    MissingVocab { path: PathBuf },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl IndexError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn parse(context: &'static str, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            context,
            line,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_row(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidRow {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
