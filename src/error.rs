use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Content errors raised while converting a Markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkdownError {
    #[error("invalid markdown, formatted section not closed: `{delimiter}`")]
    UnclosedDelimiter { delimiter: &'static str },

    #[error("invalid heading level: {level}")]
    InvalidHeading { level: usize },

    #[error("invalid code block")]
    InvalidCodeBlock,

    #[error("invalid quote block")]
    InvalidQuoteBlock,

    #[error("no h1 heading found in the markdown content")]
    MissingTitle,
}

/// Errors raised while assembling the site on disk.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to render {path}: {source}")]
    Page {
        path: PathBuf,
        source: MarkdownError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SiteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SiteError::Io {
            path: path.into(),
            source,
        }
    }
}
