//! Error types shared by every index in the crate.

use crate::config::ConfigError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which index a failed lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    SourceFile,
    Page,
    Route,
    PageKind,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lookup::SourceFile => "source file",
            Lookup::Page => "page",
            Lookup::Route => "route",
            Lookup::PageKind => "page kind",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{what} not found: {key}")]
    NotFound { what: Lookup, key: String },

    #[error("Malformed front matter in {} (lines {start_line}-{end_line}): {message}", path.display())]
    MalformedMetadata {
        path: PathBuf,
        start_line: usize,
        end_line: usize,
        message: String,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Extension '{name}' failed: {message}")]
    Extension { name: String, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn not_found(what: Lookup, key: impl Into<String>) -> Self {
        Error::NotFound {
            what,
            key: key.into(),
        }
    }

    /// True for lookups that simply missed, as opposed to real failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Project-relative or absolute path the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Error::MalformedMetadata { path, .. } | Error::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}
