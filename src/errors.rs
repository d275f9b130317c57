use std::{io, path::PathBuf};

/// Shared error type for the trash engine and its host adapters.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// File system I/O failure.
    #[error("I/O error while accessing {0}")]
    Io(PathBuf, #[source] io::Error),

    /// The path did not exist when the operation ran.
    #[error("no such file or directory: {0}")]
    NotFound(PathBuf),

    /// A trash root (or one of its subdirectories) could not be created.
    #[error("unable to create trash directory {0}")]
    DirectoryCreation(PathBuf, #[source] io::Error),

    /// Moving a file into the trash failed.
    #[error("unable to move {from} to {to}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The `.trashinfo` record for an already moved file could not be written.
    #[error("unable to write trash info record {0}")]
    MetadataWrite(PathBuf, #[source] io::Error),

    /// Every numbered candidate for a destination name is taken.
    #[error("no free destination name for {name} in {dir}")]
    ExhaustedNaming { dir: PathBuf, name: String },

    /// A path is invalid for the current operation.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A required input is missing.
    #[error("missing required value: {0}")]
    MissingValue(String),

    /// An operation was rejected due to configuration/argument issues.
    #[error("invalid command input: {0}")]
    InvalidInput(String),

    /// Platform-specific behavior not available in this environment.
    #[error("unsupported platform behavior: {0}")]
    UnsupportedPlatform(String),
}

impl CoreError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn missing(message: impl Into<String>) -> Self {
        Self::MissingValue(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Io(path.into(), error)
    }

    pub fn directory(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::DirectoryCreation(path.into(), error)
    }

    /// Returns the underlying OS error, if this error wraps one.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Io(_, err)
            | Self::DirectoryCreation(_, err)
            | Self::MetadataWrite(_, err)
            | Self::Move { source: err, .. } => Some(err),
            _ => None,
        }
    }
}

/// Shared result alias for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
