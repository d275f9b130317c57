use crate::helpers::{encode_trash_path, TRASHINFO_HEADER};
use std::path::{Path, PathBuf};

/// Trash implementation selected for a request.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Platform {
    /// Recycle Bin through the shell's batched, undoable delete.
    Windows,
    /// `~/.Trash`.
    MacOs,
    /// freedesktop.org Trash (`files/` + `info/`), used by every other Unix.
    Freedesktop,
}

impl Platform {
    /// Classifies a platform tag such as `win32`, `darwin` or `linux`.
    pub fn from_identifier(identifier: &str) -> Self {
        if identifier.starts_with("win") {
            Self::Windows
        } else if identifier == "darwin" || identifier == "macos" {
            Self::MacOs
        } else {
            Self::Freedesktop
        }
    }

    /// Platform of the running process.
    pub fn current() -> Self {
        Self::from_identifier(std::env::consts::OS)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Freedesktop => "freedesktop",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Success/failure partition of one trash request.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TrashOutcome {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl TrashOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome where every given path failed.
    pub fn all_failed(paths: impl Into<Vec<PathBuf>>) -> Self {
        Self {
            succeeded: Vec::new(),
            failed: paths.into(),
        }
    }

    pub fn record_success(&mut self, path: impl Into<PathBuf>) {
        self.succeeded.push(path.into());
    }

    pub fn record_failure(&mut self, path: impl Into<PathBuf>) {
        self.failed.push(path.into());
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }

    pub fn is_success(&self, path: &Path) -> bool {
        self.succeeded.iter().any(|p| p == path)
    }

    pub fn status(&self) -> ExitStatusLike {
        match (self.succeeded.is_empty(), self.failed.is_empty()) {
            (_, true) => ExitStatusLike::Ok,
            (false, false) => ExitStatusLike::Warning,
            (true, false) => ExitStatusLike::Error,
        }
    }
}

/// Layout of a freedesktop trash directory.
#[derive(Debug, Clone)]
pub struct TrashDirectory {
    pub path: PathBuf,
    pub files_dir: PathBuf,
    pub info_dir: PathBuf,
}

impl TrashDirectory {
    pub fn new(path: PathBuf) -> Self {
        Self {
            files_dir: path.join("files"),
            info_dir: path.join("info"),
            path,
        }
    }
}

/// Companion `.trashinfo` record for a file moved into a freedesktop trash.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TrashInfoRecord {
    /// Absolute original location.
    pub original_path: PathBuf,
    /// Local deletion time, already formatted to second precision.
    pub deletion_date: String,
}

impl TrashInfoRecord {
    pub fn new(original_path: PathBuf, deletion_date: impl Into<String>) -> Self {
        Self {
            original_path,
            deletion_date: deletion_date.into(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{TRASHINFO_HEADER}\nPath={}\nDeletionDate={}\n",
            encode_trash_path(&self.original_path),
            self.deletion_date
        )
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ExitStatusLike {
    Ok,
    Warning,
    Error,
}

impl ExitStatusLike {
    pub fn as_code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warning => 2,
            Self::Error => 1,
        }
    }
}
