//! Per-platform trash implementations behind one [`PlatformMover`] trait.

pub mod freedesktop;
pub mod macos;
pub mod windows_shell;

use crate::config::TrashContext;
use crate::errors::CoreError;
use crate::fs::FileSystem;
use crate::helpers::sanitize_user_path;
use crate::models::{Platform, TrashOutcome};
use crate::naming::unique_destination;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub use freedesktop::FreedesktopMover;
pub use macos::MacMover;
pub use windows_shell::{NativeShell, ShellFileOperation, ShellOpStatus, WindowsMover};

/// Moves a batch of normalized paths into one platform's trash.
pub trait PlatformMover {
    fn platform(&self) -> Platform;

    /// Partitions `paths` into trashed and failed.
    ///
    /// Per-file problems never surface as `Err`; only failures that make the
    /// whole trash unusable (no home directory, trash root not creatable) do.
    fn trash(&self, paths: &[PathBuf], ctx: &TrashContext) -> crate::Result<TrashOutcome>;
}

/// Returns the name a path will be trashed under, once it is known to exist.
fn trashable_name<'p>(fs: &dyn FileSystem, path: &'p Path) -> crate::Result<&'p OsStr> {
    if !fs.exists(path) {
        return Err(CoreError::NotFound(path.to_path_buf()));
    }
    path.file_name()
        .ok_or_else(|| CoreError::InvalidPath(sanitize_user_path(path)))
}

/// Moves one existing path into `dir` under a free name and returns where it landed.
fn move_into(fs: &dyn FileSystem, dir: &Path, path: &Path) -> crate::Result<PathBuf> {
    let name = trashable_name(fs, path)?;
    let dest = unique_destination(fs, dir, name)?;
    fs.move_path(path, &dest)?;
    Ok(dest)
}

fn log_failure(path: &Path, err: &CoreError) {
    match err {
        CoreError::NotFound(_) => {
            log::debug!("recycle-bin: skipping missing path {}", sanitize_user_path(path))
        }
        _ => log::warn!(
            "recycle-bin: failed to trash {}: {err}",
            sanitize_user_path(path)
        ),
    }
}
