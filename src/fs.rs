use crate::errors::CoreError;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;

/// Filesystem abstraction boundary for the trash movers.
///
/// Keeping this trait narrow makes it easy to write deterministic tests, e.g.
/// a wrapper that fails metadata writes while delegating everything else.
pub trait FileSystem: Send + Sync {
    /// Returns the current time in wall-clock format.
    fn now(&self) -> SystemTime;

    /// Returns true when path exists (symlink-aware: dangling links exist).
    fn exists(&self, path: &Path) -> bool;

    /// Creates a directory and all missing parent directories.
    fn create_dir_all(&self, path: &Path) -> crate::Result<()>;

    /// Moves a file or directory, falling back to copy + delete across devices.
    fn move_path(&self, from: &Path, to: &Path) -> crate::Result<()>;

    /// Writes UTF-8 text into a file that must not exist yet.
    fn write_new(&self, path: &Path, content: &str) -> crate::Result<()>;

    /// Removes a file.
    fn remove_file(&self, path: &Path) -> crate::Result<()>;
}

/// Default filesystem implementation backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn create_dir_all(&self, path: &Path) -> crate::Result<()> {
        fs::create_dir_all(path).map_err(|err| CoreError::directory(path, err))
    }

    fn move_path(&self, from: &Path, to: &Path) -> crate::Result<()> {
        let moved = match fs::rename(from, to) {
            Err(err) if is_cross_device(&err) => {
                log::debug!(
                    "recycle-bin: {} is on another device, copying instead of renaming",
                    from.display()
                );
                copy_then_remove(from, to)
            }
            other => other,
        };
        moved.map_err(|source| CoreError::Move {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })
    }

    fn write_new(&self, path: &Path, content: &str) -> crate::Result<()> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .and_then(|mut file| file.write_all(content.as_bytes()))
            .map_err(|err| CoreError::io(path, err))
    }

    fn remove_file(&self, path: &Path) -> crate::Result<()> {
        fs::remove_file(path).map_err(|err| CoreError::io(path, err))
    }
}

#[cfg(unix)]
fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(not(unix))]
fn is_cross_device(err: &io::Error) -> bool {
    // ERROR_NOT_SAME_DEVICE
    err.raw_os_error() == Some(17)
}

fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    if let Err(err) = copy_recursive(from, to) {
        let _ = remove_recursive(to);
        return Err(err);
    }
    remove_recursive(from)
}

fn copy_recursive(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(from)?;
    let file_type = metadata.file_type();

    if file_type.is_symlink() {
        return copy_symlink(from, to);
    }

    if file_type.is_dir() {
        fs::create_dir(to)?;
        for entry in fs::read_dir(from)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &to.join(entry.file_name()))?;
        }
        fs::set_permissions(to, metadata.permissions())?;
        return Ok(());
    }

    fs::copy(from, to).map(|_| ())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(from)?, to)
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to).map(|_| ())
}

fn remove_recursive(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
