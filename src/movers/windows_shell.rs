use super::PlatformMover;
use crate::config::TrashContext;
use crate::fs::FileSystem;
use crate::helpers::absolute_or_relaxed;
use crate::models::{Platform, TrashOutcome};
use std::path::{Path, PathBuf};

#[cfg_attr(not(windows), allow(dead_code))]
const FO_DELETE: u32 = 0x0003;
const FOF_SILENT: u16 = 0x0004;
const FOF_NOCONFIRMATION: u16 = 0x0010;
const FOF_ALLOWUNDO: u16 = 0x0040;
const FOF_NOERRORUI: u16 = 0x0400;

/// Undoable delete without confirmation, progress or error dialogs.
pub const RECYCLE_FLAGS: u16 = FOF_ALLOWUNDO | FOF_NOCONFIRMATION | FOF_SILENT | FOF_NOERRORUI;

/// What the shell reported for one batched delete.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ShellOpStatus {
    pub return_code: i32,
    pub any_operations_aborted: bool,
}

impl ShellOpStatus {
    pub fn is_success(&self) -> bool {
        self.return_code == 0 && !self.any_operations_aborted
    }
}

/// The OS's batched, undoable delete; one call per batch.
pub trait ShellFileOperation: Send + Sync {
    fn delete_to_recycle_bin(&self, paths: &[PathBuf]) -> crate::Result<ShellOpStatus>;
}

/// `SHFileOperationW` with `FO_DELETE` on Windows; unavailable elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeShell;

impl ShellFileOperation for NativeShell {
    #[cfg(windows)]
    fn delete_to_recycle_bin(&self, paths: &[PathBuf]) -> crate::Result<ShellOpStatus> {
        use ::windows::core::PCWSTR;
        use ::windows::Win32::UI::Shell::{SHFileOperationW, SHFILEOPSTRUCTW};

        let from = double_null_terminated(paths);
        let mut op = SHFILEOPSTRUCTW {
            wFunc: FO_DELETE,
            pFrom: PCWSTR(from.as_ptr()),
            fFlags: RECYCLE_FLAGS,
            ..Default::default()
        };
        // SAFETY: `op` and the `from` buffer it points into outlive the call.
        let return_code = unsafe { SHFileOperationW(&mut op) };
        let aborted = op.fAnyOperationsAborted;
        Ok(ShellOpStatus {
            return_code,
            any_operations_aborted: aborted.as_bool(),
        })
    }

    #[cfg(not(windows))]
    fn delete_to_recycle_bin(&self, _paths: &[PathBuf]) -> crate::Result<ShellOpStatus> {
        Err(crate::CoreError::UnsupportedPlatform(
            "the Recycle Bin shell operation is only available on Windows".to_string(),
        ))
    }
}

/// Recycle Bin mover: one shell call for every path that exists.
pub struct WindowsMover<'a> {
    fs: &'a dyn FileSystem,
    shell: &'a dyn ShellFileOperation,
}

impl<'a> WindowsMover<'a> {
    pub fn new(fs: &'a dyn FileSystem, shell: &'a dyn ShellFileOperation) -> Self {
        Self { fs, shell }
    }
}

impl PlatformMover for WindowsMover<'_> {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn trash(&self, paths: &[PathBuf], _ctx: &TrashContext) -> crate::Result<TrashOutcome> {
        let (existing, missing): (Vec<PathBuf>, Vec<PathBuf>) =
            paths.iter().cloned().partition(|path| self.fs.exists(path));
        if existing.is_empty() {
            log::debug!("recycle-bin: none of the {} path(s) exist", paths.len());
            return Ok(TrashOutcome::all_failed(paths.to_vec()));
        }

        let absolute: Vec<PathBuf> = existing.iter().map(|p| absolute_or_relaxed(p)).collect();
        match self.shell.delete_to_recycle_bin(&absolute) {
            Ok(status) if status.is_success() => Ok(TrashOutcome {
                succeeded: existing,
                failed: missing,
            }),
            Ok(status) => {
                log::warn!(
                    "recycle-bin: shell delete failed (code {:#x}, aborted: {}), {} file(s) untouched",
                    status.return_code,
                    status.any_operations_aborted,
                    existing.len()
                );
                Ok(TrashOutcome::all_failed(paths.to_vec()))
            }
            Err(err) => {
                log::warn!("recycle-bin: {err}");
                Ok(TrashOutcome::all_failed(paths.to_vec()))
            }
        }
    }
}

/// UTF-16 path list in the shell's format: each path NUL-terminated, plus a final NUL.
pub fn double_null_terminated(paths: &[PathBuf]) -> Vec<u16> {
    let mut buffer: Vec<u16> = Vec::new();
    for path in paths {
        buffer.extend(wide_units(path));
        buffer.push(0);
    }
    buffer.push(0);
    buffer
}

#[cfg(windows)]
fn wide_units(path: &Path) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;
    path.as_os_str().encode_wide().collect()
}

#[cfg(not(windows))]
fn wide_units(path: &Path) -> Vec<u16> {
    path.to_string_lossy().encode_utf16().collect()
}
