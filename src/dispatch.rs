use crate::config::TrashContext;
use crate::fs::{FileSystem, RealFileSystem};
use crate::helpers::normalize_paths;
use crate::models::{Platform, TrashOutcome};
use crate::movers::{FreedesktopMover, MacMover, NativeShell, PlatformMover, ShellFileOperation, WindowsMover};
use std::ffi::OsStr;

/// Picks the mover for a platform and runs a request through it.
pub struct TrashDispatcher<'a> {
    fs: &'a dyn FileSystem,
    shell: &'a dyn ShellFileOperation,
}

impl Default for TrashDispatcher<'static> {
    fn default() -> Self {
        Self::new(&RealFileSystem, &NativeShell)
    }
}

impl<'a> TrashDispatcher<'a> {
    pub fn new(fs: &'a dyn FileSystem, shell: &'a dyn ShellFileOperation) -> Self {
        Self { fs, shell }
    }

    pub fn mover(&self, platform: Platform) -> Box<dyn PlatformMover + 'a> {
        match platform {
            Platform::Windows => Box::new(WindowsMover::new(self.fs, self.shell)),
            Platform::MacOs => Box::new(MacMover::new(self.fs)),
            Platform::Freedesktop => Box::new(FreedesktopMover::new(self.fs)),
        }
    }

    /// Normalizes `paths` and trashes them on the context's platform.
    ///
    /// Blank entries and repeats are dropped first; an empty request returns
    /// an empty outcome without touching the filesystem.
    pub fn trash<I, P>(&self, paths: I, ctx: &TrashContext) -> crate::Result<TrashOutcome>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<OsStr>,
    {
        let paths = normalize_paths(paths);
        if paths.is_empty() {
            return Ok(TrashOutcome::new());
        }

        let mover = self.mover(ctx.platform());
        log::debug!(
            "recycle-bin: sending {} path(s) to the {} trash",
            paths.len(),
            mover.platform()
        );
        mover.trash(&paths, ctx)
    }
}

/// Trashes `paths` with the real filesystem and the native shell.
pub fn send_paths_to_trash<I, P>(paths: I, ctx: &TrashContext) -> crate::Result<TrashOutcome>
where
    I: IntoIterator<Item = P>,
    P: AsRef<OsStr>,
{
    TrashDispatcher::default().trash(paths, ctx)
}
