use super::{log_failure, move_into, PlatformMover};
use crate::config::TrashContext;
use crate::fs::FileSystem;
use crate::models::{Platform, TrashOutcome};
use std::path::PathBuf;

/// Moves files into `~/.Trash`, one file at a time.
pub struct MacMover<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> MacMover<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }
}

impl PlatformMover for MacMover<'_> {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    fn trash(&self, paths: &[PathBuf], ctx: &TrashContext) -> crate::Result<TrashOutcome> {
        let trash_dir = ctx.mac_trash_dir()?;
        self.fs.create_dir_all(&trash_dir)?;

        let mut outcome = TrashOutcome::new();
        for path in paths {
            match move_into(self.fs, &trash_dir, path) {
                Ok(dest) => {
                    log::debug!("recycle-bin: {} -> {}", path.display(), dest.display());
                    outcome.record_success(path.clone());
                }
                Err(err) => {
                    log_failure(path, &err);
                    outcome.record_failure(path.clone());
                }
            }
        }
        Ok(outcome)
    }
}
