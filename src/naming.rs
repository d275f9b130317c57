use crate::errors::CoreError;
use crate::fs::FileSystem;
use crate::helpers::build_unique_basename;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Highest numeric suffix tried before giving up on a name.
pub const MAX_NAME_PROBES: u32 = 9999;

/// Returns the first free destination for `file_name` inside `dir`.
///
/// The plain name wins when free; otherwise `{stem}.1{ext}`, `{stem}.2{ext}`
/// and so on are probed in order. The probe and the later move are not
/// atomic, so another process may still claim the slot in between.
pub fn unique_destination(
    fs: &dyn FileSystem,
    dir: &Path,
    file_name: &OsStr,
) -> crate::Result<PathBuf> {
    first_free_slot(dir, file_name, |candidate| fs.exists(candidate))
}

/// Same probe order as [`unique_destination`], with a caller-defined notion of "taken".
pub fn first_free_slot(
    dir: &Path,
    file_name: &OsStr,
    is_taken: impl Fn(&Path) -> bool,
) -> crate::Result<PathBuf> {
    let candidate = dir.join(file_name);
    if !is_taken(&candidate) {
        return Ok(candidate);
    }

    (1..=MAX_NAME_PROBES)
        .map(|suffix| dir.join(build_unique_basename(file_name, suffix)))
        .find(|candidate| !is_taken(candidate))
        .ok_or_else(|| CoreError::ExhaustedNaming {
            dir: dir.to_path_buf(),
            name: file_name.to_string_lossy().into_owned(),
        })
}
