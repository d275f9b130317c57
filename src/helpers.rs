//! Shared utility helpers for path handling and trash metadata formatting.

use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// File extension used by trash info files.
pub const TRASHINFO_EXTENSION: &str = ".trashinfo";

/// Deletion date format commonly used by Trash info metadata.
pub const TRASHINFO_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// First line of every trash info file.
pub const TRASHINFO_HEADER: &str = "[Trash Info]";

/// Returns a user-safe, trimmed path string that can be used in logs and messages.
pub fn sanitize_user_path(path: &Path) -> String {
    path.display().to_string().trim().to_string()
}

/// Cleans a raw request: drops empty entries and repeated paths, keeping the
/// first occurrence of each path in its original position.
pub fn normalize_paths<I, P>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<OsStr>,
{
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| !path.as_ref().is_empty())
        .map(|path| PathBuf::from(path.as_ref()))
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

/// Splits a file name into stem and extension (extension keeps its dot).
///
/// Leading dots belong to the stem, so `.bashrc` has no extension and
/// `archive.tar.gz` splits into `archive.tar` and `.gz`.
pub fn split_extension(file_name: &OsStr) -> (OsString, OsString) {
    let Some(name) = file_name.to_str() else {
        return (file_name.to_os_string(), OsString::new());
    };
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name.rfind('.') {
        Some(idx) if idx > leading_dots => (name[..idx].into(), name[idx..].into()),
        _ => (name.into(), OsString::new()),
    }
}

/// Builds the numbered variant `{stem}.{suffix}{extension}` of a file name.
pub fn build_unique_basename(file_name: &OsStr, suffix: u32) -> OsString {
    let (stem, extension) = split_extension(file_name);
    let mut name = stem;
    name.push(format!(".{suffix}"));
    name.push(extension);
    name
}

/// Formats a point in time as a local, second-precision trash deletion date.
pub fn serialize_deletion_date(time: SystemTime) -> String {
    let dt = DateTime::<Local>::from(time);
    dt.format(TRASHINFO_TIME_FORMAT).to_string()
}

/// Percent-encodes an absolute path for the `Path=` key, leaving separators as-is.
pub fn encode_trash_path(path: &Path) -> String {
    path_bytes(path)
        .split(|byte| *byte == b'/')
        .map(urlencoding::encode_binary)
        .collect::<Vec<_>>()
        .join("/")
}

/// Decodes a `Path=` value back into a path.
pub fn decode_trash_path(value: &str) -> Option<PathBuf> {
    let bytes = urlencoding::decode_binary(value.as_bytes());
    bytes_to_path(bytes.into_owned())
}

/// Returns an absolute version of the path with `.` and `..` folded away.
///
/// Symlinks are not resolved, so `link/..` folds to the link's parent.
pub fn absolute_or_relaxed(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    fold_dot_components(&absolute)
}

fn fold_dot_components(path: &Path) -> PathBuf {
    let mut folded = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match folded.components().next_back() {
                Some(Component::Normal(_)) => {
                    folded.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => folded.push(".."),
            },
            other => folded.push(other.as_os_str()),
        }
    }
    folded
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
        Cow::Owned(text) => Cow::Owned(text.into_bytes()),
    }
}

#[cfg(unix)]
fn bytes_to_path(bytes: Vec<u8>) -> Option<PathBuf> {
    use std::os::unix::ffi::OsStringExt;
    Some(PathBuf::from(OsString::from_vec(bytes)))
}

#[cfg(not(unix))]
fn bytes_to_path(bytes: Vec<u8>) -> Option<PathBuf> {
    String::from_utf8(bytes).ok().map(PathBuf::from)
}
