use super::{log_failure, trashable_name, PlatformMover};
use crate::config::TrashContext;
use crate::errors::CoreError;
use crate::fs::FileSystem;
use crate::helpers::{absolute_or_relaxed, sanitize_user_path, serialize_deletion_date, TRASHINFO_EXTENSION};
use crate::models::{Platform, TrashDirectory, TrashInfoRecord, TrashOutcome};
use crate::naming::first_free_slot;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// freedesktop.org home trash: data in `files/`, a `.trashinfo` record per item in `info/`.
pub struct FreedesktopMover<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> FreedesktopMover<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    fn trash_one(
        &self,
        trash: &TrashDirectory,
        path: &Path,
        deletion_date: &str,
    ) -> crate::Result<PathBuf> {
        let name = trashable_name(self.fs, path)?;
        let original = absolute_or_relaxed(path);

        // A slot is free only when neither the data file nor its record exists.
        let dest = first_free_slot(&trash.files_dir, name, |candidate| {
            self.fs.exists(candidate) || self.fs.exists(&info_path_for(trash, candidate))
        })?;
        self.fs.move_path(path, &dest)?;

        let info_path = info_path_for(trash, &dest);
        let record = TrashInfoRecord::new(original, deletion_date);
        if let Err(err) = self.fs.write_new(&info_path, &record.render()) {
            let err = as_metadata_error(err);
            self.roll_back(path, &dest, &info_path, &err);
            return Err(err);
        }
        Ok(dest)
    }

    /// Puts a moved file back after its record could not be written.
    fn roll_back(&self, original: &Path, dest: &Path, info_path: &Path, err: &CoreError) {
        let record_was_ours = err
            .io_error()
            .map_or(true, |io_err| io_err.kind() != io::ErrorKind::AlreadyExists);
        if record_was_ours && self.fs.exists(info_path) {
            if let Err(cleanup_err) = self.fs.remove_file(info_path) {
                log::warn!(
                    "recycle-bin: could not remove partial trash info {}: {cleanup_err}",
                    info_path.display()
                );
            }
        }

        if self.fs.exists(original) {
            log::warn!(
                "recycle-bin: {} reappeared, leaving trashed copy at {}",
                sanitize_user_path(original),
                dest.display()
            );
            return;
        }
        if let Err(rollback_err) = self.fs.move_path(dest, original) {
            log::warn!(
                "recycle-bin: could not restore {} after failed trash info write, file stays at {}: {rollback_err}",
                sanitize_user_path(original),
                dest.display()
            );
        }
    }
}

impl PlatformMover for FreedesktopMover<'_> {
    fn platform(&self) -> Platform {
        Platform::Freedesktop
    }

    fn trash(&self, paths: &[PathBuf], ctx: &TrashContext) -> crate::Result<TrashOutcome> {
        let trash = ctx.freedesktop_trash_dir()?;
        self.fs.create_dir_all(&trash.files_dir)?;
        self.fs.create_dir_all(&trash.info_dir)?;

        let now = ctx.now.map(SystemTime::from).unwrap_or_else(|| self.fs.now());
        let deletion_date = serialize_deletion_date(now);

        let mut outcome = TrashOutcome::new();
        for path in paths {
            match self.trash_one(&trash, path, &deletion_date) {
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

/// `info/{name}.trashinfo` for a data file in `files/`.
fn info_path_for(trash: &TrashDirectory, data_file: &Path) -> PathBuf {
    let mut name = data_file
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(TRASHINFO_EXTENSION);
    trash.info_dir.join(name)
}

fn as_metadata_error(err: CoreError) -> CoreError {
    match err {
        CoreError::Io(path, source) => CoreError::MetadataWrite(path, source),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::RealFileSystem;
    use crate::helpers::decode_trash_path;
    use crate::movers::test_support::Unreliable;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use std::fs;

    fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 15).unwrap()
    }

    fn context(home: &Path) -> TrashContext {
        TrashContext::new().with_home(home).with_clock(clock())
    }

    fn read_record(path: &Path) -> (PathBuf, String) {
        let contents = fs::read_to_string(path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("[Trash Info]"));
        let original = lines
            .next()
            .and_then(|line| line.strip_prefix("Path="))
            .and_then(decode_trash_path)
            .unwrap();
        let date = lines
            .next()
            .and_then(|line| line.strip_prefix("DeletionDate="))
            .unwrap()
            .to_string();
        (original, date)
    }

    #[test]
    fn trashed_file_gets_data_and_info_entries() {
        let home = tempfile::tempdir().unwrap();
        let song = home.path().join("song.mp3");
        fs::write(&song, b"la").unwrap();

        let outcome = FreedesktopMover::new(&RealFileSystem)
            .trash(&[song.clone()], &context(home.path()))
            .unwrap();

        let trash = home.path().join(".local/share/Trash");
        assert_eq!(outcome.succeeded, vec![song.clone()]);
        assert_eq!(fs::read(trash.join("files/song.mp3")).unwrap(), b"la");

        let (original, date) = read_record(&trash.join("info/song.mp3.trashinfo"));
        assert_eq!(original, song);
        assert_eq!(
            date,
            clock().with_timezone(&Local).format("%Y-%m-%dT%H:%M:%S").to_string()
        );
    }

    #[test]
    fn same_base_name_never_overwrites_earlier_entries() {
        let home = tempfile::tempdir().unwrap();
        let first_dir = home.path().join("a");
        let second_dir = home.path().join("b");
        fs::create_dir_all(&first_dir).unwrap();
        fs::create_dir_all(&second_dir).unwrap();
        let first = first_dir.join("song.mp3");
        let second = second_dir.join("song.mp3");
        fs::write(&first, b"first").unwrap();
        fs::write(&second, b"second").unwrap();

        let mover = FreedesktopMover::new(&RealFileSystem);
        mover.trash(&[first.clone()], &context(home.path())).unwrap();
        mover.trash(&[second.clone()], &context(home.path())).unwrap();

        let trash = home.path().join(".local/share/Trash");
        assert_eq!(fs::read(trash.join("files/song.mp3")).unwrap(), b"first");
        assert_eq!(fs::read(trash.join("files/song.1.mp3")).unwrap(), b"second");
        assert_eq!(read_record(&trash.join("info/song.mp3.trashinfo")).0, first);
        assert_eq!(read_record(&trash.join("info/song.1.mp3.trashinfo")).0, second);
    }

    #[test]
    fn orphaned_info_record_reserves_its_name() {
        let home = tempfile::tempdir().unwrap();
        let info_dir = home.path().join(".local/share/Trash/info");
        fs::create_dir_all(&info_dir).unwrap();
        fs::write(info_dir.join("song.mp3.trashinfo"), "[Trash Info]\n").unwrap();
        let song = home.path().join("song.mp3");
        fs::write(&song, b"la").unwrap();

        let outcome = FreedesktopMover::new(&RealFileSystem)
            .trash(&[song.clone()], &context(home.path()))
            .unwrap();

        assert_eq!(outcome.succeeded, vec![song]);
        assert!(home.path().join(".local/share/Trash/files/song.1.mp3").exists());
        assert_eq!(
            fs::read_to_string(info_dir.join("song.mp3.trashinfo")).unwrap(),
            "[Trash Info]\n"
        );
    }

    #[test]
    fn dot_segments_are_folded_out_of_the_recorded_path() {
        let home = tempfile::tempdir().unwrap();
        let music = home.path().join("u");
        fs::create_dir_all(&music).unwrap();
        fs::write(music.join("song.mp3"), b"la").unwrap();
        let winding = home.path().join("u").join("..").join("u").join(".").join("song.mp3");

        let outcome = FreedesktopMover::new(&RealFileSystem)
            .trash(&[winding.clone()], &context(home.path()))
            .unwrap();

        assert_eq!(outcome.succeeded, vec![winding]);
        let info = home.path().join(".local/share/Trash/info/song.mp3.trashinfo");
        assert_eq!(read_record(&info).0, music.join("song.mp3"));
    }

    #[cfg(unix)]
    #[test]
    fn relative_paths_are_recorded_as_absolute() {
        let home = tempfile::tempdir().unwrap();
        fs::write(home.path().join("song.mp3"), b"la").unwrap();

        // Climb from the working directory to `/`, then back down into the temp dir.
        let cwd = std::env::current_dir().unwrap().canonicalize().unwrap();
        let mut relative: PathBuf = cwd.components().skip(1).map(|_| "..").collect();
        relative.push(home.path().strip_prefix("/").unwrap());
        relative.push("song.mp3");
        assert!(relative.is_relative());

        let outcome = FreedesktopMover::new(&RealFileSystem)
            .trash(&[relative.clone()], &context(home.path()))
            .unwrap();

        assert_eq!(outcome.succeeded, vec![relative]);
        let info = home.path().join(".local/share/Trash/info/song.mp3.trashinfo");
        let (original, _) = read_record(&info);
        assert!(original.is_absolute());
        assert!(!original
            .components()
            .any(|c| c == std::path::Component::ParentDir));
        assert!(original.ends_with(home.path().strip_prefix("/").unwrap().join("song.mp3")));
    }

    #[test]
    fn missing_paths_fail_and_leave_trash_empty() {
        let home = tempfile::tempdir().unwrap();
        let ghost = home.path().join("ghost.ogg");

        let outcome = FreedesktopMover::new(&RealFileSystem)
            .trash(&[ghost.clone()], &context(home.path()))
            .unwrap();

        assert_eq!(outcome.failed, vec![ghost]);
        let files = home.path().join(".local/share/Trash/files");
        assert_eq!(fs::read_dir(files).unwrap().count(), 0);
    }

    /// Real filesystem whose metadata writes always fail.
    struct ReadOnlyInfo;

    impl FileSystem for ReadOnlyInfo {
        fn now(&self) -> SystemTime {
            RealFileSystem.now()
        }
        fn exists(&self, path: &Path) -> bool {
            RealFileSystem.exists(path)
        }
        fn create_dir_all(&self, path: &Path) -> crate::Result<()> {
            RealFileSystem.create_dir_all(path)
        }
        fn move_path(&self, from: &Path, to: &Path) -> crate::Result<()> {
            RealFileSystem.move_path(from, to)
        }
        fn write_new(&self, path: &Path, _: &str) -> crate::Result<()> {
            Err(CoreError::io(path, io::Error::from(io::ErrorKind::PermissionDenied)))
        }
        fn remove_file(&self, path: &Path) -> crate::Result<()> {
            RealFileSystem.remove_file(path)
        }
    }

    #[test]
    fn failed_info_write_reports_failure_and_restores_the_file() {
        let home = tempfile::tempdir().unwrap();
        let song = home.path().join("song.mp3");
        fs::write(&song, b"la").unwrap();

        let outcome = FreedesktopMover::new(&ReadOnlyInfo)
            .trash(&[song.clone()], &context(home.path()))
            .unwrap();

        assert!(outcome.succeeded.is_empty());
        assert_eq!(outcome.failed, vec![song.clone()]);
        assert_eq!(fs::read(&song).unwrap(), b"la");
        assert!(!home.path().join(".local/share/Trash/files/song.mp3").exists());
    }

    /// Leaves a half-written record behind and refuses to delete it.
    struct StuckPartialInfo;

    impl FileSystem for StuckPartialInfo {
        fn now(&self) -> SystemTime {
            RealFileSystem.now()
        }
        fn exists(&self, path: &Path) -> bool {
            RealFileSystem.exists(path)
        }
        fn create_dir_all(&self, path: &Path) -> crate::Result<()> {
            RealFileSystem.create_dir_all(path)
        }
        fn move_path(&self, from: &Path, to: &Path) -> crate::Result<()> {
            RealFileSystem.move_path(from, to)
        }
        fn write_new(&self, path: &Path, _: &str) -> crate::Result<()> {
            RealFileSystem.write_new(path, "[Trash Info]\n")?;
            Err(CoreError::io(path, io::Error::from(io::ErrorKind::WriteZero)))
        }
        fn remove_file(&self, path: &Path) -> crate::Result<()> {
            Err(CoreError::io(path, io::Error::from(io::ErrorKind::PermissionDenied)))
        }
    }

    #[test]
    fn failed_record_cleanup_still_restores_the_file() {
        let home = tempfile::tempdir().unwrap();
        let song = home.path().join("song.mp3");
        fs::write(&song, b"la").unwrap();

        let outcome = FreedesktopMover::new(&StuckPartialInfo)
            .trash(&[song.clone()], &context(home.path()))
            .unwrap();

        assert_eq!(outcome.failed, vec![song.clone()]);
        assert_eq!(fs::read(&song).unwrap(), b"la");
        assert!(home
            .path()
            .join(".local/share/Trash/info/song.mp3.trashinfo")
            .exists());
    }

    #[test]
    fn move_and_naming_errors_stay_with_their_file() {
        let home = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = ["a.mp3", "locked.mp3", "crowded.mp3", "b.mp3"]
            .iter()
            .map(|name| {
                let path = home.path().join(name);
                fs::write(&path, name.as_bytes()).unwrap();
                path
            })
            .collect();
        let fs_double = Unreliable {
            locked: paths[1].clone(),
            crowded_prefix: "crowded",
        };

        let outcome = FreedesktopMover::new(&fs_double)
            .trash(&paths, &context(home.path()))
            .unwrap();

        assert_eq!(outcome.succeeded, vec![paths[0].clone(), paths[3].clone()]);
        assert_eq!(outcome.failed, vec![paths[1].clone(), paths[2].clone()]);
        assert!(paths[1].exists() && paths[2].exists());
        let trash = home.path().join(".local/share/Trash");
        assert!(trash.join("files/a.mp3").exists() && trash.join("info/b.mp3.trashinfo").exists());
        assert!(!trash.join("info/locked.mp3.trashinfo").exists());
    }

    #[test]
    fn metadata_errors_are_classified() {
        let err = as_metadata_error(CoreError::io("/t/info/a.trashinfo", io::Error::from(io::ErrorKind::Other)));
        assert!(matches!(err, CoreError::MetadataWrite(_, _)));
    }
}
