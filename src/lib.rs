//! Send files to the operating system's trash.
//!
//! Windows goes through the shell's undoable batched delete, macOS moves
//! files into `~/.Trash`, and every other Unix uses the freedesktop.org home
//! trash with a `.trashinfo` record per file. Every request comes back as a
//! [`TrashOutcome`] partition of succeeded and failed paths.

pub mod action;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod fs;
pub mod helpers;
pub mod models;
pub mod movers;
pub mod naming;
pub mod selection;

pub use action::{ActionReport, ActionStatus, ConfirmDecision, Confirmer, FileRemover, SendToTrashAction};
pub use config::{EnvVarMap, Settings, TrashContext};
pub use dispatch::{send_paths_to_trash, TrashDispatcher};
pub use errors::{CoreError, Result};
pub use fs::{FileSystem, RealFileSystem};
pub use helpers::{
    decode_trash_path,
    encode_trash_path,
    normalize_paths,
    sanitize_user_path,
    serialize_deletion_date,
    TRASHINFO_EXTENSION,
    TRASHINFO_TIME_FORMAT,
};
pub use models::{ExitStatusLike, Platform, TrashDirectory, TrashInfoRecord, TrashOutcome};
pub use movers::{PlatformMover, ShellFileOperation, ShellOpStatus};
pub use naming::unique_destination;
pub use selection::{resolve_selection, FileId, HostFile, SelectionItem};

/// Re-export a small stable API surface for host integrations.
pub mod prelude {
    pub use crate::{
        action::*,
        config::*,
        dispatch::*,
        errors::{CoreError, Result},
        fs::{FileSystem, RealFileSystem},
        helpers::*,
        models::*,
        selection::*,
    };
}
