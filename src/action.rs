//! "Send to Recycle Bin" host action: selection in, user feedback and model cleanup out.

use crate::config::{Settings, TrashContext};
use crate::dispatch::TrashDispatcher;
use crate::models::TrashOutcome;
use crate::selection::{kind_counts, resolve_selection, HostFile, SelectionItem};

/// Answer to "send N file(s) to the Recycle Bin?".
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ConfirmDecision {
    pub confirmed: bool,
    /// Turn the confirmation policy off for future runs.
    pub dont_ask_again: bool,
}

impl ConfirmDecision {
    pub fn yes() -> Self {
        Self {
            confirmed: true,
            dont_ask_again: false,
        }
    }

    pub fn no() -> Self {
        Self {
            confirmed: false,
            dont_ask_again: false,
        }
    }
}

/// Host UI hook asking the user to confirm a trash request.
pub trait Confirmer {
    fn confirm(&mut self, count: usize) -> ConfirmDecision;
}

/// Host hook dropping trashed files from its in-memory model.
pub trait FileRemover {
    fn remove_files(&mut self, files: &[HostFile]) -> crate::Result<()>;
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ActionStatus {
    /// Nothing in the selection maps to a file on disk.
    NoPaths,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone)]
pub struct ActionReport {
    pub status: ActionStatus,
    pub outcome: TrashOutcome,
    /// Host files handed to the [`FileRemover`].
    pub removed: Vec<HostFile>,
}

impl ActionReport {
    fn idle(status: ActionStatus) -> Self {
        Self {
            status,
            outcome: TrashOutcome::new(),
            removed: Vec::new(),
        }
    }
}

pub struct SendToTrashAction<'a> {
    dispatcher: TrashDispatcher<'a>,
    ctx: TrashContext,
    settings: Settings,
}

impl<'a> SendToTrashAction<'a> {
    pub const TITLE: &'static str = "Send to Recycle Bin";

    pub fn new(dispatcher: TrashDispatcher<'a>, ctx: TrashContext, settings: Settings) -> Self {
        Self {
            dispatcher,
            ctx,
            settings,
        }
    }

    /// Current policy, including a "don't ask again" chosen during [`Self::run`].
    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn run(
        &mut self,
        items: &[SelectionItem],
        confirmer: &mut dyn Confirmer,
        remover: Option<&mut dyn FileRemover>,
    ) -> ActionReport {
        let resolved = resolve_selection(items);
        if resolved.paths.is_empty() {
            log::debug!(
                "recycle-bin: no file paths in selection (types={:?}, details={:?})",
                kind_counts(items),
                resolved.diagnostics
            );
            return ActionReport::idle(ActionStatus::NoPaths);
        }

        if self.settings.confirm_trash {
            let decision = confirmer.confirm(resolved.paths.len());
            if !decision.confirmed {
                log::debug!("recycle-bin: user cancelled");
                return ActionReport::idle(ActionStatus::Cancelled);
            }
            if decision.dont_ask_again {
                self.settings.confirm_trash = false;
                log::debug!("recycle-bin: user disabled future confirmation prompts");
            }
        }

        let outcome = match self.dispatcher.trash(&resolved.paths, &self.ctx) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("recycle-bin: trash unavailable: {err}");
                TrashOutcome::all_failed(resolved.paths.clone())
            }
        };

        log::info!("recycle-bin: sent {} file(s) to trash", outcome.succeeded.len());
        if !outcome.failed.is_empty() {
            log::error!("recycle-bin: failed to trash {} file(s)", outcome.failed.len());
            log::debug!("recycle-bin: failed paths={:?}", outcome.failed);
        }

        let to_remove = resolved.files_for(&outcome.succeeded);
        let removed = if to_remove.is_empty() {
            if !outcome.succeeded.is_empty() {
                log::debug!(
                    "recycle-bin: trashed files could not be mapped back to host files (ok={:?})",
                    outcome.succeeded
                );
            }
            Vec::new()
        } else {
            match remover {
                Some(remover) => match remover.remove_files(&to_remove) {
                    Ok(()) => {
                        log::debug!("recycle-bin: removed {} file(s) from the host", to_remove.len());
                        to_remove
                    }
                    Err(err) => {
                        log::warn!("recycle-bin: trashed files but failed to remove them from the host: {err}");
                        Vec::new()
                    }
                },
                None => {
                    log::debug!("recycle-bin: trashed files but the host cannot remove them");
                    Vec::new()
                }
            }
        };

        ActionReport {
            status: ActionStatus::Completed,
            outcome,
            removed,
        }
    }
}
