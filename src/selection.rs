//! Adapter from a host's selection objects to the flat path list the engine takes.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// Identity of a file object inside the host's in-memory model.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(pub u64);

/// A host file object; `filename` is absent for files not backed by disk.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HostFile {
    pub id: FileId,
    pub filename: Option<PathBuf>,
}

impl HostFile {
    pub fn new(id: u64, filename: impl Into<PathBuf>) -> Self {
        Self {
            id: FileId(id),
            filename: Some(filename.into()),
        }
    }

    pub fn unsaved(id: u64) -> Self {
        Self {
            id: FileId(id),
            filename: None,
        }
    }
}

/// The closed set of shapes a selected object can take.
#[derive(Debug, Clone)]
pub enum SelectionItem {
    /// A file object.
    File(HostFile),
    /// An album, cluster or similar container with linked files.
    Container { kind: String, files: Vec<HostFile> },
    /// An object wrapping at most one file, such as a track.
    Wrapper { kind: String, file: Option<HostFile> },
    /// Anything else the host lets users select.
    Unsupported { kind: String },
    /// A hole in the selection.
    Empty,
}

impl SelectionItem {
    pub fn kind(&self) -> &str {
        match self {
            Self::File(_) => "File",
            Self::Container { kind, .. } | Self::Wrapper { kind, .. } | Self::Unsupported { kind } => kind,
            Self::Empty => "<empty>",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResolveOutcome {
    Skipped,
    File,
    Container,
    Wrapper,
    Unhandled,
}

/// How one selected object was resolved, for diagnostics.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SelectionDiagnostic {
    pub kind: String,
    pub outcome: ResolveOutcome,
    pub detail: String,
}

/// Unique files and paths found in a selection.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSelection {
    pub files: Vec<HostFile>,
    pub paths: Vec<PathBuf>,
    pub diagnostics: Vec<SelectionDiagnostic>,
}

impl ResolvedSelection {
    fn add(&mut self, file: &HostFile, seen_paths: &mut HashSet<PathBuf>, seen_ids: &mut HashSet<FileId>) -> usize {
        let Some(path) = file.filename.as_ref().filter(|p| !p.as_os_str().is_empty()) else {
            return 0;
        };
        let added = usize::from(seen_paths.insert(path.clone()));
        if added == 1 {
            self.paths.push(path.clone());
        }
        if seen_ids.insert(file.id) {
            self.files.push(file.clone());
        }
        added
    }

    fn note(&mut self, kind: &str, outcome: ResolveOutcome, detail: impl Into<String>) {
        self.diagnostics.push(SelectionDiagnostic {
            kind: kind.to_string(),
            outcome,
            detail: detail.into(),
        });
    }

    /// Host files whose path ended up in `trashed`.
    pub fn files_for(&self, trashed: &[PathBuf]) -> Vec<HostFile> {
        let trashed: HashSet<&PathBuf> = trashed.iter().collect();
        self.files
            .iter()
            .filter(|file| file.filename.as_ref().is_some_and(|p| trashed.contains(p)))
            .cloned()
            .collect()
    }
}

/// Flattens a selection into unique paths (first occurrence wins).
pub fn resolve_selection(items: &[SelectionItem]) -> ResolvedSelection {
    let mut resolved = ResolvedSelection::default();
    let mut seen_paths = HashSet::new();
    let mut seen_ids = HashSet::new();

    for item in items {
        let kind = item.kind();
        match item {
            SelectionItem::Empty => {
                resolved.note(kind, ResolveOutcome::Skipped, "empty entry in selection");
            }
            SelectionItem::File(file) => {
                let added = resolved.add(file, &mut seen_paths, &mut seen_ids);
                resolved.note(kind, ResolveOutcome::File, format!("added {added} path(s)"));
            }
            SelectionItem::Container { files, .. } => {
                let added: usize = files
                    .iter()
                    .map(|file| resolved.add(file, &mut seen_paths, &mut seen_ids))
                    .sum();
                resolved.note(kind, ResolveOutcome::Container, format!("added {added} path(s)"));
            }
            SelectionItem::Wrapper { file: Some(file), .. } => {
                let added = resolved.add(file, &mut seen_paths, &mut seen_ids);
                resolved.note(kind, ResolveOutcome::Wrapper, format!("added {added} path(s)"));
            }
            SelectionItem::Wrapper { file: None, .. } | SelectionItem::Unsupported { .. } => {
                resolved.note(kind, ResolveOutcome::Unhandled, "no files attached to object");
            }
        }
    }
    resolved
}

/// Number of selected objects per kind.
pub fn kind_counts(items: &[SelectionItem]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item.kind().to_string()).or_insert(0) += 1;
    }
    counts
}
