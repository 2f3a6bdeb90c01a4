use crate::types::RenameEntry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// A mapping shape that sequential renaming will not handle the way a user
/// probably expects. Entries are named by their paths, so the message reads
/// the same whether or not unchanged entries are shown next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// Two entries move different files onto the same path.
    DuplicateTarget {
        first: RenameEntry,
        second: RenameEntry,
    },
    /// `writer` lands on a path before `renamed_later` has moved the file
    /// there away, so that file's original contents are replaced. Swaps and
    /// longer cycles always produce at least one of these.
    OverwritesPending {
        writer: RenameEntry,
        renamed_later: RenameEntry,
    },
    /// `writer` lands on a path that the mapping lists as unchanged.
    OverwritesKept { writer: RenameEntry, kept: PathBuf },
}

fn quoted(entry: &RenameEntry) -> String {
    format!("'{}' => '{}'", entry.old.display(), entry.new.display())
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::DuplicateTarget { first, second } => write!(
                f,
                "{} and {} rename to the same path, the later one wins",
                quoted(first),
                quoted(second)
            ),
            Conflict::OverwritesPending {
                writer,
                renamed_later,
            } => write!(
                f,
                "{} runs before {}, the original contents of '{}' will be lost",
                quoted(writer),
                quoted(renamed_later),
                writer.new.display()
            ),
            Conflict::OverwritesKept { writer, kept } => write!(
                f,
                "{} replaces '{}', which the mapping keeps unchanged",
                quoted(writer),
                kept.display()
            ),
        }
    }
}

/// Scans a mapping for duplicate destinations and rename chains that run in
/// the wrong order. Nothing is reordered.
pub fn find_conflicts(entries: &[RenameEntry]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let mut targets: HashMap<&Path, usize> = HashMap::new();
    let mut sources: HashMap<&Path, usize> = HashMap::new();
    let mut kept: HashSet<&Path> = HashSet::new();

    for (i, entry) in entries.iter().enumerate() {
        if entry.is_identity() {
            kept.insert(entry.old.as_path());
        } else {
            sources.entry(entry.old.as_path()).or_insert(i);
        }
    }

    for (i, entry) in entries.iter().enumerate() {
        if entry.is_identity() {
            continue;
        }

        match targets.get(entry.new.as_path()) {
            Some(&first) => conflicts.push(Conflict::DuplicateTarget {
                first: entries[first].clone(),
                second: entry.clone(),
            }),
            None => {
                targets.insert(entry.new.as_path(), i);
            }
        }

        if let Some(&later) = sources.get(entry.new.as_path()) {
            if later > i {
                conflicts.push(Conflict::OverwritesPending {
                    writer: entry.clone(),
                    renamed_later: entries[later].clone(),
                });
            }
        }

        if kept.contains(entry.new.as_path()) {
            conflicts.push(Conflict::OverwritesKept {
                writer: entry.clone(),
                kept: entry.new.clone(),
            });
        }
    }

    conflicts
}
