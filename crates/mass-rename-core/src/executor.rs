use crate::error::RenameError;
use crate::fs::FileSystem;
use crate::types::{RenameEntry, RenameOutcome};
use log::{debug, info, warn};

/// Per-entry outcomes of a batch, in mapping order.
#[derive(Debug, Default)]
pub struct RenameReport {
    pub outcomes: Vec<RenameOutcome>,
}

impl RenameReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &RenameError> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }
}

/// Renames every entry in order. A failed entry is recorded and the batch
/// moves on; renames that already happened are left in place.
pub fn rename_all<F>(fs: &F, entries: &[RenameEntry]) -> RenameReport
where
    F: FileSystem + ?Sized,
{
    let mut outcomes = Vec::with_capacity(entries.len());

    for (i, entry) in entries.iter().enumerate() {
        debug!("Rename #{}: {}", i + 1, entry);
        let outcome = fs.rename(&entry.old, &entry.new).map_err(|source| {
            warn!("Rename #{} failed ({}): {}", i + 1, entry, source);
            RenameError {
                old: entry.old.clone(),
                new: entry.new.clone(),
                source,
            }
        });
        outcomes.push(outcome);
    }

    let report = RenameReport { outcomes };
    info!(
        "Renamed {} of {} entries ({} failed)",
        report.succeeded(),
        report.len(),
        report.failed()
    );
    report
}
