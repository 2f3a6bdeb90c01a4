use crate::error::ListError;
use crate::fs::FileSystem;
use crate::types::RenameEntry;
use glob::Pattern;
use log::{debug, trace, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListSummary {
    /// Lines written to the sink.
    pub written: usize,
    /// Files left out because their name is not valid UTF-8, so it can be
    /// neither matched nor written as a mapping line.
    pub unreadable: Vec<PathBuf>,
}

/// Writes an identity line (`path => path`) for every file under `root` whose
/// base name matches `pattern`. Lines are written as the walk discovers them.
///
/// An invalid pattern matches nothing. A traversal error stops the walk, and
/// whatever was already written to `sink` should be discarded by the caller.
pub fn write_identity_mapping<F, W>(
    fs: &F,
    root: &Path,
    pattern: &str,
    sink: &mut W,
) -> Result<ListSummary, ListError>
where
    F: FileSystem + ?Sized,
    W: Write + ?Sized,
{
    let matcher = match Pattern::new(pattern) {
        Ok(p) => Some(p),
        Err(e) => {
            warn!("Invalid pattern '{}': {}, no files will match", pattern, e);
            None
        }
    };

    let mut summary = ListSummary::default();
    for entry in fs.walk(root) {
        let entry = entry?;
        if entry.is_dir {
            continue;
        }

        let Some(name) = entry.file_name() else {
            warn!("Skipping {:?}: file name is not valid UTF-8", entry.path);
            summary.unreadable.push(entry.path);
            continue;
        };

        let matched = matcher.as_ref().is_some_and(|m| m.matches(name));
        if !matched {
            trace!("Skipping {:?}", entry.path);
            continue;
        }

        let line = RenameEntry::new(entry.path.clone(), entry.path);
        writeln!(sink, "{}", line).map_err(ListError::Write)?;
        summary.written += 1;
    }

    debug!("Listed {} files matching '{}'", summary.written, pattern);
    Ok(summary)
}
