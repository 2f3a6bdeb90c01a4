use crate::error::RenameError;
use crate::mapping::SEPARATOR;
use std::fmt;
use std::path::PathBuf;

/// One requested rename, in the order it appeared in the mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEntry {
    pub old: PathBuf,
    pub new: PathBuf,
}

impl RenameEntry {
    pub fn new(old: impl Into<PathBuf>, new: impl Into<PathBuf>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    /// An entry that leaves the file where it is.
    pub fn is_identity(&self) -> bool {
        self.old == self.new
    }
}

impl fmt::Display for RenameEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.old.display(), SEPARATOR, self.new.display())
    }
}

pub type RenameOutcome = Result<(), RenameError>;
