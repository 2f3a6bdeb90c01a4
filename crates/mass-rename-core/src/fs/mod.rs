//! Filesystem capability used by the listing, mapping and rename stages.

mod memory;
mod os;

pub use memory::MemFs;
pub use os::OsFs;

use crate::error::WalkError;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Entry produced while walking a tree. `path` is relative to the walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl WalkEntry {
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

pub type WalkIter<'a> = Box<dyn Iterator<Item = Result<WalkEntry, WalkError>> + 'a>;

/// The operations mass-rename needs from a filesystem.
pub trait FileSystem {
    /// Walks everything below `root` depth-first, siblings sorted by name.
    /// The root itself is not yielded.
    fn walk<'a>(&'a self, root: &Path) -> WalkIter<'a>;
    fn open<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Read + 'a>>;
    /// Creates or truncates a file.
    fn create<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Write + 'a>>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}
