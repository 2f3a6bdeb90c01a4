use super::{FileSystem, WalkEntry, WalkIter};
use crate::error::WalkError;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Filesystem backed by the operating system.
#[derive(Debug, Clone, Default)]
pub struct OsFs {
    base: Option<PathBuf>,
}

impl OsFs {
    /// Relative paths resolve against the process working directory.
    pub fn new() -> Self {
        Self { base: None }
    }

    /// Relative paths resolve against `base`. Absolute paths are used as is.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base {
            Some(base) => base.join(path),
            None => path.to_path_buf(),
        }
    }
}

impl FileSystem for OsFs {
    fn walk<'a>(&'a self, root: &Path) -> WalkIter<'a> {
        let root = self.resolve(root);
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        Box::new(walker.into_iter().map(move |item| match item {
            Ok(entry) => {
                let rel = entry
                    .path()
                    .strip_prefix(&root)
                    .unwrap_or(entry.path())
                    .to_path_buf();
                Ok(WalkEntry {
                    path: rel,
                    is_dir: entry.file_type().is_dir(),
                })
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf);
                Err(WalkError::new(path, io::Error::from(e)))
            }
        }))
    }

    fn open<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Read + 'a>> {
        Ok(Box::new(File::open(self.resolve(path))?))
    }

    fn create<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Write + 'a>> {
        Ok(Box::new(BufWriter::new(File::create(self.resolve(path))?)))
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(self.resolve(from), self.resolve(to))
    }
}
