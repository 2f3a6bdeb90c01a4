use super::{FileSystem, WalkEntry, WalkIter};
use crate::error::WalkError;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Cursor, Read, Write};
use std::path::{Component, Path, PathBuf};

/// In-memory filesystem with POSIX-like rename semantics.
///
/// Paths are normalized by dropping `.` components, so `./a.txt` and `a.txt`
/// name the same file. The empty path is the root directory and always exists.
#[derive(Debug, Default)]
pub struct MemFs {
    tree: RefCell<Tree>,
}

#[derive(Debug, Default)]
struct Tree {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file or directory", path.display()),
    )
}

impl Tree {
    fn is_dir(&self, path: &Path) -> bool {
        path.as_os_str().is_empty() || self.dirs.contains(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_dir(path) || self.files.contains_key(path)
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) => self.is_dir(parent),
            None => true,
        }
    }

    fn has_children(&self, dir: &Path) -> bool {
        self.files.keys().any(|p| p != dir && p.starts_with(dir))
            || self.dirs.iter().any(|p| p != dir && p.starts_with(dir))
    }

    fn add_dir_all(&mut self, dir: &Path) {
        let mut current = PathBuf::new();
        for component in dir.components() {
            current.push(component);
            self.dirs.insert(current.clone());
        }
    }
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, creating missing parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = normalize(path.as_ref());
        let mut tree = self.tree.borrow_mut();
        if let Some(parent) = path.parent() {
            tree.add_dir_all(parent);
        }
        tree.files.insert(path, contents.into());
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.tree.borrow_mut().add_dir_all(&normalize(path.as_ref()));
    }

    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Option<String> {
        let tree = self.tree.borrow();
        tree.files
            .get(&normalize(path.as_ref()))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.tree.borrow().exists(&normalize(path.as_ref()))
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.tree.borrow().is_dir(&normalize(path.as_ref()))
    }

    /// All file paths, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.tree.borrow().files.keys().cloned().collect()
    }
}

struct MemWriter<'a> {
    tree: &'a RefCell<Tree>,
    path: PathBuf,
}

impl Write for MemWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut tree = self.tree.borrow_mut();
        match tree.files.get_mut(&self.path) {
            Some(contents) => {
                contents.extend_from_slice(buf);
                Ok(buf.len())
            }
            None => Err(not_found(&self.path)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FileSystem for MemFs {
    fn walk<'a>(&'a self, root: &Path) -> WalkIter<'a> {
        let root = normalize(root);
        let tree = self.tree.borrow();

        if !tree.is_dir(&root) {
            let err = WalkError::new(Some(root.clone()), not_found(&root));
            return Box::new(std::iter::once(Err::<WalkEntry, WalkError>(err)));
        }

        let mut found: BTreeMap<PathBuf, bool> = BTreeMap::new();
        for dir in tree.dirs.iter().filter(|d| **d != root && d.starts_with(&root)) {
            found.insert(dir.clone(), true);
        }
        for file in tree.files.keys().filter(|f| f.starts_with(&root)) {
            found.insert(file.clone(), false);
        }

        // Component-wise path ordering gives depth-first, name-sorted order.
        let entries: Vec<Result<WalkEntry, WalkError>> = found
            .into_iter()
            .map(|(path, is_dir)| {
                let rel = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
                Ok(WalkEntry { path: rel, is_dir })
            })
            .collect();
        Box::new(entries.into_iter())
    }

    fn open<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Read + 'a>> {
        let path = normalize(path);
        let tree = self.tree.borrow();
        if tree.is_dir(&path) {
            return Err(io::Error::other(format!(
                "{}: is a directory",
                path.display()
            )));
        }
        match tree.files.get(&path) {
            Some(contents) => Ok(Box::new(Cursor::new(contents.clone()))),
            None => Err(not_found(&path)),
        }
    }

    fn create<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Write + 'a>> {
        let path = normalize(path);
        let mut tree = self.tree.borrow_mut();
        if tree.is_dir(&path) {
            return Err(io::Error::other(format!(
                "{}: is a directory",
                path.display()
            )));
        }
        if !tree.parent_exists(&path) {
            return Err(not_found(&path));
        }
        tree.files.insert(path.clone(), Vec::new());
        Ok(Box::new(MemWriter {
            tree: &self.tree,
            path,
        }))
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let from = normalize(from);
        let to = normalize(to);
        let mut tree = self.tree.borrow_mut();

        if !tree.exists(&from) || from.as_os_str().is_empty() {
            return Err(not_found(&from));
        }
        if from == to {
            return Ok(());
        }
        if !tree.parent_exists(&to) {
            return Err(not_found(&to));
        }

        if let Some(contents) = tree.files.get(&from).cloned() {
            if tree.is_dir(&to) {
                return Err(io::Error::other(format!("{}: is a directory", to.display())));
            }
            tree.files.remove(&from);
            tree.files.insert(to, contents);
            return Ok(());
        }

        if to.starts_with(&from) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot move {} into itself", from.display()),
            ));
        }
        if tree.files.contains_key(&to) {
            return Err(io::Error::other(format!("{}: not a directory", to.display())));
        }
        if tree.is_dir(&to) && tree.has_children(&to) {
            return Err(io::Error::other(format!("{}: directory not empty", to.display())));
        }

        let moved_dirs: Vec<PathBuf> = tree
            .dirs
            .iter()
            .filter(|d| d.starts_with(&from))
            .cloned()
            .collect();
        for dir in moved_dirs {
            tree.dirs.remove(&dir);
            let suffix = dir.strip_prefix(&from).unwrap_or(Path::new(""));
            tree.dirs.insert(to.join(suffix));
        }

        let moved_files: Vec<PathBuf> = tree
            .files
            .keys()
            .filter(|f| f.starts_with(&from))
            .cloned()
            .collect();
        for file in moved_files {
            if let Some(contents) = tree.files.remove(&file) {
                let suffix = file.strip_prefix(&from).unwrap_or(Path::new(""));
                tree.files.insert(to.join(suffix), contents);
            }
        }
        Ok(())
    }
}
