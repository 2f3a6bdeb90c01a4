use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A line of the mapping document that could not be turned into an entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: missing ' => ' separator in '{content}'")]
    MissingSeparator { line: usize, content: String },

    #[error("line {line}: expected one ' => ' separator, found {separators} in '{content}'")]
    TooManyFields {
        line: usize,
        separators: usize,
        content: String,
    },

    #[error("line {line}: empty path in '{content}'")]
    EmptyField { line: usize, content: String },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::MissingSeparator { line, .. }
            | ParseError::TooManyFields { line, .. }
            | ParseError::EmptyField { line, .. } => *line,
        }
    }
}

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("failed to read mapping")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Traversal failure while walking the directory tree.
#[derive(Debug, Error)]
#[error("{}", describe_walk(.path))]
pub struct WalkError {
    pub path: Option<PathBuf>,
    #[source]
    pub source: io::Error,
}

fn describe_walk(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "directory walk".to_string(),
    }
}

impl WalkError {
    pub fn new(path: Option<PathBuf>, source: io::Error) -> Self {
        Self { path, source }
    }
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("failed to write mapping line")]
    Write(#[source] io::Error),
}

/// Per-entry rename failure. Displays the filesystem error untouched.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct RenameError {
    pub old: PathBuf,
    pub new: PathBuf,
    #[source]
    pub source: io::Error,
}

impl RenameError {
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}
