use log::{info, warn};
use std::path::Path;
use std::process::{Command, ExitStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Editor command is empty")]
    Empty,

    #[error("Editor failed to start: {0}")]
    Spawn(std::io::Error),

    #[error("Editor closed with an error: {0}")]
    Status(ExitStatus),
}

/// Opens `path` in the editor and blocks until it exits. The editor inherits
/// stdin, stdout and stderr. `command` may carry arguments, split on
/// whitespace; the path is appended last.
pub fn open_editor(command: &str, path: &Path) -> Result<(), EditorError> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or(EditorError::Empty)?;
    let args: Vec<&str> = parts.collect();

    if !atty::is(atty::Stream::Stdin) {
        warn!("stdin is not a terminal, '{}' may not be usable", program);
    }

    info!("OPEN: {} {:?} {:?}", program, args, path);
    let status = Command::new(program)
        .args(&args)
        .arg(path)
        .status()
        .map_err(EditorError::Spawn)?;

    if status.success() {
        Ok(())
    } else {
        Err(EditorError::Status(status))
    }
}
