use crate::error::{MappingError, ParseError};
use crate::types::RenameEntry;
use log::{debug, trace};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub const SEPARATOR: &str = " => ";

/// Parses a mapping document into entries, keeping line order.
///
/// Blank lines are skipped. The first malformed line fails the whole parse,
/// so callers never see a partial mapping.
pub fn parse_mapping<R: BufRead>(reader: R) -> Result<Vec<RenameEntry>, MappingError> {
    let mut entries = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        trace!("Mapping line {}: '{}'", i + 1, line);
        if let Some(entry) = parse_line(i + 1, &line)? {
            entries.push(entry);
        }
    }

    debug!("Parsed {} mapping entries", entries.len());
    Ok(entries)
}

/// Parses a single line. `Ok(None)` means the line was blank.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<RenameEntry>, ParseError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let parts: Vec<&str> = line.split(SEPARATOR).collect();
    match parts.len() {
        1 => {
            return Err(ParseError::MissingSeparator {
                line: line_no,
                content: line.to_string(),
            })
        }
        2 => {}
        n => {
            return Err(ParseError::TooManyFields {
                line: line_no,
                separators: n - 1,
                content: line.to_string(),
            })
        }
    }

    let old = parts[0].trim();
    let new = parts[1].trim();
    if old.is_empty() || new.is_empty() {
        return Err(ParseError::EmptyField {
            line: line_no,
            content: line.to_string(),
        });
    }

    Ok(Some(RenameEntry {
        old: PathBuf::from(old),
        new: PathBuf::from(new),
    }))
}

pub fn write_mapping<W: Write>(sink: &mut W, entries: &[RenameEntry]) -> io::Result<()> {
    for entry in entries {
        writeln!(sink, "{}", entry)?;
    }
    Ok(())
}
