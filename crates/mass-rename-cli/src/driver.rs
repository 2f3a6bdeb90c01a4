use crate::config::{Mode, Settings};
use crate::editor::open_editor;
use crate::prompt::confirm;
use anyhow::{Context, Result};
use log::{debug, info};
use mass_rename_core::{
    find_conflicts, parse_mapping, rename_all, write_identity_mapping, FileSystem, ListError,
    RenameEntry,
};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

const WALK_ROOT: &str = ".";

/// One full run: produce or read the mapping, preview it, confirm, rename.
///
/// Errors returned from here happen before any file was renamed. Once the
/// batch starts, failures are printed per entry and the run still succeeds.
pub fn run<F>(
    settings: &Settings,
    fs: &F,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()>
where
    F: FileSystem + ?Sized,
{
    let entries = match &settings.mode {
        Mode::Generate(path) => {
            let count = write_listing(fs, path, &settings.pattern)?;
            info!("Wrote {} entries to {:?}", count, path);
            return Ok(());
        }
        Mode::Apply(path) => read_mapping(fs, path)?,
        Mode::Interactive => {
            let tmp = tempfile::Builder::new()
                .suffix(".mass-rename")
                .tempfile()
                .context("Failed to create temporary file")?;

            let count = write_listing(fs, tmp.path(), &settings.pattern)?;
            debug!("Listed {} files into {:?}", count, tmp.path());

            open_editor(&settings.editor, tmp.path())?;
            // Re-open by path: editors often replace the file instead of
            // writing into it.
            read_mapping(fs, tmp.path())?
        }
    };

    let conflicts = find_conflicts(&entries);
    let total = entries.len();
    let entries: Vec<RenameEntry> = entries.into_iter().filter(|e| !e.is_identity()).collect();
    debug!("{} of {} entries leave the file unchanged", total - entries.len(), total);

    if entries.is_empty() {
        writeln!(out, "No files to rename")?;
        return Ok(());
    }

    writeln!(out, "Renaming:")?;
    for entry in &entries {
        writeln!(
            out,
            "- '{}' => '{}'",
            entry.old.display(),
            entry.new.display()
        )?;
    }
    writeln!(out)?;

    if !conflicts.is_empty() {
        for conflict in &conflicts {
            writeln!(out, "Warning: {}", conflict)?;
        }
        writeln!(out)?;
    }

    if settings.dry_run {
        writeln!(out, "Dry run, no files were renamed")?;
        return Ok(());
    }

    if !settings.assume_yes && !confirm(input, out).context("Failed to read user question")? {
        writeln!(out, "Stopping here")?;
        return Ok(());
    }

    let report = rename_all(fs, &entries);
    for failure in report.failures() {
        writeln!(
            out,
            "Error '{}' => '{}': {}",
            failure.old.display(),
            failure.new.display(),
            failure
        )?;
    }
    writeln!(out, "Finished successfully")?;
    Ok(())
}

/// Collects the whole listing before touching `path`, so a failed walk never
/// leaves a partial mapping behind.
fn write_listing<F>(fs: &F, path: &Path, pattern: &str) -> Result<usize>
where
    F: FileSystem + ?Sized,
{
    let mut listing = Vec::new();
    let summary = write_identity_mapping(fs, Path::new(WALK_ROOT), pattern, &mut listing)
        .map_err(|e| match e {
            ListError::Walk(_) => anyhow::Error::new(e).context("Failed to walk files"),
            ListError::Write(_) => anyhow::Error::new(e).context("Failed to build mapping"),
        })?;
    if !summary.unreadable.is_empty() {
        info!(
            "{} files were left out of the mapping, see warnings above",
            summary.unreadable.len()
        );
    }

    let mut sink = fs
        .create(path)
        .with_context(|| format!("Failed to write to generated mapping file {:?}", path))?;
    sink.write_all(&listing)
        .and_then(|_| sink.flush())
        .with_context(|| format!("Failed to write to generated mapping file {:?}", path))?;
    Ok(summary.written)
}

fn read_mapping<F>(fs: &F, path: &Path) -> Result<Vec<RenameEntry>>
where
    F: FileSystem + ?Sized,
{
    let reader = fs
        .open(path)
        .with_context(|| format!("Failed to read mapping file {:?}", path))?;
    parse_mapping(BufReader::new(reader)).context("Failed to parse map file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EDITOR;
    use mass_rename_core::fs::WalkIter;
    use mass_rename_core::{MemFs, OsFs, WalkEntry, WalkError};
    use std::fs;
    use std::io::{self, Cursor, Read};
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn settings(mode: Mode) -> Settings {
        Settings {
            mode,
            pattern: "*".to_string(),
            assume_yes: true,
            dry_run: false,
            editor: DEFAULT_EDITOR.to_string(),
        }
    }

    fn run_with(settings: &Settings, dir: &TempDir, answer: &str) -> (Result<()>, String) {
        let osfs = OsFs::with_base(dir.path());
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = run(settings, &osfs, &mut input, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn tree_with_mapping(mapping: &str) -> TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("map.txt"), mapping).unwrap();
        dir
    }

    #[test]
    fn test_apply_without_prompt() {
        let dir = tree_with_mapping("a.txt => c.txt\nb.txt => d.txt\n");
        let (result, out) = run_with(
            &settings(Mode::Apply(PathBuf::from("map.txt"))),
            &dir,
            "",
        );

        result.unwrap();
        assert_eq!(
            out,
            "Renaming:\n- 'a.txt' => 'c.txt'\n- 'b.txt' => 'd.txt'\n\nFinished successfully\n"
        );
        assert_eq!(fs::read_to_string(dir.path().join("c.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dir.path().join("d.txt")).unwrap(), "b");
    }

    #[test]
    fn test_declined_confirmation_renames_nothing() {
        let dir = tree_with_mapping("a.txt => c.txt\n");
        let mut s = settings(Mode::Apply(PathBuf::from("map.txt")));
        s.assume_yes = false;

        let (result, out) = run_with(&s, &dir, "n\n");
        result.unwrap();
        assert!(out.ends_with("Stopping here\n"));
        assert!(dir.path().join("a.txt").exists());
        assert!(!dir.path().join("c.txt").exists());
    }

    #[test]
    fn test_closed_stdin_aborts_before_renaming() {
        let dir = tree_with_mapping("a.txt => c.txt\n");
        let mut s = settings(Mode::Apply(PathBuf::from("map.txt")));
        s.assume_yes = false;

        for answer in ["", "y"] {
            let (result, _) = run_with(&s, &dir, answer);
            let message = format!("{:#}", result.unwrap_err());
            assert!(message.starts_with("Failed to read user question"));
            assert!(dir.path().join("a.txt").exists());
            assert!(!dir.path().join("c.txt").exists());
        }
    }

    #[test]
    fn test_empty_answer_confirms() {
        let dir = tree_with_mapping("a.txt => c.txt\n");
        let mut s = settings(Mode::Apply(PathBuf::from("map.txt")));
        s.assume_yes = false;

        let (result, out) = run_with(&s, &dir, "\n");
        result.unwrap();
        assert!(out.contains("Do you wish to rename these files? [Y/n] "));
        assert!(out.ends_with("Finished successfully\n"));
        assert!(dir.path().join("c.txt").exists());
    }

    #[test]
    fn test_per_entry_failure_is_reported_not_fatal() {
        let dir = tree_with_mapping("a.txt => occupied\nb.txt => d.txt\n");
        fs::create_dir_all(dir.path().join("occupied/inner")).unwrap();

        let (result, out) = run_with(
            &settings(Mode::Apply(PathBuf::from("map.txt"))),
            &dir,
            "",
        );

        result.unwrap();
        assert!(out.contains("Error 'a.txt' => 'occupied': "));
        assert!(out.ends_with("Finished successfully\n"));
        assert!(dir.path().join("a.txt").exists());
        assert!(dir.path().join("d.txt").exists());
    }

    #[test]
    fn test_parse_error_aborts_before_renaming() {
        let dir = tree_with_mapping("a.txt => c.txt\nbroken line\n");
        let (result, out) = run_with(
            &settings(Mode::Apply(PathBuf::from("map.txt"))),
            &dir,
            "",
        );

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.starts_with("Failed to parse map file: line 2"));
        assert!(out.is_empty());
        assert!(dir.path().join("a.txt").exists());
    }

    #[test]
    fn test_missing_mapping_file() {
        let dir = tempdir().unwrap();
        let (result, _) = run_with(
            &settings(Mode::Apply(PathBuf::from("absent.txt"))),
            &dir,
            "",
        );
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.starts_with("Failed to read mapping file"));
    }

    #[test]
    fn test_identity_mapping_has_nothing_to_do() {
        let dir = tree_with_mapping("a.txt => a.txt\n\n");
        let (result, out) = run_with(
            &settings(Mode::Apply(PathBuf::from("map.txt"))),
            &dir,
            "",
        );
        result.unwrap();
        assert_eq!(out, "No files to rename\n");
    }

    #[test]
    fn test_dry_run_renames_nothing() {
        let dir = tree_with_mapping("a.txt => c.txt\n");
        let mut s = settings(Mode::Apply(PathBuf::from("map.txt")));
        s.dry_run = true;

        let (result, out) = run_with(&s, &dir, "");
        result.unwrap();
        assert!(out.ends_with("Dry run, no files were renamed\n"));
        assert!(dir.path().join("a.txt").exists());
    }

    #[test]
    fn test_swap_prints_warning() {
        let dir = tree_with_mapping("a.txt => b.txt\nb.txt => a.txt\n");
        let mut s = settings(Mode::Apply(PathBuf::from("map.txt")));
        s.dry_run = true;

        let (result, out) = run_with(&s, &dir, "");
        result.unwrap();
        assert!(out.contains(
            "Warning: 'a.txt' => 'b.txt' runs before 'b.txt' => 'a.txt', \
             the original contents of 'b.txt' will be lost"
        ));
    }

    #[test]
    fn test_warning_names_entries_shown_in_preview() {
        let dir = tree_with_mapping("x => x\ny => y\na => b\nb => c\n");
        let mut s = settings(Mode::Apply(PathBuf::from("map.txt")));
        s.dry_run = true;

        let (result, out) = run_with(&s, &dir, "");
        result.unwrap();
        assert_eq!(
            out,
            "Renaming:\n- 'a' => 'b'\n- 'b' => 'c'\n\n\
             Warning: 'a' => 'b' runs before 'b' => 'c', the original contents of 'b' will be lost\n\n\
             Dry run, no files were renamed\n"
        );
    }

    /// Yields one file and then fails, like a walk hitting an unreadable
    /// directory halfway through.
    struct FailingWalk {
        inner: MemFs,
    }

    impl FileSystem for FailingWalk {
        fn walk<'a>(&'a self, _root: &Path) -> WalkIter<'a> {
            let entries: Vec<Result<WalkEntry, WalkError>> = vec![
                Ok(WalkEntry {
                    path: PathBuf::from("a.txt"),
                    is_dir: false,
                }),
                Err(WalkError::new(
                    Some(PathBuf::from("locked")),
                    io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
                )),
            ];
            Box::new(entries.into_iter())
        }

        fn open<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Read + 'a>> {
            self.inner.open(path)
        }

        fn create<'a>(&'a self, path: &Path) -> io::Result<Box<dyn Write + 'a>> {
            self.inner.create(path)
        }

        fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
            self.inner.rename(from, to)
        }
    }

    #[test]
    fn test_generate_walk_error_leaves_no_mapping_file() {
        let failing = FailingWalk {
            inner: MemFs::new(),
        };
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();

        let result = run(
            &settings(Mode::Generate(PathBuf::from("map.txt"))),
            &failing,
            &mut input,
            &mut out,
        );

        let message = format!("{:#}", result.unwrap_err());
        assert_eq!(message, "Failed to walk files: locked: Permission denied");
        assert!(!failing.inner.exists("map.txt"));
    }

    #[test]
    fn test_generate_writes_identity_mapping() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(dir.path().join("x.go"), "").unwrap();
        fs::write(dir.path().join("y.txt"), "").unwrap();

        let mut s = settings(Mode::Generate(PathBuf::from("out/map.txt")));
        s.pattern = "*.go".to_string();

        let (result, out) = run_with(&s, &dir, "");
        result.unwrap();
        assert!(out.is_empty());
        assert_eq!(
            fs::read_to_string(dir.path().join("out/map.txt")).unwrap(),
            "x.go => x.go\n"
        );
    }

    #[test]
    fn test_generate_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let (result, _) = run_with(
            &settings(Mode::Generate(PathBuf::from("nowhere/map.txt"))),
            &dir,
            "",
        );
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.starts_with("Failed to write to generated mapping file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_interactive_with_untouched_mapping() {
        let dir = tree_with_mapping("");
        let mut s = settings(Mode::Interactive);
        s.editor = "true".to_string();

        let (result, out) = run_with(&s, &dir, "");
        result.unwrap();
        assert_eq!(out, "No files to rename\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_interactive_with_edited_mapping() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let scratch = tempdir().unwrap();
        let edited = scratch.path().join("edited");
        fs::write(&edited, "a.txt => renamed.txt\n").unwrap();

        let mut s = settings(Mode::Interactive);
        s.editor = format!("cp {}", edited.display());

        let (result, out) = run_with(&s, &dir, "");
        result.unwrap();
        assert!(out.contains("- 'a.txt' => 'renamed.txt'"));
        assert_eq!(
            fs::read_to_string(dir.path().join("renamed.txt")).unwrap(),
            "a"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_interactive_editor_failure_is_fatal() {
        let dir = tree_with_mapping("");
        let mut s = settings(Mode::Interactive);
        s.editor = "false".to_string();

        let (result, out) = run_with(&s, &dir, "");
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.starts_with("Editor closed with an error"));
        assert!(out.is_empty());
        assert!(dir.path().join("a.txt").exists());
    }
}
