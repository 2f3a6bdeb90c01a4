use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PATTERN: &str = "*";
pub const DEFAULT_EDITOR: &str = "/usr/bin/editor";

/// Optional settings file, `config.toml` in the platform config directory.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Editor command, may include arguments (`"code --wait"`).
    pub editor: Option<String>,
    pub pattern: String,
    pub assume_yes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: None,
            pattern: DEFAULT_PATTERN.to_string(),
            assume_yes: false,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Bulk-rename files by editing a mapping in your editor", long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # List every file, edit the mapping, confirm, rename
    mass-rename

    # Only Go sources
    mass-rename -p '*.go'

    # Write a mapping to edit later, then apply it without asking
    mass-rename -g renames.txt
    mass-rename -f renames.txt -y

MAPPING FORMAT:
    One entry per line, blank lines ignored:
      old/path.txt => new/path.txt

    Entries are applied top to bottom. A failed entry does not undo earlier
    ones and does not stop later ones.

CONFIG:
    Default config location: ~/.config/mass-rename/config.toml
    Keys: editor, pattern, assume_yes"#)]
pub struct Args {
    #[arg(
        short,
        long,
        value_name = "PATH",
        conflicts_with = "generate",
        help = "Use a pre-written mapping file (skips listing and editing)"
    )]
    pub file: Option<PathBuf>,

    #[arg(
        short,
        long,
        value_name = "PATH",
        help = "Write an identity mapping to this path and exit"
    )]
    pub generate: Option<PathBuf>,

    #[arg(
        short,
        long,
        value_name = "GLOB",
        help = "Glob matched against file names when listing [default: *]"
    )]
    pub pattern: Option<String>,

    #[arg(short, long, help = "Rename without asking for confirmation")]
    pub yes: bool,

    #[arg(short = 'n', long, help = "Show what would be renamed and stop")]
    pub dry_run: bool,

    #[arg(
        short,
        long,
        value_name = "CMD",
        help = "Editor command [default: config, then $EDITOR, then /usr/bin/editor]"
    )]
    pub editor: Option<String>,

    #[arg(
        short,
        long,
        help = "Path to config file [default: ~/.config/mass-rename/config.toml]"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Use built-in defaults, ignore config file")]
    pub ignore_config: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (repeatable)")]
    pub verbose: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Write an identity mapping to the path and stop.
    Generate(PathBuf),
    /// Apply a mapping the user already wrote.
    Apply(PathBuf),
    /// List, edit in a temporary file, then apply.
    Interactive,
}

/// Everything a run needs, resolved once from flags and config.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mode: Mode,
    pub pattern: String,
    pub assume_yes: bool,
    pub dry_run: bool,
    pub editor: String,
}

impl Settings {
    pub fn resolve(args: &Args, config: &Config, env_editor: Option<String>) -> Self {
        let mode = match (&args.generate, &args.file) {
            (Some(path), _) => Mode::Generate(path.clone()),
            (None, Some(path)) => Mode::Apply(path.clone()),
            (None, None) => Mode::Interactive,
        };

        let editor = args
            .editor
            .clone()
            .or_else(|| config.editor.clone())
            .or(env_editor.filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string());

        Self {
            mode,
            pattern: args
                .pattern
                .clone()
                .unwrap_or_else(|| config.pattern.clone()),
            assume_yes: args.yes || config.assume_yes,
            dry_run: args.dry_run,
            editor: shellexpand::tilde(&editor).into_owned(),
        }
    }
}

pub fn load_config(args: &Args) -> Result<Config> {
    if args.ignore_config {
        return Ok(Config::default());
    }

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => {
            let path = get_default_config_path();
            if !path.exists() {
                log::debug!("No config file at {:?}, using defaults", path);
                return Ok(Config::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {:?}", config_path))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file at {:?}", config_path))
}

fn get_default_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "mass-rename") {
        proj_dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("config.toml")
    }
}
