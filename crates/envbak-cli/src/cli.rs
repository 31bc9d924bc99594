//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use envbak_core::MirrorConfig;
use envbak_core::WriteMode;
use envbak_core::mirror::ExclusionSet;
use envbak_core::paths::expand_home;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "envbak")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mirror .env files into <OUT>/<name>_bak and pack them into a dated ZIP
    Backup(BackupArgs),
    /// Mirror .env files into a destination tree without archiving
    Mirror(MirrorArgs),
    /// Pack a directory tree into a ZIP archive
    Archive(ArchiveArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

impl Commands {
    /// Operation name used in machine-readable output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Backup(_) => "backup",
            Self::Mirror(_) => "mirror",
            Self::Archive(_) => "archive",
            Self::Completion(_) => "completion",
        }
    }
}

/// Options shared by every command that walks a source tree.
#[derive(clap::Args)]
pub struct FilterArgs {
    /// File name to back up
    #[arg(short, long, value_name = "NAME", default_value = ".env")]
    pub target: String,

    /// Directory name to skip (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Do not skip node_modules, venv, .git, bin, obj, .vscode, dist, build
    #[arg(long)]
    pub no_default_excludes: bool,

    /// How to write files that already exist in the destination
    #[arg(long, value_enum, default_value_t = ModeArg::Append)]
    pub mode: ModeArg,

    /// Descend into symlinked directories
    #[arg(long)]
    pub follow_symlinks: bool,
}

impl FilterArgs {
    /// Builds the mirror configuration these flags describe.
    pub fn to_config(&self) -> MirrorConfig {
        let exclusions = if self.no_default_excludes {
            ExclusionSet::empty()
        } else {
            ExclusionSet::defaults()
        };

        MirrorConfig::default()
            .with_target_file_name(self.target.clone())
            .with_exclusions(exclusions)
            .with_extra_exclusions(&self.exclude)
            .with_write_mode(self.mode.into())
            .with_follow_symlinks(self.follow_symlinks)
    }
}

/// Destination write mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Append to existing files
    Append,
    /// Replace existing files
    Overwrite,
}

impl From<ModeArg> for WriteMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Append => Self::Append,
            ModeArg::Overwrite => Self::Overwrite,
        }
    }
}

#[derive(clap::Args)]
pub struct BackupArgs {
    /// Directory to scan
    #[arg(value_name = "SOURCE", value_parser = parse_path)]
    pub source: PathBuf,

    /// Directory that receives the archive (default: current directory)
    #[arg(short, long, value_name = "DIR", value_parser = parse_path)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Keep the <name>_bak directory after archiving
    #[arg(long)]
    pub keep_mirror: bool,
}

#[derive(clap::Args)]
pub struct MirrorArgs {
    /// Directory to scan
    #[arg(value_name = "SOURCE", value_parser = parse_path)]
    pub source: PathBuf,

    /// Destination directory
    #[arg(value_name = "DEST", value_parser = parse_path)]
    pub dest: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(clap::Args)]
pub struct ArchiveArgs {
    /// Directory tree to archive
    #[arg(value_name = "TREE", value_parser = parse_path)]
    pub tree: PathBuf,

    /// Output archive path (default: <TREE>.<YYYYMMDD>.zip next to TREE)
    #[arg(value_name = "OUTPUT", value_parser = parse_path)]
    pub output: Option<PathBuf>,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Returns the current user's home directory, if one can be determined.
fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Parses a path argument, expanding `$HOME` and a leading `~`.
#[allow(clippy::unnecessary_wraps)]
fn parse_path(s: &str) -> Result<PathBuf, String> {
    if s.is_empty() {
        return Err("path must not be empty".to_string());
    }
    Ok(home_dir().map_or_else(|| PathBuf::from(s), |home| expand_home(s, &home)))
}
