//! Configuration management
//!
//! Two layers: [`Settings`] holds the cleanup rules read from the
//! `.clean_files` TOML file, [`Config`] adds the roots and run flags taken
//! from the command line. Both are immutable once a run starts.

use crate::types::CleanError;
use clap::Parser;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the home directory first
pub const CONFIG_FILE_NAME: &str = ".clean_files";

/// Consecutive failed actions tolerated before a run is stopped
pub const DEFAULT_FAILURE_LIMIT: usize = 50;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "cleanfiles",
    version,
    about = "Consolidate files from source directories into one target directory",
    after_help = "Example: cleanfiles ~/archive ~/Downloads /mnt/old-backup"
)]
pub struct Cli {
    /// Main directory where files are consolidated
    pub target: PathBuf,

    /// Additional directories to scan
    #[arg(required = true)]
    pub sources: Vec<PathBuf>,

    /// Path to the configuration file (default: ~/.clean_files)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show each phase's plan without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Approve every action without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Stop after this many consecutive failed actions (0 = never)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_FAILURE_LIMIT)]
    pub failure_limit: usize,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Cleanup rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Mode every file should end up with (e.g. `0o644`)
    pub default_permissions: u32,

    /// Characters not allowed in file names
    pub bad_chars: BTreeSet<char>,

    /// Character substituted for each bad character
    pub replacement_char: char,

    /// Name suffixes marking temporary files (`~`, `.tmp`, ...)
    pub temp_extensions: BTreeSet<String>,

    /// Match temp suffixes case-insensitively
    pub temp_extensions_ignore_case: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_permissions: 0o644,
            bad_chars: BTreeSet::new(),
            replacement_char: '_',
            temp_extensions: BTreeSet::new(),
            temp_extensions_ignore_case: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    settings: Option<RawSettings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    bad_chars: Option<ListValue>,
    replacement_char: Option<String>,
    temp_extensions: Option<ListValue>,
    default_permissions: Option<ModeValue>,
    temp_extensions_ignore_case: bool,
}

/// Either a whitespace separated string or a TOML array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListValue {
    Words(String),
    List(Vec<String>),
}

/// `"644"` or `644`; both read as octal digits
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ModeValue {
    Text(String),
    Number(u32),
}

impl ListValue {
    fn into_words(self) -> Vec<String> {
        match self {
            ListValue::Words(text) => text.split_whitespace().map(str::to_string).collect(),
            ListValue::List(items) => items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        }
    }
}

impl Settings {
    /// Parse settings from the contents of a configuration file
    pub fn from_toml_str(text: &str) -> Result<Self, CleanError> {
        let file: ConfigFile = toml::from_str(text)
            .map_err(|e| CleanError::Config(format!("Invalid configuration file: {}", e)))?;
        let raw = file.settings.ok_or_else(|| {
            CleanError::Config("Configuration file missing [settings] section".to_string())
        })?;

        let mut settings = Settings::default();

        if let Some(list) = raw.bad_chars {
            settings.bad_chars = list
                .into_words()
                .iter()
                .flat_map(|word| word.chars())
                .collect();
        }

        if let Some(text) = raw.replacement_char {
            let mut chars = text.chars();
            settings.replacement_char = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(CleanError::Config(format!(
                        "replacement_char must be a single character, got {:?}",
                        text
                    )))
                }
            };
        }

        if let Some(list) = raw.temp_extensions {
            settings.temp_extensions = list.into_words().into_iter().collect();
        }

        match raw.default_permissions {
            Some(ModeValue::Text(text)) => settings.default_permissions = parse_mode(&text)?,
            Some(ModeValue::Number(digits)) => {
                settings.default_permissions = parse_mode(&digits.to_string())?
            }
            None => {}
        }

        settings.temp_extensions_ignore_case = raw.temp_extensions_ignore_case;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self, CleanError> {
        let text = fs::read_to_string(path).map_err(|e| {
            CleanError::Config(format!(
                "Cannot read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&text)
    }

    /// Check the rules are self-consistent
    pub fn validate(&self) -> Result<(), CleanError> {
        if self.default_permissions > 0o777 {
            return Err(CleanError::Config(format!(
                "default_permissions {:o} is out of range",
                self.default_permissions
            )));
        }
        if self.bad_chars.contains(&self.replacement_char) {
            return Err(CleanError::Config(format!(
                "replacement_char {:?} is itself listed in bad_chars",
                self.replacement_char
            )));
        }
        if std::path::is_separator(self.replacement_char) {
            return Err(CleanError::Config(
                "replacement_char cannot be a path separator".to_string(),
            ));
        }
        if self.bad_chars.contains(&'/') {
            return Err(CleanError::Config(
                "bad_chars cannot contain '/', it never appears in a file name".to_string(),
            ));
        }
        Ok(())
    }

    /// The matching temp suffix, for reporting
    pub fn temp_suffix_of(&self, name: &str) -> Option<&str> {
        self.temp_extensions
            .iter()
            .find(|ext| {
                if self.temp_extensions_ignore_case {
                    name.to_lowercase().ends_with(&ext.to_lowercase())
                } else {
                    name.ends_with(ext.as_str())
                }
            })
            .map(String::as_str)
    }
}

/// Parse an octal mode string such as `"644"` or `"0o755"`
pub fn parse_mode(text: &str) -> Result<u32, CleanError> {
    let digits = text.trim().trim_start_matches("0o");
    u32::from_str_radix(digits, 8).map_err(|_| {
        CleanError::Config(format!(
            "default_permissions must be an octal mode like \"644\", got {:?}",
            text
        ))
    })
}

/// Default configuration path: `~/.clean_files`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Pick the configuration file to load
///
/// The explicit path (or `~/.clean_files`) wins when it exists; otherwise
/// `.clean_files` in the working directory is tried.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, CleanError> {
    let preferred = explicit.map(Path::to_path_buf).or_else(default_config_path);
    if let Some(path) = &preferred {
        if path.is_file() {
            return Ok(path.clone());
        }
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(local);
    }

    let wanted = preferred.unwrap_or(local);
    Err(CleanError::Config(format!(
        "Configuration file not found: {}",
        wanted.display()
    )))
}

/// Run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory everything is consolidated into
    pub target: PathBuf,

    /// Directories searched for files
    pub sources: Vec<PathBuf>,

    /// Cleanup rules
    pub settings: Settings,

    /// Plan only, never execute
    pub dry_run: bool,

    /// Approve every action kind from the start
    pub assume_yes: bool,

    /// Consecutive failures tolerated before stopping (0 = unlimited)
    pub failure_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: PathBuf::new(),
            sources: Vec::new(),
            settings: Settings::default(),
            dry_run: false,
            assume_yes: false,
            failure_limit: DEFAULT_FAILURE_LIMIT,
        }
    }
}

impl Config {
    /// Build a configuration with absolute roots
    pub fn new(target: &Path, sources: &[PathBuf], settings: Settings) -> Self {
        Self {
            target: absolutize(target),
            sources: sources.iter().map(|s| absolutize(s)).collect(),
            settings,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), CleanError> {
        self.settings.validate()?;

        if !self.target.is_dir() {
            return Err(CleanError::Config(format!(
                "Target directory does not exist or is not a directory: {}",
                self.target.display()
            )));
        }
        if let Err(e) = fs::read_dir(&self.target) {
            return Err(CleanError::Config(format!(
                "Target directory is not readable: {}: {}",
                self.target.display(),
                e
            )));
        }

        if self.sources.is_empty() {
            return Err(CleanError::Config(
                "At least one source directory is required".to_string(),
            ));
        }

        if self.sources.iter().any(|s| s == &self.target) {
            return Err(CleanError::Config(
                "Source and target cannot be the same".to_string(),
            ));
        }

        Ok(())
    }

    /// Target first, then every source
    pub fn roots(&self) -> Vec<PathBuf> {
        std::iter::once(self.target.clone())
            .chain(self.sources.iter().cloned())
            .collect()
    }

    /// Check whether a path lies inside the target root
    pub fn is_in_target(&self, path: &Path) -> bool {
        path.starts_with(&self.target)
    }
}

impl TryFrom<Cli> for Config {
    type Error = CleanError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let config_path = resolve_config_path(cli.config.as_deref())?;
        tracing::debug!("Loading configuration from {}", config_path.display());
        let settings = Settings::load(&config_path)?;

        let mut config = Config::new(&cli.target, &cli.sources, settings);
        config.dry_run = cli.dry_run;
        config.assume_yes = cli.yes;
        config.failure_limit = cli.failure_limit;

        config.validate()?;
        Ok(config)
    }
}

/// Canonical path when it exists, otherwise an absolute one
fn absolutize(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
