//! Configuration loading and path resolution
//!
//! Two TOML documents drive a run:
//! 1. **Rule-set file** (`meetcheck.toml`): which checks to run, their parameters
//!    and colors, plus optional default database/output paths
//! 2. **Dotfile** (`~/.meetcheck.toml`): per-user defaults and the last database
//!    that was checked, written back after every successful resolution
//!
//! # Resolution priority
//!
//! 1. Command-line argument (highest priority)
//! 2. Rule-set file / dotfile value
//! 3. Convention (`<database-stem>.html` for the report)
//!
//! Relative paths are searched against the known directories in order:
//! the dotfile `workdir`, then the current directory.

use crate::{Error, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Rule-set file name searched for in the known directories
pub const DEFAULT_RULESET_FILE: &str = "meetcheck.toml";

/// Per-user dotfile name, stored in the home directory
pub const DOTFILE_NAME: &str = ".meetcheck.toml";

/// Suffix appended to the report stem for the event-reversed report
pub const REVERSED_SUFFIX: &str = "_rev";

/// Default refresh interval for watch mode
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// One configured check, as written under `[checks.<name>]`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CheckConfig {
    /// Checker identifier, bare (`is_a_relay`) or dotted (`meetchecker.checkers.is_a_relay`)
    pub checker: String,

    /// Checker-specific parameters
    #[serde(default)]
    pub params: toml::Table,

    /// Whether the check runs at all (default: true)
    #[serde(default = "default_run")]
    pub run: bool,

    /// Explicit display color; otherwise assigned from the palette
    #[serde(default)]
    pub color: Option<String>,
}

fn default_run() -> bool {
    true
}

/// On-disk layout of the rule-set file
#[derive(Debug, Deserialize)]
struct RuleSetFile {
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    interval_secs: Option<u64>,
    #[serde(default)]
    checks: toml::Table,
}

/// Parsed rule-set: checks in file order plus optional run defaults
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// Default database file (date macros expanded)
    pub file: Option<PathBuf>,

    /// Default report path (date macros expanded)
    pub output: Option<PathBuf>,

    /// Refresh interval for watch mode
    pub interval_secs: Option<u64>,

    /// Configured checks, in the order they appear in the file
    pub checks: Vec<(String, CheckConfig)>,
}

impl RuleSet {
    /// Parse a rule-set from TOML text
    ///
    /// Check order follows the document order of the `[checks.*]` tables.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RuleSetFile = toml::from_str(text)?;
        let today = Local::now().date_naive();

        let mut checks = Vec::with_capacity(raw.checks.len());
        for (name, value) in raw.checks {
            let check: CheckConfig = value.try_into().map_err(|e: toml::de::Error| {
                Error::Config(format!("Check '{}' is malformed: {}", name, e.message()))
            })?;
            checks.push((name, check));
        }

        Ok(Self {
            file: raw.file.map(|f| PathBuf::from(expand_date_macros(&f, today))),
            output: raw.output.map(|o| PathBuf::from(expand_date_macros(&o, today))),
            interval_secs: raw.interval_secs,
            checks,
        })
    }

    /// Load a rule-set from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read rule-set file {}: {}", path.display(), e))
        })?;
        let rule_set = Self::from_toml_str(&text)?;

        if rule_set.checks.is_empty() {
            warn!("Rule-set {} defines no checks", path.display());
        }
        info!(
            "Loaded rule-set from {} ({} checks)",
            path.display(),
            rule_set.checks.len()
        );
        Ok(rule_set)
    }
}

/// Serialized contents of the dotfile
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DotFileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checks: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_database: Option<String>,
}

/// Per-user defaults file
///
/// A missing dotfile is not an error: every getter simply returns `None`.
#[derive(Debug, Clone)]
pub struct DotFile {
    path: PathBuf,
    data: DotFileData,
}

impl DotFile {
    /// `~/.meetcheck.toml`, if a home directory can be determined
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DOTFILE_NAME))
    }

    /// Load the dotfile at `path`, or start empty if it does not exist
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            toml::from_str(&text)?
        } else {
            debug!("No dotfile at {}, using empty defaults", path.display());
            DotFileData::default()
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn workdir(&self) -> Option<PathBuf> {
        Self::expanded(self.data.workdir.as_deref())
    }

    pub fn checks(&self) -> Option<PathBuf> {
        Self::expanded(self.data.checks.as_deref())
    }

    pub fn last_database(&self) -> Option<PathBuf> {
        Self::expanded(self.data.last_database.as_deref())
    }

    /// Remember `database` as the last one checked and persist the dotfile
    pub fn set_last_database(&mut self, database: &Path) -> Result<()> {
        self.data.last_database = Some(database.to_string_lossy().into_owned());
        write_toml_atomic(&self.data, &self.path)?;
        debug!("Saved last database {} to {}", database.display(), self.path.display());
        Ok(())
    }

    fn expanded(value: Option<&str>) -> Option<PathBuf> {
        value
            .filter(|v| !v.is_empty())
            .map(|v| PathBuf::from(expand_date_macros(v, Local::now().date_naive())))
    }
}

/// Expand strftime-style date macros (`%Y`, `%m`, `%d`, ...) in `text`
///
/// Text with an invalid specifier is returned unchanged.
pub fn expand_date_macros(text: &str, date: NaiveDate) -> String {
    if !text.contains('%') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 8);
    if write!(out, "{}", date.format(text)).is_err() {
        warn!("Ignoring invalid date macro in {:?}", text);
        return text.to_string();
    }
    out
}

/// Serialize `value` as TOML and write it atomically (temp file + rename)
pub fn write_toml_atomic<T: Serialize>(value: &T, target: &Path) -> Result<()> {
    let text = toml::to_string_pretty(value)?;

    let mut temp_name = target.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    std::fs::write(&temp_path, text)?;
    if let Err(e) = std::fs::rename(&temp_path, target) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

/// `<database-stem>.html` beside the database
pub fn default_output_path(database: &Path) -> PathBuf {
    database.with_extension("html")
}

/// `<stem>_rev<.ext>` beside `output`
pub fn reversed_output_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match output.extension() {
        Some(ext) => format!("{}{}.{}", stem, REVERSED_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, REVERSED_SUFFIX),
    };
    output.with_file_name(name)
}

/// Known directories used to resolve relative paths, highest priority first
#[derive(Debug, Clone)]
pub struct Locations {
    priority_order: Vec<PathBuf>,
}

impl Locations {
    /// Dotfile workdir (if any), then the current directory; missing directories are skipped
    pub fn new(workdir: Option<PathBuf>) -> Self {
        let curdir = std::env::current_dir().ok();
        Self::from_dirs(workdir.into_iter().chain(curdir))
    }

    /// Build from an explicit list of candidate directories
    pub fn from_dirs(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut priority_order: Vec<PathBuf> = Vec::new();
        for dir in dirs {
            if dir.is_dir() && !priority_order.contains(&dir) {
                priority_order.push(dir);
            }
        }
        Self { priority_order }
    }

    pub fn known_directories(&self) -> &[PathBuf] {
        &self.priority_order
    }

    fn known_directories_as_str(&self) -> String {
        self.priority_order
            .iter()
            .map(|p| format!("\n * {}", p.display()))
            .collect()
    }

    /// First existing `dir/relative` across the known directories
    pub fn find_relative_path(&self, relative: &Path) -> Option<PathBuf> {
        self.priority_order
            .iter()
            .map(|dir| dir.join(relative))
            .find(|candidate| candidate.exists())
    }

    /// Resolve a user-supplied path that must exist
    ///
    /// Absolute paths are checked as-is; relative paths are searched in the
    /// known directories.
    pub fn resolve_existing(&self, path: &Path, what: &str) -> Result<PathBuf> {
        if path.is_absolute() {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(Error::NotFound(format!(
                "Could not find the {} {} that you specified",
                what,
                path.display()
            )));
        }
        self.find_relative_path(path).ok_or_else(|| {
            Error::NotFound(format!(
                "Could not find the {} {} relative to any of our known directories:{}",
                what,
                path.display(),
                self.known_directories_as_str()
            ))
        })
    }

    /// Database: command line, then the last database used (if it still exists)
    pub fn resolve_database(
        &self,
        param: Option<&Path>,
        last_database: Option<&Path>,
    ) -> Result<PathBuf> {
        if let Some(path) = param {
            return self.resolve_existing(path, "database");
        }
        if let Some(last) = last_database {
            if last.exists() {
                info!("Using last database {}", last.display());
                return Ok(last.to_path_buf());
            }
            warn!("Last database {} no longer exists", last.display());
        }
        Err(Error::Config(
            "No database specified and no previous database to fall back on".to_string(),
        ))
    }

    /// Rule-set: command line, then dotfile, then `meetcheck.toml` in a known directory
    pub fn resolve_ruleset(
        &self,
        param: Option<&Path>,
        dotfile_checks: Option<&Path>,
    ) -> Result<PathBuf> {
        if let Some(path) = param.or(dotfile_checks) {
            return self.resolve_existing(path, "checks file");
        }
        self.find_relative_path(Path::new(DEFAULT_RULESET_FILE))
            .ok_or_else(|| {
                Error::Config(format!(
                    "No checks file specified, and no {} found in:{}",
                    DEFAULT_RULESET_FILE,
                    self.known_directories_as_str()
                ))
            })
    }

    /// Report path: command line (relative to the first known directory), else beside the database
    pub fn resolve_output(&self, param: Option<&Path>, database: &Path) -> Result<PathBuf> {
        match param {
            Some(path) if path.is_absolute() => Ok(path.to_path_buf()),
            Some(path) => self
                .priority_order
                .first()
                .map(|dir| dir.join(path))
                .ok_or_else(|| Error::Config("No known locations found".to_string())),
            None => Ok(default_output_path(database)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULESET: &str = r##"
file = "meet.mdb"

[checks.few_pads]
checker = "only_n_or_fewer_pad_times"
params = { n = 1 }

[checks.relays]
checker = "meetchecker.checkers.is_a_relay"
run = false

[checks.sectionals]
checker = "compare_vs_time_standard"
params = { time_standard = "Sectionals" }
color = "#123456"
"##;

    #[test]
    fn test_ruleset_preserves_check_order() {
        let rule_set = RuleSet::from_toml_str(RULESET).unwrap();
        let names: Vec<&str> = rule_set.checks.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["few_pads", "relays", "sectionals"]);
    }

    #[test]
    fn test_ruleset_defaults() {
        let rule_set = RuleSet::from_toml_str(RULESET).unwrap();
        let (_, few_pads) = &rule_set.checks[0];
        assert!(few_pads.run);
        assert!(few_pads.color.is_none());
        assert_eq!(few_pads.params.get("n").and_then(|v| v.as_integer()), Some(1));

        let (_, relays) = &rule_set.checks[1];
        assert!(!relays.run);
        assert!(relays.params.is_empty());

        let (_, sectionals) = &rule_set.checks[2];
        assert_eq!(sectionals.color.as_deref(), Some("#123456"));
        assert_eq!(rule_set.file, Some(PathBuf::from("meet.mdb")));
    }

    #[test]
    fn test_ruleset_missing_checker_is_config_error() {
        let err = RuleSet::from_toml_str("[checks.broken]\nrun = true\n").unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("broken")));
    }

    #[test]
    fn test_expand_date_macros() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 13).unwrap();
        assert_eq!(expand_date_macros("meet-%Y%m%d.mdb", date), "meet-20240713.mdb");
        assert_eq!(expand_date_macros("plain.mdb", date), "plain.mdb");
    }

    #[test]
    fn test_expand_date_macros_invalid_specifier() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 13).unwrap();
        assert_eq!(expand_date_macros("meet-%Q.mdb", date), "meet-%Q.mdb");
    }

    #[test]
    fn test_output_paths() {
        let db = Path::new("/meets/summer.mdb");
        let out = default_output_path(db);
        assert_eq!(out, PathBuf::from("/meets/summer.html"));
        assert_eq!(reversed_output_path(&out), PathBuf::from("/meets/summer_rev.html"));
        assert_eq!(
            reversed_output_path(Path::new("/meets/report")),
            PathBuf::from("/meets/report_rev")
        );
    }
}
