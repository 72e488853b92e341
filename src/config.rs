//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--show-hidden`)
//! 2. `$ARCHIVE_TUI_CONFIG` environment variable (path to config file)
//! 3. Project-local `.archive-tui.toml` in the current working directory
//! 4. Global `~/.config/archive-tui/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ── Section configs ──────────────────────────────────────────────────────────

/// General browsing settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory every file browser starts in (defaults to the CWD).
    pub start_dir: Option<String>,
    /// Show hidden files by default.
    pub show_hidden: Option<bool>,
    /// List entries in ascending order by default.
    pub ascending: Option<bool>,
    /// Enable mouse support.
    pub mouse: Option<bool>,
}

/// Create-mode settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CreateConfig {
    /// Prefix of the default internal path given to newly staged files.
    pub internal_prefix: Option<String>,
    /// File name suggested by the save dialog.
    pub default_archive_name: Option<String>,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `"debug"` or `"archive_manager_tui=trace"`.
    pub level: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub create: CreateConfig,
    pub log: LogConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default prefix of a staged file's internal path.
pub const DEFAULT_INTERNAL_PREFIX: &str = "\\levels\\placeholder\\";
/// Default name offered when saving a new archive.
pub const DEFAULT_ARCHIVE_NAME: &str = "out.zip";
/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("ARCHIVE_TUI_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".archive-tui.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("archive-tui").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`: `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                start_dir: other
                    .general
                    .start_dir
                    .clone()
                    .or(self.general.start_dir),
                show_hidden: other.general.show_hidden.or(self.general.show_hidden),
                ascending: other.general.ascending.or(self.general.ascending),
                mouse: other.general.mouse.or(self.general.mouse),
            },
            create: CreateConfig {
                internal_prefix: other
                    .create
                    .internal_prefix
                    .clone()
                    .or(self.create.internal_prefix),
                default_archive_name: other
                    .create
                    .default_archive_name
                    .clone()
                    .or(self.create.default_archive_name),
            },
            log: LogConfig {
                level: other.log.level.clone().or(self.log.level),
                file: other.log.file.clone().or(self.log.file),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Start directory of the file browsers.
    pub fn start_dir(&self) -> PathBuf {
        match &self.general.start_dir {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn show_hidden(&self) -> bool {
        self.general.show_hidden.unwrap_or(false)
    }

    pub fn ascending(&self) -> bool {
        self.general.ascending.unwrap_or(true)
    }

    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(false)
    }

    pub fn internal_prefix(&self) -> &str {
        self.create
            .internal_prefix
            .as_deref()
            .unwrap_or(DEFAULT_INTERNAL_PREFIX)
    }

    pub fn default_archive_name(&self) -> &str {
        self.create
            .default_archive_name
            .as_deref()
            .unwrap_or(DEFAULT_ARCHIVE_NAME)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Log file path: configured, else `<data_local_dir>/archive-tui/archive-tui.log`.
    pub fn log_file(&self) -> Option<PathBuf> {
        match &self.log.file {
            Some(file) => Some(PathBuf::from(file)),
            None => dirs::data_local_dir().map(|d| d.join("archive-tui").join("archive-tui.log")),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert!(!cfg.show_hidden());
        assert!(cfg.ascending());
        assert!(!cfg.mouse_enabled());
        assert_eq!(cfg.internal_prefix(), "\\levels\\placeholder\\");
        assert_eq!(cfg.default_archive_name(), "out.zip");
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
start_dir = "/srv/levels"
show_hidden = true
ascending = false
mouse = true

[create]
internal_prefix = "\\data\\"
default_archive_name = "pack.zip"

[log]
level = "debug"
file = "/tmp/am.log"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.start_dir(), PathBuf::from("/srv/levels"));
        assert!(cfg.show_hidden());
        assert!(!cfg.ascending());
        assert!(cfg.mouse_enabled());
        assert_eq!(cfg.internal_prefix(), "\\data\\");
        assert_eq!(cfg.default_archive_name(), "pack.zip");
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.log_file(), Some(PathBuf::from("/tmp/am.log")));
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[general]
show_hidden = true
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(cfg.show_hidden());
        assert!(cfg.ascending());
        assert_eq!(cfg.default_archive_name(), "out.zip");
    }

    #[test]
    fn test_toml_parsing_empty() {
        let cfg: AppConfig = toml::from_str("").expect("parse failed");
        assert!(!cfg.show_hidden());
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            general: GeneralConfig {
                show_hidden: Some(false),
                ascending: Some(false),
                ..Default::default()
            },
            create: CreateConfig {
                internal_prefix: Some("\\a\\".into()),
                default_archive_name: Some("a.zip".into()),
            },
            ..Default::default()
        };

        let over = AppConfig {
            general: GeneralConfig {
                show_hidden: Some(true),
                ..Default::default()
            },
            create: CreateConfig {
                default_archive_name: Some("b.zip".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert!(merged.show_hidden()); // overridden
        assert!(!merged.ascending()); // from base
        assert_eq!(merged.internal_prefix(), "\\a\\"); // from base
        assert_eq!(merged.default_archive_name(), "b.zip"); // overridden
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            log: LogConfig {
                level: Some("warn".into()),
                file: Some("/tmp/x.log".into()),
            },
            ..Default::default()
        };
        let merged = base.merge(&AppConfig::default());
        assert_eq!(merged.log_level(), "warn");
        assert_eq!(merged.log_file(), Some(PathBuf::from("/tmp/x.log")));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r#"
[general]
show_hidden = true

[create]
default_archive_name = "levels.zip"
"#
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert!(cfg.show_hidden());
        assert_eq!(cfg.default_archive_name(), "levels.zip");
        assert_eq!(cfg.internal_prefix(), DEFAULT_INTERNAL_PREFIX);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[general]
show_hidden = false
ascending = false
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            general: GeneralConfig {
                show_hidden: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        assert!(cfg.show_hidden());
        assert!(!cfg.ascending());
    }
}
