//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! Manages all user-editable settings for the study browser. Loads and saves
//! settings as TOML from the proper cross-platform config path using the
//! [`directories`](https://docs.rs/directories) crate.
//!
//! ## Example
//! ```rust,ignore
//! let (config, origin) = Config::load().await?;
//! config.save().await?;
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use tokio::fs as TokioFs;

use crate::provider::data_provider::Collection;

/// Remote spreadsheet source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the sheet-to-JSON service, with trailing slash
    pub api_url: String,

    /// Spreadsheet identifier appended to `api_url`
    pub sheet_id: String,

    pub courses_sheet: String,

    pub branches_sheet: String,

    pub semesters_sheet: String,

    pub subjects_sheet: String,

    pub resources_sheet: String,

    pub universities_sheet: String,

    /// Upper bound for the whole startup load
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: "https://opensheet.elk.sh/".to_string(),
            sheet_id: "1gt3LLr9i5Nu888DVSrHyGCZaqHL6uqnDI1X3sMS7Qhg".to_string(),
            courses_sheet: "Courses".to_string(),
            branches_sheet: "Branches".to_string(),
            semesters_sheet: "Semesters".to_string(),
            subjects_sheet: "Subjects".to_string(),
            resources_sheet: "Resources".to_string(),
            universities_sheet: "Universities".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ProviderConfig {
    /// Sheet name serving `collection`.
    #[must_use]
    pub fn sheet_name(&self, collection: Collection) -> &str {
        match collection {
            Collection::Courses => &self.courses_sheet,
            Collection::Branches => &self.branches_sheet,
            Collection::Semesters => &self.semesters_sheet,
            Collection::Subjects => &self.subjects_sheet,
            Collection::Resources => &self.resources_sheet,
            Collection::Universities => &self.universities_sheet,
        }
    }

    /// Full URL of the endpoint serving `collection`.
    #[must_use]
    pub fn collection_url(&self, collection: Collection) -> String {
        format!(
            "{}{}/{}",
            self.api_url,
            self.sheet_id,
            self.sheet_name(collection)
        )
    }
}

/// Optional behaviours, all on by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Keyword ("voice") commands from the `:` prompt
    pub keyword_commands: bool,

    pub breadcrumbs: bool,

    /// Mirror the page title into the terminal title
    pub page_meta: bool,

    pub download_tracking: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            keyword_commands: true,
            breadcrumbs: true,
            page_meta: true,
            download_tracking: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Command used to open resource links
    pub opener_cmd: String,

    /// Redraw interval while the loading overlay is visible
    #[serde(with = "humantime_serde")]
    pub tick_rate: Duration,

    /// File or FIFO an external speech-to-text tool writes transcripts
    /// to, one per line
    pub transcript_source: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            opener_cmd: default_opener().to_string(),
            tick_rate: Duration::from_millis(150),
            transcript_source: None,
        }
    }
}

const fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Directory for rolling log files; `None` uses the project data dir
    pub dir: Option<PathBuf>,

    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: None,
            level: "info".to_string(),
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub features: FeatureFlags,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

/// Where the active configuration came from. `Config::load` runs before the
/// tracing subscriber exists, so the outcome is reported afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    Malformed { path: PathBuf, reason: String },
    Created(PathBuf),
}

impl ConfigOrigin {
    pub fn report(&self) {
        match self {
            Self::File(path) => info!("Loaded config from {}", path.display()),
            Self::Malformed { path, reason } => {
                warn!("Config at {} is malformed ({reason}), using defaults", path.display());
            }
            Self::Created(path) => info!(
                "No config file found, wrote default configuration to {}",
                path.display()
            ),
        }
    }
}

impl Config {
    /// Loads config from TOML file at the app config dir, or returns defaults.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/edunav/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> anyhow::Result<(Self, ConfigOrigin)> {
        Self::load_from(&Self::config_path()?).await
    }

    /// A malformed file yields defaults; a missing one is created with them.
    pub async fn load_from(path: &Path) -> anyhow::Result<(Self, ConfigOrigin)> {
        if path.exists() {
            let text = TokioFs::read_to_string(path).await?;
            match Self::from_toml(&text) {
                Ok(cfg) => Ok((cfg, ConfigOrigin::File(path.to_path_buf()))),
                Err(e) => Ok((
                    Self::default(),
                    ConfigOrigin::Malformed {
                        path: path.to_path_buf(),
                        reason: e.message().to_string(),
                    },
                )),
            }
        } else {
            let default_config = Self::default();
            default_config.save_to(path).await?;
            Ok((default_config, ConfigOrigin::Created(path.to_path_buf())))
        }
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Saves config to TOML file at the app config dir.
    pub async fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?).await
    }

    pub async fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        debug!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str).await?;

        Ok(())
    }

    fn project_dirs() -> anyhow::Result<ProjectDirs> {
        ProjectDirs::from("org", "edunav", "edunav")
            .ok_or_else(|| anyhow::anyhow!("Could not determine project directories."))
    }

    /// Returns the canonical config file path.
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Location of the persisted preference document.
    pub fn prefs_path() -> anyhow::Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("prefs.json"))
    }

    /// Directory receiving rolling log files.
    pub fn log_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.logging.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("logs")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_url_joins_base_sheet_and_name() {
        let provider = ProviderConfig {
            api_url: "https://example.test/".into(),
            sheet_id: "abc".into(),
            ..ProviderConfig::default()
        };
        assert_eq!(
            provider.collection_url(Collection::Resources),
            "https://example.test/abc/Resources"
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml(
            r#"
            [provider]
            sheet_id = "xyz"
            request_timeout = "5s"

            [features]
            page_meta = false
            "#,
        )
        .unwrap();

        assert_eq!(cfg.provider.sheet_id, "xyz");
        assert_eq!(cfg.provider.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.provider.courses_sheet, "Courses");
        assert!(!cfg.features.page_meta);
        assert!(cfg.features.download_tracking);
        assert_eq!(cfg.logging.level, "info");
    }

    #[tokio::test]
    async fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edunav").join("config.toml");

        let (cfg, origin) = Config::load_from(&path).await.unwrap();
        assert_eq!(origin, ConfigOrigin::Created(path.clone()));
        assert_eq!(cfg.logging.level, "info");
        assert!(path.exists());

        let (_, origin) = Config::load_from(&path).await.unwrap();
        assert_eq!(origin, ConfigOrigin::File(path));
    }

    #[tokio::test]
    async fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[provider\nsheet_id = ").unwrap();

        let (cfg, origin) = Config::load_from(&path).await.unwrap();
        assert!(matches!(origin, ConfigOrigin::Malformed { .. }));
        assert_eq!(cfg.provider.sheet_id, Config::default().provider.sheet_id);
    }

    #[test]
    fn default_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let cfg = Config::from_toml(&text).unwrap();
        assert_eq!(cfg.ui.tick_rate, Duration::from_millis(150));
    }
}
