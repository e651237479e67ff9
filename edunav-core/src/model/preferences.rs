//! ``src/model/preferences.rs``
//! ============================================================================
//! # Preferences: typed access to the durable key/value store
//!
//! Keys mirror the browser storage layout: `theme` holds `"light"` or
//! `"dark"`, `downloads` and `bookmarks` hold JSON-encoded identifier lists.
//! Absent or malformed values read as their defaults; a bad value never
//! fails startup.

use edunav_prefs::KeyValueStore;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AppError;
use crate::model::records::RecordId;

pub const THEME_KEY: &str = "theme";
pub const DOWNLOADS_KEY: &str = "downloads";
pub const BOOKMARKS_KEY: &str = "bookmarks";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Unknown values fall back to light.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim() {
            "dark" => Self::Dark,
            "light" => Self::Light,
            other => {
                warn!(value = other, "Unknown theme preference, using light");
                Self::Light
            }
        }
    }
}

pub struct Preferences {
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

impl Preferences {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.store
            .get(THEME_KEY)
            .map(|raw| Theme::parse_or_default(&raw))
            .unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), AppError> {
        self.store.set(THEME_KEY, theme.as_str().to_string())?;
        Ok(())
    }

    /// Identifier set under `key`; malformed JSON reads as empty.
    #[must_use]
    pub fn id_set(&self, key: &str) -> IndexSet<RecordId> {
        let Some(raw) = self.store.get(key) else {
            return IndexSet::new();
        };
        match serde_json::from_str::<Vec<RecordId>>(&raw) {
            Ok(ids) => ids.into_iter().filter(|id| !id.is_empty()).collect(),
            Err(e) => {
                warn!(key, error = %e, "Malformed identifier list in preferences, ignoring");
                IndexSet::new()
            }
        }
    }

    pub fn set_id_set(&mut self, key: &str, ids: &IndexSet<RecordId>) -> Result<(), AppError> {
        let encoded = serde_json::to_string(&ids.iter().collect::<Vec<_>>())?;
        self.store.set(key, encoded)?;
        Ok(())
    }
}
