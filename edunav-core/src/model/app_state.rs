//! src/model/app_state.rs
//! ============================================================================
//! # AppState: the single owned controller of the browser core
//!
//! Owns the loaded catalog, the navigator, the resource filters, the user's
//! library and the preference store. Every presentation call lands on a
//! method here; each one either succeeds completely or returns an error with
//! the prior state untouched. While no catalog is loaded every navigation
//! call returns `ProviderUnavailable`.

use tracing::{debug, info, instrument, warn};

use crate::config::FeatureFlags;
use crate::error::AppError;
use crate::model::catalog::Catalog;
use crate::model::filters::{
    FilterValue, ResourceFilters, apply_filters, language_options, type_options,
};
use crate::model::library::Library;
use crate::model::navigation::{Navigator, ViewLevel};
use crate::model::preferences::{BOOKMARKS_KEY, DOWNLOADS_KEY, Preferences, Theme};
use crate::model::records::{RecordId, Resource};

/// Transcript keywords mapped to the fragment a course name must contain.
const KEYWORD_COMMANDS: &[(&[&str], &str)] = &[(&["btech", "b tech"], "btech"), (&["bca"], "bca")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

/// The loaded catalog, or why there is none.
fn available<'a>(catalog: Option<&'a Catalog>, status: &LoadStatus) -> Result<&'a Catalog, AppError> {
    match (catalog, status) {
        (Some(catalog), _) => Ok(catalog),
        (None, LoadStatus::Failed(reason)) => Err(AppError::provider_unavailable(reason.clone())),
        (None, _) => Err(AppError::provider_unavailable("content is still loading")),
    }
}

#[derive(Debug)]
pub struct AppState {
    status: LoadStatus,
    catalog: Option<Catalog>,
    navigator: Navigator,
    filters: ResourceFilters,
    library: Library,
    preferences: Preferences,
    theme: Theme,
    features: FeatureFlags,
}

impl AppState {
    /// Restore the library and theme from `preferences`; starts in `Loading`.
    pub fn new(preferences: Preferences, features: FeatureFlags) -> Self {
        let library = Library::new(
            preferences.id_set(DOWNLOADS_KEY),
            preferences.id_set(BOOKMARKS_KEY),
        );
        let theme = preferences.theme();
        info!(
            downloads = library.downloads().len(),
            bookmarks = library.bookmarks().len(),
            theme = theme.as_str(),
            "Preferences restored"
        );

        Self {
            status: LoadStatus::Loading,
            catalog: None,
            navigator: Navigator::new(),
            filters: ResourceFilters::default(),
            library,
            preferences,
            theme,
            features,
        }
    }

    // ---- loading -----------------------------------------------------------

    /// Drop any catalog and wait for a fresh load.
    pub fn begin_reload(&mut self) {
        self.status = LoadStatus::Loading;
        self.catalog = None;
        self.navigator.show_courses();
        self.filters = ResourceFilters::default();
    }

    pub fn catalog_loaded(&mut self, result: Result<Catalog, AppError>) {
        match result {
            Ok(catalog) => {
                info!(counts = ?catalog.counts(), "Catalog ready");
                self.catalog = Some(catalog);
                self.status = LoadStatus::Ready;
                self.navigator.show_courses();
            }
            Err(e) => {
                warn!(error = %e, "Catalog load failed");
                self.catalog = None;
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
    }

    fn loaded(&self) -> Result<&Catalog, AppError> {
        available(self.catalog.as_ref(), &self.status)
    }

    // ---- navigation --------------------------------------------------------

    pub fn show_courses(&mut self) -> Result<(), AppError> {
        self.loaded()?;
        self.navigator.show_courses();
        Ok(())
    }

    pub fn select_course(&mut self, id: &RecordId) -> Result<(), AppError> {
        let catalog = available(self.catalog.as_ref(), &self.status)?;
        self.navigator.select_course(catalog, id)
    }

    pub fn select_branch(&mut self, id: &RecordId) -> Result<(), AppError> {
        let catalog = available(self.catalog.as_ref(), &self.status)?;
        self.navigator.select_branch(catalog, id)
    }

    pub fn select_semester(&mut self, id: &RecordId) -> Result<(), AppError> {
        let catalog = available(self.catalog.as_ref(), &self.status)?;
        self.navigator.select_semester(catalog, id)
    }

    /// Selecting a subject resets the type filter only; the language filter
    /// carries over between subjects.
    pub fn select_subject(&mut self, id: &RecordId) -> Result<(), AppError> {
        let catalog = available(self.catalog.as_ref(), &self.status)?;
        self.navigator.select_subject(catalog, id)?;
        self.filters.resource_type = FilterValue::All;
        Ok(())
    }

    pub fn go_back(&mut self, target: ViewLevel) -> Result<(), AppError> {
        let catalog = available(self.catalog.as_ref(), &self.status)?;
        self.navigator.go_back(catalog, target)?;
        if target == ViewLevel::Resource {
            self.filters.resource_type = FilterValue::All;
        }
        Ok(())
    }

    // ---- filters -----------------------------------------------------------

    fn require_subject(&self) -> Result<(), AppError> {
        self.loaded()?;
        if self.navigator.selection().subject.is_none() {
            return Err(AppError::invalid_state("filters apply only to a selected subject"));
        }
        Ok(())
    }

    pub fn set_resource_type_filter(&mut self, value: FilterValue) -> Result<(), AppError> {
        self.require_subject()?;
        debug!(filter = %value, "Resource type filter set");
        self.filters.resource_type = value;
        Ok(())
    }

    pub fn set_language_filter(&mut self, value: FilterValue) -> Result<(), AppError> {
        self.require_subject()?;
        debug!(filter = %value, "Language filter set");
        self.filters.language = value;
        Ok(())
    }

    /// Resources of the selected subject passing both filters; empty when no
    /// subject is selected.
    #[must_use]
    pub fn filtered_resources(&self) -> Vec<&Resource> {
        match (&self.catalog, &self.navigator.selection().subject) {
            (Some(catalog), Some(subject)) => {
                apply_filters(&catalog.resources, subject, &self.filters)
            }
            _ => Vec::new(),
        }
    }

    /// Type and language choices for the selected subject.
    #[must_use]
    pub fn filter_options(&self) -> (Vec<FilterValue>, Vec<FilterValue>) {
        match (&self.catalog, &self.navigator.selection().subject) {
            (Some(catalog), Some(subject)) => (
                type_options(catalog.resources_of(subject)),
                language_options(catalog.resources_of(subject)),
            ),
            _ => (vec![FilterValue::All], vec![FilterValue::All]),
        }
    }

    // ---- library -----------------------------------------------------------

    fn require_resource(&self, id: &RecordId) -> Result<(), AppError> {
        if self.loaded()?.resource(id).is_none() {
            return Err(AppError::not_found(ViewLevel::Resource, id.as_str()));
        }
        Ok(())
    }

    /// Adds `id` to the downloads set and bumps the in-memory counter.
    /// Returns `false` when tracking is disabled. A failed write leaves both
    /// the set and the counter as they were.
    #[instrument(level = "debug", skip(self))]
    pub fn record_download(&mut self, id: &RecordId) -> Result<bool, AppError> {
        self.require_resource(id)?;
        if !self.features.download_tracking {
            debug!(resource = %id, "Download tracking disabled");
            return Ok(false);
        }

        if !self.library.is_downloaded(id) {
            let mut downloads = self.library.downloads().clone();
            downloads.insert(id.clone());
            self.preferences.set_id_set(DOWNLOADS_KEY, &downloads)?;
            self.library.record_download(id);
        }
        if let Some(resource) = self.catalog.as_mut().and_then(|c| c.resource_mut(id)) {
            resource.downloads = resource.downloads.saturating_add(1);
            info!(resource = %id, kind = %resource.kind, title = %resource.title, "Downloaded");
        }
        Ok(true)
    }

    /// Returns whether `id` is bookmarked after the call. The library only
    /// changes once the new set is persisted.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_bookmark(&mut self, id: &RecordId) -> Result<bool, AppError> {
        self.require_resource(id)?;
        let mut bookmarks = self.library.bookmarks().clone();
        if !bookmarks.shift_remove(id) {
            bookmarks.insert(id.clone());
        }
        self.preferences.set_id_set(BOOKMARKS_KEY, &bookmarks)?;
        Ok(self.library.toggle_bookmark(id))
    }

    // ---- theme -------------------------------------------------------------

    pub fn toggle_theme(&mut self) -> Result<Theme, AppError> {
        let next = self.theme.toggled();
        self.preferences.set_theme(next)?;
        self.theme = next;
        info!(theme = next.as_str(), "Theme switched");
        Ok(next)
    }

    // ---- keyword commands --------------------------------------------------

    /// Match a spoken or typed transcript against the keyword table, then
    /// against course names; selects the first match.
    ///
    /// Returns the selected course, or `None` when nothing matched.
    #[instrument(level = "debug", skip(self))]
    pub fn on_transcript(&mut self, transcript: &str) -> Result<Option<RecordId>, AppError> {
        let catalog = available(self.catalog.as_ref(), &self.status)?;
        let query = transcript.trim().to_lowercase();
        if query.is_empty() {
            return Ok(None);
        }

        let by_keyword = KEYWORD_COMMANDS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| query.contains(k)))
            .and_then(|(_, fragment)| {
                catalog
                    .courses
                    .iter()
                    .find(|c| c.name.to_lowercase().contains(fragment))
            });

        let matched = by_keyword.or_else(|| {
            catalog.courses.iter().find(|c| {
                let name = c.name.trim().to_lowercase();
                !name.is_empty() && query.contains(&name)
            })
        });

        let Some(course) = matched else {
            debug!(transcript = %query, "No course matched transcript");
            return Ok(None);
        };

        let id = course.id.clone();
        self.navigator.select_course(catalog, &id)?;
        info!(course = %id, "Course selected by keyword command");
        Ok(Some(id))
    }

    // ---- accessors ---------------------------------------------------------

    #[must_use]
    pub const fn status(&self) -> &LoadStatus {
        &self.status
    }

    #[must_use]
    pub const fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub const fn current_view(&self) -> ViewLevel {
        self.navigator.current_view()
    }

    #[must_use]
    pub const fn filters(&self) -> &ResourceFilters {
        &self.filters
    }

    #[must_use]
    pub const fn library(&self) -> &Library {
        &self.library
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub const fn features(&self) -> &FeatureFlags {
        &self.features
    }
}
