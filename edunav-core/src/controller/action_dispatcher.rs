//! ActionDispatcher: applies actions to `AppState` and `UIState`.
//!
//! Every action runs to completion on the event-loop task. Rejected
//! navigation (`NotFound`, `InvalidState`) leaves state untouched and becomes
//! a warning toast; anything that needs I/O beyond the preference store
//! (catalog load, opening a link) is spawned and reports back through the
//! task channel.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, instrument, warn};

use crate::controller::actions::Action;
use crate::controller::event_loop::TaskResult;
use crate::error::AppError;
use crate::model::app_state::{AppState, LoadStatus};
use crate::model::filters::next_option;
use crate::model::navigation::ViewLevel;
use crate::model::ui_state::{RedrawFlag, UIOverlay, UIState};
use crate::provider::data_provider::{DataProvider, LoadProgress, load_catalog};
use crate::view::snapshots::{Card, ViewSnapshot};

const PAGE_SIZE: isize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    Continue,
    Terminate,
}

pub struct ActionDispatcher {
    provider: Arc<dyn DataProvider>,
    load_timeout: Duration,
    opener_cmd: String,
    task_tx: UnboundedSender<TaskResult>,
}

impl ActionDispatcher {
    pub fn new(
        provider: Arc<dyn DataProvider>,
        load_timeout: Duration,
        opener_cmd: impl Into<String>,
        task_tx: UnboundedSender<TaskResult>,
    ) -> Self {
        Self {
            provider,
            load_timeout,
            opener_cmd: opener_cmd.into(),
            task_tx,
        }
    }

    /// Fetch the catalog in the background; the result arrives as
    /// `TaskResult::CatalogLoaded`.
    pub fn spawn_load(&self, ui: &mut UIState) {
        let progress = LoadProgress::new();
        ui.start_loading(progress.clone());

        let provider = Arc::clone(&self.provider);
        let timeout = self.load_timeout;
        let task_tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = load_catalog(provider.as_ref(), timeout, &progress).await;
            if task_tx.send(TaskResult::CatalogLoaded(result)).is_err() {
                debug!("Event loop gone before catalog load finished");
            }
        });
    }

    fn spawn_opener(&self, link: String) {
        let opener = self.opener_cmd.clone();
        let task_tx = self.task_tx.clone();
        tokio::spawn(async move {
            let status = Command::new(&opener)
                .arg(&link)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await;
            let result = match status {
                Ok(s) if s.success() => Ok(()),
                Ok(s) => Err(format!("{opener} exited with {s}")),
                Err(e) => Err(format!("failed to run {opener}: {e}")),
            };
            if task_tx
                .send(TaskResult::OpenerFinished { link, result })
                .is_err()
            {
                debug!("Event loop gone before opener finished");
            }
        });
    }

    /// Apply one action. Errors are reported to the user, never propagated.
    #[instrument(level = "debug", skip(self, state, ui))]
    pub fn handle(&mut self, action: Action, state: &mut AppState, ui: &mut UIState) -> DispatchResult {
        match self.apply(action, state, ui) {
            Ok(result) => result,
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "Action rejected");
                ui.show_warning(e.to_string());
                DispatchResult::Continue
            }
            Err(e @ AppError::ProviderUnavailable(_)) => {
                warn!(error = %e, "Action needs content that is not loaded");
                ui.show_warning("Content is not available. Press r to reload.");
                DispatchResult::Continue
            }
            Err(e) => {
                error!(error = %e, "Action failed");
                ui.show_error(e.to_string());
                DispatchResult::Continue
            }
        }
    }

    fn apply(
        &mut self,
        action: Action,
        state: &mut AppState,
        ui: &mut UIState,
    ) -> Result<DispatchResult, AppError> {
        use RedrawFlag as RF;

        match action {
            Action::Quit => return Ok(DispatchResult::Terminate),

            Action::NoOp | Action::Key(_) => {}

            Action::Tick => {
                ui.update_notification();
                if ui.loading.is_some() {
                    ui.request_redraw(RF::Overlay);
                }
            }

            Action::Resize(..) => ui.request_redraw(RF::All),

            // ---- cursor ------------------------------------------------------
            Action::MoveSelectionUp => self.move_cursor(state, ui, -1),
            Action::MoveSelectionDown => self.move_cursor(state, ui, 1),
            Action::PageUp => self.move_cursor(state, ui, -PAGE_SIZE),
            Action::PageDown => self.move_cursor(state, ui, PAGE_SIZE),
            Action::SelectFirst => {
                ui.reset_cursor(state.current_view());
                ui.request_redraw(RF::Main);
            }
            Action::SelectLast => {
                let len = ViewSnapshot::capture(state, ui).card_count();
                ui.cursor_to_end(state.current_view(), len);
            }

            // ---- navigation --------------------------------------------------
            Action::EnterSelected => self.enter_selected(state, ui)?,

            Action::GoBack => {
                if let Some(parent) = state.current_view().parent() {
                    state.go_back(parent)?;
                    ui.request_redraw(RF::All);
                }
            }

            Action::GoTo(level) => {
                state.go_back(level)?;
                ui.request_redraw(RF::All);
            }

            Action::GoHome => {
                state.show_courses()?;
                ui.request_redraw(RF::All);
            }

            // ---- filters -----------------------------------------------------
            Action::CycleTypeFilter => {
                let (types, _) = state.filter_options();
                let next = next_option(&types, &state.filters().resource_type);
                state.set_resource_type_filter(next)?;
                ui.reset_cursor(ViewLevel::Resource);
                ui.request_redraw(RF::Main);
            }

            Action::CycleLanguageFilter => {
                let (_, languages) = state.filter_options();
                let next = next_option(&languages, &state.filters().language);
                state.set_language_filter(next)?;
                ui.reset_cursor(ViewLevel::Resource);
                ui.request_redraw(RF::Main);
            }

            // ---- library -----------------------------------------------------
            Action::ToggleBookmark => {
                let Some(card) = self.resource_under_cursor(state, ui) else {
                    return Ok(DispatchResult::Continue);
                };
                if state.toggle_bookmark(&card.id)? {
                    ui.show_success(format!("Saved \"{}\" for later", card.title));
                } else {
                    ui.show_info(format!("Removed \"{}\" from saved", card.title));
                }
                ui.request_redraw(RF::Main);
            }

            Action::RecordDownload => {
                let Some(card) = self.resource_under_cursor(state, ui) else {
                    return Ok(DispatchResult::Continue);
                };
                if state.record_download(&card.id)? {
                    ui.show_success(format!("Marked \"{}\" as downloaded", card.title));
                }
                ui.request_redraw(RF::Main);
            }

            Action::ToggleTheme => {
                let theme = state.toggle_theme()?;
                ui.show_info(format!("Switched to {} theme", theme.as_str()));
                ui.request_redraw(RF::All);
            }

            // ---- overlays and prompt -----------------------------------------
            Action::ToggleHelp => {
                let next = if ui.overlay == UIOverlay::Help {
                    UIOverlay::None
                } else {
                    UIOverlay::Help
                };
                ui.set_overlay(next);
            }

            Action::CloseOverlay => ui.close_overlay(),

            Action::ShowPrompt => {
                if state.features().keyword_commands {
                    ui.clear_input();
                    ui.set_overlay(UIOverlay::Prompt);
                } else {
                    ui.show_warning("Keyword commands are disabled");
                }
            }

            Action::PromptInput(c) => ui.insert_char(c),

            Action::PromptBackspace => {
                ui.delete_char_before();
            }

            Action::SubmitPrompt => {
                let text = ui.take_input();
                self.transcript(&text, state, ui)?;
            }

            Action::Transcript(text) => self.transcript(&text, state, ui)?,

            // ---- loading -----------------------------------------------------
            Action::Reload => match state.status() {
                LoadStatus::Failed(_) => {
                    info!("Reloading catalog");
                    state.begin_reload();
                    ui.reset_all_cursors();
                    self.spawn_load(ui);
                }
                LoadStatus::Loading => debug!("Reload ignored, load in progress"),
                LoadStatus::Ready => ui.show_info("Content is already loaded"),
            },

            Action::TaskResult(result) => self.task_result(result, state, ui),
        }

        Ok(DispatchResult::Continue)
    }

    fn move_cursor(&self, state: &AppState, ui: &mut UIState, delta: isize) {
        let len = ViewSnapshot::capture(state, ui).card_count();
        ui.move_cursor(state.current_view(), delta, len);
    }

    fn resource_under_cursor(
        &self,
        state: &AppState,
        ui: &UIState,
    ) -> Option<Card> {
        if state.current_view() != ViewLevel::Resource {
            return None;
        }
        ViewSnapshot::capture(state, ui).selected_card().cloned()
    }

    fn enter_selected(&self, state: &mut AppState, ui: &mut UIState) -> Result<(), AppError> {
        let snapshot = ViewSnapshot::capture(state, ui);
        let Some(card) = snapshot.selected_card() else {
            return Ok(());
        };

        let view = state.current_view();
        match view {
            ViewLevel::Course => state.select_course(&card.id)?,
            ViewLevel::Branch => state.select_branch(&card.id)?,
            ViewLevel::Semester => state.select_semester(&card.id)?,
            ViewLevel::Subject => state.select_subject(&card.id)?,
            ViewLevel::Resource => {
                state.record_download(&card.id)?;
                match &card.link {
                    Some(link) => {
                        info!(resource = %card.id, "Opening resource");
                        self.spawn_opener(link.clone());
                        let verb = if card.is_video { "Playing" } else { "Opening" };
                        ui.show_info(format!("{verb} \"{}\"", card.title));
                    }
                    None => ui.show_warning(format!("\"{}\" has no link", card.title)),
                }
                ui.request_redraw(RedrawFlag::Main);
                return Ok(());
            }
        }

        ui.reset_cursor(state.current_view());
        ui.request_redraw(RedrawFlag::All);
        Ok(())
    }

    fn transcript(&self, text: &str, state: &mut AppState, ui: &mut UIState) -> Result<(), AppError> {
        if !state.features().keyword_commands {
            debug!("Keyword commands disabled, transcript ignored");
            return Ok(());
        }

        match state.on_transcript(text)? {
            Some(id) => {
                let name = state
                    .catalog()
                    .and_then(|c| c.course(&id))
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                ui.reset_cursor(ViewLevel::Branch);
                ui.show_info(format!("Opened {name}"));
                ui.request_redraw(RedrawFlag::All);
            }
            None => ui.show_info(format!("No course matches \"{}\"", text.trim())),
        }
        Ok(())
    }

    fn task_result(&self, result: TaskResult, state: &mut AppState, ui: &mut UIState) {
        match result {
            TaskResult::CatalogLoaded(result) => {
                ui.finish_loading();
                ui.reset_all_cursors();
                let loaded = result.is_ok();
                state.catalog_loaded(result);
                if loaded {
                    ui.show_success("All data loaded");
                } else {
                    ui.show_error("Unable to load data. Check the sheet ID and your connection.");
                }
                ui.request_redraw(RedrawFlag::All);
            }

            TaskResult::OpenerFinished { link, result } => {
                if let Err(reason) = result {
                    warn!(%link, %reason, "Opener failed");
                    ui.show_warning(format!("Could not open link: {reason}"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureFlags;
    use crate::model::catalog::fixtures::sample;
    use crate::model::preferences::Preferences;
    use crate::model::ui_state::NotificationLevel;
    use crate::provider::data_provider::Collection;
    use async_trait::async_trait;
    use edunav_prefs::MemoryStore;
    use serde_json::Value;
    use tokio::sync::mpsc;

    struct DownProvider;

    #[async_trait]
    impl DataProvider for DownProvider {
        async fn fetch_collection(&self, collection: Collection) -> Result<Vec<Value>, AppError> {
            Err(AppError::provider_unavailable(format!("{collection}: HTTP 503")))
        }
    }

    fn setup() -> (ActionDispatcher, AppState, UIState, mpsc::UnboundedReceiver<TaskResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = ActionDispatcher::new(Arc::new(DownProvider), Duration::from_secs(1), "true", tx);
        let mut state = AppState::new(Preferences::new(MemoryStore::new()), FeatureFlags::default());
        state.catalog_loaded(Ok(sample()));
        (dispatcher, state, UIState::new(), rx)
    }

    #[test]
    fn enter_drills_down_and_back_returns() {
        let (mut d, mut state, mut ui, _rx) = setup();

        d.handle(Action::EnterSelected, &mut state, &mut ui);
        assert_eq!(state.current_view(), ViewLevel::Branch);
        d.handle(Action::MoveSelectionDown, &mut state, &mut ui);
        assert_eq!(ui.cursor(ViewLevel::Branch), 1);
        d.handle(Action::EnterSelected, &mut state, &mut ui);
        assert_eq!(state.navigator().selection().branch, Some("11".into()));

        d.handle(Action::GoBack, &mut state, &mut ui);
        assert_eq!(state.current_view(), ViewLevel::Branch);
        assert_eq!(ui.cursor(ViewLevel::Branch), 1);

        d.handle(Action::GoHome, &mut state, &mut ui);
        assert_eq!(state.current_view(), ViewLevel::Course);
    }

    #[test]
    fn rejected_filter_becomes_warning() {
        let (mut d, mut state, mut ui, _rx) = setup();
        let result = d.handle(Action::CycleTypeFilter, &mut state, &mut ui);

        assert_eq!(result, DispatchResult::Continue);
        let toast = ui.notification.as_ref().unwrap();
        assert_eq!(toast.level, NotificationLevel::Warning);
        assert!(state.filters().resource_type.is_all());
    }

    #[test]
    fn filters_and_bookmarks_on_resource_view() {
        let (mut d, mut state, mut ui, _rx) = setup();
        for _ in 0..4 {
            d.handle(Action::EnterSelected, &mut state, &mut ui);
        }
        assert_eq!(state.current_view(), ViewLevel::Resource);

        d.handle(Action::CycleTypeFilter, &mut state, &mut ui);
        assert_eq!(state.filters().resource_type.to_string(), "Notes");
        assert_eq!(state.filtered_resources().len(), 1);

        d.handle(Action::ToggleBookmark, &mut state, &mut ui);
        assert!(state.library().is_bookmarked(&"101".into()));

        d.handle(Action::RecordDownload, &mut state, &mut ui);
        assert!(state.library().is_downloaded(&"101".into()));
    }

    #[test]
    fn prompt_submission_runs_keyword_command() {
        let (mut d, mut state, mut ui, _rx) = setup();
        d.handle(Action::ShowPrompt, &mut state, &mut ui);
        for c in "bca".chars() {
            d.handle(Action::PromptInput(c), &mut state, &mut ui);
        }
        d.handle(Action::SubmitPrompt, &mut state, &mut ui);

        assert_eq!(ui.overlay, UIOverlay::None);
        assert_eq!(state.navigator().selection().course, Some("2".into()));
    }

    #[test]
    fn quit_terminates() {
        let (mut d, mut state, mut ui, _rx) = setup();
        assert_eq!(d.handle(Action::Quit, &mut state, &mut ui), DispatchResult::Terminate);
    }

    #[tokio::test]
    async fn opener_outcome_arrives_and_closed_channel_is_tolerated() {
        let (mut d, mut state, mut ui, mut rx) = setup();
        for _ in 0..5 {
            d.handle(Action::EnterSelected, &mut state, &mut ui);
        }
        assert!(state.library().is_downloaded(&"100".into()));

        let result = rx.recv().await.unwrap();
        assert!(matches!(
            &result,
            TaskResult::OpenerFinished { link, result: Ok(()) } if link.ends_with("/100")
        ));

        drop(rx);
        d.handle(Action::EnterSelected, &mut state, &mut ui);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(
            state.catalog().unwrap().resource(&"100".into()).unwrap().downloads,
            2
        );
    }

    #[tokio::test]
    async fn failed_reload_reports_through_task_channel() {
        let (mut d, _, mut ui, mut rx) = setup();
        let mut state = AppState::new(Preferences::new(MemoryStore::new()), FeatureFlags::default());
        state.catalog_loaded(Err(AppError::provider_unavailable("first attempt")));

        d.handle(Action::Reload, &mut state, &mut ui);
        assert_eq!(state.status(), &LoadStatus::Loading);
        assert_eq!(ui.overlay, UIOverlay::Loading);

        let result = rx.recv().await.unwrap();
        d.handle(Action::TaskResult(result), &mut state, &mut ui);

        assert!(matches!(state.status(), LoadStatus::Failed(_)));
        assert_eq!(ui.overlay, UIOverlay::None);
        assert!(matches!(
            state.select_course(&"1".into()),
            Err(AppError::ProviderUnavailable(_))
        ));
    }
}
