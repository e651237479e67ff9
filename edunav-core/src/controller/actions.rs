//! src/controller/actions.rs
//! ============================================================================
//! # Actions: Centralized Application Commands
//!
//! Defines the `Action` enum, which represents all user inputs and internal
//! events the browser responds to. Terminal keys, keyword transcripts and
//! background task results all arrive here before reaching `AppState`.

use crossterm::event::KeyEvent;

use crate::controller::event_loop::TaskResult;
use crate::model::navigation::ViewLevel;

/// Represents a high-level action that the application can perform.
#[derive(Debug)]
pub enum Action {
    /// Close the currently active overlay.
    CloseOverlay,

    /// Drill into the highlighted card, or open it on the resource view.
    EnterSelected,

    /// Step one level up the hierarchy.
    GoBack,

    /// Re-derive the given view from the current selection (breadcrumb).
    GoTo(ViewLevel),

    /// Return to the course list.
    GoHome,

    /// A keyboard event not consumed by the key map.
    Key(KeyEvent),

    MoveSelectionDown,

    MoveSelectionUp,

    /// Cycle the language filter through the subject's languages.
    CycleLanguageFilter,

    /// Cycle the resource-type filter.
    CycleTypeFilter,

    /// No operation. Used when an event is consumed but no state change is needed.
    NoOp,

    PageDown,

    PageUp,

    /// Text typed into the keyword prompt.
    PromptInput(char),

    PromptBackspace,

    /// Quit the application.
    Quit,

    /// Record the highlighted resource as downloaded without opening it.
    RecordDownload,

    /// Fetch the catalog again after a failed load.
    Reload,

    /// A terminal resize event.
    Resize(u16, u16),

    /// Jump to first entry.
    SelectFirst,

    /// Jump to last entry.
    SelectLast,

    /// Open the keyword command prompt.
    ShowPrompt,

    /// Submit the keyword prompt.
    SubmitPrompt,

    /// A result from a background task.
    TaskResult(TaskResult),

    /// An internal tick event for periodic updates.
    Tick,

    /// Toggle the bookmark on the highlighted resource.
    ToggleBookmark,

    /// Toggle the help overlay visibility.
    ToggleHelp,

    ToggleTheme,

    /// A spoken or typed command transcript.
    Transcript(String),
}
