//! ``src/controller/event_loop.rs``
//! ============================================================================
//! # Event Loop: terminal events, task results and transcripts in one stream
//!
//! `next_action` multiplexes the crossterm event stream, background task
//! results, externally injected actions and a redraw tick. Key mapping is a
//! pure function of the key and the active overlay.

use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::controller::actions::Action;
use crate::error::AppError;
use crate::model::catalog::Catalog;
use crate::model::navigation::ViewLevel;
use crate::model::ui_state::UIOverlay;

/// Completion of work spawned off the event loop.
#[derive(Debug)]
pub enum TaskResult {
    /// The startup (or reload) fetch of all six collections finished.
    CatalogLoaded(Result<Catalog, AppError>),

    /// The external opener exited.
    OpenerFinished {
        link: String,
        result: Result<(), String>,
    },
}

pub struct EventLoop {
    task_rx: mpsc::UnboundedReceiver<TaskResult>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    event_stream: EventStream,
    tick: Interval,
}

impl EventLoop {
    pub fn new(
        task_rx: mpsc::UnboundedReceiver<TaskResult>,
        action_rx: mpsc::UnboundedReceiver<Action>,
        tick_rate: Duration,
    ) -> Self {
        info!("Initializing event loop (tick every {:?})", tick_rate);
        let mut tick = tokio::time::interval(tick_rate);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            task_rx,
            action_rx,
            event_stream: EventStream::new(),
            tick,
        }
    }

    /// Wait for the next action. `overlay` selects the key map.
    pub async fn next_action(&mut self, overlay: UIOverlay) -> Action {
        tokio::select! {
            Some(Ok(event)) = self.event_stream.next() => {
                trace!("Terminal event received: {:?}", event);
                let action = Self::map_terminal_event(event, overlay);
                debug!("Terminal event mapped to action: {:?}", action);
                action
            }

            Some(result) = self.task_rx.recv() => {
                debug!("Task result received");
                Action::TaskResult(result)
            }

            Some(action) = self.action_rx.recv() => action,

            _ = self.tick.tick() => Action::Tick,
        }
    }

    pub fn map_terminal_event(event: TermEvent, overlay: UIOverlay) -> Action {
        match event {
            TermEvent::Key(key) => Self::map_key(key, overlay),
            TermEvent::Resize(w, h) => Action::Resize(w, h),
            _ => Action::NoOp,
        }
    }

    pub fn map_key(key: KeyEvent, overlay: UIOverlay) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::NoOp;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match overlay {
            UIOverlay::Prompt => match key.code {
                KeyCode::Esc => Action::CloseOverlay,
                KeyCode::Enter => Action::SubmitPrompt,
                KeyCode::Backspace => Action::PromptBackspace,
                KeyCode::Char(c) => Action::PromptInput(c),
                _ => Action::NoOp,
            },

            UIOverlay::Help => match key.code {
                KeyCode::Esc | KeyCode::Char('?' | 'q') => Action::CloseOverlay,
                _ => Action::NoOp,
            },

            UIOverlay::Loading => match key.code {
                KeyCode::Char('q') => Action::Quit,
                _ => Action::NoOp,
            },

            UIOverlay::None => Self::map_browse_key(key),
        }
    }

    fn map_browse_key(key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => Action::Quit,

            KeyCode::Down | KeyCode::Char('j') => Action::MoveSelectionDown,
            KeyCode::Up | KeyCode::Char('k') => Action::MoveSelectionUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Home | KeyCode::Char('g') => Action::SelectFirst,
            KeyCode::End | KeyCode::Char('G') => Action::SelectLast,

            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => Action::EnterSelected,
            KeyCode::Backspace | KeyCode::Left | KeyCode::Esc | KeyCode::Char('h') => {
                Action::GoBack
            }
            KeyCode::Char('H') | KeyCode::Char('0') => Action::GoHome,

            // breadcrumb positions after Home
            KeyCode::Char('1') => Action::GoTo(ViewLevel::Branch),
            KeyCode::Char('2') => Action::GoTo(ViewLevel::Semester),
            KeyCode::Char('3') => Action::GoTo(ViewLevel::Subject),

            KeyCode::Char('t') => Action::CycleTypeFilter,
            KeyCode::Char('L') => Action::CycleLanguageFilter,
            KeyCode::Char('b') => Action::ToggleBookmark,
            KeyCode::Char('d') => Action::RecordDownload,
            KeyCode::Char('T') => Action::ToggleTheme,
            KeyCode::Char('r') => Action::Reload,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char(':' | '/') => Action::ShowPrompt,

            _ => Action::Key(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn browse_keys_map_to_navigation() {
        let map = |c| EventLoop::map_key(press(c), UIOverlay::None);
        assert!(matches!(map(KeyCode::Enter), Action::EnterSelected));
        assert!(matches!(map(KeyCode::Esc), Action::GoBack));
        assert!(matches!(map(KeyCode::Char('2')), Action::GoTo(ViewLevel::Semester)));
        assert!(matches!(map(KeyCode::Char('t')), Action::CycleTypeFilter));
        assert!(matches!(map(KeyCode::Char('q')), Action::Quit));
    }

    #[test]
    fn prompt_captures_printable_keys() {
        let map = |c| EventLoop::map_key(press(c), UIOverlay::Prompt);
        assert!(matches!(map(KeyCode::Char('q')), Action::PromptInput('q')));
        assert!(matches!(map(KeyCode::Enter), Action::SubmitPrompt));
        assert!(matches!(map(KeyCode::Esc), Action::CloseOverlay));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for overlay in [UIOverlay::None, UIOverlay::Prompt, UIOverlay::Help, UIOverlay::Loading] {
            assert!(matches!(EventLoop::map_key(key, overlay), Action::Quit));
        }
    }

    #[test]
    fn loading_overlay_swallows_navigation() {
        let action = EventLoop::map_key(press(KeyCode::Enter), UIOverlay::Loading);
        assert!(matches!(action, Action::NoOp));
    }
}
