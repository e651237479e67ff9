//! Presentation-side state: cursors, overlays, prompt input, toasts

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Instant;

use compact_str::CompactString;
use enum_map::EnumMap;

use crate::model::navigation::ViewLevel;
use crate::provider::data_provider::LoadProgress;

/// Atomic redraw flags for lock-free UI updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RedrawFlag {
    Main = 1,
    StatusBar = 2,
    Overlay = 4,
    Notification = 8,
    All = 15,
}

impl RedrawFlag {
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum UIOverlay {
    #[default]
    None = 0,
    Help = 1,
    Prompt = 2,
    Loading = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NotificationLevel {
    Info = 0,
    Success = 1,
    Warning = 2,
    Error = 3,
}

/// Compact notification with timestamp
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: CompactString,
    pub level: NotificationLevel,
    pub timestamp: Instant,
    pub auto_dismiss_ms: Option<u32>,
}

/// Loading indicator backed by the loader's shared progress counter.
#[derive(Debug, Clone)]
pub struct LoadingState {
    pub message: CompactString,
    pub progress: LoadProgress,
    pub start_time: Instant,
}

impl LoadingState {
    pub fn new(message: impl Into<CompactString>, progress: LoadProgress) -> Self {
        Self {
            message: message.into(),
            progress,
            start_time: Instant::now(),
        }
    }

    /// Completion ratio in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        f64::from(self.progress.percent()) / 100.0
    }
}

#[derive(Debug)]
pub struct UIState {
    pub redraw_flags: AtomicU32,
    pub frame_count: AtomicU64,

    pub overlay: UIOverlay,

    /// Highlighted row, remembered per level
    pub cursors: EnumMap<ViewLevel, usize>,

    // Keyword prompt
    pub input: CompactString,
    pub input_cursor: usize,

    pub loading: Option<LoadingState>,
    pub notification: Option<Notification>,
    pub last_update: Instant,
}

impl Default for UIState {
    fn default() -> Self {
        Self::new()
    }
}

impl UIState {
    pub fn new() -> Self {
        Self {
            redraw_flags: AtomicU32::new(u32::from(RedrawFlag::All.bits())),
            frame_count: AtomicU64::new(0),
            overlay: UIOverlay::None,
            cursors: EnumMap::default(),
            input: CompactString::new(""),
            input_cursor: 0,
            loading: None,
            notification: None,
            last_update: Instant::now(),
        }
    }

    #[inline]
    pub fn request_redraw(&self, flag: RedrawFlag) {
        self.redraw_flags
            .fetch_or(u32::from(flag.bits()), Ordering::Relaxed);
    }

    #[inline]
    pub fn needs_redraw(&self) -> bool {
        self.redraw_flags.load(Ordering::Relaxed) != 0
    }

    #[inline]
    pub fn clear_redraw(&self) {
        self.redraw_flags.store(0, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_frame(&self) {
        self.frame_count.fetch_add(1, Ordering::Relaxed);
    }

    // ---- cursors -----------------------------------------------------------

    #[inline]
    pub fn cursor(&self, level: ViewLevel) -> usize {
        self.cursors[level]
    }

    /// Move the cursor at `level` by `delta`, clamped to `len` rows.
    pub fn move_cursor(&mut self, level: ViewLevel, delta: isize, len: usize) {
        let current = self.cursors[level];
        let next = if len == 0 {
            0
        } else {
            current.saturating_add_signed(delta).min(len - 1)
        };
        if next != current {
            self.cursors[level] = next;
            self.request_redraw(RedrawFlag::Main);
        }
    }

    pub fn cursor_to_end(&mut self, level: ViewLevel, len: usize) {
        self.cursors[level] = len.saturating_sub(1);
        self.request_redraw(RedrawFlag::Main);
    }

    /// Keep the cursor at `level` inside a list of `len` rows.
    pub fn clamp_cursor(&mut self, level: ViewLevel, len: usize) {
        let max = len.saturating_sub(1);
        if self.cursors[level] > max {
            self.cursors[level] = max;
        }
    }

    /// A fresh drill-down into `level` starts at the top.
    pub fn reset_cursor(&mut self, level: ViewLevel) {
        self.cursors[level] = 0;
    }

    pub fn reset_all_cursors(&mut self) {
        self.cursors = EnumMap::default();
    }

    // ---- notifications -----------------------------------------------------

    pub fn show_notification(
        &mut self,
        message: impl Into<CompactString>,
        level: NotificationLevel,
        auto_dismiss_ms: Option<u32>,
    ) {
        self.notification = Some(Notification {
            message: message.into(),
            level,
            timestamp: Instant::now(),
            auto_dismiss_ms,
        });
        self.request_redraw(RedrawFlag::Notification);
    }

    #[inline]
    pub fn show_info(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Info, Some(3000));
    }

    #[inline]
    pub fn show_success(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Success, Some(2000));
    }

    #[inline]
    pub fn show_warning(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Warning, Some(5000));
    }

    #[inline]
    pub fn show_error(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Error, None);
    }

    pub fn update_notification(&mut self) -> bool {
        if let Some(notification) = &self.notification
            && let Some(auto_dismiss_ms) = notification.auto_dismiss_ms
            && notification.timestamp.elapsed().as_millis() > u128::from(auto_dismiss_ms)
        {
            self.notification = None;
            self.request_redraw(RedrawFlag::Notification);
            return true;
        }
        false
    }

    // ---- overlays ----------------------------------------------------------

    pub fn set_overlay(&mut self, overlay: UIOverlay) {
        self.overlay = overlay;
        self.request_redraw(RedrawFlag::Overlay);
    }

    pub fn close_overlay(&mut self) {
        if self.overlay == UIOverlay::Prompt {
            self.clear_input();
        }
        self.set_overlay(UIOverlay::None);
    }

    pub fn start_loading(&mut self, progress: LoadProgress) {
        self.loading = Some(LoadingState::new("Loading study material", progress));
        self.set_overlay(UIOverlay::Loading);
    }

    pub fn finish_loading(&mut self) {
        self.loading = None;
        if self.overlay == UIOverlay::Loading {
            self.set_overlay(UIOverlay::None);
        }
    }

    pub fn overlay_title(&self) -> &'static str {
        match self.overlay {
            UIOverlay::Help => "Help",
            UIOverlay::Prompt => "Keyword Command",
            UIOverlay::Loading => "Loading",
            UIOverlay::None => "",
        }
    }

    pub const fn overlay_accepts_input(&self) -> bool {
        matches!(self.overlay, UIOverlay::Prompt)
    }

    // ---- prompt input ------------------------------------------------------

    pub fn clear_input(&mut self) {
        self.input = CompactString::new("");
        self.input_cursor = 0;
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut input_str = self.input.to_string();
        input_str.insert(self.input_cursor, ch);
        self.input = input_str.into();
        self.input_cursor += ch.len_utf8();
        self.request_redraw(RedrawFlag::Overlay);
    }

    pub fn delete_char_before(&mut self) -> bool {
        let Some((pos, _)) = self.input[..self.input_cursor].char_indices().next_back() else {
            return false;
        };
        let mut input_str = self.input.to_string();
        input_str.remove(pos);
        self.input = input_str.into();
        self.input_cursor = pos;
        self.request_redraw(RedrawFlag::Overlay);
        true
    }

    /// Take the submitted prompt text and close the prompt.
    pub fn take_input(&mut self) -> CompactString {
        let text = std::mem::take(&mut self.input);
        self.input_cursor = 0;
        self.set_overlay(UIOverlay::None);
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_clamped_per_level() {
        let mut ui = UIState::new();
        ui.move_cursor(ViewLevel::Branch, 5, 3);
        assert_eq!(ui.cursor(ViewLevel::Branch), 2);
        assert_eq!(ui.cursor(ViewLevel::Course), 0);

        ui.move_cursor(ViewLevel::Branch, -10, 3);
        assert_eq!(ui.cursor(ViewLevel::Branch), 0);

        ui.move_cursor(ViewLevel::Resource, 1, 0);
        assert_eq!(ui.cursor(ViewLevel::Resource), 0);
    }

    #[test]
    fn clamp_after_list_shrinks() {
        let mut ui = UIState::new();
        ui.cursor_to_end(ViewLevel::Resource, 5);
        ui.clamp_cursor(ViewLevel::Resource, 2);
        assert_eq!(ui.cursor(ViewLevel::Resource), 1);
    }

    #[test]
    fn prompt_editing_handles_multibyte() {
        let mut ui = UIState::new();
        ui.set_overlay(UIOverlay::Prompt);
        for ch in "bé".chars() {
            ui.insert_char(ch);
        }
        assert!(ui.delete_char_before());
        ui.insert_char('c');
        ui.insert_char('a');
        assert_eq!(ui.take_input(), "bca");
        assert_eq!(ui.overlay, UIOverlay::None);
        assert!(!ui.delete_char_before());
    }

    #[test]
    fn loading_overlay_follows_progress() {
        let mut ui = UIState::new();
        ui.start_loading(LoadProgress::new());
        assert_eq!(ui.overlay, UIOverlay::Loading);
        assert_eq!(ui.loading.as_ref().map(LoadingState::ratio), Some(0.0));

        ui.finish_loading();
        assert!(ui.loading.is_none());
        assert_eq!(ui.overlay, UIOverlay::None);
    }

    #[test]
    fn error_toasts_do_not_auto_dismiss() {
        let mut ui = UIState::new();
        ui.show_error("boom");
        assert!(!ui.update_notification());
        assert!(ui.notification.is_some());
    }

    #[test]
    fn test_atomic_operations() {
        let ui_state = UIState::new();

        ui_state.request_redraw(RedrawFlag::Main);
        assert!(ui_state.needs_redraw());

        ui_state.clear_redraw();
        assert!(!ui_state.needs_redraw());

        ui_state.increment_frame();
        assert_eq!(ui_state.frame_count.load(Ordering::Relaxed), 1);
    }
}
