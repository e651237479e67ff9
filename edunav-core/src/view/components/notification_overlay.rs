//! src/view/components/notification_overlay.rs
use crate::model::ui_state::{Notification, NotificationLevel};
use crate::view::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::{debug, instrument};

pub struct NotificationOverlay;

impl NotificationOverlay {
    #[instrument(
        level = "trace",
        skip_all,
        fields(level = ?notification.level, message_len = notification.message.len())
    )]
    pub fn render(frame: &mut Frame<'_>, notification: &Notification, palette: &Palette, area: Rect) {
        frame.render_widget(Clear, area);

        let (color, title, icon) = match notification.level {
            NotificationLevel::Info => (palette.cyan, "Info", "ℹ"),
            NotificationLevel::Warning => (palette.yellow, "Warning", "⚠"),
            NotificationLevel::Error => (palette.red, "Error", "✕"),
            NotificationLevel::Success => (palette.green, "Success", "✓"),
        };
        let border_style = Style::default().fg(color);

        if notification.level == NotificationLevel::Error {
            debug!(message = %notification.message, "Error notification displayed");
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {icon} {title} "))
            .title_style(border_style.bold())
            .border_style(border_style)
            .style(palette.base());

        let message = Paragraph::new(notification.message.as_str())
            .block(block)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Left);
        frame.render_widget(message, area);
    }
}
