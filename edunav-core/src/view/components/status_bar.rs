//! src/view/components/status_bar.rs
//!
//! One-line footer: current view and listing position on the left, theme and
//! key hints on the right.

use crate::view::{icons, snapshots::ViewSnapshot, theme::Palette};
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame<'_>, snapshot: &ViewSnapshot, palette: &Palette, area: Rect) {
        let count = snapshot.card_count();
        let position = if count == 0 {
            "0/0".to_string()
        } else {
            format!("{}/{}", snapshot.cursor + 1, count)
        };

        let left_text = format!(
            " {} {} | {} ",
            icons::level_icon(snapshot.view),
            snapshot.view,
            position
        );
        let right_text = format!(
            "{} | ? help  : command  T theme  q quit ",
            snapshot.theme.as_str()
        );

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(area);

        let style = Style::default()
            .fg(palette.foreground)
            .bg(palette.current_line);

        Paragraph::new(left_text)
            .style(style)
            .alignment(Alignment::Left)
            .render(left, frame.buffer_mut());

        Paragraph::new(right_text)
            .style(style)
            .alignment(Alignment::Right)
            .render(right, frame.buffer_mut());
    }
}
