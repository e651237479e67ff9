//! src/view/components/loading_overlay.rs
//! ============================================================
//! Progress box for the catalog load. Reads the shared counter
//! once per frame through `LoadingState::ratio`.

use crate::model::ui_state::LoadingState;
use crate::provider::data_provider::LoadProgress;
use crate::view::theme::Palette;
use ratatui::{
    layout::Flex,
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
};

pub struct LoadingOverlay;

impl LoadingOverlay {
    pub fn render(frame: &mut Frame<'_>, loading: &LoadingState, palette: &Palette, rect: Rect) {
        let elapsed = loading.start_time.elapsed();
        let done = loading.progress.completed();

        frame.render_widget(Clear, rect);

        let chrome = Block::default()
            .title(" Loading ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.purple))
            .style(palette.base());
        let inner = chrome.inner(rect);
        frame.render_widget(chrome, rect);

        let [message_area, gauge_area, elapsed_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(
                loading.message.as_str(),
                Style::default().fg(palette.yellow).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            message_area,
        );

        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(palette.pink).bg(palette.current_line))
                .ratio(loading.ratio().clamp(0.0, 1.0))
                .label(format!("{done}/{} collections", LoadProgress::TOTAL)),
            gauge_area,
        );

        frame.render_widget(
            Paragraph::new(format!("Elapsed: {elapsed:.0?}"))
                .style(palette.muted())
                .alignment(Alignment::Center),
            elapsed_area,
        );
    }
}
