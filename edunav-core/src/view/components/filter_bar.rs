//! src/view/components/filter_bar.rs

use crate::{
    model::filters::FilterValue,
    view::{snapshots::FilterBar as FilterModel, theme::Palette},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub struct FilterBar;

impl FilterBar {
    pub fn render(frame: &mut Frame<'_>, filters: &FilterModel, palette: &Palette, area: Rect) {
        let mut spans = vec![Span::styled("Type ", palette.muted())];
        Self::push_options(&mut spans, &filters.type_options, &filters.resource_type, palette);
        spans.push(Span::styled("   Language ", palette.muted()));
        Self::push_options(
            &mut spans,
            &filters.language_options,
            &filters.language,
            palette,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Filters (t / L) ")
            .title_style(palette.title())
            .border_style(palette.border());

        frame.render_widget(
            Paragraph::new(Line::from(spans))
                .block(block)
                .style(palette.base()),
            area,
        );
    }

    fn push_options<'a>(
        spans: &mut Vec<Span<'a>>,
        options: &[FilterValue],
        current: &FilterValue,
        palette: &Palette,
    ) {
        for option in options {
            let style = if option == current {
                Style::default()
                    .fg(palette.background)
                    .bg(palette.purple)
                    .bold()
            } else {
                Style::default().fg(palette.foreground)
            };
            spans.push(Span::styled(format!(" {option} "), style));
        }
    }
}
