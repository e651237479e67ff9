//! src/view/components/error_overlay.rs
//! Blocking panel shown in place of the listing when the catalog failed to
//! load. Only reload and quit are offered.
use crate::view::theme::Palette;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub struct ErrorOverlay<'a> {
    reason: &'a str,
}

impl<'a> ErrorOverlay<'a> {
    pub fn new(reason: &'a str) -> Self {
        Self { reason }
    }

    pub fn render(&self, frame: &mut Frame<'_>, palette: &Palette, area: Rect) {
        let block = Block::default()
            .title(" Error Loading Content ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.red))
            .style(palette.base());

        let text = Text::from(vec![
            Line::from(""),
            Line::from(Span::styled(
                "The study material could not be loaded.",
                Style::default().fg(palette.red).bold(),
            )),
            Line::from(""),
            Line::from(Span::styled(self.reason, palette.muted())),
            Line::from(""),
            Line::from(vec![
                Span::styled("r", Style::default().fg(palette.yellow).bold()),
                Span::raw(" reload    "),
                Span::styled("q", Style::default().fg(palette.yellow).bold()),
                Span::raw(" quit"),
            ]),
        ]);

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(text)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}
