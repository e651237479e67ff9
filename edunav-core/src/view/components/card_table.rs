//! src/view/components/card_table.rs

use crate::{
    model::navigation::ViewLevel,
    view::{
        icons,
        snapshots::Card,
        theme::Palette,
    },
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, HighlightSpacing, Row, Table, TableState},
};

pub struct CardTable;

impl CardTable {
    pub fn render(
        frame: &mut Frame<'_>,
        cards: &[Card],
        view: ViewLevel,
        heading: &str,
        cursor: usize,
        palette: &Palette,
        area: Rect,
    ) {
        let header = Row::new(vec!["Name", "Details", ""])
            .style(Style::default().fg(palette.yellow).bold())
            .bottom_margin(1);

        let rows: Vec<Row> = cards.iter().map(|card| Self::row(card, view, palette)).collect();

        let widths = [
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Length(5),
        ];

        let mut table_state = TableState::default().with_selected(Some(cursor));

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", heading))
                    .title_style(palette.title())
                    .border_style(palette.border())
                    .style(palette.base()),
            )
            .row_highlight_style(palette.highlight())
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(table, area, &mut table_state);
    }

    fn row<'a>(card: &'a Card, view: ViewLevel, palette: &Palette) -> Row<'a> {
        let (icon, badge_style) = match (view, card.badge.as_deref()) {
            (ViewLevel::Resource, Some(kind)) => (
                icons::resource_icon(kind),
                Style::default().fg(palette.badge(kind)).bold(),
            ),
            _ => (icons::level_icon(view), Style::default().fg(palette.cyan)),
        };

        let mut title = vec![Span::raw(format!("{icon} "))];
        if let Some(badge) = card.badge.as_deref() {
            title.push(Span::styled(format!("[{badge}] "), badge_style));
        }
        title.push(Span::styled(
            card.title.as_str(),
            Style::default().fg(palette.foreground),
        ));

        let details = if card.description.is_empty() {
            card.details.join(" · ")
        } else if card.details.is_empty() {
            card.description.clone()
        } else {
            format!("{} · {}", card.details.join(" · "), card.description)
        };

        let mut flags = String::new();
        if card.bookmarked {
            flags.push_str(icons::BOOKMARK_ICON);
            flags.push(' ');
        }
        if card.downloaded {
            flags.push_str(icons::DOWNLOADED_ICON);
        }

        Row::new(vec![
            Cell::from(Line::from(title)),
            Cell::from(details).style(palette.muted()),
            Cell::from(flags).style(Style::default().fg(palette.pink)),
        ])
    }
}
