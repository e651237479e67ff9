//! Key reference, grouped by what the keys act on.
use crate::view::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Browsing",
        &[
            ("↑↓ / j k", "Move selection"),
            ("PgUp/PgDn", "Page up/down"),
            ("g / G", "First / last item"),
            ("Enter / l", "Open course, branch, semester or subject; open a resource"),
            ("Esc / h", "Back one level"),
            ("0 / H", "Home (course list)"),
            ("1 2 3", "Jump to breadcrumb"),
        ],
    ),
    (
        "Resources",
        &[
            ("t", "Cycle resource type filter"),
            ("L", "Cycle language filter"),
            ("b", "Bookmark / unbookmark"),
            ("d", "Mark as downloaded"),
        ],
    ),
    (
        "Application",
        &[
            (":", "Keyword command (\"btech\", \"bca\", course name)"),
            ("T", "Toggle light / dark theme"),
            ("r", "Reload after a failed load"),
            ("? / Esc", "Close this help"),
            ("q / Ctrl+C", "Quit"),
        ],
    ),
];

pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame<'_>, palette: &Palette, area: Rect) {
        frame.render_widget(Clear, area);

        let heading = Style::default()
            .fg(palette.yellow)
            .add_modifier(Modifier::BOLD);
        let key = Style::default().fg(palette.cyan);

        let mut lines = Vec::new();
        for (title, keys) in SECTIONS {
            lines.push(Line::from(Span::styled(*title, heading)));
            for (k, what) in *keys {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {k:<12}"), key),
                    Span::raw(*what),
                ]));
            }
            lines.push(Line::from(""));
        }

        let help = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" edunav Help ")
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(palette.purple))
                    .style(palette.base()),
            )
            .wrap(Wrap { trim: false });

        frame.render_widget(help, area);
    }
}
