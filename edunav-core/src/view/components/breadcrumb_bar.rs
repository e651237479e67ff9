//! src/view/components/breadcrumb_bar.rs
//! Crumb trail above the listing. Followable crumbs carry their number key.

use crate::view::{snapshots::Crumb, theme::Palette};
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

pub struct BreadcrumbBar;

impl BreadcrumbBar {
    pub fn render(frame: &mut Frame<'_>, crumbs: &[Crumb], palette: &Palette, area: Rect) {
        let mut spans = Vec::with_capacity(crumbs.len() * 3);

        for (i, crumb) in crumbs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" › ", palette.muted()));
            }
            match crumb.target {
                Some(_) => {
                    spans.push(Span::styled(format!("{i}:"), palette.muted()));
                    spans.push(Span::styled(
                        crumb.label.as_str(),
                        Style::default().fg(palette.cyan),
                    ));
                }
                None => spans.push(Span::styled(
                    crumb.label.as_str(),
                    Style::default().fg(palette.foreground).bold(),
                )),
            }
        }

        Paragraph::new(Line::from(spans))
            .style(palette.base())
            .render(area, frame.buffer_mut());
    }
}
