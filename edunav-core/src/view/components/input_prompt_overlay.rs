//! ``src/view/components/input_prompt_overlay.rs``
//! ============================================================================
//! # `InputPromptOverlay`: keyword command entry

use crate::view::{snapshots::UiSnapshot, theme::Palette};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    widgets::{Block, Borders, Clear, Paragraph},
};

pub struct InputPromptOverlay;

impl InputPromptOverlay {
    #[allow(clippy::cast_possible_truncation)]
    pub fn render(frame: &mut Frame<'_>, snap: &UiSnapshot, palette: &Palette, area: Rect) {
        frame.render_widget(Clear, area);

        let input_block = Block::default()
            .borders(Borders::ALL)
            .title(" Keyword Command ")
            .title_alignment(Alignment::Center)
            .title_bottom(" try \"btech\" or \"bca\" • Enter run • Esc cancel ")
            .border_style(palette.border())
            .title_style(palette.title())
            .style(palette.base());

        let input_paragraph = Paragraph::new(snap.prompt_input.as_str()).block(input_block);
        frame.render_widget(input_paragraph, area);

        let width = snap.prompt_input[..snap.prompt_cursor.min(snap.prompt_input.len())]
            .chars()
            .count() as u16;
        frame.set_cursor_position((
            (area.x + width + 1).min(area.right().saturating_sub(2)),
            area.y + 1,
        ));
    }
}
