//! src/view/ui.rs
//! ============================================================
//! Frame renderer that draws the entire TUI from the immutable
//! `ViewSnapshot` / `UiSnapshot` pair. No state is touched while
//! painting.

use std::time::{Duration, Instant};

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tracing::{instrument, trace};

use crate::{
    model::ui_state::{LoadingState, NotificationLevel, UIOverlay},
    view::{
        components::{
            breadcrumb_bar::BreadcrumbBar, card_table::CardTable, error_overlay::ErrorOverlay,
            filter_bar::FilterBar, help_overlay::HelpOverlay,
            input_prompt_overlay::InputPromptOverlay, loading_overlay::LoadingOverlay,
            notification_overlay::NotificationOverlay, status_bar::StatusBar,
        },
        snapshots::{Body, UiSnapshot, ViewSnapshot},
        theme::{self, Palette},
    },
};

/// ---------------------------------------------------------------------------
/// Renderer struct (contains only caches + stats)
/// ---------------------------------------------------------------------------
#[derive(Default)]
pub struct UIRenderer {
    cache: LayoutCache,
    stats: RenderStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MainAreas {
    crumbs: Option<Rect>,
    filters: Option<Rect>,
    body: Rect,
    status: Rect,
}

/// Keyed on screen size and which optional bars are shown.
#[derive(Default)]
struct LayoutCache {
    key: Option<(Rect, bool, bool)>,
    areas: MainAreas,
    hit: u64,
    miss: u64,
}

#[derive(Debug, Default)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: Duration,
}

impl RenderStats {
    pub fn fps(&self) -> f64 {
        if self.frames > 0 {
            self.frames as f64 / self.total.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// ---------------------------------------------------------------------------
/// public API
/// ---------------------------------------------------------------------------
impl UIRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    #[instrument(level = "trace", skip_all, fields(view = %view.view))]
    pub fn render(
        &mut self,
        f: &mut Frame<'_>,
        view: &ViewSnapshot,
        ui: &UiSnapshot,
        loading: Option<&LoadingState>,
    ) {
        let start = Instant::now();
        let palette = theme::palette(view.theme);

        let areas = self.layout(
            f.area(),
            !view.breadcrumbs.is_empty(),
            view.filters.is_some(),
        );

        f.render_widget(Block::default().style(palette.base()), f.area());

        if let Some(r) = areas.crumbs {
            BreadcrumbBar::render(f, &view.breadcrumbs, palette, r);
        }
        if let (Some(r), Some(filters)) = (areas.filters, view.filters.as_ref()) {
            FilterBar::render(f, filters, palette, r);
        }
        self.draw_body(f, view, palette, areas.body);
        StatusBar::render(f, view, palette, areas.status);

        self.draw_overlays(f, ui, loading, palette);

        let dur = start.elapsed();
        self.stats.total += dur;
        if dur.as_millis() > 16 {
            self.stats.slow += 1;
        }
        self.stats.frames += 1;
        trace!(frame = self.stats.frames, elapsed_us = dur.as_micros() as u64, "Frame drawn");
    }
}

/// ---------------------------------------------------------------------------
/// main components
/// ---------------------------------------------------------------------------
impl UIRenderer {
    fn draw_body(&self, f: &mut Frame<'_>, view: &ViewSnapshot, palette: &Palette, area: Rect) {
        match &view.body {
            Body::Cards(cards) => {
                CardTable::render(f, cards, view.view, &view.heading, view.cursor, palette, area);
            }

            Body::Empty { headline, hint } => {
                let mut lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(*headline, Style::default().fg(palette.foreground).bold())),
                ];
                if let Some(hint) = hint {
                    lines.push(Line::from(Span::styled(*hint, palette.muted())));
                }
                f.render_widget(
                    Paragraph::new(lines)
                        .block(Self::chrome(&view.heading, palette))
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true }),
                    area,
                );
            }

            Body::Unavailable { reason } => ErrorOverlay::new(reason).render(f, palette, area),

            Body::Loading { percent } => {
                f.render_widget(
                    Paragraph::new(format!("Loading study material… {percent}%"))
                        .block(Self::chrome(" Loading ", palette))
                        .style(palette.muted())
                        .alignment(Alignment::Center),
                    area,
                );
            }
        }
    }

    fn chrome<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title.trim()))
            .title_style(palette.title())
            .border_style(palette.border())
            .style(palette.base())
    }
}

/// ---------------------------------------------------------------------------
/// overlays
/// ---------------------------------------------------------------------------
impl UIRenderer {
    fn draw_overlays(
        &self,
        f: &mut Frame<'_>,
        ui: &UiSnapshot,
        loading: Option<&LoadingState>,
        palette: &Palette,
    ) {
        let scr = f.area();

        match ui.overlay {
            UIOverlay::Help => HelpOverlay::render(f, palette, Self::centered(scr, 70, 80)),
            UIOverlay::Prompt => {
                let mut r = Self::centered(scr, 60, 0);
                r.height = 3.min(scr.height);
                r.y = scr.y + scr.height.saturating_sub(r.height) / 2;
                InputPromptOverlay::render(f, ui, palette, r);
            }
            UIOverlay::Loading => {
                if let Some(l) = loading {
                    let mut r = Self::centered(scr, 50, 30);
                    r.height = r.height.max(5).min(scr.height);
                    LoadingOverlay::render(f, l, palette, r);
                }
            }
            UIOverlay::None => {}
        }

        if let Some(n) = &ui.notification {
            NotificationOverlay::render(f, n, palette, Self::notification_rect(scr, n.level));
        }
    }
}

/// ---------------------------------------------------------------------------
/// util: layout / rectangles
/// ---------------------------------------------------------------------------
impl UIRenderer {
    fn layout(&mut self, scr: Rect, crumbs: bool, filters: bool) -> MainAreas {
        let key = (scr, crumbs, filters);
        if self.cache.key == Some(key) {
            self.cache.hit += 1;
            return self.cache.areas;
        }
        self.cache.miss += 1;

        let [crumb_area, filter_area, body, status] = Layout::vertical([
            Constraint::Length(u16::from(crumbs)),
            Constraint::Length(if filters { 3 } else { 0 }),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(scr);

        let areas = MainAreas {
            crumbs: crumbs.then_some(crumb_area),
            filters: filters.then_some(filter_area),
            body,
            status,
        };
        self.cache.key = Some(key);
        self.cache.areas = areas;
        areas
    }

    fn centered(r: Rect, w_pct: u16, h_pct: u16) -> Rect {
        let w = (r.width * w_pct / 100).min(r.width);
        let h = (r.height * h_pct / 100).min(r.height);
        Rect {
            x: r.x + (r.width - w) / 2,
            y: r.y + (r.height - h) / 2,
            width: w,
            height: h,
        }
    }

    fn notification_rect(scr: Rect, lvl: NotificationLevel) -> Rect {
        let h = if lvl == NotificationLevel::Error { 5 } else { 3 };
        let w = (scr.width * 60) / 100;
        Rect {
            x: scr.x + (scr.width - w) / 2,
            y: scr.y + 1.min(scr.height),
            width: w,
            height: h.min(scr.height.saturating_sub(1)),
        }
    }
}

// ---------------------------------------------------------------------------
// tests
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureFlags;
    use crate::error::AppError;
    use crate::model::app_state::AppState;
    use crate::model::catalog::fixtures::sample;
    use crate::model::preferences::Preferences;
    use crate::model::ui_state::UIState;
    use edunav_prefs::MemoryStore;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(state: &AppState, ui: &UIState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut renderer = UIRenderer::new();
        let view = ViewSnapshot::capture(state, ui);
        let overlay = UiSnapshot::from(ui);
        terminal
            .draw(|f| renderer.render(f, &view, &overlay, ui.loading.as_ref()))
            .unwrap();
        assert_eq!(renderer.stats().frames, 1);

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn state() -> AppState {
        AppState::new(Preferences::new(MemoryStore::new()), FeatureFlags::default())
    }

    #[test]
    fn course_listing_is_drawn() {
        let mut app = state();
        app.catalog_loaded(Ok(sample()));

        let screen = draw(&app, &UIState::new());
        assert!(screen.contains("Choose Your Course"));
        assert!(screen.contains("BTech"));
    }

    #[test]
    fn failed_load_draws_error_panel() {
        let mut app = state();
        app.catalog_loaded(Err(AppError::provider_unavailable("courses: down")));

        let screen = draw(&app, &UIState::new());
        assert!(screen.contains("Error Loading Content"));
        assert!(screen.contains("reload"));
    }

    #[test]
    fn help_overlay_lists_keys() {
        let mut app = state();
        app.catalog_loaded(Ok(sample()));
        let mut ui = UIState::new();
        ui.set_overlay(UIOverlay::Help);

        let screen = draw(&app, &ui);
        assert!(screen.contains("Cycle resource type filter"));
    }

    #[test]
    fn layout_cache_hits_on_same_screen() {
        let mut r = UIRenderer::new();
        let scr = Rect::new(0, 0, 100, 40);
        r.layout(scr, true, false);
        let areas = r.layout(scr, true, false);
        assert_eq!(r.cache.hit, 1);
        assert_eq!(areas.crumbs.map(|a| a.height), Some(1));
        assert!(areas.filters.is_none());
    }
}
