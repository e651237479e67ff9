//! src/view/snapshots.rs
//! ============================================================
//! Immutable render models harvested from `AppState` and
//! `UIState` once per frame.
//!
//! `ViewSnapshot::capture` is a pure function of the two
//! states: widgets draw only what it returns, so every screen
//! can be asserted on without a terminal.

use compact_str::{CompactString, format_compact};
use smallvec::SmallVec;

use crate::model::app_state::{AppState, LoadStatus};
use crate::model::catalog::Catalog;
use crate::model::filters::FilterValue;
use crate::model::navigation::ViewLevel;
use crate::model::preferences::Theme;
use crate::model::records::RecordId;
use crate::model::ui_state::{Notification, UIOverlay, UIState};

const DEFAULT_TITLE: &str = "Free BTech BCA Notes, PYQ & Study Material | edunav";
const DEFAULT_DESCRIPTION: &str =
    "Download free engineering notes, previous year questions, and study materials.";
const DEFAULT_KEYWORDS: &str = "btech notes, engineering notes, pyq, study material";

/// One breadcrumb. `target` is the view re-derived when the
/// crumb is followed; the last crumb has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: CompactString,
    pub target: Option<ViewLevel>,
}

/// A selectable row in the current listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: RecordId,
    pub title: String,
    pub description: String,

    /// Short tag drawn before the title (type, code, number)
    pub badge: Option<CompactString>,

    /// Secondary facts, drawn dimmed
    pub details: SmallVec<[CompactString; 4]>,

    pub bookmarked: bool,
    pub downloaded: bool,
    pub link: Option<String>,
    pub is_video: bool,
}

impl Card {
    fn plain(id: &RecordId, title: &str, description: &str) -> Self {
        Self {
            id: id.clone(),
            title: title.to_string(),
            description: description.to_string(),
            badge: None,
            details: SmallVec::new(),
            bookmarked: false,
            downloaded: false,
            link: None,
            is_video: false,
        }
    }
}

/// Main panel content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Loading { percent: u16 },
    Unavailable { reason: String },
    Cards(Vec<Card>),
    Empty {
        headline: &'static str,
        hint: Option<&'static str>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBar {
    pub resource_type: FilterValue,
    pub language: FilterValue,
    pub type_options: Vec<FilterValue>,
    pub language_options: Vec<FilterValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            keywords: DEFAULT_KEYWORDS.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub view: ViewLevel,
    pub heading: String,

    /// Empty when nothing is selected or breadcrumbs are off
    pub breadcrumbs: SmallVec<[Crumb; 5]>,

    pub body: Body,

    /// Present only on the resource view
    pub filters: Option<FilterBar>,

    /// `None` when page meta is disabled
    pub page_meta: Option<PageMeta>,

    pub theme: Theme,
    pub cursor: usize,
}

impl ViewSnapshot {
    pub fn capture(state: &AppState, ui: &UIState) -> Self {
        let view = state.current_view();
        let features = state.features();

        let breadcrumbs = if features.breadcrumbs {
            breadcrumbs(state)
        } else {
            SmallVec::new()
        };
        let page_meta = features.page_meta.then(|| page_meta(state));

        let (heading, body) = match state.status() {
            LoadStatus::Failed(reason) => (
                "Error Loading Content".to_string(),
                Body::Unavailable {
                    reason: reason.clone(),
                },
            ),
            LoadStatus::Loading => (
                "Loading".to_string(),
                Body::Loading {
                    percent: ui.loading.as_ref().map_or(0, |l| l.progress.percent()),
                },
            ),
            LoadStatus::Ready => (heading(state), listing(state)),
        };

        let filters = (view == ViewLevel::Resource && matches!(state.status(), LoadStatus::Ready))
            .then(|| {
                let (type_options, language_options) = state.filter_options();
                FilterBar {
                    resource_type: state.filters().resource_type.clone(),
                    language: state.filters().language.clone(),
                    type_options,
                    language_options,
                }
            });

        let cursor = match &body {
            Body::Cards(cards) => ui.cursor(view).min(cards.len().saturating_sub(1)),
            _ => 0,
        };

        Self {
            view,
            heading,
            breadcrumbs,
            body,
            filters,
            page_meta,
            theme: state.theme(),
            cursor,
        }
    }

    /// Card under the cursor, if the listing has any.
    pub fn selected_card(&self) -> Option<&Card> {
        match &self.body {
            Body::Cards(cards) => cards.get(self.cursor),
            _ => None,
        }
    }

    pub fn card_count(&self) -> usize {
        match &self.body {
            Body::Cards(cards) => cards.len(),
            _ => 0,
        }
    }
}

fn heading(state: &AppState) -> String {
    let Some(catalog) = state.catalog() else {
        return String::new();
    };
    let nav = state.navigator();
    match state.current_view() {
        ViewLevel::Course => "Choose Your Course".to_string(),
        ViewLevel::Branch => nav
            .course(catalog)
            .map(|c| format!("{} - Select Branch", c.name))
            .unwrap_or_default(),
        ViewLevel::Semester => nav
            .branch(catalog)
            .map(|b| format!("{} - Select Semester", b.name))
            .unwrap_or_default(),
        ViewLevel::Subject => nav
            .semester(catalog)
            .map(|s| format!("Semester {} - Select Subject", s.number))
            .unwrap_or_default(),
        ViewLevel::Resource => nav
            .subject(catalog)
            .map(|s| format!("{} - Resources", s.name))
            .unwrap_or_default(),
    }
}

/// University tags may hold a university id or a plain name.
fn university_label<'a>(catalog: &'a Catalog, tag: Option<&'a str>, untagged: &'a str) -> &'a str {
    match tag.map(str::trim).filter(|t| !t.is_empty()) {
        Some(tag) => catalog
            .university(&RecordId::from(tag))
            .map_or(tag, |u| u.name.as_str()),
        None => untagged,
    }
}

fn listing(state: &AppState) -> Body {
    let Some(catalog) = state.catalog() else {
        return Body::Cards(Vec::new());
    };
    let selection = state.navigator().selection();
    let library = state.library();

    let (cards, empty): (Vec<Card>, Body) = match state.current_view() {
        ViewLevel::Course => (
            catalog
                .courses
                .iter()
                .map(|c| Card::plain(&c.id, &c.name, &c.description))
                .collect(),
            Body::Empty {
                headline: "No courses available yet.",
                hint: None,
            },
        ),
        ViewLevel::Branch => (
            selection
                .course
                .iter()
                .flat_map(|id| catalog.branches_of(id))
                .map(|b| {
                    let mut card = Card::plain(&b.id, &b.name, &b.description);
                    card.badge = Some(CompactString::from(university_label(
                        catalog,
                        b.university.as_deref(),
                        "All Universities",
                    )));
                    card
                })
                .collect(),
            Body::Empty {
                headline: "No branches available yet.",
                hint: None,
            },
        ),
        ViewLevel::Semester => (
            selection
                .branch
                .iter()
                .flat_map(|id| catalog.semesters_of(id))
                .map(|s| {
                    let mut card = Card::plain(&s.id, &s.name, "");
                    card.badge = Some(CompactString::from(s.number.as_str()));
                    card
                })
                .collect(),
            Body::Empty {
                headline: "No semesters available yet.",
                hint: None,
            },
        ),
        ViewLevel::Subject => (
            selection
                .semester
                .iter()
                .flat_map(|id| catalog.subjects_of(id))
                .map(|s| {
                    let mut card = Card::plain(&s.id, &s.name, &s.description);
                    card.badge = Some(CompactString::from(s.code.as_str()));
                    card.details.push(format_compact!("{} Credits", s.credits));
                    card
                })
                .collect(),
            Body::Empty {
                headline: "No subjects available yet.",
                hint: None,
            },
        ),
        ViewLevel::Resource => (
            state
                .filtered_resources()
                .into_iter()
                .map(|r| {
                    let mut card = Card::plain(&r.id, &r.title, &r.description);
                    card.badge = Some(CompactString::from(r.kind.as_str()));
                    card.details.push(CompactString::from(
                        r.language.as_deref().unwrap_or("English"),
                    ));
                    card.details.push(CompactString::from(university_label(
                        catalog,
                        r.university.as_deref(),
                        "All",
                    )));
                    if let Some(year) = r.year.as_deref() {
                        card.details.push(CompactString::from(year));
                    }
                    card.details.push(format_compact!("{} downloads", r.downloads));
                    card.bookmarked = library.is_bookmarked(&r.id);
                    card.downloaded = library.is_downloaded(&r.id);
                    card.link = (!r.link.is_empty()).then(|| r.link.clone());
                    card.is_video = r.is_video();
                    card
                })
                .collect(),
            Body::Empty {
                headline: "No resources found",
                hint: Some("Try different filters or check back later."),
            },
        ),
    };

    if cards.is_empty() { empty } else { Body::Cards(cards) }
}

fn breadcrumbs(state: &AppState) -> SmallVec<[Crumb; 5]> {
    let mut crumbs = SmallVec::new();
    let Some(catalog) = state.catalog() else {
        return crumbs;
    };
    let nav = state.navigator();
    if nav.selection().is_empty() {
        return crumbs;
    }

    crumbs.push(Crumb {
        label: CompactString::from("Home"),
        target: Some(ViewLevel::Course),
    });
    if let Some(course) = nav.course(catalog) {
        crumbs.push(Crumb {
            label: CompactString::from(course.name.as_str()),
            target: Some(ViewLevel::Branch),
        });
    }
    if let Some(branch) = nav.branch(catalog) {
        crumbs.push(Crumb {
            label: CompactString::from(branch.name.as_str()),
            target: Some(ViewLevel::Semester),
        });
    }
    if let Some(semester) = nav.semester(catalog) {
        crumbs.push(Crumb {
            label: format_compact!("Semester {}", semester.number),
            target: Some(ViewLevel::Subject),
        });
    }
    if let Some(subject) = nav.subject(catalog) {
        crumbs.push(Crumb {
            label: CompactString::from(subject.name.as_str()),
            target: None,
        });
    }
    crumbs
}

fn page_meta(state: &AppState) -> PageMeta {
    let Some(catalog) = state.catalog() else {
        return PageMeta::default();
    };
    let nav = state.navigator();
    let (Some(subject), Some(branch), Some(semester)) = (
        nav.subject(catalog),
        nav.branch(catalog),
        nav.semester(catalog),
    ) else {
        return PageMeta::default();
    };

    let subject_lc = subject.name.to_lowercase();
    PageMeta {
        title: format!(
            "{} Notes, PYQ & Videos | Sem {} {}",
            subject.name, semester.number, branch.name
        ),
        description: format!(
            "Download {} complete notes, previous year questions, solutions & video lectures. \
             {} Semester {}. Free PDF download.",
            subject.name, branch.name, semester.number
        ),
        keywords: format!(
            "{subject_lc} notes, {subject_lc} pyq, {} notes, semester {}, {}",
            branch.name.to_lowercase(),
            semester.number,
            subject.meta_keywords.as_deref().unwrap_or("")
        ),
    }
}

// ------------------------------------------------------------
// UiSnapshot
// ------------------------------------------------------------

/// Immutable slice of the presentation state, captured once per
/// frame.
#[derive(Debug, Clone)]
pub struct UiSnapshot {
    pub overlay: UIOverlay,
    pub notification: Option<Notification>,
    pub prompt_input: CompactString,
    pub prompt_cursor: usize,
}

impl From<&UIState> for UiSnapshot {
    fn from(src: &UIState) -> Self {
        Self {
            overlay: src.overlay,
            notification: src.notification.clone(),
            prompt_input: src.input.clone(),
            prompt_cursor: src.input_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureFlags;
    use crate::error::AppError;
    use crate::model::catalog::fixtures::{branch, course, resource, sample, semester, subject};
    use crate::model::preferences::Preferences;
    use edunav_prefs::MemoryStore;

    fn ready() -> AppState {
        let mut state = AppState::new(Preferences::new(MemoryStore::new()), FeatureFlags::default());
        state.catalog_loaded(Ok(sample()));
        state
    }

    fn card_ids(snapshot: &ViewSnapshot) -> Vec<&str> {
        match &snapshot.body {
            Body::Cards(cards) => cards.iter().map(|c| c.id.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn course_view_lists_courses_without_breadcrumbs() {
        let state = ready();
        let snap = ViewSnapshot::capture(&state, &UIState::new());

        assert_eq!(snap.view, ViewLevel::Course);
        assert_eq!(card_ids(&snap), ["1", "2"]);
        assert!(snap.breadcrumbs.is_empty());
        assert_eq!(snap.page_meta, Some(PageMeta::default()));
        assert!(snap.filters.is_none());
    }

    #[test]
    fn empty_child_list_shows_placeholder() {
        let mut state = ready();
        state.select_course(&"2".into()).unwrap();
        let snap = ViewSnapshot::capture(&state, &UIState::new());

        assert_eq!(snap.heading, "BCA - Select Branch");
        assert_eq!(
            snap.body,
            Body::Empty {
                headline: "No branches available yet.",
                hint: None
            }
        );
        assert!(snap.selected_card().is_none());
    }

    #[test]
    fn resource_view_has_crumbs_filters_meta_and_flags() {
        let mut state = ready();
        state.select_course(&"1".into()).unwrap();
        state.select_branch(&"10".into()).unwrap();
        state.select_semester(&"20".into()).unwrap();
        state.select_subject(&"5".into()).unwrap();
        state.toggle_bookmark(&"101".into()).unwrap();

        let snap = ViewSnapshot::capture(&state, &UIState::new());

        let labels: Vec<_> = snap.breadcrumbs.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Home", "BTech", "CSE", "Semester 3", "Data Structures"]);
        assert_eq!(snap.breadcrumbs[1].target, Some(ViewLevel::Branch));
        assert_eq!(snap.breadcrumbs[4].target, None);

        assert_eq!(card_ids(&snap), ["100", "101"]);
        let Body::Cards(cards) = &snap.body else {
            panic!("expected cards");
        };
        assert!(cards[0].is_video);
        assert!(cards[1].bookmarked && !cards[0].bookmarked);

        let filters = snap.filters.as_ref().unwrap();
        assert!(filters.resource_type.is_all());
        assert_eq!(filters.language_options.len(), 3);

        let meta = snap.page_meta.unwrap();
        assert_eq!(meta.title, "Data Structures Notes, PYQ & Videos | Sem 3 CSE");
        assert!(meta.keywords.starts_with("data structures notes, data structures pyq, cse notes"));
    }

    #[test]
    fn university_tags_resolve_to_names() {
        let mut tagged = resource("100", "5", "Notes", "en");
        tagged.university = Some("u1".into());
        let mut named = resource("101", "5", "Notes", "en");
        named.university = Some("IPU".into());
        let mut cse = branch("10", "1", "CSE");
        cse.university = Some("u1".into());

        let mut state = AppState::new(Preferences::new(MemoryStore::new()), FeatureFlags::default());
        state.catalog_loaded(Ok(Catalog::new(
            vec![course("1", "BTech")],
            vec![cse],
            vec![semester("20", "10", "3")],
            vec![subject("5", "20", "Maths")],
            vec![tagged, named, resource("102", "5", "Notes", "en")],
            sample().universities,
        )));

        state.select_course(&"1".into()).unwrap();
        let snap = ViewSnapshot::capture(&state, &UIState::new());
        let Body::Cards(cards) = &snap.body else {
            panic!("expected cards");
        };
        assert_eq!(cards[0].badge.as_deref(), Some("AKTU"));

        state.select_branch(&"10".into()).unwrap();
        state.select_semester(&"20".into()).unwrap();
        state.select_subject(&"5".into()).unwrap();
        let snap = ViewSnapshot::capture(&state, &UIState::new());
        let Body::Cards(cards) = &snap.body else {
            panic!("expected cards");
        };
        let universities: Vec<_> = cards.iter().map(|c| c.details[1].as_str()).collect();
        assert_eq!(universities, ["AKTU", "IPU", "All"]);
    }

    #[test]
    fn filtered_out_resources_show_no_resources_found() {
        let mut state = ready();
        state.select_course(&"1".into()).unwrap();
        state.select_branch(&"10".into()).unwrap();
        state.select_semester(&"20".into()).unwrap();
        state.select_subject(&"6".into()).unwrap();
        state
            .set_resource_type_filter(FilterValue::only("Video"))
            .unwrap();

        let snap = ViewSnapshot::capture(&state, &UIState::new());
        assert!(matches!(snap.body, Body::Empty { headline: "No resources found", .. }));
    }

    #[test]
    fn failed_load_renders_unavailable_panel() {
        let mut state = AppState::new(Preferences::new(MemoryStore::new()), FeatureFlags::default());
        state.catalog_loaded(Err(AppError::provider_unavailable("resources: timed out")));

        let snap = ViewSnapshot::capture(&state, &UIState::new());
        match snap.body {
            Body::Unavailable { reason } => assert!(reason.contains("timed out")),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn disabled_features_hide_crumbs_and_meta() {
        let features = FeatureFlags {
            breadcrumbs: false,
            page_meta: false,
            ..FeatureFlags::default()
        };
        let mut state = AppState::new(Preferences::new(MemoryStore::new()), features);
        state.catalog_loaded(Ok(Catalog::new(
            vec![course("1", "BTech")],
            vec![],
            vec![],
            vec![],
            vec![],
            vec![],
        )));
        state.select_course(&"1".into()).unwrap();

        let snap = ViewSnapshot::capture(&state, &UIState::new());
        assert!(snap.breadcrumbs.is_empty());
        assert!(snap.page_meta.is_none());
    }

    #[test]
    fn cursor_is_clamped_to_listing() {
        let state = ready();
        let mut ui = UIState::new();
        ui.cursors[ViewLevel::Course] = 9;

        let snap = ViewSnapshot::capture(&state, &ui);
        assert_eq!(snap.cursor, 1);
        assert_eq!(snap.selected_card().unwrap().id.as_str(), "2");
    }
}
