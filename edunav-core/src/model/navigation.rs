//! ``src/model/navigation.rs``
//! ============================================================================
//! # Navigator: the drill-down state machine
//!
//! Holds the selection chain Course > Branch > Semester > Subject. The active
//! view is derived from the chain, so it is always the level right below the
//! deepest selection. Every transition either fully succeeds or leaves the
//! chain untouched.

use std::fmt;

use enum_map::Enum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::model::catalog::Catalog;
use crate::model::records::{Branch, Course, RecordId, Semester, Subject};

/// One of the five nested levels, also naming the active view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewLevel {
    Course,
    Branch,
    Semester,
    Subject,
    Resource,
}

impl ViewLevel {
    pub const ALL: [Self; 5] = [
        Self::Course,
        Self::Branch,
        Self::Semester,
        Self::Subject,
        Self::Resource,
    ];

    /// The level above, `None` at the root.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Course => None,
            Self::Branch => Some(Self::Course),
            Self::Semester => Some(Self::Branch),
            Self::Subject => Some(Self::Semester),
            Self::Resource => Some(Self::Subject),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Branch => "branch",
            Self::Semester => "semester",
            Self::Subject => "subject",
            Self::Resource => "resource",
        }
    }
}

impl fmt::Display for ViewLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Course => "Course",
            Self::Branch => "Branch",
            Self::Semester => "Semester",
            Self::Subject => "Subject",
            Self::Resource => "Resource",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ViewLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::invalid_state(format!("unknown level '{s}'")))
    }
}

/// The selection chain. Deeper fields are only ever set when every
/// shallower field is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub course: Option<RecordId>,
    pub branch: Option<RecordId>,
    pub semester: Option<RecordId>,
    pub subject: Option<RecordId>,
}

impl Selection {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.course.is_none()
    }

    /// Selected identifier at `level`; the resource level has none.
    #[must_use]
    pub const fn at(&self, level: ViewLevel) -> Option<&RecordId> {
        match level {
            ViewLevel::Course => self.course.as_ref(),
            ViewLevel::Branch => self.branch.as_ref(),
            ViewLevel::Semester => self.semester.as_ref(),
            ViewLevel::Subject => self.subject.as_ref(),
            ViewLevel::Resource => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    selection: Selection,
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The deepest level consistent with the selection chain.
    #[must_use]
    pub const fn current_view(&self) -> ViewLevel {
        let s = &self.selection;
        if s.subject.is_some() {
            ViewLevel::Resource
        } else if s.semester.is_some() {
            ViewLevel::Subject
        } else if s.branch.is_some() {
            ViewLevel::Semester
        } else if s.course.is_some() {
            ViewLevel::Branch
        } else {
            ViewLevel::Course
        }
    }

    // ---- transitions -------------------------------------------------------

    pub fn show_courses(&mut self) {
        self.selection = Selection::default();
        debug!("Navigated to course list");
    }

    pub fn select_course(&mut self, catalog: &Catalog, id: &RecordId) -> Result<(), AppError> {
        if catalog.course(id).is_none() {
            return Err(AppError::not_found(ViewLevel::Course, id.as_str()));
        }

        self.selection = Selection {
            course: Some(id.clone()),
            ..Selection::default()
        };
        debug!(course = %id, "Course selected");
        Ok(())
    }

    pub fn select_branch(&mut self, catalog: &Catalog, id: &RecordId) -> Result<(), AppError> {
        let Some(course) = self.selection.course.clone() else {
            return Err(AppError::invalid_state("select a course before a branch"));
        };
        match catalog.branch(id) {
            Some(branch) if branch.course_id == course => {}
            _ => return Err(AppError::not_found(ViewLevel::Branch, id.as_str())),
        }

        self.selection = Selection {
            course: Some(course),
            branch: Some(id.clone()),
            ..Selection::default()
        };
        debug!(branch = %id, "Branch selected");
        Ok(())
    }

    pub fn select_semester(&mut self, catalog: &Catalog, id: &RecordId) -> Result<(), AppError> {
        let Some(branch) = self.selection.branch.clone() else {
            return Err(AppError::invalid_state("select a branch before a semester"));
        };
        match catalog.semester(id) {
            Some(semester) if semester.branch_id == branch => {}
            _ => return Err(AppError::not_found(ViewLevel::Semester, id.as_str())),
        }

        self.selection.semester = Some(id.clone());
        self.selection.subject = None;
        debug!(semester = %id, "Semester selected");
        Ok(())
    }

    pub fn select_subject(&mut self, catalog: &Catalog, id: &RecordId) -> Result<(), AppError> {
        let Some(semester) = self.selection.semester.clone() else {
            return Err(AppError::invalid_state("select a semester before a subject"));
        };
        match catalog.subject(id) {
            Some(subject) if subject.semester_id == semester => {}
            _ => return Err(AppError::not_found(ViewLevel::Subject, id.as_str())),
        }

        self.selection.subject = Some(id.clone());
        debug!(subject = %id, "Subject selected");
        Ok(())
    }

    /// Re-derive view `target` from the identifier currently selected one
    /// level above it.
    pub fn go_back(&mut self, catalog: &Catalog, target: ViewLevel) -> Result<(), AppError> {
        let Some(parent) = target.parent() else {
            self.show_courses();
            return Ok(());
        };

        let id = self.selection.at(parent).cloned().ok_or_else(|| {
            AppError::invalid_state(format!("cannot go back to {target}: no {parent} selected"))
        })?;

        match target {
            ViewLevel::Branch => self.select_course(catalog, &id),
            ViewLevel::Semester => self.select_branch(catalog, &id),
            ViewLevel::Subject => self.select_semester(catalog, &id),
            ViewLevel::Resource => self.select_subject(catalog, &id),
            ViewLevel::Course => {
                self.show_courses();
                Ok(())
            }
        }
    }

    // ---- selected entities ------------------------------------------------

    #[must_use]
    pub fn course<'a>(&self, catalog: &'a Catalog) -> Option<&'a Course> {
        self.selection.course.as_ref().and_then(|id| catalog.course(id))
    }

    #[must_use]
    pub fn branch<'a>(&self, catalog: &'a Catalog) -> Option<&'a Branch> {
        self.selection.branch.as_ref().and_then(|id| catalog.branch(id))
    }

    #[must_use]
    pub fn semester<'a>(&self, catalog: &'a Catalog) -> Option<&'a Semester> {
        self.selection
            .semester
            .as_ref()
            .and_then(|id| catalog.semester(id))
    }

    #[must_use]
    pub fn subject<'a>(&self, catalog: &'a Catalog) -> Option<&'a Subject> {
        self.selection
            .subject
            .as_ref()
            .and_then(|id| catalog.subject(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::fixtures::{branch, course, sample};
    use proptest::prelude::*;

    fn id(raw: &str) -> RecordId {
        RecordId::from(raw)
    }

    fn drill_to_subject(nav: &mut Navigator, catalog: &Catalog) {
        nav.select_course(catalog, &id("1")).unwrap();
        nav.select_branch(catalog, &id("10")).unwrap();
        nav.select_semester(catalog, &id("20")).unwrap();
        nav.select_subject(catalog, &id("5")).unwrap();
    }

    #[test]
    fn initial_state_is_course_view() {
        let nav = Navigator::new();
        assert_eq!(nav.current_view(), ViewLevel::Course);
        assert!(nav.selection().is_empty());
    }

    #[test]
    fn select_course_moves_to_branch_view() {
        let catalog = Catalog::new(
            vec![course("1", "BTech")],
            vec![branch("10", "1", "CSE")],
            vec![],
            vec![],
            vec![],
            vec![],
        );
        let mut nav = Navigator::new();
        nav.select_course(&catalog, &id("1")).unwrap();

        assert_eq!(nav.current_view(), ViewLevel::Branch);
        assert_eq!(nav.selection().course, Some(id("1")));
        let course = id("1");
        let branches: Vec<_> = catalog.branches_of(&course).map(|b| &b.id).collect();
        assert_eq!(branches, [&id("10")]);
    }

    #[test]
    fn unknown_course_is_not_found_and_keeps_state() {
        let catalog = sample();
        let mut nav = Navigator::new();
        nav.select_course(&catalog, &id("1")).unwrap();
        nav.select_branch(&catalog, &id("10")).unwrap();
        let before = nav.selection().clone();

        let err = nav.select_course(&catalog, &id("404")).unwrap_err();
        assert!(matches!(err, AppError::NotFound { level: ViewLevel::Course, .. }));
        assert_eq!(nav.selection(), &before);
        assert_eq!(nav.current_view(), ViewLevel::Semester);
    }

    #[test]
    fn full_chain_reaches_resource_view() {
        let catalog = sample();
        let mut nav = Navigator::new();
        drill_to_subject(&mut nav, &catalog);

        assert_eq!(nav.current_view(), ViewLevel::Resource);
        assert_eq!(nav.subject(&catalog).unwrap().id, id("5"));
    }

    #[test]
    fn reselecting_course_clears_deeper_levels() {
        let catalog = sample();
        let mut nav = Navigator::new();
        drill_to_subject(&mut nav, &catalog);

        nav.select_course(&catalog, &id("2")).unwrap();
        let s = nav.selection();
        assert_eq!(s.course, Some(id("2")));
        assert!(s.branch.is_none() && s.semester.is_none() && s.subject.is_none());
        assert_eq!(nav.current_view(), ViewLevel::Branch);
    }

    #[test]
    fn deeper_selects_require_parent() {
        let catalog = sample();
        let mut nav = Navigator::new();

        assert!(matches!(
            nav.select_semester(&catalog, &id("20")),
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            nav.select_subject(&catalog, &id("5")),
            Err(AppError::InvalidState(_))
        ));
        assert!(nav.selection().is_empty());
    }

    #[test]
    fn branch_of_another_course_is_not_found() {
        let catalog = sample();
        let mut nav = Navigator::new();
        nav.select_course(&catalog, &id("2")).unwrap();

        assert!(matches!(
            nav.select_branch(&catalog, &id("10")),
            Err(AppError::NotFound { level: ViewLevel::Branch, .. })
        ));
        assert_eq!(nav.current_view(), ViewLevel::Branch);
    }

    #[test]
    fn go_back_rederives_each_level() {
        let catalog = sample();
        let mut nav = Navigator::new();
        drill_to_subject(&mut nav, &catalog);

        nav.go_back(&catalog, ViewLevel::Subject).unwrap();
        assert_eq!(nav.current_view(), ViewLevel::Subject);
        assert_eq!(nav.selection().semester, Some(id("20")));

        nav.go_back(&catalog, ViewLevel::Semester).unwrap();
        assert_eq!(nav.current_view(), ViewLevel::Semester);

        nav.go_back(&catalog, ViewLevel::Branch).unwrap();
        assert_eq!(nav.current_view(), ViewLevel::Branch);
        assert_eq!(nav.selection().course, Some(id("1")));

        nav.go_back(&catalog, ViewLevel::Course).unwrap();
        assert_eq!(nav.current_view(), ViewLevel::Course);
        assert!(nav.selection().is_empty());
    }

    #[test]
    fn go_back_without_needed_selection_is_invalid() {
        let catalog = sample();
        let mut nav = Navigator::new();
        nav.select_course(&catalog, &id("1")).unwrap();

        let err = nav.go_back(&catalog, ViewLevel::Subject).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert_eq!(nav.current_view(), ViewLevel::Branch);
    }

    #[test]
    fn level_parses_from_str() {
        assert_eq!("Branch".parse::<ViewLevel>().unwrap(), ViewLevel::Branch);
        assert!("campus".parse::<ViewLevel>().is_err());
    }

    proptest! {
        #[test]
        fn select_then_back_to_course_empties_selection(idx in 0usize..2) {
            let catalog = sample();
            let course_id = catalog.courses[idx].id.clone();
            let mut nav = Navigator::new();

            nav.select_course(&catalog, &course_id).unwrap();
            nav.go_back(&catalog, ViewLevel::Course).unwrap();

            prop_assert_eq!(nav.current_view(), ViewLevel::Course);
            prop_assert!(nav.selection().is_empty());
        }

        #[test]
        fn select_branch_without_course_is_always_invalid(raw in "[0-9a-z]{0,6}") {
            let catalog = sample();
            let mut nav = Navigator::new();
            let result = nav.select_branch(&catalog, &RecordId::new(&raw));
            prop_assert!(matches!(result, Err(AppError::InvalidState(_))));
            prop_assert!(nav.selection().is_empty());
        }
    }
}
