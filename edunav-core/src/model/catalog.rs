//! ``src/model/catalog.rs``
//! ============================================================================
//! # Catalog: the fetched collections and their parent/child relation
//!
//! Populated once per successful load. Child listings filter a collection by
//! foreign key and keep provider order; nothing is ever sorted here. Children
//! whose foreign key does not resolve simply never match a parent.

use tracing::warn;

use crate::model::records::{Branch, Course, RecordId, Resource, Semester, Subject, University};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub courses: Vec<Course>,
    pub branches: Vec<Branch>,
    pub semesters: Vec<Semester>,
    pub subjects: Vec<Subject>,
    pub resources: Vec<Resource>,
    pub universities: Vec<University>,
}

/// Drop rows that cannot be referenced.
fn retain_identified<T>(rows: &mut Vec<T>, id: impl Fn(&T) -> &RecordId, collection: &str) {
    let before = rows.len();
    rows.retain(|row| !id(row).is_empty());
    let dropped = before - rows.len();
    if dropped > 0 {
        warn!(collection, dropped, "Ignoring rows without an ID");
    }
}

impl Catalog {
    pub fn new(
        mut courses: Vec<Course>,
        mut branches: Vec<Branch>,
        mut semesters: Vec<Semester>,
        mut subjects: Vec<Subject>,
        mut resources: Vec<Resource>,
        mut universities: Vec<University>,
    ) -> Self {
        retain_identified(&mut courses, |r| &r.id, "courses");
        retain_identified(&mut branches, |r| &r.id, "branches");
        retain_identified(&mut semesters, |r| &r.id, "semesters");
        retain_identified(&mut subjects, |r| &r.id, "subjects");
        retain_identified(&mut resources, |r| &r.id, "resources");
        retain_identified(&mut universities, |r| &r.id, "universities");

        Self {
            courses,
            branches,
            semesters,
            subjects,
            resources,
            universities,
        }
    }

    // ---- lookups -----------------------------------------------------------

    #[must_use]
    pub fn course(&self, id: &RecordId) -> Option<&Course> {
        self.courses.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn branch(&self, id: &RecordId) -> Option<&Branch> {
        self.branches.iter().find(|b| &b.id == id)
    }

    #[must_use]
    pub fn semester(&self, id: &RecordId) -> Option<&Semester> {
        self.semesters.iter().find(|s| &s.id == id)
    }

    #[must_use]
    pub fn subject(&self, id: &RecordId) -> Option<&Subject> {
        self.subjects.iter().find(|s| &s.id == id)
    }

    #[must_use]
    pub fn resource(&self, id: &RecordId) -> Option<&Resource> {
        self.resources.iter().find(|r| &r.id == id)
    }

    pub fn resource_mut(&mut self, id: &RecordId) -> Option<&mut Resource> {
        self.resources.iter_mut().find(|r| &r.id == id)
    }

    #[must_use]
    pub fn university(&self, id: &RecordId) -> Option<&University> {
        self.universities.iter().find(|u| &u.id == id)
    }

    // ---- children, provider order -----------------------------------------

    pub fn branches_of<'a>(&'a self, course: &'a RecordId) -> impl Iterator<Item = &'a Branch> {
        self.branches.iter().filter(move |b| &b.course_id == course)
    }

    pub fn semesters_of<'a>(
        &'a self,
        branch: &'a RecordId,
    ) -> impl Iterator<Item = &'a Semester> {
        self.semesters.iter().filter(move |s| &s.branch_id == branch)
    }

    pub fn subjects_of<'a>(
        &'a self,
        semester: &'a RecordId,
    ) -> impl Iterator<Item = &'a Subject> {
        self.subjects.iter().filter(move |s| &s.semester_id == semester)
    }

    pub fn resources_of<'a>(
        &'a self,
        subject: &'a RecordId,
    ) -> impl Iterator<Item = &'a Resource> {
        self.resources.iter().filter(move |r| &r.subject_id == subject)
    }

    /// Record counts per collection, in load order.
    #[must_use]
    pub fn counts(&self) -> [usize; 6] {
        [
            self.courses.len(),
            self.branches.len(),
            self.semesters.len(),
            self.subjects.len(),
            self.resources.len(),
            self.universities.len(),
        ]
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small hand-built catalog shared by model and view tests.

    use super::*;

    pub fn course(id: &str, name: &str) -> Course {
        Course {
            id: id.into(),
            name: name.into(),
            description: format!("{name} programme"),
            icon: None,
        }
    }

    pub fn branch(id: &str, course: &str, name: &str) -> Branch {
        Branch {
            id: id.into(),
            course_id: course.into(),
            name: name.into(),
            description: String::new(),
            university: None,
        }
    }

    pub fn semester(id: &str, branch: &str, number: &str) -> Semester {
        Semester {
            id: id.into(),
            branch_id: branch.into(),
            number: number.into(),
            name: format!("Semester {number}"),
        }
    }

    pub fn subject(id: &str, semester: &str, name: &str) -> Subject {
        Subject {
            id: id.into(),
            semester_id: semester.into(),
            code: format!("SUB{id}"),
            name: name.into(),
            description: String::new(),
            credits: "4".into(),
            meta_keywords: None,
        }
    }

    pub fn resource(id: &str, subject: &str, kind: &str, lang: &str) -> Resource {
        Resource {
            id: id.into(),
            subject_id: subject.into(),
            title: format!("Resource {id}"),
            description: String::new(),
            kind: kind.into(),
            language: Some(lang.into()),
            university: None,
            year: None,
            link: format!("https://example.test/{id}"),
            downloads: 0,
        }
    }

    /// BTech(1) > CSE(10) > Sem 3(20) > DSA(5) with two resources, plus an
    /// empty BCA(2) course and an orphan branch pointing at course 99.
    pub fn sample() -> Catalog {
        Catalog::new(
            vec![course("1", "BTech"), course("2", "BCA")],
            vec![
                branch("10", "1", "CSE"),
                branch("11", "1", "ECE"),
                branch("12", "99", "Orphan"),
            ],
            vec![semester("20", "10", "3"), semester("21", "10", "4")],
            vec![subject("5", "20", "Data Structures"), subject("6", "20", "DBMS")],
            vec![
                resource("100", "5", "Video", "en"),
                resource("101", "5", "Notes", "hi"),
                resource("102", "6", "PYQ", "en"),
            ],
            vec![University {
                id: "u1".into(),
                name: "AKTU".into(),
            }],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn children_follow_provider_order() {
        let catalog = sample();
        let course = "1".into();
        let ids: Vec<_> = catalog
            .branches_of(&course)
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ids, ["10", "11"]);
    }

    #[test]
    fn orphans_never_listed() {
        let catalog = sample();
        let listed: usize = catalog
            .courses
            .iter()
            .map(|c| catalog.branches_of(&c.id).count())
            .sum();
        assert_eq!(listed, 2);
        assert!(catalog.branch(&"12".into()).is_some());
    }

    #[test]
    fn rows_without_id_are_dropped() {
        let catalog = Catalog::new(
            vec![course("", "Nameless"), course("3", "MCA")],
            vec![],
            vec![],
            vec![],
            vec![],
            vec![],
        );
        assert_eq!(catalog.courses.len(), 1);
        assert_eq!(catalog.counts()[0], 1);
    }

    #[test]
    fn resource_lookup_is_mutable() {
        let mut catalog = sample();
        catalog.resource_mut(&"100".into()).unwrap().downloads += 1;
        assert_eq!(catalog.resource(&"100".into()).unwrap().downloads, 1);
    }
}
