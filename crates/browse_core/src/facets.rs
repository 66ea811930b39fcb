use std::sync::Arc;

use shared::domain::{
    ContentCategory, Course, CourseId, Faculty, FacultyId, Lecturer, LecturerId,
};

use crate::error::BrowseError;

/// The faculty/course/lecturer reference lists, fetched once at mount and
/// treated as immutable for the rest of the session.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub faculties: Vec<Faculty>,
    pub courses: Vec<Course>,
    pub lecturers: Vec<Lecturer>,
}

impl ReferenceData {
    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    pub fn lecturer(&self, id: LecturerId) -> Option<&Lecturer> {
        self.lecturers.iter().find(|lecturer| lecturer.id == id)
    }
}

/// One immutable filter value, replaced atomically on every facet mutation.
/// The hierarchy invariant (course belongs to faculty, lecturer teaches
/// course) holds by construction: the only way to change a parent facet goes
/// through a constructor that drops the children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub faculty_id: Option<FacultyId>,
    pub course_id: Option<CourseId>,
    pub lecturer_id: Option<LecturerId>,
    pub category: Option<ContentCategory>,
    pub search_term: String,
}

impl FilterSelection {
    fn with_faculty(&self, faculty_id: Option<FacultyId>) -> Self {
        Self {
            faculty_id,
            course_id: None,
            lecturer_id: None,
            ..self.clone()
        }
    }

    fn with_course(&self, course_id: Option<CourseId>) -> Self {
        Self {
            course_id,
            lecturer_id: None,
            ..self.clone()
        }
    }

    fn with_lecturer(&self, lecturer_id: Option<LecturerId>) -> Self {
        Self {
            lecturer_id,
            ..self.clone()
        }
    }

    fn with_category(&self, category: Option<ContentCategory>) -> Self {
        Self {
            category,
            ..self.clone()
        }
    }

    fn with_search_term(&self, search_term: String) -> Self {
        Self {
            search_term,
            ..self.clone()
        }
    }
}

/// Owns the hierarchical facet selection and its invalidation rules.
///
/// `None` is the "all" sentinel at every level; selecting it clears that
/// facet and is the only way to clear a facet that has dependents.
pub struct FacetCascade {
    reference: Arc<ReferenceData>,
    selection: FilterSelection,
}

impl FacetCascade {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self {
            reference,
            selection: FilterSelection::default(),
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Changing faculty unconditionally drops course and lecturer; their
    /// validity can no longer be assumed.
    pub fn set_faculty(&mut self, faculty_id: Option<FacultyId>) {
        self.selection = self.selection.with_faculty(faculty_id);
    }

    /// The course must be in the available set for the selected faculty
    /// (all courses when no faculty is selected). Drops the lecturer.
    pub fn set_course(&mut self, course_id: Option<CourseId>) -> Result<(), BrowseError> {
        if let Some(id) = course_id {
            let available = self
                .reference
                .course(id)
                .is_some_and(|course| self.faculty_admits(course));
            if !available {
                return Err(BrowseError::CourseNotAvailable(id));
            }
        }
        self.selection = self.selection.with_course(course_id);
        Ok(())
    }

    /// The lecturer must teach the selected course (any lecturer when no
    /// course is selected).
    pub fn set_lecturer(&mut self, lecturer_id: Option<LecturerId>) -> Result<(), BrowseError> {
        if let Some(id) = lecturer_id {
            let available = self
                .reference
                .lecturer(id)
                .is_some_and(|lecturer| self.course_admits(lecturer));
            if !available {
                return Err(BrowseError::LecturerNotAvailable(id));
            }
        }
        self.selection = self.selection.with_lecturer(lecturer_id);
        Ok(())
    }

    pub fn set_category(&mut self, category: Option<ContentCategory>) {
        self.selection = self.selection.with_category(category);
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.selection = self.selection.with_search_term(term.into());
    }

    /// Courses offered under the selected faculty. Pure local filter of the
    /// reference list; nothing is re-fetched per selection.
    pub fn available_courses(&self) -> Vec<&Course> {
        self.reference
            .courses
            .iter()
            .filter(|course| self.faculty_admits(course))
            .collect()
    }

    /// Lecturers teaching the selected course.
    pub fn available_lecturers(&self) -> Vec<&Lecturer> {
        self.reference
            .lecturers
            .iter()
            .filter(|lecturer| self.course_admits(lecturer))
            .collect()
    }

    fn faculty_admits(&self, course: &Course) -> bool {
        match self.selection.faculty_id {
            Some(faculty_id) => course.faculty.id == faculty_id,
            None => true,
        }
    }

    fn course_admits(&self, lecturer: &Lecturer) -> bool {
        match self.selection.course_id {
            Some(course_id) => lecturer.teaches(course_id),
            None => true,
        }
    }
}
