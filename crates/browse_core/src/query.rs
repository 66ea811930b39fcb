use crate::facets::FilterSelection;
use crate::sort::SortSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_index: u32,
    pub page_size: u32,
}

/// Everything that determines one server request. Two descriptors are equal
/// iff filter, sort and page all are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub filter: FilterSelection,
    pub sort: SortSpec,
    pub page: PageRequest,
}

impl QueryDescriptor {
    /// Query-string pairs for the browse endpoint. Absent facets are simply
    /// omitted; the server treats a missing parameter as "no filter".
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sortBy", self.sort.field.as_param().to_string()),
            ("sortDirection", self.sort.direction.as_param().to_string()),
        ];
        if let Some(faculty_id) = self.filter.faculty_id {
            params.push(("facultyId", faculty_id.0.to_string()));
        }
        if let Some(course_id) = self.filter.course_id {
            params.push(("courseId", course_id.0.to_string()));
        }
        if let Some(lecturer_id) = self.filter.lecturer_id {
            params.push(("lecturerId", lecturer_id.0.to_string()));
        }
        if let Some(category) = self.filter.category {
            params.push(("category", category.as_param().to_string()));
        }
        if !self.filter.search_term.is_empty() {
            params.push(("searchTerm", self.filter.search_term.clone()));
        }
        params.push(("page", self.page.page_index.to_string()));
        params.push(("size", self.page.page_size.to_string()));
        params
    }
}
