use shared::domain::{CourseId, LecturerId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowseError {
    /// Programming error: the sort label is not one of the fixed options.
    #[error("unrecognized sort option: {0:?}")]
    InvalidSortOption(String),
    #[error("page size must be positive")]
    PageOutOfRange,
    #[error("course {0:?} is not available under the selected faculty")]
    CourseNotAvailable(CourseId),
    #[error("lecturer {0:?} does not teach the selected course")]
    LecturerNotAvailable(LecturerId),
    #[error("search request failed: {0}")]
    SearchRequestFailed(String),
}
