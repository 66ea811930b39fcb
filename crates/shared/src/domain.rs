use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);
id_newtype!(FacultyId);
id_newtype!(CourseId);
id_newtype!(LecturerId);
id_newtype!(ContentId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentCategory {
    Pdf,
    Image,
    Zip,
}

impl ContentCategory {
    /// Wire form, used both in JSON bodies and as a query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            ContentCategory::Pdf => "PDF",
            ContentCategory::Image => "IMAGE",
            ContentCategory::Zip => "ZIP",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub faculty: Faculty,
    #[serde(default)]
    pub lecturer_ids: Vec<LecturerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecturer {
    pub id: LecturerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub course_ids: Vec<CourseId>,
}

impl Lecturer {
    pub fn teaches(&self, course_id: CourseId) -> bool {
        self.course_ids.contains(&course_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploaderSummary {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

/// One card on the browse page, as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub id: ContentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content_category: ContentCategory,
    pub upload_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub reported_count: u32,
    #[serde(default)]
    pub outdated_count: u32,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty: Option<Faculty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lecturer: Option<Lecturer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<UploaderSummary>,
}
