use crate::error::BrowseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    UploadDate,
    Title,
    Rating,
}

impl SortField {
    pub fn as_param(self) -> &'static str {
        match self {
            SortField::UploadDate => "uploadDate",
            SortField::Title => "title",
            SortField::Rating => "rating",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_param(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A canonical (field, direction) pair. Each user-facing sort label maps to
/// exactly one spec; no independent direction toggle exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn for_option(label: &str) -> Result<Self, BrowseError> {
        match label {
            "uploadDate" => Ok(Self {
                field: SortField::UploadDate,
                direction: SortDirection::Desc,
            }),
            "title" => Ok(Self {
                field: SortField::Title,
                direction: SortDirection::Asc,
            }),
            "rating" => Ok(Self {
                field: SortField::Rating,
                direction: SortDirection::Desc,
            }),
            other => Err(BrowseError::InvalidSortOption(other.to_string())),
        }
    }
}

impl Default for SortSpec {
    /// Backend default: newest uploads first.
    fn default() -> Self {
        Self {
            field: SortField::UploadDate,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Default)]
pub struct SortPolicy {
    current: SortSpec,
}

impl SortPolicy {
    pub fn current(&self) -> SortSpec {
        self.current
    }

    /// Applies the fixed label table. An unrecognized label fails and leaves
    /// the current spec unchanged. Returns whether the spec actually changed.
    pub fn set_option(&mut self, label: &str) -> Result<bool, BrowseError> {
        let next = SortSpec::for_option(label)?;
        let changed = next != self.current;
        self.current = next;
        Ok(changed)
    }
}
