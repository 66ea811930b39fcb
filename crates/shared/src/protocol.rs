use serde::{Deserialize, Serialize};

use crate::domain::ContentSummary;

/// One page of search results as the backend serializes it
/// (Spring-style page envelope; `number` is the zero-based current page).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPage {
    pub content: Vec<ContentSummary>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
}

impl ContentPage {
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            number: 0,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.number
    }
}
