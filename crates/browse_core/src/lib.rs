use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

use shared::domain::{ContentCategory, ContentSummary, Course, CourseId, FacultyId, Lecturer, LecturerId};
use shared::protocol::ContentPage;

pub mod error;
pub mod facets;
pub mod pagination;
pub mod query;
pub mod sort;
pub mod transport;

pub use error::BrowseError;
pub use facets::{FacetCascade, FilterSelection, ReferenceData};
pub use pagination::{PaginationState, DEFAULT_PAGE_SIZE};
pub use query::{PageRequest, QueryDescriptor};
pub use sort::{SortDirection, SortField, SortPolicy, SortSpec};
pub use transport::{
    AnonymousAuth, BearerAuth, HttpBrowseApi, MissingSearchBackend, RequestAuth, SearchBackend,
};

/// Read-only derived snapshot consumed by presentation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewModel {
    pub items: Vec<ContentSummary>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum BrowseEvent {
    ViewModelChanged(ViewModel),
    SearchFailed(String),
}

struct BrowseState {
    cascade: FacetCascade,
    sort: SortPolicy,
    pagination: PaginationState,
    latest_epoch: u64,
    view: ViewModel,
}

impl BrowseState {
    fn descriptor(&self) -> QueryDescriptor {
        QueryDescriptor {
            filter: self.cascade.selection().clone(),
            sort: self.sort.current(),
            page: self.pagination.request(),
        }
    }
}

/// Composes the facet cascade, sort policy and pagination into one request
/// descriptor per mutation and reconciles the asynchronous responses back
/// into the view model.
///
/// Every dispatch is tagged with a monotonically increasing epoch. A
/// response only becomes observable when its epoch still equals the latest
/// dispatched one; anything older is discarded, which is the sole mechanism
/// keeping a slow early response from overwriting a faster later one.
/// In-flight requests are never cancelled, merely outlived.
pub struct BrowseController {
    backend: Arc<dyn SearchBackend>,
    inner: Mutex<BrowseState>,
    events: broadcast::Sender<BrowseEvent>,
}

impl BrowseController {
    pub fn new(backend: Arc<dyn SearchBackend>, reference: Arc<ReferenceData>) -> Arc<Self> {
        Self::new_with_page_size(backend, reference, DEFAULT_PAGE_SIZE)
    }

    pub fn new_with_page_size(
        backend: Arc<dyn SearchBackend>,
        reference: Arc<ReferenceData>,
        page_size: u32,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            backend,
            inner: Mutex::new(BrowseState {
                cascade: FacetCascade::new(reference),
                sort: SortPolicy::default(),
                pagination: PaginationState::new(page_size),
                latest_epoch: 0,
                view: ViewModel::default(),
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<BrowseEvent> {
        self.events.subscribe()
    }

    pub async fn view_model(&self) -> ViewModel {
        self.inner.lock().await.view.clone()
    }

    pub async fn selection(&self) -> FilterSelection {
        self.inner.lock().await.cascade.selection().clone()
    }

    pub async fn sort_spec(&self) -> SortSpec {
        self.inner.lock().await.sort.current()
    }

    pub async fn page_request(&self) -> PageRequest {
        self.inner.lock().await.pagination.request()
    }

    pub async fn current_descriptor(&self) -> QueryDescriptor {
        self.inner.lock().await.descriptor()
    }

    pub async fn available_courses(&self) -> Vec<Course> {
        let state = self.inner.lock().await;
        state
            .cascade
            .available_courses()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn available_lecturers(&self) -> Vec<Lecturer> {
        let state = self.inner.lock().await;
        state
            .cascade
            .available_lecturers()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn set_faculty(self: &Arc<Self>, faculty_id: Option<FacultyId>) {
        {
            let mut state = self.inner.lock().await;
            state.cascade.set_faculty(faculty_id);
            state.pagination.reset_index();
        }
        self.dispatch().await;
    }

    pub async fn set_course(
        self: &Arc<Self>,
        course_id: Option<CourseId>,
    ) -> Result<(), BrowseError> {
        {
            let mut state = self.inner.lock().await;
            state.cascade.set_course(course_id)?;
            state.pagination.reset_index();
        }
        self.dispatch().await;
        Ok(())
    }

    pub async fn set_lecturer(
        self: &Arc<Self>,
        lecturer_id: Option<LecturerId>,
    ) -> Result<(), BrowseError> {
        {
            let mut state = self.inner.lock().await;
            state.cascade.set_lecturer(lecturer_id)?;
            state.pagination.reset_index();
        }
        self.dispatch().await;
        Ok(())
    }

    pub async fn set_category(self: &Arc<Self>, category: Option<ContentCategory>) {
        {
            let mut state = self.inner.lock().await;
            state.cascade.set_category(category);
            state.pagination.reset_index();
        }
        self.dispatch().await;
    }

    pub async fn set_search_term(self: &Arc<Self>, term: impl Into<String>) {
        {
            let mut state = self.inner.lock().await;
            state.cascade.set_search_term(term.into());
            state.pagination.reset_index();
        }
        self.dispatch().await;
    }

    /// A failed lookup leaves the sort spec, the page index and the view
    /// model untouched; nothing is dispatched.
    pub async fn set_sort_option(self: &Arc<Self>, label: &str) -> Result<(), BrowseError> {
        {
            let mut state = self.inner.lock().await;
            state.sort.set_option(label)?;
            state.pagination.reset_index();
        }
        self.dispatch().await;
        Ok(())
    }

    pub async fn set_page(self: &Arc<Self>, index: u32) {
        {
            let mut state = self.inner.lock().await;
            state.pagination.set_page(index);
        }
        self.dispatch().await;
    }

    pub async fn set_page_size(self: &Arc<Self>, size: u32) -> Result<(), BrowseError> {
        {
            let mut state = self.inner.lock().await;
            state.pagination.set_page_size(size)?;
        }
        self.dispatch().await;
        Ok(())
    }

    /// Re-dispatches the current descriptor unchanged. This is the only
    /// recovery path after a failed request; there is no automatic retry.
    pub async fn reload(self: &Arc<Self>) {
        self.dispatch().await;
    }

    async fn dispatch(self: &Arc<Self>) {
        let (epoch, descriptor, snapshot) = {
            let mut state = self.inner.lock().await;
            state.latest_epoch += 1;
            state.view.loading = true;
            state.view.error = None;
            (
                state.latest_epoch,
                state.descriptor(),
                state.view.clone(),
            )
        };
        let _ = self.events.send(BrowseEvent::ViewModelChanged(snapshot));
        debug!(epoch, "dispatching browse query");

        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = controller.backend.search(&descriptor).await;
            controller.reconcile(epoch, outcome).await;
        });
    }

    async fn reconcile(&self, epoch: u64, outcome: Result<ContentPage>) {
        let (snapshot, failure) = {
            let mut state = self.inner.lock().await;
            if epoch < state.latest_epoch {
                debug!(
                    epoch,
                    latest = state.latest_epoch,
                    "discarding stale browse response"
                );
                return;
            }
            match outcome {
                Ok(page) => {
                    state.pagination.apply(&page);
                    state.view = ViewModel {
                        current_page: page.current_page(),
                        total_elements: page.total_elements,
                        total_pages: page.total_pages,
                        items: page.content,
                        loading: false,
                        error: None,
                    };
                    (state.view.clone(), None)
                }
                Err(err) => {
                    let message =
                        BrowseError::SearchRequestFailed(err.to_string()).to_string();
                    warn!(epoch, error = %message, "browse query failed");
                    // Previous successful items stay visible behind the error.
                    state.view.loading = false;
                    state.view.error = Some(message.clone());
                    (state.view.clone(), Some(message))
                }
            }
        };

        let _ = self.events.send(BrowseEvent::ViewModelChanged(snapshot));
        if let Some(message) = failure {
            let _ = self.events.send(BrowseEvent::SearchFailed(message));
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
