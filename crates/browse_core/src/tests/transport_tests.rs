use super::*;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use shared::domain::{ContentCategory, ContentId, ContentSummary, CourseId, FacultyId, LecturerId};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

use crate::facets::FilterSelection;
use crate::query::PageRequest;
use crate::sort::SortSpec;

#[derive(Debug)]
struct CapturedRequest {
    raw_query: String,
    authorization: Option<String>,
}

#[derive(Clone)]
struct BrowseServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<CapturedRequest>>>>,
    page: ContentPage,
}

async fn handle_browse(
    State(state): State<BrowseServerState>,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
) -> Json<ContentPage> {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(CapturedRequest {
            raw_query: raw_query.unwrap_or_default(),
            authorization: headers
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
        });
    }
    Json(state.page.clone())
}

fn sample_page() -> ContentPage {
    ContentPage {
        content: vec![ContentSummary {
            id: ContentId(1),
            title: Some("Sorting lecture".into()),
            content_category: ContentCategory::Pdf,
            upload_date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("date"),
            average_rating: Some(4.5),
            reported_count: 0,
            outdated_count: 0,
            file_path: "sorting.pdf".into(),
            faculty: None,
            course: None,
            lecturer: None,
            uploaded_by: None,
        }],
        total_elements: 25,
        total_pages: 3,
        number: 0,
    }
}

async fn spawn_browse_server(
    page: ContentPage,
) -> Result<(String, oneshot::Receiver<CapturedRequest>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let state = BrowseServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
        page,
    };
    let app = Router::new()
        .route("/api/contents/browse", get(handle_browse))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), rx))
}

fn descriptor() -> QueryDescriptor {
    QueryDescriptor {
        filter: FilterSelection {
            faculty_id: Some(FacultyId(3)),
            course_id: Some(CourseId(101)),
            lecturer_id: None,
            category: None,
            search_term: String::new(),
        },
        sort: SortSpec::for_option("title").expect("title"),
        page: PageRequest {
            page_index: 0,
            page_size: 12,
        },
    }
}

#[tokio::test]
async fn search_sends_descriptor_params_and_decodes_the_page() {
    let (server_url, captured_rx) = spawn_browse_server(sample_page()).await.expect("server");
    let api = HttpBrowseApi::new(server_url, Arc::new(BearerAuth::new("session-token")));

    let page = api.search(&descriptor()).await.expect("search");

    let captured = captured_rx.await.expect("captured");
    assert_eq!(
        captured.raw_query,
        "sortBy=title&sortDirection=asc&facultyId=3&courseId=101&page=0&size=12"
    );
    assert_eq!(
        captured.authorization.as_deref(),
        Some("Bearer session-token")
    );

    assert_eq!(page.content.len(), 1);
    assert_eq!(page.total_elements, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page(), 0);
}

#[tokio::test]
async fn load_reference_data_fetches_all_three_lists() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let faculty = Faculty {
        id: FacultyId(3),
        name: "Computer Science".into(),
    };
    let faculties = vec![faculty.clone()];
    let courses = vec![Course {
        id: CourseId(101),
        name: "Algorithms".into(),
        faculty,
        lecturer_ids: vec![LecturerId(100)],
    }];
    let lecturers = vec![Lecturer {
        id: LecturerId(100),
        name: "Dr. Acker".into(),
        email: None,
        course_ids: vec![CourseId(101)],
    }];
    let app = Router::new()
        .route("/api/faculties", get(move || async move { Json(faculties) }))
        .route("/api/courses", get(move || async move { Json(courses) }))
        .route("/api/lecturers", get(move || async move { Json(lecturers) }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let api = HttpBrowseApi::new(format!("http://{addr}"), Arc::new(AnonymousAuth));
    let reference = api.load_reference_data().await.expect("reference");

    assert_eq!(reference.faculties.len(), 1);
    assert_eq!(reference.courses.len(), 1);
    assert_eq!(reference.lecturers.len(), 1);
    assert_eq!(reference.courses[0].faculty.id, FacultyId(3));
}

struct RecordingAuth {
    unauthorized_seen: AtomicBool,
}

impl RequestAuth for RecordingAuth {
    fn attach(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
    }

    fn on_unauthorized(&self) {
        self.unauthorized_seen.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn unauthorized_response_invokes_the_auth_hook_and_maps_the_envelope() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/api/contents/browse",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiError::new(ErrorCode::Unauthorized, "token expired")),
            )
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let auth = Arc::new(RecordingAuth {
        unauthorized_seen: AtomicBool::new(false),
    });
    let api = HttpBrowseApi::new(format!("http://{addr}"), auth.clone());

    let err = api.search(&descriptor()).await.expect_err("401 surfaces");

    assert!(auth.unauthorized_seen.load(Ordering::SeqCst));
    assert!(err.to_string().contains("token expired"));
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_the_status_code() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/api/contents/browse",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let api = HttpBrowseApi::new(format!("http://{addr}"), Arc::new(AnonymousAuth));
    let err = api.search(&descriptor()).await.expect_err("500 surfaces");

    assert!(err.to_string().contains("500"));
}
