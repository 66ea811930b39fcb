use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{anyhow, bail, Result};
use browse_core::{
    AnonymousAuth, BearerAuth, BrowseController, HttpBrowseApi, RequestAuth, ViewModel,
};
use clap::Parser;
use shared::domain::{ContentCategory, CourseId, FacultyId, LecturerId};
use tracing_subscriber::EnvFilter;

mod config;

/// One-shot browse against a StudyShare-compatible backend.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
    #[arg(long)]
    faculty_id: Option<i64>,
    #[arg(long)]
    course_id: Option<i64>,
    #[arg(long)]
    lecturer_id: Option<i64>,
    /// PDF, IMAGE or ZIP.
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    search_term: Option<String>,
    /// uploadDate, title or rating.
    #[arg(long, default_value = "uploadDate")]
    sort: String,
    #[arg(long, default_value_t = 0)]
    page: u32,
    #[arg(long)]
    size: Option<u32>,
}

fn parse_category(raw: &str) -> Result<ContentCategory> {
    match raw.to_ascii_uppercase().as_str() {
        "PDF" => Ok(ContentCategory::Pdf),
        "IMAGE" => Ok(ContentCategory::Image),
        "ZIP" => Ok(ContentCategory::Zip),
        other => Err(anyhow!("unknown category: {other}")),
    }
}

async fn wait_for_results(controller: &Arc<BrowseController>) -> Result<ViewModel> {
    let deadline = Instant::now() + Duration::from_secs(30);
    loop {
        let view = controller.view_model().await;
        if !view.loading {
            return Ok(view);
        }
        if Instant::now() >= deadline {
            bail!("timed out waiting for search results");
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    let settings = config::load_settings();

    let server_url = args.server_url.unwrap_or(settings.server_url);
    let auth: Arc<dyn RequestAuth> = match args.token.or(settings.auth_token) {
        Some(token) => Arc::new(BearerAuth::new(token)),
        None => Arc::new(AnonymousAuth),
    };

    let api = Arc::new(HttpBrowseApi::new(server_url, auth));
    let reference = Arc::new(api.load_reference_data().await?);
    tracing::info!(
        faculties = reference.faculties.len(),
        courses = reference.courses.len(),
        lecturers = reference.lecturers.len(),
        "reference data ready"
    );
    let controller = BrowseController::new_with_page_size(
        api,
        reference,
        args.size.unwrap_or(settings.page_size),
    );

    if let Some(id) = args.faculty_id {
        controller.set_faculty(Some(FacultyId(id))).await;
    }
    if let Some(id) = args.course_id {
        controller.set_course(Some(CourseId(id))).await?;
    }
    if let Some(id) = args.lecturer_id {
        controller.set_lecturer(Some(LecturerId(id))).await?;
    }
    if let Some(raw) = args.category.as_deref() {
        controller.set_category(Some(parse_category(raw)?)).await;
    }
    if let Some(term) = args.search_term {
        controller.set_search_term(term).await;
    }
    controller.set_sort_option(&args.sort).await?;
    if args.page > 0 {
        controller.set_page(args.page).await;
    }

    let view = wait_for_results(&controller).await?;
    if let Some(error) = view.error {
        bail!(error);
    }

    println!(
        "Page {} of {} ({} items total)",
        view.current_page + 1,
        view.total_pages.max(1),
        view.total_elements
    );
    for item in &view.items {
        let title = item.title.as_deref().unwrap_or("(untitled)");
        let rating = item
            .average_rating
            .map(|r| format!("{r:.1}"))
            .unwrap_or_else(|| "-".into());
        println!(
            "- [{}] {} (uploaded {}, rating {})",
            item.content_category.as_param(),
            title,
            item.upload_date,
            rating
        );
    }

    Ok(())
}
