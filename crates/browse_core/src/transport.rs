use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use shared::{
    domain::{Course, Faculty, Lecturer},
    error::{ApiError, ApiException, ErrorCode},
    protocol::ContentPage,
};
use tracing::debug;

use crate::facets::ReferenceData;
use crate::query::QueryDescriptor;

/// The black-box paginated query service the engine talks to.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, descriptor: &QueryDescriptor) -> Result<ContentPage>;
}

pub struct MissingSearchBackend;

#[async_trait]
impl SearchBackend for MissingSearchBackend {
    async fn search(&self, _descriptor: &QueryDescriptor) -> Result<ContentPage> {
        Err(anyhow!("search backend is unavailable"))
    }
}

/// Request-signing collaborator. Token attachment and what to do on a 401
/// are host concerns, not part of the query engine.
pub trait RequestAuth: Send + Sync {
    fn attach(&self, request: RequestBuilder) -> RequestBuilder;
    /// Invoked when the backend answers 401, before the error is surfaced.
    fn on_unauthorized(&self) {}
}

pub struct AnonymousAuth;

impl RequestAuth for AnonymousAuth {
    fn attach(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }
}

pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl RequestAuth for BearerAuth {
    fn attach(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }
}

pub struct HttpBrowseApi {
    http: Client,
    base_url: String,
    auth: Arc<dyn RequestAuth>,
}

impl HttpBrowseApi {
    pub fn new(base_url: impl Into<String>, auth: Arc<dyn RequestAuth>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            auth,
        }
    }

    async fn get_json<T>(&self, path: &str, query: &[(&'static str, String)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let request = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query);
        let response = self
            .auth
            .attach(request)
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.auth.on_unauthorized();
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let api_error = serde_json::from_str::<ApiError>(&body).unwrap_or_else(|_| {
                ApiError::new(
                    ErrorCode::from_status(status.as_u16()),
                    format!("{path} returned HTTP {status}"),
                )
            });
            return Err(ApiException::from(api_error).into());
        }

        response
            .json()
            .await
            .with_context(|| format!("invalid response body from {path}"))
    }

    pub async fn fetch_faculties(&self) -> Result<Vec<Faculty>> {
        self.get_json("/api/faculties", &[]).await
    }

    pub async fn fetch_courses(&self) -> Result<Vec<Course>> {
        self.get_json("/api/courses", &[]).await
    }

    pub async fn fetch_lecturers(&self) -> Result<Vec<Lecturer>> {
        self.get_json("/api/lecturers", &[]).await
    }

    /// Fetches the full reference lists. Done once at mount; facet
    /// availability is derived locally from these for the whole session.
    pub async fn load_reference_data(&self) -> Result<ReferenceData> {
        let faculties = self.fetch_faculties().await?;
        let courses = self.fetch_courses().await?;
        let lecturers = self.fetch_lecturers().await?;
        debug!(
            faculties = faculties.len(),
            courses = courses.len(),
            lecturers = lecturers.len(),
            "reference lists loaded"
        );
        Ok(ReferenceData {
            faculties,
            courses,
            lecturers,
        })
    }
}

#[async_trait]
impl SearchBackend for HttpBrowseApi {
    async fn search(&self, descriptor: &QueryDescriptor) -> Result<ContentPage> {
        self.get_json("/api/contents/browse", &descriptor.query_params())
            .await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
