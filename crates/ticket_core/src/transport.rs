//! HTTP implementations of [`CategorySource`] and [`TicketEndpoint`].

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use shared::{
    domain::{CategoryMap, SessionContext},
    error::{ApiError, ApiException},
    protocol::SubmissionPayload,
};
use tracing::warn;
use url::Url;

use crate::{CategorySource, TicketEndpoint};

pub const DEFAULT_CATEGORIES_PATH: &str = "/tickets/categories";
pub const DEFAULT_CREATE_PATH: &str = "/tickets/create";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const EMPLOYEE_ID_HEADER: &str = "x-employee-id";

#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
    categories_path: String,
    create_path: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .with_context(|| format!("invalid ticket api base url '{base_url}'"))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build ticket api http client")?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            categories_path: DEFAULT_CATEGORIES_PATH.to_string(),
            create_path: DEFAULT_CREATE_PATH.to_string(),
        })
    }

    pub fn with_paths(
        mut self,
        categories_path: impl Into<String>,
        create_path: impl Into<String>,
    ) -> Self {
        self.categories_path = categories_path.into();
        self.create_path = create_path.into();
        self
    }

    pub fn categories_url(&self) -> String {
        self.url_for(&self.categories_path)
    }

    pub fn create_url(&self) -> String {
        self.url_for(&self.create_path)
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder, context: &SessionContext) -> RequestBuilder {
        let request = request.header(EMPLOYEE_ID_HEADER, context.employee_id.as_str());
        match &context.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl CategorySource for HttpBackend {
    async fn fetch(&self, context: &SessionContext) -> Result<CategoryMap> {
        let url = self.categories_url();
        let res = self
            .authorize(self.http.get(&url), context)
            .send()
            .await
            .with_context(|| format!("failed to reach category service at {url}"))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.bytes().await.unwrap_or_default();
            let err = ApiError::from_response(status.as_u16(), &body);
            return Err(ApiException::from(err).into());
        }

        res.json::<CategoryMap>()
            .await
            .context("malformed category directory response")
    }
}

#[async_trait]
impl TicketEndpoint for HttpBackend {
    async fn submit(&self, payload: &SubmissionPayload, context: &SessionContext) -> Result<bool> {
        let url = self.create_url();
        let res = self
            .authorize(self.http.post(&url), context)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("failed to reach ticket service at {url}"))?;

        let status = res.status();
        if status.is_success() {
            return Ok(true);
        }

        let body = res.bytes().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), &body);
        warn!(
            status = status.as_u16(),
            code = ?err.code,
            message = %err.message,
            "ticket service declined the ticket"
        );
        Ok(false)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
