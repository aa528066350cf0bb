use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use serde::Deserialize;
use tracing::debug;

use crate::config::JobsApiConfig;

/// One posting from the remote job board. Only `title` is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub candidate_required_location: String,
    #[serde(default)]
    pub publication_date: String,
}

#[derive(Debug, Deserialize)]
pub struct JobsResponse {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// Source of currently posted remote jobs.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_all(&self) -> anyhow::Result<Vec<Job>>;
}

/// Client for the Remotive public API.
#[derive(Clone)]
pub struct RemotiveClient {
    client: Client,
    url: String,
}

impl RemotiveClient {
    pub fn new(cfg: &JobsApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("job-portal/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            client,
            url: cfg.url.clone(),
        })
    }
}

#[async_trait]
impl JobSource for RemotiveClient {
    async fn fetch_all(&self) -> anyhow::Result<Vec<Job>> {
        let resp = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?
            .error_for_status()
            .context("job board returned an error status")?;

        let body: JobsResponse = resp.json().await.context("decode job board response")?;
        debug!(count = body.jobs.len(), "job board listings fetched");
        Ok(body.jobs)
    }
}
