//! HTTP client for the Quality/Impact Analyzer.
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `POST /v1/analyze/version` with a [`VersionAnalysisContext`]
//! - `POST /v1/analyze/changes` with a [`ChangeAnalysisContext`]
//!
//! Both respond with a camelCase [`QualityAnalysis`].

use async_trait::async_trait;
use dve_core::analysis::{ChangeAnalysisContext, QualityAnalysis, VersionAnalysisContext};
use serde::Serialize;

use super::{GatewayError, QualityAnalyzer};

/// Analyzer reached over HTTP.
pub struct HttpQualityAnalyzer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQualityAnalyzer {
    /// * `base_url` - e.g. `http://analyzer:9000`, without a trailing slash.
    pub fn new(base_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<QualityAnalysis, GatewayError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl QualityAnalyzer for HttpQualityAnalyzer {
    async fn analyze_version(
        &self,
        context: &VersionAnalysisContext,
    ) -> Result<QualityAnalysis, GatewayError> {
        self.post("/v1/analyze/version", context).await
    }

    async fn analyze_changes(
        &self,
        context: &ChangeAnalysisContext,
    ) -> Result<QualityAnalysis, GatewayError> {
        self.post("/v1/analyze/changes", context).await
    }
}
