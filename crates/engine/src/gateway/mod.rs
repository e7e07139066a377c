//! Soft-fail wrappers around the two external collaborators.
//!
//! - [`QualityAnalyzer`]: scores a new version or a set of changes.
//! - [`SimilarityEstimator`]: scores two rendered file references.
//!
//! Neither is required for correctness. [`QualityGateway`] bounds every
//! call with a timeout, logs failures, and substitutes a default: no
//! analysis, or a neutral similarity of 0.5.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dve_core::analysis::{ChangeAnalysisContext, QualityAnalysis, VersionAnalysisContext};
use dve_core::similarity::{clamp_similarity, IDENTICAL_SIMILARITY, NEUTRAL_SIMILARITY};

use crate::config::EngineConfig;

pub mod http;
pub mod image_stats;

pub use http::HttpQualityAnalyzer;
pub use image_stats::ChannelStatsEstimator;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from an external collaborator. Never surfaced to engine callers.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Collaborator returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Collaborator is not configured")]
    Disabled,
}

// ---------------------------------------------------------------------------
// Collaborator interfaces
// ---------------------------------------------------------------------------

/// External Quality/Impact Analyzer.
#[async_trait]
pub trait QualityAnalyzer: Send + Sync {
    async fn analyze_version(
        &self,
        context: &VersionAnalysisContext,
    ) -> Result<QualityAnalysis, GatewayError>;

    async fn analyze_changes(
        &self,
        context: &ChangeAnalysisContext,
    ) -> Result<QualityAnalysis, GatewayError>;
}

/// External visual similarity estimator over two file references.
#[async_trait]
pub trait SimilarityEstimator: Send + Sync {
    async fn similarity(&self, a: &str, b: &str) -> Result<f64, GatewayError>;
}

/// Analyzer used when no analyzer URL is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledAnalyzer;

#[async_trait]
impl QualityAnalyzer for DisabledAnalyzer {
    async fn analyze_version(
        &self,
        _context: &VersionAnalysisContext,
    ) -> Result<QualityAnalysis, GatewayError> {
        Err(GatewayError::Disabled)
    }

    async fn analyze_changes(
        &self,
        _context: &ChangeAnalysisContext,
    ) -> Result<QualityAnalysis, GatewayError> {
        Err(GatewayError::Disabled)
    }
}

// ---------------------------------------------------------------------------
// QualityGateway
// ---------------------------------------------------------------------------

/// Timeout-bounded, never-failing access to the collaborators.
#[derive(Clone)]
pub struct QualityGateway {
    analyzer: Arc<dyn QualityAnalyzer>,
    similarity: Arc<dyn SimilarityEstimator>,
    analyzer_timeout: Duration,
    similarity_timeout: Duration,
}

impl QualityGateway {
    pub fn new(
        analyzer: Arc<dyn QualityAnalyzer>,
        similarity: Arc<dyn SimilarityEstimator>,
        analyzer_timeout: Duration,
        similarity_timeout: Duration,
    ) -> Self {
        Self {
            analyzer,
            similarity,
            analyzer_timeout,
            similarity_timeout,
        }
    }

    /// Build the production gateway: an HTTP analyzer when a URL is
    /// configured, and channel-statistics similarity over fetched images.
    pub fn from_config(config: &EngineConfig) -> Self {
        let client = reqwest::Client::new();
        let analyzer: Arc<dyn QualityAnalyzer> = match &config.analyzer_url {
            Some(url) => Arc::new(HttpQualityAnalyzer::with_client(client.clone(), url.clone())),
            None => Arc::new(DisabledAnalyzer),
        };
        Self::new(
            analyzer,
            Arc::new(ChannelStatsEstimator::with_client(client)),
            config.analyzer_timeout(),
            config.similarity_timeout(),
        )
    }

    /// Analysis of a new version, or `None` if the analyzer failed.
    pub async fn analyze_version(&self, context: &VersionAnalysisContext) -> Option<QualityAnalysis> {
        let result = bounded(self.analyzer_timeout, self.analyzer.analyze_version(context)).await;
        match result {
            Ok(analysis) => Some(analysis.normalized()),
            Err(GatewayError::Disabled) => None,
            Err(e) => {
                tracing::warn!(
                    asset_id = context.asset_id,
                    error = %e,
                    "Version analysis unavailable, continuing without it"
                );
                None
            }
        }
    }

    /// Impact analysis of a comparison, or `None` if the analyzer failed.
    pub async fn analyze_changes(&self, context: &ChangeAnalysisContext) -> Option<QualityAnalysis> {
        let result = bounded(self.analyzer_timeout, self.analyzer.analyze_changes(context)).await;
        match result {
            Ok(analysis) => Some(analysis.normalized()),
            Err(GatewayError::Disabled) => None,
            Err(e) => {
                tracing::warn!(
                    asset_id = context.asset_id,
                    from_version = context.from_version,
                    to_version = context.to_version,
                    error = %e,
                    "Change analysis unavailable, continuing without it"
                );
                None
            }
        }
    }

    /// Similarity in `[0, 1]`. Identical references score 1.0 without a
    /// call; failures score [`NEUTRAL_SIMILARITY`].
    pub async fn estimate_similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return IDENTICAL_SIMILARITY;
        }
        match bounded(self.similarity_timeout, self.similarity.similarity(a, b)).await {
            Ok(score) => clamp_similarity(score),
            Err(e) => {
                tracing::warn!(error = %e, "Visual similarity unavailable, using neutral score");
                NEUTRAL_SIMILARITY
            }
        }
    }
}

async fn bounded<T>(
    limit: Duration,
    call: impl std::future::Future<Output = Result<T, GatewayError>>,
) -> Result<T, GatewayError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout(limit)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dve_core::analysis::RecommendedAction;
    use dve_core::design::{DesignFiles, Placement, PrintArea};

    struct FixedSimilarity(f64);

    #[async_trait]
    impl SimilarityEstimator for FixedSimilarity {
        async fn similarity(&self, _a: &str, _b: &str) -> Result<f64, GatewayError> {
            Ok(self.0)
        }
    }

    struct FailingSimilarity;

    #[async_trait]
    impl SimilarityEstimator for FailingSimilarity {
        async fn similarity(&self, _a: &str, _b: &str) -> Result<f64, GatewayError> {
            Err(GatewayError::Decode("not an image".into()))
        }
    }

    struct SlowAnalyzer;

    #[async_trait]
    impl QualityAnalyzer for SlowAnalyzer {
        async fn analyze_version(
            &self,
            _context: &VersionAnalysisContext,
        ) -> Result<QualityAnalysis, GatewayError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(QualityAnalysis {
                quality_score: 0.9,
                impact_assessment: String::new(),
                recommended_action: RecommendedAction::Approve,
                risk_factors: vec![],
                impact_level: None,
            })
        }

        async fn analyze_changes(
            &self,
            _context: &ChangeAnalysisContext,
        ) -> Result<QualityAnalysis, GatewayError> {
            Err(GatewayError::Api {
                status: 503,
                body: "busy".into(),
            })
        }
    }

    fn gateway(
        analyzer: impl QualityAnalyzer + 'static,
        similarity: impl SimilarityEstimator + 'static,
    ) -> QualityGateway {
        QualityGateway::new(
            Arc::new(analyzer),
            Arc::new(similarity),
            Duration::from_secs(2),
            Duration::from_secs(2),
        )
    }

    fn version_context() -> VersionAnalysisContext {
        VersionAnalysisContext {
            asset_id: 1,
            files: DesignFiles::production("s3://art/a.png"),
            placements: vec![Placement::new(PrintArea::Front, 20.0, 20.0)],
            palette: vec![],
            previous_version: None,
        }
    }

    #[tokio::test]
    async fn identical_references_skip_estimator() {
        let gw = gateway(DisabledAnalyzer, FailingSimilarity);
        assert_eq!(gw.estimate_similarity("a.png", "a.png").await, 1.0);
    }

    #[tokio::test]
    async fn failed_similarity_is_neutral() {
        let gw = gateway(DisabledAnalyzer, FailingSimilarity);
        assert_eq!(gw.estimate_similarity("a.png", "b.png").await, NEUTRAL_SIMILARITY);
    }

    #[tokio::test]
    async fn similarity_is_clamped() {
        let gw = gateway(DisabledAnalyzer, FixedSimilarity(1.4));
        assert_eq!(gw.estimate_similarity("a.png", "b.png").await, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_analyzer_times_out_to_none() {
        let gw = gateway(SlowAnalyzer, FixedSimilarity(0.7));
        assert!(gw.analyze_version(&version_context()).await.is_none());
    }

    #[tokio::test]
    async fn analyzer_error_yields_none() {
        let gw = gateway(SlowAnalyzer, FixedSimilarity(0.7));
        let context = ChangeAnalysisContext {
            asset_id: 1,
            from_version: 1,
            to_version: 2,
            differences: vec![],
            visual_similarity: None,
        };
        assert!(gw.analyze_changes(&context).await.is_none());
    }

    #[tokio::test]
    async fn disabled_analyzer_yields_none() {
        let gw = gateway(DisabledAnalyzer, FixedSimilarity(0.7));
        assert!(gw.analyze_version(&version_context()).await.is_none());
    }
}
