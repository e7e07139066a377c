#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dve_core::analysis::{
    ChangeAnalysisContext, ImpactLevel, QualityAnalysis, RecommendedAction,
    VersionAnalysisContext,
};
use dve_core::design::{DesignFiles, Placement, PrintArea, PrintMethod};
use dve_core::types::{DbId, VersionNumber};
use dve_db::models::design_asset::{CreateDesignAsset, DesignAsset};
use dve_db::models::design_version::{CreateDesignVersion, DesignVersion};
use dve_engine::gateway::{
    DisabledAnalyzer, GatewayError, QualityAnalyzer, QualityGateway, SimilarityEstimator,
};
use dve_engine::store::{CollaborationDirectory, DesignStore, InMemoryDesignStore, StoreError};
use dve_engine::{DesignVersionEngine, EngineConfig};
use dve_events::{DesignEvent, EventPublisher};
use serde_json::json;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const USER: DbId = 7;

pub fn asset_input(name: &str) -> CreateDesignAsset {
    CreateDesignAsset {
        workspace_id: 1,
        brand_id: Some(3),
        order_id: Some(42),
        name: name.to_string(),
        print_method: PrintMethod::ScreenPrint,
        tags: vec!["summer".to_string()],
        created_by: USER,
    }
}

pub fn version_input(asset_id: DbId, prod_url: &str, palette: &[&str]) -> CreateDesignVersion {
    CreateDesignVersion {
        asset_id,
        files: DesignFiles::production(prod_url),
        placements: vec![Placement::new(PrintArea::Front, 28.0, 35.0)],
        palette: palette.iter().map(|c| c.to_string()).collect(),
        metadata: json!({"notes": "initial"}),
        created_by: USER,
    }
}

// ---------------------------------------------------------------------------
// Analyzer stubs
// ---------------------------------------------------------------------------

fn analysis(score: f64, impact: Option<ImpactLevel>) -> QualityAnalysis {
    QualityAnalysis {
        quality_score: score,
        impact_assessment: "stub".to_string(),
        recommended_action: RecommendedAction::Review,
        risk_factors: vec![],
        impact_level: impact,
    }
}

/// Returns queued scores in order for each version analysis, then 0.5.
#[derive(Default)]
pub struct ScriptedAnalyzer {
    queue: Mutex<VecDeque<(f64, Option<ImpactLevel>)>>,
}

impl ScriptedAnalyzer {
    pub fn new(script: impl IntoIterator<Item = (f64, Option<ImpactLevel>)>) -> Self {
        Self {
            queue: Mutex::new(script.into_iter().collect()),
        }
    }

    pub fn scores(scores: &[f64]) -> Self {
        Self::new(scores.iter().map(|s| (*s, None)))
    }
}

#[async_trait]
impl QualityAnalyzer for ScriptedAnalyzer {
    async fn analyze_version(
        &self,
        _context: &VersionAnalysisContext,
    ) -> Result<QualityAnalysis, GatewayError> {
        let (score, impact) = self.queue.lock().unwrap().pop_front().unwrap_or((0.5, None));
        Ok(analysis(score, impact))
    }

    async fn analyze_changes(
        &self,
        context: &ChangeAnalysisContext,
    ) -> Result<QualityAnalysis, GatewayError> {
        let impact = if context.differences.is_empty() {
            ImpactLevel::Minor
        } else {
            ImpactLevel::Major
        };
        Ok(analysis(0.75, Some(impact)))
    }
}

pub struct FailingAnalyzer;

#[async_trait]
impl QualityAnalyzer for FailingAnalyzer {
    async fn analyze_version(
        &self,
        _context: &VersionAnalysisContext,
    ) -> Result<QualityAnalysis, GatewayError> {
        Err(GatewayError::Api {
            status: 500,
            body: "model crashed".to_string(),
        })
    }

    async fn analyze_changes(
        &self,
        _context: &ChangeAnalysisContext,
    ) -> Result<QualityAnalysis, GatewayError> {
        Err(GatewayError::Decode("truncated body".to_string()))
    }
}

/// Never answers within any reasonable timeout.
pub struct HangingAnalyzer;

#[async_trait]
impl QualityAnalyzer for HangingAnalyzer {
    async fn analyze_version(
        &self,
        _context: &VersionAnalysisContext,
    ) -> Result<QualityAnalysis, GatewayError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(analysis(0.99, None))
    }

    async fn analyze_changes(
        &self,
        _context: &ChangeAnalysisContext,
    ) -> Result<QualityAnalysis, GatewayError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(analysis(0.99, None))
    }
}

// ---------------------------------------------------------------------------
// Similarity stubs
// ---------------------------------------------------------------------------

/// Returns a fixed score and counts calls.
pub struct FixedSimilarity {
    score: f64,
    pub calls: AtomicUsize,
}

impl FixedSimilarity {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SimilarityEstimator for FixedSimilarity {
    async fn similarity(&self, _a: &str, _b: &str) -> Result<f64, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.score)
    }
}

pub struct FailingSimilarity;

#[async_trait]
impl SimilarityEstimator for FailingSimilarity {
    async fn similarity(&self, _a: &str, _b: &str) -> Result<f64, GatewayError> {
        Err(GatewayError::Api {
            status: 404,
            body: "render missing".to_string(),
        })
    }
}

pub struct HangingSimilarity;

#[async_trait]
impl SimilarityEstimator for HangingSimilarity {
    async fn similarity(&self, _a: &str, _b: &str) -> Result<f64, GatewayError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(0.9)
    }
}

// ---------------------------------------------------------------------------
// Event recorder
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<DesignEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<DesignEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_types(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.event_type).collect()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: DesignEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ---------------------------------------------------------------------------
// Contended store
// ---------------------------------------------------------------------------

/// Wraps the in-memory store and, for the next `conflicts` inserts, lets a
/// competing writer take the requested number first.
pub struct ContendedStore {
    pub inner: Arc<InMemoryDesignStore>,
    conflicts: AtomicU32,
    unavailable: AtomicBool,
}

impl ContendedStore {
    pub fn new(conflicts: u32) -> Self {
        Self {
            inner: Arc::new(InMemoryDesignStore::new()),
            conflicts: AtomicU32::new(conflicts),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl DesignStore for ContendedStore {
    async fn create_asset(&self, input: &CreateDesignAsset) -> Result<DesignAsset, StoreError> {
        self.inner.create_asset(input).await
    }

    async fn find_asset(&self, id: DbId) -> Result<Option<DesignAsset>, StoreError> {
        self.inner.find_asset(id).await
    }

    async fn create_asset_with_version(
        &self,
        input: &CreateDesignAsset,
        first_version: &CreateDesignVersion,
    ) -> Result<(DesignAsset, DesignVersion), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner
            .create_asset_with_version(input, first_version)
            .await
    }

    async fn advance_current_version(
        &self,
        asset_id: DbId,
        version: VersionNumber,
    ) -> Result<bool, StoreError> {
        self.inner.advance_current_version(asset_id, version).await
    }

    async fn max_version(&self, asset_id: DbId) -> Result<Option<VersionNumber>, StoreError> {
        self.inner.max_version(asset_id).await
    }

    async fn insert_version(
        &self,
        version: VersionNumber,
        input: &CreateDesignVersion,
    ) -> Result<DesignVersion, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        let contend = self
            .conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if contend {
            let mut competitor = input.clone();
            competitor.created_by = 999;
            self.inner.insert_version(version, &competitor).await?;
        }
        self.inner.insert_version(version, input).await
    }

    async fn find_version(
        &self,
        asset_id: DbId,
        version: VersionNumber,
    ) -> Result<Option<DesignVersion>, StoreError> {
        self.inner.find_version(asset_id, version).await
    }

    async fn list_recent_versions(
        &self,
        asset_id: DbId,
        limit: i64,
    ) -> Result<Vec<DesignVersion>, StoreError> {
        self.inner.list_recent_versions(asset_id, limit).await
    }

    async fn list_history(&self, asset_id: DbId) -> Result<Vec<DesignVersion>, StoreError> {
        self.inner.list_history(asset_id).await
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub engine: Arc<DesignVersionEngine>,
    pub store: Arc<InMemoryDesignStore>,
    pub events: Arc<RecordingPublisher>,
}

pub fn gateway(
    analyzer: impl QualityAnalyzer + 'static,
    similarity: Arc<dyn SimilarityEstimator>,
    config: &EngineConfig,
) -> QualityGateway {
    QualityGateway::new(
        Arc::new(analyzer),
        similarity,
        config.analyzer_timeout(),
        config.similarity_timeout(),
    )
}

pub fn harness_with(
    analyzer: impl QualityAnalyzer + 'static,
    similarity: Arc<dyn SimilarityEstimator>,
    config: EngineConfig,
) -> Harness {
    let store = Arc::new(InMemoryDesignStore::new());
    let events = Arc::new(RecordingPublisher::default());
    let engine = DesignVersionEngine::new(
        store.clone() as Arc<dyn DesignStore>,
        store.clone() as Arc<dyn CollaborationDirectory>,
        gateway(analyzer, similarity, &config),
        events.clone() as Arc<dyn EventPublisher>,
        config,
    );
    Harness {
        engine: Arc::new(engine),
        store,
        events,
    }
}

/// Analyzer disabled, similarity fixed at 0.7, default configuration.
pub fn harness() -> Harness {
    harness_with(
        DisabledAnalyzer,
        Arc::new(FixedSimilarity::new(0.7)),
        EngineConfig::default(),
    )
}

/// Engine over a [`ContendedStore`].
pub fn contended_engine(store: Arc<ContendedStore>, config: EngineConfig) -> DesignVersionEngine {
    let directory = store.inner.clone() as Arc<dyn CollaborationDirectory>;
    DesignVersionEngine::new(
        store as Arc<dyn DesignStore>,
        directory,
        gateway(DisabledAnalyzer, Arc::new(FixedSimilarity::new(0.7)), &config),
        Arc::new(RecordingPublisher::default()),
        config,
    )
}

pub async fn seed_asset(engine: &DesignVersionEngine, name: &str) -> DesignAsset {
    engine.create_asset(asset_input(name)).await.unwrap()
}
