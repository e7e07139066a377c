//! Visual similarity from per-channel statistics of fetched images.

use async_trait::async_trait;
use dve_core::similarity::{
    channel_stats_interleaved, similarity_from_channel_stats, ChannelStats,
};

use super::{GatewayError, SimilarityEstimator};

/// Fetches both references over HTTP, decodes them, and compares RGB
/// channel means and standard deviations.
pub struct ChannelStatsEstimator {
    client: reqwest::Client,
}

impl ChannelStatsEstimator {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, GatewayError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body: format!("fetching {url}"),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn stats_for(&self, url: &str) -> Result<Vec<ChannelStats>, GatewayError> {
        let bytes = self.fetch(url).await?;
        // Decoding is CPU-bound.
        tokio::task::spawn_blocking(move || decode_channel_stats(&bytes))
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?
    }
}

impl Default for ChannelStatsEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SimilarityEstimator for ChannelStatsEstimator {
    async fn similarity(&self, a: &str, b: &str) -> Result<f64, GatewayError> {
        let (stats_a, stats_b) = tokio::try_join!(self.stats_for(a), self.stats_for(b))?;
        Ok(similarity_from_channel_stats(&stats_a, &stats_b))
    }
}

/// Decode an encoded image and summarise its RGB channels.
pub fn decode_channel_stats(bytes: &[u8]) -> Result<Vec<ChannelStats>, GatewayError> {
    let image = image::load_from_memory(bytes).map_err(|e| GatewayError::Decode(e.to_string()))?;
    let rgb = image.to_rgb8();
    Ok(channel_stats_interleaved(rgb.as_raw(), 3))
}
