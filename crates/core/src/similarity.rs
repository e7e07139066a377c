//! Visual similarity from per-channel image statistics.
//!
//! Each rendered image is summarised as one [`ChannelStats`] per colour
//! channel. Two summaries are compared channel by channel:
//!
//! ```text
//! mean_sim = 1 - |mean_a - mean_b| / 255
//! std_sim  = 1 - |std_a  - std_b | / 255
//! channel  = (mean_sim + std_sim) / 2
//! score    = avg(channel) clamped to [0, 1]
//! ```

use serde::{Deserialize, Serialize};

/// Score used when similarity cannot be estimated.
pub const NEUTRAL_SIMILARITY: f64 = 0.5;

/// Score for two identical references.
pub const IDENTICAL_SIMILARITY: f64 = 1.0;

/// Maximum value of an 8-bit channel sample.
const CHANNEL_MAX: f64 = 255.0;

/// Mean and population standard deviation of one colour channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl ChannelStats {
    /// Summarise a sequence of 8-bit samples. Returns zeros for an empty
    /// sequence.
    pub fn from_samples(samples: impl IntoIterator<Item = u8>) -> Self {
        let mut count = 0u64;
        let mut sum = 0f64;
        let mut sum_sq = 0f64;
        for s in samples {
            let v = f64::from(s);
            count += 1;
            sum += v;
            sum_sq += v * v;
        }
        if count == 0 {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
            };
        }
        let n = count as f64;
        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);
        Self {
            mean,
            std_dev: variance.sqrt(),
        }
    }
}

/// Per-channel statistics for interleaved pixel data with `channels`
/// samples per pixel (e.g. 3 for RGB).
pub fn channel_stats_interleaved(pixels: &[u8], channels: usize) -> Vec<ChannelStats> {
    if channels == 0 {
        return Vec::new();
    }
    (0..channels)
        .map(|c| ChannelStats::from_samples(pixels.iter().skip(c).step_by(channels).copied()))
        .collect()
}

/// Similarity of two images from their channel statistics.
///
/// Only channels present in both summaries are compared. Returns
/// [`NEUTRAL_SIMILARITY`] when there is no shared channel.
pub fn similarity_from_channel_stats(a: &[ChannelStats], b: &[ChannelStats]) -> f64 {
    let shared = a.len().min(b.len());
    if shared == 0 {
        return NEUTRAL_SIMILARITY;
    }

    let total: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(ca, cb)| {
            let mean_sim = 1.0 - (ca.mean - cb.mean).abs() / CHANNEL_MAX;
            let std_sim = 1.0 - (ca.std_dev - cb.std_dev).abs() / CHANNEL_MAX;
            (mean_sim + std_sim) / 2.0
        })
        .sum();

    clamp_similarity(total / shared as f64)
}

/// Clamp a score into `[0, 1]`, mapping non-finite values to
/// [`NEUTRAL_SIMILARITY`].
pub fn clamp_similarity(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        NEUTRAL_SIMILARITY
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: f64, std_dev: f64) -> ChannelStats {
        ChannelStats { mean, std_dev }
    }

    #[test]
    fn identical_stats_are_fully_similar() {
        let a = vec![stats(120.0, 30.0), stats(80.0, 12.0), stats(200.0, 5.0)];
        assert_eq!(similarity_from_channel_stats(&a, &a), 1.0);
    }

    #[test]
    fn opposite_extremes_are_dissimilar() {
        let black = vec![stats(0.0, 0.0)];
        let white = vec![stats(255.0, 0.0)];
        // mean_sim = 0, std_sim = 1 -> 0.5
        assert!((similarity_from_channel_stats(&black, &white) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn averages_across_channels() {
        let a = vec![stats(0.0, 0.0), stats(0.0, 0.0)];
        let b = vec![stats(51.0, 0.0), stats(0.0, 0.0)];
        // channel 0: (0.8 + 1) / 2 = 0.9, channel 1: 1.0
        assert!((similarity_from_channel_stats(&a, &b) - 0.95).abs() < 1e-9);
    }

    #[test]
    fn only_shared_channels_count() {
        let rgb = vec![stats(10.0, 1.0), stats(10.0, 1.0), stats(10.0, 1.0)];
        let gray = vec![stats(10.0, 1.0)];
        assert_eq!(similarity_from_channel_stats(&rgb, &gray), 1.0);
    }

    #[test]
    fn no_channels_is_neutral() {
        assert_eq!(similarity_from_channel_stats(&[], &[]), NEUTRAL_SIMILARITY);
    }

    #[test]
    fn samples_mean_and_std() {
        let s = ChannelStats::from_samples([0u8, 255]);
        assert!((s.mean - 127.5).abs() < 1e-9);
        assert!((s.std_dev - 127.5).abs() < 1e-9);

        let empty = ChannelStats::from_samples(std::iter::empty());
        assert_eq!(empty, stats(0.0, 0.0));
    }

    #[test]
    fn interleaved_splits_channels() {
        // Two RGB pixels: (10, 20, 30), (30, 20, 10)
        let pixels = [10u8, 20, 30, 30, 20, 10];
        let channels = channel_stats_interleaved(&pixels, 3);
        assert_eq!(channels.len(), 3);
        assert!((channels[0].mean - 20.0).abs() < 1e-9);
        assert!((channels[1].std_dev).abs() < 1e-9);
        assert!((channels[2].mean - 20.0).abs() < 1e-9);
    }

    #[test]
    fn clamp_handles_non_finite() {
        assert_eq!(clamp_similarity(f64::NAN), NEUTRAL_SIMILARITY);
        assert_eq!(clamp_similarity(1.3), 1.0);
        assert_eq!(clamp_similarity(-0.2), 0.0);
    }
}
