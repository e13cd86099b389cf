//! Volume-by-price histogram.

use crate::types::VolumeProfile;

/// Number of equal price buckets in the profile.
const PROFILE_LEVELS: usize = 20;

/// Partition the window's price range into 20 equal buckets and accumulate
/// each sample's volume into the bucket containing its price.
///
/// The window maximum books into the last bucket; a flat window (zero price
/// range) books everything into the first. Empty input yields an empty
/// profile.
pub fn volume_profile(prices: &[f64], volumes: &[f64]) -> VolumeProfile {
    let len = prices.len().min(volumes.len());
    if len == 0 {
        return VolumeProfile::default();
    }

    let min = prices[..len].iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices[..len].iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let interval = (max - min) / PROFILE_LEVELS as f64;

    let mut profile = vec![0.0; PROFILE_LEVELS];
    for i in 0..len {
        let bucket = if interval > 0.0 {
            (((prices[i] - min) / interval) as usize).min(PROFILE_LEVELS - 1)
        } else {
            0
        };
        profile[bucket] += volumes[i];
    }

    let price_points = (0..PROFILE_LEVELS)
        .map(|i| min + i as f64 * interval)
        .collect();

    VolumeProfile {
        profile,
        price_points,
    }
}
