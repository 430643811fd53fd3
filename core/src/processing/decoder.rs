use crate::interface::RawSpoke;
use crate::prelude::{DecodeError, Spoke};
use crate::processing::distance_cache::DistanceCache;
use crate::telemetry::log::LogManager;

/// Angular units per full turn in the raw azimuth field.
pub const AZIMUTH_UNITS_PER_TURN: f64 = 4096.0;

const DISTANCE_CACHE_CAPACITY: usize = 16;

/// Converts a raw azimuth in 1/4096 turns to degrees.
pub fn decode_azimuth(raw: u16) -> f64 {
    f64::from(raw) / AZIMUTH_UNITS_PER_TURN * 360.0
}

/// Distances of `sample_count` bins spread uniformly over `[0, range_max)`.
pub fn decode_distances(sample_count: usize, range_max: f64) -> Vec<f64> {
    (0..sample_count)
        .map(|index| index as f64 * range_max / sample_count as f64)
        .collect()
}

/// Turns encoded spoke records into azimuth, distances and intensities.
pub struct SpokeDecoder {
    distances: DistanceCache,
    logger: LogManager,
}

impl SpokeDecoder {
    pub fn new() -> Self {
        Self {
            distances: DistanceCache::with_capacity(DISTANCE_CACHE_CAPACITY),
            logger: LogManager::new("sweepcore::decoder"),
        }
    }

    pub fn decode(&mut self, payload: &[u8]) -> Result<Spoke, DecodeError> {
        let raw = RawSpoke::parse(payload)?;
        Ok(self.decode_raw(raw))
    }

    pub fn decode_raw(&mut self, raw: RawSpoke) -> Spoke {
        let azimuth = decode_azimuth(raw.azimuth);
        self.logger.detail(format_args!(
            "Spoke unpacked with azimuth: {:.4}, range: {:.4} and length: {}",
            azimuth,
            raw.range,
            raw.data.len()
        ));

        let ranges = self.distances.distances(raw.data.len(), raw.range).to_vec();
        Spoke {
            azimuth,
            ranges,
            weights: raw.data,
        }
    }
}

impl Default for SpokeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn azimuth_covers_one_turn() {
        assert_eq!(decode_azimuth(0), 0.0);
        assert_eq!(decode_azimuth(2048), 180.0);
        assert_eq!(decode_azimuth(4096), 360.0);
        assert_eq!(decode_azimuth(1024), 90.0);
    }

    #[test]
    fn distances_are_uniform_over_range() {
        assert_eq!(decode_distances(4, 8.0), vec![0.0, 2.0, 4.0, 6.0]);
        assert!(decode_distances(0, 8.0).is_empty());
    }

    #[test]
    fn decoder_aligns_ranges_with_weights() {
        let mut decoder = SpokeDecoder::new();
        let payload = RawSpoke::new(1024, 8.0, vec![5, 0, 3, 9]).encode();
        let spoke = decoder.decode(&payload).unwrap();
        assert_eq!(spoke.azimuth, 90.0);
        assert_eq!(spoke.ranges, vec![0.0, 2.0, 4.0, 6.0]);
        assert_eq!(spoke.weights, vec![5, 0, 3, 9]);
    }

    #[test]
    fn decoder_reports_malformed_payload() {
        let mut decoder = SpokeDecoder::new();
        let mut payload = RawSpoke::new(10, 8.0, vec![1, 2, 3]).encode();
        payload.pop();
        assert!(matches!(
            decoder.decode(&payload),
            Err(DecodeError::Malformed { .. })
        ));
    }
}
