use crate::processing::decoder::decode_distances;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DistanceKey {
    sample_count: usize,
    range_bits: u32,
}

/// Bounded memo of decoded distance tables.
///
/// Spokes from one sensor share a handful of (length, range) combinations, so
/// a small table avoids recomputing the same distances for every spoke. The
/// oldest table is evicted once the cache is full.
pub struct DistanceCache {
    entries: Vec<(DistanceKey, Vec<f64>)>,
    max_capacity: usize,
}

impl DistanceCache {
    pub fn with_capacity(max_capacity: usize) -> Self {
        let max_capacity = max_capacity.max(1);
        Self {
            entries: Vec::with_capacity(max_capacity),
            max_capacity,
        }
    }

    /// Returns the distance table for a spoke, computing it on a miss.
    pub fn distances(&mut self, sample_count: usize, range_max: f32) -> &[f64] {
        let key = DistanceKey {
            sample_count,
            range_bits: range_max.to_bits(),
        };

        let index = match self.entries.iter().position(|(cached, _)| *cached == key) {
            Some(index) => index,
            None => {
                if self.entries.len() >= self.max_capacity {
                    self.entries.remove(0);
                }
                let table = decode_distances(sample_count, f64::from(range_max));
                self.entries.push((key, table));
                self.entries.len() - 1
            }
        };

        &self.entries[index].1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_returns_decoded_table() {
        let mut cache = DistanceCache::with_capacity(2);
        assert_eq!(cache.distances(4, 8.0), &[0.0, 2.0, 4.0, 6.0]);
        assert_eq!(cache.distances(4, 8.0), &[0.0, 2.0, 4.0, 6.0]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_never_exceeds_capacity() {
        let mut cache = DistanceCache::with_capacity(2);
        cache.distances(4, 8.0);
        cache.distances(8, 8.0);
        cache.distances(4, 16.0);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.distances(2, 16.0), &[0.0, 8.0]);
        assert_eq!(cache.len(), 2);
    }
}
