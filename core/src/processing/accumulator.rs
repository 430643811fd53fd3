use crate::prelude::{ProjectedSpoke, Sweep, AZIMUTH_SENTINEL};
use crate::processing::angular::AngularFilter;
use crate::telemetry::log::LogManager;

/// Buffers projected spokes until the azimuth wraps, then flushes one sweep.
///
/// A wrap is any strict decrease of azimuth between consecutive spokes. The
/// sensor is assumed to report non-decreasing azimuths within a rotation, so
/// jitter that steps backwards mid-rotation flushes early.
pub struct SweepAccumulator {
    point_buffer: Vec<Vec<[f64; 2]>>,
    weight_buffer: Vec<Vec<u8>>,
    last_azimuth: f64,
    angular: AngularFilter,
    logger: LogManager,
}

impl SweepAccumulator {
    pub fn new(angular_stride: usize) -> Self {
        Self {
            point_buffer: Vec::new(),
            weight_buffer: Vec::new(),
            last_azimuth: AZIMUTH_SENTINEL,
            angular: AngularFilter::new(angular_stride),
            logger: LogManager::new("sweepcore::accumulator"),
        }
    }

    /// Buffers a spoke, returning the previous rotation if this spoke starts a
    /// new one.
    pub fn append(&mut self, spoke: ProjectedSpoke) -> Option<Sweep> {
        let wrapped = self.last_azimuth != AZIMUTH_SENTINEL && spoke.azimuth < self.last_azimuth;

        let flushed = if wrapped {
            let sweep = self.flush();
            self.logger.record(format_args!(
                "Emitting new sweep with {} points",
                sweep.len()
            ));
            Some(sweep)
        } else {
            None
        };

        self.last_azimuth = spoke.azimuth;
        self.point_buffer.push(spoke.points);
        self.weight_buffer.push(spoke.weights);
        self.logger
            .detail(format_args!("Buffering azimuth {:.4}", spoke.azimuth));

        flushed
    }

    fn flush(&mut self) -> Sweep {
        let sweep = self.angular.subset(&self.point_buffer, &self.weight_buffer);
        self.point_buffer.clear();
        self.weight_buffer.clear();
        sweep
    }

    /// Number of spokes waiting for the next wrap.
    pub fn buffered_spokes(&self) -> usize {
        self.point_buffer.len()
    }

    pub fn buffered_points(&self) -> &[Vec<[f64; 2]>] {
        &self.point_buffer
    }

    pub fn buffered_weights(&self) -> &[Vec<u8>] {
        &self.weight_buffer
    }

    pub fn last_azimuth(&self) -> f64 {
        self.last_azimuth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spoke(azimuth: f64, marker: f64) -> ProjectedSpoke {
        ProjectedSpoke {
            azimuth,
            points: vec![[marker, marker]],
            weights: vec![marker as u8],
        }
    }

    #[test]
    fn wrap_flushes_previous_rotation() {
        let mut accumulator = SweepAccumulator::new(1);
        assert!(accumulator.append(spoke(10.0, 1.0)).is_none());
        assert!(accumulator.append(spoke(20.0, 2.0)).is_none());
        assert!(accumulator.append(spoke(30.0, 3.0)).is_none());

        let sweep = accumulator.append(spoke(5.0, 4.0)).unwrap();
        assert_eq!(sweep.points(), &[[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]);
        assert_eq!(sweep.weights(), &[1, 2, 3]);

        assert_eq!(accumulator.buffered_spokes(), 1);
        assert_eq!(accumulator.buffered_points(), &[vec![[4.0, 4.0]]]);
        assert_eq!(accumulator.buffered_weights(), &[vec![4]]);
        assert_eq!(accumulator.last_azimuth(), 5.0);
    }

    #[test]
    fn flush_applies_angular_stride() {
        let mut accumulator = SweepAccumulator::new(2);
        for (azimuth, marker) in [(10.0, 1.0), (20.0, 2.0), (30.0, 3.0)] {
            assert!(accumulator.append(spoke(azimuth, marker)).is_none());
        }
        let sweep = accumulator.append(spoke(5.0, 4.0)).unwrap();
        assert_eq!(sweep.weights(), &[1, 3]);
    }

    #[test]
    fn first_spoke_never_flushes() {
        let mut accumulator = SweepAccumulator::new(1);
        assert_eq!(accumulator.last_azimuth(), AZIMUTH_SENTINEL);
        assert!(accumulator.append(spoke(0.0, 1.0)).is_none());
        assert_eq!(accumulator.buffered_spokes(), 1);
    }

    #[test]
    fn equal_or_increasing_azimuth_keeps_buffering() {
        let mut accumulator = SweepAccumulator::new(1);
        for azimuth in [100.0, 100.0, 200.0, 200.0, 359.9] {
            assert!(accumulator.append(spoke(azimuth, 1.0)).is_none());
        }
        assert_eq!(accumulator.buffered_spokes(), 5);
    }

    #[test]
    fn empty_spoke_occupies_a_slot() {
        let mut accumulator = SweepAccumulator::new(1);
        accumulator.append(spoke(10.0, 1.0));
        accumulator.append(ProjectedSpoke {
            azimuth: 20.0,
            points: vec![],
            weights: vec![],
        });
        assert_eq!(accumulator.buffered_spokes(), 2);
        assert!(accumulator.buffered_points()[1].is_empty());

        let mut strided = SweepAccumulator::new(2);
        strided.append(ProjectedSpoke {
            azimuth: 10.0,
            points: vec![],
            weights: vec![],
        });
        strided.append(spoke(20.0, 2.0));
        strided.append(spoke(30.0, 3.0));
        let sweep = strided.append(spoke(1.0, 4.0)).unwrap();
        assert_eq!(sweep.weights(), &[3]);
    }

    #[test]
    fn backwards_jitter_flushes_early() {
        let mut accumulator = SweepAccumulator::new(1);
        accumulator.append(spoke(10.0, 1.0));
        accumulator.append(spoke(20.0, 2.0));
        let sweep = accumulator.append(spoke(19.5, 3.0)).unwrap();
        assert_eq!(sweep.len(), 2);
    }
}
