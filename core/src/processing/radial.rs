use crate::prelude::Spoke;

/// Thins the range samples of a single spoke.
///
/// Samples are first subsampled by stride, starting at index 0, and only the
/// survivors are thresholded. The two steps do not commute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadialFilter {
    stride: usize,
    min_weight: i32,
}

impl RadialFilter {
    pub fn new(stride: usize, min_weight: i32) -> Self {
        Self {
            stride: stride.max(1),
            min_weight,
        }
    }

    pub fn filter(&self, spoke: Spoke) -> Spoke {
        let min_weight = self.min_weight;
        let (ranges, weights) = spoke
            .ranges
            .into_iter()
            .zip(spoke.weights)
            .step_by(self.stride)
            .filter(|&(_, weight)| i32::from(weight) > min_weight)
            .unzip();

        Spoke {
            azimuth: spoke.azimuth,
            ranges,
            weights,
        }
    }
}
