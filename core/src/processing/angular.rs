use crate::prelude::Sweep;

/// Keeps every n-th buffered spoke of a sweep, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngularFilter {
    stride: usize,
}

impl AngularFilter {
    pub fn new(stride: usize) -> Self {
        Self {
            stride: stride.max(1),
        }
    }

    /// Concatenates the surviving spokes into one flat sweep.
    pub fn subset(&self, points: &[Vec<[f64; 2]>], weights: &[Vec<u8>]) -> Sweep {
        let capacity = points
            .iter()
            .step_by(self.stride)
            .map(Vec::len)
            .sum();

        let mut sweep = Sweep::with_capacity(capacity);
        for (spoke_points, spoke_weights) in points
            .iter()
            .zip(weights)
            .step_by(self.stride)
        {
            sweep.extend(spoke_points, spoke_weights);
        }
        sweep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_keeps_first_spoke_and_every_nth_after() {
        let points = vec![
            vec![[0.0, 0.0]],
            vec![[1.0, 1.0]],
            vec![[2.0, 2.0], [2.5, 2.5]],
            vec![[3.0, 3.0]],
            vec![[4.0, 4.0]],
        ];
        let weights = vec![vec![0], vec![1], vec![2, 25], vec![3], vec![4]];
        let sweep = AngularFilter::new(2).subset(&points, &weights);
        assert_eq!(
            sweep.points(),
            &[[0.0, 0.0], [2.0, 2.0], [2.5, 2.5], [4.0, 4.0]]
        );
        assert_eq!(sweep.weights(), &[0, 2, 25, 4]);
    }

    #[test]
    fn unit_stride_keeps_everything() {
        let points = vec![vec![[0.0, 1.0]], vec![], vec![[2.0, 3.0]]];
        let weights = vec![vec![9], vec![], vec![8]];
        let sweep = AngularFilter::new(1).subset(&points, &weights);
        assert_eq!(sweep.len(), 2);
        assert_eq!(sweep.weights(), &[9, 8]);
    }

    #[test]
    fn empty_buffer_yields_empty_sweep() {
        let sweep = AngularFilter::new(10).subset(&[], &[]);
        assert!(sweep.is_empty());
    }
}
