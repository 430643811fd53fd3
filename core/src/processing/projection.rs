use ndarray::{Array1, Zip};

use crate::prelude::{ProjectedSpoke, Spoke};

/// Scale applied to both cartesian axes to convert the sensor's native
/// distance unit.
pub const RANGE_CALIBRATION: f64 = 1.852;

/// Maps polar spoke samples to calibrated cartesian points.
///
/// Points are emitted as `[y, x]`; downstream consumers rely on that order.
pub struct CoordinateProjector;

impl CoordinateProjector {
    pub fn project(spoke: Spoke) -> ProjectedSpoke {
        let theta = spoke.azimuth.to_radians();
        let distances = Array1::from_vec(spoke.ranges);

        let x = (&distances * theta.cos()) * RANGE_CALIBRATION;
        let y = (&distances * theta.sin()) * RANGE_CALIBRATION;
        let points = Zip::from(&y)
            .and(&x)
            .map_collect(|&y, &x| [y, x])
            .into_raw_vec();

        ProjectedSpoke {
            azimuth: spoke.azimuth,
            points,
            weights: spoke.weights,
        }
    }
}
