pub mod accumulator;
pub mod angular;
pub mod decoder;
pub mod distance_cache;
pub mod projection;
pub mod radial;

pub use accumulator::SweepAccumulator;
pub use angular::AngularFilter;
pub use decoder::{decode_azimuth, decode_distances, SpokeDecoder};
pub use distance_cache::DistanceCache;
pub use projection::{CoordinateProjector, RANGE_CALIBRATION};
pub use radial::RadialFilter;
