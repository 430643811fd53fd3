//! Spoke decoding, projection and sweep assembly for the radar sweep relay.
//!
//! Raw spokes flow through [`processing::SpokeDecoder`],
//! [`processing::RadialFilter`] and [`processing::CoordinateProjector`] into a
//! [`processing::SweepAccumulator`], which emits one batched sweep per
//! rotation of the sensor.

pub mod ingest;
pub mod interface;
pub mod pipeline;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use ingest::{latest_channel, Delivery, LatestReceiver, LatestSender};
pub use interface::{RawSpoke, SpokeMessage, SweepEnvelope, SweepEnvelopeBuilder};
pub use pipeline::{SpokeOutcome, SweepPipeline};
pub use prelude::{PipelineConfig, SweepPublisher};
