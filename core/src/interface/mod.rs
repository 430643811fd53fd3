pub mod envelope;
pub mod message;
pub mod spoke;

pub use envelope::{SweepEnvelope, SweepEnvelopeBuilder, SweepMessage};
pub use message::SpokeMessage;
pub use spoke::RawSpoke;
