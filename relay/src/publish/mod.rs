pub mod sweep_log;

use log::warn;
use sweepcore::prelude::{PublishError, SweepPublisher};
use sweepcore::SweepEnvelope;

pub use sweep_log::SweepLog;

pub type BoxedPublisher = Box<dyn SweepPublisher + Send>;

/// Forwards every sweep to all registered publishers.
///
/// Every publisher is attempted; the first failure is reported.
#[derive(Default)]
pub struct FanOut {
    publishers: Vec<BoxedPublisher>,
}

impl FanOut {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, publisher: BoxedPublisher) {
        self.publishers.push(publisher);
    }
}

impl SweepPublisher for FanOut {
    fn publish(&mut self, topic: &str, envelope: &SweepEnvelope) -> Result<(), PublishError> {
        let mut first_error = None;
        for publisher in &mut self.publishers {
            if let Err(err) = publisher.publish(topic, envelope) {
                warn!("publisher failed on {}: {}", topic, err);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
