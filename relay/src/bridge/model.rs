use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use sweepcore::SweepEnvelope;

/// Latest published sweep for every topic the bridge has seen.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SweepBoard {
    pub latest: HashMap<String, SweepEnvelope>,
    pub published: u64,
}

impl SweepBoard {
    pub fn record(&mut self, topic: &str, envelope: &SweepEnvelope) {
        self.latest.insert(topic.to_string(), envelope.clone());
        self.published += 1;
    }

    pub fn latest(&self, topic: &str) -> Option<&SweepEnvelope> {
        self.latest.get(topic)
    }
}
