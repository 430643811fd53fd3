use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::prelude::Sweep;

/// Points and weights of one emitted sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepMessage {
    pub points: Vec<[f64; 2]>,
    pub weights: Vec<u8>,
}

/// Message published downstream for every completed sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepEnvelope {
    pub sent_at: String,
    pub message: SweepMessage,
}

impl SweepEnvelope {
    pub fn len(&self) -> usize {
        self.message.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.message.points.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Packages flushed sweeps with their emission timestamp.
pub struct SweepEnvelopeBuilder;

impl SweepEnvelopeBuilder {
    pub fn build(points: Vec<[f64; 2]>, weights: Vec<u8>, now: DateTime<Utc>) -> SweepEnvelope {
        debug_assert_eq!(points.len(), weights.len());
        SweepEnvelope {
            sent_at: sent_at(now),
            message: SweepMessage { points, weights },
        }
    }

    pub fn from_sweep(sweep: Sweep, now: DateTime<Utc>) -> SweepEnvelope {
        let (points, weights) = sweep.into_parts();
        Self::build(points, weights, now)
    }

    pub fn from_sweep_now(sweep: Sweep) -> SweepEnvelope {
        Self::from_sweep(sweep, Utc::now())
    }
}

/// Microsecond precision, with the fraction left out on whole seconds.
fn sent_at(now: DateTime<Utc>) -> String {
    let format = if now.nanosecond() / 1_000 == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    now.to_rfc3339_opts(format, false)
}
