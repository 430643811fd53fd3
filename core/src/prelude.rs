use serde::{Deserialize, Serialize};

use crate::interface::SweepEnvelope;

/// Marker for `last_azimuth` before any spoke has been buffered.
pub const AZIMUTH_SENTINEL: f64 = -1.0;

/// Shared configuration for the spoke-to-sweep chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Middleware message type carrying radar spokes.
    pub message_id: u32,
    /// Keep every n-th range sample of a spoke.
    pub radial_subsetting: usize,
    /// Keep every n-th spoke of a sweep.
    pub angular_subsetting: usize,
    /// Samples must be strictly above this intensity to survive.
    pub min_reading_weight: i32,
    /// Sensor mounting attitude (roll, pitch, yaw). Accepted, not applied.
    pub attitude: [f64; 3],
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            message_id: 1201,
            radial_subsetting: 2,
            angular_subsetting: 10,
            min_reading_weight: 0,
            attitude: [0.0, 0.0, 0.0],
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.radial_subsetting == 0 {
            return Err(ConfigError::ZeroStride("radial_subsetting"));
        }
        if self.angular_subsetting == 0 {
            return Err(ConfigError::ZeroStride("angular_subsetting"));
        }
        if self.attitude.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidAttitude(self.attitude));
        }
        Ok(())
    }
}

/// One decoded radar scan line.
#[derive(Debug, Clone, PartialEq)]
pub struct Spoke {
    pub azimuth: f64,
    pub ranges: Vec<f64>,
    pub weights: Vec<u8>,
}

impl Spoke {
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// A spoke mapped to calibrated cartesian points, stored as `[y, x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedSpoke {
    pub azimuth: f64,
    pub points: Vec<[f64; 2]>,
    pub weights: Vec<u8>,
}

/// Flattened points and weights of one completed rotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sweep {
    points: Vec<[f64; 2]>,
    weights: Vec<u8>,
}

impl Sweep {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            weights: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn extend(&mut self, points: &[[f64; 2]], weights: &[u8]) {
        self.points.extend_from_slice(points);
        self.weights.extend_from_slice(weights);
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn weights(&self) -> &[u8] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_parts(self) -> (Vec<[f64; 2]>, Vec<u8>) {
        (self.points, self.weights)
    }
}

/// Malformed spoke payload. The spoke is dropped, processing continues.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("malformed payload at byte {offset}")]
    Malformed { offset: usize },
    #[error("field {field} uses unsupported wire type {wire_type}")]
    UnsupportedWireType { field: u64, wire_type: u8 },
    #[error("azimuth {0} does not fit in 16 bits")]
    AzimuthOverflow(u64),
    #[error("invalid range {0}")]
    InvalidRange(f32),
}

/// Delivery of a completed sweep failed. The sweep is dropped.
#[derive(thiserror::Error, Debug)]
pub enum PublishError {
    #[error("serializing sweep envelope: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("writing sweep: {0}")]
    Io(#[from] std::io::Error),
    #[error("publisher unavailable: {0}")]
    Unavailable(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    ZeroStride(&'static str),
    #[error("attitude {0:?} must be finite")]
    InvalidAttitude([f64; 3]),
}

/// Downstream sink for completed sweeps.
pub trait SweepPublisher {
    fn publish(&mut self, topic: &str, envelope: &SweepEnvelope) -> Result<(), PublishError>;
}

impl<P: SweepPublisher + ?Sized> SweepPublisher for Box<P> {
    fn publish(&mut self, topic: &str, envelope: &SweepEnvelope) -> Result<(), PublishError> {
        (**self).publish(topic, envelope)
    }
}
