use std::sync::Arc;

use crate::interface::{SpokeMessage, SweepEnvelope, SweepEnvelopeBuilder};
use crate::prelude::{ConfigError, PipelineConfig, Spoke, Sweep, SweepPublisher};
use crate::processing::{CoordinateProjector, RadialFilter, SpokeDecoder, SweepAccumulator};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::PipelineMetrics;

/// What happened to one delivered message.
#[derive(Debug, Clone, PartialEq)]
pub enum SpokeOutcome {
    /// Not a radar spoke for this pipeline.
    Ignored,
    /// The payload could not be decoded.
    Dropped,
    /// Buffered into the current rotation.
    Buffered,
    /// Buffered, and the previous rotation was completed.
    Completed(SweepEnvelope),
}

/// Decode, filter, project and accumulate chain for one sensor.
pub struct SweepPipeline {
    config: PipelineConfig,
    decoder: SpokeDecoder,
    radial: RadialFilter,
    accumulator: SweepAccumulator,
    metrics: Arc<PipelineMetrics>,
    logger: LogManager,
}

impl SweepPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        Self::with_metrics(config, Arc::new(PipelineMetrics::new()))
    }

    pub fn with_metrics(
        config: PipelineConfig,
        metrics: Arc<PipelineMetrics>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let logger = LogManager::new("sweepcore::pipeline");
        logger.record(format_args!(
            "Pipeline for message {} with radial stride {}, angular stride {}, min weight {}, attitude {:?}",
            config.message_id,
            config.radial_subsetting,
            config.angular_subsetting,
            config.min_reading_weight,
            config.attitude
        ));

        Ok(Self {
            decoder: SpokeDecoder::new(),
            radial: RadialFilter::new(config.radial_subsetting, config.min_reading_weight),
            accumulator: SweepAccumulator::new(config.angular_subsetting),
            config,
            metrics,
            logger,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<PipelineMetrics> {
        self.metrics.clone()
    }

    pub fn accumulator(&self) -> &SweepAccumulator {
        &self.accumulator
    }

    /// Filters, projects and buffers an already decoded spoke.
    pub fn process_spoke(&mut self, spoke: Spoke) -> Option<Sweep> {
        let filtered = self.radial.filter(spoke);
        let projected = CoordinateProjector::project(filtered);
        self.accumulator.append(projected)
    }

    /// Runs one delivered message through the whole chain.
    pub fn process(&mut self, message: &SpokeMessage) -> SpokeOutcome {
        self.metrics.record_received();

        if message.message_id != self.config.message_id {
            self.metrics.record_ignored();
            self.logger.detail(format_args!(
                "Ignoring message {} from sender {}",
                message.message_id, message.sender_stamp
            ));
            return SpokeOutcome::Ignored;
        }

        self.logger
            .detail(format_args!("Spoke from sender {}", message.sender_stamp));

        let spoke = match self.decoder.decode(&message.payload) {
            Ok(spoke) => spoke,
            Err(err) => {
                self.metrics.record_decode_error();
                self.logger.warning(format_args!(
                    "Dropping spoke from sender {}: {}",
                    message.sender_stamp, err
                ));
                return SpokeOutcome::Dropped;
            }
        };

        match self.process_spoke(spoke) {
            Some(sweep) => {
                self.metrics.record_sweep();
                SpokeOutcome::Completed(SweepEnvelopeBuilder::from_sweep_now(sweep))
            }
            None => SpokeOutcome::Buffered,
        }
    }

    /// Processes a message and publishes a completed sweep on `topic`.
    ///
    /// A failed publish is logged and counted; the sweep is not retried.
    pub fn handle<P>(&mut self, message: &SpokeMessage, topic: &str, publisher: &mut P) -> SpokeOutcome
    where
        P: SweepPublisher + ?Sized,
    {
        let outcome = self.process(message);
        if let SpokeOutcome::Completed(envelope) = &outcome {
            self.logger.detail(format_args!(
                "Publishing {} points on {}",
                envelope.len(),
                topic
            ));
            if let Err(err) = publisher.publish(topic, envelope) {
                self.metrics.record_publish_error();
                self.logger
                    .failure(format_args!("Failed publishing sweep on {}: {}", topic, err));
            }
        }
        outcome
    }
}
