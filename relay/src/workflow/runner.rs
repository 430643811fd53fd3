use crate::publish::BoxedPublisher;
use crate::workflow::config::RelayConfig;
use anyhow::Context;
use log::{debug, info};
use std::sync::Arc;
use sweepcore::telemetry::{MetricsSnapshot, PipelineMetrics};
use sweepcore::{Delivery, LatestReceiver, SpokeMessage, SpokeOutcome, SweepPipeline};

/// Drives the sweep pipeline from delivered spokes to the configured publisher.
pub struct Runner {
    config: RelayConfig,
    pipeline: SweepPipeline,
    publisher: BoxedPublisher,
}

impl Runner {
    pub fn new(config: RelayConfig, publisher: BoxedPublisher) -> anyhow::Result<Self> {
        let pipeline = SweepPipeline::new(config.pipeline.clone())
            .context("initializing sweep pipeline")?;
        Ok(Self {
            config,
            pipeline,
            publisher,
        })
    }

    pub fn metrics(&self) -> Arc<PipelineMetrics> {
        self.pipeline.metrics()
    }

    pub fn apply(&mut self, delivery: Delivery) -> SpokeOutcome {
        if delivery.skipped > 0 {
            debug!("Skipped {} spokes that arrived while busy", delivery.skipped);
            self.pipeline.metrics().record_skipped(delivery.skipped);
        }
        self.pipeline.handle(
            &delivery.message,
            &self.config.topic,
            self.publisher.as_mut(),
        )
    }

    /// Processes pre-built messages back to back, without dropping any.
    pub fn run_offline<I>(&mut self, messages: I) -> MetricsSnapshot
    where
        I: IntoIterator<Item = SpokeMessage>,
    {
        for message in messages {
            self.apply(Delivery {
                message,
                skipped: 0,
            });
        }
        self.pipeline.metrics().snapshot()
    }

    /// Consumes spokes until every producer has gone away.
    pub async fn run(&mut self, mut spokes: LatestReceiver) -> MetricsSnapshot {
        info!(
            "Processing spokes with message id {} in session {}, publishing on {}",
            self.config.pipeline.message_id, self.config.session_id, self.config.topic
        );
        while let Some(delivery) = spokes.recv().await {
            self.apply(delivery);
        }
        self.pipeline.metrics().snapshot()
    }
}
