use sweepcore::prelude::{PipelineConfig, PublishError};
use sweepcore::{
    latest_channel, RawSpoke, SpokeMessage, SpokeOutcome, SweepEnvelope, SweepPipeline,
    SweepPublisher,
};

const SPOKES_PER_ROTATION: u16 = 64;

struct Recorder {
    envelopes: Vec<SweepEnvelope>,
}

impl SweepPublisher for Recorder {
    fn publish(&mut self, _topic: &str, envelope: &SweepEnvelope) -> Result<(), PublishError> {
        self.envelopes.push(envelope.clone());
        Ok(())
    }
}

fn rotation_messages(rotations: usize) -> Vec<SpokeMessage> {
    let step = 4096 / SPOKES_PER_ROTATION;
    (0..rotations)
        .flat_map(|_| 0..SPOKES_PER_ROTATION)
        .map(|index| {
            let data = (0..32u8).map(|bin| if bin % 4 == 0 { 200 } else { 1 }).collect();
            let payload = RawSpoke::new(index * step, 1000.0, data).encode();
            SpokeMessage::new(1201, 3, payload)
        })
        .collect()
}

#[test]
fn three_rotations_emit_two_complete_sweeps() {
    let config = PipelineConfig {
        radial_subsetting: 2,
        angular_subsetting: 4,
        min_reading_weight: 10,
        ..Default::default()
    };
    let mut pipeline = SweepPipeline::new(config).unwrap();
    let mut recorder = Recorder { envelopes: vec![] };

    for message in rotation_messages(3) {
        pipeline.handle(&message, "radar/sweep", &mut recorder);
    }

    // stride 2 keeps bins 0,2,..,30; the threshold keeps every fourth bin
    let per_spoke = 8;
    let spokes_kept = (SPOKES_PER_ROTATION as usize).div_ceil(4);
    assert_eq!(recorder.envelopes.len(), 2);
    for envelope in &recorder.envelopes {
        assert_eq!(envelope.message.points.len(), envelope.message.weights.len());
        assert_eq!(envelope.len(), per_spoke * spokes_kept);
        assert!(envelope.message.weights.iter().all(|&w| w == 200));
    }
    assert_eq!(
        pipeline.accumulator().buffered_spokes(),
        SPOKES_PER_ROTATION as usize
    );
}

#[test]
fn latest_wins_channel_feeds_pipeline() {
    let (tx, mut rx) = latest_channel();
    let config = PipelineConfig {
        angular_subsetting: 1,
        ..Default::default()
    };
    let mut pipeline = SweepPipeline::new(config).unwrap();
    let metrics = pipeline.metrics();

    let messages = rotation_messages(2);
    let mut completed = 0;
    for pair in messages.chunks(2) {
        // the consumer only gets to every second message
        for message in pair {
            tx.offer(message.clone()).unwrap();
        }
        let delivery = rx.try_recv().unwrap();
        metrics.record_skipped(delivery.skipped);
        if let SpokeOutcome::Completed(envelope) = pipeline.process(&delivery.message) {
            completed += 1;
            assert_eq!(envelope.message.points.len(), envelope.message.weights.len());
        }
    }

    assert_eq!(completed, 1);
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.spokes_skipped, messages.len() as u64 / 2);
    assert_eq!(snapshot.spokes_received, messages.len() as u64 / 2);
}
