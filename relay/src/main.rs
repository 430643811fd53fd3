use anyhow::Context;
use bridge::server::SweepBridge;
use clap::Parser;
use generator::profile::build_spoke_messages;
use log::info;
use publish::{FanOut, SweepLog};
use std::net::SocketAddr;
use std::path::PathBuf;
use sweepcore::latest_channel;
use sweepcore::prelude::PipelineConfig;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::{RelayConfig, DEFAULT_SESSION_ID, DEFAULT_TOPIC};
use workflow::runner::Runner;

mod bridge;
mod generator;
mod publish;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Assembles radar spokes into full-rotation sweeps")]
struct Args {
    /// Push synthetic rotations through the pipeline and report the counters
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Rotations generated in offline mode
    #[arg(long, default_value_t = 3)]
    rotations: usize,
    /// Load the relay config from YAML instead of arguments
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, env = "RADAR_SWEEP_TOPIC", default_value = DEFAULT_TOPIC)]
    topic: String,
    #[arg(long, env = "RADAR_SESSION_ID", default_value_t = DEFAULT_SESSION_ID)]
    session_id: u32,
    #[arg(long, env = "RADAR_SPOKE_MESSAGE_ID", default_value_t = 1201)]
    message_id: u32,
    #[arg(long, env = "RADAR_SWEEP_RADIAL_SUBSETTING", default_value_t = 2)]
    radial_subsetting: usize,
    #[arg(long, env = "RADAR_SWEEP_ANGULAR_SUBSETTING", default_value_t = 10)]
    angular_subsetting: usize,
    #[arg(long, env = "RADAR_MIN_READING_WEIGHT", default_value_t = 0, allow_negative_numbers = true)]
    min_reading_weight: i32,
    /// Sensor attitude as roll,pitch,yaw
    #[arg(long, env = "RADAR_ATTITUDE", value_delimiter = ',', default_values_t = [0.0, 0.0, 0.0])]
    attitude: Vec<f64>,
    #[arg(long, env = "RADAR_BRIDGE_BIND", default_value = "127.0.0.1:9000")]
    bind: SocketAddr,
    /// Append every published sweep to this file
    #[arg(long, env = "RADAR_SWEEP_LOG")]
    sweep_log: Option<PathBuf>,
    /// Keep the bridge alive for incoming real-time spokes
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn pipeline_from_args(args: &Args) -> anyhow::Result<PipelineConfig> {
    let attitude: [f64; 3] = args.attitude.as_slice().try_into().with_context(|| {
        format!(
            "attitude needs exactly 3 values, got {}",
            args.attitude.len()
        )
    })?;
    Ok(PipelineConfig {
        message_id: args.message_id,
        radial_subsetting: args.radial_subsetting,
        angular_subsetting: args.angular_subsetting,
        min_reading_weight: args.min_reading_weight,
        attitude,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let relay_config = if let Some(path) = &args.config {
        RelayConfig::load(path)?
    } else {
        RelayConfig::from_args(
            pipeline_from_args(&args)?,
            args.topic.clone(),
            args.session_id,
            args.bind,
            args.sweep_log.clone(),
        )?
    };
    info!(
        "Joining session {} for message id {}",
        relay_config.session_id, relay_config.pipeline.message_id
    );

    let bridge = SweepBridge::new();
    let mut publisher = FanOut::new();
    publisher.push(Box::new(bridge.publisher()));
    if let Some(path) = &relay_config.sweep_log {
        let sweep_log = SweepLog::open(path)?;
        info!("Appending sweeps to {}", sweep_log.path().display());
        publisher.push(Box::new(sweep_log));
    }

    let mut runner = Runner::new(relay_config.clone(), Box::new(publisher))?;

    if args.offline {
        let messages = build_spoke_messages(
            &relay_config.generator,
            relay_config.pipeline.message_id,
            args.rotations,
        )?;
        let summary = runner.run_offline(messages);

        println!(
            "Offline run -> spokes {}, sweeps {}, decode errors {}, publish errors {}",
            summary.spokes_received,
            summary.sweeps_emitted,
            summary.decode_errors,
            summary.publish_errors
        );
    }
    if args.serve {
        let (spokes, receiver) = latest_channel();
        bridge.serve(relay_config.bind, spokes, runner.metrics())?;
        info!("All setup done, processing spokes (Ctrl+C to stop)...");

        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for spoke processing")?;
        runtime.block_on(async {
            tokio::select! {
                summary = runner.run(receiver) => {
                    info!("Spoke producers gone after {} sweeps", summary.sweeps_emitted);
                }
                result = signal::ctrl_c() => {
                    result.context("awaiting Ctrl+C to exit")?;
                }
            }
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
