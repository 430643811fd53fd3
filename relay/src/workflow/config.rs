use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use sweepcore::prelude::PipelineConfig;

use crate::generator::profile::GeneratorConfig;

pub const DEFAULT_TOPIC: &str = "radar/sweep";
pub const DEFAULT_SESSION_ID: u32 = 111;

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Destination every completed sweep is published on.
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Middleware session the relay joins.
    #[serde(default = "default_session_id")]
    pub session_id: u32,
    /// Address of the HTTP spoke/sweep bridge.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    /// Optional file receiving one line per published sweep.
    #[serde(default)]
    pub sweep_log: Option<PathBuf>,
    #[serde(flatten)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

fn default_topic() -> String {
    DEFAULT_TOPIC.to_string()
}

fn default_session_id() -> u32 {
    DEFAULT_SESSION_ID
}

impl RelayConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading relay config {}", path_ref.display()))?;
        let config: RelayConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing relay config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating relay config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        pipeline: PipelineConfig,
        topic: String,
        session_id: u32,
        bind: SocketAddr,
        sweep_log: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let config = Self {
            topic,
            session_id,
            bind,
            sweep_log,
            pipeline,
            generator: GeneratorConfig::default(),
        };
        config.validate().context("validating relay arguments")?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.topic.trim().is_empty() {
            anyhow::bail!("topic must not be empty");
        }
        self.pipeline.validate()?;
        self.generator.validate()?;
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            session_id: default_session_id(),
            bind: default_bind(),
            sweep_log: None,
            pipeline: PipelineConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}
