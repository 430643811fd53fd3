use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sweepcore::{RawSpoke, SpokeMessage};

const AZIMUTH_UNITS_PER_TURN: u32 = 4096;

/// Configuration for generating synthetic radar rotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub spokes_per_rotation: u32,
    pub samples_per_spoke: usize,
    /// Reported maximum range of every spoke, meters.
    pub range: f32,
    /// Upper bound of the background intensity.
    pub noise: u8,
    /// Echo rings as fractions of the maximum range.
    pub echo_rings: Vec<f32>,
    pub echo_weight: u8,
    pub seed: u64,
    pub sender_stamp: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            spokes_per_rotation: 2048,
            samples_per_spoke: 512,
            range: 1852.0,
            noise: 8,
            echo_rings: vec![0.25, 0.6],
            echo_weight: 200,
            seed: 0,
            sender_stamp: 0,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.spokes_per_rotation == 0 || self.spokes_per_rotation > AZIMUTH_UNITS_PER_TURN {
            anyhow::bail!(
                "spokes_per_rotation must be within 1..={}, got {}",
                AZIMUTH_UNITS_PER_TURN,
                self.spokes_per_rotation
            );
        }
        if !self.range.is_finite() || self.range < 0.0 {
            anyhow::bail!("range must be a finite, non-negative distance");
        }
        Ok(())
    }

    fn azimuth(&self, index: u32) -> u16 {
        // spokes_per_rotation <= 4096 keeps this below 4096
        (index * AZIMUTH_UNITS_PER_TURN / self.spokes_per_rotation) as u16
    }

    fn is_echo(&self, bin: usize) -> bool {
        let bin_width = 1.0 / self.samples_per_spoke as f32;
        let position = bin as f32 * bin_width;
        self.echo_rings
            .iter()
            .any(|ring| (position - ring).abs() < bin_width)
    }
}

fn build_spoke(config: &GeneratorConfig, index: u32, rng: &mut StdRng) -> RawSpoke {
    let data = (0..config.samples_per_spoke)
        .map(|bin| {
            if config.is_echo(bin) {
                config.echo_weight
            } else {
                rng.gen_range(0..=config.noise)
            }
        })
        .collect();
    RawSpoke::new(config.azimuth(index), config.range, data)
}

/// Builds `rotations` full rotations of encoded spoke messages.
pub fn build_spoke_messages(
    config: &GeneratorConfig,
    message_id: u32,
    rotations: usize,
) -> anyhow::Result<Vec<SpokeMessage>> {
    config.validate().context("validating generator config")?;
    let total = (config.spokes_per_rotation as usize)
        .checked_mul(rotations)
        .context("overflow computing spoke count for generator")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut messages = Vec::with_capacity(total);
    for _ in 0..rotations {
        for index in 0..config.spokes_per_rotation {
            let spoke = build_spoke(config, index, &mut rng);
            messages.push(SpokeMessage::new(
                message_id,
                config.sender_stamp,
                spoke.encode(),
            ));
        }
    }

    Ok(messages)
}
