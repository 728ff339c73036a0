//! Simulation tunables and the command-line surface that overrides them.

use std::path::PathBuf;

use clap::Parser;

use crate::geometry::{Rectangle, Size};

/// What happens to a projectile after it destroys a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PiercePolicy {
    /// The projectile keeps flying and can hit blocks on later ticks.
    #[default]
    PassThrough,
    /// The projectile is removed at the end of the tick in which it hit.
    Consume,
}

/// How the centipede reacts when a segment would leave the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SweepPolicy {
    /// One segment at an edge freezes the horizontal step of every segment.
    #[default]
    Coupled,
    /// Each segment wraps on its own; the rest keep moving.
    Independent,
}

/// Every constant the simulation step reads.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    /// Gap between the laser's top edge and a fresh projectile's centre.
    pub muzzle_offset: f32,
    /// Horizontal pixels every segment advances per tick.
    pub block_step: f32,
    /// Velocity change per decrease/increase key press.
    pub laser_step: f32,
    pub laser_size: Size,
    /// Distance from the field's bottom edge to the laser's top edge.
    pub laser_floor_offset: f32,
    /// Head segment of the centipede.
    pub first_block: Rectangle,
    /// Number of segments laid out left-to-right from `first_block`.
    pub segments: usize,
    pub frame_delay_ms: u64,
    pub pierce: PiercePolicy,
    pub sweep: SweepPolicy,
    /// Re-colour every projectile at random on each frame instead of
    /// drawing it red.
    pub flicker: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            projectile_speed: 20.0,
            projectile_radius: 5.0,
            muzzle_offset: 10.0,
            block_step: 5.0,
            laser_step: 1.0,
            laser_size: Size::new(10.0, 20.0),
            laser_floor_offset: 20.0,
            first_block: Rectangle::new(100.0, 30.0, 40.0, 40.0),
            segments: 1,
            frame_delay_ms: 30,
            pierce: PiercePolicy::PassThrough,
            sweep: SweepPolicy::Coupled,
            flicker: false,
        }
    }
}

impl SimConfig {
    /// Reject values the step cannot run on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("projectile_speed", self.projectile_speed),
            ("muzzle_offset", self.muzzle_offset),
            ("block_step", self.block_step),
            ("laser_step", self.laser_step),
            ("laser_floor_offset", self.laser_floor_offset),
            ("first_block.x", self.first_block.position.x),
            ("first_block.y", self.first_block.position.y),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite(name));
            }
        }

        // Projectiles only leave the field through the top edge.
        if self.projectile_speed <= 0.0 {
            return Err(ConfigError::NonPositive("projectile_speed"));
        }

        if !(self.projectile_radius.is_finite() && self.projectile_radius > 0.0) {
            return Err(ConfigError::NonPositive("projectile_radius"));
        }

        let extents = [
            ("laser_size.width", self.laser_size.width),
            ("laser_size.height", self.laser_size.height),
            ("first_block.width", self.first_block.size.width),
            ("first_block.height", self.first_block.size.height),
        ];
        for (name, value) in extents {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive(name));
            }
        }

        if self.segments == 0 {
            return Err(ConfigError::NoSegments);
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),

    #[error("the centipede needs at least one segment")]
    NoSegments,
}

/// Command-line flags.  Every value flag is optional and falls back to
/// `SimConfig::default()`.
#[derive(Debug, Parser)]
#[command(name = "centipede", about = "Shoot the centipede before it reaches you")]
pub struct Args {
    /// Number of centipede segments
    #[arg(long)]
    pub segments: Option<usize>,

    /// Milliseconds to wait between frames
    #[arg(long)]
    pub frame_delay_ms: Option<u64>,

    /// Upward projectile speed in pixels per tick
    #[arg(long, allow_negative_numbers = true)]
    pub projectile_speed: Option<f32>,

    /// Horizontal centipede step in pixels per tick
    #[arg(long, allow_negative_numbers = true)]
    pub block_step: Option<f32>,

    /// Remove a projectile once it has hit a segment
    #[arg(long)]
    pub consume_projectiles: bool,

    /// Let each segment wrap on its own instead of stalling the whole centipede
    #[arg(long)]
    pub independent_sweep: bool,

    /// Give projectiles a random colour on every frame
    #[arg(long)]
    pub flicker: bool,

    /// Write log output to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Overlay the flags on the default configuration and validate it.
    pub fn sim_config(&self) -> Result<SimConfig, ConfigError> {
        let mut config = SimConfig::default();
        if let Some(segments) = self.segments {
            config.segments = segments;
        }
        if let Some(delay) = self.frame_delay_ms {
            config.frame_delay_ms = delay;
        }
        if let Some(speed) = self.projectile_speed {
            config.projectile_speed = speed;
        }
        if let Some(step) = self.block_step {
            config.block_step = step;
        }
        if self.consume_projectiles {
            config.pierce = PiercePolicy::Consume;
        }
        if self.independent_sweep {
            config.sweep = SweepPolicy::Independent;
        }
        config.flicker = self.flicker;

        config.validate()?;
        Ok(config)
    }
}
