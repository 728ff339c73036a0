//! Presentation/input contract and the loop that drives the simulation
//! through it.

use std::io;

use log::info;
use rand::Rng;

use crate::compute::{init_state, is_finished, tick};
use crate::config::SimConfig;
use crate::entities::{GameState, Key};
use crate::geometry::{Circle, Rectangle, Size};

/// RGB colour with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_BLOCK: Color = Color::new(0.2, 0.3, 0.8);
pub const C_LASER: Color = Color::new(1.0, 0.0, 0.0);
pub const C_PROJECTILE: Color = Color::new(1.0, 0.0, 0.0);

/// Colours a flickering projectile cycles through.
pub const PROJECTILE_PALETTE: [Color; 6] = [
    Color::new(1.0, 0.0, 0.0),
    Color::new(1.0, 0.6, 0.0),
    Color::new(1.0, 1.0, 0.0),
    Color::new(0.2, 1.0, 0.2),
    Color::new(0.0, 1.0, 1.0),
    Color::new(1.0, 0.2, 1.0),
];

/// Everything the game needs from the outside world.
///
/// Drawing calls between `clear` and `present` make up one frame.
pub trait Gateway {
    /// Most recent recognised key since the last call, without blocking.
    fn poll_key(&mut self) -> Option<Key>;

    /// Current play-field extents.
    fn field_size(&mut self) -> io::Result<Size>;

    fn clear(&mut self) -> io::Result<()>;

    fn draw_rectangle(&mut self, rect: &Rectangle, color: Color) -> io::Result<()>;

    fn draw_circle(&mut self, circle: &Circle, color: Color) -> io::Result<()>;

    fn present(&mut self) -> io::Result<()>;

    /// Frame pacing.
    fn delay(&mut self, millis: u64);
}

fn projectile_colour(config: &SimConfig, rng: &mut impl Rng) -> Color {
    if config.flicker {
        PROJECTILE_PALETTE[rng.gen_range(0..PROJECTILE_PALETTE.len())]
    } else {
        C_PROJECTILE
    }
}

/// Draw one frame: blocks, then the laser, then projectiles.
pub fn render<G: Gateway>(
    gateway: &mut G,
    state: &GameState,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> io::Result<()> {
    gateway.clear()?;

    for block in &state.blocks {
        gateway.draw_rectangle(block, C_BLOCK)?;
    }
    gateway.draw_rectangle(&state.laser.body, C_LASER)?;
    for shot in &state.projectiles {
        gateway.draw_circle(&shot.shape, projectile_colour(config, rng))?;
    }

    gateway.present()
}

/// Run the game until the player quits and return the final state.
///
/// Each frame polls input, steps the simulation, renders and waits.  The
/// frame on which quit arrives is not rendered.
pub fn run<G: Gateway>(
    gateway: &mut G,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> io::Result<GameState> {
    let field = gateway.field_size()?;
    info!("field {}x{} px", field.width, field.height);
    let mut state = init_state(field, config);

    while !is_finished(&state) {
        let key = gateway.poll_key();
        let field = gateway.field_size()?;
        state = tick(&state, key, field, config);

        if is_finished(&state) {
            info!(
                "quit after {} frames, {} segment(s) left",
                state.frame,
                state.blocks.len()
            );
            break;
        }

        render(gateway, &state, config, rng)?;
        gateway.delay(config.frame_delay_ms);
    }

    Ok(state)
}
