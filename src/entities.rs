//! All game entity types: pure data, no logic.

use crate::geometry::{Circle, Rectangle, Size};

/// Symbolic keys the simulation reacts to.  Anything else the terminal
/// reports never reaches the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Quit,
    Fire,
    /// Push the laser's velocity one step to the left.
    Decrease,
    /// Push the laser's velocity one step to the right.
    Increase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    /// Terminal: no tick mutates a finished state.
    Finished,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Laser {
    /// Signed horizontal velocity, in pixels per tick.
    pub velocity: f32,
    pub body: Rectangle,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub active: bool,
    /// Upward speed: each tick `shape.center.y -= velocity`.
    pub velocity: f32,
    pub shape: Circle,
}

// ── Centipede ─────────────────────────────────────────────────────────────────

/// One centipede segment.  Segments carry no identity beyond their position.
pub type TargetBlock = Rectangle;

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so the pure step function can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub phase: GamePhase,
    pub laser: Laser,
    /// Projectiles in firing order.
    pub projectiles: Vec<Projectile>,
    /// Centipede segments in insertion order.
    pub blocks: Vec<TargetBlock>,
    /// Play-field extents seen on the most recent tick.
    pub field: Size,
    pub last_key: Option<Key>,
    pub frame: u64,
}
