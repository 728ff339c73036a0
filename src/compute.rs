//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (plus the `SimConfig` it needs) and returns a brand-new
//! `GameState`.  The only side effect is logging.

use log::debug;

use crate::config::{PiercePolicy, SimConfig, SweepPolicy};
use crate::entities::{GamePhase, GameState, Key, Laser, Projectile, TargetBlock};
use crate::geometry::{intersects_circle_rectangle, Circle, Point, Rectangle, Size};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state for a play field of the given size.
pub fn init_state(field: Size, config: &SimConfig) -> GameState {
    let laser = Laser {
        velocity: 0.0,
        body: Rectangle {
            position: Point::new(
                field.width / 2.0,
                field.height - config.laser_floor_offset,
            ),
            size: config.laser_size,
        },
    };

    // Segments sit side by side, head first.
    let head = config.first_block;
    let blocks: Vec<TargetBlock> = (0..config.segments)
        .map(|i| Rectangle {
            position: Point::new(
                head.position.x + i as f32 * head.size.width,
                head.position.y,
            ),
            ..head
        })
        .collect();

    GameState {
        phase: GamePhase::Running,
        laser,
        projectiles: Vec::new(),
        blocks,
        field,
        last_key: None,
        frame: 0,
    }
}

// ── Queries ──────────────────────────────────────────────────────────────────

pub fn is_finished(state: &GameState) -> bool {
    state.phase == GamePhase::Finished
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Apply one key to the state.  `Quit` finishes the game; `None` is a no-op.
pub fn apply_input(state: &GameState, key: Option<Key>, config: &SimConfig) -> GameState {
    match key {
        Some(Key::Quit) => GameState {
            phase: GamePhase::Finished,
            ..state.clone()
        },
        Some(Key::Decrease) => GameState {
            laser: Laser {
                velocity: state.laser.velocity - config.laser_step,
                ..state.laser.clone()
            },
            ..state.clone()
        },
        Some(Key::Increase) => GameState {
            laser: Laser {
                velocity: state.laser.velocity + config.laser_step,
                ..state.laser.clone()
            },
            ..state.clone()
        },
        Some(Key::Fire) => fire(state, config),
        None => state.clone(),
    }
}

/// Launch a projectile from the laser's muzzle, centred above its body.
pub fn fire(state: &GameState, config: &SimConfig) -> GameState {
    let body = &state.laser.body;
    let shot = Projectile {
        active: true,
        velocity: config.projectile_speed,
        shape: Circle::new(
            body.center().x,
            body.position.y - config.muzzle_offset,
            config.projectile_radius,
        ),
    };
    debug!("fire at ({}, {})", shot.shape.center.x, shot.shape.center.y);
    let mut projectiles = state.projectiles.clone();
    projectiles.push(shot);
    GameState {
        projectiles,
        ..state.clone()
    }
}

// ── Movement ─────────────────────────────────────────────────────────────────

/// Move the laser by its velocity.  A move that would leave
/// `[0, field.width - body.width]` is cancelled and the velocity drops to 0.
pub fn move_laser(state: &GameState) -> GameState {
    let laser = &state.laser;
    let next_x = laser.body.position.x + laser.velocity;
    let limit = state.field.width - laser.body.size.width;

    let laser = if next_x < 0.0 || next_x > limit {
        Laser {
            velocity: 0.0,
            ..laser.clone()
        }
    } else {
        let mut body = laser.body;
        body.position.x = next_x;
        Laser {
            body,
            ..laser.clone()
        }
    };

    GameState {
        laser,
        ..state.clone()
    }
}

fn leaves_field(block: &TargetBlock, step: f32, field_width: f32) -> bool {
    let next_x = block.position.x + step;
    next_x < 0.0 || next_x > field_width - block.size.width
}

/// Drop a segment one row (its own height) and send it back to the left edge.
fn wrap(block: &TargetBlock) -> TargetBlock {
    let mut wrapped = *block;
    wrapped.position.x = 0.0;
    wrapped.position.y += block.size.height;
    debug!("segment wrapped to y={}", wrapped.position.y);
    wrapped
}

/// Advance every centipede segment by `config.block_step`.
///
/// A segment whose next position would leave the field wraps instead of
/// moving.  Under `SweepPolicy::Coupled` such a wrap also holds every other
/// segment in place for the tick.
pub fn sweep_blocks(state: &GameState, config: &SimConfig) -> GameState {
    let step = config.block_step;
    let width = state.field.width;

    let stalled = config.sweep == SweepPolicy::Coupled
        && state.blocks.iter().any(|b| leaves_field(b, step, width));

    let blocks: Vec<TargetBlock> = state
        .blocks
        .iter()
        .map(|b| {
            if leaves_field(b, step, width) {
                wrap(b)
            } else if stalled {
                *b
            } else {
                let mut moved = *b;
                moved.position.x += step;
                moved
            }
        })
        .collect();

    GameState {
        blocks,
        ..state.clone()
    }
}

/// Move projectiles upward and discard the ones above the top edge.
pub fn advance_projectiles(state: &GameState) -> GameState {
    let projectiles: Vec<Projectile> = state
        .projectiles
        .iter()
        .filter(|p| p.active)
        .filter_map(|p| {
            let mut shape = p.shape;
            shape.center.y -= p.velocity;
            if shape.center.y < 0.0 {
                None
            } else {
                Some(Projectile { shape, ..p.clone() })
            }
        })
        .collect();

    GameState {
        projectiles,
        ..state.clone()
    }
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Remove every segment overlapped by any projectile.
///
/// Each projectile is tested against all remaining segments, so one shot can
/// destroy several overlapping segments in the same tick.
pub fn resolve_collisions(state: &GameState, config: &SimConfig) -> GameState {
    let mut blocks = state.blocks.clone();
    let mut projectiles = Vec::with_capacity(state.projectiles.len());

    for shot in &state.projectiles {
        let before = blocks.len();
        blocks.retain(|b| !intersects_circle_rectangle(&shot.shape, b));
        let destroyed = before - blocks.len();

        if destroyed > 0 {
            debug!(
                "projectile at ({}, {}) destroyed {} segment(s)",
                shot.shape.center.x, shot.shape.center.y, destroyed
            );
            if config.pierce == PiercePolicy::Consume {
                continue;
            }
        }
        projectiles.push(shot.clone());
    }

    GameState {
        blocks,
        projectiles,
        ..state.clone()
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.
///
/// A finished state is returned unchanged.  A quit key finishes the game
/// without moving anything.  Otherwise the stages run in order: input,
/// laser, centipede, projectiles, collisions.
pub fn tick(state: &GameState, key: Option<Key>, field: Size, config: &SimConfig) -> GameState {
    if is_finished(state) {
        return state.clone();
    }

    let state = GameState {
        field,
        last_key: key,
        frame: state.frame + 1,
        ..state.clone()
    };

    let state = apply_input(&state, key, config);
    if is_finished(&state) {
        return state;
    }

    let state = move_laser(&state);
    let state = sweep_blocks(&state, config);
    let state = advance_projectiles(&state);
    resolve_collisions(&state, config)
}
