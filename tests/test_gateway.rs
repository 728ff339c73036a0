use std::collections::VecDeque;
use std::io;

use rand::rngs::StdRng;
use rand::SeedableRng;

use centipede::compute::init_state;
use centipede::config::SimConfig;
use centipede::entities::{GamePhase, Key, Projectile};
use centipede::gateway::*;
use centipede::geometry::{Circle, Rectangle, Size};

#[derive(Debug, PartialEq)]
enum Call {
    Clear,
    Rect(Rectangle, Color),
    Circle(Circle, Color),
    Present,
    Delay(u64),
}

/// In-memory gateway that replays scripted keys and records every call.
/// Once the script runs out it reports quit.
struct Recorder {
    keys: VecDeque<Option<Key>>,
    field: Size,
    calls: Vec<Call>,
}

impl Recorder {
    fn new(keys: Vec<Option<Key>>) -> Self {
        Self {
            keys: keys.into(),
            field: Size::new(600.0, 400.0),
            calls: Vec::new(),
        }
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl Gateway for Recorder {
    fn poll_key(&mut self) -> Option<Key> {
        self.keys.pop_front().unwrap_or(Some(Key::Quit))
    }

    fn field_size(&mut self) -> io::Result<Size> {
        Ok(self.field)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.calls.push(Call::Clear);
        Ok(())
    }

    fn draw_rectangle(&mut self, rect: &Rectangle, color: Color) -> io::Result<()> {
        self.calls.push(Call::Rect(*rect, color));
        Ok(())
    }

    fn draw_circle(&mut self, circle: &Circle, color: Color) -> io::Result<()> {
        self.calls.push(Call::Circle(*circle, color));
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.calls.push(Call::Present);
        Ok(())
    }

    fn delay(&mut self, millis: u64) {
        self.calls.push(Call::Delay(millis));
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn steady() -> SimConfig {
    SimConfig::default()
}

// ── render ────────────────────────────────────────────────────────────────────

#[test]
fn render_order_is_clear_blocks_laser_projectiles_present() {
    let config = SimConfig {
        segments: 2,
        ..steady()
    };
    let mut state = init_state(Size::new(600.0, 400.0), &config);
    let shape = Circle::new(50.0, 60.0, 5.0);
    state.projectiles.push(Projectile {
        active: true,
        velocity: 20.0,
        shape,
    });

    let mut gw = Recorder::new(Vec::new());
    render(&mut gw, &state, &config, &mut seeded_rng()).unwrap();

    assert_eq!(
        gw.calls,
        vec![
            Call::Clear,
            Call::Rect(state.blocks[0], C_BLOCK),
            Call::Rect(state.blocks[1], C_BLOCK),
            Call::Rect(state.laser.body, C_LASER),
            Call::Circle(shape, C_PROJECTILE),
            Call::Present,
        ]
    );
}

#[test]
fn flickering_projectiles_use_the_palette() {
    let config = SimConfig {
        flicker: true,
        ..SimConfig::default()
    };
    let mut state = init_state(Size::new(600.0, 400.0), &config);
    for i in 0..20 {
        state.projectiles.push(Projectile {
            active: true,
            velocity: 20.0,
            shape: Circle::new(10.0 * i as f32, 60.0, 5.0),
        });
    }

    let mut gw = Recorder::new(Vec::new());
    render(&mut gw, &state, &config, &mut seeded_rng()).unwrap();

    let colours: Vec<Color> = gw
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Circle(_, colour) => Some(*colour),
            _ => None,
        })
        .collect();
    assert_eq!(colours.len(), 20);
    assert!(colours.iter().all(|c| PROJECTILE_PALETTE.contains(c)));
}

#[test]
fn flicker_is_deterministic_for_a_seed() {
    let config = SimConfig {
        flicker: true,
        ..SimConfig::default()
    };
    let mut state = init_state(Size::new(600.0, 400.0), &config);
    state.projectiles.push(Projectile {
        active: true,
        velocity: 20.0,
        shape: Circle::new(10.0, 60.0, 5.0),
    });

    let mut a = Recorder::new(Vec::new());
    let mut b = Recorder::new(Vec::new());
    render(&mut a, &state, &config, &mut seeded_rng()).unwrap();
    render(&mut b, &state, &config, &mut seeded_rng()).unwrap();
    assert_eq!(a.calls, b.calls);
}

// ── run ───────────────────────────────────────────────────────────────────────

#[test]
fn immediate_quit_renders_nothing() {
    let mut gw = Recorder::new(vec![Some(Key::Quit)]);
    let state = run(&mut gw, &steady(), &mut seeded_rng()).unwrap();
    assert_eq!(state.phase, GamePhase::Finished);
    assert!(gw.calls.is_empty());
}

#[test]
fn each_running_frame_is_rendered_then_paced() {
    let mut gw = Recorder::new(vec![None, Some(Key::Fire)]);
    let state = run(&mut gw, &steady(), &mut seeded_rng()).unwrap();

    assert_eq!(state.phase, GamePhase::Finished);
    assert_eq!(state.frame, 3);
    assert_eq!(gw.count(|c| *c == Call::Present), 2);
    assert_eq!(gw.count(|c| *c == Call::Delay(30)), 2);
    assert_eq!(gw.calls.last(), Some(&Call::Delay(30)));

    // Fired on frame 2 and advanced once; the quit frame moves nothing.
    assert_eq!(state.projectiles.len(), 1);
    assert_eq!(state.projectiles[0].shape.center.y, 350.0);
}

#[test]
fn idle_frames_only_move_the_centipede() {
    let mut gw = Recorder::new(vec![None, None, None]);
    let state = run(&mut gw, &steady(), &mut seeded_rng()).unwrap();
    assert_eq!(state.laser.velocity, 0.0);
    assert!(state.projectiles.is_empty());
    // 3 running ticks moved the head segment 15 px
    assert_eq!(state.blocks[0].position.x, 115.0);
}

#[test]
fn shooting_the_centipede_from_below() {
    // Laser centre sits at x=205.  The shot climbs 20 px a tick and reaches
    // the segment's bottom edge on tick 15, when the segment spans 175..215.
    let config = steady();
    let mut keys = vec![Some(Key::Fire)];
    keys.extend(std::iter::repeat(None).take(20));
    let mut gw = Recorder::new(keys);
    gw.field = Size::new(400.0, 400.0);

    let state = run(&mut gw, &config, &mut seeded_rng()).unwrap();
    assert!(state.blocks.is_empty());
    // ...and kept climbing until it left the field.
    assert!(state.projectiles.is_empty());
}
