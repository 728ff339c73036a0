//! Terminal gateway.  All terminal I/O lives here.
//!
//! The play field is measured in virtual pixels; each terminal cell covers
//! `CELL_WIDTH` x `CELL_HEIGHT` of them.  Shapes are rasterised by testing
//! cells against the geometry predicates, so what lights up on screen is
//! what the collision code sees.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{self, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use log::warn;

use crate::entities::Key;
use crate::gateway::{Color, Gateway};
use crate::geometry::{intersects_circle_rectangle, point_in_rectangle, Circle, Rectangle, Size};

pub const CELL_WIDTH: f32 = 8.0;
pub const CELL_HEIGHT: f32 = 16.0;

const C_HINT: style::Color = style::Color::DarkGrey;
const HINT: &str = "A D : Move   F : Shoot   Q : Quit";

const GLYPH_RECT: &str = "█";
const GLYPH_CIRCLE: &str = "●";

// ── Input ─────────────────────────────────────────────────────────────────────

/// Map a terminal event onto a game key.  Unrecognised input is `None`.
pub fn key_from_event(event: &Event) -> Option<Key> {
    let Event::Key(KeyEvent {
        code,
        kind,
        modifiers,
        ..
    }) = event
    else {
        return None;
    };
    if *kind == KeyEventKind::Release {
        return None;
    }
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Key::Quit),
        KeyCode::Char('f') | KeyCode::Char('F') | KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Key::Decrease),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Key::Increase),
        _ => None,
    }
}

/// Dedicate a thread exclusively to blocking event reads, sending them
/// through a channel so the game loop never has to block on I/O.
pub fn spawn_event_reader() -> Receiver<Event> {
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                warn!("terminal event read failed: {}", e);
                break;
            }
        }
    });
    rx
}

// ── Rasterisation ─────────────────────────────────────────────────────────────

fn cell_rect(col: u16, row: u16) -> Rectangle {
    Rectangle::new(
        col as f32 * CELL_WIDTH,
        row as f32 * CELL_HEIGHT,
        CELL_WIDTH,
        CELL_HEIGHT,
    )
}

/// Cells whose bounds overlap `[left, right] x [top, bottom]`, clipped to the grid.
fn candidate_cells(
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    cols: u16,
    rows: u16,
) -> impl Iterator<Item = (u16, u16)> {
    let first_col = (left / CELL_WIDTH).floor().max(0.0) as u16;
    let last_col = ((right / CELL_WIDTH).floor().max(-1.0) as i32).min(cols as i32 - 1);
    let first_row = (top / CELL_HEIGHT).floor().max(0.0) as u16;
    let last_row = ((bottom / CELL_HEIGHT).floor().max(-1.0) as i32).min(rows as i32 - 1);

    (first_row as i32..=last_row).flat_map(move |row| {
        (first_col as i32..=last_col).map(move |col| (col as u16, row as u16))
    })
}

fn cell_of(x: f32, y: f32, cols: u16, rows: u16) -> Option<(u16, u16)> {
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let col = (x / CELL_WIDTH) as u16;
    let row = (y / CELL_HEIGHT) as u16;
    (col < cols && row < rows).then_some((col, row))
}

/// Cells whose centre lies inside `rect`.  A rectangle smaller than a cell
/// still lights the cell holding its centre.
pub fn rectangle_cells(rect: &Rectangle, cols: u16, rows: u16) -> Vec<(u16, u16)> {
    let mut cells: Vec<(u16, u16)> =
        candidate_cells(rect.position.x, rect.position.y, rect.right(), rect.bottom(), cols, rows)
            .filter(|&(col, row)| point_in_rectangle(cell_rect(col, row).center(), rect))
            .collect();
    if cells.is_empty() {
        let c = rect.center();
        cells.extend(cell_of(c.x, c.y, cols, rows));
    }
    cells
}

/// Cells the circle overlaps.
pub fn circle_cells(circle: &Circle, cols: u16, rows: u16) -> Vec<(u16, u16)> {
    let Circle { center, radius } = *circle;
    candidate_cells(
        center.x - radius,
        center.y - radius,
        center.x + radius,
        center.y + radius,
        cols,
        rows,
    )
    .filter(|&(col, row)| intersects_circle_rectangle(circle, &cell_rect(col, row)))
    .collect()
}

fn to_terminal(color: Color) -> style::Color {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    style::Color::Rgb {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    }
}

// ── Gateway ───────────────────────────────────────────────────────────────────

/// Crossterm-backed gateway.  The bottom terminal row holds the controls
/// hint; the rows above it are the play field.
pub struct TerminalGateway<W: Write> {
    out: W,
    events: Receiver<Event>,
    cols: u16,
    rows: u16,
}

impl<W: Write> TerminalGateway<W> {
    pub fn new(out: W, events: Receiver<Event>) -> Self {
        Self {
            out,
            events,
            cols: 0,
            rows: 0,
        }
    }

    fn fill(&mut self, cells: &[(u16, u16)], glyph: &str, color: Color) -> io::Result<()> {
        self.out.queue(style::SetForegroundColor(to_terminal(color)))?;
        for &(col, row) in cells {
            self.out.queue(cursor::MoveTo(col, row))?;
            self.out.queue(Print(glyph))?;
        }
        Ok(())
    }
}

impl<W: Write> Gateway for TerminalGateway<W> {
    fn poll_key(&mut self) -> Option<Key> {
        let mut latest = None;
        loop {
            match self.events.try_recv() {
                Ok(ev) => match key_from_event(&ev) {
                    Some(Key::Quit) => return Some(Key::Quit),
                    Some(key) => latest = Some(key),
                    None => {}
                },
                Err(TryRecvError::Empty) => return latest,
                Err(TryRecvError::Disconnected) => {
                    // Without a reader no quit key can ever arrive.
                    warn!("input reader stopped, quitting");
                    return Some(Key::Quit);
                }
            }
        }
    }

    fn field_size(&mut self) -> io::Result<Size> {
        let (cols, rows) = terminal::size()?;
        self.cols = cols;
        self.rows = rows.saturating_sub(1);
        Ok(Size::new(
            self.cols as f32 * CELL_WIDTH,
            self.rows as f32 * CELL_HEIGHT,
        ))
    }

    fn clear(&mut self) -> io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn draw_rectangle(&mut self, rect: &Rectangle, color: Color) -> io::Result<()> {
        let cells = rectangle_cells(rect, self.cols, self.rows);
        self.fill(&cells, GLYPH_RECT, color)
    }

    fn draw_circle(&mut self, circle: &Circle, color: Color) -> io::Result<()> {
        let cells = circle_cells(circle, self.cols, self.rows);
        self.fill(&cells, GLYPH_CIRCLE, color)
    }

    fn present(&mut self) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(1, self.rows))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print(HINT))?;

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows))?;
        self.out.flush()
    }

    fn delay(&mut self, millis: u64) {
        thread::sleep(Duration::from_millis(millis));
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Raw mode, alternate screen and a hidden cursor for as long as it lives.
/// Dropping it restores the terminal on every exit path.
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let session = Self { _private: () };
        let mut out = io::stdout();
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if let Err(e) = out.execute(cursor::Show) {
            warn!("failed to show cursor: {}", e);
        }
        if let Err(e) = out.execute(terminal::LeaveAlternateScreen) {
            warn!("failed to leave alternate screen: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("failed to disable raw mode: {}", e);
        }
    }
}
