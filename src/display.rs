//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::controller::{Overlay, TITLE};
use crate::entities::GameState;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_PLAYER: Color = Color::Green;
const C_BULLET: Color = Color::Yellow;
const C_INVADER: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_OVERLAY: Color = Color::White;

const FILL: &str = "█";
const CONTROLS_HINT: &str = "← → / A D : Move   SPACE : Shoot   ENTER : Start   Q : Quit";

// ── Field → terminal mapping ──────────────────────────────────────────────────

/// A rectangle in terminal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

/// Maps field coordinates onto the terminal interior.
///
/// Row 0 is the HUD, rows 1 and h-2 the border, row h-1 the controls hint.
/// Columns 0 and w-1 are the side walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub term_width: u16,
    pub term_height: u16,
    field_width: i32,
    field_height: i32,
}

const INTERIOR_LEFT: u16 = 1;
const INTERIOR_TOP: u16 = 2;

impl Viewport {
    pub fn new(term_width: u16, term_height: u16, state: &GameState) -> Viewport {
        Viewport {
            term_width,
            term_height,
            field_width: state.config.field_width,
            field_height: state.config.field_height,
        }
    }

    pub fn interior_width(&self) -> u16 {
        self.term_width.saturating_sub(2)
    }

    pub fn interior_height(&self) -> u16 {
        self.term_height.saturating_sub(4)
    }

    /// Project a field rectangle onto cells.  Anything visible covers at
    /// least one cell; anything entirely outside the interior yields `None`.
    pub fn project(&self, x: i32, y: i32, width: i32, height: i32) -> Option<CellRect> {
        let (col, w) = span(x, width, self.field_width, self.interior_width())?;
        let (row, h) = span(y, height, self.field_height, self.interior_height())?;
        Some(CellRect {
            col: INTERIOR_LEFT + col,
            row: INTERIOR_TOP + row,
            width: w,
            height: h,
        })
    }
}

/// Scale `[start, start + len)` from `field` units onto `cells` cells and
/// clip it.  Returns `(first cell, cell count)`.
fn span(start: i32, len: i32, field: i32, cells: u16) -> Option<(u16, u16)> {
    if cells == 0 || field <= 0 {
        return None;
    }
    let cells = i64::from(cells);
    let field = i64::from(field);
    let first = (i64::from(start) * cells).div_euclid(field);
    let mut end = ((i64::from(start) + i64::from(len)) * cells).div_euclid(field);
    if end <= first {
        end = first + 1;
    }
    let first = first.max(0);
    let end = end.min(cells);
    if first >= end {
        return None;
    }
    Some((first as u16, (end - first) as u16))
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    overlay: &Overlay,
    viewport: &Viewport,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, viewport)?;
    draw_hud(out, state, viewport)?;

    let cfg = &state.config;
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    if let Some(rect) = viewport.project(state.player.x, state.player.y, cfg.player_width, cfg.player_height) {
        fill_rect(out, rect)?;
    }

    out.queue(style::SetForegroundColor(C_BULLET))?;
    for bullet in &state.bullets {
        if let Some(rect) = viewport.project(bullet.x, bullet.y, cfg.bullet_width, cfg.bullet_height) {
            fill_rect(out, rect)?;
        }
    }

    out.queue(style::SetForegroundColor(C_INVADER))?;
    for invader in state.formation.alive() {
        if let Some(rect) = viewport.project(invader.x, invader.y, cfg.invader_width, cfg.invader_height) {
            fill_rect(out, rect)?;
        }
    }

    draw_controls_hint(out, viewport)?;

    if overlay.visible {
        draw_overlay(out, overlay, viewport)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, viewport.term_height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn fill_rect<W: Write>(out: &mut W, rect: CellRect) -> std::io::Result<()> {
    let line = FILL.repeat(rect.width as usize);
    for row in rect.row..rect.row + rect.height {
        out.queue(cursor::MoveTo(rect.col, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, viewport: &Viewport) -> std::io::Result<()> {
    let w = viewport.term_width as usize;
    let h = viewport.term_height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(viewport.term_width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, viewport: &Viewport) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(Print(clip(TITLE, viewport.term_width.saturating_sub(1))))?;

    let remaining = format!("Invaders: {:>2}", state.formation.alive_count());
    let rx = viewport
        .term_width
        .saturating_sub(remaining.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(Print(clip(&remaining, viewport.term_width.saturating_sub(rx))))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, viewport: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, viewport.term_height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(clip(CONTROLS_HINT, viewport.term_width.saturating_sub(1))))?;
    Ok(())
}

/// First `max` characters of `text`, so a line never wraps.
fn clip(text: &str, max: u16) -> &str {
    match text.char_indices().nth(max as usize) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

// ── Start / restart overlay ───────────────────────────────────────────────────

fn draw_overlay<W: Write>(out: &mut W, overlay: &Overlay, viewport: &Viewport) -> std::io::Result<()> {
    let button = format!("[Enter] {}   [Q] Quit", overlay.button_label);
    let inner = overlay
        .message
        .chars()
        .count()
        .max(button.chars().count())
        + 4;

    let lines = [
        format!("╔{}╗", "═".repeat(inner)),
        format!("║{:^inner$}║", overlay.message),
        format!("║{:^inner$}║", ""),
        format!("║{:^inner$}║", button),
        format!("╚{}╝", "═".repeat(inner)),
    ];

    let cx = viewport.term_width / 2;
    let start_row = (viewport.term_height / 2).saturating_sub(lines.len() as u16 / 2);

    out.queue(style::SetForegroundColor(C_OVERLAY))?;
    for (i, line) in lines.iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        let room = viewport.term_width.saturating_sub(col);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(clip(line, room)))?;
    }
    Ok(())
}
