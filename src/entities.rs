//! All game entity types — pure data, no game logic.

use crate::config::GameConfig;

/// Horizontal direction shared by every invader in the formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    pub fn sign(self) -> i32 {
        match self {
            Heading::Left => -1,
            Heading::Right => 1,
        }
    }

    pub fn flipped(self) -> Heading {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Won => "You Win!",
            Outcome::Lost => "You Lose!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Over(Outcome),
}

// ── Player & projectiles ──────────────────────────────────────────────────────

/// Top-left corner of the player's ship.  `y` never changes during a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
}

/// Top-left corner of a player bullet.  Bullets only travel upward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bullet {
    pub x: i32,
    pub y: i32,
}

// ── Formation ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Invader {
    pub x: i32,
    pub y: i32,
    pub alive: bool,
}

/// The invader grid.  Slots are stored row-major and are never added or
/// removed after construction, only marked dead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formation {
    pub rows: usize,
    pub cols: usize,
    pub slots: Vec<Invader>,
    pub heading: Heading,
}

impl Formation {
    /// Full grid, every slot alive, heading right.
    pub fn new(config: &GameConfig) -> Formation {
        let mut slots = Vec::with_capacity(config.invader_rows * config.invader_cols);
        for r in 0..config.invader_rows as i32 {
            for c in 0..config.invader_cols as i32 {
                slots.push(Invader {
                    x: config.invader_offset_left
                        + c * (config.invader_width + config.invader_padding),
                    y: config.invader_offset_top
                        + r * (config.invader_height + config.invader_padding),
                    alive: true,
                });
            }
        }
        Formation {
            rows: config.invader_rows,
            cols: config.invader_cols,
            slots,
            heading: Heading::Right,
        }
    }

    pub fn slot(&self, row: usize, col: usize) -> Option<&Invader> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.slots.get(row * self.cols + col)
    }

    pub fn alive(&self) -> impl Iterator<Item = &Invader> {
        self.slots.iter().filter(|inv| inv.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// One play session's entities.  Cloneable so the pure update functions in
/// `compute` can return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub config: GameConfig,
    pub player: Player,
    /// Active bullets, oldest first.
    pub bullets: Vec<Bullet>,
    pub formation: Formation,
    pub status: GameStatus,
    pub frame: u64,
}
