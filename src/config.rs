//! Game geometry, speeds and frame pacing.
//!
//! All distances are in field units (800×600 by default); the renderer
//! scales them onto the terminal.

use std::path::Path;

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

/// Upper bound on `invader_rows * invader_cols`.
pub const MAX_INVADERS: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field_width: i32,
    pub field_height: i32,

    pub player_width: i32,
    pub player_height: i32,
    /// Gap between the player's lower edge and the bottom of the field.
    pub player_bottom_margin: i32,
    pub player_speed: i32,

    pub bullet_width: i32,
    pub bullet_height: i32,
    pub bullet_speed: i32,

    pub invader_rows: usize,
    pub invader_cols: usize,
    pub invader_width: i32,
    pub invader_height: i32,
    pub invader_padding: i32,
    pub invader_offset_top: i32,
    pub invader_offset_left: i32,
    /// Horizontal step applied to the whole formation each tick.
    pub invader_speed: i32,
    /// Vertical step applied when the formation bounces off a wall.
    pub invader_drop: i32,

    /// Milliseconds between ticks.
    pub frame_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            field_width: 800,
            field_height: 600,
            player_width: 40,
            player_height: 20,
            player_bottom_margin: 10,
            player_speed: 5,
            bullet_width: 4,
            bullet_height: 10,
            bullet_speed: 7,
            invader_rows: 5,
            invader_cols: 10,
            invader_width: 30,
            invader_height: 20,
            invader_padding: 10,
            invader_offset_top: 30,
            invader_offset_left: 30,
            invader_speed: 1,
            invader_drop: 40,
            frame_ms: 16,
        }
    }
}

impl GameConfig {
    /// Read a JSON config file.  Missing keys fall back to the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Fixed row the player moves along.
    pub fn player_y(&self) -> i32 {
        self.field_height - self.player_height - self.player_bottom_margin
    }

    /// Left edge that centres the player horizontally.
    pub fn player_start_x(&self) -> i32 {
        self.field_width / 2 - self.player_width / 2
    }

    /// Largest x the player may occupy.
    pub fn player_max_x(&self) -> i32 {
        self.field_width - self.player_width
    }

    /// Combined width of one formation row, padding included between columns.
    /// `None` if it does not fit in an `i32`.
    pub fn formation_width(&self) -> Option<i32> {
        let cols = i32::try_from(self.invader_cols).ok()?;
        cols.checked_mul(self.invader_width.checked_add(self.invader_padding)?)?
            .checked_sub(self.invader_padding)
    }

    /// Lower edge of the bottom formation row at game start.  `None` if it
    /// does not fit in an `i32`.
    pub fn formation_bottom(&self) -> Option<i32> {
        let rows = i32::try_from(self.invader_rows).ok()?;
        rows.checked_mul(self.invader_height.checked_add(self.invader_padding)?)?
            .checked_sub(self.invader_padding)?
            .checked_add(self.invader_offset_top)
    }

    /// Reject configurations that cannot produce a playable session.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.field_width > 0 && self.field_height > 0,
            "field must have a positive size, got {}x{}",
            self.field_width,
            self.field_height
        );
        ensure!(
            self.invader_rows > 0 && self.invader_cols > 0,
            "invader grid must have at least one row and column, got {}x{}",
            self.invader_rows,
            self.invader_cols
        );
        ensure!(
            self.player_width > 0 && self.player_height > 0,
            "player must have a positive size"
        );
        ensure!(
            self.bullet_width > 0 && self.bullet_height > 0,
            "bullets must have a positive size"
        );
        ensure!(
            self.invader_width > 0 && self.invader_height > 0,
            "invaders must have a positive size"
        );
        ensure!(
            self.player_speed > 0 && self.bullet_speed > 0 && self.invader_speed > 0,
            "speeds must be positive"
        );
        ensure!(self.invader_drop > 0, "invader_drop must be positive");
        ensure!(
            self.invader_padding >= 0 && self.invader_offset_left >= 0 && self.invader_offset_top >= 0,
            "invader padding and offsets must not be negative"
        );
        ensure!(
            self.player_bottom_margin >= 0 && self.player_y() >= 0,
            "player does not fit vertically in a field of height {}",
            self.field_height
        );
        ensure!(
            self.player_width <= self.field_width,
            "player width {} exceeds field width {}",
            self.player_width,
            self.field_width
        );
        ensure!(
            self.player_speed <= self.field_width
                && self.invader_speed <= self.field_width
                && self.bullet_speed <= self.field_height
                && self.invader_drop <= self.field_height,
            "speeds must not exceed the field size"
        );

        self.invader_rows
            .checked_mul(self.invader_cols)
            .filter(|&n| n <= MAX_INVADERS)
            .with_context(|| {
                format!(
                    "invader grid {}x{} exceeds {} slots",
                    self.invader_rows, self.invader_cols, MAX_INVADERS
                )
            })?;

        let width = self
            .formation_width()
            .context("formation width overflows")?;
        let right = self
            .invader_offset_left
            .checked_add(width)
            .context("formation right edge overflows")?;
        ensure!(
            right <= self.field_width,
            "formation ({} wide at offset {}) does not fit in field width {}",
            width,
            self.invader_offset_left,
            self.field_width
        );

        let bottom = self
            .formation_bottom()
            .context("formation bottom overflows")?;
        ensure!(
            bottom < self.player_y(),
            "formation bottom {} already reaches the player row {}",
            bottom,
            self.player_y()
        );
        ensure!(self.frame_ms > 0, "frame_ms must be positive");
        Ok(())
    }
}
