//! Held-control flags and the one-shot fire latch.
//!
//! Knows nothing about keyboards or terminals; `keys` translates platform
//! events into `press` / `release` calls.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    Fire,
}

/// What a single tick gets to see.  Each honoured press sets `fire` for
/// exactly one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputState {
    left: bool,
    right: bool,
    /// Cleared when a press is honoured, re-armed on release.
    fire_ready: bool,
    /// Honoured presses not yet consumed, one per tick.
    fire_pending: u32,
}

impl Default for InputState {
    fn default() -> Self {
        InputState {
            left: false,
            right: false,
            fire_ready: true,
            fire_pending: 0,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control) {
        match control {
            Control::Left => self.left = true,
            Control::Right => self.right = true,
            Control::Fire => {
                if self.fire_ready {
                    self.fire_ready = false;
                    self.fire_pending += 1;
                }
            }
        }
    }

    pub fn release(&mut self, control: Control) {
        match control {
            Control::Left => self.left = false,
            Control::Right => self.right = false,
            Control::Fire => self.fire_ready = true,
        }
    }

    pub fn left(&self) -> bool {
        self.left
    }

    pub fn right(&self) -> bool {
        self.right
    }

    pub fn fire_ready(&self) -> bool {
        self.fire_ready
    }

    /// Drop a shot that was requested but never consumed.
    pub fn discard_pending_fire(&mut self) {
        self.fire_pending = 0;
    }

    /// Snapshot the flags for one tick, consuming at most one pending shot.
    pub fn take_tick_input(&mut self) -> TickInput {
        let fire = self.fire_pending > 0;
        if fire {
            self.fire_pending -= 1;
        }
        TickInput {
            left: self.left,
            right: self.right,
            fire,
        }
    }
}
