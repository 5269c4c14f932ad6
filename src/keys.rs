//! Terminal key bindings.
//!
//! Translates crossterm key events into game commands.  Two classes of
//! terminal are handled:
//! * **Keyboard-enhancement capable** (kitty protocol): real `Press` /
//!   `Repeat` / `Release` events.
//! * **Classic terminals**: only `Press` events, with OS key-repeat showing
//!   up as repeated presses.  A key counts as released once it has been
//!   silent for its hold window.

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::input::Control;

/// A movement key is still "held" if it was seen within this long.  OS
/// key-repeat runs at 15 Hz or more once it has started.
pub const HOLD_WINDOW: Duration = Duration::from_millis(135);

/// Hold window for fire.  Must outlast the OS initial repeat delay
/// (250–500 ms on common setups) or a held Space re-arms the latch before
/// its first repeat arrives.
pub const FIRE_HOLD_WINDOW: Duration = Duration::from_millis(650);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Press(Control),
    Release(Control),
    Start,
    Quit,
}

/// ← / A move left, → / D move right, Space fires.
pub fn control_for(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Control::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Control::Right),
        KeyCode::Char(' ') => Some(Control::Fire),
        _ => None,
    }
}

fn is_quit(event: &KeyEvent) -> bool {
    match event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => event.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// `window` expressed in frames of `frame_ms` each, at least one.
pub fn hold_window_frames(window: Duration, frame_ms: u64) -> u64 {
    (window.as_millis() as u64 / frame_ms.max(1)).max(1)
}

#[derive(Debug)]
pub struct HeldKeys {
    /// Frame each held control was last pressed or repeated.
    last_seen: HashMap<Control, u64>,
    move_window: u64,
    fire_window: u64,
    /// Set once the terminal has sent a genuine release; expiry is then off.
    reports_releases: bool,
}

impl HeldKeys {
    /// Windows are in frames.
    pub fn new(move_window: u64, fire_window: u64) -> Self {
        HeldKeys {
            last_seen: HashMap::new(),
            move_window,
            fire_window,
            reports_releases: false,
        }
    }

    /// Windows derived from `HOLD_WINDOW` and `FIRE_HOLD_WINDOW`.
    pub fn for_frame_ms(frame_ms: u64) -> Self {
        HeldKeys::new(
            hold_window_frames(HOLD_WINDOW, frame_ms),
            hold_window_frames(FIRE_HOLD_WINDOW, frame_ms),
        )
    }

    fn window_for(&self, control: Control) -> u64 {
        match control {
            Control::Fire => self.fire_window,
            Control::Left | Control::Right => self.move_window,
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.last_seen.contains_key(&control)
    }

    /// Translate one event observed during `frame`.
    pub fn on_key(&mut self, event: &KeyEvent, frame: u64) -> Option<Command> {
        match event.kind {
            KeyEventKind::Press => {
                if is_quit(event) {
                    return Some(Command::Quit);
                }
                if event.code == KeyCode::Enter {
                    return Some(Command::Start);
                }
                let control = control_for(event.code)?;
                // Classic terminals report auto-repeat as another press.
                match self.last_seen.insert(control, frame) {
                    Some(_) => None,
                    None => Some(Command::Press(control)),
                }
            }
            KeyEventKind::Repeat => {
                let control = control_for(event.code)?;
                if let Some(last) = self.last_seen.get_mut(&control) {
                    *last = frame;
                }
                None
            }
            KeyEventKind::Release => {
                let control = control_for(event.code)?;
                self.reports_releases = true;
                self.last_seen
                    .remove(&control)
                    .map(|_| Command::Release(control))
            }
        }
    }

    /// Releases for controls that have gone silent longer than their hold
    /// window.  Empty once the terminal is known to report releases.
    pub fn expire(&mut self, frame: u64) -> Vec<Command> {
        if self.reports_releases {
            return Vec::new();
        }
        let mut expired: Vec<Control> = self
            .last_seen
            .iter()
            .filter(|&(&control, &last)| frame.saturating_sub(last) > self.window_for(control))
            .map(|(&control, _)| control)
            .collect();
        // HashMap order is arbitrary; keep the output stable.
        expired.sort_by_key(|c| *c as u8);
        for control in &expired {
            self.last_seen.remove(control);
        }
        expired.into_iter().map(Command::Release).collect()
    }
}
