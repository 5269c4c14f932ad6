//! Session lifecycle: Idle → Running → Ended → Running …
//!
//! The controller owns the entity state and the input flags for the whole
//! program run.  It never talks to the terminal; the overlay it maintains is
//! read by the renderer.

use tracing::info;

use crate::compute::{init_state, tick};
use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus, Outcome};
use crate::input::{Control, InputState};

pub const TITLE: &str = "SPACE INVADERS";
pub const START_LABEL: &str = "Start";
pub const RESTART_LABEL: &str = "Play Again";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Ended(Outcome),
}

/// The start/restart box drawn over the field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlay {
    pub visible: bool,
    pub message: String,
    pub button_label: String,
}

impl Overlay {
    fn show(&mut self, message: &str, button_label: &str) {
        self.visible = true;
        self.message = message.to_string();
        self.button_label = button_label.to_string();
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}

#[derive(Debug)]
pub struct GameController {
    config: GameConfig,
    state: GameState,
    input: InputState,
    phase: Phase,
    overlay: Overlay,
}

impl GameController {
    /// Validates `config` up front; a bad grid never reaches the tick loop.
    pub fn new(config: GameConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(GameController {
            config,
            state: init_state(config),
            input: InputState::new(),
            phase: Phase::Idle,
            overlay: Overlay {
                visible: true,
                message: TITLE.to_string(),
                button_label: START_LABEL.to_string(),
            },
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The start/restart trigger.  Ignored while a session is running, since
    /// the button is only reachable through the overlay.
    pub fn start(&mut self) {
        if self.phase == Phase::Running {
            return;
        }
        self.state = init_state(self.config);
        self.input.discard_pending_fire();
        self.overlay.hide();
        self.phase = Phase::Running;
        info!(
            invaders = self.state.formation.alive_count(),
            "session started"
        );
    }

    pub fn press(&mut self, control: Control) {
        // Shots only count while playing; a press on the overlay leaves the
        // latch armed.
        if control == Control::Fire && self.phase != Phase::Running {
            return;
        }
        self.input.press(control);
    }

    pub fn release(&mut self, control: Control) {
        self.input.release(control);
    }

    /// Run one tick if a session is active.  Returns whether another tick
    /// should be scheduled.
    pub fn frame(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }

        let input = self.input.take_tick_input();
        self.state = tick(&self.state, &input);

        match self.state.status {
            GameStatus::Playing => true,
            GameStatus::Over(outcome) => {
                self.end(outcome);
                false
            }
        }
    }

    fn end(&mut self, outcome: Outcome) {
        self.phase = Phase::Ended(outcome);
        self.overlay.show(outcome.message(), RESTART_LABEL);
        info!(
            ?outcome,
            frame = self.state.frame,
            remaining = self.state.formation.alive_count(),
            "session ended"
        );
    }
}
