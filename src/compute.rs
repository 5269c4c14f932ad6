//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (or one of its parts) and returns a brand-new value.  Nothing
//! here touches the terminal or the clock.

use tracing::{debug, trace};

use crate::config::GameConfig;
use crate::entities::{Bullet, Formation, GameState, GameStatus, Invader, Outcome, Player};
use crate::input::TickInput;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the session-start state: player centred, no bullets, full grid.
///
/// `config` is expected to have passed `GameConfig::validate`.
pub fn init_state(config: GameConfig) -> GameState {
    GameState {
        player: Player {
            x: config.player_start_x(),
            y: config.player_y(),
        },
        bullets: Vec::new(),
        formation: Formation::new(&config),
        status: GameStatus::Playing,
        frame: 0,
        config,
    }
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// Apply the held direction flags, keeping the ship inside the field.
pub fn move_player(player: &Player, input: &TickInput, config: &GameConfig) -> Player {
    let mut x = player.x;
    if input.right && x < config.player_max_x() {
        x += config.player_speed;
    }
    if input.left && x > 0 {
        x -= config.player_speed;
    }
    Player {
        x: x.clamp(0, config.player_max_x()),
        ..*player
    }
}

/// Fire a bullet from the horizontal centre of the player's ship.
pub fn player_shoot(state: &GameState) -> GameState {
    let cfg = &state.config;
    let mut bullets = state.bullets.clone();
    bullets.push(Bullet {
        x: state.player.x + cfg.player_width / 2 - cfg.bullet_width / 2,
        y: state.player.y,
    });
    GameState {
        bullets,
        ..state.clone()
    }
}

// ── Per-tick pieces ──────────────────────────────────────────────────────────

/// Move every bullet up and drop the ones that left the top of the field.
pub fn advance_bullets(bullets: &[Bullet], config: &GameConfig) -> Vec<Bullet> {
    bullets
        .iter()
        .map(|b| Bullet {
            y: b.y - config.bullet_speed,
            ..*b
        })
        .filter(|b| b.y >= 0)
        .collect()
}

/// True when some live invader's leading edge is at or past the wall it is
/// heading towards.
pub fn formation_at_edge(formation: &Formation, config: &GameConfig) -> bool {
    let sign = formation.heading.sign();
    formation.alive().any(|inv| {
        if sign > 0 {
            inv.x + config.invader_width >= config.field_width
        } else {
            inv.x <= 0
        }
    })
}

/// Move the formation one step.  At a wall every live invader drops by
/// `invader_drop`, still nudges along the current heading, and the heading
/// flips for the following ticks.
pub fn advance_formation(formation: &Formation, config: &GameConfig) -> Formation {
    let descend = formation_at_edge(formation, config);
    let dx = formation.heading.sign() * config.invader_speed;
    let dy = if descend { config.invader_drop } else { 0 };

    let slots = formation
        .slots
        .iter()
        .map(|inv| {
            if inv.alive {
                Invader {
                    x: inv.x + dx,
                    y: inv.y + dy,
                    ..*inv
                }
            } else {
                *inv
            }
        })
        .collect();

    let heading = if descend {
        debug!(heading = ?formation.heading.flipped(), "formation reached a wall, descending");
        formation.heading.flipped()
    } else {
        formation.heading
    };

    Formation {
        slots,
        heading,
        ..formation.clone()
    }
}

/// True when a live invader's lower edge has reached the player's row.
pub fn formation_reached_player(formation: &Formation, player: &Player, config: &GameConfig) -> bool {
    formation
        .alive()
        .any(|inv| inv.y + config.invader_height >= player.y)
}

/// Strict containment of the bullet's corner point inside the invader's
/// rectangle.  Touching an edge is not a hit.
pub fn bullet_hits_invader(bullet: &Bullet, invader: &Invader, config: &GameConfig) -> bool {
    bullet.x > invader.x
        && bullet.x < invader.x + config.invader_width
        && bullet.y > invader.y
        && bullet.y < invader.y + config.invader_height
}

/// First (bullet index, slot index) pair that collides, scanning bullets in
/// order and slots row-major.  Dead slots never match.
pub fn find_hit(bullets: &[Bullet], formation: &Formation, config: &GameConfig) -> Option<(usize, usize)> {
    bullets.iter().enumerate().find_map(|(bi, bullet)| {
        formation
            .slots
            .iter()
            .position(|inv| inv.alive && bullet_hits_invader(bullet, inv, config))
            .map(|si| (bi, si))
    })
}

/// Resolve at most one collision: destroy the invader and remove the bullet.
pub fn resolve_collision(
    bullets: &[Bullet],
    formation: &Formation,
    config: &GameConfig,
) -> (Vec<Bullet>, Formation) {
    let Some((bi, si)) = find_hit(bullets, formation, config) else {
        return (bullets.to_vec(), formation.clone());
    };

    debug!(
        row = si / formation.cols,
        col = si % formation.cols,
        "invader destroyed"
    );

    let mut bullets = bullets.to_vec();
    bullets.remove(bi);
    let mut formation = formation.clone();
    formation.slots[si].alive = false;
    (bullets, formation)
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  A finished session is returned
/// unchanged.
pub fn tick(state: &GameState, input: &TickInput) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }

    let frame = state.frame + 1;
    let cfg = state.config;

    // ── 1. Fire from the ship before it moves ────────────────────────────────
    let state = if input.fire {
        player_shoot(state)
    } else {
        state.clone()
    };

    // ── 2. Move player and bullets ───────────────────────────────────────────
    let player = move_player(&state.player, input, &cfg);
    let bullets = advance_bullets(&state.bullets, &cfg);

    // ── 3. Move the formation, then check whether it landed ─────────────────
    let formation = advance_formation(&state.formation, &cfg);
    if formation_reached_player(&formation, &player, &cfg) {
        return GameState {
            player,
            bullets,
            formation,
            status: GameStatus::Over(Outcome::Lost),
            frame,
            ..state
        };
    }

    // ── 4. One collision per tick ────────────────────────────────────────────
    let (bullets, formation) = resolve_collision(&bullets, &formation, &cfg);

    // ── 5. Win check ─────────────────────────────────────────────────────────
    let status = if formation.alive_count() == 0 {
        GameStatus::Over(Outcome::Won)
    } else {
        GameStatus::Playing
    };

    trace!(
        frame,
        player_x = player.x,
        bullets = bullets.len(),
        alive = formation.alive_count(),
        "tick"
    );

    GameState {
        player,
        bullets,
        formation,
        status,
        frame,
        ..state
    }
}
