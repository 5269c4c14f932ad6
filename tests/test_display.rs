use space_invaders::compute::init_state;
use space_invaders::config::GameConfig;
use space_invaders::controller::{GameController, Overlay};
use space_invaders::display::*;

fn viewport(width: u16, height: u16) -> Viewport {
    Viewport::new(width, height, &init_state(GameConfig::default()))
}

fn render_to_string(c: &GameController, width: u16, height: u16) -> String {
    let mut out: Vec<u8> = Vec::new();
    let vp = Viewport::new(width, height, c.state());
    render(&mut out, c.state(), c.overlay(), &vp).unwrap();
    String::from_utf8_lossy(&out).into_owned()
}

// ── Viewport ──────────────────────────────────────────────────────────────────

#[test]
fn interior_excludes_border_hud_and_hint() {
    let vp = viewport(82, 24);
    assert_eq!(vp.interior_width(), 80);
    assert_eq!(vp.interior_height(), 20);
}

#[test]
fn whole_field_maps_to_whole_interior() {
    let vp = viewport(82, 24);
    assert_eq!(
        vp.project(0, 0, 800, 600),
        Some(CellRect { col: 1, row: 2, width: 80, height: 20 })
    );
}

#[test]
fn player_projection() {
    let vp = viewport(82, 24);
    // x 380..420 → cells 38..42, y 570..590 → row 19
    assert_eq!(
        vp.project(380, 570, 40, 20),
        Some(CellRect { col: 39, row: 21, width: 4, height: 1 })
    );
}

#[test]
fn small_entities_cover_at_least_one_cell() {
    let vp = viewport(82, 24);
    let rect = vp.project(398, 300, 4, 10).unwrap();
    assert_eq!(rect.width, 1);
    assert_eq!(rect.height, 1);
}

#[test]
fn projection_is_clipped_to_the_interior() {
    let vp = viewport(82, 24);
    // Nudged one unit past the left wall
    assert_eq!(
        vp.project(-1, 30, 30, 20),
        Some(CellRect { col: 1, row: 3, width: 2, height: 1 })
    );
    assert_eq!(vp.project(900, 30, 30, 20), None);
    assert_eq!(vp.project(30, -100, 30, 20), None);
}

#[test]
fn tiny_terminal_projects_nothing() {
    let vp = viewport(2, 4);
    assert_eq!(vp.project(0, 0, 800, 600), None);
}

// ── render ────────────────────────────────────────────────────────────────────

#[test]
fn idle_frame_shows_start_overlay() {
    let c = GameController::new(GameConfig::default()).unwrap();
    let text = render_to_string(&c, 82, 24);
    assert!(text.contains("SPACE INVADERS"));
    assert!(text.contains("[Enter] Start"));
    assert!(text.contains("Invaders: 50"));
}

#[test]
fn running_frame_hides_overlay() {
    let mut c = GameController::new(GameConfig::default()).unwrap();
    c.start();
    c.frame();
    let text = render_to_string(&c, 82, 24);
    assert!(!text.contains("[Enter]"));
    assert!(text.contains("█"));
}

#[test]
fn ended_frame_shows_outcome_and_restart_label() {
    let cfg = GameConfig {
        field_width: 100,
        field_height: 100,
        invader_rows: 1,
        invader_cols: 1,
        ..GameConfig::default()
    };
    let mut c = GameController::new(cfg).unwrap();
    c.start();
    while c.frame() {}
    let text = render_to_string(&c, 82, 24);
    assert!(text.contains("You Lose!"));
    assert!(text.contains("[Enter] Play Again"));
}

#[test]
fn render_survives_a_degenerate_terminal() {
    let state = init_state(GameConfig::default());
    let overlay = Overlay {
        visible: true,
        message: "You Win!".to_string(),
        button_label: "Play Again".to_string(),
    };
    let mut out: Vec<u8> = Vec::new();
    render(&mut out, &state, &overlay, &Viewport::new(0, 0, &state)).unwrap();
}

#[test]
fn controls_hint_is_clipped_to_narrow_terminals() {
    let mut c = GameController::new(GameConfig::default()).unwrap();
    c.start();
    let text = render_to_string(&c, 20, 24);
    assert!(text.contains("← → / A D : Move"));
    assert!(!text.contains("SPACE : Shoot"));

    let wide = render_to_string(&c, 120, 24);
    assert!(wide.contains("SPACE : Shoot   ENTER : Start   Q : Quit"));
}

#[test]
fn overlay_is_clipped_to_narrow_terminals() {
    let c = GameController::new(GameConfig::default()).unwrap();
    let text = render_to_string(&c, 12, 24);
    assert!(!text.contains("[Q] Quit"));
}
