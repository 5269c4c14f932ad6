use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use space_invaders::config::GameConfig;
use space_invaders::controller::GameController;
use space_invaders::display::{self, Viewport};
use space_invaders::keys::{Command, HeldKeys};

#[derive(Parser)]
#[command(name = "space_invaders")]
#[command(about = "Shoot down the descending invader grid before it lands")]
struct Args {
    /// JSON file overriding the default field geometry and speeds
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write trace output here (the terminal itself is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Ticks per second; overrides `frame_ms` from the config
    #[arg(long)]
    fps: Option<u64>,
}

fn init_logging(log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(fps) = args.fps {
        anyhow::ensure!(fps > 0, "--fps must be positive");
        config.frame_ms = (1000 / fps).max(1);
    }
    config.validate()?;
    Ok(config)
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Drain input, tick, draw, sleep.  Ticks stop once a session ends but the
/// loop keeps reading input so Enter can restart.
fn game_loop<W: Write>(
    out: &mut W,
    controller: &mut GameController,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let frame_time = Duration::from_millis(controller.config().frame_ms);
    let mut held = HeldKeys::for_frame_ms(controller.config().frame_ms);
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Apply every pending event before this frame's tick ───────────────
        let mut commands = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if let Event::Key(key) = ev {
                commands.extend(held.on_key(&key, frame));
            }
        }
        commands.extend(held.expire(frame));

        for command in commands {
            match command {
                Command::Quit => return Ok(()),
                Command::Start => controller.start(),
                Command::Press(control) => controller.press(control),
                Command::Release(control) => controller.release(control),
            }
        }

        controller.frame();

        let (width, height) = terminal::size().context("reading terminal size")?;
        let viewport = Viewport::new(width, height, controller.state());
        display::render(out, controller.state(), controller.overlay(), &viewport)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let config = load_config(&args)?;
    let mut controller = GameController::new(config)?;
    info!(frame_ms = config.frame_ms, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // kitty-protocol terminals support this; others fall back to HeldKeys expiry.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(err) => {
                warn!(%err, "input thread stopped");
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut controller, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("exiting");
    result
}
