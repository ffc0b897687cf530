// What you SEE now:
// • A white canvas. Hold Left Mouse and draw; your stroke is recorded with timestamps.
// • F switches to freehand, G to follow mode (a gray reference spiral appears).
// • C clears, E exports the drawing as CSV, P saves X/Y-over-time charts as PNG.
// • ESC quits.

use chrono::Utc;
use clap::Parser;
use log::{error, info, warn};
use spiral_trace::draw::{draw_hud_text, Canvas, Drawer};
use spiral_trace::error::Error;
use spiral_trace::export::DirectorySink;
use spiral_trace::plot::PngPlotter;
use spiral_trace::types::FrameBuffer;
use spiral_trace::{Config, Mode, Session};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "spiral-trace")]
#[command(about = "Record hand-drawn spirals with timestamps", long_about = None)]
struct Cli {
    /// Config file path (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where exported CSV files and charts are written
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Mode to start in (freehand or follow)
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }
    config.validate()?;

    let (w, h) = (config.canvas.width, config.canvas.height);
    let mut drawer = Drawer::new("Spiral Test", w, h)?;

    /* --- Session: canvas, recorder, template, chart output ---
       Visual: the canvas starts blank in freehand mode. */
    let canvas = Canvas::new(w, h, config.canvas.background);
    let plotter = PngPlotter::new(DirectorySink::new(&config.output.dir), config.plot.width, config.plot.height);
    let mut session = Session::new(&config, canvas, plotter);
    if let Some(mode) = cli.mode {
        session.set_mode(mode);
    }
    let mut csv_sink = DirectorySink::new(&config.output.dir);

    /* --- Reusable screen buffer ---
       Visual: canvas + HUD, this is the image you actually see each frame. */
    let mut screen = FrameBuffer::new(w, h, config.canvas.background);

    let clock = Instant::now();
    let mut was_down = false;
    let mut last_pos = None;
    info!("Spiral Test initialized at {}. Writing files to {}.", Utc::now().to_rfc2822(), config.output.dir.display());

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now_ms = clock.elapsed().as_secs_f64() * 1000.0;

        /* 1) Discrete actions */
        if drawer.freehand_pressed_once() { session.set_mode(Mode::Freehand); }
        if drawer.follow_pressed_once() { session.set_mode(Mode::Follow); }
        if drawer.clear_pressed_once() { session.clear(); }
        if drawer.export_pressed_once() {
            // EmptyGesture is already reported as a warning by the session
            if let Err(e) = session.export(&mut csv_sink, Utc::now()) {
                if !matches!(e, Error::EmptyGesture) { error!("Export failed: {e}"); }
            }
        }
        if drawer.plots_pressed_once() {
            if let Err(e) = session.visualize(Utc::now()) {
                if !matches!(e, Error::EmptyGesture) { error!("Plotting failed: {e}"); }
            }
        }

        /* 2) Pointer: press starts a gesture, moves extend it, release or leaving ends it */
        let down = drawer.left_mouse_down();
        let pos = drawer.mouse_pos();
        match (down, pos) {
            (true, Some(p)) if !was_down => session.pointer_down(p, now_ms),
            (true, Some(p)) if session.is_drawing() && last_pos != Some(p) => session.pointer_move(p, now_ms),
            (true, None) | (false, _) if session.is_drawing() => session.pointer_up(),
            _ => {}
        }
        was_down = down;
        last_pos = pos;

        /* 3) Compose: canvas underneath, HUD on top */
        screen.pixels.copy_from_slice(&session.surface().frame().pixels);
        let mode_tag = match session.mode() {
            Mode::Freehand => "FREEHAND",
            Mode::Follow => "FOLLOW",
        };
        let hud = format!("{} | PTS: {}", mode_tag, session.gesture().len());
        draw_hud_text(&mut screen, 8, 8, &hud, 0x00_FF_CC_33);
        draw_hud_text(&mut screen, 8, h as i32 - 16, "F: FREEHAND  G: FOLLOW  C: CLEAR  E: EXPORT  P: PLOTS", 0x00_FF_FF_FF);

        /* 4) Present to the window */
        drawer.present(&screen)?;
    }

    if session.is_drawing() {
        session.pointer_up();
    }
    if !session.gesture().is_empty() {
        warn!("Exiting with {} unexported points.", session.gesture().len());
    }
    Ok(())
}
