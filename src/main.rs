use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use skyline::config::SceneConfig;
use skyline::error::Result;
use skyline::pen::StrokeLog;
use skyline::projection::ProjectionMode;
use skyline::render::Canvas;
use skyline::runner::{RunState, Runner};
use skyline::scene::Scene;

#[derive(Debug, Parser)]
#[command(name = "skyline")]
#[command(version)]
#[command(about = "Draws a procedural skyline as a hidden-line wireframe.", long_about = None)]
struct Args {
    /// JSON scene configuration; flags below override its values.
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Seed for the random generator.
    #[arg(long, short)]
    seed: Option<u64>,
    /// Number of rows to draw.
    #[arg(long, short)]
    depth: Option<usize>,
    /// Buildings per row.
    #[arg(long, short = 'w')]
    row_width: Option<usize>,
    /// Projection; picked at random when neither this nor the config sets it.
    #[arg(long, short, value_enum)]
    projection: Option<ProjectionMode>,
    /// Shade camera-facing faces with hatching.
    #[arg(long)]
    hatch: bool,
    /// Hard cap on the number of steps.
    #[arg(long)]
    max_steps: Option<usize>,
    /// PNG output.
    #[arg(long, short, default_value = "skyline.png")]
    output: PathBuf,
    /// Also write the drawn strokes as JSON, for plotters.
    #[arg(long)]
    strokes: Option<PathBuf>,
    /// Ink opacity in [-1, 1]; negative draws white on black.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pen_opacity: f32,
    /// Animate the drawing in a window (needs the `preview` feature).
    #[arg(long)]
    preview: bool,
}

fn load_config(args: &Args) -> Result<SceneConfig> {
    let mut config = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    if let Some(row_width) = args.row_width {
        config.row_width = row_width;
    }
    if let Some(projection) = args.projection {
        config.camera.projection = Some(projection);
    }
    if args.hatch {
        config.hatching.enabled = true;
    }
    if let Some(max_steps) = args.max_steps {
        config.max_steps = max_steps;
    }

    config.validate()?;
    Ok(config)
}

type SkylineRunner = Runner<Scene<(Canvas, StrokeLog)>>;

fn build_runner(config: SceneConfig, pen_opacity: f32) -> Result<SkylineRunner> {
    let mut canvas = Canvas::default();
    canvas.set_pen_opacity(pen_opacity);
    let max_steps = config.max_steps;
    let scene = Scene::new(config, (canvas, StrokeLog::new()))?;
    Ok(Runner::new(scene).with_max_steps(max_steps))
}

#[cfg(feature = "preview")]
fn preview(runner: &mut SkylineRunner) -> Result<()> {
    use skyline::runner::FRAME_BUDGET;
    use skyline::window::{FrameLimiter, Window, WindowEvent, WINDOW_SIZE};

    let canvas_size = runner.walker().pen().0.size();
    let mut window = Window::new("skyline", WINDOW_SIZE, WINDOW_SIZE, canvas_size)?;
    let mut limiter = FrameLimiter::new();

    loop {
        if window.poll_events() == WindowEvent::Quit {
            runner.stop();
            return Ok(());
        }
        runner.run_for(FRAME_BUDGET);
        window.present(&runner.walker().pen().0)?;
        limiter.finish_frame();
    }
}

#[cfg(not(feature = "preview"))]
fn preview(runner: &mut SkylineRunner) -> Result<()> {
    log::warn!("built without the `preview` feature, rendering headless");
    runner.run();
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    log::info!(
        "drawing {} rows of {} buildings (seed {})",
        config.depth,
        config.row_width,
        config.seed
    );

    let mut runner = build_runner(config, args.pen_opacity)?;
    if args.preview {
        preview(&mut runner)?;
    } else {
        runner.run();
    }

    if runner.state() != RunState::Finished {
        runner.stop();
    }
    // Geometry committed before a failing step is still written out.
    let failure = runner.take_error();

    let scene = runner.into_walker();
    let stats = scene.stats();
    log::info!(
        "{} faces: {} drawn, {} occluded, {} back-facing, {} off screen; {} segments",
        stats.faces,
        stats.drawn,
        stats.occluded,
        stats.back_facing,
        stats.off_screen,
        stats.segments
    );

    let (canvas, strokes) = scene.into_pen();
    canvas.save_png(&args.output)?;
    if let Some(path) = &args.strokes {
        strokes.save_json(path)?;
        log::info!("wrote {} strokes to {}", strokes.strokes().len(), path.display());
    }
    failure.map_or(Ok(()), Err)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
