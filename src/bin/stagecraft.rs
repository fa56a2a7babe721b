use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use stagecraft::{
    Director, HeadlessSurface, ManualClock, ManualFrameScheduler, Performer, RenderSurface, Size,
    StageFixture,
};

#[derive(Parser, Debug)]
#[command(name = "stagecraft", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seek to one or more times and print the visible performers.
    Inspect(InspectArgs),
    /// Play the fixture headlessly and print visibility changes.
    Play(PlayArgs),
    /// Resize the canvas and print the remapped performer bounds.
    Resize(ResizeArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input stage fixture JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Project time in ms; repeat for several times.
    #[arg(long = "at", required = true)]
    at: Vec<f64>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input stage fixture JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Simulated display refresh rate.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,
}

#[derive(Parser, Debug)]
struct ResizeArgs {
    /// Input stage fixture JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// New canvas width in pixels.
    #[arg(long)]
    width: f64,

    /// New canvas height in pixels.
    #[arg(long)]
    height: f64,

    /// Resize the surface only, leaving performers where they are.
    #[arg(long, default_value_t = false)]
    no_adapt: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Play(args) => cmd_play(args),
        Command::Resize(args) => cmd_resize(args),
    }
}

fn load_director(
    in_path: &std::path::Path,
    clock: Option<ManualClock>,
) -> anyhow::Result<(Director, ManualFrameScheduler)> {
    let fixture = StageFixture::from_path(in_path)
        .with_context(|| format!("load fixture '{}'", in_path.display()))?;
    let canvas = fixture.canvas;
    let performers = fixture.into_performers()?;

    let frames = ManualFrameScheduler::new();
    let mut director = Director::new(
        Box::new(HeadlessSurface::new(canvas)),
        Box::new(frames.clone()),
    );
    if let Some(clock) = clock {
        director = director.with_clock(Box::new(clock));
    }
    pollster::block_on(async {
        director.ready().await?;
        for performer in performers {
            director.hire(Box::new(performer)).await?;
        }
        director.flush_loads().await;
        Ok::<_, stagecraft::StagecraftError>(())
    })?;
    Ok((director, frames))
}

fn visible_json(director: &Director) -> Vec<serde_json::Value> {
    director
        .visible_ids()
        .iter()
        .filter_map(|id| director.performer(id))
        .map(|p| {
            serde_json::json!({
                "id": p.id(),
                "kind": p.kind(),
                "zIndex": p.z_index(),
                "transform": p.rendered_transform(),
            })
        })
        .collect()
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let (mut director, _) = load_director(&args.in_path, None)?;
    for at in args.at {
        let outcome = pollster::block_on(director.seek(at))
            .with_context(|| format!("seek to {at}ms"))?;
        // performers entering their window for the first time are still loading
        let late = pollster::block_on(director.flush_loads());
        let failed: Vec<_> = outcome
            .failed
            .iter()
            .chain(late.failed.iter())
            .map(|(id, err)| serde_json::json!({ "id": id, "error": err.to_string() }))
            .collect();
        let line = serde_json::json!({
            "time": outcome.time,
            "visible": visible_json(&director),
            "failed": failed,
        });
        println!("{line}");
    }
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be finite and > 0");
    }
    let clock = ManualClock::new();
    let (mut director, frames) = load_director(&args.in_path, Some(clock.clone()))?;
    let frame_ms = 1000.0 / args.fps;

    let mut last: Option<Vec<String>> = None;
    director.play();
    loop {
        let mut visible = director.visible_ids();
        visible.sort();
        if last.as_ref() != Some(&visible) {
            let line = serde_json::json!({
                "time": director.current_time(),
                "visible": &visible,
            });
            println!("{line}");
            last = Some(visible);
        }
        if frames.take_pending().is_none() {
            break;
        }
        clock.advance(frame_ms);
        director.on_frame();
    }
    eprintln!("ended at {}ms", director.current_time());
    Ok(())
}

fn cmd_resize(args: ResizeArgs) -> anyhow::Result<()> {
    let (mut director, _) = load_director(&args.in_path, None)?;
    director
        .resize_canvas(Size::new(args.width, args.height), !args.no_adapt)
        .with_context(|| format!("resize canvas to {}x{}", args.width, args.height))?;

    let performers: Vec<_> = director
        .theater()
        .iter()
        .map(|p| serde_json::json!({ "id": p.id(), "bounds": p.base_bounds() }))
        .collect();
    let out = serde_json::json!({
        "canvas": director.stage().surface().size(),
        "performers": performers,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&out).context("serialize resize output")?
    );
    Ok(())
}
