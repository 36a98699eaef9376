use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use glam::UVec2;
use tracing::{debug, info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use tilerunner::constants::{LOOP_TIME, TILE_SIZE};
use tilerunner::context::GameContext;
use tilerunner::formatter::FrameFormatter;
use tilerunner::game::{format_score, Assets, Game};
use tilerunner::texture::sprite::{AtlasConfig, SpriteAtlas};

/// Runs a level headlessly and writes the last frame as a PNG.
#[derive(Parser, Debug)]
#[command(name = "tilerunner", version)]
struct Args {
    /// level source file
    level: PathBuf,

    /// tile atlas PNG
    tiles: PathBuf,

    /// entity atlas PNG
    sprites: PathBuf,

    /// where to write the final frame
    #[arg(short, long, default_value = "frame.png")]
    output: PathBuf,

    /// glyph atlas PNG for end-of-level messages
    #[arg(long)]
    font: Option<PathBuf>,

    /// glyph cell size in unzoomed pixels
    #[arg(long, default_value_t = 8)]
    font_cell: u32,

    /// integer zoom applied to every atlas
    #[arg(long, default_value_t = 2)]
    zoom: u32,

    /// number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// the atlases are already scaled by --zoom
    #[arg(long, default_value_t = false)]
    prescaled: bool,

    /// darken everything outside light sources
    #[arg(long, default_value_t = false)]
    dark: bool,

    /// viewport as WIDTHxHEIGHT in world pixels
    #[arg(long, value_parser = parse_viewport)]
    viewport: Option<UVec2>,

    /// key names held down for the whole run, e.g. VK_RIGHT
    #[arg(long = "hold")]
    held: Vec<String>,

    /// pace ticks at the fixed loop rate instead of running flat out
    #[arg(long, default_value_t = false)]
    realtime: bool,
}

fn parse_viewport(s: &str) -> Result<UVec2, String> {
    let (w, h) = s.split_once(['x', 'X']).ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    if w == 0 || h == 0 {
        return Err("viewport must not be empty".to_string());
    }
    Ok(UVec2::new(w, h))
}

fn load_atlas(path: &PathBuf, config: AtlasConfig) -> Result<SpriteAtlas> {
    let bytes = std::fs::read(path).with_context(|| format!("Could not read {}", path.display()))?;
    SpriteAtlas::decode(&bytes, config).with_context(|| format!("Could not build atlas from {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(FrameFormatter))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(ErrorLayer::default())
        .try_init()
        .context("Could not set global tracing subscriber")?;

    let mut ctx = GameContext::default().with_zoom(args.zoom).with_darkness(args.dark);
    if let Some(viewport) = args.viewport {
        ctx = ctx.with_viewport(viewport);
    }

    let cell = UVec2::splat(TILE_SIZE);
    let assets = Assets {
        tiles: load_atlas(&args.tiles, AtlasConfig::new(cell, ctx.zoom).prescaled(args.prescaled))?,
        sprites: load_atlas(&args.sprites, AtlasConfig::new(cell, ctx.zoom).prescaled(args.prescaled))?,
        font: args
            .font
            .as_ref()
            .map(|path| load_atlas(path, AtlasConfig::new(UVec2::splat(args.font_cell), ctx.zoom).prescaled(args.prescaled)))
            .transpose()?,
    };

    let source =
        std::fs::read_to_string(&args.level).with_context(|| format!("Could not read level {}", args.level.display()))?;
    let mut game = Game::new(ctx, assets);
    game.load_level(&source).context("Could not load level")?;

    for name in &args.held {
        if !game.key_event(name, true) {
            bail!("Unknown key name {name:?}");
        }
    }

    info!(frames = args.frames, "Starting game loop ({:.3}ms)", LOOP_TIME.as_secs_f32() * 1000.0);
    let dt = LOOP_TIME.as_secs_f32();
    let started = Instant::now();
    for _ in 0..args.frames {
        let start = Instant::now();
        game.update(dt);
        for event in game.drain_events() {
            debug!(?event, "Game event");
        }

        if args.realtime {
            let elapsed = start.elapsed();
            if elapsed < LOOP_TIME {
                spin_sleep::sleep(LOOP_TIME - elapsed);
            } else {
                warn!("Game loop behind schedule by: {:?}", elapsed - LOOP_TIME);
            }
        }
    }

    let frame = game.render().context("No level loaded")?;
    frame
        .save(&args.output)
        .with_context(|| format!("Could not write {}", args.output.display()))?;

    info!(
        elapsed = ?started.elapsed(),
        state = ?game.state(),
        score = %format_score(game.score()),
        coins = game.coins(),
        alive = game.player_alive(),
        output = %args.output.display(),
        "Run finished"
    );
    Ok(())
}
