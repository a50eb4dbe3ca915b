//! # Corridor Engine
//!
//! Headless entry point for Project Corridor.
//!
//! Builds a chunked corridor world from `corridor.toml` plus `key=value`
//! overrides, spawns the actor in chunk (0, 0), replays a movement script
//! and prints text frames of the chunk the actor ends up in.
//!
//! ```text
//! corridor [--config PATH] [--save-config PATH] [--wheel DY] [--pan DX,DY]
//!          [--every-frame] [moves=wwddss] [key=value ...]
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod renderer;
mod session;

use anyhow::{bail, Context, Result};
use corridor_common::WorldCoord;
use corridor_gameplay::KeyCode;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EngineConfig;
use crate::session::WorldSession;

/// Parsed command line.
#[derive(Debug, Default)]
struct Args {
    config_path: Option<String>,
    save_config: Option<String>,
    moves: String,
    every_frame: bool,
    wheel: Option<f32>,
    pan: Option<(f32, f32)>,
    overrides: Vec<String>,
}

impl Args {
    fn parse(raw: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = Self::default();
        let mut iter = raw.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => {
                    args.config_path = Some(iter.next().context("--config needs a path")?);
                },
                "--save-config" => {
                    args.save_config = Some(iter.next().context("--save-config needs a path")?);
                },
                "--every-frame" => args.every_frame = true,
                "--wheel" => {
                    let raw = iter.next().context("--wheel needs a delta")?;
                    args.wheel = Some(raw.parse().with_context(|| format!("Bad wheel delta {raw}"))?);
                },
                "--pan" => {
                    let raw = iter.next().context("--pan needs DX,DY")?;
                    let (dx, dy) = raw.split_once(',').context("--pan needs DX,DY")?;
                    args.pan = Some((
                        dx.trim().parse().with_context(|| format!("Bad pan {raw}"))?,
                        dy.trim().parse().with_context(|| format!("Bad pan {raw}"))?,
                    ));
                },
                flag if flag.starts_with("--") => bail!("Unknown flag {flag}"),
                pair => match pair.split_once('=') {
                    Some(("moves", script)) => args.moves = script.to_string(),
                    _ => args.overrides.push(pair.to_string()),
                },
            }
        }
        Ok(args)
    }
}

fn print_frame(session: &mut WorldSession) -> Result<()> {
    let (frame, _) = session.render()?;
    let local = session.actor().local_position(session.store());
    let player = WorldCoord::new(i64::from(local.x), i64::from(local.y));
    println!("{}", renderer::render_text(&frame, Some(player)));
    println!(
        "{}",
        renderer::status_line(&frame, session.current_chunk(), session.store().loaded_count())
    );
    Ok(())
}

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("corridor=info".parse()?))
        .init();

    info!("Project Corridor starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse(std::env::args().skip(1))?;
    let mut config = match &args.config_path {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    for pair in &args.overrides {
        config.apply_override(pair)?;
    }
    config.validate();
    info!(
        "World: {}x{} chunks, {} regions per chunk",
        config.grid_width,
        config.grid_height,
        config.effective_region_count()
    );

    if let Some(path) = &args.save_config {
        config
            .save_to(path)
            .with_context(|| format!("Failed to save config to {path}"))?;
    }

    let mut session = WorldSession::new(&config)?;
    let spawn = session.actor().position();
    info!("Actor spawned at ({}, {})", spawn.x, spawn.y);

    if let Some(delta) = args.wheel {
        session.wheel(delta);
    }
    if let Some((dx, dy)) = args.pan {
        session.pan(dx, dy);
    }
    let camera = session.camera();
    info!(
        "Camera zoom {:.2}, scroll ({:.1}, {:.1})",
        camera.zoom, camera.scroll.0, camera.scroll.1
    );
    print_frame(&mut session)?;

    for c in args.moves.chars() {
        let Some(key) = KeyCode::from_char(c) else {
            warn!("Ignoring unknown move '{c}'");
            continue;
        };
        let result = session.step(key.direction())?;
        if !result.moved() {
            info!("Move {} blocked", key.direction());
        }
        if args.every_frame {
            print_frame(&mut session)?;
        }
    }

    if !args.moves.is_empty() && !args.every_frame {
        print_frame(&mut session)?;
    }

    for event in session.events() {
        info!(
            "Chunk {} generated after stepping on ({}, {})",
            event.chunk, event.at.x, event.at.y
        );
    }

    info!("Project Corridor shutdown complete");
    Ok(())
}
