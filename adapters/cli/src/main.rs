#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Overworld engine headlessly.
//!
//! Each line read from stdin is one frame: its tokens update the held
//! directions, then exactly one tick runs and the resulting state is printed.

mod input;
mod settings;

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use overworld_core::Event;
use overworld_system_controls::Controls;
use overworld_system_journal::{Checkpoint, Journal};
use overworld_world::{self as world, descriptor::WorldDescriptor, query, World};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use input::{parse_line, FrameInput};
use settings::Settings;

/// Walk a player through tile-less maps from the terminal.
#[derive(Debug, Parser)]
#[command(name = "overworld", version, long_about = None)]
struct Cli {
    /// Engine settings file.
    #[arg(long, value_name = "FILE", default_value_os_t = Settings::default_path())]
    settings: PathBuf,

    /// World description overriding the one named in the settings.
    #[arg(long, value_name = "FILE")]
    world: Option<PathBuf>,

    /// Random seed overriding the one named in the settings.
    #[arg(long)]
    seed: Option<u64>,

    /// Checkpoint restored on start, if present, and written on exit.
    #[arg(long, value_name = "FILE")]
    checkpoint: Option<PathBuf>,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Entry point for the Overworld command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.settings)?;
    init_logging(cli.quiet, settings.log_filter.as_deref());

    let engine = cli
        .seed
        .map_or(settings.engine, |seed| settings.engine.with_seed(seed));
    let world_path = cli.world.unwrap_or(settings.world);
    let descriptor = load_world(&world_path)?;
    let mut world = World::from_descriptor(&descriptor, &engine)
        .with_context(|| format!("invalid world description at {}", world_path.display()))?;

    let saved = match cli.checkpoint.as_deref() {
        Some(path) => read_checkpoint(path)?,
        None => None,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let reached = run(&mut world, saved, stdin.lock(), stdout.lock())?;

    if let (Some(path), Some(checkpoint)) = (cli.checkpoint.as_deref(), reached) {
        write_checkpoint(path, &checkpoint)?;
    }
    Ok(())
}

fn init_logging(quiet: bool, configured: Option<&str>) {
    let fallback = if quiet {
        "warn"
    } else {
        configured.unwrap_or("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_world(path: &Path) -> Result<WorldDescriptor> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read world description at {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse world description at {}", path.display()))
}

fn read_checkpoint(path: &Path) -> Result<Option<Checkpoint>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read checkpoint at {}", path.display()))?;
    let checkpoint = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse checkpoint at {}", path.display()))?;
    Ok(Some(checkpoint))
}

fn write_checkpoint(path: &Path, checkpoint: &Checkpoint) -> Result<()> {
    let contents =
        serde_json::to_string_pretty(checkpoint).context("failed to encode checkpoint")?;
    fs::write(path, contents)
        .with_context(|| format!("failed to write checkpoint at {}", path.display()))
}

/// Places the player back at `saved` when it still fits the world.
fn resume(world: &mut World, saved: Option<Checkpoint>) -> Journal {
    let fresh = Checkpoint::new(
        query::current_map_id(world),
        query::player(world).position(),
    );
    let Some(saved) = saved else {
        return Journal::starting_at(fresh);
    };

    let journal = Journal::starting_at(saved);
    let mut commands = Vec::new();
    journal.restore(&mut commands);
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    if events
        .iter()
        .any(|event| matches!(event, Event::TeleportRejected { .. }))
    {
        warn!(
            map = saved.map().get(),
            x = saved.position().x(),
            y = saved.position().y(),
            "checkpoint does not fit the world, starting over"
        );
        return Journal::starting_at(fresh);
    }
    info!(map = saved.map().get(), "resumed from checkpoint");
    journal
}

fn run(
    world: &mut World,
    saved: Option<Checkpoint>,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<Option<Checkpoint>> {
    let mut controls = Controls::new();
    let mut journal = resume(world, saved);
    describe_map(world, &mut output)?;

    for line in input.lines() {
        let line = line.context("failed to read input line")?;
        let inputs = match parse_line(&line) {
            Ok(FrameInput::Tick(inputs)) => inputs,
            Ok(FrameInput::Quit) => break,
            Err(error) => {
                warn!(%error, "ignoring input line");
                continue;
            }
        };

        let mut commands = Vec::new();
        controls.handle(&inputs, query::player(world).speed(), &mut commands);
        let mut events = Vec::new();
        for command in commands {
            world::apply(world, command, &mut events);
        }
        journal.handle(&events);

        if events
            .iter()
            .any(|event| matches!(event, Event::MapEntered { .. }))
        {
            describe_map(world, &mut output)?;
        }
        for encounter in journal.take_encounters() {
            writeln!(
                output,
                "A wild creature #{} (level {}) appeared!",
                encounter.species().get(),
                encounter.level().get()
            )?;
        }
        let position = query::player(world).position();
        writeln!(
            output,
            "tick {} map {} at ({}, {})",
            query::tick_index(world),
            query::current_map_id(world).get(),
            position.x(),
            position.y()
        )?;
    }

    if let Some(checkpoint) = journal.checkpoint() {
        info!(
            map = checkpoint.map().get(),
            x = checkpoint.position().x(),
            y = checkpoint.position().y(),
            "session ended"
        );
    }
    output.flush()?;
    Ok(journal.checkpoint())
}

fn describe_map(world: &World, output: &mut impl Write) -> Result<()> {
    if let Some(map) = query::current_map(world) {
        let size = map.size();
        writeln!(
            output,
            "== {} == ({}x{})",
            map.caption(),
            size.width(),
            size.height()
        )?;
    }
    Ok(())
}
