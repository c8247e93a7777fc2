//! Headless battle runner
//!
//! Runs a scenario to completion without any presentation layer and
//! prints a result summary. Useful for balance work and regression
//! comparisons: the same seed always produces the same battle.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rand::Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use mudfront::combat::explosion::fire_artillery_strike;
use mudfront::core::config::SimConfig;
use mudfront::core::error::Result;
use mudfront::core::types::{GridPos, Team};
use mudfront::map::grid::grid_to_world;
use mudfront::sim::events::SimEvent;
use mudfront::sim::scenario::Scenario;
use mudfront::sim::tick::run_tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "mudfront", about = "Headless trench combat simulation")]
struct Args {
    /// RNG seed; omit for a random battle
    #[arg(long)]
    seed: Option<u64>,

    /// TOML run configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON scenario; omit for the built-in trench line
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override the configured tick limit
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Preparatory artillery shells dropped on the defensive line
    #[arg(long, default_value_t = 0)]
    barrage: u32,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Serialize)]
struct BattleReport {
    seed: u64,
    ticks: u64,
    outcome: &'static str,
    entente_alive: usize,
    alliance_alive: usize,
    shots_fired: usize,
    deaths: usize,
    craters: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(max_ticks) = args.max_ticks {
        config.max_ticks = max_ticks;
    }

    let seed = args
        .seed
        .or(config.seed)
        .unwrap_or_else(|| rand::thread_rng().gen());

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::flanders_default(&config),
    };

    let mut world = scenario.build_world(config.clone(), seed);
    tracing::info!(
        seed,
        width = config.map_width,
        height = config.map_height,
        entente = world.living_count(Team::Entente),
        alliance = world.living_count(Team::Alliance),
        "battle start"
    );

    let mut shots_fired = 0;
    let mut deaths = 0;
    let mut craters = 0;

    // Opening barrage lands around the defensive line before the assault
    if args.barrage > 0 {
        let mut events = Vec::new();
        let trench_y = scenario.height as i32 - 8;
        for _ in 0..args.barrage {
            let x = world.rng.gen_range(0..scenario.width as i32);
            let y = trench_y + world.rng.gen_range(-3..=1);
            fire_artillery_strike(&mut world, grid_to_world(GridPos::new(x, y)), 150.0, &mut events);
        }
        tally(&events, &mut shots_fired, &mut deaths, &mut craters);
    }

    let mut ticks = 0;
    while ticks < config.max_ticks {
        let events = run_tick(&mut world, config.tick_ms);
        tally(&events, &mut shots_fired, &mut deaths, &mut craters);
        ticks += 1;
        if world.is_decided() {
            break;
        }
    }

    let entente_alive = world.living_count(Team::Entente);
    let alliance_alive = world.living_count(Team::Alliance);
    let outcome = if alliance_alive == 0 && entente_alive == 0 {
        "mutual annihilation"
    } else if alliance_alive == 0 {
        "assault repelled"
    } else if entente_alive == 0 {
        "line overrun"
    } else {
        "stalemate"
    };

    let report = BattleReport {
        seed,
        ticks,
        outcome,
        entente_alive,
        alliance_alive,
        shots_fired,
        deaths,
        craters,
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("outcome: {} after {} ticks (seed {})", report.outcome, report.ticks, seed);
            println!(
                "  entente {} alive, alliance {} alive",
                report.entente_alive, report.alliance_alive
            );
            println!(
                "  {} shots, {} dead, {} craters",
                report.shots_fired, report.deaths, report.craters
            );
        }
    }
    Ok(())
}

fn tally(events: &[SimEvent], shots: &mut usize, deaths: &mut usize, craters: &mut usize) {
    for event in events {
        match event {
            SimEvent::ShotFired { .. } => *shots += 1,
            SimEvent::UnitDied { unit, at } => {
                tracing::debug!(?unit, x = at.x, y = at.y, "unit killed");
                *deaths += 1;
            }
            SimEvent::CraterFormed { .. } => *craters += 1,
            _ => {}
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
