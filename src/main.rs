//! Pedestrian Sim - headless runner
//!
//! Generates a test city, seeds a population, runs the tick loop and prints
//! aggregate statistics. Optionally writes a population snapshot.

use clap::{Parser, ValueEnum};
use pedestrian_sim::city::{generate_city, BuildingType, CityConfig};
use pedestrian_sim::core::error::Result;
use pedestrian_sim::core::SimulationConfig;
use pedestrian_sim::ecs::PedestrianWorld;
use pedestrian_sim::simulation::{
    aggregate_stats, initialize_population, maintain_population, run_simulation_tick,
    PedestrianStats, PopulationSnapshot, SimulationEvent,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Headless pedestrian simulation
#[derive(Parser, Debug)]
#[command(name = "pedestrian_sim")]
#[command(about = "Run the pedestrian shopping simulation on a generated city")]
struct Args {
    /// TOML config file (defaults are used for missing keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// City width in tiles
    #[arg(long, default_value_t = 64)]
    width: usize,

    /// City height in tiles
    #[arg(long, default_value_t = 64)]
    height: usize,

    /// Initial population
    #[arg(long, default_value_t = 50)]
    initial: usize,

    /// Scripted tours to start on the lake
    #[arg(long, default_value_t = 2)]
    tours: usize,

    /// Ticks to run
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.5)]
    dt: f32,

    /// Random seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write the final population snapshot here
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    seed: u64,
    ticks: u64,
    simulated_seconds: f32,
    trips_started: usize,
    trips_completed: usize,
    stats: PedestrianStats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pedestrian_sim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;
    let seed = config.seed;

    let mut world = PedestrianWorld::new(config);
    let city_config = CityConfig {
        width: args.width,
        height: args.height,
        ..CityConfig::default()
    };
    let grid = generate_city(&city_config, &mut world.rng);

    initialize_population(&mut world, &grid, args.initial);
    let lake = grid
        .iter()
        .find(|(_, tile)| tile.building_type() == BuildingType::Water)
        .map(|(coord, _)| coord);
    if let Some(lake) = lake {
        for _ in 0..args.tours {
            if world.spawn_tour(&grid, lake).is_none() {
                break;
            }
        }
    }

    let mut trips_started = 0;
    let mut trips_completed = 0;
    let mut time = 0.0_f32;
    for _ in 0..args.ticks {
        time += args.dt;
        maintain_population(&mut world, &grid, args.dt);
        for event in run_simulation_tick(&mut world, &grid, args.dt, time) {
            match event {
                SimulationEvent::EpisodeStarted { .. } => trips_started += 1,
                SimulationEvent::EpisodeCompleted { .. } => trips_completed += 1,
                SimulationEvent::DayStarted { day } => tracing::info!("Day {} begins", day),
            }
        }
    }

    let stats = aggregate_stats(world.pedestrians());

    if let Some(path) = &args.snapshot {
        PopulationSnapshot::capture(&world).save(path)?;
    }

    let result = RunResult {
        seed,
        ticks: args.ticks,
        simulated_seconds: time,
        trips_started,
        trips_completed,
        stats,
    };

    match args.format {
        OutputFormat::Text => {
            println!("Seed {} | {} ticks ({:.0}s simulated)", result.seed, result.ticks, result.simulated_seconds);
            println!("Trips: {} started, {} completed", result.trips_started, result.trips_completed);
            println!("{}", result.stats.summary());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
