//! Headless Simulation Runner
//!
//! Runs familiar agents for a fixed number of ticks and reports event
//! totals, for tuning and regression checks.

use clap::Parser;
use deepkin::core::config::{set_config, SimulationConfig};
use deepkin::core::error::Result;
use deepkin::core::types::{BlockPos, EntityKind};
use deepkin::sim::{run_simulation_tick, Simulation, SimulationEvent};
use deepkin::world::Block;
use glam::Vec3;
use serde::Serialize;
use std::path::PathBuf;

/// Headless familiar simulation for tuning and regression checks
#[derive(Parser, Debug)]
#[command(name = "headless_sim")]
#[command(about = "Run the familiar simulation without a frontend and report event totals")]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 12_000)]
    ticks: u64,

    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of familiars to spawn
    #[arg(long, default_value_t = 3)]
    familiars: usize,

    /// Number of devil familiars to add as gift targets
    #[arg(long, default_value_t = 1)]
    devils: usize,

    /// Add a player that owns every familiar
    #[arg(long)]
    owner: bool,

    /// Optional TOML config override
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize, Default)]
struct RunSummary {
    ticks: u64,
    familiars: usize,
    goals_started: usize,
    goals_stopped: usize,
    flag_syncs: usize,
    markers_placed: usize,
    markers_removed: usize,
    particle_bursts: usize,
    teleports: usize,
    triggers: usize,
    auras: usize,
    deaths: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    if let Some(path) = &args.config {
        let config = SimulationConfig::load_from_toml(path)?;
        if let Err(reason) = config.validate() {
            tracing::error!(%reason, "invalid config");
            std::process::exit(1);
        }
        // First set wins; ignore the error if defaults were already used.
        let _ = set_config(config);
    }

    let mut sim = Simulation::new(args.seed);
    sim.world.fill(
        BlockPos::new(-24, -12, -24),
        BlockPos::new(24, 4, 24),
        Block::Water,
    );

    let owner = args
        .owner
        .then(|| sim.world.insert_entity(EntityKind::Player, Vec3::new(6.5, 0.5, 6.5)));

    for i in 0..args.familiars {
        let id = sim.spawn_familiar(Vec3::new(i as f32 * 2.0 + 0.5, 0.5, 0.5));
        if let Some(agent) = sim.agent_mut(id) {
            agent.unlock_light_upgrade();
        }
        if let Some(owner) = owner {
            sim.assign_owner(id, owner)?;
        }
    }

    for i in 0..args.devils {
        sim.world.insert_entity(
            EntityKind::DevilFamiliar,
            Vec3::new(0.5, 0.5, i as f32 * 2.0 + 3.5),
        );
    }

    let mut summary = RunSummary {
        familiars: args.familiars,
        ..Default::default()
    };

    for _ in 0..args.ticks {
        for event in run_simulation_tick(&mut sim) {
            match event {
                SimulationEvent::GoalStarted { .. } => summary.goals_started += 1,
                SimulationEvent::GoalStopped { .. } => summary.goals_stopped += 1,
                SimulationEvent::FlagSync { .. } => summary.flag_syncs += 1,
                SimulationEvent::MarkerPlaced { .. } => summary.markers_placed += 1,
                SimulationEvent::MarkerRemoved { .. } => summary.markers_removed += 1,
                SimulationEvent::ParticleBurst { .. } => summary.particle_bursts += 1,
                SimulationEvent::Teleported { .. } => summary.teleports += 1,
                SimulationEvent::TriggerFired { .. } => summary.triggers += 1,
                SimulationEvent::AuraGranted { .. } => summary.auras += 1,
                SimulationEvent::Died { .. } => summary.deaths += 1,
            }
        }
    }
    summary.ticks = sim.current_tick;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("ticks:           {}", summary.ticks);
        println!("familiars:       {}", summary.familiars);
        println!("goals started:   {}", summary.goals_started);
        println!("goals stopped:   {}", summary.goals_stopped);
        println!("flag syncs:      {}", summary.flag_syncs);
        println!("markers placed:  {}", summary.markers_placed);
        println!("markers removed: {}", summary.markers_removed);
        println!("particle bursts: {}", summary.particle_bursts);
        println!("teleports:       {}", summary.teleports);
        println!("triggers:        {}", summary.triggers);
        println!("auras:           {}", summary.auras);
        println!("deaths:          {}", summary.deaths);
    }

    Ok(())
}
