//! Deepkin - Entry Point
//!
//! Interactive driver for the familiar simulation: spawns a lagoon world,
//! lets you add familiars, devils, and players, and steps the simulation
//! while printing the events each tick produces.

use deepkin::core::error::Result;
use deepkin::core::types::{BlockPos, EntityId, EntityKind};
use deepkin::sim::{run_simulation_tick, Simulation, SimulationEvent};
use deepkin::world::Block;

use glam::Vec3;
use std::io::{self, Write};

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Deepkin starting...");

    let mut sim = Simulation::new(0xD33B);
    fill_lagoon(&mut sim);

    let mut familiar: Option<EntityId> = None;
    let mut player: Option<EntityId> = None;

    println!("\n=== DEEPKIN ===");
    println!("An aquatic familiar simulation with goal-driven behavior");
    println!();
    println!("Commands:");
    println!("  tick / t        - Advance simulation by one tick");
    println!("  run <n>         - Run n simulation ticks");
    println!("  spawn           - Spawn a familiar in the lagoon");
    println!("  player          - Add a player and make it the owner");
    println!("  devil           - Add a devil familiar near the agent");
    println!("  sit / stand     - Command the familiar");
    println!("  upgrade         - Unlock the illumination upgrade");
    println!("  hurt            - Have the owner hit the familiar");
    println!("  status / s      - Show familiar status");
    println!("  quit / q        - Exit");
    println!();

    loop {
        display_status(&sim, familiar);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();
        let mut parts = input.split_whitespace();
        let command = parts.next().unwrap_or("");

        match command {
            "tick" | "t" => print_events(&run_simulation_tick(&mut sim)),
            "run" => {
                let n: u64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(20);
                let mut all = Vec::new();
                for _ in 0..n {
                    all.extend(run_simulation_tick(&mut sim));
                }
                println!("Ran {} ticks:", n);
                print_events(&all);
            }
            "spawn" => {
                let id = sim.spawn_familiar(Vec3::new(0.5, 0.5, 0.5));
                familiar = Some(id);
                if let Some(p) = player {
                    sim.assign_owner(id, p)?;
                }
                println!("Spawned familiar {:?}", id);
            }
            "player" => {
                let id = sim
                    .world
                    .insert_entity(EntityKind::Player, Vec3::new(4.5, 0.5, 4.5));
                player = Some(id);
                if let Some(f) = familiar {
                    sim.assign_owner(f, id)?;
                    println!("Player {:?} now owns the familiar", id);
                } else {
                    println!("Added player {:?}", id);
                }
            }
            "devil" => {
                let id = sim
                    .world
                    .insert_entity(EntityKind::DevilFamiliar, Vec3::new(3.5, 0.5, 0.5));
                println!("Added devil familiar {:?}", id);
            }
            "sit" => with_familiar(familiar, |id| sim.set_sitting(id, true)),
            "stand" => with_familiar(familiar, |id| sim.set_sitting(id, false)),
            "upgrade" => {
                if let Some(agent) = familiar.and_then(|id| sim.agent_mut(id)) {
                    if agent.can_take_light_upgrade() {
                        agent.unlock_light_upgrade();
                        println!("Illumination upgrade unlocked");
                    } else {
                        println!("Already upgraded");
                    }
                } else {
                    println!("No familiar yet - use 'spawn'");
                }
            }
            "hurt" => match (familiar, player) {
                (Some(f), owner @ Some(_)) => {
                    sim.hurt_familiar(f, owner)?;
                    println!("The owner hit the familiar");
                }
                (Some(f), None) => {
                    sim.hurt_familiar(f, Some(EntityId::new()))?;
                    println!("A stranger hit the familiar");
                }
                _ => println!("No familiar yet - use 'spawn'"),
            },
            "status" | "s" => {} // printed every loop
            "quit" | "q" => break,
            "" => {}
            other => println!("Unknown command: {}", other),
        }
        println!();
    }

    tracing::info!("Deepkin shutting down");
    Ok(())
}

/// Carve a water volume for the familiars to swim in
fn fill_lagoon(sim: &mut Simulation) {
    sim.world.fill(
        BlockPos::new(-16, -8, -16),
        BlockPos::new(16, 4, 16),
        Block::Water,
    );
}

fn with_familiar(familiar: Option<EntityId>, f: impl FnOnce(EntityId) -> Result<()>) {
    match familiar {
        Some(id) => {
            if let Err(e) = f(id) {
                println!("Error: {}", e);
            }
        }
        None => println!("No familiar yet - use 'spawn'"),
    }
}

fn display_status(sim: &Simulation, familiar: Option<EntityId>) {
    println!("--- Tick {} ---", sim.current_tick);
    let Some(agent) = familiar.and_then(|id| sim.agent(id)) else {
        println!("(no familiar spawned)");
        return;
    };
    println!(
        "pos ({:.1}, {:.1}, {:.1})  yaw {:.0}  {}{}{}{}{}",
        agent.position.x,
        agent.position.y,
        agent.position.z,
        agent.yaw,
        if agent.swimming { "swimming " } else { "" },
        if agent.sitting { "sitting " } else { "" },
        if agent.is_angry() { "angry " } else { "" },
        if agent.is_giving() { "giving " } else { "" },
        if agent.has_hat() { "[hat] " } else { "" },
    );
}

fn print_events(events: &[SimulationEvent]) {
    if events.is_empty() {
        println!("(quiet tick)");
        return;
    }
    for event in events {
        match event {
            SimulationEvent::GoalStarted { goal, .. } => println!("  goal started: {}", goal),
            SimulationEvent::GoalStopped { goal, .. } => println!("  goal stopped: {}", goal),
            SimulationEvent::FlagSync { flag, value, .. } => {
                println!("  flag sync: {:?} = {}", flag, value)
            }
            SimulationEvent::MarkerPlaced { pos, .. } => println!("  light placed at {:?}", pos),
            SimulationEvent::MarkerRemoved { pos } => println!("  light removed at {:?}", pos),
            SimulationEvent::ParticleBurst { kind, pos } => {
                println!("  particles {:?} at {:?}", kind, pos)
            }
            SimulationEvent::Teleported { to, .. } => {
                println!("  teleported to ({:.1}, {:.1}, {:.1})", to.x, to.y, to.z)
            }
            SimulationEvent::TriggerFired { kind, .. } => println!("  trigger fired: {:?}", kind),
            SimulationEvent::AuraGranted { effect, .. } => println!("  aura granted: {:?}", effect),
            SimulationEvent::Died { agent } => println!("  familiar {:?} died", agent),
        }
    }
}
