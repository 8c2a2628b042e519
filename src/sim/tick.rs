//! Tick system - orchestrates simulation updates
//!
//! Order inside one agent tick matters: arbitration runs before movement
//! so a freshly started goal steers the same tick, and light updates run
//! after integration so markers trail the final position. Everything is
//! synchronous on one thread; the returned events are the only channel
//! observers ever see.

use crate::behavior::BehaviorCtx;
use crate::core::config::config;
use crate::core::types::{BlockPos, EntityId, Tick};
use crate::entity::flags::FlagId;
use crate::sim::Simulation;
use glam::Vec3;
use rand::Rng;

/// Cosmetic particle effects requested by behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Heart,
}

/// Advancement-style notifications fired at an observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// A hat-wearing familiar got a new owner
    RareVariant,
    /// The owner hit their own familiar
    FamiliarSad,
}

/// Status effects granted to the owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuraEffect {
    WaterBreathing,
}

/// Events generated during simulation ticks
///
/// These are the authoritative side's outbound diff: flag syncs, world
/// mutations, and one-shot notifications, decoupled from any transport.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    GoalStarted {
        agent: EntityId,
        goal: &'static str,
    },
    GoalStopped {
        agent: EntityId,
        goal: &'static str,
    },
    /// A synchronized flag changed; mirror it to observers
    FlagSync {
        agent: EntityId,
        flag: FlagId,
        value: bool,
    },
    MarkerPlaced {
        agent: EntityId,
        pos: BlockPos,
    },
    MarkerRemoved {
        pos: BlockPos,
    },
    ParticleBurst {
        kind: ParticleKind,
        pos: BlockPos,
    },
    Teleported {
        agent: EntityId,
        to: Vec3,
    },
    TriggerFired {
        kind: TriggerKind,
        target: EntityId,
    },
    AuraGranted {
        agent: EntityId,
        target: EntityId,
        effect: AuraEffect,
        duration: Tick,
    },
    Died {
        agent: EntityId,
    },
}

/// Advance the simulation by one tick, returning the events it produced
pub fn run_simulation_tick(sim: &mut Simulation) -> Vec<SimulationEvent> {
    let mut events = std::mem::take(&mut sim.pending_events);
    sim.current_tick += 1;
    let cfg = config();

    for slot in &mut sim.slots {
        let agent = &mut slot.agent;
        if !agent.alive {
            continue;
        }

        agent.prev_yaw = agent.yaw;

        // Anger fades on its own eventually.
        if agent.is_angry() && sim.rng.gen::<f64>() < cfg.anger_fade_chance {
            agent.set_angry(false);
        }

        agent.update_swimming(&sim.world);

        {
            let mut ctx = BehaviorCtx {
                agent: &mut *agent,
                world: &mut sim.world,
                rng: &mut sim.rng,
                events: &mut events,
                tick: sim.current_tick,
            };
            slot.goals.tick(&mut ctx);
        }

        agent.tick_movement(&sim.world);
        agent.apply_kinematics(&sim.world);
        agent.tick_light(&mut sim.world, &mut events);

        if agent.effects_enabled && sim.current_tick % cfg.aura_interval == 0 {
            if let Some(owner) = agent.owner() {
                events.push(SimulationEvent::AuraGranted {
                    agent: agent.id,
                    target: owner,
                    effect: AuraEffect::WaterBreathing,
                    duration: cfg.aura_duration,
                });
            }
        }

        // Publish the flag diff produced anywhere in this tick.
        for (flag, value) in agent.drain_flag_sync() {
            events.push(SimulationEvent::FlagSync {
                agent: agent.id,
                flag,
                value,
            });
        }
    }

    events
}
