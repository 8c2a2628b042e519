//! Simulation container: agents, their goal selectors, and the world

pub mod tick;

pub use tick::{run_simulation_tick, AuraEffect, ParticleKind, SimulationEvent, TriggerKind};

use crate::behavior::{
    BehaviorCtx, FollowOwnerGoal, GiveFlowerGoal, GoalSelector, LookAtPlayerGoal, SitGoal,
    WanderGoal,
};
use crate::core::error::{DeepkinError, Result};
use crate::core::types::{EntityId, Tick};
use crate::entity::familiar::FamiliarAgent;
use crate::world::World;
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A familiar paired with its goal arbiter
///
/// Goals live outside the agent so a behavior can mutate the agent while
/// the selector drives it.
pub struct AgentSlot {
    pub agent: FamiliarAgent,
    pub goals: GoalSelector,
}

/// Single-threaded cooperative simulation of one world
pub struct Simulation {
    pub world: World,
    pub slots: Vec<AgentSlot>,
    pub rng: ChaCha8Rng,
    pub current_tick: Tick,
    /// Events produced outside the tick loop (commands, lifecycle calls);
    /// drained at the start of the next tick
    pub(crate) pending_events: Vec<SimulationEvent>,
}

impl Simulation {
    pub fn new(seed: u64) -> Self {
        Self {
            world: World::new(),
            slots: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            current_tick: 0,
            pending_events: Vec::new(),
        }
    }

    /// The familiar's standard goal set, priority ascending
    pub fn default_goal_set() -> GoalSelector {
        let mut goals = GoalSelector::new();
        goals.add_goal(1, Box::new(SitGoal));
        goals.add_goal(2, Box::new(LookAtPlayerGoal::new()));
        goals.add_goal(3, Box::new(FollowOwnerGoal));
        goals.add_goal(4, Box::new(GiveFlowerGoal::new()));
        goals.add_goal(5, Box::new(WanderGoal::new()));
        goals
    }

    /// Spawn a familiar with the standard goal set
    pub fn spawn_familiar(&mut self, position: Vec3) -> EntityId {
        let mut agent = FamiliarAgent::new(position);
        agent.finalize_spawn(&mut self.rng);
        let id = agent.id;
        tracing::info!(agent = ?id, ?position, "familiar spawned");
        self.slots.push(AgentSlot {
            agent,
            goals: Self::default_goal_set(),
        });
        id
    }

    pub fn agent(&self, id: EntityId) -> Option<&FamiliarAgent> {
        self.slots
            .iter()
            .map(|s| &s.agent)
            .find(|a| a.id == id)
    }

    pub fn agent_mut(&mut self, id: EntityId) -> Option<&mut FamiliarAgent> {
        self.slots
            .iter_mut()
            .map(|s| &mut s.agent)
            .find(|a| a.id == id)
    }

    fn slot_mut(&mut self, id: EntityId) -> Result<&mut AgentSlot> {
        self.slots
            .iter_mut()
            .find(|s| s.agent.id == id)
            .ok_or(DeepkinError::EntityNotFound(id))
    }

    /// Owner command: sit or stand
    pub fn set_sitting(&mut self, id: EntityId, sitting: bool) -> Result<()> {
        self.slot_mut(id)?.agent.sitting = sitting;
        Ok(())
    }

    pub fn assign_owner(&mut self, id: EntityId, owner: EntityId) -> Result<()> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.agent.id == id)
            .ok_or(DeepkinError::EntityNotFound(id))?;
        slot.agent.set_owner(owner, &mut self.pending_events);
        Ok(())
    }

    pub fn hurt_familiar(&mut self, id: EntityId, attacker: Option<EntityId>) -> Result<()> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.agent.id == id)
            .ok_or(DeepkinError::EntityNotFound(id))?;
        slot.agent
            .hurt(attacker, &mut self.rng, &mut self.pending_events);
        Ok(())
    }

    /// Kill a familiar: goals wind down, then death cleanup runs
    pub fn kill_familiar(&mut self, id: EntityId) -> Result<()> {
        let tick = self.current_tick;
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.agent.id == id)
            .ok_or(DeepkinError::EntityNotFound(id))?;

        let mut ctx = BehaviorCtx {
            agent: &mut slot.agent,
            world: &mut self.world,
            rng: &mut self.rng,
            events: &mut self.pending_events,
            tick,
        };
        slot.goals.stop_all(&mut ctx);
        slot.agent.die(&mut self.world, &mut self.pending_events);
        Ok(())
    }

    /// Despawn a familiar entirely
    pub fn remove_familiar(&mut self, id: EntityId) -> Result<()> {
        let tick = self.current_tick;
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.agent.id == id)
            .ok_or(DeepkinError::EntityNotFound(id))?;

        let mut ctx = BehaviorCtx {
            agent: &mut slot.agent,
            world: &mut self.world,
            rng: &mut self.rng,
            events: &mut self.pending_events,
            tick,
        };
        slot.goals.stop_all(&mut ctx);
        slot.agent.on_remove(&mut self.world, &mut self.pending_events);
        self.slots.retain(|s| s.agent.id != id);
        Ok(())
    }

    /// Move a familiar out of this dimension: every trace in the world is
    /// dropped before the agent leaves
    pub fn change_dimension(&mut self, id: EntityId) -> Result<()> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.agent.id == id)
            .ok_or(DeepkinError::EntityNotFound(id))?;
        slot.agent
            .on_dimension_change(&mut self.world, &mut self.pending_events);
        Ok(())
    }
}
