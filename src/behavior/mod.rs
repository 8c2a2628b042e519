//! Goal system: prioritized behaviors with exclusive control-axis claims
//!
//! Each behavior declares which control axes it drives while running. The
//! selector scans in ascending priority order every tick: running goals
//! keep going while `can_continue` holds, new goals start when eligible and
//! unblocked, and a starting goal preempts running lower-priority goals
//! that claim an overlapping axis. Cleanup runs unconditionally on stop.

pub mod follow_owner;
pub mod give_flower;
pub mod look_at;
pub mod sit;
pub mod wander;

pub use follow_owner::FollowOwnerGoal;
pub use give_flower::GiveFlowerGoal;
pub use look_at::LookAtPlayerGoal;
pub use sit::SitGoal;
pub use wander::WanderGoal;

use crate::core::types::Tick;
use crate::entity::familiar::FamiliarAgent;
use crate::sim::tick::SimulationEvent;
use crate::world::World;
use bitflags::bitflags;
use rand_chacha::ChaCha8Rng;

bitflags! {
    /// Control axes a running behavior claims exclusively
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ControlAxes: u8 {
        const MOVEMENT = 0b01;
        const ROTATION = 0b10;
    }
}

/// Everything a behavior may touch during one tick
pub struct BehaviorCtx<'a> {
    pub agent: &'a mut FamiliarAgent,
    pub world: &'a mut World,
    pub rng: &'a mut ChaCha8Rng,
    pub events: &'a mut Vec<SimulationEvent>,
    pub tick: Tick,
}

/// A discrete behavior with a start/continue/stop lifecycle
pub trait Behavior {
    fn name(&self) -> &'static str;

    /// Axes this behavior drives exclusively while running
    fn axes(&self) -> ControlAxes;

    fn can_start(&mut self, ctx: &mut BehaviorCtx) -> bool;

    fn can_continue(&mut self, ctx: &mut BehaviorCtx) -> bool;

    fn start(&mut self, _ctx: &mut BehaviorCtx) {}

    fn tick(&mut self, _ctx: &mut BehaviorCtx) {}

    fn stop(&mut self, _ctx: &mut BehaviorCtx) {}
}

struct GoalEntry {
    priority: u8,
    running: bool,
    behavior: Box<dyn Behavior>,
}

/// Priority-ordered behavior arbiter for one agent
pub struct GoalSelector {
    goals: Vec<GoalEntry>,
}

impl GoalSelector {
    pub fn new() -> Self {
        Self { goals: Vec::new() }
    }

    /// Register a goal. Lower priority value = higher priority. Insertion
    /// order breaks ties: first-registered wins.
    pub fn add_goal(&mut self, priority: u8, behavior: Box<dyn Behavior>) {
        let at = self
            .goals
            .iter()
            .position(|g| g.priority > priority)
            .unwrap_or(self.goals.len());
        self.goals.insert(
            at,
            GoalEntry {
                priority,
                running: false,
                behavior,
            },
        );
    }

    /// Names of currently running goals, in priority order
    pub fn running_goals(&self) -> Vec<&'static str> {
        self.goals
            .iter()
            .filter(|g| g.running)
            .map(|g| g.behavior.name())
            .collect()
    }

    /// One arbitration pass: stop, start, then tick running goals
    pub fn tick(&mut self, ctx: &mut BehaviorCtx) {
        // Stop phase: running goals poll can_continue once per tick.
        for i in 0..self.goals.len() {
            if self.goals[i].running && !self.goals[i].behavior.can_continue(ctx) {
                self.stop_goal(i, ctx);
            }
        }

        // Start phase, ascending priority.
        for i in 0..self.goals.len() {
            if self.goals[i].running {
                continue;
            }
            let axes = self.goals[i].behavior.axes();
            let priority = self.goals[i].priority;

            // Blocked by any running goal of equal or higher priority that
            // claims an overlapping axis.
            let blocked = self
                .goals
                .iter()
                .any(|g| g.running && g.priority <= priority && g.behavior.axes().intersects(axes));
            if blocked || !self.goals[i].behavior.can_start(ctx) {
                continue;
            }

            // Preempt running lower-priority goals with overlapping claims.
            for j in 0..self.goals.len() {
                if j != i
                    && self.goals[j].running
                    && self.goals[j].priority > priority
                    && self.goals[j].behavior.axes().intersects(axes)
                {
                    self.stop_goal(j, ctx);
                }
            }

            self.goals[i].running = true;
            self.goals[i].behavior.start(ctx);
            tracing::trace!(agent = ?ctx.agent.id, goal = self.goals[i].behavior.name(), "goal started");
            ctx.events.push(SimulationEvent::GoalStarted {
                agent: ctx.agent.id,
                goal: self.goals[i].behavior.name(),
            });
        }

        // Tick phase.
        for i in 0..self.goals.len() {
            if self.goals[i].running {
                self.goals[i].behavior.tick(ctx);
            }
        }
    }

    /// Stop every running goal (agent removal, death)
    pub fn stop_all(&mut self, ctx: &mut BehaviorCtx) {
        for i in 0..self.goals.len() {
            if self.goals[i].running {
                self.stop_goal(i, ctx);
            }
        }
    }

    fn stop_goal(&mut self, index: usize, ctx: &mut BehaviorCtx) {
        self.goals[index].running = false;
        self.goals[index].behavior.stop(ctx);
        ctx.events.push(SimulationEvent::GoalStopped {
            agent: ctx.agent.id,
            goal: self.goals[index].behavior.name(),
        });
    }
}

impl Default for GoalSelector {
    fn default() -> Self {
        Self::new()
    }
}
