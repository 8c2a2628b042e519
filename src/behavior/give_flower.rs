//! Carry a flower over to a nearby devil familiar
//!
//! A long cooldown keeps the gesture rare. The counter only runs down
//! while a potential recipient is nearby, and sits at -1 once elapsed
//! until the goal actually runs.

use crate::behavior::{Behavior, BehaviorCtx, ControlAxes};
use crate::core::config::config;
use crate::core::types::{BlockPos, EntityId, EntityKind};
use crate::sim::tick::{ParticleKind, SimulationEvent};

pub struct GiveFlowerGoal {
    target: Option<EntityId>,
    cooldown: i32,
}

impl GiveFlowerGoal {
    pub fn new() -> Self {
        Self {
            target: None,
            cooldown: config().gift_cooldown_ticks,
        }
    }

    /// Goal with a specific cooldown remaining (clamped to [-1, MAX])
    pub fn with_cooldown(cooldown: i32) -> Self {
        Self {
            target: None,
            cooldown: cooldown.clamp(-1, config().gift_cooldown_ticks),
        }
    }

    /// Cooldown ticks remaining; -1 once elapsed
    pub fn cooldown(&self) -> i32 {
        self.cooldown
    }

    fn find_recipient(ctx: &BehaviorCtx) -> Option<EntityId> {
        ctx.world
            .entities_of_kind_within(
                EntityKind::DevilFamiliar,
                ctx.agent.position,
                config().gift_search_radius,
            )
            .first()
            .copied()
    }
}

impl Default for GiveFlowerGoal {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for GiveFlowerGoal {
    fn name(&self) -> &'static str {
        "give_flower"
    }

    fn axes(&self) -> ControlAxes {
        ControlAxes::MOVEMENT
    }

    fn can_start(&mut self, ctx: &mut BehaviorCtx) -> bool {
        self.target = Self::find_recipient(ctx);
        let Some(target) = self.target.and_then(|id| ctx.world.entity(id)) else {
            return false;
        };
        // The cooldown only counts down while a recipient is around.
        self.cooldown = (self.cooldown - 1).max(-1);

        self.cooldown < 0
            && ctx.agent.position.distance_squared(target.position)
                > config().gift_min_start_dist_sq
            && !ctx.agent.has_passenger()
    }

    fn can_continue(&mut self, ctx: &mut BehaviorCtx) -> bool {
        self.target.is_some() && ctx.agent.is_pathing() && !ctx.agent.has_passenger()
    }

    fn start(&mut self, ctx: &mut BehaviorCtx) {
        if let Some(target) = self.target.and_then(|id| ctx.world.entity(id)) {
            let position = target.position;
            ctx.agent.move_to(position, config().gift_speed_modifier);
        }
        ctx.agent.set_giving(true);
    }

    fn tick(&mut self, ctx: &mut BehaviorCtx) {
        let Some(target) = self.target.and_then(|id| ctx.world.entity(id)) else {
            self.target = None;
            return;
        };
        let target_pos = target.position;

        if ctx.agent.position.distance_squared(target_pos) < config().gift_complete_dist_sq {
            ctx.events.push(SimulationEvent::ParticleBurst {
                kind: ParticleKind::Heart,
                pos: BlockPos::from_world(target_pos).above(),
            });
            // Delivered; dropping the target ends the goal next poll.
            self.target = None;
        } else {
            // Keep tracking a recipient that swims away.
            ctx.agent.move_to(target_pos, config().gift_speed_modifier);
        }
    }

    fn stop(&mut self, ctx: &mut BehaviorCtx) {
        ctx.agent.set_giving(false);
        ctx.agent.stop_moving();
        self.cooldown = config().gift_cooldown_ticks;
        self.target = None;
    }
}
