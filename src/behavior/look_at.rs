//! Look toward the nearest player for a little while

use crate::behavior::{Behavior, BehaviorCtx, ControlAxes};
use crate::core::config::config;
use crate::core::math::approach_degrees;
use crate::core::types::{EntityId, EntityKind};
use rand::Rng;

#[derive(Default)]
pub struct LookAtPlayerGoal {
    target: Option<EntityId>,
    look_ticks: u32,
}

impl LookAtPlayerGoal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for LookAtPlayerGoal {
    fn name(&self) -> &'static str {
        "look_at_player"
    }

    fn axes(&self) -> ControlAxes {
        // Only turns the head; movement stays free for other goals
        ControlAxes::ROTATION
    }

    fn can_start(&mut self, ctx: &mut BehaviorCtx) -> bool {
        if ctx.rng.gen::<f64>() >= config().look_chance {
            return false;
        }
        self.target =
            ctx.world
                .nearest_of_kind(EntityKind::Player, ctx.agent.position, config().look_range);
        self.target.is_some()
    }

    fn can_continue(&mut self, ctx: &mut BehaviorCtx) -> bool {
        if self.look_ticks == 0 {
            return false;
        }
        let Some(target) = self.target.and_then(|id| ctx.world.entity(id)) else {
            return false;
        };
        target.position.distance(ctx.agent.position) <= config().look_range
    }

    fn start(&mut self, ctx: &mut BehaviorCtx) {
        let cfg = config();
        self.look_ticks = cfg.look_min_ticks + ctx.rng.gen_range(0..cfg.look_extra_ticks);
    }

    fn tick(&mut self, ctx: &mut BehaviorCtx) {
        let Some(target) = self.target.and_then(|id| ctx.world.entity(id)) else {
            return;
        };
        let delta = target.position - ctx.agent.position;
        if delta.x.abs() > f32::EPSILON || delta.z.abs() > f32::EPSILON {
            let heading = delta.z.atan2(delta.x).to_degrees() - 90.0;
            ctx.agent.yaw =
                approach_degrees(ctx.agent.yaw, heading, config().look_turn_step_degrees);
        }
        self.look_ticks = self.look_ticks.saturating_sub(1);
    }

    fn stop(&mut self, _ctx: &mut BehaviorCtx) {
        self.target = None;
        self.look_ticks = 0;
    }
}
