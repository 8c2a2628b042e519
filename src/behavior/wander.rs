//! Low-priority random strolling

use crate::behavior::{Behavior, BehaviorCtx, ControlAxes};
use crate::core::config::config;
use glam::Vec3;
use rand::Rng;

#[derive(Default)]
pub struct WanderGoal {
    wanted: Option<Vec3>,
}

impl WanderGoal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for WanderGoal {
    fn name(&self) -> &'static str {
        "wander"
    }

    fn axes(&self) -> ControlAxes {
        ControlAxes::MOVEMENT
    }

    fn can_start(&mut self, ctx: &mut BehaviorCtx) -> bool {
        if ctx.agent.sitting {
            return false;
        }
        let cfg = config();
        if ctx.rng.gen_range(0..cfg.wander_interval) != 0 {
            return false;
        }
        let offset = Vec3::new(
            (ctx.rng.gen::<f32>() - 0.5) * 2.0 * cfg.wander_range_xz,
            (ctx.rng.gen::<f32>() - 0.5) * 2.0 * cfg.wander_range_y,
            (ctx.rng.gen::<f32>() - 0.5) * 2.0 * cfg.wander_range_xz,
        );
        self.wanted = Some(ctx.agent.position + offset);
        true
    }

    fn can_continue(&mut self, ctx: &mut BehaviorCtx) -> bool {
        ctx.agent.is_pathing()
    }

    fn start(&mut self, ctx: &mut BehaviorCtx) {
        if let Some(wanted) = self.wanted {
            ctx.agent.move_to(wanted, config().wander_speed);
        }
    }

    fn stop(&mut self, ctx: &mut BehaviorCtx) {
        self.wanted = None;
        ctx.agent.stop_moving();
    }
}
