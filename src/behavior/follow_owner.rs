//! Follow the owner, with an anti-stranding teleport
//!
//! The familiar swims after its owner. When the owner leaves the water
//! while the familiar is still submerged, pathing can't catch up, so the
//! goal teleports the familiar to the owner instead of leaving it behind.

use crate::behavior::{Behavior, BehaviorCtx, ControlAxes};
use crate::core::config::config;
use crate::core::types::BlockPos;
use crate::sim::tick::SimulationEvent;
use glam::Vec3;

pub struct FollowOwnerGoal;

impl FollowOwnerGoal {
    fn owner_position(ctx: &BehaviorCtx) -> Option<Vec3> {
        let owner = ctx.agent.owner()?;
        ctx.world.entity(owner).map(|e| e.position)
    }

    fn should_teleport(ctx: &BehaviorCtx, owner_pos: Vec3) -> bool {
        !ctx.world.is_water_at(BlockPos::from_world(owner_pos))
            && ctx.agent.is_submerged(ctx.world)
    }
}

impl Behavior for FollowOwnerGoal {
    fn name(&self) -> &'static str {
        "follow_owner"
    }

    fn axes(&self) -> ControlAxes {
        ControlAxes::MOVEMENT | ControlAxes::ROTATION
    }

    fn can_start(&mut self, ctx: &mut BehaviorCtx) -> bool {
        if ctx.agent.sitting {
            return false;
        }
        let Some(owner_pos) = Self::owner_position(ctx) else {
            return false;
        };
        owner_pos.distance(ctx.agent.position) > config().follow_start_dist
    }

    fn can_continue(&mut self, ctx: &mut BehaviorCtx) -> bool {
        if ctx.agent.sitting {
            return false;
        }
        let Some(owner_pos) = Self::owner_position(ctx) else {
            return false;
        };
        owner_pos.distance(ctx.agent.position) > config().follow_stop_dist
    }

    fn tick(&mut self, ctx: &mut BehaviorCtx) {
        let Some(owner_pos) = Self::owner_position(ctx) else {
            return;
        };
        if Self::should_teleport(ctx, owner_pos) {
            ctx.agent.teleport_to(owner_pos);
            tracing::debug!(agent = ?ctx.agent.id, "teleported to owner out of water");
            ctx.events.push(SimulationEvent::Teleported {
                agent: ctx.agent.id,
                to: owner_pos,
            });
        } else {
            ctx.agent.move_to(owner_pos, config().follow_speed);
        }
    }

    fn stop(&mut self, ctx: &mut BehaviorCtx) {
        ctx.agent.stop_moving();
    }
}
