//! Sit still while the owner commands it

use crate::behavior::{Behavior, BehaviorCtx, ControlAxes};

pub struct SitGoal;

impl Behavior for SitGoal {
    fn name(&self) -> &'static str {
        "sit"
    }

    fn axes(&self) -> ControlAxes {
        ControlAxes::MOVEMENT
    }

    fn can_start(&mut self, ctx: &mut BehaviorCtx) -> bool {
        ctx.agent.sitting
    }

    fn can_continue(&mut self, ctx: &mut BehaviorCtx) -> bool {
        ctx.agent.sitting
    }

    fn start(&mut self, ctx: &mut BehaviorCtx) {
        ctx.agent.stop_moving();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::familiar::FamiliarAgent;
    use crate::world::World;
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sit_follows_command_bit() {
        let mut agent = FamiliarAgent::new(Vec3::ZERO);
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut events = Vec::new();
        let mut goal = SitGoal;

        let mut ctx = BehaviorCtx {
            agent: &mut agent,
            world: &mut world,
            rng: &mut rng,
            events: &mut events,
            tick: 0,
        };

        assert!(!goal.can_start(&mut ctx));
        ctx.agent.sitting = true;
        assert!(goal.can_start(&mut ctx));

        ctx.agent.move_to(Vec3::new(5.0, 0.0, 0.0), 1.0);
        goal.start(&mut ctx);
        assert!(!ctx.agent.is_pathing());

        ctx.agent.sitting = false;
        assert!(!goal.can_continue(&mut ctx));
    }
}
