//! Move controller: converts a wanted position into velocity and heading
//!
//! The swim branch is the interesting one: buoyancy, an exponential speed
//! correction, and proportional vertical steering. On land the controller
//! falls back to a plain walk-toward-target.

use crate::core::config::config;
use crate::core::math::{approach_degrees, lerp};
use crate::entity::familiar::FamiliarAgent;
use crate::world::World;
use glam::Vec3;

/// Maximum yaw change per tick for the ground branch (degrees)
const GROUND_TURN_STEP: f32 = 90.0;

/// Current movement order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOperation {
    Idle,
    MoveTo { target: Vec3, speed_modifier: f32 },
}

/// Incremental movement state owned by each agent
#[derive(Debug, Clone)]
pub struct MoveControl {
    operation: MoveOperation,
    speed: f32,
    forward_input: f32,
}

impl MoveControl {
    pub fn new() -> Self {
        Self {
            operation: MoveOperation::Idle,
            speed: 0.0,
            forward_input: 0.0,
        }
    }

    pub fn set_wanted(&mut self, target: Vec3, speed_modifier: f32) {
        self.operation = MoveOperation::MoveTo {
            target,
            speed_modifier,
        };
    }

    pub fn stop(&mut self) {
        self.operation = MoveOperation::Idle;
        self.forward_input = 0.0;
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.operation, MoveOperation::MoveTo { .. })
    }

    pub fn operation(&self) -> MoveOperation {
        self.operation
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn forward_input(&self) -> f32 {
        self.forward_input
    }
}

impl Default for MoveControl {
    fn default() -> Self {
        Self::new()
    }
}

impl FamiliarAgent {
    /// Advance the move controller by one tick
    pub(crate) fn tick_movement(&mut self, world: &World) {
        if self.is_submerged(world) {
            self.tick_swim_movement();
        } else {
            self.tick_ground_movement();
        }
    }

    fn tick_swim_movement(&mut self) {
        let cfg = config();
        self.velocity.y += cfg.buoyancy_impulse;

        match self.move_control.operation {
            MoveOperation::MoveTo {
                target,
                speed_modifier,
            } => {
                let max_speed = speed_modifier * self.movement_speed * cfg.swim_speed_multiplier;
                self.move_control.speed = lerp(cfg.speed_blend, self.move_control.speed, max_speed);

                let delta = target - self.position;
                // The vertical correction scales by true distance, so the
                // squared-distance shortcut doesn't apply here.
                let distance = delta.length();

                if distance < cfg.arrive_threshold {
                    self.move_control.forward_input = 0.0;
                    self.move_control.operation = MoveOperation::Idle;
                    return;
                }

                if delta.y.abs() > cfg.displacement_epsilon {
                    self.velocity.y +=
                        self.move_control.speed * (delta.y / distance) * cfg.vertical_correction;
                }

                if delta.x.abs() > cfg.displacement_epsilon
                    || delta.z.abs() > cfg.displacement_epsilon
                {
                    let heading = delta.z.atan2(delta.x).to_degrees() - 90.0;
                    self.yaw = approach_degrees(self.yaw, heading, cfg.turn_step_degrees);
                }

                self.move_control.forward_input = self.move_control.speed;
            }
            MoveOperation::Idle => {
                self.move_control.speed = 0.0;
                self.move_control.forward_input = 0.0;
            }
        }
    }

    /// General-purpose land branch: face the target and walk
    fn tick_ground_movement(&mut self) {
        let cfg = config();
        match self.move_control.operation {
            MoveOperation::MoveTo {
                target,
                speed_modifier,
            } => {
                let mut delta = target - self.position;
                delta.y = 0.0;
                let distance = delta.length();

                if distance < cfg.arrive_threshold {
                    self.move_control.forward_input = 0.0;
                    self.move_control.operation = MoveOperation::Idle;
                    return;
                }

                let heading = delta.z.atan2(delta.x).to_degrees() - 90.0;
                self.yaw = approach_degrees(self.yaw, heading, GROUND_TURN_STEP);
                self.move_control.speed = speed_modifier * self.movement_speed;
                self.move_control.forward_input = self.move_control.speed;
            }
            MoveOperation::Idle => {
                self.move_control.speed = 0.0;
                self.move_control.forward_input = 0.0;
            }
        }
    }
}
