//! The familiar agent: state, lifecycle, and persistence
//!
//! Composition replaces the host-engine inheritance chain: the agent owns a
//! move controller and a light trail, and the simulation invokes its
//! lifecycle hooks (spawn, death, removal, dimension change, save/load)
//! explicitly.

use crate::core::config::config;
use crate::core::types::{BlockPos, EntityId};
use crate::entity::flags::{FlagId, SyncedFlags};
use crate::entity::light::LightTrail;
use crate::entity::movement::MoveControl;
use crate::sim::tick::{SimulationEvent, TriggerKind};
use crate::world::World;
use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Chance a spawned familiar wears the rare hat
const HAT_CHANCE: f64 = 0.1;
/// Chance a spawned familiar has the trunk variant
const TRUNK_CHANCE: f64 = 0.5;

/// An aquatic familiar creature
pub struct FamiliarAgent {
    pub id: EntityId,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Heading in degrees; previous value kept for interpolation
    pub yaw: f32,
    pub prev_yaw: f32,
    /// Movement-speed attribute, world units per tick at full input
    pub movement_speed: f32,
    pub alive: bool,
    /// Owner-commanded sit bit
    pub sitting: bool,
    /// Mirrors submersion; authoritative navigation mode switch
    pub swimming: bool,
    pub effects_enabled: bool,
    /// Unlocked illumination upgrade; gates light-marker placement
    light_upgrade: bool,
    flags: SyncedFlags,
    owner: Option<EntityId>,
    passenger: Option<EntityId>,
    pub(crate) light: LightTrail,
    pub(crate) move_control: MoveControl,
}

impl FamiliarAgent {
    pub fn new(position: Vec3) -> Self {
        Self {
            id: EntityId::new(),
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            prev_yaw: 0.0,
            movement_speed: 0.3,
            alive: true,
            sitting: false,
            swimming: false,
            effects_enabled: true,
            light_upgrade: false,
            flags: SyncedFlags::new(),
            owner: None,
            passenger: None,
            light: LightTrail::new(),
            move_control: MoveControl::new(),
        }
    }

    /// Spawn-time finalization: roll the cosmetic variant flags
    pub fn finalize_spawn(&mut self, rng: &mut ChaCha8Rng) {
        self.set_hat(rng.gen::<f64>() < HAT_CHANCE);
        self.set_trunk(rng.gen::<f64>() < TRUNK_CHANCE);
    }

    // === SYNCED FLAGS ===

    pub fn has_hat(&self) -> bool {
        self.flags.get(FlagId::HasHat)
    }

    pub fn set_hat(&mut self, value: bool) {
        self.flags.set(FlagId::HasHat, value);
    }

    pub fn has_trunk(&self) -> bool {
        self.flags.get(FlagId::HasTrunk)
    }

    pub fn set_trunk(&mut self, value: bool) {
        self.flags.set(FlagId::HasTrunk, value);
    }

    pub fn is_angry(&self) -> bool {
        self.flags.get(FlagId::IsAngry)
    }

    pub fn set_angry(&mut self, value: bool) {
        self.flags.set(FlagId::IsAngry, value);
    }

    pub fn is_giving(&self) -> bool {
        self.flags.get(FlagId::IsGiving)
    }

    pub fn set_giving(&mut self, value: bool) {
        self.flags.set(FlagId::IsGiving, value);
    }

    /// Take the pending flag diff for publication to observers
    pub fn drain_flag_sync(&mut self) -> Vec<(FlagId, bool)> {
        self.flags.drain_dirty()
    }

    // === OWNERSHIP ===

    pub fn owner(&self) -> Option<EntityId> {
        self.owner.as_ref().copied()
    }

    /// Assign the owner. A hat-wearing familiar fires the rare-variant
    /// advancement exactly when the owner actually changes; reassigning the
    /// same owner does not re-fire.
    pub fn set_owner(&mut self, owner: EntityId, events: &mut Vec<SimulationEvent>) {
        if self.has_hat() && self.owner != Some(owner) {
            events.push(SimulationEvent::TriggerFired {
                kind: TriggerKind::RareVariant,
                target: owner,
            });
        }
        self.owner = Some(owner);
    }

    pub fn clear_owner(&mut self) {
        self.owner = None;
    }

    // === PASSENGER ===

    pub fn has_passenger(&self) -> bool {
        self.passenger.is_some()
    }

    pub fn set_passenger(&mut self, passenger: Option<EntityId>) {
        self.passenger = passenger;
    }

    // === UPGRADES ===

    pub fn has_light_upgrade(&self) -> bool {
        self.light_upgrade
    }

    /// The illumination upgrade can be taken once
    pub fn can_take_light_upgrade(&self) -> bool {
        !self.light_upgrade
    }

    pub fn unlock_light_upgrade(&mut self) {
        self.light_upgrade = true;
    }

    // === POSITION ===

    pub fn block_pos(&self) -> BlockPos {
        BlockPos::from_world(self.position)
    }

    pub fn is_submerged(&self, world: &World) -> bool {
        world.is_submerged(self.position)
    }

    /// Authoritative swim/ground mode switch, once per tick
    pub(crate) fn update_swimming(&mut self, world: &World) {
        self.swimming = self.is_submerged(world);
    }

    // === NAVIGATION FACADE ===

    pub fn move_to(&mut self, target: Vec3, speed_modifier: f32) {
        self.move_control.set_wanted(target, speed_modifier);
    }

    pub fn stop_moving(&mut self) {
        self.move_control.stop();
    }

    /// Whether a move-to operation is still in progress
    pub fn is_pathing(&self) -> bool {
        self.move_control.is_moving()
    }

    // === DAMAGE ===

    /// React to being hurt. The owner hitting the familiar makes it sulk;
    /// anyone else sends it scattering to a random nearby spot.
    pub fn hurt(
        &mut self,
        attacker: Option<EntityId>,
        rng: &mut ChaCha8Rng,
        events: &mut Vec<SimulationEvent>,
    ) {
        let cfg = config();
        match attacker {
            Some(a) if Some(a) == self.owner => {
                self.set_angry(true);
                self.sitting = true;
                events.push(SimulationEvent::TriggerFired {
                    kind: TriggerKind::FamiliarSad,
                    target: a,
                });
            }
            Some(_) => {
                let dx = (rng.gen::<f32>() - 0.5) * 2.0 * cfg.panic_range_xz;
                let dy = (rng.gen::<f32>() - 0.5) * 2.0 * cfg.panic_range_y;
                let dz = (rng.gen::<f32>() - 0.5) * 2.0 * cfg.panic_range_xz;
                let to = BlockPos::from_world(self.position + Vec3::new(dx, dy, dz));
                self.teleport_to(Vec3::new(
                    to.x as f32 + 0.5,
                    to.y as f32,
                    to.z as f32 + 0.5,
                ));
                events.push(SimulationEvent::Teleported {
                    agent: self.id,
                    to: self.position,
                });
            }
            None => {}
        }
    }

    pub(crate) fn teleport_to(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.move_control.stop();
    }

    // === LIFECYCLE ===

    pub fn die(&mut self, world: &mut World, events: &mut Vec<SimulationEvent>) {
        self.alive = false;
        self.clear_light(world, events);
        tracing::debug!(agent = ?self.id, "familiar died");
        events.push(SimulationEvent::Died { agent: self.id });
    }

    /// Despawn cleanup; must never leave a marker behind
    pub fn on_remove(&mut self, world: &mut World, events: &mut Vec<SimulationEvent>) {
        self.clear_light(world, events);
    }

    /// Leaving the dimension drops all world-placed state
    pub fn on_dimension_change(&mut self, world: &mut World, events: &mut Vec<SimulationEvent>) {
        self.clear_light(world, events);
    }

    // === PHYSICS ===

    /// Integrate velocity and forward thrust into position
    pub(crate) fn apply_kinematics(&mut self, world: &World) {
        let cfg = config();
        let input = self.move_control.forward_input();
        if input.abs() > f32::EPSILON {
            let heading = (self.yaw + 90.0).to_radians();
            let dir = Vec3::new(heading.cos(), 0.0, heading.sin());
            self.velocity += dir * input * cfg.forward_scale;
        }
        self.position += self.velocity;
        let drag = if self.is_submerged(world) {
            cfg.water_drag
        } else {
            cfg.ground_drag
        };
        self.velocity *= drag;
    }

    // === PERSISTENCE ===

    pub fn save(&self) -> FamiliarSaveData {
        FamiliarSaveData {
            has_hat: self.has_hat(),
            has_trunk: self.has_trunk(),
            is_angry: self.is_angry(),
            light_upgrade: self.light_upgrade,
            light_pos: self.light.current,
            light_pos_prev: self.light.previous,
        }
    }

    /// Restore persisted fields. Goes through the flag setters so observers
    /// get the restored values on the next sync.
    pub fn load(&mut self, data: FamiliarSaveData) {
        self.set_hat(data.has_hat);
        self.set_trunk(data.has_trunk);
        self.set_angry(data.is_angry);
        self.light_upgrade = data.light_upgrade;
        self.light.current = data.light_pos;
        self.light.previous = data.light_pos_prev;
    }
}

/// Persisted familiar state; absent keys deserialize to defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamiliarSaveData {
    #[serde(default)]
    pub has_hat: bool,
    #[serde(default)]
    pub has_trunk: bool,
    #[serde(default)]
    pub is_angry: bool,
    #[serde(default)]
    pub light_upgrade: bool,
    #[serde(default)]
    pub light_pos: Option<BlockPos>,
    #[serde(default)]
    pub light_pos_prev: Option<BlockPos>,
}
