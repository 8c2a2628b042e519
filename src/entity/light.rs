//! Light-marker trail: a transient light cell that follows the agent
//!
//! The world holds at most one marker per slot; the two slots form a
//! one-update lag trail so the old marker disappears exactly when the new
//! one appears. The three-slot shift (remove oldest, promote current to
//! previous, place new current) is explicit.

use crate::core::config::config;
use crate::core::types::BlockPos;
use crate::entity::familiar::FamiliarAgent;
use crate::sim::tick::SimulationEvent;
use crate::world::World;

/// Trailing pair of light-marker positions plus the update countdown
#[derive(Debug, Clone, Default)]
pub struct LightTrail {
    pub current: Option<BlockPos>,
    pub previous: Option<BlockPos>,
    timer: i32,
}

impl LightTrail {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FamiliarAgent {
    /// Countdown to the next trail update; runs on the authoritative side
    pub(crate) fn tick_light(&mut self, world: &mut World, events: &mut Vec<SimulationEvent>) {
        self.light.timer -= 1;
        if self.light.timer < 0 {
            self.light.timer = config().light_update_interval;
            if self.light.current.is_none() {
                self.light.current = Some(self.block_pos());
            }
            self.update_light(world, events);
        }
    }

    fn update_light(&mut self, world: &mut World, events: &mut Vec<SimulationEvent>) {
        // 1. Remove the oldest marker and clear its slot.
        if let Some(oldest) = self.light.previous.take() {
            remove_marker(world, oldest, events);
        }

        // 2. Promote current to previous if the agent moved cells.
        let here = self.block_pos();
        if self.light.current != Some(here) {
            self.light.previous = self.light.current;
            self.light.current = Some(here);
        }

        // 3. Place the new current marker.
        if world.is_empty_block(here) && self.alive && self.has_light_upgrade() {
            if world.place_light_marker(here) {
                events.push(SimulationEvent::MarkerPlaced {
                    agent: self.id,
                    pos: here,
                });
            }
        }
    }

    /// Remove both markers and clear both slots. Runs on death, removal,
    /// and dimension change; a marker surviving past this is a leak.
    pub(crate) fn clear_light(&mut self, world: &mut World, events: &mut Vec<SimulationEvent>) {
        if let Some(pos) = self.light.current.take() {
            remove_marker(world, pos, events);
        }
        if let Some(pos) = self.light.previous.take() {
            remove_marker(world, pos, events);
        }
    }
}

fn remove_marker(world: &mut World, pos: BlockPos, events: &mut Vec<SimulationEvent>) {
    if world.remove_light_marker(pos) {
        events.push(SimulationEvent::MarkerRemoved { pos });
    }
}
