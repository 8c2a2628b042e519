//! Core type definitions used throughout the codebase

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Kinds of entities tracked in the world registry
///
/// Familiar agents themselves live in the simulation, not the registry;
/// the registry holds the things familiars look for (owners and gift
/// targets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    DevilFamiliar,
}

/// Integer cell position in the block grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Cell containing a world-space position
    pub fn from_world(pos: Vec3) -> Self {
        Self {
            x: pos.x.floor() as i32,
            y: pos.y.floor() as i32,
            z: pos.z.floor() as i32,
        }
    }

    /// Cell center in world coordinates
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            self.x as f32 + 0.5,
            self.y as f32 + 0.5,
            self.z as f32 + 0.5,
        )
    }

    pub fn above(&self) -> Self {
        Self::new(self.x, self.y + 1, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_equality() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_eq!(a, a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_block_pos_from_world_floors() {
        let pos = BlockPos::from_world(Vec3::new(1.9, -0.1, 3.0));
        assert_eq!(pos, BlockPos::new(1, -1, 3));
    }

    #[test]
    fn test_block_pos_center() {
        let center = BlockPos::new(2, 0, -3).center();
        assert_eq!(center, Vec3::new(2.5, 0.5, -2.5));
    }

    #[test]
    fn test_block_pos_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<BlockPos, &str> = HashMap::new();
        map.insert(BlockPos::new(1, 2, 3), "marker");
        assert_eq!(map.get(&BlockPos::new(1, 2, 3)), Some(&"marker"));
    }
}
