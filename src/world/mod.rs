//! World state: block cells, registered entities, spatial queries
//!
//! The world is deliberately thin. Familiar agents live in the simulation;
//! the registry here holds the entities familiars interact with (owners,
//! gift targets) plus the sparse block grid the light markers mutate.

use crate::core::config::config;
use crate::core::types::{BlockPos, EntityId, EntityKind};
use crate::spatial::SparseHashGrid;
use ahash::AHashMap;
use glam::Vec3;

/// Contents of a single block cell. Unset cells are air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    #[default]
    Air,
    Water,
    Solid,
    /// Transient light source trailing a familiar
    LightMarker,
}

/// Registry record for a non-familiar entity
#[derive(Debug, Clone)]
pub struct WorldEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec3,
}

/// The world: sparse block cells plus an entity registry
pub struct World {
    blocks: AHashMap<BlockPos, Block>,
    entities: AHashMap<EntityId, WorldEntity>,
    grid: SparseHashGrid,
}

impl World {
    pub fn new() -> Self {
        Self {
            blocks: AHashMap::new(),
            entities: AHashMap::new(),
            grid: SparseHashGrid::new(config().grid_cell_size),
        }
    }

    // === BLOCKS ===

    pub fn block_at(&self, pos: BlockPos) -> Block {
        self.blocks.get(&pos).copied().unwrap_or_default()
    }

    pub fn set_block(&mut self, pos: BlockPos, block: Block) {
        if block == Block::Air {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block);
        }
    }

    /// Fill an axis-aligned box of cells (inclusive bounds)
    pub fn fill(&mut self, min: BlockPos, max: BlockPos, block: Block) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.set_block(BlockPos::new(x, y, z), block);
                }
            }
        }
    }

    pub fn is_empty_block(&self, pos: BlockPos) -> bool {
        self.block_at(pos) == Block::Air
    }

    pub fn is_water_at(&self, pos: BlockPos) -> bool {
        self.block_at(pos) == Block::Water
    }

    /// Whether a world-space position sits inside a water cell
    pub fn is_submerged(&self, pos: Vec3) -> bool {
        self.is_water_at(BlockPos::from_world(pos))
    }

    /// Place a light marker if the cell is empty. Returns whether a marker
    /// was actually placed.
    pub fn place_light_marker(&mut self, pos: BlockPos) -> bool {
        if self.is_empty_block(pos) {
            self.set_block(pos, Block::LightMarker);
            true
        } else {
            false
        }
    }

    /// Remove a light marker if one is present. Only markers are removed;
    /// anything else at the position is left alone.
    pub fn remove_light_marker(&mut self, pos: BlockPos) -> bool {
        if self.block_at(pos) == Block::LightMarker {
            self.set_block(pos, Block::Air);
            true
        } else {
            false
        }
    }

    /// Positions of every placed light marker (test/diagnostic aid)
    pub fn light_marker_positions(&self) -> Vec<BlockPos> {
        self.blocks
            .iter()
            .filter(|(_, b)| **b == Block::LightMarker)
            .map(|(pos, _)| *pos)
            .collect()
    }

    // === ENTITY REGISTRY ===

    pub fn insert_entity(&mut self, kind: EntityKind, position: Vec3) -> EntityId {
        let id = EntityId::new();
        self.grid.insert(id, position);
        self.entities.insert(id, WorldEntity { id, kind, position });
        id
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Option<WorldEntity> {
        let entity = self.entities.remove(&id)?;
        self.grid.remove(id, entity.position);
        Some(entity)
    }

    pub fn entity(&self, id: EntityId) -> Option<&WorldEntity> {
        self.entities.get(&id)
    }

    pub fn move_entity(&mut self, id: EntityId, position: Vec3) {
        if let Some(entity) = self.entities.get_mut(&id) {
            self.grid.relocate(id, entity.position, position);
            entity.position = position;
        }
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // === SPATIAL QUERIES ===

    /// Entities of a kind whose positions fall inside the axis-aligned box
    /// of half-extent `inflate` around `center` (bounding-box inflation
    /// semantics, not a sphere)
    pub fn entities_of_kind_within(
        &self,
        kind: EntityKind,
        center: Vec3,
        inflate: f32,
    ) -> Vec<EntityId> {
        self.grid
            .query_candidates(center, inflate)
            .filter(|id| {
                self.entities.get(id).is_some_and(|e| {
                    e.kind == kind
                        && (e.position.x - center.x).abs() <= inflate
                        && (e.position.y - center.y).abs() <= inflate
                        && (e.position.z - center.z).abs() <= inflate
                })
            })
            .collect()
    }

    /// Nearest entity of a kind within euclidean `range` of `center`
    pub fn nearest_of_kind(&self, kind: EntityKind, center: Vec3, range: f32) -> Option<EntityId> {
        self.grid
            .query_candidates(center, range)
            .filter_map(|id| self.entities.get(&id))
            .filter(|e| e.kind == kind && e.position.distance(center) <= range)
            .min_by(|a, b| {
                a.position
                    .distance_squared(center)
                    .total_cmp(&b.position.distance_squared(center))
            })
            .map(|e| e.id)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_cells_are_air() {
        let world = World::new();
        assert_eq!(world.block_at(BlockPos::new(5, 5, 5)), Block::Air);
        assert!(world.is_empty_block(BlockPos::new(5, 5, 5)));
    }

    #[test]
    fn test_fill_water_and_submersion() {
        let mut world = World::new();
        world.fill(BlockPos::new(0, 0, 0), BlockPos::new(3, 3, 3), Block::Water);
        assert!(world.is_water_at(BlockPos::new(2, 1, 3)));
        assert!(world.is_submerged(Vec3::new(2.5, 1.5, 3.5)));
        assert!(!world.is_submerged(Vec3::new(10.0, 1.0, 1.0)));
    }

    #[test]
    fn test_light_marker_placement_requires_air() {
        let mut world = World::new();
        let pos = BlockPos::new(0, 0, 0);
        world.set_block(pos, Block::Water);
        assert!(!world.place_light_marker(pos));

        let empty = BlockPos::new(1, 0, 0);
        assert!(world.place_light_marker(empty));
        assert_eq!(world.block_at(empty), Block::LightMarker);
        // Second placement is a no-op
        assert!(!world.place_light_marker(empty));
    }

    #[test]
    fn test_light_marker_removal_leaves_other_blocks() {
        let mut world = World::new();
        let pos = BlockPos::new(0, 0, 0);
        world.set_block(pos, Block::Solid);
        assert!(!world.remove_light_marker(pos));
        assert_eq!(world.block_at(pos), Block::Solid);

        let marker = BlockPos::new(1, 0, 0);
        world.place_light_marker(marker);
        assert!(world.remove_light_marker(marker));
        assert!(world.is_empty_block(marker));
    }

    #[test]
    fn test_box_query_finds_only_kind_in_box() {
        let mut world = World::new();
        let devil = world.insert_entity(EntityKind::DevilFamiliar, Vec3::new(3.0, 0.0, 0.0));
        let player = world.insert_entity(EntityKind::Player, Vec3::new(2.0, 0.0, 0.0));
        let far_devil = world.insert_entity(EntityKind::DevilFamiliar, Vec3::new(9.0, 0.0, 0.0));

        let found = world.entities_of_kind_within(EntityKind::DevilFamiliar, Vec3::ZERO, 4.0);
        assert_eq!(found, vec![devil]);
        assert!(!found.contains(&player));
        assert!(!found.contains(&far_devil));
    }

    #[test]
    fn test_box_query_is_a_box_not_a_sphere() {
        let mut world = World::new();
        // Corner of the box: euclidean distance ~6.9 but inside the box
        let corner = world.insert_entity(
            EntityKind::DevilFamiliar,
            Vec3::new(4.0, 4.0, 4.0) * 0.99,
        );
        let found = world.entities_of_kind_within(EntityKind::DevilFamiliar, Vec3::ZERO, 4.0);
        assert!(found.contains(&corner));
    }

    #[test]
    fn test_nearest_of_kind() {
        let mut world = World::new();
        let near = world.insert_entity(EntityKind::Player, Vec3::new(2.0, 0.0, 0.0));
        let _far = world.insert_entity(EntityKind::Player, Vec3::new(6.0, 0.0, 0.0));
        let _out = world.insert_entity(EntityKind::Player, Vec3::new(50.0, 0.0, 0.0));

        assert_eq!(
            world.nearest_of_kind(EntityKind::Player, Vec3::ZERO, 8.0),
            Some(near)
        );
    }

    #[test]
    fn test_move_entity_updates_queries() {
        let mut world = World::new();
        let devil = world.insert_entity(EntityKind::DevilFamiliar, Vec3::new(50.0, 0.0, 0.0));
        assert!(world
            .entities_of_kind_within(EntityKind::DevilFamiliar, Vec3::ZERO, 4.0)
            .is_empty());

        world.move_entity(devil, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(
            world.entities_of_kind_within(EntityKind::DevilFamiliar, Vec3::ZERO, 4.0),
            vec![devil]
        );
    }
}
