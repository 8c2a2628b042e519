//! Sparse hash grid for efficient spatial queries

use crate::core::types::EntityId;
use ahash::AHashMap;
use glam::Vec3;

/// Sparse hash grid for O(1) neighbor queries in 3D
pub struct SparseHashGrid {
    cell_size: f32,
    cells: AHashMap<(i32, i32, i32), Vec<EntityId>>,
}

impl SparseHashGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec3) -> (i32, i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
            (pos.z / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, entity: EntityId, pos: Vec3) {
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push(entity);
    }

    pub fn remove(&mut self, entity: EntityId, pos: Vec3) {
        let coord = self.cell_coord(pos);
        if let Some(cell) = self.cells.get_mut(&coord) {
            cell.retain(|&e| e != entity);
        }
    }

    /// Move an entity between cells, cheap no-op when the cell is unchanged
    pub fn relocate(&mut self, entity: EntityId, from: Vec3, to: Vec3) {
        if self.cell_coord(from) == self.cell_coord(to) {
            return;
        }
        self.remove(entity, from);
        self.insert(entity, to);
    }

    /// Candidate entities for any query within `radius` of `center`
    ///
    /// Scans every cell overlapping the cube of half-extent `radius`;
    /// callers still need an exact distance/box filter on the results.
    pub fn query_candidates(&self, center: Vec3, radius: f32) -> impl Iterator<Item = EntityId> + '_ {
        let (min_x, min_y, min_z) = self.cell_coord(center - Vec3::splat(radius));
        let (max_x, max_y, max_z) = self.cell_coord(center + Vec3::splat(radius));

        (min_x..=max_x).flat_map(move |x| {
            (min_y..=max_y).flat_map(move |y| {
                (min_z..=max_z).flat_map(move |z| {
                    self.cells.get(&(x, y, z)).into_iter().flatten().copied()
                })
            })
        })
    }

    /// Rebuild grid from positions
    pub fn rebuild(&mut self, entities: impl Iterator<Item = (EntityId, Vec3)>) {
        self.clear();
        for (entity, pos) in entities {
            self.insert(entity, pos);
        }
    }
}
