//! Broad-phase spatial index
//!
//! A uniform grid over the screen holding every collidable shape (player,
//! meteors, lasers). Queries walk only the cells a shape overlaps, so the
//! per-tick collision sweep stays O(shapes in cell) rather than pairwise.
//!
//! Handles are generation-checked: a slot freed by `remove` can be reused,
//! but an old handle into it is rejected. Stale handles are a programmer
//! error and assert in debug builds; release builds no-op.

use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::entity::MeteorSize;

/// Grid cell edge in pixels.
const CELL_SIZE: f32 = 80.0;

/// What kind of entity a collider belongs to, matched exhaustively at each
/// collision site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderKind {
    Player,
    Meteor(MeteorSize),
    Laser,
}

/// Collision shape. Circles for the player and meteors, segments for laser
/// beams.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Segment { a: Vec2, b: Vec2 },
}

impl Shape {
    fn aabb(&self) -> (Vec2, Vec2) {
        match *self {
            Shape::Circle { center, radius } => {
                (center - Vec2::splat(radius), center + Vec2::splat(radius))
            }
            Shape::Segment { a, b } => (a.min(b), a.max(b)),
        }
    }
}

/// Generation-checked handle to a collider slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle {
    index: u32,
    generation: u32,
}

struct Slot {
    generation: u32,
    occupied: bool,
    shape: Shape,
    kind: ColliderKind,
}

/// The broad-phase grid.
pub struct SpatialGrid {
    cols: usize,
    rows: usize,
    cells: Vec<Vec<ColliderHandle>>,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialGrid {
    pub fn new() -> Self {
        let cols = (SCREEN_WIDTH / CELL_SIZE).ceil() as usize;
        let rows = (SCREEN_HEIGHT / CELL_SIZE).ceil() as usize;
        Self {
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Register a shape, returning its handle.
    pub fn insert(&mut self, shape: Shape, kind: ColliderKind) -> ColliderHandle {
        debug_assert!(shape_is_finite(&shape), "collider shape must be finite");
        let index = match self.free.pop() {
            Some(i) => i,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    occupied: false,
                    shape,
                    kind,
                });
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.occupied = true;
        slot.shape = shape;
        slot.kind = kind;
        let handle = ColliderHandle {
            index,
            generation: slot.generation,
        };
        self.link_cells(handle);
        handle
    }

    /// Remove a shape. Stale or double-removed handles assert in debug
    /// builds and are ignored in release.
    pub fn remove(&mut self, handle: ColliderHandle) {
        if !self.is_live(handle) {
            debug_assert!(false, "remove on stale collider handle");
            return;
        }
        self.unlink_cells(handle);
        let slot = &mut self.slots[handle.index as usize];
        slot.occupied = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
    }

    /// Drop every registered shape.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.occupied {
                slot.occupied = false;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(i as u32);
            }
        }
    }

    /// Move a circle collider to a new center.
    pub fn set_position(&mut self, handle: ColliderHandle, center: Vec2) {
        if !self.is_live(handle) {
            debug_assert!(false, "set_position on stale collider handle");
            return;
        }
        let radius = match self.slots[handle.index as usize].shape {
            Shape::Circle { radius, .. } => radius,
            Shape::Segment { .. } => {
                debug_assert!(false, "set_position on a segment collider");
                return;
            }
        };
        self.unlink_cells(handle);
        self.slots[handle.index as usize].shape = Shape::Circle { center, radius };
        self.link_cells(handle);
    }

    /// Move a segment collider to new endpoints.
    pub fn set_segment(&mut self, handle: ColliderHandle, a: Vec2, b: Vec2) {
        if !self.is_live(handle) {
            debug_assert!(false, "set_segment on stale collider handle");
            return;
        }
        self.unlink_cells(handle);
        self.slots[handle.index as usize].shape = Shape::Segment { a, b };
        self.link_cells(handle);
    }

    pub fn is_live(&self, handle: ColliderHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|s| s.occupied && s.generation == handle.generation)
    }

    pub fn kind(&self, handle: ColliderHandle) -> Option<ColliderKind> {
        if self.is_live(handle) {
            Some(self.slots[handle.index as usize].kind)
        } else {
            None
        }
    }

    /// All live colliders intersecting the given one, from the cells it
    /// overlaps. No ordering guarantee among the results.
    pub fn intersections(&self, handle: ColliderHandle) -> Vec<(ColliderHandle, ColliderKind)> {
        if !self.is_live(handle) {
            debug_assert!(false, "intersections on stale collider handle");
            return Vec::new();
        }
        let shape = self.slots[handle.index as usize].shape;
        let mut seen = Vec::new();
        let mut hits = Vec::new();
        for cell in self.cell_range(&shape) {
            for &other in &self.cells[cell] {
                if other == handle || seen.contains(&other) {
                    continue;
                }
                seen.push(other);
                if !self.is_live(other) {
                    continue;
                }
                let other_slot = &self.slots[other.index as usize];
                if shapes_intersect(&shape, &other_slot.shape) {
                    hits.push((other, other_slot.kind));
                }
            }
        }
        hits
    }

    /// Whether two specific colliders currently intersect.
    pub fn pair_intersects(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        if !self.is_live(a) || !self.is_live(b) {
            return false;
        }
        shapes_intersect(
            &self.slots[a.index as usize].shape,
            &self.slots[b.index as usize].shape,
        )
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.occupied).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn link_cells(&mut self, handle: ColliderHandle) {
        let shape = self.slots[handle.index as usize].shape;
        for cell in self.cell_range(&shape) {
            self.cells[cell].push(handle);
        }
    }

    fn unlink_cells(&mut self, handle: ColliderHandle) {
        let shape = self.slots[handle.index as usize].shape;
        for cell in self.cell_range(&shape) {
            self.cells[cell].retain(|&h| h != handle);
        }
    }

    /// Indices of the cells a shape's AABB overlaps. Shapes can sit outside
    /// the screen (meteors spawn on a ring past the edges); those clamp to
    /// the border cells so they stay queryable.
    fn cell_range(&self, shape: &Shape) -> impl Iterator<Item = usize> + use<> {
        let (min, max) = shape.aabb();
        let x0 = ((min.x / CELL_SIZE).floor() as i64).clamp(0, self.cols as i64 - 1) as usize;
        let x1 = ((max.x / CELL_SIZE).floor() as i64).clamp(0, self.cols as i64 - 1) as usize;
        let y0 = ((min.y / CELL_SIZE).floor() as i64).clamp(0, self.rows as i64 - 1) as usize;
        let y1 = ((max.y / CELL_SIZE).floor() as i64).clamp(0, self.rows as i64 - 1) as usize;
        let cols = self.cols;
        (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| y * cols + x))
    }
}

/// Circle-circle overlap test.
pub fn circle_circle(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    c1.distance_squared(c2) <= (r1 + r2) * (r1 + r2)
}

/// Circle-segment overlap test (closest point on segment to circle center).
pub fn circle_segment(center: Vec2, radius: f32, a: Vec2, b: Vec2) -> bool {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let closest = if len_sq < 1e-6 {
        a
    } else {
        let t = ((center - a).dot(ab) / len_sq).clamp(0.0, 1.0);
        a + ab * t
    };
    center.distance_squared(closest) <= radius * radius
}

fn shapes_intersect(a: &Shape, b: &Shape) -> bool {
    match (*a, *b) {
        (
            Shape::Circle {
                center: c1,
                radius: r1,
            },
            Shape::Circle {
                center: c2,
                radius: r2,
            },
        ) => circle_circle(c1, r1, c2, r2),
        (Shape::Circle { center, radius }, Shape::Segment { a, b })
        | (Shape::Segment { a, b }, Shape::Circle { center, radius }) => {
            circle_segment(center, radius, a, b)
        }
        // Laser-laser pairs never matter to gameplay.
        (Shape::Segment { .. }, Shape::Segment { .. }) => false,
    }
}

fn shape_is_finite(shape: &Shape) -> bool {
    match *shape {
        Shape::Circle { center, radius } => center.is_finite() && radius.is_finite() && radius > 0.0,
        Shape::Segment { a, b } => a.is_finite() && b.is_finite(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(x: f32, y: f32, r: f32) -> Shape {
        Shape::Circle {
            center: Vec2::new(x, y),
            radius: r,
        }
    }

    #[test]
    fn circle_circle_overlap() {
        assert!(circle_circle(
            Vec2::new(0.0, 0.0),
            10.0,
            Vec2::new(15.0, 0.0),
            10.0
        ));
        assert!(!circle_circle(
            Vec2::new(0.0, 0.0),
            10.0,
            Vec2::new(25.0, 0.0),
            10.0
        ));
    }

    #[test]
    fn circle_segment_overlap() {
        // Segment passing beside the circle
        assert!(circle_segment(
            Vec2::new(100.0, 100.0),
            10.0,
            Vec2::new(0.0, 105.0),
            Vec2::new(200.0, 105.0)
        ));
        assert!(!circle_segment(
            Vec2::new(100.0, 100.0),
            10.0,
            Vec2::new(0.0, 120.0),
            Vec2::new(200.0, 120.0)
        ));
    }

    #[test]
    fn query_finds_overlapping_neighbors() {
        let mut grid = SpatialGrid::new();
        let a = grid.insert(circle(100.0, 100.0, 30.0), ColliderKind::Player);
        let b = grid.insert(
            circle(140.0, 100.0, 30.0),
            ColliderKind::Meteor(MeteorSize::Large),
        );
        let _far = grid.insert(
            circle(1000.0, 600.0, 30.0),
            ColliderKind::Meteor(MeteorSize::Small),
        );

        let hits = grid.intersections(a);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, b);
        assert_eq!(hits[0].1, ColliderKind::Meteor(MeteorSize::Large));
    }

    #[test]
    fn pair_test_matches_shape_overlap() {
        let mut grid = SpatialGrid::new();
        let player = grid.insert(circle(640.0, 360.0, 20.0), ColliderKind::Player);
        let near = grid.insert(
            circle(660.0, 360.0, 25.0),
            ColliderKind::Meteor(MeteorSize::Small),
        );
        let far = grid.insert(
            circle(100.0, 100.0, 25.0),
            ColliderKind::Meteor(MeteorSize::Small),
        );
        assert!(grid.pair_intersects(player, near));
        assert!(!grid.pair_intersects(player, far));
        grid.remove(near);
        assert!(!grid.pair_intersects(player, near));
    }

    #[test]
    fn removed_handle_is_not_queryable() {
        let mut grid = SpatialGrid::new();
        let a = grid.insert(circle(100.0, 100.0, 30.0), ColliderKind::Player);
        let b = grid.insert(
            circle(120.0, 100.0, 30.0),
            ColliderKind::Meteor(MeteorSize::Large),
        );
        grid.remove(b);
        assert!(grid.intersections(a).is_empty());
        assert!(!grid.is_live(b));
    }

    #[test]
    fn generation_check_rejects_reused_slot() {
        let mut grid = SpatialGrid::new();
        let a = grid.insert(circle(100.0, 100.0, 30.0), ColliderKind::Laser);
        grid.remove(a);
        let b = grid.insert(circle(100.0, 100.0, 30.0), ColliderKind::Laser);
        // b reuses a's slot but carries a new generation
        assert!(!grid.is_live(a));
        assert!(grid.is_live(b));
    }

    #[test]
    fn moving_a_collider_moves_its_cells() {
        let mut grid = SpatialGrid::new();
        let a = grid.insert(circle(100.0, 100.0, 20.0), ColliderKind::Player);
        let b = grid.insert(
            circle(1100.0, 600.0, 20.0),
            ColliderKind::Meteor(MeteorSize::Large),
        );
        assert!(grid.intersections(a).is_empty());
        grid.set_position(b, Vec2::new(110.0, 100.0));
        assert_eq!(grid.intersections(a).len(), 1);
    }

    #[test]
    fn off_screen_shapes_clamp_to_border_cells() {
        let mut grid = SpatialGrid::new();
        // Meteor on the spawn ring, far outside the screen
        let m = grid.insert(
            circle(-400.0, -300.0, 50.0),
            ColliderKind::Meteor(MeteorSize::Large),
        );
        let p = grid.insert(circle(-380.0, -280.0, 20.0), ColliderKind::Player);
        assert_eq!(grid.intersections(m).len(), 1);
        let _ = p;
    }

    #[test]
    fn clear_empties_the_grid() {
        let mut grid = SpatialGrid::new();
        grid.insert(circle(100.0, 100.0, 30.0), ColliderKind::Player);
        grid.insert(
            circle(200.0, 100.0, 30.0),
            ColliderKind::Meteor(MeteorSize::Small),
        );
        grid.clear();
        assert!(grid.is_empty());
    }
}
