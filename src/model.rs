//! Per-unit move state: the waypoint queue a unit is actually walking.
//!
//! Grounded on the original's `MOVE_CONTROL.asPath` handling —
//! `fpathAppendRoute` (append waypoints, capped at `TRAVEL_SIZE`),
//! `fpathSetDirectRoute` (collapse to a single straight-line waypoint,
//! idempotent when already routed directly to the same destination), and
//! `fpathRouteCloser` (squared-distance comparison used to prefer whichever
//! of two "nearest point" results actually got closer to the goal).

use crate::tile::{Tile, TileScale, WorldPos};

/// A unit's queued waypoints, capped at `travel_size`, plus the
/// world-coordinate destination those waypoints lead to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveControlBlock {
    waypoints: Vec<Tile>,
    capacity: usize,
    destination: WorldPos,
}

impl MoveControlBlock {
    pub fn new(capacity: usize) -> Self {
        Self {
            waypoints: Vec::new(),
            capacity,
            destination: WorldPos::default(),
        }
    }

    pub fn waypoints(&self) -> &[Tile] {
        &self.waypoints
    }

    pub fn destination(&self) -> WorldPos {
        self.destination
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    /// Appends `tiles`, silently dropping whatever doesn't fit in the
    /// remaining capacity — mirrors `fpathAppendRoute`'s `TRAVEL_SIZE`
    /// clamp rather than erroring, since a full queue is a routine
    /// occurrence, not a programmer mistake. Updates `destination` to the
    /// route's final tile centre whenever at least one tile was queued.
    pub fn append_route(&mut self, scale: TileScale, tiles: impl IntoIterator<Item = Tile>) {
        for tile in tiles {
            if self.waypoints.len() >= self.capacity {
                break;
            }
            self.waypoints.push(tile);
        }
        if let Some(&last) = self.waypoints.last() {
            self.destination = scale.tile_centre(last);
        }
    }

    /// Collapses the queue to a single waypoint: a straight line to
    /// `goal`. A no-op if the queue is already exactly that — matching
    /// the original's check before it throws away an in-progress route.
    pub fn set_direct_route(&mut self, scale: TileScale, goal: Tile) {
        let destination = scale.tile_centre(goal);
        if self.waypoints.len() == 1 && self.waypoints[0] == goal && self.destination == destination {
            return;
        }
        self.waypoints.clear();
        self.waypoints.push(goal);
        self.destination = destination;
    }

    pub fn final_waypoint(&self) -> Option<Tile> {
        self.waypoints.last().copied()
    }
}

/// True if `candidate_final` ended up strictly closer to `raw_target` than
/// `current_last` did — used whenever the planner must choose between the
/// waypoints already emitted and a newly-searched suffix that only reached
/// a "nearest reachable point".
pub fn route_is_closer(current_last: WorldPos, candidate_final: WorldPos, raw_target: WorldPos) -> bool {
    candidate_final.dist_sq(raw_target) < current_last.dist_sq(raw_target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_route_stops_at_capacity() {
        let scale = TileScale::new(128);
        let mut block = MoveControlBlock::new(2);
        block.append_route(scale, [Tile::new(0, 0), Tile::new(1, 1), Tile::new(2, 2)]);
        assert_eq!(block.waypoints(), &[Tile::new(0, 0), Tile::new(1, 1)]);
        assert_eq!(block.destination(), scale.tile_centre(Tile::new(1, 1)));
    }

    #[test]
    fn set_direct_route_is_idempotent() {
        let scale = TileScale::new(128);
        let mut block = MoveControlBlock::new(8);
        block.set_direct_route(scale, Tile::new(5, 5));
        block.append_route(scale, [Tile::new(9, 9)]);
        // already routed directly to (5, 5) plus an extra waypoint appended
        assert_eq!(block.waypoints().len(), 2);
        block.set_direct_route(scale, Tile::new(9, 9));
        assert_eq!(block.waypoints(), &[Tile::new(9, 9)]);
        let before = block.clone();
        block.set_direct_route(scale, Tile::new(9, 9));
        assert_eq!(block, before);
    }

    #[test]
    fn route_is_closer_compares_squared_distance_to_target() {
        let target = WorldPos::new(0, 0);
        let near = WorldPos::new(1, 0);
        let far = WorldPos::new(10, 0);
        assert!(route_is_closer(far, near, target));
        assert!(!route_is_closer(near, far, target));
    }
}
