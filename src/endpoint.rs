//! Endpoint repair: what to do when the start or the goal tile of a
//! requested route is itself blocked.
//!
//! Grounded on `fpathEndPointCallback`'s two jobs in the original: walking
//! an outward neighbor search to relocate a blocked start onto the
//! nearest clear tile, and raycasting toward a blocked goal to find the
//! last clear tile along the way in (`clearX`/`clearY`, `obstruction`).

use crate::collaborators::{MapView, PropulsionClass, RayCaster};
use crate::tile::Tile;

/// Perimeter offsets of the Chebyshev ring at distance `r`, enumerated
/// S, SW, W, NW, N, NE, E, SE (and the straight stretches between those
/// eight compass points) — a fixed order so two equally-clear tiles at
/// the same ring always resolve to the same winner.
fn ring_offsets(r: i32) -> Vec<(i32, i32)> {
    if r == 0 {
        return vec![(0, 0)];
    }
    let mut offsets = Vec::with_capacity((8 * r) as usize);
    for dx in 0..=r {
        offsets.push((-dx, r));
    }
    for dy in (-r..r).rev() {
        offsets.push((-r, dy));
    }
    for dx in (-r + 1)..=r {
        offsets.push((dx, -r));
    }
    for dy in (-r + 1)..=r {
        offsets.push((r, dy));
    }
    for dx in (1..r).rev() {
        offsets.push((dx, r));
    }
    offsets
}

/// Searches outward from `start` for the nearest non-blocked tile,
/// ring by ring, up to `max_radius`. Returns `start` unchanged if it is
/// already clear, and `None` if no clear tile exists within range.
pub fn repair_start(
    map: &impl MapView,
    propulsion: PropulsionClass,
    start: Tile,
    max_radius: i32,
) -> Option<Tile> {
    if !crate::blocking::is_blocking(map, propulsion, start) {
        return Some(start);
    }

    for radius in 1..=max_radius {
        let mut best: Option<(Tile, i64)> = None;
        for (dx, dy) in ring_offsets(radius) {
            let tile = Tile::new(start.x + dx, start.y + dy);
            if !map.tile_on_map(tile) || crate::blocking::is_blocking(map, propulsion, tile) {
                continue;
            }
            let dist_sq = (dx as i64) * (dx as i64) + (dy as i64) * (dy as i64);
            if best.map_or(true, |(_, best_dist)| dist_sq < best_dist) {
                best = Some((tile, dist_sq));
            }
        }
        if let Some((tile, _)) = best {
            return Some(tile);
        }
    }
    None
}

/// Raycasts from `start` toward `goal` and returns the last tile along
/// the way that wasn't blocked, stopping at the first obstruction — the
/// "clear point" the original tracks in its raycast callback.
pub fn repair_target(
    raycaster: &impl RayCaster,
    map: &impl MapView,
    propulsion: PropulsionClass,
    start_tile: Tile,
    start: crate::tile::WorldPos,
    goal: crate::tile::WorldPos,
    max_len: i32,
) -> Tile {
    let mut clear = start_tile;
    for sample in raycaster.cast(start, goal, max_len) {
        if crate::blocking::is_blocking(map, propulsion, sample.tile) {
            break;
        }
        clear = sample.tile;
    }
    clear
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{RaySample, TerrainType, TileInfo};
    use crate::gateway::Zone;
    use crate::tile::WorldPos;

    struct BlockedSpot {
        dims: (i32, i32),
        blocked: Vec<Tile>,
    }

    impl MapView for BlockedSpot {
        fn dimensions(&self) -> (i32, i32) {
            self.dims
        }

        fn tile_info(&self, tile: Tile) -> TileInfo {
            TileInfo {
                terrain: TerrainType::Land,
                occupied: self.blocked.contains(&tile),
                not_blocking_override: false,
                tall_structure: false,
            }
        }

        fn zone_at(&self, _tile: Tile) -> Option<Zone> {
            None
        }
    }

    #[test]
    fn start_already_clear_is_returned_unchanged() {
        let map = BlockedSpot {
            dims: (10, 10),
            blocked: vec![],
        };
        assert_eq!(
            repair_start(&map, PropulsionClass::Ground, Tile::new(5, 5), 3),
            Some(Tile::new(5, 5))
        );
    }

    #[test]
    fn repair_start_finds_nearest_ring_tile() {
        let map = BlockedSpot {
            dims: (10, 10),
            blocked: vec![Tile::new(5, 5)],
        };
        let repaired = repair_start(&map, PropulsionClass::Ground, Tile::new(5, 5), 3).unwrap();
        let dx = (repaired.x - 5).abs();
        let dy = (repaired.y - 5).abs();
        assert_eq!(dx.max(dy), 1);
    }

    #[test]
    fn repair_start_gives_up_past_max_radius() {
        let mut blocked = vec![Tile::new(5, 5)];
        for r in 1..=2 {
            for (dx, dy) in ring_offsets(r) {
                blocked.push(Tile::new(5 + dx, 5 + dy));
            }
        }
        let map = BlockedSpot { dims: (20, 20), blocked };
        assert_eq!(repair_start(&map, PropulsionClass::Ground, Tile::new(5, 5), 2), None);
    }

    struct StraightRay;

    impl RayCaster for StraightRay {
        fn cast(&self, start: WorldPos, goal: WorldPos, _max_len: i32) -> Vec<RaySample> {
            let steps = 5;
            (0..=steps)
                .map(|i| {
                    let t = i as f64 / steps as f64;
                    let x = start.x + ((goal.x - start.x) as f64 * t) as i32;
                    let y = start.y + ((goal.y - start.y) as f64 * t) as i32;
                    let world = WorldPos::new(x, y);
                    RaySample {
                        world,
                        tile: Tile::new(x / 128, y / 128),
                    }
                })
                .collect()
        }
    }

    #[test]
    fn repair_target_stops_at_first_obstruction() {
        let map = BlockedSpot {
            dims: (10, 10),
            blocked: vec![Tile::new(3, 0)],
        };
        let clear = repair_target(
            &StraightRay,
            &map,
            PropulsionClass::Ground,
            Tile::new(0, 0),
            WorldPos::new(0, 0),
            WorldPos::new(640, 0),
            4096,
        );
        assert!(clear.x < 3);
    }
}
