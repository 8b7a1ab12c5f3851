//! Route-sharing: adopting the tail of a formation-mate's already-computed
//! route instead of paying for a fresh search.
//!
//! Grounded on `fpathFindFirstRoutePoint`/`fpathFindRoute`: a candidate
//! waypoint is only worth jumping onto if (a) it lies in the half of the
//! map the mover is actually heading toward — the dot-product test against
//! the mover-to-goal vector — and (b) the mover has unobstructed line of
//! sight to it, checked with the same raycaster the endpoint repair uses.

use crate::collaborators::{MapView, PropulsionClass, RayCaster};
use crate::tile::{Tile, TileScale, WorldPos};

/// Finds the earliest waypoint in `candidate` the mover can jump onto
/// directly, and returns the suffix from there to the end. `None` if no
/// waypoint in `candidate` passes both tests.
pub fn find_reusable_suffix(
    raycaster: &impl RayCaster,
    map: &impl MapView,
    propulsion: PropulsionClass,
    scale: TileScale,
    mover_pos: WorldPos,
    goal: WorldPos,
    candidate: &[Tile],
    max_len: i32,
) -> Option<Vec<Tile>> {
    let heading = goal.sub(mover_pos);
    if heading.dot(heading) == 0 {
        return None;
    }

    for (index, &waypoint) in candidate.iter().enumerate() {
        let waypoint_world = scale.tile_centre(waypoint);
        let to_waypoint = waypoint_world.sub(mover_pos);

        // Half-plane test: is this waypoint on the side of the mover the
        // mover is actually travelling toward?
        if heading.dot(to_waypoint) < 0 {
            continue;
        }

        if has_line_of_sight(raycaster, map, propulsion, mover_pos, waypoint_world, max_len) {
            return Some(candidate[index..].to_vec());
        }
    }
    None
}

fn has_line_of_sight(
    raycaster: &impl RayCaster,
    map: &impl MapView,
    propulsion: PropulsionClass,
    from: WorldPos,
    to: WorldPos,
    max_len: i32,
) -> bool {
    for sample in raycaster.cast(from, to, max_len) {
        if crate::blocking::is_blocking(map, propulsion, sample.tile) {
            return false;
        }
    }
    true
}
