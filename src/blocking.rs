//! Per-propulsion blocking predicates.
//!
//! The original installs one of `fpathGroundBlockingTile`,
//! `fpathHoverBlockingTile`, `fpathLiftBlockingTile`, or
//! `fpathLiftSlideBlockingTile` as a global function pointer before each
//! search and relies on every call site remembering which one is live.
//! REDESIGN FLAGS §9 calls this out as exactly the kind of hidden state
//! this rewrite should not reproduce: `is_blocking(...)` below takes the
//! propulsion class as an explicit argument, so a search can never run
//! with a stale predicate installed by whatever ran before it.

use crate::collaborators::{MapView, PropulsionClass, TerrainType, TileInfo};
use crate::overlay::Overlay;
use crate::tile::Tile;

/// True if `tile` blocks movement for `propulsion`, given `map`.
///
/// Ground and hover units additionally treat anything outside the current
/// scroll bounds as blocked (`fpathGroundBlockingTile`/`...Hover...` both
/// short-circuit on the off-map check before looking at tile contents);
/// VTOL propulsion does not, since it can fly over terrain the ground
/// layer doesn't model.
pub fn is_blocking(map: &impl MapView, propulsion: PropulsionClass, tile: Tile) -> bool {
    match propulsion {
        PropulsionClass::Ground => ground_blocking(map, tile),
        PropulsionClass::Hover => hover_blocking(map, tile),
        PropulsionClass::Lift => lift_blocking(map, tile),
        PropulsionClass::LiftSlide => lift_slide_blocking(map, tile),
    }
}

fn off_scroll_bounds(map: &impl MapView, tile: Tile) -> bool {
    let (x0, y0, x1, y1) = map.scroll_bounds();
    tile.x < x0 || tile.y < y0 || tile.x >= x1 || tile.y >= y1
}

fn structure_blocks(info: TileInfo) -> bool {
    info.occupied && !info.not_blocking_override
}

fn ground_blocking(map: &impl MapView, tile: Tile) -> bool {
    if off_scroll_bounds(map, tile) {
        return true;
    }
    let info = map.tile_info(tile);
    structure_blocks(info) || matches!(info.terrain, TerrainType::Water | TerrainType::CliffFace)
}

fn hover_blocking(map: &impl MapView, tile: Tile) -> bool {
    if off_scroll_bounds(map, tile) {
        return true;
    }
    let info = map.tile_info(tile);
    structure_blocks(info) || matches!(info.terrain, TerrainType::CliffFace)
}

fn lift_blocking(map: &impl MapView, tile: Tile) -> bool {
    if !map.tile_on_map(tile) {
        return true;
    }
    let info = map.tile_info(tile);
    info.tall_structure
}

fn lift_slide_blocking(map: &impl MapView, tile: Tile) -> bool {
    // Lift-slide exists for map-edge sliding only: no terrain or structure
    // check, just the off-map margin.
    !map.tile_on_map(tile)
}

/// Query helpers matching §6: one named predicate per propulsion class,
/// each a pure function of the map view and (where relevant) the
/// in-flight search's overlay. Ground and hover searches are funneled by
/// the gateway overlay; lift and lift-slide fly over it.
pub fn ground_blocking_tile(map: &impl MapView, overlay: &Overlay, tile: Tile) -> bool {
    ground_blocking(map, tile) || overlay.is_blocked(tile)
}

pub fn hover_blocking_tile(map: &impl MapView, overlay: &Overlay, tile: Tile) -> bool {
    hover_blocking(map, tile) || overlay.is_blocked(tile)
}

pub fn lift_blocking_tile(map: &impl MapView, tile: Tile) -> bool {
    lift_blocking(map, tile)
}

pub fn lift_slide_blocking_tile(map: &impl MapView, tile: Tile) -> bool {
    lift_slide_blocking(map, tile)
}

/// Dispatches to the right query helper, threading the overlay through
/// only where it applies.
pub fn is_blocking_for_search(
    map: &impl MapView,
    overlay: &Overlay,
    propulsion: PropulsionClass,
    tile: Tile,
) -> bool {
    match propulsion {
        PropulsionClass::Ground => ground_blocking_tile(map, overlay, tile),
        PropulsionClass::Hover => hover_blocking_tile(map, overlay, tile),
        PropulsionClass::Lift => lift_blocking_tile(map, tile),
        PropulsionClass::LiftSlide => lift_slide_blocking_tile(map, tile),
    }
}
