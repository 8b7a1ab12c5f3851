//! Contracts for everything this crate treats as an external collaborator:
//! the grid map, the two outer A* searches, the raycaster, the formation
//! and unit registries, and the frame clock. None of these are implemented
//! here — the embedding engine supplies them. Modeling them as traits
//! (rather than linked-in globals, as the original does) makes the planner
//! re-entrant and lets tests substitute small in-memory fixtures.

use crate::gateway::{Gateway, GatewayChain, GatewayId, GwTerrainMask, Zone};
use crate::overlay::Overlay;
use crate::tile::{Tile, WorldPos};

/// Opaque handle to a mobile unit. The core never interprets this beyond
/// equality and hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(pub u64);

/// Opaque handle to a formation (a group of units moving together).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormationId(pub u64);

/// Locomotion type, selecting which blocking predicate and gateway-terrain
/// mask a search uses. Unlike the original's function pointer, this is a
/// plain enum threaded explicitly through every call — there is no global
/// "currently installed" predicate to leak or forget to restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropulsionClass {
    Ground,
    Hover,
    Lift,
    /// VTOL transiting between its cruise altitude and the ground — uses
    /// the same blocking rule as `Lift` but is additionally barred from
    /// the tiles directly around a gateway it isn't using, the way the
    /// original's `fpathLiftSlideBlockingTile` treats the approach slope.
    LiftSlide,
}

impl PropulsionClass {
    pub fn is_vtol(self) -> bool {
        matches!(self, PropulsionClass::Lift | PropulsionClass::LiftSlide)
    }

    pub fn gateway_terrain_mask(self) -> GwTerrainMask {
        match self {
            PropulsionClass::Ground => GwTerrainMask::LAND,
            PropulsionClass::Hover | PropulsionClass::Lift | PropulsionClass::LiftSlide => {
                GwTerrainMask::ALL
            }
        }
    }
}

/// Terrain classification of a single map tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainType {
    Land,
    Water,
    CliffFace,
}

/// Per-tile metadata the map container exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileInfo {
    pub terrain: TerrainType,
    pub occupied: bool,
    pub not_blocking_override: bool,
    pub tall_structure: bool,
}

/// The grid map container: tile metadata, bounds, and the gateway zone
/// each tile belongs to. Out of scope to implement; only the contract is
/// specified here.
pub trait MapView {
    /// Map width/height in tiles.
    fn dimensions(&self) -> (i32, i32);

    /// Scroll bounds used by the ground/hover off-map margin check; these
    /// may be tighter than the full map (e.g. during a cinematic scroll
    /// lock) and default to the full map otherwise.
    fn scroll_bounds(&self) -> (i32, i32, i32, i32) {
        let (w, h) = self.dimensions();
        (0, 0, w, h)
    }

    fn tile_on_map(&self, tile: Tile) -> bool {
        let (w, h) = self.dimensions();
        tile.x >= 0 && tile.y >= 0 && tile.x < w && tile.y < h
    }

    fn tile_info(&self, tile: Tile) -> TileInfo;

    fn zone_at(&self, tile: Tile) -> Option<Zone>;
}

/// Verdict returned by the high-level gateway A*.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayVerdict {
    Ok,
    Nearest,
    NoZone,
    SameZone,
    Failed,
}

/// The gateway-graph A*: produces a chain of gateway records bridging the
/// start and goal zones. Contract only; the search itself is out of scope.
pub trait GatewayAStar {
    fn route(
        &self,
        player: u32,
        terrain_mask: GwTerrainMask,
        start: WorldPos,
        goal: WorldPos,
    ) -> (GatewayVerdict, Option<GatewayChain>);
}

/// Verdict returned by the per-hop tile A*.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileAstarOutcome {
    Ok,
    Nearest,
    Partial,
    Failed,
}

/// A bounded waypoint sequence produced by one tile-A* hop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AstarRoute {
    pub waypoints: Vec<Tile>,
    pub final_tile: Tile,
    pub outcome_hint: Option<TileAstarOutcome>,
}

/// Search mode passed to both A* layers: a fresh search, or a resumption
/// of a search that previously returned `Partial`/`WAIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    New,
    Continue,
}

/// The per-hop tile A*. Contract only; the search itself is out of scope.
/// `expansions_used` lets the driver compare against `FPATH_LOOP_LIMIT`
/// without the search needing to know about frame budgets itself.
pub trait TileAStar {
    fn route(
        &mut self,
        mode: SearchMode,
        start: Tile,
        goal: Tile,
        overlay: &Overlay,
    ) -> (TileAstarOutcome, AstarRoute);

    /// Running count of node expansions since the last `New` search; reset
    /// on `SearchMode::New`.
    fn expansions_used(&self) -> u64;
}

/// One sample taken along a raycast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaySample {
    pub world: WorldPos,
    pub tile: Tile,
}

/// The raycaster: samples points along a ray from `start` at `angle` up to
/// `max_len`. Contract only.
pub trait RayCaster {
    fn cast(&self, start: WorldPos, goal: WorldPos, max_len: i32) -> Vec<RaySample>;
}

/// Registered formations: which formation (if any) a world position
/// belongs to, and which units are members.
pub trait FormationRegistry {
    fn formation_at(&self, pos: WorldPos) -> Option<FormationId>;
}

/// A snapshot of a unit's movement-relevant state, as read by the driver
/// and the route-reuse finder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitMoveState {
    pub alive: bool,
    pub position: WorldPos,
    pub formation: Option<FormationId>,
    pub waypoints: Vec<Tile>,
    pub waiting_for_route: bool,
    pub propulsion: PropulsionClass,
}

/// Enumerates a player's living units and exposes their movement state.
/// Out of scope to implement; the core only ever reads through this.
pub trait UnitRegistry {
    fn unit_state(&self, unit: UnitId) -> Option<UnitMoveState>;

    /// Units other than `unit`, in registry order, belonging to `player`.
    fn other_units(&self, player: u32, unit: UnitId) -> Vec<UnitId>;
}

/// The simulation frame clock.
pub trait FrameClock {
    fn current_frame(&self) -> u64;
}

/// Lets the action layer mark a `NEAREST` tile-A* result as "close enough
/// to the goal to treat as arrived" — e.g. the tile adjacent to a building
/// the unit was actually asked to walk up to, where the building itself is
/// what stopped the search short. Consulted before the planner's normal
/// blame-and-retry handling of an inexact hop result.
pub trait TargetRelevance {
    fn is_blocking_relevant(&self, tile: Tile) -> bool;
}

/// Looks up a gateway by id. Declared alongside the other collaborator
/// traits because the gateway *graph* (adjacency, flags) is owned by this
/// crate, but the concrete gateway records for a loaded map are owned by
/// the map container.
pub trait GatewayTable {
    fn get(&self, id: GatewayId) -> &Gateway;
    fn all_ids(&self) -> Vec<GatewayId>;
}
