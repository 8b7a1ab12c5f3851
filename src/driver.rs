//! Top-level entry point: `route()` and `update_tick()`.
//!
//! Grounded on `fpathRoute`, which arbitrates a single shared "partial
//! route" slot across every unit's pathfinding request: if a search can't
//! finish within `FPATH_LOOP_LIMIT` iterations it parks its resumption
//! state there and returns `WAIT`; a second unit arriving while the slot
//! is already taken gets bounced with `RESCHEDULE` rather than evicting
//! the parked search. Before any of that, a fresh request runs the same
//! endpoint-repair / trivial-LOS / route-reuse sequence `fpathRoute` runs
//! ahead of the gateway search — recentring a blocked start, short-circuiting
//! to a direct route when the straight line to the target is already clear,
//! repairing a blocked target onto the last clear tile the raycast saw, and
//! trying to adopt a formation-mate's route before paying for a fresh
//! search. VTOL propulsion that fails outright falls back to a direct
//! straight-line route, the same escape hatch `fpathRoute` takes for
//! aircraft before giving up entirely. A *resumed* request skips all of
//! that and goes straight back into the gateway chain walk, exactly as
//! `fpathRoute` only runs the repair/reuse block on the `psPartialRouteDroid
//! == NULL || psPartialRouteDroid != psDroid` branch.

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::blocking;
use crate::collaborators::{
    FormationRegistry, FrameClock, GatewayAStar, GatewayTable, MapView, PropulsionClass,
    RayCaster, TargetRelevance, TileAStar, UnitId, UnitRegistry,
};
use crate::config::Config;
use crate::endpoint;
use crate::error::RouteError;
use crate::model::MoveControlBlock;
use crate::planner::{self, PlanVerdict, PlannerState};
use crate::route_reuse;
use crate::tile::{Tile, TileScale, WorldPos};

/// Control-flow verdict handed back to the caller of [`Driver::route`].
/// Kept distinct from [`crate::error::RouteError`]: these four outcomes
/// are routine, expected results of a pathfinding request, not violated
/// preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A route (possibly only to the nearest reachable point) is queued.
    Ok,
    /// This unit's search ran out of budget and is parked; call
    /// [`Driver::route`] again for the same unit on a later tick.
    Wait,
    /// Another unit's search currently holds the single parked-search
    /// slot; try this request again next tick.
    Reschedule,
    /// No route exists between start and goal.
    Failed,
}

struct Parked {
    unit: UnitId,
    /// The raw target this unit was asked to route to, as seen by the
    /// caller — distinct from `state.goal()`, which is the (possibly
    /// endpoint-repaired) tile the planner is actually routing to.
    /// Retargeting is detected against this field, matching the original's
    /// `psDroid->sMove.DestinationX != tX` check.
    requested_goal: Tile,
    state: PlannerState,
    parked_at_frame: u64,
}

/// Owns the single parked-search slot and every unit's waypoint queue.
pub struct Driver {
    config: Config,
    parked: Option<Parked>,
    move_blocks: FxHashMap<UnitId, MoveControlBlock>,
    /// Externally-owned cursor naming which unit gets the parked slot next
    /// when it's free. The driver only ever reads this; an embedding
    /// scheduler is responsible for writing it via [`Driver::set_next_in_line`].
    next_in_line: Option<UnitId>,
}

impl Driver {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            parked: None,
            move_blocks: FxHashMap::default(),
            next_in_line: None,
        }
    }

    /// Sets which unit, if any, has priority for the parked-search slot the
    /// next time it is free. Purely advisory bookkeeping the core never
    /// infers on its own — the embedding engine's scheduler owns this
    /// cursor and is expected to clear it once that unit's request lands.
    pub fn set_next_in_line(&mut self, unit: Option<UnitId>) {
        self.next_in_line = unit;
    }

    pub fn waypoints(&self, unit: UnitId) -> &[Tile] {
        self.move_blocks
            .get(&unit)
            .map(MoveControlBlock::waypoints)
            .unwrap_or(&[])
    }

    fn block_mut(&mut self, unit: UnitId) -> &mut MoveControlBlock {
        self.move_blocks
            .entry(unit)
            .or_insert_with(|| MoveControlBlock::new(self.config.travel_size))
    }

    /// Requests a route for `unit` from `start` to `goal`.
    ///
    /// On a fresh request (no parked search for this unit, or a parked
    /// search whose goal no longer matches), `start` is recentred off a
    /// blocked tile, a straight-line raycast to `goal` short-circuits to a
    /// direct route when already clear, a blocked `goal` is repaired onto
    /// the last clear tile the raycast saw, and a formation-mate's route is
    /// tried before the hierarchical planner runs at all. A resumed request
    /// skips straight back into the parked chain walk.
    ///
    /// Returns `Err` for the conditions the original treats as assertion
    /// violations — an off-map coordinate, or a unit handle the registry
    /// doesn't recognize — rather than folding them into [`RouteOutcome`].
    #[allow(clippy::too_many_arguments)]
    pub fn route(
        &mut self,
        map: &impl MapView,
        gateway_astar: &impl GatewayAStar,
        gateway_table: &impl GatewayTable,
        tile_astar: &mut impl TileAStar,
        target_relevance: &impl TargetRelevance,
        raycaster: &impl RayCaster,
        formation_registry: &impl FormationRegistry,
        clock: &impl FrameClock,
        unit_registry: &impl UnitRegistry,
        unit: UnitId,
        player: u32,
        propulsion: PropulsionClass,
        start: Tile,
        goal: Tile,
    ) -> Result<RouteOutcome, RouteError> {
        if !map.tile_on_map(start) {
            return Err(RouteError::OffMap { x: start.x, y: start.y });
        }
        if !map.tile_on_map(goal) {
            return Err(RouteError::OffMap { x: goal.x, y: goal.y });
        }
        if unit_registry.unit_state(unit).is_none() {
            return Err(RouteError::UnknownUnit(unit));
        }

        if start == goal {
            return Ok(RouteOutcome::Failed);
        }

        if let Some(parked) = &self.parked {
            if parked.unit == unit {
                if parked.requested_goal == goal {
                    let state = self.parked.take().unwrap().state;
                    return Ok(self.resume(
                        map,
                        gateway_astar,
                        gateway_table,
                        tile_astar,
                        target_relevance,
                        clock,
                        unit,
                        player,
                        propulsion,
                        goal,
                        state,
                    ));
                }
                // Same unit, new goal: the parked search is stale, discard
                // it and fall through to a fresh plan below.
                self.parked = None;
            }
        }

        let scale = self.config.tile_scale;

        let repaired_start =
            match endpoint::repair_start(map, propulsion, start, self.config.start_repair_radius) {
                Some(tile) => tile,
                None => return Ok(RouteOutcome::Failed),
            };

        let start_world = scale.tile_centre(repaired_start);
        let goal_world = scale.tile_centre(goal);

        let clear_tile = endpoint::repair_target(
            raycaster,
            map,
            propulsion,
            repaired_start,
            start_world,
            goal_world,
            self.config.ray_max_len,
        );
        if clear_tile == goal {
            // The raycast never hit an obstruction: a straight line already
            // gets the unit there, so the hierarchical planner never runs.
            self.block_mut(unit).set_direct_route(scale, goal);
            return Ok(RouteOutcome::Ok);
        }

        let target = if blocking::is_blocking(map, propulsion, goal) {
            clear_tile
        } else {
            goal
        };

        if let Some(suffix) = self.try_route_reuse(
            map,
            raycaster,
            formation_registry,
            unit_registry,
            propulsion,
            scale,
            player,
            unit,
            start_world,
            goal_world,
        ) {
            self.block_mut(unit).clear();
            self.block_mut(unit).append_route(scale, suffix);
            return Ok(RouteOutcome::Ok);
        }

        if let Some(parked) = &self.parked {
            if parked.unit != unit {
                return Ok(RouteOutcome::Reschedule);
            }
        }
        if let Some(next) = self.next_in_line {
            if next != unit {
                return Ok(RouteOutcome::Reschedule);
            }
        }

        let verdict = planner::plan_new(
            map,
            gateway_astar,
            gateway_table,
            tile_astar,
            target_relevance,
            player,
            propulsion,
            scale,
            repaired_start,
            target,
            self.config.fpath_loop_limit,
        );
        Ok(self.apply_verdict(clock, unit, propulsion, goal, target, verdict, true))
    }

    /// Tries to adopt the suffix of a formation-mate's already-computed
    /// route instead of paying for a fresh search. Skips the unit currently
    /// holding the parked-search slot, since its route may be mid-revision.
    #[allow(clippy::too_many_arguments)]
    fn try_route_reuse(
        &self,
        map: &impl MapView,
        raycaster: &impl RayCaster,
        formation_registry: &impl FormationRegistry,
        unit_registry: &impl UnitRegistry,
        propulsion: PropulsionClass,
        scale: TileScale,
        player: u32,
        unit: UnitId,
        mover_pos: WorldPos,
        goal_world: WorldPos,
    ) -> Option<Vec<Tile>> {
        let formation = formation_registry.formation_at(goal_world)?;
        let parked_unit = self.parked.as_ref().map(|parked| parked.unit);

        for other in unit_registry.other_units(player, unit) {
            if Some(other) == parked_unit {
                continue;
            }
            let Some(state) = unit_registry.unit_state(other) else {
                continue;
            };
            if !state.alive || state.formation != Some(formation) || state.waypoints.is_empty() {
                continue;
            }
            if let Some(suffix) = route_reuse::find_reusable_suffix(
                raycaster,
                map,
                propulsion,
                scale,
                mover_pos,
                goal_world,
                &state.waypoints,
                self.config.ray_max_len,
            ) {
                return Some(suffix);
            }
        }
        None
    }

    /// Resets the parked-search slot. There is no installed blocking
    /// predicate to reset (see [`PropulsionClass`]), so this is strictly
    /// narrower than the original's `fpathInitialise`.
    pub fn initialise(&mut self) {
        self.parked = None;
    }

    #[allow(clippy::too_many_arguments)]
    fn resume(
        &mut self,
        map: &impl MapView,
        gateway_astar: &impl GatewayAStar,
        gateway_table: &impl GatewayTable,
        tile_astar: &mut impl TileAStar,
        target_relevance: &impl TargetRelevance,
        clock: &impl FrameClock,
        unit: UnitId,
        player: u32,
        propulsion: PropulsionClass,
        requested_goal: Tile,
        state: PlannerState,
    ) -> RouteOutcome {
        let scale = self.config.tile_scale;
        let target = state.goal();
        let verdict = planner::plan_continue(
            map,
            gateway_astar,
            gateway_table,
            tile_astar,
            target_relevance,
            player,
            propulsion,
            scale,
            state,
            self.config.fpath_loop_limit,
        );
        self.apply_verdict(clock, unit, propulsion, requested_goal, target, verdict, false)
    }

    /// `fresh` distinguishes a verdict that concludes a brand-new `route()`
    /// call from one that concludes a resumed `Continue` search: only the
    /// former clears the unit's existing waypoint queue before writing the
    /// new one. A resumed search's `Ok` still writes onto whatever was in
    /// the queue when the multi-frame search began (nothing was appended
    /// mid-flight), so clearing there as well would be redundant, not
    /// wrong — but following the fresh/continue split keeps this in lock
    /// step with `fpathRoute`'s own `ASR_NEWROUTE`/`ASR_CONTINUE` split.
    fn apply_verdict(
        &mut self,
        clock: &impl FrameClock,
        unit: UnitId,
        propulsion: PropulsionClass,
        requested_goal: Tile,
        target: Tile,
        verdict: PlanVerdict,
        fresh: bool,
    ) -> RouteOutcome {
        match verdict {
            PlanVerdict::Ok { waypoints, exact } => {
                if !exact {
                    warn!(?unit, "route only reaches nearest point, not the requested goal");
                }
                if fresh {
                    self.block_mut(unit).clear();
                }
                self.block_mut(unit).append_route(self.config.tile_scale, waypoints);
                RouteOutcome::Ok
            }
            PlanVerdict::Wait(state) => {
                self.parked = Some(Parked {
                    unit,
                    requested_goal,
                    state,
                    parked_at_frame: clock.current_frame(),
                });
                RouteOutcome::Wait
            }
            PlanVerdict::Failed => self.fail_or_direct(unit, propulsion, target),
        }
    }

    fn fail_or_direct(&mut self, unit: UnitId, propulsion: PropulsionClass, target: Tile) -> RouteOutcome {
        if propulsion.is_vtol() {
            info!(?unit, "gateway route failed for VTOL, falling back to direct route");
            self.block_mut(unit).set_direct_route(self.config.tile_scale, target);
            RouteOutcome::Ok
        } else {
            RouteOutcome::Failed
        }
    }

    /// Sets a unit directly onto a straight-line route, bypassing the
    /// planner entirely. Used by callers that already know the path is
    /// clear (e.g. a unit ordered to move within its own gateway cell).
    pub fn set_direct_route(&mut self, unit: UnitId, goal: Tile) {
        self.block_mut(unit).set_direct_route(self.config.tile_scale, goal);
    }

    /// Expires a parked search whose unit is no longer waitable: it has
    /// sat idle past `partial_route_timeout_frames`, it died, its
    /// movement status left `WAIT-ROUTE`, or the registry no longer
    /// recognizes it at all. Call once per simulation frame.
    pub fn update_tick(&mut self, clock: &impl FrameClock, unit_registry: &impl UnitRegistry) {
        if let Some(parked) = &self.parked {
            let age = clock.current_frame().saturating_sub(parked.parked_at_frame);
            let timed_out = age > self.config.partial_route_timeout_frames;
            let unit_state = unit_registry.unit_state(parked.unit);
            let unit_left_wait = unit_state.map_or(true, |state| !state.alive || !state.waiting_for_route);

            if timed_out || unit_left_wait {
                warn!(
                    unit = ?parked.unit,
                    age,
                    unit_left_wait,
                    "parked route search no longer valid, discarding"
                );
                self.parked = None;
            }
        }
    }

    pub fn forget_unit(&mut self, unit: UnitId) {
        self.move_blocks.remove(&unit);
        if self.parked.as_ref().map(|p| p.unit) == Some(unit) {
            self.parked = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{
        AstarRoute, FormationId, GatewayVerdict, RaySample, SearchMode, TerrainType,
        TileAstarOutcome, TileInfo, UnitMoveState,
    };
    use crate::gateway::{GatewayChain, Zone};

    struct KnownUnits;

    impl UnitRegistry for KnownUnits {
        fn unit_state(&self, _unit: UnitId) -> Option<UnitMoveState> {
            Some(UnitMoveState {
                alive: true,
                position: WorldPos::new(0, 0),
                formation: None,
                waypoints: Vec::new(),
                waiting_for_route: false,
                propulsion: PropulsionClass::Ground,
            })
        }

        fn other_units(&self, _player: u32, _unit: UnitId) -> Vec<UnitId> {
            Vec::new()
        }
    }

    struct WaitingUnit;

    impl UnitRegistry for WaitingUnit {
        fn unit_state(&self, _unit: UnitId) -> Option<UnitMoveState> {
            Some(UnitMoveState {
                alive: true,
                position: WorldPos::new(0, 0),
                formation: None,
                waypoints: Vec::new(),
                waiting_for_route: true,
                propulsion: PropulsionClass::Ground,
            })
        }

        fn other_units(&self, _player: u32, _unit: UnitId) -> Vec<UnitId> {
            Vec::new()
        }
    }

    struct NoFormations;

    impl FormationRegistry for NoFormations {
        fn formation_at(&self, _pos: WorldPos) -> Option<FormationId> {
            None
        }
    }

    struct StraightRay;

    impl RayCaster for StraightRay {
        fn cast(&self, start: WorldPos, goal: WorldPos, _max_len: i32) -> Vec<RaySample> {
            let steps = 10;
            (0..=steps)
                .map(|i| {
                    let t = i as f64 / steps as f64;
                    let x = start.x + ((goal.x - start.x) as f64 * t).round() as i32;
                    let y = start.y + ((goal.y - start.y) as f64 * t).round() as i32;
                    RaySample {
                        world: WorldPos::new(x, y),
                        tile: Tile::new(x.div_euclid(128), y.div_euclid(128)),
                    }
                })
                .collect()
        }
    }

    struct OpenMap {
        blocked: Vec<Tile>,
    }

    impl OpenMap {
        fn open() -> Self {
            Self { blocked: Vec::new() }
        }
    }

    impl MapView for OpenMap {
        fn dimensions(&self) -> (i32, i32) {
            (100, 100)
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
            Some(Zone(0))
        }
    }

    struct NoGateways;

    impl GatewayAStar for NoGateways {
        fn route(
            &self,
            _player: u32,
            _terrain_mask: crate::gateway::GwTerrainMask,
            _start: WorldPos,
            _goal: WorldPos,
        ) -> (GatewayVerdict, Option<GatewayChain>) {
            (GatewayVerdict::SameZone, None)
        }
    }

    struct EmptyGatewayTable;

    impl GatewayTable for EmptyGatewayTable {
        fn get(&self, id: crate::gateway::GatewayId) -> &crate::gateway::Gateway {
            panic!("no gateways registered, got {id:?}");
        }

        fn all_ids(&self) -> Vec<crate::gateway::GatewayId> {
            Vec::new()
        }
    }

    struct DirectTileAStar {
        expansions: u64,
    }

    impl TileAStar for DirectTileAStar {
        fn route(
            &mut self,
            _mode: SearchMode,
            _start: Tile,
            goal: Tile,
            _overlay: &crate::overlay::Overlay,
        ) -> (TileAstarOutcome, AstarRoute) {
            self.expansions += 1;
            (
                TileAstarOutcome::Ok,
                AstarRoute {
                    waypoints: vec![goal],
                    final_tile: goal,
                    outcome_hint: Some(TileAstarOutcome::Ok),
                },
            )
        }

        fn expansions_used(&self) -> u64 {
            self.expansions
        }
    }

    struct FixedClock(u64);

    impl FrameClock for FixedClock {
        fn current_frame(&self) -> u64 {
            self.0
        }
    }

    struct NeverRelevant;

    impl crate::collaborators::TargetRelevance for NeverRelevant {
        fn is_blocking_relevant(&self, _tile: Tile) -> bool {
            false
        }
    }

    #[test]
    fn same_zone_route_resolves_immediately() {
        let mut driver = Driver::new(Config::default());
        let mut tile_astar = DirectTileAStar { expansions: 0 };
        let outcome = driver
            .route(
                &OpenMap::open(),
                &NoGateways,
                &EmptyGatewayTable,
                &mut tile_astar,
                &NeverRelevant,
                &StraightRay,
                &NoFormations,
                &FixedClock(0),
                &KnownUnits,
                UnitId(1),
                0,
                PropulsionClass::Ground,
                Tile::new(0, 0),
                Tile::new(5, 5),
            )
            .unwrap();
        assert_eq!(outcome, RouteOutcome::Ok);
        assert_eq!(driver.waypoints(UnitId(1)), &[Tile::new(5, 5)]);
    }

    #[test]
    fn second_unit_is_rescheduled_while_another_is_parked() {
        struct NeverFinishes;
        impl TileAStar for NeverFinishes {
            fn route(
                &mut self,
                _mode: SearchMode,
                _start: Tile,
                _goal: Tile,
                _overlay: &crate::overlay::Overlay,
            ) -> (TileAstarOutcome, AstarRoute) {
                (TileAstarOutcome::Partial, AstarRoute::default())
            }

            fn expansions_used(&self) -> u64 {
                u64::MAX
            }
        }

        let mut driver = Driver::new(Config::default());
        let map = OpenMap {
            blocked: vec![Tile::new(3, 3)],
        };
        let mut tile_astar = NeverFinishes;
        let first = driver
            .route(
                &map,
                &NoGateways,
                &EmptyGatewayTable,
                &mut tile_astar,
                &NeverRelevant,
                &StraightRay,
                &NoFormations,
                &FixedClock(0),
                &KnownUnits,
                UnitId(1),
                0,
                PropulsionClass::Ground,
                Tile::new(0, 0),
                Tile::new(5, 5),
            )
            .unwrap();
        assert_eq!(first, RouteOutcome::Wait);

        let second = driver
            .route(
                &map,
                &NoGateways,
                &EmptyGatewayTable,
                &mut tile_astar,
                &NeverRelevant,
                &StraightRay,
                &NoFormations,
                &FixedClock(0),
                &KnownUnits,
                UnitId(2),
                0,
                PropulsionClass::Ground,
                Tile::new(0, 0),
                Tile::new(5, 5),
            )
            .unwrap();
        assert_eq!(second, RouteOutcome::Reschedule);
    }

    #[test]
    fn off_map_start_is_rejected() {
        let mut driver = Driver::new(Config::default());
        let mut tile_astar = DirectTileAStar { expansions: 0 };
        let err = driver
            .route(
                &OpenMap::open(),
                &NoGateways,
                &EmptyGatewayTable,
                &mut tile_astar,
                &NeverRelevant,
                &StraightRay,
                &NoFormations,
                &FixedClock(0),
                &KnownUnits,
                UnitId(1),
                0,
                PropulsionClass::Ground,
                Tile::new(-1, 0),
                Tile::new(5, 5),
            )
            .unwrap_err();
        assert_eq!(err, crate::error::RouteError::OffMap { x: -1, y: 0 });
    }

    #[test]
    fn changing_goal_while_parked_discards_stale_state_and_restarts() {
        struct NeverFinishes;
        impl TileAStar for NeverFinishes {
            fn route(
                &mut self,
                _mode: SearchMode,
                _start: Tile,
                _goal: Tile,
                _overlay: &crate::overlay::Overlay,
            ) -> (TileAstarOutcome, AstarRoute) {
                (TileAstarOutcome::Partial, AstarRoute::default())
            }

            fn expansions_used(&self) -> u64 {
                u64::MAX
            }
        }

        let mut driver = Driver::new(Config::default());
        let map = OpenMap {
            blocked: vec![Tile::new(3, 3)],
        };
        let mut stuck = NeverFinishes;
        let first = driver
            .route(
                &map,
                &NoGateways,
                &EmptyGatewayTable,
                &mut stuck,
                &NeverRelevant,
                &StraightRay,
                &NoFormations,
                &FixedClock(0),
                &KnownUnits,
                UnitId(1),
                0,
                PropulsionClass::Ground,
                Tile::new(0, 0),
                Tile::new(5, 5),
            )
            .unwrap();
        assert_eq!(first, RouteOutcome::Wait);
        assert!(driver.parked.is_some());

        let mut direct = DirectTileAStar { expansions: 0 };
        let retried = driver
            .route(
                &map,
                &NoGateways,
                &EmptyGatewayTable,
                &mut direct,
                &NeverRelevant,
                &StraightRay,
                &NoFormations,
                &FixedClock(1),
                &KnownUnits,
                UnitId(1),
                0,
                PropulsionClass::Ground,
                Tile::new(0, 0),
                Tile::new(9, 9),
            )
            .unwrap();
        assert_eq!(retried, RouteOutcome::Ok);
        assert_eq!(driver.waypoints(UnitId(1)), &[Tile::new(9, 9)]);
    }

    #[test]
    fn next_in_line_cursor_bounces_other_units_when_slot_is_free() {
        let mut driver = Driver::new(Config::default());
        let map = OpenMap {
            blocked: vec![Tile::new(3, 3)],
        };
        let mut tile_astar = DirectTileAStar { expansions: 0 };
        driver.set_next_in_line(Some(UnitId(2)));

        let bounced = driver
            .route(
                &map,
                &NoGateways,
                &EmptyGatewayTable,
                &mut tile_astar,
                &NeverRelevant,
                &StraightRay,
                &NoFormations,
                &FixedClock(0),
                &KnownUnits,
                UnitId(1),
                0,
                PropulsionClass::Ground,
                Tile::new(0, 0),
                Tile::new(5, 5),
            )
            .unwrap();
        assert_eq!(bounced, RouteOutcome::Reschedule);

        let proceeds = driver
            .route(
                &map,
                &NoGateways,
                &EmptyGatewayTable,
                &mut tile_astar,
                &NeverRelevant,
                &StraightRay,
                &NoFormations,
                &FixedClock(0),
                &KnownUnits,
                UnitId(2),
                0,
                PropulsionClass::Ground,
                Tile::new(0, 0),
                Tile::new(5, 5),
            )
            .unwrap();
        assert_eq!(proceeds, RouteOutcome::Ok);
    }

    #[test]
    fn initialise_clears_the_parked_slot() {
        let mut driver = Driver::new(Config::default());
        driver.parked = Some(Parked {
            unit: UnitId(1),
            requested_goal: Tile::new(5, 5),
            state: crate::planner::PlannerState::default(),
            parked_at_frame: 0,
        });
        driver.initialise();
        assert!(driver.parked.is_none());
    }

    #[test]
    fn parked_search_expires_after_timeout() {
        let mut driver = Driver::new(Config::default());
        driver.parked = Some(Parked {
            unit: UnitId(1),
            requested_goal: Tile::new(5, 5),
            state: crate::planner::PlannerState::default(),
            parked_at_frame: 0,
        });
        driver.update_tick(&FixedClock(1), &WaitingUnit);
        assert!(driver.parked.is_some());
        driver.update_tick(&FixedClock(1000), &WaitingUnit);
        assert!(driver.parked.is_none());
    }

    #[test]
    fn parked_search_expires_when_unit_leaves_wait_route() {
        let mut driver = Driver::new(Config::default());
        driver.parked = Some(Parked {
            unit: UnitId(1),
            requested_goal: Tile::new(5, 5),
            state: crate::planner::PlannerState::default(),
            parked_at_frame: 0,
        });
        driver.update_tick(&FixedClock(1), &KnownUnits);
        assert!(driver.parked.is_none());
    }
}
