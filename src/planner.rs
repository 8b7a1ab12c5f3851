//! The hierarchical planner: gateway chain first, then one bounded tile
//! A* hop per gateway crossed.
//!
//! Grounded on `fpathGatewayRoute`, the state machine at the heart of the
//! original. `fpathGatewayRoute` keeps its resumption state — which hop
//! it's on, how much of the gateway chain is left, which gateways and
//! links it has already blamed and ruled out — in file-scope `static`
//! locals, switched between `ASR_NEWROUTE` and `ASR_CONTINUE` by the
//! caller. Here that state is an owned [`PlannerState`] value the driver
//! threads back in on the next tick; nothing is global, so two units (or
//! the same unit resumed out of order) can never see each other's
//! progress. The "blame this gateway, ask again" retry the original does
//! by setting `GWR_IGNORE`/`GWRL_BLOCKED` bits on shared gateway records
//! is likewise a per-search scratch set here (REDESIGN FLAGS), carried
//! only inside [`PlannerState`] so it persists across a `WAIT` the same
//! way the original's bits do, without ever touching the shared gateway
//! table.

use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

use crate::collaborators::{
    GatewayAStar, GatewayTable, GatewayVerdict, MapView, PropulsionClass, SearchMode, TargetRelevance,
    TileAStar, TileAstarOutcome,
};
use crate::gateway::{Gateway, GatewayChain, GatewayFlags, GatewayId, Zone};
use crate::model;
use crate::overlay::Overlay;
use crate::tile::{Tile, TileScale, WorldPos};

/// How many times the planner will blame a gateway and ask for a fresh
/// chain before giving up. Bounds what is otherwise an unbounded retry
/// loop in the original (each retry burns a gateway from the graph, so
/// this can never loop forever, but a finite map has a finite number of
/// gateways worth trying).
const MAX_GATEWAY_RETRIES: u32 = 8;

/// Resumable planner progress, parked by the driver when a hop runs out
/// of budget mid-search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlannerState {
    chain: GatewayChain,
    hop_index: usize,
    current_tile: Tile,
    goal: Tile,
    waypoints: Vec<Tile>,
    ignored_gateways: FxHashSet<GatewayId>,
    blocked_links: FxHashSet<(GatewayId, GatewayId)>,
    retries: u32,
}

impl PlannerState {
    /// The goal this parked search was started for, so the driver can tell
    /// a resumed request apart from one whose target has since changed.
    pub fn goal(&self) -> Tile {
        self.goal
    }
}

/// Outcome of one [`plan_new`]/[`plan_continue`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanVerdict {
    /// The full route to the goal (or the nearest reachable point) is
    /// ready; waypoints are hop-ordered, start to goal.
    Ok { waypoints: Vec<Tile>, exact: bool },
    /// The current hop ran out of budget; resume with this state next
    /// tick via [`plan_continue`].
    Wait(PlannerState),
    /// No route exists: no shared zone, the gateway search failed, or a
    /// bounded hop could not progress at all.
    Failed,
}

/// Every gateway bordering `zone` except the ones in `exclude` (`psLast`
/// and `psNext`) and any water-link gateway — §4.4's "every other
/// (non-water-link) gateway whose `zone1` or `zone2` equals `zone`".
fn boundary_gateways<'a>(
    table: &'a impl GatewayTable,
    zone: Zone,
    exclude: &[GatewayId],
) -> Vec<&'a Gateway> {
    table
        .all_ids()
        .into_iter()
        .filter_map(move |id| {
            if exclude.contains(&id) {
                return None;
            }
            let gw = table.get(id);
            if gw.flags.contains(GatewayFlags::WATERLINK) {
                return None;
            }
            (gw.zone_a == zone || gw.zone_b == zone).then_some(gw)
        })
        .collect()
}

/// The 1-tile ring of tiles adjacent to `gateway`'s segment that fall in
/// `side`, excluding tiles inside the gateway itself and off-map tiles.
/// Orientation (vertical/horizontal segment) is read straight off the
/// tile list rather than a stored flag, and for each gateway tile we check
/// both of its perpendicular neighbours against the map's own zone lookup
/// instead of trusting a stored "which side is which" bit — this crate
/// doesn't carry the original's `ZONE1` orientation flag (see DESIGN.md),
/// so asking the map which zone a candidate tile is actually in is the
/// direct substitute.
fn ring_on_side(map: &impl MapView, gateway: &Gateway, side: Zone) -> Vec<Tile> {
    let vertical = gateway.tiles.windows(2).all(|w| w[0].x == w[1].x);
    let mut ring = Vec::new();
    for &tile in &gateway.tiles {
        let candidates = if vertical {
            [Tile::new(tile.x - 1, tile.y), Tile::new(tile.x + 1, tile.y)]
        } else {
            [Tile::new(tile.x, tile.y - 1), Tile::new(tile.x, tile.y + 1)]
        };
        for candidate in candidates {
            if !map.tile_on_map(candidate) || gateway.tiles.contains(&candidate) {
                continue;
            }
            if map.zone_at(candidate) == Some(side) {
                ring.push(candidate);
            }
        }
    }
    ring
}

/// Builds the overlay for one hop crossing `gateway_id` while standing in
/// `zone`: blocks every other non-water-link gateway on `zone`'s boundary,
/// plus the 1-tile ring around `psLast` (`prev_gateway`) and `psNext`
/// (`gateway_id` itself) on their selected sides. This crate has no literal
/// `ZONE1` flag (orientation lives in `zone_a`/`zone_b` instead), so the
/// "selected side" for `psLast` is taken as its `zone_a` and for `psNext`
/// as the zone on the far side of `zone` — see DESIGN.md's Open Question
/// resolution for the reasoning.
fn hop_overlay(
    map: &impl MapView,
    table: &impl GatewayTable,
    zone: Zone,
    prev_gateway: Option<GatewayId>,
    gateway_id: GatewayId,
) -> Overlay {
    let gateway = table.get(gateway_id);
    let mut exclude = vec![gateway_id];
    exclude.extend(prev_gateway);

    let boundary = boundary_gateways(table, zone, &exclude);
    let mut overlay = Overlay::for_gateway_hop(gateway_id, boundary.into_iter());

    let next_side = gateway.other_zone(zone).unwrap_or(gateway.zone_b);
    for tile in ring_on_side(map, gateway, next_side) {
        overlay.block(tile);
    }

    if let Some(prev_id) = prev_gateway {
        let prev = table.get(prev_id);
        for tile in ring_on_side(map, prev, prev.zone_a) {
            overlay.block(tile);
        }
    }

    overlay
}

/// Result of running exactly one bounded tile-A* hop. `terminal` is set
/// when a `NEAREST` result is target-relevant: the chain walk must stop
/// right here with the accumulated waypoints rather than press on toward
/// a gateway crossing the action layer has already said is good enough.
enum HopResult {
    Ok { waypoints: Vec<Tile>, exact: bool, terminal: bool },
    OutOfBudget,
    Failed { waypoints: Vec<Tile> },
}

fn run_hop(
    tile_astar: &mut impl TileAStar,
    target_relevance: &impl TargetRelevance,
    mode: SearchMode,
    from: Tile,
    to: Tile,
    overlay: &Overlay,
    loop_limit: u64,
) -> HopResult {
    let (outcome, route) = tile_astar.route(mode, from, to, overlay);
    if tile_astar.expansions_used() >= loop_limit {
        return HopResult::OutOfBudget;
    }
    match outcome {
        TileAstarOutcome::Ok => HopResult::Ok {
            waypoints: route.waypoints,
            exact: true,
            terminal: false,
        },
        // A NEAREST tile the action layer considers target-relevant (e.g.
        // the approach tile of a building) is accepted outright rather
        // than handed to the blame-and-retry path below, and short-circuits
        // the rest of the gateway chain the same way a true OK at the final
        // hop would.
        TileAstarOutcome::Nearest => {
            let relevant = target_relevance.is_blocking_relevant(route.final_tile);
            HopResult::Ok {
                waypoints: route.waypoints,
                exact: relevant,
                terminal: relevant,
            }
        }
        TileAstarOutcome::Partial => HopResult::OutOfBudget,
        TileAstarOutcome::Failed => HopResult::Failed {
            waypoints: route.waypoints,
        },
    }
}

fn single_hop_verdict(
    tile_astar: &mut impl TileAStar,
    target_relevance: &impl TargetRelevance,
    start: Tile,
    goal: Tile,
    loop_limit: u64,
) -> PlanVerdict {
    match run_hop(tile_astar, target_relevance, SearchMode::New, start, goal, &Overlay::new(), loop_limit) {
        HopResult::Ok { waypoints, exact, .. } => PlanVerdict::Ok { waypoints, exact },
        HopResult::OutOfBudget => PlanVerdict::Wait(PlannerState {
            current_tile: start,
            goal,
            ..PlannerState::default()
        }),
        HopResult::Failed { .. } => PlanVerdict::Failed,
    }
}

/// Index of the first chain element the walk should actually search for:
/// 1 if `start` already lies inside the chain's first gateway (§4.5 step
/// 3's "if the start lies inside the first chain element, skip that
/// element"), else 0.
fn initial_hop_index(table: &impl GatewayTable, chain: &GatewayChain, start: Tile) -> usize {
    match chain.gateways.first() {
        Some(&id) if table.get(id).is_in_gateway(start) => 1,
        _ => 0,
    }
}

/// Replaces `state.waypoints` with `candidate` when it is the better of
/// the two partial results — empty favours the candidate outright,
/// otherwise whichever's final tile centre lands closer to the raw
/// target wins (§3.1/§4.5's `route_is_closer`/"adopt the closer suffix").
fn adopt_closer(state: &mut PlannerState, candidate: Vec<Tile>, goal_world: WorldPos, scale: TileScale) {
    match (state.waypoints.last().copied(), candidate.last().copied()) {
        (None, Some(_)) => state.waypoints = candidate,
        (Some(current_last), Some(candidate_final)) => {
            let current_world = scale.tile_centre(current_last);
            let candidate_world = scale.tile_centre(candidate_final);
            if model::route_is_closer(current_world, candidate_world, goal_world) {
                state.waypoints = candidate;
            }
        }
        (_, None) => {}
    }
}

/// Starts a fresh route search from `start` to `goal`. Same-zone requests
/// skip the gateway graph entirely and fall straight to a single tile-A*
/// hop, exactly as `fpathGatewayRoute` short-circuits when
/// `fpathPointInGateway` finds both ends already share a zone.
#[allow(clippy::too_many_arguments)]
pub fn plan_new(
    map: &impl MapView,
    gateway_astar: &impl GatewayAStar,
    gateway_table: &impl GatewayTable,
    tile_astar: &mut impl TileAStar,
    target_relevance: &impl TargetRelevance,
    player: u32,
    propulsion: PropulsionClass,
    scale: TileScale,
    start: Tile,
    goal: Tile,
    loop_limit: u64,
) -> PlanVerdict {
    let start_world = scale.tile_centre(start);
    let goal_world = scale.tile_centre(goal);

    let same_zone = match (map.zone_at(start), map.zone_at(goal)) {
        (Some(a), Some(b)) => a == b,
        _ => return PlanVerdict::Failed,
    };

    if same_zone {
        trace!(?start, ?goal, "same zone, single tile hop");
        return single_hop_verdict(tile_astar, target_relevance, start, goal, loop_limit);
    }

    let (verdict, chain) =
        gateway_astar.route(player, propulsion.gateway_terrain_mask(), start_world, goal_world);
    match verdict {
        GatewayVerdict::NoZone => PlanVerdict::Failed,
        GatewayVerdict::Failed => {
            if propulsion.is_vtol() {
                PlanVerdict::Failed
            } else {
                single_hop_verdict(tile_astar, target_relevance, start, goal, loop_limit)
            }
        }
        GatewayVerdict::SameZone => single_hop_verdict(tile_astar, target_relevance, start, goal, loop_limit),
        GatewayVerdict::Ok | GatewayVerdict::Nearest => {
            let chain = match chain {
                Some(c) if !c.is_empty() => c,
                _ => return PlanVerdict::Failed,
            };
            let hop_index = initial_hop_index(gateway_table, &chain, start);
            advance(
                map,
                gateway_astar,
                gateway_table,
                tile_astar,
                target_relevance,
                player,
                propulsion,
                scale,
                PlannerState {
                    chain,
                    hop_index,
                    current_tile: start,
                    goal,
                    waypoints: Vec::new(),
                    ignored_gateways: FxHashSet::default(),
                    blocked_links: FxHashSet::default(),
                    retries: 0,
                },
                loop_limit,
                SearchMode::New,
            )
        }
    }
}

/// Resumes a parked search from a previous [`PlanVerdict::Wait`].
#[allow(clippy::too_many_arguments)]
pub fn plan_continue(
    map: &impl MapView,
    gateway_astar: &impl GatewayAStar,
    gateway_table: &impl GatewayTable,
    tile_astar: &mut impl TileAStar,
    target_relevance: &impl TargetRelevance,
    player: u32,
    propulsion: PropulsionClass,
    scale: TileScale,
    state: PlannerState,
    loop_limit: u64,
) -> PlanVerdict {
    advance(
        map,
        gateway_astar,
        gateway_table,
        tile_astar,
        target_relevance,
        player,
        propulsion,
        scale,
        state,
        loop_limit,
        SearchMode::Continue,
    )
}

/// What asking the gateway A* for a fresh chain during a blame-retry
/// cycle resolved to, translating `GatewayVerdict` per §4.5 step 2.
enum RetryOutcome {
    /// `OK` with a chain that doesn't reuse anything already blamed.
    Chain(GatewayChain),
    /// `NO-ZONE`/`SAME-ZONE`, or `FAILED` for a non-VTOL: the rest of the
    /// route is a single intra-zone hop straight to the goal.
    NoChain,
    /// `NEAREST` on retry: accept whatever has been emitted so far rather
    /// than treat this like a basis for continuing the chain walk.
    AcceptCurrent,
    /// Retries exhausted, the gateway search failed outright for a VTOL,
    /// or the new chain reuses a blamed gateway/link.
    Fail,
}

/// Requests a fresh gateway chain that avoids every gateway/link the
/// search has already blamed, mirroring `fpathGatewayRoute`'s retry after
/// marking `GWR_IGNORE`/`GWRL_BLOCKED`. The gateway A* is out of scope —
/// it is trusted to route around whatever was already ruled unusable in
/// this zone pair; here we simply detect whether it handed back a chain
/// that reuses a blamed gateway and reject it if so. Unlike the first
/// request in [`plan_new`], a `NEAREST` verdict here does *not* get
/// treated like `OK` — §4.5 step 2 only extends that leniency to the
/// first attempt.
fn reblame_and_retry(
    gateway_astar: &impl GatewayAStar,
    player: u32,
    propulsion: PropulsionClass,
    state: &mut PlannerState,
    start_world: WorldPos,
    goal_world: WorldPos,
) -> RetryOutcome {
    state.retries += 1;
    if state.retries > MAX_GATEWAY_RETRIES {
        return RetryOutcome::Fail;
    }
    let (verdict, chain) =
        gateway_astar.route(player, propulsion.gateway_terrain_mask(), start_world, goal_world);
    match verdict {
        GatewayVerdict::NoZone | GatewayVerdict::SameZone => RetryOutcome::NoChain,
        GatewayVerdict::Failed => {
            if propulsion.is_vtol() {
                RetryOutcome::Fail
            } else {
                RetryOutcome::NoChain
            }
        }
        GatewayVerdict::Nearest => RetryOutcome::AcceptCurrent,
        GatewayVerdict::Ok => {
            let Some(chain) = chain else {
                return RetryOutcome::Fail;
            };
            if chain.gateways.iter().any(|id| state.ignored_gateways.contains(id)) {
                return RetryOutcome::Fail;
            }
            for pair in chain.gateways.windows(2) {
                if state.blocked_links.contains(&(pair[0], pair[1])) {
                    return RetryOutcome::Fail;
                }
            }
            RetryOutcome::Chain(chain)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn advance(
    map: &impl MapView,
    gateway_astar: &impl GatewayAStar,
    gateway_table: &impl GatewayTable,
    tile_astar: &mut impl TileAStar,
    target_relevance: &impl TargetRelevance,
    player: u32,
    propulsion: PropulsionClass,
    scale: TileScale,
    mut state: PlannerState,
    loop_limit: u64,
    mut mode: SearchMode,
) -> PlanVerdict {
    let goal_world = scale.tile_centre(state.goal);

    'chain_walk: loop {
        while state.hop_index < state.chain.gateways.len() {
            let gateway_id = state.chain.gateways[state.hop_index];
            let prev_gateway = (state.hop_index > 0).then(|| state.chain.gateways[state.hop_index - 1]);
            let zone = map.zone_at(state.current_tile).unwrap_or(gateway_table.get(gateway_id).zone_a);
            let overlay = hop_overlay(map, gateway_table, zone, prev_gateway, gateway_id);
            let gateway = gateway_table.get(gateway_id);
            let hop_goal = match gateway.crossing_point(state.current_tile) {
                Some(tile) => tile,
                None => return PlanVerdict::Failed,
            };
            let is_final_hop = state.hop_index + 1 == state.chain.gateways.len();

            match run_hop(tile_astar, target_relevance, mode, state.current_tile, hop_goal, &overlay, loop_limit) {
                HopResult::Ok { waypoints, exact, terminal } => {
                    if terminal {
                        state.waypoints.extend(waypoints);
                        return PlanVerdict::Ok {
                            waypoints: state.waypoints,
                            exact: true,
                        };
                    }
                    if !exact && !is_final_hop {
                        // Didn't make it through this gateway: blame it
                        // and whatever link led to it, then ask for a
                        // fresh chain around the obstruction.
                        state.waypoints.extend(waypoints);
                        state.ignored_gateways.insert(gateway_id);
                        if let Some(prev) = prev_gateway {
                            state.blocked_links.insert((prev, gateway_id));
                        }
                        let start_world = scale.tile_centre(state.current_tile);
                        match reblame_and_retry(gateway_astar, player, propulsion, &mut state, start_world, goal_world) {
                            RetryOutcome::Chain(new_chain) => {
                                debug!(gateway = ?gateway_id, "blamed gateway, retrying with fresh chain");
                                state.hop_index = initial_hop_index(gateway_table, &new_chain, state.current_tile);
                                state.chain = new_chain;
                                mode = SearchMode::New;
                                continue 'chain_walk;
                            }
                            RetryOutcome::NoChain => {
                                debug!(gateway = ?gateway_id, "no chain remains, finishing as a single intra-zone hop");
                                state.chain = GatewayChain::default();
                                break 'chain_walk;
                            }
                            RetryOutcome::AcceptCurrent => {
                                warn!(gateway = ?gateway_id, "gateway search found only a nearest chain on retry");
                                return if state.waypoints.is_empty() {
                                    PlanVerdict::Failed
                                } else {
                                    PlanVerdict::Ok {
                                        waypoints: state.waypoints,
                                        exact: false,
                                    }
                                };
                            }
                            RetryOutcome::Fail => return PlanVerdict::Failed,
                        }
                    }
                    state.waypoints.extend(waypoints);
                    state.current_tile = hop_goal;
                    state.hop_index += 1;
                    mode = SearchMode::New;
                }
                HopResult::OutOfBudget => return PlanVerdict::Wait(state),
                HopResult::Failed { waypoints } => {
                    if is_final_hop {
                        adopt_closer(&mut state, waypoints, goal_world, scale);
                        return PlanVerdict::Failed;
                    }
                    state.ignored_gateways.insert(gateway_id);
                    if let Some(prev) = prev_gateway {
                        state.blocked_links.insert((prev, gateway_id));
                    }
                    let start_world = scale.tile_centre(state.current_tile);
                    match reblame_and_retry(gateway_astar, player, propulsion, &mut state, start_world, goal_world) {
                        RetryOutcome::Chain(new_chain) => {
                            state.hop_index = initial_hop_index(gateway_table, &new_chain, state.current_tile);
                            state.chain = new_chain;
                            mode = SearchMode::New;
                            continue 'chain_walk;
                        }
                        RetryOutcome::NoChain => {
                            state.chain = GatewayChain::default();
                            break 'chain_walk;
                        }
                        RetryOutcome::AcceptCurrent => {
                            return if state.waypoints.is_empty() {
                                PlanVerdict::Failed
                            } else {
                                PlanVerdict::Ok {
                                    waypoints: state.waypoints,
                                    exact: false,
                                }
                            };
                        }
                        RetryOutcome::Fail => return PlanVerdict::Failed,
                    }
                }
            }
        }
        break;
    }

    debug!(hops = state.chain.len(), "gateway chain exhausted, final hop to goal");
    match run_hop(tile_astar, target_relevance, mode, state.current_tile, state.goal, &Overlay::new(), loop_limit) {
        HopResult::Ok { waypoints, exact, .. } => {
            if exact {
                state.waypoints.extend(waypoints);
            } else {
                adopt_closer(&mut state, waypoints, goal_world, scale);
            }
            PlanVerdict::Ok {
                waypoints: state.waypoints,
                exact,
            }
        }
        HopResult::OutOfBudget => PlanVerdict::Wait(state),
        HopResult::Failed { waypoints } => {
            adopt_closer(&mut state, waypoints, goal_world, scale);
            PlanVerdict::Failed
        }
    }
}
