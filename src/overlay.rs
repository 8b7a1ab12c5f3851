//! Per-search scratch overlay.
//!
//! The original funnels a hop's tile A* through a chosen gateway pair by
//! setting a shared `BITS_FPATHBLOCK` bit on tiles around every *other*
//! gateway on the same zone boundary (`fpathSetGatewayBlock`/
//! `fpathClearGatewayBlock`), then clearing it again once the hop
//! finishes. That shared mutable map bit is exactly the kind of global
//! state this rewrite's REDESIGN FLAGS call out: two hops running back to
//! back (or, in principle, concurrently) would corrupt each other's view
//! of which tiles are blocked. Here the same effect — steer the tile A*
//! away from every gateway except the one the high-level plan picked — is
//! a scratch set owned by the search itself and thrown away when the hop
//! completes.

use rustc_hash::FxHashSet;

use crate::gateway::{Gateway, GatewayId};
use crate::tile::Tile;

/// Tiles temporarily treated as blocked for the duration of one tile-A*
/// hop, plus the single gateway that hop is allowed to pass through.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    blocked: FxHashSet<Tile>,
    allowed_gateway: Option<GatewayId>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the overlay for a hop that must cross `target`: every other
    /// gateway bordering the same two zones gets its tiles blocked.
    pub fn for_gateway_hop<'a>(target: GatewayId, same_boundary: impl Iterator<Item = &'a Gateway>) -> Self {
        let mut overlay = Self::new();
        overlay.allowed_gateway = Some(target);
        for gateway in same_boundary {
            if gateway.id != target {
                overlay.blocked.extend(gateway.tiles.iter().copied());
            }
        }
        overlay
    }

    pub fn is_blocked(&self, tile: Tile) -> bool {
        self.blocked.contains(&tile)
    }

    pub fn allowed_gateway(&self) -> Option<GatewayId> {
        self.allowed_gateway
    }

    pub fn block(&mut self, tile: Tile) {
        self.blocked.insert(tile);
    }

    pub fn unblock(&mut self, tile: Tile) {
        self.blocked.remove(&tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gw(id: u32, tiles: &[(i32, i32)]) -> Gateway {
        Gateway {
            id: GatewayId(id),
            zone_a: crate::gateway::Zone(0),
            zone_b: crate::gateway::Zone(1),
            flags: crate::gateway::GatewayFlags::empty(),
            tiles: tiles.iter().map(|&(x, y)| Tile::new(x, y)).collect(),
            links: Vec::new(),
        }
    }

    #[test]
    fn blocks_every_gateway_except_the_chosen_one() {
        let a = gw(0, &[(0, 0)]);
        let b = gw(1, &[(1, 1)]);
        let c = gw(2, &[(2, 2)]);
        let overlay = Overlay::for_gateway_hop(GatewayId(1), [&a, &b, &c].into_iter());

        assert!(overlay.is_blocked(Tile::new(0, 0)));
        assert!(overlay.is_blocked(Tile::new(2, 2)));
        assert!(!overlay.is_blocked(Tile::new(1, 1)));
        assert_eq!(overlay.allowed_gateway(), Some(GatewayId(1)));
    }

    #[test]
    fn block_and_unblock_are_scoped_to_this_overlay() {
        let mut overlay = Overlay::new();
        overlay.block(Tile::new(3, 3));
        assert!(overlay.is_blocked(Tile::new(3, 3)));
        overlay.unblock(Tile::new(3, 3));
        assert!(!overlay.is_blocked(Tile::new(3, 3)));
    }
}
