//! Gateway graph: the zones a map is partitioned into, the gateways that
//! connect adjacent zones, and the links between gateways that the
//! high-level A* walks. Grounded on the original's `PSX_GATEWAY`/`FPATH_LINK`
//! records (`fpathPointInGateway`, `fpathGatewayCoords`,
//! `fpathBlockGatewayLink`) and restructured the way the teacher's
//! `navpath-service/src/planner/graph.rs` models `NodeKind`/`EdgeKind` —
//! owned, indexable records instead of an intrusive linked list.

use bitflags::bitflags;

use crate::tile::Tile;

/// Partition id a tile belongs to. Two tiles are mutually reachable by the
/// tile A* alone only if they share a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Zone(pub u32);

/// Index of a gateway record within a [`GatewayTable`](crate::collaborators::GatewayTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GatewayId(pub u32);

bitflags! {
    /// Which propulsion classes may use a gateway at all, mirroring the
    /// original's ground/hover-vs-lift distinction at the gateway level.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GwTerrainMask: u8 {
        const LAND = 0b01;
        const WATER = 0b10;
        const ALL = Self::LAND.bits() | Self::WATER.bits();
    }
}

bitflags! {
    /// Per-gateway state flags. `WATERLINK` marks a gateway that only
    /// hover/lift propulsion may cross; `ZONE1`/`ZONE2` orientation is kept
    /// in the `zone_a`/`zone_b` fields instead of a flag bit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GatewayFlags: u8 {
        const WATERLINK = 0b001;
    }
}

bitflags! {
    /// Per-link flags, set by [`crate::overlay`] when a search wants to
    /// steer away from a link without mutating the gateway table itself.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LinkFlags: u8 {
        const IGNORE = 0b01;
        const BLOCKED = 0b10;
    }
}

/// A single gateway: the short wall of tiles separating two zones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gateway {
    pub id: GatewayId,
    pub zone_a: Zone,
    pub zone_b: Zone,
    pub flags: GatewayFlags,
    /// Tiles making up the gateway's crossing line, in a fixed order so
    /// [`crossing_point`](Gateway::crossing_point) is deterministic.
    pub tiles: Vec<Tile>,
    pub links: Vec<Link>,
}

impl Gateway {
    pub fn is_in_gateway(&self, tile: Tile) -> bool {
        self.tiles.contains(&tile)
    }

    /// Picks the crossing tile closest to `from`, breaking ties toward the
    /// first tile in `tiles` — grounds `fpathGatewayCoords`'s midpoint-bias
    /// tie-break.
    pub fn crossing_point(&self, from: Tile) -> Option<Tile> {
        self.tiles
            .iter()
            .copied()
            .min_by_key(|t| {
                let dx = (t.x - from.x) as i64;
                let dy = (t.y - from.y) as i64;
                dx * dx + dy * dy
            })
    }

    pub fn other_zone(&self, zone: Zone) -> Option<Zone> {
        if zone == self.zone_a {
            Some(self.zone_b)
        } else if zone == self.zone_b {
            Some(self.zone_a)
        } else {
            None
        }
    }
}

/// A directed edge from one gateway to an adjacent one within a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub to: GatewayId,
    pub flags: LinkFlags,
    pub cost: u32,
}

/// An ordered sequence of gateways the high-level A* decided to cross,
/// start zone to goal zone. Replaces the original's intrusive
/// `psNextGateway`-linked list with an owned `Vec`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GatewayChain {
    pub gateways: Vec<GatewayId>,
}

impl GatewayChain {
    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }

    pub fn len(&self) -> usize {
        self.gateways.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gw(id: u32, tiles: &[(i32, i32)]) -> Gateway {
        Gateway {
            id: GatewayId(id),
            zone_a: Zone(0),
            zone_b: Zone(1),
            flags: GatewayFlags::empty(),
            tiles: tiles.iter().map(|&(x, y)| Tile::new(x, y)).collect(),
            links: Vec::new(),
        }
    }

    #[test]
    fn crossing_point_picks_nearest_tile() {
        let gateway = gw(0, &[(0, 0), (0, 1), (0, 2)]);
        assert_eq!(gateway.crossing_point(Tile::new(0, 5)), Some(Tile::new(0, 2)));
        assert_eq!(gateway.crossing_point(Tile::new(0, -5)), Some(Tile::new(0, 0)));
    }

    #[test]
    fn other_zone_reflects_across_gateway() {
        let gateway = gw(0, &[(0, 0)]);
        assert_eq!(gateway.other_zone(Zone(0)), Some(Zone(1)));
        assert_eq!(gateway.other_zone(Zone(1)), Some(Zone(0)));
        assert_eq!(gateway.other_zone(Zone(2)), None);
    }
}
