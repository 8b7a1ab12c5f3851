//! Tuning surface. No environment variables are read anywhere in this
//! crate; callers build a [`Config`] explicitly (or use [`Config::default`]).

use crate::tile::TileScale;

/// Fixed point at which the original's `#define`d constants live in this
/// rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub tile_scale: TileScale,
    /// Maximum number of waypoints a single move control block can hold.
    pub travel_size: usize,
    /// Per-call expansion budget for the tile A*; exceeding it yields
    /// `WAIT` (for the parked unit) or `RESCHEDULE` (for anyone else).
    pub fpath_loop_limit: u64,
    /// Number of frames a parked partial route may sit idle before the
    /// update tick expires it.
    pub partial_route_timeout_frames: u64,
    /// Bound on the number of samples a raycast will take.
    pub ray_max_len: i32,
    /// Ring-search radius for recentring a blocked start tile onto the
    /// nearest clear neighbour.
    pub start_repair_radius: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tile_scale: TileScale::new(128),
            travel_size: 128,
            fpath_loop_limit: 800,
            partial_route_timeout_frames: 5,
            ray_max_len: 4096,
            start_repair_radius: 2,
        }
    }
}
