//! Hierarchical unit pathfinding core.
//!
//! Combines three layers the way the original engine does: a
//! line-of-sight shortcut, a gateway-graph A* that picks which zones to
//! cross, and a bounded per-hop tile A* that actually walks each zone.
//! Both A* layers and the map/unit/formation registries they read from
//! are external collaborators — see [`collaborators`] — so this crate
//! owns only the orchestration, the resumable search state, and the
//! blocking-tile rules.
//!
//! Entry points live on [`driver::Driver`]: [`driver::Driver::route`] to
//! request a path, [`driver::Driver::update_tick`] once per simulation
//! frame to expire stale parked searches.

pub mod blocking;
pub mod collaborators;
pub mod config;
pub mod driver;
pub mod endpoint;
pub mod error;
pub mod gateway;
pub mod model;
pub mod overlay;
pub mod planner;
pub mod route_reuse;
pub mod tile;

pub use config::Config;
pub use driver::{Driver, RouteOutcome};
pub use error::RouteError;
