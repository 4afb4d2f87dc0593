//! FindMyStore server library.
//!
//! Store search, stock and price lookups, shopping-list optimization, restock
//! alerts and a Claude-backed shopping assistant, all scoped to a
//! [`services::FinderSession`].
//!
//! The HTTP binary and the `fms` CLI are both thin front ends over this crate.
//!
//! # Collaborators
//!
//! - Google Maps Geocoding and Places (optional, `MAPS_API_KEY`)
//! - Claude Messages API (optional, `CLAUDE_API_KEY`)
//!
//! Without either key everything except chat works offline against the
//! built-in Hyderabad demo stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod claude;
pub mod config;
pub mod error;
pub mod maps;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

pub use config::FinderConfig;
pub use state::AppState;
