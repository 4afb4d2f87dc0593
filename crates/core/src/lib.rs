//! FindMyStore Core - Shared domain types.
//!
//! This crate provides the types used across all FindMyStore components:
//! - `server` - Store registry, inventory, optimizer, agent and HTTP API
//! - `cli` - Command-line front-end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no random
//! sources. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, stores, categories and chat roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
