//! Core types for FindMyStore.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod status;
pub mod store;

pub use category::{Category, CategoryError};
pub use id::*;
pub use price::{CurrencyCode, Price, round_currency};
pub use status::*;
pub use store::{GeoPoint, Store, UNKNOWN_HOURS};
