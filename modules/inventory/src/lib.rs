//! Inventory tracking: fixed assets (patrimonies), consumable stock and the
//! combined item listing.

// === PUBLIC CONTRACT ===
pub mod contract;

pub use contract::{dto, error, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::{Inventory, InventoryServices};

pub mod config;
pub use config::InventoryConfig;

// === INTERNAL MODULES ===
// Exposed for tests; consumers should stick to `contract` and `module`.
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
