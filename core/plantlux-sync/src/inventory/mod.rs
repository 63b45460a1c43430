//! Inventory service clients.
//!
//! The inventory service owns the plant records. [`InventoryClient`] is the
//! boundary the rest of the crate talks to; [`HttpInventoryClient`] speaks
//! the service's JSON-over-HTTP API and [`mock::FakeInventory`] stands in
//! for it in tests.

pub mod client;
pub mod http;

pub use client::{mock, InventoryClient, InventoryOp};
pub use http::HttpInventoryClient;
