//! Inventory synchronization for plantlux.
//!
//! Mediates between user-initiated changes, the remote inventory service and
//! the in-memory plant list the rest of the application observes.
//!
//! # Architecture
//!
//! The local list is never patched. Every change is sent to the service in
//! full and followed by a reload that replaces the whole collection, so the
//! local view cannot drift from the service's ordering or defaults.
//!
//! ## Components
//!
//! - **Inventory**: the service boundary (`InventoryClient`) and its HTTP implementation
//! - **Repository**: pass-through from domain operations to the client
//! - **Controller**: owns the list, loading flag, revision and light reading;
//!   serializes operations through a single-consumer queue
//! - **Confirm**: confirm/cancel workflow in front of a delete
//! - **Sensor**: explicit start/stop light sources feeding the controller
//!
//! # Example
//!
//! ```no_run
//! use plantlux_sync::{
//!     ControllerConfig, HttpInventoryClient, InventoryConfig, PlantRepository, SyncController,
//! };
//! use plantlux_types::NewPlant;
//! use std::sync::Arc;
//!
//! # async fn run() -> plantlux_sync::SyncResult<()> {
//! let client = HttpInventoryClient::new(InventoryConfig::default())?;
//! let repository = PlantRepository::new(Arc::new(client));
//! let controller = SyncController::spawn(repository, ControllerConfig::default());
//!
//! controller.reload().await?;
//! controller
//!     .create(NewPlant::new("Fern", "Tropical", 200.0, None))
//!     .await?;
//! controller.set_light(180.0);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod confirm;
pub mod controller;
mod error;
pub mod inventory;
pub mod repository;
pub mod sensor;

pub use config::{ControllerConfig, InventoryConfig};
pub use confirm::{ConfirmError, ConfirmState, DeleteConfirmation, ListActions};
pub use controller::{LightSink, Outcome, Snapshot, SyncController};
pub use error::{Failure, SyncError, SyncResult};
pub use inventory::{HttpInventoryClient, InventoryClient, InventoryOp};
pub use repository::PlantRepository;
pub use sensor::{ChannelLightSensor, LightSensor};
