//! Plant repository: domain operations over an injected inventory client.
//!
//! The repository holds no state of its own and adds no caching, retry or
//! validation. Errors from the client are returned unchanged.

use crate::error::SyncResult;
use crate::inventory::InventoryClient;
use plantlux_types::{Plant, PlantId};
use std::sync::Arc;

/// Thin translation layer between the controller and the inventory client.
#[derive(Clone)]
pub struct PlantRepository {
    client: Arc<dyn InventoryClient>,
}

impl PlantRepository {
    /// Creates a repository over `client`.
    pub fn new(client: Arc<dyn InventoryClient>) -> Self {
        Self { client }
    }

    /// Fetches every record.
    pub async fn list_all(&self) -> SyncResult<Vec<Plant>> {
        self.client.list_plants().await
    }

    /// Submits a new record; the result carries the assigned id.
    pub async fn create(&self, plant: &Plant) -> SyncResult<Plant> {
        self.client.create_plant(plant).await
    }

    /// Replaces the record stored under `id`.
    pub async fn update(&self, id: PlantId, plant: &Plant) -> SyncResult<Plant> {
        self.client.update_plant(id, plant).await
    }

    /// Deletes the record stored under `id`.
    pub async fn delete(&self, id: PlantId) -> SyncResult<()> {
        self.client.delete_plant(id).await
    }
}
