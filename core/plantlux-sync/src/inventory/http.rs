//! HTTP inventory client.
//!
//! Speaks the inventory service's JSON API:
//! `GET /plants`, `POST /plants`, `PUT /plants/{id}`, `DELETE /plants/{id}`.

use super::client::InventoryClient;
use crate::config::InventoryConfig;
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use plantlux_types::{Plant, PlantId};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Inventory client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    config: InventoryConfig,
    client: Client,
}

impl HttpInventoryClient {
    /// Creates a client for the service at `config.base_url`.
    pub fn new(config: InventoryConfig) -> SyncResult<Self> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(SyncError::Config(format!(
                "base URL must be http(s): {:?}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SyncError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    fn collection_url(&self) -> String {
        format!("{}/plants", self.config.base_url.trim_end_matches('/'))
    }

    fn record_url(&self, id: PlantId) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    /// Maps a non-success response to an error. 404 against a known id
    /// becomes `NotFound`.
    async fn check(response: Response, target: Option<PlantId>) -> SyncResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if let (StatusCode::NOT_FOUND, Some(id)) = (status, target) {
            return Err(SyncError::NotFound(id));
        }
        let message = response.text().await.unwrap_or_default();
        Err(SyncError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> SyncResult<T> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Decodes the record echoed by a create or update. The 2xx status alone
    /// means the change is durable, so an empty or unreadable body falls back
    /// to the record that was sent.
    async fn decode_echo(response: Response, sent: &Plant) -> SyncResult<Plant> {
        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(sent.clone());
        }
        match serde_json::from_slice(&body) {
            Ok(plant) => Ok(plant),
            Err(e) => {
                warn!("Ignoring unreadable response body for {:?}: {}", sent.name, e);
                Ok(sent.clone())
            }
        }
    }
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    async fn list_plants(&self) -> SyncResult<Vec<Plant>> {
        debug!("Listing plants");

        let response = self.client.get(self.collection_url()).send().await?;
        let response = Self::check(response, None).await?;
        let plants: Vec<Plant> = Self::decode(response).await?;

        debug!("Listed {} plants", plants.len());
        Ok(plants)
    }

    async fn create_plant(&self, plant: &Plant) -> SyncResult<Plant> {
        debug!("Creating plant: {}", plant.name);

        let response = self
            .client
            .post(self.collection_url())
            .json(plant)
            .send()
            .await?;
        let response = Self::check(response, None).await?;
        let created = Self::decode_echo(response, plant).await?;

        info!("Created plant: {}", created.name);
        Ok(created)
    }

    async fn update_plant(&self, id: PlantId, plant: &Plant) -> SyncResult<Plant> {
        debug!("Updating plant: {}", id);

        let response = self
            .client
            .put(self.record_url(id))
            .json(plant)
            .send()
            .await?;
        let response = Self::check(response, Some(id)).await?;
        let updated = Self::decode_echo(response, plant).await?;

        info!("Updated plant: {}", id);
        Ok(updated)
    }

    async fn delete_plant(&self, id: PlantId) -> SyncResult<()> {
        debug!("Deleting plant: {}", id);

        let response = self.client.delete(self.record_url(id)).send().await?;
        Self::check(response, Some(id)).await?;

        info!("Deleted plant: {}", id);
        Ok(())
    }
}
