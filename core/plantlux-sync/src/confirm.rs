//! Delete confirmation workflow.
//!
//! A delete gesture on a list row does not delete anything by itself. It
//! moves the machine to [`ConfirmState::PendingConfirmation`]; the user then
//! confirms (the record is deleted) or cancels (the list is reloaded, which
//! publishes a new revision so the gesture UI can reset its row).

use crate::controller::{Outcome, SyncController};
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use plantlux_types::{Plant, PlantId};
use thiserror::Error;
use tracing::debug;

/// List operations the confirmation workflow drives.
#[async_trait]
pub trait ListActions: Send + Sync {
    /// Deletes a record.
    async fn delete(&self, id: PlantId) -> SyncResult<Outcome>;

    /// Reloads the list.
    async fn reload(&self) -> SyncResult<Outcome>;
}

#[async_trait]
impl ListActions for SyncController {
    async fn delete(&self, id: PlantId) -> SyncResult<Outcome> {
        SyncController::delete(self, id).await
    }

    async fn reload(&self) -> SyncResult<Outcome> {
        SyncController::reload(self).await
    }
}

/// Errors from a confirmation transition.
#[derive(Debug, Error)]
pub enum ConfirmError {
    /// Confirm or cancel arrived with no delete pending.
    #[error("no delete is awaiting confirmation")]
    NothingPending,

    /// The transition happened but its side effect failed.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Logical state of the workflow.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConfirmState {
    #[default]
    Idle,
    PendingConfirmation(Plant),
}

/// Confirm/cancel state machine in front of a destructive delete.
pub struct DeleteConfirmation<A> {
    actions: A,
    state: ConfirmState,
}

impl<A: ListActions> DeleteConfirmation<A> {
    /// Creates an idle machine driving `actions`.
    pub fn new(actions: A) -> Self {
        Self {
            actions,
            state: ConfirmState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> &ConfirmState {
        &self.state
    }

    /// The record awaiting confirmation, if any.
    pub fn pending(&self) -> Option<&Plant> {
        match &self.state {
            ConfirmState::PendingConfirmation(plant) => Some(plant),
            ConfirmState::Idle => None,
        }
    }

    /// A delete gesture on `plant`. A newer gesture replaces a pending one.
    pub fn request(&mut self, plant: Plant) {
        if let Some(previous) = self.pending() {
            debug!("Delete request for {} replaces pending {}", plant.id, previous.id);
        } else {
            debug!("Delete of plant {} awaiting confirmation", plant.id);
        }
        self.state = ConfirmState::PendingConfirmation(plant);
    }

    /// Confirms the pending delete. The machine is idle again before the
    /// delete runs, whatever its result.
    pub async fn confirm(&mut self) -> Result<Outcome, ConfirmError> {
        let plant = self.take_pending()?;
        debug!("Delete of plant {} confirmed", plant.id);
        Ok(self.actions.delete(plant.id).await?)
    }

    /// Cancels the pending delete and reloads the list.
    pub async fn cancel(&mut self) -> Result<Outcome, ConfirmError> {
        let plant = self.take_pending()?;
        debug!("Delete of plant {} cancelled", plant.id);
        Ok(self.actions.reload().await?)
    }

    fn take_pending(&mut self) -> Result<Plant, ConfirmError> {
        match std::mem::take(&mut self.state) {
            ConfirmState::PendingConfirmation(plant) => Ok(plant),
            ConfirmState::Idle => Err(ConfirmError::NothingPending),
        }
    }
}
