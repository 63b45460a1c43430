//! Synchronization controller.
//!
//! The controller owns the local view of the inventory: the record list, the
//! loading flag, the revision counter and the live light reading. Record
//! operations are queued and executed one at a time by a single worker task,
//! so the published state always reflects the last operation *issued*, never
//! a slower earlier one that happened to resolve later.
//!
//! Every mutation is sent to the service in full and followed by a reload
//! that replaces the whole collection. Nothing is patched locally.
//!
//! State is published as immutable [`Snapshot`]s through a `watch` channel.

use crate::config::ControllerConfig;
use crate::error::{SyncError, SyncResult};
use crate::inventory::InventoryOp;
use crate::repository::PlantRepository;
use plantlux_types::{LightReport, LightStatus, NewPlant, Plant, PlantId};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

/// Immutable view of the controller state at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Records in the service's order.
    pub records: Arc<[Plant]>,
    /// Whether a reload is in flight.
    pub is_loading: bool,
    /// Latest ambient light sample (lux).
    pub current_light: f64,
    /// Incremented once per successful reload.
    pub revision: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            records: Arc::from(Vec::<Plant>::new()),
            is_loading: false,
            current_light: 0.0,
            revision: 0,
        }
    }
}

impl Snapshot {
    /// Looks up a record by id.
    pub fn find(&self, id: PlantId) -> Option<&Plant> {
        self.records.iter().find(|p| p.id == id)
    }

    /// Recommendation for record `id` under the current light. `None` if the
    /// record is absent or its requirement is not positive.
    pub fn light_report(&self, id: PlantId) -> Option<LightReport> {
        self.find(id)?.light_report(self.current_light).ok()
    }

    /// Every record paired with its status under the current light.
    pub fn statuses(&self) -> impl Iterator<Item = (&Plant, Option<LightStatus>)> + '_ {
        let current = self.current_light;
        self.records
            .iter()
            .map(move |p| (p, p.light_status(current).ok()))
    }
}

/// How a record operation settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The service accepted the operation and the local view was reloaded.
    Synced { revision: u64 },
    /// The target no longer existed remotely, which is what the operation
    /// wanted anyway. The local view was reloaded.
    AlreadyConverged { revision: u64 },
}

impl Outcome {
    /// Revision published by the reload that settled this operation.
    pub fn revision(&self) -> u64 {
        match self {
            Outcome::Synced { revision } | Outcome::AlreadyConverged { revision } => *revision,
        }
    }
}

type Reply = oneshot::Sender<SyncResult<Outcome>>;

/// Command sent to the worker task.
enum Command {
    Reload { reply: Reply },
    Create { plant: Plant, reply: Reply },
    Update { plant: Plant, reply: Reply },
    Delete { id: PlantId, reply: Reply },
}

/// Handle to a running controller. Cheap to clone; the worker stops once
/// every handle is dropped.
#[derive(Clone)]
pub struct SyncController {
    commands: mpsc::Sender<Command>,
    state: Arc<watch::Sender<Snapshot>>,
}

impl SyncController {
    /// Starts the worker task on the current Tokio runtime.
    pub fn spawn(repository: PlantRepository, config: ControllerConfig) -> Self {
        let (commands, command_rx) = mpsc::channel(config.queue_depth.max(1));
        let (state, _) = watch::channel(Snapshot::default());
        let state = Arc::new(state);

        let worker = Worker {
            repository,
            state: Arc::clone(&state),
            timeout: config.operation_timeout(),
        };
        tokio::spawn(worker.run(command_rx));

        debug!("Sync controller started (queue depth {})", config.queue_depth);
        Self { commands, state }
    }

    /// Replaces the local collection with a fresh read from the service.
    pub async fn reload(&self) -> SyncResult<Outcome> {
        self.request(|reply| Command::Reload { reply }).await
    }

    /// Creates a record, then reloads.
    pub async fn create(&self, new: NewPlant) -> SyncResult<Outcome> {
        let plant = Plant::provisional(new);
        self.request(|reply| Command::Create { plant, reply }).await
    }

    /// Sends the full desired record to the service, then reloads.
    pub async fn update(&self, plant: Plant) -> SyncResult<Outcome> {
        if !plant.id.is_assigned() {
            return Err(SyncError::InvalidRecord(format!(
                "cannot update unsaved plant {:?}",
                plant.name
            )));
        }
        self.request(|reply| Command::Update { plant, reply }).await
    }

    /// Deletes a record, then reloads.
    pub async fn delete(&self, id: PlantId) -> SyncResult<Outcome> {
        if !id.is_assigned() {
            return Err(SyncError::InvalidRecord("cannot delete unsaved plant".into()));
        }
        self.request(|reply| Command::Delete { id, reply }).await
    }

    /// Overwrites the live light reading. Not queued behind record operations
    /// and never touches the records or the revision. Non-finite readings
    /// are ignored.
    pub fn set_light(&self, lux: f64) {
        self.light_sink().push(lux);
    }

    /// Write-only access to the light reading, for a sensor source.
    pub fn light_sink(&self) -> LightSink {
        LightSink {
            state: Arc::clone(&self.state),
        }
    }

    /// Looks up a record in the current snapshot without contacting the service.
    pub fn find_by_id(&self, id: PlantId) -> Option<Plant> {
        self.state.borrow().find(id).cloned()
    }

    /// Recommendation for record `id` under the current light.
    pub fn light_report(&self, id: PlantId) -> Option<LightReport> {
        self.state.borrow().light_report(id)
    }

    /// Returns the current state.
    pub fn snapshot(&self) -> Snapshot {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state.subscribe()
    }

    /// Whether the worker task is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    async fn request(&self, make: impl FnOnce(Reply) -> Command) -> SyncResult<Outcome> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| SyncError::ChannelClosed)?;
        response.await.map_err(|_| SyncError::ChannelClosed)?
    }
}

/// Sink for ambient light samples. Holding one does not keep the worker alive.
#[derive(Clone)]
pub struct LightSink {
    state: Arc<watch::Sender<Snapshot>>,
}

impl LightSink {
    /// Publishes a new reading. Non-finite readings are dropped.
    pub fn push(&self, lux: f64) {
        if !lux.is_finite() {
            debug!("Ignoring non-finite light sample");
            return;
        }
        self.state.send_modify(|s| s.current_light = lux);
    }
}

/// Single consumer of the command queue.
struct Worker {
    repository: PlantRepository,
    state: Arc<watch::Sender<Snapshot>>,
    timeout: Option<Duration>,
}

impl Worker {
    async fn run(self, mut commands: mpsc::Receiver<Command>) {
        while let Some(command) = commands.recv().await {
            // A dropped reply means the caller stopped waiting; the operation
            // still ran, so its state change stands.
            match command {
                Command::Reload { reply } => {
                    let _ = reply.send(self.reload().await);
                }
                Command::Create { plant, reply } => {
                    let _ = reply.send(self.create(plant).await);
                }
                Command::Update { plant, reply } => {
                    let _ = reply.send(self.update(plant).await);
                }
                Command::Delete { id, reply } => {
                    let _ = reply.send(self.delete(id).await);
                }
            }
        }
        debug!("Sync controller stopped");
    }

    async fn reload(&self) -> SyncResult<Outcome> {
        self.state.send_modify(|s| s.is_loading = true);

        match self.call(InventoryOp::List, self.repository.list_all()).await {
            Ok(records) => {
                let count = records.len();
                let mut revision = 0;
                self.state.send_modify(|s| {
                    s.records = Arc::from(records);
                    s.revision += 1;
                    s.is_loading = false;
                    revision = s.revision;
                });
                info!("Reloaded {} plants (revision {})", count, revision);
                Ok(Outcome::Synced { revision })
            }
            Err(e) => {
                self.state.send_modify(|s| s.is_loading = false);
                warn!("Reload failed, keeping last known plants: {}", e);
                Err(e)
            }
        }
    }

    async fn create(&self, plant: Plant) -> SyncResult<Outcome> {
        // The returned copy is only a durability signal; the assigned id
        // arrives with the reload.
        self.call(InventoryOp::Create, self.repository.create(&plant))
            .await
            .inspect_err(|e| warn!("Create of {:?} failed: {}", plant.name, e))?;
        self.refresh(false).await
    }

    async fn update(&self, plant: Plant) -> SyncResult<Outcome> {
        let id = plant.id;
        match self
            .call(InventoryOp::Update, self.repository.update(id, &plant))
            .await
        {
            Ok(_) => self.refresh(false).await,
            Err(SyncError::NotFound(_)) => {
                warn!("Plant {} no longer exists remotely; reloading", id);
                self.refresh(true).await
            }
            Err(e) => {
                warn!("Update of plant {} failed: {}", id, e);
                Err(e)
            }
        }
    }

    async fn delete(&self, id: PlantId) -> SyncResult<Outcome> {
        match self.call(InventoryOp::Delete, self.repository.delete(id)).await {
            Ok(()) => self.refresh(false).await,
            Err(SyncError::NotFound(_)) => {
                info!("Plant {} was already deleted remotely; reloading", id);
                self.refresh(true).await
            }
            Err(e) => {
                warn!("Delete of plant {} failed: {}", id, e);
                Err(e)
            }
        }
    }

    /// Reload following a mutation the service has already accepted.
    async fn refresh(&self, converged: bool) -> SyncResult<Outcome> {
        let revision = self
            .reload()
            .await
            .map_err(|e| SyncError::RefreshFailed(Box::new(e)))?
            .revision();
        Ok(if converged {
            Outcome::AlreadyConverged { revision }
        } else {
            Outcome::Synced { revision }
        })
    }

    async fn call<T>(
        &self,
        op: InventoryOp,
        fut: impl Future<Output = SyncResult<T>>,
    ) -> SyncResult<T> {
        let Some(limit) = self.timeout else {
            return fut.await;
        };
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!("{} call exceeded {:?}", op, limit);
                Err(SyncError::Timeout)
            }
        }
    }
}
