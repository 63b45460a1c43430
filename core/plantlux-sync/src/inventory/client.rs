//! Inventory client abstraction trait.

use crate::error::SyncResult;
use async_trait::async_trait;
use plantlux_types::{Plant, PlantId};
use std::fmt;

/// The remote capabilities of the inventory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryOp {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for InventoryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InventoryOp::List => "list",
            InventoryOp::Create => "create",
            InventoryOp::Update => "update",
            InventoryOp::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Abstract inventory service interface.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Returns every record, in the service's order.
    async fn list_plants(&self) -> SyncResult<Vec<Plant>>;

    /// Creates a record. The returned copy carries the assigned id.
    async fn create_plant(&self, plant: &Plant) -> SyncResult<Plant>;

    /// Replaces the record stored under `id`.
    async fn update_plant(&self, id: PlantId, plant: &Plant) -> SyncResult<Plant>;

    /// Deletes the record stored under `id`.
    async fn delete_plant(&self, id: PlantId) -> SyncResult<()>;
}

/// An in-memory inventory service for testing.
pub mod mock {
    use super::*;
    use crate::error::SyncError;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    /// A failure the fake service can be told to produce.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Fault {
        /// No response.
        Network,
        /// Non-success status.
        Status(u16),
        /// Malformed response body.
        Decode,
        /// The call never resolves.
        Hang,
    }

    impl Fault {
        fn into_error(self, op: InventoryOp) -> SyncError {
            match self {
                Fault::Network => SyncError::Network(format!("{op}: connection refused")),
                Fault::Status(status) => SyncError::Rejected {
                    status,
                    message: format!("{op} rejected"),
                },
                Fault::Decode => SyncError::Decode(format!("{op}: expected value at line 1")),
                Fault::Hang => SyncError::Timeout,
            }
        }
    }

    #[derive(Default)]
    struct Inner {
        plants: Vec<Plant>,
        next_id: i64,
        faults: HashMap<InventoryOp, VecDeque<Fault>>,
        latency: HashMap<InventoryOp, VecDeque<Duration>>,
        calls: HashMap<InventoryOp, usize>,
    }

    /// Fake inventory service with id assignment, fault injection, latency
    /// and call counting.
    pub struct FakeInventory {
        inner: Mutex<Inner>,
    }

    impl Default for FakeInventory {
        fn default() -> Self {
            Self::new()
        }
    }

    impl FakeInventory {
        /// Creates an empty service. Ids are assigned from 1.
        pub fn new() -> Self {
            Self {
                inner: Mutex::new(Inner {
                    next_id: 1,
                    ..Default::default()
                }),
            }
        }

        /// Creates a service holding `plants`. Ids continue after the largest.
        pub fn with_plants(plants: Vec<Plant>) -> Self {
            let next_id = plants.iter().map(|p| p.id.get()).max().unwrap_or(0) + 1;
            Self {
                inner: Mutex::new(Inner {
                    plants,
                    next_id,
                    ..Default::default()
                }),
            }
        }

        /// Current remote records.
        pub fn plants(&self) -> Vec<Plant> {
            self.inner.lock().unwrap().plants.clone()
        }

        /// Changes remote state behind the client's back.
        pub fn replace_plants(&self, plants: Vec<Plant>) {
            self.inner.lock().unwrap().plants = plants;
        }

        /// Makes the next call of `op` fail with `fault`. Queued faults are
        /// consumed one per call.
        pub fn fail_next(&self, op: InventoryOp, fault: Fault) {
            self.inner
                .lock()
                .unwrap()
                .faults
                .entry(op)
                .or_default()
                .push_back(fault);
        }

        /// Delays the next call of `op` by `delay` before it resolves. The
        /// call's result is computed before the delay.
        pub fn delay_next(&self, op: InventoryOp, delay: Duration) {
            self.inner
                .lock()
                .unwrap()
                .latency
                .entry(op)
                .or_default()
                .push_back(delay);
        }

        /// Number of calls made for `op`, failed ones included.
        pub fn calls(&self, op: InventoryOp) -> usize {
            self.inner
                .lock()
                .unwrap()
                .calls
                .get(&op)
                .copied()
                .unwrap_or(0)
        }

        fn begin(&self, op: InventoryOp) -> (Option<Fault>, Option<Duration>) {
            let mut inner = self.inner.lock().unwrap();
            *inner.calls.entry(op).or_default() += 1;
            let fault = inner.faults.get_mut(&op).and_then(VecDeque::pop_front);
            let delay = inner.latency.get_mut(&op).and_then(VecDeque::pop_front);
            (fault, delay)
        }

        async fn settle<T>(
            op: InventoryOp,
            fault: Option<Fault>,
            delay: Option<Duration>,
            result: impl FnOnce() -> SyncResult<T>,
        ) -> SyncResult<T> {
            let outcome = match fault {
                Some(Fault::Hang) => return std::future::pending().await,
                Some(fault) => Err(fault.into_error(op)),
                None => result(),
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            outcome
        }
    }

    #[async_trait]
    impl InventoryClient for FakeInventory {
        async fn list_plants(&self) -> SyncResult<Vec<Plant>> {
            let (fault, delay) = self.begin(InventoryOp::List);
            let snapshot = self.plants();
            Self::settle(InventoryOp::List, fault, delay, || Ok(snapshot)).await
        }

        async fn create_plant(&self, plant: &Plant) -> SyncResult<Plant> {
            let (fault, delay) = self.begin(InventoryOp::Create);
            Self::settle(InventoryOp::Create, fault, delay, || {
                let mut inner = self.inner.lock().unwrap();
                let mut created = plant.clone();
                created.id = PlantId::new(inner.next_id);
                inner.next_id += 1;
                inner.plants.push(created.clone());
                Ok(created)
            })
            .await
        }

        async fn update_plant(&self, id: PlantId, plant: &Plant) -> SyncResult<Plant> {
            let (fault, delay) = self.begin(InventoryOp::Update);
            Self::settle(InventoryOp::Update, fault, delay, || {
                let mut inner = self.inner.lock().unwrap();
                let slot = inner
                    .plants
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or(SyncError::NotFound(id))?;
                *slot = Plant {
                    id,
                    ..plant.clone()
                };
                Ok(slot.clone())
            })
            .await
        }

        async fn delete_plant(&self, id: PlantId) -> SyncResult<()> {
            let (fault, delay) = self.begin(InventoryOp::Delete);
            Self::settle(InventoryOp::Delete, fault, delay, || {
                let mut inner = self.inner.lock().unwrap();
                let before = inner.plants.len();
                inner.plants.retain(|p| p.id != id);
                if inner.plants.len() == before {
                    return Err(SyncError::NotFound(id));
                }
                Ok(())
            })
            .await
        }
    }
}
