use async_trait::async_trait;
use plantlux_sync::inventory::mock::{FakeInventory, Fault};
use plantlux_sync::{
    ConfirmError, ConfirmState, ControllerConfig, DeleteConfirmation, InventoryOp, ListActions,
    Outcome, PlantRepository, SyncController, SyncError, SyncResult,
};
use plantlux_types::{Plant, PlantId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn plant(id: i64, name: &str) -> Plant {
    Plant {
        id: PlantId::new(id),
        name: name.into(),
        category: "Succulent".into(),
        required_lux: 800.0,
        current_lux: 0.0,
        image_ref: None,
    }
}

/// Records the actions the machine triggers.
#[derive(Clone, Default)]
struct Recorder {
    deleted: Arc<Mutex<Vec<PlantId>>>,
    reloads: Arc<AtomicUsize>,
}

#[async_trait]
impl ListActions for Recorder {
    async fn delete(&self, id: PlantId) -> SyncResult<Outcome> {
        self.deleted.lock().unwrap().push(id);
        Ok(Outcome::Synced { revision: 1 })
    }

    async fn reload(&self) -> SyncResult<Outcome> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(Outcome::Synced { revision: 1 })
    }
}

// ── Transitions ─────────────────────────────────────────────────

#[test]
fn starts_idle() {
    let machine = DeleteConfirmation::new(Recorder::default());
    assert_eq!(machine.state(), &ConfirmState::Idle);
    assert!(machine.pending().is_none());
}

#[test]
fn request_moves_to_pending() {
    let mut machine = DeleteConfirmation::new(Recorder::default());
    machine.request(plant(4, "Aloe"));

    assert_eq!(
        machine.state(),
        &ConfirmState::PendingConfirmation(plant(4, "Aloe"))
    );
}

#[test]
fn newer_request_replaces_pending_target() {
    let mut machine = DeleteConfirmation::new(Recorder::default());
    machine.request(plant(4, "Aloe"));
    machine.request(plant(6, "Jade"));

    assert_eq!(machine.pending().unwrap().id, PlantId::new(6));
}

#[tokio::test]
async fn confirm_deletes_exactly_once() {
    let recorder = Recorder::default();
    let mut machine = DeleteConfirmation::new(recorder.clone());

    machine.request(plant(4, "Aloe"));
    machine.confirm().await.unwrap();

    assert_eq!(machine.state(), &ConfirmState::Idle);
    assert_eq!(*recorder.deleted.lock().unwrap(), vec![PlantId::new(4)]);
    assert_eq!(recorder.reloads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cancel_reloads_exactly_once_without_deleting() {
    let recorder = Recorder::default();
    let mut machine = DeleteConfirmation::new(recorder.clone());

    machine.request(plant(4, "Aloe"));
    machine.cancel().await.unwrap();

    assert_eq!(machine.state(), &ConfirmState::Idle);
    assert!(recorder.deleted.lock().unwrap().is_empty());
    assert_eq!(recorder.reloads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn confirm_or_cancel_while_idle_does_nothing() {
    let recorder = Recorder::default();
    let mut machine = DeleteConfirmation::new(recorder.clone());

    assert!(matches!(machine.confirm().await, Err(ConfirmError::NothingPending)));
    assert!(matches!(machine.cancel().await, Err(ConfirmError::NothingPending)));

    assert!(recorder.deleted.lock().unwrap().is_empty());
    assert_eq!(recorder.reloads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn machine_cycles() {
    let recorder = Recorder::default();
    let mut machine = DeleteConfirmation::new(recorder.clone());

    machine.request(plant(1, "Aloe"));
    machine.cancel().await.unwrap();
    machine.request(plant(2, "Jade"));
    machine.confirm().await.unwrap();
    machine.request(plant(3, "Echeveria"));
    machine.confirm().await.unwrap();

    assert_eq!(
        *recorder.deleted.lock().unwrap(),
        vec![PlantId::new(2), PlantId::new(3)]
    );
    assert_eq!(recorder.reloads.load(Ordering::SeqCst), 1);
}

// ── Against the controller ──────────────────────────────────────

fn controller_over(fake: &Arc<FakeInventory>) -> SyncController {
    SyncController::spawn(PlantRepository::new(fake.clone()), ControllerConfig::default())
}

#[tokio::test]
async fn confirm_through_controller_deletes_and_reloads() {
    let fake = Arc::new(FakeInventory::with_plants(vec![plant(4, "Aloe"), plant(5, "Jade")]));
    let controller = controller_over(&fake);
    controller.reload().await.unwrap();

    let mut machine = DeleteConfirmation::new(controller.clone());
    let target = controller.find_by_id(PlantId::new(5)).unwrap();
    machine.request(target);
    let outcome = machine.confirm().await.unwrap();

    assert_eq!(outcome.revision(), 2);
    assert_eq!(fake.calls(InventoryOp::Delete), 1);
    assert!(controller.find_by_id(PlantId::new(5)).is_none());
}

#[tokio::test]
async fn cancel_through_controller_publishes_new_revision() {
    let fake = Arc::new(FakeInventory::with_plants(vec![plant(4, "Aloe")]));
    let controller = controller_over(&fake);
    controller.reload().await.unwrap();
    let before = controller.snapshot();

    let mut machine = DeleteConfirmation::new(controller.clone());
    machine.request(plant(4, "Aloe"));
    machine.cancel().await.unwrap();

    let after = controller.snapshot();
    assert_eq!(fake.calls(InventoryOp::Delete), 0);
    assert_eq!(fake.calls(InventoryOp::List), 2);
    assert_eq!(after.records, before.records);
    assert!(after.revision > before.revision);
}

#[tokio::test]
async fn failed_confirm_still_returns_to_idle() {
    let fake = Arc::new(FakeInventory::with_plants(vec![plant(4, "Aloe")]));
    fake.fail_next(InventoryOp::Delete, Fault::Status(500));
    let controller = controller_over(&fake);
    controller.reload().await.unwrap();

    let mut machine = DeleteConfirmation::new(controller.clone());
    machine.request(plant(4, "Aloe"));
    let err = machine.confirm().await.unwrap_err();

    assert!(matches!(
        err,
        ConfirmError::Sync(SyncError::Rejected { status: 500, .. })
    ));
    assert_eq!(machine.state(), &ConfirmState::Idle);
    assert!(controller.find_by_id(PlantId::new(4)).is_some());
}
