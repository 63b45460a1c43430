//! Ambient light sensor sources.
//!
//! A sensor source is started and stopped explicitly by whatever owns the
//! controller's lifetime. While running it pushes samples into a
//! [`LightSink`]; no smoothing or rate limiting is applied.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub use crate::controller::LightSink;

/// A source of ambient light samples.
#[async_trait]
pub trait LightSensor: Send + Sync {
    /// Starts delivering samples to `sink`.
    async fn start(&mut self, sink: LightSink) -> SyncResult<()>;

    /// Stops delivering samples.
    async fn stop(&mut self) -> SyncResult<()>;

    /// Returns whether the sensor is delivering samples.
    fn is_running(&self) -> bool;
}

/// Sensor fed by a platform driver through a channel.
///
/// The driver side keeps the [`mpsc::Sender`] returned by [`Self::new`] and
/// sends raw lux values at its own cadence. Samples sent while the sensor is
/// stopped are discarded. Non-finite samples are ignored.
pub struct ChannelLightSensor {
    feed: Arc<Mutex<mpsc::Receiver<f64>>>,
    task: Option<JoinHandle<()>>,
}

impl ChannelLightSensor {
    /// Creates a stopped sensor and the sender its driver writes to.
    pub fn new(buffer: usize) -> (Self, mpsc::Sender<f64>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let sensor = Self {
            feed: Arc::new(Mutex::new(rx)),
            task: None,
        };
        (sensor, tx)
    }

    async fn forward(feed: Arc<Mutex<mpsc::Receiver<f64>>>, sink: LightSink) {
        let mut feed = feed.lock().await;
        while let Some(lux) = feed.recv().await {
            sink.push(lux);
        }
        debug!("Light sensor feed closed");
    }
}

#[async_trait]
impl LightSensor for ChannelLightSensor {
    async fn start(&mut self, sink: LightSink) -> SyncResult<()> {
        if self.is_running() {
            return Ok(());
        }
        {
            let mut feed = self.feed.lock().await;
            // Drop anything that queued up while stopped.
            while feed.try_recv().is_ok() {}
            if feed.is_closed() {
                return Err(SyncError::ChannelClosed);
            }
        }

        let feed = Arc::clone(&self.feed);
        self.task = Some(tokio::spawn(Self::forward(feed, sink)));
        info!("Light sensor started");
        Ok(())
    }

    async fn stop(&mut self) -> SyncResult<()> {
        if let Some(task) = self.task.take() {
            task.abort();
            // Wait for the abort so the feed lock is released before a restart.
            let _ = task.await;
            info!("Light sensor stopped");
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for ChannelLightSensor {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
