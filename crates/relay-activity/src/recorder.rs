use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::activity_log::ActivityLog;
use crate::entry::ActivityEntry;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Fire-and-forget handle for recording served requests.
///
/// `record` never blocks: when the channel is full the entry is dropped and
/// counted.
#[derive(Clone)]
pub struct ActivityRecorder {
    tx: mpsc::Sender<ActivityEntry>,
    dropped: Arc<AtomicU64>,
}

impl ActivityRecorder {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ActivityEntry>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                tx,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    /// Create a recorder with its worker already running against `log`.
    pub fn start(log: ActivityLog, capacity: usize) -> (Self, JoinHandle<()>) {
        let (recorder, rx) = Self::new(capacity);
        let handle = ActivityWorker::new(log).spawn(rx);
        (recorder, handle)
    }

    pub fn record(&self, entry: ActivityEntry) {
        if let Err(e) = self.tx.try_send(entry) {
            let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("activity entry dropped ({} so far): {}", total, e);
        }
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Drains the recorder channel into an [`ActivityLog`], one entry at a time.
pub struct ActivityWorker {
    log: ActivityLog,
}

impl ActivityWorker {
    pub fn new(log: ActivityLog) -> Self {
        Self { log }
    }

    /// Runs until every recorder handle has been dropped.
    pub fn spawn(self, mut receiver: mpsc::Receiver<ActivityEntry>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("ActivityWorker started");
            while let Some(entry) = receiver.recv().await {
                if let Err(e) = self.log.append(entry).await {
                    warn!("Failed to record activity: {}", e);
                }
            }
            info!("ActivityWorker stopped");
        })
    }
}
