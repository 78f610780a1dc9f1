use crate::errors::IngestError;
use crate::ingest::SheetsClient;
use crate::models::Goal;
use crate::seed::TimeWindow;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub goals: Arc<Mutex<Vec<Goal>>>,
    pub window: TimeWindow,
    pub sheets: Arc<SheetsClient>,
    syncing: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(data_path: PathBuf, goals: Vec<Goal>, window: TimeWindow, sheets: SheetsClient) -> Self {
        Self {
            data_path,
            goals: Arc::new(Mutex::new(goals)),
            window,
            sheets: Arc::new(sheets),
            syncing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }

    /// Marks a sync as running until the returned guard drops.
    pub fn begin_sync(&self) -> Result<SyncGuard, IngestError> {
        self.syncing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| IngestError::SyncInProgress)?;
        Ok(SyncGuard {
            flag: Arc::clone(&self.syncing),
        })
    }
}

pub struct SyncGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for SyncGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
