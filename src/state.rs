use crate::celebration::{Notifier, TracingNotifier};
use crate::models::AppData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    /// Held across mutate-and-persist so writes never interleave.
    pub data: Arc<Mutex<AppData>>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self::with_notifier(data_path, data, Arc::new(TracingNotifier))
    }

    pub fn with_notifier(data_path: PathBuf, data: AppData, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            notifier,
        }
    }
}
