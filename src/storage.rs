use crate::errors::AppError;
use crate::models::AppData;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

#[derive(Debug, Default)]
pub struct LoadedData {
    pub data: AppData,
    /// No data file existed yet.
    pub fresh: bool,
}

pub async fn load_data(path: &Path) -> LoadedData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => LoadedData { data, fresh: false },
            Err(err) => {
                error!("failed to parse data file: {err}");
                LoadedData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("no data file at {}, starting fresh", path.display());
            LoadedData {
                data: AppData::default(),
                fresh: true,
            }
        }
        Err(err) => {
            error!("failed to read data file: {err}");
            LoadedData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, payload).await.map_err(AppError::internal)?;
    fs::rename(&staging, path).await.map_err(AppError::internal)?;
    Ok(())
}
