use crate::errors::AppError;
use crate::models::Goal;
use crate::seed::seed_goals;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/goals.json"))
}

/// The last saved goal list, or the seed list when there is none.
pub async fn load_goals(path: &Path) -> Vec<Goal> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<Vec<Goal>>(&bytes) {
            Ok(goals) => {
                info!(count = goals.len(), "loaded saved goals");
                goals
            }
            Err(err) => {
                error!("failed to parse goals file: {err}");
                seed_goals()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => seed_goals(),
        Err(err) => {
            error!("failed to read goals file: {err}");
            seed_goals()
        }
    }
}

pub async fn persist_goals(path: &Path, goals: &[Goal]) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(goals).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
