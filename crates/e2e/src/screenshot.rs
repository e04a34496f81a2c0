//! Timestamped screenshot artifacts

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::browser::Session;
use crate::error::E2eResult;

/// A screenshot written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screenshot {
    pub path: PathBuf,
    pub sha256: String,
}

/// File name for a screenshot taken at `at`
pub fn file_name(prefix: &str, at: DateTime<Local>) -> String {
    format!("{}_{}.png", prefix, at.format("%Y%m%d_%H%M%S"))
}

/// Save the current page as `{dir}/{prefix}_{timestamp}.png`
pub async fn capture(session: &dyn Session, dir: &Path, prefix: &str) -> E2eResult<Screenshot> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(file_name(prefix, Local::now()));
    session.save_screenshot(&path).await?;

    let sha256 = hash_file(&path).await?;
    info!("Screenshot saved at: {}", path.display());

    Ok(Screenshot { path, sha256 })
}

async fn hash_file(path: &Path) -> E2eResult<String> {
    let data = tokio::fs::read(path).await?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}
