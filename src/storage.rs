use crate::errors::AppError;
use crate::models::{IssueRecord, PageviewReport};
use serde_json::Value;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub const ISSUES_FILE: &str = "issues.json";

/// A missing issues file is an empty list; a malformed one is an error.
pub async fn load_issues(data_dir: &Path) -> Result<Vec<IssueRecord>, AppError> {
    match fs::read(data_dir.join(ISSUES_FILE)).await {
        Ok(bytes) => {
            let entries: Vec<Value> = serde_json::from_slice(&bytes)?;
            Ok(entries.into_iter().map(IssueRecord::from_value).collect())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

pub async fn load_report(path: &Path) -> Option<PageviewReport> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(report) => Some(report),
            Err(err) => {
                error!("failed to parse report {}: {err}", path.display());
                None
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read report {}: {err}", path.display());
            None
        }
    }
}

/// Raw contents of a file directly inside the data directory.
pub async fn read_data_file(data_dir: &Path, filename: &str) -> Result<Vec<u8>, AppError> {
    if !is_plain_filename(filename) {
        return Err(AppError::not_found());
    }
    let path = data_dir.join(filename);
    match fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => {}
        Ok(_) => return Err(AppError::not_found()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Err(AppError::not_found()),
        Err(err) => return Err(err.into()),
    }
    Ok(fs::read(&path).await?)
}

fn is_plain_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.starts_with('.')
        && !filename.contains(['/', '\\'])
}
