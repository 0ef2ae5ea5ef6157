use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::content::FileStore;

/// Blob storage on the local filesystem under a configured media root.
/// References are relative paths (`folder/uuid.ext`) so they stay valid
/// when the root moves.
#[derive(Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, reference: &str) -> AppResult<PathBuf> {
        // References are produced by `store`; anything with a parent
        // component is not ours.
        let rel = Path::new(reference);
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(AppError::InvalidInput("Invalid file reference".into()));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store(&self, folder: &str, filename: &str, bytes: Vec<u8>) -> AppResult<String> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let reference = format!("{folder}/{}.{extension}", Uuid::new_v4().simple());

        let path = self.resolve(&reference)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(reference)
    }

    async fn delete(&self, reference: &str) -> AppResult<()> {
        let path = self.resolve(reference)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}
