use crate::core::Storage;
use crate::utils::error::{EtlError, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn unusable(&self, reason: impl Into<String>) -> EtlError {
        EtlError::OutputDirUnusable {
            path: self.base_path.display().to_string(),
            reason: reason.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn prepare(&self) -> Result<()> {
        match tokio::fs::metadata(&self.base_path).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(self.unusable("exists and is not a directory")),
            Err(_) => {
                tracing::debug!("Creating output directory {}", self.base_path.display());
                tokio::fs::create_dir_all(&self.base_path)
                    .await
                    .map_err(|e| self.unusable(e.to_string()))
            }
        }
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> Result<String> {
        let full_path = self.base_path.join(name);
        tokio::fs::write(&full_path, data).await?;
        Ok(full_path.display().to_string())
    }
}
