use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());

        storage.write_file("nested/report.json", b"{}").await.unwrap();
        let data = std::fs::read(temp_dir.path().join("nested/report.json")).unwrap();
        assert_eq!(data, b"{}");
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_report() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());

        storage.write_file("plan.txt", b"first").await.unwrap();
        storage.write_file("plan.txt", b"second").await.unwrap();
        let data = std::fs::read_to_string(temp_dir.path().join("plan.txt")).unwrap();
        assert_eq!(data, "second");
    }

    #[tokio::test]
    async fn test_unwritable_base_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"x").unwrap();

        let storage = LocalStorage::new(blocker.to_str().unwrap());
        let err = storage.write_file("report.json", b"{}").await.unwrap_err();
        assert!(matches!(err, crate::utils::error::LifeOpsError::IoError(_)));
    }
}
