//! Per-request transient storage for uploaded documents.
//!
//! Every upload gets its own uniquely named file inside the upload directory.
//! The file is owned by a `StagedUpload`; dropping it deletes the file, so
//! every exit path of the request (success, `?`, panic unwinding) releases it.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

pub struct StagedUpload {
    request_id: Uuid,
    filename: String,
    file: Option<tokio::fs::File>,
    path: TempPath,
    len: usize,
}

impl StagedUpload {
    /// Allocates a fresh file in `dir` for one request's upload.
    pub fn create(dir: &Path, request_id: Uuid, filename: impl Into<String>) -> io::Result<Self> {
        let named = tempfile::Builder::new()
            .prefix(&format!("{request_id}-"))
            .suffix(".upload")
            .tempfile_in(dir)?;
        let (file, path) = named.into_parts();

        Ok(Self {
            request_id,
            filename: filename.into(),
            file: Some(tokio::fs::File::from_std(file)),
            path,
            len: 0,
        })
    }

    pub async fn append(&mut self, chunk: &[u8]) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "staged upload already sealed"))?;
        file.write_all(chunk).await?;
        self.len += chunk.len();
        Ok(())
    }

    /// Flushes and closes the write handle, then reads the whole payload back.
    pub async fn read_all(&mut self) -> io::Result<Vec<u8>> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
        }
        tokio::fs::read(&self.path).await
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Declared client filename (not the on-disk name).
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the staged file now instead of waiting for drop.
    pub fn discard(self) {
        let StagedUpload {
            request_id,
            file,
            path,
            ..
        } = self;
        drop(file);
        let on_disk: PathBuf = path.to_path_buf();
        if let Err(e) = path.close() {
            tracing::warn!(%request_id, "Failed to remove staged upload {}: {e}", on_disk.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut staged = StagedUpload::create(dir.path(), Uuid::new_v4(), "cv.pdf").unwrap();

        staged.append(b"hello ").await.unwrap();
        staged.append(b"world").await.unwrap();

        assert_eq!(staged.len(), 11);
        assert_eq!(staged.filename(), "cv.pdf");
        assert_eq!(staged.read_all().await.unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedUpload::create(dir.path(), Uuid::new_v4(), "cv.pdf").unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);

        assert!(!path.exists());
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_discard_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut staged = StagedUpload::create(dir.path(), Uuid::new_v4(), "cv.docx").unwrap();
        staged.append(b"data").await.unwrap();

        staged.discard();

        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_concurrent_uploads_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let request_id = Uuid::new_v4();
        let a = StagedUpload::create(dir.path(), request_id, "same.pdf").unwrap();
        let b = StagedUpload::create(dir.path(), request_id, "same.pdf").unwrap();
        assert_ne!(a.path(), b.path());

        drop(a);
        assert!(b.path().exists(), "dropping one upload must not remove another");
    }

    #[tokio::test]
    async fn test_append_after_read_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut staged = StagedUpload::create(dir.path(), Uuid::new_v4(), "cv.pdf").unwrap();
        staged.read_all().await.unwrap();
        assert!(staged.append(b"late").await.is_err());
    }
}
