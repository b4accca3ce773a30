//! Flat on-disk storage for uploaded files.
//!
//! Files live directly under the upload root, named by their sanitized
//! original file name. A second upload with the same name overwrites the
//! first. There is no locking; the last writer wins.
//!
//! Incoming data is written to a hidden temporary file in the same directory
//! and renamed over the final name once complete, so a reader of
//! `/images/<name>` never sees a half-written upload.

use std::path::{Path, PathBuf};

use pw_core::filename::sanitize_filename;
use pw_core::Result;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Filesystem manager for the upload directory.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    /// Create an `UploadDir` rooted at `root`. Nothing is touched on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory served under `/images`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory (and parents) if it does not exist yet.
    pub fn ensure(&self) -> Result<()> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root)?;
            tracing::info!("Created upload directory {}", self.root.display());
        }
        Ok(())
    }

    /// On-disk location for `filename`.
    ///
    /// The name is re-sanitized so a caller can never escape the root.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf> {
        Ok(self.root.join(sanitize_filename(filename)?))
    }

    /// Start writing a file that will be stored under `filename`.
    ///
    /// Nothing is visible under the final name until [`PendingUpload::finish`].
    pub async fn begin(&self, filename: &str) -> Result<PendingUpload> {
        let dest = self.path_for(filename)?;
        let temp = self.root.join(format!(".upload-{}.part", Uuid::new_v4()));
        let file = File::create(&temp).await?;
        Ok(PendingUpload {
            file,
            temp,
            dest,
            written: 0,
        })
    }

    /// Write `data` under `filename` in one go, replacing any existing file.
    pub async fn save(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let mut pending = self.begin(filename).await?;
        if let Err(e) = pending.write(data).await {
            pending.abort().await;
            return Err(e);
        }
        let dest = pending.dest.clone();
        pending.finish().await?;
        Ok(dest)
    }

    /// Remove the file stored under `filename`.
    ///
    /// Best effort: failures (including an already missing file) are logged
    /// and reported as `false`, never as an error.
    pub async fn remove(&self, filename: &str) -> bool {
        let path = match self.path_for(filename) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!("Refusing to remove {filename:?}: {e}");
                return false;
            }
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Could not remove {}: {e}", path.display());
                false
            }
        }
    }
}

/// An upload being streamed to disk.
///
/// Call [`finish`](Self::finish) to publish it or [`abort`](Self::abort) to
/// discard it. Dropping it without either leaves the temporary file behind.
#[derive(Debug)]
pub struct PendingUpload {
    file: File,
    temp: PathBuf,
    dest: PathBuf,
    written: u64,
}

impl PendingUpload {
    /// Append a chunk.
    pub async fn write(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and move the file to its final name. Returns the byte count.
    pub async fn finish(mut self) -> Result<u64> {
        if let Err(e) = self.file.flush().await {
            self.abort().await;
            return Err(e.into());
        }
        drop(self.file);

        if let Err(e) = tokio::fs::rename(&self.temp, &self.dest).await {
            discard(&self.temp).await;
            return Err(e.into());
        }
        tracing::debug!(path = %self.dest.display(), bytes = self.written, "Stored upload");
        Ok(self.written)
    }

    /// Throw away everything written so far.
    pub async fn abort(self) {
        drop(self.file);
        discard(&self.temp).await;
    }
}

async fn discard(temp: &Path) {
    if let Err(e) = tokio::fs::remove_file(temp).await {
        tracing::debug!("Could not remove partial upload {}: {e}", temp.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_creates_nested_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = UploadDir::new(tmp.path().join("a").join("uploads"));
        dir.ensure().unwrap();
        assert!(dir.root().is_dir());
        // idempotent
        dir.ensure().unwrap();
    }

    #[test]
    fn path_for_stays_inside_root() {
        let dir = UploadDir::new("/srv/uploads");
        assert_eq!(
            dir.path_for("../../etc/passwd").unwrap(),
            PathBuf::from("/srv/uploads/passwd")
        );
        assert!(dir.path_for("..").is_err());
    }

    #[tokio::test]
    async fn save_overwrites_and_remove_is_best_effort() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = UploadDir::new(tmp.path());

        let path = dir.save("a.jpg", b"first").await.unwrap();
        dir.save("a.jpg", b"second").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");

        assert!(dir.remove("a.jpg").await);
        assert!(!path.exists());
        // already gone
        assert!(!dir.remove("a.jpg").await);
    }

    #[tokio::test]
    async fn remove_never_leaves_root() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = tmp.path().join("uploads");
        let dir = UploadDir::new(&uploads);
        dir.ensure().unwrap();

        let outside = tmp.path().join("secret.txt");
        std::fs::write(&outside, b"keep me").unwrap();

        assert!(!dir.remove("../secret.txt").await);
        assert!(outside.exists());
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn chunks_are_hidden_until_finish() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = UploadDir::new(tmp.path());

        let mut pending = dir.begin("big.jpg").await.unwrap();
        pending.write(b"abc").await.unwrap();
        pending.write(b"def").await.unwrap();
        assert_eq!(pending.written(), 6);
        assert!(!tmp.path().join("big.jpg").exists());

        assert_eq!(pending.finish().await.unwrap(), 6);
        assert_eq!(std::fs::read(tmp.path().join("big.jpg")).unwrap(), b"abcdef");
        assert_eq!(entries(tmp.path()), ["big.jpg"]);
    }

    #[tokio::test]
    async fn abort_leaves_existing_file_and_no_temp() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = UploadDir::new(tmp.path());
        dir.save("a.jpg", b"kept").await.unwrap();

        let mut pending = dir.begin("a.jpg").await.unwrap();
        pending.write(b"partial").await.unwrap();
        pending.abort().await;

        assert_eq!(std::fs::read(tmp.path().join("a.jpg")).unwrap(), b"kept");
        assert_eq!(entries(tmp.path()), ["a.jpg"]);
    }

    #[tokio::test]
    async fn names_differing_only_in_whitespace_are_distinct_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = UploadDir::new(tmp.path());
        dir.save("a.jpg", b"plain").await.unwrap();
        dir.save(" a.jpg ", b"padded").await.unwrap();

        assert_eq!(std::fs::read(tmp.path().join("a.jpg")).unwrap(), b"plain");
        assert_eq!(std::fs::read(tmp.path().join(" a.jpg ")).unwrap(), b"padded");
    }

    #[tokio::test]
    async fn begin_fails_when_root_is_not_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("uploads");
        std::fs::write(&root, b"not a dir").unwrap();
        let dir = UploadDir::new(&root);

        let err = dir.begin("a.jpg").await.unwrap_err();
        assert_eq!(err.code(), "io_error");
    }
}
