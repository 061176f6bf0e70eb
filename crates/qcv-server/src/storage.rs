//! Artifact naming and the flat artifact directory.
//!
//! Every generated image gets a fresh `<prefix>_<uuid-v4>.png` name, so
//! concurrent requests never collide and nothing is ever overwritten.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::time;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Extension of every artifact.
pub const ARTIFACT_EXTENSION: &str = "png";

/// Which endpoint produced an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Circuit diagram.
    Circuit,
    /// Dynamics plot.
    Dynamics,
}

impl ArtifactKind {
    /// File-name prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            ArtifactKind::Circuit => "circuit",
            ArtifactKind::Dynamics => "dynamics",
        }
    }
}

/// A freshly allocated artifact slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// `<prefix>_<uuid>.png`
    pub file_name: String,
    /// Location on disk.
    pub path: PathBuf,
    /// Public URL returned to the client.
    pub url: String,
}

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid artifact name: {0:?}")]
    InvalidName(String),

    #[error("artifact not found: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The flat directory images are written to and served from.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    public_base_url: String,
}

impl ArtifactStore {
    /// Store rooted at `root`, publishing under `public_base_url`.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let mut public_base_url = public_base_url.into();
        while public_base_url.ends_with('/') {
            public_base_url.pop();
        }
        Self {
            root: root.into(),
            public_base_url,
        }
    }

    /// The artifact directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the artifact directory if absent.
    pub fn ensure_root(&self) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            path: self.root.clone(),
            source,
        })
    }

    /// Reserve a new, unique artifact name.
    pub fn allocate(&self, kind: ArtifactKind) -> Artifact {
        let file_name = format!("{}_{}.{ARTIFACT_EXTENSION}", kind.prefix(), Uuid::new_v4());
        Artifact {
            path: self.root.join(&file_name),
            url: self.url_for(&file_name),
            file_name,
        }
    }

    /// Public URL of `file_name`.
    pub fn url_for(&self, file_name: &str) -> String {
        format!("{}/static/{file_name}", self.public_base_url)
    }

    /// Path of an existing artifact, after checking the name stays inside
    /// the directory.
    pub fn resolve(&self, file_name: &str) -> Result<PathBuf, StorageError> {
        validate_file_name(file_name)?;
        Ok(self.root.join(file_name))
    }

    /// Read an artifact's bytes.
    pub async fn read(&self, file_name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(file_name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(file_name.to_string()))
            }
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    /// Delete artifacts last modified more than `max_age` ago. Returns the
    /// number removed. Files without the artifact extension are left alone.
    pub fn sweep_expired(&self, max_age: Duration) -> Result<usize, StorageError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: io::Error| StorageError::Io { path, source }
        };

        let now = SystemTime::now();
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.root).map_err(io_err(&self.root))? {
            let entry = entry.map_err(io_err(&self.root))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ARTIFACT_EXTENSION) {
                continue;
            }
            let metadata = entry.metadata().map_err(io_err(&path))?;
            if !metadata.is_file() {
                continue;
            }
            let age = metadata
                .modified()
                .ok()
                .and_then(|m| now.duration_since(m).ok())
                .unwrap_or_default();
            if age > max_age {
                match std::fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    // Raced with another sweep or a manual cleanup.
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(source) => return Err(StorageError::Io { path, source }),
                }
            }
        }
        Ok(removed)
    }
}

/// Accept only a single plain file-name component: no separators, no `.`
/// or `..`, and nothing that cannot sit inside a quoted header value.
pub fn validate_file_name(name: &str) -> Result<(), StorageError> {
    let mut components = Path::new(name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    let invalid = !single_normal || name.contains(['/', '\\', '"', '\0']);
    if invalid {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Periodically delete expired artifacts.
///
/// Runs until the task is dropped. Each sweep runs on the blocking pool.
pub async fn run_retention_sweeper(store: Arc<ArtifactStore>, max_age: Duration, every: Duration) {
    info!(
        retention_secs = max_age.as_secs(),
        interval_secs = every.as_secs(),
        "Artifact retention sweeper started"
    );
    let mut interval = time::interval(every);

    loop {
        interval.tick().await;

        let sweep_store = Arc::clone(&store);
        match tokio::task::spawn_blocking(move || sweep_store.sweep_expired(max_age)).await {
            Ok(Ok(0)) => debug!("Retention sweep found nothing to delete"),
            Ok(Ok(n)) => info!(removed = n, "Retention sweep deleted expired artifacts"),
            Ok(Err(e)) => warn!("Retention sweep failed: {}", e),
            Err(e) => warn!("Retention sweep task panicked: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_allocate_names_and_urls() {
        let store = ArtifactStore::new("/srv/static", "https://qcv.example.org/");
        let a = store.allocate(ArtifactKind::Circuit);

        assert!(a.file_name.starts_with("circuit_"));
        assert!(a.file_name.ends_with(".png"));
        let id = &a.file_name["circuit_".len()..a.file_name.len() - ".png".len()];
        assert!(Uuid::parse_str(id).is_ok());

        assert_eq!(a.path, PathBuf::from("/srv/static").join(&a.file_name));
        assert_eq!(
            a.url,
            format!("https://qcv.example.org/static/{}", a.file_name)
        );
    }

    #[test]
    fn test_allocate_is_unique() {
        let store = ArtifactStore::new("static", "http://localhost:8000");
        let a = store.allocate(ArtifactKind::Dynamics);
        let b = store.allocate(ArtifactKind::Dynamics);
        assert_ne!(a.file_name, b.file_name);
        assert!(a.file_name.starts_with("dynamics_"));
    }

    #[test]
    fn test_validate_file_name() {
        for good in ["circuit_1.png", "a..png", "..png", "v1..2.png"] {
            assert!(validate_file_name(good).is_ok(), "{good:?} should be accepted");
        }
        for bad in ["", ".", "..", "../etc/passwd", "a/b.png", "a\\b.png", "./a.png", "a\"b"] {
            assert!(validate_file_name(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_ensure_root_creates_nested_dir() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("a").join("b"), "http://x");
        store.ensure_root().unwrap();
        assert!(store.root().is_dir());
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path(), "http://x");
        let err = store.read("circuit_missing.png").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn test_sweep_skips_fresh_and_foreign_files() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path(), "http://x");
        std::fs::write(dir.path().join("circuit_a.png"), b"png").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"keep").unwrap();

        assert_eq!(store.sweep_expired(Duration::from_secs(3600)).unwrap(), 0);
        assert!(dir.path().join("circuit_a.png").exists());
    }

    #[test]
    fn test_sweep_deletes_expired_png_only() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path(), "http://x");
        std::fs::write(dir.path().join("circuit_a.png"), b"png").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"keep").unwrap();
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(store.sweep_expired(Duration::ZERO).unwrap(), 1);
        assert!(!dir.path().join("circuit_a.png").exists());
        assert!(dir.path().join("notes.txt").exists());
    }
}
