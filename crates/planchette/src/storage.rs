//! Text storage backends.
//!
//! The [`Storage`] trait is the only I/O boundary in the crate: windows read
//! their initial content through it and persist edits back through it.
//! [`LocalStorage`] talks to the filesystem via `tokio::fs`,
//! [`MemoryStorage`] keeps everything in a map, and [`Home`] resolves
//! relative paths against a root directory before delegating to another
//! backend.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::error::{StorageError, StorageOp};

/// Boxed future returned by fallible [`Storage`] operations.
pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Boxed future returned by [`Storage::exists`].
pub type ExistsFuture<'a> = Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

/// Read, write, and remove whole text files by path.
///
/// Uses boxed futures so that `Arc<dyn Storage>` can be shared between the
/// workspace and the tools that drive it.
pub trait Storage: Send + Sync {
    /// Read the full text at `path`.
    fn read<'a>(&'a self, path: &'a str) -> StorageFuture<'a, String>;

    /// Replace the text at `path`, creating parent directories as needed.
    fn write<'a>(&'a self, path: &'a str, content: &'a str) -> StorageFuture<'a, ()>;

    /// Delete the file at `path`. Fails if it is absent.
    fn remove<'a>(&'a self, path: &'a str) -> StorageFuture<'a, ()>;

    /// Whether `path` exists. Never fails.
    fn exists<'a>(&'a self, path: &'a str) -> ExistsFuture<'a>;
}

// ── LocalStorage ───────────────────────────────────────────────────

/// Filesystem-backed storage. Paths are used exactly as given; wrap in a
/// [`Home`] to resolve them against a working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for LocalStorage {
    fn read<'a>(&'a self, path: &'a str) -> StorageFuture<'a, String> {
        Box::pin(async move {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| StorageError::new(StorageOp::Read, path, e))?;
            debug!("Read {path} ({} bytes)", content.len());
            Ok(content)
        })
    }

    fn write<'a>(&'a self, path: &'a str, content: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::new(StorageOp::Write, path, e))?;
            }
            tokio::fs::write(path, content)
                .await
                .map_err(|e| StorageError::new(StorageOp::Write, path, e))?;
            debug!("Wrote {path} ({} bytes)", content.len());
            Ok(())
        })
    }

    fn remove<'a>(&'a self, path: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            tokio::fs::remove_file(path)
                .await
                .map_err(|e| StorageError::new(StorageOp::Remove, path, e))?;
            debug!("Removed {path}");
            Ok(())
        })
    }

    fn exists<'a>(&'a self, path: &'a str) -> ExistsFuture<'a> {
        Box::pin(async move { tokio::fs::try_exists(path).await.unwrap_or(false) })
    }
}

// ── MemoryStorage ──────────────────────────────────────────────────

/// In-process storage keyed by path. Useful for embedding a workspace
/// without touching disk, and in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file (builder pattern).
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), content.into());
        self
    }

    /// Current content stored at `path`, if any.
    pub fn get(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned()
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn missing(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no such file: {path}"))
}

impl Storage for MemoryStorage {
    fn read<'a>(&'a self, path: &'a str) -> StorageFuture<'a, String> {
        let result = self
            .get(path)
            .ok_or_else(|| StorageError::new(StorageOp::Read, path, missing(path)));
        Box::pin(async move { result })
    }

    fn write<'a>(&'a self, path: &'a str, content: &'a str) -> StorageFuture<'a, ()> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_string(), content.to_string());
        trace!("Stored {path} in memory ({} bytes)", content.len());
        Box::pin(async { Ok(()) })
    }

    fn remove<'a>(&'a self, path: &'a str) -> StorageFuture<'a, ()> {
        let removed = self
            .files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(path);
        let result = match removed {
            Some(_) => Ok(()),
            None => Err(StorageError::new(StorageOp::Remove, path, missing(path))),
        };
        Box::pin(async move { result })
    }

    fn exists<'a>(&'a self, path: &'a str) -> ExistsFuture<'a> {
        let found = self.get(path).is_some();
        Box::pin(async move { found })
    }
}

// ── Home ───────────────────────────────────────────────────────────

/// Resolves relative paths against `root` before delegating to an inner
/// backend. Absolute paths pass through untouched.
///
/// Errors report the path as the caller gave it, not the resolved one.
#[derive(Clone)]
pub struct Home {
    root: PathBuf,
    inner: Arc<dyn Storage>,
}

impl std::fmt::Debug for Home {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Home").field("root", &self.root).finish()
    }
}

impl Home {
    pub fn new(root: impl Into<PathBuf>, inner: Arc<dyn Storage>) -> Self {
        Self {
            root: root.into(),
            inner,
        }
    }

    /// A home directory over the local filesystem.
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Arc::new(LocalStorage))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` against the root.
    pub fn resolve(&self, path: &str) -> String {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            path.to_string()
        } else {
            self.root.join(candidate).to_string_lossy().into_owned()
        }
    }
}

fn restore_path(mut err: StorageError, path: &str) -> StorageError {
    err.path = path.to_string();
    err
}

impl Storage for Home {
    fn read<'a>(&'a self, path: &'a str) -> StorageFuture<'a, String> {
        Box::pin(async move {
            let resolved = self.resolve(path);
            self.inner
                .read(&resolved)
                .await
                .map_err(|e| restore_path(e, path))
        })
    }

    fn write<'a>(&'a self, path: &'a str, content: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let resolved = self.resolve(path);
            self.inner
                .write(&resolved, content)
                .await
                .map_err(|e| restore_path(e, path))
        })
    }

    fn remove<'a>(&'a self, path: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let resolved = self.resolve(path);
            self.inner
                .remove(&resolved)
                .await
                .map_err(|e| restore_path(e, path))
        })
    }

    fn exists<'a>(&'a self, path: &'a str) -> ExistsFuture<'a> {
        Box::pin(async move {
            let resolved = self.resolve(path);
            self.inner.exists(&resolved).await
        })
    }
}
