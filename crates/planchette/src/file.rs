//! A path bound to a storage backend.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::StorageError;
use crate::storage::Storage;

/// A file handle: the path a window was opened with plus the storage it
/// reads from and writes to. Cloning shares the storage handle.
#[derive(Clone)]
pub struct File {
    path: String,
    storage: Arc<dyn Storage>,
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File").field("path", &self.path).finish()
    }
}

impl File {
    /// Bind `path` to `storage`. The path is stored in its
    /// [normalized](normalize_path) form.
    pub fn new(path: impl AsRef<str>, storage: Arc<dyn Storage>) -> Self {
        Self {
            path: normalize_path(path.as_ref()),
            storage,
        }
    }

    /// The normalized path. This is the window's identity within a
    /// workspace.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn read(&self) -> Result<String, StorageError> {
        self.storage.read(&self.path).await
    }

    pub async fn write(&self, content: &str) -> Result<(), StorageError> {
        self.storage.write(&self.path, content).await
    }

    pub async fn remove(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.path).await
    }

    pub async fn exists(&self) -> bool {
        self.storage.exists(&self.path).await
    }
}

/// Canonical spelling of a path: `.` components dropped, repeated and
/// trailing separators collapsed. `a.txt`, `./a.txt` and `.//a.txt` all
/// become `a.txt`. Does not touch the filesystem or resolve `..`.
pub fn normalize_path(path: &str) -> String {
    Path::new(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect::<PathBuf>()
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn forwards_to_storage() {
        let storage = Arc::new(MemoryStorage::new().with_file("f.txt", "one"));
        let file = File::new("f.txt", storage.clone());

        assert_eq!(file.path(), "f.txt");
        assert_eq!(file.read().await.unwrap(), "one");

        file.write("two").await.unwrap();
        assert_eq!(storage.get("f.txt").as_deref(), Some("two"));

        file.remove().await.unwrap();
        assert!(!file.exists().await);
    }

    #[test]
    fn normalizes_path_spellings() {
        assert_eq!(normalize_path("a.txt"), "a.txt");
        assert_eq!(normalize_path("./a.txt"), "a.txt");
        assert_eq!(normalize_path(".//src/./lib.rs"), "src/lib.rs");
        assert_eq!(normalize_path("src//lib.rs/"), "src/lib.rs");
        assert_eq!(normalize_path("/abs/./x"), "/abs/x");
        assert_eq!(normalize_path("./"), "");
    }

    #[test]
    fn new_stores_normalized_path() {
        let file = File::new("./docs//a.md", Arc::new(MemoryStorage::new()));
        assert_eq!(file.path(), "docs/a.md");
    }

    #[tokio::test]
    async fn write_persists_the_given_content() {
        let storage = Arc::new(MemoryStorage::new());
        let file = File::new("new.txt", storage.clone());
        file.write("fresh").await.unwrap();
        assert_eq!(file.read().await.unwrap(), "fresh");
    }
}
