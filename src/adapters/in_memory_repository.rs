//! In-memory value table repository for testing.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::ValueTableRepository, q_learning::ValueTable};

/// In-memory repository for testing.
///
/// Holds the same JSON text a [`JsonFileRepository`](super::JsonFileRepository)
/// would write, keyed by path, so encoding and decoding are exercised without
/// touching the file system.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use ttt_learner::adapters::InMemoryRepository;
/// use ttt_learner::ports::ValueTableRepository;
/// use ttt_learner::q_learning::ValueTable;
///
/// let repo = InMemoryRepository::new();
/// repo.save(&ValueTable::new(), Path::new("q_table.json"))?;
/// assert!(repo.contains(Path::new("q_table.json")));
/// # Ok::<(), ttt_learner::Error>(())
/// ```
///
/// All clones share the same underlying storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tables
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    pub fn clear(&self) {
        self.storage().clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&key(path))
    }

    /// Raw stored text at `path`, if any
    pub fn raw(&self, path: &Path) -> Option<String> {
        self.storage().get(&key(path)).cloned()
    }

    /// Store arbitrary text at `path`, bypassing encoding.
    pub fn insert_raw(&self, path: &Path, text: impl Into<String>) {
        self.storage().insert(key(path), text.into());
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl ValueTableRepository for InMemoryRepository {
    fn save(&self, table: &ValueTable, path: &Path) -> Result<()> {
        let text = table.to_json()?;
        self.storage().insert(key(path), text);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<ValueTable> {
        let text = self.raw(path).ok_or_else(|| Error::Io {
            operation: format!("load value table from memory at {}", path.display()),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;
        ValueTable::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::CanonicalState;

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let path = Path::new("test_table");
        let mut table = ValueTable::new();
        table.set(CanonicalState::empty(), 4, 0.3);

        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        repo.save(&table, path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(path));

        assert_eq!(repo.load(path).unwrap(), table);
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = InMemoryRepository::new();
        let result = repo.load(Path::new("nonexistent"));
        assert!(matches!(
            result,
            Err(Error::Io { ref source, .. }) if source.kind() == std::io::ErrorKind::NotFound
        ));
    }

    #[test]
    fn test_insert_raw_corrupted_document() {
        let repo = InMemoryRepository::new();
        let path = Path::new("broken");
        repo.insert_raw(path, "definitely not json");
        assert!(repo.load(path).is_err());
    }

    #[test]
    fn test_clear_removes_all() {
        let repo = InMemoryRepository::new();
        repo.save(&ValueTable::new(), Path::new("t1")).unwrap();
        repo.save(&ValueTable::new(), Path::new("t2")).unwrap();
        assert_eq!(repo.count(), 2);

        repo.clear();
        assert_eq!(repo.count(), 0);
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();
        let path = Path::new("shared");

        let mut table = ValueTable::new();
        table.set(CanonicalState::empty(), 0, -0.5);
        repo1.save(&table, path).unwrap();

        assert_eq!(repo2.load(path).unwrap(), table);
        assert_eq!(repo2.count(), 1);
    }
}
