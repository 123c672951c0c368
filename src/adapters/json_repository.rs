//! JSON file implementation of the value table repository.

use std::{fs, path::Path};

use tracing::info;

use crate::{Result, error::Error, ports::ValueTableRepository, q_learning::ValueTable};

/// File-backed repository storing the table as pretty-printed JSON.
///
/// Saves go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-write leaves the previous table intact.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use ttt_learner::adapters::JsonFileRepository;
/// use ttt_learner::ports::ValueTableRepository;
/// use ttt_learner::q_learning::ValueTable;
///
/// let repo = JsonFileRepository::new();
/// repo.save(&ValueTable::new(), Path::new("q_table.json"))?;
/// let table = repo.load(Path::new("q_table.json"))?;
/// assert!(table.is_empty());
/// # Ok::<(), ttt_learner::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileRepository;

impl JsonFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl ValueTableRepository for JsonFileRepository {
    fn save(&self, table: &ValueTable, path: &Path) -> Result<()> {
        let text = table.to_json()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {}", parent.display()),
                source,
            })?;
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = Path::new(&tmp_name);

        fs::write(tmp_path, text).map_err(|source| Error::Io {
            operation: format!("write {}", tmp_path.display()),
            source,
        })?;
        fs::rename(tmp_path, path).map_err(|source| Error::Io {
            operation: format!("replace {}", path.display()),
            source,
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<ValueTable> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read {}", path.display()),
            source,
        })?;

        let (table, report) = ValueTable::from_json_with_report(&text)?;
        info!(
            path = %path.display(),
            states = report.states,
            entries = report.entries,
            skipped = report.skipped,
            "loaded value table"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::tictactoe::{Board, CanonicalState};

    #[test]
    fn test_json_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("table.json");

        let mut table = ValueTable::new();
        table.set(CanonicalState::empty(), 4, 0.25);
        table.set("X...O....".parse::<Board>().unwrap().canonical(), 1, -0.1);

        let repo = JsonFileRepository::new();
        repo.save(&table, &file_path).expect("Failed to save");
        let loaded = repo.load(&file_path).expect("Failed to load");

        assert_eq!(loaded, table);
        assert!(!temp_dir.path().join("table.json.tmp").exists());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("nested").join("deeper").join("table.json");

        JsonFileRepository::new()
            .save(&ValueTable::new(), &file_path)
            .expect("Failed to save");
        assert!(file_path.exists());
    }

    #[test]
    fn test_save_overwrites_previous_table() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("table.json");
        let repo = JsonFileRepository::new();

        let mut table = ValueTable::new();
        table.set(CanonicalState::empty(), 0, 0.5);
        repo.save(&table, &file_path).unwrap();
        table.clear();
        repo.save(&table, &file_path).unwrap();

        assert!(repo.load(&file_path).unwrap().is_empty());
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = JsonFileRepository::new().load(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_load_corrupted_returns_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("table.json");
        fs::write(&file_path, "{ not json").unwrap();

        let result = JsonFileRepository::new().load(&file_path);
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
