//! Repository port for value table persistence.

use std::path::Path;

use crate::{Result, q_learning::ValueTable};

/// Port for persisting and loading a learned value table.
///
/// Implementations decide the storage medium; the text form written by
/// [`ValueTable::to_json`] is the shared interchange format.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use ttt_learner::ports::ValueTableRepository;
/// use ttt_learner::q_learning::ValueTable;
///
/// fn checkpoint<R: ValueTableRepository>(
///     repo: &R,
///     table: &ValueTable,
///     path: &Path,
/// ) -> ttt_learner::Result<()> {
///     repo.save(table, path)
/// }
/// ```
pub trait ValueTableRepository {
    /// Save a table to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or encoding fails.
    fn save(&self, table: &ValueTable, path: &Path) -> Result<()>;

    /// Load a table from persistent storage.
    ///
    /// Individual invalid entries are skipped; only an unreadable location or
    /// a document that is not a JSON object is an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if nothing can be read at `path` and
    /// [`crate::Error::Serialization`] if the document does not parse.
    fn load(&self, path: &Path) -> Result<ValueTable>;
}
