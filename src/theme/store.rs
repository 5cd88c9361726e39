//! durable key/value storage for ui preferences
use {
    crate::error::Result,
    hashbrown::HashMap,
    redb::{Database, ReadableDatabase, TableDefinition, TableError},
    std::{
        fs::create_dir_all,
        path::{Path, PathBuf},
    },
    tracing::debug,
};

/// the table holding every preference
const PREFERENCES_TABLE: TableDefinition<&str, &str> = TableDefinition::new("preferences");

/// somewhere preferences survive restarts
pub trait PreferenceStore {
    /// read a value
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// write a value, replacing the old one
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// a preference store backed by a redb file
pub struct RedbStore {
    /// the database itself
    db: Database,
    /// where the database lives
    path: PathBuf,
}

impl RedbStore {
    /// open (or create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent)?;
        }

        let db = Database::create(&path)?;
        debug!("opened preference store at {:?}", path);

        Ok(Self { db, path })
    }

    /// the default location, `<data dir>/chatroom/preferences.redb`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("chatroom").join("preferences.redb"))
    }

    /// where this store lives on disk
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(PREFERENCES_TABLE) {
            Ok(t) => t,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(table.get(key)?.map(|value| value.value().to_string()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let write_txn = self.db.begin_write()?;

        {
            let mut table = write_txn.open_table(PREFERENCES_TABLE)?;
            table.insert(key, value)?;
        }

        write_txn.commit()?;
        Ok(())
    }
}

/// a preference store that forgets everything on drop
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// the stored values
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// make an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// make a store with one value already in it
    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, tempfile::TempDir};

    #[test]
    fn test_redb_store_missing_table() {
        let dir = TempDir::new().unwrap();
        let store = RedbStore::open(dir.path().join("prefs.redb")).unwrap();
        assert_eq!(store.get("chatroom-theme").unwrap(), None);
    }

    #[test]
    fn test_redb_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.redb");

        {
            let mut store = RedbStore::open(&path).unwrap();
            store.set("chatroom-theme", "green").unwrap();
            store.set("chatroom-theme", "dark").unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get("chatroom-theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::with("a", "1");
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("b").unwrap(), None);
    }
}
