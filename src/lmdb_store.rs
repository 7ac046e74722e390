//! Durable [`KeyValueStore`] on top of LMDB.
//!
//! Snapshots are kept in a single named database inside an environment
//! directory `<name>.lmdb`. Every write is its own committed transaction,
//! so a snapshot is either fully stored or not stored at all.

use std::fs;
use std::path::{Path, PathBuf};

use lmdb::{Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{debug, info};

use crate::persistence::KeyValueStore;
use crate::store_error::PersistenceError;

const SNAPSHOT_DB: &str = "snapshots";
const MAP_SIZE: usize = 10 * 1024 * 1024;

pub struct LmdbStore {
    env: Environment,
    db: Database,
    dir: PathBuf,
}

impl LmdbStore {
    /// Opens (or creates) the environment at `<name>.lmdb`.
    pub fn open(name: &str) -> Result<Self, PersistenceError> {
        let dir = PathBuf::from(format!("{name}.lmdb"));

        if dir.exists() {
            info!("Opening existing snapshot store at: {}", dir.display());
        } else {
            info!("Creating snapshot store at: {}", dir.display());
            fs::create_dir_all(&dir).map_err(|e| {
                PersistenceError::Storage(format!("cannot create {}: {e}", dir.display()))
            })?;
        }

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(MAP_SIZE)
            .open(&dir)?;
        let db = env.create_db(Some(SNAPSHOT_DB), DatabaseFlags::empty())?;

        Ok(Self { env, db, dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Drops every stored snapshot.
    pub fn clear_all(&self) -> Result<(), PersistenceError> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.clear_db(self.db)?;
        txn.commit()?;
        Ok(())
    }

    /// Flushes pending writes to disk.
    pub fn sync(&self) -> Result<(), PersistenceError> {
        self.env.sync(true)?;
        Ok(())
    }
}

impl KeyValueStore for LmdbStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let txn = self.env.begin_ro_txn()?;
        let value = match txn.get(self.db, &key) {
            Ok(bytes) => Some(String::from_utf8(bytes.to_vec()).map_err(|e| {
                PersistenceError::Storage(format!("snapshot '{key}' is not UTF-8: {e}"))
            })?),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.abort();
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let mut txn = self.env.begin_rw_txn()?;
        match txn.del(self.db, &key, None) {
            Ok(()) => {}
            Err(lmdb::Error::NotFound) => {
                debug!("Snapshot '{key}' was already absent");
            }
            Err(e) => return Err(e.into()),
        }
        txn.commit()?;
        Ok(())
    }
}
