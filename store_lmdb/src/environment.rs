//! LMDB environment setup.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use curio_store::StoreError;

use crate::LmdbError;

/// Default map size: 1 GiB, plenty for tens of millions of records.
pub const DEFAULT_MAP_SIZE: usize = 1024 * 1024 * 1024;

const MAX_DBS: u32 = 4;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Env,
    pub(crate) records_db: Database<Bytes, Bytes>,
    pub(crate) party_db: Database<Bytes, Bytes>,
    pub(crate) token_db: Database<Bytes, Bytes>,
    pub(crate) state_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, StoreError> {
        std::fs::create_dir_all(path)
            .map_err(|e| StoreError::Backend(format!("create data dir: {e}")))?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)
                .map_err(LmdbError::from)?
        };

        let mut wtxn = env.write_txn().map_err(LmdbError::from)?;
        let records_db = env
            .create_database(&mut wtxn, Some("records"))
            .map_err(LmdbError::from)?;
        let party_db = env
            .create_database(&mut wtxn, Some("party_index"))
            .map_err(LmdbError::from)?;
        let token_db = env
            .create_database(&mut wtxn, Some("token_index"))
            .map_err(LmdbError::from)?;
        let state_db = env
            .create_database(&mut wtxn, Some("state_index"))
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        Ok(Self {
            env,
            records_db,
            party_db,
            token_db,
            state_db,
        })
    }

    pub(crate) fn env(&self) -> &Env {
        &self.env
    }
}
