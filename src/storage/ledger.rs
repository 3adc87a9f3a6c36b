// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Balance ledger backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `balances`: lowercase address → serialized [`BalanceRecord`]
//!
//! One record per address; every upsert replaces the previous observation
//! (last write wins), it is not an append log.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, TableDefinition};

use crate::blockchain::BalanceRecord;

/// Primary table: lowercase address → serialized BalanceRecord (JSON bytes).
const BALANCES: TableDefinition<&str, &[u8]> = TableDefinition::new("balances");

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("ledger task failed: {0}")]
    Task(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Durable store of observed balances.
#[async_trait]
pub trait BalanceLedger: Send + Sync {
    /// Replace the stored observation for `record.address`.
    async fn upsert(&self, record: BalanceRecord) -> LedgerResult<()>;

    /// Last stored observation for an address, if any.
    async fn latest(&self, address: &str) -> LedgerResult<Option<BalanceRecord>>;
}

/// Embedded balance database.
pub struct RedbLedger {
    db: Arc<Database>,
}

impl RedbLedger {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> LedgerResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(BALANCES)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn upsert_blocking(db: &Database, record: &BalanceRecord) -> LedgerResult<()> {
        let key = record.address.to_string().to_lowercase();
        let json = serde_json::to_vec(record)?;

        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(BALANCES)?;
            table.insert(key.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn latest_blocking(db: &Database, address: &str) -> LedgerResult<Option<BalanceRecord>> {
        let key = address.to_lowercase();
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(BALANCES)?;
        match table.get(key.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Number of addresses with a stored observation.
    pub fn count(&self) -> LedgerResult<u64> {
        use redb::ReadableTableMetadata;

        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BALANCES)?;
        Ok(table.len()?)
    }
}

#[async_trait]
impl BalanceLedger for RedbLedger {
    async fn upsert(&self, record: BalanceRecord) -> LedgerResult<()> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || Self::upsert_blocking(&db, &record))
            .await
            .map_err(|e| LedgerError::Task(e.to_string()))?
    }

    async fn latest(&self, address: &str) -> LedgerResult<Option<BalanceRecord>> {
        let db = Arc::clone(&self.db);
        let address = address.to_string();
        tokio::task::spawn_blocking(move || Self::latest_blocking(&db, &address))
            .await
            .map_err(|e| LedgerError::Task(e.to_string()))?
    }
}
