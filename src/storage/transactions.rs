//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, with a
//! per-owner index and a monotonic insertion sequence.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::error::FinanceError;
use crate::models::{OwnerId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    #[serde(default)]
    next_seq: u64,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

#[derive(Debug, Default)]
struct TransactionTable {
    records: HashMap<TransactionId, Transaction>,
    /// Index: owner -> transaction ids
    by_owner: HashMap<OwnerId, Vec<TransactionId>>,
    next_seq: u64,
}

impl TransactionTable {
    fn owned(&self, owner: &OwnerId, id: TransactionId) -> Option<&Transaction> {
        self.records.get(&id).filter(|t| &t.owner == owner)
    }
}

/// Repository for transaction persistence with indexing
pub struct TransactionRepository {
    path: PathBuf,
    table: RwLock<TransactionTable>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            table: RwLock::new(TransactionTable::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TransactionTable>, FinanceError> {
        self.table
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TransactionTable>, FinanceError> {
        self.table
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load transactions from disk and build indexes
    pub fn load(&self) -> Result<(), FinanceError> {
        let file_data: TransactionData = read_json(&self.path)?;
        let mut table = self.write()?;

        table.records.clear();
        table.by_owner.clear();

        let mut next_seq = file_data.next_seq;
        for txn in file_data.transactions {
            next_seq = next_seq.max(txn.seq + 1);
            table
                .by_owner
                .entry(txn.owner.clone())
                .or_default()
                .push(txn.id);
            table.records.insert(txn.id, txn);
        }
        table.next_seq = next_seq;

        tracing::debug!(path = %self.path.display(), count = table.records.len(), "loaded transactions");
        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), FinanceError> {
        let table = self.read()?;

        let mut transactions: Vec<_> = table.records.values().cloned().collect();
        transactions.sort_by_key(|t| t.seq);

        let file_data = TransactionData {
            next_seq: table.next_seq,
            transactions,
        };
        write_json_atomic(&self.path, &file_data)?;

        tracing::debug!(path = %self.path.display(), count = table.records.len(), "saved transactions");
        Ok(())
    }

    /// Store a new transaction, stamping its sequence number and timestamps
    pub fn insert(&self, mut txn: Transaction) -> Result<Transaction, FinanceError> {
        let mut table = self.write()?;

        if table.records.contains_key(&txn.id) {
            return Err(FinanceError::Storage(format!(
                "Duplicate transaction id: {}",
                txn.id
            )));
        }

        let now = Utc::now();
        txn.seq = table.next_seq;
        txn.created_at = now;
        txn.updated_at = now;
        table.next_seq += 1;

        table
            .by_owner
            .entry(txn.owner.clone())
            .or_default()
            .push(txn.id);
        table.records.insert(txn.id, txn.clone());

        Ok(txn)
    }

    /// Get a transaction by ID if it belongs to `owner`
    pub fn get(&self, owner: &OwnerId, id: TransactionId) -> Result<Option<Transaction>, FinanceError> {
        let table = self.read()?;
        Ok(table.owned(owner, id).cloned())
    }

    /// All transactions of an owner, newest first
    pub fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Transaction>, FinanceError> {
        let table = self.read()?;

        let ids = table.by_owner.get(owner).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids
            .iter()
            .filter_map(|id| table.records.get(id).cloned())
            .collect();
        transactions.sort_by(Transaction::ledger_order);
        Ok(transactions)
    }

    /// Apply `change` to a copy of the record and store it if `change` succeeds
    ///
    /// The whole read-modify-write runs under one write lock. The owner and
    /// sequence number cannot be changed.
    pub fn modify<F>(
        &self,
        owner: &OwnerId,
        id: TransactionId,
        change: F,
    ) -> Result<Transaction, FinanceError>
    where
        F: FnOnce(&mut Transaction) -> Result<(), FinanceError>,
    {
        let mut table = self.write()?;

        let mut updated = table
            .owned(owner, id)
            .cloned()
            .ok_or_else(|| FinanceError::transaction_not_found(id.to_string()))?;

        change(&mut updated)?;

        updated.owner = owner.clone();
        if let Some(current) = table.records.get(&id) {
            updated.seq = current.seq;
            updated.created_at = current.created_at;
        }
        updated.id = id;
        updated.updated_at = Utc::now();

        table.records.insert(id, updated.clone());
        Ok(updated)
    }

    /// Delete a transaction owned by `owner`, returning the removed record
    pub fn delete(
        &self,
        owner: &OwnerId,
        id: TransactionId,
    ) -> Result<Option<Transaction>, FinanceError> {
        let mut table = self.write()?;

        if table.owned(owner, id).is_none() {
            return Ok(None);
        }

        let removed = table.records.remove(&id);
        if let Some(ids) = table.by_owner.get_mut(owner) {
            ids.retain(|&tid| tid != id);
        }
        Ok(removed)
    }

    /// Put a record back exactly as given, replacing any record with its ID
    ///
    /// Sequence number and timestamps are kept as they are, so an undone
    /// edit or delete lists in its old place again.
    pub fn restore(&self, txn: Transaction) -> Result<(), FinanceError> {
        let mut table = self.write()?;

        let ids = table.by_owner.entry(txn.owner.clone()).or_default();
        if !ids.contains(&txn.id) {
            ids.push(txn.id);
        }
        table.records.insert(txn.id, txn);
        Ok(())
    }

    /// Count all stored transactions
    pub fn count(&self) -> Result<usize, FinanceError> {
        Ok(self.read()?.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionKind, TxDate};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        let repo = TransactionRepository::new(path);
        (temp_dir, repo)
    }

    fn owner(id: &str) -> OwnerId {
        OwnerId::new(id).unwrap()
    }

    fn txn(owner_id: &str, date: &str, amount: rust_decimal::Decimal) -> Transaction {
        Transaction::new(
            owner(owner_id),
            TxDate::parse(date).unwrap(),
            TransactionKind::Expense,
            Money::new(amount),
            "food",
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_assigns_increasing_sequence() {
        let (_temp_dir, repo) = create_test_repo();
        let a = repo.insert(txn("u1", "2024-05-01", dec!(1))).unwrap();
        let b = repo.insert(txn("u1", "2024-05-01", dec!(2))).unwrap();
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_get_is_owner_scoped() {
        let (_temp_dir, repo) = create_test_repo();
        let stored = repo.insert(txn("u1", "2024-05-01", dec!(10))).unwrap();

        assert!(repo.get(&owner("u1"), stored.id).unwrap().is_some());
        assert!(repo.get(&owner("u2"), stored.id).unwrap().is_none());
    }

    #[test]
    fn test_list_for_owner_orders_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        let first = repo.insert(txn("u1", "2024-05-01", dec!(1))).unwrap();
        let later_date = repo.insert(txn("u1", "2024-05-10", dec!(2))).unwrap();
        let same_day = repo.insert(txn("u1", "2024-05-01", dec!(3))).unwrap();
        repo.insert(txn("u2", "2024-06-01", dec!(4))).unwrap();

        let ids: Vec<_> = repo
            .list_for_owner(&owner("u1"))
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![later_date.id, same_day.id, first.id]);
    }

    #[test]
    fn test_modify_keeps_owner_and_sequence() {
        let (_temp_dir, repo) = create_test_repo();
        let stored = repo.insert(txn("u1", "2024-05-01", dec!(10))).unwrap();

        let updated = repo
            .modify(&owner("u1"), stored.id, |t| {
                t.amount = Money::new(dec!(25));
                t.owner = owner("intruder");
                t.seq = 999;
                Ok(())
            })
            .unwrap();

        assert_eq!(updated.amount, Money::new(dec!(25)));
        assert_eq!(updated.owner, owner("u1"));
        assert_eq!(updated.seq, stored.seq);
    }

    #[test]
    fn test_failed_modify_leaves_record_unchanged() {
        let (_temp_dir, repo) = create_test_repo();
        let stored = repo.insert(txn("u1", "2024-05-01", dec!(10))).unwrap();

        let result = repo.modify(&owner("u1"), stored.id, |t| {
            t.amount = Money::new(dec!(99));
            Err(FinanceError::Validation("nope".into()))
        });

        assert!(result.unwrap_err().is_validation());
        let current = repo.get(&owner("u1"), stored.id).unwrap().unwrap();
        assert_eq!(current.amount, Money::new(dec!(10)));
    }

    #[test]
    fn test_modify_other_owner_is_not_found() {
        let (_temp_dir, repo) = create_test_repo();
        let stored = repo.insert(txn("u1", "2024-05-01", dec!(10))).unwrap();

        let err = repo.modify(&owner("u2"), stored.id, |_| Ok(())).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let stored = repo.insert(txn("u1", "2024-05-01", dec!(10))).unwrap();

        assert!(repo.delete(&owner("u2"), stored.id).unwrap().is_none());
        assert_eq!(repo.delete(&owner("u1"), stored.id).unwrap(), Some(stored.clone()));
        assert!(repo.delete(&owner("u1"), stored.id).unwrap().is_none());
        assert!(repo.list_for_owner(&owner("u1")).unwrap().is_empty());
    }

    #[test]
    fn test_restore_puts_record_back_in_place() {
        let (_temp_dir, repo) = create_test_repo();
        let first = repo.insert(txn("u1", "2024-05-01", dec!(10))).unwrap();
        let second = repo.insert(txn("u1", "2024-05-01", dec!(20))).unwrap();

        let removed = repo.delete(&owner("u1"), first.id).unwrap().unwrap();
        repo.restore(removed).unwrap();

        let listed: Vec<_> = repo
            .list_for_owner(&owner("u1"))
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(listed, vec![second.id, first.id]);

        // Restoring over a live record replaces it without duplicating the index
        let edited = repo
            .modify(&owner("u1"), second.id, |t| {
                t.amount = Money::new(dec!(99));
                Ok(())
            })
            .unwrap();
        assert_eq!(edited.amount, Money::new(dec!(99)));
        repo.restore(second.clone()).unwrap();

        assert_eq!(repo.get(&owner("u1"), second.id).unwrap().unwrap(), second);
        assert_eq!(repo.list_for_owner(&owner("u1")).unwrap().len(), 2);
    }

    #[test]
    fn test_save_and_reload_keeps_sequence() {
        let (temp_dir, repo) = create_test_repo();
        let a = repo.insert(txn("u1", "2024-05-01", dec!(10))).unwrap();
        repo.save().unwrap();

        let repo2 = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo2.load().unwrap();

        let reloaded = repo2.get(&owner("u1"), a.id).unwrap().unwrap();
        assert_eq!(reloaded, a);

        let b = repo2.insert(txn("u1", "2024-05-01", dec!(1))).unwrap();
        assert!(b.seq > a.seq);
    }
}
