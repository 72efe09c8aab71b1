//! Transaction service
//!
//! Provides the ledger operations: validated inserts and partial updates,
//! owner-scoped lookups and newest-first listings.

use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    Money, OwnerId, Transaction, TransactionId, TransactionKind, TransactionPatch, TxDate,
};
use crate::storage::{Storage, TransactionRepository};

/// Service for ledger management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// `YYYY-MM-DD`; normalized before storage
    pub date: String,
    pub kind: TransactionKind,
    pub amount: Money,
    pub category: String,
    pub description: String,
}

fn parse_date(date: &str) -> FinanceResult<TxDate> {
    TxDate::parse(date).map_err(|e| FinanceError::Validation(e.to_string()))
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Save the ledger, undoing the in-memory change when the write fails
    fn save_or_undo<F>(&self, undo: F) -> FinanceResult<()>
    where
        F: FnOnce(&TransactionRepository) -> FinanceResult<()>,
    {
        let repo = &self.storage.transactions;
        if let Err(e) = repo.save() {
            if let Err(undo_err) = undo(repo) {
                tracing::error!(error = %undo_err, "failed to undo unsaved ledger change");
            }
            return Err(e);
        }
        Ok(())
    }

    /// All of an owner's transactions, newest date first, then newest insert first
    pub fn list(&self, owner: &OwnerId) -> FinanceResult<Vec<Transaction>> {
        self.storage.transactions.list_for_owner(owner)
    }

    /// The first `limit` entries of [`list`](Self::list)
    pub fn recent(&self, owner: &OwnerId, limit: usize) -> FinanceResult<Vec<Transaction>> {
        let mut transactions = self.list(owner)?;
        transactions.truncate(limit);
        Ok(transactions)
    }

    /// Record a new transaction
    pub fn create(
        &self,
        owner: &OwnerId,
        input: CreateTransactionInput,
    ) -> FinanceResult<Transaction> {
        let date = parse_date(&input.date)?;

        let mut txn = Transaction::new(
            owner.clone(),
            date,
            input.kind,
            input.amount,
            input.category.trim(),
        );
        txn.description = input.description;

        txn.validate()
            .map_err(|e| FinanceError::Validation(e.to_string()))?;

        let txn = self.storage.transactions.insert(txn)?;
        let id = txn.id;
        self.save_or_undo(|repo| repo.delete(owner, id).map(|_| ()))?;

        tracing::info!(
            owner = %owner,
            id = %txn.id,
            kind = %txn.kind,
            amount = %txn.amount,
            "transaction recorded"
        );
        Ok(txn)
    }

    /// Get a transaction by ID
    pub fn get(&self, owner: &OwnerId, id: TransactionId) -> FinanceResult<Option<Transaction>> {
        self.storage.transactions.get(owner, id)
    }

    /// Get a transaction by ID, failing with `NotFound`
    pub fn find(&self, owner: &OwnerId, id: TransactionId) -> FinanceResult<Transaction> {
        self.get(owner, id)?
            .ok_or_else(|| FinanceError::transaction_not_found(id.to_string()))
    }

    /// Apply the fields present in `patch`
    ///
    /// Every present field is validated before anything is written, so a
    /// rejected patch leaves the stored record unchanged.
    pub fn update(
        &self,
        owner: &OwnerId,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> FinanceResult<Transaction> {
        let date = patch.date.as_deref().map(parse_date).transpose()?;

        let mut previous = None;
        let txn = self.storage.transactions.modify(owner, id, |txn| {
            previous = Some(txn.clone());
            if let Some(date) = date {
                txn.date = date;
            }
            if let Some(kind) = patch.kind {
                txn.kind = kind;
            }
            if let Some(amount) = patch.amount {
                txn.amount = amount;
            }
            if let Some(category) = patch.category {
                txn.category = category.trim().to_string();
            }
            if let Some(description) = patch.description {
                txn.description = description;
            }

            txn.validate()
                .map_err(|e| FinanceError::Validation(e.to_string()))
        })?;
        self.save_or_undo(|repo| match previous {
            Some(previous) => repo.restore(previous),
            None => Ok(()),
        })?;

        tracing::info!(owner = %owner, id = %id, "transaction updated");
        Ok(txn)
    }

    /// Delete a transaction
    pub fn delete(&self, owner: &OwnerId, id: TransactionId) -> FinanceResult<()> {
        let removed = self
            .storage
            .transactions
            .delete(owner, id)?
            .ok_or_else(|| FinanceError::transaction_not_found(id.to_string()))?;
        self.save_or_undo(|repo| repo.restore(removed))?;

        tracing::info!(owner = %owner, id = %id, "transaction deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FinancePaths;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn owner(id: &str) -> OwnerId {
        OwnerId::new(id).unwrap()
    }

    fn input(
        date: &str,
        kind: TransactionKind,
        amount: rust_decimal::Decimal,
        category: &str,
    ) -> CreateTransactionInput {
        CreateTransactionInput {
            date: date.to_string(),
            kind,
            amount: Money::new(amount),
            category: category.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_create_then_find() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let mut new_txn = input("2024-05-03", TransactionKind::Expense, dec!(12.50), "food");
        new_txn.description = "lunch".into();
        let created = service.create(&owner("u1"), new_txn).unwrap();

        let found = service.find(&owner("u1"), created.id).unwrap();
        assert_eq!(found.date.as_str(), "2024-05-03");
        assert_eq!(found.kind, TransactionKind::Expense);
        assert_eq!(found.amount, Money::new(dec!(12.50)));
        assert_eq!(found.category, "food");
        assert_eq!(found.description, "lunch");
    }

    #[test]
    fn test_create_rejects_invalid_input() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let u1 = owner("u1");

        let negative = input("2024-05-03", TransactionKind::Expense, dec!(-1), "food");
        assert!(service.create(&u1, negative).unwrap_err().is_validation());

        let bad_date = input("2024-02-30", TransactionKind::Expense, dec!(1), "food");
        assert!(service.create(&u1, bad_date).unwrap_err().is_validation());

        let blank = input("2024-05-03", TransactionKind::Expense, dec!(1), "  ");
        assert!(service.create(&u1, blank).unwrap_err().is_validation());

        assert!(service.list(&u1).unwrap().is_empty());
    }

    #[test]
    fn test_create_normalizes_date() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let created = service
            .create(
                &owner("u1"),
                input("2024-5-3", TransactionKind::Income, dec!(1), "gift"),
            )
            .unwrap();
        assert_eq!(created.date.as_str(), "2024-05-03");
    }

    #[test]
    fn test_other_owner_cannot_see_transaction() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let created = service
            .create(
                &owner("u1"),
                input("2024-05-03", TransactionKind::Income, dec!(1), "gift"),
            )
            .unwrap();

        assert!(service.find(&owner("u2"), created.id).unwrap_err().is_not_found());
        assert!(service.delete(&owner("u2"), created.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_recent_is_prefix_of_list() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let u1 = owner("u1");

        for day in 1..=15 {
            let date = format!("2024-05-{:02}", (day % 4) + 1);
            service
                .create(&u1, input(&date, TransactionKind::Expense, dec!(1), "food"))
                .unwrap();
        }

        let all = service.list(&u1).unwrap();
        let recent = service.recent(&u1, 10).unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(&all[..10], &recent[..]);

        assert_eq!(service.recent(&u1, 100).unwrap().len(), 15);
    }

    #[test]
    fn test_same_day_entries_list_newest_insert_first() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let u1 = owner("u1");

        let a = service
            .create(&u1, input("2024-05-01", TransactionKind::Expense, dec!(1), "a"))
            .unwrap();
        let b = service
            .create(&u1, input("2024-05-01", TransactionKind::Expense, dec!(2), "b"))
            .unwrap();

        let ids: Vec<_> = service.list(&u1).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn test_update_applies_present_fields_only() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let u1 = owner("u1");

        let created = service
            .create(&u1, input("2024-05-01", TransactionKind::Expense, dec!(10), "food"))
            .unwrap();

        let patch = TransactionPatch {
            amount: Some(Money::new(dec!(20))),
            date: Some("2024-06-02".into()),
            ..Default::default()
        };
        let updated = service.update(&u1, created.id, patch).unwrap();

        assert_eq!(updated.amount, Money::new(dec!(20)));
        assert_eq!(updated.date.as_str(), "2024-06-02");
        assert_eq!(updated.category, "food");
        assert_eq!(updated.kind, TransactionKind::Expense);
        assert_eq!(updated.owner, u1);
    }

    #[test]
    fn test_invalid_update_leaves_record_unchanged() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let u1 = owner("u1");

        let created = service
            .create(&u1, input("2024-05-01", TransactionKind::Expense, dec!(10), "food"))
            .unwrap();

        let bad_amount = TransactionPatch {
            amount: Some(Money::new(dec!(-5))),
            category: Some("rent".into()),
            ..Default::default()
        };
        assert!(service.update(&u1, created.id, bad_amount).unwrap_err().is_validation());

        let bad_date = TransactionPatch {
            date: Some("not-a-date".into()),
            ..Default::default()
        };
        assert!(service.update(&u1, created.id, bad_date).unwrap_err().is_validation());

        let current = service.find(&u1, created.id).unwrap();
        assert_eq!(current.amount, Money::new(dec!(10)));
        assert_eq!(current.category, "food");
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let err = service
            .update(&owner("u1"), TransactionId::new(), TransactionPatch::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_then_find_is_not_found() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let u1 = owner("u1");

        let created = service
            .create(&u1, input("2024-05-01", TransactionKind::Income, dec!(10), "gift"))
            .unwrap();
        service.delete(&u1, created.id).unwrap();

        assert!(service.find(&u1, created.id).unwrap_err().is_not_found());
        assert!(service.delete(&u1, created.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_mutations_are_persisted() {
        let (temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let created = service
            .create(
                &owner("u1"),
                input("2024-05-01", TransactionKind::Income, dec!(10), "gift"),
            )
            .unwrap();

        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let reopened = Storage::open(paths).unwrap();
        let found = TransactionService::new(&reopened)
            .find(&owner("u1"), created.id)
            .unwrap();
        assert_eq!(found, created);
    }

    /// Occupy the temp file path so the next save fails
    fn block_saves(storage: &Storage) -> std::path::PathBuf {
        let blocker = storage
            .paths()
            .transactions_file()
            .with_extension("json.tmp");
        std::fs::create_dir(&blocker).unwrap();
        blocker
    }

    #[test]
    fn test_failed_save_undoes_create() {
        let (temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let u1 = owner("u1");

        let blocker = block_saves(&storage);
        let err = service
            .create(&u1, input("2024-05-01", TransactionKind::Expense, dec!(10), "food"))
            .unwrap_err();
        assert!(matches!(err, FinanceError::Storage(_)));
        assert!(service.list(&u1).unwrap().is_empty());

        std::fs::remove_dir(&blocker).unwrap();
        storage.close().unwrap();

        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let reopened = Storage::open(paths).unwrap();
        assert_eq!(reopened.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_failed_save_undoes_update_and_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let u1 = owner("u1");

        let created = service
            .create(&u1, input("2024-05-01", TransactionKind::Expense, dec!(10), "food"))
            .unwrap();

        let blocker = block_saves(&storage);
        let patch = TransactionPatch {
            amount: Some(Money::new(dec!(99))),
            ..Default::default()
        };
        assert!(service.update(&u1, created.id, patch).is_err());
        assert_eq!(service.find(&u1, created.id).unwrap(), created);

        assert!(service.delete(&u1, created.id).is_err());
        assert_eq!(service.list(&u1).unwrap(), vec![created.clone()]);

        std::fs::remove_dir(&blocker).unwrap();
        service.delete(&u1, created.id).unwrap();
        assert!(service.list(&u1).unwrap().is_empty());
    }
}
