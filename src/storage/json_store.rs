//! JSON-file implementation of the repository traits
//!
//! Keeps every record in memory behind a lock and rewrites the owning file
//! after each change. Without paths it is a purely in-memory store.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use super::file_io::{read_json, write_json_atomic};
use super::{BudgetRepository, TransactionRepository};
use crate::config::TrackerPaths;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Budget, BudgetId, OwnerId, Transaction, TransactionId, TransactionRecord};

#[derive(Debug, Default, Serialize, Deserialize)]
struct TransactionData {
    #[serde(default)]
    transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

pub struct JsonStore {
    transactions_path: Option<PathBuf>,
    budgets_path: Option<PathBuf>,
    transactions: RwLock<Vec<TransactionRecord>>,
    budgets: RwLock<Vec<Budget>>,
}

fn lock_error(e: impl std::fmt::Display) -> TrackerError {
    TrackerError::Storage(format!("Failed to acquire lock: {}", e))
}

impl JsonStore {
    /// Open the store under the data directory, loading existing files
    pub fn open(paths: &TrackerPaths) -> TrackerResult<Self> {
        paths.ensure_directories()?;

        let transactions: TransactionData = read_json(paths.transactions_file())?;
        let budgets: BudgetData = read_json(paths.budgets_file())?;
        tracing::debug!(
            transactions = transactions.transactions.len(),
            budgets = budgets.budgets.len(),
            "store loaded"
        );

        Ok(Self {
            transactions_path: Some(paths.transactions_file()),
            budgets_path: Some(paths.budgets_file()),
            transactions: RwLock::new(transactions.transactions),
            budgets: RwLock::new(budgets.budgets),
        })
    }

    /// A store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            transactions_path: None,
            budgets_path: None,
            transactions: RwLock::new(Vec::new()),
            budgets: RwLock::new(Vec::new()),
        }
    }

    fn persist_transactions(&self, records: &[TransactionRecord]) -> TrackerResult<()> {
        match &self.transactions_path {
            Some(path) => write_json_atomic(
                path,
                &TransactionData {
                    transactions: records.to_vec(),
                },
            ),
            None => Ok(()),
        }
    }

    fn persist_budgets(&self, budgets: &[Budget]) -> TrackerResult<()> {
        match &self.budgets_path {
            Some(path) => write_json_atomic(
                path,
                &BudgetData {
                    budgets: budgets.to_vec(),
                },
            ),
            None => Ok(()),
        }
    }
}

impl TransactionRepository for JsonStore {
    fn list_transactions(&self, owner: &OwnerId) -> TrackerResult<Vec<Transaction>> {
        let records = self.transactions.read().map_err(lock_error)?;
        Ok(records
            .iter()
            .filter(|r| &r.owner == owner)
            .cloned()
            .map(Transaction::from)
            .collect())
    }

    fn insert_transactions(&self, transactions: &[Transaction]) -> TrackerResult<()> {
        let mut records = self.transactions.write().map_err(lock_error)?;
        let before = records.len();
        records.extend(transactions.iter().map(Transaction::to_record));

        if let Err(e) = self.persist_transactions(&records) {
            records.truncate(before);
            return Err(e);
        }
        Ok(())
    }

    fn remove_transaction(&self, owner: &OwnerId, id: TransactionId) -> TrackerResult<bool> {
        let mut records = self.transactions.write().map_err(lock_error)?;
        let Some(index) = records.iter().position(|r| r.id == id && &r.owner == owner) else {
            return Ok(false);
        };

        let removed = records.remove(index);
        if let Err(e) = self.persist_transactions(&records) {
            records.insert(index, removed);
            return Err(e);
        }
        Ok(true)
    }

    fn update_transaction(&self, transaction: &Transaction) -> TrackerResult<bool> {
        let mut records = self.transactions.write().map_err(lock_error)?;
        let Some(index) = records
            .iter()
            .position(|r| r.id == transaction.id && r.owner == transaction.owner)
        else {
            return Ok(false);
        };

        let previous = std::mem::replace(&mut records[index], transaction.to_record());
        if let Err(e) = self.persist_transactions(&records) {
            records[index] = previous;
            return Err(e);
        }
        Ok(true)
    }
}

impl BudgetRepository for JsonStore {
    fn list_budgets(&self, owner: &OwnerId) -> TrackerResult<Vec<Budget>> {
        let budgets = self.budgets.read().map_err(lock_error)?;
        Ok(budgets.iter().filter(|b| &b.owner == owner).cloned().collect())
    }

    fn insert_budget(&self, budget: &Budget) -> TrackerResult<()> {
        let mut budgets = self.budgets.write().map_err(lock_error)?;

        // Checked under the write lock so two writers cannot both pass
        if budgets.iter().any(|b| b.conflicts_with(budget)) {
            return Err(TrackerError::duplicate_budget(&budget.category, budget.period));
        }

        budgets.push(budget.clone());
        if let Err(e) = self.persist_budgets(&budgets) {
            budgets.pop();
            return Err(e);
        }
        Ok(())
    }

    fn remove_budget(&self, owner: &OwnerId, id: BudgetId) -> TrackerResult<bool> {
        let mut budgets = self.budgets.write().map_err(lock_error)?;
        let Some(index) = budgets.iter().position(|b| b.id == id && &b.owner == owner) else {
            return Ok(false);
        };

        let removed = budgets.remove(index);
        if let Err(e) = self.persist_budgets(&budgets) {
            budgets.insert(index, removed);
            return Err(e);
        }
        Ok(true)
    }
}
