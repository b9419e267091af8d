//! Storage boundary
//!
//! The engines never read storage themselves. Services receive these
//! repositories explicitly and hand the engines a snapshot.

pub mod file_io;
pub mod json_store;

pub use file_io::{read_json, write_json_atomic};
pub use json_store::JsonStore;

use crate::error::TrackerResult;
use crate::models::{Budget, BudgetId, CategorizationRule, OwnerId, Transaction, TransactionId};

/// Source of an owner's transactions
pub trait TransactionRepository {
    /// A consistent snapshot of the owner's transactions
    fn list_transactions(&self, owner: &OwnerId) -> TrackerResult<Vec<Transaction>>;

    /// Store a batch; either all are stored or none are
    fn insert_transactions(&self, transactions: &[Transaction]) -> TrackerResult<()>;

    fn insert_transaction(&self, transaction: &Transaction) -> TrackerResult<()> {
        self.insert_transactions(std::slice::from_ref(transaction))
    }

    /// Returns false when no such transaction belongs to the owner
    fn remove_transaction(&self, owner: &OwnerId, id: TransactionId) -> TrackerResult<bool>;

    /// Replace a stored transaction with the same id and owner
    ///
    /// Returns false when no such transaction exists.
    fn update_transaction(&self, transaction: &Transaction) -> TrackerResult<bool>;
}

/// Source of an owner's budgets
pub trait BudgetRepository {
    fn list_budgets(&self, owner: &OwnerId) -> TrackerResult<Vec<Budget>>;

    /// Store a budget
    ///
    /// Implementations must reject a budget whose (owner, category, period)
    /// is already taken with `TrackerError::Duplicate`.
    fn insert_budget(&self, budget: &Budget) -> TrackerResult<()>;

    /// Returns false when no such budget belongs to the owner
    fn remove_budget(&self, owner: &OwnerId, id: BudgetId) -> TrackerResult<bool>;
}

/// Source of categorization rules
pub trait RuleSource {
    fn list_rules(&self) -> TrackerResult<Vec<CategorizationRule>>;
}

impl RuleSource for [CategorizationRule] {
    fn list_rules(&self) -> TrackerResult<Vec<CategorizationRule>> {
        Ok(self.to_vec())
    }
}

impl RuleSource for Vec<CategorizationRule> {
    fn list_rules(&self) -> TrackerResult<Vec<CategorizationRule>> {
        Ok(self.clone())
    }
}
