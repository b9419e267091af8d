//! Budget service
//!
//! Creating and removing monthly category budgets, and comparing them with
//! actual spending. At most one budget exists per owner, category and period.

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Budget, Money, OwnerId, Period, Transaction};
use crate::reports::BudgetReport;
use crate::storage::BudgetRepository;

pub struct BudgetService<'a> {
    repository: &'a dyn BudgetRepository,
}

impl<'a> BudgetService<'a> {
    pub fn new(repository: &'a dyn BudgetRepository) -> Self {
        Self { repository }
    }

    /// Create a budget
    ///
    /// # Errors
    ///
    /// `Validation` for a blank category or non-positive limit, `Duplicate`
    /// when the owner already has a budget for the category in that period.
    pub fn create(
        &self,
        owner: &OwnerId,
        category: &str,
        period: Period,
        limit: Money,
    ) -> TrackerResult<Budget> {
        let budget = Budget::new(owner.clone(), category.trim(), period, limit);
        budget
            .validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        if let Err(e) = self.repository.insert_budget(&budget) {
            if e.is_duplicate() {
                tracing::warn!(category = %budget.category, period = %period, "budget already exists");
            }
            return Err(e);
        }

        tracing::info!(
            id = %budget.id,
            category = %budget.category,
            period = %period,
            limit = limit.cents(),
            "budget created"
        );
        Ok(budget)
    }

    pub fn list(&self, owner: &OwnerId) -> TrackerResult<Vec<Budget>> {
        let mut budgets = self.repository.list_budgets(owner)?;
        budgets.sort_by(|a, b| {
            a.period
                .cmp(&b.period)
                .then_with(|| a.category.cmp(&b.category))
        });
        Ok(budgets)
    }

    pub fn list_for_period(&self, owner: &OwnerId, period: &Period) -> TrackerResult<Vec<Budget>> {
        Ok(self
            .list(owner)?
            .into_iter()
            .filter(|b| &b.period == period)
            .collect())
    }

    /// Remove a budget by full uuid or short display id
    pub fn remove(&self, owner: &OwnerId, reference: &str) -> TrackerResult<Budget> {
        let reference = reference.trim();
        let mut matches = self
            .repository
            .list_budgets(owner)?
            .into_iter()
            .filter(|b| b.id.matches(reference));

        let budget = matches
            .next()
            .ok_or_else(|| TrackerError::budget_not_found(reference))?;
        if matches.next().is_some() {
            return Err(TrackerError::Validation(format!(
                "Budget reference '{}' is ambiguous; use the full id",
                reference
            )));
        }

        if !self.repository.remove_budget(owner, budget.id)? {
            return Err(TrackerError::budget_not_found(reference));
        }

        tracing::info!(id = %budget.id, category = %budget.category, "budget removed");
        Ok(budget)
    }

    /// Budget vs. actual for one period
    pub fn status(
        &self,
        owner: &OwnerId,
        period: &Period,
        transactions: &[Transaction],
    ) -> TrackerResult<BudgetReport> {
        let budgets = self.list_for_period(owner, period)?;
        Ok(BudgetReport::generate(&budgets, transactions, period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetId, TransactionKind};
    use crate::storage::JsonStore;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn owner() -> OwnerId {
        OwnerId::new("user-1")
    }

    fn march() -> Period {
        Period::new(2024, 3).unwrap()
    }

    #[test]
    fn test_create_and_list() {
        let store = JsonStore::in_memory();
        let service = BudgetService::new(&store);

        service
            .create(&owner(), "Travel", march(), Money::from_cents(200_000))
            .unwrap();
        service
            .create(&owner(), " Food ", march(), Money::from_cents(500_000))
            .unwrap();
        service
            .create(&owner(), "Food", march().next(), Money::from_cents(500_000))
            .unwrap();

        let listed = service.list_for_period(&owner(), &march()).unwrap();
        let categories: Vec<&str> = listed.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(categories, vec!["Food", "Travel"]);
        assert_eq!(service.list(&owner()).unwrap().len(), 3);
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let store = JsonStore::in_memory();
        let service = BudgetService::new(&store);

        service
            .create(&owner(), "Food", march(), Money::from_cents(500_000))
            .unwrap();
        let err = service
            .create(&owner(), "Food", march(), Money::from_cents(100))
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(service.list(&owner()).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_budgets() {
        let store = JsonStore::in_memory();
        let service = BudgetService::new(&store);

        assert!(service
            .create(&owner(), "Food", march(), Money::zero())
            .unwrap_err()
            .is_validation());
        assert!(service
            .create(&owner(), "", march(), Money::from_cents(100))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_remove() {
        let store = JsonStore::in_memory();
        let service = BudgetService::new(&store);
        let budget = service
            .create(&owner(), "Food", march(), Money::from_cents(100))
            .unwrap();

        assert!(service
            .remove(&OwnerId::new("user-2"), &budget.id.to_string())
            .unwrap_err()
            .is_not_found());
        service.remove(&owner(), &budget.id.to_string()).unwrap();
        assert!(service.list(&owner()).unwrap().is_empty());
    }

    #[test]
    fn test_remove_rejects_ambiguous_short_id() {
        let store = JsonStore::in_memory();
        let service = BudgetService::new(&store);

        let mut food = Budget::new(owner(), "Food", march(), Money::from_cents(100));
        food.id = BudgetId::from_uuid(Uuid::parse_str("1234abcd-0000-4000-8000-000000000001").unwrap());
        let mut rent = Budget::new(owner(), "Rent", march(), Money::from_cents(100));
        rent.id = BudgetId::from_uuid(Uuid::parse_str("1234abcd-0000-4000-8000-000000000002").unwrap());
        store.insert_budget(&food).unwrap();
        store.insert_budget(&rent).unwrap();

        let err = service.remove(&owner(), "bud-1234abcd").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.list(&owner()).unwrap().len(), 2);

        let removed = service
            .remove(&owner(), &rent.id.as_uuid().to_string())
            .unwrap();
        assert_eq!(removed.category, "Rent");
        assert_eq!(service.remove(&owner(), "bud-1234abcd").unwrap().category, "Food");
    }

    #[test]
    fn test_status_uses_period_spending() {
        let store = JsonStore::in_memory();
        let service = BudgetService::new(&store);
        service
            .create(&owner(), "Food", march(), Money::from_cents(100_000))
            .unwrap();

        let txns = vec![
            Transaction::new(
                owner(),
                TransactionKind::Expense,
                Money::from_cents(45_000),
                "Food",
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            ),
            Transaction::new(
                owner(),
                TransactionKind::Expense,
                Money::from_cents(99_000),
                "Food",
                NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            ),
        ];

        let report = service.status(&owner(), &march(), &txns).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].spent, Money::from_cents(45_000));
        assert_eq!(report.rows[0].remaining, Money::from_cents(55_000));
        assert_eq!(report.over_budget().count(), 0);
    }
}
