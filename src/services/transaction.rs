//! Transaction service
//!
//! Recording, editing, listing and removing an owner's transactions. New
//! transactions without an explicit category are categorized from their
//! merchant.

use chrono::NaiveDate;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    Money, OccurredAt, OwnerId, Period, Transaction, TransactionKind, UNKNOWN_MERCHANT,
};
use crate::services::categorize::Categorizer;
use crate::storage::TransactionRepository;

/// Service for transaction management
pub struct TransactionService<'a> {
    repository: &'a dyn TransactionRepository,
    categorizer: Categorizer,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub period: Option<Period>,
    pub kind: Option<TransactionKind>,
    /// Case-insensitive exact category match
    pub category: Option<String>,
    /// Calendar day (UTC)
    pub date: Option<NaiveDate>,
    /// Case-insensitive substring of category, merchant or notes
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(period) = &self.period {
            if !txn.in_period(period) {
                return false;
            }
        }

        if let Some(kind) = self.kind {
            if txn.kind != kind {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if !txn.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }

        if let Some(date) = self.date {
            if txn.day() != Some(date) {
                return false;
            }
        }

        if let Some(term) = &self.search {
            let term = term.trim().to_lowercase();
            if !term.is_empty() {
                let hit = txn.category.to_lowercase().contains(&term)
                    || txn
                        .merchant
                        .as_deref()
                        .is_some_and(|m| m.to_lowercase().contains(&term))
                    || txn.notes.to_lowercase().contains(&term);
                if !hit {
                    return false;
                }
            }
        }

        true
    }
}

/// Input for recording a new transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Money,
    /// Blank means "categorize from the merchant"
    pub category: Option<String>,
    pub merchant: Option<String>,
    pub notes: Option<String>,
    pub occurred_at: OccurredAt,
}

impl NewTransaction {
    pub fn expense(amount: Money, date: NaiveDate) -> Self {
        Self {
            kind: TransactionKind::Expense,
            amount,
            category: None,
            merchant: None,
            notes: None,
            occurred_at: OccurredAt::from_date(date),
        }
    }

    pub fn income(amount: Money, date: NaiveDate) -> Self {
        Self {
            kind: TransactionKind::Income,
            ..Self::expense(amount, date)
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Changes to an existing transaction; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub kind: Option<TransactionKind>,
    pub amount: Option<Money>,
    /// Blank means "categorize from the merchant"
    pub category: Option<String>,
    pub merchant: Option<String>,
    pub notes: Option<String>,
    pub occurred_at: Option<OccurredAt>,
}

impl TransactionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.occurred_at = Some(OccurredAt::from_date(date));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.merchant.is_none()
            && self.notes.is_none()
            && self.occurred_at.is_none()
    }
}

impl<'a> TransactionService<'a> {
    pub fn new(repository: &'a dyn TransactionRepository, categorizer: Categorizer) -> Self {
        Self {
            repository,
            categorizer,
        }
    }

    /// Record a transaction
    ///
    /// The amount must be positive; the kind carries the direction.
    pub fn add(&self, owner: &OwnerId, input: NewTransaction) -> TrackerResult<Transaction> {
        let txn = self.build(owner, input)?;
        self.repository.insert_transaction(&txn)?;

        tracing::info!(
            id = %txn.id,
            kind = %txn.kind,
            category = %txn.category,
            amount = txn.amount.cents(),
            "transaction recorded"
        );
        Ok(txn)
    }

    /// Validate and categorize without storing
    pub fn build(&self, owner: &OwnerId, input: NewTransaction) -> TrackerResult<Transaction> {
        if !input.amount.is_positive() {
            return Err(TrackerError::Validation(format!(
                "Transaction amount must be positive, got {}",
                input.amount
            )));
        }

        let merchant = input.merchant.as_deref().map(str::trim).filter(|m| !m.is_empty());

        let category = match input.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => self.categorizer.categorize(merchant),
        };

        let mut txn = Transaction::with_occurred_at(
            owner.clone(),
            input.kind,
            input.amount,
            category,
            Some(input.occurred_at),
        )
        .with_merchant(merchant.unwrap_or(UNKNOWN_MERCHANT));

        if let Some(notes) = input.notes {
            txn = txn.with_notes(notes.trim());
        }

        if txn.period.is_none() {
            tracing::warn!(id = %txn.id, "transaction timestamp has no period; it will not appear in reports");
        }

        Ok(txn)
    }

    /// Edit a stored transaction in place
    ///
    /// Fields left `None` keep their value. The amount rule is the same as
    /// for `add`, and a new timestamp moves the transaction to the period it
    /// resolves to. A blank category is re-derived from the merchant.
    pub fn update(
        &self,
        owner: &OwnerId,
        reference: &str,
        update: TransactionUpdate,
    ) -> TrackerResult<Transaction> {
        if update.is_empty() {
            return Err(TrackerError::Validation(
                "Nothing to update; pass at least one field".into(),
            ));
        }

        let mut txn = self.find(owner, reference)?;

        if let Some(amount) = update.amount {
            if !amount.is_positive() {
                return Err(TrackerError::Validation(format!(
                    "Transaction amount must be positive, got {}",
                    amount
                )));
            }
            txn.amount = amount;
        }

        if let Some(kind) = update.kind {
            txn.kind = kind;
        }

        if let Some(merchant) = update.merchant.as_deref() {
            let merchant = merchant.trim();
            txn.merchant = Some(if merchant.is_empty() {
                UNKNOWN_MERCHANT.to_string()
            } else {
                merchant.to_string()
            });
        }

        if let Some(category) = update.category.as_deref().map(str::trim) {
            txn.category = if category.is_empty() {
                // the "Unknown" placeholder is not a merchant name
                let merchant = txn.merchant.as_deref().filter(|m| *m != UNKNOWN_MERCHANT);
                self.categorizer.categorize(merchant)
            } else {
                category.to_string()
            };
        }

        if let Some(notes) = update.notes {
            txn.notes = notes.trim().to_string();
        }

        if let Some(occurred_at) = update.occurred_at {
            txn.set_occurred_at(Some(occurred_at));
            if txn.period.is_none() {
                tracing::warn!(id = %txn.id, "transaction timestamp has no period; it will not appear in reports");
            }
        }

        if !self.repository.update_transaction(&txn)? {
            return Err(TrackerError::transaction_not_found(reference));
        }

        tracing::info!(
            id = %txn.id,
            kind = %txn.kind,
            category = %txn.category,
            amount = txn.amount.cents(),
            "transaction updated"
        );
        Ok(txn)
    }

    /// All of the owner's transactions, for handing to the report engine
    pub fn snapshot(&self, owner: &OwnerId) -> TrackerResult<Vec<Transaction>> {
        self.repository.list_transactions(owner)
    }

    /// Filtered transactions, most recent first; undated ones last
    pub fn list(&self, owner: &OwnerId, filter: &TransactionFilter) -> TrackerResult<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .snapshot(owner)?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();

        transactions.sort_by(|a, b| b.date.cmp(&a.date));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }

    /// Find one transaction by full uuid or short display id
    pub fn find(&self, owner: &OwnerId, reference: &str) -> TrackerResult<Transaction> {
        let reference = reference.trim();
        let mut matches = self
            .snapshot(owner)?
            .into_iter()
            .filter(|t| t.id.matches(reference));

        let found = matches
            .next()
            .ok_or_else(|| TrackerError::transaction_not_found(reference))?;
        if matches.next().is_some() {
            return Err(TrackerError::Validation(format!(
                "Transaction reference '{}' is ambiguous",
                reference
            )));
        }
        Ok(found)
    }

    pub fn remove(&self, owner: &OwnerId, reference: &str) -> TrackerResult<Transaction> {
        let txn = self.find(owner, reference)?;
        if !self.repository.remove_transaction(owner, txn.id)? {
            return Err(TrackerError::transaction_not_found(reference));
        }

        tracing::info!(id = %txn.id, "transaction removed");
        Ok(txn)
    }

    /// Categories in the order they were first used
    pub fn distinct_categories(&self, owner: &OwnerId) -> TrackerResult<Vec<String>> {
        Ok(distinct_categories(&self.snapshot(owner)?))
    }
}

/// Distinct category names in first-seen order
pub fn distinct_categories(transactions: &[Transaction]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    transactions
        .iter()
        .filter(|t| seen.insert(t.category.as_str()))
        .map(|t| t.category.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategorizationRule;
    use crate::storage::JsonStore;

    fn owner() -> OwnerId {
        OwnerId::new("user-1")
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed(service: &TransactionService) {
        service
            .add(
                &owner(),
                NewTransaction::expense(Money::from_cents(45_000), day(2024, 3, 2))
                    .with_merchant("Swiggy Order #123"),
            )
            .unwrap();
        service
            .add(
                &owner(),
                NewTransaction::income(Money::from_cents(5_000_000), day(2024, 3, 1))
                    .with_merchant("ACME salary credit"),
            )
            .unwrap();
        service
            .add(
                &owner(),
                NewTransaction::expense(Money::from_cents(120_000), day(2024, 4, 5))
                    .with_category("Rent")
                    .with_notes("April rent"),
            )
            .unwrap();
    }

    #[test]
    fn test_add_categorizes_from_merchant() {
        let store = JsonStore::in_memory();
        let service = TransactionService::new(&store, Categorizer::default());

        let txn = service
            .add(
                &owner(),
                NewTransaction::expense(Money::from_cents(30_000), day(2024, 3, 10))
                    .with_merchant("  Uber trip  "),
            )
            .unwrap();
        assert_eq!(txn.category, "Travel");
        assert_eq!(txn.merchant.as_deref(), Some("Uber trip"));
        assert_eq!(txn.period, Some(Period::new(2024, 3).unwrap()));
    }

    #[test]
    fn test_add_without_merchant() {
        let store = JsonStore::in_memory();
        let service = TransactionService::new(&store, Categorizer::default());

        let txn = service
            .add(&owner(), NewTransaction::expense(Money::from_cents(100), day(2024, 3, 10)))
            .unwrap();
        assert_eq!(txn.category, "Others");
        assert_eq!(txn.merchant_label(), "Unknown");
    }

    #[test]
    fn test_blank_merchant_skips_rules() {
        let store = JsonStore::in_memory();
        let rules = vec![CategorizationRule::new("know", "Education")];
        let service = TransactionService::new(&store, Categorizer::new(rules));

        let txn = service
            .add(
                &owner(),
                NewTransaction::expense(Money::from_cents(100), day(2024, 3, 1)).with_merchant("   "),
            )
            .unwrap();
        assert_eq!(txn.category, "Others");
        assert_eq!(txn.merchant.as_deref(), Some("Unknown"));

        let untouched = service
            .add(&owner(), NewTransaction::expense(Money::from_cents(100), day(2024, 3, 1)))
            .unwrap();
        assert_eq!(untouched.category, "Others");

        // re-deriving the category later must not match the placeholder either
        let edited = service
            .update(&owner(), &untouched.id.to_string(), TransactionUpdate::new().category(""))
            .unwrap();
        assert_eq!(edited.category, "Others");
    }

    #[test]
    fn test_update_moves_period_and_persists() {
        let store = JsonStore::in_memory();
        let service = TransactionService::new(&store, Categorizer::default());
        seed(&service);
        let swiggy = service
            .list(&owner(), &TransactionFilter::new().category("Food"))
            .unwrap()
            .remove(0);

        let edited = service
            .update(
                &owner(),
                &swiggy.id.to_string(),
                TransactionUpdate::new()
                    .amount(Money::from_cents(60_000))
                    .merchant("  Zomato  ")
                    .notes("team lunch")
                    .date(day(2024, 4, 20)),
            )
            .unwrap();

        assert_eq!(edited.id, swiggy.id);
        assert_eq!(edited.created_at, swiggy.created_at);
        assert_eq!(edited.amount, Money::from_cents(60_000));
        assert_eq!(edited.merchant.as_deref(), Some("Zomato"));
        assert_eq!(edited.notes, "team lunch");
        // category is kept unless asked for
        assert_eq!(edited.category, "Food");
        assert_eq!(edited.period, Some(Period::new(2024, 4).unwrap()));
        assert_eq!(edited.day(), Some(day(2024, 4, 20)));

        let march = TransactionFilter::new().period(Period::new(2024, 3).unwrap());
        assert_eq!(service.list(&owner(), &march).unwrap().len(), 1);
        let stored = service.find(&owner(), &swiggy.id.to_string()).unwrap();
        assert_eq!(stored, edited);
        assert_eq!(service.snapshot(&owner()).unwrap().len(), 3);
    }

    #[test]
    fn test_update_kind_and_categories() {
        let store = JsonStore::in_memory();
        let service = TransactionService::new(&store, Categorizer::default());
        let txn = service
            .add(
                &owner(),
                NewTransaction::expense(Money::from_cents(100), day(2024, 3, 1)).with_merchant("Uber"),
            )
            .unwrap();
        let id = txn.id.to_string();

        let edited = service
            .update(&owner(), &id, TransactionUpdate::new().kind(TransactionKind::Income).category(" Refund "))
            .unwrap();
        assert_eq!(edited.kind, TransactionKind::Income);
        assert_eq!(edited.category, "Refund");

        let recategorized = service
            .update(&owner(), &id, TransactionUpdate::new().merchant("Netflix").category(""))
            .unwrap();
        assert_eq!(recategorized.category, "Entertainment");
    }

    #[test]
    fn test_update_validation() {
        let store = JsonStore::in_memory();
        let service = TransactionService::new(&store, Categorizer::default());
        let txn = service
            .add(&owner(), NewTransaction::expense(Money::from_cents(100), day(2024, 3, 1)))
            .unwrap();
        let id = txn.id.to_string();

        assert!(service
            .update(&owner(), &id, TransactionUpdate::new().amount(Money::zero()))
            .unwrap_err()
            .is_validation());
        assert!(service
            .update(&owner(), &id, TransactionUpdate::new())
            .unwrap_err()
            .is_validation());
        assert!(service
            .update(&OwnerId::new("user-2"), &id, TransactionUpdate::new().notes("x"))
            .unwrap_err()
            .is_not_found());

        // a rejected edit leaves the record alone
        assert_eq!(service.find(&owner(), &id).unwrap(), txn);
    }

    #[test]
    fn test_add_rejects_non_positive_amount() {
        let store = JsonStore::in_memory();
        let service = TransactionService::new(&store, Categorizer::default());

        let err = service
            .add(&owner(), NewTransaction::expense(Money::zero(), day(2024, 3, 10)))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(service.snapshot(&owner()).unwrap().is_empty());
    }

    #[test]
    fn test_list_filters() {
        let store = JsonStore::in_memory();
        let service = TransactionService::new(&store, Categorizer::default());
        seed(&service);

        let march = TransactionFilter::new().period(Period::new(2024, 3).unwrap());
        assert_eq!(service.list(&owner(), &march).unwrap().len(), 2);

        let expenses = TransactionFilter::new().kind(TransactionKind::Expense);
        let listed = service.list(&owner(), &expenses).unwrap();
        assert_eq!(listed.len(), 2);
        // most recent first
        assert_eq!(listed[0].category, "Rent");

        let food = TransactionFilter::new().category("food");
        assert_eq!(service.list(&owner(), &food).unwrap().len(), 1);

        let by_day = TransactionFilter::new().date(day(2024, 3, 1));
        assert_eq!(service.list(&owner(), &by_day).unwrap()[0].category, "Salary");

        let notes = TransactionFilter::new().search("APRIL");
        assert_eq!(service.list(&owner(), &notes).unwrap().len(), 1);

        let limited = TransactionFilter::new().limit(1);
        assert_eq!(service.list(&owner(), &limited).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_by_short_id() {
        let store = JsonStore::in_memory();
        let service = TransactionService::new(&store, Categorizer::default());
        seed(&service);

        let target = service.snapshot(&owner()).unwrap()[0].clone();
        let removed = service.remove(&owner(), &target.id.to_string()).unwrap();
        assert_eq!(removed.id, target.id);
        assert_eq!(service.snapshot(&owner()).unwrap().len(), 2);

        let err = service.remove(&owner(), &target.id.to_string()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_distinct_categories_first_seen() {
        let store = JsonStore::in_memory();
        let service = TransactionService::new(&store, Categorizer::default());
        seed(&service);
        service
            .add(
                &owner(),
                NewTransaction::expense(Money::from_cents(100), day(2024, 4, 6))
                    .with_merchant("zomato"),
            )
            .unwrap();

        assert_eq!(
            service.distinct_categories(&owner()).unwrap(),
            vec!["Food", "Salary", "Rent"]
        );
    }
}
