//! CSV import service
//!
//! Reads files with `merchant,amount,date,type` headers (any order, any
//! case), previews each row with its auto-assigned category, and commits the
//! valid rows in one batch. A bad row never aborts the rest of the file.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    parse_iso_datetime, Money, MoneyParseError, OccurredAt, OwnerId, Transaction, TransactionId,
    TransactionKind, UNKNOWN_MERCHANT,
};
use crate::services::categorize::Categorizer;
use crate::storage::TransactionRepository;

/// Rows shown by an import preview
pub const PREVIEW_ROWS: usize = 10;

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y", "%d-%m-%Y",
];

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct ColumnMapping {
    merchant: Option<usize>,
    amount: usize,
    date: usize,
    kind: Option<usize>,
}

impl ColumnMapping {
    fn from_headers(headers: &StringRecord) -> TrackerResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| {
                TrackerError::Import(format!("CSV is missing required column '{}'", name))
            })
        };

        Ok(Self {
            merchant: find("merchant"),
            amount: required("amount")?,
            date: required("date")?,
            kind: find("type"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportStatus {
    /// Will be imported as this transaction
    Ready(Transaction),
    /// Cannot be imported
    Error(String),
}

/// One CSV row as it will be imported
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPreviewEntry {
    /// Line in the file, header included
    pub row_number: u64,
    pub merchant: String,
    pub raw_date: String,
    pub raw_amount: String,
    pub status: ImportStatus,
}

impl ImportPreviewEntry {
    pub fn transaction(&self) -> Option<&Transaction> {
        match &self.status {
            ImportStatus::Ready(txn) => Some(txn),
            ImportStatus::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ImportStatus::Ready(_) => None,
            ImportStatus::Error(message) => Some(message),
        }
    }
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: usize,
    pub imported_ids: Vec<TransactionId>,
    /// Error message by file line
    pub error_messages: BTreeMap<u64, String>,
}

pub struct ImportService<'a> {
    repository: &'a dyn TransactionRepository,
    categorizer: Categorizer,
}

impl<'a> ImportService<'a> {
    pub fn new(repository: &'a dyn TransactionRepository, categorizer: Categorizer) -> Self {
        Self {
            repository,
            categorizer,
        }
    }

    /// Parse every row of a CSV file
    pub fn preview_file(&self, owner: &OwnerId, path: &Path) -> TrackerResult<Vec<ImportPreviewEntry>> {
        let file = std::fs::File::open(path).map_err(|e| {
            TrackerError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.preview(owner, file)
    }

    /// Parse every row of CSV input
    ///
    /// Only a missing required column or unreadable header fails the whole
    /// input; everything else becomes a per-row error.
    pub fn preview<R: Read>(&self, owner: &OwnerId, input: R) -> TrackerResult<Vec<ImportPreviewEntry>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| TrackerError::Import(format!("Failed to read CSV header: {}", e)))?
            .clone();
        let mapping = ColumnMapping::from_headers(&headers)?;

        let mut entries = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            // header is line 1
            let fallback_line = idx as u64 + 2;
            let entry = match result {
                Ok(record) => {
                    let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);
                    self.parse_record(owner, &record, line, &mapping)
                }
                Err(e) => ImportPreviewEntry {
                    row_number: fallback_line,
                    merchant: String::new(),
                    raw_date: String::new(),
                    raw_amount: String::new(),
                    status: ImportStatus::Error(format!("Unreadable row: {}", e)),
                },
            };
            entries.push(entry);
        }

        tracing::debug!(rows = entries.len(), "csv parsed");
        Ok(entries)
    }

    fn parse_record(
        &self,
        owner: &OwnerId,
        record: &StringRecord,
        row_number: u64,
        mapping: &ColumnMapping,
    ) -> ImportPreviewEntry {
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").to_string();

        let raw_merchant = cell(mapping.merchant);
        let raw_date = cell(Some(mapping.date));
        let raw_amount = cell(Some(mapping.amount));
        let kind = TransactionKind::from_import(mapping.kind.and_then(|i| record.get(i)));

        let status = match self.build_transaction(owner, &raw_merchant, &raw_date, &raw_amount, kind) {
            Ok(txn) => ImportStatus::Ready(txn),
            Err(message) => ImportStatus::Error(message),
        };

        ImportPreviewEntry {
            row_number,
            merchant: merchant_label(&raw_merchant).to_string(),
            raw_date,
            raw_amount,
            status,
        }
    }

    fn build_transaction(
        &self,
        owner: &OwnerId,
        merchant: &str,
        raw_date: &str,
        raw_amount: &str,
        kind: TransactionKind,
    ) -> Result<Transaction, String> {
        let occurred_at =
            parse_import_date(raw_date).ok_or_else(|| format!("Could not parse date: '{}'", raw_date))?;

        let amount = Money::parse(raw_amount).map_err(|e| match e {
            MoneyParseError::InvalidFormat(_) => format!("Could not parse amount: '{}'", raw_amount),
            other => other.to_string(),
        })?;
        if !amount.is_positive() {
            return Err(format!("Amount must be positive: '{}'", raw_amount));
        }

        // A blank merchant goes to the fallback before any rule sees it
        let category = self.categorizer.categorize(Some(merchant));
        Ok(
            Transaction::with_occurred_at(owner.clone(), kind, amount, category, Some(occurred_at))
                .with_merchant(merchant_label(merchant)),
        )
    }

    /// Store every ready entry in one batch
    pub fn commit(&self, entries: &[ImportPreviewEntry]) -> TrackerResult<ImportResult> {
        let mut result = ImportResult::default();
        let mut ready = Vec::new();

        for entry in entries {
            match &entry.status {
                ImportStatus::Ready(txn) => ready.push(txn.clone()),
                ImportStatus::Error(message) => {
                    result.errors += 1;
                    result.error_messages.insert(entry.row_number, message.clone());
                }
            }
        }

        if !ready.is_empty() {
            self.repository.insert_transactions(&ready)?;
        }

        result.imported = ready.len();
        result.imported_ids = ready.iter().map(|t| t.id).collect();

        if result.errors > 0 {
            tracing::warn!(skipped = result.errors, "import skipped invalid rows");
        }
        tracing::info!(imported = result.imported, "import committed");
        Ok(result)
    }

    /// Preview and commit a file in one step
    pub fn import_file(&self, owner: &OwnerId, path: &Path) -> TrackerResult<ImportResult> {
        let entries = self.preview_file(owner, path)?;
        self.commit(&entries)
    }
}

fn merchant_label(raw: &str) -> &str {
    match raw.trim() {
        "" => UNKNOWN_MERCHANT,
        name => name,
    }
}

/// Parse an import date cell into a timestamp
///
/// ISO dates and datetimes are tried first and kept as the literal string,
/// so their period is the written year-month. Common day-based layouts
/// follow, with month-first winning over day-first.
pub fn parse_import_date(raw: &str) -> Option<OccurredAt> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if parse_iso_datetime(raw).is_some() {
        return Some(OccurredAt::IsoString(raw.to_string()));
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .map(OccurredAt::from_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategorizationRule, Period};
    use crate::storage::JsonStore;

    const SAMPLE: &str = "\
Merchant,Amount,Date,Type
Swiggy Order #1,450,2024-03-02,expense
Salary March,50000,2024-03-01,Income
,120.50,03/15/2024,
Netflix,abc,2024-03-04,expense
Uber,200,not-a-date,expense
Amazon,-99,2024-03-05,expense
";

    fn owner() -> OwnerId {
        OwnerId::new("user-1")
    }

    #[test]
    fn test_preview_rows() {
        let store = JsonStore::in_memory();
        let service = ImportService::new(&store, Categorizer::default());

        let entries = service.preview(&owner(), SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries.len(), 6);

        let swiggy = entries[0].transaction().unwrap();
        assert_eq!(swiggy.category, "Food");
        assert_eq!(swiggy.amount, Money::from_cents(45_000));
        assert_eq!(swiggy.period, Some(Period::new(2024, 3).unwrap()));
        assert_eq!(entries[0].row_number, 2);

        let salary = entries[1].transaction().unwrap();
        assert_eq!(salary.kind, TransactionKind::Income);
        assert_eq!(salary.category, "Salary");

        assert_eq!(entries[2].merchant, "Unknown");
        let unknown = entries[2].transaction().unwrap();
        assert_eq!(unknown.kind, TransactionKind::Expense);
        assert_eq!(unknown.category, "Others");
        assert_eq!(unknown.amount, Money::from_cents(12_050));

        assert!(entries[3].error().unwrap().contains("amount"));
        assert!(entries[4].error().unwrap().contains("date"));
        assert!(entries[5].error().unwrap().contains("positive"));
    }

    #[test]
    fn test_preview_does_not_store() {
        let store = JsonStore::in_memory();
        let service = ImportService::new(&store, Categorizer::default());
        service.preview(&owner(), SAMPLE.as_bytes()).unwrap();
        assert!(store.list_transactions(&owner()).unwrap().is_empty());
    }

    #[test]
    fn test_commit_stores_valid_rows() {
        let store = JsonStore::in_memory();
        let service = ImportService::new(&store, Categorizer::default());

        let entries = service.preview(&owner(), SAMPLE.as_bytes()).unwrap();
        let result = service.commit(&entries).unwrap();

        assert_eq!(result.imported, 3);
        assert_eq!(result.errors, 3);
        assert_eq!(result.imported_ids.len(), 3);
        assert_eq!(result.error_messages.keys().copied().collect::<Vec<_>>(), vec![5, 6, 7]);
        assert_eq!(store.list_transactions(&owner()).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_required_column() {
        let store = JsonStore::in_memory();
        let service = ImportService::new(&store, Categorizer::default());
        let err = service
            .preview(&owner(), "merchant,date\nSwiggy,2024-03-01\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, TrackerError::Import(_)));
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let store = JsonStore::in_memory();
        let service = ImportService::new(&store, Categorizer::default());
        let entries = service
            .preview(&owner(), "date,amount\n2024-01-31,10\n".as_bytes())
            .unwrap();
        let txn = entries[0].transaction().unwrap();
        assert_eq!(txn.merchant_label(), "Unknown");
        assert_eq!(txn.kind, TransactionKind::Expense);
        assert_eq!(txn.period, Some(Period::new(2024, 1).unwrap()));
    }

    #[test]
    fn test_parse_import_date_formats() {
        let jan_31 = Some(Period::new(2024, 1).unwrap());
        assert_eq!(parse_import_date("2024-01-31").and_then(|d| d.period()), jan_31);
        assert_eq!(parse_import_date("01/31/2024").and_then(|d| d.period()), jan_31);
        assert_eq!(parse_import_date("31/01/2024").and_then(|d| d.period()), jan_31);
        assert_eq!(
            parse_import_date("2024-01-31T18:00:00Z").and_then(|d| d.period()),
            jan_31
        );
        assert!(parse_import_date("").is_none());
        assert!(parse_import_date("yesterday").is_none());
    }

    #[test]
    fn test_offset_date_keeps_written_month() {
        let occurred_at = parse_import_date("2024-03-31T23:30:00-05:00").unwrap();
        assert_eq!(
            occurred_at,
            OccurredAt::IsoString("2024-03-31T23:30:00-05:00".into())
        );
        assert_eq!(occurred_at.period(), Some(Period::new(2024, 3).unwrap()));
    }

    #[test]
    fn test_blank_merchant_skips_rules() {
        let store = JsonStore::in_memory();
        let rules = vec![CategorizationRule::new("know", "Education")];
        let service = ImportService::new(&store, Categorizer::new(rules));

        let entries = service
            .preview(
                &owner(),
                "merchant,amount,date,type
,100,2024-03-01,expense
Knowledge Hub,50,2024-03-02,expense
"
                    .as_bytes(),
            )
            .unwrap();

        let blank = entries[0].transaction().unwrap();
        assert_eq!(blank.category, "Others");
        assert_eq!(blank.merchant_label(), "Unknown");
        assert_eq!(entries[0].merchant, "Unknown");

        assert_eq!(entries[1].transaction().unwrap().category, "Education");
    }

    #[test]
    fn test_oversized_amount_is_a_row_error() {
        let store = JsonStore::in_memory();
        let service = ImportService::new(&store, Categorizer::default());

        let entries = service
            .preview(
                &owner(),
                "merchant,amount,date
Whale,92233720368547759,2024-03-01
Coffee,10.999,2024-03-01
Tea,40,2024-03-01
"
                    .as_bytes(),
            )
            .unwrap();

        assert!(entries[0].error().unwrap().contains("too large"));
        assert!(entries[1].error().unwrap().contains("decimal places"));
        assert!(entries[2].transaction().is_some());

        let result = service.commit(&entries).unwrap();
        assert_eq!(result.imported, 1);
        assert_eq!(result.errors, 2);
    }
}
