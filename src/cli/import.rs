//! CLI command for CSV import

use std::path::Path;

use crate::config::Settings;
use crate::display::format_import_preview;
use crate::error::TrackerResult;
use crate::models::OwnerId;
use crate::services::{ImportService, PREVIEW_ROWS};
use crate::storage::TransactionRepository;

pub fn handle_import_command(
    repository: &dyn TransactionRepository,
    settings: &Settings,
    owner: &OwnerId,
    file: &Path,
    dry_run: bool,
) -> TrackerResult<()> {
    let service = ImportService::new(repository, settings.categorizer());
    let entries = service.preview_file(owner, file)?;

    print!(
        "{}",
        format_import_preview(&entries, &settings.currency_symbol, PREVIEW_ROWS)
    );

    if dry_run {
        let ready = entries.iter().filter(|e| e.transaction().is_some()).count();
        println!(
            "Dry run: {} row(s) would be imported, {} skipped",
            ready,
            entries.len() - ready
        );
        return Ok(());
    }

    let result = service.commit(&entries)?;
    println!("Imported {} transaction(s)", result.imported);
    if result.errors > 0 {
        println!("Skipped {} row(s):", result.errors);
        for (line, message) in &result.error_messages {
            println!("  line {}: {}", line, message);
        }
    }

    Ok(())
}
