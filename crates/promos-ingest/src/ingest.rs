//! Converts parsed records into persisted product and promotion rows.
//!
//! Each record is written in its own transaction. A record that fails to
//! decode, carries no discount, or hits a database error is logged and
//! skipped; the rest of the file still loads. There is no atomicity across
//! the whole file.

use chrono::{NaiveDate, Utc};
use promos_core::PromotionRecord;
use promos_db::PersistOutcome;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::error::{EntryError, IngestError};
use crate::parser::{resolve_extension, ParserRegistry, PromotionsParser};

/// Per-file ingestion counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Promotions written.
    pub loaded: usize,
    /// Products created while writing those promotions.
    pub products_created: usize,
    /// Entries that were logged and dropped.
    pub skipped: usize,
}

/// Selects a parser for the file and loads every entry in it.
///
/// # Errors
///
/// Returns [`IngestError::UnknownFileType`] or
/// [`IngestError::UnavailableParser`] when no parser fits, and
/// [`IngestError::Decode`] when the file as a whole is unreadable. In every
/// error case nothing has been written.
pub async fn load_promotions_file(
    pool: &SqlitePool,
    registry: &ParserRegistry,
    filename: Option<&str>,
    extension_override: Option<&str>,
    input: &[u8],
) -> Result<IngestSummary, IngestError> {
    let extension = resolve_extension(filename, extension_override)?;
    let parser = registry.get(extension)?;
    tracing::debug!(?filename, extension, "selected promotions parser");
    load_promotions(pool, parser, input).await
}

/// Parses `input` with `parser` and persists each entry.
///
/// # Errors
///
/// Returns [`IngestError::Decode`] when the parser rejects the whole input.
/// Per-entry failures are logged and counted in [`IngestSummary::skipped`].
pub async fn load_promotions(
    pool: &SqlitePool,
    parser: &dyn PromotionsParser,
    input: &[u8],
) -> Result<IngestSummary, IngestError> {
    let entries = parser.parse(input)?;
    let today = Utc::now().date_naive();
    let mut summary = IngestSummary::default();

    for entry in &entries {
        match load_entry(pool, entry, today).await {
            Ok(outcome) => {
                summary.loaded += 1;
                if outcome.product_created {
                    summary.products_created += 1;
                }
            }
            Err(error) => {
                summary.skipped += 1;
                tracing::warn!(%entry, %error, "couldn't load promotion for entry");
            }
        }
    }

    tracing::info!(
        entries = entries.len(),
        loaded = summary.loaded,
        products_created = summary.products_created,
        skipped = summary.skipped,
        "promotions file ingested"
    );
    Ok(summary)
}

async fn load_entry(
    pool: &SqlitePool,
    entry: &Value,
    today: NaiveDate,
) -> Result<PersistOutcome, EntryError> {
    let record = PromotionRecord::from_value(entry)?;
    if !record.has_valid_discount() {
        return Err(EntryError::NoDiscount);
    }
    Ok(promos_db::persist_record(pool, &record, today).await?)
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
