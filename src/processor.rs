use crate::error::{RowError, ScanError};
use crate::models::{
    missing_column, Transaction, TransactionDetail, TransactionRow, TRANSACTION_COLUMNS,
};
use crate::reference::{GroupBy, ProductCatalog};
use crate::window::TimeWindow;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

/// Rollup partial: join key -> summed amount
pub type RollupPartial = HashMap<String, Decimal>;

/// Detail partial: transaction id -> joined record
pub type DetailPartial = HashMap<u64, TransactionDetail>;

/// Row counters collected while scanning one file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub rows_admitted: usize,
}

impl ScanStats {
    pub fn absorb(&mut self, other: ScanStats) {
        self.rows_read += other.rows_read;
        self.rows_skipped += other.rows_skipped;
        self.rows_admitted += other.rows_admitted;
    }
}

/// Result of scanning a single transaction file
#[derive(Debug, Clone)]
pub struct Partial<T> {
    pub groups: T,
    pub stats: ScanStats,
}

/// Scan a file into transaction details keyed by id.
///
/// No time window applies and the timestamp is kept as written.
pub fn scan_details(
    path: &Path,
    catalog: &ProductCatalog,
) -> Result<Partial<DetailPartial>, ScanError> {
    let mut groups = DetailPartial::new();

    let stats = scan_file(path, |row| {
        let product_name = catalog.product_name(row.product_id);
        let detail = TransactionDetail::from_row(row, product_name)?;
        groups.insert(detail.transaction_id, detail);
        Ok(true)
    })?;

    Ok(Partial { groups, stats })
}

/// Scan a file into amounts summed per join key, keeping only rows inside `window`.
///
/// A total that no longer fits in a `Decimal` fails the scan with
/// `ScanError::AmountOverflow`.
pub fn scan_rollup(
    path: &Path,
    catalog: &ProductCatalog,
    group_by: GroupBy,
    window: TimeWindow,
) -> Result<Partial<RollupPartial>, ScanError> {
    let mut groups = RollupPartial::new();

    let stats = scan_file(path, |row| {
        let transaction = Transaction::try_from(row)?;
        if !window.contains(&transaction.datetime) {
            return Ok(false);
        }

        let key = group_by.key(catalog, transaction.product_id);
        match groups.get_mut(key) {
            Some(total) => {
                *total = total
                    .checked_add(transaction.amount)
                    .ok_or_else(|| ScanError::AmountOverflow { key: key.to_string() })?;
            }
            None => {
                groups.insert(key.to_string(), transaction.amount);
            }
        }
        Ok(true)
    })?;

    Ok(Partial { groups, stats })
}

/// Read every row of a transaction file, handing each row to `visit`.
///
/// `visit` returns whether the row was admitted. Malformed rows, including
/// `ScanError::Row` faults raised by `visit`, are logged and skipped; any
/// other error ends the scan.
fn scan_file<F>(path: &Path, mut visit: F) -> Result<ScanStats, ScanError>
where
    F: FnMut(TransactionRow) -> Result<bool, ScanError>,
{
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(BufReader::new(file));

    let headers = reader.headers()?.clone();
    if let Some(column) = missing_column(&headers, &TRANSACTION_COLUMNS) {
        return Err(ScanError::MissingColumn(column));
    }

    let mut stats = ScanStats::default();
    let mut record = StringRecord::new();

    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                stats.rows_read += 1;
                stats.rows_skipped += 1;
                warn!("Skipping malformed row in {:?}: {}", path, e);
                continue;
            }
        }

        stats.rows_read += 1;

        let outcome = record
            .deserialize::<TransactionRow>(Some(&headers))
            .map_err(|e| ScanError::Row(RowError::from(e)))
            .and_then(&mut visit);

        match outcome {
            Ok(true) => stats.rows_admitted += 1,
            Ok(false) => {}
            Err(ScanError::Row(e)) => {
                stats.rows_skipped += 1;
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                warn!("Skipping row on line {} of {:?}: {}", line, path, e);
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        "Scanned {:?}: {} rows, {} admitted, {} skipped",
        path, stats.rows_read, stats.rows_admitted, stats.rows_skipped
    );

    Ok(stats)
}
