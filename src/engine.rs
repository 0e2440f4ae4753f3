use crate::config::SummaryConfig;
use crate::discovery::discover_transaction_files;
use crate::error::{ScanError, SummaryError};
use crate::models::TransactionDetail;
use crate::processor::{
    scan_details, scan_rollup, DetailPartial, Partial, RollupPartial, ScanStats,
};
use crate::reference::{GroupBy, ProductCatalog};
use crate::summary::{build_summary, CityTotal, ProductTotal, Rollup, Summary};
use crate::window::TimeWindow;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tracing::{debug, error, info, warn};

/// Runs the ingest-join-aggregate pipeline over the configured files.
///
/// Nothing is cached: every call reloads the reference file and rescans
/// every transaction file.
#[derive(Debug, Clone)]
pub struct SummaryEngine {
    config: SummaryConfig,
}

impl SummaryEngine {
    pub fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// All transactions keyed by id, each joined with its product name
    pub async fn transaction_details(&self) -> Result<DetailPartial, SummaryError> {
        let (catalog, files) = self.prepare().await?;

        let partials = fan_out(files, move |path| scan_details(path, &catalog)).await?;

        Ok(merge_details(partials.into_iter().map(|p| p.groups)))
    }

    /// Look up a single transaction by id
    pub async fn find_transaction(
        &self,
        transaction_id: u64,
    ) -> Result<Option<TransactionDetail>, SummaryError> {
        let mut details = self.transaction_details().await?;
        Ok(details.remove(&transaction_id))
    }

    /// Total amount per join key over all rows inside `window`
    pub async fn rollup(
        &self,
        group_by: GroupBy,
        window: TimeWindow,
    ) -> Result<Rollup, SummaryError> {
        let (catalog, files) = self.prepare().await?;
        debug!("Rolling up by {:?} from {}", group_by, window.cutoff());

        let partials = fan_out(files, move |path| {
            scan_rollup(path, &catalog, group_by, window)
        })
        .await?;

        merge_rollups(partials.into_iter().map(|p| p.groups))
    }

    pub async fn product_summary(
        &self,
        last_n_days: u32,
    ) -> Result<Summary<ProductTotal>, SummaryError> {
        let window = TimeWindow::last_n_days_from_now(last_n_days);
        let rollup = self.rollup(GroupBy::Product, window).await?;
        Ok(build_summary(rollup))
    }

    pub async fn city_summary(&self, last_n_days: u32) -> Result<Summary<CityTotal>, SummaryError> {
        let window = TimeWindow::last_n_days_from_now(last_n_days);
        let rollup = self.rollup(GroupBy::City, window).await?;
        Ok(build_summary(rollup))
    }

    /// Load the product catalog and list transaction files.
    async fn prepare(&self) -> Result<(Arc<ProductCatalog>, Vec<PathBuf>), SummaryError> {
        let config = self.config.clone();

        let (catalog, files) = spawn_blocking(move || -> Result<_, SummaryError> {
            let catalog = ProductCatalog::load(&config.product_file)?;
            let files = discover_transaction_files(&config.transactions_dir, &config.extensions)?;
            Ok((catalog, files))
        })
        .await??;

        info!(
            "Loaded {} products, discovered {} transaction files",
            catalog.len(),
            files.len()
        );

        Ok((Arc::new(catalog), files))
    }
}

/// Scan every file on the blocking pool and wait for all of them.
///
/// Partials come back in `files` order. A file whose scan fails, or whose
/// task panics, contributes nothing. An amount overflow fails the request,
/// since the merged total for that key cannot be represented either.
async fn fan_out<T, F>(files: Vec<PathBuf>, scan: F) -> Result<Vec<Partial<T>>, SummaryError>
where
    T: Send + 'static,
    F: Fn(&Path) -> Result<Partial<T>, ScanError> + Send + Sync + 'static,
{
    let scan = Arc::new(scan);
    let tasks = files.into_iter().map(|path| {
        let scan = Arc::clone(&scan);
        spawn_blocking(move || {
            let result = (*scan)(&path);
            (path, result)
        })
    });

    let mut partials = Vec::new();
    let mut failed = 0;
    let mut totals = ScanStats::default();

    for joined in join_all(tasks).await {
        match joined {
            Ok((_, Ok(partial))) => {
                totals.absorb(partial.stats);
                partials.push(partial);
            }
            Ok((path, Err(ScanError::AmountOverflow { key }))) => {
                error!("Total for {:?} overflowed while scanning {:?}", key, path);
                return Err(SummaryError::AmountOverflow { key });
            }
            Ok((path, Err(e))) => {
                failed += 1;
                warn!("Skipping transaction file {:?}: {}", path, e);
            }
            Err(e) => {
                failed += 1;
                error!("Scanner task failed: {}", e);
            }
        }
    }

    info!(
        "Scanned {} files ({} failed): {} rows admitted, {} rows skipped",
        partials.len(),
        failed,
        totals.rows_admitted,
        totals.rows_skipped
    );

    Ok(partials)
}

/// Sum partial rollups key by key
///
/// # Errors
/// Returns `SummaryError::AmountOverflow` if a total exceeds `Decimal::MAX`.
pub fn merge_rollups<I>(partials: I) -> Result<Rollup, SummaryError>
where
    I: IntoIterator<Item = RollupPartial>,
{
    let mut merged = Rollup::new();
    for partial in partials {
        for (key, amount) in partial {
            match merged.get_mut(&key) {
                Some(total) => {
                    *total = total
                        .checked_add(amount)
                        .ok_or_else(|| SummaryError::AmountOverflow { key: key.clone() })?;
                }
                None => {
                    merged.insert(key, amount);
                }
            }
        }
    }
    Ok(merged)
}

/// Union of partial detail maps; on id collision the later partial wins
pub fn merge_details<I>(partials: I) -> DetailPartial
where
    I: IntoIterator<Item = DetailPartial>,
{
    let mut merged = DetailPartial::new();
    for partial in partials {
        for (transaction_id, detail) in partial {
            if merged.insert(transaction_id, detail).is_some() {
                warn!(
                    "Transaction {} appears in more than one file, keeping the later file's record",
                    transaction_id
                );
            }
        }
    }
    merged
}
