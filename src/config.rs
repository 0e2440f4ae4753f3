use std::path::{Path, PathBuf};

pub const DEFAULT_TRANSACTIONS_DIR: &str = "transactions";
pub const DEFAULT_PRODUCT_FILE: &str = "products/ProductReference.csv";
pub const DEFAULT_EXTENSION: &str = "csv";

/// Locations of the source files read on every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryConfig {
    /// Directory holding the transaction files
    pub transactions_dir: PathBuf,
    /// Product reference file
    pub product_file: PathBuf,
    /// File extensions recognized as transaction files
    pub extensions: Vec<String>,
}

impl SummaryConfig {
    pub fn new(transactions_dir: impl Into<PathBuf>, product_file: impl Into<PathBuf>) -> Self {
        Self {
            transactions_dir: transactions_dir.into(),
            product_file: product_file.into(),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
        }
    }

    /// Standard layout under a data directory:
    /// `transactions/*.csv` and `products/ProductReference.csv`.
    pub fn from_data_dir(data_dir: &Path) -> Self {
        Self::new(
            data_dir.join(DEFAULT_TRANSACTIONS_DIR),
            data_dir.join(DEFAULT_PRODUCT_FILE),
        )
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        if !extensions.is_empty() {
            self.extensions = extensions;
        }
        self
    }
}
