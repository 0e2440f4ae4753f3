use crate::error::SummaryError;
use crate::models::{missing_column, ProductRow, PRODUCT_COLUMNS};
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Attribute a rollup groups transactions by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Product,
    City,
}

impl GroupBy {
    /// Join key for a product id; empty when the product is unknown.
    pub fn key<'a>(self, catalog: &'a ProductCatalog, product_id: u64) -> &'a str {
        match self {
            GroupBy::Product => catalog.product_name(product_id),
            GroupBy::City => catalog.city(product_id),
        }
    }
}

/// Product reference data indexed by product id
#[derive(Debug, Default, Clone)]
pub struct ProductCatalog {
    names: HashMap<u64, String>,
    cities: HashMap<u64, String>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the reference file. Any unreadable or malformed row fails the whole load.
    pub fn load(path: &Path) -> Result<Self, SummaryError> {
        let unavailable = |source| SummaryError::ReferenceUnavailable {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(path)
            .map_err(unavailable)?;

        let headers = reader.headers().map_err(unavailable)?.clone();
        if let Some(column) = missing_column(&headers, &PRODUCT_COLUMNS) {
            return Err(SummaryError::ReferenceColumnMissing {
                path: path.to_path_buf(),
                column,
            });
        }

        let mut catalog = Self::new();
        for result in reader.deserialize::<ProductRow>() {
            catalog.insert(result.map_err(unavailable)?);
        }

        debug!("Loaded {} products from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn insert(&mut self, row: ProductRow) {
        self.names.insert(row.product_id, row.product_name);
        self.cities.insert(row.product_id, row.product_manufacturing_city);
    }

    pub fn product_name(&self, product_id: u64) -> &str {
        self.names.get(&product_id).map(String::as_str).unwrap_or("")
    }

    pub fn city(&self, product_id: u64) -> &str {
        self.cities.get(&product_id).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
