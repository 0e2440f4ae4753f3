use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Merged rollup: join key -> total amount across all files
pub type Rollup = BTreeMap<String, Decimal>;

/// Response body of the rollup endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary<T> {
    pub summary: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTotal {
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityTotal {
    pub city_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

impl From<(String, Decimal)> for ProductTotal {
    fn from((product_name, total_amount): (String, Decimal)) -> Self {
        Self { product_name, total_amount }
    }
}

impl From<(String, Decimal)> for CityTotal {
    fn from((city_name, total_amount): (String, Decimal)) -> Self {
        Self { city_name, total_amount }
    }
}

/// One entry per distinct key, in the rollup's key order.
pub fn build_summary<T: From<(String, Decimal)>>(rollup: Rollup) -> Summary<T> {
    Summary {
        summary: rollup.into_iter().map(T::from).collect(),
    }
}
