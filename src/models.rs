use crate::error::RowError;
use chrono::NaiveDateTime;
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Timestamp layout used by the transaction files
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const TRANSACTION_COLUMNS: [&str; 4] = [
    "transactionId",
    "transactionAmount",
    "transactionDatetime",
    "productId",
];

pub const PRODUCT_COLUMNS: [&str; 3] = ["productId", "productName", "productManufacturingCity"];

/// Returns the first required column absent from `headers`.
pub(crate) fn missing_column(
    headers: &StringRecord,
    required: &[&'static str],
) -> Option<&'static str> {
    required
        .iter()
        .find(|column| !headers.iter().any(|header| header == **column))
        .copied()
}

/// Parse an amount in plain (`1500.25`) or scientific (`1.5E+3`) notation.
pub fn parse_amount(value: &str) -> Result<Decimal, RowError> {
    Decimal::from_str(value)
        .or_else(|e| Decimal::from_scientific(value).map_err(|_| e))
        .map_err(|source| RowError::InvalidAmount {
            value: value.to_string(),
            source,
        })
}

/// Raw transaction row as it appears in a transaction file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRow {
    pub transaction_id: u64,
    pub transaction_amount: String,
    pub transaction_datetime: String,
    pub product_id: u64,
}

/// Parsed transaction record
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: u64,
    pub amount: Decimal,
    pub datetime: NaiveDateTime,
    pub product_id: u64,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = RowError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let amount = parse_amount(&row.transaction_amount)?;
        let datetime = NaiveDateTime::parse_from_str(&row.transaction_datetime, DATETIME_FORMAT)
            .map_err(|source| RowError::InvalidTimestamp {
                value: row.transaction_datetime.clone(),
                source,
            })?;

        Ok(Transaction {
            transaction_id: row.transaction_id,
            amount,
            datetime,
            product_id: row.product_id,
        })
    }
}

/// Transaction joined with its product name, as returned by the detail lookup.
///
/// The timestamp is echoed exactly as it appears in the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    pub transaction_id: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub transaction_amount: Decimal,
    pub transaction_datetime: String,
    pub product_name: String,
}

impl TransactionDetail {
    pub fn from_row(row: TransactionRow, product_name: &str) -> Result<Self, RowError> {
        Ok(Self {
            transaction_id: row.transaction_id,
            transaction_amount: parse_amount(&row.transaction_amount)?,
            transaction_datetime: row.transaction_datetime,
            product_name: product_name.to_string(),
        })
    }
}

/// Row of the product reference file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    pub product_id: u64,
    pub product_name: String,
    pub product_manufacturing_city: String,
}
