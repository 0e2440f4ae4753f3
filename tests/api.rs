use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Local};
use serde_json::Value;
use std::fs::{create_dir_all, write};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use transaction_summary::{create_router, SummaryConfig, SummaryEngine};

fn setup_app() -> Result<(TempDir, Router)> {
    let dir = tempfile::tempdir()?;
    let config = SummaryConfig::from_data_dir(dir.path());
    create_dir_all(&config.transactions_dir)?;
    create_dir_all(dir.path().join("products"))?;

    write(
        &config.product_file,
        "productId,productName,productManufacturingCity\n\
         10,P10,Singapore\n\
         20,P20,Kuala Lumpur\n",
    )?;

    let recent = (Local::now().naive_local() - Duration::hours(2))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    write(
        config.transactions_dir.join("transactions_1.csv"),
        format!(
            "transactionId,transactionAmount,transactionDatetime,productId\n\
             1,100.5,{recent},10\n\
             2,49.5,{recent},20\n\
             3,1000,2001-01-01 00:00:00,10\n"
        ),
    )?;
    write(
        config.transactions_dir.join("transactions_2.csv"),
        format!(
            "transactionId,transactionAmount,transactionDatetime,productId\n\
             4,25,{recent},10\n\
             5,5,{recent},99\n"
        ),
    )?;
    write(config.transactions_dir.join("readme.txt"), "not a transaction file")?;

    let app = create_router(Arc::new(SummaryEngine::new(config)));
    Ok((dir, app))
}

async fn get(app: &Router, uri: &str) -> Result<(StatusCode, Value)> {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

fn total_for(json: &Value, key: &str, name: &str) -> Option<f64> {
    json["summary"]
        .as_array()?
        .iter()
        .find(|entry| entry[key] == name)
        .and_then(|entry| entry["totalAmount"].as_f64())
}

#[tokio::test]
async fn test_transaction_detail() -> Result<()> {
    let (_dir, app) = setup_app()?;

    let (status, json) = get(&app, "/assignment/transaction/3").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["transactionId"], 3);
    assert_eq!(json["transactionAmount"], 1000.0);
    assert_eq!(json["transactionDatetime"], "2001-01-01 00:00:00");
    assert_eq!(json["productName"], "P10");

    let (status, json) = get(&app, "/assignment/transaction/5").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["productName"], "");

    Ok(())
}

#[tokio::test]
async fn test_transaction_not_found() -> Result<()> {
    let (_dir, app) = setup_app()?;

    let (status, json) = get(&app, "/assignment/transaction/42").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Transaction not found");

    Ok(())
}

#[tokio::test]
async fn test_summary_by_products() -> Result<()> {
    let (_dir, app) = setup_app()?;

    let (status, json) = get(&app, "/assignment/transactionSummaryByProducts/1").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"].as_array().map(Vec::len), Some(3));
    assert_eq!(total_for(&json, "productName", "P10"), Some(125.5));
    assert_eq!(total_for(&json, "productName", "P20"), Some(49.5));
    assert_eq!(total_for(&json, "productName", ""), Some(5.0));

    let (status, json) = get(&app, "/assignment/transactionSummaryByProducts/100000").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(total_for(&json, "productName", "P10"), Some(1125.5));

    Ok(())
}

#[tokio::test]
async fn test_summary_by_city() -> Result<()> {
    let (_dir, app) = setup_app()?;

    let (status, json) = get(&app, "/assignment/transactionSummaryByManufacturingCity/7").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(total_for(&json, "cityName", "Singapore"), Some(125.5));
    assert_eq!(total_for(&json, "cityName", "Kuala Lumpur"), Some(49.5));
    assert_eq!(total_for(&json, "cityName", ""), Some(5.0));

    let (status, json) = get(&app, "/assignment/transactionSummaryByManufacturingCity/0").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"], Value::Array(Vec::new()));

    Ok(())
}

#[tokio::test]
async fn test_missing_reference_returns_empty_object() -> Result<()> {
    let (dir, app) = setup_app()?;
    std::fs::remove_file(dir.path().join("products").join("ProductReference.csv"))?;

    let (status, json) = get(&app, "/assignment/transactionSummaryByProducts/7").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({}));

    let (status, json) = get(&app, "/assignment/transaction/1").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({}));

    Ok(())
}

#[tokio::test]
async fn test_overflowing_total_returns_empty_object() -> Result<()> {
    let (dir, app) = setup_app()?;
    let recent = (Local::now().naive_local() - Duration::hours(2))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    write(
        dir.path().join("transactions").join("transactions_3.csv"),
        format!(
            "transactionId,transactionAmount,transactionDatetime,productId\n\
             6,50000000000000000000000000000,{recent},10\n\
             7,50000000000000000000000000000,{recent},10\n"
        ),
    )?;

    let (status, json) = get(&app, "/assignment/transactionSummaryByProducts/7").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({}));

    Ok(())
}

#[tokio::test]
async fn test_non_integer_path_is_rejected() -> Result<()> {
    let (_dir, app) = setup_app()?;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/assignment/transactionSummaryByProducts/-1")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
