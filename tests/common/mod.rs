#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use stock_fx_etl::config::{FrankfurterConfig, PolygonConfig};
use stock_fx_etl::fetchers::base::{HttpReply, JsonHttpClient};
use stock_fx_etl::{Config, EtlError, Result};

pub const POLYGON: &str = "https://polygon.test/v1/open-close";
pub const FRANKFURTER: &str = "https://frankfurter.test";
pub const API_KEY: &str = "test-key";

static DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

enum Scripted {
    Json(Value),
    NotFound,
    Status(u16),
}

/// Replays canned responses by exact URL; unscripted URLs fail with HTTP 500.
#[derive(Default)]
pub struct ScriptedClient {
    replies: HashMap<String, Scripted>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, url: String, json: Value) -> Self {
        self.replies.insert(url, Scripted::Json(json));
        self
    }

    pub fn not_found(mut self, url: String) -> Self {
        self.replies.insert(url, Scripted::NotFound);
        self
    }

    pub fn status(mut self, url: String, status: u16) -> Self {
        self.replies.insert(url, Scripted::Status(status));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl JsonHttpClient for ScriptedClient {
    async fn get_json(&self, api: &str, url: &str) -> Result<HttpReply> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.replies.get(url) {
            Some(Scripted::Json(json)) => Ok(HttpReply::Json(json.clone())),
            Some(Scripted::NotFound) => Ok(HttpReply::NotFound),
            Some(Scripted::Status(status)) => Err(EtlError::HttpStatus {
                api: api.to_string(),
                status: *status,
            }),
            None => Err(EtlError::HttpStatus {
                api: api.to_string(),
                status: 500,
            }),
        }
    }
}

pub fn test_config(tickers: &[&str]) -> Config {
    Config::new(
        PolygonConfig {
            base_url: POLYGON.to_string(),
            api_key: Some(API_KEY.to_string()),
            stock_ticker_names: tickers.iter().map(|t| t.to_string()).collect(),
        },
        FrankfurterConfig {
            base_url: FRANKFURTER.to_string(),
            base_currency: "USD".to_string(),
        },
    )
}

pub fn polygon_url(ticker: &str, date: &str) -> String {
    format!("{POLYGON}/{ticker}/{date}?adjusted=true&apiKey={API_KEY}")
}

pub fn frankfurter_url(date: &str) -> String {
    format!("{FRANKFURTER}/{date}?from=USD")
}

pub fn d(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
}

pub fn temp_dir(label: &str) -> PathBuf {
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("stock_fx_etl_{label}_{}_{id}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
