use crate::config::PolygonConfig;
use crate::errors::Result;
use crate::fetchers::base::{HttpReply, JsonHttpClient};
use crate::models::stock::{DailyPayload, RawStockData};
use crate::util::{format_date, DateRange};
use chrono::NaiveDate;
use log::{error, info, warn};
use std::sync::Arc;

pub const API_NAME: &str = "Polygon.io";

/// Polygon.io 日线 (open-close) 抓取器
pub struct PolygonFetcher {
    config: PolygonConfig,
    client: Arc<dyn JsonHttpClient + Send + Sync>,
}

impl PolygonFetcher {
    pub fn new(config: PolygonConfig, client: Arc<dyn JsonHttpClient + Send + Sync>) -> Self {
        Self { config, client }
    }

    pub fn tickers(&self) -> &[String] {
        &self.config.stock_ticker_names
    }

    pub fn daily_url(&self, ticker: &str, date: &NaiveDate) -> String {
        format!(
            "{}/{}/{}?adjusted=true&apiKey={}",
            self.config.base_url.trim_end_matches('/'),
            ticker,
            format_date(date),
            self.config.api_key.as_deref().unwrap_or_default()
        )
    }

    /// Fetch one (ticker, date) bar. A 404 is a gap day and becomes a zero-filled placeholder.
    pub async fn fetch_day(&self, ticker: &str, date: &NaiveDate) -> Result<DailyPayload> {
        let url = self.daily_url(ticker, date);
        match self.client.get_json(API_NAME, &url).await? {
            HttpReply::NotFound => {
                warn!("No data available for {} on {}.", ticker, date);
                Ok(DailyPayload::placeholder(ticker, *date))
            }
            HttpReply::Json(payload) => {
                info!("Data for {} on {} successfully retrieved.", ticker, date);
                Ok(DailyPayload::new(*date, payload))
            }
        }
    }

    /// 逐个 ticker、逐日请求；任一请求失败即中止
    pub async fn fetch_range(&self, dates: &[NaiveDate]) -> Result<RawStockData> {
        let mut all_data = RawStockData::new();

        for ticker in &self.config.stock_ticker_names {
            for date in dates {
                match self.fetch_day(ticker, date).await {
                    Ok(day) => all_data.push(ticker, day),
                    Err(e) => {
                        error!("Request for {} on {} failed, aborting {} fetch", ticker, date, API_NAME);
                        return Err(e);
                    }
                }
            }
        }

        Ok(all_data)
    }

    /// [`fetch_range`](Self::fetch_range) with failures logged and turned into `None`.
    pub async fn extract(&self, range: &DateRange) -> Option<RawStockData> {
        let dates = range.days();
        info!(
            "Fetching {} tickers x {} days from {}",
            self.config.stock_ticker_names.len(),
            dates.len(),
            API_NAME
        );

        match self.fetch_range(&dates).await {
            Ok(data) => Some(data),
            Err(e) => {
                error!("Error fetching data from {}: {}", API_NAME, e);
                None
            }
        }
    }
}
