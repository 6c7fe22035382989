use crate::config::FrankfurterConfig;
use crate::errors::{EtlError, Result};
use crate::fetchers::base::{HttpReply, JsonHttpClient};
use crate::models::currency::ExchangeRateRow;
use crate::util::{decimal_from_json, format_date, DateRange};
use chrono::NaiveDate;
use log::{debug, error, info};
use std::sync::Arc;

pub const API_NAME: &str = "Frankfurter";

/// Frankfurter 汇率抓取器
pub struct FrankfurterFetcher {
    config: FrankfurterConfig,
    client: Arc<dyn JsonHttpClient + Send + Sync>,
}

impl FrankfurterFetcher {
    pub fn new(config: FrankfurterConfig, client: Arc<dyn JsonHttpClient + Send + Sync>) -> Self {
        Self { config, client }
    }

    pub fn base_currency(&self) -> &str {
        &self.config.base_currency
    }

    pub fn rates_url(&self, date: &NaiveDate) -> String {
        format!(
            "{}/{}?from={}",
            self.config.base_url.trim_end_matches('/'),
            format_date(date),
            self.config.base_currency
        )
    }

    /// 获取某日全部汇率，每个币种一行
    pub async fn fetch_rates_for(&self, date: &NaiveDate) -> Result<Vec<ExchangeRateRow>> {
        let url = self.rates_url(date);
        let json = match self.client.get_json(API_NAME, &url).await? {
            HttpReply::Json(json) => json,
            // 汇率接口没有“无数据日”的约定，404 视为失败
            HttpReply::NotFound => {
                return Err(EtlError::HttpStatus {
                    api: API_NAME.to_string(),
                    status: 404,
                })
            }
        };

        let rates = json
            .get("rates")
            .and_then(|r| r.as_object())
            .ok_or_else(|| EtlError::DataError(format!("No rates in {} response for {}", API_NAME, date)))?;

        let mut rows = Vec::with_capacity(rates.len());
        for (currency, rate) in rates {
            let exchange_rate = decimal_from_json(rate).ok_or_else(|| {
                EtlError::DataError(format!("Invalid rate for {} on {}: {}", currency, date, rate))
            })?;
            rows.push(ExchangeRateRow {
                currency: currency.clone(),
                exchange_rate,
                date: *date,
            });
        }

        debug!("{} rates against {} on {}", rows.len(), self.config.base_currency, date);
        Ok(rows)
    }

    /// Rates for every date of the range, concatenated in date order.
    pub async fn fetch_range(&self, dates: &[NaiveDate]) -> Result<Vec<ExchangeRateRow>> {
        let mut result = Vec::new();
        for date in dates {
            let rows = match self.fetch_rates_for(date).await {
                Ok(rows) => rows,
                Err(e) => {
                    error!("Rates request for {} failed, aborting {} fetch", date, API_NAME);
                    return Err(e);
                }
            };
            info!("{} exchange rate data for {} successfully retrieved.", API_NAME, date);
            result.extend(rows);
        }
        Ok(result)
    }

    pub async fn extract(&self, range: &DateRange) -> Option<Vec<ExchangeRateRow>> {
        let dates = range.days();
        info!(
            "Fetching {} days of {} rates from {}",
            dates.len(),
            self.config.base_currency,
            API_NAME
        );

        match self.fetch_range(&dates).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                error!("Error fetching data from {} API: {}", API_NAME, e);
                None
            }
        }
    }
}
