use crate::config::Config;
use crate::errors::Result;
use crate::fetchers::base::JsonHttpClient;
use crate::fetchers::frankfurter::FrankfurterFetcher;
use crate::fetchers::polygon::PolygonFetcher;
use crate::models::currency::CurrencyTable;
use crate::models::joined::JoinedTable;
use crate::models::stock::{RawStockData, StockTable};
use crate::services::cleaning::{clean_currency_data, clean_stock_data};
use crate::services::join::join_data;
use crate::sink::StagingSink;
use crate::util::DateRange;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

/// 一次运行各阶段的产物，失败或跳过的阶段为 None
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub raw_stocks: Option<RawStockData>,
    pub stocks: Option<StockTable>,
    pub currency: Option<CurrencyTable>,
    pub joined: Option<JoinedTable>,
}

/// 数据服务：抓取、清洗、连接
pub struct EtlService {
    config: Config,
    polygon: PolygonFetcher,
    frankfurter: FrankfurterFetcher,
}

impl EtlService {
    pub fn new(config: Config, client: Arc<dyn JsonHttpClient + Send + Sync>) -> Self {
        let polygon = PolygonFetcher::new(config.polygon.clone(), client.clone());
        let frankfurter = FrankfurterFetcher::new(config.frankfurter.clone(), client);
        Self {
            config,
            polygon,
            frankfurter,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract, clean and join.
    ///
    /// A failed extract is logged and leaves its stage (and the join) empty;
    /// cleaning errors abort the run.
    pub async fn run(&self, stock_range: &DateRange, currency_range: &DateRange) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();

        info!("Extracting data from Polygon.io Stock API...");
        report.raw_stocks = self.polygon.extract(stock_range).await;
        match report.raw_stocks.as_ref() {
            Some(raw) if !raw.is_empty() => {
                report.stocks = Some(clean_stock_data(Some(raw))?);
            }
            _ => warn!("No stock data retrieved for {} to {}", stock_range.start, stock_range.end),
        }

        info!("Extracting data from Frankfurter Currency API...");
        match self.frankfurter.extract(currency_range).await {
            Some(rows) if !rows.is_empty() => {
                report.currency = Some(clean_currency_data(Some(rows.as_slice()))?);
            }
            _ => warn!(
                "No exchange rates retrieved for {} to {}",
                currency_range.start, currency_range.end
            ),
        }

        match (report.stocks.as_ref(), report.currency.as_ref()) {
            (Some(stocks), Some(currency)) => {
                let joined = join_data(stocks, currency);
                info!("Joined table has {} rows", joined.len());
                report.joined = Some(joined);
            }
            _ => warn!("Skipping join: stock or currency data missing"),
        }

        Ok(report)
    }

    /// 暂存连接结果并执行收尾脚本
    pub fn load(&self, joined: &JoinedTable, sink: &mut dyn StagingSink, sql_script: &Path) -> Result<()> {
        info!("Loading {} rows into staging table", joined.len());
        sink.stage(joined)?;
        sink.finalize(sql_script)
    }
}
