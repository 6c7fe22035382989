use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

/// 单个交易日的接口响应，保留接口返回的全部字段
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPayload {
    pub date: NaiveDate,
    pub payload: Value,
}

impl DailyPayload {
    pub fn new(date: NaiveDate, payload: Value) -> Self {
        Self { date, payload }
    }

    /// 无数据日（404）使用的全零占位记录
    pub fn placeholder(ticker: &str, date: NaiveDate) -> Self {
        let payload = json!({
            "symbol": ticker,
            "date": date.format("%Y-%m-%d").to_string(),
            "open": 0,
            "close": 0,
            "high": 0,
            "low": 0,
            "volume": 0,
        });
        Self { date, payload }
    }
}

/// Raw Polygon responses grouped by ticker.
///
/// Each ticker owns an append-only list of daily payloads in fetch order, so a
/// gap day never replaces the days fetched before it. Tickers keep the order in
/// which they were first pushed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStockData {
    series: Vec<(String, Vec<DailyPayload>)>,
}

impl RawStockData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ticker: &str, day: DailyPayload) {
        match self.series.iter().position(|(t, _)| t.as_str() == ticker) {
            Some(i) => self.series[i].1.push(day),
            None => self.series.push((ticker.to_string(), vec![day])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// 全部日线记录数
    pub fn len(&self) -> usize {
        self.series.iter().map(|(_, days)| days.len()).sum()
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|(t, _)| t.as_str())
    }

    pub fn days(&self, ticker: &str) -> Option<&[DailyPayload]> {
        self.series
            .iter()
            .find(|(t, _)| t.as_str() == ticker)
            .map(|(_, days)| days.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DailyPayload)> {
        self.series
            .iter()
            .flat_map(|(t, days)| days.iter().map(move |d| (t.as_str(), d)))
    }

    /// `{ticker: {date: payload}}`, the shape the API responses are usually shown in
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        for (ticker, days) in &self.series {
            let mut by_date = Map::new();
            for day in days {
                by_date.insert(day.date.format("%Y-%m-%d").to_string(), day.payload.clone());
            }
            root.insert(ticker.clone(), Value::Object(by_date));
        }
        Value::Object(root)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlatStockRow {
    pub stock_ticker: String,
    pub date: NaiveDate,
    pub closing_price: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockTable {
    pub rows: Vec<FlatStockRow>,
}

impl StockTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
