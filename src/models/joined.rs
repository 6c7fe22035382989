use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// 汇率表左连接股票表后的一行
///
/// Stock columns are `None` when no stock row shares the currency row's date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRow {
    pub date: NaiveDate,
    pub currency: String,
    pub exchange_rate: Decimal,
    pub stock_ticker: Option<String>,
    pub closing_price: Option<Decimal>,
    #[serde(rename = "converted_price_in_USD")]
    pub converted_price_in_usd: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinedTable {
    pub rows: Vec<JoinedRow>,
}

impl JoinedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.iter().map(|r| r.date).min()?;
        let last = self.rows.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}
