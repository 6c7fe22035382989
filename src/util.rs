use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use crate::errors::Result;
use log::warn;

/// 闭区间日期范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 解析 "YYYY-MM-DD" 格式的起止日期
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d")?;
        let end = NaiveDate::parse_from_str(end.trim(), "%Y-%m-%d")?;
        Ok(Self { start, end })
    }

    /// 昨天到昨天，`today` 由调用方在运行时给出
    pub fn yesterday_from(today: NaiveDate) -> Self {
        let yesterday = today.pred_opt().unwrap_or(today);
        Self { start: yesterday, end: yesterday }
    }

    /// 命令行起止日期：缺省的一端取昨天
    ///
    /// A single bound is allowed but logged at warn level with the resolved
    /// range and day count, since it can span far more days than intended.
    pub fn resolve(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Result<Self> {
        let yesterday = Self::yesterday_from(today);
        let range = Self {
            start: match start {
                Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?,
                None => yesterday.start,
            },
            end: match end {
                Some(e) => NaiveDate::parse_from_str(e.trim(), "%Y-%m-%d")?,
                None => yesterday.end,
            },
        };

        if start.is_some() != end.is_some() {
            warn!(
                "Only one of start/end given, resolved range is {} to {} ({} days)",
                range.start,
                range.end,
                range.days().len()
            );
        }
        Ok(range)
    }

    /// Every calendar day from `start` to `end`, both included, ascending.
    /// An inverted range yields no days.
    pub fn days(&self) -> Vec<NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(|d| *d <= end).collect()
    }
}

/// 将起止日期字符串展开为逐日列表
pub fn expand_date_range(start: &str, end: &str) -> Result<Vec<NaiveDate>> {
    Ok(DateRange::parse(start, end)?.days())
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Reduce a date-ish string to its calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and `YYYY-MM-DD HH:MM:SS`.
pub fn parse_date_lenient(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.date_naive());
    }
    let dt = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")?;
    Ok(dt.date())
}

/// JSON 数值（或数字字符串）转为 Decimal，其他类型返回 None
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

// Arrow数据转换工具
pub mod arrow_utils {
    use super::*;
    use crate::errors::EtlError;
    use crate::models::currency::CurrencyTable;
    use crate::models::joined::{JoinedRow, JoinedTable};
    use crate::models::stock::StockTable;
    use arrow_array::{Array, ArrayRef, Date32Array, Float64Array, RecordBatch, StringArray};
    use arrow_ipc::reader::FileReader;
    use arrow_ipc::writer::FileWriter;
    use arrow_schema::{DataType, Field, Schema};
    use log::{debug, info};
    use rust_decimal::prelude::ToPrimitive;
    use std::fs::File;
    use std::path::Path;
    use std::sync::Arc;

    fn epoch() -> NaiveDate {
        NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
    }

    fn date_to_days(date: &NaiveDate) -> i32 {
        (*date - epoch()).num_days() as i32
    }

    fn days_to_date(days: i32) -> Result<NaiveDate> {
        epoch()
            .checked_add_signed(chrono::Duration::days(days as i64))
            .ok_or_else(|| EtlError::ArrowError(format!("Date32 value out of range: {}", days)))
    }

    fn to_f64(value: Option<Decimal>) -> Option<f64> {
        value.and_then(|d| d.to_f64())
    }

    // f64 的 Display 为最短可还原表示，不含指数
    fn from_f64(value: f64) -> Result<Decimal> {
        Decimal::from_str(&value.to_string())
            .map_err(|e| EtlError::ArrowError(format!("Invalid decimal {}: {}", value, e)))
    }

    pub fn stock_table_to_record_batch(table: &StockTable) -> Result<RecordBatch> {
        let schema = Schema::new(vec![
            Field::new("stock_ticker", DataType::Utf8, false),
            Field::new("date", DataType::Date32, false),
            Field::new("closing_price", DataType::Float64, true),
        ]);

        let tickers: ArrayRef = Arc::new(StringArray::from(
            table.rows.iter().map(|r| r.stock_ticker.as_str()).collect::<Vec<_>>(),
        ));
        let dates: ArrayRef = Arc::new(Date32Array::from(
            table.rows.iter().map(|r| date_to_days(&r.date)).collect::<Vec<_>>(),
        ));
        let closes: ArrayRef = Arc::new(Float64Array::from(
            table.rows.iter().map(|r| to_f64(r.closing_price)).collect::<Vec<_>>(),
        ));

        Ok(RecordBatch::try_new(Arc::new(schema), vec![tickers, dates, closes])?)
    }

    pub fn currency_table_to_record_batch(table: &CurrencyTable) -> Result<RecordBatch> {
        let schema = Schema::new(vec![
            Field::new("currency", DataType::Utf8, false),
            Field::new("exchange_rate", DataType::Float64, true),
            Field::new("date", DataType::Date32, false),
        ]);

        let currencies: ArrayRef = Arc::new(StringArray::from(
            table.rows.iter().map(|r| r.currency.as_str()).collect::<Vec<_>>(),
        ));
        let rates: ArrayRef = Arc::new(Float64Array::from(
            table.rows.iter().map(|r| r.exchange_rate.to_f64()).collect::<Vec<_>>(),
        ));
        let dates: ArrayRef = Arc::new(Date32Array::from(
            table.rows.iter().map(|r| date_to_days(&r.date)).collect::<Vec<_>>(),
        ));

        Ok(RecordBatch::try_new(Arc::new(schema), vec![currencies, rates, dates])?)
    }

    pub fn joined_schema() -> Schema {
        Schema::new(vec![
            Field::new("date", DataType::Date32, false),
            Field::new("currency", DataType::Utf8, false),
            Field::new("exchange_rate", DataType::Float64, true),
            Field::new("stock_ticker", DataType::Utf8, true),
            Field::new("closing_price", DataType::Float64, true),
            Field::new("converted_price_in_USD", DataType::Float64, true),
        ])
    }

    pub fn joined_table_to_record_batch(table: &JoinedTable) -> Result<RecordBatch> {
        let rows = &table.rows;
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Date32Array::from(
                rows.iter().map(|r| date_to_days(&r.date)).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.currency.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.exchange_rate.to_f64()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.stock_ticker.as_deref()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| to_f64(r.closing_price)).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| to_f64(r.converted_price_in_usd)).collect::<Vec<_>>(),
            )),
        ];

        Ok(RecordBatch::try_new(Arc::new(joined_schema()), columns)?)
    }

    pub fn save_record_batch_to_arrow(batch: &RecordBatch, path: &Path) -> Result<()> {
        info!("Saving {} rows to {}", batch.num_rows(), path.display());

        let file = File::create(path)?;
        let mut writer = FileWriter::try_new(file, &batch.schema())?;
        writer.write(batch)?;
        writer.finish()?;

        Ok(())
    }

    fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
        batch
            .column_by_name(name)
            .and_then(|c| c.as_any().downcast_ref::<T>())
            .ok_or_else(|| EtlError::ArrowError(format!("Failed to downcast {} column", name)))
    }

    // 从Arrow文件读取连接结果
    pub fn read_joined_from_arrow(path: &Path) -> Result<JoinedTable> {
        let file = File::open(path)?;
        let reader = FileReader::try_new(file, None)?;

        let mut table = JoinedTable::default();
        for batch in reader {
            let batch = batch?;
            let dates = column::<Date32Array>(&batch, "date")?;
            let currencies = column::<StringArray>(&batch, "currency")?;
            let rates = column::<Float64Array>(&batch, "exchange_rate")?;
            let tickers = column::<StringArray>(&batch, "stock_ticker")?;
            let closes = column::<Float64Array>(&batch, "closing_price")?;
            let converted = column::<Float64Array>(&batch, "converted_price_in_USD")?;

            for i in 0..batch.num_rows() {
                if rates.is_null(i) {
                    return Err(EtlError::ArrowError(format!("Null exchange rate in row {}", i)));
                }
                table.rows.push(JoinedRow {
                    date: days_to_date(dates.value(i))?,
                    currency: currencies.value(i).to_string(),
                    exchange_rate: from_f64(rates.value(i))?,
                    stock_ticker: (!tickers.is_null(i)).then(|| tickers.value(i).to_string()),
                    closing_price: if closes.is_null(i) { None } else { Some(from_f64(closes.value(i))?) },
                    converted_price_in_usd: if converted.is_null(i) {
                        None
                    } else {
                        Some(from_f64(converted.value(i))?)
                    },
                });
            }
        }

        debug!("Read {} joined rows from {}", table.len(), path.display());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn range_is_inclusive_and_ascending() {
        let days = expand_date_range("2025-02-27", "2025-03-02").unwrap();
        assert_eq!(
            days,
            vec![d(2025, 2, 27), d(2025, 2, 28), d(2025, 3, 1), d(2025, 3, 2)]
        );
    }

    #[test]
    fn range_length_matches_day_difference() {
        let cases = [
            ("2024-01-01", "2024-01-01"),
            ("2024-02-01", "2024-03-01"),
            ("2023-12-30", "2024-01-02"),
            ("2024-01-01", "2024-12-31"),
        ];
        for (start, end) in cases {
            let range = DateRange::parse(start, end).unwrap();
            let days = range.days();
            let expected = (range.end - range.start).num_days() as usize + 1;
            assert_eq!(days.len(), expected, "{start}..={end}");
            assert_eq!(days.first(), Some(&range.start));
            assert_eq!(days.last(), Some(&range.end));
            assert!(days.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn inverted_range_is_empty() {
        assert!(expand_date_range("2025-03-12", "2025-03-11").unwrap().is_empty());
    }

    #[test]
    fn malformed_date_fails_to_parse() {
        assert!(expand_date_range("2025-13-01", "2025-12-31").is_err());
        assert!(expand_date_range("yesterday", "2025-12-31").is_err());
    }

    #[test]
    fn yesterday_is_single_day() {
        let range = DateRange::yesterday_from(d(2025, 3, 1));
        assert_eq!(range.days(), vec![d(2025, 2, 28)]);
    }

    #[test]
    fn resolve_fills_missing_bounds_with_yesterday() {
        let today = d(2025, 3, 13);
        assert_eq!(DateRange::resolve(None, None, today).unwrap(), DateRange::yesterday_from(today));

        let open_end = DateRange::resolve(Some("2025-03-01"), None, today).unwrap();
        assert_eq!(open_end, DateRange::new(d(2025, 3, 1), d(2025, 3, 12)));
        assert_eq!(open_end.days().len(), 12);

        let open_start = DateRange::resolve(None, Some("2025-03-20"), today).unwrap();
        assert_eq!(open_start, DateRange::new(d(2025, 3, 12), d(2025, 3, 20)));

        let both = DateRange::resolve(Some("2025-03-10"), Some("2025-03-11"), today).unwrap();
        assert_eq!(both.days(), vec![d(2025, 3, 10), d(2025, 3, 11)]);
    }

    #[test]
    fn resolve_rejects_malformed_bound() {
        assert!(DateRange::resolve(Some("03/01/2025"), None, d(2025, 3, 13)).is_err());
    }

    #[test]
    fn lenient_dates_drop_time() {
        assert_eq!(parse_date_lenient("2025-03-12").unwrap(), d(2025, 3, 12));
        assert_eq!(parse_date_lenient("2025-03-12T16:00:00Z").unwrap(), d(2025, 3, 12));
        assert_eq!(parse_date_lenient("2025-03-12 09:30:00").unwrap(), d(2025, 3, 12));
        assert!(parse_date_lenient("12/03/2025").is_err());
    }

    #[test]
    fn decimals_from_json_values() {
        assert_eq!(decimal_from_json(&json!(216.98)), Decimal::from_str("216.98").ok());
        assert_eq!(decimal_from_json(&json!(0)), Some(Decimal::ZERO));
        assert_eq!(decimal_from_json(&json!("0.93")), Decimal::from_str("0.93").ok());
        assert_eq!(decimal_from_json(&json!(null)), None);
        assert_eq!(decimal_from_json(&json!("n/a")), None);
    }
}
