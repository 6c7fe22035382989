use crate::errors::{EtlError, Result};
use crate::models::currency::{CurrencyTable, ExchangeRateRow};
use crate::models::stock::{FlatStockRow, RawStockData, StockTable};
use crate::util::{decimal_from_json, format_date, parse_date_lenient};
use log::debug;

/// 将按 ticker/日期嵌套的原始响应展平为股票表
///
/// The symbol comes from the payload's `symbol` field (falling back to the
/// ticker key) and is uppercased. The date prefers the payload's `from` field
/// over the requested date and is reduced to a calendar date.
pub fn clean_stock_data(raw: Option<&RawStockData>) -> Result<StockTable> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(EtlError::ValidationError("Invalid stock data provided.".to_string())),
    };

    let mut rows = Vec::with_capacity(raw.len());
    for (ticker, day) in raw.iter() {
        let payload = &day.payload;
        let symbol = payload
            .get("symbol")
            .and_then(|s| s.as_str())
            .unwrap_or(ticker);
        let closing_price = payload.get("close").and_then(decimal_from_json);
        let from_date = match payload.get("from").and_then(|f| f.as_str()) {
            Some(from) => from.to_string(),
            None => format_date(&day.date),
        };

        rows.push(FlatStockRow {
            stock_ticker: symbol.to_uppercase(),
            date: parse_date_lenient(&from_date)?,
            closing_price,
        });
    }

    debug!("Flattened {} stock rows", rows.len());
    Ok(StockTable { rows })
}

pub fn clean_currency_data(raw: Option<&[ExchangeRateRow]>) -> Result<CurrencyTable> {
    match raw {
        Some(rows) if !rows.is_empty() => Ok(CurrencyTable { rows: rows.to_vec() }),
        _ => Err(EtlError::ValidationError("Invalid currency data provided.".to_string())),
    }
}
