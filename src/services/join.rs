use crate::models::currency::CurrencyTable;
use crate::models::joined::{JoinedRow, JoinedTable};
use crate::models::stock::{FlatStockRow, StockTable};
use chrono::NaiveDate;
use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// 收盘价 × 汇率，四舍五入（远离零）到 2 位小数
pub fn convert_price(closing_price: Decimal, exchange_rate: Decimal) -> Decimal {
    (closing_price * exchange_rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Left-join the currency table onto the stock table by date.
///
/// Output follows currency row order; a currency row fans out once per stock
/// row of the same date (in stock table order) and is kept with empty stock
/// columns when no stock row matches. Stock rows on dates without rates are
/// dropped.
pub fn join_data(stocks: &StockTable, currency: &CurrencyTable) -> JoinedTable {
    let mut by_date: HashMap<NaiveDate, Vec<&FlatStockRow>> = HashMap::new();
    for row in &stocks.rows {
        by_date.entry(row.date).or_default().push(row);
    }

    let mut rows = Vec::with_capacity(currency.len().max(stocks.len()));
    for rate in &currency.rows {
        match by_date.get(&rate.date) {
            Some(matches) => {
                for stock in matches {
                    rows.push(JoinedRow {
                        date: rate.date,
                        currency: rate.currency.clone(),
                        exchange_rate: rate.exchange_rate,
                        stock_ticker: Some(stock.stock_ticker.clone()),
                        closing_price: stock.closing_price,
                        converted_price_in_usd: stock
                            .closing_price
                            .map(|close| convert_price(close, rate.exchange_rate)),
                    });
                }
            }
            None => rows.push(JoinedRow {
                date: rate.date,
                currency: rate.currency.clone(),
                exchange_rate: rate.exchange_rate,
                stock_ticker: None,
                closing_price: None,
                converted_price_in_usd: None,
            }),
        }
    }

    debug!(
        "Joined {} currency rows with {} stock rows into {} rows",
        currency.len(),
        stocks.len(),
        rows.len()
    );
    JoinedTable { rows }
}
