use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// 某日某币种相对基准货币的汇率
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRateRow {
    pub currency: String,
    pub exchange_rate: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyTable {
    pub rows: Vec<ExchangeRateRow>,
}

impl CurrencyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn serializes_as_flat_record() {
        let row = ExchangeRateRow {
            currency: "EUR".to_string(),
            exchange_rate: Decimal::from_str("0.93").unwrap(),
            date: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({"currency": "EUR", "exchange_rate": 0.93, "date": "2025-03-12"})
        );
    }
}
