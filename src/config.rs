use crate::errors::{EtlError, Result};
use log::{error, info};
use serde::Deserialize;
use std::path::Path;

/// Polygon.io 日线接口配置
#[derive(Debug, Clone, Deserialize)]
pub struct PolygonConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub stock_ticker_names: Vec<String>,
}

/// Frankfurter 汇率接口配置
#[derive(Debug, Clone, Deserialize)]
pub struct FrankfurterConfig {
    pub base_url: String,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub polygon: PolygonConfig,
    pub frankfurter: FrankfurterConfig,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn new(polygon: PolygonConfig, frankfurter: FrankfurterConfig) -> Self {
        Self {
            polygon,
            frankfurter,
            data_dir: default_data_dir(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// 从 JSON 配置文件加载，文件不存在时返回 `ConfigMissing`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            error!("Configuration file '{}' not found.", path.display());
            return Err(EtlError::ConfigMissing(path.display().to_string()));
        }

        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!(
            "Loaded configuration from {} ({} tickers)",
            path.display(),
            config.polygon.stock_ticker_names.len()
        );
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)
            .map_err(|e| EtlError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.polygon.base_url.trim().is_empty() {
            return Err(EtlError::ConfigInvalid("polygon.base_url is empty".to_string()));
        }
        if self.frankfurter.base_url.trim().is_empty() {
            return Err(EtlError::ConfigInvalid("frankfurter.base_url is empty".to_string()));
        }
        Ok(())
    }

    pub fn with_base_currency(mut self, currency: &str) -> Self {
        self.frankfurter.base_currency = currency.to_uppercase();
        self
    }

    pub fn with_data_dir(mut self, dir: &str) -> Self {
        self.data_dir = dir.to_string();
        self
    }

    pub fn with_tickers(mut self, tickers: Vec<String>) -> Self {
        self.polygon.stock_ticker_names = tickers;
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let config = Config::from_json_str(
            r#"{
                "polygon": {"base_url": "https://api.polygon.io/v1/open-close", "stock_ticker_names": ["AAPL", "TSLA"]},
                "frankfurter": {"base_url": "https://api.frankfurter.app"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.polygon.api_key, None);
        assert_eq!(config.polygon.stock_ticker_names, vec!["AAPL", "TSLA"]);
        assert_eq!(config.frankfurter.base_currency, "USD");
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn missing_section_is_invalid() {
        let err = Config::from_json_str(r#"{"polygon": {"base_url": "x"}}"#).unwrap_err();
        assert!(matches!(err, EtlError::ConfigInvalid(_)));
    }

    #[test]
    fn empty_base_url_is_invalid() {
        let err = Config::from_json_str(
            r#"{"polygon": {"base_url": " "}, "frankfurter": {"base_url": "https://api.frankfurter.app"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EtlError::ConfigInvalid(_)));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Config::load("/nonexistent/stock_fx_etl/config.json").unwrap_err();
        assert!(matches!(err, EtlError::ConfigMissing(_)));
    }

    #[test]
    fn overrides_apply() {
        let config = Config::new(
            PolygonConfig {
                base_url: "p".to_string(),
                api_key: None,
                stock_ticker_names: vec![],
            },
            FrankfurterConfig {
                base_url: "f".to_string(),
                base_currency: "USD".to_string(),
            },
        )
        .with_base_currency("eur")
        .with_data_dir("out")
        .with_tickers(vec!["MSFT".to_string()])
        .with_request_timeout_secs(5);

        assert_eq!(config.frankfurter.base_currency, "EUR");
        assert_eq!(config.data_dir, "out");
        assert_eq!(config.polygon.stock_ticker_names, vec!["MSFT"]);
        assert_eq!(config.request_timeout_secs, 5);
    }
}
