use crate::errors::{EtlError, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// 一次 GET 请求的结果，404 单独表示
#[derive(Debug, Clone, PartialEq)]
pub enum HttpReply {
    Json(Value),
    NotFound,
}

/// Base trait for the JSON APIs the fetchers talk to
#[async_trait]
pub trait JsonHttpClient {
    /// GET `url` and decode the body as JSON.
    ///
    /// `api` names the remote service and is only used in error reports.
    async fn get_json(&self, api: &str, url: &str) -> Result<HttpReply>;
}

pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(EtlError::RequestError)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JsonHttpClient for ReqwestClient {
    async fn get_json(&self, api: &str, url: &str) -> Result<HttpReply> {
        // reqwest 的错误文本包含完整 URL（含 apiKey），先去掉
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EtlError::RequestError(e.without_url()))?;
        let status = response.status();
        debug!("{} responded with {}", api, status);

        if status == StatusCode::NOT_FOUND {
            return Ok(HttpReply::NotFound);
        }
        if !status.is_success() {
            return Err(EtlError::HttpStatus {
                api: api.to_string(),
                status: status.as_u16(),
            });
        }

        let json = response
            .json::<Value>()
            .await
            .map_err(|e| EtlError::RequestError(e.without_url()))?;
        Ok(HttpReply::Json(json))
    }
}
