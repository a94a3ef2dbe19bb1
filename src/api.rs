//! 后端接口
//!
//! 后端只暴露两个只读端点，外加部署根目录下的静态 quotes.json

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, HeaderValue};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::QuoteError;
use crate::store::QuoteBundle;

#[async_trait]
pub trait QuoteApi: Send + Sync {
    /// GET api/categories
    async fn categories(&self) -> Result<Vec<String>, QuoteError>;

    /// GET api/random?cat=...，返回未规范化的原始记录
    async fn random(&self, category: Option<&str>) -> Result<Value, QuoteError>;

    /// GET quotes.json
    async fn bundle(&self) -> Result<QuoteBundle, QuoteError>;
}

/// 基于 reqwest 的实现
pub struct HttpQuoteApi {
    base_url: Url,
    client: Client,
}

impl HttpQuoteApi {
    pub fn new(base_url: &str) -> Result<Self, QuoteError> {
        Ok(Self {
            base_url: deployment_root(base_url)?,
            client: Client::builder()
                .build()
                .map_err(|e| QuoteError::Network(format!("failed to build HTTP client: {e}")))?,
        })
    }

    /// 相对部署根目录解析路径
    pub fn endpoint(&self, path: &str) -> Result<Url, QuoteError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| QuoteError::Parse(format!("invalid endpoint '{path}': {e}")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, QuoteError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::HttpStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

/// 保证 base 以 '/' 结尾，使 join 在子路径下也正确
fn deployment_root(base_url: &str) -> Result<Url, QuoteError> {
    let trimmed = base_url.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized)
        .map_err(|e| QuoteError::Parse(format!("invalid base url '{base_url}': {e}")))
}

#[async_trait]
impl QuoteApi for HttpQuoteApi {
    async fn categories(&self) -> Result<Vec<String>, QuoteError> {
        let url = self.endpoint("api/categories")?;
        self.get_json(url).await
    }

    async fn random(&self, category: Option<&str>) -> Result<Value, QuoteError> {
        let mut url = self.endpoint("api/random")?;
        if let Some(category) = category {
            url.query_pairs_mut().append_pair("cat", category);
        }
        self.get_json(url).await
    }

    async fn bundle(&self) -> Result<QuoteBundle, QuoteError> {
        let url = self.endpoint("quotes.json")?;
        let value: Value = self.get_json(url).await?;
        QuoteBundle::from_value(value)
    }
}
