//! 会话状态
//!
//! 每次启动构造一次：数据源模式、分类、当前分类、牌堆与上次展示记录

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;

use crate::api::QuoteApi;
use crate::deck::DeckSelector;
use crate::error::QuoteError;
use crate::models::{Quote, QuoteKey};
use crate::source::{self, BundleLocation, SourceMode};

pub struct Session {
    api: Arc<dyn QuoteApi>,
    mode: SourceMode,
    categories: Vec<String>,
    active: Option<String>,
    decks: DeckSelector<StdRng>,
}

/// 一次后端请求所需的全部输入，可移入异步任务
pub struct BackendRequest {
    api: Arc<dyn QuoteApi>,
    category: Option<String>,
    last_shown: Option<QuoteKey>,
}

impl BackendRequest {
    pub async fn run(self, token: &CancellationToken) -> Result<Quote, QuoteError> {
        source::fetch_backend_quote(
            self.api.as_ref(),
            self.category.as_deref(),
            self.last_shown.as_ref(),
            token,
        )
        .await
    }
}

impl Session {
    /// 探测后端并确定模式，之后不再改变
    pub async fn bootstrap(
        api: Arc<dyn QuoteApi>,
        bundle: &BundleLocation,
        probe_backend: bool,
    ) -> Self {
        let (mode, categories) = source::resolve_source(api.as_ref(), bundle, probe_backend).await;
        Self::new(api, mode, categories, StdRng::from_os_rng())
    }

    pub fn new(
        api: Arc<dyn QuoteApi>,
        mode: SourceMode,
        categories: Vec<String>,
        rng: StdRng,
    ) -> Self {
        // 默认激活第一个分类
        let active = categories.first().cloned();
        Self {
            api,
            mode,
            categories,
            active,
            decks: DeckSelector::new(rng),
        }
    }

    pub fn is_backend(&self) -> bool {
        matches!(self.mode, SourceMode::Backend)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn active_category(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_index(&self) -> Option<usize> {
        let active = self.active.as_ref()?;
        self.categories.iter().position(|c| c == active)
    }

    /// 切换分类；未知分类返回 false
    pub fn select_category(&mut self, name: &str) -> bool {
        if !self.categories.iter().any(|c| c == name) {
            return false;
        }
        self.active = Some(name.to_string());
        true
    }

    /// 牌堆与上次展示记录的键
    fn state_key(&self) -> &str {
        self.active.as_deref().unwrap_or_default()
    }

    pub fn backend_request(&self) -> BackendRequest {
        BackendRequest {
            api: Arc::clone(&self.api),
            category: self.active.clone(),
            last_shown: self.decks.last_shown(self.state_key()).cloned(),
        }
    }

    /// 静态模式抽取
    pub fn draw_local(&mut self) -> Result<Quote, QuoteError> {
        match &self.mode {
            SourceMode::Static(store) => {
                source::draw_static(store, &mut self.decks, self.active.as_deref())
            }
            SourceMode::Backend => Err(QuoteError::EmptyPool {
                category: self.state_key().to_string(),
            }),
        }
    }

    /// 后端模式下展示后记录
    pub fn record_shown(&mut self, quote: &Quote) {
        let key = self.state_key().to_string();
        self.decks.record_shown(&key, quote.key());
    }

    #[cfg(test)]
    pub fn last_shown(&self) -> Option<&QuoteKey> {
        self.decks.last_shown(self.state_key())
    }
}
