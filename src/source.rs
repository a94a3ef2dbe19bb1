//! 数据源决策
//!
//! 启动时探测一次后端：可用则整个会话走后端，否则加载本地包走静态模式

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::QuoteApi;
use crate::deck::DeckSelector;
use crate::error::QuoteError;
use crate::models::{Quote, QuoteKey};
use crate::store::{QuoteBundle, QuoteStore};

/// 会话内固定不变的数据源模式
#[derive(Debug, Clone, PartialEq)]
pub enum SourceMode {
    Backend,
    Static(QuoteStore),
}

/// 本地包的位置
#[derive(Debug, Clone, PartialEq)]
pub enum BundleLocation {
    File(PathBuf),
    /// <base>/quotes.json
    Remote,
}

/// 决定数据源并给出分类列表
pub async fn resolve_source(
    api: &dyn QuoteApi,
    bundle: &BundleLocation,
    probe_backend: bool,
) -> (SourceMode, Vec<String>) {
    if probe_backend {
        match api.categories().await {
            Ok(categories) if !categories.is_empty() => {
                info!(count = categories.len(), "backend available, using backend mode");
                return (SourceMode::Backend, categories);
            }
            Ok(_) => debug!("backend returned no categories"),
            Err(err) => debug!(error = %err, "backend probe failed"),
        }
    }

    let store = match load_store(api, bundle).await {
        Ok(store) if !store.is_empty() => store,
        Ok(_) => {
            warn!("quote bundle has no categories");
            QuoteStore::empty_fallback()
        }
        Err(err) => {
            warn!(error = %err, ?bundle, "failed to load quote bundle");
            QuoteStore::empty_fallback()
        }
    };

    info!(
        categories = store.categories().len(),
        quotes = store.total_len(),
        "using static mode"
    );
    let categories = store.categories();
    (SourceMode::Static(store), categories)
}

/// 加载并分桶本地包
pub async fn load_store(
    api: &dyn QuoteApi,
    bundle: &BundleLocation,
) -> Result<QuoteStore, QuoteError> {
    let bundle = match bundle {
        BundleLocation::File(path) => {
            let text = tokio::fs::read_to_string(path).await?;
            QuoteBundle::parse(&text)?
        }
        BundleLocation::Remote => api.bundle().await?,
    };
    Ok(QuoteStore::from_bundle(bundle))
}

/// 可被取消地等待一个请求
async fn cancellable<T>(
    token: &CancellationToken,
    request: impl Future<Output = Result<T, QuoteError>>,
) -> Result<T, QuoteError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(QuoteError::Cancelled),
        result = request => result,
    }
}

/// 后端模式取一句；与上次相同则重试一次，重试仍相同就接受原结果
pub async fn fetch_backend_quote(
    api: &dyn QuoteApi,
    category: Option<&str>,
    last_shown: Option<&QuoteKey>,
    token: &CancellationToken,
) -> Result<Quote, QuoteError> {
    let first = Quote::normalize(&cancellable(token, api.random(category)).await?);

    let Some(last_shown) = last_shown else {
        return Ok(first);
    };
    if &first.key() != last_shown {
        return Ok(first);
    }

    debug!(?category, "backend repeated the last quote, retrying once");
    match cancellable(token, api.random(category)).await {
        Ok(raw) => {
            let second = Quote::normalize(&raw);
            if &second.key() != last_shown {
                Ok(second)
            } else {
                Ok(first)
            }
        }
        Err(QuoteError::Cancelled) => Err(QuoteError::Cancelled),
        Err(err) => {
            debug!(error = %err, "retry failed, keeping first quote");
            Ok(first)
        }
    }
}

/// 静态模式取一句；分类为空时退回到全部分类的并集
pub fn draw_static<R: rand::Rng>(
    store: &QuoteStore,
    decks: &mut DeckSelector<R>,
    category: Option<&str>,
) -> Result<Quote, QuoteError> {
    let deck_key = category.unwrap_or_default();
    let bucket = category.map(|c| store.bucket(c)).unwrap_or_default();
    let pool = if bucket.is_empty() {
        store.all_quotes()
    } else {
        bucket
    };

    decks
        .draw(deck_key, pool)
        .cloned()
        .ok_or_else(|| QuoteError::EmptyPool {
            category: deck_key.to_string(),
        })
}
