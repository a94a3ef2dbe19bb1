//! 展示控制器
//!
//! 每次取词的状态机：Idle → FadingOut → Fetching → FadingIn → Idle，失败时进入 Error。
//! 同一时刻只允许一个在途请求，新请求会取消旧请求，旧请求的结果一律丢弃。

use std::fmt;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::QuoteError;
use crate::locale::Locale;
use crate::models::Quote;

/// 过渡动画的兜底余量
const FADE_GRACE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FadingOut,
    Fetching,
    FadingIn,
    Error,
}

/// 发起请求的凭证：请求 ID 与取消令牌
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub id: RequestId,
    pub token: CancellationToken,
}

/// 界面上可见的名言区域
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteView {
    pub en: String,
    pub th: String,
    pub credit: String,
    pub copy_enabled: bool,
    pub more_enabled: bool,
    pub random_enabled: bool,
    /// 随机按钮显示"正在抽取"
    pub random_busy: bool,
}

impl QuoteView {
    /// 可复制的文本：非空行以换行连接
    pub fn copy_text(&self) -> Option<String> {
        let full = [&self.en, &self.th, &self.credit]
            .into_iter()
            .filter(|line| !line.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        if full.trim().is_empty() {
            None
        } else {
            Some(full)
        }
    }
}

struct InFlight {
    id: RequestId,
    token: CancellationToken,
    fade_until: Instant,
    fade_done: bool,
    result: Option<Result<Quote, QuoteError>>,
}

pub struct DisplayController {
    locale: Locale,
    transition: Duration,
    phase: Phase,
    inflight: Option<InFlight>,
    view: QuoteView,
    current: Option<Quote>,
}

impl DisplayController {
    pub fn new(locale: Locale, transition: Duration) -> Self {
        Self {
            locale,
            transition,
            phase: Phase::Idle,
            inflight: None,
            view: QuoteView {
                en: locale.strings().loading.to_string(),
                ..Default::default()
            },
            current: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn view(&self) -> &QuoteView {
        &self.view
    }

    /// 当前展示的名言（用于"更多信息"面板）
    pub fn current(&self) -> Option<&Quote> {
        self.current.as_ref()
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> Option<RequestId> {
        self.inflight.as_ref().map(|f| f.id)
    }

    /// 名言区域是否处于淡化状态
    pub fn is_dimmed(&self) -> bool {
        matches!(
            self.phase,
            Phase::FadingOut | Phase::Fetching | Phase::FadingIn
        )
    }

    /// 切换分类：立即显示占位文字
    pub fn show_placeholder(&mut self, category: &str) {
        self.view.en = self.locale.category_placeholder(category);
        self.view.th = "—".to_string();
        self.view.credit.clear();
        self.view.copy_enabled = false;
        self.view.more_enabled = false;
        self.view.random_enabled = true;
        self.current = None;
    }

    /// 开始新一轮取词，取消之前的在途请求
    pub fn begin(&mut self, now: Instant, switching_category: bool) -> FetchTicket {
        if let Some(previous) = self.inflight.take() {
            previous.token.cancel();
            debug!(request = %previous.id, "superseded in-flight request");
        }

        let ticket = FetchTicket {
            id: RequestId::new(),
            token: CancellationToken::new(),
        };
        self.inflight = Some(InFlight {
            id: ticket.id,
            token: ticket.token.clone(),
            fade_until: now + self.transition + FADE_GRACE,
            fade_done: false,
            result: None,
        });

        self.phase = Phase::FadingOut;
        self.view.random_enabled = false;
        self.view.random_busy = !switching_category;
        self.view.copy_enabled = false;
        self.view.more_enabled = false;
        ticket
    }

    /// 交付请求结果；不是当前请求的结果会被丢弃
    pub fn deliver(&mut self, id: RequestId, result: Result<Quote, QuoteError>) -> bool {
        match self.inflight.as_mut() {
            Some(inflight) if inflight.id == id => {
                inflight.result = Some(result);
                true
            }
            _ => {
                debug!(request = %id, "discarding result of superseded request");
                false
            }
        }
    }

    /// 淡出结束时返回一次请求 ID
    pub fn poll_fade(&mut self, now: Instant) -> Option<RequestId> {
        let inflight = self.inflight.as_mut()?;
        if inflight.fade_done || now < inflight.fade_until {
            return None;
        }
        inflight.fade_done = true;
        if self.phase == Phase::FadingOut {
            self.phase = Phase::Fetching;
        }
        Some(inflight.id)
    }

    /// 淡出已结束且数据已到时替换内容；成功时返回新展示的名言
    pub fn try_swap(&mut self) -> Option<Quote> {
        let ready = self
            .inflight
            .as_ref()
            .is_some_and(|f| f.fade_done && f.result.is_some());
        if !ready {
            return None;
        }
        let result = self.inflight.take()?.result?;

        self.view.random_enabled = true;
        self.view.random_busy = false;

        match result {
            Ok(quote) => {
                self.apply_quote(&quote);
                self.phase = Phase::FadingIn;
                Some(quote)
            }
            Err(err) if err.is_cancelled() => {
                debug!("request cancelled");
                self.phase = Phase::Idle;
                None
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch quote");
                self.apply_error();
                self.phase = Phase::Error;
                None
            }
        }
    }

    /// 新内容已绘制一帧，可以淡入
    pub fn on_painted(&mut self) {
        if self.phase == Phase::FadingIn {
            self.phase = Phase::Idle;
        }
    }

    fn apply_quote(&mut self, quote: &Quote) {
        let en = quote.en.trim();
        self.view.en = if en.is_empty() {
            String::new()
        } else {
            format!("“{en}”")
        };
        self.view.th = quote.th.trim().to_string();
        self.view.credit = quote.credit_line();
        self.view.copy_enabled = !quote.en.is_empty();
        self.view.more_enabled = quote.has_details();
        self.current = Some(quote.clone());
    }

    fn apply_error(&mut self) {
        self.view.en = self.locale.strings().error.to_string();
        self.view.th.clear();
        self.view.credit.clear();
        self.view.copy_enabled = false;
        self.view.more_enabled = false;
        self.current = None;
    }
}
