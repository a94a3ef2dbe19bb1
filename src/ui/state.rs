//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::theme::Theme;
use crate::clipboard::{ClipboardService, ClipboardWriter};
use crate::controller::{DisplayController, RequestId};
use crate::error::QuoteError;
use crate::locale::Locale;
use crate::models::Quote;
use crate::session::Session;
use crate::storage::UiState;

/// 后台请求完成后回传的结果
#[derive(Debug)]
pub struct FetchOutcome {
    pub id: RequestId,
    pub result: Result<Quote, QuoteError>,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    MorePanel,
}

/// 启动参数
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub locale: Locale,
    pub theme: Theme,
    pub transition: Duration,
}

/// 应用状态
pub struct App {
    pub session: Session,
    pub controller: DisplayController,
    pub mode: AppMode,
    pub theme: Theme,
    pub locale: Locale,
    pub ui_state: UiState,
    pub message: Option<String>,
    /// "已复制"提示的截止时间
    pub copied_until: Option<Instant>,
    pub(super) clipboard: Box<dyn ClipboardWriter>,
    pub(super) runtime: Handle,
    pub(super) results_tx: UnboundedSender<FetchOutcome>,
    pub(super) results_rx: UnboundedReceiver<FetchOutcome>,
}

impl App {
    /// 创建新的应用实例
    pub fn new(session: Session, ui_state: UiState, options: AppOptions, runtime: Handle) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            session,
            controller: DisplayController::new(options.locale, options.transition),
            mode: AppMode::Normal,
            theme: options.theme,
            locale: options.locale,
            ui_state,
            message: None,
            copied_until: None,
            clipboard: Box::new(ClipboardService::default()),
            runtime,
            results_tx,
            results_rx,
        }
    }

    /// 替换剪贴板写入端
    #[cfg(test)]
    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardWriter>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// 当前展示的名言
    pub fn current_quote(&self) -> Option<&Quote> {
        self.controller.current()
    }

    pub fn is_copied(&self) -> bool {
        self.copied_until.is_some()
    }
}
