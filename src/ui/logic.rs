//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑以及取词、复制、主题等处理方法

use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::actions::Action;
use super::state::{App, AppMode, FetchOutcome};
use crate::controller::FetchTicket;

/// "已复制"提示持续时间
const COPIED_FEEDBACK: Duration = Duration::from_millis(800);

impl App {
    /// 核心逻辑分发
    pub fn dispatch(&mut self, action: Action) -> bool {
        self.dispatch_at(action, Instant::now())
    }

    pub fn dispatch_at(&mut self, action: Action, now: Instant) -> bool {
        match action {
            Action::Quit => return true,
            Action::RandomQuote => {
                if self.controller.view().random_enabled {
                    self.request_quote(now, false);
                }
            }
            Action::NextCategory => self.shift_category(1, now),
            Action::PrevCategory => self.shift_category(-1, now),
            Action::SelectCategory(index) => self.select_category_at(index, now),
            Action::Copy => self.copy_quote(now),
            Action::OpenMore => self.open_more(),
            Action::CloseMore => self.close_more(),
            Action::ToggleTheme => self.toggle_theme(),
        }
        false
    }

    /// 启动后自动抽取第一句
    pub fn start(&mut self, now: Instant) {
        if self.session.active_category().is_some() {
            self.request_quote(now, false);
        }
    }

    // ============ 取词相关 ============

    /// 发起新一轮取词；后端模式下在后台任务中请求
    pub fn request_quote(&mut self, now: Instant, switching_category: bool) {
        let FetchTicket { id, token } = self.controller.begin(now, switching_category);
        if !self.session.is_backend() {
            // 静态模式在淡出结束后再抽取
            return;
        }

        let request = self.session.backend_request();
        let tx = self.results_tx.clone();
        self.runtime.spawn(async move {
            let result = request.run(&token).await;
            // 接收端已关闭说明程序正在退出
            let _ = tx.send(FetchOutcome { id, result });
        });
    }

    /// 每帧绘制前推进状态
    pub fn on_tick(&mut self, now: Instant) {
        while let Ok(outcome) = self.results_rx.try_recv() {
            self.controller.deliver(outcome.id, outcome.result);
        }

        if let Some(id) = self.controller.poll_fade(now)
            && !self.session.is_backend()
        {
            let result = self.session.draw_local();
            self.controller.deliver(id, result);
        }

        if let Some(quote) = self.controller.try_swap()
            && self.session.is_backend()
        {
            self.session.record_shown(&quote);
        }

        if self.copied_until.is_some_and(|until| now >= until) {
            self.copied_until = None;
        }
    }

    /// 新内容已经绘制一帧
    pub fn on_painted(&mut self) {
        self.controller.on_painted();
    }

    // ============ 分类相关 ============

    /// 按偏移循环切换分类
    pub fn shift_category(&mut self, delta: isize, now: Instant) {
        let count = self.session.categories().len();
        if count == 0 {
            return;
        }
        let current = self.session.active_index().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(count as isize) as usize;
        self.select_category_at(next, now);
    }

    /// 切换到指定分类：先显示占位文字，再取词
    pub fn select_category_at(&mut self, index: usize, now: Instant) {
        let Some(name) = self.session.categories().get(index).cloned() else {
            return;
        };
        self.session.select_category(&name);
        self.close_more();
        self.controller.show_placeholder(&name);
        self.request_quote(now, true);
    }

    // ============ 复制 / 更多信息 / 主题 ============

    /// 复制当前展示的文字
    pub fn copy_quote(&mut self, now: Instant) {
        if !self.controller.view().copy_enabled || self.is_copied() {
            return;
        }
        let Some(text) = self.controller.view().copy_text() else {
            return;
        };

        match self.clipboard.set_text(&text) {
            Ok(()) => {
                self.copied_until = Some(now + COPIED_FEEDBACK);
                self.message = None;
            }
            Err(err) => {
                warn!(error = %err, "clipboard write failed");
                self.message = Some(format!(
                    "{}: {}",
                    self.locale.strings().clipboard_failed,
                    err
                ));
            }
        }
    }

    pub fn open_more(&mut self) {
        if self.controller.view().more_enabled && self.current_quote().is_some() {
            self.mode = AppMode::MorePanel;
        }
    }

    pub fn close_more(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.ui_state.set_theme(self.theme);
        info!(theme = ?self.theme, "theme toggled");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;
    use tokio::runtime::Handle;
    use tokio::sync::Notify;

    use super::*;
    use crate::clipboard::tests::FakeClipboard;
    use crate::controller::Phase;
    use crate::locale::Locale;
    use crate::session::Session;
    use crate::source::SourceMode;
    use crate::source::tests::FakeApi;
    use crate::storage::UiState;
    use crate::store::{QuoteBundle, QuoteStore};
    use crate::ui::state::AppOptions;
    use crate::ui::theme::Theme;

    const TRANSITION: Duration = Duration::from_millis(300);

    fn options() -> AppOptions {
        AppOptions {
            locale: Locale::En,
            theme: Theme::Dark,
            transition: TRANSITION,
        }
    }

    fn later(now: Instant) -> Instant {
        now + Duration::from_millis(400)
    }

    fn static_app() -> App {
        let bundle = QuoteBundle::from_value(json!([
            { "en": "a", "author": "A", "cat": "X" },
            { "en": "b", "author": "B", "info": "more", "cat": ["X", "Y"] }
        ]))
        .unwrap();
        let store = QuoteStore::from_bundle(bundle);
        let categories = store.categories();
        let session = Session::new(
            Arc::new(FakeApi::default()),
            SourceMode::Static(store),
            categories,
            StdRng::seed_from_u64(21),
        );
        App::new(session, UiState::default(), options(), Handle::current())
    }

    fn backend_app(api: Arc<FakeApi>) -> App {
        let session = Session::new(
            api,
            SourceMode::Backend,
            vec!["Life".into(), "Work".into()],
            StdRng::seed_from_u64(22),
        );
        App::new(session, UiState::default(), options(), Handle::current())
    }

    /// 让后台任务跑完
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_static_start_draws_after_fade() {
        let mut app = static_app();
        let now = Instant::now();
        app.start(now);

        app.on_tick(now);
        assert_eq!(app.controller.phase(), Phase::FadingOut);

        app.on_tick(later(now));
        assert_eq!(app.controller.phase(), Phase::FadingIn);
        let first = app.current_quote().cloned().unwrap();

        app.on_painted();
        assert_eq!(app.controller.phase(), Phase::Idle);

        // 同一分类内不会立刻重复
        let now = later(now);
        app.dispatch_at(Action::RandomQuote, now);
        app.on_tick(later(now));
        assert_ne!(app.current_quote().unwrap(), &first);
    }

    #[tokio::test]
    async fn test_random_ignored_while_fetching() {
        let mut app = static_app();
        let now = Instant::now();
        app.start(now);
        let in_flight = app.controller.in_flight();

        app.dispatch_at(Action::RandomQuote, now);
        assert_eq!(app.controller.in_flight(), in_flight);
    }

    #[tokio::test]
    async fn test_category_switch_shows_placeholder_then_quote() {
        let mut app = static_app();
        let now = Instant::now();
        app.start(now);

        app.dispatch_at(Action::NextCategory, now);
        assert_eq!(app.session.active_category(), Some("Y"));
        assert_eq!(app.controller.view().en, "Category: Y");
        assert!(!app.controller.view().random_busy);

        app.on_tick(later(now));
        assert_eq!(app.controller.view().en, "“b”");
        assert!(app.controller.view().more_enabled);

        app.dispatch_at(Action::OpenMore, later(now));
        assert_eq!(app.mode, AppMode::MorePanel);
        app.dispatch_at(Action::CloseMore, later(now));
        assert_eq!(app.mode, AppMode::Normal);

        // 循环切换
        app.dispatch_at(Action::NextCategory, later(now));
        assert_eq!(app.session.active_category(), Some("X"));
        app.dispatch_at(Action::PrevCategory, later(now));
        assert_eq!(app.session.active_category(), Some("Y"));
        app.dispatch_at(Action::SelectCategory(8), later(now));
        assert_eq!(app.session.active_category(), Some("Y"));
    }

    #[tokio::test]
    async fn test_toggle_theme_marks_state_dirty() {
        let mut app = static_app();
        app.dispatch(Action::ToggleTheme);
        assert_eq!(app.theme, Theme::Light);
        assert_eq!(app.ui_state.theme(), Some(Theme::Light));
        assert!(app.ui_state.dirty);
    }

    #[tokio::test]
    async fn test_copy_disabled_without_quote() {
        let mut app = static_app();
        app.dispatch(Action::Copy);
        assert!(!app.is_copied());
        assert!(app.message.is_none());
    }

    /// 启动并展示第一句，返回展示完成的时刻
    fn shown(app: &mut App) -> Instant {
        let now = Instant::now();
        app.start(now);
        app.on_tick(later(now));
        app.on_painted();
        later(now)
    }

    #[tokio::test]
    async fn test_copy_feedback_expires() {
        let clipboard = FakeClipboard::default();
        let mut app = static_app().with_clipboard(Box::new(clipboard.clone()));
        let now = shown(&mut app);
        let expected = app.controller.view().copy_text().unwrap();

        app.dispatch_at(Action::Copy, now);
        assert!(app.is_copied());
        assert!(app.message.is_none());
        assert_eq!(clipboard.written.lock().unwrap().as_slice(), &[expected]);

        // 提示期间再次复制无效
        app.dispatch_at(Action::Copy, now + Duration::from_millis(100));
        assert_eq!(clipboard.written.lock().unwrap().len(), 1);

        app.on_tick(now + COPIED_FEEDBACK - Duration::from_millis(1));
        assert!(app.is_copied());
        app.on_tick(now + COPIED_FEEDBACK);
        assert!(!app.is_copied());

        app.dispatch_at(Action::Copy, now + COPIED_FEEDBACK);
        assert_eq!(clipboard.written.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_copy_failure_goes_to_status_line() {
        let mut app = static_app().with_clipboard(Box::new(FakeClipboard::failing()));
        let now = shown(&mut app);

        app.dispatch_at(Action::Copy, now);
        assert!(!app.is_copied());
        let message = app.message.clone().unwrap();
        assert!(message.starts_with(Locale::En.strings().clipboard_failed));
        assert!(message.contains("no display"));
    }

    #[tokio::test]
    async fn test_backend_fetch_and_last_shown() {
        let api = Arc::new(FakeApi::with_randoms(vec![json!({
            "en": "remote",
            "author": "Server",
            "category": "Life",
            "index": 3
        })]));
        let mut app = backend_app(api.clone());
        let now = Instant::now();
        app.start(now);
        settle().await;

        app.on_tick(later(now));
        assert_eq!(app.controller.view().en, "“remote”");
        assert_eq!(app.controller.view().credit, "— Server");
        assert_eq!(
            app.session.last_shown().map(|k| k.as_str()),
            Some("remote||Server||")
        );
        assert_eq!(api.random_calls.lock().unwrap()[0].as_deref(), Some("Life"));
    }

    #[tokio::test]
    async fn test_backend_failure_shows_error() {
        let api = Arc::new(FakeApi::default());
        let mut app = backend_app(api);
        let now = Instant::now();
        app.start(now);
        settle().await;

        app.on_tick(later(now));
        assert_eq!(app.controller.phase(), Phase::Error);
        assert_eq!(app.controller.view().en, Locale::En.strings().error);
        assert!(app.controller.view().random_enabled);
    }

    #[tokio::test]
    async fn test_superseded_backend_request_is_discarded() {
        let api = Arc::new(FakeApi {
            gate: Some(Notify::new()),
            ..FakeApi::with_randoms(vec![json!({ "en": "only" })])
        });
        let mut app = backend_app(api.clone());
        let now = Instant::now();

        app.start(now);
        settle().await;
        let first = app.controller.in_flight().unwrap();

        // 第一个请求还挂着时切换分类
        app.dispatch_at(Action::NextCategory, now);
        settle().await;
        let second = app.controller.in_flight().unwrap();
        assert_ne!(first, second);

        api.gate.as_ref().unwrap().notify_waiters();
        settle().await;

        app.on_tick(later(now));
        assert_eq!(app.controller.view().en, "“only”");
        assert_eq!(app.session.active_category(), Some("Work"));
        assert_eq!(
            api.random_calls.lock().unwrap().as_slice(),
            &[Some("Life".to_string()), Some("Work".to_string())]
        );
    }
}
