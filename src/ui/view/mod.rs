//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};

use super::state::{App, AppMode};
use super::theme::{Palette, Theme};
use crate::controller::Phase;
use components::{action_hint, render_dialog_framework};
use layouts::centered_rect;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &App) {
    let palette = app.theme.palette();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Length(3), // 分类
            Constraint::Min(7),    // 名言
            Constraint::Length(3), // 操作
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, app, chunks[0], palette);
    render_tabs(frame, app, chunks[1], palette);
    render_quote(frame, app, chunks[2], palette);
    render_actions(frame, app, chunks[3], palette);
    render_help(frame, app, chunks[4], palette);

    // 渲染弹窗
    if app.mode == AppMode::MorePanel {
        render_more_panel(frame, app, palette);
    }
}

fn bordered(palette: Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
}

fn render_title(frame: &mut Frame, app: &App, area: Rect, palette: Palette) {
    let strings = app.locale.strings();
    let source = if app.session.is_backend() {
        "api"
    } else {
        "local"
    };
    let mut spans = vec![
        Span::styled(
            format!("❝ {}", strings.app_title),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  · {source}"), Style::default().fg(palette.muted)),
    ];
    if app.controller.phase() == Phase::Fetching {
        spans.push(Span::styled(
            format!("  {}", strings.loading),
            Style::default().fg(palette.secondary),
        ));
    }
    let line = Line::from(spans);
    frame.render_widget(Paragraph::new(line).block(bordered(palette)), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect, palette: Palette) {
    let titles: Vec<String> = app
        .session
        .categories()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if i < 9 {
                format!("{} {}", i + 1, name)
            } else {
                name.clone()
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(bordered(palette).title(app.locale.strings().category))
        .style(Style::default().fg(palette.secondary))
        .highlight_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .select(app.session.active_index().unwrap_or(0));

    frame.render_widget(tabs, area);
}

fn render_quote(frame: &mut Frame, app: &App, area: Rect, palette: Palette) {
    let view = app.controller.view();

    let mut en_style = Style::default()
        .fg(palette.text)
        .add_modifier(Modifier::BOLD);
    let mut th_style = Style::default().fg(palette.secondary);
    let mut credit_style = Style::default()
        .fg(palette.secondary)
        .add_modifier(Modifier::ITALIC);
    if app.controller.is_dimmed() {
        en_style = en_style.fg(palette.muted).add_modifier(Modifier::DIM);
        th_style = th_style.fg(palette.muted).add_modifier(Modifier::DIM);
        credit_style = credit_style.fg(palette.muted).add_modifier(Modifier::DIM);
    }

    let lines = vec![
        Line::from(Span::styled(view.en.clone(), en_style)),
        Line::default(),
        Line::from(Span::styled(view.th.clone(), th_style)),
        Line::default(),
        Line::from(Span::styled(view.credit.clone(), credit_style)),
    ];

    let quote = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(bordered(palette));
    frame.render_widget(quote, area);
}

fn render_actions(frame: &mut Frame, app: &App, area: Rect, palette: Palette) {
    let strings = app.locale.strings();
    let view = app.controller.view();

    let random_label = if view.random_busy {
        strings.randomizing
    } else {
        strings.random
    };
    let copy_label = if app.is_copied() {
        strings.copied
    } else {
        strings.copy
    };
    let theme_label = match app.theme {
        Theme::Dark => strings.switch_to_light,
        Theme::Light => strings.switch_to_dark,
    };

    let mut spans = Vec::new();
    spans.extend(action_hint("Space", random_label, view.random_enabled, palette));
    spans.extend(action_hint(
        "c",
        copy_label,
        view.copy_enabled && !app.is_copied(),
        palette,
    ));
    spans.extend(action_hint("m", strings.more, view.more_enabled, palette));
    spans.extend(action_hint("t", theme_label, true, palette));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(bordered(palette)),
        area,
    );
}

fn render_help(frame: &mut Frame, app: &App, area: Rect, palette: Palette) {
    let strings = app.locale.strings();
    let help_text = match app.mode {
        AppMode::Normal => format!("[←/→] {}  [1-9]  [q] {}", strings.category, strings.quit),
        AppMode::MorePanel => format!("[Esc] {}", strings.close),
    };

    let text = match app.message.as_deref() {
        Some(message) if !message.is_empty() => format!("{help_text}  |  {message}"),
        _ => help_text,
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(palette.muted))
        .block(bordered(palette));
    frame.render_widget(help, area);
}

/// 更多信息面板的文本行
fn more_panel_lines(app: &App, palette: Palette) -> Vec<Line<'static>> {
    let strings = app.locale.strings();
    let Some(quote) = app.current_quote() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    if !quote.work.is_empty() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", strings.source_prefix),
                Style::default().fg(palette.secondary),
            ),
            Span::styled(
                quote.work.clone(),
                Style::default()
                    .fg(palette.text)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::default());
    }
    if !quote.info.is_empty() {
        lines.push(Line::from(Span::styled(
            quote.info.clone(),
            Style::default().fg(palette.text),
        )));
        lines.push(Line::default());
    }
    if !quote.reference.is_empty() {
        let reference_style = if quote.reference.starts_with("http") {
            Style::default()
                .fg(palette.link)
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(palette.text)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", strings.reference_prefix),
                Style::default().fg(palette.secondary),
            ),
            Span::styled(quote.reference.clone(), reference_style),
        ]));
    }
    lines
}

fn render_more_panel(frame: &mut Frame, app: &App, palette: Palette) {
    let area = centered_rect(70, 50, frame.area());
    let inner = render_dialog_framework(frame, area, app.locale.strings().more_title, palette);

    let [body, hint] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .areas(inner);

    frame.render_widget(
        Paragraph::new(more_panel_lines(app, palette)).wrap(Wrap { trim: true }),
        body,
    );
    frame.render_widget(
        Paragraph::new(format!("[Esc] {}", app.locale.strings().close))
            .style(Style::default().fg(palette.muted)),
        hint,
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;
    use tokio::runtime::Handle;

    use super::*;
    use crate::clipboard::tests::FakeClipboard;
    use crate::locale::Locale;
    use crate::session::Session;
    use crate::source::SourceMode;
    use crate::source::tests::FakeApi;
    use crate::storage::UiState;
    use crate::store::{QuoteBundle, QuoteStore};
    use crate::ui::actions::Action;
    use crate::ui::state::AppOptions;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_render_quote_and_more_panel() {
        let bundle = QuoteBundle::from_value(json!([{
            "en": "Hello",
            "author": "Ada",
            "work": "Notes",
            "ref": "https://example.com",
            "cat": "Life"
        }]))
        .unwrap();
        let store = QuoteStore::from_bundle(bundle);
        let categories = store.categories();
        let session = Session::new(
            Arc::new(FakeApi::default()),
            SourceMode::Static(store),
            categories,
            StdRng::seed_from_u64(3),
        );
        let options = AppOptions {
            locale: Locale::En,
            theme: Theme::Light,
            transition: Duration::from_millis(10),
        };
        let mut app = App::new(session, UiState::default(), options, Handle::current())
            .with_clipboard(Box::new(FakeClipboard::default()));

        let now = Instant::now();
        app.start(now);
        app.on_tick(now + Duration::from_millis(100));

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Hello"));
        assert!(text.contains("Ada"));
        assert!(text.contains("Life"));
        assert!(!text.contains("Copied ✓"));

        app.dispatch(Action::Copy);
        terminal.draw(|f| render(f, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("Copied ✓"));

        app.dispatch(Action::OpenMore);
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Notes"));
        assert!(text.contains("https://example.com"));
    }
}
