//! 通用 UI 组件
//!
//! 弹窗框架、按键提示等通用组件

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear},
};

use crate::ui::theme::Palette;

/// [组件] 弹窗基础框架
pub fn render_dialog_framework(frame: &mut Frame, area: Rect, title: &str, palette: Palette) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .style(
            Style::default()
                .fg(palette.accent)
                .bg(palette.background),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// [组件] 按键提示 "[key] label"，不可用时置灰
pub fn action_hint(key: &str, label: &str, enabled: bool, palette: Palette) -> Vec<Span<'static>> {
    let (key_style, label_style) = if enabled {
        (
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(palette.text),
        )
    } else {
        (
            Style::default().fg(palette.muted),
            Style::default().fg(palette.muted),
        )
    };

    vec![
        Span::styled(format!("[{key}] "), key_style),
        Span::styled(label.to_string(), label_style),
        Span::raw("   "),
    ]
}
