//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use std::io;

use crossterm::event::KeyCode;

use super::actions::Action;
use super::state::{App, AppMode};

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(mode: &AppMode, key: KeyCode) -> Option<Action> {
    match mode {
        AppMode::Normal => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('r') => Some(Action::RandomQuote),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => Some(Action::NextCategory),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => Some(Action::PrevCategory),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c.to_digit(10)? as usize - 1;
                Some(Action::SelectCategory(index))
            }
            KeyCode::Char('c') => Some(Action::Copy),
            KeyCode::Char('m') | KeyCode::Char('i') => Some(Action::OpenMore),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            _ => None,
        },
        AppMode::MorePanel => match key {
            KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('q') => Some(Action::CloseMore),
            _ => None,
        },
    }
}

/// 处理按键事件
pub fn handle_key_event(app: &mut App, key: KeyCode) -> io::Result<bool> {
    if let Some(action) = get_action(&app.mode, key) {
        Ok(app.dispatch(action))
    } else {
        Ok(false)
    }
}
