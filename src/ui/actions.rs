//! Action 枚举定义 (Intent)
//!
//! 按键转化为明确的语义化 Action

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    RandomQuote,

    // 分类切换
    NextCategory,
    PrevCategory,
    SelectCategory(usize),

    Copy,
    OpenMore,
    CloseMore,
    ToggleTheme,
}
