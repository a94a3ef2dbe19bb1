//! 剪贴板服务
//!
//! 封装系统剪贴板写入；首次使用时才连接系统剪贴板

use arboard::Clipboard;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard not available: {0}")]
    NotAvailable(String),
    #[error("failed to write clipboard: {0}")]
    SetFailed(String),
}

/// 剪贴板写入端
pub trait ClipboardWriter {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// 基于 arboard 的系统剪贴板
#[derive(Default)]
pub struct ClipboardService {
    clipboard: Option<Clipboard>,
}

impl ClipboardService {
    fn connect(&mut self) -> Result<&mut Clipboard, ClipboardError> {
        if self.clipboard.is_none() {
            let clipboard =
                Clipboard::new().map_err(|e| ClipboardError::NotAvailable(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| ClipboardError::NotAvailable("clipboard closed".to_string()))
    }
}

impl ClipboardWriter for ClipboardService {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.connect()?
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::SetFailed(e.to_string()))
    }
}
