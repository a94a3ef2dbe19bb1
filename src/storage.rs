use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::ui::theme::Theme;

/// TOML文件结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiStateData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    pub meta: StateMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateMeta {
    pub version: String,
    pub created_at: DateTime<Local>,
    pub last_modified: DateTime<Local>,
}

impl Default for UiStateData {
    fn default() -> Self {
        let now = Local::now();
        Self {
            theme: None,
            meta: StateMeta {
                version: "1.0".to_string(),
                created_at: now,
                last_modified: now,
            },
        }
    }
}

/// 运行时的持久化界面状态
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub data: UiStateData,
    pub dirty: bool,
}

impl UiState {
    pub fn theme(&self) -> Option<Theme> {
        self.data.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.data.theme != Some(theme) {
            self.data.theme = Some(theme);
            self.dirty = true;
        }
    }
}

/// 从TOML文件加载界面状态
pub fn load_state(path: &Path) -> io::Result<UiState> {
    if !path.exists() {
        return Ok(UiState::default());
    }

    let content = fs::read_to_string(path)?;
    let data: UiStateData =
        toml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    Ok(UiState { data, dirty: false })
}

/// 保存界面状态到TOML文件
pub fn save_state(state: &mut UiState, path: &Path) -> io::Result<()> {
    if !state.dirty {
        return Ok(());
    }

    state.data.meta.last_modified = Local::now();
    let content = toml::to_string_pretty(&state.data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    state.dirty = false;
    Ok(())
}
