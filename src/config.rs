use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::locale::Locale;
use crate::source::BundleLocation;
use crate::ui::theme::Theme;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 指定路径 > QUOTEDECK_CONFIG > 配置目录；文件不存在时使用默认值
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = select_config_path(
            explicit,
            env::var_os(CONFIG_ENV).map(PathBuf::from),
            dirs::config_dir(),
        );
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(AppConfig::default());
        }
        let raw = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file {}", config_path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse TOML from {}", config_path.display()))
    }

    /// 命令行参数覆盖配置文件
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.source.base_url = base_url;
        }
        if let Some(bundle) = overrides.bundle {
            self.source.bundle = Some(bundle);
        }
        if let Some(locale) = overrides.locale {
            self.ui.locale = locale;
        }
        if overrides.force_static {
            self.source.force_static = true;
        }
    }
}

const CONFIG_ENV: &str = "QUOTEDECK_CONFIG";

/// 来自命令行的覆盖项
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub bundle: Option<PathBuf>,
    pub locale: Option<Locale>,
    pub force_static: bool,
}

fn select_config_path(
    explicit: Option<&Path>,
    env_path: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = env_path {
        return path;
    }
    if let Some(base) = config_dir {
        return base.join("quotedeck").join("config.toml");
    }

    env::temp_dir().join("quotedeck.toml")
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 本地 quotes.json 路径；未设置时从 <base_url>/quotes.json 获取
    #[serde(default)]
    pub bundle: Option<PathBuf>,
    /// 跳过后端探测，直接使用静态模式
    #[serde(default)]
    pub force_static: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            bundle: None,
            force_static: false,
        }
    }
}

impl SourceConfig {
    pub fn bundle_location(&self) -> BundleLocation {
        match &self.bundle {
            Some(path) => BundleLocation::File(path.clone()),
            None => BundleLocation::Remote,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000/".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            locale: Locale::default(),
            transition_ms: default_transition_ms(),
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_transition_ms() -> u64 {
    300
}

fn default_tick_ms() -> u64 {
    50
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogConfig {
    /// 覆盖默认过滤器，例如 "quotedeck=debug"
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}
