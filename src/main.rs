mod api;
mod clipboard;
mod config;
mod controller;
mod deck;
mod error;
mod locale;
mod logging;
mod models;
mod session;
mod source;
mod storage;
mod store;
mod terminal;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use tracing::{info, warn};

use crate::api::{HttpQuoteApi, QuoteApi};
use crate::config::{AppConfig, ConfigOverrides};
use crate::locale::Locale;
use crate::session::Session;
use crate::storage::{UiState, load_state, save_state};
use crate::ui::{App, AppOptions, render};

/// 终端里的随机名言
#[derive(Debug, Parser)]
#[command(name = "quotedeck", version)]
struct Cli {
    /// 配置文件路径
    #[arg(long)]
    config: Option<PathBuf>,

    /// 后端部署根地址，例如 http://host/app/
    #[arg(long)]
    base_url: Option<String>,

    /// 本地 quotes.json 路径
    #[arg(long)]
    quotes: Option<PathBuf>,

    #[arg(long, value_enum)]
    locale: Option<Locale>,

    /// 不探测后端，直接使用本地名言库
    #[arg(long = "static")]
    force_static: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            bundle: self.quotes.clone(),
            locale: self.locale,
            force_static: self.force_static,
        }
    }
}

/// 获取数据目录路径 (~/.local/share/quotedeck/)
fn get_data_dir() -> io::Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "cannot determine data directory"))?
        .join("quotedeck");

    fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.overrides());

    let logging = logging::init(&config.log);

    // 界面状态文件 (~/.local/share/quotedeck/state.toml)
    let state_path = get_data_dir()
        .context("failed to prepare data directory")?
        .join("state.toml");
    let ui_state = load_state(&state_path).unwrap_or_else(|err| {
        warn!(error = %err, path = %state_path.display(), "ignoring unreadable ui state");
        UiState::default()
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let api: Arc<dyn QuoteApi> = Arc::new(
        HttpQuoteApi::new(&config.source.base_url).context("invalid source.base_url")?,
    );
    let session = runtime.block_on(Session::bootstrap(
        api,
        &config.source.bundle_location(),
        !config.source.force_static,
    ));

    let options = AppOptions {
        locale: config.ui.locale,
        theme: ui_state.theme().unwrap_or(config.ui.theme),
        transition: Duration::from_millis(config.ui.transition_ms),
    };
    let mut app = App::new(session, ui_state, options, runtime.handle().clone());
    app.start(Instant::now());

    // 设置终端；守卫离开作用域时恢复
    let tick = Duration::from_millis(config.ui.tick_ms.max(1));
    let result = {
        let (mut terminal, _restore) =
            terminal::enter().context("failed to set up terminal")?;
        run_app(&mut terminal, &mut app, tick)
    };

    // 保存主题
    save_state(&mut app.ui_state, &state_path)
        .with_context(|| format!("failed to save {}", state_path.display()))?;
    if let Some(logging) = &logging {
        info!(log_dir = %logging.log_dir().display(), "exiting");
    }

    result.context("terminal event loop failed")
}

fn run_app(terminal: &mut DefaultTerminal, app: &mut App, tick: Duration) -> io::Result<()> {
    loop {
        app.on_tick(Instant::now());
        terminal.draw(|f| render(f, app))?;
        app.on_painted();

        if event::poll(tick)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && ui::handle_key_event(app, key.code)?
        {
            break;
        }
    }
    Ok(())
}
