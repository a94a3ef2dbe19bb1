//! 终端生命周期
//!
//! 进入原始模式与备用屏幕；正常退出、出错返回或 panic 时都恢复终端

use std::io;

use ratatui::DefaultTerminal;

/// 离开作用域时执行一次恢复动作
pub struct RestoreGuard<F: FnOnce()> {
    restore: Option<F>,
}

impl<F: FnOnce()> RestoreGuard<F> {
    pub fn new(restore: F) -> Self {
        Self {
            restore: Some(restore),
        }
    }
}

impl<F: FnOnce()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

/// 初始化终端；守卫先于初始化创建，初始化中途失败也会恢复
pub fn enter() -> io::Result<(DefaultTerminal, RestoreGuard<fn()>)> {
    let guard = RestoreGuard::new(ratatui::restore as fn());
    // try_init 同时安装 panic hook，在打印 panic 信息前恢复终端
    let terminal = ratatui::try_init()?;
    Ok((terminal, guard))
}
