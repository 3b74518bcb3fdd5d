//! 浏览器会话抽象 - 基础设施层
//!
//! 适配器只看得到这两个 trait，不直接接触 chromiumoxide，
//! 测试里用内存实现替换真实浏览器。

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BrowserError;

/// 一个独占的浏览器会话（一个浏览器实例 + 一个页面）
#[async_trait]
pub trait BrowserSession: Send {
    /// 单次导航，不重试，超过 `timeout` 视为失败
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// 等待选择器出现
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// 当前页面的 HTML
    async fn html(&mut self) -> Result<String, BrowserError>;

    /// 关闭会话并释放浏览器进程
    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

/// 会话启动器，每次适配器调用启动一个新会话
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}
