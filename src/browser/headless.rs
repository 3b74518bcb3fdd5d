use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, error, info};

use crate::browser::session::{BrowserSession, SessionLauncher};
use crate::config::Config;
use crate::error::BrowserError;

/// 轮询选择器的间隔
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 启动无头 Chromium 的启动器
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    executable: Option<PathBuf>,
    headless: bool,
    user_agent: String,
}

impl ChromeLauncher {
    pub fn new(config: &Config) -> Self {
        Self {
            executable: config.chrome_executable.clone(),
            headless: config.headless,
            user_agent: config.user_agent.clone(),
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder();
        builder = if self.headless {
            builder.new_headless_mode()
        } else {
            builder.with_head()
        };
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }

        builder
            .no_sandbox()
            .args(vec![
                "--disable-setuid-sandbox",
                "--disable-dev-shm-usage",      // 防止共享内存不足
                "--disable-accelerated-2d-canvas",
                "--disable-gpu",
            ])
            .build()
            .map_err(|message| BrowserError::LaunchFailed { message })
    }
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        info!("🚀 启动无头浏览器...");
        let config = self.browser_config()?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("启动无头浏览器失败: {}", e);
            BrowserError::LaunchFailed {
                message: e.to_string(),
            }
        })?;
        debug!("无头浏览器启动成功");

        // 在后台处理浏览器事件
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                error!("创建页面失败: {}", e);
                handler_task.abort();
                return Err(BrowserError::LaunchFailed {
                    message: e.to_string(),
                });
            }
        };

        // 设置 UA 避免被识别为爬虫，失败不影响使用
        if let Err(e) = page.set_user_agent(self.user_agent.clone()).await {
            debug!("设置 User-Agent 失败: {}", e);
        }

        Ok(Box::new(ChromeSession {
            browser: Some(browser),
            page: Some(page),
            handler: handler_task,
        }))
    }
}

/// chromiumoxide 会话
///
/// 正常路径走 [`BrowserSession::close`]；如果会话在出错时被直接丢弃，
/// `Drop` 会中止事件处理任务，浏览器进程随 `Browser` 一起释放。
pub struct ChromeSession {
    browser: Option<Browser>,
    page: Option<Page>,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    fn page(&self) -> Result<&Page, BrowserError> {
        self.page.as_ref().ok_or(BrowserError::SessionClosed)
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn goto(&mut self, url: &str, limit: Duration) -> Result<(), BrowserError> {
        let page = self.page()?;
        match timeout(limit, page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(BrowserError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms: limit.as_millis() as u64,
            }),
        }
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        limit: Duration,
    ) -> Result<(), BrowserError> {
        let page = self.page()?;
        let deadline = Instant::now() + limit;
        loop {
            if page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::SelectorTimeout {
                    selector: selector.to_string(),
                });
            }
            sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn html(&mut self) -> Result<String, BrowserError> {
        Ok(self.page()?.content().await?)
    }

    async fn close(mut self: Box<Self>) -> Result<(), BrowserError> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("关闭页面失败: {}", e);
            }
        }
        if let Some(mut browser) = self.browser.take() {
            browser.close().await?;
            if let Err(e) = browser.wait().await {
                debug!("等待浏览器进程退出失败: {}", e);
            }
        }
        self.handler.abort();
        debug!("浏览器会话已关闭");
        Ok(())
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
