//! 带重试的页面导航
//!
//! 持有一次适配器调用独占的浏览器会话，只暴露"打开页面并读出 HTML"的能力。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::browser::retry::{retry_with_backoff, RetryError, RetryPolicy};
use crate::browser::session::BrowserSession;
use crate::error::BrowserError;

/// 导航器
pub struct Navigator {
    session: Arc<Mutex<Box<dyn BrowserSession>>>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl Navigator {
    pub fn new(session: Box<dyn BrowserSession>, policy: RetryPolicy, timeout: Duration) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            policy,
            timeout,
        }
    }

    /// 导航到 `url`，失败按策略重试
    ///
    /// 重试耗尽返回 [`BrowserError::NavigationExhausted`]。
    pub async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let timeout = self.timeout;
        let result = retry_with_backoff(
            self.policy,
            url,
            |_| {
                let session = Arc::clone(&self.session);
                let url = url.to_string();
                async move { session.lock().await.goto(&url, timeout).await }
            },
            BrowserError::is_retryable,
        )
        .await;

        match result {
            Ok(()) => {
                debug!("已导航到: {}", url);
                Ok(())
            }
            Err(RetryError::Terminal(e)) => Err(e),
            Err(RetryError::Exhausted { attempts, last }) => {
                Err(BrowserError::NavigationExhausted {
                    url: url.to_string(),
                    attempts,
                    last_error: last.to_string(),
                })
            }
        }
    }

    /// 导航并读取 HTML
    pub async fn load(&mut self, url: &str) -> Result<String, BrowserError> {
        self.navigate(url).await?;
        self.html().await
    }

    /// 等待选择器出现
    pub async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        self.session
            .lock()
            .await
            .wait_for_selector(selector, timeout)
            .await
    }

    /// 读取当前页面 HTML
    pub async fn html(&mut self) -> Result<String, BrowserError> {
        self.session.lock().await.html().await
    }

    /// 关闭会话，关闭失败只记录日志
    pub async fn close(self) {
        let session = match Arc::try_unwrap(self.session) {
            Ok(mutex) => mutex.into_inner(),
            Err(_) => {
                warn!("⚠️ 浏览器会话仍被占用，交由 Drop 释放");
                return;
            }
        };
        if let Err(e) = session.close().await {
            warn!("⚠️ 关闭浏览器会话失败: {}", e);
        }
    }
}
