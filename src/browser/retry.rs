//! 有界重试
//!
//! 尝试 → 判断是否可重试 → 线性递增等待 → 再试，最多 `max_attempts` 次。

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最多尝试次数（含第一次），至少为 1
    pub max_attempts: u32,
    /// 第 n 次失败后等待 `backoff_step * n`
    pub backoff_step: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_step: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_step,
        }
    }

    /// 第 `attempt` 次（从 1 开始）失败后的等待时间
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

/// 重试失败的结果
#[derive(Debug, PartialEq, Eq)]
pub enum RetryError<E> {
    /// 不可重试的错误，立即返回
    Terminal(E),
    /// 次数用尽，携带最后一次错误
    Exhausted { attempts: u32, last: E },
}

/// 按策略重试 `op`
///
/// `retryable` 返回 false 的错误不再重试。最后一次失败之后不再等待。
pub async fn retry_with_backoff<T, E, F, Fut, C>(
    policy: RetryPolicy,
    label: &str,
    mut op: F,
    retryable: C,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !retryable(&e) => return Err(RetryError::Terminal(e)),
            Err(e) => {
                warn!(
                    "⚠️ {} 第 {}/{} 次尝试失败: {}",
                    label, attempt, max_attempts, e
                );
                if attempt >= max_attempts {
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: e,
                    });
                }
                sleep(policy.backoff(attempt)).await;
                attempt += 1;
            }
        }
    }
}
