//! 单飞保护
//!
//! 同一进程内同一时间只允许一次抓取（`run_all` 或单独的 `run_source`）。
//! 取消是协作式的：编排层在页面之间、来源之间检查标志。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct RunGuard {
    running: AtomicBool,
    cancel_requested: AtomicBool,
}

impl RunGuard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 尝试占用，已被占用时返回 None
    pub fn try_acquire(self: &Arc<Self>) -> Option<RunPermit> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.cancel_requested.store(false, Ordering::Release);
        Some(RunPermit {
            guard: Arc::clone(self),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// 请求取消当前运行，没有运行时返回 false
    pub fn cancel(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.cancel_requested.store(true, Ordering::Release);
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }
}

/// 占用凭证，Drop 时释放
#[derive(Debug)]
pub struct RunPermit {
    guard: Arc<RunGuard>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.guard.cancel_requested.store(false, Ordering::Release);
        self.guard.running.store(false, Ordering::Release);
    }
}
