//! 单个来源的抓取 - 编排层
//!
//! ## 流程
//!
//! 1. 运行记录 `begin`（IN_PROGRESS）
//! 2. 启动独占的浏览器会话
//! 3. `list()` 拿到菜谱链接
//! 4. 逐个 `fetch()` → 按来源 URL 新增或更新
//! 5. 无论成功失败都关闭会话
//! 6. 运行记录 `complete` 或 `fail`
//!
//! 单页失败只计数；来源级错误（列表页、导航重试耗尽、取消）中止剩余页面，
//! 已经写入的菜谱保留。

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::browser::{Navigator, RetryPolicy, SessionLauncher};
use crate::config::Config;
use crate::error::{OrchestratorError, ScrapeError, StoreError};
use crate::models::{RecipeDraft, RunCounters};
use crate::orchestrator::run_guard::RunGuard;
use crate::sources::RecipeSource;
use crate::store::{RecipeStore, RunLedger};
use crate::utils::truncate_text;

/// 节流与重试参数
#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    pub retry: RetryPolicy,
    pub navigation_timeout: Duration,
    /// 同一来源两个页面之间的间隔
    pub request_delay: Duration,
    /// 两个来源之间的间隔
    pub source_delay: Duration,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retry: config.retry_policy(),
            navigation_timeout: config.navigation_timeout(),
            request_delay: config.request_delay(),
            source_delay: config.source_delay(),
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 单个来源一次运行的结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
    pub added: u32,
    pub updated: u32,
    pub failed: u32,
    /// 列表页找到的链接数
    pub total: u32,
}

impl From<RunCounters> for SourceSummary {
    fn from(c: RunCounters) -> Self {
        Self {
            added: c.added,
            updated: c.updated,
            failed: c.failed,
            total: c.found,
        }
    }
}

/// 写入存储的结果
enum Upsert {
    Added,
    Updated,
}

/// 抓取一个来源需要的依赖
pub(crate) struct SourceRunner<'a> {
    pub launcher: &'a Arc<dyn SessionLauncher>,
    pub store: &'a Arc<dyn RecipeStore>,
    pub ledger: &'a Arc<dyn RunLedger>,
    pub guard: &'a RunGuard,
    pub settings: &'a RunSettings,
}

impl SourceRunner<'_> {
    /// 抓取一个来源并写运行记录
    ///
    /// 来源级失败时运行记录标记为 FAILED，并返回 [`OrchestratorError::SourceFailed`]。
    pub async fn run(
        &self,
        source: &dyn RecipeSource,
        limit: usize,
    ) -> Result<SourceSummary, OrchestratorError> {
        let source_id = source.id();
        let run_id = self.ledger.begin(source_id).await?;
        debug!("[{}] 运行记录 {} 已创建", source_id, run_id);

        let mut counters = RunCounters::default();
        match self.scrape(source, limit, &mut counters).await {
            Ok(()) => match self.ledger.complete(run_id, counters).await {
                Ok(_) => Ok(counters.into()),
                Err(e) => {
                    // 完成记录写不进去时尽量收尾，不留下 IN_PROGRESS
                    error!("[{}] ❌ 写入完成记录失败: {}", source_id, e);
                    if let Err(fail_err) = self.ledger.fail(run_id, &e.to_string()).await {
                        error!("[{}] ❌ 写入失败记录失败: {}", source_id, fail_err);
                    }
                    Err(e.into())
                }
            },
            Err(error) => {
                error!(
                    "[{}] ❌ 抓取中止: {} (已新增 {} / 已更新 {})",
                    source_id, error, counters.added, counters.updated
                );
                if let Err(e) = self.ledger.fail(run_id, &error.to_string()).await {
                    error!("[{}] ❌ 写入失败记录失败: {}", source_id, e);
                }
                Err(OrchestratorError::SourceFailed { source_id, error })
            }
        }
    }

    /// 启动会话并抓取，会话在所有路径上关闭
    async fn scrape(
        &self,
        source: &dyn RecipeSource,
        limit: usize,
        counters: &mut RunCounters,
    ) -> Result<(), ScrapeError> {
        if self.guard.is_cancelled() {
            return Err(ScrapeError::Cancelled);
        }

        let session = self.launcher.launch().await?;
        let mut nav = Navigator::new(
            session,
            self.settings.retry,
            self.settings.navigation_timeout,
        );

        let result = self.scrape_pages(source, &mut nav, limit, counters).await;
        nav.close().await;
        result
    }

    async fn scrape_pages(
        &self,
        source: &dyn RecipeSource,
        nav: &mut Navigator,
        limit: usize,
        counters: &mut RunCounters,
    ) -> Result<(), ScrapeError> {
        let source_id = source.id();
        let urls = source.list(nav, limit).await?;
        counters.found = urls.len() as u32;

        for (index, url) in urls.iter().enumerate() {
            if index > 0 {
                sleep(self.settings.request_delay).await;
            }
            if self.guard.is_cancelled() {
                warn!("[{}] ⚠️ 收到取消请求，停止抓取", source_id);
                return Err(ScrapeError::Cancelled);
            }

            info!("[{}] 📄 {}/{}: {}", source_id, index + 1, urls.len(), url);

            match source.fetch(nav, url).await {
                Ok(Some(draft)) => {
                    let title = truncate_text(&draft.title, 40);
                    match upsert(self.store.as_ref(), draft).await {
                        Ok(Upsert::Added) => {
                            counters.added += 1;
                            info!("[{}] ✅ 新增: {}", source_id, title);
                        }
                        Ok(Upsert::Updated) => {
                            counters.updated += 1;
                            info!("[{}] 🔄 更新: {}", source_id, title);
                        }
                        Err(e) => {
                            counters.failed += 1;
                            error!("[{}] ❌ 保存失败 {}: {}", source_id, url, e);
                        }
                    }
                }
                Ok(None) => {
                    counters.failed += 1;
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    counters.failed += 1;
                    warn!("[{}] ⚠️ 跳过 {}: {}", source_id, url, e);
                }
            }
        }

        Ok(())
    }
}

/// 按来源 URL 新增或覆盖
async fn upsert(store: &dyn RecipeStore, draft: RecipeDraft) -> Result<Upsert, StoreError> {
    match store.find_by_source_url(&draft.source_url).await? {
        Some(existing) => {
            store.update(existing.id, draft).await?;
            Ok(Upsert::Updated)
        }
        None => {
            store.insert(draft).await?;
            Ok(Upsert::Added)
        }
    }
}
