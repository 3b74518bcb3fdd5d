//! 抓取服务 - 编排层
//!
//! ## 职责
//!
//! - 单飞：同一时间只有一次运行（[`RunGuard`]）
//! - `run_all`：按注册顺序逐个抓取来源，一个来源失败不影响后面的来源
//! - `run_source`：单独抓取一个来源
//! - 汇总运行记录，提供状态与历史查询
//!
//! 浏览器会话由 [`SourceRunner`] 按来源启动和关闭，本模块不持有浏览器。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::browser::SessionLauncher;
use crate::error::{OrchestratorError, ScrapeError};
use crate::models::{RunStatus, ScrapeRun, SourceId};
use crate::orchestrator::run_guard::{RunGuard, RunPermit};
use crate::orchestrator::source_runner::{RunSettings, SourceRunner, SourceSummary};
use crate::orchestrator::trigger::{ScrapeTarget, ScrapeTrigger};
use crate::sources::SourceRegistry;
use crate::store::{RecipeStore, RunLedger};
use crate::utils::logging;

/// `run_all` 中单个来源的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceOutcome {
    pub source: SourceId,
    pub summary: SourceSummary,
    /// 来源整体失败时的错误信息
    pub error: Option<String>,
}

/// `run_all` 的汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunAllSummary {
    pub per_source: Vec<SourceOutcome>,
    pub total_added: u32,
    pub total_updated: u32,
    pub total_failed: u32,
}

impl RunAllSummary {
    fn push(&mut self, outcome: SourceOutcome) {
        self.total_added += outcome.summary.added;
        self.total_updated += outcome.summary.updated;
        self.total_failed += outcome.summary.failed;
        self.per_source.push(outcome);
    }

    pub fn failed_sources(&self) -> usize {
        self.per_source.iter().filter(|o| o.error.is_some()).count()
    }
}

/// 触发请求的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TriggerOutcome {
    Source(SourceSummary),
    All(RunAllSummary),
}

/// 单个来源的累计统计（只统计 COMPLETED 的运行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceBreakdown {
    pub source: SourceId,
    pub recipes_stored: u32,
    pub failed_extractions: u32,
    pub runs: u32,
}

/// 抓取状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeStatus {
    pub running: bool,
    /// 新增 + 更新
    pub recipes_stored: u32,
    pub failed_extractions: u32,
    /// COMPLETED 的运行次数
    pub total_runs: u32,
    pub per_source: Vec<SourceBreakdown>,
    pub last_completed_at: Option<DateTime<Utc>>,
}

impl ScrapeStatus {
    /// 从运行记录汇总
    pub fn from_runs(running: bool, runs: &[ScrapeRun]) -> Self {
        let mut per_source: Vec<SourceBreakdown> = Vec::new();
        let mut status = ScrapeStatus {
            running,
            recipes_stored: 0,
            failed_extractions: 0,
            total_runs: 0,
            per_source: Vec::new(),
            last_completed_at: None,
        };

        for run in runs.iter().filter(|r| r.status == RunStatus::Completed) {
            let stored = run.recipes_added + run.recipes_updated;
            status.recipes_stored += stored;
            status.failed_extractions += run.recipes_failed;
            status.total_runs += 1;
            status.last_completed_at = status.last_completed_at.max(run.completed_at);

            match per_source.iter_mut().find(|b| b.source == run.source) {
                Some(breakdown) => {
                    breakdown.recipes_stored += stored;
                    breakdown.failed_extractions += run.recipes_failed;
                    breakdown.runs += 1;
                }
                None => per_source.push(SourceBreakdown {
                    source: run.source,
                    recipes_stored: stored,
                    failed_extractions: run.recipes_failed,
                    runs: 1,
                }),
            }
        }

        per_source.sort_by_key(|b| b.source);
        status.per_source = per_source;
        status
    }
}

/// 抓取编排器
pub struct Orchestrator {
    registry: SourceRegistry,
    launcher: Arc<dyn SessionLauncher>,
    store: Arc<dyn RecipeStore>,
    ledger: Arc<dyn RunLedger>,
    guard: Arc<RunGuard>,
    settings: RunSettings,
}

impl Orchestrator {
    pub fn new(
        registry: SourceRegistry,
        launcher: Arc<dyn SessionLauncher>,
        store: Arc<dyn RecipeStore>,
        ledger: Arc<dyn RunLedger>,
        settings: RunSettings,
    ) -> Self {
        Self {
            registry,
            launcher,
            store,
            ledger,
            guard: RunGuard::new(),
            settings,
        }
    }

    /// 共用外部的单飞保护（多个编排器实例共享同一把锁）
    pub fn with_run_guard(mut self, guard: Arc<RunGuard>) -> Self {
        self.guard = guard;
        self
    }

    pub fn run_guard(&self) -> &Arc<RunGuard> {
        &self.guard
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// 抓取单个来源
    pub async fn run_source(
        &self,
        source: SourceId,
        limit: u32,
    ) -> Result<SourceSummary, OrchestratorError> {
        let _permit = self.acquire()?;
        let adapter = self
            .registry
            .get(source)
            .ok_or(OrchestratorError::UnknownSource(source))?;

        logging::log_startup(source.display_name(), limit);
        let summary = self.runner().run(adapter.as_ref(), limit as usize).await?;
        logging::log_source_complete(
            source.display_name(),
            summary.added,
            summary.updated,
            summary.failed,
            summary.total,
        );
        Ok(summary)
    }

    /// 按注册顺序抓取全部来源
    pub async fn run_all(&self, limit_per_source: u32) -> Result<RunAllSummary, OrchestratorError> {
        let _permit = self.acquire()?;
        logging::log_startup("全部来源", limit_per_source);

        let total = self.registry.len();
        let mut summary = RunAllSummary::default();
        let runner = self.runner();

        for (index, adapter) in self.registry.iter().enumerate() {
            let source = adapter.id();
            if index > 0 {
                sleep(self.settings.source_delay).await;
            }

            if self.guard.is_cancelled() {
                warn!("[{}] ⚠️ 运行已取消，跳过", source);
                summary.push(SourceOutcome {
                    source,
                    summary: SourceSummary::default(),
                    error: Some(ScrapeError::Cancelled.to_string()),
                });
                continue;
            }

            logging::log_source_start(index + 1, total, source.display_name());
            let outcome = match runner.run(adapter.as_ref(), limit_per_source as usize).await {
                Ok(s) => {
                    logging::log_source_complete(
                        source.display_name(),
                        s.added,
                        s.updated,
                        s.failed,
                        s.total,
                    );
                    SourceOutcome {
                        source,
                        summary: s,
                        error: None,
                    }
                }
                Err(e) => {
                    error!("[{}] ❌ 来源失败: {}", source, e);
                    SourceOutcome {
                        source,
                        summary: SourceSummary::default(),
                        error: Some(e.to_string()),
                    }
                }
            };
            summary.push(outcome);
        }

        logging::print_final_stats(
            summary.total_added,
            summary.total_updated,
            summary.total_failed,
            summary.failed_sources(),
        );
        Ok(summary)
    }

    /// 处理已校验的触发请求
    pub async fn handle(&self, trigger: ScrapeTrigger) -> Result<TriggerOutcome, OrchestratorError> {
        info!("📥 收到抓取请求: {} (limit {})", trigger.describe(), trigger.limit);
        match trigger.target {
            ScrapeTarget::All => self.run_all(trigger.limit).await.map(TriggerOutcome::All),
            ScrapeTarget::Source(id) => self
                .run_source(id, trigger.limit)
                .await
                .map(TriggerOutcome::Source),
        }
    }

    /// 汇总运行记录
    pub async fn status(&self) -> Result<ScrapeStatus, OrchestratorError> {
        let runs = self.ledger.history(None, usize::MAX).await?;
        Ok(ScrapeStatus::from_runs(self.guard.is_running(), &runs))
    }

    /// 最近的运行记录，新的在前
    pub async fn history(
        &self,
        source: Option<SourceId>,
        limit: usize,
    ) -> Result<Vec<ScrapeRun>, OrchestratorError> {
        Ok(self.ledger.history(source, limit).await?)
    }

    /// 请求取消当前运行，没有运行时返回 false
    pub fn cancel(&self) -> bool {
        let requested = self.guard.cancel();
        if requested {
            warn!("⚠️ 已请求取消当前抓取");
        }
        requested
    }

    fn acquire(&self) -> Result<RunPermit, OrchestratorError> {
        self.guard.try_acquire().ok_or_else(|| {
            warn!("⚠️ 抓取已在进行中，拒绝新的请求");
            OrchestratorError::AlreadyRunning
        })
    }

    fn runner(&self) -> SourceRunner<'_> {
        SourceRunner {
            launcher: &self.launcher,
            store: &self.store,
            ledger: &self.ledger,
            guard: &self.guard,
            settings: &self.settings,
        }
    }
}
