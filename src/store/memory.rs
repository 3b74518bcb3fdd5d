//! 内存存储
//!
//! [`RecipeTable`] / [`RunTable`] 是纯数据结构，规则都在这里；
//! JSON 文件实现复用同一套表，只多一步落盘。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{LedgerError, StoreError};
use crate::models::{Recipe, RecipeDraft, RecipeId, RunCounters, RunId, RunStatus, ScrapeRun, SourceId};
use crate::store::{RecipeStore, RunLedger};

/// 菜谱表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeTable {
    next_id: u64,
    recipes: Vec<Recipe>,
}

impl RecipeTable {
    pub fn find_by_source_url(&self, url: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.source_url == url)
    }

    pub fn insert(&mut self, draft: RecipeDraft, now: DateTime<Utc>) -> Result<Recipe, StoreError> {
        draft.validate().map_err(StoreError::IncompleteRecipe)?;
        if self.find_by_source_url(&draft.source_url).is_some() {
            return Err(StoreError::DuplicateSourceUrl(draft.source_url));
        }

        self.next_id += 1;
        let recipe = Recipe::from_draft(RecipeId(self.next_id), draft, now);
        self.recipes.push(recipe.clone());
        Ok(recipe)
    }

    pub fn update(
        &mut self,
        id: RecipeId,
        draft: RecipeDraft,
        now: DateTime<Utc>,
    ) -> Result<Recipe, StoreError> {
        draft.validate().map_err(StoreError::IncompleteRecipe)?;
        if self
            .recipes
            .iter()
            .any(|r| r.id != id && r.source_url == draft.source_url)
        {
            return Err(StoreError::DuplicateSourceUrl(draft.source_url));
        }

        let recipe = self
            .recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        recipe.apply_draft(draft, now);
        Ok(recipe.clone())
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }
}

/// 进程退出前没有结束的运行，重新打开时写入的错误信息
pub const INTERRUPTED_MESSAGE: &str = "运行被中断：进程在结束前退出";

/// 运行记录表，按开始顺序追加
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTable {
    next_id: u64,
    runs: Vec<ScrapeRun>,
}

impl RunTable {
    pub fn begin(&mut self, source: SourceId, now: DateTime<Utc>) -> Result<RunId, LedgerError> {
        if self
            .runs
            .iter()
            .any(|r| r.source == source && r.status == RunStatus::InProgress)
        {
            return Err(LedgerError::AlreadyInProgress(source));
        }

        self.next_id += 1;
        let id = RunId(self.next_id);
        self.runs.push(ScrapeRun::start(id, source, now));
        Ok(id)
    }

    pub fn complete(
        &mut self,
        id: RunId,
        counters: RunCounters,
        now: DateTime<Utc>,
    ) -> Result<ScrapeRun, LedgerError> {
        let run = self.open_run(id)?;
        run.status = RunStatus::Completed;
        run.completed_at = Some(now);
        run.recipes_found = counters.found;
        run.recipes_added = counters.added;
        run.recipes_updated = counters.updated;
        run.recipes_failed = counters.failed;
        Ok(run.clone())
    }

    pub fn fail(&mut self, id: RunId, error: &str, now: DateTime<Utc>) -> Result<ScrapeRun, LedgerError> {
        let run = self.open_run(id)?;
        run.status = RunStatus::Failed;
        run.completed_at = Some(now);
        run.error_message = Some(error.to_string());
        Ok(run.clone())
    }

    /// 把遗留的 IN_PROGRESS 记录全部标记为 FAILED，返回处理的条数
    pub fn fail_interrupted(&mut self, now: DateTime<Utc>) -> usize {
        let mut count = 0;
        for run in self
            .runs
            .iter_mut()
            .filter(|r| r.status == RunStatus::InProgress)
        {
            run.status = RunStatus::Failed;
            run.completed_at = Some(now);
            run.error_message = Some(INTERRUPTED_MESSAGE.to_string());
            count += 1;
        }
        count
    }

    pub fn latest(&self, source: Option<SourceId>) -> Option<ScrapeRun> {
        self.history(source, 1).into_iter().next()
    }

    pub fn history(&self, source: Option<SourceId>, limit: usize) -> Vec<ScrapeRun> {
        self.runs
            .iter()
            .rev()
            .filter(|r| source.map_or(true, |s| r.source == s))
            .take(limit)
            .cloned()
            .collect()
    }

    /// 终态记录不可再修改
    fn open_run(&mut self, id: RunId) -> Result<&mut ScrapeRun, LedgerError> {
        let run = self
            .runs
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(LedgerError::UnknownRun(id))?;
        if run.status.is_terminal() {
            return Err(LedgerError::AlreadyTerminal(id));
        }
        Ok(run)
    }
}

/// 内存菜谱存储
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    table: Mutex<RecipeTable>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前全部菜谱的快照
    pub async fn snapshot(&self) -> Vec<Recipe> {
        self.table.lock().await.recipes().to_vec()
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn find_by_source_url(&self, url: &str) -> Result<Option<Recipe>, StoreError> {
        Ok(self.table.lock().await.find_by_source_url(url).cloned())
    }

    async fn insert(&self, draft: RecipeDraft) -> Result<Recipe, StoreError> {
        self.table.lock().await.insert(draft, Utc::now())
    }

    async fn update(&self, id: RecipeId, draft: RecipeDraft) -> Result<Recipe, StoreError> {
        self.table.lock().await.update(id, draft, Utc::now())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.table.lock().await.len())
    }
}

/// 内存运行记录
#[derive(Debug, Default)]
pub struct MemoryRunLedger {
    table: Mutex<RunTable>,
}

impl MemoryRunLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RunLedger for MemoryRunLedger {
    async fn begin(&self, source: SourceId) -> Result<RunId, LedgerError> {
        self.table.lock().await.begin(source, Utc::now())
    }

    async fn complete(&self, id: RunId, counters: RunCounters) -> Result<ScrapeRun, LedgerError> {
        self.table.lock().await.complete(id, counters, Utc::now())
    }

    async fn fail(&self, id: RunId, error: &str) -> Result<ScrapeRun, LedgerError> {
        self.table.lock().await.fail(id, error, Utc::now())
    }

    async fn latest(&self, source: Option<SourceId>) -> Result<Option<ScrapeRun>, LedgerError> {
        Ok(self.table.lock().await.latest(source))
    }

    async fn history(
        &self,
        source: Option<SourceId>,
        limit: usize,
    ) -> Result<Vec<ScrapeRun>, LedgerError> {
        Ok(self.table.lock().await.history(source, limit))
    }
}
