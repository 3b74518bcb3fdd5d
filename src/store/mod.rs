//! 存储层
//!
//! - [`RecipeStore`]：菜谱集合，按来源 URL 唯一
//! - [`RunLedger`]：只追加的运行记录
//!
//! 两种实现：进程内存（测试、单次运行）和 JSON 文件快照。

pub mod json_file;
pub mod memory;

use async_trait::async_trait;

use crate::error::{LedgerError, StoreError};
use crate::models::{Recipe, RecipeDraft, RecipeId, RunCounters, RunId, ScrapeRun, SourceId};

pub use json_file::{JsonFileRecipeStore, JsonFileRunLedger};
pub use memory::{MemoryRecipeStore, MemoryRunLedger, RecipeTable, RunTable, INTERRUPTED_MESSAGE};

/// 菜谱存储
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn find_by_source_url(&self, url: &str) -> Result<Option<Recipe>, StoreError>;

    /// 新增，ID 由存储分配
    async fn insert(&self, draft: RecipeDraft) -> Result<Recipe, StoreError>;

    /// 覆盖已有菜谱的内容
    async fn update(&self, id: RecipeId, draft: RecipeDraft) -> Result<Recipe, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}

/// 运行记录
#[async_trait]
pub trait RunLedger: Send + Sync {
    /// 为来源开始一次运行；该来源已有进行中的运行时拒绝
    async fn begin(&self, source: SourceId) -> Result<RunId, LedgerError>;

    async fn complete(&self, id: RunId, counters: RunCounters) -> Result<ScrapeRun, LedgerError>;

    async fn fail(&self, id: RunId, error: &str) -> Result<ScrapeRun, LedgerError>;

    /// 最近一次运行，`source` 为空时不区分来源
    async fn latest(&self, source: Option<SourceId>) -> Result<Option<ScrapeRun>, LedgerError>;

    /// 最近的运行，新的在前
    async fn history(
        &self,
        source: Option<SourceId>,
        limit: usize,
    ) -> Result<Vec<ScrapeRun>, LedgerError>;
}
