//! JSON 文件存储
//!
//! 启动时整表读入内存，每次写操作后把整表写回文件。
//! 写入先落到同目录的临时文件再改名，避免进程中断留下半个文件。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{LedgerError, StoreError};
use crate::models::{Recipe, RecipeDraft, RecipeId, RunCounters, RunId, ScrapeRun, SourceId};
use crate::store::memory::{RecipeTable, RunTable};
use crate::store::{RecipeStore, RunLedger};

/// 文件不存在时返回空表
async fn load_table<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    };

    if !fs::try_exists(path).await.map_err(io_err)? {
        debug!("存储文件不存在，使用空表: {}", path.display());
        return Ok(T::default());
    }

    let content = fs::read_to_string(path).await.map_err(io_err)?;
    serde_json::from_str(&content).map_err(|source| StoreError::Serialize {
        path: path.display().to_string(),
        source,
    })
}

async fn save_table<T: Serialize>(path: &Path, table: &T) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    };

    let json = serde_json::to_string_pretty(table).map_err(|source| StoreError::Serialize {
        path: path.display().to_string(),
        source,
    })?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).await.map_err(io_err)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).await.map_err(io_err)?;
    fs::rename(&tmp, path).await.map_err(io_err)?;
    Ok(())
}

/// 菜谱存储（recipes.json）
#[derive(Debug)]
pub struct JsonFileRecipeStore {
    path: PathBuf,
    table: Mutex<RecipeTable>,
}

impl JsonFileRecipeStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let table: RecipeTable = load_table(&path).await?;
        info!("📦 已加载 {} 个菜谱: {}", table.len(), path.display());
        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 在表副本上修改，落盘成功后才替换内存中的表
    async fn write<F>(&self, change: F) -> Result<Recipe, StoreError>
    where
        F: FnOnce(&mut RecipeTable) -> Result<Recipe, StoreError> + Send,
    {
        let mut table = self.table.lock().await;
        let mut next = table.clone();
        let recipe = change(&mut next)?;
        save_table(&self.path, &next).await?;
        *table = next;
        Ok(recipe)
    }
}

#[async_trait]
impl RecipeStore for JsonFileRecipeStore {
    async fn find_by_source_url(&self, url: &str) -> Result<Option<Recipe>, StoreError> {
        Ok(self.table.lock().await.find_by_source_url(url).cloned())
    }

    async fn insert(&self, draft: RecipeDraft) -> Result<Recipe, StoreError> {
        self.write(|table| table.insert(draft, Utc::now())).await
    }

    async fn update(&self, id: RecipeId, draft: RecipeDraft) -> Result<Recipe, StoreError> {
        self.write(|table| table.update(id, draft, Utc::now())).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.table.lock().await.len())
    }
}

/// 运行记录（scrape_runs.json）
#[derive(Debug)]
pub struct JsonFileRunLedger {
    path: PathBuf,
    table: Mutex<RunTable>,
}

impl JsonFileRunLedger {
    /// 打开运行记录
    ///
    /// 单飞保证打开时没有运行在进行，文件里遗留的 IN_PROGRESS
    /// 都来自上次中断的进程，统一标记为 FAILED 后写回。
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut table: RunTable = load_table(&path).await?;

        let interrupted = table.fail_interrupted(Utc::now());
        if interrupted > 0 {
            warn!("⚠️ {} 条运行记录上次未结束，已标记为失败", interrupted);
            save_table(&path, &table).await?;
        }

        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    async fn write<T, F>(&self, change: F) -> Result<T, LedgerError>
    where
        T: Send,
        F: FnOnce(&mut RunTable) -> Result<T, LedgerError> + Send,
    {
        let mut table = self.table.lock().await;
        let mut next = table.clone();
        let out = change(&mut next)?;
        save_table(&self.path, &next).await?;
        *table = next;
        Ok(out)
    }
}

#[async_trait]
impl RunLedger for JsonFileRunLedger {
    async fn begin(&self, source: SourceId) -> Result<RunId, LedgerError> {
        self.write(|table| table.begin(source, Utc::now())).await
    }

    async fn complete(&self, id: RunId, counters: RunCounters) -> Result<ScrapeRun, LedgerError> {
        self.write(|table| table.complete(id, counters, Utc::now()))
            .await
    }

    async fn fail(&self, id: RunId, error: &str) -> Result<ScrapeRun, LedgerError> {
        self.write(|table| table.fail(id, error, Utc::now())).await
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunStatus;
    use crate::store::memory::INTERRUPTED_MESSAGE;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "recipe_scraper_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn draft(url: &str) -> RecipeDraft {
        RecipeDraft::new(
            SourceId::BbcGoodFood,
            url,
            "Air fryer chips",
            vec!["1kg potatoes".into()],
            vec!["Cut".into(), "Air fry".into()],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_recipes_survive_reopen() {
        let dir = temp_dir("recipes");
        let path = dir.join("recipes.json");
        let url = "https://www.bbc.co.uk/food/recipes/air_fryer_chips";

        let store = JsonFileRecipeStore::open(&path).await.unwrap();
        let inserted = store.insert(draft(url)).await.unwrap();
        drop(store);

        let reopened = JsonFileRecipeStore::open(&path).await.unwrap();
        let found = reopened.find_by_source_url(url).await.unwrap().unwrap();
        assert_eq!(found.id, inserted.id);

        // ID 在重新打开后继续递增
        let other = reopened
            .insert(draft("https://www.bbc.co.uk/food/recipes/air_fryer_wedges"))
            .await
            .unwrap();
        assert_ne!(other.id, inserted.id);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_file_untouched() {
        let dir = temp_dir("rejected");
        let path = dir.join("recipes.json");

        let store = JsonFileRecipeStore::open(&path).await.unwrap();
        let mut bad = draft("https://www.bbc.co.uk/food/recipes/x");
        bad.ingredients.clear();
        assert!(store.insert(bad).await.is_err());
        assert!(!path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_runs_survive_reopen() {
        let dir = temp_dir("runs");
        let path = dir.join("scrape_runs.json");

        let ledger = JsonFileRunLedger::open(&path).await.unwrap();
        let id = ledger.begin(SourceId::Tesco).await.unwrap();
        ledger.fail(id, "cancelled").await.unwrap();
        drop(ledger);

        let reopened = JsonFileRunLedger::open(&path).await.unwrap();
        let run = reopened.latest(None).await.unwrap().unwrap();
        assert_eq!(run.id, id);
        assert_eq!(run.status, RunStatus::Failed);
        assert!(matches!(
            reopened.complete(id, RunCounters::default()).await,
            Err(LedgerError::AlreadyTerminal(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_interrupted_run_is_failed_on_reopen() {
        let dir = temp_dir("interrupted");
        let path = dir.join("scrape_runs.json");

        let ledger = JsonFileRunLedger::open(&path).await.unwrap();
        let id = ledger.begin(SourceId::Tesco).await.unwrap();
        drop(ledger);

        let reopened = JsonFileRunLedger::open(&path).await.unwrap();
        let run = reopened.latest(Some(SourceId::Tesco)).await.unwrap().unwrap();
        assert_eq!(run.id, id);
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.error_message.as_deref(), Some(INTERRUPTED_MESSAGE));
        assert!(run.completed_at.is_some());

        let next = reopened.begin(SourceId::Tesco).await.unwrap();
        assert_ne!(next, id);
        drop(reopened);

        // 修复结果已经写回文件
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(INTERRUPTED_MESSAGE));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
