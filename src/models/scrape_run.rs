//! 抓取运行记录

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SourceId;

/// 运行记录 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl RunStatus {
    /// COMPLETED / FAILED 为终态
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

/// 一次运行的计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    pub found: u32,
    pub added: u32,
    pub updated: u32,
    pub failed: u32,
}

/// 单个来源的一次抓取记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRun {
    pub id: RunId,
    pub source: SourceId,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub recipes_found: u32,
    pub recipes_added: u32,
    pub recipes_updated: u32,
    pub recipes_failed: u32,
    pub error_message: Option<String>,
}

impl ScrapeRun {
    /// 新建进行中的运行
    pub fn start(id: RunId, source: SourceId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            source,
            status: RunStatus::InProgress,
            started_at: now,
            completed_at: None,
            recipes_found: 0,
            recipes_added: 0,
            recipes_updated: 0,
            recipes_failed: 0,
            error_message: None,
        }
    }

    pub fn counters(&self) -> RunCounters {
        RunCounters {
            found: self.recipes_found,
            added: self.recipes_added,
            updated: self.recipes_updated,
            failed: self.recipes_failed,
        }
    }
}
