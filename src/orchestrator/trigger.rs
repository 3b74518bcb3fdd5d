//! 抓取触发请求
//!
//! 外部入口（命令行、定时任务）先构造 [`ScrapeTrigger`]，校验通过后才交给编排层。

use serde::Serialize;

use crate::error::TriggerError;
use crate::models::SourceId;

pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 50;
/// 未指定时每个来源抓取的数量
pub const DEFAULT_LIMIT: u32 = 10;
/// 定时任务每个来源抓取的数量
pub const SCHEDULED_LIMIT: u32 = 15;
/// 手动快速运行每个来源抓取的数量
pub const MANUAL_LIMIT: u32 = 5;

/// 抓取目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrapeTarget {
    All,
    Source(SourceId),
}

/// 已校验的触发请求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeTrigger {
    pub target: ScrapeTarget,
    pub limit: u32,
}

impl ScrapeTrigger {
    /// 校验并构造
    ///
    /// `source` 为空表示全部来源；`limit` 为空取 [`DEFAULT_LIMIT`]。
    pub fn new(source: Option<&str>, limit: Option<u32>) -> Result<Self, TriggerError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            return Err(TriggerError::LimitOutOfRange {
                value: limit,
                min: MIN_LIMIT,
                max: MAX_LIMIT,
            });
        }

        let target = match source {
            None => ScrapeTarget::All,
            Some(name) => SourceId::find(name)
                .map(ScrapeTarget::Source)
                .ok_or_else(|| TriggerError::UnknownSource(name.to_string()))?,
        };

        Ok(Self { target, limit })
    }

    /// 定时任务：全部来源
    pub fn scheduled() -> Self {
        Self {
            target: ScrapeTarget::All,
            limit: SCHEDULED_LIMIT,
        }
    }

    /// 手动快速运行
    pub fn manual(source: Option<SourceId>) -> Self {
        Self {
            target: source.map_or(ScrapeTarget::All, ScrapeTarget::Source),
            limit: MANUAL_LIMIT,
        }
    }

    pub fn describe(&self) -> String {
        match self.target {
            ScrapeTarget::All => "全部来源".to_string(),
            ScrapeTarget::Source(id) => id.display_name().to_string(),
        }
    }
}
