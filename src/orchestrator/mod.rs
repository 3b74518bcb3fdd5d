//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责调度来源、管理浏览器会话生命周期和运行记录，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `scrape_service` - 抓取编排器
//! - 单飞保护（同一时间只有一次运行）
//! - 按顺序抓取全部来源，来源之间相互隔离
//! - 状态与历史查询
//!
//! ### `source_runner` - 单个来源
//! - 运行记录 begin / complete / fail
//! - 启动并关闭独占的浏览器会话
//! - 逐页抓取、按来源 URL 新增或更新
//!
//! ### `trigger` - 触发请求校验
//!
//! ### `run_guard` - 单飞与取消标志
//!
//! ## 层次关系
//!
//! ```text
//! scrape_service (处理 Vec<Source>)
//!     ↓
//! source_runner (处理 Vec<Url>)
//!     ↓
//! sources::RecipeSource (处理单个页面)
//!     ↓
//! services (能力层：extractor / link_filter / normalizer / tagger)
//!     ↓
//! browser (基础设施：Navigator / BrowserSession)
//! ```

pub mod run_guard;
pub mod scrape_service;
pub mod source_runner;
pub mod trigger;

// 重新导出主要类型
pub use run_guard::{RunGuard, RunPermit};
pub use scrape_service::{
    Orchestrator, RunAllSummary, ScrapeStatus, SourceBreakdown, SourceOutcome, TriggerOutcome,
};
pub use source_runner::{RunSettings, SourceSummary};
pub use trigger::{ScrapeTarget, ScrapeTrigger};
