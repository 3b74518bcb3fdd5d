//! # Recipe Scraper
//!
//! 从英国超市和 BBC 网站抓取空气炸锅菜谱，规范化后存入本地菜谱库。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Browser）
//! - `browser/` - 持有稀缺资源（无头浏览器），只暴露"打开页面、读 HTML"的能力
//! - `SessionLauncher` / `BrowserSession` - 会话抽象，测试时可替换
//! - `Navigator` - 带重试的导航
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 与来源无关的纯函数
//! - `extractor` - 字段回退链
//! - `link_filter` - 列表页链接过滤
//! - `normalizer` - 时间、份量、难度、文本规范化
//! - `tagger` - 标签
//!
//! ### ③ 适配层（Sources）
//! - `sources/` - 每个网站一个类型，只提供配置数据
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 单飞、逐来源调度、会话生命周期、运行记录
//!
//! ### 存储（Store）
//! - `store/` - 菜谱库与运行记录，内存实现和 JSON 文件实现
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod sources;
pub mod store;
pub mod utils;

// 重新导出常用类型
pub use browser::{ChromeLauncher, Navigator, RetryPolicy};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Difficulty, Recipe, RecipeDraft, RunStatus, ScrapeRun, SourceId};
pub use orchestrator::{Orchestrator, RunAllSummary, ScrapeStatus, ScrapeTrigger, SourceSummary};
pub use sources::{RecipeSource, SourceRegistry};
pub use store::{RecipeStore, RunLedger};
pub use utils::logging;
