//! 错误类型
//!
//! 每一层有自己的错误枚举，`AppError` 只在二进制入口处汇总。

use thiserror::Error;

use crate::models::{RecipeId, RunId, SourceId};

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("启动无头浏览器失败: {message}")]
    LaunchFailed { message: String },

    /// 单次导航失败（可重试）
    #[error("导航到 {url} 失败: {message}")]
    NavigationFailed { url: String, message: String },

    /// 单次导航超时（可重试）
    #[error("导航到 {url} 超时 ({timeout_ms}ms)")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    /// 重试次数耗尽
    #[error("导航到 {url} 失败，已尝试 {attempts} 次: {last_error}")]
    NavigationExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },

    /// 等待元素超时
    #[error("等待选择器 {selector} 超时")]
    SelectorTimeout { selector: String },

    /// 读取页面内容失败
    #[error("读取页面内容失败: {message}")]
    ContentFailed { message: String },

    /// 会话已关闭
    #[error("浏览器会话已关闭")]
    SessionClosed,
}

impl BrowserError {
    /// 是否值得重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BrowserError::NavigationFailed { .. } | BrowserError::NavigationTimeout { .. }
        )
    }
}

/// 页面字段提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 配置的选择器无法解析
    #[error("无效的 CSS 选择器 '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// URL 无法解析
    #[error("无效的 URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// 草稿被拒绝的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftRejection {
    #[error("缺少标题")]
    MissingTitle,
    #[error("缺少配料")]
    MissingIngredients,
    #[error("缺少步骤")]
    MissingInstructions,
}

/// 适配器（单个来源）错误
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// 列表页不可用
    #[error("[{source_id}] 列表页不可用 {url}: {reason}")]
    ListingUnavailable {
        source_id: SourceId,
        url: String,
        reason: String,
    },

    /// 运行被取消
    #[error("运行已取消")]
    Cancelled,
}

impl ScrapeError {
    /// 是否会中止整个来源的运行
    ///
    /// 单页提取失败可以跳过；导航重试耗尽、列表页不可用、取消都是来源级错误。
    pub fn is_fatal(&self) -> bool {
        match self {
            ScrapeError::Browser(e) => !matches!(e, BrowserError::ContentFailed { .. }),
            ScrapeError::Extract(_) => false,
            ScrapeError::ListingUnavailable { .. } | ScrapeError::Cancelled => true,
        }
    }
}

/// 菜谱存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("菜谱 {0} 不存在")]
    NotFound(RecipeId),

    #[error("拒绝保存不完整的菜谱: {0}")]
    IncompleteRecipe(DraftRejection),

    /// 来源 URL 已存在，应走 update
    #[error("来源 URL 已存在: {0}")]
    DuplicateSourceUrl(String),

    #[error("存储文件 {path} 读写失败: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("存储文件 {path} 序列化失败: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 运行记录错误
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("运行记录 {0} 不存在")]
    UnknownRun(RunId),

    #[error("运行记录 {0} 已结束，不能再修改")]
    AlreadyTerminal(RunId),

    #[error("[{0}] 已有进行中的运行")]
    AlreadyInProgress(SourceId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 触发请求校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerError {
    #[error("limit 必须在 {min}..={max} 之间，实际为 {value}")]
    LimitOutOfRange { value: u32, min: u32, max: u32 },

    #[error("未知的来源: {0}")]
    UnknownSource(String),
}

/// 编排层错误
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// 单飞：已有运行在进行中
    #[error("抓取已在进行中")]
    AlreadyRunning,

    #[error("没有注册来源 {0} 的适配器")]
    UnknownSource(SourceId),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// 来源级失败，运行记录已标记为 FAILED
    #[error("[{source_id}] 抓取失败: {error}")]
    SourceFailed {
        source_id: SourceId,
        #[source]
        error: ScrapeError,
    },
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("编排错误: {0}")]
    Orchestrator(#[from] OrchestratorError),

    #[error("存储错误: {0}")]
    Store(#[from] StoreError),

    #[error("请求错误: {0}")]
    Trigger(#[from] TriggerError),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::ContentFailed {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(format!("JSON处理失败: {}", err))
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(format!("TOML解析失败: {}", err))
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_errors_are_retryable() {
        let failed = BrowserError::NavigationFailed {
            url: "https://example.com".into(),
            message: "net::ERR_CONNECTION_RESET".into(),
        };
        let timeout = BrowserError::NavigationTimeout {
            url: "https://example.com".into(),
            timeout_ms: 30_000,
        };
        assert!(failed.is_retryable());
        assert!(timeout.is_retryable());
        assert!(!BrowserError::SessionClosed.is_retryable());
    }

    #[test]
    fn test_fatal_classification() {
        let exhausted = ScrapeError::from(BrowserError::NavigationExhausted {
            url: "https://example.com/r/1".into(),
            attempts: 3,
            last_error: "timeout".into(),
        });
        let content = ScrapeError::from(BrowserError::ContentFailed {
            message: "target closed".into(),
        });
        let selector = ScrapeError::from(ExtractError::InvalidSelector {
            selector: "h1[".into(),
            message: "unexpected eof".into(),
        });

        assert!(exhausted.is_fatal());
        assert!(ScrapeError::Cancelled.is_fatal());
        assert!(!content.is_fatal());
        assert!(!selector.is_fatal());
    }

    #[test]
    fn test_app_error_wraps_command_errors() {
        let err = AppError::from(TriggerError::UnknownSource("lidl".into()));
        assert!(matches!(err, AppError::Trigger(_)));
        assert_eq!(err.to_string(), "请求错误: 未知的来源: lidl");

        let err = AppError::from(OrchestratorError::AlreadyRunning);
        assert!(matches!(err, AppError::Orchestrator(_)));
    }
}
