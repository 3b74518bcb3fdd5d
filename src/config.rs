use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::browser::RetryPolicy;
use crate::error::{AppError, AppResult};

/// 程序配置文件
///
/// 优先级：环境变量 > TOML 文件 > 默认值。时间字段单位均为毫秒。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 浏览器 ---
    /// Chromium 可执行文件，为空时由 chromiumoxide 自动查找
    pub chrome_executable: Option<PathBuf>,
    /// 是否无头运行
    pub headless: bool,
    pub user_agent: String,
    /// 单次导航超时
    pub navigation_timeout_ms: u64,
    /// 导航最多尝试次数
    pub navigation_attempts: u32,
    /// 重试等待步长，第 n 次失败后等待 n 倍
    pub navigation_backoff_ms: u64,

    // --- 节流 ---
    /// 同一来源两个页面之间的间隔
    pub request_delay_ms: u64,
    /// 两个来源之间的间隔
    pub source_delay_ms: u64,

    // --- 存储 ---
    /// recipes.json / scrape_runs.json 所在目录
    pub data_dir: PathBuf,

    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chrome_executable: None,
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            navigation_timeout_ms: 30_000,
            navigation_attempts: 3,
            navigation_backoff_ms: 2_000,
            request_delay_ms: 2_000,
            source_delay_ms: 3_000,
            data_dir: PathBuf::from("data"),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 默认值 + 环境变量
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// TOML 文件 + 环境变量
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件加载，缺省字段取默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AppError::File {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    fn with_env_overrides(self) -> Self {
        let current = self;
        Self {
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().map(PathBuf::from).or(current.chrome_executable),
            headless: env_parse("HEADLESS").unwrap_or(current.headless),
            user_agent: std::env::var("SCRAPER_USER_AGENT").unwrap_or(current.user_agent),
            navigation_timeout_ms: env_parse("NAVIGATION_TIMEOUT_MS").unwrap_or(current.navigation_timeout_ms),
            navigation_attempts: env_parse("NAVIGATION_ATTEMPTS").unwrap_or(current.navigation_attempts),
            navigation_backoff_ms: env_parse("NAVIGATION_BACKOFF_MS").unwrap_or(current.navigation_backoff_ms),
            request_delay_ms: env_parse("REQUEST_DELAY_MS").unwrap_or(current.request_delay_ms),
            source_delay_ms: env_parse("SOURCE_DELAY_MS").unwrap_or(current.source_delay_ms),
            data_dir: std::env::var("DATA_DIR").ok().map(PathBuf::from).unwrap_or(current.data_dir),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(current.verbose_logging),
        }
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.navigation_attempts,
            Duration::from_millis(self.navigation_backoff_ms),
        )
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn source_delay(&self) -> Duration {
        Duration::from_millis(self.source_delay_ms)
    }

    pub fn recipes_path(&self) -> PathBuf {
        self.data_dir.join("recipes.json")
    }

    pub fn runs_path(&self) -> PathBuf {
        self.data_dir.join("scrape_runs.json")
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
