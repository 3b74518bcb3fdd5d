use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use recipe_scraper::orchestrator::RunSettings;
use recipe_scraper::store::{JsonFileRecipeStore, JsonFileRunLedger};
use recipe_scraper::error::TriggerError;
use recipe_scraper::{
    logging, AppResult, ChromeLauncher, Config, Orchestrator, ScrapeTrigger, SourceId,
    SourceRegistry,
};

/// 空气炸锅菜谱抓取
#[derive(Debug, Parser)]
#[command(name = "recipe_scraper", version)]
struct Cli {
    /// TOML 配置文件
    #[arg(long, global = true, env = "SCRAPER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 抓取全部来源
    All {
        /// 每个来源最多抓取的菜谱数 (1-50)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// 抓取单个来源
    Source {
        /// 来源名称，如 aldi / tesco / m&s / bbc
        name: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// 查看累计统计
    Status,
    /// 查看最近的运行记录
    History {
        #[arg(long)]
        source: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(cli.config.as_deref()).context("加载配置失败")?;

    // 初始化日志
    logging::init(config.verbose_logging);

    run(cli.command, &config).await.context("命令执行失败")?;

    Ok(())
}

async fn run(command: Command, config: &Config) -> AppResult<()> {
    let orchestrator = build_orchestrator(config).await?;

    match command {
        Command::All { limit } => {
            let trigger = ScrapeTrigger::new(None, limit)?;
            print_json(&orchestrator.handle(trigger).await?)?;
        }
        Command::Source { name, limit } => {
            let trigger = ScrapeTrigger::new(Some(&name), limit)?;
            print_json(&orchestrator.handle(trigger).await?)?;
        }
        Command::Status => {
            print_json(&orchestrator.status().await?)?;
        }
        Command::History { source, limit } => {
            let source = source
                .as_deref()
                .map(|name| {
                    SourceId::find(name).ok_or_else(|| TriggerError::UnknownSource(name.to_string()))
                })
                .transpose()?;
            print_json(&orchestrator.history(source, limit).await?)?;
        }
    }

    Ok(())
}

async fn build_orchestrator(config: &Config) -> AppResult<Orchestrator> {
    let store = JsonFileRecipeStore::open(config.recipes_path()).await?;
    let ledger = JsonFileRunLedger::open(config.runs_path()).await?;

    Ok(Orchestrator::new(
        SourceRegistry::builtin(),
        Arc::new(ChromeLauncher::new(config)),
        Arc::new(store),
        Arc::new(ledger),
        RunSettings::from_config(config),
    ))
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
