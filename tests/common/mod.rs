//! 集成测试共用的假浏览器与固定页面

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use recipe_scraper::browser::{BrowserSession, RetryPolicy, SessionLauncher};
use recipe_scraper::error::BrowserError;
use recipe_scraper::orchestrator::RunSettings;
use recipe_scraper::sources::SourceRegistry;
use recipe_scraper::store::{MemoryRecipeStore, MemoryRunLedger};
use recipe_scraper::Orchestrator;

pub const TESCO_LISTING: &str = "https://realfood.tesco.com/category/air-fryer.html";
pub const WAITROSE_LISTING: &str = "https://www.waitrose.com/ecom/recipes/air-fryer";

/// 假网站：URL → HTML，不在表里的 URL 导航失败
#[derive(Debug, Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }
}

/// 记录启动与关闭次数的假启动器
#[derive(Debug, Clone)]
pub struct FakeLauncher {
    site: Arc<FakeSite>,
    pub launches: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
}

impl FakeLauncher {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
            launches: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            site: Arc::clone(&self.site),
            current: None,
            closes: Arc::clone(&self.closes),
        }))
    }
}

struct FakeSession {
    site: Arc<FakeSite>,
    current: Option<String>,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&mut self, url: &str, _timeout: Duration) -> Result<(), BrowserError> {
        if self.site.pages.contains_key(url) {
            self.current = Some(url.to_string());
            Ok(())
        } else {
            Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            })
        }
    }

    async fn wait_for_selector(
        &mut self,
        _selector: &str,
        _timeout: Duration,
    ) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn html(&mut self) -> Result<String, BrowserError> {
        self.current
            .as_ref()
            .and_then(|url| self.site.pages.get(url))
            .cloned()
            .ok_or(BrowserError::ContentFailed {
                message: "no page loaded".to_string(),
            })
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// 列表页：每个 href 一个链接，外加一个导航链接
pub fn listing_html(hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|h| format!(r#"<li><a href="{}">recipe</a></li>"#, h))
        .collect();
    format!(
        r#"<html><body>
        <nav><a href="/recipes/">All recipes</a></nav>
        <ul class="grid">{}</ul>
        </body></html>"#,
        links
    )
}

/// 完整的菜谱页
pub fn recipe_html(title: &str) -> String {
    format!(
        r#"<html><body><main>
        <h1>{}</h1>
        <div class="recipe-description">Crispy   and quick</div>
        <span class="cook-time">Cook: 15 mins</span>
        <span class="servings">Serves 4</span>
        <span class="difficulty">Easy</span>
        <h2>Ingredients</h2>
        <ul><li>500g chicken wings</li><li>1 tbsp oil</li></ul>
        <h2>Method</h2>
        <ol><li>Toss the wings in oil.</li><li>Air fry for 15 minutes.</li></ol>
        </main></body></html>"#,
        title
    )
}

/// 只有标题、没有配料和步骤的页面
pub fn broken_recipe_html(title: &str) -> String {
    format!(
        r#"<html><body><main><h1>{}</h1><p>Coming soon</p></main></body></html>"#,
        title
    )
}

pub fn tesco_url(slug: &str) -> String {
    format!("https://realfood.tesco.com/recipes/{}.html", slug)
}

pub fn waitrose_url(slug: &str) -> String {
    format!("https://www.waitrose.com/ecom/recipes/{}", slug)
}

/// 测试用参数：短重试、无节流
pub fn fast_settings() -> RunSettings {
    RunSettings {
        retry: RetryPolicy::new(2, Duration::from_millis(10)),
        navigation_timeout: Duration::from_secs(1),
        request_delay: Duration::ZERO,
        source_delay: Duration::ZERO,
    }
}

pub struct Harness {
    pub orchestrator: Orchestrator,
    pub launcher: FakeLauncher,
    pub store: Arc<MemoryRecipeStore>,
    pub ledger: Arc<MemoryRunLedger>,
}

pub fn harness(site: FakeSite, registry: SourceRegistry, settings: RunSettings) -> Harness {
    let launcher = FakeLauncher::new(site);
    let store = Arc::new(MemoryRecipeStore::new());
    let ledger = Arc::new(MemoryRunLedger::new());
    let orchestrator = Orchestrator::new(
        registry,
        Arc::new(launcher.clone()),
        store.clone(),
        ledger.clone(),
        settings,
    );
    Harness {
        orchestrator,
        launcher,
        store,
        ledger,
    }
}
