//! 来源适配器
//!
//! ## 职责
//!
//! 把一个网站的页面结构翻译成统一的 [`RecipeDraft`]。
//!
//! - `list()`：打开列表页，收集菜谱链接
//! - `fetch()`：打开单个菜谱页，提取并规范化字段
//!
//! 每个来源一个类型，只提供自己的 [`SourceProfile`] 数据；
//! 通用流程写在 [`RecipeSource`] 的默认方法里。
//! 适配器不持有浏览器，会话由编排层按次启动后以 [`Navigator`] 传入。

pub mod aldi;
pub mod bbc_good_food;
pub mod marks_and_spencer;
pub mod registry;
pub mod tesco;
pub mod waitrose;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::browser::Navigator;
use crate::error::{BrowserError, ScrapeError};
use crate::models::{RecipeDraft, SourceId};
use crate::services::normalizer::{
    clean_text, parse_difficulty, parse_servings, parse_time_to_minutes,
};
use crate::services::{collect_recipe_links, derive_tags, extract_page, ExtractionRules, LinkRules, PageExtract};

pub use aldi::Aldi;
pub use bbc_good_food::BbcGoodFood;
pub use marks_and_spencer::MarksAndSpencer;
pub use registry::SourceRegistry;
pub use tesco::Tesco;
pub use waitrose::Waitrose;

/// 单个来源的全部配置数据
#[derive(Debug, Clone)]
pub struct SourceProfile {
    pub id: SourceId,
    pub base_url: &'static str,
    /// 空气炸锅菜谱列表页路径
    pub listing_path: &'static str,
    /// 等待列表页链接出现的最长时间
    pub listing_wait: Duration,
    pub links: LinkRules,
    pub extraction: ExtractionRules,
    /// 菜谱页导航重试耗尽时是否中止整个来源
    pub page_navigation_fatal: bool,
}

impl SourceProfile {
    pub fn listing_url(&self) -> String {
        format!("{}{}", self.base_url, self.listing_path)
    }
}

/// 来源适配器
#[async_trait]
pub trait RecipeSource: Send + Sync {
    fn profile(&self) -> &SourceProfile;

    fn id(&self) -> SourceId {
        self.profile().id
    }

    /// 列出最多 `limit` 个去重后的菜谱页链接
    ///
    /// 列表页打不开是来源级错误。
    async fn list(&self, nav: &mut Navigator, limit: usize) -> Result<Vec<String>, ScrapeError> {
        let profile = self.profile();
        let listing_url = profile.listing_url();
        let unavailable = |reason: String| ScrapeError::ListingUnavailable {
            source_id: profile.id,
            url: listing_url.clone(),
            reason,
        };

        nav.navigate(&listing_url)
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        // 等不到链接不算失败，后面按实际 HTML 过滤
        if let Err(e) = nav
            .wait_for_selector(profile.links.anchor_selector, profile.listing_wait)
            .await
        {
            warn!("[{}] ⚠️ {}", profile.id, e);
        }

        let html = nav.html().await.map_err(|e| unavailable(e.to_string()))?;
        let urls = collect_recipe_links(&html, &listing_url, &profile.links, limit)
            .map_err(|e| unavailable(e.to_string()))?;

        info!(
            "[{}] ✓ 找到 {} 个菜谱链接",
            profile.id.display_name(),
            urls.len()
        );
        Ok(urls)
    }

    /// 抓取单个菜谱页
    ///
    /// 提取失败、字段缺失都返回 `Ok(None)`；只有来源级错误才返回 `Err`。
    async fn fetch(&self, nav: &mut Navigator, url: &str) -> Result<Option<RecipeDraft>, ScrapeError> {
        let profile = self.profile();

        if let Err(e) = nav.navigate(url).await {
            if profile.page_navigation_fatal || !matches!(e, BrowserError::NavigationExhausted { .. }) {
                return Err(e.into());
            }
            warn!("[{}] ⚠️ 跳过无法打开的页面 {}: {}", profile.id, url, e);
            return Ok(None);
        }

        let html = match nav.html().await {
            Ok(html) => html,
            Err(e) => {
                warn!("[{}] ⚠️ 读取页面失败 {}: {}", profile.id, url, e);
                return Ok(None);
            }
        };

        let page = match extract_page(&html, url, &profile.extraction) {
            Ok(page) => page,
            Err(e) => {
                warn!("[{}] ⚠️ 提取失败 {}: {}", profile.id, url, e);
                return Ok(None);
            }
        };

        Ok(self.build_draft(url, page))
    }

    /// 把原始字段组装成草稿，缺少必填字段时返回 None
    fn build_draft(&self, url: &str, page: PageExtract) -> Option<RecipeDraft> {
        build_draft(self.id(), url, page)
    }
}

/// 原始字段 → 规范化草稿
pub fn build_draft(source: SourceId, url: &str, page: PageExtract) -> Option<RecipeDraft> {
    let title = page.title.as_deref().map(clean_text).unwrap_or_default();
    let ingredients = clean_lines(&page.ingredients);
    let instructions = clean_lines(&page.instructions);

    let mut draft = match RecipeDraft::new(source, url, title, ingredients, instructions) {
        Ok(draft) => draft,
        Err(reason) => {
            warn!("[{}] ⚠️ 菜谱数据不完整 {}: {}", source, url, reason);
            return None;
        }
    };

    draft.description = page
        .description
        .as_deref()
        .map(clean_text)
        .filter(|d| !d.is_empty());
    draft.image_url = page.image_url;
    draft.prep_time = page.prep_time_text.as_deref().and_then(parse_time_to_minutes);
    draft.cook_time = page.cook_time_text.as_deref().and_then(parse_time_to_minutes);
    draft.servings = page.servings_text.as_deref().and_then(parse_servings);
    draft.difficulty = page.difficulty_text.as_deref().and_then(parse_difficulty);
    draft.tags = derive_tags(&draft);

    debug!("[{}] 草稿: {} ({} 配料, {} 步骤)", source, draft.title, draft.ingredients.len(), draft.instructions.len());
    Some(draft)
}

fn clean_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|l| clean_text(l))
        .filter(|l| !l.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    fn page() -> PageExtract {
        PageExtract {
            title: Some("  Air fryer\n salmon ".into()),
            description: Some("Quick\n\nweeknight fish".into()),
            image_url: Some("https://www.waitrose.com/img/salmon.jpg".into()),
            prep_time_text: Some("Prep 10 mins".into()),
            cook_time_text: Some("15 mins".into()),
            servings_text: Some("Serves 2".into()),
            difficulty_text: Some("Moderately difficult".into()),
            ingredients: vec!["2 salmon  fillets".into(), "   ".into()],
            instructions: vec!["Season".into(), "Air fry".into()],
        }
    }

    #[test]
    fn test_build_draft_normalizes_fields() {
        let url = "https://www.waitrose.com/ecom/recipes/air-fryer-salmon";
        let draft = build_draft(SourceId::Waitrose, url, page()).unwrap();

        assert_eq!(draft.title, "Air fryer salmon");
        assert_eq!(draft.description.as_deref(), Some("Quick weeknight fish"));
        assert_eq!(draft.source_url, url);
        assert_eq!(draft.prep_time, Some(10));
        assert_eq!(draft.cook_time, Some(15));
        assert_eq!(draft.servings, Some(2));
        assert_eq!(draft.difficulty, Some(Difficulty::Medium));
        assert_eq!(draft.ingredients, vec!["2 salmon fillets"]);
        assert_eq!(draft.tags, vec!["medium", "salmon", "quick"]);
    }

    #[test]
    fn test_build_draft_drops_incomplete_pages() {
        let url = "https://www.waitrose.com/ecom/recipes/x";

        let mut no_title = page();
        no_title.title = None;
        assert!(build_draft(SourceId::Waitrose, url, no_title).is_none());

        let mut no_ingredients = page();
        no_ingredients.ingredients = vec!["  ".into()];
        assert!(build_draft(SourceId::Waitrose, url, no_ingredients).is_none());

        let mut no_steps = page();
        no_steps.instructions.clear();
        assert!(build_draft(SourceId::Waitrose, url, no_steps).is_none());
    }

    #[test]
    fn test_unmatched_difficulty_left_to_caller() {
        let mut p = page();
        p.difficulty_text = Some("Tricky".into());
        let draft = build_draft(SourceId::Waitrose, "https://www.waitrose.com/ecom/recipes/x", p).unwrap();
        assert_eq!(draft.difficulty, None);
        assert_eq!(draft.effective_difficulty(), Difficulty::Medium);
    }
}
