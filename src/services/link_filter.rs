//! 列表页链接过滤 - 业务能力层
//!
//! 各来源判断"这是菜谱页还是分类页"的规则都是路径字符串匹配，
//! 会随网站改版失效，所以全部放在 [`LinkRules`] 数据里，不写在代码分支中。

use std::collections::HashSet;

use scraper::Html;

use crate::error::ExtractError;
use crate::services::extractor::{parse_url, selector};

/// 单个来源的链接规则
#[derive(Debug, Clone, Copy)]
pub struct LinkRules {
    /// 候选链接选择器
    pub anchor_selector: &'static str,
    /// 必须包含的路径片段
    pub required: &'static str,
    /// 以这些后缀结尾的是索引页
    pub reject_suffixes: &'static [&'static str],
    /// 包含这些片段的是分类页
    pub reject_containing: &'static [&'static str],
    /// `required` 之后紧接这些前缀的是分类页
    pub reject_slug_prefixes: &'static [&'static str],
    /// 这些集合路径下只接受一级 slug，优先于 `reject_containing` 判断
    pub nested_collections: &'static [&'static str],
    /// 是否忽略大小写比较
    pub case_insensitive: bool,
}

impl LinkRules {
    /// 判断一个绝对链接是否是菜谱页
    pub fn accepts(&self, href: &str) -> bool {
        if href.is_empty() {
            return false;
        }
        let url = if self.case_insensitive {
            href.to_lowercase()
        } else {
            href.to_string()
        };

        if !url.contains(self.required) {
            return false;
        }
        if self.reject_suffixes.iter().any(|s| url.ends_with(s)) {
            return false;
        }

        for prefix in self.nested_collections {
            if let Some((_, slug)) = url.split_once(prefix) {
                return !slug.is_empty() && !slug.contains('/');
            }
        }

        if self.reject_containing.iter().any(|p| url.contains(p)) {
            return false;
        }

        match url.split_once(self.required) {
            Some((_, slug)) => {
                !slug.is_empty() && !self.reject_slug_prefixes.iter().any(|p| slug.starts_with(p))
            }
            None => false,
        }
    }
}

/// 从列表页 HTML 收集菜谱链接
///
/// 链接按页面地址补全为绝对地址（与浏览器里 `a.href` 一致），
/// 按首次出现顺序去重，最多返回 `limit` 个。
pub fn collect_recipe_links(
    html: &str,
    page_url: &str,
    rules: &LinkRules,
    limit: usize,
) -> Result<Vec<String>, ExtractError> {
    let document = Html::parse_document(html);
    let base = parse_url(page_url)?;
    let anchors = selector(rules.anchor_selector)?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&anchors) {
        if links.len() >= limit {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(absolute) = base.join(href.trim()) else {
            continue;
        };
        let absolute = absolute.to_string();

        if rules.accepts(&absolute) && seen.insert(absolute.clone()) {
            links.push(absolute);
        }
    }

    Ok(links)
}
