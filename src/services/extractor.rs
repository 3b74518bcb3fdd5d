//! 页面字段提取 - 业务能力层
//!
//! 每个字段都有一条按优先级排列的回退链，第一个非空结果生效。
//! 每一级都是独立的公开函数，可以直接拿固定的 HTML 测试。
//!
//! 这里只负责"从 HTML 里拿出原始文本"，不做类型转换，
//! 类型转换见 [`crate::services::normalizer`]。

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::ExtractError;

/// 单个来源的提取规则
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRules {
    pub title: &'static [&'static str],
    pub description: &'static [&'static str],
    pub image: &'static [&'static str],
    pub prep_time: &'static [&'static str],
    pub cook_time: &'static [&'static str],
    pub servings: &'static [&'static str],
    pub difficulty: &'static [&'static str],
    /// 配料列表所在标题包含的关键字
    pub ingredient_keywords: &'static [&'static str],
    pub ingredient_lists: &'static [&'static str],
    /// 按单位过滤 `ul li` 时使用的单位标记
    pub unit_tokens: &'static [&'static str],
    /// 步骤列表所在标题包含的关键字
    pub method_keywords: &'static [&'static str],
    pub instruction_lists: &'static [&'static str],
    /// 图片 URL 是否去掉查询参数
    pub strip_image_query: bool,
}

impl ExtractionRules {
    /// 大多数来源共用的规则
    pub const STANDARD: ExtractionRules = ExtractionRules {
        title: &["h1", r#"[class*="recipe-header"] h1"#, r#"[class*="title"]"#, r#"[class*="Title"]"#],
        description: &[
            r#"[class*="recipe-description"]"#,
            r#"[class*="description"]"#,
            r#"[class*="Description"]"#,
            r#"[class*="intro"]"#,
            "p",
        ],
        image: &[
            r#"img[src*="recipe"]"#,
            r#"img[alt*="recipe"]"#,
            r#"[class*="recipe-header"] img"#,
            r#"[class*="hero"] img"#,
            r#"[class*="Hero"] img"#,
            r#"[class*="recipe-image"] img"#,
            r#"[class*="RecipeImage"] img"#,
            "picture img",
            r#"article img[src*="."]"#,
            r#"main img[src*="."]"#,
            "main img",
        ],
        prep_time: &[
            r#"[class*="prep"]"#,
            r#"[class*="Prep"]"#,
            r#"[data-test*="prep"]"#,
            r#"[aria-label*="prep"]"#,
        ],
        cook_time: &[
            r#"[class*="cook"]"#,
            r#"[class*="Cook"]"#,
            r#"[data-test*="cook"]"#,
            r#"[aria-label*="cook"]"#,
        ],
        servings: &[
            r#"[class*="serving"]"#,
            r#"[class*="Serving"]"#,
            r#"[class*="serves"]"#,
            r#"[data-test*="serves"]"#,
        ],
        difficulty: &[
            r#"[class*="difficulty"]"#,
            r#"[class*="Difficulty"]"#,
            r#"[data-test*="difficulty"]"#,
        ],
        ingredient_keywords: &["ingredient"],
        ingredient_lists: &[r#"[class*="ingredient"] li"#, r#"[class*="Ingredient"] li"#],
        unit_tokens: &["g", "ml", "tbsp", "tsp"],
        method_keywords: &["method", "instruction"],
        instruction_lists: &[
            r#"[class*="instruction"] li"#,
            r#"[class*="Instruction"] li"#,
            r#"[class*="method"] li"#,
            r#"[class*="Method"] li"#,
        ],
        strip_image_query: true,
    };
}

/// 从页面提取出的原始字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtract {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub prep_time_text: Option<String>,
    pub cook_time_text: Option<String>,
    pub servings_text: Option<String>,
    pub difficulty_text: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

/// 提取整页字段
pub fn extract_page(
    html: &str,
    page_url: &str,
    rules: &ExtractionRules,
) -> Result<PageExtract, ExtractError> {
    let document = Html::parse_document(html);
    let base = parse_url(page_url)?;

    Ok(PageExtract {
        title: first_text(&document, rules.title)?,
        description: first_text(&document, rules.description)?,
        image_url: image_url(&document, &base, rules.image, rules.strip_image_query)?,
        prep_time_text: first_text(&document, rules.prep_time)?,
        cook_time_text: first_text(&document, rules.cook_time)?,
        servings_text: first_text(&document, rules.servings)?,
        difficulty_text: first_text(&document, rules.difficulty)?,
        ingredients: extract_ingredients(&document, rules)?,
        instructions: extract_instructions(&document, rules)?,
    })
}

/// 配料回退链：标题 → class 列表 → 单位过滤
pub fn extract_ingredients(
    document: &Html,
    rules: &ExtractionRules,
) -> Result<Vec<String>, ExtractError> {
    let by_heading = items_after_heading(document, rules.ingredient_keywords)?;
    if !by_heading.is_empty() {
        return Ok(by_heading);
    }

    let by_class = first_non_empty_list(document, rules.ingredient_lists)?;
    if !by_class.is_empty() {
        return Ok(by_class);
    }

    items_with_units(document, rules.unit_tokens)
}

/// 步骤回退链：标题 → class 列表 → 任意有序列表
pub fn extract_instructions(
    document: &Html,
    rules: &ExtractionRules,
) -> Result<Vec<String>, ExtractError> {
    let by_heading = items_after_heading(document, rules.method_keywords)?;
    if !by_heading.is_empty() {
        return Ok(by_heading);
    }

    let by_class = first_non_empty_list(document, rules.instruction_lists)?;
    if !by_class.is_empty() {
        return Ok(by_class);
    }

    all_texts(document, "ol li")
}

/// 找到第一个文本包含关键字的 h2/h3，取紧随其后的元素里的所有 li
pub fn items_after_heading(
    document: &Html,
    keywords: &[&str],
) -> Result<Vec<String>, ExtractError> {
    let headings = selector("h2, h3")?;
    let items = selector("li")?;

    let heading = document.select(&headings).find(|h| {
        let text = element_text(h).to_lowercase();
        keywords.iter().any(|k| text.contains(k))
    });

    let Some(heading) = heading else {
        return Ok(Vec::new());
    };
    let Some(next) = heading.next_siblings().find_map(ElementRef::wrap) else {
        return Ok(Vec::new());
    };

    Ok(next
        .select(&items)
        .map(|li| element_text(&li))
        .filter(|t| !t.is_empty())
        .collect())
}

/// 依次尝试选择器，返回第一个非空的文本列表
pub fn first_non_empty_list(
    document: &Html,
    selectors: &[&str],
) -> Result<Vec<String>, ExtractError> {
    for css in selectors {
        let texts = all_texts(document, css)?;
        if !texts.is_empty() {
            return Ok(texts);
        }
    }
    Ok(Vec::new())
}

/// 所有含数字且含单位标记的 `ul li`
pub fn items_with_units(document: &Html, units: &[&str]) -> Result<Vec<String>, ExtractError> {
    Ok(all_texts(document, "ul li")?
        .into_iter()
        .filter(|t| t.chars().any(|c| c.is_ascii_digit()) && units.iter().any(|u| t.contains(u)))
        .collect())
}

/// 依次尝试选择器，取第一个匹配元素的非空文本
pub fn first_text(document: &Html, selectors: &[&str]) -> Result<Option<String>, ExtractError> {
    for css in selectors {
        let sel = selector(css)?;
        if let Some(element) = document.select(&sel).next() {
            let text = element_text(&element);
            if !text.is_empty() {
                return Ok(Some(text));
            }
        }
    }
    Ok(None)
}

/// 依次尝试图片选择器
///
/// 跳过 data: 图片和声明宽度不超过 200 的小图，相对地址按页面地址补全。
pub fn image_url(
    document: &Html,
    base: &Url,
    selectors: &[&str],
    strip_query: bool,
) -> Result<Option<String>, ExtractError> {
    for css in selectors {
        let sel = selector(css)?;
        let Some(img) = document.select(&sel).next() else {
            continue;
        };
        let Some(src) = img.value().attr("src").map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        if src.starts_with("data:") {
            continue;
        }
        let too_small = img
            .value()
            .attr("width")
            .and_then(|w| w.trim().trim_end_matches("px").parse::<u32>().ok())
            .is_some_and(|w| w <= 200);
        if too_small {
            continue;
        }

        let Ok(mut resolved) = base.join(src) else {
            continue;
        };
        if strip_query {
            resolved.set_query(None);
        }
        return Ok(Some(resolved.to_string()));
    }
    Ok(None)
}

fn all_texts(document: &Html, css: &str) -> Result<Vec<String>, ExtractError> {
    let sel = selector(css)?;
    Ok(document
        .select(&sel)
        .map(|e| element_text(&e))
        .filter(|t| !t.is_empty())
        .collect())
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::InvalidSelector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn parse_url(url: &str) -> Result<Url, ExtractError> {
    Url::parse(url).map_err(|source| ExtractError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: ExtractionRules = ExtractionRules::STANDARD;
    const PAGE: &str = "https://www.bbc.co.uk/food/recipes/air_fryer_chips";

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", body))
    }

    #[test]
    fn test_ingredients_from_heading() {
        let document = doc(
            r#"<h2>Ingredients</h2>
               <ul><li> 2 potatoes </li><li>1 tbsp oil</li><li>  </li></ul>
               <div class="ingredient-list"><ul><li>ignored</li></ul></div>"#,
        );
        assert_eq!(
            items_after_heading(&document, RULES.ingredient_keywords).unwrap(),
            vec!["2 potatoes", "1 tbsp oil"]
        );
        assert_eq!(
            extract_ingredients(&document, &RULES).unwrap(),
            vec!["2 potatoes", "1 tbsp oil"]
        );
    }

    #[test]
    fn test_ingredients_from_class_when_no_heading() {
        let document = doc(
            r#"<div class="recipe-ingredients"><ul><li>300g chicken</li><li>Salt</li></ul></div>
               <ul><li>5 stars</li></ul>"#,
        );
        assert!(items_after_heading(&document, RULES.ingredient_keywords)
            .unwrap()
            .is_empty());
        assert_eq!(
            extract_ingredients(&document, &RULES).unwrap(),
            vec!["300g chicken", "Salt"]
        );
    }

    #[test]
    fn test_capitalised_class_is_second_choice() {
        let document = doc(r#"<section class="IngredientsPanel"><ul><li>1 egg</li></ul></section>"#);
        assert_eq!(
            first_non_empty_list(&document, RULES.ingredient_lists).unwrap(),
            vec!["1 egg"]
        );
    }

    #[test]
    fn test_ingredients_from_units_as_last_resort() {
        let document = doc(
            r#"<ul><li>200g flour</li><li>Share on Facebook</li><li>100 ml milk</li><li>Step 3</li></ul>"#,
        );
        assert_eq!(
            extract_ingredients(&document, &RULES).unwrap(),
            vec!["200g flour", "100 ml milk"]
        );
    }

    #[test]
    fn test_instructions_heading_then_class_then_ordered_list() {
        let heading = doc(r#"<h3>Method</h3><ol><li>Heat the air fryer</li><li>Cook</li></ol>"#);
        assert_eq!(
            extract_instructions(&heading, &RULES).unwrap(),
            vec!["Heat the air fryer", "Cook"]
        );

        let class = doc(r#"<div class="method-steps"><ol><li>Mix</li></ol></div>"#);
        assert_eq!(extract_instructions(&class, &RULES).unwrap(), vec!["Mix"]);

        let bare = doc(r#"<ol><li>Only step</li></ol>"#);
        assert_eq!(extract_instructions(&bare, &RULES).unwrap(), vec!["Only step"]);
    }

    #[test]
    fn test_method_keywords_are_per_source() {
        let document = doc(r#"<h2>Instructions</h2><ul><li>Fry</li></ul>"#);
        assert_eq!(
            items_after_heading(&document, &["method", "instruction"]).unwrap(),
            vec!["Fry"]
        );
        assert!(items_after_heading(&document, &["method"]).unwrap().is_empty());
    }

    #[test]
    fn test_first_text_skips_empty_matches() {
        let document = doc(r#"<h1>  </h1><div class="recipe-title">Crispy tofu</div>"#);
        assert_eq!(
            first_text(&document, RULES.title).unwrap(),
            Some("Crispy tofu".to_string())
        );
    }

    #[test]
    fn test_image_url_resolution() {
        let base = Url::parse(PAGE).unwrap();
        let document = doc(
            r#"<img src="data:image/png;base64,AAAA" alt="recipe">
               <div class="hero"><img src="/food/images/chips.jpg?w=800" width="800"></div>"#,
        );
        assert_eq!(
            image_url(&document, &base, RULES.image, true).unwrap(),
            Some("https://www.bbc.co.uk/food/images/chips.jpg".to_string())
        );
        assert_eq!(
            image_url(&document, &base, RULES.image, false).unwrap(),
            Some("https://www.bbc.co.uk/food/images/chips.jpg?w=800".to_string())
        );
    }

    #[test]
    fn test_image_url_skips_thumbnails() {
        let base = Url::parse(PAGE).unwrap();
        let document = doc(
            r#"<div class="hero"><img src="/icons/logo.png" width="120"></div>
               <picture><img src="https://cdn.example.com/hero.jpg"></picture>"#,
        );
        assert_eq!(
            image_url(&document, &base, RULES.image, true).unwrap(),
            Some("https://cdn.example.com/hero.jpg".to_string())
        );
    }

    #[test]
    fn test_extract_page_reads_metadata() {
        let html = r#"<html><body>
            <h1>Air fryer
                chips</h1>
            <p class="recipe-description">Crispy and quick.</p>
            <ul>
              <li class="recipe-details__prep">Prep: 10 mins</li>
              <li class="recipe-details__cook">Cook: 1 hr 5 mins</li>
              <li class="recipe-details__serving">Serves 2</li>
              <li class="recipe-details__difficulty">Easy</li>
            </ul>
            <h2>Ingredients</h2><ul><li>2 potatoes</li></ul>
            <h2>Method</h2><ol><li>Cut</li><li>Fry</li></ol>
        </body></html>"#;

        let page = extract_page(html, PAGE, &RULES).unwrap();
        assert_eq!(
            page.title.as_deref().map(crate::services::normalizer::clean_text),
            Some("Air fryer chips".to_string())
        );
        assert_eq!(page.description.as_deref(), Some("Crispy and quick."));
        assert_eq!(page.prep_time_text.as_deref(), Some("Prep: 10 mins"));
        assert_eq!(page.cook_time_text.as_deref(), Some("Cook: 1 hr 5 mins"));
        assert_eq!(page.servings_text.as_deref(), Some("Serves 2"));
        assert_eq!(page.difficulty_text.as_deref(), Some("Easy"));
        assert_eq!(page.ingredients, vec!["2 potatoes"]);
        assert_eq!(page.instructions, vec!["Cut", "Fry"]);
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let document = doc("<h1>x</h1>");
        assert!(matches!(
            first_text(&document, &["h1["]),
            Err(ExtractError::InvalidSelector { .. })
        ));
    }
}
