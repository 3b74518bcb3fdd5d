//! Marks & Spencer
//!
//! 列表页本身就在 `/c/food-and-wine/` 下，需要排除分类导航链接。

use std::time::Duration;

use crate::models::SourceId;
use crate::services::{ExtractionRules, LinkRules};
use crate::sources::{RecipeSource, SourceProfile};

static PROFILE: SourceProfile = SourceProfile {
    id: SourceId::MarksAndSpencer,
    base_url: "https://www.marksandspencer.com",
    listing_path: "/c/food-and-wine/cooking/collections/1799/air-fryer-recipes/",
    listing_wait: Duration::from_secs(15),
    links: LinkRules {
        anchor_selector: r#"a[href*="/recipes/"]"#,
        required: "/recipes/",
        reject_suffixes: &["/recipes", "/recipes/"],
        reject_containing: &["/collections/", "/c/food-and-wine/"],
        reject_slug_prefixes: &[],
        nested_collections: &[],
        case_insensitive: true,
    },
    extraction: ExtractionRules {
        unit_tokens: &["g", "kg", "ml", "tbsp", "tsp"],
        ..ExtractionRules::STANDARD
    },
    page_navigation_fatal: true,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct MarksAndSpencer;

impl RecipeSource for MarksAndSpencer {
    fn profile(&self) -> &SourceProfile {
        &PROFILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_and_spencer_links() {
        let rules = &MarksAndSpencer.profile().links;
        assert!(rules.accepts("https://www.marksandspencer.com/food/recipes/air-fryer-fish-cakes"));
        assert!(rules.accepts("https://www.marksandspencer.com/Food/Recipes/Air-Fryer-Fish-Cakes"));
        assert!(!rules.accepts("https://www.marksandspencer.com/c/food-and-wine/recipes/mains"));
        assert!(!rules.accepts("https://www.marksandspencer.com/food/collections/recipes/easy"));
        assert!(!rules.accepts("https://www.marksandspencer.com/food/RECIPES/"));
    }

    #[test]
    fn test_marks_and_spencer_matches_kilograms() {
        assert!(MarksAndSpencer.profile().extraction.unit_tokens.contains(&"kg"));
    }
}
