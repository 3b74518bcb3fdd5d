//! Waitrose

use std::time::Duration;

use crate::models::SourceId;
use crate::services::{ExtractionRules, LinkRules};
use crate::sources::{RecipeSource, SourceProfile};

static PROFILE: SourceProfile = SourceProfile {
    id: SourceId::Waitrose,
    base_url: "https://www.waitrose.com",
    listing_path: "/ecom/recipes/air-fryer",
    listing_wait: Duration::from_secs(10),
    links: LinkRules {
        anchor_selector: r#"a[href*="/recipes/"]"#,
        required: "/recipes/",
        reject_suffixes: &["/recipes", "/recipes/"],
        reject_containing: &[],
        reject_slug_prefixes: &[],
        nested_collections: &[],
        case_insensitive: false,
    },
    extraction: ExtractionRules::STANDARD,
    page_navigation_fatal: true,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Waitrose;

impl RecipeSource for Waitrose {
    fn profile(&self) -> &SourceProfile {
        &PROFILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waitrose_links() {
        let rules = &Waitrose.profile().links;
        assert!(rules.accepts("https://www.waitrose.com/ecom/recipes/air-fryer-salmon"));
        assert!(!rules.accepts("https://www.waitrose.com/ecom/recipes/"));
        assert!(!rules.accepts("https://www.waitrose.com/ecom/recipes"));
        // 区分大小写
        assert!(!rules.accepts("https://www.waitrose.com/ecom/RECIPES/air-fryer-salmon"));
    }
}
