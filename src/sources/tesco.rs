//! Tesco Real Food

use std::time::Duration;

use crate::models::SourceId;
use crate::services::{ExtractionRules, LinkRules};
use crate::sources::{RecipeSource, SourceProfile};

static PROFILE: SourceProfile = SourceProfile {
    id: SourceId::Tesco,
    base_url: "https://realfood.tesco.com",
    listing_path: "/category/air-fryer.html",
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
pub struct Tesco;

impl RecipeSource for Tesco {
    fn profile(&self) -> &SourceProfile {
        &PROFILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tesco_links() {
        let rules = &Tesco.profile().links;
        assert!(rules.accepts("https://realfood.tesco.com/recipes/air-fryer-chicken-thighs.html"));
        assert!(!rules.accepts("https://realfood.tesco.com/recipes/"));
        assert!(!rules.accepts("https://realfood.tesco.com/category/air-fryer.html"));
    }
}
