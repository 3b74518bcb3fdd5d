//! BBC Food

use std::time::Duration;

use crate::models::SourceId;
use crate::services::{ExtractionRules, LinkRules};
use crate::sources::{RecipeSource, SourceProfile};

static PROFILE: SourceProfile = SourceProfile {
    id: SourceId::BbcGoodFood,
    base_url: "https://www.bbc.co.uk",
    listing_path: "/food/collections/air_fryer_recipes",
    listing_wait: Duration::from_secs(15),
    links: LinkRules {
        anchor_selector: r#"a[href*="/food/recipes/"]"#,
        required: "/food/recipes/",
        reject_suffixes: &["/food/recipes", "/food/recipes/"],
        reject_containing: &["/collections/"],
        reject_slug_prefixes: &[],
        nested_collections: &[],
        case_insensitive: true,
    },
    extraction: ExtractionRules::STANDARD,
    page_navigation_fatal: true,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct BbcGoodFood;

impl RecipeSource for BbcGoodFood {
    fn profile(&self) -> &SourceProfile {
        &PROFILE
    }
}
