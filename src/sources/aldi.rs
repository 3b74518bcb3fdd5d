//! Aldi UK
//!
//! 菜谱直接挂在空气炸锅集合下：`/recipes/collections/air-fryer/<slug>`。

use std::time::Duration;

use crate::models::SourceId;
use crate::services::{ExtractionRules, LinkRules};
use crate::sources::{RecipeSource, SourceProfile};

static PROFILE: SourceProfile = SourceProfile {
    id: SourceId::Aldi,
    base_url: "https://www.aldi.co.uk",
    listing_path: "/recipes/collections/air-fryer",
    listing_wait: Duration::from_secs(10),
    links: LinkRules {
        anchor_selector: "a[href]",
        required: "/recipes/collections/air-fryer/",
        reject_suffixes: &[],
        reject_containing: &[],
        reject_slug_prefixes: &[],
        nested_collections: &["/recipes/collections/air-fryer/"],
        case_insensitive: true,
    },
    extraction: ExtractionRules {
        method_keywords: &["method"],
        strip_image_query: false,
        ..ExtractionRules::STANDARD
    },
    page_navigation_fatal: true,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Aldi;

impl RecipeSource for Aldi {
    fn profile(&self) -> &SourceProfile {
        &PROFILE
    }
}
