pub mod extractor;
pub mod link_filter;
pub mod normalizer;
pub mod tagger;

pub use extractor::{extract_page, ExtractionRules, PageExtract};
pub use link_filter::{collect_recipe_links, LinkRules};
pub use tagger::derive_tags;
