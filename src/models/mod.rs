pub mod recipe;
pub mod scrape_run;
pub mod source;

pub use recipe::{Difficulty, Recipe, RecipeDraft, RecipeId};
pub use scrape_run::{RunCounters, RunId, RunStatus, ScrapeRun};
pub use source::SourceId;
