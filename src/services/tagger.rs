//! 标签推导 - 业务能力层

use crate::models::RecipeDraft;

/// 标题里出现即作为标签的食材/菜式词
const FOOD_WORDS: &[&str] = &[
    "chicken", "beef", "pork", "lamb", "fish", "salmon", "cod", "vegetarian", "vegan", "pasta",
    "rice", "curry", "soup", "salad", "dessert", "cake", "pie", "tart", "bread",
];

/// 烹饪时间不超过此值（分钟）打上 quick
const QUICK_COOK_MINUTES: u32 = 20;

/// 推导标签：难度、标题中的食材词、quick。保持首次出现顺序，不重复。
pub fn derive_tags(draft: &RecipeDraft) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let mut push = |tag: String| {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    };

    push(draft.effective_difficulty().as_str().to_lowercase());

    for word in draft.title.to_lowercase().split_whitespace() {
        if FOOD_WORDS.contains(&word) {
            push(word.to_string());
        }
    }

    if draft
        .cook_time
        .is_some_and(|minutes| minutes <= QUICK_COOK_MINUTES)
    {
        push("quick".to_string());
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, SourceId};

    fn draft(title: &str) -> RecipeDraft {
        RecipeDraft::new(
            SourceId::Waitrose,
            "https://www.waitrose.com/ecom/recipes/x",
            title,
            vec!["1 chicken".into()],
            vec!["Cook".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_tags_from_title_and_difficulty() {
        let mut d = draft("Chicken and rice chicken bowl");
        d.difficulty = Some(Difficulty::Easy);
        assert_eq!(derive_tags(&d), vec!["easy", "chicken", "rice"]);
    }

    #[test]
    fn test_default_difficulty_and_quick() {
        let mut d = draft("Halloumi fries");
        d.cook_time = Some(12);
        assert_eq!(derive_tags(&d), vec!["medium", "quick"]);

        d.cook_time = Some(21);
        assert_eq!(derive_tags(&d), vec!["medium"]);
    }
}
