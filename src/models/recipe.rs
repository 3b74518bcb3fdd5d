//! 菜谱数据模型
//!
//! `RecipeDraft` 是适配器产出的临时数据，`Recipe` 是存储层持有的持久化数据。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DraftRejection;
use crate::models::SourceId;

/// 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    /// 解析不出难度时的默认值
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 存储层分配的菜谱 ID，对编排层不透明
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub u64);

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 菜谱草稿
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    pub description: Option<String>,
    pub source: SourceId,
    pub source_url: String,
    pub image_url: Option<String>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    /// 解析结果，未识别时为 None
    pub difficulty: Option<Difficulty>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
}

impl RecipeDraft {
    /// 创建草稿，标题为空或配料/步骤为空时拒绝
    pub fn new(
        source: SourceId,
        source_url: impl Into<String>,
        title: impl Into<String>,
        ingredients: Vec<String>,
        instructions: Vec<String>,
    ) -> Result<Self, DraftRejection> {
        let draft = Self {
            title: title.into(),
            description: None,
            source,
            source_url: source_url.into(),
            image_url: None,
            prep_time: None,
            cook_time: None,
            servings: None,
            difficulty: None,
            ingredients,
            instructions,
            tags: Vec::new(),
        };
        draft.validate()?;
        Ok(draft)
    }

    /// 检查持久化前置条件
    pub fn validate(&self) -> Result<(), DraftRejection> {
        if self.title.trim().is_empty() {
            return Err(DraftRejection::MissingTitle);
        }
        if self.ingredients.is_empty() {
            return Err(DraftRejection::MissingIngredients);
        }
        if self.instructions.is_empty() {
            return Err(DraftRejection::MissingInstructions);
        }
        Ok(())
    }

    /// 实际生效的难度（缺省为 MEDIUM）
    pub fn effective_difficulty(&self) -> Difficulty {
        self.difficulty.unwrap_or_default()
    }
}

/// 持久化的菜谱
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: Option<String>,
    pub source: SourceId,
    pub source_url: String,
    pub image_url: Option<String>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub difficulty: Difficulty,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// 由草稿构造，在这里补上默认难度
    pub fn from_draft(id: RecipeId, draft: RecipeDraft, now: DateTime<Utc>) -> Self {
        let difficulty = draft.effective_difficulty();
        Self {
            id,
            title: draft.title,
            description: draft.description,
            source: draft.source,
            source_url: draft.source_url,
            image_url: draft.image_url,
            prep_time: draft.prep_time,
            cook_time: draft.cook_time,
            servings: draft.servings,
            difficulty,
            ingredients: draft.ingredients,
            instructions: draft.instructions,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// 用新草稿覆盖内容，保留 ID 和创建时间
    pub fn apply_draft(&mut self, draft: RecipeDraft, now: DateTime<Utc>) {
        let created_at = self.created_at;
        *self = Recipe::from_draft(self.id, draft, now);
        self.created_at = created_at;
    }
}
