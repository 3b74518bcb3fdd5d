use std::sync::Arc;

use crate::models::SourceId;
use crate::sources::{Aldi, BbcGoodFood, MarksAndSpencer, RecipeSource, Tesco, Waitrose};

/// 有序的来源表
///
/// `run_all` 按这里的顺序逐个抓取。
#[derive(Clone)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn RecipeSource>>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<Arc<dyn RecipeSource>>) -> Self {
        Self { sources }
    }

    /// 内置的五个来源
    pub fn builtin() -> Self {
        Self::new(vec![
            Arc::new(Aldi),
            Arc::new(Waitrose),
            Arc::new(Tesco),
            Arc::new(MarksAndSpencer),
            Arc::new(BbcGoodFood),
        ])
    }

    pub fn get(&self, id: SourceId) -> Option<Arc<dyn RecipeSource>> {
        self.sources.iter().find(|s| s.id() == id).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn RecipeSource>> {
        self.sources.iter()
    }

    pub fn ids(&self) -> Vec<SourceId> {
        self.sources.iter().map(|s| s.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let registry = SourceRegistry::builtin();
        assert_eq!(registry.ids(), SourceId::ALL.to_vec());
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_get_by_id() {
        let registry = SourceRegistry::new(vec![Arc::new(Tesco)]);
        assert!(registry.get(SourceId::Tesco).is_some());
        assert!(registry.get(SourceId::Aldi).is_none());
    }
}
