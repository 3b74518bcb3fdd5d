use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 菜谱来源枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceId {
    /// ALDI 英国
    Aldi,
    /// Waitrose
    Waitrose,
    /// Tesco Real Food
    Tesco,
    /// Marks & Spencer
    MarksAndSpencer,
    /// BBC Good Food
    BbcGoodFood,
}

/// 名称与别名（全部小写）
static SOURCE_NAMES: phf::Map<&'static str, SourceId> = phf_map! {
    "aldi" => SourceId::Aldi,
    "waitrose" => SourceId::Waitrose,
    "tesco" => SourceId::Tesco,
    "marks_and_spencer" => SourceId::MarksAndSpencer,
    "marks-and-spencer" => SourceId::MarksAndSpencer,
    "m&s" => SourceId::MarksAndSpencer,
    "mands" => SourceId::MarksAndSpencer,
    "bbc_good_food" => SourceId::BbcGoodFood,
    "bbc-good-food" => SourceId::BbcGoodFood,
    "bbc" => SourceId::BbcGoodFood,
};

impl SourceId {
    /// 固定顺序，`run_all` 按此顺序处理
    pub const ALL: [SourceId; 5] = [
        SourceId::Aldi,
        SourceId::Waitrose,
        SourceId::Tesco,
        SourceId::MarksAndSpencer,
        SourceId::BbcGoodFood,
    ];

    /// 标准名称（与序列化结果一致）
    pub fn name(self) -> &'static str {
        match self {
            SourceId::Aldi => "ALDI",
            SourceId::Waitrose => "WAITROSE",
            SourceId::Tesco => "TESCO",
            SourceId::MarksAndSpencer => "MARKS_AND_SPENCER",
            SourceId::BbcGoodFood => "BBC_GOOD_FOOD",
        }
    }

    /// 显示名称（日志用）
    pub fn display_name(self) -> &'static str {
        match self {
            SourceId::Aldi => "ALDI",
            SourceId::Waitrose => "Waitrose",
            SourceId::Tesco => "Tesco",
            SourceId::MarksAndSpencer => "Marks & Spencer",
            SourceId::BbcGoodFood => "BBC Good Food",
        }
    }

    /// 从名称或别名解析，忽略大小写
    pub fn find(s: &str) -> Option<Self> {
        SOURCE_NAMES.get(s.trim().to_lowercase().as_str()).copied()
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_accepts_names_and_aliases() {
        assert_eq!(SourceId::find("ALDI"), Some(SourceId::Aldi));
        assert_eq!(SourceId::find("Marks_And_Spencer"), Some(SourceId::MarksAndSpencer));
        assert_eq!(SourceId::find("m&s"), Some(SourceId::MarksAndSpencer));
        assert_eq!(SourceId::find(" bbc "), Some(SourceId::BbcGoodFood));
        assert_eq!(SourceId::find("sainsburys"), None);
    }

    #[test]
    fn test_every_name_round_trips() {
        for source in SourceId::ALL {
            assert_eq!(SourceId::find(source.name()), Some(source));
        }
    }
}
