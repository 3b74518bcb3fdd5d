//! 字段规范化 - 业务能力层
//!
//! 把页面上的自由文本转换成结构化字段。所有函数都是纯函数，结果确定。

use std::sync::OnceLock;

use regex::Regex;

use crate::models::Difficulty;

fn hours_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(hour|hr|h)").expect("hours pattern"))
}

fn minutes_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(minute|min|m)").expect("minutes pattern"))
}

fn integer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("integer pattern"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern"))
}

fn first_integer(text: &str) -> Option<u32> {
    integer_re().find(text)?.as_str().parse().ok()
}

fn captured_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// 时间文本转分钟
///
/// 小时和分钟分别匹配后相加；都匹配不到时取第一个整数。结果不为正数时返回 None。
///
/// - "1 hour 30 mins" → 90
/// - "45 min" → 45
/// - "90" → 90
pub fn parse_time_to_minutes(text: &str) -> Option<u32> {
    let cleaned = text.trim().to_lowercase();
    if cleaned.is_empty() {
        return None;
    }

    let hours = captured_number(hours_re(), &cleaned);
    let minutes = captured_number(minutes_re(), &cleaned);

    let total = match (hours, minutes) {
        (None, None) => first_integer(&cleaned)?,
        (h, m) => h.unwrap_or(0).saturating_mul(60).saturating_add(m.unwrap_or(0)),
    };

    (total > 0).then_some(total)
}

/// 份数：取第一个整数
///
/// - "Serves 4" → 4
/// - "4-6 people" → 4
pub fn parse_servings(text: &str) -> Option<u32> {
    first_integer(text).filter(|n| *n > 0)
}

/// 难度：按固定顺序做子串匹配，忽略大小写
///
/// "moderate" 的检查排在 "difficult" 之前，所以 "Moderately difficult" 是 MEDIUM。
/// 未识别返回 None，默认值由调用方决定。
pub fn parse_difficulty(text: &str) -> Option<Difficulty> {
    let cleaned = text.trim().to_lowercase();

    if cleaned.contains("easy") {
        return Some(Difficulty::Easy);
    }
    if cleaned.contains("medium") || cleaned.contains("moderate") {
        return Some(Difficulty::Medium);
    }
    if ["hard", "difficult", "advanced"]
        .iter()
        .any(|word| cleaned.contains(word))
    {
        return Some(Difficulty::Hard);
    }

    None
}

/// 合并所有空白（含换行）为单个空格并去掉首尾空白
pub fn clean_text(text: &str) -> String {
    whitespace_re().replace_all(text, " ").trim().to_string()
}
