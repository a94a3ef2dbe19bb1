use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// 兜底分类名
pub const ALL_CATEGORY: &str = "All";

/// 规范化后的名言
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub th: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub work: String,
    #[serde(default, rename = "ref")]
    pub reference: String,
}

/// 用于判断"是否刚刚展示过"的身份键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteKey(String);

impl QuoteKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// 各字段的候选键名，按优先级排列
const EN_FIELDS: &[&str] = &["en", "text", "quote"];
const TH_FIELDS: &[&str] = &["th"];
const AUTHOR_FIELDS: &[&str] = &["author", "by"];
const YEAR_FIELDS: &[&str] = &["year"];
const INFO_FIELDS: &[&str] = &["info", "description"];
const WORK_FIELDS: &[&str] = &["work", "source"];
const REF_FIELDS: &[&str] = &["ref", "link", "url"];

impl Quote {
    /// 从任意记录规范化，全函数：缺失字段一律为空串
    pub fn normalize(record: &Value) -> Self {
        Self {
            en: pick_field(record, EN_FIELDS),
            th: pick_field(record, TH_FIELDS),
            author: pick_field(record, AUTHOR_FIELDS),
            year: pick_field(record, YEAR_FIELDS),
            info: pick_field(record, INFO_FIELDS),
            work: pick_field(record, WORK_FIELDS),
            reference: pick_field(record, REF_FIELDS),
        }
    }

    pub fn key(&self) -> QuoteKey {
        QuoteKey([self.en.as_str(), self.author.as_str(), self.year.as_str()].join("||"))
    }

    /// 是否有"更多信息"可展示
    pub fn has_details(&self) -> bool {
        !self.info.is_empty() || !self.work.is_empty() || !self.reference.is_empty()
    }

    /// 署名行：— 作者 (年份)
    pub fn credit_line(&self) -> String {
        if self.author.is_empty() {
            return String::new();
        }
        if self.year.is_empty() {
            format!("— {}", self.author)
        } else {
            format!("— {} ({})", self.author, self.year)
        }
    }
}

/// 依次尝试候选键，第一个非 null 的值胜出
fn pick_field(record: &Value, names: &[&str]) -> String {
    let Some(object) = record.as_object() else {
        return String::new();
    };
    names
        .iter()
        .filter_map(|name| object.get(*name))
        .find(|value| !value.is_null())
        .map(coerce_to_string)
        .unwrap_or_default()
}

/// 把任意 JSON 值转为字符串
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        Value::Array(items) => items
            .iter()
            .map(coerce_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// 整数值的浮点数不带小数部分，1947.0 显示为 1947
fn number_to_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        _ => n.to_string(),
    }
}
