//! 本地名言库
//!
//! 加载静态 JSON 包并按分类分桶，加载后不可变

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};

use crate::error::QuoteError;
use crate::models::{ALL_CATEGORY, Quote, coerce_to_string};

/// 名言包的两种形态
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteBundle {
    /// [{ en, ..., cat }, ...]
    List(Vec<Value>),
    /// { "分类": [{ en, ... }, ...] }
    Map(Map<String, Value>),
}

impl QuoteBundle {
    pub fn parse(text: &str) -> Result<Self, QuoteError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, QuoteError> {
        match value {
            Value::Array(items) => Ok(QuoteBundle::List(items)),
            Value::Object(map) => Ok(QuoteBundle::Map(map)),
            other => Err(QuoteError::Parse(format!(
                "expected a list or a category map, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// 分类 -> 名言列表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteStore {
    buckets: BTreeMap<String, Vec<Quote>>,
    union: Vec<Quote>,
}

impl QuoteStore {
    pub fn from_bundle(bundle: QuoteBundle) -> Self {
        let mut buckets: BTreeMap<String, Vec<Quote>> = BTreeMap::new();

        match bundle {
            QuoteBundle::List(records) => {
                for record in &records {
                    let quote = Quote::normalize(record);
                    for category in record_categories(record) {
                        push_unique(buckets.entry(category).or_default(), &quote);
                    }
                }
            }
            QuoteBundle::Map(map) => {
                for (category, records) in map {
                    let bucket = buckets.entry(category).or_default();
                    if let Value::Array(items) = records {
                        for item in &items {
                            push_unique(bucket, &Quote::normalize(item));
                        }
                    }
                }
            }
        }

        // 并集按身份键去重
        let mut seen = HashSet::new();
        let union = buckets
            .values()
            .flatten()
            .filter(|quote| seen.insert(quote.key()))
            .cloned()
            .collect();
        Self { buckets, union }
    }

    /// 空库：仅含一个空的 "All" 分类
    pub fn empty_fallback() -> Self {
        let mut buckets = BTreeMap::new();
        buckets.insert(ALL_CATEGORY.to_string(), Vec::new());
        Self {
            buckets,
            union: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// 分类名（已排序）
    pub fn categories(&self) -> Vec<String> {
        self.buckets.keys().cloned().collect()
    }

    pub fn bucket(&self, category: &str) -> &[Quote] {
        self.buckets.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 所有分类的并集（按分类顺序拼接）
    pub fn all_quotes(&self) -> &[Quote] {
        &self.union
    }

    pub fn total_len(&self) -> usize {
        self.union.len()
    }
}

/// 同一分类内身份键相同的名言只保留第一条
fn push_unique(bucket: &mut Vec<Quote>, quote: &Quote) {
    let key = quote.key();
    if !bucket.iter().any(|existing| existing.key() == key) {
        bucket.push(quote.clone());
    }
}

/// 记录所属分类（去重，保持首次出现的顺序）：cat / category / categories / tags
fn record_categories(record: &Value) -> Vec<String> {
    let raw = record.as_object().and_then(|object| {
        ["cat", "category", "categories", "tags"]
            .iter()
            .filter_map(|name| object.get(*name))
            .find(|value| !value.is_null())
    });

    match raw {
        Some(value @ Value::String(_)) => vec![category_name(value)],
        Some(Value::Array(items)) if !items.is_empty() => {
            let mut names: Vec<String> = Vec::with_capacity(items.len());
            for name in items.iter().map(category_name) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            names
        }
        _ => vec![ALL_CATEGORY.to_string()],
    }
}

/// 假值（空串、null、false、0）归入 "All"
fn category_name(value: &Value) -> String {
    let falsy = match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    };
    if falsy {
        ALL_CATEGORY.to_string()
    } else {
        coerce_to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ens(quotes: &[Quote]) -> Vec<&str> {
        quotes.iter().map(|q| q.en.as_str()).collect()
    }

    #[test]
    fn test_list_bucketing() {
        let bundle = QuoteBundle::from_value(json!([
            { "en": "a", "cat": "X" },
            { "en": "b", "cat": ["X", "Y"] }
        ]))
        .unwrap();
        let store = QuoteStore::from_bundle(bundle);

        assert_eq!(store.categories(), vec!["X", "Y"]);
        assert_eq!(ens(store.bucket("X")), vec!["a", "b"]);
        assert_eq!(ens(store.bucket("Y")), vec!["b"]);
    }

    #[test]
    fn test_list_category_defaults() {
        let bundle = QuoteBundle::from_value(json!([
            { "en": "none" },
            { "en": "empty-list", "tags": [] },
            { "en": "falsy", "category": ["", null, "Z"] },
            { "en": "number", "cat": 5 },
            { "en": "alt", "categories": "W" }
        ]))
        .unwrap();
        let store = QuoteStore::from_bundle(bundle);

        assert_eq!(
            ens(store.bucket(ALL_CATEGORY)),
            vec!["none", "empty-list", "falsy", "number"]
        );
        assert_eq!(ens(store.bucket("Z")), vec!["falsy"]);
        assert_eq!(ens(store.bucket("W")), vec!["alt"]);
    }

    #[test]
    fn test_map_shape() {
        let bundle = QuoteBundle::parse(
            r#"{ "Life": [{ "en": "a" }, { "text": "b" }], "Broken": "oops" }"#,
        )
        .unwrap();
        let store = QuoteStore::from_bundle(bundle);

        assert_eq!(store.categories(), vec!["Broken", "Life"]);
        assert_eq!(ens(store.bucket("Life")), vec!["a", "b"]);
        assert!(store.bucket("Broken").is_empty());
        assert!(store.bucket("Missing").is_empty());
        assert_eq!(store.total_len(), 2);
    }

    #[test]
    fn test_cross_listed_quotes_are_not_duplicated() {
        let bundle = QuoteBundle::from_value(json!({
            "Empty": [],
            "X": [{ "en": "q" }],
            "Y": [{ "en": "q" }, { "en": "r" }, { "en": "r" }]
        }))
        .unwrap();
        let store = QuoteStore::from_bundle(bundle);

        assert_eq!(ens(store.all_quotes()), vec!["q", "r"]);
        assert_eq!(ens(store.bucket("Y")), vec!["q", "r"]);

        let bundle = QuoteBundle::from_value(json!([
            { "en": "a", "cat": ["X", "X"] },
            { "en": "b", "cat": "X" }
        ]))
        .unwrap();
        let store = QuoteStore::from_bundle(bundle);
        assert_eq!(ens(store.bucket("X")), vec!["a", "b"]);
        assert_eq!(store.total_len(), 2);
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            QuoteBundle::parse("not json"),
            Err(QuoteError::Parse(_))
        ));
        assert!(matches!(QuoteBundle::parse("42"), Err(QuoteError::Parse(_))));
    }

    #[test]
    fn test_empty_fallback() {
        let store = QuoteStore::empty_fallback();
        assert_eq!(store.categories(), vec![ALL_CATEGORY]);
        assert!(store.all_quotes().is_empty());
        assert!(QuoteStore::from_bundle(QuoteBundle::List(Vec::new())).is_empty());
    }
}
