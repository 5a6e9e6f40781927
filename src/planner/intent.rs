//! Intent extraction: what kind of aggregate, grouping, fields and time range
//! a question asks for.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::time::{TimeCondition, TimeResolver};
use crate::metadata::SchemaProvider;
use crate::rules::{names, parse_digits, RuleSet, RANGE_RULES};

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9０-９]+").unwrap());

/// Semantic field categories and the words that mention them.
const FIELD_CATEGORIES: &[(&str, &[&str])] = &[
    ("id", &["id", "编号", "ID"]),
    ("name", &["name", "名称", "姓名", "标题"]),
    ("email", &["email", "邮箱", "邮件"]),
    ("time", &["time", "时间", "日期"]),
    ("date", &["date", "日期"]),
    ("count", &["count", "数量", "个数"]),
    ("status", &["status", "状态"]),
    ("type", &["type", "类型", "种类"]),
];

/// Column-name fragments that make a column a likely grouping key.
const GROUP_KEYWORDS: &[&str] = &["module", "type", "category", "status", "level", "group", "class"];

/// Everything the planner understood about one question.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryIntent {
    /// Rules that matched, by name. Only matched rules are present.
    pub flags: BTreeMap<String, bool>,

    /// Integer literals in reading order.
    pub numbers: Vec<u64>,

    /// Requested page size; set only when the pagination rule matched.
    pub page_size: Option<u64>,

    /// Field categories mentioned, in category order.
    pub fields: Vec<String>,

    /// At most one entry.
    pub time_conditions: Vec<TimeCondition>,

    /// Column to group by, if the table has a plausible one.
    pub group_field: Option<String>,
}

impl QueryIntent {
    /// Whether the named rule matched.
    pub fn has(&self, rule: &str) -> bool {
        self.flags.get(rule).copied().unwrap_or(false)
    }

    pub fn time_condition(&self) -> Option<&TimeCondition> {
        self.time_conditions.first()
    }

    /// A grouping applies only when both a column and the grouping rule are present.
    pub fn is_grouped(&self) -> bool {
        self.group_field.is_some() && self.has(names::GROUP_BY)
    }

    /// Numbers left after removing the one the time phrase consumed.
    pub fn free_numbers(&self) -> Vec<u64> {
        let mut numbers = self.numbers.clone();
        let consumed = self
            .time_condition()
            .and_then(|c| c.window.magnitude())
            .map(u64::from);
        if let Some(consumed) = consumed {
            if let Some(pos) = numbers.iter().position(|n| *n == consumed) {
                numbers.remove(pos);
            }
        }
        numbers
    }
}

/// Builds a [`QueryIntent`] from query text and the resolved table.
pub struct IntentExtractor<'a, P: SchemaProvider + ?Sized> {
    rules: &'a RuleSet,
    provider: &'a P,
    time: TimeResolver<'a>,
}

impl<'a, P: SchemaProvider + ?Sized> IntentExtractor<'a, P> {
    pub fn new(rules: &'a RuleSet, provider: &'a P, time: TimeResolver<'a>) -> Self {
        Self {
            rules,
            provider,
            time,
        }
    }

    pub fn extract(&self, query: &str, table: Option<&str>) -> QueryIntent {
        let lowered = query.to_lowercase();

        let flags = self
            .rules
            .iter()
            .filter(|rule| !RANGE_RULES.contains(&rule.name.as_str()))
            .filter(|rule| rule.pattern.is_match(&lowered))
            .map(|rule| (rule.name.clone(), true))
            .collect();

        let numbers = extract_numbers(query);
        let page_size = self.page_size(&lowered, &numbers);

        QueryIntent {
            flags,
            numbers,
            page_size,
            fields: extract_fields(&lowered),
            time_conditions: self.time.resolve(&lowered, table),
            group_field: table.and_then(|t| self.group_field(&lowered, t)),
        }
    }

    /// The number inside the pagination phrase ("前20个", "第2页"), else the
    /// first number in the query.
    fn page_size(&self, lowered: &str, numbers: &[u64]) -> Option<u64> {
        let phrase = self.rules.get(names::PAGINATION)?.find(lowered)?;
        extract_numbers(phrase.as_str())
            .first()
            .or(numbers.first())
            .copied()
    }

    /// A column named in the query, else the first column that looks like a
    /// grouping key.
    fn group_field(&self, lowered: &str, table: &str) -> Option<String> {
        let columns = self.provider.columns(table);

        columns
            .iter()
            .find(|c| lowered.contains(c.to_lowercase().as_str()))
            .or_else(|| {
                columns.iter().find(|c| {
                    let c = c.to_lowercase();
                    GROUP_KEYWORDS.iter().any(|k| c.contains(k))
                })
            })
            .cloned()
    }
}

/// Every maximal digit run, ASCII or full-width, in order. Runs too large
/// for `u64` are skipped.
pub fn extract_numbers(query: &str) -> Vec<u64> {
    NUMBER
        .find_iter(query)
        .filter_map(|m| parse_digits(m.as_str()))
        .collect()
}

/// Field categories whose synonyms occur in the (lowercased) query.
pub fn extract_fields(lowered: &str) -> Vec<String> {
    FIELD_CATEGORIES
        .iter()
        .filter(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(field, _)| field.to_string())
        .collect()
}
