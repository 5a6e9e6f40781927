//! Named query patterns.
//!
//! A [`RuleSet`] is an ordered list of `name -> regex` pairs. It is built once
//! from the built-in defaults, overlaid with any custom patterns from the
//! configuration, and never mutated afterwards. Patterns are matched against
//! the lowercased query text.
//!
//! Most rules are plain presence tests ("does the question mention an
//! average?"). The three range rules ([`names::LAST_DAYS`],
//! [`names::LAST_WEEKS`], [`names::LAST_MONTHS`]) also capture a magnitude and
//! are only consulted by the time resolver.

use regex::Regex;
use tracing::warn;

/// Names of the built-in rules.
pub mod names {
    pub const COUNT: &str = "count";
    pub const SUM: &str = "sum";
    pub const AVG: &str = "avg";
    pub const MAX: &str = "max";
    pub const MIN: &str = "min";
    pub const GROUP_BY: &str = "group_by";
    pub const LAST_DAYS: &str = "last_days";
    pub const LAST_WEEKS: &str = "last_weeks";
    pub const LAST_MONTHS: &str = "last_months";
    pub const TODAY: &str = "today";
    pub const YESTERDAY: &str = "yesterday";
    pub const THIS_WEEK: &str = "this_week";
    pub const LAST_WEEK: &str = "last_week";
    pub const THIS_MONTH: &str = "this_month";
    pub const LAST_MONTH: &str = "last_month";
    pub const THIS_YEAR: &str = "this_year";
    pub const ORDER_DESC: &str = "order_desc";
    pub const ORDER_ASC: &str = "order_asc";
    pub const PAGINATION: &str = "pagination";
}

/// Rules that carry a magnitude and never become intent flags.
pub const RANGE_RULES: [&str; 3] = [names::LAST_DAYS, names::LAST_WEEKS, names::LAST_MONTHS];

/// Built-in patterns, in evaluation order.
pub const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    // aggregation
    (names::COUNT, r"(多少|几个|数量|总数|统计|注册量|新增量|人数|次数|用户数)"),
    (names::SUM, r"(总和|总量|总计|累计)"),
    (names::AVG, r"(平均|均值)"),
    (names::MAX, r"(最高|最大|最多)"),
    (names::MIN, r"(最低|最小|最少)"),
    // grouping
    (
        names::GROUP_BY,
        r"(各个|每个|按.*分组|分组.*统计|分别统计|.*的(使用|统计|情况))",
    ),
    // relative ranges
    (names::LAST_DAYS, r"(最近|过去|前)(\d+)(天|日)"),
    (names::LAST_WEEKS, r"(最近|过去|前)(\d+)(周|星期)"),
    (names::LAST_MONTHS, r"(最近|过去|前)(\d+)(个?月)"),
    // calendar windows
    (names::TODAY, r"(今天|今日)"),
    (names::YESTERDAY, r"(昨天|昨日)"),
    (names::THIS_WEEK, r"(这周|本周)"),
    (names::LAST_WEEK, r"(上周|上一周)"),
    (names::THIS_MONTH, r"(这个月|本月)"),
    (names::LAST_MONTH, r"(上个月|上月)"),
    (names::THIS_YEAR, r"(今年|本年)"),
    // ordering
    (names::ORDER_DESC, r"(最新|最近|倒序)"),
    (names::ORDER_ASC, r"(最早|最旧|正序)"),
    // paging
    (names::PAGINATION, r"(分页|前\d+个|第\d+页)"),
    // business entities
    ("user", r"(用户|会员|客户)"),
    ("order", r"(订单)"),
    ("product", r"(商品|产品)"),
    ("app", r"(app|应用)"),
    ("launch", r"(启动|打开|使用)"),
    ("register", r"(注册|新用户)"),
    ("active", r"(活跃|登录|在线)"),
];

/// A single compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub pattern: Regex,
}

/// Immutable, ordered collection of named patterns.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleSet {
    /// The built-in rules only.
    pub fn builtin() -> Self {
        Self::with_overrides(std::iter::empty::<(&str, &str)>())
    }

    /// Built-in rules overlaid with custom patterns.
    ///
    /// A custom pattern replaces the built-in rule of the same name in place;
    /// unknown names are appended in the order given. A pattern that does not
    /// compile is skipped and the existing rule, if any, is kept.
    pub fn with_overrides<I, N, P>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: AsRef<str>,
        P: AsRef<str>,
    {
        let mut rules: Vec<Rule> = DEFAULT_PATTERNS
            .iter()
            .filter_map(|(name, pattern)| compile(name, pattern))
            .collect();

        for (name, pattern) in overrides {
            let (name, pattern) = (name.as_ref(), pattern.as_ref());
            let Some(rule) = compile(name, pattern) else {
                continue;
            };
            match rules.iter_mut().find(|r| r.name == name) {
                Some(existing) => *existing = rule,
                None => rules.push(rule),
            }
        }

        Self { rules }
    }

    /// Look up a rule's pattern by name.
    pub fn get(&self, name: &str) -> Option<&Regex> {
        self.rules
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.pattern)
    }

    /// Whether the named rule matches anywhere in `text`.
    ///
    /// Unknown rule names never match.
    pub fn is_match(&self, name: &str, text: &str) -> bool {
        self.get(name).is_some_and(|re| re.is_match(text))
    }

    /// Magnitude captured by the named rule: the first capture group of the
    /// first match that parses as an integer.
    pub fn magnitude(&self, name: &str, text: &str) -> Option<u32> {
        let caps = self.get(name)?.captures(text)?;
        caps.iter()
            .skip(1)
            .flatten()
            .find_map(|m| parse_digits(m.as_str()).and_then(|n| u32::try_from(n).ok()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Parse a run of ASCII or full-width (`０`-`９`) decimal digits.
///
/// IME input often produces full-width digits, and `\d` in a pattern
/// matches them too. Returns `None` for empty text, any other character,
/// or a value that overflows `u64`.
pub fn parse_digits(text: &str) -> Option<u64> {
    if text.is_empty() {
        return None;
    }
    text.chars().try_fold(0u64, |acc, c| {
        let digit = match c {
            '0'..='9' => u32::from(c) - u32::from('0'),
            '０'..='９' => u32::from(c) - u32::from('０'),
            _ => return None,
        };
        acc.checked_mul(10)?.checked_add(u64::from(digit))
    })
}

fn compile(name: &str, pattern: &str) -> Option<Rule> {
    match Regex::new(pattern) {
        Ok(re) => Some(Rule {
            name: name.to_string(),
            pattern: re,
        }),
        Err(err) => {
            warn!(rule = name, %err, "skipping query pattern that does not compile");
            None
        }
    }
}
