//! Presentation hint for a plan.

use serde::{Deserialize, Serialize};

use super::intent::QueryIntent;
use super::synthesize::is_listing;
use crate::rules::names;

/// How the result of a plan is best shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    #[default]
    Table,
    SingleValue,
    LineChart,
    BarChart,
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChartType::Table => "table",
            ChartType::SingleValue => "single_value",
            ChartType::LineChart => "line_chart",
            ChartType::BarChart => "bar_chart",
        };
        f.write_str(name)
    }
}

type Check = fn(&QueryIntent, &str) -> bool;

/// First matching check decides.
const DECISIONS: [(Check, ChartType); 5] = [
    (|intent, _| intent.is_grouped(), ChartType::Table),
    (
        |intent, _| [names::COUNT, names::SUM, names::AVG].iter().any(|r| intent.has(r)),
        ChartType::SingleValue,
    ),
    (
        |intent, query| intent.time_condition().is_some() && query.contains("趋势"),
        ChartType::LineChart,
    ),
    (
        |_, query| query.contains("对比") || query.contains("比较"),
        ChartType::BarChart,
    ),
    (is_listing, ChartType::Table),
];

/// Pick the presentation for a plan.
pub fn classify(intent: &QueryIntent, query: &str) -> ChartType {
    DECISIONS
        .iter()
        .find(|(check, _)| check(intent, query))
        .map(|(_, chart)| *chart)
        .unwrap_or_default()
}
