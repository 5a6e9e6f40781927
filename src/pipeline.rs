//! End-to-end parsing: question text -> [`QueryPlan`].
//!
//! A [`QueryParser`] owns the read-only state (rules, mappings, tunables) and
//! a schema provider. It holds no mutable state, so one instance can serve
//! any number of questions, including from several threads when the provider
//! is `Sync`.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{EntityMapping, PlannerSettings, Settings, TimeFieldMapping};
use crate::metadata::SchemaProvider;
use crate::planner::{
    classify, ChartType, IntentExtractor, QueryIntent, SqlSynthesizer, TableMatch, TableResolver,
    TimeResolver,
};
use crate::rules::RuleSet;

/// Message reported when no table matches.
pub const NO_TABLE_MESSAGE: &str = "无法找到匹配的数据表";

/// Hint reported alongside [`NO_TABLE_MESSAGE`].
pub const NO_TABLE_SUGGESTION: &str = "请检查查询内容，尝试使用更明确的表名关键词";

/// Error type for planning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("{message}")]
    NoTableMatch { message: String, suggestion: String },
}

impl PlanError {
    fn no_table_match() -> Self {
        PlanError::NoTableMatch {
            message: NO_TABLE_MESSAGE.to_string(),
            suggestion: NO_TABLE_SUGGESTION.to_string(),
        }
    }

    pub fn suggestion(&self) -> &str {
        match self {
            PlanError::NoTableMatch { suggestion, .. } => suggestion,
        }
    }
}

/// Result type for planning.
pub type PlanResult<T> = Result<T, PlanError>;

/// Everything the planner decided for one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPlan {
    pub primary_table: String,
    /// Other plausible tables. Never joined into the SQL.
    pub related_tables: Vec<String>,
    pub sql_query: String,
    pub query_intent: QueryIntent,
    pub chart_type: ChartType,
    pub table_matches: Vec<TableMatch>,
}

/// Serializable outcome: the plan with `success: true`, or the failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub success: bool,
    #[serde(flatten)]
    pub plan: Option<QueryPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl From<PlanResult<QueryPlan>> for PlanReport {
    fn from(result: PlanResult<QueryPlan>) -> Self {
        match result {
            Ok(plan) => Self {
                success: true,
                plan: Some(plan),
                error: None,
                suggestion: None,
            },
            Err(err) => Self {
                success: false,
                plan: None,
                suggestion: Some(err.suggestion().to_string()),
                error: Some(err.to_string()),
            },
        }
    }
}

/// Turns questions into plans against one schema.
#[derive(Debug)]
pub struct QueryParser<P: SchemaProvider> {
    provider: P,
    rules: RuleSet,
    entities: EntityMapping,
    time_fields: TimeFieldMapping,
    planner: PlannerSettings,
}

impl<P: SchemaProvider> QueryParser<P> {
    pub fn new(provider: P, settings: Settings) -> Self {
        let rules = RuleSet::with_overrides(settings.custom_patterns);
        Self {
            provider,
            rules,
            entities: settings.entity_mappings,
            time_fields: settings.time_field_mappings,
            planner: settings.planner,
        }
    }

    /// A parser with built-in rules and no mappings.
    pub fn with_defaults(provider: P) -> Self {
        Self::new(provider, Settings::default())
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.planner
    }

    fn time_resolver(&self) -> TimeResolver<'_> {
        TimeResolver::new(
            &self.rules,
            &self.time_fields,
            &self.planner.default_time_field,
            self.planner.dialect,
        )
    }

    /// Ranked candidate tables for `query`.
    pub fn match_tables(&self, query: &str) -> Vec<TableMatch> {
        TableResolver::new(&self.entities, &self.provider).resolve(query)
    }

    /// Intent of `query` against `table`.
    pub fn extract_intent(&self, query: &str, table: Option<&str>) -> QueryIntent {
        IntentExtractor::new(&self.rules, &self.provider, self.time_resolver())
            .extract(query, table)
    }

    /// Plan `query` end to end.
    pub fn parse_query(&self, query: &str) -> PlanResult<QueryPlan> {
        let table_matches = self.match_tables(query);
        let Some(primary) = table_matches.first() else {
            info!(query, "no table matched");
            return Err(PlanError::no_table_match());
        };
        let primary_table = primary.table.clone();

        let query_intent = self.extract_intent(query, Some(&primary_table));
        let related_tables = self.related_tables(&table_matches);
        let sql_query = SqlSynthesizer::new(&self.provider, &self.planner).synthesize(
            &primary_table,
            &related_tables,
            &query_intent,
            query,
        );
        let chart_type = classify(&query_intent, query);

        debug!(
            table = %primary_table,
            score = primary.score,
            %chart_type,
            "planned query"
        );

        Ok(QueryPlan {
            primary_table,
            related_tables,
            sql_query,
            query_intent,
            chart_type,
            table_matches,
        })
    }

    /// Plan `query` and wrap the outcome for serialization.
    pub fn report(&self, query: &str) -> PlanReport {
        self.parse_query(query).into()
    }

    /// Secondary matches worth mentioning, only when the primary is weak.
    fn related_tables(&self, matches: &[TableMatch]) -> Vec<String> {
        match matches.split_first() {
            Some((primary, rest)) if primary.score < self.planner.related_primary_ceiling => rest
                .iter()
                .filter(|m| m.score > self.planner.related_score_threshold)
                .map(|m| m.table.clone())
                .collect(),
            _ => Vec::new(),
        }
    }
}
