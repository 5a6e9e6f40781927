//! Query planner: the stages between question text and SQL.
//!
//! ```text
//! query text
//!     │
//!     ▼ [resolve]     entity override, else fuzzy keyword scoring
//! Vec<TableMatch>
//!     │
//!     ▼ [intent]      rule flags, numbers, fields, group column
//!     │   └─[time]    one predicate on the table's time column
//! QueryIntent
//!     │
//!     ▼ [synthesize]  SELECT / FROM / WHERE / GROUP BY / ORDER BY / LIMIT
//! SQL text
//!     │
//!     ▼ [classify]    presentation hint
//! ChartType
//! ```
//!
//! Every stage is a pure function of its inputs plus read-only configuration.

pub mod classify;
pub mod intent;
pub mod resolve;
pub mod synthesize;
pub mod time;

pub use classify::{classify, ChartType};
pub use intent::{IntentExtractor, QueryIntent};
pub use resolve::{TableMatch, TableResolver};
pub use synthesize::{is_listing, Projection, SqlSynthesizer, COUNT_ALIAS};
pub use time::{TimeCondition, TimeResolver, TimeWindow};
