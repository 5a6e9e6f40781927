//! Schema metadata module.
//!
//! The planner consumes table metadata through the [`SchemaProvider`] trait:
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                SchemaProvider                  │
//! │  - get_schema(table)      columns, keys        │
//! │  - tables()               discovery order      │
//! │  - table_keywords()       precomputed sets     │
//! │  - suggest_related_tables(primary)             │
//! └───────────────────────────────────────────────┘
//!                        ▲
//!                        │ implements
//! ┌───────────────────────────────────────────────┐
//! │                SchemaSnapshot                  │
//! │       (in memory, loaded from JSON)            │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use nlquery::metadata::{SchemaProvider, SchemaSnapshot, TableSchema};
//!
//! let snapshot = SchemaSnapshot::new(vec![
//!     TableSchema::new("orders", ["id", "status", "created_at"]),
//! ]);
//! assert_eq!(snapshot.columns("orders").len(), 3);
//! ```

mod provider;
mod types;

pub use provider::{SchemaProvider, SchemaSnapshot, SnapshotError, SnapshotResult};
pub use types::*;
