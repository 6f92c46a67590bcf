//! # Query Builder System
//!
//! Parameterized query building for the scan result store.
//!
//! ## Overview
//!
//! Result queries combine any subset of four optional criteria. Rather than
//! templating SQL text and collecting arguments separately, every WHERE
//! predicate is a [`Condition`] that carries its own bind values, and
//! [`QueryBuilder::build`] renders text and arguments from the same walk over
//! the clause list. A [`CompiledQuery`] therefore always has exactly one
//! argument per `?` placeholder, in placeholder order.
//!
//! ## Key Components
//!
//! - [`builder`] - SELECT builder producing a [`CompiledQuery`]
//! - [`conditions`] - WHERE predicates with their arguments
//! - [`banner_query`] - [`compile`] for scan result filters
//!
//! ## Example Usage
//!
//! ```rust
//! use scanfleet::models::FilterCriteria;
//! use scanfleet::query_builder::compile;
//!
//! let query = compile(&FilterCriteria::new().with_ip("10.0.0.5"));
//! assert!(query.sql().ends_with("WHERE ip = INET_ATON(?)"));
//! assert_eq!(query.arguments(), ["10.0.0.5"]);
//! ```

pub mod banner_query;
pub mod builder;
pub mod conditions;

pub use banner_query::compile;
pub use builder::QueryBuilder;
pub use conditions::Condition;

/// SQL text with positional placeholders and its ordered bind arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    sql: String,
    arguments: Vec<String>,
}

impl CompiledQuery {
    pub(crate) fn new(sql: String, arguments: Vec<String>) -> Self {
        Self { sql, arguments }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Number of `?` placeholders in the SQL text
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}
