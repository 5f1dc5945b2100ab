//! Generic list query building.
//!
//! Translates list request parameters into a [`Predicate`], a [`SortOrder`]
//! and paging bounds that any store backend can execute.

mod options;
mod predicate;
mod schema;

pub use options::{build_filter_predicate, parse_list_options, ListLimits, ListOptions, ListQuery};
pub use predicate::{Direction, Predicate, SortOrder, ID_FIELD};
pub use schema::{FieldDef, FieldKind, FieldSource, Schema, Value};
