//! Statement IR and the builders that extend it.
//!
//! ```text
//! SelectStatement ── build_filter ── apply_paging ── build_order ──► translator
//! ```

pub mod fields;
pub mod filter;
pub mod order;
pub mod paging;
pub mod statement;

pub use fields::Fields;
pub use filter::{build_filter, Condition, Filter};
pub use order::{build_order, OrderBy};
pub use paging::apply_paging;
pub use statement::{
    Clause, Comparator, DeleteStatement, Filterable, InsertStatement, SelectStatement, Statement,
    UpdateStatement,
};
