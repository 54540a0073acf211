//! Paging transformer.

use super::statement::{Clause, Filterable, SelectStatement};
use tabula_core::Paging;

/// Adds an offset/limit window for a 1-indexed page.
///
/// A zero page or page size leaves the statement unchanged.
#[must_use]
pub fn apply_paging(statement: SelectStatement, page: u64, page_size: u64) -> SelectStatement {
    match Paging::new(page, page_size).window() {
        Some((offset, limit)) => statement.clause(Clause::Window { offset, limit }),
        None => statement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_for_page() {
        let stmt = apply_paging(SelectStatement::new("t", vec![]), 2, 3);
        assert_eq!(stmt.window(), Some((3, 3)));
    }

    #[test]
    fn test_inactive_paging_is_noop() {
        let base = SelectStatement::new("t", vec![]);
        assert_eq!(apply_paging(base.clone(), 0, 3), base);
        assert_eq!(apply_paging(base.clone(), 1, 0), base);
    }
}
