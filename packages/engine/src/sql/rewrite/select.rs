use std::ops::ControlFlow;

use sqlparser::ast::{Query, Statement, TableFactor, VisitMut, VisitorMut};

use super::StatementRuleOutcome;

/// Removes MySQL index hints (`FORCE INDEX`, `USE INDEX`, `IGNORE INDEX`) from
/// every table of a query, subqueries included.
pub(super) fn rewrite_query(mut query: Query) -> StatementRuleOutcome {
    let mut stripper = IndexHintStripper { removed: 0 };
    let _ = VisitMut::visit(&mut query, &mut stripper);
    if stripper.removed == 0 {
        return StatementRuleOutcome::NoMatch;
    }
    tracing::debug!(removed = stripper.removed, "stripped index hints");
    StatementRuleOutcome::Rewritten(Statement::Query(Box::new(query)).into())
}

struct IndexHintStripper {
    removed: usize,
}

impl VisitorMut for IndexHintStripper {
    type Break = ();

    fn pre_visit_table_factor(&mut self, table_factor: &mut TableFactor) -> ControlFlow<()> {
        if let TableFactor::Table { index_hints, .. } = table_factor {
            self.removed += index_hints.len();
            index_hints.clear();
        }
        ControlFlow::Continue(())
    }
}
