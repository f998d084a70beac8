use std::ops::ControlFlow;

use sqlparser::ast::{
    Expr, Function, FunctionArg, FunctionArgExpr, FunctionArguments, Ident, Query, VisitMut,
    VisitorMut,
};

use super::FallbackReason;
use crate::sql::ast::{ident_matches, qualified_column, MERGE_SOURCE_ALIAS, MERGE_TARGET_ALIAS};

/// The values an upsert inserts, addressed by column.
///
/// A single-row insert references its row expressions directly; a multi-row
/// insert references the columns of the virtual source relation.
pub(super) struct InsertedValues<'a> {
    columns: &'a [Ident],
    single_row: Option<&'a [Expr]>,
}

impl<'a> InsertedValues<'a> {
    pub(super) fn new(columns: &'a [Ident], rows: &'a [Vec<Expr>]) -> Self {
        let single_row = match rows {
            [row] => Some(row.as_slice()),
            _ => None,
        };
        Self {
            columns,
            single_row,
        }
    }

    pub(super) fn is_single_row(&self) -> bool {
        self.single_row.is_some()
    }

    pub(super) fn value_at(&self, position: usize) -> Option<Expr> {
        match self.single_row {
            Some(row) => row.get(position).cloned(),
            None => self
                .columns
                .get(position)
                .map(|column| qualified_column(MERGE_SOURCE_ALIAS, column)),
        }
    }

    pub(super) fn value_of(&self, column: &str) -> Option<Expr> {
        let position = self
            .columns
            .iter()
            .position(|candidate| ident_matches(&candidate.value, column))?;
        self.value_at(position)
    }
}

/// Returns a copy of an `ON DUPLICATE KEY UPDATE` value that is valid inside a
/// merge: bare column references and references qualified by the table name
/// point at the target row, and `VALUES(col)` becomes the inserted value of
/// `col`. Subqueries are left as written.
pub(super) fn qualify_matched_value(
    value: &Expr,
    table: &str,
    inserted: &InsertedValues<'_>,
) -> Result<Expr, FallbackReason> {
    let mut value = value.clone();
    let mut qualifier = MatchedValueQualifier {
        table,
        inserted,
        query_depth: 0,
    };
    match VisitMut::visit(&mut value, &mut qualifier) {
        ControlFlow::Continue(()) => Ok(value),
        ControlFlow::Break(reason) => Err(reason),
    }
}

struct MatchedValueQualifier<'a, 'b> {
    table: &'a str,
    inserted: &'a InsertedValues<'b>,
    query_depth: usize,
}

impl VisitorMut for MatchedValueQualifier<'_, '_> {
    type Break = FallbackReason;

    fn pre_visit_query(&mut self, _query: &mut Query) -> ControlFlow<Self::Break> {
        self.query_depth += 1;
        ControlFlow::Continue(())
    }

    fn post_visit_query(&mut self, _query: &mut Query) -> ControlFlow<Self::Break> {
        self.query_depth = self.query_depth.saturating_sub(1);
        ControlFlow::Continue(())
    }

    // Children are visited before this runs, so a replacement value is never
    // walked again.
    fn post_visit_expr(&mut self, expr: &mut Expr) -> ControlFlow<Self::Break> {
        if self.query_depth > 0 {
            return ControlFlow::Continue(());
        }
        match expr {
            Expr::Identifier(ident) => {
                *expr = qualified_column(MERGE_TARGET_ALIAS, ident);
            }
            Expr::CompoundIdentifier(parts) => {
                if let [.., qualifier, column] = parts.as_slice() {
                    if ident_matches(&qualifier.value, self.table) {
                        *expr = qualified_column(MERGE_TARGET_ALIAS, column);
                    }
                }
            }
            Expr::Function(function) if is_values_function(function) => {
                let Some(column) = values_function_column(function) else {
                    return ControlFlow::Break(FallbackReason::UnsupportedConflictClause);
                };
                let Some(value) = self.inserted.value_of(&column.value) else {
                    return ControlFlow::Break(FallbackReason::UnknownInsertedColumn(
                        column.value.clone(),
                    ));
                };
                *expr = value;
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }
}

fn is_values_function(function: &Function) -> bool {
    function.name.0.len() == 1
        && function
            .name
            .0
            .first()
            .and_then(|part| part.as_ident())
            .is_some_and(|ident| ident.quote_style.is_none() && ident_matches(&ident.value, "VALUES"))
}

/// Column named by `VALUES(col)`. The argument may already carry the target
/// qualifier because arguments are visited first.
fn values_function_column(function: &Function) -> Option<&Ident> {
    let FunctionArguments::List(list) = &function.args else {
        return None;
    };
    let [FunctionArg::Unnamed(FunctionArgExpr::Expr(argument))] = list.args.as_slice() else {
        return None;
    };
    match argument {
        Expr::Identifier(ident) => Some(ident),
        Expr::CompoundIdentifier(parts) => parts.last(),
        _ => None,
    }
}
