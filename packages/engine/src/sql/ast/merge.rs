use std::fmt;
use std::ops::ControlFlow;

use sqlparser::ast::{Assignment, Expr, Ident, ObjectName, VisitMut, VisitorMut};

pub(crate) const MERGE_TARGET_ALIAS: &str = "t";
pub(crate) const MERGE_SOURCE_ALIAS: &str = "s";

/// `MERGE INTO` statement synthesized from a MySQL upsert.
///
/// The parser has no node for this shape, so the engine owns it together with
/// its printer and a document-order expression walk.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeInto {
    pub table: ObjectName,
    pub target_alias: Ident,
    pub source: MergeSource,
    pub on: Expr,
    /// Empty when the upsert never updates an existing row.
    pub matched: Vec<Assignment>,
    pub insert_columns: Vec<Ident>,
    pub insert_values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MergeSource {
    /// The constant one-row relation; values are referenced inline.
    Dual,
    /// A virtual relation with one `SELECT ... FROM dual` row per inserted tuple.
    Rows {
        alias: Ident,
        columns: Vec<Ident>,
        rows: Vec<Vec<Expr>>,
    },
}

impl MergeInto {
    /// Visits every expression in the order it is printed.
    pub(crate) fn visit_exprs_mut<V: VisitorMut>(
        &mut self,
        visitor: &mut V,
    ) -> ControlFlow<V::Break> {
        if let MergeSource::Rows { rows, .. } = &mut self.source {
            for row in rows.iter_mut() {
                for expr in row.iter_mut() {
                    VisitMut::visit(expr, visitor)?;
                }
            }
        }
        VisitMut::visit(&mut self.on, visitor)?;
        for assignment in &mut self.matched {
            VisitMut::visit(&mut assignment.value, visitor)?;
        }
        for expr in &mut self.insert_values {
            VisitMut::visit(expr, visitor)?;
        }
        ControlFlow::Continue(())
    }
}

impl fmt::Display for MergeInto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MERGE INTO {} {} USING {} ON ({})",
            self.table, self.target_alias, self.source, self.on
        )?;
        if !self.matched.is_empty() {
            write!(
                f,
                " WHEN MATCHED THEN UPDATE SET {}",
                comma_separated(&self.matched)
            )?;
        }
        write!(
            f,
            " WHEN NOT MATCHED THEN INSERT ({}) VALUES ({})",
            comma_separated(&self.insert_columns),
            comma_separated(&self.insert_values)
        )
    }
}

impl fmt::Display for MergeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dual => f.write_str("dual"),
            Self::Rows {
                alias,
                columns,
                rows,
            } => {
                f.write_str("(")?;
                for (row_index, row) in rows.iter().enumerate() {
                    if row_index > 0 {
                        f.write_str(" UNION ALL ")?;
                    }
                    f.write_str("SELECT ")?;
                    for (column_index, (expr, column)) in row.iter().zip(columns).enumerate() {
                        if column_index > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{expr} AS {column}")?;
                    }
                    f.write_str(" FROM dual")?;
                }
                write!(f, ") {alias}")
            }
        }
    }
}

fn comma_separated<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
