use sqlparser::ast::{
    Assignment, AssignmentTarget, Expr, Ident, Insert, ObjectName, ObjectNamePart, SetExpr,
    Statement, TableFactor, TableObject, Update,
};
use sqlparser::dialect::{GenericDialect, MySqlDialect};
use sqlparser::parser::Parser;

use crate::DialectError;

/// Parses client SQL in the MySQL dialect. Exactly one statement is accepted.
pub fn parse_statement(sql: &str) -> Result<Statement, DialectError> {
    let mut statements = Parser::parse_sql(&MySqlDialect {}, sql)?;
    if statements.len() != 1 {
        return Err(DialectError::Parse(format!(
            "expected a single statement, found {}",
            statements.len()
        )));
    }
    Ok(statements.remove(0))
}

/// Parses already-rewritten SQL, which may carry double-quoted identifiers and
/// `:vN` placeholders.
pub(crate) fn parse_generic_statements(sql: &str) -> Result<Vec<Statement>, DialectError> {
    Parser::parse_sql(&GenericDialect {}, sql).map_err(DialectError::from)
}

pub(crate) fn ident_matches(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
}

pub(crate) fn object_name_table(name: &ObjectName) -> Option<&str> {
    name.0
        .last()
        .and_then(ObjectNamePart::as_ident)
        .map(|ident| ident.value.as_str())
}

pub(crate) fn insert_table_name(insert: &Insert) -> Option<&str> {
    match &insert.table {
        TableObject::TableName(name) => object_name_table(name),
        _ => None,
    }
}

pub(crate) fn update_table_name(update: &Update) -> Option<&str> {
    match &update.table.relation {
        TableFactor::Table { name, .. } => object_name_table(name),
        _ => None,
    }
}

pub(crate) fn insert_values_rows(insert: &Insert) -> Option<&[Vec<Expr>]> {
    let source = insert.source.as_ref()?;
    let SetExpr::Values(values) = source.body.as_ref() else {
        return None;
    };
    Some(values.rows.as_slice())
}

pub(crate) fn insert_values_rows_mut(insert: &mut Insert) -> Option<&mut Vec<Vec<Expr>>> {
    let source = insert.source.as_mut()?;
    let SetExpr::Values(values) = source.body.as_mut() else {
        return None;
    };
    Some(&mut values.rows)
}

/// The column an assignment writes to, ignoring any qualifier.
pub(crate) fn assignment_column(assignment: &Assignment) -> Option<&Ident> {
    match &assignment.target {
        AssignmentTarget::ColumnName(name) => name.0.last().and_then(ObjectNamePart::as_ident),
        AssignmentTarget::Tuple(_) => None,
    }
}

pub(crate) fn qualified_column(qualifier: &str, column: &Ident) -> Expr {
    Expr::CompoundIdentifier(vec![Ident::new(qualifier), column.clone()])
}
