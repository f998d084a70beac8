use std::collections::BTreeMap;

use sqlparser::ast::{Ident, Insert};

use super::FallbackReason;
use crate::schema::SchemaMetadataProvider;
use crate::sql::ast::{ident_matches, insert_values_rows, insert_values_rows_mut};

/// Fills an empty insert column list with the table's columns in schema order.
pub(super) fn materialize_column_list(
    insert: &mut Insert,
    table: &str,
    metadata: &impl SchemaMetadataProvider,
) -> Result<(), FallbackReason> {
    let columns = metadata
        .columns(table)
        .filter(|columns| !columns.is_empty())
        .ok_or_else(|| FallbackReason::MissingColumnList {
            table: table.to_string(),
        })?;
    insert.columns = columns.iter().map(|column| Ident::new(column.as_str())).collect();
    Ok(())
}

pub(super) fn check_row_widths(insert: &Insert) -> Result<(), FallbackReason> {
    let expected = insert.columns.len();
    let rows = insert_values_rows(insert).unwrap_or_default();
    match rows.iter().position(|row| row.len() != expected) {
        Some(row) => Err(FallbackReason::RowWidthMismatch {
            row,
            expected,
            actual: rows[row].len(),
        }),
        None => Ok(()),
    }
}

/// Removes server generated columns from the column list and, at the same
/// positions, from every value row. Returns whether anything was removed.
///
/// Running it again on its own output removes nothing.
pub(super) fn strip_identity_columns(
    insert: &mut Insert,
    table: &str,
    identity: &BTreeMap<String, usize>,
) -> Result<bool, FallbackReason> {
    let positions = insert
        .columns
        .iter()
        .enumerate()
        .filter(|(_, column)| is_identity_column(identity, &column.value))
        .map(|(position, _)| position)
        .collect::<Vec<_>>();
    if positions.is_empty() {
        return Ok(false);
    }
    if positions.len() == insert.columns.len() {
        return Err(FallbackReason::NoColumnsLeft {
            table: table.to_string(),
        });
    }

    for position in positions.iter().rev() {
        insert.columns.remove(*position);
    }
    if let Some(rows) = insert_values_rows_mut(insert) {
        for row in rows.iter_mut() {
            for position in positions.iter().rev() {
                if *position < row.len() {
                    row.remove(*position);
                }
            }
        }
    }
    tracing::debug!(table, removed = positions.len(), "stripped identity columns");
    Ok(true)
}

pub(super) fn is_identity_column(identity: &BTreeMap<String, usize>, column: &str) -> bool {
    identity.keys().any(|name| ident_matches(name, column))
}
