use std::collections::BTreeMap;

use sqlparser::ast::{
    Assignment, AssignmentTarget, BinaryOperator, Expr, Ident, Insert, ObjectName, ObjectNamePart,
    TableObject,
};

use super::auto_increment::is_identity_column;
use super::insert::ConflictMode;
use super::qualify::{qualify_matched_value, InsertedValues};
use super::unique_index::ConditionGroup;
use super::FallbackReason;
use crate::sql::ast::{
    assignment_column, insert_values_rows, object_name_table, qualified_column, MergeInto,
    MergeSource, MERGE_SOURCE_ALIAS, MERGE_TARGET_ALIAS,
};

/// Builds the `MERGE INTO` equivalent of an upsert whose column list covers at
/// least one unique index.
///
/// The insert must already be stripped of identity columns and have a `VALUES`
/// source with rows as wide as its column list.
pub(super) fn build_merge(
    insert: &Insert,
    groups: &[ConditionGroup],
    conflict: &ConflictMode,
    identity: Option<&BTreeMap<String, usize>>,
) -> Result<MergeInto, FallbackReason> {
    let TableObject::TableName(table) = &insert.table else {
        return Err(FallbackReason::UnsupportedInsertSource);
    };
    let table_name = object_name_table(table).ok_or(FallbackReason::UnsupportedInsertSource)?;
    let rows = insert_values_rows(insert).ok_or(FallbackReason::UnsupportedInsertSource)?;
    let columns = insert.columns.as_slice();
    let inserted = InsertedValues::new(columns, rows);

    let on = join_condition(groups, &inserted)?;
    let matched = match conflict {
        ConflictMode::Update(assignments) => {
            matched_from_assignments(assignments, table_name, groups, identity, &inserted)?
        }
        ConflictMode::Replace => matched_from_columns(columns, groups, &inserted)?,
        ConflictMode::Ignore => Vec::new(),
    };
    let insert_values = (0..columns.len())
        .map(|position| inserted_value(&inserted, position))
        .collect::<Result<Vec<_>, _>>()?;
    let source = if inserted.is_single_row() {
        MergeSource::Dual
    } else {
        MergeSource::Rows {
            alias: Ident::new(MERGE_SOURCE_ALIAS),
            columns: columns.to_vec(),
            rows: rows.to_vec(),
        }
    };

    Ok(MergeInto {
        table: table.clone(),
        target_alias: Ident::new(MERGE_TARGET_ALIAS),
        source,
        on,
        matched,
        insert_columns: columns.to_vec(),
        insert_values,
    })
}

/// OR of one AND-chain of `t.col = <inserted>` per condition group.
fn join_condition(
    groups: &[ConditionGroup],
    inserted: &InsertedValues<'_>,
) -> Result<Expr, FallbackReason> {
    let mut condition: Option<Expr> = None;
    for group in groups {
        let mut group_condition: Option<Expr> = None;
        for column in &group.columns {
            let value = inserted
                .value_of(&column.value)
                .ok_or_else(|| FallbackReason::UnknownInsertedColumn(column.value.clone()))?;
            let equality = binary(
                qualified_column(MERGE_TARGET_ALIAS, column),
                BinaryOperator::Eq,
                value,
            );
            group_condition = Some(match group_condition {
                Some(left) => binary(left, BinaryOperator::And, equality),
                None => equality,
            });
        }
        let Some(mut group_condition) = group_condition else {
            continue;
        };
        if groups.len() > 1 && group.columns.len() > 1 {
            group_condition = Expr::Nested(Box::new(group_condition));
        }
        condition = Some(match condition {
            Some(left) => binary(left, BinaryOperator::Or, group_condition),
            None => group_condition,
        });
    }
    condition.ok_or(FallbackReason::UnsupportedConflictClause)
}

fn matched_from_assignments(
    assignments: &[Assignment],
    table: &str,
    groups: &[ConditionGroup],
    identity: Option<&BTreeMap<String, usize>>,
    inserted: &InsertedValues<'_>,
) -> Result<Vec<Assignment>, FallbackReason> {
    let mut matched = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let column =
            assignment_column(assignment).ok_or(FallbackReason::UnsupportedAssignmentTarget)?;
        if groups.iter().any(|group| group.contains(&column.value)) {
            tracing::debug!(column = %column, "dropping update of a merge join column");
            continue;
        }
        if identity.is_some_and(|identity| is_identity_column(identity, &column.value)) {
            continue;
        }
        matched.push(target_assignment(
            column,
            qualify_matched_value(&assignment.value, table, inserted)?,
        ));
    }
    Ok(matched)
}

/// `REPLACE` semantics: every column outside the join takes the inserted value.
fn matched_from_columns(
    columns: &[Ident],
    groups: &[ConditionGroup],
    inserted: &InsertedValues<'_>,
) -> Result<Vec<Assignment>, FallbackReason> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, column)| !groups.iter().any(|group| group.contains(&column.value)))
        .map(|(position, column)| {
            Ok(target_assignment(
                column,
                inserted_value(inserted, position)?,
            ))
        })
        .collect()
}

fn inserted_value(inserted: &InsertedValues<'_>, position: usize) -> Result<Expr, FallbackReason> {
    inserted
        .value_at(position)
        .ok_or(FallbackReason::UnsupportedInsertSource)
}

fn target_assignment(column: &Ident, value: Expr) -> Assignment {
    Assignment {
        target: AssignmentTarget::ColumnName(ObjectName(vec![
            ObjectNamePart::Identifier(Ident::new(MERGE_TARGET_ALIAS)),
            ObjectNamePart::Identifier(column.clone()),
        ])),
        value,
    }
}

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}
