use sqlparser::ast::{Assignment, Insert, OnInsert, Statement};

use super::auto_increment::{check_row_widths, materialize_column_list, strip_identity_columns};
use super::merge_builder::build_merge;
use super::unique_index::condition_groups;
use super::{FallbackReason, StatementRuleOutcome};
use crate::schema::SchemaMetadataProvider;
use crate::sql::ast::{insert_table_name, insert_values_rows, DialectStatement};

/// How an insert wants conflicts on a unique key handled.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ConflictMode {
    /// `ON DUPLICATE KEY UPDATE`.
    Update(Vec<Assignment>),
    /// `REPLACE INTO`.
    Replace,
    /// `INSERT IGNORE`.
    Ignore,
}

impl ConflictMode {
    fn of(insert: &Insert) -> Result<Option<Self>, FallbackReason> {
        match &insert.on {
            Some(OnInsert::DuplicateKeyUpdate(assignments)) => {
                Ok(Some(Self::Update(assignments.clone())))
            }
            Some(_) => Err(FallbackReason::UnsupportedConflictClause),
            None if insert.replace_into => Ok(Some(Self::Replace)),
            None if insert.ignore => Ok(Some(Self::Ignore)),
            None => Ok(None),
        }
    }
}

pub(super) fn rewrite_insert(
    mut insert: Insert,
    metadata: &impl SchemaMetadataProvider,
) -> Result<StatementRuleOutcome, FallbackReason> {
    let Some(table) = insert_table_name(&insert).map(str::to_string) else {
        return Ok(StatementRuleOutcome::NoMatch);
    };
    let conflict = ConflictMode::of(&insert)?;
    let has_values_source = insert_values_rows(&insert).is_some();
    if conflict.is_some() && (!has_values_source || insert.insert_alias.is_some()) {
        return Err(FallbackReason::UnsupportedInsertSource);
    }

    let identity = metadata
        .auto_increment_columns(&table)
        .filter(|identity| !identity.is_empty());
    let mut changed = false;
    if has_values_source {
        if insert.columns.is_empty() && (identity.is_some() || conflict.is_some()) {
            materialize_column_list(&mut insert, &table, metadata)?;
            changed = true;
        }
        if !insert.columns.is_empty() {
            check_row_widths(&insert)?;
        }
        if let Some(identity) = identity {
            changed |= strip_identity_columns(&mut insert, &table, identity)?;
        }
    }

    let Some(conflict) = conflict else {
        return Ok(if changed {
            StatementRuleOutcome::Rewritten(Statement::Insert(insert).into())
        } else {
            StatementRuleOutcome::NoMatch
        });
    };

    let groups = condition_groups(&insert.columns, metadata.unique_indexes(&table));
    if groups.is_empty() {
        tracing::debug!(
            table,
            "no unique index is covered by the inserted columns, inserting without conflict handling"
        );
        insert.on = None;
        insert.replace_into = false;
        insert.ignore = false;
        return Ok(StatementRuleOutcome::Rewritten(
            Statement::Insert(insert).into(),
        ));
    }

    let merge = build_merge(&insert, &groups, &conflict, identity)?;
    Ok(StatementRuleOutcome::Rewritten(DialectStatement::Merge(
        merge,
    )))
}
