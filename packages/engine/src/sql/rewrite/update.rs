use sqlparser::ast::{Assignment, AssignmentTarget, ObjectNamePart, Statement, TableFactor, Update};

use super::auto_increment::is_identity_column;
use super::{FallbackReason, StatementRuleOutcome};
use crate::schema::SchemaMetadataProvider;
use crate::sql::ast::{ident_matches, update_table_name};

/// Drops assignments to server generated columns of the updated table.
pub(super) fn rewrite_update(
    mut update: Update,
    metadata: &impl SchemaMetadataProvider,
) -> Result<StatementRuleOutcome, FallbackReason> {
    let Some(table) = update_table_name(&update).map(str::to_string) else {
        return Ok(StatementRuleOutcome::NoMatch);
    };
    let Some(identity) = metadata
        .auto_increment_columns(&table)
        .filter(|identity| !identity.is_empty())
    else {
        return Ok(StatementRuleOutcome::NoMatch);
    };

    let alias = match &update.table.relation {
        TableFactor::Table { alias, .. } => alias.as_ref().map(|alias| alias.name.value.clone()),
        _ => None,
    };
    let before = update.assignments.len();
    update.assignments.retain(|assignment| {
        !targets_identity_column(assignment, &table, alias.as_deref(), |column| {
            is_identity_column(identity, column)
        })
    });
    if update.assignments.len() == before {
        return Ok(StatementRuleOutcome::NoMatch);
    }
    if update.assignments.is_empty() {
        return Err(FallbackReason::NoAssignmentsLeft { table });
    }
    tracing::debug!(
        table,
        removed = before - update.assignments.len(),
        "dropped identity column assignments"
    );
    Ok(StatementRuleOutcome::Rewritten(
        Statement::Update(update).into(),
    ))
}

/// A qualified target only counts when its qualifier names the updated table.
fn targets_identity_column(
    assignment: &Assignment,
    table: &str,
    alias: Option<&str>,
    is_identity: impl Fn(&str) -> bool,
) -> bool {
    let AssignmentTarget::ColumnName(name) = &assignment.target else {
        return false;
    };
    let parts = name
        .0
        .iter()
        .filter_map(ObjectNamePart::as_ident)
        .map(|ident| ident.value.as_str())
        .collect::<Vec<_>>();
    match parts.as_slice() {
        [column] => is_identity(*column),
        [.., qualifier, column] => {
            let names_table = ident_matches(*qualifier, table)
                || alias.is_some_and(|alias| ident_matches(*qualifier, alias));
            names_table && is_identity(*column)
        }
        [] => false,
    }
}

#[cfg(test)]
mod tests {
    use super::rewrite_update;
    use crate::sql::rewrite::test_support::canonical_update;
    use crate::sql::rewrite::{FallbackReason, StatementRuleOutcome};
    use crate::SchemaMetadata;

    fn metadata() -> SchemaMetadata {
        SchemaMetadata::new().with_auto_increment("t", "id", 1)
    }

    #[test]
    fn removes_identity_assignments() {
        let outcome = rewrite_update(
            canonical_update("UPDATE t SET id = ?, name = ? WHERE code = ?"),
            &metadata(),
        )
        .expect("rewrite");
        let StatementRuleOutcome::Rewritten(statement) = outcome else {
            panic!("expected a rewrite");
        };
        assert_eq!(statement.to_string(), "UPDATE t SET name = :v2 WHERE code = :v3");
    }

    #[test]
    fn keeps_identity_columns_of_joined_tables() {
        let outcome = rewrite_update(
            canonical_update("UPDATE t AS a JOIN o ON o.ref = a.ref SET o.id = 1, a.id = 2"),
            &metadata(),
        )
        .expect("rewrite");
        let StatementRuleOutcome::Rewritten(statement) = outcome else {
            panic!("expected a rewrite");
        };
        assert!(statement.to_string().ends_with("SET o.id = 1"));
    }

    #[test]
    fn update_without_identity_assignments_is_not_touched() {
        let outcome =
            rewrite_update(canonical_update("UPDATE t SET name = 'x'"), &metadata()).expect("ok");
        assert!(matches!(outcome, StatementRuleOutcome::NoMatch));
    }

    #[test]
    fn update_left_without_assignments_falls_back() {
        let result = rewrite_update(canonical_update("UPDATE t SET id = 3"), &metadata());
        assert!(matches!(
            result,
            Err(FallbackReason::NoAssignmentsLeft { .. })
        ));
    }
}
