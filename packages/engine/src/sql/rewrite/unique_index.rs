use std::collections::BTreeMap;

use sqlparser::ast::Ident;

use crate::sql::ast::ident_matches;

/// Columns of one unique index that the insert fully covers, spelled the way
/// the insert's column list spells them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ConditionGroup {
    pub(super) index: String,
    pub(super) columns: Vec<Ident>,
}

impl ConditionGroup {
    pub(super) fn contains(&self, column: &str) -> bool {
        self.columns
            .iter()
            .any(|candidate| ident_matches(&candidate.value, column))
    }
}

/// One group per unique index whose columns all appear in `columns`.
///
/// An index with a column missing from the insert contributes nothing. Two
/// indexes over the same column set produce a single group.
pub(super) fn condition_groups(
    columns: &[Ident],
    indexes: Option<&BTreeMap<String, Vec<String>>>,
) -> Vec<ConditionGroup> {
    let Some(indexes) = indexes else {
        return Vec::new();
    };

    let mut groups: Vec<ConditionGroup> = Vec::new();
    for (index, index_columns) in indexes {
        if index_columns.is_empty() {
            continue;
        }
        let covered = index_columns
            .iter()
            .map(|index_column| {
                columns
                    .iter()
                    .find(|column| ident_matches(&column.value, index_column))
                    .cloned()
            })
            .collect::<Option<Vec<_>>>();
        let Some(covered) = covered else {
            continue;
        };
        if groups
            .iter()
            .any(|group| same_column_set(&group.columns, &covered))
        {
            continue;
        }
        groups.push(ConditionGroup {
            index: index.clone(),
            columns: covered,
        });
    }
    groups
}

fn same_column_set(left: &[Ident], right: &[Ident]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|column| right.iter().any(|other| ident_matches(&column.value, &other.value)))
}
