//! MySQL to Oracle-family statement rewriting.
//!
//! `rewrite` works on a clone of the parsed statement whose placeholders were
//! first given explicit `:vN` ordinals. One rule per statement kind decides
//! whether the statement changes; a changed tree is renumbered last so its
//! placeholders and the returned arguments stay in lockstep.

use sqlparser::ast::Statement;

use crate::schema::SchemaMetadataProvider;
use crate::sql::ast::DialectStatement;
use crate::sql::params::{canonicalize_placeholders, renumber_placeholders, CanonicalPlaceholders};
use crate::{DialectError, Value};

mod auto_increment;
mod insert;
mod merge_builder;
mod qualify;
mod select;
mod unique_index;
mod update;

/// Result of one `rewrite` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteOutput {
    pub statement: DialectStatement,
    pub args: Vec<Value>,
    pub outcome: RewriteOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RewriteOutcome {
    /// No rule applied; the input statement and arguments are returned.
    Unchanged,
    Rewritten,
    /// A rule applied but could not finish safely; the input statement and
    /// arguments are returned.
    Fallback(FallbackReason),
}

impl RewriteOutcome {
    pub fn is_rewritten(&self) -> bool {
        matches!(self, Self::Rewritten)
    }
}

/// Why an attempted rewrite was abandoned in favour of pass-through.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FallbackReason {
    #[error("placeholder ordinal {ordinal} exceeds the {available} supplied arguments")]
    PlaceholderOutOfRange { ordinal: usize, available: usize },
    #[error("placeholder '{0}' carries no usable ordinal")]
    InvalidPlaceholder(String),
    #[error("column list of table '{table}' is empty and no column metadata is known")]
    MissingColumnList { table: String },
    #[error("row {row} has {actual} values but the column list has {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("every column of table '{table}' is server generated")]
    NoColumnsLeft { table: String },
    #[error("conflict handling requires a VALUES row source")]
    UnsupportedInsertSource,
    #[error("conflict clause shape is not supported")]
    UnsupportedConflictClause,
    #[error("VALUES({0}) names a column that is not inserted")]
    UnknownInsertedColumn(String),
    #[error("assignment target is not a single column")]
    UnsupportedAssignmentTarget,
    #[error("update of table '{table}' only assigns server generated columns")]
    NoAssignmentsLeft { table: String },
}

pub(crate) enum StatementRuleOutcome {
    Rewritten(DialectStatement),
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementRule {
    Insert,
    Update,
    Select,
    Passthrough,
}

impl StatementRule {
    fn for_statement(statement: &Statement) -> Option<Self> {
        match statement {
            Statement::Insert(_) => Some(Self::Insert),
            Statement::Update(_) => Some(Self::Update),
            Statement::Query(_) => Some(Self::Select),
            Statement::Delete(_) => Some(Self::Passthrough),
            _ => None,
        }
    }

    fn apply(
        self,
        statement: Statement,
        metadata: &impl SchemaMetadataProvider,
    ) -> Result<StatementRuleOutcome, FallbackReason> {
        match (self, statement) {
            (Self::Insert, Statement::Insert(insert)) => insert::rewrite_insert(insert, metadata),
            (Self::Update, Statement::Update(update)) => update::rewrite_update(update, metadata),
            (Self::Select, Statement::Query(query)) => Ok(select::rewrite_query(*query)),
            _ => Ok(StatementRuleOutcome::NoMatch),
        }
    }
}

/// Rewrites a parsed MySQL statement for an Oracle-family backend.
///
/// `args` are the bind arguments of `statement` in placeholder order. An empty
/// `args` list marks a prepare-only call: the result keeps each placeholder's
/// source ordinal so the text can be bound by name later.
///
/// Errors are limited to internal renumbering inconsistencies; every
/// inapplicable rewrite falls back to the input statement and arguments.
pub fn rewrite(
    statement: &Statement,
    args: &[Value],
    metadata: &impl SchemaMetadataProvider,
) -> Result<RewriteOutput, DialectError> {
    let Some(rule) = StatementRule::for_statement(statement) else {
        return Ok(unchanged(statement, args));
    };

    let mut working = statement.clone();
    let placeholders = match canonicalize_placeholders(&mut working) {
        Ok(placeholders) => placeholders,
        Err(DialectError::InvalidPlaceholder(token)) => {
            return Ok(fallback(
                statement,
                args,
                FallbackReason::InvalidPlaceholder(token),
            ));
        }
        Err(error) => return Err(error),
    };
    if !args.is_empty() && placeholders.max_ordinal > args.len() {
        return Ok(fallback(
            statement,
            args,
            FallbackReason::PlaceholderOutOfRange {
                ordinal: placeholders.max_ordinal,
                available: args.len(),
            },
        ));
    }

    match rule.apply(working, metadata) {
        Ok(StatementRuleOutcome::NoMatch) => Ok(unchanged(statement, args)),
        Ok(StatementRuleOutcome::Rewritten(tree)) => finalize(tree, args, placeholders),
        Err(reason) => Ok(fallback(statement, args, reason)),
    }
}

fn finalize(
    mut tree: DialectStatement,
    args: &[Value],
    placeholders: CanonicalPlaceholders,
) -> Result<RewriteOutput, DialectError> {
    let args = if placeholders.count == 0 || args.is_empty() {
        args.to_vec()
    } else {
        renumber_placeholders(&mut tree, args)?
    };
    tracing::debug!(rewritten = %tree, args = args.len(), "statement rewritten");
    Ok(RewriteOutput {
        statement: tree,
        args,
        outcome: RewriteOutcome::Rewritten,
    })
}

fn unchanged(statement: &Statement, args: &[Value]) -> RewriteOutput {
    RewriteOutput {
        statement: DialectStatement::Statement(statement.clone()),
        args: args.to_vec(),
        outcome: RewriteOutcome::Unchanged,
    }
}

fn fallback(statement: &Statement, args: &[Value], reason: FallbackReason) -> RewriteOutput {
    tracing::warn!(%reason, statement = %statement, "rewrite skipped, passing statement through");
    RewriteOutput {
        statement: DialectStatement::Statement(statement.clone()),
        args: args.to_vec(),
        outcome: RewriteOutcome::Fallback(reason),
    }
}
