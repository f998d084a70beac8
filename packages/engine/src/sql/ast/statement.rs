use std::fmt;
use std::ops::ControlFlow;

use sqlparser::ast::{Statement, VisitMut, VisitorMut};

use super::MergeInto;

/// Output tree of the rewrite engine: a parsed statement, possibly modified,
/// or a synthesized `MERGE INTO`.
#[derive(Debug, Clone, PartialEq)]
pub enum DialectStatement {
    Statement(Statement),
    Merge(MergeInto),
}

impl DialectStatement {
    pub fn as_statement(&self) -> Option<&Statement> {
        match self {
            Self::Statement(statement) => Some(statement),
            Self::Merge(_) => None,
        }
    }

    pub fn as_merge(&self) -> Option<&MergeInto> {
        match self {
            Self::Merge(merge) => Some(merge),
            Self::Statement(_) => None,
        }
    }

    pub(crate) fn visit_mut<V: VisitorMut>(&mut self, visitor: &mut V) -> ControlFlow<V::Break> {
        match self {
            Self::Statement(statement) => VisitMut::visit(statement, visitor),
            Self::Merge(merge) => merge.visit_exprs_mut(visitor),
        }
    }
}

impl From<Statement> for DialectStatement {
    fn from(statement: Statement) -> Self {
        Self::Statement(statement)
    }
}

impl From<MergeInto> for DialectStatement {
    fn from(merge: MergeInto) -> Self {
        Self::Merge(merge)
    }
}

impl fmt::Display for DialectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Statement(statement) => write!(f, "{statement}"),
            Self::Merge(merge) => write!(f, "{merge}"),
        }
    }
}
