use std::ops::ControlFlow;

use sqlparser::ast::{Statement, Value as SqlValue};
use sqlparser::ast::{VisitMut, VisitorMut};

use crate::sql::ast::DialectStatement;
use crate::{DialectError, Value};

const ORDINAL_PREFIX: &str = ":v";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PlaceholderState {
    next_ordinal: usize,
}

impl PlaceholderState {
    pub(crate) fn new() -> Self {
        Self { next_ordinal: 0 }
    }
}

/// Placeholder shape of a statement after every token was given an ordinal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CanonicalPlaceholders {
    pub(crate) count: usize,
    pub(crate) max_ordinal: usize,
}

pub(crate) fn ordinal_token(ordinal: usize) -> String {
    format!("{ORDINAL_PREFIX}{ordinal}")
}

/// Ordinal of a canonical `:vN` token.
pub(crate) fn parse_ordinal_token(token: &str) -> Option<usize> {
    token
        .trim()
        .strip_prefix(ORDINAL_PREFIX)
        .and_then(|numeric| numeric.parse::<usize>().ok())
        .filter(|ordinal| *ordinal > 0)
}

/// Rewrites every placeholder of `statement` into its canonical `:vN` form.
///
/// Bare `?` tokens are numbered left to right; `?N`, `$N`, `:N` and `:vN`
/// keep their explicit 1-based ordinal.
pub(crate) fn canonicalize_placeholders(
    statement: &mut Statement,
) -> Result<CanonicalPlaceholders, DialectError> {
    let mut visitor = PlaceholderCanonicalizer {
        state: PlaceholderState::new(),
        summary: CanonicalPlaceholders::default(),
    };
    if let ControlFlow::Break(error) = VisitMut::visit(statement, &mut visitor) {
        return Err(error);
    }
    Ok(visitor.summary)
}

struct PlaceholderCanonicalizer {
    state: PlaceholderState,
    summary: CanonicalPlaceholders,
}

impl VisitorMut for PlaceholderCanonicalizer {
    type Break = DialectError;

    fn pre_visit_value(&mut self, value: &mut SqlValue) -> ControlFlow<Self::Break> {
        let SqlValue::Placeholder(token) = value else {
            return ControlFlow::Continue(());
        };
        let ordinal = match resolve_placeholder_ordinal(token, &mut self.state) {
            Ok(ordinal) => ordinal,
            Err(error) => return ControlFlow::Break(error),
        };
        self.summary.count += 1;
        self.summary.max_ordinal = self.summary.max_ordinal.max(ordinal);
        *value = SqlValue::Placeholder(ordinal_token(ordinal));
        ControlFlow::Continue(())
    }
}

pub(crate) fn resolve_placeholder_ordinal(
    token: &str,
    state: &mut PlaceholderState,
) -> Result<usize, DialectError> {
    let trimmed = token.trim();

    if trimmed.is_empty() || trimmed == "?" {
        state.next_ordinal += 1;
        return Ok(state.next_ordinal);
    }

    let numeric = trimmed
        .strip_prefix(ORDINAL_PREFIX)
        .or_else(|| trimmed.strip_prefix('?'))
        .or_else(|| trimmed.strip_prefix('$'))
        .or_else(|| trimmed.strip_prefix(':'))
        .ok_or_else(|| DialectError::InvalidPlaceholder(trimmed.to_string()))?;
    let ordinal = numeric
        .parse::<usize>()
        .ok()
        .filter(|ordinal| *ordinal > 0)
        .ok_or_else(|| DialectError::InvalidPlaceholder(trimmed.to_string()))?;
    state.next_ordinal = state.next_ordinal.max(ordinal);
    Ok(ordinal)
}

/// Renumbers the placeholders of a final rewritten tree in document order.
///
/// Each token must be canonical (`:vN`) and reference `source_args`. The token
/// at traversal position K becomes `:vK` and the returned argument list holds,
/// at K - 1, the value its source ordinal referenced. A token that cannot be
/// resolved rejects the whole rewrite.
pub(crate) fn renumber_placeholders(
    statement: &mut DialectStatement,
    source_args: &[Value],
) -> Result<Vec<Value>, DialectError> {
    let mut renumberer = PlaceholderRenumberer {
        source_args,
        args: Vec::new(),
    };
    if let ControlFlow::Break(error) = statement.visit_mut(&mut renumberer) {
        return Err(error);
    }
    Ok(renumberer.args)
}

struct PlaceholderRenumberer<'a> {
    source_args: &'a [Value],
    args: Vec<Value>,
}

impl VisitorMut for PlaceholderRenumberer<'_> {
    type Break = DialectError;

    fn pre_visit_value(&mut self, value: &mut SqlValue) -> ControlFlow<Self::Break> {
        let SqlValue::Placeholder(token) = value else {
            return ControlFlow::Continue(());
        };
        let Some(source_ordinal) = parse_ordinal_token(token) else {
            return ControlFlow::Break(DialectError::RenumberingInconsistency(format!(
                "placeholder '{token}' was not canonicalized before renumbering"
            )));
        };
        let Some(source_value) = self.source_args.get(source_ordinal - 1) else {
            return ControlFlow::Break(DialectError::RenumberingInconsistency(format!(
                "placeholder '{token}' references argument {source_ordinal} but only {} were provided",
                self.source_args.len()
            )));
        };
        self.args.push(source_value.clone());
        *value = SqlValue::Placeholder(ordinal_token(self.args.len()));
        ControlFlow::Continue(())
    }
}
