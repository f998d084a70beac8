use std::fmt::Display;
use std::ops::ControlFlow;
use std::time::Duration;

use sqlparser::ast::{Value as SqlValue, VisitMut, VisitorMut};

use crate::sql::ast::parse_generic_statements;
use crate::sql::params::parse_ordinal_token;
use crate::{DialectError, Value};

/// Renders `sql` with every placeholder replaced by the literal text of its
/// argument.
///
/// Positional `?` placeholders are consumed left to right and their count must
/// equal `args.len()`. Named `:vN` placeholders are resolved by re-parsing the
/// statement and printing it back. Text inside quotes and comments is never
/// treated as a placeholder.
pub fn render(sql: &str, args: &[Value]) -> Result<String, DialectError> {
    let scan = scan_placeholders(sql);
    if !scan.positional.is_empty() {
        return render_positional(sql, &scan.positional, args);
    }
    if scan.has_named {
        return render_named(sql, args);
    }
    if !args.is_empty() {
        return Err(DialectError::ArgumentCountMismatch {
            expected: 0,
            actual: args.len(),
        });
    }
    Ok(sql.to_string())
}

/// Literal text of one argument in the target dialect.
///
/// Text is wrapped in single quotes verbatim; escaping is the caller's job.
pub(crate) fn literal_text(value: &Value) -> Result<String, DialectError> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(true) => Ok("1".to_string()),
        Value::Bool(false) => Ok("0".to_string()),
        Value::Int(value) => Ok(value.to_string()),
        Value::UInt(value) => Ok(value.to_string()),
        Value::Float(value) if value.is_finite() => Ok(value.to_string()),
        Value::Float(_) => Err(DialectError::UnsupportedArgumentType("non-finite float")),
        Value::Text(value) => Ok(format!("'{value}'")),
        Value::Blob(_) => Err(DialectError::UnsupportedArgumentType("blob")),
    }
}

/// One-line query log record: the statement with arguments inlined, or the
/// raw statement followed by its arguments when inlining is not possible.
pub fn describe_query(
    alias: &str,
    operation: &str,
    sql: &str,
    args: &[Value],
    elapsed: Duration,
    error: Option<&dyn Display>,
) -> String {
    let flag = if error.is_some() { "FAIL" } else { "  OK" };
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    let (query, trailing_args) = match render(sql, args) {
        Ok(rendered) => (rendered, &[] as &[Value]),
        Err(render_error) => {
            tracing::warn!(%render_error, sql, "query log falls back to raw arguments");
            (sql.to_string(), args)
        }
    };

    let mut record =
        format!("{flag} [Queries/{alias}] - [{operation:>11} / {elapsed_ms:7.1}ms] - [{query}]");
    if !trailing_args.is_empty() {
        let rendered_args = trailing_args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("`, `");
        record.push_str(&format!(" - `{rendered_args}`"));
    }
    if let Some(error) = error {
        record.push_str(&format!(" - {error}"));
    }
    record
}

fn render_positional(
    sql: &str,
    positions: &[usize],
    args: &[Value],
) -> Result<String, DialectError> {
    if positions.len() != args.len() {
        return Err(DialectError::ArgumentCountMismatch {
            expected: positions.len(),
            actual: args.len(),
        });
    }

    let mut out = String::with_capacity(sql.len() * 2);
    let mut copied_until = 0;
    for (position, arg) in positions.iter().zip(args) {
        out.push_str(&sql[copied_until..*position]);
        out.push_str(&literal_text(arg)?);
        copied_until = position + 1;
    }
    out.push_str(&sql[copied_until..]);
    Ok(out)
}

fn render_named(sql: &str, args: &[Value]) -> Result<String, DialectError> {
    let mut statements = parse_generic_statements(sql)?;
    let mut inliner = NamedArgumentInliner { args };
    for statement in &mut statements {
        if let ControlFlow::Break(error) = VisitMut::visit(statement, &mut inliner) {
            return Err(error);
        }
    }
    Ok(statements
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; "))
}

struct NamedArgumentInliner<'a> {
    args: &'a [Value],
}

impl VisitorMut for NamedArgumentInliner<'_> {
    type Break = DialectError;

    fn pre_visit_value(&mut self, value: &mut SqlValue) -> ControlFlow<Self::Break> {
        let SqlValue::Placeholder(token) = value else {
            return ControlFlow::Continue(());
        };
        let Some(ordinal) = parse_ordinal_token(token) else {
            return ControlFlow::Break(DialectError::InvalidPlaceholder(token.clone()));
        };
        let Some(arg) = self.args.get(ordinal - 1) else {
            return ControlFlow::Break(DialectError::ArgumentCountMismatch {
                expected: ordinal,
                actual: self.args.len(),
            });
        };
        let literal = match literal_text(arg) {
            Ok(literal) => literal,
            Err(error) => return ControlFlow::Break(error),
        };
        // A placeholder prints its token unchanged, which keeps the literal text
        // identical to the positional path (no re-escaping by the printer).
        *value = SqlValue::Placeholder(literal);
        ControlFlow::Continue(())
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct PlaceholderScan {
    positional: Vec<usize>,
    has_named: bool,
}

fn scan_placeholders(sql: &str) -> PlaceholderScan {
    let bytes = sql.as_bytes();
    let mut scan = PlaceholderScan::default();
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            quote @ (b'\'' | b'"' | b'`') => {
                index = skip_quoted(bytes, index, quote);
            }
            b'-' if bytes.get(index + 1) == Some(&b'-') => {
                index = skip_line_comment(bytes, index);
            }
            b'#' => {
                index = skip_line_comment(bytes, index);
            }
            b'/' if bytes.get(index + 1) == Some(&b'*') => {
                index = bytes[index + 2..]
                    .windows(2)
                    .position(|window| window == b"*/")
                    .map_or(bytes.len(), |end| index + 2 + end + 2);
            }
            b'?' => {
                scan.positional.push(index);
                index += 1;
            }
            b':' => {
                let follows_colon = index > 0 && bytes[index - 1] == b':';
                let next = bytes.get(index + 1).copied().unwrap_or(b' ');
                if !follows_colon && (next.is_ascii_alphanumeric() || next == b'_') {
                    scan.has_named = true;
                }
                index += 1;
            }
            _ => index += 1,
        }
    }

    scan
}

fn skip_quoted(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut index = start + 1;
    while index < bytes.len() {
        let byte = bytes[index];
        if byte == b'\\' && quote != b'`' {
            index += 2;
            continue;
        }
        if byte == quote {
            if bytes.get(index + 1) == Some(&quote) {
                index += 2;
                continue;
            }
            return index + 1;
        }
        index += 1;
    }
    bytes.len()
}

fn skip_line_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|byte| *byte == b'\n')
        .map_or(bytes.len(), |end| start + end + 1)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{describe_query, literal_text, render, scan_placeholders};
    use crate::{DialectError, Value};

    #[test]
    fn renders_positional_arguments() {
        assert_eq!(
            render("select * from a where id = ?", &[Value::Int(5)]),
            Ok("select * from a where id = 5".to_string())
        );
    }

    #[test]
    fn positional_count_must_match() {
        assert_eq!(
            render("select * from a where id = ?", &[]),
            Err(DialectError::ArgumentCountMismatch {
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(
            render("select ?", &[Value::Int(1), Value::Int(2)]),
            Err(DialectError::ArgumentCountMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn literal_rules() {
        assert_eq!(literal_text(&Value::Int(-7)).as_deref(), Ok("-7"));
        assert_eq!(
            literal_text(&Value::UInt(u64::MAX)).as_deref(),
            Ok("18446744073709551615")
        );
        assert_eq!(literal_text(&Value::Float(0.1)).as_deref(), Ok("0.1"));
        assert_eq!(literal_text(&Value::Float(2.0)).as_deref(), Ok("2"));
        assert_eq!(literal_text(&Value::Bool(true)).as_deref(), Ok("1"));
        assert_eq!(literal_text(&Value::Bool(false)).as_deref(), Ok("0"));
        assert_eq!(
            literal_text(&Value::Text("it's".to_string())).as_deref(),
            Ok("'it's'")
        );
        assert_eq!(literal_text(&Value::Null).as_deref(), Ok("NULL"));
        assert_eq!(
            literal_text(&Value::Blob(vec![1])),
            Err(DialectError::UnsupportedArgumentType("blob"))
        );
        assert!(literal_text(&Value::Float(f64::NAN)).is_err());
    }

    #[test]
    fn ignores_question_marks_in_literals_and_comments() {
        let scan = scan_placeholders("select '?', \"?\", `?`, ? -- ?\n/* ? */ from t where a = 'it''s ?'");
        assert_eq!(scan.positional.len(), 1);
        assert!(!scan.has_named);
    }

    #[test]
    fn detects_named_placeholders_but_not_casts_or_times() {
        assert!(scan_placeholders("select :v1").has_named);
        assert!(!scan_placeholders("select a::int").has_named);
        assert!(!scan_placeholders("select '12:30'").has_named);
    }

    #[test]
    fn renders_named_arguments_by_ordinal() {
        let rendered = render(
            "UPDATE t SET name = :v2 WHERE id = :v1",
            &[Value::Int(3), Value::Text("a".to_string())],
        )
        .expect("render");
        assert_eq!(rendered, "UPDATE t SET name = 'a' WHERE id = 3");
    }

    #[test]
    fn named_ordinal_out_of_range_is_a_count_mismatch() {
        assert_eq!(
            render("SELECT :v2", &[Value::Int(1)]),
            Err(DialectError::ArgumentCountMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn text_without_placeholders_is_stable() {
        let sql = "SELECT * FROM a WHERE id = 5";
        assert_eq!(render(sql, &[]).as_deref(), Ok(sql));
        assert!(render(sql, &[Value::Int(5)]).is_err());
    }

    #[test]
    fn describes_rendered_and_raw_queries() {
        let ok = describe_query(
            "default",
            "db.Exec",
            "select ?",
            &[Value::Int(1)],
            Duration::from_micros(1500),
            None,
        );
        assert_eq!(ok, "  OK [Queries/default] - [    db.Exec /     1.5ms] - [select 1]");

        let failed = describe_query(
            "default",
            "db.Query",
            "select ?",
            &[Value::Blob(vec![0xab])],
            Duration::ZERO,
            Some(&"boom"),
        );
        assert_eq!(
            failed,
            "FAIL [Queries/default] - [   db.Query /     0.0ms] - [select ?] - `0xab` - boom"
        );
    }
}
