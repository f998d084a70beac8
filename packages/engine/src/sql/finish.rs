use std::iter::Peekable;
use std::str::CharIndices;

use crate::ConverterConfig;

const MYSQL_ZERO_TIMESTAMP: &str = "0000-00-00 00:00:00";
const TARGET_ZERO_TIMESTAMP: &str = "0001-01-01 00:00:00";

/// Where the text handed to [`finish_for_target`] comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SqlOrigin {
    /// Client text. String literals may carry MySQL backslash escapes and the
    /// text may contain comments.
    Client,
    /// Printed from a parsed tree. Literal values are already unescaped, so a
    /// backslash is an ordinary character.
    Printed,
}

/// Applies the lexical differences between MySQL and the target dialect.
///
/// Backtick-quoted identifiers become double-quoted and, when enabled, the
/// MySQL zero timestamp literal is replaced by the earliest timestamp the
/// target accepts. In client text, backslash-escaped quotes inside string
/// literals become doubled quotes and comments are copied untouched.
pub(crate) fn finish_for_target(sql: &str, origin: SqlOrigin, config: &ConverterConfig) -> String {
    let client = origin == SqlOrigin::Client;
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        match ch {
            '-' if client && matches!(chars.peek(), Some((_, '-'))) => {
                copy_line_comment(ch, &mut chars, &mut out);
            }
            '#' if client => copy_line_comment(ch, &mut chars, &mut out),
            '/' if client && matches!(chars.peek(), Some((_, '*'))) => {
                copy_block_comment(&mut chars, &mut out);
            }
            '\'' => {
                let mut literal = String::new();
                while let Some((_, next)) = chars.next() {
                    match next {
                        '\\' if client => match chars.next() {
                            Some((_, '\'')) => literal.push_str("''"),
                            Some((_, escaped)) => {
                                literal.push('\\');
                                literal.push(escaped);
                            }
                            None => literal.push('\\'),
                        },
                        '\'' if matches!(chars.peek(), Some((_, '\''))) => {
                            chars.next();
                            literal.push_str("''");
                        }
                        '\'' => break,
                        other => literal.push(other),
                    }
                }
                if config.replace_zero_dates && literal == MYSQL_ZERO_TIMESTAMP {
                    literal = TARGET_ZERO_TIMESTAMP.to_string();
                }
                out.push('\'');
                out.push_str(&literal);
                out.push('\'');
            }
            '`' if config.quote_identifiers => {
                out.push('"');
                while let Some((_, next)) = chars.next() {
                    match next {
                        '`' if matches!(chars.peek(), Some((_, '`'))) => {
                            chars.next();
                            out.push('`');
                        }
                        '`' => break,
                        '"' => out.push_str("\"\""),
                        other => out.push(other),
                    }
                }
                out.push('"');
            }
            '"' => {
                let end = sql[start + 1..]
                    .find('"')
                    .map_or(sql.len(), |offset| start + 1 + offset + 1);
                out.push_str(&sql[start..end]);
                while chars.peek().is_some_and(|(index, _)| *index < end) {
                    chars.next();
                }
            }
            other => out.push(other),
        }
    }

    out
}

fn copy_line_comment(first: char, chars: &mut Peekable<CharIndices<'_>>, out: &mut String) {
    out.push(first);
    for (_, next) in chars.by_ref() {
        out.push(next);
        if next == '\n' {
            break;
        }
    }
}

/// Copies a `/* ... */` comment; the cursor sits on its `*`.
fn copy_block_comment(chars: &mut Peekable<CharIndices<'_>>, out: &mut String) {
    out.push('/');
    if let Some((_, star)) = chars.next() {
        out.push(star);
    }
    let mut previous = '\0';
    for (_, next) in chars.by_ref() {
        out.push(next);
        if previous == '*' && next == '/' {
            break;
        }
        previous = next;
    }
}
