#![allow(dead_code)]

use sqlproxy_dialect::{parse_statement, render, rewrite, RewriteOutput, SchemaMetadata, Value};

/// Parses `sql` as client MySQL and rewrites it against `metadata`.
pub fn rewrite_sql(sql: &str, args: &[Value], metadata: &SchemaMetadata) -> RewriteOutput {
    let statement = parse_statement(sql).expect("test SQL should parse");
    rewrite(&statement, args, metadata).expect("rewrite should not fail")
}

/// Replaces every `:vK` token of `sql` with the literal text of `args[K - 1]`.
///
/// Higher ordinals are replaced first so `:v1` never matches inside `:v10`.
pub fn inline_ordinals(sql: &str, args: &[Value]) -> String {
    let mut inlined = sql.to_string();
    for (position, arg) in args.iter().enumerate().rev() {
        let literal = render("?", std::slice::from_ref(arg)).expect("literal argument");
        inlined = inlined.replace(&format!(":v{}", position + 1), &literal);
    }
    inlined
}

/// Ordinals of the `:vK` tokens of `sql` in the order they appear.
pub fn ordinal_sequence(sql: &str) -> Vec<usize> {
    sql.match_indices(":v")
        .filter_map(|(start, _)| {
            let digits = sql[start + 2..]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>();
            digits.parse().ok()
        })
        .collect()
}

pub fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

pub fn users_metadata() -> SchemaMetadata {
    SchemaMetadata::new()
        .with_columns("users", ["id", "email", "name"])
        .with_unique_index("users", "PRIMARY", ["id"])
        .with_unique_index("users", "uq_email", ["email"])
}

/// Declares a test that rewrites `sql` and compares printed SQL and arguments.
#[macro_export]
macro_rules! rewrite_case {
    (
        $name:ident,
        metadata: $metadata:expr,
        sql: $sql:expr,
        args: [$($arg:expr),* $(,)?],
        expect_sql: $expect_sql:expr,
        expect_args: [$($expect_arg:expr),* $(,)?] $(,)?
    ) => {
        #[test]
        fn $name() {
            let metadata = $metadata;
            let args: Vec<sqlproxy_dialect::Value> = vec![$($arg.into()),*];
            let output = $crate::support::rewrite_sql($sql, &args, &metadata);
            let expected_args: Vec<sqlproxy_dialect::Value> = vec![$($expect_arg.into()),*];
            assert_eq!(output.statement.to_string(), $expect_sql);
            assert_eq!(output.args, expected_args);
        }
    };
}
