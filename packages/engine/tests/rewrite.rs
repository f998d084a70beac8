mod support;

use sqlproxy_dialect::{FallbackReason, RewriteOutcome, SchemaMetadata, Value};
use support::{inline_ordinals, ordinal_sequence, rewrite_sql, text, users_metadata};

fn t_metadata() -> SchemaMetadata {
    SchemaMetadata::new()
        .with_columns("t", ["id", "name"])
        .with_unique_index("t", "PRIMARY", ["id"])
}

rewrite_case!(
    upsert_becomes_merge_from_dual,
    metadata: t_metadata(),
    sql: "INSERT INTO t(id,name) VALUES(?,?) ON DUPLICATE KEY UPDATE name=?",
    args: [Value::Int(1), text("a"), text("b")],
    expect_sql: "MERGE INTO t t USING dual ON (t.id = :v1) \
                 WHEN MATCHED THEN UPDATE SET t.name = :v2 \
                 WHEN NOT MATCHED THEN INSERT (id, name) VALUES (:v3, :v4)",
    expect_args: [Value::Int(1), text("b"), Value::Int(1), text("a")],
);

rewrite_case!(
    identity_column_is_stripped_with_its_value,
    metadata: SchemaMetadata::new().with_auto_increment("t", "id", 1),
    sql: "INSERT INTO t(id,str) VALUES(?,?)",
    args: [Value::Null, text("x")],
    expect_sql: "INSERT INTO t (str) VALUES (:v1)",
    expect_args: [text("x")],
);

rewrite_case!(
    conflict_clause_is_dropped_without_covering_index,
    metadata: SchemaMetadata::new().with_unique_index("t", "uq_email", ["email"]),
    sql: "INSERT INTO t (id, name) VALUES (?, ?) ON DUPLICATE KEY UPDATE name = ?",
    args: [Value::Int(1), text("a"), text("b")],
    expect_sql: "INSERT INTO t (id, name) VALUES (:v1, :v2)",
    expect_args: [Value::Int(1), text("a")],
);

rewrite_case!(
    multi_row_upsert_uses_a_two_row_union,
    metadata: SchemaMetadata::new().with_unique_index("t", "uq_pair", ["a", "b"]),
    sql: "INSERT INTO t (a, b, c) VALUES (?, ?, ?), (?, ?, ?) ON DUPLICATE KEY UPDATE c = VALUES(c)",
    args: [
        Value::Int(1), Value::Int(2), text("x"),
        Value::Int(3), Value::Int(4), text("y"),
    ],
    expect_sql: "MERGE INTO t t USING (SELECT :v1 AS a, :v2 AS b, :v3 AS c FROM dual \
                 UNION ALL SELECT :v4 AS a, :v5 AS b, :v6 AS c FROM dual) s \
                 ON (t.a = s.a AND t.b = s.b) \
                 WHEN MATCHED THEN UPDATE SET t.c = s.c \
                 WHEN NOT MATCHED THEN INSERT (a, b, c) VALUES (s.a, s.b, s.c)",
    expect_args: [
        Value::Int(1), Value::Int(2), text("x"),
        Value::Int(3), Value::Int(4), text("y"),
    ],
);

rewrite_case!(
    replace_into_updates_every_other_column,
    metadata: users_metadata(),
    sql: "REPLACE INTO users (id, name) VALUES (?, ?)",
    args: [Value::Int(9), text("n")],
    expect_sql: "MERGE INTO users t USING dual ON (t.id = :v1) \
                 WHEN MATCHED THEN UPDATE SET t.name = :v2 \
                 WHEN NOT MATCHED THEN INSERT (id, name) VALUES (:v3, :v4)",
    expect_args: [Value::Int(9), text("n"), Value::Int(9), text("n")],
);

rewrite_case!(
    every_covered_index_becomes_a_disjunct,
    metadata: users_metadata(),
    sql: "INSERT INTO users (id, email, name) VALUES (?, ?, ?) ON DUPLICATE KEY UPDATE name = ?",
    args: [Value::Int(1), text("e"), text("a"), text("b")],
    expect_sql: "MERGE INTO users t USING dual ON (t.id = :v1 OR t.email = :v2) \
                 WHEN MATCHED THEN UPDATE SET t.name = :v3 \
                 WHEN NOT MATCHED THEN INSERT (id, email, name) VALUES (:v4, :v5, :v6)",
    expect_args: [
        Value::Int(1), text("e"), text("b"),
        Value::Int(1), text("e"), text("a"),
    ],
);

rewrite_case!(
    update_drops_identity_assignments,
    metadata: SchemaMetadata::new().with_auto_increment("t", "id", 1),
    sql: "UPDATE t SET id = ?, name = ? WHERE code = ?",
    args: [Value::Int(4), text("n"), text("c")],
    expect_sql: "UPDATE t SET name = :v1 WHERE code = :v2",
    expect_args: [text("n"), text("c")],
);

#[test]
fn plain_insert_passes_through_byte_identical() {
    let sql = "INSERT INTO t (id, name) VALUES (?, ?)";
    let args = vec![Value::Int(1), text("a")];
    let output = rewrite_sql(sql, &args, &t_metadata());

    assert_eq!(output.outcome, RewriteOutcome::Unchanged);
    assert_eq!(output.statement.to_string(), sql);
    assert_eq!(output.args, args);
}

#[test]
fn dropping_the_conflict_clause_is_intentional_default_open_behavior() {
    // Duplicate rows become possible here; callers rely on the insert going through.
    let output = rewrite_sql(
        "INSERT IGNORE INTO t (name) VALUES (?)",
        &[text("a")],
        &t_metadata(),
    );
    assert_eq!(output.outcome, RewriteOutcome::Rewritten);
    assert_eq!(output.statement.to_string(), "INSERT INTO t (name) VALUES (:v1)");
}

#[test]
fn partial_index_coverage_contributes_nothing() {
    let metadata = SchemaMetadata::new()
        .with_unique_index("t", "uq_pair", ["a", "b"])
        .with_unique_index("t", "PRIMARY", ["id"]);
    let output = rewrite_sql(
        "INSERT INTO t (id, a, c) VALUES (1, 2, 3) ON DUPLICATE KEY UPDATE c = 4",
        &[],
        &metadata,
    );
    let merge = output.statement.as_merge().expect("merge statement");
    assert_eq!(merge.insert_columns.len(), 3);
    assert!(output.statement.as_statement().is_none());
    assert_eq!(
        output.statement.to_string(),
        "MERGE INTO t t USING dual ON (t.id = 1) WHEN MATCHED THEN UPDATE SET t.c = 4 \
         WHEN NOT MATCHED THEN INSERT (id, a, c) VALUES (1, 2, 3)"
    );
}

#[test]
fn identity_stripping_happens_before_index_matching() {
    let metadata = SchemaMetadata::new()
        .with_auto_increment("users", "id", 1)
        .with_unique_index("users", "PRIMARY", ["id"])
        .with_unique_index("users", "uq_email", ["email"]);
    let output = rewrite_sql(
        "INSERT INTO users (id, email, name) VALUES (?, ?, ?) ON DUPLICATE KEY UPDATE name = VALUES(name)",
        &[Value::Null, text("e"), text("n")],
        &metadata,
    );
    assert_eq!(
        output.statement.to_string(),
        "MERGE INTO users t USING dual ON (t.email = :v1) \
         WHEN MATCHED THEN UPDATE SET t.name = :v2 \
         WHEN NOT MATCHED THEN INSERT (email, name) VALUES (:v3, :v4)"
    );
    assert_eq!(output.args, vec![text("e"), text("n"), text("e"), text("n")]);
}

#[test]
fn unresolvable_column_list_falls_back_to_the_input() {
    let metadata = SchemaMetadata::new().with_unique_index("t", "PRIMARY", ["id"]);
    let sql = "INSERT INTO t VALUES (?, ?) ON DUPLICATE KEY UPDATE name = ?";
    let args = vec![Value::Int(1), text("a"), text("b")];
    let output = rewrite_sql(sql, &args, &metadata);

    assert_eq!(
        output.outcome,
        RewriteOutcome::Fallback(FallbackReason::MissingColumnList {
            table: "t".to_string()
        })
    );
    assert_eq!(output.statement.to_string(), sql);
    assert_eq!(output.args, args);
}

#[test]
fn rewritten_placeholders_are_contiguous_in_document_order() {
    let output = rewrite_sql(
        "INSERT INTO users (id, email, name) VALUES (?, ?, ?), (?, ?, ?) \
         ON DUPLICATE KEY UPDATE name = CONCAT(?, VALUES(name))",
        &[
            Value::Int(1),
            text("a@x"),
            text("a"),
            Value::Int(2),
            text("b@x"),
            text("b"),
            text("prefix-"),
        ],
        &users_metadata(),
    );
    let sql = output.statement.to_string();
    let ordinals = ordinal_sequence(&sql);

    assert_eq!(ordinals, (1..=output.args.len()).collect::<Vec<_>>());
    assert_eq!(
        inline_ordinals(&sql, &output.args),
        "MERGE INTO users t USING (SELECT 1 AS id, 'a@x' AS email, 'a' AS name FROM dual \
         UNION ALL SELECT 2 AS id, 'b@x' AS email, 'b' AS name FROM dual) s \
         ON (t.id = s.id OR t.email = s.email) \
         WHEN MATCHED THEN UPDATE SET t.name = CONCAT('prefix-', s.name) \
         WHEN NOT MATCHED THEN INSERT (id, email, name) VALUES (s.id, s.email, s.name)"
    );
}

#[test]
fn explicit_ordinals_are_dereferenced_against_the_input_args() {
    let output = rewrite_sql(
        "INSERT INTO t (id, name) VALUES (?2, ?1) ON DUPLICATE KEY UPDATE name = ?1",
        &[text("a"), Value::Int(7)],
        &t_metadata(),
    );
    assert_eq!(
        inline_ordinals(&output.statement.to_string(), &output.args),
        "MERGE INTO t t USING dual ON (t.id = 7) WHEN MATCHED THEN UPDATE SET t.name = 'a' \
         WHEN NOT MATCHED THEN INSERT (id, name) VALUES (7, 'a')"
    );
}

#[test]
fn select_index_hints_are_removed() {
    let output = rewrite_sql(
        "SELECT id FROM users FORCE INDEX (uq_email) WHERE email = ?",
        &[text("e")],
        &users_metadata(),
    );
    assert_eq!(
        output.statement.to_string(),
        "SELECT id FROM users WHERE email = :v1"
    );
    assert_eq!(output.args, vec![text("e")]);
}
