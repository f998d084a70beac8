use comfy_table::{Cell, ContentArrangement, Row, Table, presets::UTF8_BORDERS_ONLY};
use serde_json::Value as JsonValue;
use sqlproxy_dialect::{Converted, RewriteOutcome, Value};

pub fn print_converted_table(converted: &Converted) {
    println!("{}", converted.sql);
    println!("-- {}", outcome_label(&converted.outcome));
    if let Some(table) = argument_table(&converted.args, &converted.outcome) {
        println!("{table}");
        println!("({} args)", converted.args.len());
    }
}

pub fn print_converted_json(converted: &Converted) {
    println!(
        "{}",
        serde_json::to_string_pretty(&converted_json(converted)).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Rewritten SQL binds by `:vN`; pass-through SQL keeps the client's
/// placeholders, so its arguments are listed by position.
fn argument_table(args: &[Value], outcome: &RewriteOutcome) -> Option<Table> {
    if args.is_empty() {
        return None;
    }
    let rewritten = outcome.is_rewritten();

    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(Row::from(vec![
            Cell::new(if rewritten { "placeholder" } else { "position" }),
            Cell::new("type"),
            Cell::new("value"),
        ]));

    for (position, value) in args.iter().enumerate() {
        table.add_row(Row::from(vec![
            Cell::new(if rewritten {
                format!(":v{}", position + 1)
            } else {
                (position + 1).to_string()
            }),
            Cell::new(value.type_name()),
            Cell::new(value_to_text(value)),
        ]));
    }
    Some(table)
}

fn converted_json(converted: &Converted) -> JsonValue {
    let fallback_reason = match &converted.outcome {
        RewriteOutcome::Fallback(reason) => JsonValue::from(reason.to_string()),
        RewriteOutcome::Unchanged | RewriteOutcome::Rewritten => JsonValue::Null,
    };
    serde_json::json!({
        "sql": converted.sql,
        "args": converted.args.iter().map(value_to_json).collect::<Vec<_>>(),
        "outcome": outcome_label(&converted.outcome),
        "fallback_reason": fallback_reason,
    })
}

fn outcome_label(outcome: &RewriteOutcome) -> &'static str {
    match outcome {
        RewriteOutcome::Unchanged => "unchanged",
        RewriteOutcome::Rewritten => "rewritten",
        RewriteOutcome::Fallback(_) => "fallback",
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(v) => JsonValue::from(*v),
        Value::Int(v) => JsonValue::from(*v),
        Value::UInt(v) => JsonValue::from(*v),
        Value::Float(v) => serde_json::Number::from_f64(*v)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Text(v) => JsonValue::from(v.clone()),
        Value::Blob(_) => JsonValue::from(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{argument_table, converted_json, value_to_json};
    use serde_json::json;
    use sqlproxy_dialect::{Converted, FallbackReason, RewriteOutcome, Value};

    #[test]
    fn json_payload_reports_outcome_and_arguments() {
        let converted = Converted {
            sql: "INSERT INTO t (name) VALUES (:v1)".to_string(),
            args: vec![Value::Text("a".to_string()), Value::Blob(vec![0xca, 0xfe])],
            outcome: RewriteOutcome::Fallback(FallbackReason::UnsupportedInsertSource),
        };
        let payload = converted_json(&converted);
        assert_eq!(payload["outcome"], json!("fallback"));
        assert_eq!(payload["args"], json!(["a", "0xcafe"]));
        assert_eq!(
            payload["fallback_reason"],
            json!("conflict handling requires a VALUES row source")
        );
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(value_to_json(&Value::Float(f64::NAN)), json!(null));
        assert_eq!(value_to_json(&Value::UInt(7)), json!(7));
    }

    #[test]
    fn argument_table_labels_follow_the_outcome() {
        assert!(argument_table(&[], &RewriteOutcome::Rewritten).is_none());
        let args = [Value::Int(5), Value::Null];

        let rendered = argument_table(&args, &RewriteOutcome::Rewritten)
            .expect("table")
            .to_string();
        assert!(rendered.contains(":v2"));
        assert!(rendered.contains("null"));

        let rendered = argument_table(&args, &RewriteOutcome::Unchanged)
            .expect("table")
            .to_string();
        assert!(rendered.contains("position"));
        assert!(!rendered.contains(":v"));
    }
}
