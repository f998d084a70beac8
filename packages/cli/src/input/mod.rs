use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::Value as JsonValue;
use sqlproxy_dialect::{ConverterConfig, SchemaMetadata, Value};

use crate::error::CliError;

/// Reads the converter settings; no path means the defaults.
pub fn load_config(path: Option<&Path>) -> Result<ConverterConfig, CliError> {
    let Some(path) = path else {
        return Ok(ConverterConfig::default());
    };
    let text = read_file(path)?;
    let config = parse_config(&text)
        .map_err(|err| CliError::msg(format!("invalid config {}: {err}", path.display())))?;
    tracing::info!(path = %path.display(), converter = config.kind.name(), "loaded config");
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<ConverterConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Reads schema metadata; without a file every statement rewrites as if no
/// table had unique indexes or identity columns.
pub fn load_metadata(path: Option<&Path>) -> Result<SchemaMetadata, CliError> {
    let Some(path) = path else {
        tracing::debug!("no schema metadata given, using an empty catalog");
        return Ok(SchemaMetadata::new());
    };
    let text = read_file(path)?;
    Ok(SchemaMetadata::from_json_str(&text)?)
}

/// Statement text from the argument itself, stdin (`-`) or a file (`@path`).
pub fn resolve_sql(sql: &str) -> Result<String, CliError> {
    if sql == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(|source| CliError::io("failed to read SQL from stdin", source))?;
        if input.trim().is_empty() {
            return Err(CliError::InvalidArgs("stdin SQL input is empty"));
        }
        return Ok(input.trim_end().to_string());
    }
    if let Some(path) = sql.strip_prefix('@') {
        let text = read_file(Path::new(path))?;
        if text.trim().is_empty() {
            return Err(CliError::msg(format!("SQL file {path} is empty")));
        }
        return Ok(text.trim_end().to_string());
    }

    Ok(sql.to_string())
}

/// Parses one `--arg` value.
pub fn parse_arg_value(raw: &str) -> Result<Value, String> {
    let Ok(json) = serde_json::from_str::<JsonValue>(raw) else {
        return Ok(Value::Text(raw.to_string()));
    };
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(value) => Ok(Value::Bool(value)),
        JsonValue::Number(number) => {
            if let Some(value) = number.as_i64() {
                Ok(Value::Int(value))
            } else if let Some(value) = number.as_u64() {
                Ok(Value::UInt(value))
            } else {
                number
                    .as_f64()
                    .map(Value::Float)
                    .ok_or_else(|| format!("unsupported number '{raw}'"))
            }
        }
        JsonValue::String(value) => Ok(Value::Text(value)),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            Err(format!("argument '{raw}' must be a scalar"))
        }
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|err| {
        CliError::msg(format!("failed to read {}: {err}", path.display()))
    })
}
