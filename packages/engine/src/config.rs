use serde::{Deserialize, Serialize};

use crate::DialectError;

/// Source/target dialect pair a converter translates between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConverterKind {
    #[default]
    #[serde(rename = "mysql-to-oracle")]
    MysqlToOracle,
}

impl ConverterKind {
    pub fn from_name(name: &str) -> Result<Self, DialectError> {
        match name.trim() {
            "mysql-to-oracle" => Ok(Self::MysqlToOracle),
            other => Err(DialectError::Config(format!(
                "unsupported converter '{other}', expected one of: mysql-to-oracle"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MysqlToOracle => "mysql-to-oracle",
        }
    }
}

/// Settings of one converter instance. Every field has a default, so an empty
/// TOML document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    pub kind: ConverterKind,
    /// Rewrite backtick-quoted identifiers as double-quoted ones.
    pub quote_identifiers: bool,
    /// Replace the MySQL zero timestamp literal with the target's minimum.
    pub replace_zero_dates: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            kind: ConverterKind::MysqlToOracle,
            quote_identifiers: true,
            replace_zero_dates: true,
        }
    }
}

impl ConverterConfig {
    pub fn for_kind(kind: ConverterKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConverterConfig, ConverterKind};
    use crate::ErrorCode;

    #[test]
    fn resolves_converter_names() {
        assert_eq!(
            ConverterKind::from_name("mysql-to-oracle"),
            Ok(ConverterKind::MysqlToOracle)
        );
        let error = ConverterKind::from_name("mysql-to-postgres").expect_err("unknown name");
        assert_eq!(error.code(), ErrorCode::Config);
        assert_eq!(ConverterKind::MysqlToOracle.name(), "mysql-to-oracle");
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ConverterConfig =
            serde_json::from_str(r#"{"replace_zero_dates": false}"#).expect("valid config");
        assert_eq!(config.kind, ConverterKind::MysqlToOracle);
        assert!(config.quote_identifiers);
        assert!(!config.replace_zero_dates);

        let kind: ConverterKind = serde_json::from_str(r#""mysql-to-oracle""#).expect("kind");
        assert_eq!(kind, ConverterKind::MysqlToOracle);
        assert!(serde_json::from_str::<ConverterConfig>(r#"{"dialect": "x"}"#).is_err());
    }
}
