use std::sync::Arc;

use crate::sql::ast::parse_statement;
use crate::sql::finish::{finish_for_target, SqlOrigin};
use crate::sql::rewrite::rewrite;
use crate::{
    ConverterConfig, ConverterKind, DialectError, RewriteOutcome, SchemaMetadata,
    SharedSchemaMetadata, StatementKind, Value,
};

/// SQL text and arguments ready for the target backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub sql: String,
    pub args: Vec<Value>,
    pub outcome: RewriteOutcome,
}

/// Text-level entry point: parses client SQL, rewrites it against the current
/// schema metadata snapshot and prints it in the target dialect.
#[derive(Debug, Clone)]
pub struct Converter {
    config: ConverterConfig,
    metadata: Arc<SharedSchemaMetadata>,
}

impl Converter {
    pub fn new(config: ConverterConfig, metadata: SchemaMetadata) -> Self {
        Self::with_shared_metadata(config, Arc::new(SharedSchemaMetadata::new(metadata)))
    }

    /// Uses a metadata holder that the caller may keep replacing.
    pub fn with_shared_metadata(
        config: ConverterConfig,
        metadata: Arc<SharedSchemaMetadata>,
    ) -> Self {
        Self { config, metadata }
    }

    pub fn from_name(name: &str, metadata: SchemaMetadata) -> Result<Self, DialectError> {
        let kind = ConverterKind::from_name(name)?;
        tracing::info!(converter = kind.name(), "converter created");
        Ok(Self::new(ConverterConfig::for_kind(kind), metadata))
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn metadata(&self) -> &SharedSchemaMetadata {
        &self.metadata
    }

    /// Converts one statement and its bind arguments.
    ///
    /// Statements that never need a rewrite are returned verbatim without
    /// being parsed. Parse failures are returned to the caller.
    pub fn convert(&self, sql: &str, args: &[Value]) -> Result<Converted, DialectError> {
        if !StatementKind::preview(sql).is_rewrite_candidate() {
            return Ok(Converted {
                sql: sql.to_string(),
                args: args.to_vec(),
                outcome: RewriteOutcome::Unchanged,
            });
        }

        let statement = parse_statement(sql).inspect_err(|error| {
            tracing::warn!(%error, sql, "statement could not be parsed for conversion");
        })?;
        let snapshot = self.metadata.snapshot();
        let output = rewrite(&statement, args, snapshot.as_ref())?;

        // Pass-through results keep the client's text and its escapes.
        let (text, origin) = if output.outcome.is_rewritten() {
            (output.statement.to_string(), SqlOrigin::Printed)
        } else {
            (sql.to_string(), SqlOrigin::Client)
        };
        let converted = finish_for_target(&text, origin, &self.config);
        tracing::debug!(sql = %converted, args = output.args.len(), "converted statement");
        Ok(Converted {
            sql: converted,
            args: output.args,
            outcome: output.outcome,
        })
    }

    /// Converts statement text for preparation. Placeholders keep their source
    /// ordinals so the prepared statement binds arguments by name.
    pub fn prepare(&self, sql: &str) -> Result<String, DialectError> {
        Ok(self.convert(sql, &[])?.sql)
    }

    /// Like `convert`, but a statement that cannot be converted is returned
    /// unchanged together with its arguments.
    pub fn convert_or_original(&self, sql: &str, args: &[Value]) -> Converted {
        match self.convert(sql, args) {
            Ok(converted) => converted,
            Err(error) => {
                tracing::warn!(%error, sql, "using the original statement");
                Converted {
                    sql: sql.to_string(),
                    args: args.to_vec(),
                    outcome: RewriteOutcome::Unchanged,
                }
            }
        }
    }
}
