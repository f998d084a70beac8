mod config;
mod converter;
mod error;
mod schema;
mod sql;
mod types;

pub use config::{ConverterConfig, ConverterKind};
pub use converter::{Converted, Converter};
pub use error::{DialectError, ErrorCode};
pub use schema::{
    CatalogColumnRow, CatalogConstraintRow, SchemaMetadata, SchemaMetadataProvider,
    SharedSchemaMetadata,
};
pub use sql::ast::{parse_statement, DialectStatement, MergeInto, MergeSource};
pub use sql::format::{describe_query, render};
pub use sql::preview::StatementKind;
pub use sql::rewrite::{rewrite, FallbackReason, RewriteOutcome, RewriteOutput};
pub use types::Value;
