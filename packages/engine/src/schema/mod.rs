mod provider;
mod shared;

pub use provider::{CatalogColumnRow, CatalogConstraintRow, SchemaMetadata, SchemaMetadataProvider};
pub use shared::SharedSchemaMetadata;
