use std::sync::Arc;

use arc_swap::ArcSwap;

use super::SchemaMetadata;

/// Copy-on-write holder for schema metadata that may be hot-reloaded.
///
/// Readers take an [`Arc`] snapshot per rewrite call and never observe a
/// partially replaced map.
#[derive(Debug)]
pub struct SharedSchemaMetadata {
    current: ArcSwap<SchemaMetadata>,
}

impl SharedSchemaMetadata {
    pub fn new(metadata: SchemaMetadata) -> Self {
        Self {
            current: ArcSwap::from_pointee(metadata),
        }
    }

    pub fn snapshot(&self) -> Arc<SchemaMetadata> {
        self.current.load_full()
    }

    pub fn replace(&self, metadata: SchemaMetadata) {
        self.current.store(Arc::new(metadata));
    }
}

impl Default for SharedSchemaMetadata {
    fn default() -> Self {
        Self::new(SchemaMetadata::default())
    }
}
