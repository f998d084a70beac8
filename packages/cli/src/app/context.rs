use std::path::Path;

use sqlproxy_dialect::{Converter, ConverterKind};

use crate::error::CliError;
use crate::input;

/// Everything a subcommand needs, resolved once from the global flags.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub converter: Converter,
}

impl AppContext {
    pub fn load(
        config_path: Option<&Path>,
        metadata_path: Option<&Path>,
        converter: Option<&str>,
    ) -> Result<Self, CliError> {
        let mut config = input::load_config(config_path)?;
        if let Some(name) = converter {
            config.kind = ConverterKind::from_name(name)?;
        }
        let metadata = input::load_metadata(metadata_path)?;
        tracing::debug!(
            converter = config.kind.name(),
            tables = metadata.columns.len(),
            "converter context loaded"
        );
        Ok(Self {
            converter: Converter::new(config, metadata),
        })
    }
}
