//! Registry for all boundary source plugins.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{SourceId, SourceMeta};
use crate::ports::{BoundaryPort, SyncError};

/// A boundary source packaged for registration.
pub struct SourcePlugin {
    /// Static metadata describing the source.
    pub meta: SourceMeta,
    /// Implementation resolving the source's boundary collection.
    pub boundary_port: Arc<dyn BoundaryPort>,
}

/// Registry that resolves plugins by source identifier.
pub struct SourceRegistry {
    plugins: HashMap<SourceId, SourcePlugin>,
}

impl SourceRegistry {
    /// Build a registry from the provided plugin list.
    #[must_use]
    pub fn new(plugins: Vec<SourcePlugin>) -> Self {
        let plugins_map = plugins
            .into_iter()
            .map(|plugin| (plugin.meta.id.clone(), plugin))
            .collect();
        Self {
            plugins: plugins_map,
        }
    }

    /// Return metadata for all registered sources.
    #[must_use]
    pub fn sources(&self) -> Vec<SourceMeta> {
        self.plugins
            .values()
            .map(|plugin| plugin.meta.clone())
            .collect()
    }

    /// Iterator over source metadata.
    pub fn sources_iter(&self) -> impl Iterator<Item = &SourceMeta> {
        self.plugins.values().map(|plugin| &plugin.meta)
    }

    /// Look up a plugin for the given source.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownSource`] when no plugin is registered.
    pub fn plugin(&self, source: &SourceId) -> Result<&SourcePlugin, SyncError> {
        self.plugins.get(source).ok_or(SyncError::UnknownSource)
    }
}
