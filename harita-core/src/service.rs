//! High-level sync service orchestrating attribute and boundary refresh.

use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex as TokioMutex;
use tracing::{debug, warn};

use crate::model::{AttributeMap, SourceId, SourceMeta, UploadReceipt};
use crate::plugin::SourceRegistry;
use crate::ports::{AttributePort, MapSurface, SyncError, UploadPort};
use crate::{render, selection};

/// Result of a measurement upload, including the follow-up refresh.
///
/// A successful upload always triggers exactly one refresh; if that
/// refresh fails, the upload itself still succeeded and the failure is
/// carried here so the UI can show both outcomes.
#[derive(Debug)]
pub struct UploadOutcome {
    /// Echoed district, average, and color from the backend.
    pub receipt: UploadReceipt,
    /// Error from the follow-up refresh, if it failed.
    pub refresh_error: Option<SyncError>,
}

/// View state replaced atomically at the end of each successful refresh.
#[derive(Debug, Default)]
struct ViewState {
    attributes: AttributeMap,
    selection: Vec<String>,
}

/// Public entry point for refreshing the choropleth and uploading data.
///
/// Owns the shared mutable state of the application: the current
/// attribute map, the selection list, and (through the surface port)
/// the rendered layer. There are no module-level globals.
pub struct SyncService {
    registry: Arc<SourceRegistry>,
    attributes: Arc<dyn AttributePort>,
    uploads: Arc<dyn UploadPort>,
    surface: Arc<dyn MapSurface>,
    active_source: StdMutex<Option<SourceId>>,
    view: StdMutex<ViewState>,
    // Single-flight guard: overlapping refresh calls queue behind the
    // one in flight instead of interleaving their fetches.
    refresh_gate: TokioMutex<()>,
}

impl SyncService {
    /// Create a new service bound to the provided registry and ports.
    #[must_use]
    pub fn new(
        registry: Arc<SourceRegistry>,
        attributes: Arc<dyn AttributePort>,
        uploads: Arc<dyn UploadPort>,
        surface: Arc<dyn MapSurface>,
    ) -> Self {
        Self {
            registry,
            attributes,
            uploads,
            surface,
            active_source: StdMutex::new(None),
            view: StdMutex::new(ViewState::default()),
            refresh_gate: TokioMutex::new(()),
        }
    }

    /// List all registered boundary sources and their display names.
    #[must_use]
    pub fn sources(&self) -> Vec<(SourceId, String)> {
        self.registry
            .sources()
            .into_iter()
            .map(|meta| (meta.id, meta.name))
            .collect()
    }

    /// Metadata of the currently active source, if one is selected.
    #[must_use]
    pub fn active_source(&self) -> Option<SourceMeta> {
        let active = self
            .active_source
            .lock()
            .expect("active source lock poisoned")
            .clone()?;
        self.registry
            .plugin(&active)
            .ok()
            .map(|plugin| plugin.meta.clone())
    }

    /// Activate a boundary source for subsequent refreshes.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownSource`] when the id is not registered.
    pub fn set_active_source(&self, source: SourceId) -> Result<(), SyncError> {
        self.registry.plugin(&source)?;
        *self
            .active_source
            .lock()
            .expect("active source lock poisoned") = Some(source);
        Ok(())
    }

    /// District names resolved by the most recent successful refresh.
    #[must_use]
    pub fn selection(&self) -> Vec<String> {
        self.view
            .lock()
            .expect("view state lock poisoned")
            .selection
            .clone()
    }

    /// Attribute map fetched by the most recent successful refresh.
    #[must_use]
    pub fn attribute_map(&self) -> AttributeMap {
        self.view
            .lock()
            .expect("view state lock poisoned")
            .attributes
            .clone()
    }

    /// Run one full refresh cycle: fetch attributes, resolve boundaries,
    /// render the layer, and update the selection list.
    ///
    /// A failure in either fetch aborts the cycle before anything is
    /// mutated; the previously rendered layer, attribute map, and
    /// selection list stay visible. Concurrent callers run strictly one
    /// after another behind the single-flight gate.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NoActiveSource`] before a source is picked,
    /// or the failure of the attribute fetch or boundary resolution.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        let _flight = self.refresh_gate.lock().await;

        let source = self
            .active_source
            .lock()
            .expect("active source lock poisoned")
            .clone()
            .ok_or(SyncError::NoActiveSource)?;
        let plugin = self.registry.plugin(&source)?;

        debug!(source = %source.0, "refreshing choropleth");

        let attributes = self.attributes.fetch().await?;
        let collection = plugin.boundary_port.resolve().await?;
        let name_key = &plugin.boundary_port.config().name_key;

        let layer = render::render(&collection, &attributes, name_key);
        let selection = selection::district_names(&collection, name_key);

        debug!(
            districts = collection.len(),
            attributed = !attributes.is_empty(),
            "refresh resolved"
        );

        self.surface.swap_layer(layer);
        let mut view = self.view.lock().expect("view state lock poisoned");
        view.attributes = attributes;
        view.selection = selection;

        Ok(())
    }

    /// Submit a measurement file and, on acceptance, refresh once.
    ///
    /// Rejected uploads and transport failures never trigger a refresh.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UploadRejected`] with the backend's message,
    /// or [`SyncError::Transport`] when the request never went through.
    pub async fn submit_measurements(
        &self,
        district: &str,
        file_name: &str,
        payload: Vec<u8>,
    ) -> Result<UploadOutcome, SyncError> {
        let receipt = self.uploads.submit(district, file_name, payload).await?;

        debug!(district = %receipt.district, average = receipt.average, "upload accepted");

        let refresh_error = match self.refresh().await {
            Ok(()) => None,
            Err(error) => {
                warn!(%error, "refresh after upload failed");
                Some(error)
            }
        };

        Ok(UploadOutcome {
            receipt,
            refresh_error,
        })
    }
}
