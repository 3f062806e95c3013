use std::sync::{Arc, Mutex};

use harita_core::{
    model::{RenderedLayer, SourceId},
    ports::MapSurface,
    service::SyncService,
};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Screen {
    SourceSelect,
    MapView,
    UploadForm,
}

/// Map surface backed by the terminal UI.
///
/// The layer swap is a single mutex store, so the previous overlay is
/// removed in the same step that installs the new one.
pub(crate) struct TuiMapSurface {
    layer: Mutex<Option<RenderedLayer>>,
}

impl TuiMapSurface {
    pub(crate) fn new() -> Self {
        Self {
            layer: Mutex::new(None),
        }
    }

    pub(crate) fn layer(&self) -> Option<RenderedLayer> {
        self.layer.lock().expect("surface lock poisoned").clone()
    }
}

impl MapSurface for TuiMapSurface {
    fn swap_layer(&self, layer: RenderedLayer) {
        *self.layer.lock().expect("surface lock poisoned") = Some(layer);
    }
}

pub(crate) struct App {
    pub service: Arc<SyncService>,
    pub surface: Arc<TuiMapSurface>,

    pub screen: Screen,
    pub sources: Vec<(SourceId, String)>,
    pub source_list_index: usize,

    pub selection: Vec<String>,
    pub district_list_index: usize,
    pub file_input: String,
    pub upload_status: Option<String>,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<SyncService>, surface: Arc<TuiMapSurface>) -> Self {
        let sources = service.sources();
        Self {
            service,
            surface,
            screen: Screen::SourceSelect,
            sources,
            source_list_index: 0,
            selection: Vec::new(),
            district_list_index: 0,
            file_input: String::new(),
            upload_status: None,
            is_loading: false,
            error_message: None,
        }
    }

    pub(crate) fn highlighted_source(&self) -> Option<SourceId> {
        self.sources
            .get(self.source_list_index)
            .map(|(id, _name)| id.clone())
    }

    pub(crate) fn selected_district(&self) -> Option<String> {
        self.selection.get(self.district_list_index).cloned()
    }

    /// Pull the selection list produced by the latest refresh.
    pub(crate) fn sync_selection(&mut self) {
        self.selection = self.service.selection();
        if self.district_list_index >= self.selection.len() {
            self.district_list_index = self.selection.len().saturating_sub(1);
        }
    }
}
