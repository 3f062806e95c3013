//! Traits describing the boundary, attribute, upload, and map-surface seams.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{
    AttributeMap, BoundaryCollection, RenderedLayer, SourceConfig, SourceMeta, UploadReceipt,
};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while synchronizing the choropleth.
pub enum SyncError {
    /// Boundary source unreachable or answering with a non-success status.
    #[error("Boundary source unavailable: {0}")]
    SourceUnavailable(String),
    /// Boundary payload could not be parsed as a feature collection.
    #[error("Boundary payload malformed: {0}")]
    SourceMalformed(String),
    /// Attribute endpoint unreachable, non-success, or unparsable.
    #[error("Attribute fetch failed: {0}")]
    AttributeFetch(String),
    /// Backend validated the upload and rejected it.
    #[error("Upload rejected: {0}")]
    UploadRejected(String),
    /// Network-level failure, distinct from an HTTP error status.
    #[error("Network error: {0}")]
    Transport(#[from] ReqwestError),
    /// No boundary source registered under the requested id.
    #[error("Unknown boundary source")]
    UnknownSource,
    /// No boundary source has been activated yet.
    #[error("No boundary source selected")]
    NoActiveSource,
}

#[async_trait]
/// Trait for source-specific boundary resolution backends.
pub trait BoundaryPort: Send + Sync {
    /// Metadata describing the source handled by this port.
    fn meta(&self) -> &SourceMeta;

    /// Per-source configuration, fixed at plugin-construction time.
    fn config(&self) -> &SourceConfig;

    /// Fetch and parse the source's boundary collection.
    ///
    /// Every call performs a fresh resolution; the port neither caches
    /// nor retries. When a region filter is configured, only features
    /// matching the target region are returned.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SourceUnavailable`] when the transport fails
    /// or the source answers with a non-success status, and
    /// [`SyncError::SourceMalformed`] when the payload cannot be parsed.
    async fn resolve(&self) -> Result<BoundaryCollection, SyncError>;
}

#[async_trait]
/// Trait for the attribute backend holding district colors.
pub trait AttributePort: Send + Sync {
    /// Fetch the current district-to-color mapping.
    ///
    /// The returned map replaces the previous one wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::AttributeFetch`] when the endpoint is
    /// unreachable, answers with a non-success status, or the payload
    /// cannot be parsed.
    async fn fetch(&self) -> Result<AttributeMap, SyncError>;
}

#[async_trait]
/// Trait for submitting operator measurement files to the backend.
pub trait UploadPort: Send + Sync {
    /// Post a measurement file for the given district.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UploadRejected`] with the backend's message
    /// when the upload is validated and refused, and
    /// [`SyncError::Transport`] when the request never reaches the
    /// backend.
    async fn submit(
        &self,
        district: &str,
        file_name: &str,
        payload: Vec<u8>,
    ) -> Result<UploadReceipt, SyncError>;
}

/// Trait for the display surface owning the visible overlay.
///
/// Implementations live with the UI; the core never talks to a concrete
/// toolkit.
pub trait MapSurface: Send + Sync {
    /// Replace the currently installed layer with `layer` in one step.
    ///
    /// The previous layer, if any, must be removed by the same call, so
    /// no observer ever sees zero or two overlays.
    fn swap_layer(&self, layer: RenderedLayer);
}
