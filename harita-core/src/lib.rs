//! Core types and service wiring for the harita choropleth engine.

/// Domain models shared by all boundary sources and the backend client.
pub mod model;
/// Registry and helpers for plugging boundary sources into the service.
pub mod plugin;
/// Traits describing the boundary, attribute, upload, and surface seams.
pub mod ports;
/// Layer construction from a collection plus attributes.
pub mod render;
/// Selection-list derivation for the upload form.
pub mod selection;
/// High-level sync service used by clients.
pub mod service;

pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use service::*;
