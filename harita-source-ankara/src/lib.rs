//! Boundary source for the region-scoped Ankara district GeoJSON.
//!
//! The payload is already narrowed to one region by the host serving it,
//! so no region filter is configured; district names sit under `ilce`.

use std::sync::Arc;

use async_trait::async_trait;
use geojson::GeoJson;
use reqwest::{Client, RequestBuilder};

use harita_core::{
    model::{BoundaryCollection, SourceConfig, SourceId, SourceMeta, Sources},
    plugin::SourcePlugin,
    ports::{BoundaryPort, SyncError},
};

const ENDPOINT_PATH: &str = "/ankara-ilceler.geojson";
const NAME_KEY: &str = "ilce";

/// Boundary resolution for the Ankara-only payload.
pub struct AnkaraBoundaryPort {
    client: Client,
    meta: SourceMeta,
    config: SourceConfig,
}

impl AnkaraBoundaryPort {
    /// Create a new port fetching from the given host.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            meta: source_meta(),
            config: SourceConfig {
                endpoint: format!("{}{ENDPOINT_PATH}", base_url.trim_end_matches('/')),
                name_key: NAME_KEY.to_owned(),
                region_filter: None,
            },
        }
    }
}

#[async_trait]
impl BoundaryPort for AnkaraBoundaryPort {
    fn meta(&self) -> &SourceMeta {
        &self.meta
    }

    fn config(&self) -> &SourceConfig {
        &self.config
    }

    async fn resolve(&self) -> Result<BoundaryCollection, SyncError> {
        let payload = fetch_payload(self.client.get(&self.config.endpoint)).await?;
        parse_collection(&payload)
    }
}

/// Build the plugin bundle for the Ankara source.
#[must_use]
pub fn plugin(client: Client, base_url: &str) -> SourcePlugin {
    SourcePlugin {
        meta: source_meta(),
        boundary_port: Arc::new(AnkaraBoundaryPort::new(client, base_url)),
    }
}

fn source_meta() -> SourceMeta {
    SourceMeta {
        id: SourceId::from(Sources::Ankara),
        name: String::from("Ankara ilçeleri"),
    }
}

fn parse_collection(payload: &str) -> Result<BoundaryCollection, SyncError> {
    let geojson: GeoJson = payload
        .parse()
        .map_err(|error: geojson::Error| SyncError::SourceMalformed(error.to_string()))?;
    BoundaryCollection::from_geojson(geojson).map_err(|kind| {
        SyncError::SourceMalformed(format!("expected a feature collection, got {kind}"))
    })
}

// Small helper to fetch the raw payload with status handling.
async fn fetch_payload(req: RequestBuilder) -> Result<String, SyncError> {
    let response = req
        .send()
        .await
        .map_err(|error| SyncError::SourceUnavailable(error.to_string()))?
        .error_for_status()
        .map_err(|error| SyncError::SourceUnavailable(error.to_string()))?;

    response
        .text()
        .await
        .map_err(|error| SyncError::SourceUnavailable(error.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_districts_in_source_order() {
        let payload = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": null, "properties": {"ilce": "Çankaya"}},
                {"type": "Feature", "geometry": null, "properties": {"ilce": "Keçiören"}}
            ]
        })
        .to_string();

        let collection = parse_collection(&payload).unwrap();
        let names: Vec<_> = collection
            .features
            .iter()
            .filter_map(|feature| feature.name(NAME_KEY))
            .collect();
        assert_eq!(names, vec!["Çankaya", "Keçiören"]);
    }

    #[test]
    fn malformed_payload_is_reported_as_such() {
        let error = parse_collection("ilçe listesi değil").unwrap_err();
        assert!(matches!(error, SyncError::SourceMalformed(_)));

        let error = parse_collection(
            &json!({"type": "Feature", "geometry": null, "properties": {}}).to_string(),
        )
        .unwrap_err();
        assert!(matches!(error, SyncError::SourceMalformed(_)));
    }

    #[test]
    fn config_carries_endpoint_and_name_key() {
        let port = AnkaraBoundaryPort::new(Client::new(), "http://127.0.0.1:5000/");
        assert_eq!(
            port.config().endpoint,
            "http://127.0.0.1:5000/ankara-ilceler.geojson"
        );
        assert_eq!(port.config().name_key, "ilce");
        assert!(port.config().region_filter.is_none());
    }
}
