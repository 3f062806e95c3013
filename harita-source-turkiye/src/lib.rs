//! Boundary source for the nationwide Türkiye district GeoJSON.
//!
//! The payload covers every district in the country, so a region filter
//! narrows it to the target region before anything is rendered. This
//! source stores district names under `ad` and the enclosing region
//! under `il_adi`.

use std::sync::Arc;

use async_trait::async_trait;
use geojson::GeoJson;
use reqwest::{Client, RequestBuilder};

use harita_core::{
    model::{BoundaryCollection, RegionFilter, SourceConfig, SourceId, SourceMeta, Sources},
    plugin::SourcePlugin,
    ports::{BoundaryPort, SyncError},
};

const ENDPOINT_PATH: &str = "/static/turkey-ilceler.geojson";
const NAME_KEY: &str = "ad";
const REGION_KEY: &str = "il_adi";

/// Boundary resolution for the nationwide payload.
pub struct TurkiyeBoundaryPort {
    client: Client,
    meta: SourceMeta,
    config: SourceConfig,
}

impl TurkiyeBoundaryPort {
    /// Create a new port fetching from the given host, narrowed to `region`.
    #[must_use]
    pub fn new(client: Client, base_url: &str, region: &str) -> Self {
        Self {
            client,
            meta: source_meta(),
            config: SourceConfig {
                endpoint: format!("{}{ENDPOINT_PATH}", base_url.trim_end_matches('/')),
                name_key: NAME_KEY.to_owned(),
                region_filter: Some(RegionFilter {
                    key: REGION_KEY.to_owned(),
                    value: region.to_owned(),
                }),
            },
        }
    }
}

#[async_trait]
impl BoundaryPort for TurkiyeBoundaryPort {
    fn meta(&self) -> &SourceMeta {
        &self.meta
    }

    fn config(&self) -> &SourceConfig {
        &self.config
    }

    async fn resolve(&self) -> Result<BoundaryCollection, SyncError> {
        let payload = fetch_payload(self.client.get(&self.config.endpoint)).await?;
        narrowed_collection(&payload, self.config.region_filter.as_ref())
    }
}

/// Build the plugin bundle for the nationwide source.
#[must_use]
pub fn plugin(client: Client, base_url: &str, region: &str) -> SourcePlugin {
    SourcePlugin {
        meta: source_meta(),
        boundary_port: Arc::new(TurkiyeBoundaryPort::new(client, base_url, region)),
    }
}

fn source_meta() -> SourceMeta {
    SourceMeta {
        id: SourceId::from(Sources::Turkiye),
        name: String::from("Türkiye ilçeleri (bölge filtreli)"),
    }
}

fn narrowed_collection(
    payload: &str,
    filter: Option<&RegionFilter>,
) -> Result<BoundaryCollection, SyncError> {
    let geojson: GeoJson = payload
        .parse()
        .map_err(|error: geojson::Error| SyncError::SourceMalformed(error.to_string()))?;
    let mut collection = BoundaryCollection::from_geojson(geojson).map_err(|kind| {
        SyncError::SourceMalformed(format!("expected a feature collection, got {kind}"))
    })?;

    if let Some(filter) = filter {
        collection.retain_region(filter);
    }

    Ok(collection)
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

    fn nationwide_payload() -> String {
        json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": null,
                 "properties": {"ad": "Çankaya", "il_adi": "Ankara"}},
                {"type": "Feature", "geometry": null,
                 "properties": {"ad": "Kadıköy", "il_adi": "İstanbul"}},
                {"type": "Feature", "geometry": null,
                 "properties": {"ad": "Mamak", "il_adi": "Ankara"}}
            ]
        })
        .to_string()
    }

    fn ankara_filter() -> RegionFilter {
        RegionFilter {
            key: REGION_KEY.to_owned(),
            value: "Ankara".to_owned(),
        }
    }

    #[test]
    fn filter_keeps_only_target_region_in_order() {
        let collection =
            narrowed_collection(&nationwide_payload(), Some(&ankara_filter())).unwrap();

        let names: Vec<_> = collection
            .features
            .iter()
            .filter_map(|feature| feature.name(NAME_KEY))
            .collect();
        assert_eq!(names, vec!["Çankaya", "Mamak"]);
    }

    #[test]
    fn unfiltered_resolution_returns_everything() {
        let collection = narrowed_collection(&nationwide_payload(), None).unwrap();
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn malformed_payload_is_reported_as_such() {
        let error = narrowed_collection("{", Some(&ankara_filter())).unwrap_err();
        assert!(matches!(error, SyncError::SourceMalformed(_)));
    }

    #[test]
    fn config_carries_keys_and_filter() {
        let port = TurkiyeBoundaryPort::new(Client::new(), "https://example.org", "Ankara");
        assert_eq!(port.config().name_key, "ad");
        let filter = port.config().region_filter.as_ref().unwrap();
        assert_eq!(filter.key, "il_adi");
        assert_eq!(filter.value, "Ankara");
        assert_eq!(
            port.config().endpoint,
            "https://example.org/static/turkey-ilceler.geojson"
        );
    }
}
