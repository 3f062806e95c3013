//! Domain data structures for boundary sources, features, and rendered layers.

use std::collections::HashMap;
use std::fmt;

use geojson::{GeoJson, JsonObject};
use serde::{Deserialize, Serialize};

/// Fill color used when a district has no attribute entry.
pub const DEFAULT_FILL_COLOR: &str = "#999999";

/// Built-in boundary sources supported by the application.
pub enum Sources {
    /// Region-scoped source serving only Ankara districts.
    Ankara,
    /// Nationwide source covering all of Türkiye, narrowed by a region filter.
    Turkiye,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a boundary source known to harita.
pub struct SourceId(pub String);

impl fmt::Display for Sources {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Sources::Ankara => "ankara",
            Sources::Turkiye => "turkiye",
        };
        write!(formatter, "{slug}")
    }
}

impl From<Sources> for SourceId {
    fn from(source: Sources) -> Self {
        SourceId(source.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a boundary source and its human-friendly name.
pub struct SourceMeta {
    /// Unique identifier.
    pub id: SourceId,
    /// Localized display name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Narrows a nationwide collection to one enclosing region.
///
/// Matching is exact and case-sensitive on the configured property.
pub struct RegionFilter {
    /// Property key holding the enclosing region's name.
    pub key: String,
    /// Region name a feature must carry to be retained.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Per-source configuration resolved once at plugin-construction time.
///
/// Different sources store the same concepts under different property
/// keys, so the keys are data here rather than constants scattered
/// through the rendering path.
pub struct SourceConfig {
    /// Location the boundary payload is fetched from.
    pub endpoint: String,
    /// Property key holding a district's display name.
    pub name_key: String,
    /// Optional narrowing applied after the payload is parsed.
    pub region_filter: Option<RegionFilter>,
}

#[derive(Debug, Clone, PartialEq)]
/// One administrative district's geometry plus its property bag.
pub struct BoundaryFeature {
    /// Geometry of the district, if the source provided one.
    pub geometry: Option<geojson::Geometry>,
    /// Named properties as delivered by the source.
    pub properties: JsonObject,
}

impl BoundaryFeature {
    /// Read a string property, if present and actually a string.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|value| value.as_str())
    }

    /// District display name under the source's configured key.
    #[must_use]
    pub fn name(&self, name_key: &str) -> Option<&str> {
        self.property(name_key)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Ordered sequence of boundary features from a single resolution.
pub struct BoundaryCollection {
    /// Features in source order.
    pub features: Vec<BoundaryFeature>,
}

impl BoundaryCollection {
    /// Build a collection from a parsed `GeoJson` document.
    ///
    /// # Errors
    ///
    /// Returns a description of the payload's top-level type when the
    /// document is not a feature collection, for use in a
    /// malformed-payload error.
    pub fn from_geojson(geojson: GeoJson) -> Result<Self, &'static str> {
        let collection = match geojson {
            GeoJson::FeatureCollection(collection) => collection,
            GeoJson::Geometry(_) => return Err("bare geometry"),
            GeoJson::Feature(_) => return Err("single feature"),
        };

        let features = collection
            .features
            .into_iter()
            .map(|feature| BoundaryFeature {
                geometry: feature.geometry,
                properties: feature.properties.unwrap_or_default(),
            })
            .collect();

        Ok(Self { features })
    }

    /// Keep only features whose region property equals the filter value.
    pub fn retain_region(&mut self, filter: &RegionFilter) {
        self.features
            .retain(|feature| feature.property(&filter.key) == Some(filter.value.as_str()));
    }

    /// Number of features in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Mapping from district name to fill color, replaced wholesale on fetch.
///
/// Names are compared exactly as delivered by the backend; no
/// normalization is applied on either side of the lookup.
pub struct AttributeMap {
    colors: HashMap<String, String>,
}

impl AttributeMap {
    /// Wrap a name-to-color mapping.
    #[must_use]
    pub fn new(colors: HashMap<String, String>) -> Self {
        Self { colors }
    }

    /// Color for a district, falling back to [`DEFAULT_FILL_COLOR`].
    ///
    /// Lookup never fails; an absent name simply renders as "no data".
    #[must_use]
    pub fn color_for(&self, name: &str) -> &str {
        self.colors
            .get(name)
            .map_or(DEFAULT_FILL_COLOR, String::as_str)
    }

    /// Whether any district has an attribute entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Fixed stroke and opacity configuration applied to every feature.
///
/// Styling is pure given the fill color; nothing here derives from data.
pub struct LayerStyle {
    /// Stroke color drawn around each district.
    pub stroke_color: &'static str,
    /// Stroke width in display units.
    pub stroke_weight: f32,
    /// Dash pattern for the stroke.
    pub dash_pattern: &'static str,
    /// Opacity of the fill, 0.0 through 1.0.
    pub fill_opacity: f32,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            stroke_color: "white",
            stroke_weight: 2.0,
            dash_pattern: "3",
            fill_opacity: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One feature of a rendered layer, ready for display.
pub struct StyledFeature {
    /// Resolved district name, surfaced when the feature is activated.
    pub name: Option<String>,
    /// Fill color looked up from the attribute map.
    pub fill_color: String,
    /// Geometry carried through from the boundary feature.
    pub geometry: Option<geojson::Geometry>,
}

#[derive(Debug, Clone, PartialEq)]
/// The visual overlay produced by one render pass.
///
/// At most one rendered layer is installed on the map surface at any
/// time; a new layer replaces the previous one in a single swap.
pub struct RenderedLayer {
    /// Styled features in collection order.
    pub features: Vec<StyledFeature>,
    /// Stroke and opacity configuration shared by all features.
    pub style: LayerStyle,
}

#[derive(Debug, Clone, PartialEq)]
/// Backend acknowledgement of a successful measurement upload.
pub struct UploadReceipt {
    /// District the measurements were recorded for.
    pub district: String,
    /// Average computed by the backend over the uploaded column.
    pub average: f64,
    /// Color the district will take on the next render.
    pub color: String,
}
