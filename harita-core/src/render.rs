//! Turns a boundary collection plus attributes into a rendered layer.

use crate::model::{
    AttributeMap, BoundaryCollection, LayerStyle, RenderedLayer, StyledFeature, DEFAULT_FILL_COLOR,
};

/// Build the overlay for a resolved collection.
///
/// Each feature's fill color comes from the attribute map keyed by the
/// feature's name under `name_key`; features missing that key fall back
/// to the default color instead of failing, so one bad feature never
/// takes down the whole layer. The result is fully built before any
/// swap onto a surface, which is what keeps the swap atomic.
#[must_use]
pub fn render(
    collection: &BoundaryCollection,
    attributes: &AttributeMap,
    name_key: &str,
) -> RenderedLayer {
    let features = collection
        .features
        .iter()
        .map(|feature| {
            let name = feature.name(name_key);
            let fill_color = name.map_or(DEFAULT_FILL_COLOR, |district| attributes.color_for(district));

            StyledFeature {
                name: name.map(str::to_owned),
                fill_color: fill_color.to_owned(),
                geometry: feature.geometry.clone(),
            }
        })
        .collect();

    RenderedLayer {
        features,
        style: LayerStyle::default(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::model::BoundaryFeature;

    fn collection(properties: Vec<serde_json::Value>) -> BoundaryCollection {
        let features = properties
            .into_iter()
            .map(|bag| {
                let serde_json::Value::Object(bag) = bag else {
                    panic!("fixture properties must be objects");
                };
                BoundaryFeature {
                    geometry: None,
                    properties: bag,
                }
            })
            .collect();
        BoundaryCollection { features }
    }

    #[test]
    fn fill_color_comes_from_attribute_map() {
        let attributes = AttributeMap::new(HashMap::from([(
            "Çankaya".to_owned(),
            "#ff0000".to_owned(),
        )]));
        let layer = render(&collection(vec![json!({"ilce": "Çankaya"})]), &attributes, "ilce");

        assert_eq!(layer.features[0].fill_color, "#ff0000");
        assert_eq!(layer.features[0].name.as_deref(), Some("Çankaya"));
    }

    #[test]
    fn unknown_district_gets_default_color() {
        let layer = render(
            &collection(vec![json!({"ilce": "Keçiören"})]),
            &AttributeMap::default(),
            "ilce",
        );

        assert_eq!(layer.features[0].fill_color, DEFAULT_FILL_COLOR);
    }

    #[test]
    fn feature_missing_name_key_renders_with_default_color() {
        let attributes = AttributeMap::new(HashMap::from([(
            "Çankaya".to_owned(),
            "#ff0000".to_owned(),
        )]));
        let layer = render(&collection(vec![json!({"baska_anahtar": 3})]), &attributes, "ilce");

        assert_eq!(layer.features[0].fill_color, DEFAULT_FILL_COLOR);
        assert_eq!(layer.features[0].name, None);
    }

    #[test]
    fn layer_preserves_collection_order_and_fixed_style() {
        let layer = render(
            &collection(vec![json!({"ilce": "Mamak"}), json!({"ilce": "Sincan"})]),
            &AttributeMap::default(),
            "ilce",
        );

        let names: Vec<_> = layer
            .features
            .iter()
            .map(|feature| feature.name.as_deref())
            .collect();
        assert_eq!(names, vec![Some("Mamak"), Some("Sincan")]);
        assert_eq!(layer.style, LayerStyle::default());
    }
}
