//! Derives the operator-facing district list from a resolved collection.

use crate::model::BoundaryCollection;

/// Ordered district names for the upload form's target selector.
///
/// Collection order is preserved and duplicates are kept; if a source
/// lists a district twice, the operator sees it twice. Features missing
/// the name key contribute nothing, since there is no name to offer.
#[must_use]
pub fn district_names(collection: &BoundaryCollection, name_key: &str) -> Vec<String> {
    collection
        .features
        .iter()
        .filter_map(|feature| feature.name(name_key))
        .map(str::to_owned)
        .collect()
}
