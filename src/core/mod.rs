//! Core-Domänentypen: Geodäsie, Feature-Modell, Kardinal-Handles, GeoJSON.

pub mod feature;
/// Geodätische Hilfsfunktionen
///
/// - `distance_km`: Großkreis-Distanz (Haversine)
/// - `destination`: Zielpunkt nach Distanz und Peilung
/// - `circle_ring`: geschlossener Polygon-Ring eines Kreises
pub mod geo;
pub mod geojson;
pub mod handles;

pub use feature::{CircleShape, CoordPath, Feature, FeatureId, Shape, ShapeKind};
pub use geo::{
    circle_ring, destination, distance_km, lng_lat, LngLat, DEFAULT_CIRCLE_STEPS, EARTH_RADIUS_KM,
};
pub use geojson::{
    feature_from_geojson, feature_to_geojson, parse_feature_collection, write_feature_collection,
    GeoJsonFeature, GeoJsonFeatureCollection, GeoJsonGeometry,
};
pub use handles::{cardinal_handles, CardinalHandle};
