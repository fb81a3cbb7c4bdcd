//! GeoJSON-Import/-Export des Feature-Modells.
//!
//! Kreise werden als `Polygon` geschrieben und tragen `isCircle`, `center` und
//! `radiusInKm` als Properties. Beim Import wird der Ring aus Mittelpunkt und
//! Radius neu erzeugt, ein gespeicherter Ring dient nur der Darstellung in
//! fremden Werkzeugen.

use super::feature::{CircleShape, Feature, FeatureId, Shape};
use super::geo::{lng_lat, LngLat, DEFAULT_CIRCLE_STEPS};
use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property-Schlüssel der Kreis-Markierung.
pub const PROP_IS_CIRCLE: &str = "isCircle";
/// Property-Schlüssel des Kreis-Mittelpunkts.
pub const PROP_CENTER: &str = "center";
/// Property-Schlüssel des Kreis-Radius.
pub const PROP_RADIUS_IN_KM: &str = "radiusInKm";
/// Präfix, unter dem der Host Benutzer-Properties bei der Darstellung durchreicht.
pub const USER_PREFIX: &str = "user_";

/// GeoJSON-Geometrie (Teilmenge: Point, LineString, Polygon).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum GeoJsonGeometry {
    /// `[lng, lat]`
    Point([f64; 2]),
    /// Liste von `[lng, lat]`
    LineString(Vec<[f64; 2]>),
    /// Ringe aus `[lng, lat]`
    Polygon(Vec<Vec<[f64; 2]>>),
}

/// GeoJSON-Feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    /// Immer `"Feature"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Feature-ID (optional beim Import)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    /// Properties inkl. Kreis-Metadaten
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Geometrie
    pub geometry: GeoJsonGeometry,
}

/// GeoJSON-FeatureCollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeatureCollection {
    /// Immer `"FeatureCollection"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Enthaltene Features
    pub features: Vec<GeoJsonFeature>,
}

fn to_pair(p: LngLat) -> [f64; 2] {
    [p.x, p.y]
}

fn from_pair(p: [f64; 2]) -> LngLat {
    lng_lat(p[0], p[1])
}

/// Wandelt ein Feature in GeoJSON um.
pub fn feature_to_geojson(feature: &Feature) -> GeoJsonFeature {
    let mut properties = feature.properties.clone();
    let geometry = match feature.shape() {
        Shape::Point(p) => GeoJsonGeometry::Point(to_pair(*p)),
        Shape::LineString(coords) => {
            GeoJsonGeometry::LineString(coords.iter().copied().map(to_pair).collect())
        }
        Shape::Polygon(rings) => GeoJsonGeometry::Polygon(
            rings
                .iter()
                .map(|ring| ring.iter().copied().map(to_pair).collect())
                .collect(),
        ),
        Shape::Circle(circle) => {
            insert_circle_properties(&mut properties, circle, "");
            GeoJsonGeometry::Polygon(vec![circle.ring().iter().copied().map(to_pair).collect()])
        }
    };

    GeoJsonFeature {
        kind: "Feature".to_string(),
        id: Some(feature.id),
        properties,
        geometry,
    }
}

/// Schreibt die Kreis-Metadaten mit optionalem Präfix in eine Property-Map.
pub(crate) fn insert_circle_properties(
    properties: &mut Map<String, Value>,
    circle: &CircleShape,
    prefix: &str,
) {
    properties.insert(format!("{prefix}{PROP_IS_CIRCLE}"), Value::Bool(true));
    let center = match circle.center() {
        Some(c) => serde_json::json!([c.x, c.y]),
        None => serde_json::json!([]),
    };
    properties.insert(format!("{prefix}{PROP_CENTER}"), center);
    properties.insert(
        format!("{prefix}{PROP_RADIUS_IN_KM}"),
        serde_json::json!(circle.radius_km()),
    );
}

/// Liest die Kreis-Markierung mit oder ohne `user_`-Präfix.
fn is_circle_tagged(properties: &Map<String, Value>) -> bool {
    [PROP_IS_CIRCLE.to_string(), format!("{USER_PREFIX}{PROP_IS_CIRCLE}")]
        .iter()
        .any(|key| properties.get(key).and_then(Value::as_bool) == Some(true))
}

fn take_prop(properties: &mut Map<String, Value>, key: &str) -> Option<Value> {
    let plain = properties.remove(key);
    let prefixed = properties.remove(&format!("{USER_PREFIX}{key}"));
    plain.or(prefixed)
}

/// Baut ein Feature aus GeoJSON. `fallback_id` wird ohne eigene ID verwendet.
pub fn feature_from_geojson(
    geojson: GeoJsonFeature,
    fallback_id: FeatureId,
) -> anyhow::Result<Feature> {
    if geojson.kind != "Feature" {
        bail!("Unerwarteter GeoJSON-Typ '{}', erwartet 'Feature'", geojson.kind);
    }
    let id = geojson.id.unwrap_or(fallback_id);
    let mut properties = geojson.properties;

    let shape = if is_circle_tagged(&properties) {
        take_prop(&mut properties, PROP_IS_CIRCLE);
        let center = take_prop(&mut properties, PROP_CENTER)
            .ok_or_else(|| anyhow!("Kreis {id}: Property '{PROP_CENTER}' fehlt"))?;
        let center: [f64; 2] = serde_json::from_value(center)
            .with_context(|| format!("Kreis {id}: '{PROP_CENTER}' ist kein [lng, lat]"))?;
        let radius = take_prop(&mut properties, PROP_RADIUS_IN_KM)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| anyhow!("Kreis {id}: Property '{PROP_RADIUS_IN_KM}' fehlt"))?;
        if radius < 0.0 || !radius.is_finite() {
            bail!("Kreis {id}: ungültiger Radius {radius}");
        }
        // Gespeicherter Ring wird verworfen
        Shape::Circle(CircleShape::new(from_pair(center), radius, DEFAULT_CIRCLE_STEPS))
    } else {
        match geojson.geometry {
            GeoJsonGeometry::Point(p) => Shape::Point(from_pair(p)),
            GeoJsonGeometry::LineString(coords) => {
                Shape::LineString(coords.into_iter().map(from_pair).collect())
            }
            GeoJsonGeometry::Polygon(rings) => Shape::Polygon(
                rings
                    .into_iter()
                    .map(|ring| ring.into_iter().map(from_pair).collect())
                    .collect(),
            ),
        }
    };

    let mut feature = Feature::new(id, shape);
    feature.properties = properties;
    Ok(feature)
}

/// Serialisiert Features als FeatureCollection-JSON.
pub fn write_feature_collection<'a>(
    features: impl IntoIterator<Item = &'a Feature>,
) -> anyhow::Result<String> {
    let collection = GeoJsonFeatureCollection {
        kind: "FeatureCollection".to_string(),
        features: features.into_iter().map(feature_to_geojson).collect(),
    };
    serde_json::to_string_pretty(&collection).context("FeatureCollection-Export fehlgeschlagen")
}

/// Liest eine FeatureCollection. IDs ohne Angabe werden ab `first_free_id` vergeben.
pub fn parse_feature_collection(
    json: &str,
    first_free_id: FeatureId,
) -> anyhow::Result<Vec<Feature>> {
    let collection: GeoJsonFeatureCollection =
        serde_json::from_str(json).context("FeatureCollection-JSON fehlerhaft")?;
    if collection.kind != "FeatureCollection" {
        bail!("Unerwarteter GeoJSON-Typ '{}', erwartet 'FeatureCollection'", collection.kind);
    }

    let mut next_id = Some(first_free_id);
    collection
        .features
        .into_iter()
        .map(|geojson| {
            let fallback = match (geojson.id, next_id) {
                (Some(id), _) => id,
                (None, Some(id)) => id,
                (None, None) => bail!("Keine freie Feature-ID mehr für Import"),
            };
            next_id = next_id.and_then(|id| id.checked_add(1));
            feature_from_geojson(geojson, fallback)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circle_exports_metadata_as_polygon() {
        let feature = Feature::new(7, Shape::Circle(CircleShape::new(lng_lat(1.0, 2.0), 3.5, 64)));
        let geojson = feature_to_geojson(&feature);

        assert_eq!(geojson.id, Some(7));
        assert_eq!(geojson.properties.get(PROP_IS_CIRCLE), Some(&Value::Bool(true)));
        assert_eq!(geojson.properties.get(PROP_CENTER), Some(&serde_json::json!([1.0, 2.0])));
        assert_eq!(geojson.properties.get(PROP_RADIUS_IN_KM), Some(&serde_json::json!(3.5)));
        match geojson.geometry {
            GeoJsonGeometry::Polygon(rings) => assert_eq!(rings[0].len(), 65),
            other => panic!("Polygon erwartet, erhalten: {other:?}"),
        }
    }

    #[test]
    fn circle_import_accepts_user_prefixed_tag() {
        let json = serde_json::json!({
            "type": "Feature",
            "properties": {
                "user_isCircle": true,
                "user_center": [10.0, 50.0],
                "user_radiusInKm": 2.0,
                "name": "Weide"
            },
            "geometry": { "type": "Polygon", "coordinates": [[]] }
        });
        let geojson: GeoJsonFeature = serde_json::from_value(json).expect("gültiges GeoJSON");
        let feature = feature_from_geojson(geojson, 99).expect("Import erwartet");

        assert_eq!(feature.id, 99);
        let circle = feature.circle().expect("Kreis erwartet");
        assert_eq!(circle.center(), Some(lng_lat(10.0, 50.0)));
        assert_relative_eq!(circle.radius_km(), 2.0);
        assert_eq!(circle.ring().len(), DEFAULT_CIRCLE_STEPS + 1);
        assert_eq!(feature.properties.get("name"), Some(&Value::String("Weide".into())));
        assert!(!feature.properties.contains_key("user_isCircle"));
    }

    #[test]
    fn circle_import_without_center_fails() {
        let json = serde_json::json!({
            "type": "Feature",
            "properties": { "isCircle": true, "radiusInKm": 2.0 },
            "geometry": { "type": "Polygon", "coordinates": [] }
        });
        let geojson: GeoJsonFeature = serde_json::from_value(json).expect("gültiges GeoJSON");
        assert!(feature_from_geojson(geojson, 1).is_err());
    }

    #[test]
    fn plain_polygon_stays_polygon() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] }
            }]
        }"#;
        let features = parse_feature_collection(json, 5).expect("Import erwartet");
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].id, 5);
        assert!(!features[0].is_circle());
        assert!(features[0].is_valid());
    }

    #[test]
    fn wrong_collection_type_is_rejected() {
        let json = r#"{ "type": "Feature", "features": [] }"#;
        assert!(parse_feature_collection(json, 1).is_err());
    }
}
