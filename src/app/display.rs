//! Darstellungs-Features: was ein Modus pro Render-Durchlauf an den Host gibt.
//!
//! Ein `DisplayFeature` ist ein GeoJSON-nahes Objekt mit `user_`-Properties.
//! Kreise tragen hier `user_isCircle`, `user_center` und `user_radiusInKm`,
//! damit die Griff-Erzeugung sie ohne Zugriff auf den Store erkennt.

use crate::core::geojson::{insert_circle_properties, PROP_IS_CIRCLE, USER_PREFIX};
use crate::core::{
    cardinal_handles, CoordPath, Feature, FeatureId, GeoJsonGeometry, LngLat, Shape,
};
use serde_json::{Map, Value};

/// Rolle eines Darstellungs-Features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMeta {
    /// Das Feature selbst
    Feature,
    /// Vertex-Griff
    Vertex,
    /// Mittelpunkt-Griff
    Midpoint,
}

/// Aktiv-Zustand für das Styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveState {
    /// Hervorgehoben
    Active,
    /// Normal
    #[default]
    Inactive,
}

impl ActiveState {
    /// `Active` bei `true`, sonst `Inactive`.
    pub fn from_bool(active: bool) -> Self {
        if active {
            ActiveState::Active
        } else {
            ActiveState::Inactive
        }
    }
}

/// Ein an den Host übergebenes Darstellungs-Feature.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFeature {
    /// Rolle
    pub meta: DisplayMeta,
    /// Aktiv-Zustand
    pub active: ActiveState,
    /// ID des Features (nur bei `DisplayMeta::Feature`)
    pub id: Option<FeatureId>,
    /// Eltern-Feature eines Griffs
    pub parent: Option<FeatureId>,
    /// Koordinaten-Pfad eines Griffs
    pub coord_path: Option<CoordPath>,
    /// Geometrie
    pub geometry: GeoJsonGeometry,
    /// Benutzer-Properties mit `user_`-Präfix
    pub properties: Map<String, Value>,
}

impl DisplayFeature {
    /// Baut das Darstellungs-Feature eines Store-Features (inaktiv).
    pub fn from_feature(feature: &Feature) -> Self {
        let mut properties: Map<String, Value> = feature
            .properties
            .iter()
            .map(|(k, v)| (format!("{USER_PREFIX}{k}"), v.clone()))
            .collect();

        let geometry = match feature.shape() {
            Shape::Point(p) => GeoJsonGeometry::Point([p.x, p.y]),
            Shape::LineString(coords) => {
                GeoJsonGeometry::LineString(coords.iter().map(|p| [p.x, p.y]).collect())
            }
            Shape::Polygon(rings) => GeoJsonGeometry::Polygon(
                rings
                    .iter()
                    .map(|ring| ring.iter().map(|p| [p.x, p.y]).collect())
                    .collect(),
            ),
            Shape::Circle(circle) => {
                insert_circle_properties(&mut properties, circle, USER_PREFIX);
                GeoJsonGeometry::Polygon(vec![circle.ring().iter().map(|p| [p.x, p.y]).collect()])
            }
        };

        Self {
            meta: DisplayMeta::Feature,
            active: ActiveState::Inactive,
            id: Some(feature.id),
            parent: None,
            coord_path: None,
            geometry,
            properties,
        }
    }

    /// Setzt den Aktiv-Zustand.
    pub fn with_active(mut self, active: ActiveState) -> Self {
        self.active = active;
        self
    }

    /// Trägt das Feature die Kreis-Markierung?
    pub fn is_circle(&self) -> bool {
        self.properties
            .get(&format!("{USER_PREFIX}{PROP_IS_CIRCLE}"))
            .and_then(Value::as_bool)
            == Some(true)
    }

    /// Ist die Geometrie ein Punkt?
    pub fn is_point(&self) -> bool {
        matches!(self.geometry, GeoJsonGeometry::Point(_))
    }

    /// Position eines Punkt-Features.
    pub fn position(&self) -> Option<LngLat> {
        match self.geometry {
            GeoJsonGeometry::Point([lng, lat]) => Some(LngLat::new(lng, lat)),
            _ => None,
        }
    }
}

/// Optionen der generischen Griff-Erzeugung.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplementaryOptions {
    /// Mittelpunkt-Griffe erzeugen
    pub midpoints: bool,
    /// Selektierte Vertices (werden aktiv markiert)
    pub selected_paths: Vec<CoordPath>,
}

/// Erzeugt einen Vertex-Griff.
pub fn create_vertex(
    parent: FeatureId,
    position: [f64; 2],
    coord_path: CoordPath,
    selected: bool,
) -> DisplayFeature {
    DisplayFeature {
        meta: DisplayMeta::Vertex,
        active: ActiveState::from_bool(selected),
        id: None,
        parent: Some(parent),
        coord_path: Some(coord_path),
        geometry: GeoJsonGeometry::Point(position),
        properties: Map::new(),
    }
}

fn create_midpoint(
    parent: FeatureId,
    a: [f64; 2],
    b: [f64; 2],
    coord_path: CoordPath,
) -> DisplayFeature {
    DisplayFeature {
        meta: DisplayMeta::Midpoint,
        active: ActiveState::Inactive,
        id: None,
        parent: Some(parent),
        coord_path: Some(coord_path),
        geometry: GeoJsonGeometry::Point([(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0]),
        properties: Map::new(),
    }
}

/// Generische Griffe: alle Vertices, optional mit Mittelpunkten dazwischen.
///
/// Reihenfolge pro Ring: `v0, m01, v1, m12, …`, bei Polygonen zusätzlich der
/// Mittelpunkt zwischen letztem und erstem Vertex. Schließende Punkte werden
/// übersprungen. Punkte liefern keine Griffe.
pub fn create_supplementary_points(
    feature: &DisplayFeature,
    options: &SupplementaryOptions,
) -> Vec<DisplayFeature> {
    let Some(parent) = feature.id else {
        return Vec::new();
    };

    let mut points = Vec::new();
    let mut process_ring = |ring_index: usize, coords: &[[f64; 2]], closed: bool| {
        let vertices = if closed && coords.len() > 1 && coords.first() == coords.last() {
            &coords[..coords.len() - 1]
        } else {
            coords
        };

        let mut last: Option<[f64; 2]> = None;
        for (i, &coord) in vertices.iter().enumerate() {
            let path = CoordPath::new(ring_index, i);
            if options.midpoints {
                if let Some(prev) = last {
                    points.push(create_midpoint(parent, prev, coord, path));
                }
            }
            let selected = options.selected_paths.contains(&path);
            points.push(create_vertex(parent, coord, path, selected));
            last = Some(coord);
        }

        if closed && options.midpoints && vertices.len() > 2 {
            if let (Some(&first), Some(prev)) = (vertices.first(), last) {
                let path = CoordPath::new(ring_index, vertices.len());
                points.push(create_midpoint(parent, prev, first, path));
            }
        }
    };

    match &feature.geometry {
        GeoJsonGeometry::Point(_) => {}
        GeoJsonGeometry::LineString(coords) => process_ring(0, coords.as_slice(), false),
        GeoJsonGeometry::Polygon(rings) => {
            for (ring_index, ring) in rings.iter().enumerate() {
                process_ring(ring_index, ring.as_slice(), true);
            }
        }
    }
    points
}

/// Griffe eines Kreises: nur die vier Kardinal-Handles in Ring-Reihenfolge.
///
/// Liefert `None`, wenn das Feature nicht als Kreis markiert ist.
pub fn create_supplementary_points_for_circle(
    feature: &DisplayFeature,
) -> Option<Vec<DisplayFeature>> {
    if !feature.is_circle() {
        return None;
    }
    let parent = feature.id?;
    let ring: Vec<LngLat> = match &feature.geometry {
        GeoJsonGeometry::Polygon(rings) => rings
            .first()
            .map(|ring| ring.iter().map(|p| LngLat::new(p[0], p[1])).collect())
            .unwrap_or_default(),
        _ => {
            log::warn!("Kreis {parent} ohne Polygon-Geometrie, keine Griffe");
            return Some(Vec::new());
        }
    };

    Some(
        cardinal_handles(&ring)
            .into_iter()
            .map(|handle| {
                create_vertex(
                    parent,
                    [handle.position.x, handle.position.y],
                    CoordPath::new(0, handle.index),
                    false,
                )
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{lng_lat, CircleShape};

    fn triangle() -> Feature {
        Feature::new(
            3,
            Shape::Polygon(vec![vec![
                lng_lat(0.0, 0.0),
                lng_lat(2.0, 0.0),
                lng_lat(0.0, 2.0),
                lng_lat(0.0, 0.0),
            ]]),
        )
    }

    #[test]
    fn circle_display_carries_user_tag() {
        let feature = Feature::new(1, Shape::Circle(CircleShape::new(lng_lat(0.0, 0.0), 5.0, 64)));
        let display = DisplayFeature::from_feature(&feature);
        assert!(display.is_circle());
        assert_eq!(display.properties.get("user_radiusInKm"), Some(&serde_json::json!(5.0)));
        assert!(!display.properties.contains_key("isCircle"));
    }

    #[test]
    fn user_properties_are_prefixed() {
        let mut feature = triangle();
        feature.properties.insert("name".into(), Value::String("Acker".into()));
        let display = DisplayFeature::from_feature(&feature);
        assert_eq!(display.properties.get("user_name"), Some(&Value::String("Acker".into())));
        assert!(!display.is_circle());
    }

    #[test]
    fn polygon_vertices_and_midpoints_in_ring_order() {
        let display = DisplayFeature::from_feature(&triangle());
        let options = SupplementaryOptions {
            midpoints: true,
            selected_paths: vec![CoordPath::new(0, 1)],
        };
        let points = create_supplementary_points(&display, &options);
        let metas: Vec<DisplayMeta> = points.iter().map(|p| p.meta).collect();
        assert_eq!(
            metas,
            vec![
                DisplayMeta::Vertex,
                DisplayMeta::Midpoint,
                DisplayMeta::Vertex,
                DisplayMeta::Midpoint,
                DisplayMeta::Vertex,
                DisplayMeta::Midpoint,
            ]
        );
        assert_eq!(points[1].position(), Some(lng_lat(1.0, 0.0)));
        assert_eq!(points[2].active, ActiveState::Active);
        assert_eq!(points[0].active, ActiveState::Inactive);
        assert_eq!(points[5].coord_path, Some(CoordPath::new(0, 3)));
    }

    #[test]
    fn without_midpoints_only_vertices() {
        let display = DisplayFeature::from_feature(&triangle());
        let points = create_supplementary_points(&display, &SupplementaryOptions::default());
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.meta == DisplayMeta::Vertex && p.parent == Some(3)));
    }

    #[test]
    fn circle_gets_four_handles() {
        let feature = Feature::new(9, Shape::Circle(CircleShape::new(lng_lat(1.0, 1.0), 3.0, 64)));
        let display = DisplayFeature::from_feature(&feature);
        let handles = create_supplementary_points_for_circle(&display).expect("Kreis erwartet");
        let paths: Vec<CoordPath> = handles.iter().filter_map(|h| h.coord_path).collect();
        assert_eq!(
            paths,
            vec![
                CoordPath::new(0, 0),
                CoordPath::new(0, 16),
                CoordPath::new(0, 32),
                CoordPath::new(0, 48)
            ]
        );
        assert!(handles.iter().all(|h| h.parent == Some(9)));
    }

    #[test]
    fn non_circle_yields_none() {
        let display = DisplayFeature::from_feature(&triangle());
        assert!(create_supplementary_points_for_circle(&display).is_none());
    }
}
