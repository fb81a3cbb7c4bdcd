//! Feature-Modell: Punkte, Linien, Polygone und Kreise als geschlossener Summentyp.
//!
//! Ein Kreis ist für den Host ein Polygon, trägt hier aber Mittelpunkt und
//! Radius als eigene Felder. Der Ring wird bei jeder Mutation vollständig aus
//! `(center, radius_km)` neu erzeugt und ist daher nie veraltet.

use super::geo::{circle_ring, translate_points, LngLat, DEFAULT_CIRCLE_STEPS};
use glam::DVec2;
use serde_json::{Map, Value};
use std::fmt;

/// Eindeutige Feature-ID innerhalb eines Stores.
pub type FeatureId = u64;

/// Pfad zu einer Koordinate innerhalb eines Features (`ring.index`).
///
/// Linien und Punkte verwenden immer Ring 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordPath {
    /// Ring-Index (Polygon) bzw. 0 bei Linien/Punkten
    pub ring: usize,
    /// Vertex-Index innerhalb des Rings
    pub index: usize,
}

impl CoordPath {
    /// Erstellt einen Koordinaten-Pfad.
    pub fn new(ring: usize, index: usize) -> Self {
        Self { ring, index }
    }
}

impl fmt::Display for CoordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.ring, self.index)
    }
}

/// Geometrie-Art eines Features (ohne Koordinaten).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Einzelner Punkt
    Point,
    /// Offene Linie
    LineString,
    /// Polygon mit einem oder mehreren Ringen
    Polygon,
    /// Kreis (für den Host ein Polygon)
    Circle,
}

/// Kreis-Geometrie mit Mittelpunkt, Radius und abgeleitetem Ring.
///
/// Die Felder sind privat: Mittelpunkt und Radius lassen sich nur über
/// `set_center`/`set_radius_km` ändern, beide erzeugen den Ring neu.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    center: Option<LngLat>,
    radius_km: f64,
    steps: usize,
    ring: Vec<LngLat>,
}

impl CircleShape {
    /// Erstellt einen leeren Kreis (kein Mittelpunkt, Radius 0).
    pub fn empty(steps: usize) -> Self {
        Self {
            center: None,
            radius_km: 0.0,
            steps,
            ring: Vec::new(),
        }
    }

    /// Erstellt einen vollständigen Kreis.
    pub fn new(center: LngLat, radius_km: f64, steps: usize) -> Self {
        let mut circle = Self::empty(steps);
        circle.center = Some(center);
        circle.radius_km = radius_km.max(0.0);
        circle.regenerate();
        circle
    }

    /// Mittelpunkt (None solange nicht gesetzt oder nach Abbruch).
    pub fn center(&self) -> Option<LngLat> {
        self.center
    }

    /// Radius in Kilometern (0 = noch nicht dimensioniert).
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Anzahl der Ring-Vertices (ohne schließenden Punkt).
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Aktueller geschlossener Ring.
    pub fn ring(&self) -> &[LngLat] {
        &self.ring
    }

    /// Setzt den Mittelpunkt und erzeugt den Ring neu.
    pub fn set_center(&mut self, center: LngLat) {
        self.center = Some(center);
        self.regenerate();
    }

    /// Setzt den Radius und erzeugt den Ring neu.
    pub fn set_radius_km(&mut self, radius_km: f64) {
        self.radius_km = radius_km.max(0.0);
        self.regenerate();
    }

    /// Verwirft Mittelpunkt, Radius und Ring (Abbruch der Erzeugung).
    pub fn clear(&mut self) {
        self.center = None;
        self.radius_km = 0.0;
        self.ring.clear();
    }

    /// Ein Kreis ist gültig, sobald Mittelpunkt und positiver Radius gesetzt sind.
    pub fn is_sized(&self) -> bool {
        self.center.is_some() && self.radius_km > 0.0
    }

    /// Verschiebt nur die Ring-Vertices, der Mittelpunkt bleibt stehen.
    ///
    /// Entspricht der generischen Vertex-Verschiebung des Hosts. Kreis-bewusste
    /// Modi ziehen den Mittelpunkt anschließend per `set_center` nach.
    pub(crate) fn translate_ring(&mut self, delta: DVec2) {
        translate_points(&mut self.ring, delta);
    }

    fn regenerate(&mut self) {
        self.ring = match self.center {
            Some(center) => circle_ring(center, self.radius_km, self.steps),
            None => Vec::new(),
        };
    }
}

/// Geometrie eines Features.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Einzelner Punkt
    Point(LngLat),
    /// Offene Linie
    LineString(Vec<LngLat>),
    /// Polygon-Ringe (jeweils geschlossen)
    Polygon(Vec<Vec<LngLat>>),
    /// Kreis mit Mittelpunkt/Radius und abgeleitetem Ring
    Circle(CircleShape),
}

impl Shape {
    /// Geometrie-Art ohne Koordinaten.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Point(_) => ShapeKind::Point,
            Shape::LineString(_) => ShapeKind::LineString,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Circle(_) => ShapeKind::Circle,
        }
    }
}

/// Ein Feature im Store: ID, Geometrie und benutzerdefinierte Properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Eindeutige ID
    pub id: FeatureId,
    shape: Shape,
    /// Benutzer-Properties (werden beim Export unverändert übernommen)
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Erstellt ein Feature mit leerer Property-Map.
    pub fn new(id: FeatureId, shape: Shape) -> Self {
        Self {
            id,
            shape,
            properties: Map::new(),
        }
    }

    /// Erstellt einen leeren Kreis mit Standard-Auflösung.
    pub fn empty_circle(id: FeatureId) -> Self {
        Self::new(id, Shape::Circle(CircleShape::empty(DEFAULT_CIRCLE_STEPS)))
    }

    /// Geometrie (read-only).
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Geometrie-Art.
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Ist das Feature ein Kreis?
    pub fn is_circle(&self) -> bool {
        matches!(self.shape, Shape::Circle(_))
    }

    /// Kreis-Geometrie, falls das Feature ein Kreis ist.
    pub fn circle(&self) -> Option<&CircleShape> {
        match &self.shape {
            Shape::Circle(circle) => Some(circle),
            _ => None,
        }
    }

    /// Mutable Kreis-Geometrie, falls das Feature ein Kreis ist.
    pub fn circle_mut(&mut self) -> Option<&mut CircleShape> {
        match &mut self.shape {
            Shape::Circle(circle) => Some(circle),
            _ => None,
        }
    }

    /// Ersetzt die Koordinaten eines Nicht-Kreis-Features.
    ///
    /// Kreise lehnen ab (`false`), ihr Ring entsteht nur aus Mittelpunkt und Radius.
    pub fn incoming_coords(&mut self, shape: Shape) -> bool {
        if self.is_circle() || shape.kind() == ShapeKind::Circle {
            log::debug!("Feature {}: Kreis-Koordinaten nur über Mittelpunkt/Radius", self.id);
            return false;
        }
        self.shape = shape;
        true
    }

    /// Ist die Geometrie darstellbar/gültig?
    pub fn is_valid(&self) -> bool {
        match &self.shape {
            Shape::Point(_) => true,
            Shape::LineString(coords) => coords.len() >= 2,
            Shape::Polygon(rings) => !rings.is_empty() && rings.iter().all(|r| r.len() >= 4),
            Shape::Circle(circle) => circle.is_sized(),
        }
    }

    /// Alle Ringe in Polygon-Form (Kreis: ein Ring).
    pub fn rings(&self) -> Vec<&[LngLat]> {
        match &self.shape {
            Shape::Point(_) | Shape::LineString(_) => Vec::new(),
            Shape::Polygon(rings) => rings.iter().map(Vec::as_slice).collect(),
            Shape::Circle(circle) => vec![circle.ring()],
        }
    }

    /// Alle Koordinaten flach (für Bounds/Constraint-Berechnung).
    pub fn coordinates(&self) -> Vec<LngLat> {
        match &self.shape {
            Shape::Point(p) => vec![*p],
            Shape::LineString(coords) => coords.clone(),
            Shape::Polygon(rings) => rings.iter().flatten().copied().collect(),
            Shape::Circle(circle) => circle.ring().to_vec(),
        }
    }

    /// Koordinate an einem Pfad.
    pub fn coordinate(&self, path: CoordPath) -> Option<LngLat> {
        match &self.shape {
            Shape::Point(p) => (path.index == 0).then_some(*p),
            Shape::LineString(coords) => coords.get(path.index).copied(),
            Shape::Polygon(rings) => rings.get(path.ring)?.get(path.index).copied(),
            Shape::Circle(circle) => circle.ring().get(path.index).copied(),
        }
    }

    /// Setzt eine einzelne Koordinate (generische Vertex-Bearbeitung).
    ///
    /// Bei Polygonen wird der schließende Punkt mitgeführt. Kreise sind über
    /// diesen Pfad nicht editierbar und liefern `false`.
    pub fn update_coordinate(&mut self, path: CoordPath, position: LngLat) -> bool {
        match &mut self.shape {
            Shape::Point(p) => {
                if path.index != 0 {
                    return false;
                }
                *p = position;
                true
            }
            Shape::LineString(coords) => match coords.get_mut(path.index) {
                Some(c) => {
                    *c = position;
                    true
                }
                None => false,
            },
            Shape::Polygon(rings) => {
                let Some(ring) = rings.get_mut(path.ring) else {
                    return false;
                };
                let last = ring.len().saturating_sub(1);
                if path.index >= last {
                    return false;
                }
                ring[path.index] = position;
                if path.index == 0 {
                    ring[last] = position;
                }
                true
            }
            Shape::Circle(_) => {
                log::debug!(
                    "Feature {}: Vertex {} eines Kreises nicht einzeln editierbar",
                    self.id,
                    path
                );
                false
            }
        }
    }

    /// Fügt eine Koordinate vor `path.index` ein (Mittelpunkt-Griff).
    ///
    /// Nur für Linien und Polygone. Bei Polygonen darf nicht hinter dem
    /// schließenden Punkt eingefügt werden.
    pub fn insert_coordinate(&mut self, path: CoordPath, position: LngLat) -> bool {
        match &mut self.shape {
            Shape::LineString(coords) if path.ring == 0 && path.index <= coords.len() => {
                coords.insert(path.index, position);
                true
            }
            Shape::Polygon(rings) => match rings.get_mut(path.ring) {
                Some(ring) if path.index > 0 && path.index < ring.len() => {
                    ring.insert(path.index, position);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Entfernt eine Koordinate (Vertex löschen).
    ///
    /// Danach kann das Feature ungültig sein, siehe `is_valid`. Kreise und
    /// Punkte lehnen ab.
    pub fn remove_coordinate(&mut self, path: CoordPath) -> bool {
        match &mut self.shape {
            Shape::LineString(coords) if path.ring == 0 && path.index < coords.len() => {
                coords.remove(path.index);
                true
            }
            Shape::Polygon(rings) => {
                let Some(ring) = rings.get_mut(path.ring) else {
                    return false;
                };
                let last = ring.len().saturating_sub(1);
                if path.index >= last {
                    return false;
                }
                ring.remove(path.index);
                if path.index == 0 {
                    let new_last = ring.len() - 1;
                    ring[new_last] = ring[0];
                }
                true
            }
            _ => false,
        }
    }

    /// Verschiebt alle Vertices um `delta` (generische Verschiebung).
    ///
    /// Bei Kreisen bleibt der Mittelpunkt unverändert, siehe `CircleShape::translate_ring`.
    pub(crate) fn translate_vertices(&mut self, delta: DVec2) {
        match &mut self.shape {
            Shape::Point(p) => *p += delta,
            Shape::LineString(coords) => translate_points(coords, delta),
            Shape::Polygon(rings) => {
                for ring in rings {
                    translate_points(ring, delta);
                }
            }
            Shape::Circle(circle) => circle.translate_ring(delta),
        }
    }
}
