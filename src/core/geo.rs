//! Geodätische Hilfsfunktionen: Großkreis-Distanz, Zielpunkt und Kreis-Ring.
//!
//! Alle Koordinaten sind `LngLat` (`x` = Längengrad, `y` = Breitengrad, in Grad).
//! Distanzen werden durchgehend in Kilometern angegeben, damit Erzeugung und
//! Resize exakt dieselbe Metrik verwenden.

use glam::DVec2;

/// Geografischer Punkt: `x` = Längengrad, `y` = Breitengrad (Grad).
pub type LngLat = DVec2;

/// Mittlerer Erdradius in Kilometern.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Standard-Anzahl der Kreis-Vertices (ohne schließenden Punkt).
pub const DEFAULT_CIRCLE_STEPS: usize = 64;

/// Minimale Vertex-Anzahl eines Kreis-Rings.
const MIN_CIRCLE_STEPS: usize = 3;

/// Erstellt einen `LngLat` aus Längen- und Breitengrad.
#[inline]
pub fn lng_lat(lng: f64, lat: f64) -> LngLat {
    DVec2::new(lng, lat)
}

/// Großkreis-Distanz zwischen zwei Punkten in Kilometern (Haversine).
pub fn distance_km(a: LngLat, b: LngLat) -> f64 {
    let lat_a = a.y.to_radians();
    let lat_b = b.y.to_radians();
    let d_lat = (b.y - a.y).to_radians();
    let d_lng = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + (d_lng / 2.0).sin().powi(2) * lat_a.cos() * lat_b.cos();
    // Rundung nahe dem Antipoden kann h knapp über 1 heben
    let h = h.clamp(0.0, 1.0);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt()) * EARTH_RADIUS_KM
}

/// Zielpunkt ausgehend von `origin` nach `distance_km` in Richtung `bearing_deg`.
///
/// Die Peilung ist im Uhrzeigersinn ab Norden angegeben (0° = Nord, 90° = Ost).
pub fn destination(origin: LngLat, distance_km: f64, bearing_deg: f64) -> LngLat {
    let lng1 = origin.x.to_radians();
    let lat1 = origin.y.to_radians();
    let bearing = bearing_deg.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    lng_lat(lng2.to_degrees(), lat2.to_degrees())
}

/// Erzeugt den geschlossenen Polygon-Ring eines Kreises.
///
/// Liefert `steps + 1` Punkte: Vertex 0 liegt im Norden, die weiteren folgen
/// gegen den Uhrzeigersinn (Peilung `-360·i/steps`), der letzte Punkt wiederholt
/// den ersten. Bei `radius_km == 0` fallen alle Punkte auf `center` zusammen
/// (gültiger Zwischenzustand "noch nicht dimensioniert").
pub fn circle_ring(center: LngLat, radius_km: f64, steps: usize) -> Vec<LngLat> {
    let steps = steps.max(MIN_CIRCLE_STEPS);
    let radius_km = radius_km.max(0.0);

    let mut ring: Vec<LngLat> = (0..steps)
        .map(|i| {
            let bearing = -360.0 * i as f64 / steps as f64;
            destination(center, radius_km, bearing)
        })
        .collect();
    ring.push(ring[0]);
    ring
}

/// Verschiebt alle Punkte um `delta` (Grad).
pub(crate) fn translate_points(points: &mut [LngLat], delta: DVec2) {
    for point in points {
        *point += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_one_degree_latitude_at_equator() {
        let d = distance_km(lng_lat(0.0, 0.0), lng_lat(0.0, 1.0));
        assert_relative_eq!(d, 111.195, epsilon = 1e-3);
    }

    #[test]
    fn distance_is_symmetric_and_zero_for_same_point() {
        let a = lng_lat(13.4, 52.5);
        let b = lng_lat(2.35, 48.85);
        assert_relative_eq!(distance_km(a, b), distance_km(b, a), epsilon = 1e-9);
        assert_eq!(distance_km(a, a), 0.0);
    }

    #[test]
    fn destination_north_matches_distance() {
        let origin = lng_lat(10.0, 45.0);
        let target = destination(origin, 25.0, 0.0);
        assert_relative_eq!(target.x, 10.0, epsilon = 1e-9);
        assert!(target.y > 45.0);
        assert_relative_eq!(distance_km(origin, target), 25.0, epsilon = 1e-6);
    }

    #[test]
    fn ring_is_closed_with_expected_length() {
        let ring = circle_ring(lng_lat(0.0, 0.0), 5.0, DEFAULT_CIRCLE_STEPS);
        assert_eq!(ring.len(), DEFAULT_CIRCLE_STEPS + 1);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn ring_vertices_lie_on_radius() {
        let center = lng_lat(7.0, 51.0);
        let ring = circle_ring(center, 12.5, DEFAULT_CIRCLE_STEPS);
        for vertex in &ring {
            assert_relative_eq!(distance_km(center, *vertex), 12.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn ring_extreme_points_reproduce_radius() {
        let center = lng_lat(-3.7, 40.4);
        let radius = 42.0;
        let ring = circle_ring(center, radius, DEFAULT_CIRCLE_STEPS);

        // Nord- und Süd-Extrempunkt (Index 0 und steps/2)
        let north = ring[0];
        let south = ring[DEFAULT_CIRCLE_STEPS / 2];
        let fitted = distance_km(north, south) / 2.0;
        assert_relative_eq!(fitted, radius, epsilon = 1e-6);
    }

    #[test]
    fn ring_starts_north_and_runs_counter_clockwise() {
        let center = lng_lat(0.0, 0.0);
        let ring = circle_ring(center, 10.0, 64);
        assert!(ring[0].y > 0.0);
        assert!(ring[16].x < 0.0, "Viertel-Vertex muss im Westen liegen");
        assert!(ring[32].y < 0.0);
        assert!(ring[48].x > 0.0);
    }

    #[test]
    fn zero_radius_yields_degenerate_ring() {
        let center = lng_lat(4.0, -2.0);
        let ring = circle_ring(center, 0.0, DEFAULT_CIRCLE_STEPS);
        assert_eq!(ring.len(), DEFAULT_CIRCLE_STEPS + 1);
        for vertex in ring {
            assert_relative_eq!(vertex.x, center.x, epsilon = 1e-12);
            assert_relative_eq!(vertex.y, center.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn tiny_step_count_is_clamped() {
        let ring = circle_ring(lng_lat(0.0, 0.0), 1.0, 1);
        assert_eq!(ring.len(), MIN_CIRCLE_STEPS + 1);
    }

    #[test]
    fn antipodal_pairs_give_half_circumference() {
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        for i in 0..2000 {
            let lat = -90.0 + 180.0 * f64::from(i) / 1999.0;
            let d = distance_km(lng_lat(0.0, lat), lng_lat(180.0, -lat));
            assert!(d.is_finite(), "Distanz bei Breite {lat} ist {d}");
            assert_relative_eq!(d, half, epsilon = 1e-3);
        }
    }
}
