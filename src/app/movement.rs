//! Generischer Verschieber: verschiebt alle Vertices ganzer Features.
//!
//! Das Delta wird vorher so begrenzt, dass kein Feature über die Pole hinaus
//! geschoben wird, und der Längengrad wird jenseits von ±270° um 360° gefaltet.
//! Kreis-Mittelpunkte werden hier nicht angefasst.

use super::host::DrawHost;
use crate::core::{FeatureId, LngLat};
use glam::DVec2;

/// Minimaler Breitengrad.
pub const LAT_MIN: f64 = -90.0;
/// Minimaler dargestellter Breitengrad (innere Kante).
pub const LAT_RENDERED_MIN: f64 = -85.0;
/// Maximaler Breitengrad.
pub const LAT_MAX: f64 = 90.0;
/// Maximaler dargestellter Breitengrad (innere Kante).
pub const LAT_RENDERED_MAX: f64 = 85.0;
/// Minimaler Längengrad vor dem Falten.
pub const LNG_MIN: f64 = -270.0;
/// Maximaler Längengrad vor dem Falten.
pub const LNG_MAX: f64 = 270.0;

/// Begrenzt ein Verschiebe-Delta für eine Menge von Features.
///
/// `features` enthält die Koordinaten je Feature. Jedes Feature muss mindestens
/// mit einem Teil innerhalb von ±85° bleiben und darf ±90° nicht überschreiten.
pub fn constrain_feature_movement(features: &[Vec<LngLat>], delta: DVec2) -> DVec2 {
    let mut north_inner_edge = LAT_MIN;
    let mut south_inner_edge = LAT_MAX;
    let mut north_outer_edge = LAT_MIN;
    let mut south_outer_edge = LAT_MAX;
    let mut west_edge = LNG_MAX;
    let mut east_edge = LNG_MIN;

    for coords in features.iter().filter(|c| !c.is_empty()) {
        let south = coords.iter().map(|c| c.y).fold(f64::INFINITY, f64::min);
        let north = coords.iter().map(|c| c.y).fold(f64::NEG_INFINITY, f64::max);
        let west = coords.iter().map(|c| c.x).fold(f64::INFINITY, f64::min);
        let east = coords.iter().map(|c| c.x).fold(f64::NEG_INFINITY, f64::max);

        north_inner_edge = north_inner_edge.max(south);
        south_inner_edge = south_inner_edge.min(north);
        north_outer_edge = north_outer_edge.max(north);
        south_outer_edge = south_outer_edge.min(south);
        west_edge = west_edge.min(west);
        east_edge = east_edge.max(east);
    }

    let mut constrained = delta;
    if north_inner_edge + constrained.y > LAT_RENDERED_MAX {
        constrained.y = LAT_RENDERED_MAX - north_inner_edge;
    }
    if north_outer_edge + constrained.y > LAT_MAX {
        constrained.y = LAT_MAX - north_outer_edge;
    }
    if south_inner_edge + constrained.y < LAT_RENDERED_MIN {
        constrained.y = LAT_RENDERED_MIN - south_inner_edge;
    }
    if south_outer_edge + constrained.y < LAT_MIN {
        constrained.y = LAT_MIN - south_outer_edge;
    }
    if west_edge + constrained.x <= LNG_MIN {
        constrained.x += (constrained.x.abs() / 360.0).ceil() * 360.0;
    }
    if east_edge + constrained.x >= LNG_MAX {
        constrained.x -= (constrained.x.abs() / 360.0).ceil() * 360.0;
    }
    constrained
}

/// Verschiebt die Vertices aller genannten Features um das begrenzte Delta.
///
/// Gibt das angewendete Delta zurück. Unbekannte IDs werden übersprungen.
pub fn move_features<H: DrawHost + ?Sized>(host: &mut H, ids: &[FeatureId], delta: DVec2) -> DVec2 {
    let coords: Vec<Vec<LngLat>> = ids
        .iter()
        .filter_map(|&id| host.feature(id).map(|f| f.coordinates()))
        .collect();
    let applied = constrain_feature_movement(&coords, delta);

    for &id in ids {
        match host.feature_mut(id) {
            Some(feature) => feature.translate_vertices(applied),
            None => log::warn!("Verschieben: Feature {id} nicht gefunden"),
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lng_lat;
    use approx::assert_relative_eq;

    #[test]
    fn free_movement_is_unchanged() {
        let features = vec![vec![lng_lat(0.0, 0.0), lng_lat(1.0, 1.0)]];
        let delta = constrain_feature_movement(&features, DVec2::new(3.0, -2.0));
        assert_eq!(delta, DVec2::new(3.0, -2.0));
    }

    #[test]
    fn latitude_clamped_at_rendered_edge() {
        let features = vec![vec![lng_lat(0.0, 84.0)]];
        let delta = constrain_feature_movement(&features, DVec2::new(0.0, 5.0));
        assert_relative_eq!(delta.y, 1.0, epsilon = 1e-12);

        let features = vec![vec![lng_lat(0.0, -84.0)]];
        let delta = constrain_feature_movement(&features, DVec2::new(0.0, -5.0));
        assert_relative_eq!(delta.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn outer_edge_never_passes_pole() {
        // Feature von 80° bis 89°: innere Kante 80 erlaubt +5, äußere Kante nur +1
        let features = vec![vec![lng_lat(0.0, 80.0), lng_lat(0.0, 89.0)]];
        let delta = constrain_feature_movement(&features, DVec2::new(0.0, 5.0));
        assert_relative_eq!(delta.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn longitude_wraps_beyond_limit() {
        let features = vec![vec![lng_lat(260.0, 0.0)]];
        let delta = constrain_feature_movement(&features, DVec2::new(20.0, 0.0));
        assert_relative_eq!(delta.x, 20.0 - 360.0, epsilon = 1e-12);

        let features = vec![vec![lng_lat(-260.0, 0.0)]];
        let delta = constrain_feature_movement(&features, DVec2::new(-20.0, 0.0));
        assert_relative_eq!(delta.x, -20.0 + 360.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_selection_passes_delta_through() {
        let delta = constrain_feature_movement(&[], DVec2::new(7.0, 7.0));
        assert_eq!(delta, DVec2::new(7.0, 7.0));
    }
}
