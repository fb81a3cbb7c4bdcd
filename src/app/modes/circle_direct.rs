//! Kreisbewusster direct_select.
//!
//! Ein Drag auf einem Kardinal-Handle ändert den Radius, ein Drag auf dem
//! Feature verschiebt den Mittelpunkt mit. Alles andere übernimmt der
//! eingebettete `DirectSelectMode`.

use super::{DirectSelectMode, DrawMode, DIRECT_SELECT};
use crate::app::display::{create_supplementary_points_for_circle, ActiveState, DisplayFeature};
use crate::app::events::MapEvent;
use crate::app::host::{DrawHost, ModeOptions};
use crate::core::{distance_km, FeatureId};
use glam::DVec2;

/// Verschiebt die Mittelpunkte aller Kreise unter `ids` um `delta`.
///
/// Der Ring wird dabei aus dem neuen Mittelpunkt neu erzeugt.
pub(crate) fn shift_circle_centers(host: &mut dyn DrawHost, ids: &[FeatureId], delta: DVec2) {
    for &id in ids {
        let Some(circle) = host.feature_mut(id).and_then(|f| f.circle_mut()) else {
            continue;
        };
        match circle.center() {
            Some(center) => circle.set_center(center + delta),
            None => log::warn!("Kreis {id} ohne Mittelpunkt beim Verschieben übersprungen"),
        }
    }
}

/// Vertex-/Feature-Bearbeitung mit Kreis-Unterstützung.
#[derive(Debug, Clone, Default)]
pub struct CircleDirectMode {
    inner: DirectSelectMode,
}

impl CircleDirectMode {
    /// Erstellt den Modus. `midpoints` gilt für Nicht-Kreis-Features.
    pub fn new(midpoints: bool) -> Self {
        Self {
            inner: DirectSelectMode::new(midpoints),
        }
    }

    /// Eingebetteter Standard-Modus.
    pub fn inner(&self) -> &DirectSelectMode {
        &self.inner
    }

    /// Verschiebt die selektierten Features und deren Kreis-Mittelpunkte.
    pub fn drag_feature(&mut self, host: &mut dyn DrawHost, event: &MapEvent, delta: DVec2) {
        let selected = host.selected_ids();
        let applied = host.move_features(&selected, delta);
        shift_circle_centers(host, &selected, applied);
        self.inner.drag_move_location = Some(event.lng_lat);
    }

    /// Kreis: Radius auf Zeiger-Abstand setzen. Sonst Standard-Vertex-Drag.
    pub fn drag_vertex(&mut self, host: &mut dyn DrawHost, event: &MapEvent, delta: DVec2) {
        let Some(id) = self.inner.feature_id else {
            return;
        };
        match host.feature(id).map(|f| f.is_circle()) {
            None => log::warn!("Resize: Feature {id} nicht gefunden"),
            Some(false) => self.inner.drag_vertex(host, event, delta),
            Some(true) => {
                let Some(circle) = host.feature_mut(id).and_then(|f| f.circle_mut()) else {
                    return;
                };
                match circle.center() {
                    Some(center) => circle.set_radius_km(distance_km(center, event.lng_lat)),
                    None => log::warn!("Kreis {id} ohne Mittelpunkt, Resize übersprungen"),
                }
            }
        }
    }
}

impl DrawMode for CircleDirectMode {
    fn name(&self) -> &'static str {
        DIRECT_SELECT
    }

    fn circle_aware(&self) -> bool {
        true
    }

    fn on_setup(&mut self, host: &mut dyn DrawHost, options: &ModeOptions) {
        self.inner.on_setup(host, options);
    }

    fn on_stop(&mut self, host: &mut dyn DrawHost) {
        self.inner.on_stop(host);
    }

    fn on_mouse_down(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        self.inner.on_mouse_down(host, event);
    }

    fn on_drag(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        let Some(delta) = self.inner.begin_drag_step(event) else {
            return;
        };
        if self.inner.selected_coord_paths.is_empty() {
            self.drag_feature(host, event, delta);
        } else {
            self.drag_vertex(host, event, delta);
        }
        self.inner.drag_move_location = Some(event.lng_lat);
    }

    fn on_mouse_up(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        self.inner.on_mouse_up(host, event);
    }

    fn on_click(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        self.inner.on_click(host, event);
    }

    fn on_trash(&mut self, host: &mut dyn DrawHost) {
        self.inner.on_trash(host);
    }

    fn to_display_features(
        &self,
        host: &mut dyn DrawHost,
        feature: DisplayFeature,
        display: &mut dyn FnMut(DisplayFeature),
    ) {
        if self.inner.is_edited(&feature) {
            let feature = feature.with_active(ActiveState::Active);
            let points = create_supplementary_points_for_circle(&feature).unwrap_or_else(|| {
                host.create_supplementary_points(&feature, &self.inner.supplementary_options())
            });
            display(feature);
            for point in points {
                display(point);
            }
        } else {
            display(feature.with_active(ActiveState::Inactive));
        }
        self.inner.fire_actionable(host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::display::DisplayMeta;
    use crate::app::events::EventTarget;
    use crate::app::movement::constrain_feature_movement;
    use crate::app::DrawStore;
    use crate::core::{circle_ring, lng_lat, CircleShape, CoordPath, Feature, Shape};
    use approx::assert_relative_eq;

    fn circle_store() -> DrawStore {
        let mut store = DrawStore::new();
        store.add_feature(Feature::new(
            1,
            Shape::Circle(CircleShape::new(lng_lat(1.0, 2.0), 50.0, 64)),
        ));
        store
    }

    fn event(lng: f64, lat: f64) -> MapEvent {
        MapEvent::new(lng_lat(lng, lat), DVec2::ZERO, 0)
    }

    #[test]
    fn handle_drag_resizes_around_fixed_center() {
        let mut store = circle_store();
        let mut mode = CircleDirectMode::new(true);
        mode.on_setup(&mut store, &ModeOptions::direct(1));

        let handle = store.feature(1).and_then(|f| f.circle()).expect("Kreis").ring()[16];
        let target = EventTarget::Vertex {
            parent: 1,
            coord_path: CoordPath::new(0, 16),
        };
        let mut press = MapEvent::new(handle, DVec2::ZERO, 0).with_target(target);
        mode.on_mouse_down(&mut store, &mut press);
        mode.on_drag(&mut store, &mut event(0.0, 2.0));

        let circle = store.feature(1).and_then(|f| f.circle()).expect("Kreis");
        let expected = distance_km(lng_lat(1.0, 2.0), lng_lat(0.0, 2.0));
        assert_eq!(circle.center(), Some(lng_lat(1.0, 2.0)));
        assert_relative_eq!(circle.radius_km(), expected, epsilon = 1e-12);
        assert_eq!(circle.ring(), circle_ring(lng_lat(1.0, 2.0), expected, 64).as_slice());
    }

    #[test]
    fn feature_drag_moves_center_and_ring() {
        let mut store = circle_store();
        let mut mode = CircleDirectMode::new(true);
        mode.on_setup(&mut store, &ModeOptions::direct(1));

        mode.on_mouse_down(&mut store, &mut event(1.0, 2.0).with_target(EventTarget::Feature(1)));
        mode.on_drag(&mut store, &mut event(2.0, 3.0));

        let circle = store.feature(1).and_then(|f| f.circle()).expect("Kreis");
        assert_eq!(circle.center(), Some(lng_lat(2.0, 3.0)));
        assert_relative_eq!(circle.radius_km(), 50.0);
        assert_eq!(circle.ring(), circle_ring(lng_lat(2.0, 3.0), 50.0, 64).as_slice());
    }

    #[test]
    fn non_circle_vertex_drag_falls_through() {
        let mut store = DrawStore::new();
        store.add_feature(Feature::new(
            2,
            Shape::LineString(vec![lng_lat(0.0, 0.0), lng_lat(1.0, 0.0)]),
        ));
        let mut mode = CircleDirectMode::new(true);
        mode.on_setup(&mut store, &ModeOptions::direct(2));

        let target = EventTarget::Vertex {
            parent: 2,
            coord_path: CoordPath::new(0, 1),
        };
        mode.on_mouse_down(&mut store, &mut event(1.0, 0.0).with_target(target));
        mode.on_drag(&mut store, &mut event(1.0, 1.0));
        assert_eq!(
            store.feature(2).expect("Linie").coordinates(),
            vec![lng_lat(0.0, 0.0), lng_lat(1.0, 1.0)]
        );
    }

    #[test]
    fn edited_circle_shows_cardinal_handles_only() {
        let mut store = circle_store();
        let mut mode = CircleDirectMode::new(true);
        mode.on_setup(&mut store, &ModeOptions::direct(1));

        let base = DisplayFeature::from_feature(store.feature(1).expect("Kreis"));
        let mut shown = Vec::new();
        mode.to_display_features(&mut store, base, &mut |f| shown.push(f));

        assert_eq!(shown.len(), 5);
        assert_eq!(shown[0].meta, DisplayMeta::Feature);
        assert!(shown[1..].iter().all(|f| f.meta == DisplayMeta::Vertex));
        assert_eq!(store.actionable_fire_count(), 1);
    }

    #[test]
    fn other_features_are_inactive_without_points() {
        let mut store = circle_store();
        store.add_feature(Feature::new(
            2,
            Shape::Circle(CircleShape::new(lng_lat(5.0, 5.0), 10.0, 64)),
        ));
        let mut mode = CircleDirectMode::new(true);
        mode.on_setup(&mut store, &ModeOptions::direct(1));

        let base = DisplayFeature::from_feature(store.feature(2).expect("Kreis"));
        let mut shown = Vec::new();
        mode.to_display_features(&mut store, base, &mut |f| shown.push(f));
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].active, ActiveState::Inactive);
    }

    #[test]
    fn feature_drag_toward_south_pole_keeps_ring_consistent() {
        let mut store = DrawStore::new();
        store.add_feature(Feature::new(
            1,
            Shape::Circle(CircleShape::new(lng_lat(10.0, -83.0), 50.0, 64)),
        ));
        let ring = store.feature(1).expect("Kreis").coordinates();
        let applied = constrain_feature_movement(&[ring], DVec2::new(0.0, -10.0));
        assert!(applied.y > -10.0, "Delta muss begrenzt werden");

        let mut mode = CircleDirectMode::new(true);
        mode.on_setup(&mut store, &ModeOptions::direct(1));
        let mut press = event(10.0, -83.0).with_target(EventTarget::Feature(1));
        mode.on_mouse_down(&mut store, &mut press);
        mode.on_drag(&mut store, &mut event(10.0, -93.0));

        let circle = store.feature(1).and_then(|f| f.circle()).expect("Kreis");
        let center = circle.center().expect("Mittelpunkt");
        assert_eq!(center, lng_lat(10.0, -83.0) + applied);
        assert_relative_eq!(circle.radius_km(), 50.0);
        assert_eq!(circle.ring(), circle_ring(center, 50.0, 64).as_slice());
    }
}
