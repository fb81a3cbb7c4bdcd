//! Standard-Vertex-Bearbeitung eines einzelnen Features.
//!
//! Vertex-Griffe ziehen einzelne Koordinaten, Mittelpunkt-Griffe fügen neue
//! ein, ein Drag auf dem Feature selbst verschiebt es als Ganzes.

use super::{DrawMode, DIRECT_SELECT, SIMPLE_SELECT};
use crate::app::display::{ActiveState, DisplayFeature, SupplementaryOptions};
use crate::app::events::{EventTarget, MapEvent};
use crate::app::host::{ActionableState, Cursor, DrawEvent, DrawHost, ModeOptions, UpdateAction};
use crate::app::movement::constrain_feature_movement;
use crate::core::{CoordPath, FeatureId, LngLat, ShapeKind};
use glam::DVec2;

/// Zustand des Vertex-Bearbeitungs-Modus.
#[derive(Debug, Clone, Default)]
pub struct DirectSelectMode {
    pub(crate) feature_id: Option<FeatureId>,
    pub(crate) selected_coord_paths: Vec<CoordPath>,
    pub(crate) drag_move_location: Option<LngLat>,
    pub(crate) drag_moving: bool,
    pub(crate) can_drag_move: bool,
    midpoints: bool,
}

impl DirectSelectMode {
    /// Erstellt den Modus. `midpoints` steuert die Mittelpunkt-Griffe.
    pub fn new(midpoints: bool) -> Self {
        Self {
            midpoints,
            ..Self::default()
        }
    }

    /// Bearbeitetes Feature.
    pub fn feature_id(&self) -> Option<FeatureId> {
        self.feature_id
    }

    /// Selektierte Vertices.
    pub fn selected_coord_paths(&self) -> &[CoordPath] {
        &self.selected_coord_paths
    }

    pub(crate) fn supplementary_options(&self) -> SupplementaryOptions {
        SupplementaryOptions {
            midpoints: self.midpoints,
            selected_paths: self.selected_coord_paths.clone(),
        }
    }

    /// Beginnt einen Drag-Schritt und liefert das Delta seit der letzten Position.
    pub(crate) fn begin_drag_step(&mut self, event: &mut MapEvent) -> Option<DVec2> {
        if !self.can_drag_move {
            return None;
        }
        let Some(last) = self.drag_move_location else {
            log::warn!("Drag ohne Startposition ignoriert");
            return None;
        };
        self.drag_moving = true;
        event.stop_propagation();
        Some(event.lng_lat - last)
    }

    /// Verschiebt alle selektierten Features als Ganzes.
    pub fn drag_feature(&mut self, host: &mut dyn DrawHost, event: &MapEvent, delta: DVec2) {
        let selected = host.selected_ids();
        host.move_features(&selected, delta);
        self.drag_move_location = Some(event.lng_lat);
    }

    /// Verschiebt die selektierten Vertices einzeln (begrenzt an den Polen).
    pub fn drag_vertex(&mut self, host: &mut dyn DrawHost, _event: &MapEvent, delta: DVec2) {
        let Some(id) = self.feature_id else {
            return;
        };
        let Some(feature) = host.feature_mut(id) else {
            log::warn!("Vertex-Drag: Feature {id} nicht gefunden");
            return;
        };

        let coords: Vec<Vec<LngLat>> = self
            .selected_coord_paths
            .iter()
            .filter_map(|&path| feature.coordinate(path))
            .map(|c| vec![c])
            .collect();
        let applied = constrain_feature_movement(&coords, delta);

        for &path in &self.selected_coord_paths {
            if let Some(current) = feature.coordinate(path) {
                feature.update_coordinate(path, current + applied);
            }
        }
    }

    fn start_dragging(&mut self, host: &mut dyn DrawHost, event: &MapEvent) {
        host.set_drag_pan(false);
        self.can_drag_move = true;
        self.drag_move_location = Some(event.lng_lat);
    }

    fn stop_dragging(&mut self, host: &mut dyn DrawHost) {
        host.set_drag_pan(true);
        self.drag_moving = false;
        self.can_drag_move = false;
        self.drag_move_location = None;
    }

    fn leave_to_simple_select(host: &mut dyn DrawHost, feature_ids: Vec<FeatureId>) {
        host.change_mode(SIMPLE_SELECT, ModeOptions::select(feature_ids));
    }

    /// Setzt `trash` nach Vertex-Selektion und signalisiert die UI.
    pub(crate) fn fire_actionable(&self, host: &mut dyn DrawHost) {
        host.set_actionable_state(ActionableState::trash(!self.selected_coord_paths.is_empty()));
        host.fire_actionable();
    }

    /// Ist `feature` das bearbeitete Feature?
    pub(crate) fn is_edited(&self, feature: &DisplayFeature) -> bool {
        feature.id.is_some() && feature.id == self.feature_id
    }
}

impl DrawMode for DirectSelectMode {
    fn name(&self) -> &'static str {
        DIRECT_SELECT
    }

    fn on_setup(&mut self, host: &mut dyn DrawHost, options: &ModeOptions) {
        *self = Self::new(self.midpoints);

        let Some(id) = options.feature_id else {
            log::warn!("direct_select ohne Feature-ID, zurück zu simple_select");
            Self::leave_to_simple_select(host, Vec::new());
            return;
        };
        match host.feature(id).map(|f| f.kind()) {
            None => {
                log::warn!("direct_select: Feature {id} nicht gefunden");
                Self::leave_to_simple_select(host, Vec::new());
                return;
            }
            Some(ShapeKind::Point) => {
                log::warn!("direct_select bearbeitet keine Punkte (Feature {id})");
                Self::leave_to_simple_select(host, vec![id]);
                return;
            }
            Some(_) => {}
        }

        self.feature_id = Some(id);
        self.selected_coord_paths = options.coord_path.into_iter().collect();
        self.drag_move_location = options.start_pos;
        host.set_selected(&[id]);
        host.set_double_click_zoom(false);
        host.set_actionable_state(ActionableState::trash(true));
    }

    fn on_stop(&mut self, host: &mut dyn DrawHost) {
        host.set_double_click_zoom(true);
        self.stop_dragging(host);
        self.selected_coord_paths.clear();
    }

    fn on_mouse_down(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        let Some(target) = event.target else {
            return;
        };
        if Some(target.feature_id()) != self.feature_id {
            return;
        }

        match target {
            EventTarget::Vertex { coord_path, .. } => {
                self.start_dragging(host, event);
                if !self.selected_coord_paths.contains(&coord_path) {
                    self.selected_coord_paths = vec![coord_path];
                }
                host.set_cursor(Cursor::Move);
            }
            EventTarget::Midpoint { parent, coord_path } => {
                self.start_dragging(host, event);
                let inserted = host
                    .feature_mut(parent)
                    .is_some_and(|f| f.insert_coordinate(coord_path, event.lng_lat));
                if inserted {
                    host.fire(DrawEvent::Update {
                        action: UpdateAction::ChangeCoordinates,
                        features: vec![parent],
                    });
                    self.selected_coord_paths = vec![coord_path];
                }
            }
            EventTarget::Feature(_) => {
                if self.selected_coord_paths.is_empty() {
                    self.start_dragging(host, event);
                } else {
                    self.stop_dragging(host);
                }
            }
        }
    }

    fn on_drag(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        let Some(delta) = self.begin_drag_step(event) else {
            return;
        };
        if self.selected_coord_paths.is_empty() {
            self.drag_feature(host, event, delta);
        } else {
            self.drag_vertex(host, event, delta);
        }
        self.drag_move_location = Some(event.lng_lat);
    }

    fn on_mouse_up(&mut self, host: &mut dyn DrawHost, _event: &mut MapEvent) {
        if self.drag_moving {
            if let Some(id) = self.feature_id {
                host.fire(DrawEvent::Update {
                    action: UpdateAction::ChangeCoordinates,
                    features: vec![id],
                });
            }
        }
        self.stop_dragging(host);
    }

    fn on_click(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        match event.target {
            None => Self::leave_to_simple_select(host, Vec::new()),
            Some(EventTarget::Feature(id)) if Some(id) == self.feature_id => {
                self.selected_coord_paths.clear();
            }
            Some(EventTarget::Feature(_)) => Self::leave_to_simple_select(host, Vec::new()),
            Some(_) => {}
        }
    }

    fn on_trash(&mut self, host: &mut dyn DrawHost) {
        let Some(id) = self.feature_id else {
            return;
        };
        let mut paths = std::mem::take(&mut self.selected_coord_paths);
        // Absteigend löschen, damit die übrigen Indizes gültig bleiben
        paths.sort_unstable_by(|a, b| b.cmp(a));

        let Some(feature) = host.feature_mut(id) else {
            return;
        };
        let removed = paths
            .iter()
            .filter(|&&path| feature.remove_coordinate(path))
            .count();
        let still_valid = feature.is_valid();

        if removed > 0 {
            host.fire(DrawEvent::Update {
                action: UpdateAction::ChangeCoordinates,
                features: vec![id],
            });
        } else if !paths.is_empty() {
            log::debug!("Feature {id}: keine der {} Koordinaten löschbar", paths.len());
        }
        self.fire_actionable(host);

        if !still_valid {
            host.delete_features(&[id]);
            host.fire(DrawEvent::Delete(vec![id]));
            Self::leave_to_simple_select(host, Vec::new());
        }
    }

    fn to_display_features(
        &self,
        host: &mut dyn DrawHost,
        feature: DisplayFeature,
        display: &mut dyn FnMut(DisplayFeature),
    ) {
        if self.is_edited(&feature) {
            let feature = feature.with_active(ActiveState::Active);
            let points = host.create_supplementary_points(&feature, &self.supplementary_options());
            display(feature);
            for point in points {
                display(point);
            }
        } else {
            display(feature.with_active(ActiveState::Inactive));
        }
        self.fire_actionable(host);
    }
}
