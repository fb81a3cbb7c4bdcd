//! Standard-Selektion: Features anklicken, selektieren und als Ganzes verschieben.
//!
//! Kreise werden hier wie Polygone behandelt: der Verschieber bewegt nur den
//! Ring, der Mittelpunkt bleibt stehen. `CircleSelectMode` ergänzt das.

use super::{DrawMode, DIRECT_SELECT, SIMPLE_SELECT};
use crate::app::display::{ActiveState, DisplayFeature, SupplementaryOptions};
use crate::app::events::{EventTarget, MapEvent};
use crate::app::host::{ActionableState, Cursor, DrawEvent, DrawHost, ModeOptions, UpdateAction};
use crate::core::{LngLat, ShapeKind};
use glam::DVec2;

/// Zustand des Selektions-Modus.
#[derive(Debug, Clone, Default)]
pub struct SimpleSelectMode {
    pub(crate) drag_move_location: Option<LngLat>,
    pub(crate) drag_moving: bool,
    pub(crate) can_drag_move: bool,
}

impl SimpleSelectMode {
    /// Erstellt den Modus im Ruhezustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Läuft gerade eine Verschiebung?
    pub fn is_drag_moving(&self) -> bool {
        self.drag_moving
    }

    /// Beginnt einen Drag-Schritt und liefert das Delta seit der letzten Position.
    ///
    /// `None`, wenn kein Verschieben erlaubt ist.
    pub(crate) fn begin_drag_move(&mut self, event: &mut MapEvent) -> Option<DVec2> {
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

    /// Verschiebt alle selektierten Features um das Delta seit dem letzten Event.
    pub fn drag_move(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        let Some(delta) = self.begin_drag_move(event) else {
            return;
        };
        let selected = host.selected_ids();
        host.move_features(&selected, delta);
        self.drag_move_location = Some(event.lng_lat);
    }

    fn start_on_active_feature(&mut self, host: &mut dyn DrawHost, event: &MapEvent) {
        self.stop_extended_interactions(host);
        host.set_drag_pan(false);
        self.can_drag_move = true;
        self.drag_move_location = Some(event.lng_lat);
    }

    fn stop_extended_interactions(&mut self, host: &mut dyn DrawHost) {
        self.drag_moving = false;
        self.can_drag_move = false;
        self.drag_move_location = None;
        host.set_drag_pan(true);
    }

    /// Setzt `trash` nach Selektion und signalisiert die UI.
    pub(crate) fn fire_actionable(host: &mut dyn DrawHost) {
        let trash = !host.selected_ids().is_empty();
        host.set_actionable_state(ActionableState::trash(trash));
        host.fire_actionable();
    }
}

impl DrawMode for SimpleSelectMode {
    fn name(&self) -> &'static str {
        SIMPLE_SELECT
    }

    fn on_setup(&mut self, host: &mut dyn DrawHost, options: &ModeOptions) {
        *self = Self::default();
        host.set_selected(&options.feature_ids);
        host.set_cursor(Cursor::Default);
        Self::fire_actionable(host);
    }

    fn on_stop(&mut self, host: &mut dyn DrawHost) {
        self.stop_extended_interactions(host);
        host.set_double_click_zoom(true);
    }

    fn on_mouse_down(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        if let Some(EventTarget::Feature(id)) = event.target {
            if host.is_selected(id) {
                self.start_on_active_feature(host, event);
            }
        }
    }

    fn on_drag(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        self.drag_move(host, event);
    }

    fn on_mouse_up(&mut self, host: &mut dyn DrawHost, _event: &mut MapEvent) {
        if self.drag_moving {
            let features = host.selected_ids();
            host.fire(DrawEvent::Update {
                action: UpdateAction::Move,
                features,
            });
        }
        self.stop_extended_interactions(host);
    }

    fn on_click(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        match event.target {
            None => {
                if !host.selected_ids().is_empty() {
                    host.clear_selected_features();
                }
                host.set_cursor(Cursor::Default);
                self.stop_extended_interactions(host);
            }
            Some(EventTarget::Vertex { parent, coord_path }) => {
                host.change_mode(
                    DIRECT_SELECT,
                    ModeOptions {
                        feature_id: Some(parent),
                        coord_path: Some(coord_path),
                        start_pos: Some(event.lng_lat),
                        ..ModeOptions::default()
                    },
                );
                host.set_cursor(Cursor::Move);
            }
            Some(EventTarget::Feature(id)) => {
                self.stop_extended_interactions(host);
                let is_point = host.feature(id).map(|f| f.kind()) == Some(ShapeKind::Point);
                if host.is_selected(id) && !is_point {
                    host.change_mode(DIRECT_SELECT, ModeOptions::direct(id));
                    return;
                }
                host.set_selected(&[id]);
                host.set_cursor(Cursor::Move);
            }
            Some(EventTarget::Midpoint { .. }) => {}
        }
    }

    fn on_trash(&mut self, host: &mut dyn DrawHost) {
        let selected = host.selected_ids();
        if selected.is_empty() {
            return;
        }
        host.delete_features(&selected);
        host.fire(DrawEvent::Delete(selected));
        Self::fire_actionable(host);
    }

    fn to_display_features(
        &self,
        host: &mut dyn DrawHost,
        feature: DisplayFeature,
        display: &mut dyn FnMut(DisplayFeature),
    ) {
        let active = feature.id.is_some_and(|id| host.is_selected(id));
        let feature = feature.with_active(ActiveState::from_bool(active));
        let points = if active && !feature.is_point() {
            host.create_supplementary_points(&feature, &SupplementaryOptions::default())
        } else {
            Vec::new()
        };
        display(feature);
        Self::fire_actionable(host);
        for point in points {
            display(point);
        }
    }
}
