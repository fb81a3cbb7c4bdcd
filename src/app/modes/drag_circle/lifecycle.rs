//! Lifecycle-Methoden des DragCircleMode (DrawMode-Implementierung).

use super::state::{CirclePhase, DragCircleMode};
use crate::app::display::{ActiveState, DisplayFeature};
use crate::app::events::MapEvent;
use crate::app::host::{ActionableState, Cursor, DrawEvent, DrawHost, ModeOptions};
use crate::app::modes::{DrawMode, DRAW_CIRCLE, SIMPLE_SELECT};
use crate::core::{distance_km, CircleShape, Feature, Shape};

impl DragCircleMode {
    /// Verwirft Mittelpunkt und Radius, der Modus bleibt aktiv.
    fn cancel(&mut self, host: &mut dyn DrawHost) {
        if let Some(circle) = self.circle_mut(host) {
            circle.clear();
        }
        self.phase = self.phase.cancel();
        log::debug!("draw_circle: Klick ohne Drag, Kreis verworfen");
    }

    /// Radius aus Mittelpunkt und Zeiger-Position, Ring wird neu erzeugt.
    fn resize_to_pointer(&mut self, host: &mut dyn DrawHost, event: &MapEvent) {
        let Some(circle) = self.circle_mut(host) else {
            return;
        };
        let Some(center) = circle.center() else {
            log::warn!("draw_circle: Radius ohne Mittelpunkt angefragt");
            return;
        };
        circle.set_radius_km(distance_km(center, event.lng_lat));
    }
}

impl DrawMode for DragCircleMode {
    fn name(&self) -> &'static str {
        DRAW_CIRCLE
    }

    fn circle_aware(&self) -> bool {
        true
    }

    fn on_setup(&mut self, host: &mut dyn DrawHost, _options: &ModeOptions) {
        *self = Self::new(self.steps);

        let id = host.next_feature_id();
        host.add_feature(Feature::new(id, Shape::Circle(CircleShape::empty(self.steps))));
        self.feature_id = Some(id);

        host.clear_selected_features();
        host.set_double_click_zoom(false);
        host.set_drag_pan(false);
        host.set_cursor(Cursor::Add);
        host.set_actionable_state(ActionableState::trash(true));
        log::debug!("draw_circle: Kreis {id} angelegt");
    }

    fn on_stop(&mut self, host: &mut dyn DrawHost) {
        host.set_double_click_zoom(true);
        host.set_drag_pan(true);
        host.set_cursor(Cursor::Default);

        let Some(id) = self.feature_id.take() else {
            return;
        };
        match host.feature(id).map(|f| f.is_valid()) {
            Some(true) => {
                log::info!("Kreis {id} erstellt");
                host.fire(DrawEvent::Create(vec![id]));
            }
            Some(false) => {
                log::debug!("draw_circle: unfertiger Kreis {id} entfernt");
                host.delete_features(&[id]);
            }
            None => {}
        }
    }

    fn on_mouse_down(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        if self.phase == CirclePhase::Complete {
            return;
        }
        if let Some(circle) = self.circle_mut(host) {
            circle.set_center(event.lng_lat);
            self.phase = self.phase.press();
        }
    }

    fn on_drag(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        host.set_drag_pan(false);
        if self.phase.accepts_moves() {
            self.resize_to_pointer(host, event);
        }
    }

    fn on_mouse_move(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        self.on_drag(host, event);
    }

    fn on_mouse_up(&mut self, host: &mut dyn DrawHost, _event: &mut MapEvent) {
        if !self.phase.accepts_moves() {
            return;
        }
        let sized = self.circle_mut(host).is_some_and(|c| c.is_sized());
        if !sized {
            // Press/Release ohne Radius: wie ein Klick behandeln
            self.cancel(host);
            return;
        }

        host.set_drag_pan(true);
        self.phase = self.phase.release(true);
        if let Some(id) = self.feature_id {
            host.change_mode(SIMPLE_SELECT, ModeOptions::select(vec![id]));
        }
    }

    fn on_click(&mut self, host: &mut dyn DrawHost, _event: &mut MapEvent) {
        self.cancel(host);
    }

    fn on_trash(&mut self, host: &mut dyn DrawHost) {
        if let Some(id) = self.feature_id.take() {
            host.delete_features(&[id]);
        }
        self.phase = CirclePhase::AwaitingCenter;
        host.change_mode(SIMPLE_SELECT, ModeOptions::default());
    }

    fn to_display_features(
        &self,
        _host: &mut dyn DrawHost,
        feature: DisplayFeature,
        display: &mut dyn FnMut(DisplayFeature),
    ) {
        let active = feature.id.is_some() && feature.id == self.feature_id;
        display(feature.with_active(ActiveState::from_bool(active)));
    }
}
