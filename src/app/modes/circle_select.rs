//! Kreisbewusster simple_select.
//!
//! Beim Verschieben einer Selektion wandern die Kreis-Mittelpunkte mit, aktive
//! Kreise zeigen nur ihre vier Kardinal-Handles.

use super::circle_direct::shift_circle_centers;
use super::{DrawMode, SimpleSelectMode, SIMPLE_SELECT};
use crate::app::display::{
    create_supplementary_points_for_circle, ActiveState, DisplayFeature, SupplementaryOptions,
};
use crate::app::events::MapEvent;
use crate::app::host::{DrawHost, ModeOptions};

/// Selektion und Verschiebung mit Kreis-Unterstützung.
#[derive(Debug, Clone, Default)]
pub struct CircleSelectMode {
    inner: SimpleSelectMode,
}

impl CircleSelectMode {
    /// Erstellt den Modus im Ruhezustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Eingebetteter Standard-Modus.
    pub fn inner(&self) -> &SimpleSelectMode {
        &self.inner
    }

    /// Verschiebt die Selektion samt Kreis-Mittelpunkten.
    pub fn drag_move(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        let Some(delta) = self.inner.begin_drag_move(event) else {
            return;
        };
        let selected = host.selected_ids();
        let applied = host.move_features(&selected, delta);
        shift_circle_centers(host, &selected, applied);
        self.inner.drag_move_location = Some(event.lng_lat);
    }
}

impl DrawMode for CircleSelectMode {
    fn name(&self) -> &'static str {
        SIMPLE_SELECT
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
        self.drag_move(host, event);
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
        let active = feature.id.is_some_and(|id| host.is_selected(id));
        let feature = feature.with_active(ActiveState::from_bool(active));
        let points = if active && !feature.is_point() {
            create_supplementary_points_for_circle(&feature).unwrap_or_else(|| {
                host.create_supplementary_points(&feature, &SupplementaryOptions::default())
            })
        } else {
            Vec::new()
        };
        display(feature);
        SimpleSelectMode::fire_actionable(host);
        for point in points {
            display(point);
        }
    }
}
