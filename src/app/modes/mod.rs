//! Trait-basiertes Modus-System für austauschbare Zeichen-Modi.
//!
//! Jeder Modus implementiert `DrawMode` und wird beim `ModeManager` unter
//! seinem Namen registriert. Die kreisbewussten Modi ersetzen die Standard-
//! Modi unter denselben Namen, `ModeSet` wählt die installierte Variante.

/// Kreisbewusster direct_select (Resize per Kardinal-Handle, Mittelpunkt-Verschiebung).
pub mod circle_direct;
/// Kreisbewusster simple_select (Mittelpunkt-Verschiebung, Kardinal-Handles).
pub mod circle_select;
/// Standard-Vertex-Bearbeitung eines einzelnen Features.
pub mod direct_select;
/// Kreis-Erzeugung per Drag-Geste.
pub mod drag_circle;
/// Standard-Selektion und Verschiebung ganzer Features.
pub mod simple_select;

pub use circle_direct::CircleDirectMode;
pub use circle_select::CircleSelectMode;
pub use direct_select::DirectSelectMode;
pub use drag_circle::{CirclePhase, DragCircleMode};
pub use simple_select::SimpleSelectMode;

use super::display::DisplayFeature;
use super::events::MapEvent;
use super::host::{DrawHost, ModeOptions};
use crate::shared::DrawOptions;
use indexmap::IndexMap;

/// Name des Selektions-Modus.
pub const SIMPLE_SELECT: &str = "simple_select";
/// Name des Vertex-Bearbeitungs-Modus.
pub const DIRECT_SELECT: &str = "direct_select";
/// Name des Kreis-Erzeugungs-Modus.
pub const DRAW_CIRCLE: &str = "draw_circle";

/// Schnittstelle aller Zeichen-Modi.
///
/// Modi sind zustandsbehaftet. Jeder Handler bekommt den Host exklusiv für
/// genau ein Event. Touch-Events fallen per Default auf die Maus-Handler zurück.
pub trait DrawMode {
    /// Registrierungs-Name (z.B. `"simple_select"`)
    fn name(&self) -> &'static str;

    /// Berücksichtigt der Modus Kreis-Mittelpunkt und -Radius?
    fn circle_aware(&self) -> bool {
        false
    }

    /// Modus wird aktiv. Setzt den internen Zustand vollständig neu auf.
    fn on_setup(&mut self, host: &mut dyn DrawHost, options: &ModeOptions);

    /// Modus wird verlassen (auch bei Abbruch).
    fn on_stop(&mut self, _host: &mut dyn DrawHost) {}

    /// Maustaste gedrückt.
    fn on_mouse_down(&mut self, _host: &mut dyn DrawHost, _event: &mut MapEvent) {}

    /// Touch begonnen.
    fn on_touch_start(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        self.on_mouse_down(host, event);
    }

    /// Zeiger bewegt bei gedrückter Taste (jenseits der Klick-Toleranz).
    fn on_drag(&mut self, _host: &mut dyn DrawHost, _event: &mut MapEvent) {}

    /// Zeiger bewegt ohne gedrückte Taste.
    fn on_mouse_move(&mut self, _host: &mut dyn DrawHost, _event: &mut MapEvent) {}

    /// Maustaste losgelassen nach einem Drag.
    fn on_mouse_up(&mut self, _host: &mut dyn DrawHost, _event: &mut MapEvent) {}

    /// Touch beendet nach einem Drag.
    fn on_touch_end(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        self.on_mouse_up(host, event);
    }

    /// Klick (Press und Release innerhalb der Toleranz).
    fn on_click(&mut self, _host: &mut dyn DrawHost, _event: &mut MapEvent) {}

    /// Tap (Touch-Äquivalent zum Klick).
    fn on_tap(&mut self, host: &mut dyn DrawHost, event: &mut MapEvent) {
        self.on_click(host, event);
    }

    /// Löschen-Aktion.
    fn on_trash(&mut self, _host: &mut dyn DrawHost) {}

    /// Gibt ein Feature samt Griffen an `display` weiter.
    fn to_display_features(
        &self,
        host: &mut dyn DrawHost,
        feature: DisplayFeature,
        display: &mut dyn FnMut(DisplayFeature),
    );
}

/// Welche Modus-Varianten installiert werden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeSet {
    /// Nur die Standard-Modi (Kreise werden wie Polygone behandelt)
    Stock,
    /// Kreisbewusste Modi unter den Standard-Namen plus `draw_circle`
    #[default]
    CircleAware,
}

// ── ModeManager ──────────────────────────────────────────────────

/// Verwaltet registrierte Modi und den aktiven Modus-Namen.
pub struct ModeManager {
    modes: IndexMap<&'static str, Box<dyn DrawMode>>,
    active: Option<&'static str>,
}

impl Default for ModeManager {
    fn default() -> Self {
        Self::new(ModeSet::default(), &DrawOptions::default())
    }
}

impl ModeManager {
    /// Erstellt einen ModeManager mit vorregistrierten Modi der gewählten Variante.
    pub fn new(set: ModeSet, options: &DrawOptions) -> Self {
        let mut manager = Self {
            modes: IndexMap::new(),
            active: None,
        };
        match set {
            ModeSet::Stock => {
                manager.register(Box::new(SimpleSelectMode::new()));
                manager.register(Box::new(DirectSelectMode::new(options.direct_select_midpoints)));
            }
            ModeSet::CircleAware => {
                manager.register(Box::new(CircleSelectMode::new()));
                manager.register(Box::new(CircleDirectMode::new(
                    options.direct_select_midpoints,
                )));
                manager.register(Box::new(DragCircleMode::new(options.circle_steps)));
            }
        }
        manager
    }

    /// Registriert einen Modus (ersetzt einen gleichnamigen).
    pub fn register(&mut self, mode: Box<dyn DrawMode>) {
        if self.modes.insert(mode.name(), mode).is_some() {
            log::debug!("Modus ersetzt");
        }
    }

    /// Gibt die Namen aller registrierten Modi zurück.
    pub fn mode_names(&self) -> Vec<&'static str> {
        self.modes.keys().copied().collect()
    }

    /// Ist ein Modus unter diesem Namen registriert?
    pub fn contains(&self, name: &str) -> bool {
        self.modes.contains_key(name)
    }

    /// Setzt den aktiven Modus per Name. Gibt `false` bei unbekanntem Namen zurück.
    pub fn set_active(&mut self, name: &str) -> bool {
        match self.modes.get_key_value(name) {
            Some((&key, _)) => {
                self.active = Some(key);
                true
            }
            None => false,
        }
    }

    /// Name des aktiven Modus.
    pub fn active_name(&self) -> Option<&'static str> {
        self.active
    }

    /// Gibt eine Referenz auf den aktiven Modus zurück.
    pub fn active_mode(&self) -> Option<&dyn DrawMode> {
        let name = self.active?;
        self.modes.get(name).map(|m| m.as_ref())
    }

    /// Gibt eine mutable Referenz auf den aktiven Modus zurück.
    pub fn active_mode_mut(&mut self) -> Option<&mut (dyn DrawMode + 'static)> {
        let name = self.active?;
        self.modes.get_mut(name).map(|m| m.as_mut())
    }
}
