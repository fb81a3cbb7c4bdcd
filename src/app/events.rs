//! Zeiger-Events, die der Host an den aktiven Modus liefert.

use super::host::ModeOptions;
use crate::core::{CoordPath, FeatureId, LngLat};
use glam::DVec2;

/// Was unter dem Zeiger liegt (vom Event-Dispatcher ermittelt).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// Ein Feature als Ganzes
    Feature(FeatureId),
    /// Ein Vertex-Griff (auch Kardinal-Handle eines Kreises)
    Vertex {
        /// Feature, zu dem der Griff gehört
        parent: FeatureId,
        /// Pfad der Koordinate im Feature
        coord_path: CoordPath,
    },
    /// Ein Mittelpunkt-Griff zwischen zwei Vertices
    Midpoint {
        /// Feature, zu dem der Griff gehört
        parent: FeatureId,
        /// Pfad, an dem eine neue Koordinate eingefügt würde
        coord_path: CoordPath,
    },
}

impl EventTarget {
    /// Feature-ID des Ziels bzw. des Eltern-Features.
    pub fn feature_id(&self) -> FeatureId {
        match *self {
            EventTarget::Feature(id) => id,
            EventTarget::Vertex { parent, .. } | EventTarget::Midpoint { parent, .. } => parent,
        }
    }
}

/// Ein Zeiger-Event (Maus oder Touch).
#[derive(Debug, Clone, PartialEq)]
pub struct MapEvent {
    /// Geografische Position des Zeigers
    pub lng_lat: LngLat,
    /// Bildschirm-Position in Pixeln
    pub point: DVec2,
    /// Zeitstempel in Millisekunden
    pub time_ms: u64,
    /// Getroffenes Ziel (None = Karte)
    pub target: Option<EventTarget>,
    propagation_stopped: bool,
}

impl MapEvent {
    /// Erstellt ein Event ohne Ziel.
    pub fn new(lng_lat: LngLat, point: DVec2, time_ms: u64) -> Self {
        Self {
            lng_lat,
            point,
            time_ms,
            target: None,
            propagation_stopped: false,
        }
    }

    /// Setzt das getroffene Ziel.
    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Verhindert, dass die Karte das Event weiterverarbeitet (z.B. Pan).
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Wurde `stop_propagation` aufgerufen?
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Eingaben an die Session (z.B. aus einem aufgezeichneten Skript).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawIntent {
    /// Maustaste gedrückt
    MouseDown(MapEvent),
    /// Maus bewegt (Drag, solange gedrückt)
    MouseMove(MapEvent),
    /// Maustaste losgelassen
    MouseUp(MapEvent),
    /// Touch begonnen
    TouchStart(MapEvent),
    /// Touch bewegt
    TouchMove(MapEvent),
    /// Touch beendet
    TouchEnd(MapEvent),
    /// Löschen-Aktion
    Trash,
    /// Modus wechseln
    ChangeMode {
        /// Modus-Name
        mode: String,
        /// Optionen für `on_setup`
        options: ModeOptions,
    },
}
