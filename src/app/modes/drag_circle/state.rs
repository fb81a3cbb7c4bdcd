//! State-Definitionen und Konstruktor für den Kreis-Erzeugungs-Modus.

use crate::app::host::DrawHost;
use crate::core::{CircleShape, FeatureId, DEFAULT_CIRCLE_STEPS};

/// Phase der Kreis-Erzeugung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CirclePhase {
    /// Warten auf den Druck, der den Mittelpunkt setzt
    #[default]
    AwaitingCenter,
    /// Mittelpunkt gesetzt, Radius folgt dem Zeiger
    Sizing,
    /// Losgelassen mit Radius > 0, Übergabe an simple_select angefordert
    Complete,
}

impl CirclePhase {
    /// Druck: Mittelpunkt wird (neu) gesetzt.
    pub fn press(self) -> Self {
        match self {
            CirclePhase::AwaitingCenter | CirclePhase::Sizing => CirclePhase::Sizing,
            CirclePhase::Complete => CirclePhase::Complete,
        }
    }

    /// Loslassen: fertig mit Radius, sonst zurück zum Anfang.
    pub fn release(self, sized: bool) -> Self {
        match (self, sized) {
            (CirclePhase::Sizing, true) => CirclePhase::Complete,
            (CirclePhase::Sizing, false) => CirclePhase::AwaitingCenter,
            (other, _) => other,
        }
    }

    /// Klick/Tap ohne Drag: Mittelpunkt verwerfen.
    pub fn cancel(self) -> Self {
        match self {
            CirclePhase::Complete => CirclePhase::Complete,
            _ => CirclePhase::AwaitingCenter,
        }
    }

    /// Werden Zeiger-Bewegungen in den Radius übernommen?
    pub fn accepts_moves(self) -> bool {
        self == CirclePhase::Sizing
    }
}

/// Kreis-Erzeugungs-Modus
#[derive(Debug, Clone)]
pub struct DragCircleMode {
    /// Der gerade gezeichnete Kreis (im Host registriert)
    pub(crate) feature_id: Option<FeatureId>,
    pub(crate) phase: CirclePhase,
    /// Vertex-Zähler des Zeichen-Modus (Kreise setzen keine Einzel-Vertices)
    pub(crate) current_vertex_position: usize,
    /// Auflösung neu erzeugter Kreise
    pub(crate) steps: usize,
}

impl DragCircleMode {
    /// Erstellt den Modus mit der gegebenen Kreis-Auflösung.
    pub fn new(steps: usize) -> Self {
        Self {
            feature_id: None,
            phase: CirclePhase::AwaitingCenter,
            current_vertex_position: 0,
            steps,
        }
    }

    /// Aktuelle Phase.
    pub fn phase(&self) -> CirclePhase {
        self.phase
    }

    /// ID des gerade gezeichneten Kreises.
    pub fn feature_id(&self) -> Option<FeatureId> {
        self.feature_id
    }

    /// Stand des Vertex-Zählers.
    pub fn current_vertex_position(&self) -> usize {
        self.current_vertex_position
    }

    /// Mutable Kreis-Geometrie des gezeichneten Features.
    pub(crate) fn circle_mut<'h>(&self, host: &'h mut dyn DrawHost) -> Option<&'h mut CircleShape> {
        let id = self.feature_id?;
        let circle = host.feature_mut(id).and_then(|f| f.circle_mut());
        if circle.is_none() {
            log::warn!("draw_circle: Kreis {id} fehlt im Host");
        }
        circle
    }
}

impl Default for DragCircleMode {
    fn default() -> Self {
        Self::new(DEFAULT_CIRCLE_STEPS)
    }
}
