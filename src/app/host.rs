//! Host-Vertrag: alles, was ein Zeichen-Modus vom umgebenden Toolkit braucht.
//!
//! `DrawHost` bündelt Feature-Registry, Selektion, Modus-Wechsel, Gesten-Schalter
//! und Benachrichtigungen. Der generische Verschieber und die generischen
//! Zusatzpunkte sind als Default-Methoden hinterlegt und können von einem Host
//! ersetzt werden.

use super::display::{self, DisplayFeature, SupplementaryOptions};
use super::movement;
use crate::core::{CoordPath, Feature, FeatureId, LngLat};
use glam::DVec2;

/// Cursor-Form, die ein Modus anfordert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Standard-Cursor
    #[default]
    Default,
    /// Hinzufügen (Zeichnen)
    Add,
    /// Verschieben
    Move,
    /// Zeiger über anklickbarem Feature
    Pointer,
}

/// Welche Aktionen aktuell möglich sind (für Toolbar-Buttons).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionableState {
    /// Löschen möglich
    pub trash: bool,
    /// Zusammenfassen möglich
    pub combine_features: bool,
    /// Aufteilen möglich
    pub uncombine_features: bool,
}

impl ActionableState {
    /// Nur `trash` gesetzt.
    pub fn trash(trash: bool) -> Self {
        Self {
            trash,
            ..Self::default()
        }
    }
}

/// Optionen beim Modus-Wechsel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeOptions {
    /// Zu selektierende Features (simple_select)
    pub feature_ids: Vec<FeatureId>,
    /// Zu bearbeitendes Feature (direct_select)
    pub feature_id: Option<FeatureId>,
    /// Vorselektierter Vertex (direct_select)
    pub coord_path: Option<CoordPath>,
    /// Start-Position eines sofortigen Drags (direct_select)
    pub start_pos: Option<LngLat>,
}

impl ModeOptions {
    /// Optionen für simple_select mit vorgegebener Selektion.
    pub fn select(feature_ids: Vec<FeatureId>) -> Self {
        Self {
            feature_ids,
            ..Self::default()
        }
    }

    /// Optionen für direct_select auf einem Feature.
    pub fn direct(feature_id: FeatureId) -> Self {
        Self {
            feature_id: Some(feature_id),
            ..Self::default()
        }
    }
}

/// Art einer Geometrie-Änderung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    /// Ganze Features verschoben
    Move,
    /// Einzelne Koordinaten geändert (Vertex-Drag, Resize)
    ChangeCoordinates,
}

/// Benachrichtigungen an die Anwendung.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    /// Neue Features fertiggestellt
    Create(Vec<FeatureId>),
    /// Geometrie geändert
    Update {
        /// Art der Änderung
        action: UpdateAction,
        /// Betroffene Features
        features: Vec<FeatureId>,
    },
    /// Features gelöscht
    Delete(Vec<FeatureId>),
    /// Aktiver Modus gewechselt
    ModeChange(String),
    /// Selektion geändert
    SelectionChange(Vec<FeatureId>),
}

/// Schnittstelle des Hosts für Zeichen-Modi.
///
/// Jeder Handler erhält `&mut dyn DrawHost` für genau ein Event.
pub trait DrawHost {
    // ── Feature-Registry ────────────────────────────────────────

    /// Reserviert eine neue, eindeutige Feature-ID.
    fn next_feature_id(&mut self) -> FeatureId;

    /// Registriert ein Feature (ersetzt ein vorhandenes mit gleicher ID).
    fn add_feature(&mut self, feature: Feature);

    /// Feature per ID.
    fn feature(&self, id: FeatureId) -> Option<&Feature>;

    /// Mutable Feature per ID.
    fn feature_mut(&mut self, id: FeatureId) -> Option<&mut Feature>;

    /// Entfernt Features (auch aus der Selektion).
    fn delete_features(&mut self, ids: &[FeatureId]);

    /// Alle Feature-IDs in Einfüge-Reihenfolge.
    fn feature_ids(&self) -> Vec<FeatureId>;

    // ── Selektion ───────────────────────────────────────────────

    /// Selektierte IDs in Selektions-Reihenfolge.
    fn selected_ids(&self) -> Vec<FeatureId>;

    /// Ist das Feature selektiert?
    fn is_selected(&self, id: FeatureId) -> bool;

    /// Ersetzt die Selektion.
    fn set_selected(&mut self, ids: &[FeatureId]);

    /// Leert die Selektion.
    fn clear_selected_features(&mut self);

    // ── Modus ───────────────────────────────────────────────────

    /// Fordert einen Modus-Wechsel an (wird nach dem aktuellen Event ausgeführt).
    fn change_mode(&mut self, mode: &str, options: ModeOptions);

    // ── Gesten und UI ───────────────────────────────────────────

    /// Doppelklick-Zoom der Karte ein-/ausschalten.
    fn set_double_click_zoom(&mut self, enabled: bool);

    /// Karten-Pan per Drag ein-/ausschalten.
    fn set_drag_pan(&mut self, enabled: bool);

    /// Cursor-Form setzen.
    fn set_cursor(&mut self, cursor: Cursor);

    /// Mögliche Aktionen setzen.
    fn set_actionable_state(&mut self, state: ActionableState);

    /// Signalisiert der UI, die möglichen Aktionen neu zu lesen.
    fn fire_actionable(&mut self);

    /// Sendet eine Benachrichtigung.
    fn fire(&mut self, event: DrawEvent);

    // ── Generische Helfer ───────────────────────────────────────

    /// Verschiebt alle Vertices der Features um `delta` (mit Breiten-/Längen-Begrenzung).
    ///
    /// Gibt das tatsächlich angewendete Delta zurück.
    fn move_features(&mut self, ids: &[FeatureId], delta: DVec2) -> DVec2 {
        movement::move_features(self, ids, delta)
    }

    /// Erzeugt Vertex- und Mittelpunkt-Griffe eines angezeigten Features.
    fn create_supplementary_points(
        &self,
        feature: &DisplayFeature,
        options: &SupplementaryOptions,
    ) -> Vec<DisplayFeature> {
        display::create_supplementary_points(feature, options)
    }
}
