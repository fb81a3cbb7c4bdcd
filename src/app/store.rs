//! In-Memory-Host: Feature-Store, Selektion, Gesten-Flags und Event-Log.

use super::host::{ActionableState, Cursor, DrawEvent, DrawHost, ModeOptions};
use crate::core::{parse_feature_collection, write_feature_collection, Feature, FeatureId};
use anyhow::anyhow;
use indexmap::{IndexMap, IndexSet};

/// Referenz-Implementierung von `DrawHost`.
///
/// Features und Selektion behalten ihre Einfüge-Reihenfolge, damit
/// Darstellung und Export deterministisch sind.
#[derive(Debug)]
pub struct DrawStore {
    features: IndexMap<FeatureId, Feature>,
    selected: IndexSet<FeatureId>,
    next_id: FeatureId,
    double_click_zoom: bool,
    drag_pan: bool,
    cursor: Cursor,
    actionable: ActionableState,
    actionable_fired: usize,
    pending_mode: Option<(String, ModeOptions)>,
    events: Vec<DrawEvent>,
}

impl Default for DrawStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawStore {
    /// Erstellt einen leeren Store mit aktivierten Karten-Gesten.
    pub fn new() -> Self {
        Self {
            features: IndexMap::new(),
            selected: IndexSet::new(),
            next_id: 1,
            double_click_zoom: true,
            drag_pan: true,
            cursor: Cursor::Default,
            actionable: ActionableState::default(),
            actionable_fired: 0,
            pending_mode: None,
            events: Vec::new(),
        }
    }

    /// Anzahl der Features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Ist der Store leer?
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Alle Features in Einfüge-Reihenfolge.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Ist Doppelklick-Zoom aktiv?
    pub fn double_click_zoom_enabled(&self) -> bool {
        self.double_click_zoom
    }

    /// Ist Karten-Pan per Drag aktiv?
    pub fn drag_pan_enabled(&self) -> bool {
        self.drag_pan
    }

    /// Aktueller Cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Zuletzt gesetzter Aktions-Zustand.
    pub fn actionable_state(&self) -> ActionableState {
        self.actionable
    }

    /// Wie oft `fire_actionable` aufgerufen wurde.
    pub fn actionable_fire_count(&self) -> usize {
        self.actionable_fired
    }

    /// Bisher gesendete Benachrichtigungen.
    pub fn events(&self) -> &[DrawEvent] {
        &self.events
    }

    /// Entnimmt alle gesendeten Benachrichtigungen.
    pub fn take_events(&mut self) -> Vec<DrawEvent> {
        std::mem::take(&mut self.events)
    }

    /// Entnimmt einen angeforderten Modus-Wechsel.
    pub fn take_mode_change(&mut self) -> Option<(String, ModeOptions)> {
        self.pending_mode.take()
    }

    /// Exportiert alle gültigen Features als GeoJSON-FeatureCollection.
    pub fn export_geojson(&self) -> anyhow::Result<String> {
        write_feature_collection(self.features.values().filter(|f| f.is_valid()))
    }

    /// Importiert eine GeoJSON-FeatureCollection.
    ///
    /// Gibt die IDs der importierten Features zurück. Die ID-Vergabe läuft
    /// danach oberhalb der höchsten importierten ID weiter.
    pub fn import_geojson(&mut self, json: &str) -> anyhow::Result<Vec<FeatureId>> {
        let imported = parse_feature_collection(json, self.next_id)?;
        let mut next_id = self.next_id;
        for feature in &imported {
            let id = feature.id;
            let after = id
                .checked_add(1)
                .ok_or_else(|| anyhow!("Feature-ID {id} ist zu groß für die ID-Vergabe"))?;
            next_id = next_id.max(after);
        }

        let mut ids = Vec::with_capacity(imported.len());
        for feature in imported {
            ids.push(feature.id);
            self.features.insert(feature.id, feature);
        }
        self.next_id = next_id;
        log::info!("{} Features importiert", ids.len());
        Ok(ids)
    }
}

impl DrawHost for DrawStore {
    fn next_feature_id(&mut self) -> FeatureId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn add_feature(&mut self, feature: Feature) {
        self.next_id = self.next_id.max(feature.id.saturating_add(1));
        self.features.insert(feature.id, feature);
    }

    fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }

    fn feature_mut(&mut self, id: FeatureId) -> Option<&mut Feature> {
        self.features.get_mut(&id)
    }

    fn delete_features(&mut self, ids: &[FeatureId]) {
        let mut selection_changed = false;
        for id in ids {
            self.features.shift_remove(id);
            selection_changed |= self.selected.shift_remove(id);
        }
        if selection_changed {
            let selected = self.selected_ids();
            self.fire(DrawEvent::SelectionChange(selected));
        }
    }

    fn feature_ids(&self) -> Vec<FeatureId> {
        self.features.keys().copied().collect()
    }

    fn selected_ids(&self) -> Vec<FeatureId> {
        self.selected.iter().copied().collect()
    }

    fn is_selected(&self, id: FeatureId) -> bool {
        self.selected.contains(&id)
    }

    fn set_selected(&mut self, ids: &[FeatureId]) {
        let next: IndexSet<FeatureId> = ids
            .iter()
            .copied()
            .filter(|id| self.features.contains_key(id))
            .collect();
        if next != self.selected {
            self.selected = next;
            let selected = self.selected_ids();
            self.fire(DrawEvent::SelectionChange(selected));
        }
    }

    fn clear_selected_features(&mut self) {
        self.set_selected(&[]);
    }

    fn change_mode(&mut self, mode: &str, options: ModeOptions) {
        if let Some((previous, _)) = &self.pending_mode {
            log::debug!("Modus-Wechsel nach '{previous}' durch '{mode}' ersetzt");
        }
        self.pending_mode = Some((mode.to_string(), options));
    }

    fn set_double_click_zoom(&mut self, enabled: bool) {
        self.double_click_zoom = enabled;
    }

    fn set_drag_pan(&mut self, enabled: bool) {
        self.drag_pan = enabled;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_actionable_state(&mut self, state: ActionableState) {
        self.actionable = state;
    }

    fn fire_actionable(&mut self) {
        self.actionable_fired += 1;
    }

    fn fire(&mut self, event: DrawEvent) {
        log::debug!("Draw-Event: {:?}", event);
        self.events.push(event);
    }
}
