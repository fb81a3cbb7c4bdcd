//! Session-Controller für zentrale Event-Verarbeitung.
//!
//! Verteilt Zeiger-Events an den aktiven Modus, klassifiziert Press/Release als
//! Klick oder Drag und führt angeforderte Modus-Wechsel aus
//! (`on_stop` des alten, dann `on_setup` des neuen Modus).

use super::display::DisplayFeature;
use super::events::{DrawIntent, MapEvent};
use super::host::{DrawEvent, DrawHost, ModeOptions};
use super::modes::{DrawMode, ModeManager, ModeSet, SIMPLE_SELECT};
use super::store::DrawStore;
use crate::shared::DrawOptions;
use anyhow::bail;
use glam::DVec2;

/// Obergrenze verketteter Modus-Wechsel pro Event.
const MAX_CHAINED_MODE_CHANGES: usize = 8;

/// Position und Zeit des letzten Drucks.
#[derive(Debug, Clone, Copy)]
struct PressInfo {
    point: DVec2,
    time_ms: u64,
}

/// Orchestriert Zeiger-Events, Modi und den Feature-Store.
pub struct DrawSession {
    store: DrawStore,
    modes: ModeManager,
    options: DrawOptions,
    press: Option<PressInfo>,
}

impl DrawSession {
    /// Erstellt eine Session mit leerem Store im Modus `simple_select`.
    pub fn new(options: DrawOptions, set: ModeSet) -> Self {
        Self::with_store(DrawStore::new(), options, set)
    }

    /// Erstellt eine Session auf einem vorhandenen Store.
    pub fn with_store(store: DrawStore, options: DrawOptions, set: ModeSet) -> Self {
        let modes = ModeManager::new(set, &options);
        let mut session = Self {
            store,
            modes,
            options,
            press: None,
        };
        if let Err(e) = session.switch_mode(SIMPLE_SELECT, &ModeOptions::default()) {
            log::warn!("Start-Modus nicht verfügbar: {e:#}");
        }
        session
    }

    /// Feature-Store (read-only).
    pub fn store(&self) -> &DrawStore {
        &self.store
    }

    /// Feature-Store (mutable, z.B. für Import).
    pub fn store_mut(&mut self) -> &mut DrawStore {
        &mut self.store
    }

    /// Aktive Optionen.
    pub fn options(&self) -> &DrawOptions {
        &self.options
    }

    /// Name des aktiven Modus.
    pub fn mode_name(&self) -> Option<&'static str> {
        self.modes.active_name()
    }

    /// Aktiver Modus.
    pub fn active_mode(&self) -> Option<&dyn DrawMode> {
        self.modes.active_mode()
    }

    /// Verarbeitet einen Intent.
    pub fn handle_intent(&mut self, intent: DrawIntent) -> anyhow::Result<()> {
        match intent {
            DrawIntent::MouseDown(event) => {
                self.mouse_down(event);
            }
            DrawIntent::MouseMove(event) => {
                self.mouse_move(event);
            }
            DrawIntent::MouseUp(event) => {
                self.mouse_up(event);
            }
            DrawIntent::TouchStart(event) => {
                self.touch_start(event);
            }
            DrawIntent::TouchMove(event) => {
                self.touch_move(event);
            }
            DrawIntent::TouchEnd(event) => {
                self.touch_end(event);
            }
            DrawIntent::Trash => self.trash(),
            DrawIntent::ChangeMode { mode, options } => self.change_mode(&mode, options)?,
        }
        Ok(())
    }

    /// Wechselt explizit den Modus. Unbekannte Namen sind ein Fehler.
    pub fn change_mode(&mut self, mode: &str, options: ModeOptions) -> anyhow::Result<()> {
        self.switch_mode(mode, &options)?;
        self.apply_pending_mode_changes();
        Ok(())
    }

    // ── Zeiger-Events ───────────────────────────────────────────

    /// Maustaste gedrückt.
    pub fn mouse_down(&mut self, event: MapEvent) -> MapEvent {
        self.press = Some(PressInfo {
            point: event.point,
            time_ms: event.time_ms,
        });
        self.dispatch(event, |mode, host, e| mode.on_mouse_down(host, e))
    }

    /// Maus bewegt. Solange gedrückt, wird ein Drag gemeldet, sobald der
    /// Zeiger die Klick-Toleranz verlässt.
    pub fn mouse_move(&mut self, event: MapEvent) -> MapEvent {
        match self.press {
            Some(press) => self.drag_or_hold(press, event),
            None => self.dispatch(event, |mode, host, e| mode.on_mouse_move(host, e)),
        }
    }

    /// Maustaste losgelassen: Klick oder Drag-Ende.
    pub fn mouse_up(&mut self, event: MapEvent) -> MapEvent {
        if self.take_click(&event) {
            self.dispatch(event, |mode, host, e| mode.on_click(host, e))
        } else {
            self.dispatch(event, |mode, host, e| mode.on_mouse_up(host, e))
        }
    }

    /// Touch begonnen.
    pub fn touch_start(&mut self, event: MapEvent) -> MapEvent {
        self.press = Some(PressInfo {
            point: event.point,
            time_ms: event.time_ms,
        });
        self.dispatch(event, |mode, host, e| mode.on_touch_start(host, e))
    }

    /// Touch bewegt (immer mit Kontakt).
    pub fn touch_move(&mut self, event: MapEvent) -> MapEvent {
        let press = self.press.unwrap_or(PressInfo {
            point: event.point,
            time_ms: event.time_ms,
        });
        self.drag_or_hold(press, event)
    }

    /// Touch beendet: Tap oder Drag-Ende.
    pub fn touch_end(&mut self, event: MapEvent) -> MapEvent {
        if self.take_click(&event) {
            self.dispatch(event, |mode, host, e| mode.on_tap(host, e))
        } else {
            self.dispatch(event, |mode, host, e| mode.on_touch_end(host, e))
        }
    }

    /// Löschen-Aktion an den aktiven Modus.
    pub fn trash(&mut self) {
        if let Some(mode) = self.modes.active_mode_mut() {
            mode.on_trash(&mut self.store);
        }
        self.apply_pending_mode_changes();
    }

    // ── Darstellung ─────────────────────────────────────────────

    /// Sammelt alle Darstellungs-Features des aktiven Modus.
    pub fn render(&mut self) -> Vec<DisplayFeature> {
        let mut out = Vec::new();
        let Some(mode) = self.modes.active_mode() else {
            log::warn!("Render ohne aktiven Modus");
            return out;
        };
        for id in self.store.feature_ids() {
            let Some(feature) = self.store.feature(id) else {
                continue;
            };
            let base = DisplayFeature::from_feature(feature);
            mode.to_display_features(&mut self.store, base, &mut |f| out.push(f));
        }
        out
    }

    // ── Intern ──────────────────────────────────────────────────

    fn is_click(&self, press: PressInfo, event: &MapEvent) -> bool {
        let moved = press.point.distance(event.point);
        let elapsed = event.time_ms.saturating_sub(press.time_ms);
        self.options.is_click(moved, elapsed)
    }

    /// Beendet den Druck und prüft, ob es ein Klick war.
    fn take_click(&mut self, event: &MapEvent) -> bool {
        match self.press.take() {
            Some(press) => self.is_click(press, event),
            None => true,
        }
    }

    fn drag_or_hold(&mut self, press: PressInfo, mut event: MapEvent) -> MapEvent {
        if self.is_click(press, &event) {
            event.stop_propagation();
            return event;
        }
        self.dispatch(event, |mode, host, e| mode.on_drag(host, e))
    }

    fn dispatch(
        &mut self,
        mut event: MapEvent,
        handler: impl FnOnce(&mut dyn DrawMode, &mut dyn DrawHost, &mut MapEvent),
    ) -> MapEvent {
        match self.modes.active_mode_mut() {
            Some(mode) => handler(mode, &mut self.store, &mut event),
            None => log::warn!("Event ohne aktiven Modus verworfen"),
        }
        self.apply_pending_mode_changes();
        event
    }

    fn switch_mode(&mut self, name: &str, options: &ModeOptions) -> anyhow::Result<()> {
        if !self.modes.contains(name) {
            bail!("Unbekannter Modus '{name}'");
        }
        if let Some(old) = self.modes.active_mode_mut() {
            old.on_stop(&mut self.store);
        }
        self.modes.set_active(name);
        self.store.fire(DrawEvent::ModeChange(name.to_string()));
        if let Some(new) = self.modes.active_mode_mut() {
            new.on_setup(&mut self.store, options);
        }
        log::debug!("Modus gewechselt zu '{name}'");
        Ok(())
    }

    fn apply_pending_mode_changes(&mut self) {
        for _ in 0..MAX_CHAINED_MODE_CHANGES {
            let Some((name, options)) = self.store.take_mode_change() else {
                return;
            };
            if let Err(e) = self.switch_mode(&name, &options) {
                log::warn!("Modus-Wechsel verworfen: {e:#}");
            }
        }
        if self.store.take_mode_change().is_some() {
            log::warn!("Zu viele verkettete Modus-Wechsel, Rest verworfen");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modes::{DIRECT_SELECT, DRAW_CIRCLE};
    use crate::core::lng_lat;

    fn session() -> DrawSession {
        DrawSession::new(DrawOptions::default(), ModeSet::CircleAware)
    }

    #[test]
    fn starts_in_simple_select() {
        let session = session();
        assert_eq!(session.mode_name(), Some(SIMPLE_SELECT));
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let mut session = session();
        assert!(session.change_mode("draw_polygon", ModeOptions::default()).is_err());
        assert_eq!(session.mode_name(), Some(SIMPLE_SELECT));

        let mut stock = DrawSession::new(DrawOptions::default(), ModeSet::Stock);
        assert!(stock.change_mode(DRAW_CIRCLE, ModeOptions::default()).is_err());
    }

    #[test]
    fn small_movement_is_not_a_drag() {
        let mut session = session();
        session
            .change_mode(DRAW_CIRCLE, ModeOptions::default())
            .expect("Modus erwartet");
        session.mouse_down(MapEvent::new(lng_lat(0.0, 0.0), DVec2::new(100.0, 100.0), 0));
        let moved =
            session.mouse_move(MapEvent::new(lng_lat(0.0, 0.01), DVec2::new(102.0, 100.0), 10));
        assert!(moved.is_propagation_stopped());

        // Release innerhalb der Toleranz: Klick, Kreis verworfen
        session.mouse_up(MapEvent::new(lng_lat(0.0, 0.01), DVec2::new(102.0, 100.0), 20));
        assert_eq!(session.mode_name(), Some(DRAW_CIRCLE));
    }

    #[test]
    fn failed_direct_select_falls_back() {
        let mut session = session();
        session
            .change_mode(DIRECT_SELECT, ModeOptions::direct(42))
            .expect("Modus erwartet");
        assert_eq!(session.mode_name(), Some(SIMPLE_SELECT));
    }
}
