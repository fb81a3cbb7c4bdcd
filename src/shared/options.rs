//! Zentrale Konfiguration der Zeichen-Modi.
//!
//! `DrawOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::DEFAULT_CIRCLE_STEPS;
use serde::{Deserialize, Serialize};

// ── Kreis ───────────────────────────────────────────────────────────

/// Standard-Auflösung neuer Kreise (Vertices ohne schließenden Punkt).
pub const CIRCLE_STEPS: usize = DEFAULT_CIRCLE_STEPS;

// ── Klick-Erkennung ─────────────────────────────────────────────────

/// Maximale Zeiger-Bewegung (px) zwischen Press und Release für einen Klick.
pub const CLICK_FINE_TOLERANCE_PX: f64 = 4.0;
/// Grobe Toleranz (px): gilt nur, wenn das Release innerhalb des Intervalls liegt.
pub const CLICK_GROSS_TOLERANCE_PX: f64 = 12.0;
/// Zeitfenster (ms) für die grobe Toleranz.
pub const CLICK_INTERVAL_MS: u64 = 500;

// ── Direct-Select ───────────────────────────────────────────────────

/// Mittelpunkte zwischen Vertices als Griffe anzeigen.
pub const DIRECT_SELECT_MIDPOINTS: bool = true;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Zeichen-Optionen.
/// Wird als `map_draw_circle.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawOptions {
    // ── Kreis ───────────────────────────────────────────────────
    /// Vertex-Anzahl neu erzeugter Kreise
    pub circle_steps: usize,

    // ── Klick-Erkennung ─────────────────────────────────────────
    /// Feine Klick-Toleranz in Screen-Pixeln
    pub click_fine_tolerance_px: f64,
    /// Grobe Klick-Toleranz in Screen-Pixeln
    pub click_gross_tolerance_px: f64,
    /// Zeitfenster der groben Toleranz in Millisekunden
    pub click_interval_ms: u64,

    // ── Direct-Select ───────────────────────────────────────────
    /// Mittelpunkt-Griffe bei Nicht-Kreis-Features anzeigen
    #[serde(default = "default_direct_select_midpoints")]
    pub direct_select_midpoints: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            circle_steps: CIRCLE_STEPS,
            click_fine_tolerance_px: CLICK_FINE_TOLERANCE_PX,
            click_gross_tolerance_px: CLICK_GROSS_TOLERANCE_PX,
            click_interval_ms: CLICK_INTERVAL_MS,
            direct_select_midpoints: DIRECT_SELECT_MIDPOINTS,
        }
    }
}

/// Serde-Default für `direct_select_midpoints` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_direct_select_midpoints() -> bool {
    DIRECT_SELECT_MIDPOINTS
}

impl DrawOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("map_draw_circle"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("map_draw_circle.toml")
    }

    /// Ist eine Zeiger-Bewegung zwischen Press und Release noch ein Klick?
    ///
    /// Innerhalb der feinen Toleranz immer, innerhalb der groben nur, wenn das
    /// Release schnell genug folgt.
    pub fn is_click(&self, moved_px: f64, elapsed_ms: u64) -> bool {
        moved_px < self.click_fine_tolerance_px
            || (moved_px < self.click_gross_tolerance_px && elapsed_ms < self.click_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_roundtrip_keeps_values() {
        let opts = DrawOptions {
            circle_steps: 32,
            click_fine_tolerance_px: 2.0,
            click_gross_tolerance_px: 8.0,
            click_interval_ms: 300,
            direct_select_midpoints: false,
        };
        let text = toml::to_string_pretty(&opts).expect("Serialisierung erwartet");
        let back: DrawOptions = toml::from_str(&text).expect("Deserialisierung erwartet");
        assert_eq!(back, opts);
    }

    #[test]
    fn missing_midpoints_key_uses_default() {
        let text = "circle_steps = 64\nclick_fine_tolerance_px = 4.0\n\
                    click_gross_tolerance_px = 12.0\nclick_interval_ms = 500\n";
        let opts: DrawOptions = toml::from_str(text).expect("Deserialisierung erwartet");
        assert!(opts.direct_select_midpoints);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("map_draw_circle_does_not_exist.toml");
        assert_eq!(DrawOptions::load_from_file(&path), DrawOptions::default());
    }

    #[test]
    fn save_and_load_file() {
        let path = std::env::temp_dir().join(format!(
            "map_draw_circle_options_{}.toml",
            std::process::id()
        ));
        let opts = DrawOptions {
            circle_steps: 128,
            ..DrawOptions::default()
        };
        opts.save_to_file(&path).expect("Speichern erwartet");
        let loaded = DrawOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, opts);
    }

    #[test]
    fn click_classification() {
        let opts = DrawOptions::default();
        assert!(opts.is_click(0.0, 5_000));
        assert!(opts.is_click(3.9, 5_000));
        assert!(opts.is_click(10.0, 100));
        assert!(!opts.is_click(10.0, 600));
        assert!(!opts.is_click(20.0, 10));
    }
}
