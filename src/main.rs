//! Map-Draw Circle Demo.
//!
//! Spielt eine aufgezeichnete Zeiger-Sequenz gegen den Referenz-Host ab
//! (Kreis zeichnen, verschieben, Radius ändern) und gibt die Features als
//! GeoJSON aus.

use glam::DVec2;
use map_draw_circle::app::{EventTarget, DIRECT_SELECT, DRAW_CIRCLE};
use map_draw_circle::core::CoordPath;
use map_draw_circle::{
    lng_lat, DrawIntent, DrawOptions, DrawSession, FeatureId, MapEvent, ModeOptions, ModeSet,
};

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Map-Draw Circle v{} startet...", env!("CARGO_PKG_VERSION"));

    let config_path = DrawOptions::config_path();
    let options = DrawOptions::load_from_file(&config_path);

    let mut session = DrawSession::new(options, ModeSet::CircleAware);
    let first_id = session.store().len() as FeatureId + 1;

    for intent in demo_script(first_id) {
        session.handle_intent(intent)?;
    }

    for event in session.store_mut().take_events() {
        log::info!("Event: {event:?}");
    }
    log::info!("Modus am Ende: {:?}", session.mode_name());

    println!("{}", session.store().export_geojson()?);
    Ok(())
}

/// Zeiger-Event an Karten- und Bildschirmposition.
fn pointer(lng: f64, lat: f64, px: f64, py: f64, time_ms: u64) -> MapEvent {
    MapEvent::new(lng_lat(lng, lat), DVec2::new(px, py), time_ms)
}

/// Kreis um (13.4, 52.5) aufziehen, verschieben und am West-Handle vergrößern.
fn demo_script(circle_id: FeatureId) -> Vec<DrawIntent> {
    let feature = EventTarget::Feature(circle_id);
    let west_handle = EventTarget::Vertex {
        parent: circle_id,
        coord_path: CoordPath::new(0, 16),
    };
    vec![
        DrawIntent::ChangeMode {
            mode: DRAW_CIRCLE.to_string(),
            options: ModeOptions::default(),
        },
        DrawIntent::MouseDown(pointer(13.4, 52.5, 400.0, 300.0, 0)),
        DrawIntent::MouseMove(pointer(13.45, 52.52, 440.0, 280.0, 80)),
        DrawIntent::MouseMove(pointer(13.5, 52.55, 480.0, 260.0, 160)),
        DrawIntent::MouseUp(pointer(13.5, 52.55, 480.0, 260.0, 200)),
        // Verschieben in simple_select
        DrawIntent::MouseDown(pointer(13.4, 52.5, 400.0, 300.0, 1000).with_target(feature)),
        DrawIntent::MouseMove(pointer(13.6, 52.4, 560.0, 380.0, 1100)),
        DrawIntent::MouseUp(pointer(13.6, 52.4, 560.0, 380.0, 1200)),
        // Radius in direct_select
        DrawIntent::ChangeMode {
            mode: DIRECT_SELECT.to_string(),
            options: ModeOptions::direct(circle_id),
        },
        DrawIntent::MouseDown(pointer(13.5, 52.4, 500.0, 380.0, 2000).with_target(west_handle)),
        DrawIntent::MouseMove(pointer(13.3, 52.4, 340.0, 380.0, 2100)),
        DrawIntent::MouseUp(pointer(13.3, 52.4, 340.0, 380.0, 2200)),
    ]
}
