use approx::assert_relative_eq;
use glam::DVec2;
use map_draw_circle::app::{EventTarget, DRAW_CIRCLE, SIMPLE_SELECT};
use map_draw_circle::core::{ShapeKind, DEFAULT_CIRCLE_STEPS};
use map_draw_circle::{
    lng_lat, DrawHost, DrawOptions, DrawSession, DrawStore, Feature, MapEvent, ModeOptions,
    ModeSet, Shape,
};

const MIXED_COLLECTION: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "id": 4,
            "properties": { "isCircle": true, "center": [8.0, 47.0], "radiusInKm": 12.5, "name": "Zone A" },
            "geometry": { "type": "Polygon", "coordinates": [[[8.0, 47.1], [7.9, 47.0], [8.0, 46.9], [8.1, 47.0], [8.0, 47.1]]] }
        },
        {
            "type": "Feature",
            "properties": {},
            "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] }
        },
        {
            "type": "Feature",
            "id": 9,
            "properties": { "kind": "poi" },
            "geometry": { "type": "Point", "coordinates": [3.0, 4.0] }
        }
    ]
}"#;

#[test]
fn test_import_restores_circle_from_properties() {
    let mut store = DrawStore::new();
    let ids = store
        .import_geojson(MIXED_COLLECTION)
        .expect("Import sollte gelingen");
    assert_eq!(ids, vec![4, 2, 9]);

    let circle_feature = store.feature(4).expect("Kreis 4");
    assert_eq!(circle_feature.kind(), ShapeKind::Circle);
    let circle = circle_feature.circle().expect("Kreis");
    assert_eq!(circle.center(), Some(lng_lat(8.0, 47.0)));
    assert_relative_eq!(circle.radius_km(), 12.5);
    // Der gespeicherte 4-Segment-Ring wird mit Standard-Auflösung neu erzeugt
    assert_eq!(circle.steps(), DEFAULT_CIRCLE_STEPS);
    assert_eq!(circle.ring().len(), DEFAULT_CIRCLE_STEPS + 1);
    assert_eq!(
        circle_feature.properties.get("name"),
        Some(&serde_json::json!("Zone A"))
    );
    assert!(!circle_feature.properties.contains_key("isCircle"));

    assert_eq!(store.feature(2).map(|f| f.kind()), Some(ShapeKind::LineString));
    assert_eq!(store.feature(9).map(|f| f.kind()), Some(ShapeKind::Point));
    assert_eq!(store.next_feature_id(), 10);
}

#[test]
fn test_drawn_circle_survives_export_and_import() {
    let mut session = DrawSession::new(DrawOptions::default(), ModeSet::CircleAware);
    session
        .change_mode(DRAW_CIRCLE, ModeOptions::default())
        .expect("draw_circle sollte verfügbar sein");
    session.mouse_down(MapEvent::new(lng_lat(13.4, 52.5), DVec2::new(0.0, 0.0), 0));
    session.mouse_move(MapEvent::new(lng_lat(13.5, 52.5), DVec2::new(90.0, 0.0), 50));
    session.mouse_up(MapEvent::new(lng_lat(13.5, 52.5), DVec2::new(90.0, 0.0), 100));

    let json = session.store().export_geojson().expect("Export sollte gelingen");
    let drawn = session
        .store()
        .feature(1)
        .and_then(|f| f.circle())
        .expect("Kreis")
        .clone();

    let mut reloaded = DrawStore::new();
    reloaded.import_geojson(&json).expect("Import sollte gelingen");
    let circle = reloaded.feature(1).and_then(|f| f.circle()).expect("Kreis");
    assert_eq!(circle.center(), drawn.center());
    assert_relative_eq!(circle.radius_km(), drawn.radius_km(), epsilon = 1e-12);
    assert_eq!(circle.ring().len(), drawn.ring().len());
}

#[test]
fn test_imported_circle_can_be_dragged() {
    let mut store = DrawStore::new();
    store
        .import_geojson(MIXED_COLLECTION)
        .expect("Import sollte gelingen");
    let mut session = DrawSession::with_store(store, DrawOptions::default(), ModeSet::CircleAware);
    session
        .change_mode(SIMPLE_SELECT, ModeOptions::select(vec![4]))
        .expect("simple_select sollte verfügbar sein");

    session.mouse_down(
        MapEvent::new(lng_lat(8.0, 47.0), DVec2::new(0.0, 0.0), 0)
            .with_target(EventTarget::Feature(4)),
    );
    session.mouse_move(MapEvent::new(lng_lat(9.0, 46.0), DVec2::new(50.0, 50.0), 80));
    session.mouse_up(MapEvent::new(lng_lat(9.0, 46.0), DVec2::new(50.0, 50.0), 120));

    let circle = session.store().feature(4).and_then(|f| f.circle()).expect("Kreis");
    let center = circle.center().expect("Mittelpunkt");
    assert_relative_eq!(center.x, 9.0, epsilon = 1e-12);
    assert_relative_eq!(center.y, 46.0, epsilon = 1e-12);

    let json = session.store().export_geojson().expect("Export sollte gelingen");
    assert!(json.contains("\"isCircle\": true"));
}

#[test]
fn test_malformed_collection_is_rejected() {
    let mut store = DrawStore::new();
    assert!(store.import_geojson("{ \"type\": \"Feature\" }").is_err());
    assert!(store.import_geojson("kein json").is_err());
    assert!(store.is_empty());
}

#[test]
fn test_import_rejects_id_without_successor() {
    let json = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 18446744073709551615,
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [1.0, 2.0] }
            }
        ]
    }"#;
    let mut store = DrawStore::new();
    let err = store.import_geojson(json).expect_err("Import sollte fehlschlagen");
    assert!(err.to_string().contains("18446744073709551615"));
    assert!(store.is_empty());
    assert_eq!(store.next_feature_id(), 1);
}

#[test]
fn test_add_feature_with_max_id_does_not_overflow() {
    let mut store = DrawStore::new();
    store.add_feature(Feature::new(u64::MAX, Shape::Point(lng_lat(0.0, 0.0))));
    assert_eq!(store.next_feature_id(), u64::MAX);
    assert_eq!(store.next_feature_id(), u64::MAX);
}
