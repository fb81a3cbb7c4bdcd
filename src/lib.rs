//! Map-Draw Circle Library.
//! Kreis-Zeichenmodus samt kreisbewusster Selektionsmodi und Referenz-Host.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    DrawEvent, DrawHost, DrawIntent, DrawMode, DrawSession, DrawStore, EventTarget, MapEvent,
    ModeOptions, ModeSet,
};
pub use core::{circle_ring, distance_km, lng_lat, CircleShape, Feature, FeatureId, LngLat, Shape};
pub use shared::DrawOptions;
