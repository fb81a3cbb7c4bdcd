//! Application-Layer: Host-Vertrag, Store, Modi und Session.

pub mod display;
pub mod events;
pub mod host;
/// Zeichen-Modi
///
/// Standard-Modi (`simple_select`, `direct_select`) und ihre kreisbewussten
/// Gegenstücke sowie der Zeichenmodus `draw_circle`.
pub mod modes;
pub mod movement;
pub mod session;
pub mod store;

pub use display::{
    create_supplementary_points, create_supplementary_points_for_circle, ActiveState,
    DisplayFeature, DisplayMeta, SupplementaryOptions,
};
pub use events::{DrawIntent, EventTarget, MapEvent};
pub use host::{ActionableState, Cursor, DrawEvent, DrawHost, ModeOptions, UpdateAction};
pub use modes::{
    CircleDirectMode, CirclePhase, CircleSelectMode, DirectSelectMode, DragCircleMode, DrawMode,
    ModeManager, ModeSet, SimpleSelectMode, DIRECT_SELECT, DRAW_CIRCLE, SIMPLE_SELECT,
};
pub use movement::{constrain_feature_movement, move_features};
pub use session::DrawSession;
pub use store::DrawStore;
