//! Kreis-Erzeugung per Drag: Drücken setzt den Mittelpunkt, Ziehen bestimmt
//! den Radius, Loslassen übergibt den fertigen Kreis an simple_select.

mod lifecycle;
mod state;

pub use state::{CirclePhase, DragCircleMode};
