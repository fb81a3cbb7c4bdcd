//! Kardinal-Handles: vier Resize-Griffe eines Kreis-Rings statt aller Vertices.

use super::geo::LngLat;

/// Ein Resize-Griff auf dem Kreis-Ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardinalHandle {
    /// Vertex-Index im Ring
    pub index: usize,
    /// Position des Vertex
    pub position: LngLat,
}

/// Wählt bis zu vier Vertices in Viertel-Abständen aus einem Ring.
///
/// Ein schließender Punkt (erster == letzter) wird ignoriert. Bei `n >= 4`
/// Vertices liegen die Indizes bei `round(k·n/4)` für k = 0..3, proportional
/// zur Ringlänge. Kürzere Ringe liefern alle vorhandenen Vertices.
pub fn cardinal_handles(ring: &[LngLat]) -> Vec<CardinalHandle> {
    let vertices = open_ring(ring);
    let n = vertices.len();

    if n < 4 {
        return vertices
            .iter()
            .enumerate()
            .map(|(index, &position)| CardinalHandle { index, position })
            .collect();
    }

    (0..4)
        .map(|k| {
            let index = ((k * n) as f64 / 4.0).round() as usize % n;
            CardinalHandle {
                index,
                position: vertices[index],
            }
        })
        .collect()
}

/// Schneidet den schließenden Punkt ab, falls vorhanden.
fn open_ring(ring: &[LngLat]) -> &[LngLat] {
    match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}
