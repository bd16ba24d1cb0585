//! Selection, camera and pinning contracts for the force-graph frontend.
//! These are presentation-side rules with no fallible operations.

use serde::Serialize;
use std::collections::HashMap;

/// At most one node is selected at a time. Selecting a node is also the
/// signal for the inspector panel to open; that side effect lives outside
/// this module, which only tracks the current id.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    current: Option<String>,
}

impl Selection {
    pub fn select(&mut self, id: &str) {
        self.current = Some(id.to_owned());
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Border-highlight predicate for the renderer.
    pub fn is_selected(&self, id: &str) -> bool {
        self.current.as_deref() == Some(id)
    }
}

const FOCUS_ZOOM: f64 = 3.0;
const FOCUS_DURATION_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CameraTransition {
    pub center_x: f64,
    pub center_y: f64,
    pub zoom: f64,
    pub duration_ms: u64,
}

/// Click-to-focus: recenter on the node and make sure a minimum zoom level
/// is reached, without zooming out a user who is already closer.
pub fn focus_on(node_x: f64, node_y: f64, current_zoom: f64) -> CameraTransition {
    CameraTransition {
        center_x: node_x,
        center_y: node_y,
        zoom: current_zoom.max(FOCUS_ZOOM),
        duration_ms: FOCUS_DURATION_MS,
    }
}

/// Nodes pinned in place after a drag. Pinned nodes are excluded from the
/// physics simulation; there is no release mechanism.
#[derive(Clone, Debug, Default)]
pub struct PinBoard {
    pinned: HashMap<String, (f64, f64)>,
}

impl PinBoard {
    pub fn pin(&mut self, id: &str, x: f64, y: f64) {
        self.pinned.insert(id.to_owned(), (x, y));
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pinned.contains_key(id)
    }

    pub fn position(&self, id: &str) -> Option<(f64, f64)> {
        self.pinned.get(id).copied()
    }
}

/// Canvas dimensions, tracking the containing viewport element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_holds_at_most_one_node() {
        let mut selection = Selection::default();
        assert_eq!(selection.selected(), None);

        selection.select("a1");
        selection.select("b2");
        assert_eq!(selection.selected(), Some("b2"));
        assert!(!selection.is_selected("a1"));

        selection.clear();
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn focus_reaches_minimum_zoom() {
        let transition = focus_on(10.0, -4.0, 1.0);
        assert_eq!(transition.zoom, 3.0);
        assert_eq!(transition.center_x, 10.0);
        assert_eq!(transition.duration_ms, 1000);
    }

    #[test]
    fn focus_keeps_higher_user_zoom() {
        let transition = focus_on(0.0, 0.0, 5.5);
        assert_eq!(transition.zoom, 5.5);
    }

    #[test]
    fn dragging_pins_a_node_in_place() {
        let mut pins = PinBoard::default();
        assert!(!pins.is_pinned("a1"));

        pins.pin("a1", 12.0, 34.0);
        assert!(pins.is_pinned("a1"));
        assert_eq!(pins.position("a1"), Some((12.0, 34.0)));
    }

    #[test]
    fn viewport_tracks_container_size() {
        let mut viewport = Viewport::default();
        viewport.resize(1920, 1080);
        assert_eq!(viewport, Viewport { width: 1920, height: 1080 });
    }
}
