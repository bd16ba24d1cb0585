mod interaction;
mod search;
mod style;

pub use interaction::{focus_on, CameraTransition, PinBoard, Selection, Viewport};
pub use search::{highlight, node_matches, Highlight};
pub use style::{
    legend, link_color, node_color, node_radius, Legend, LinkLegendEntry, NodeLegendEntry,
};
