//! Visual encoding of the graph: kind to color/radius, relation to color.
//! Pure mappings with neutral fallbacks, independent of any rendering
//! library.

use crate::graph::{NodeKind, RelationType};
use serde::Serialize;

const ARTIST_COLOR: &str = "#ff6b6b";
const ALBUM_COLOR: &str = "#4ecdc4";
const SONG_COLOR: &str = "#45b7d1";
const FALLBACK_NODE_COLOR: &str = "#95a5a6";

const RELEASED_COLOR: &str = "#e74c3c";
const PERFORMED_COLOR: &str = "#f39c12";
const CONTAINS_COLOR: &str = "#27ae60";
const FALLBACK_LINK_COLOR: &str = "#bdc3c7";

const ARTIST_RADIUS: f32 = 8.0;
const ALBUM_RADIUS: f32 = 6.0;
const SONG_RADIUS: f32 = 4.0;
const FALLBACK_RADIUS: f32 = 3.0;

/// `None` stands for a node kind the renderer does not recognize.
pub fn node_color(kind: Option<NodeKind>) -> &'static str {
    match kind {
        Some(NodeKind::Artist) => ARTIST_COLOR,
        Some(NodeKind::Album) => ALBUM_COLOR,
        Some(NodeKind::Song) => SONG_COLOR,
        None => FALLBACK_NODE_COLOR,
    }
}

/// Relative node radius, descending by kind: artists render largest, songs
/// smallest.
pub fn node_radius(kind: Option<NodeKind>) -> f32 {
    match kind {
        Some(NodeKind::Artist) => ARTIST_RADIUS,
        Some(NodeKind::Album) => ALBUM_RADIUS,
        Some(NodeKind::Song) => SONG_RADIUS,
        None => FALLBACK_RADIUS,
    }
}

pub fn link_color(relation: Option<RelationType>) -> &'static str {
    match relation {
        Some(RelationType::Released) => RELEASED_COLOR,
        Some(RelationType::Performed) => PERFORMED_COLOR,
        Some(RelationType::Contains) => CONTAINS_COLOR,
        None => FALLBACK_LINK_COLOR,
    }
}

#[derive(Serialize)]
pub struct NodeLegendEntry {
    pub kind: NodeKind,
    pub group: u8,
    pub color: &'static str,
    pub radius: f32,
}

#[derive(Serialize)]
pub struct LinkLegendEntry {
    pub relation: RelationType,
    pub color: &'static str,
}

/// The full style mapping, served to the frontend for the legend overlay.
#[derive(Serialize)]
pub struct Legend {
    pub nodes: Vec<NodeLegendEntry>,
    pub links: Vec<LinkLegendEntry>,
    pub fallback_node_color: &'static str,
    pub fallback_link_color: &'static str,
}

pub fn legend() -> Legend {
    let kinds = [NodeKind::Artist, NodeKind::Album, NodeKind::Song];
    let relations = [
        RelationType::Released,
        RelationType::Performed,
        RelationType::Contains,
    ];
    Legend {
        nodes: kinds
            .into_iter()
            .map(|kind| NodeLegendEntry {
                kind,
                group: kind.group(),
                color: node_color(Some(kind)),
                radius: node_radius(Some(kind)),
            })
            .collect(),
        links: relations
            .into_iter()
            .map(|relation| LinkLegendEntry {
                relation,
                color: link_color(Some(relation)),
            })
            .collect(),
        fallback_node_color: node_color(None),
        fallback_link_color: link_color(None),
    }
}
