//! Free-text search over graph nodes. Matching is a case-insensitive
//! substring test across every textual attribute a node carries.

use crate::graph::GraphNode;

/// Presentation state of a node while a search query is active. Matches are
/// enlarged, non-matches are dimmed but never hidden.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Highlight {
    Normal,
    Emphasized,
    Dimmed,
}

/// An empty or whitespace-only query matches every node.
pub fn node_matches(node: &GraphNode, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();

    let mut haystack = node.name.clone();
    for attribute in [
        node.nationality.as_deref(),
        node.genre.as_deref(),
        node.spotify_url.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        haystack.push(' ');
        haystack.push_str(attribute);
    }
    if let Some(year) = node.release_year {
        haystack.push(' ');
        haystack.push_str(&year.to_string());
    }

    haystack.to_lowercase().contains(&needle)
}

pub fn highlight(node: &GraphNode, query: &str) -> Highlight {
    if query.trim().is_empty() {
        return Highlight::Normal;
    }
    if node_matches(node, query) {
        Highlight::Emphasized
    } else {
        Highlight::Dimmed
    }
}
