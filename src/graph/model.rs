use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Artist,
    Album,
    Song,
}

impl NodeKind {
    /// Fixed rendering group, consumed by the force-graph frontend.
    pub fn group(&self) -> u8 {
        match self {
            NodeKind::Artist => 1,
            NodeKind::Album => 2,
            NodeKind::Song => 3,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            NodeKind::Artist => "artist",
            NodeKind::Album => "album",
            NodeKind::Song => "song",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    Released,
    Performed,
    Contains,
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RelationType::Released => "RELEASED",
            RelationType::Performed => "PERFORMED",
            RelationType::Contains => "CONTAINS",
        };
        write!(f, "{}", label)
    }
}

/// A de-duplicated vertex of the visual graph. The `name` field always holds
/// a displayable label, falling back to "{kind}-{id}" when the source record
/// had neither a name nor a title.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub group: u8,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify_url: Option<String>,
}

/// A typed, directed link between two nodes. The composite id enforces edge
/// uniqueness; `value` feeds link thickness in the frontend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relation: RelationType,
    pub value: u32,
}

impl GraphEdge {
    pub fn new(source: &str, target: &str, relation: RelationType) -> GraphEdge {
        GraphEdge {
            id: Self::composite_id(source, target, relation),
            source: source.to_owned(),
            target: target.to_owned(),
            relation,
            value: 1,
        }
    }

    pub fn composite_id(source: &str, target: &str, relation: RelationType) -> String {
        format!("{}-{}-{}", source, target, relation)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphEdge>,
}

impl GraphData {
    pub fn count_of_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }
}
