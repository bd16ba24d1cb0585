mod model;
mod normalizer;
mod response;

pub use model::{GraphData, GraphEdge, GraphNode, NodeKind, RelationType};
pub use normalizer::normalize;
pub use response::{AlbumEntry, ArtistEntry, GraphResponse, SongEntry};
