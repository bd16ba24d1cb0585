//! Flattens the redundant nested graph response into de-duplicated node and
//! edge lists, both in order of first discovery.

use super::model::{GraphData, GraphEdge, GraphNode, NodeKind, RelationType};
use super::response::{AlbumEntry, ArtistEntry, GraphResponse, SongEntry};
use std::collections::HashSet;

/// Insertion-ordered node collection keyed by id. The first occurrence of an
/// id wins, later occurrences are ignored even if they carry more attributes.
struct EntityRegistry {
    nodes: Vec<GraphNode>,
    seen: HashSet<String>,
}

impl EntityRegistry {
    fn new() -> EntityRegistry {
        EntityRegistry {
            nodes: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn add(&mut self, node: GraphNode) {
        if self.seen.insert(node.id.clone()) {
            self.nodes.push(node);
        }
    }
}

/// Insertion-ordered edge collection, unique per (source, target, type).
struct RelationshipSet {
    links: Vec<GraphEdge>,
    seen: HashSet<String>,
}

impl RelationshipSet {
    fn new() -> RelationshipSet {
        RelationshipSet {
            links: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn add(&mut self, source: &str, target: &str, relation: RelationType) {
        let composite_id = GraphEdge::composite_id(source, target, relation);
        if self.seen.insert(composite_id) {
            self.links.push(GraphEdge::new(source, target, relation));
        }
    }
}

fn display_name(kind: NodeKind, id: &str, name: Option<&str>, title: Option<&str>) -> String {
    name.filter(|s| !s.is_empty())
        .or(title.filter(|s| !s.is_empty()))
        .map(|s| s.to_owned())
        .unwrap_or_else(|| format!("{}-{}", kind, id))
}

fn artist_node(entry: &ArtistEntry) -> GraphNode {
    GraphNode {
        id: entry.id.clone(),
        kind: NodeKind::Artist,
        group: NodeKind::Artist.group(),
        name: display_name(NodeKind::Artist, &entry.id, entry.name.as_deref(), None),
        nationality: entry.nationality.clone(),
        genre: None,
        release_year: None,
        spotify_url: entry.spotify_url.clone(),
    }
}

fn album_node(entry: &AlbumEntry) -> GraphNode {
    GraphNode {
        id: entry.id.clone(),
        kind: NodeKind::Album,
        group: NodeKind::Album.group(),
        name: display_name(NodeKind::Album, &entry.id, None, entry.title.as_deref()),
        nationality: None,
        genre: None,
        release_year: entry.release_year,
        spotify_url: entry.spotify_url.clone(),
    }
}

fn song_node(entry: &SongEntry) -> GraphNode {
    GraphNode {
        id: entry.id.clone(),
        kind: NodeKind::Song,
        group: NodeKind::Song.group(),
        name: display_name(NodeKind::Song, &entry.id, None, entry.title.as_deref()),
        nationality: None,
        genre: entry.genre.clone(),
        release_year: None,
        spotify_url: entry.spotify_url.clone(),
    }
}

struct Normalizer {
    registry: EntityRegistry,
    relationships: RelationshipSet,
}

impl Normalizer {
    fn new() -> Normalizer {
        Normalizer {
            registry: EntityRegistry::new(),
            relationships: RelationshipSet::new(),
        }
    }

    fn visit_artist_root(&mut self, artist: &ArtistEntry) {
        self.registry.add(artist_node(artist));

        for album in artist.albums.iter() {
            self.registry.add(album_node(album));
            self.relationships
                .add(&artist.id, &album.id, RelationType::Released);

            for song in album.songs.iter() {
                self.registry.add(song_node(song));
                self.relationships
                    .add(&album.id, &song.id, RelationType::Contains);

                // Collaboration credits.
                for credited in song.artists.iter() {
                    self.registry.add(artist_node(credited));
                    self.relationships
                        .add(&credited.id, &song.id, RelationType::Performed);
                }
            }
        }

        for song in artist.songs.iter() {
            self.registry.add(song_node(song));
            self.relationships
                .add(&artist.id, &song.id, RelationType::Performed);

            for album in song.album.iter() {
                self.registry.add(album_node(album));
                self.relationships
                    .add(&album.id, &song.id, RelationType::Contains);
            }
        }
    }

    fn visit_album_root(&mut self, album: &AlbumEntry) {
        self.registry.add(album_node(album));

        for artist in album.artists.iter() {
            self.registry.add(artist_node(artist));
            self.relationships
                .add(&artist.id, &album.id, RelationType::Released);
        }

        for song in album.songs.iter() {
            self.registry.add(song_node(song));
            self.relationships
                .add(&album.id, &song.id, RelationType::Contains);

            for artist in song.artists.iter() {
                self.registry.add(artist_node(artist));
                self.relationships
                    .add(&artist.id, &song.id, RelationType::Performed);
            }
        }
    }

    fn visit_song_root(&mut self, song: &SongEntry) {
        self.registry.add(song_node(song));

        for artist in song.artists.iter() {
            self.registry.add(artist_node(artist));
            self.relationships
                .add(&artist.id, &song.id, RelationType::Performed);
        }

        for album in song.album.iter() {
            self.registry.add(album_node(album));
            self.relationships
                .add(&album.id, &song.id, RelationType::Contains);
        }
    }

    fn consume(self) -> GraphData {
        GraphData {
            nodes: self.registry.nodes,
            links: self.relationships.links,
        }
    }
}

/// Single pass over all three root collections. Every entity and every
/// relationship reachable from any root is captured exactly once; missing
/// nested collections are simply empty, never an error.
pub fn normalize(response: &GraphResponse) -> GraphData {
    let mut normalizer = Normalizer::new();

    for artist in response.artists.iter() {
        normalizer.visit_artist_root(artist);
    }
    for album in response.albums.iter() {
        normalizer.visit_album_root(album);
    }
    for song in response.songs.iter() {
        normalizer.visit_song_root(song);
    }

    normalizer.consume()
}
