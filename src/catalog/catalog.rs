use super::{Album, Artist, Song};
use crate::graph::{AlbumEntry, ArtistEntry, GraphResponse, NodeKind, RelationType, SongEntry};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("{kind} {id} not found")]
    NotFound { kind: NodeKind, id: String },

    #[error("node {id} not found")]
    UnknownNode { id: String },

    #[error("node {id} is a {actual}, not a {expected}")]
    KindMismatch {
        id: String,
        expected: NodeKind,
        actual: NodeKind,
    },

    #[error("album {album_id} was already released by artist {owner_id}")]
    AlbumAlreadyReleased { album_id: String, owner_id: String },

    #[error("song {song_id} is already contained in album {album_id}")]
    SongAlreadyContained { song_id: String, album_id: String },

    #[error("{relation} relationship {from} -> {to} already exists")]
    AlreadyConnected {
        relation: RelationType,
        from: String,
        to: String,
    },

    #[error("no {relation} relationship between {from} and {to}")]
    NotConnected {
        relation: RelationType,
        from: String,
        to: String,
    },
}

type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistFields {
    pub name: String,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub spotify_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumFields {
    pub title: String,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub spotify_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongFields {
    pub title: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub spotify_url: Option<String>,
}

/// Per-kind field sets for create and update, selected by an explicit tag
/// instead of a free-form type string.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeFields {
    Artist(ArtistFields),
    Album(AlbumFields),
    Song(SongFields),
}

impl NodeFields {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeFields::Artist(_) => NodeKind::Artist,
            NodeFields::Album(_) => NodeKind::Album,
            NodeFields::Song(_) => NodeKind::Song,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum NodeRecord {
    Artist(Artist),
    Album(Album),
    Song(Song),
}

/// In-memory music knowledge base. Listings keep insertion order so that
/// query responses, and therefore the normalized graph, are reproducible.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    artists: HashMap<String, Artist>,
    albums: HashMap<String, Album>,
    songs: HashMap<String, Song>,
    artists_order: Vec<String>,
    albums_order: Vec<String>,
    songs_order: Vec<String>,
}

fn generate_id() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(12)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

impl Catalog {
    pub fn new() -> Catalog {
        Catalog::default()
    }

    pub fn insert_artist(&mut self, artist: Artist) {
        if !self.artists.contains_key(&artist.id) {
            self.artists_order.push(artist.id.clone());
        }
        self.artists.insert(artist.id.clone(), artist);
    }

    pub fn insert_album(&mut self, album: Album) {
        if !self.albums.contains_key(&album.id) {
            self.albums_order.push(album.id.clone());
        }
        self.albums.insert(album.id.clone(), album);
    }

    pub fn insert_song(&mut self, song: Song) {
        if !self.songs.contains_key(&song.id) {
            self.songs_order.push(song.id.clone());
        }
        self.songs.insert(song.id.clone(), song);
    }

    pub fn get_artist(&self, id: &str) -> Option<&Artist> {
        self.artists.get(id)
    }

    pub fn get_album(&self, id: &str) -> Option<&Album> {
        self.albums.get(id)
    }

    pub fn get_song(&self, id: &str) -> Option<&Song> {
        self.songs.get(id)
    }

    pub fn iter_artists(&self) -> impl Iterator<Item = &Artist> {
        self.artists_order.iter().filter_map(|id| self.artists.get(id))
    }

    pub fn iter_albums(&self) -> impl Iterator<Item = &Album> {
        self.albums_order.iter().filter_map(|id| self.albums.get(id))
    }

    pub fn iter_songs(&self) -> impl Iterator<Item = &Song> {
        self.songs_order.iter().filter_map(|id| self.songs.get(id))
    }

    pub fn get_artists_count(&self) -> usize {
        self.artists.len()
    }

    pub fn get_albums_count(&self) -> usize {
        self.albums.len()
    }

    pub fn get_songs_count(&self) -> usize {
        self.songs.len()
    }

    fn kind_of(&self, id: &str) -> Option<NodeKind> {
        if self.artists.contains_key(id) {
            Some(NodeKind::Artist)
        } else if self.albums.contains_key(id) {
            Some(NodeKind::Album)
        } else if self.songs.contains_key(id) {
            Some(NodeKind::Song)
        } else {
            None
        }
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = generate_id();
            if self.kind_of(&id).is_none() {
                return id;
            }
        }
    }

    pub fn create_node(&mut self, fields: NodeFields) -> NodeRecord {
        let id = self.fresh_id();
        match fields {
            NodeFields::Artist(fields) => {
                let artist = Artist {
                    id,
                    name: fields.name,
                    nationality: fields.nationality,
                    spotify_url: fields.spotify_url,
                };
                self.insert_artist(artist.clone());
                NodeRecord::Artist(artist)
            }
            NodeFields::Album(fields) => {
                let album = Album {
                    id,
                    title: fields.title,
                    release_year: fields.release_year,
                    spotify_url: fields.spotify_url,
                    artist_id: None,
                };
                self.insert_album(album.clone());
                NodeRecord::Album(album)
            }
            NodeFields::Song(fields) => {
                let song = Song {
                    id,
                    title: fields.title,
                    genre: fields.genre,
                    spotify_url: fields.spotify_url,
                    album_id: None,
                    artist_ids: Vec::new(),
                };
                self.insert_song(song.clone());
                NodeRecord::Song(song)
            }
        }
    }

    /// Replaces a node's own attributes, leaving its relationships alone.
    pub fn update_node(&mut self, id: &str, fields: NodeFields) -> Result<NodeRecord> {
        let expected = fields.kind();
        let actual = self.kind_of(id).ok_or_else(|| CatalogError::NotFound {
            kind: expected,
            id: id.to_owned(),
        })?;
        if actual != expected {
            return Err(CatalogError::KindMismatch {
                id: id.to_owned(),
                expected,
                actual,
            });
        }

        match fields {
            NodeFields::Artist(fields) => {
                let artist = self.artists.get_mut(id).unwrap();
                artist.name = fields.name;
                artist.nationality = fields.nationality;
                artist.spotify_url = fields.spotify_url;
                Ok(NodeRecord::Artist(artist.clone()))
            }
            NodeFields::Album(fields) => {
                let album = self.albums.get_mut(id).unwrap();
                album.title = fields.title;
                album.release_year = fields.release_year;
                album.spotify_url = fields.spotify_url;
                Ok(NodeRecord::Album(album.clone()))
            }
            NodeFields::Song(fields) => {
                let song = self.songs.get_mut(id).unwrap();
                song.title = fields.title;
                song.genre = fields.genre;
                song.spotify_url = fields.spotify_url;
                Ok(NodeRecord::Song(song.clone()))
            }
        }
    }

    /// Deletes a node and detaches every relationship that referenced it.
    pub fn delete_node(&mut self, id: &str) -> Result<NodeKind> {
        let kind = self.kind_of(id).ok_or_else(|| CatalogError::UnknownNode {
            id: id.to_owned(),
        })?;

        match kind {
            NodeKind::Artist => {
                self.artists.remove(id);
                self.artists_order.retain(|i| i != id);
                for album in self.albums.values_mut() {
                    if album.artist_id.as_deref() == Some(id) {
                        album.artist_id = None;
                    }
                }
                for song in self.songs.values_mut() {
                    song.artist_ids.retain(|i| i != id);
                }
            }
            NodeKind::Album => {
                self.albums.remove(id);
                self.albums_order.retain(|i| i != id);
                for song in self.songs.values_mut() {
                    if song.album_id.as_deref() == Some(id) {
                        song.album_id = None;
                    }
                }
            }
            NodeKind::Song => {
                self.songs.remove(id);
                self.songs_order.retain(|i| i != id);
            }
        }
        Ok(kind)
    }

    fn require_artist(&self, id: &str) -> Result<()> {
        if self.artists.contains_key(id) {
            Ok(())
        } else {
            Err(CatalogError::NotFound {
                kind: NodeKind::Artist,
                id: id.to_owned(),
            })
        }
    }

    fn require_album(&self, id: &str) -> Result<()> {
        if self.albums.contains_key(id) {
            Ok(())
        } else {
            Err(CatalogError::NotFound {
                kind: NodeKind::Album,
                id: id.to_owned(),
            })
        }
    }

    fn require_song(&self, id: &str) -> Result<()> {
        if self.songs.contains_key(id) {
            Ok(())
        } else {
            Err(CatalogError::NotFound {
                kind: NodeKind::Song,
                id: id.to_owned(),
            })
        }
    }

    /// Connects `from -> to` with the given relationship type. Cardinality
    /// violations are rejected before any state change: an album cannot gain
    /// a second releasing artist, a song cannot join a second album.
    pub fn connect(&mut self, relation: RelationType, from: &str, to: &str) -> Result<()> {
        match relation {
            RelationType::Released => {
                self.require_artist(from)?;
                self.require_album(to)?;
                let album = self.albums.get_mut(to).unwrap();
                match album.artist_id.as_deref() {
                    Some(owner) if owner == from => Err(CatalogError::AlreadyConnected {
                        relation,
                        from: from.to_owned(),
                        to: to.to_owned(),
                    }),
                    Some(owner) => Err(CatalogError::AlbumAlreadyReleased {
                        album_id: to.to_owned(),
                        owner_id: owner.to_owned(),
                    }),
                    None => {
                        album.artist_id = Some(from.to_owned());
                        Ok(())
                    }
                }
            }
            RelationType::Performed => {
                self.require_artist(from)?;
                self.require_song(to)?;
                let song = self.songs.get_mut(to).unwrap();
                if song.artist_ids.iter().any(|i| i == from) {
                    return Err(CatalogError::AlreadyConnected {
                        relation,
                        from: from.to_owned(),
                        to: to.to_owned(),
                    });
                }
                song.artist_ids.push(from.to_owned());
                Ok(())
            }
            RelationType::Contains => {
                self.require_album(from)?;
                self.require_song(to)?;
                let song = self.songs.get_mut(to).unwrap();
                match song.album_id.as_deref() {
                    Some(album_id) if album_id == from => Err(CatalogError::AlreadyConnected {
                        relation,
                        from: from.to_owned(),
                        to: to.to_owned(),
                    }),
                    Some(album_id) => Err(CatalogError::SongAlreadyContained {
                        song_id: to.to_owned(),
                        album_id: album_id.to_owned(),
                    }),
                    None => {
                        song.album_id = Some(from.to_owned());
                        Ok(())
                    }
                }
            }
        }
    }

    pub fn disconnect(&mut self, relation: RelationType, from: &str, to: &str) -> Result<()> {
        let not_connected = || CatalogError::NotConnected {
            relation,
            from: from.to_owned(),
            to: to.to_owned(),
        };
        match relation {
            RelationType::Released => {
                self.require_artist(from)?;
                self.require_album(to)?;
                let album = self.albums.get_mut(to).unwrap();
                if album.artist_id.as_deref() != Some(from) {
                    return Err(not_connected());
                }
                album.artist_id = None;
                Ok(())
            }
            RelationType::Performed => {
                self.require_artist(from)?;
                self.require_song(to)?;
                let song = self.songs.get_mut(to).unwrap();
                if !song.artist_ids.iter().any(|i| i == from) {
                    return Err(not_connected());
                }
                song.artist_ids.retain(|i| i != from);
                Ok(())
            }
            RelationType::Contains => {
                self.require_album(from)?;
                self.require_song(to)?;
                let song = self.songs.get_mut(to).unwrap();
                if song.album_id.as_deref() != Some(from) {
                    return Err(not_connected());
                }
                song.album_id = None;
                Ok(())
            }
        }
    }

    fn artist_ref(&self, id: &str) -> ArtistEntry {
        ArtistEntry {
            id: id.to_owned(),
            name: self.artists.get(id).map(|a| a.name.clone()),
            ..ArtistEntry::default()
        }
    }

    fn album_ref(&self, id: &str) -> AlbumEntry {
        AlbumEntry {
            id: id.to_owned(),
            title: self.albums.get(id).map(|a| a.title.clone()),
            ..AlbumEntry::default()
        }
    }

    fn song_credits(&self, song: &Song) -> Vec<ArtistEntry> {
        song.artist_ids.iter().map(|id| self.artist_ref(id)).collect()
    }

    fn songs_of_album<'a>(&'a self, album_id: &'a str) -> impl Iterator<Item = &'a Song> {
        self.iter_songs()
            .filter(move |song| song.album_id.as_deref() == Some(album_id))
    }

    fn album_song_entry(&self, song: &Song) -> SongEntry {
        SongEntry {
            id: song.id.clone(),
            title: Some(song.title.clone()),
            genre: song.genre.clone(),
            spotify_url: song.spotify_url.clone(),
            artists: self.song_credits(song),
            album: Vec::new(),
        }
    }

    fn artist_entry(&self, artist: &Artist) -> ArtistEntry {
        let albums = self
            .iter_albums()
            .filter(|album| album.artist_id.as_deref() == Some(artist.id.as_str()))
            .map(|album| AlbumEntry {
                id: album.id.clone(),
                title: Some(album.title.clone()),
                release_year: album.release_year,
                spotify_url: None,
                artists: Vec::new(),
                songs: self
                    .songs_of_album(&album.id)
                    .map(|song| self.album_song_entry(song))
                    .collect(),
            })
            .collect();

        let songs = self
            .iter_songs()
            .filter(|song| song.artist_ids.iter().any(|id| id == &artist.id))
            .map(|song| SongEntry {
                id: song.id.clone(),
                title: Some(song.title.clone()),
                genre: song.genre.clone(),
                spotify_url: song.spotify_url.clone(),
                artists: self.song_credits(song),
                album: song
                    .album_id
                    .as_deref()
                    .map(|id| vec![self.album_ref(id)])
                    .unwrap_or_default(),
            })
            .collect();

        ArtistEntry {
            id: artist.id.clone(),
            name: Some(artist.name.clone()),
            nationality: artist.nationality.clone(),
            spotify_url: artist.spotify_url.clone(),
            albums,
            songs,
        }
    }

    fn album_entry(&self, album: &Album) -> AlbumEntry {
        AlbumEntry {
            id: album.id.clone(),
            title: Some(album.title.clone()),
            release_year: album.release_year,
            spotify_url: album.spotify_url.clone(),
            artists: album
                .artist_id
                .as_deref()
                .map(|id| vec![self.artist_ref(id)])
                .unwrap_or_default(),
            songs: self
                .songs_of_album(&album.id)
                .map(|song| self.album_song_entry(song))
                .collect(),
        }
    }

    fn song_entry(&self, song: &Song) -> SongEntry {
        SongEntry {
            id: song.id.clone(),
            title: Some(song.title.clone()),
            genre: song.genre.clone(),
            spotify_url: song.spotify_url.clone(),
            artists: self.song_credits(song),
            album: song
                .album_id
                .as_deref()
                .map(|id| vec![self.album_ref(id)])
                .unwrap_or_default(),
        }
    }

    /// Assembles the redundant nested response consumed by the normalizer
    /// and the frontend. Every entity shows up under its artist where
    /// reachable and in its own top-level listing regardless, so nothing is
    /// lost when an album has no artist or a song no album.
    pub fn graph_response(&self) -> GraphResponse {
        GraphResponse {
            artists: self
                .iter_artists()
                .map(|artist| self.artist_entry(artist))
                .collect(),
            albums: self.iter_albums().map(|album| self.album_entry(album)).collect(),
            songs: self.iter_songs().map(|song| self.song_entry(song)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_catalog;
    use crate::graph::normalize;

    fn small_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert_artist(Artist {
            id: "a1".to_owned(),
            name: "The Beatles".to_owned(),
            nationality: Some("UK".to_owned()),
            spotify_url: None,
        });
        catalog.insert_album(Album {
            id: "b1".to_owned(),
            title: "Abbey Road".to_owned(),
            release_year: Some(1969),
            spotify_url: None,
            artist_id: Some("a1".to_owned()),
        });
        catalog.insert_song(Song {
            id: "s1".to_owned(),
            title: "Come Together".to_owned(),
            genre: Some("Rock".to_owned()),
            spotify_url: None,
            album_id: Some("b1".to_owned()),
            artist_ids: vec!["a1".to_owned()],
        });
        catalog
    }

    #[test]
    fn create_node_assigns_a_fresh_id() {
        let mut catalog = Catalog::new();
        let record = catalog.create_node(NodeFields::Artist(ArtistFields {
            name: "John Lennon".to_owned(),
            nationality: Some("UK".to_owned()),
            spotify_url: None,
        }));
        let NodeRecord::Artist(artist) = record else {
            panic!("expected an artist record");
        };
        assert!(!artist.id.is_empty());
        assert_eq!(catalog.get_artist(&artist.id).unwrap().name, "John Lennon");
    }

    #[test]
    fn update_rejects_kind_mismatch() {
        let mut catalog = small_catalog();
        let err = catalog
            .update_node(
                "b1",
                NodeFields::Song(SongFields {
                    title: "Nope".to_owned(),
                    genre: None,
                    spotify_url: None,
                }),
            )
            .unwrap_err();
        assert!(matches!(err, CatalogError::KindMismatch { .. }));
    }

    #[test]
    fn update_keeps_relationships() {
        let mut catalog = small_catalog();
        catalog
            .update_node(
                "s1",
                NodeFields::Song(SongFields {
                    title: "Come Together (Remaster)".to_owned(),
                    genre: Some("Rock".to_owned()),
                    spotify_url: None,
                }),
            )
            .unwrap();
        let song = catalog.get_song("s1").unwrap();
        assert_eq!(song.album_id.as_deref(), Some("b1"));
        assert_eq!(song.artist_ids, vec!["a1".to_owned()]);
    }

    #[test]
    fn album_cannot_gain_second_releasing_artist() {
        let mut catalog = small_catalog();
        catalog.insert_artist(Artist {
            id: "a2".to_owned(),
            name: "Someone Else".to_owned(),
            nationality: None,
            spotify_url: None,
        });

        let err = catalog
            .connect(RelationType::Released, "a2", "b1")
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::AlbumAlreadyReleased {
                album_id: "b1".to_owned(),
                owner_id: "a1".to_owned(),
            }
        );
    }

    #[test]
    fn song_cannot_join_second_album() {
        let mut catalog = small_catalog();
        catalog.insert_album(Album {
            id: "b2".to_owned(),
            title: "Imagine".to_owned(),
            release_year: Some(1971),
            spotify_url: None,
            artist_id: None,
        });

        let err = catalog
            .connect(RelationType::Contains, "b2", "s1")
            .unwrap_err();
        assert!(matches!(err, CatalogError::SongAlreadyContained { .. }));
    }

    #[test]
    fn duplicate_performed_connection_is_rejected() {
        let mut catalog = small_catalog();
        let err = catalog
            .connect(RelationType::Performed, "a1", "s1")
            .unwrap_err();
        assert!(matches!(err, CatalogError::AlreadyConnected { .. }));
    }

    #[test]
    fn connect_to_missing_entity_is_not_found() {
        let mut catalog = small_catalog();
        let err = catalog
            .connect(RelationType::Performed, "a1", "ghost")
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::NotFound {
                kind: NodeKind::Song,
                id: "ghost".to_owned(),
            }
        );
    }

    #[test]
    fn disconnect_then_reconnect() {
        let mut catalog = small_catalog();
        catalog
            .disconnect(RelationType::Contains, "b1", "s1")
            .unwrap();
        assert_eq!(catalog.get_song("s1").unwrap().album_id, None);

        catalog.connect(RelationType::Contains, "b1", "s1").unwrap();
        assert_eq!(
            catalog.get_song("s1").unwrap().album_id.as_deref(),
            Some("b1")
        );
    }

    #[test]
    fn disconnect_missing_relationship_fails() {
        let mut catalog = small_catalog();
        catalog
            .disconnect(RelationType::Performed, "a1", "s1")
            .unwrap();
        let err = catalog
            .disconnect(RelationType::Performed, "a1", "s1")
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotConnected { .. }));
    }

    #[test]
    fn deleting_an_artist_detaches_albums_and_songs() {
        let mut catalog = small_catalog();
        catalog.delete_node("a1").unwrap();

        assert_eq!(catalog.get_artists_count(), 0);
        assert_eq!(catalog.get_album("b1").unwrap().artist_id, None);
        assert!(catalog.get_song("s1").unwrap().artist_ids.is_empty());
    }

    #[test]
    fn deleting_an_album_detaches_its_songs() {
        let mut catalog = small_catalog();
        catalog.delete_node("b1").unwrap();
        assert_eq!(catalog.get_song("s1").unwrap().album_id, None);
    }

    #[test]
    fn graph_response_exposes_all_roots() {
        let catalog = small_catalog();
        let response = catalog.graph_response();

        assert_eq!(response.artists.len(), 1);
        assert_eq!(response.albums.len(), 1);
        assert_eq!(response.songs.len(), 1);

        let artist = &response.artists[0];
        assert_eq!(artist.albums.len(), 1);
        assert_eq!(artist.albums[0].songs.len(), 1);
        assert_eq!(artist.songs.len(), 1);
        assert_eq!(artist.songs[0].album[0].id, "b1");
    }

    #[test]
    fn orphan_entities_are_only_reachable_from_top_level_listings() {
        let mut catalog = Catalog::new();
        catalog.insert_album(Album {
            id: "b9".to_owned(),
            title: "Lost Tapes".to_owned(),
            release_year: None,
            spotify_url: None,
            artist_id: None,
        });

        let response = catalog.graph_response();
        assert!(response.artists.is_empty());
        assert_eq!(response.albums[0].id, "b9");
        assert!(response.albums[0].artists.is_empty());
    }

    #[test]
    fn normalized_sample_counts_nodes_and_edges_once() {
        let catalog = sample_catalog();
        let graph = normalize(&catalog.graph_response());

        // 3 artists + 3 albums + 5 songs, each exactly once despite the
        // redundant response paths.
        assert_eq!(graph.nodes.len(), 11);

        // 3 RELEASED + 5 CONTAINS + 8 PERFORMED.
        assert_eq!(graph.links.len(), 16);
        assert_eq!(
            graph
                .links
                .iter()
                .filter(|l| l.relation == RelationType::Released)
                .count(),
            3
        );
        assert_eq!(
            graph
                .links
                .iter()
                .filter(|l| l.relation == RelationType::Contains)
                .count(),
            5
        );
        assert_eq!(
            graph
                .links
                .iter()
                .filter(|l| l.relation == RelationType::Performed)
                .count(),
            8
        );
    }
}
