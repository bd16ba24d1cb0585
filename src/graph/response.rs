//! Wire shape of the full graph query.
//!
//! The response is intentionally redundant: the same artist, album or song
//! can show up under several paths (an album under its artist and again in
//! the top-level listing, a collaborating artist under a song, and so on).
//! The top-level album and song listings exist so that entities unreachable
//! from any artist root are still discoverable. The normalizer collapses all
//! of this into a flat node/edge graph.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphResponse {
    #[serde(default)]
    pub artists: Vec<ArtistEntry>,
    #[serde(default)]
    pub albums: Vec<AlbumEntry>,
    #[serde(default)]
    pub songs: Vec<SongEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub albums: Vec<AlbumEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub songs: Vec<SongEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artists: Vec<ArtistEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub songs: Vec<SongEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artists: Vec<ArtistEntry>,
    // The upstream schema models the containing album as a list even though
    // a song belongs to at most one album.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub album: Vec<AlbumEntry>,
}
