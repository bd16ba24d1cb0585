use super::{Album, Artist, Catalog, Song};
use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug)]
struct Dirs {
    artists: PathBuf,
    albums: PathBuf,
    songs: PathBuf,
}

impl Dirs {
    fn from_root(root: &Path) -> Result<Dirs> {
        if !root.is_dir() {
            bail!("{} is not a valid directory.", root.display());
        }

        let artists = root.join("artists");
        let albums = root.join("albums");
        let songs = root.join("songs");

        if !artists.is_dir() {
            bail!("No artists dir in {}", root.display());
        }

        if !albums.is_dir() {
            bail!("No albums dir in {}", root.display());
        }

        if !songs.is_dir() {
            bail!("No songs dir in {}", root.display());
        }

        Ok(Dirs {
            artists,
            albums,
            songs,
        })
    }
}

/// Non-fatal integrity issues found while building a catalog. The records
/// stay in the catalog; dangling references simply produce no edges.
#[derive(Debug)]
pub enum Problem {
    DanglingAlbumArtist { album_id: String, artist_id: String },
    DanglingSongAlbum { song_id: String, album_id: String },
    DanglingSongArtist { song_id: String, artist_id: String },
}

pub struct CatalogBuild {
    pub catalog: Catalog,
    pub problems: Vec<Problem>,
}

fn parse_entities<T: DeserializeOwned>(dir: &Path, prefix: &str) -> Result<Vec<(String, T)>> {
    let filename_regex = Regex::new(&format!("{}_([A-Za-z0-9]+)\\.json", prefix))
        .expect("Invalid Regex, this should be fixed at runtime.");
    let mut out = Vec::new();
    for dir_entry_result in std::fs::read_dir(dir)? {
        let path = dir_entry_result?.path();
        let filename = path
            .file_name()
            .with_context(|| format!("Invalid file {}", path.display()))?
            .to_string_lossy()
            .into_owned();
        let captures = match filename_regex.captures(&filename) {
            Some(captures) => captures,
            None => bail!("Invalid {} file name \"{filename}\"", prefix),
        };
        let filename_id = captures.get(1).unwrap().as_str();

        let file_text = std::fs::read_to_string(&path)?;
        let parsed: T = serde_json::from_str(&file_text)
            .with_context(|| format!("Could not parse {}", path.display()))?;
        out.push((filename_id.to_owned(), parsed));
    }
    // Directory iteration order is platform dependent.
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}

fn check_integrity(catalog: &Catalog) -> Vec<Problem> {
    let mut problems = Vec::new();

    for album in catalog.iter_albums() {
        if let Some(artist_id) = album.artist_id.as_deref() {
            if catalog.get_artist(artist_id).is_none() {
                problems.push(Problem::DanglingAlbumArtist {
                    album_id: album.id.clone(),
                    artist_id: artist_id.to_owned(),
                });
            }
        }
    }

    for song in catalog.iter_songs() {
        if let Some(album_id) = song.album_id.as_deref() {
            if catalog.get_album(album_id).is_none() {
                problems.push(Problem::DanglingSongAlbum {
                    song_id: song.id.clone(),
                    album_id: album_id.to_owned(),
                });
            }
        }
        for artist_id in song.artist_ids.iter() {
            if catalog.get_artist(artist_id).is_none() {
                problems.push(Problem::DanglingSongArtist {
                    song_id: song.id.clone(),
                    artist_id: artist_id.clone(),
                });
            }
        }
    }

    problems
}

impl Catalog {
    pub fn build(root_dir: &Path) -> Result<CatalogBuild> {
        let dirs = Dirs::from_root(root_dir)?;
        let mut catalog = Catalog::new();

        for (filename_id, artist) in parse_entities::<Artist>(&dirs.artists, "artist")? {
            if artist.id != filename_id {
                bail!(
                    "File name implies artist id {filename_id}, but the parsed artist has id {}",
                    artist.id
                );
            }
            catalog.insert_artist(artist);
        }
        for (filename_id, album) in parse_entities::<Album>(&dirs.albums, "album")? {
            if album.id != filename_id {
                bail!(
                    "File name implies album id {filename_id}, but the parsed album has id {}",
                    album.id
                );
            }
            catalog.insert_album(album);
        }
        for (filename_id, song) in parse_entities::<Song>(&dirs.songs, "song")? {
            if song.id != filename_id {
                bail!(
                    "File name implies song id {filename_id}, but the parsed song has id {}",
                    song.id
                );
            }
            catalog.insert_song(song);
        }

        let problems = check_integrity(&catalog);
        Ok(CatalogBuild { catalog, problems })
    }
}

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let build = Catalog::build(path.as_ref())?;
    let problems = build.problems;
    let catalog = build.catalog;

    if !problems.is_empty() {
        info!("Found {} problems:", problems.len());
        for problem in problems.iter() {
            info!("- {:?}", problem);
        }
    }

    match problems.is_empty() {
        true => info!("Catalog checked, no issues found."),
        false => info!(
            "Catalog was built, but check the {} non-fatal issues above.",
            problems.len()
        ),
    }
    info!(
        "Catalog has:\n{} artists\n{} albums\n{} songs",
        catalog.get_artists_count(),
        catalog.get_albums_count(),
        catalog.get_songs_count()
    );
    Ok(catalog)
}

fn write_entity<T: Serialize>(dir: &Path, prefix: &str, id: &str, entity: &T) -> Result<()> {
    let path = dir.join(format!("{}_{}.json", prefix, id));
    let text = serde_json::to_string_pretty(entity)?;
    std::fs::write(&path, text).with_context(|| format!("Could not write {}", path.display()))?;
    Ok(())
}

/// Writes a catalog in the directory layout `Catalog::build` reads back.
pub fn write_catalog(catalog: &Catalog, root_dir: &Path) -> Result<()> {
    let artists = root_dir.join("artists");
    let albums = root_dir.join("albums");
    let songs = root_dir.join("songs");
    for dir in [&artists, &albums, &songs] {
        std::fs::create_dir_all(dir)?;
    }

    for artist in catalog.iter_artists() {
        write_entity(&artists, "artist", &artist.id, artist)?;
    }
    for album in catalog.iter_albums() {
        write_entity(&albums, "album", &album.id, album)?;
    }
    for song in catalog.iter_songs() {
        write_entity(&songs, "song", &song.id, song)?;
    }
    Ok(())
}
