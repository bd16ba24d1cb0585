//! Built-in sample catalog, used by the seed binary and as a test fixture.

use super::{Album, Artist, Catalog, Song};

fn artist(id: &str, name: &str, nationality: &str, spotify_url: &str) -> Artist {
    Artist {
        id: id.to_owned(),
        name: name.to_owned(),
        nationality: Some(nationality.to_owned()),
        spotify_url: Some(spotify_url.to_owned()),
    }
}

pub fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();

    catalog.insert_artist(artist(
        "1",
        "The Beatles",
        "UK",
        "https://open.spotify.com/artist/3WrFJ7ztbogyGnTHbHJFl2",
    ));
    catalog.insert_artist(artist(
        "2",
        "John Lennon",
        "UK",
        "https://open.spotify.com/artist/4x1nvY2FN8jxqAFA0DA02H",
    ));
    catalog.insert_artist(artist(
        "3",
        "Paul McCartney",
        "UK",
        "https://open.spotify.com/artist/4STHEaNw4mPZ2tzheohgXB",
    ));

    catalog.insert_album(Album {
        id: "1".to_owned(),
        title: "Abbey Road".to_owned(),
        release_year: Some(1969),
        spotify_url: None,
        artist_id: Some("1".to_owned()),
    });
    catalog.insert_album(Album {
        id: "2".to_owned(),
        title: "Sgt. Pepper's Lonely Hearts Club Band".to_owned(),
        release_year: Some(1967),
        spotify_url: None,
        artist_id: Some("1".to_owned()),
    });
    catalog.insert_album(Album {
        id: "3".to_owned(),
        title: "Imagine".to_owned(),
        release_year: Some(1971),
        spotify_url: None,
        artist_id: Some("2".to_owned()),
    });

    let songs = [
        (
            "1",
            "Come Together",
            "Rock",
            "https://open.spotify.com/track/2EqlS6tkEnglzr7tkKAAYD",
            Some("1"),
            vec!["1", "2"],
        ),
        (
            "2",
            "Here Comes The Sun",
            "Rock",
            "https://open.spotify.com/track/6dGnYIeXmHdcikdzNNDMm2",
            Some("1"),
            vec!["1", "3"],
        ),
        (
            "3",
            "Lucy in the Sky with Diamonds",
            "Psychedelic Rock",
            "https://open.spotify.com/track/25yQPHgC35WNnnOUqFhgVR",
            Some("2"),
            vec!["1"],
        ),
        (
            "4",
            "Imagine",
            "Rock",
            "https://open.spotify.com/track/7pKfPomDEeI4TPT6EOYjn9",
            Some("3"),
            vec!["2"],
        ),
        (
            "5",
            "Yesterday",
            "Ballad",
            "https://open.spotify.com/track/3BQHpFgAp4l80e1XslIjNI",
            Some("2"),
            vec!["1", "3"],
        ),
    ];
    for (id, title, genre, url, album_id, artist_ids) in songs {
        catalog.insert_song(Song {
            id: id.to_owned(),
            title: title.to_owned(),
            genre: Some(genre.to_owned()),
            spotify_url: Some(url.to_owned()),
            album_id: album_id.map(|a| a.to_owned()),
            artist_ids: artist_ids.into_iter().map(|a| a.to_owned()).collect(),
        });
    }

    catalog
}
