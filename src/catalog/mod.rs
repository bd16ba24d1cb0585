mod album;
mod artist;
mod catalog;
mod load;
mod sample;
mod song;

pub use album::Album;
pub use artist::Artist;
pub use catalog::{
    AlbumFields, ArtistFields, Catalog, CatalogError, NodeFields, NodeRecord, SongFields,
};
#[allow(unused_imports)] // Used by main.rs and the seed binary.
pub use load::{load_catalog, write_catalog, CatalogBuild, Problem};
pub use sample::sample_catalog;
pub use song::Song;
