//! Writes the built-in sample catalog to disk in the layout the server
//! loads, replacing whatever seeding was done by hand before.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use musicwiki_graph_server::catalog::{sample_catalog, write_catalog};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory to write the sample catalog into.
    pub path: PathBuf,

    /// Overwrite an existing catalog directory.
    #[clap(long)]
    pub force: bool,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    if cli_args.path.join("artists").exists() && !cli_args.force {
        bail!(
            "{} already contains a catalog, pass --force to overwrite it.",
            cli_args.path.display()
        );
    }

    let catalog = sample_catalog();
    write_catalog(&catalog, &cli_args.path)?;

    println!(
        "Wrote sample catalog to {}:\n{} artists\n{} albums\n{} songs",
        cli_args.path.display(),
        catalog.get_artists_count(),
        catalog.get_albums_count(),
        catalog.get_songs_count()
    );
    Ok(())
}
