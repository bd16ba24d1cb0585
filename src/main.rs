use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use musicwiki_graph_server::catalog::{load_catalog, Catalog};
use musicwiki_graph_server::server::{run_server, RequestsLoggingLevel, ServerConfig};

fn parse_root_dir(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s).canonicalize()?;
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Root directory of the catalog (artists/, albums/, songs/).
    #[clap(value_parser = parse_root_dir)]
    pub path: PathBuf,

    /// Check the catalog for problems and exit without serving.
    #[clap(long)]
    pub check_only: bool,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 4000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Directory with a built frontend to serve; without it the root route
    /// answers with server stats.
    #[clap(long)]
    pub frontend_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    if cli_args.check_only {
        let build = Catalog::build(&cli_args.path)?;
        if !build.problems.is_empty() {
            println!("Found {} problems:", build.problems.len());
            for problem in build.problems.iter() {
                println!("- {:?}", problem);
            }
            println!();
        }

        match build.problems.is_empty() {
            true => println!("Catalog checked, no issues found."),
            false => println!("Catalog was built, but check the issues above."),
        }
        println!(
            "Catalog has:\n{} artists\n{} albums\n{} songs",
            build.catalog.get_artists_count(),
            build.catalog.get_albums_count(),
            build.catalog.get_songs_count()
        );
        return Ok(());
    }

    let catalog = load_catalog(&cli_args.path)?;

    let config = ServerConfig {
        requests_logging_level: cli_args.logging_level,
        port: cli_args.port,
        frontend_dir_path: cli_args.frontend_dir,
    };

    info!("Serving music graph on port {}", config.port);
    run_server(config, catalog).await
}
