use std::path::Path;

use clap::Parser;

use mdsite::config::CONFIG_FILE;
use mdsite::{Config, SiteError, site};

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Generate a static HTML site from a tree of Markdown files")]
struct Cli {
    /// Prefix for root-relative links in generated pages (defaults to "/")
    base_path: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over the default level.
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), SiteError> {
    let config = Config::load(Path::new(CONFIG_FILE))?.with_base_path(cli.base_path);

    log::info!(
        "Building site into {} with base path {}",
        config.paths.output.display(),
        config.site.base_path
    );

    let summary = site::build(&config)?;
    println!(
        "Copied {} static files, generated {} pages",
        summary.files_copied, summary.pages_generated
    );
    Ok(())
}
