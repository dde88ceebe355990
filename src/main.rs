use clap::{Parser, Subcommand};
use contact_sheet::catalog::{Catalog, DEFAULT_RECENT_LIMIT};
use contact_sheet::config::{self, GalleryConfig};
use contact_sheet::{output, process};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "contact-sheet")]
#[command(about = "Photo renditions and catalog for a static site")]
#[command(long_about = "\
Photo renditions and catalog for a static site

Source photos live in one flat directory, each with an optional YAML sidecar:

  source/photos/
  ├── DSC_0001.jpg
  ├── DSC_0001.yaml      # title, slug, date, description, tags, camera, location
  └── lisbon.png         # no sidecar: slug and title from the filename

'process' writes five renditions per photo:

  public/assets/images/<slug>/
  ├── thumbnail.jpg  thumbnail.webp
  ├── medium.jpg     medium.webp
  └── original.jpg

Complete sets are skipped on later runs unless --force is given.

'catalog' prints the photos (newest first) as JSON with their public URLs.

Run 'contact-sheet gen-config' to generate a documented contact-sheet.toml.")]
#[command(version)]
struct Cli {
    /// Config file (optional; defaults apply when absent)
    #[arg(long, default_value = "contact-sheet.toml", global = true)]
    config: PathBuf,

    /// Source photo directory (overrides the config file)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Rendition output directory (overrides the config file)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate renditions for every source photo
    Process {
        /// Regenerate rendition sets even when complete
        #[arg(long)]
        force: bool,
    },
    /// Print the photo catalog as JSON, newest first
    Catalog {
        /// Only photos carrying this tag
        #[arg(long)]
        tag: Option<String>,
        /// Maximum number of photos
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print every tag with its photo count
    Tags,
    /// Print the newest photos as JSON
    Recent {
        #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },
    /// Print a stock contact-sheet.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Process { force } => {
            let config = load_config(&cli)?;
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process(&config, *force, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            output::print_summary(&result?);
        }
        Command::Catalog { tag, limit } => {
            let catalog = Catalog::new(&load_config(&cli)?);
            let mut photos = match tag {
                Some(tag) => catalog.photos_by_tag(tag),
                None => catalog.all_photos(),
            };
            if let Some(limit) = limit {
                photos.truncate(*limit);
            }
            for conflict in catalog.slug_conflicts() {
                tracing::warn!(
                    slug = %conflict.slug,
                    files = ?conflict.filenames,
                    "several photos share a slug"
                );
            }
            println!("{}", serde_json::to_string_pretty(&photos)?);
        }
        Command::Tags => {
            output::print_tags(&Catalog::new(&load_config(&cli)?).all_tags());
        }
        Command::Recent { limit } => {
            let photos = Catalog::new(&load_config(&cli)?).recent_photos(*limit);
            println!("{}", serde_json::to_string_pretty(&photos)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file and apply command-line directory overrides.
fn load_config(cli: &Cli) -> Result<GalleryConfig, config::ConfigError> {
    let mut config = config::load_config(&cli.config)?;
    if let Some(source) = &cli.source {
        config.source_dir = source.clone();
    }
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    Ok(config)
}
