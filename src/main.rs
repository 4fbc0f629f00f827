use clap::{Parser, Subcommand};
use folio::{config, generate, output, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for a personal blog")]
#[command(long_about = "\
Static site generator for a personal blog

Posts are markdown files with YAML frontmatter. Tags link posts together,
pages become navigation entries, and the output is a plain static site with
an RSS feed, a web manifest and an offline service worker.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── assets/                      # Copied to dist/assets/ (avatar, favicon)
  ├── blog/
  │   ├── hello-world/
  │   │   ├── index.md             # Post → /hello-world/
  │   │   └── cover.jpg            # Referenced files are copied alongside
  │   └── short-note.md            # Post → /short-note/
  └── pages/
      ├── 010-about.md             # Page (numbered = shown in nav) → /about/
      └── uses.md                  # No number = hidden from nav → /uses/

Frontmatter keys: title, date (required for posts), description, tags,
author, cover, draft, seo_title, social.

Environment: .env.<mode> is loaded if present. GOOGLE_ANALYTICS_TRACKING_ID
and MAILCHIMP_ENDPOINT override the analytics and newsletter settings.

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".folio-temp", global = true)]
    temp_dir: PathBuf,

    /// Build mode; selects the `.env.<mode>` file to load
    #[arg(long, default_value = "production", global = true)]
    mode: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Produce the final site from the scanned manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if !matches!(cli.command, Command::GenConfig) {
        load_env_file(&cli.mode)?;
    }

    let manifest_path = cli.temp_dir.join("manifest.json");

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate => {
            let manifest_content = std::fs::read_to_string(&manifest_path)?;
            let manifest: scan::Manifest = serde_json::from_str(&manifest_content)?;
            init_thread_pool(&manifest.config.processing);
            let summary = generate::generate_site(&manifest, &cli.source, &cli.output)?;
            output::print_generate_output(&summary);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            init_thread_pool(&manifest.config.processing);
            let summary = generate::generate(&manifest_path, &cli.source, &cli.output)?;
            output::print_generate_output(&summary);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `info` by default, `debug` with `--verbose`; `RUST_LOG` wins over both.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Load `.env.<mode>` from the working directory. Variables already set in
/// the process environment are kept.
fn load_env_file(mode: &str) -> Result<(), dotenvy::Error> {
    let path = PathBuf::from(format!(".env.{mode}"));
    if path.exists() {
        dotenvy::from_path(&path)?;
        tracing::debug!("loaded {}", path.display());
    }
    Ok(())
}

fn write_manifest(manifest: &scan::Manifest, temp_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
