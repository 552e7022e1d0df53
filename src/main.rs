use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use manuscript_parser::config::{
    find_config_file, get_config, load_config, save_config, Config, CONFIG_FILE_NAME,
};
use manuscript_parser::models::{EnhancedDocument, RawDocument};
use manuscript_parser::parsers::ParserRegistry;
use manuscript_parser::service::ParsingService;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Manuscript Parser - Turn uploaded manuscripts into structured research documents
#[derive(Parser, Debug)]
#[command(name = "manuscript-parser")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract titles, sections and keywords from text, Word, PDF and Pages manuscripts", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress everything but errors in the log
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a manuscript and print the structured document as JSON
    #[command(alias = "p")]
    Parse {
        /// Manuscript file
        file: PathBuf,

        /// Declared MIME type (detected from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,

        /// Do not take the first line or PDF metadata as the title
        #[arg(long)]
        no_title: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List supported formats
    Formats,

    /// Print the sections detected in a manuscript
    Sections {
        /// Manuscript file
        file: PathBuf,

        /// Declared MIME type (detected from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,
    },

    /// Write the effective configuration to a TOML file
    InitConfig {
        /// Destination (default: ./manuscript-parser.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("Failed to load config file {}", config_path.display()))?
    } else {
        get_config().context("Failed to load configuration")?
    };

    init_tracing(&cli, &config);

    if cli.config.is_none() {
        if let Some(path) = find_config_file() {
            tracing::info!("Using config file: {}", path.display());
        }
    }

    ParserRegistry::init();
    let service = ParsingService::from_config(&config);

    match cli.command {
        Commands::Parse {
            file,
            mime,
            no_title,
            pretty,
        } => {
            let mut options = config.parser_options();
            if no_title {
                options = options.extract_title(false);
            }

            let raw = read_upload(&file, mime).await?;
            let result = service.parse(raw, options).await;

            let json = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{}", json);

            exit_on_error(&result);
        }
        Commands::Formats => {
            for parser in ParserRegistry::global().all() {
                println!(
                    "{:<6} {:<28} {}",
                    parser.format().id(),
                    parser.extensions().join(", "),
                    parser.mime_types().join(", ")
                );
            }
        }
        Commands::Sections { file, mime } => {
            let raw = read_upload(&file, mime).await?;
            let result = service.parse(raw, config.parser_options()).await;

            if let Some(error) = &result.document.error {
                eprintln!("Error: {}", error);
            } else if result.document.sections.is_empty() {
                println!("No sections detected");
            } else {
                for section in &result.document.sections {
                    println!(
                        "{:<18} {} ({} chars)",
                        section.kind.name(),
                        section.heading,
                        section.text.chars().count()
                    );
                }
            }
            for warning in &result.document.warnings {
                eprintln!("Warning: {}", warning);
            }

            exit_on_error(&result);
        }
        Commands::InitConfig { path, force } => {
            let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            save_config(&config, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn init_tracing(cli: &Cli, config: &Config) {
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };
    let json = config.logging.is_json();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("manuscript_parser={}", env_filter)),
        ))
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

async fn read_upload(path: &Path, mime: Option<String>) -> Result<RawDocument> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(RawDocument::new(bytes, mime, file_name))
}

fn exit_on_error(result: &EnhancedDocument) {
    if result.is_error() {
        std::process::exit(1);
    }
}
