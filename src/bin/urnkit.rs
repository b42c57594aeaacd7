//! urnkit CLI - extract records from already-fetched JSON payloads
//!
//! Every command reads one response document from `--input` (a file, or `-`
//! for stdin) and writes JSON to stdout. Logs go to stderr; set `RUST_LOG`
//! to change verbosity.

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::error::Error;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use urnkit::anchor::{list_elements, locate};
use urnkit::document::{read_json_file, ResponseDocument};
use urnkit::output::{write_records, write_value};
use urnkit::{ContainsAll, ExtractionConfig, OutputFormat, Pipeline, ReferenceResolver};

const CONFIG_ENV: &str = "URNKIT_CONFIG";

#[derive(Parser)]
#[command(name = "urnkit")]
#[command(version, about = "Resolve references and extract records from denormalized JSON payloads", long_about = None)]
struct Cli {
    /// Extraction config (YAML). Falls back to $URNKIT_CONFIG, then built-in defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the experience section, most recent first
    Experiences {
        /// Payload file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Also print diagnostics and paging to stderr
        #[arg(long)]
        report: bool,
    },

    /// Project the positions listed under `data`
    Positions {
        /// Payload file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },

    /// Flatten one profile
    Profile {
        /// Payload file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Vanity name or profile URL
        #[arg(short, long)]
        vanity: String,
    },

    /// Resolve one entity's pointer fields
    Resolve {
        /// Payload file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Identifier of the entity to resolve
        #[arg(short, long)]
        urn: String,
    },

    /// Find the first entity whose identifier contains every substring
    Anchor {
        /// Payload file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Substrings the identifier must contain
        #[arg(long, required = true, num_args = 1..)]
        contains: Vec<String>,
    },

    /// Print an outline of the payload structure
    Inspect {
        /// Payload file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Maximum nesting depth
        #[arg(short, long, default_value_t = 4)]
        depth: usize,
    },
}

fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("urnkit=info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = load_config(cli.config.as_deref())?;
    let format = cli.format;

    match cli.command {
        Commands::Experiences { input, report } => {
            let document = read_input(&input)?;
            let section = Pipeline::new(config).experiences(&document);
            if report {
                eprintln!("anchor: {}", section.anchor_urn.as_deref().unwrap_or("none"));
                if let Some(paging) = section.paging {
                    eprintln!("paging: {}", serde_json::to_string(&paging)?);
                }
                for diagnostic in section.diagnostics.iter() {
                    eprintln!("  {}", diagnostic);
                }
            }
            write_records(io::stdout().lock(), &section.records, format)?;
        }
        Commands::Positions { input } => {
            let document = read_input(&input)?;
            let records = Pipeline::new(config).positions(&document);
            write_records(io::stdout().lock(), &records, format)?;
        }
        Commands::Profile { input, vanity } => {
            let document = read_input(&input)?;
            let report = Pipeline::new(config).profile(&document, &vanity);
            let profile = report
                .profile
                .ok_or_else(|| format!("profile '{}' not found", vanity))?;
            write_value(io::stdout().lock(), &profile, format)?;
        }
        Commands::Resolve { input, urn } => {
            let document = read_input(&input)?;
            let index = ResponseDocument::new(&document).index();
            let entity = index
                .lookup(&urn)
                .ok_or_else(|| format!("entity '{}' not found in pool", urn))?;
            let resolved = ReferenceResolver::new(&index)
                .with_marker(config.pointer_marker)
                .resolve_entity(entity);
            write_value(io::stdout().lock(), &resolved, format)?;
        }
        Commands::Anchor { input, contains } => {
            let document = read_input(&input)?;
            let index = ResponseDocument::new(&document).index();
            let anchor = locate(&index, &ContainsAll(contains)).ok_or("no entity matched")?;
            info!(elements = list_elements(anchor.entity).len(), "anchor elements");
            write_value(io::stdout().lock(), anchor.entity, format)?;
        }
        Commands::Inspect { input, depth } => {
            let document = read_input(&input)?;
            print!("{}", urnkit::outline::outline(&document, depth));
        }
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<ExtractionConfig, Box<dyn Error>> {
    let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);

    match explicit.map(Path::to_path_buf).or(from_env) {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            Ok(ExtractionConfig::load_from_file(path)?)
        }
        None => Ok(ExtractionConfig::default()),
    }
}

fn read_input(input: &Path) -> Result<Value, Box<dyn Error>> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(serde_json::from_str(&buf)?);
    }
    Ok(read_json_file(input)?)
}
