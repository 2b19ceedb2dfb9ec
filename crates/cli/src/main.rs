use anyhow::Context;
use clap::{Parser, Subcommand};
use plates_core::config::storage_location_from_env_value;
use plates_core::constants::STORAGE_LOCATION_ENV;
use plates_core::{CoreConfig, PhotoService};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "plates")]
#[command(about = "RealPlates photo storage CLI")]
struct Cli {
    /// Storage directory (overrides PLATES_STORAGE_LOCATION, default "uploads")
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the storage directory and print its absolute path
    Init,
    /// Upload a photo and print the stored record as JSON
    Upload {
        /// Path of the photo to upload
        file: PathBuf,
    },
    /// Fetch a stored photo by the url returned from upload
    Fetch {
        /// Stored photo name, e.g. 550e8400e29b41d4a716446655440000.jpg
        id: String,
        /// Write the photo here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Exit code for requests rejected because of their input.
const EXIT_REJECTED: u8 = 2;

/// Resolves the storage location, preferring the CLI flag over the environment.
fn resolve_config(flag: Option<PathBuf>, env_value: Option<String>) -> anyhow::Result<CoreConfig> {
    let location = flag.unwrap_or_else(|| storage_location_from_env_value(env_value));
    Ok(CoreConfig::new(location)?)
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so `fetch` can stream photo bytes on stdout.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("plates=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'plates --help' for commands");
        return Ok(ExitCode::SUCCESS);
    };

    let config = resolve_config(cli.storage, std::env::var(STORAGE_LOCATION_ENV).ok())?;
    let service = PhotoService::initialise(&config).with_context(|| {
        format!(
            "could not initialise storage at {}",
            config.storage_location().display()
        )
    })?;

    match command {
        Commands::Init => {
            println!("{}", service.blob_store().root().path().display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Upload { file } => upload(&service, &file),
        Commands::Fetch { id, out } => fetch(&service, &id, out.as_deref()),
    }
}

fn upload(service: &PhotoService, file: &Path) -> anyhow::Result<ExitCode> {
    let data = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let original_filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    match service.upload_photo(&data, &original_filename) {
        Ok(photo) => {
            println!("{}", serde_json::to_string_pretty(&photo)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_client_error() => {
            eprintln!("rejected: {}", e);
            Ok(ExitCode::from(EXIT_REJECTED))
        }
        Err(e) => Err(e.into()),
    }
}

fn fetch(service: &PhotoService, id: &str, out: Option<&Path>) -> anyhow::Result<ExitCode> {
    let Some(handle) = service.get_photo_as_resource(id) else {
        eprintln!("not found: {}", id);
        return Ok(ExitCode::FAILURE);
    };

    tracing::info!(
        "fetched {} ({} bytes, {})",
        handle.filename(),
        handle.size_bytes(),
        handle.media_type().unwrap_or("unknown type")
    );

    let bytes = handle
        .read_bytes()
        .with_context(|| format!("failed to read {}", handle.path().display()))?;

    match out {
        Some(path) => std::fs::write(path, &bytes)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
