//! ntrip-catalog CLI
//!
//! Tests a caster URL, mountpoint and rover location against an
//! `ntrip-catalog.json` and prints the CRS the rover should use.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use ntrip_catalog::{resolve_crs, Catalog, NtripClient, ReqwestNtripClient, RoverPosition};
use tracing::info;
use url::Url;

/// Fallback NTRIP caster port when neither the URL nor `--port` carries one.
const DEFAULT_NTRIP_PORT: u16 = 2101;

#[derive(Parser)]
#[command(name = "ntrip-catalog")]
#[command(version = ntrip_catalog::VERSION)]
#[command(about = "Resolve the CRS for an NTRIP caster mountpoint", long_about = None)]
struct Args {
    /// Path to ntrip-catalog.json
    #[arg(long, default_value = "dist/ntrip-catalog.json")]
    catalog: PathBuf,

    /// URL of the NTRIP caster (scheme defaults to http)
    #[arg(long)]
    url: String,

    /// Caster port, used when the URL does not include one
    #[arg(long, default_value_t = DEFAULT_NTRIP_PORT)]
    port: u16,

    /// Mountpoint to resolve
    #[arg(long)]
    mountpoint: String,

    /// Rover latitude in decimal degrees
    #[arg(long)]
    rover_lat: f64,

    /// Rover longitude in decimal degrees
    #[arg(long)]
    rover_lon: f64,

    /// Rover country (3-letter code)
    #[arg(long)]
    rover_country: Option<String>,

    /// Sourcetable content, or a path to a file holding it.
    /// When provided no HTTP request is made.
    #[arg(long)]
    sourcetable: Option<String>,

    /// Log the fetched sourcetable before resolving
    #[arg(long, default_value_t = false)]
    log_streams: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0} is not a valid URL")]
    InvalidUrl(String),
    #[error("cannot find STR in provided sourcetable")]
    SourcetableWithoutStreams,
    #[error(transparent)]
    Catalog(#[from] ntrip_catalog::CatalogError),
    #[error(transparent)]
    Client(#[from] ntrip_catalog::ClientError),
    #[error(transparent)]
    Resolve(#[from] ntrip_catalog::ResolveError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Normalizes a caster URL for catalog lookup: scheme defaults to `http`,
/// an explicit port wins, otherwise `fallback_port` applies.
fn normalize_caster_url(raw: &str, fallback_port: u16) -> Result<String, CliError> {
    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    let parsed =
        Url::parse(&with_scheme).map_err(|_| CliError::InvalidUrl(raw.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| CliError::InvalidUrl(raw.to_string()))?;
    let port = parsed.port().unwrap_or(fallback_port);

    Ok(format!("{}://{}:{}", parsed.scheme(), host, port))
}

/// Reads the `--sourcetable` argument: a file path when one exists, inline
/// content otherwise. Rejected when it contains no STR record at all.
fn sourcetable_lines(arg: &str) -> Result<Vec<String>, CliError> {
    let content = if Path::new(arg).exists() {
        std::fs::read_to_string(arg)?
    } else {
        arg.to_string()
    };

    if !content.contains("STR") {
        return Err(CliError::SourcetableWithoutStreams);
    }
    Ok(content.lines().map(str::to_string).collect())
}

async fn run(args: Args) -> Result<(), CliError> {
    let url = normalize_caster_url(&args.url, args.port)?;
    let client = ReqwestNtripClient::new()?;

    if args.log_streams {
        info!("Connecting to {url}");
        for line in client.fetch_sourcetable(&url).await? {
            info!("{line}");
        }
    }

    let catalog = Catalog::from_path(&args.catalog)?;
    let Some(entry) = catalog.find_entry(&url) else {
        println!("{url} is not in the catalog");
        return Ok(());
    };

    let presupplied = args
        .sourcetable
        .as_deref()
        .map(sourcetable_lines)
        .transpose()?;

    let rover = RoverPosition::new(args.rover_lat, args.rover_lon);
    let crs = resolve_crs(
        entry,
        &url,
        &args.mountpoint,
        rover,
        args.rover_country.as_deref(),
        presupplied,
        &client,
    )
    .await?;

    match crs {
        Some(crs) => {
            println!("{} ({})", crs.id, crs.name);
            if let Some(description) = &crs.description {
                println!("  {description}");
            }
        }
        None => println!("No CRS matches {} at this location", args.mountpoint),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    ntrip_catalog::logging::init("info");
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
