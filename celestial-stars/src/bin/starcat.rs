use anyhow::{bail, Context};
use celestial_stars::{Catalog, CatalogLoader, LoaderConfig, StarRecord};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "starcat")]
#[command(about = "Inspect, query and downsample binary star catalogs")]
#[command(version)]
struct Cli {
    /// Path to the binary star catalog (stars.dat)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Path to the star name table (starnames.dat)
    #[arg(long, global = true)]
    names: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print catalog summary
    Info,
    /// Look up one star by name or HIP number
    Lookup {
        /// Star name (e.g. Vega) or HIP number (e.g. 91262 or HIP91262)
        star: String,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// List the brightest stars
    Brightest {
        /// Number of stars to list
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Write a catalog reduced to the brightest stars
    Downsample {
        /// Number of stars to keep
        #[arg(long)]
        count: usize,
        /// Output catalog file
        #[arg(long)]
        output: PathBuf,
        /// Output name table (requires --names)
        #[arg(long)]
        names_output: Option<PathBuf>,
    },
    /// Fetch catalog and names over HTTP and print the summary
    Fetch {
        /// Base URL serving stars.dat and starnames.dat
        #[arg(long)]
        base_url: String,
        /// Downsample to this many stars after loading
        #[arg(long)]
        max_stars: Option<usize>,
        /// Request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .init();

    match &cli.command {
        Commands::Info => {
            let path = catalog_path(&cli)?;
            let catalog = load_local(&cli)?;
            let size = fs::metadata(path)?.len();
            println!("{}", catalog);
            println!(
                "File size: {} bytes ({:.2} MB)",
                size,
                size as f64 / 1_048_576.0
            );
        }
        Commands::Lookup { star, format } => {
            let catalog = load_local(&cli)?;
            let Some(record) = find_star(&catalog, star) else {
                bail!("No star named or numbered '{}'", star);
            };
            print_stars(&catalog, &[record], format);
        }
        Commands::Brightest { limit, format } => {
            let catalog = load_local(&cli)?;
            print_stars(&catalog, &catalog.brightest(*limit), format);
        }
        Commands::Downsample {
            count,
            output,
            names_output,
        } => run_downsample(&cli, *count, output, names_output.as_deref())?,
        Commands::Fetch {
            base_url,
            max_stars,
            timeout,
        } => {
            let mut config =
                LoaderConfig::new(base_url.as_str()).with_timeout(Duration::from_secs(*timeout));
            config.max_stars = *max_stars;
            let loader = CatalogLoader::new(config)?;

            let start = Instant::now();
            let catalog = loader.fetch().await?;
            info!(
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Fetch completed"
            );
            println!("{}", catalog);
        }
    }

    Ok(())
}

fn catalog_path(cli: &Cli) -> anyhow::Result<&Path> {
    cli.catalog
        .as_deref()
        .context("--catalog <stars.dat> is required for this command")
}

fn run_downsample(
    cli: &Cli,
    count: usize,
    output: &Path,
    names_output: Option<&Path>,
) -> anyhow::Result<()> {
    if names_output.is_some() && cli.names.is_none() {
        bail!("--names-output requires --names");
    }
    let catalog = load_local(cli)?;
    let reduced = catalog.downsample(count);
    fs::write(output, reduced.to_bytes())
        .with_context(|| format!("Failed to write catalog: {:?}", output))?;
    println!(
        "Wrote {} of {} stars to {:?}",
        reduced.num_stars(),
        catalog.num_stars(),
        output
    );
    if let Some(names_path) = names_output {
        fs::write(names_path, reduced.write_names())
            .with_context(|| format!("Failed to write names: {:?}", names_path))?;
        println!("Wrote {} names to {:?}", reduced.name_count(), names_path);
    }
    Ok(())
}

fn load_local(cli: &Cli) -> anyhow::Result<Catalog> {
    let path = catalog_path(cli)?;
    let start = Instant::now();
    let mut catalog = Catalog::open(path)
        .with_context(|| format!("Failed to open catalog file: {:?}", path))?;

    if let Some(names_path) = &cli.names {
        let text = fs::read_to_string(names_path)
            .with_context(|| format!("Failed to read name table: {:?}", names_path))?;
        let stats = catalog.read_names(&text)?;
        info!(
            names = stats.names,
            unknown_ids = stats.unknown_ids,
            malformed = stats.malformed,
            "Attached star names"
        );
    }

    info!(
        stars = catalog.num_stars(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Catalog loaded"
    );
    Ok(catalog)
}

fn find_star<'a>(catalog: &'a Catalog, query: &str) -> Option<&'a StarRecord> {
    let numeric = query
        .trim()
        .trim_start_matches("HIP")
        .trim_start_matches("hip")
        .trim();
    if let Ok(hip) = numeric.parse::<u32>() {
        if let Some(star) = catalog.star(hip) {
            return Some(star);
        }
    }
    catalog.star_by_name(query.trim())
}

fn print_stars(catalog: &Catalog, stars: &[&StarRecord], format: &OutputFormat) {
    match format {
        OutputFormat::Table => print_table(catalog, stars),
        OutputFormat::Json => print_json(catalog, stars),
        OutputFormat::Csv => print_csv(catalog, stars),
    }
}

fn print_table(catalog: &Catalog, stars: &[&StarRecord]) {
    for (i, star) in stars.iter().enumerate() {
        println!(
            "{:4}: HIP {:>7} {:<24} {:<6} M={:6.2} Dist={:10.2} ly L={:.3e}",
            i + 1,
            star.hip_id,
            catalog.primary_name(star.hip_id).unwrap_or("-"),
            star.spectral_type(),
            star.magnitude(),
            star.distance(),
            star.lum_rel_sun
        );
    }

    if stars.is_empty() {
        println!("No stars found.");
    } else {
        println!("\nTotal results: {}", stars.len());
    }
}

#[derive(serde::Serialize)]
struct JsonStar<'a> {
    hip_id: u32,
    names: &'a [String],
    spectral_type: String,
    abs_mag: f32,
    x: f32,
    y: f32,
    z: f32,
    distance_ly: f32,
    lum_rel_sun: f32,
}

fn print_json(catalog: &Catalog, stars: &[&StarRecord]) {
    let records: Vec<JsonStar> = stars
        .iter()
        .map(|s| JsonStar {
            hip_id: s.hip_id,
            names: catalog.names(s.hip_id),
            spectral_type: s.spectral_type(),
            abs_mag: s.magnitude(),
            x: s.x,
            y: s.y,
            z: s.z,
            distance_ly: s.distance(),
            lum_rel_sun: s.lum_rel_sun,
        })
        .collect();

    match serde_json::to_string_pretty(&records) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize results: {}", e),
    }
}

fn print_csv(catalog: &Catalog, stars: &[&StarRecord]) {
    println!("hip_id,name,spectral_type,abs_mag,x,y,z,distance_ly");
    for s in stars {
        println!(
            "{},{},{},{},{},{},{},{}",
            s.hip_id,
            catalog.primary_name(s.hip_id).unwrap_or(""),
            s.spectral_type(),
            s.magnitude(),
            s.x,
            s.y,
            s.z,
            s.distance()
        );
    }
}
