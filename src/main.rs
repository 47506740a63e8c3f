use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use daylight3d::io::{read_config, read_parameters, read_request, to_json_string};
use daylight3d::regulation::TimeWindow;
use daylight3d::sim::solar::{EphemerisConfig, reference_winter_solstice};
use daylight3d::{ComplianceEngine, EngineConfig, MassingGenerator, SiteLocation, SolarTable};

#[derive(Parser)]
#[command(name = "daylight3d", about = "Shadow-regulation compliance checks")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a compliance request and print the result as JSON
    Check {
        /// Path to the request JSON
        request: PathBuf,
        /// Path to an engine configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Generate the massing for building parameters and print it as JSON
    Massing {
        /// Path to the building parameters JSON
        params: PathBuf,
        /// Site latitude in degrees, orients setbacks and balconies
        #[arg(long)]
        lat: Option<f64>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the sun positions over the regulated window
    Sun {
        /// Latitude in degrees (positive north)
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees (positive east)
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Date (YYYY-MM-DD), defaults to the last winter solstice
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Time step in hours
        #[arg(long, default_value = "0.5")]
        step: f64,
        /// Window start hour
        #[arg(long, default_value = "8")]
        start: f64,
        /// Window end hour
        #[arg(long, default_value = "16")]
        end: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Check {
            request,
            config,
            pretty,
        } => {
            let request = read_request(&request)?;
            let config = match config {
                Some(path) => read_config(&path)?,
                None => EngineConfig::default(),
            };
            let engine = ComplianceEngine::new(config);
            let result = engine
                .check_compliance(&request)
                .context("Compliance check failed")?;
            println!("{}", to_json_string(&result, pretty)?);
        }
        Commands::Massing { params, lat, pretty } => {
            let params = read_parameters(&params)?;
            let site = lat.map(|lat| SiteLocation::new(lat, 0.0, "")).transpose()?;
            let massing = MassingGenerator::default().generate(&params, site.as_ref())?;
            println!("{}", to_json_string(&massing, pretty)?);
        }
        Commands::Sun {
            lat,
            lon,
            date,
            step,
            start,
            end,
        } => {
            let site = SiteLocation::new(lat, lon, "")?;
            let date = match date {
                Some(d) => d,
                None => reference_winter_solstice(Local::now().date_naive(), lat)?,
            };
            let config = EphemerisConfig {
                step_hours: step,
                ..EphemerisConfig::new()
            };
            let table = SolarTable::compute(&site, date, &TimeWindow::new(start, end), &config)?;
            println!("# {} lat={:.4} lon={:.4}", date, lat, lon);
            println!("{:>7} {:>9} {:>9}", "hour", "altitude", "azimuth");
            for s in &table.samples {
                println!(
                    "{:>7.3} {:>9.3} {:>9.3}",
                    s.hour, s.position.altitude, s.position.azimuth
                );
            }
        }
    }
    Ok(())
}
