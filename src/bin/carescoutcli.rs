use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use cs_nhs::{
    aggregate, constants, export, EndpointConfig, Finder, Harvest, PacingBuilder, SearchEndpoint,
    ServiceType,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct CliArgs {
    #[command(subcommand)]
    pub subcommand: Command,

    #[command(flatten)]
    pub global_opts: GlobalOpts,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    #[arg(
        long,
        global = true,
        help = "Override the A&E results page URL format ($postcode token)"
    )]
    pub ae_endpoint: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Override the UTC results page URL format ($postcode token)"
    )]
    pub utc_endpoint: Option<String>,

    #[arg(long, global = true, help = "Override the postcode lookup endpoint")]
    pub geocode_endpoint: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[clap(name = "find", about = "Find facilities near one postcode, as JSON")]
    Find {
        postcode: String,

        #[arg(short = 's', long, default_value = "ae", help = "Service type: ae or utc")]
        service_type: ServiceType,
    },

    #[clap(
        name = "harvest",
        about = "Scrape facilities for a whole postcode list into CSV"
    )]
    Harvest {
        #[arg(short = 'p', long = "postcode", help = "Postcode to query (repeatable)")]
        postcodes: Vec<String>,

        #[arg(
            short = 'f',
            long,
            conflicts_with = "postcodes",
            help = "Newline-delimited postcode list file"
        )]
        postcodes_file: Option<PathBuf>,

        #[arg(
            short = 's',
            long,
            default_value = "both",
            help = "Service types to query: ae, utc or both"
        )]
        services: ServiceSelection,

        #[arg(short = 'o', long, default_value = "facilities.csv", help = "Output CSV path")]
        output: PathBuf,

        #[arg(long, help = "Also save the rows as JSON")]
        json: Option<PathBuf>,

        #[arg(long, default_value_t = 5.0, help = "Fixed delay between queries, seconds")]
        delay_secs: f64,

        #[arg(long, default_value_t = 0.0, help = "Random extra delay on top, seconds")]
        jitter_secs: f64,

        #[arg(long, default_value_t = 1, help = "Queries in flight at once")]
        concurrency: usize,
    },
}

/// Which service types one harvest run covers.
#[derive(Clone, Copy, Debug, PartialEq)]
enum ServiceSelection {
    One(ServiceType),
    Both,
}

impl ServiceSelection {
    fn service_types(self) -> Vec<ServiceType> {
        match self {
            ServiceSelection::One(service_type) => vec![service_type],
            ServiceSelection::Both => vec![
                ServiceType::AccidentEmergency,
                ServiceType::UrgentTreatment,
            ],
        }
    }
}

impl FromStr for ServiceSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("both") {
            return Ok(ServiceSelection::Both);
        }
        s.parse()
            .map(ServiceSelection::One)
            .map_err(|e| e.to_string())
    }
}

fn endpoint_config(opts: GlobalOpts) -> Result<EndpointConfig> {
    let parse = |format: Option<String>| -> Result<Option<SearchEndpoint>> {
        format
            .map(|format| {
                SearchEndpoint::try_new(
                    format,
                    constants::DEFAULT_SEARCH_URL_REPLACE_TOKEN.to_string(),
                )
            })
            .transpose()
            .context("invalid endpoint override")
    };
    Ok(EndpointConfig {
        accident_emergency: parse(opts.ae_endpoint)?,
        urgent_treatment: parse(opts.utc_endpoint)?,
        geocode: opts.geocode_endpoint,
    })
}

fn read_postcode_list(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read postcode list {}", path.display()))?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = CliArgs::parse();
    let http = reqwest::Client::builder().gzip(true).brotli(true).build()?;
    let finder = Finder::new(http, endpoint_config(args.global_opts)?);

    match args.subcommand {
        Command::Find {
            postcode,
            service_type,
        } => {
            let facilities = finder.find_nearest(&postcode, service_type).await?;
            println!("{}", serde_json::to_string_pretty(&facilities)?);
        }
        Command::Harvest {
            postcodes,
            postcodes_file,
            services,
            output,
            json,
            delay_secs,
            jitter_secs,
            concurrency,
        } => {
            let postcodes = match postcodes_file {
                Some(path) => read_postcode_list(&path)?,
                None => postcodes,
            };
            if postcodes.is_empty() {
                bail!("no postcodes given: pass --postcode or --postcodes-file");
            }
            let service_types = services.service_types();
            let pacing = PacingBuilder::default()
                .delay(Duration::from_secs_f64(delay_secs))
                .jitter(Duration::from_secs_f64(jitter_secs))
                .concurrency(concurrency)
                .build()?;

            let progress = ProgressBar::new((postcodes.len() * service_types.len()) as u64);
            progress.set_style(
                ProgressStyle::with_template(
                    "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap(),
            );
            let mut harvest = Harvest::default();
            for service_type in service_types {
                let run = aggregate::collect_facilities_with(
                    &finder,
                    &postcodes,
                    service_type,
                    &pacing,
                    |_| progress.inc(1),
                )
                .await;
                harvest.merge(run);
            }
            progress.finish();

            for failure in &harvest.failures {
                eprintln!(
                    "warning: {} ({}) failed: {}",
                    failure.postcode, failure.service_type, failure.error
                );
            }
            if harvest.facilities.is_empty() && !harvest.failures.is_empty() {
                bail!("all {} queries failed", harvest.failures.len());
            }
            export::write_csv(&output, &harvest.facilities)?;
            if let Some(json_path) = json {
                export::save_json(&json_path, &harvest.facilities).await?;
            }
            println!(
                "Wrote {} facilities to {} ({} failed queries)",
                harvest.facilities.len(),
                output.display(),
                harvest.failures.len()
            );
        }
    }

    Ok(())
}
