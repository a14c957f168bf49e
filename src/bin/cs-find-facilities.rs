use clap::Parser;
use cs_nhs::{constants, EndpointConfig, Facility, Finder, SearchEndpoint, ServiceType};

#[derive(Parser, Debug)]
struct Args {
    #[arg(help = "Postcode to search for facilities near")]
    postcode: String,
    #[arg(short = 's', long, default_value = "ae", help = "Service type: ae or utc")]
    service_type: ServiceType,
    #[arg(
        short = 'e',
        long,
        help = "Results page URL format override ($postcode token)"
    )]
    search_endpoint: Option<String>,
    #[arg(short = 'g', long, help = "Postcode lookup endpoint override")]
    geocode_endpoint: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let http = reqwest::Client::builder()
        .gzip(true)
        .brotli(true)
        .build()
        .unwrap();
    let search = args.search_endpoint.map(|format| {
        SearchEndpoint::try_new(
            format,
            constants::DEFAULT_SEARCH_URL_REPLACE_TOKEN.to_string(),
        )
        .unwrap()
    });
    let endpoints = match args.service_type {
        ServiceType::AccidentEmergency => EndpointConfig {
            accident_emergency: search,
            geocode: args.geocode_endpoint,
            ..Default::default()
        },
        ServiceType::UrgentTreatment => EndpointConfig {
            urgent_treatment: search,
            geocode: args.geocode_endpoint,
            ..Default::default()
        },
    };
    let finder = Finder::new(http, endpoints);
    let facilities = finder
        .find_nearest(&args.postcode, args.service_type)
        .await
        .unwrap();
    println!(
        "{}",
        serde_json::to_string::<Vec<Facility>>(&facilities).unwrap()
    );
}
