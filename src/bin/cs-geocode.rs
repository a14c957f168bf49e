use clap::Parser;
use cs_nhs::geocode::GeocodeTable;
use serde_json::json;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'e', long, help = "Postcode lookup endpoint override")]
    endpoint: Option<String>,
    #[arg(required = true, help = "Postcodes to resolve")]
    postcodes: Vec<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let client = reqwest::Client::builder()
        .gzip(true)
        .brotli(true)
        .build()
        .unwrap();
    let postcodes: Vec<Option<String>> = args.postcodes.into_iter().map(Some).collect();
    let table = GeocodeTable::lookup(&client, &postcodes, args.endpoint.as_deref()).await;
    if table.is_err() {
        println!(
            "{}",
            json!({
                "error": format!("Failed to resolve postcodes: {:?}", table.err().unwrap()),
            })
        );
        return;
    }
    println!("{}", serde_json::to_string_pretty(&table.unwrap()).unwrap());
}
