use clap::{Parser, Subcommand};
use reqwest::Url;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Management CLI for the IPv4 route table", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: Url,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a route, or update its next hop
    Add { prefix: String, next_hop: String },
    /// List all routes
    List,
    /// Resolve an address to its longest matching route
    Lookup { ip: String },
    /// Delete a route by exact prefix
    Delete { prefix: String },
    /// Check service status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = match cli.command {
        Commands::Add { prefix, next_hop } => {
            client
                .post(endpoint(&cli.url, &["routes"])?)
                .json(&json!({ "prefix": prefix, "next_hop": next_hop }))
                .send()
                .await?
        }
        Commands::List => client.get(endpoint(&cli.url, &["routes"])?).send().await?,
        Commands::Lookup { ip } => {
            client
                .get(endpoint(&cli.url, &["lookup", &ip])?)
                .send()
                .await?
        }
        Commands::Delete { prefix } => {
            client
                .delete(endpoint(&cli.url, &["routes", &prefix])?)
                .send()
                .await?
        }
        Commands::Status => client.get(endpoint(&cli.url, &["status"])?).send().await?,
    };

    print_response(res).await
}

/// Append path segments to `base`, percent-encoding each (a prefix's `/`
/// becomes `%2F`).
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("{base} cannot be used as a base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let body = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{body}");
        Ok(())
    } else {
        eprintln!("Error: route table returned status {}", status);
        eprintln!("{body}");
        std::process::exit(1);
    }
}
