use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "envprobe-cli")]
#[command(about = "Query a running envprobe instance", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the service is alive
    Ping,
    /// Probe every configured host now
    NetCheck,
    /// Dump environment variables and secrets
    Env,
    /// Print the Prometheus exposition
    Metrics,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Ping => {
            let res = client.get(format!("{}/ping", base)).send().await?;
            print_json(res).await?;
        }
        Commands::NetCheck => {
            let res = client.get(format!("{}/net-check", base)).send().await?;
            print_json(res).await?;
        }
        Commands::Env => {
            let res = client.get(format!("{}/json", base)).send().await?;
            print_json(res).await?;
        }
        Commands::Metrics => {
            let res = client.get(format!("{}/metrics", base)).send().await?;
            if let Some(res) = check_status(res).await? {
                print!("{}", res.text().await?);
            }
        }
    }

    Ok(())
}

async fn check_status(res: reqwest::Response) -> Result<Option<reqwest::Response>, reqwest::Error> {
    let status = res.status();
    if status.is_success() {
        return Ok(Some(res));
    }
    eprintln!("Error: envprobe returned status {}", status);
    if let Ok(text) = res.text().await {
        eprintln!("Response: {}", text);
    }
    Ok(None)
}

async fn print_json(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(res) = check_status(res).await? {
        let json: Value = res.json().await?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(())
}
