use clap::{Parser, Subcommand};
use ersatz_client::ErsatzClient;

#[derive(Parser)]
#[command(name = "ersatz-ctl")]
#[command(about = "Control client for a running ersatz server", long_about = None)]
struct Cli {
    /// Base URL of the mock server
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Base URL of the admin API
    #[arg(long, default_value = "http://localhost:8081")]
    admin_url: String,

    /// Admin API key
    #[arg(short, long, env = "ERSATZ_ADMIN_KEY", default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Switch the active variant of an endpoint
    Vary {
        /// Method token, e.g. POST
        method: String,
        /// Endpoint path, e.g. users/42
        url: String,
        /// Variant name (file name without extension)
        variant: String,
    },
    /// Show server status (admin API)
    Status,
    /// List endpoints and their active variants (admin API)
    Endpoints,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = ErsatzClient::new(&cli.url).with_admin(&cli.admin_url, &cli.key);

    match cli.command {
        Commands::Vary { method, url, variant } => {
            client.vary(&method, &url, &variant).await?;
            println!("{} {} -> {}", method, url, variant);
        }
        Commands::Status => {
            let status = client.status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::Endpoints => {
            for e in client.endpoints().await? {
                let marked: Vec<String> = e
                    .variants
                    .iter()
                    .map(|v| if *v == e.active { format!("*{}", v) } else { v.clone() })
                    .collect();
                println!("{:<7} {:<40} {}", e.method, e.url, marked.join(" "));
            }
        }
    }

    Ok(())
}
