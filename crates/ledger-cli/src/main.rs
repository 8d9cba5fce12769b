use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use ledger_core::{Block, Transfer};
use serde::Deserialize;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ledger-cli")]
#[command(about = "CLI client for the proof-of-work ledger node")]
struct Cli {
    /// Node base URL (e.g. http://127.0.0.1:8080)
    #[arg(long, global = true, default_value = "http://127.0.0.1:8080")]
    node: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the node is up
    Health,
    /// Record a transfer as a new mined block
    Transfer {
        /// Sender
        #[arg(long)]
        from: String,
        /// Recipient
        #[arg(long)]
        to: String,
        /// Amount
        #[arg(long)]
        amount: u64,
    },
    /// Print every block in the chain
    Chain {
        /// Print the raw JSON response instead of the block listing
        #[arg(long)]
        json: bool,
    },
    /// Show the balance of an address
    Balance { address: String },
}

#[derive(Deserialize)]
struct ChainResponse {
    chain: Vec<Block>,
    length: usize,
    is_valid: bool,
    difficulty: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let node = cli.node.trim_end_matches('/');

    match cli.cmd {
        Command::Health => {
            let body = get(&client, &format!("{node}/health")).await?;
            println!("{body}");
        }
        Command::Transfer { from, to, amount } => {
            let transfer = Transfer::new(from, to, amount);
            transfer.validate()?;
            let res = client
                .post(format!("{node}/transfer"))
                .json(&transfer)
                .send()
                .await?;
            let status = res.status();
            let body = res.text().await?;
            println!("status: {}", status);
            println!("{body}");
        }
        Command::Chain { json } => {
            let body = get(&client, &format!("{node}/chain")).await?;
            if json {
                println!("{body}");
            } else {
                let chain: ChainResponse = serde_json::from_str(&body)?;
                for (i, block) in chain.chain.iter().enumerate() {
                    println!("=== Block {i} ===");
                    println!("{block}");
                }
                println!(
                    "length: {}  difficulty: {}  valid: {}",
                    chain.length, chain.difficulty, chain.is_valid
                );
            }
        }
        Command::Balance { address } => {
            let body = get(&client, &balance_url(node, &address)).await?;
            println!("{body}");
        }
    }
    Ok(())
}

fn balance_url(node: &str, address: &str) -> String {
    format!("{node}/balance/{}", urlencoding::encode(address))
}

async fn get(client: &reqwest::Client, url: &str) -> Result<String> {
    debug!(%url, "GET");
    let res = client.get(url).send().await?;
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        bail!("{url} returned {status}: {body}");
    }
    Ok(body)
}
