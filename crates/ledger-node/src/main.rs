use clap::Parser;
use ledger_core::Chain;
use ledger_node::{config::Args, router, LedgerService};
use std::net::SocketAddr;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let chain = Chain::new(args.difficulty)?;
    info!(
        difficulty = chain.difficulty(),
        genesis = %chain.latest().digest(),
        "genesis block mined"
    );

    let app = router(LedgerService::new(chain, args.mining_timeout()));

    let addr: SocketAddr = args.listen.parse()?;
    info!("ledger-node listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}
