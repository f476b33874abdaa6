//! Non-interactive portfolio analysis: runs a fixed sequence of queries.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use clap::Parser;
use kite_agents_cli::{instructions, startup};
use kite_agents_executor::KiteAgent;
use kite_agents_mcp::SseMcpClient;
use kite_agents_session::{RetryOutcome, SessionRetryExecutor};

/// Pause between queries to avoid rate limiting.
const QUERY_PAUSE: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = startup::CommonArgs::parse();
    startup::init_tracing();
    let config = args.into_config().context("invalid configuration")?;

    let mcp = SseMcpClient::connect(&config.endpoint)
        .await
        .context("failed to connect to the Kite MCP server")?;
    let agent = KiteAgent::from_config(&config, Arc::new(mcp), instructions::PORTFOLIO);
    let executor = SessionRetryExecutor::new();

    println!("Portfolio Analysis Assistant is ready!");

    let total = instructions::PORTFOLIO_QUERIES.len();
    for (i, query) in instructions::PORTFOLIO_QUERIES.iter().enumerate() {
        println!("\n--- Analysis {}: {query} ---", i + 1);
        match executor.execute(&agent, query).await {
            RetryOutcome::Success(reply) | RetryOutcome::AuthRetrySuccess(reply) => {
                println!("\nResults: {reply}");
            }
            RetryOutcome::Failure(description) => println!("\nError: {description}"),
        }

        if i + 1 < total {
            println!("\nMoving to next analysis in 3 seconds...");
            tokio::time::sleep(QUERY_PAUSE).await;
        }
    }

    Ok(())
}
