//! Advanced Zerodha investment advisor with the portfolio-metrics tool.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kite_agents_cli::{instructions, repl, startup};
use kite_agents_executor::{KiteAgent, PortfolioMetricsTool};
use kite_agents_mcp::SseMcpClient;
use kite_agents_session::{RetryOutcome, SessionRetryExecutor};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = startup::CommonArgs::parse();
    startup::init_tracing();
    let config = args.into_config().context("invalid configuration")?;

    let mcp = SseMcpClient::connect(&config.endpoint)
        .await
        .context("failed to connect to the Kite MCP server")?;
    let agent = KiteAgent::from_config(&config, Arc::new(mcp), instructions::ADVISOR)
        .with_local_tool(Arc::new(PortfolioMetricsTool));
    let executor = SessionRetryExecutor::new();

    println!("Advanced Zerodha Investment Advisor is ready!");
    println!("Authenticating with Zerodha Kite...");
    match executor.login(&agent).await {
        RetryOutcome::Success(status) | RetryOutcome::AuthRetrySuccess(status) => {
            println!("\nLogin status: {status}");
        }
        RetryOutcome::Failure(description) => println!("\nLogin failed: {description}"),
    }
    println!("\nType 'exit' to quit");

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    repl::run(stdin, stdout, &executor, &agent, "Advisor").await?;
    Ok(())
}
