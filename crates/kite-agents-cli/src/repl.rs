//! The read-eval-print loop shared by the interactive binaries.

use std::io;

use kite_agents_core::Agent;
use kite_agents_session::{RetryOutcome, SessionRetryExecutor};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Sentinel that terminates the loop (matched case-insensitively after
/// trimming).
const EXIT_SENTINEL: &str = "exit";

/// Run the interactive loop until the exit sentinel or end of input.
///
/// Every non-empty line is forwarded verbatim as a command; a command
/// failure is reported and the loop keeps accepting further commands.
///
/// # Errors
/// Returns an error only when reading input or writing output fails.
pub async fn run<R, W, A>(
    mut input: R,
    mut output: W,
    executor: &SessionRetryExecutor,
    agent: &A,
    speaker: &str,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    A: Agent + ?Sized,
{
    let mut line = String::new();
    loop {
        output.write_all(b"\nYou: ").await?;
        output.flush().await?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            break; // end of input
        }
        let command = line.trim();
        if command.eq_ignore_ascii_case(EXIT_SENTINEL) {
            break;
        }
        if command.is_empty() {
            continue;
        }

        let report = match executor.execute(agent, command).await {
            RetryOutcome::Success(reply) => format!("\n{speaker}: {reply}\n"),
            RetryOutcome::AuthRetrySuccess(reply) => {
                format!("\nSession re-established.\n\n{speaker}: {reply}\n")
            }
            RetryOutcome::Failure(description) => format!("\nError: {description}\n"),
        };
        output.write_all(report.as_bytes()).await?;
        output.flush().await?;
    }
    Ok(())
}
