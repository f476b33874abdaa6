//! Bounded login-then-retry execution of agent commands.

use kite_agents_core::{Agent, AgentReply};

/// Instruction sent to the agent to (re-)establish the Kite session.
pub const DEFAULT_LOGIN_INSTRUCTION: &str = "Login to my Zerodha account";

/// Terminal outcome of one executed command.
///
/// Every command issued by the caller yields exactly one of these; a
/// command is never silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome {
    /// The first invocation succeeded.
    Success(AgentReply),
    /// The first invocation lost the session; login and the single retry
    /// both succeeded.
    AuthRetrySuccess(AgentReply),
    /// The command failed terminally; carries the failure description.
    Failure(String),
}

impl RetryOutcome {
    /// The agent's reply, if the command succeeded (with or without a
    /// recovery round-trip).
    #[must_use]
    pub fn reply(&self) -> Option<&str> {
        match self {
            Self::Success(reply) | Self::AuthRetrySuccess(reply) => Some(reply),
            Self::Failure(_) => None,
        }
    }

    /// Whether the command failed terminally.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// Executes commands against a remote authenticated session.
///
/// A transient session loss does not abort a user interaction: it is
/// translated into exactly one re-authentication followed by exactly one
/// retry of the original command. Session validity is never cached across
/// calls; every call independently may trigger its own recovery path.
pub struct SessionRetryExecutor {
    login_instruction: String,
}

impl Default for SessionRetryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRetryExecutor {
    /// Create an executor with the default login instruction.
    #[must_use]
    pub fn new() -> Self {
        Self::with_login_instruction(DEFAULT_LOGIN_INSTRUCTION)
    }

    /// Create an executor with a custom login instruction.
    #[must_use]
    pub fn with_login_instruction(instruction: impl Into<String>) -> Self {
        Self {
            login_instruction: instruction.into(),
        }
    }

    /// Perform one unconditional login invocation.
    ///
    /// Meant as a pre-flight step before an interactive loop. The outcome
    /// is informational only: a failure here surfaces again naturally on
    /// the first real command, so callers report it and proceed.
    pub async fn login<A: Agent + ?Sized>(&self, agent: &A) -> RetryOutcome {
        match agent.invoke(&self.login_instruction).await {
            Ok(reply) => RetryOutcome::Success(reply),
            Err(err) => RetryOutcome::Failure(err.to_string()),
        }
    }

    /// Execute one command, recovering at most once from session loss.
    ///
    /// The command string is never mutated between attempts, and no more
    /// than one recovery round-trip (login + retry) is made per call. Any
    /// failure during recovery is terminal, including a second session
    /// loss on the retry.
    pub async fn execute<A: Agent + ?Sized>(&self, agent: &A, command: &str) -> RetryOutcome {
        let first = match agent.invoke(command).await {
            Ok(reply) => return RetryOutcome::Success(reply),
            Err(err) if err.is_unauthenticated() => err,
            Err(err) => return RetryOutcome::Failure(err.to_string()),
        };

        tracing::info!(error = %first, "session lost, re-authenticating");
        match agent.invoke(&self.login_instruction).await {
            Ok(status) => tracing::debug!(%status, "re-authentication complete"),
            Err(err) => return RetryOutcome::Failure(err.to_string()),
        }

        match agent.invoke(command).await {
            Ok(reply) => RetryOutcome::AuthRetrySuccess(reply),
            Err(err) => RetryOutcome::Failure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use kite_agents_core::AgentError;

    use super::*;

    /// Agent fake that replays a fixed script of results and records every
    /// instruction it receives.
    struct ScriptedAgent {
        script: Mutex<Vec<Result<AgentReply, AgentError>>>,
        invocations: Mutex<Vec<String>>,
    }

    impl ScriptedAgent {
        fn new(script: Vec<Result<AgentReply, AgentError>>) -> Self {
            Self {
                script: Mutex::new(script),
                invocations: Mutex::new(Vec::new()),
            }
        }

        fn invocations(&self) -> Vec<String> {
            self.invocations.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Agent for ScriptedAgent {
        async fn invoke(&self, instruction: &str) -> Result<AgentReply, AgentError> {
            self.invocations.lock().unwrap().push(instruction.to_string());
            let mut script = self.script.lock().unwrap();
            assert!(!script.is_empty(), "agent invoked more times than scripted");
            script.remove(0)
        }
    }

    fn session_lost() -> AgentError {
        AgentError::Unauthenticated {
            detail: "Error: session not found for user".into(),
        }
    }

    #[tokio::test]
    async fn first_success_needs_one_invocation() {
        let agent = ScriptedAgent::new(vec![Ok("Holdings: 10 stocks".into())]);
        let executor = SessionRetryExecutor::new();

        let outcome = executor.execute(&agent, "show holdings").await;

        assert_eq!(outcome, RetryOutcome::Success("Holdings: 10 stocks".into()));
        assert_eq!(agent.invocations(), vec!["show holdings"]);
    }

    #[tokio::test]
    async fn session_loss_triggers_exactly_one_login_and_retry() {
        // Bounded retry: fail, login, retry. Three invocations total.
        let agent = ScriptedAgent::new(vec![
            Err(session_lost()),
            Ok("Login successful".into()),
            Ok("Holdings: 10 stocks".into()),
        ]);
        let executor = SessionRetryExecutor::new();

        let outcome = executor.execute(&agent, "show holdings").await;

        assert_eq!(
            outcome,
            RetryOutcome::AuthRetrySuccess("Holdings: 10 stocks".into())
        );
        assert_eq!(
            agent.invocations(),
            vec!["show holdings", DEFAULT_LOGIN_INSTRUCTION, "show holdings"]
        );
    }

    #[tokio::test]
    async fn second_session_loss_is_not_recovered() {
        let agent = ScriptedAgent::new(vec![
            Err(session_lost()),
            Ok("Login successful".into()),
            Err(session_lost()),
        ]);
        let executor = SessionRetryExecutor::new();

        let outcome = executor.execute(&agent, "show holdings").await;

        assert!(outcome.is_failure());
        // No second login: three invocations and no more.
        assert_eq!(agent.invocations().len(), 3);
    }

    #[tokio::test]
    async fn non_recoverable_failure_passes_through() {
        let agent = ScriptedAgent::new(vec![Err(AgentError::Model("rate limit".into()))]);
        let executor = SessionRetryExecutor::new();

        let outcome = executor.execute(&agent, "show holdings").await;

        assert_eq!(outcome, RetryOutcome::Failure("model error: rate limit".into()));
        assert_eq!(agent.invocations().len(), 1);
    }

    #[tokio::test]
    async fn login_failure_short_circuits_without_retry() {
        let agent = ScriptedAgent::new(vec![
            Err(session_lost()),
            Err(AgentError::Transport("stream closed".into())),
        ]);
        let executor = SessionRetryExecutor::new();

        let outcome = executor.execute(&agent, "show holdings").await;

        assert!(outcome.is_failure());
        // The original command was never retried.
        assert_eq!(
            agent.invocations(),
            vec!["show holdings", DEFAULT_LOGIN_INSTRUCTION]
        );
    }

    #[tokio::test]
    async fn preflight_login_reports_but_never_recovers() {
        let agent = ScriptedAgent::new(vec![Err(session_lost())]);
        let executor = SessionRetryExecutor::new();

        let outcome = executor.login(&agent).await;

        assert!(outcome.is_failure());
        assert_eq!(agent.invocations(), vec![DEFAULT_LOGIN_INSTRUCTION]);
    }

    #[tokio::test]
    async fn custom_login_instruction_is_used_for_recovery() {
        let agent = ScriptedAgent::new(vec![
            Err(session_lost()),
            Ok("ok".into()),
            Ok("done".into()),
        ]);
        let executor = SessionRetryExecutor::with_login_instruction("Login first");

        let outcome = executor.execute(&agent, "show positions").await;

        assert_eq!(outcome.reply(), Some("done"));
        assert_eq!(agent.invocations()[1], "Login first");
    }
}
