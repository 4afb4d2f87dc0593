//! Interactive chat with the shopping assistant.

use std::io::{self, Write};

use findmystore_server::claude::ClaudeClient;
use findmystore_server::services::agent::AgentService;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{CliError, Context};

const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];

/// Answer one message, or run a read-eval loop on stdin until EOF or `exit`.
///
/// Without `CLAUDE_API_KEY` every reply is an `Agent error: ...` line.
///
/// # Errors
///
/// Returns an error if the Claude client cannot be built or stdio fails.
pub async fn run(ctx: &mut Context, message: Option<&str>) -> Result<(), CliError> {
    let claude = ctx.config.claude().map(ClaudeClient::new).transpose()?;
    let agent = AgentService::new(
        claude.as_ref(),
        &ctx.directory,
        &ctx.config.default_city,
        ctx.config.currency,
    );

    if let Some(message) = message {
        let reply = agent.run(&mut ctx.session, message).await;
        writeln!(io::stdout().lock(), "{reply}")?;
        return Ok(());
    }

    writeln!(
        io::stdout().lock(),
        "FindMyStore assistant. Type 'exit' to quit."
    )?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        {
            let mut out = io::stdout().lock();
            write!(out, "> ")?;
            out.flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&line.to_ascii_lowercase().as_str()) {
            break;
        }

        let reply = agent.run(&mut ctx.session, line).await;
        writeln!(io::stdout().lock(), "{reply}\n")?;
    }

    Ok(())
}
