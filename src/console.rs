//! Interactive terminal chat.
//!
//! Reads one message per line, prints each turn with colors, and accepts
//! `/reset` and `/quit` commands.

use std::io::{self, Write};

use chrono::Local;
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::ai::Role;
use crate::chat::{Orchestrator, Session, SubmitOutcome, Turn};

/// A line of console input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Clear the transcript.
    Reset,
    /// Leave the chat.
    Quit,
    /// Anything else is sent as a message.
    Message(String),
}

impl ConsoleCommand {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/reset" | "/clear" => Self::Reset,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Message(line.to_string()),
        }
    }
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Print the startup banner.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn print_banner(out: &mut impl Write, model: &str, entries: usize) -> io::Result<()> {
    writeln!(
        out,
        "{} model={}, knowledge entries={}",
        "[iAssist]".blue().bold(),
        model.cyan(),
        entries
    )?;
    writeln!(
        out,
        "{}",
        "Type a question, /reset to clear history, /quit to leave.".dimmed()
    )?;
    out.flush()
}

/// Print one transcript turn.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn print_turn(out: &mut impl Write, turn: &Turn) -> io::Result<()> {
    let ts = timestamp();
    match turn.role {
        Role::User => writeln!(out, "{} {} {}", ts.dimmed(), "you".green().bold(), turn.content)?,
        _ if turn.is_error() => writeln!(
            out,
            "{} {} {}",
            ts.dimmed(),
            "iAssist".yellow().bold(),
            turn.content.red()
        )?,
        _ => writeln!(
            out,
            "{} {} {}",
            ts.dimmed(),
            "iAssist".yellow().bold(),
            turn.content
        )?,
    }
    out.flush()
}

/// Print a display-level alert.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn print_alert(out: &mut impl Write, alert: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "[ALERT]".red().bold(), alert.red())?;
    out.flush()
}

/// Run the chat loop until `/quit` or end of input.
///
/// Returns the session so callers can inspect the final transcript.
///
/// # Errors
///
/// Returns an IO error if reading input or writing output fails. Completion
/// failures are shown as alerts and never end the loop.
pub async fn run<R, W>(orchestrator: &Orchestrator, input: R, out: &mut W) -> io::Result<Session>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = Session::new();
    let mut lines = input.lines();

    print_banner(
        out,
        &orchestrator.settings().model,
        orchestrator.knowledge().entry_count(),
    )?;

    while let Some(line) = lines.next_line().await? {
        match ConsoleCommand::parse(&line) {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Reset => {
                orchestrator.reset(&mut session);
                writeln!(out, "{}", "Chat history cleared.".dimmed())?;
            }
            ConsoleCommand::Message(text) => {
                match orchestrator.submit(&mut session, &text).await {
                    SubmitOutcome::Ignored => {}
                    SubmitOutcome::Answered { reply } => print_turn(out, &reply)?,
                    SubmitOutcome::Failed { alert, turn } => {
                        print_alert(out, &alert)?;
                        print_turn(out, &turn)?;
                    }
                }
            }
        }
    }

    tracing::debug!(turns = session.transcript().len(), "Console chat finished");
    Ok(session)
}
