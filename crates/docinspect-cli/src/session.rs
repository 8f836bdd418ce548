//! Interactive session shell.
//!
//! Reads one command per line. A line that is not a known command is
//! treated as a document chunk id to search for. Ctrl-C at the prompt
//! leaves the shell.

use std::future::Future;
use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use docinspect_core::IdentityProvider;

use crate::render::{render_chunk, render_error, render_welcome};
use crate::search::{SearchOrchestrator, SearchOutcome};

const HELP: &str = "\
Commands:
  search <ID>   fetch and show a document chunk (or just type the ID)
  whoami        show the signed-in account
  sign-in       sign in now
  sign-out      forget the active account
  clear-cache   forget all cached tokens and accounts
  health        probe the resource API
  help          show this help
  quit          leave the shell";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    WhoAmI,
    SignIn,
    SignOut,
    ClearCache,
    Health,
    Help,
    Quit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Command::Empty,
            "search" => Command::Search(rest.to_string()),
            "whoami" => Command::WhoAmI,
            "sign-in" | "signin" | "login" => Command::SignIn,
            "sign-out" | "signout" | "logout" => Command::SignOut,
            "clear-cache" => Command::ClearCache,
            "health" => Command::Health,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Search(line.to_string()),
        }
    }
}

/// Sequential command loop over a [`SearchOrchestrator`].
pub struct Session<'a, P: ?Sized> {
    orchestrator: &'a SearchOrchestrator<P>,
}

impl<'a, P> Session<'a, P>
where
    P: IdentityProvider + ?Sized,
{
    pub fn new(orchestrator: &'a SearchOrchestrator<P>) -> Self {
        Self { orchestrator }
    }

    /// Run until `quit`, end of input, or Ctrl-C at the prompt. Returns the
    /// number of failed searches.
    pub async fn run<R, W>(&self, input: R, out: &mut W) -> std::io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.run_until(input, out, interrupted).await
    }

    /// Like [`Self::run`], but the prompt is abandoned when the future made
    /// by `interrupt` resolves. A fresh future is made for every prompt.
    pub async fn run_until<R, W, F, Fut>(
        &self,
        input: R,
        out: &mut W,
        mut interrupt: F,
    ) -> std::io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut lines = input.lines();
        let mut failures = 0;

        match self.orchestrator.broker().active_identity().await {
            Some(identity) => writeln!(out, "{}", render_welcome(&identity))?,
            None => writeln!(out, "Not signed in. You will be asked to sign in on first search.")?,
        }
        writeln!(out, "Type 'help' for commands.")?;

        loop {
            write!(out, "docinspect> ")?;
            out.flush()?;

            let next = tokio::select! {
                line = lines.next_line() => line?,
                _ = interrupt() => {
                    info!("Interrupted at the prompt");
                    writeln!(out)?;
                    break;
                }
            };
            let Some(line) = next else {
                writeln!(out)?;
                break;
            };

            let command = Command::parse(&line);
            debug!(command = ?command, "Shell command");
            match command {
                Command::Empty => {}
                Command::Quit => break,
                Command::Help => writeln!(out, "{}", HELP)?,
                Command::Search(id) => {
                    if !self.search(&id, out).await? {
                        failures += 1;
                    }
                }
                Command::WhoAmI => match self.orchestrator.broker().active_identity().await {
                    Some(identity) => writeln!(out, "{}", render_welcome(&identity))?,
                    None => writeln!(out, "Not signed in.")?,
                },
                Command::SignIn => match self.orchestrator.broker().sign_in().await {
                    Ok(identity) => writeln!(out, "{}", render_welcome(&identity))?,
                    Err(err) if err.is_silent() => {}
                    Err(err) => writeln!(out, "{}", render_error(&err))?,
                },
                Command::SignOut => {
                    let broker = self.orchestrator.broker();
                    if broker.active_identity().await.is_none() {
                        writeln!(out, "Not signed in.")?;
                        continue;
                    }
                    match broker.sign_out().await {
                        Ok(()) => writeln!(out, "Signed out.")?,
                        Err(err) => writeln!(out, "{}", render_error(&err))?,
                    }
                }
                Command::ClearCache => match self.orchestrator.broker().clear_cache().await {
                    Ok(()) => writeln!(out, "Token cache cleared.")?,
                    Err(err) => writeln!(out, "{}", render_error(&err))?,
                },
                Command::Health => match self.orchestrator.health().await {
                    Ok(true) => writeln!(out, "Resource API is healthy.")?,
                    Ok(false) => writeln!(out, "Resource API is unhealthy.")?,
                    Err(err) if err.is_silent() => {}
                    Err(err) => writeln!(out, "{}", render_error(&err))?,
                },
            }
        }

        Ok(failures)
    }

    /// Returns false when the search failed.
    async fn search<W: Write>(&self, id: &str, out: &mut W) -> std::io::Result<bool> {
        writeln!(out, "Loading...")?;
        match self.orchestrator.search(id).await {
            SearchOutcome::Found(chunk) => {
                writeln!(out, "{}", render_chunk(&chunk))?;
                Ok(true)
            }
            SearchOutcome::Dismissed => Ok(true),
            SearchOutcome::Failed(err) => {
                writeln!(out, "{}", render_error(&err))?;
                Ok(false)
            }
        }
    }
}

/// Resolves on Ctrl-C. Never resolves where the signal cannot be observed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
