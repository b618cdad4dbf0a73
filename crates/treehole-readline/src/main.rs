use std::borrow::Cow::{self, Borrowed, Owned};
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use treehole_application::{EchoGenerator, TreeHole};
use treehole_core::TreeholeError;
use treehole_core::feed::{FeedStore, Tab};
use treehole_core::post::Post;
use treehole_interaction::EchoConfig;

mod command;
mod render;

use command::{COMMANDS, Command};

/// How long `quit` waits for in-flight posts to land.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Resolves a 1-based index in the last listed view to a post id.
fn post_id_at(listed: &[Post], index: usize) -> Option<String> {
    listed.get(index.checked_sub(1)?).map(|p| p.id.clone())
}

/// The main entry point for the Tree Hole REPL.
///
/// 1. Initializes logging and the echo generator from the environment
/// 2. Seeds the feed and prints it
/// 3. Submits new posts in the background and prints them once their echo lands
/// 4. Applies likes, saves and comments against the last listed view
#[tokio::main]
async fn main() -> Result<()> {
    // ===== Logging =====
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // ===== Backend Initialization =====
    let echo = EchoGenerator::from_config(&EchoConfig::from_env());
    tracing::info!(echo_configured = echo.is_configured(), "Tree Hole starting");
    let hole = TreeHole::new(FeedStore::seeded(Utc::now()), echo);

    // Channel for posts whose echo has resolved in the background
    let (landed_tx, mut landed_rx) = mpsc::channel::<Result<Post, TreeholeError>>(8);

    let landed_handler = tokio::spawn(async move {
        while let Some(result) = landed_rx.recv().await {
            match result {
                Ok(post) => {
                    println!();
                    println!("{}", "树洞收到了你的心事 (/home to refresh)".bright_green());
                    render::print_post(None, &post);
                }
                Err(e) => eprintln!("{}", format!("Post failed: {e}").red()),
            }
        }
    });

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Tree Hole ===".bright_magenta().bold());
    println!("{}", "倾听你的每一个声音. Type /help for commands, 'quit' to exit.".bright_black());
    println!();

    let mut tab = Tab::Home;
    let mut listed = hole.view(tab).await;
    render::print_feed(tab, &listed);

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        let line = match readline {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());

        let command = match command::parse(&line) {
            Ok(command) => command,
            Err(usage) => {
                println!("{}", usage.bright_black());
                continue;
            }
        };

        match command {
            Command::Quit => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Command::Help => render::print_help(),
            Command::Moods => render::print_moods(),
            Command::Home | Command::Saved => {
                tab = if command == Command::Saved {
                    Tab::Saved
                } else {
                    Tab::Home
                };
                listed = hole.view(tab).await;
                render::print_feed(tab, &listed);
            }
            Command::Post { mood, text } => {
                // One submission at a time, like a disabled submit button
                if hole.is_submitting().await {
                    println!("{}", "树洞还在倾听上一条心事，请稍等...".yellow());
                    continue;
                }
                match hole.submit(&text, mood).await {
                    Ok(handle) => {
                        println!("{}", "树洞正在倾听...".bright_black());
                        let tx = landed_tx.clone();
                        tokio::spawn(async move {
                            let _ = tx.send(handle.wait().await).await;
                        });
                    }
                    Err(e) => println!("{}", e.to_string().yellow()),
                }
            }
            Command::Like(index) | Command::Save(index) => {
                let Some(id) = post_id_at(&listed, index) else {
                    println!("{}", format!("No post [{index}] in this list.").yellow());
                    continue;
                };
                let updated = if matches!(command, Command::Like(_)) {
                    hole.toggle_like(&id).await
                } else {
                    hole.toggle_save(&id).await
                };
                if let Some(post) = updated {
                    render::print_post(Some(index), &post);
                }
                listed = hole.view(tab).await;
            }
            Command::Comment { index, text } => {
                let Some(id) = post_id_at(&listed, index) else {
                    println!("{}", format!("No post [{index}] in this list.").yellow());
                    continue;
                };
                match hole.add_comment(&id, &text).await {
                    Ok(_) => {
                        if let Some(post) = hole.post(&id).await {
                            render::print_post(Some(index), &post);
                        }
                    }
                    Err(e) => println!("{}", e.to_string().yellow()),
                }
                listed = hole.view(tab).await;
            }
        }
    }

    // Drop the sender to signal shutdown; in-flight submissions hold clones.
    // A stalled echo call must not hold the exit hostage.
    drop(landed_tx);
    if tokio::time::timeout(SHUTDOWN_GRACE, landed_handler).await.is_err() {
        tracing::warn!("Exiting with posts still waiting for their echo");
    }

    Ok(())
}
