use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use task_core::{
    config::{load_settings, open_slot_store},
    AlwaysConfirm, Confirm, TaskBoard, TaskId, TaskStore, TaskText,
};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "tasklist", about = "Keep a short list of tasks between sessions")]
struct Args {
    /// TOML settings file (defaults to ./tasklist.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the persisted task list
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Show all tasks with counts
    List,
    /// Add a task; words are joined with spaces
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Flip a task between open and completed
    Toggle { id: i64 },
    /// Remove a task
    Delete { id: i64 },
    /// Remove every task after confirmation
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        settings.data_dir = Some(dir);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(io::stderr)
        .init();

    let slot = open_slot_store(&settings)?;
    let mut board = TaskBoard::open(TaskStore::new(slot));
    report_notice(&mut board);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.command.unwrap_or(Command::List) {
        Command::List => {}
        Command::Add { text } => {
            board.set_draft(text.join(" "));
            if board.submit_draft().is_none() && TaskText::parse(board.draft()).is_none() {
                writeln!(out, "Nothing to add: task text is empty.")?;
            }
        }
        Command::Toggle { id } => {
            if !board.toggle(TaskId(id)) {
                writeln!(out, "No task with id {id}.")?;
            }
        }
        Command::Delete { id } => {
            if !board.delete(TaskId(id)) {
                writeln!(out, "No task with id {id}.")?;
            }
        }
        Command::Clear { yes } => {
            let stdin = io::stdin();
            let mut prompt = PromptConfirm::new(stdin.lock(), io::stderr());
            let mut always = AlwaysConfirm;
            let confirm: &mut dyn Confirm = if yes { &mut always } else { &mut prompt };
            board.request_clear_all(confirm);
        }
    }
    report_notice(&mut board);

    render::render_view(&board.view(), &mut out)?;
    Ok(())
}

fn report_notice<S: storage::SlotStore>(board: &mut TaskBoard<S>) {
    if let Some(notice) = board.take_notice() {
        eprintln!("warning: {}", notice.message);
    }
}

/// Asks on a terminal; anything but `y`/`yes` counts as no, including end of input.
struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        if write!(self.output, "{question} [y/N] ").is_err() || self.output.flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read confirmation answer");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
