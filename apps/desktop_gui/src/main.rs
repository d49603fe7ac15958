use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use task_core::{
    config::{load_settings, open_slot_store},
    TaskBoard, TaskStore,
};
use tracing_subscriber::EnvFilter;

mod controller;
mod ui;

use ui::TasklistApp;

#[derive(Parser, Debug)]
#[command(name = "tasklist-gui")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        settings.data_dir = Some(dir);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .init();

    let slot = open_slot_store(&settings)?;
    let board = TaskBoard::open(TaskStore::new(slot));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Task List")
            .with_inner_size([480.0, 640.0])
            .with_min_inner_size([360.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Task List",
        options,
        Box::new(|_cc| Ok(Box::new(TasklistApp::new(board)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run desktop gui: {err}"))
}
