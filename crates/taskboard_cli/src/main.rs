//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, logging and SQLite storage the way a host would.
//! - Print the project list, optionally after creating a project.
//!
//! Configuration comes from an optional `--config` JSON file and the
//! `TASKBOARD_*` environment variables.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use std::process::ExitCode;
use taskboard_core::{
    db, init_from_config, CoreConfig, Frame, Renderer, SqliteProjectStorage, TaskboardApp,
};

/// Writes frames as plain text lines.
struct StdoutRenderer;

impl Renderer for StdoutRenderer {
    fn render(&mut self, frame: &Frame) {
        let page = frame.page();
        println!(
            "{} (page {}/{}, {} total)",
            frame.heading(),
            page.number,
            page.count,
            page.total
        );
        match frame {
            Frame::Projects { items, .. } => {
                for project in items {
                    println!(
                        "  {}  {}  tasks={} notes={}",
                        project.id, project.title, project.tasks, project.notes
                    );
                }
            }
            Frame::Tasks { items, .. } => {
                for task in items {
                    println!(
                        "  {}  [{}] {} due={} priority={}",
                        task.id,
                        task.status,
                        task.title,
                        task.due_date.format("%Y-%m-%d"),
                        task.priority
                    );
                }
            }
            Frame::Notes { items, .. } => {
                for note in items {
                    println!("  {}  {}", note.id, note.title);
                }
            }
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = CoreConfig::load(cli.config.as_deref()).map_err(|err| err.to_string())?;
    init_from_config(&config)?;

    let conn = db::open_db_in_dir(&config.data_dir).map_err(|err| err.to_string())?;
    let storage = SqliteProjectStorage::try_new(conn).map_err(|err| err.to_string())?;
    let mut app = TaskboardApp::new(storage, StdoutRenderer, config.page_size);
    app.start();

    match cli.command() {
        Command::List => Ok(()),
        Command::AddProject { title } => {
            app.create_project(&title.join(" ")).map_err(|err| err.to_string())?;
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    println!(
        "taskboard_core ping={} version={}",
        taskboard_core::ping(),
        taskboard_core::core_version()
    );
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("taskboard: {err}");
            ExitCode::FAILURE
        }
    }
}
