//! `orgdesk` binary entry point.
//!
//! # Responsibility
//! - Parse the subcommand, bootstrap logging and the store, and hand off to
//!   the command flows.
//!
//! # Invariants
//! - The store lives at a fixed path (`orgdesk.db` in the working
//!   directory); there is no alternate-location configuration.
//! - Handled errors print red and the process still exits 0.

mod commands;
mod prompt;
mod table;

use clap::Parser;
use colored::Colorize;
use commands::Command;
use orgdesk_core::db::open_db;
use orgdesk_core::{default_log_level, init_logging, OrgService, SqliteOrgRepository};
use prompt::StdinPrompter;

const STORE_FILE: &str = "orgdesk.db";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Parser)]
#[command(name = "orgdesk", version, about = "Maintain departments, employees, and projects")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();

    // Logging failures degrade to unlogged operation instead of aborting.
    if let Ok(cwd) = std::env::current_dir() {
        let log_dir = cwd.join(LOG_DIR_NAME);
        if let Err(err) = init_logging(default_log_level(), &log_dir.to_string_lossy()) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    log::info!("event=command_start module=cli command={:?}", cli.command);

    let mut conn = match open_db(STORE_FILE) {
        Ok(conn) => conn,
        Err(err) => {
            println!("{}", format!("Error opening store: {err}").red());
            return;
        }
    };
    let repo = match SqliteOrgRepository::try_new(&mut conn) {
        Ok(repo) => repo,
        Err(err) => {
            println!("{}", format!("Error opening store: {err}").red());
            return;
        }
    };
    let mut service = OrgService::new(repo);
    let mut prompter = StdinPrompter;

    if let Err(err) = commands::run(cli.command, &mut service, &mut prompter) {
        println!("{}", format!("Input error: {err}").red());
    }
}
