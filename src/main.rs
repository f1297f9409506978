#[macro_use]
extern crate diesel;

mod config;
mod database;
mod error;
mod menu;
mod models;
mod prompt;
mod schema;
mod utils;

use std::io;

use clap::Parser;
use tracing::Level;

use crate::{config::Cli, database::Session, prompt::Prompter};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::WARN })
        .with_writer(io::stderr)
        .init();

    let mut session = match Session::connect(&cli.connection_settings()) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Error - {}", err);
            println!("Make sure you started postgres on this machine");
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout())
        .with_max_attempts(cli.max_attempts.map(|n| n as usize));
    let res = menu::run(&session, &mut prompter);

    print!("Disconnecting from database...");
    session.close();
    println!("Done\n\nBye !");

    res
}
