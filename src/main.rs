use clap::Parser;

mod app;
mod cli;
mod config;
mod error;
mod library;
mod locator;
mod logging;
mod mpris;
mod notification;
mod player;
mod playlist;
mod relay;
mod runtime;
mod ui;

use cli::{Cli, Command};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Some(Command::Ctl { request }) => runtime::ctl(request),
        None => runtime::run(cli),
    }
}
