#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process;

use clap::Parser;
use studentportal_app::cli::{render, run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match run(cli).await {
        Ok(Some(output)) => render(&output).map(|rendered| println!("{rendered}")),
        Ok(None) => Ok(()),
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        eprintln!("error: {}", err.display_message());
        process::exit(err.exit_code());
    }
}
