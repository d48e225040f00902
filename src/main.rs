use clap::Parser;
use pulsar_catalog::cli::Args;
use pulsar_catalog::commands;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            // Report the full context chain on stderr
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
