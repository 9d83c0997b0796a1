//! minstall - local repository artifact installer
//!
//! Copies a build's already-produced artifacts (jars, poms, classified
//! attachments) into the local Maven-layout artifact repository, addressed
//! by groupId:artifactId:version[:classifier] coordinates.

use clap::Parser;

mod batch;
mod cli;
mod commands;
mod coordinate;
mod coordinator;
mod error;
mod installer;
mod pom;
mod project;
mod store;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.local_repository, cli.verbose, args),
        Commands::InstallFile(args) => {
            commands::install_file::run(cli.local_repository, cli.verbose, args)
        }
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
