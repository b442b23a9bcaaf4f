#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "fbxdoc", about = "FBX binary inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Json(cmd::json::Args),
	Info(cmd::info::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> fbxdoc::fbx::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Json(args) => cmd::json::run(args),
		Commands::Info(args) => cmd::info::run(args),
	}
}
