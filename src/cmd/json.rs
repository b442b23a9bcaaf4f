use std::fs;
use std::io;
use std::path::PathBuf;

use fbxdoc::fbx::{Result, document_to_json, parse_file};

#[derive(clap::Args)]
pub struct Args {
	pub paths: Vec<PathBuf>,
}

/// Write a `<stem>.json` projection next to each input file.
///
/// Keeps going past per-file failures and reports them at the end.
pub fn run(args: Args) -> Result<()> {
	let Args { paths } = args;

	let mut failed = 0usize;
	for path in &paths {
		if let Err(err) = convert(path) {
			eprintln!("error: {}: {err}", path.display());
			failed += 1;
		}
	}

	if failed > 0 {
		return Err(io::Error::other(format!("{failed} of {} file(s) failed", paths.len())).into());
	}
	Ok(())
}

fn convert(path: &PathBuf) -> Result<()> {
	let doc = parse_file(path)?;
	let out_path = path.with_extension("json");

	println!("writing: {} (version {})", out_path.display(), doc.version);

	let rendered = serde_json::to_string_pretty(&document_to_json(&doc))
		.map_err(|err| io::Error::other(err.to_string()))?;
	fs::write(&out_path, rendered)?;
	Ok(())
}
