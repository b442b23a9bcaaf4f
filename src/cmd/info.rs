use std::path::PathBuf;

use fbxdoc::fbx::{Element, Result, parse_file};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Emit the report as JSON instead of key/value lines.
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct Report {
	path: String,
	version: u32,
	sections: Vec<String>,
	element_count: usize,
	object_count: usize,
	connection_count: usize,
}

/// Print high-level document statistics.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let doc = parse_file(&path)?;
	let report = Report {
		path: path.display().to_string(),
		version: doc.version,
		sections: doc
			.root
			.children()
			.iter()
			.map(|child| String::from_utf8_lossy(child.id()).into_owned())
			.collect(),
		element_count: count_elements(&doc.root) - 1,
		object_count: section_len(&doc.root, b"Objects"),
		connection_count: section_len(&doc.root, b"Connections"),
	};

	if json {
		let rendered = serde_json::to_string_pretty(&report)
			.map_err(|err| std::io::Error::other(err.to_string()))?;
		println!("{rendered}");
		return Ok(());
	}

	println!("path: {}", report.path);
	println!("version: {}", report.version);
	println!("element_count: {}", report.element_count);
	println!("object_count: {}", report.object_count);
	println!("connection_count: {}", report.connection_count);
	println!("sections:");
	for section in &report.sections {
		println!("  {section}");
	}

	Ok(())
}

fn count_elements(elem: &Element) -> usize {
	1 + elem.children().iter().map(count_elements).sum::<usize>()
}

fn section_len(root: &Element, id: &[u8]) -> usize {
	root.find(id).map_or(0, |section| section.children().len())
}
