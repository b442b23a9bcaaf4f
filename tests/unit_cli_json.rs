#![allow(missing_docs)]

use std::path::PathBuf;
use std::process::Command;

use fbxdoc::fbx::{ExportSettings, Scene, SceneObject, export_to_path};
use serde_json::Value;

fn exported_fixture(name: &str) -> PathBuf {
	let path = std::env::temp_dir().join(format!("fbxdoc-cli-{}-{name}", std::process::id()));
	let mut scene = Scene::new("cli");
	scene.objects.push(SceneObject::empty("ob:empty", "Empty"));
	export_to_path(&path, &scene, &ExportSettings::default(), None).expect("export succeeds");
	path
}

#[test]
fn json_command_writes_a_projection_next_to_the_input() {
	let path = exported_fixture("projection.fbx");
	let out_path = path.with_extension("json");

	let output = Command::new(env!("CARGO_BIN_EXE_fbxdoc"))
		.arg("json")
		.arg(&path)
		.output()
		.expect("command executes");
	assert!(output.status.success(), "command should succeed");

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("version 7400"), "unexpected stdout: {stdout}");

	let json: Value = serde_json::from_slice(&std::fs::read(&out_path).expect("projection exists")).expect("valid json");
	std::fs::remove_file(&path).ok();
	std::fs::remove_file(&out_path).ok();

	let sections: Vec<&str> = json
		.as_array()
		.expect("top-level array")
		.iter()
		.map(|elem| elem[0].as_str().expect("element id"))
		.collect();
	assert!(sections.contains(&"Objects"), "sections: {sections:?}");
	assert!(sections.contains(&"Connections"), "sections: {sections:?}");
}

#[test]
fn json_command_fails_but_continues_on_bad_input() {
	let good = exported_fixture("good.fbx");
	let bad = std::env::temp_dir().join(format!("fbxdoc-cli-{}-bad.fbx", std::process::id()));
	std::fs::write(&bad, b"not an fbx file").expect("bad fixture writes");

	let output = Command::new(env!("CARGO_BIN_EXE_fbxdoc"))
		.arg("json")
		.arg(&bad)
		.arg(&good)
		.output()
		.expect("command executes");
	assert!(!output.status.success(), "mixed batch must exit nonzero");

	// The good file was still converted.
	let out_path = good.with_extension("json");
	assert!(out_path.exists(), "good input should still convert");

	std::fs::remove_file(&good).ok();
	std::fs::remove_file(&bad).ok();
	std::fs::remove_file(&out_path).ok();
}

#[test]
fn info_json_output_is_valid_and_structured() {
	let path = exported_fixture("info.fbx");

	let output = Command::new(env!("CARGO_BIN_EXE_fbxdoc"))
		.arg("info")
		.arg(&path)
		.arg("--json")
		.output()
		.expect("command executes");
	std::fs::remove_file(&path).ok();
	assert!(output.status.success(), "command should succeed");

	let json: Value = serde_json::from_slice(&output.stdout).expect("stdout should be valid json");
	assert_eq!(json["version"], 7400);
	assert!(json["element_count"].as_u64().is_some_and(|n| n > 0));
	assert!(
		json["sections"]
			.as_array()
			.is_some_and(|items| items.iter().any(|s| s == "Objects")),
		"sections: {}",
		json["sections"]
	);
}
