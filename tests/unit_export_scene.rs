#![allow(missing_docs)]

use std::path::PathBuf;

use fbxdoc::fbx::{
	EncodeOptions, ExportSettings, MeshData, MeshId, MeshInstance, ObjectKind, Property, Scene, SceneObject, assemble,
	encode_bytes, export_to_path, parse_bytes, parse_file,
};

fn cube_scene() -> Scene {
	let mut scene = Scene::new("cube");
	let mut mesh = MeshData::new("me:cube", "Cube");
	mesh.vertices = vec![
		[-1.0, -1.0, -1.0],
		[1.0, -1.0, -1.0],
		[1.0, 1.0, -1.0],
		[-1.0, 1.0, -1.0],
		[-1.0, -1.0, 1.0],
		[1.0, -1.0, 1.0],
		[1.0, 1.0, 1.0],
		[-1.0, 1.0, 1.0],
	];
	mesh.polygons = vec![
		vec![0, 1, 2, 3],
		vec![4, 7, 6, 5],
		vec![0, 4, 5, 1],
		vec![1, 5, 6, 2],
		vec![2, 6, 7, 3],
		vec![3, 7, 4, 0],
	];
	scene.meshes.push(mesh);

	let mut obj = SceneObject::empty("ob:cube", "Cube");
	obj.kind = ObjectKind::Mesh(MeshInstance {
		mesh: MeshId(0),
		armature: None,
		modified: false,
	});
	scene.objects.push(obj);
	scene
}

fn temp_path(name: &str) -> PathBuf {
	std::env::temp_dir().join(format!("fbxdoc-test-{}-{name}", std::process::id()))
}

#[test]
fn assembled_documents_reparse_bit_exactly() {
	let outcome = assemble(&cube_scene(), &ExportSettings::default(), None);
	assert!(outcome.warnings.is_empty(), "warnings: {:?}", outcome.warnings);

	let bytes = encode_bytes(&outcome.document, &EncodeOptions::default()).expect("encode succeeds");
	let parsed = parse_bytes(&bytes).expect("parse succeeds");
	assert_eq!(parsed, outcome.document);
}

#[test]
fn export_to_path_writes_a_parsable_file() {
	let path = temp_path("cube.fbx");
	export_to_path(&path, &cube_scene(), &ExportSettings::default(), None).expect("export succeeds");

	let doc = parse_file(&path).expect("file parses");
	std::fs::remove_file(&path).ok();

	assert_eq!(doc.version, 7400);
	let objects = doc.root.find(b"Objects").expect("Objects section");
	assert_eq!(objects.find_all(b"Geometry").count(), 1);
	assert_eq!(objects.find_all(b"Model").count(), 1);
}

#[test]
fn geometry_and_model_are_connected() {
	let outcome = assemble(&cube_scene(), &ExportSettings::default(), None);
	let doc = &outcome.document;

	let objects = doc.root.find(b"Objects").expect("Objects section");
	let uid_of = |id: &[u8]| match objects.find(id).map(|e| &e.props()[0]) {
		Some(Property::I64(uid)) => *uid,
		other => panic!("unexpected uid: {other:?}"),
	};
	let geom_uid = uid_of(b"Geometry");
	let model_uid = uid_of(b"Model");

	let connections = doc.root.find(b"Connections").expect("Connections section");
	let records: Vec<(i64, i64)> = connections
		.find_all(b"C")
		.map(|c| match c.props() {
			[Property::String(_), Property::I64(src), Property::I64(dst), ..] => (*src, *dst),
			other => panic!("unexpected C record: {other:?}"),
		})
		.collect();

	// Model hangs off the root, the geometry off its model.
	assert!(records.contains(&(model_uid, 0)));
	assert!(records.contains(&(geom_uid, model_uid)));
}

#[test]
fn definitions_agree_with_the_emitted_objects() {
	let outcome = assemble(&cube_scene(), &ExportSettings::default(), None);
	let doc = &outcome.document;

	let defs = doc.root.find(b"Definitions").expect("Definitions section");
	let total = match defs.find(b"Count").map(|c| &c.props()[0]) {
		Some(Property::I32(n)) => *n,
		other => panic!("unexpected Count: {other:?}"),
	};
	let per_class: i32 = defs
		.find_all(b"ObjectType")
		.map(|ot| match ot.find(b"Count").map(|c| &c.props()[0]) {
			Some(Property::I32(n)) => *n,
			other => panic!("unexpected ObjectType Count: {other:?}"),
		})
		.sum();
	assert_eq!(total, per_class);
}

#[test]
fn shared_meshes_reference_one_geometry() {
	let mut scene = cube_scene();
	let mut second = SceneObject::empty("ob:cube.001", "Cube.001");
	second.kind = ObjectKind::Mesh(MeshInstance {
		mesh: MeshId(0),
		armature: None,
		modified: false,
	});
	scene.objects.push(second);

	let outcome = assemble(&scene, &ExportSettings::default(), None);
	let objects = outcome.document.root.find(b"Objects").expect("Objects section");
	assert_eq!(objects.find_all(b"Geometry").count(), 1);
	assert_eq!(objects.find_all(b"Model").count(), 2);

	let geom_uid = match objects.find(b"Geometry").map(|e| &e.props()[0]) {
		Some(Property::I64(uid)) => *uid,
		other => panic!("unexpected uid: {other:?}"),
	};
	let connections = outcome.document.root.find(b"Connections").expect("Connections section");
	let geometry_users = connections
		.find_all(b"C")
		.filter(|c| matches!(c.props(), [_, Property::I64(src), ..] if *src == geom_uid))
		.count();
	assert_eq!(geometry_users, 2);
}

#[test]
fn assembling_twice_yields_identical_object_sections() {
	let scene = cube_scene();
	let first = assemble(&scene, &ExportSettings::default(), None);
	let second = assemble(&scene, &ExportSettings::default(), None);

	// Timestamps differ, uids and structure must not.
	assert_eq!(first.document.root.find(b"Objects"), second.document.root.find(b"Objects"));
	assert_eq!(first.document.root.find(b"Connections"), second.document.root.find(b"Connections"));
}
