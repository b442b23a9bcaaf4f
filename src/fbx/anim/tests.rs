use super::*;
use crate::fbx::export::{ExportSettings, assemble};
use crate::fbx::property::Property;
use crate::fbx::scene::{MeshData, MeshId, MeshInstance, SceneObject, ShapeKeyData, Transform};

/// Sampler that animates one object's X translation linearly with the frame.
struct RampSampler {
	key: String,
	frame: f64,
}

impl FrameSampler for RampSampler {
	fn scrub(&mut self, frame: f64) {
		self.frame = frame;
	}

	fn transform(&self, key: &str) -> Option<Transform> {
		(key == self.key).then(|| Transform {
			translation: [self.frame, 0.0, 0.0],
			..Transform::default()
		})
	}

	fn shape_value(&self, _mesh_key: &str, _shape: &str) -> Option<f64> {
		None
	}
}

struct SilentSampler;

impl FrameSampler for SilentSampler {
	fn scrub(&mut self, _frame: f64) {}

	fn transform(&self, _key: &str) -> Option<Transform> {
		None
	}

	fn shape_value(&self, _mesh_key: &str, _shape: &str) -> Option<f64> {
		None
	}
}

fn short_scene() -> Scene {
	let mut scene = Scene::new("take");
	scene.frame_start = 1.0;
	scene.frame_end = 3.0;
	scene.objects.push(SceneObject::empty("ob:cube", "Cube"));
	scene
}

#[test]
fn one_second_is_one_ktime_unit_block() {
	assert_eq!(frame_to_ktime(24.0, 24.0), KTIME_PER_SECOND);
	assert_eq!(frame_to_ktime(0.0, 24.0), 0);
	assert_eq!(frame_to_ktime(12.0, 24.0), KTIME_PER_SECOND / 2);
}

#[test]
fn flat_channels_collapse_to_the_range_ends() {
	let mut keys = vec![(1.0, 5.0_f32), (2.0, 5.0), (3.0, 5.0)];
	simplify_keys(&mut keys, 1.0, true, 1.0, 10.0);
	assert_eq!(keys, vec![(1.0, 5.0), (10.0, 5.0)]);
}

#[test]
fn flat_channels_vanish_without_forced_keying() {
	let mut keys = vec![(1.0, 5.0_f32), (2.0, 5.0), (3.0, 5.0)];
	simplify_keys(&mut keys, 1.0, false, 1.0, 10.0);
	assert!(keys.is_empty());
}

#[test]
fn simplification_keeps_endpoints_and_moving_keys() {
	let mut keys: Vec<(f64, f32)> = (0..=10).map(|f| (f as f64, if f == 5 { 10.0 } else { 0.0 })).collect();
	simplify_keys(&mut keys, 1.0, true, 0.0, 10.0);

	assert_eq!(keys.first(), Some(&(0.0, 0.0)));
	assert_eq!(keys.last(), Some(&(10.0, 0.0)));
	assert!(keys.contains(&(5.0, 10.0)));
	// The flat run in the middle is gone.
	assert!(!keys.contains(&(2.0, 0.0)));
}

#[test]
fn zero_factor_keeps_every_key() {
	let mut keys: Vec<(f64, f32)> = (0..=4).map(|f| (f as f64, f as f32)).collect();
	simplify_keys(&mut keys, 0.0, true, 0.0, 4.0);
	assert_eq!(keys.len(), 5);
}

#[test]
fn baking_samples_animated_entities_per_frame() {
	let scene = short_scene();
	let settings = ExportSettings::default();
	let mut sampler = RampSampler {
		key: "ob:cube".to_owned(),
		frame: 0.0,
	};

	let stack = bake_animations(&scene, &settings, &mut sampler).expect("a stack");
	assert_eq!(stack.name, "take");
	assert_eq!(stack.key, "take|anim_stack");

	// T, R and S nodes all survive: Y/Z and the rotation/scale channels are
	// flat but start/end keying is forced.
	assert_eq!(stack.nodes.len(), 3);
	let t_node = &stack.nodes[0];
	assert_eq!(t_node.prop, "Lcl Translation");
	assert_eq!(t_node.entity_key, "ob:cube");
	assert_eq!(t_node.channels.len(), 3);

	let x = &t_node.channels[0];
	assert_eq!(x.item, "d|X");
	assert_eq!(x.keys, vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
	let y = &t_node.channels[1];
	assert_eq!(y.keys, vec![(1.0, 0.0), (3.0, 0.0)]);
}

#[test]
fn unanimated_scenes_bake_to_nothing() {
	let scene = short_scene();
	let settings = ExportSettings::default();
	assert!(bake_animations(&scene, &settings, &mut SilentSampler).is_none());
}

#[test]
fn unforced_baking_drops_static_channels() {
	let scene = short_scene();
	let settings = ExportSettings {
		bake_anim_force_startend_keying: false,
		..ExportSettings::default()
	};
	let mut sampler = RampSampler {
		key: "ob:cube".to_owned(),
		frame: 0.0,
	};

	let stack = bake_animations(&scene, &settings, &mut sampler).expect("a stack");
	// Only the translation node keeps keys; its flat Y/Z channels are empty.
	assert_eq!(stack.nodes.len(), 1);
	let t_node = &stack.nodes[0];
	assert!(!t_node.channels[0].keys.is_empty());
	assert!(t_node.channels[1].keys.is_empty());
	assert!(t_node.channels[2].keys.is_empty());
}

#[test]
fn shape_keys_bake_in_percent() {
	struct ShapeSampler {
		frame: f64,
	}
	impl FrameSampler for ShapeSampler {
		fn scrub(&mut self, frame: f64) {
			self.frame = frame;
		}
		fn transform(&self, _key: &str) -> Option<Transform> {
			None
		}
		fn shape_value(&self, mesh_key: &str, shape: &str) -> Option<f64> {
			(mesh_key == "me:face" && shape == "Smile").then_some(self.frame / 10.0)
		}
	}

	let mut scene = short_scene();
	let mut mesh = MeshData::new("me:face", "Face");
	mesh.vertices = vec![[0.0; 3]];
	mesh.shape_keys.push(ShapeKeyData {
		name: "Smile".to_owned(),
		value: 0.0,
		positions: vec![[0.0, 0.0, 1.0]],
		vertex_group: None,
	});
	scene.meshes.push(mesh);
	let mut obj = SceneObject::empty("ob:face", "Face");
	obj.kind = crate::fbx::scene::ObjectKind::Mesh(MeshInstance {
		mesh: MeshId(0),
		armature: None,
		modified: false,
	});
	scene.objects.push(obj);

	let settings = ExportSettings {
		bake_anim_force_startend_keying: false,
		..ExportSettings::default()
	};
	let stack = bake_animations(&scene, &settings, &mut ShapeSampler { frame: 0.0 }).expect("a stack");

	let node = stack.nodes.iter().find(|n| n.prop == "DeformPercent").expect("shape node");
	assert_eq!(node.entity_key, shape_channel_key(&scene.meshes[0], "Smile"));
	assert_eq!(node.channels.len(), 1);
	assert_eq!(node.channels[0].item, "d|DeformPercent");
	assert_eq!(node.channels[0].keys, vec![(1.0, 10.0), (2.0, 20.0), (3.0, 30.0)]);
}

#[test]
fn shape_keys_on_unused_meshes_never_bake() {
	struct EagerShapeSampler;
	impl FrameSampler for EagerShapeSampler {
		fn scrub(&mut self, _frame: f64) {}
		fn transform(&self, _key: &str) -> Option<Transform> {
			None
		}
		fn shape_value(&self, _mesh_key: &str, shape: &str) -> Option<f64> {
			(shape == "Smile").then_some(0.5)
		}
	}

	// The mesh is in the scene tables but no object references it.
	let mut scene = short_scene();
	let mut mesh = MeshData::new("me:orphan", "Orphan");
	mesh.vertices = vec![[0.0; 3]];
	mesh.shape_keys.push(ShapeKeyData {
		name: "Smile".to_owned(),
		value: 0.0,
		positions: vec![[0.0, 0.0, 1.0]],
		vertex_group: None,
	});
	scene.meshes.push(mesh);

	assert!(bake_animations(&scene, &ExportSettings::default(), &mut EagerShapeSampler).is_none());

	// The assembled document carries no connection to a missing element.
	let outcome = assemble(&scene, &ExportSettings::default(), Some(&mut EagerShapeSampler));
	let objects = outcome.document.root.find(b"Objects").expect("Objects section");
	let mut uids = std::collections::HashSet::new();
	uids.insert(0_i64);
	for elem in objects.children() {
		if let Some(Property::I64(uid)) = elem.props().first() {
			uids.insert(*uid);
		}
	}
	let connections = outcome.document.root.find(b"Connections").expect("Connections section");
	for conn in connections.children() {
		let (Some(Property::I64(src)), Some(Property::I64(dst))) = (conn.props().get(1), conn.props().get(2)) else {
			panic!("malformed connection: {:?}", conn.props());
		};
		assert!(uids.contains(src), "connection src uid {src} dangles");
		assert!(uids.contains(dst), "connection dst uid {dst} dangles");
	}
}

#[test]
fn curves_write_the_key_tables() {
	let scene = short_scene();
	let settings = ExportSettings::default();
	let mut sampler = RampSampler {
		key: "ob:cube".to_owned(),
		frame: 0.0,
	};

	let outcome = assemble(&scene, &settings, Some(&mut sampler));
	let objects = outcome.document.root.find(b"Objects").expect("Objects section");

	assert_eq!(objects.find_all(b"AnimationStack").count(), 1);
	assert_eq!(objects.find_all(b"AnimationLayer").count(), 1);
	assert_eq!(objects.find_all(b"AnimationCurveNode").count(), 3);

	let curve = objects.find(b"AnimationCurve").expect("a curve");
	assert_eq!(
		curve.find(b"KeyVer").map(|c| c.props().to_vec()),
		Some(vec![Property::I32(ANIM_KEY_VERSION)])
	);
	match curve.find(b"KeyTime").map(|c| &c.props()[0]) {
		Some(Property::I64Array(times)) => {
			assert_eq!(times.len(), 3);
			assert_eq!(times[2], frame_to_ktime(3.0, scene.fps));
		}
		other => panic!("unexpected KeyTime: {other:?}"),
	}
	match curve.find(b"KeyAttrRefCount").map(|c| &c.props()[0]) {
		Some(Property::I32Array(counts)) => assert_eq!(counts, &vec![3]),
		other => panic!("unexpected KeyAttrRefCount: {other:?}"),
	}
}
