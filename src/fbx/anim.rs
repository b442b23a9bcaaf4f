use crate::fbx::element::{Element, name_class};
use crate::fbx::export::{AssemblerContext, ExportSettings};
use crate::fbx::geometry::shape_channel_key;
use crate::fbx::props::{PropKind, PropValue};
use crate::fbx::scene::{FrameSampler, ObjectKind, Scene};
use crate::fbx::templates::{TemplateId, TemplateProps};

/// FBX time units per second.
pub const KTIME_PER_SECOND: i64 = 46_186_158_000;
/// `KeyVer` of animation curves.
pub const ANIM_KEY_VERSION: i32 = 4008;

// Linear interpolation, auto tangents, generic time-independent clamp.
const KEYATTR_FLAGS: i32 = (1 << 2) | (1 << 8) | (1 << 13) | (1 << 14);
const KEYATTR_DATAFLOAT: [f32; 4] = [0.0, 0.0, 9.419_963e-30, 0.0];

/// Convert a frame number to FBX ktime.
pub fn frame_to_ktime(frame: f64, fps: f64) -> i64 {
	((frame / fps) * KTIME_PER_SECOND as f64) as i64
}

/// One scalar curve bound to a component of a curve node.
#[derive(Debug, Clone)]
pub struct CurveChannel {
	/// Stable string key of the curve block.
	pub key: String,
	/// Component item name, `d|X` style.
	pub item: String,
	/// Rest value, written as the curve node property and the curve default.
	pub default: f64,
	/// `(frame, value)` keys; empty channels carry only the default.
	pub keys: Vec<(f64, f32)>,
}

impl CurveChannel {
	fn has_keys(&self) -> bool {
		!self.keys.is_empty()
	}
}

/// One animation curve node driving a property of some entity.
#[derive(Debug, Clone)]
pub struct CurveNode {
	/// Stable string key of the curve node block.
	pub key: String,
	/// Display name (`T`, `R`, `S` or the shape name).
	pub name: String,
	/// Key of the driven entity.
	pub entity_key: String,
	/// Driven property name on the entity.
	pub prop: String,
	/// Component channels.
	pub channels: Vec<CurveChannel>,
}

/// One baked animation stack with its single layer.
#[derive(Debug, Clone)]
pub struct AnimStack {
	/// Stable string key of the stack block.
	pub key: String,
	/// Stable string key of the layer block.
	pub layer_key: String,
	/// Stack name.
	pub name: String,
	/// First baked frame.
	pub frame_start: f64,
	/// Last baked frame.
	pub frame_end: f64,
	/// Curve nodes, in entity order.
	pub nodes: Vec<CurveNode>,
}

struct ChannelBake {
	item: &'static str,
	default: f64,
	keys: Vec<(f64, f32)>,
}

struct NodeBake {
	entity_key: String,
	prop: &'static str,
	name: String,
	channels: Vec<ChannelBake>,
}

fn transform_node(entity_key: &str, prop: &'static str, name: &str, defaults: [f64; 3]) -> NodeBake {
	let items = ["d|X", "d|Y", "d|Z"];
	NodeBake {
		entity_key: entity_key.to_owned(),
		prop,
		name: name.to_owned(),
		channels: items
			.iter()
			.zip(defaults)
			.map(|(&item, default)| ChannelBake {
				item,
				default,
				keys: Vec::new(),
			})
			.collect(),
	}
}

/// Bake the scene frame range into a single animation stack.
///
/// Every object, bone and shape key is sampled at each baked frame; entities
/// the sampler reports as unanimated never collect keys. Returns `None` when
/// nothing survives simplification.
pub fn bake_animations(scene: &Scene, settings: &ExportSettings, sampler: &mut dyn FrameSampler) -> Option<AnimStack> {
	let mut entities: Vec<(String, [NodeBake; 3])> = Vec::new();
	let mut shapes: Vec<(String, String, NodeBake)> = Vec::new();

	let transform_nodes = |key: &str, t: &crate::fbx::scene::Transform| {
		[
			transform_node(key, "Lcl Translation", "T", t.translation),
			transform_node(key, "Lcl Rotation", "R", t.rotation_euler_deg),
			transform_node(key, "Lcl Scaling", "S", t.scale),
		]
	};

	for obj in &scene.objects {
		entities.push((obj.key.clone(), transform_nodes(&obj.key, &obj.transform)));
		if let ObjectKind::Armature(arm) = &obj.kind {
			for bone in &arm.bones {
				entities.push((bone.key.clone(), transform_nodes(&bone.key, &bone.transform)));
			}
		}
	}

	// Only meshes some object uses as their base data block emit shape
	// channels, so only those bake.
	for (mesh_idx, mesh) in scene.meshes.iter().enumerate() {
		let has_base_user = scene
			.objects
			.iter()
			.any(|obj| matches!(&obj.kind, ObjectKind::Mesh(inst) if inst.mesh.0 == mesh_idx && !inst.modified));
		if !has_base_user {
			continue;
		}
		for shape in &mesh.shape_keys {
			let channel_key = shape_channel_key(mesh, &shape.name);
			let node = NodeBake {
				entity_key: channel_key,
				prop: "DeformPercent",
				name: shape.name.clone(),
				channels: vec![ChannelBake {
					item: "d|DeformPercent",
					default: shape.value * 100.0,
					keys: Vec::new(),
				}],
			};
			shapes.push((mesh.key.clone(), shape.name.clone(), node));
		}
	}

	let step = if settings.bake_anim_step > 0.0 { settings.bake_anim_step } else { 1.0 };
	let (f_start, f_end) = (scene.frame_start, scene.frame_end);

	let mut frame = f_start;
	while frame <= f_end + 1e-9 {
		sampler.scrub(frame);
		for (key, nodes) in &mut entities {
			let Some(t) = sampler.transform(key) else {
				continue;
			};
			let values = [t.translation, t.rotation_euler_deg, t.scale];
			for (node, triple) in nodes.iter_mut().zip(values) {
				for (channel, value) in node.channels.iter_mut().zip(triple) {
					channel.keys.push((frame, value as f32));
				}
			}
		}
		for (mesh_key, shape_name, node) in &mut shapes {
			let Some(value) = sampler.shape_value(mesh_key, shape_name) else {
				continue;
			};
			node.channels[0].keys.push((frame, (value * 100.0) as f32));
		}
		frame += step;
	}

	let fac = settings.bake_anim_simplify_factor;
	let force_sek = settings.bake_anim_force_startend_keying;

	let mut nodes: Vec<CurveNode> = Vec::new();
	let stack_key = format!("{}|anim_stack", scene.name);
	let mut push_node = |bake: NodeBake| {
		let mut channels = Vec::with_capacity(bake.channels.len());
		let mut any_keys = false;
		for mut channel in bake.channels {
			simplify_keys(&mut channel.keys, fac, force_sek, f_start, f_end);
			any_keys |= !channel.keys.is_empty();
			channels.push(channel);
		}
		if !any_keys {
			return;
		}
		let node_key = format!("{stack_key}|{}|{}|acn", bake.entity_key, bake.prop);
		nodes.push(CurveNode {
			channels: channels
				.into_iter()
				.map(|c| CurveChannel {
					key: format!("{node_key}|{}|ac", c.item),
					item: c.item.to_owned(),
					default: c.default,
					keys: c.keys,
				})
				.collect(),
			key: node_key,
			name: bake.name,
			entity_key: bake.entity_key,
			prop: bake.prop.to_owned(),
		});
	};

	for (_, bakes) in entities {
		for bake in bakes {
			push_node(bake);
		}
	}
	for (_, _, bake) in shapes {
		push_node(bake);
	}

	if nodes.is_empty() {
		return None;
	}
	Some(AnimStack {
		layer_key: format!("{}|anim_layer", scene.name),
		key: stack_key,
		name: scene.name.clone(),
		frame_start: f_start,
		frame_end: f_end,
		nodes,
	})
}

/// Prune near-constant stretches from a baked key list.
///
/// Endpoints survive pruning; a channel whose values never leave the tolerance
/// band collapses to nothing unless start/end keying is forced.
fn simplify_keys(keys: &mut Vec<(f64, f32)>, fac: f64, force_startend: bool, f_start: f64, f_end: f64) {
	if keys.is_empty() {
		return;
	}

	let (mut min, mut max) = (f32::INFINITY, f32::NEG_INFINITY);
	for &(_, v) in keys.iter() {
		min = min.min(v);
		max = max.max(v);
	}
	let tol = if fac > 0.0 { ((max - min).abs() * fac as f32 * 1e-3).max(f32::EPSILON) } else { 0.0 };

	if (max - min).abs() <= tol {
		// Flat channel.
		if force_startend {
			let first = keys[0].1;
			*keys = vec![(f_start, first), (f_end, first)];
		} else {
			keys.clear();
		}
		return;
	}
	if fac <= 0.0 {
		return;
	}

	let last = keys.len() - 1;
	let mut kept = Vec::with_capacity(keys.len());
	for (idx, &(f, v)) in keys.iter().enumerate() {
		if idx == 0 || idx == last {
			kept.push((f, v));
			continue;
		}
		let prev = keys[idx - 1].1;
		let next = keys[idx + 1].1;
		if (v - prev).abs() > tol || (next - v).abs() > tol {
			kept.push((f, v));
		}
	}
	*keys = kept;
}

/// Write the animation stack, its layer, and every curve node and curve.
pub fn animation_elements(root: &mut Element, ctx: &mut AssemblerContext) {
	let Some(stack) = ctx.animations.clone() else {
		return;
	};
	let fps = ctx.scene.fps;

	let start = frame_to_ktime(stack.frame_start, fps);
	let end = frame_to_ktime(stack.frame_end, fps);

	let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::AnimationStack);
	let mut p70 = Element::new(&b"Properties70"[..]);
	tmpl.set(&mut p70, PropKind::Timestamp, "LocalStart", PropValue::I64(start));
	tmpl.set(&mut p70, PropKind::Timestamp, "LocalStop", PropValue::I64(end));
	tmpl.set(&mut p70, PropKind::Timestamp, "ReferenceStart", PropValue::I64(start));
	tmpl.set(&mut p70, PropKind::Timestamp, "ReferenceStop", PropValue::I64(end));
	tmpl.finalize(&mut p70);

	let stack_uid = ctx.uids.uid(&stack.key);
	let astack = root.data_i64(&b"AnimationStack"[..], stack_uid);
	astack.add_string(name_class(&stack.name, b"AnimStack"));
	astack.add_string(&b""[..]);
	astack.push_child(p70);

	// A single layer carries every curve node.
	let layer_uid = ctx.uids.uid(&stack.layer_key);
	let alayer = root.data_i64(&b"AnimationLayer"[..], layer_uid);
	alayer.add_string(name_class(&stack.name, b"AnimLayer"));
	alayer.add_string(&b""[..]);

	for node in &stack.nodes {
		let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::AnimationCurveNode);
		let mut p70 = Element::new(&b"Properties70"[..]);
		for channel in &node.channels {
			tmpl.set(&mut p70, PropKind::Number, &channel.item, PropValue::F64(channel.default));
		}
		tmpl.finalize(&mut p70);

		let node_uid = ctx.uids.uid(&node.key);
		let acn = root.data_i64(&b"AnimationCurveNode"[..], node_uid);
		acn.add_string(name_class(&node.name, b"AnimCurveNode"));
		acn.add_string(&b""[..]);
		acn.push_child(p70);

		for channel in &node.channels {
			if !channel.has_keys() {
				continue;
			}
			let curve_uid = ctx.uids.uid(&channel.key);
			let acurve = root.data_i64(&b"AnimationCurve"[..], curve_uid);
			acurve.add_string(name_class("", b"AnimCurve"));
			acurve.add_string(&b""[..]);

			let nbr_keys = channel.keys.len();
			let ktimes: Vec<i64> = channel.keys.iter().map(|&(f, _)| frame_to_ktime(f, fps)).collect();
			let values: Vec<f32> = channel.keys.iter().map(|&(_, v)| v).collect();
			acurve.data_f64(&b"Default"[..], channel.default);
			acurve.data_i32(&b"KeyVer"[..], ANIM_KEY_VERSION);
			acurve.data_i64_array(&b"KeyTime"[..], ktimes);
			acurve.data_f32_array(&b"KeyValueFloat"[..], values);
			acurve.data_i32_array(&b"KeyAttrFlags"[..], vec![KEYATTR_FLAGS]);
			acurve.data_f32_array(&b"KeyAttrDataFloat"[..], KEYATTR_DATAFLOAT.to_vec());
			acurve.data_i32_array(&b"KeyAttrRefCount"[..], vec![nbr_keys as i32]);
		}
	}
}

#[cfg(test)]
mod tests;
