use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::fbx::anim::{AnimStack, KTIME_PER_SECOND, animation_elements, bake_animations, frame_to_ktime};
use crate::fbx::connect::{Connection, connections_element};
use crate::fbx::element::{Element, name_class};
use crate::fbx::geometry::{
	geometry_key, mesh_elements, shape_channel_key, shape_channels, shape_geometry_key, shapes_key,
};
use crate::fbx::objects::{
	attribute_key, bone_model_elements, camera_attribute_elements, empty_attribute_elements, light_attribute_elements,
	map_channel_props, material_elements, model_elements, texture_elements, video_elements,
};
use crate::fbx::props::{PropKind, PropValue, prop_element, props70};
use crate::fbx::read::Document;
use crate::fbx::scene::{FrameSampler, MaterialId, ObjectId, ObjectKind, Scene, TextureId};
use crate::fbx::skin::{
	LeafBone, SkinBinding, armature_elements, cluster_key, generate_leaf_bones, leaf_bone_elements, skin_bindings, skin_key,
};
use crate::fbx::templates::{TemplateId, TemplateRegistry};
use crate::fbx::uid::UidRegistry;
use crate::fbx::write::write_file;
use crate::fbx::{EncodeOptions, Result};

/// Container format version of assembled documents.
pub const FBX_VERSION: u32 = 7400;

const HEADER_VERSION: i32 = 1003;
const SCENEINFO_VERSION: i32 = 100;
const GLOBAL_SETTINGS_VERSION: i32 = 1000;
const CREATION_TIMESTAMP_VERSION: i32 = 1000;

const APP_NAME: &str = concat!("fbxdoc ", env!("CARGO_PKG_VERSION"));
const APP_VENDOR: &str = "fbxdoc";

// Dummy value, consumers do not seem to care.
const FILE_ID: &[u8; 16] = b"fbxdoc\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00";

/// `(fps, TimeMode)` pairs; the first entry is the custom-framerate fallback.
const FRAMERATES: &[(f64, i32)] = &[
	(-1.0, 14),
	(120.0, 1),
	(100.0, 2),
	(60.0, 3),
	(50.0, 4),
	(48.0, 5),
	(30.0, 6),
	(30.0 / 1.001, 9),
	(25.0, 10),
	(24.0, 11),
	(24.0 / 1.001, 13),
	(96.0, 15),
	(72.0, 16),
	(59.94, 17),
];

/// Mesh smoothing export modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothType {
	/// No smoothing layer.
	Off,
	/// Per-polygon smooth flags.
	#[default]
	Face,
	/// Per-edge smooth flags.
	Edge,
}

/// Assembler configuration.
#[derive(Debug, Clone)]
pub struct ExportSettings {
	/// Uniform scale baked into distances (clip planes, light ranges, units).
	pub global_scale: f64,
	/// Smoothing layer mode.
	pub smooth_type: SmoothType,
	/// Emit provider-defined custom properties.
	pub use_custom_props: bool,
	/// Embed image payloads into `Video` blocks.
	pub embed_textures: bool,
	/// Append synthetic leaf bones to terminal bone chains.
	pub add_leaf_bones: bool,
	/// Bake and export animation.
	pub bake_anim: bool,
	/// Frame step while baking.
	pub bake_anim_step: f64,
	/// Key pruning factor; zero keeps every baked key.
	pub bake_anim_simplify_factor: f64,
	/// Keep keys at the range boundaries even for flat channels.
	pub bake_anim_force_startend_keying: bool,
}

impl Default for ExportSettings {
	fn default() -> Self {
		Self {
			global_scale: 1.0,
			smooth_type: SmoothType::Face,
			use_custom_props: false,
			embed_textures: false,
			add_leaf_bones: false,
			bake_anim: true,
			bake_anim_step: 1.0,
			bake_anim_simplify_factor: 1.0,
			bake_anim_force_startend_keying: true,
		}
	}
}

/// Material bookkeeping of one mesh data block.
///
/// Polygon material indices refer to the order materials were connected to
/// the mesh's users, not to the provider's slot numbers.
#[derive(Debug, Clone, Default)]
pub struct MeshMaterials {
	/// Connected materials, in connection order.
	pub order: Vec<MaterialId>,
	/// Provider slot number to connection index, from the first user.
	pub slot_to_index: Vec<i32>,
}

/// Shared mutable state of one assembly run.
pub struct AssemblerContext<'a> {
	/// Input scene.
	pub scene: &'a Scene,
	/// Configuration.
	pub settings: &'a ExportSettings,
	/// Key to uid mapping.
	pub uids: UidRegistry,
	/// Template usage counters, fully populated before emission starts.
	pub templates: TemplateRegistry,
	/// All object/property links, built during preparation.
	pub connections: Vec<Connection>,
	/// Mesh keys whose geometry went out already.
	pub done_meshes: HashSet<String>,
	/// Per-mesh material ordering.
	pub mesh_materials: HashMap<String, MeshMaterials>,
	/// Armature-to-mesh skin bindings.
	pub skins: Vec<SkinBinding>,
	/// Synthetic leaf bones, empty unless enabled.
	pub leaf_bones: Vec<LeafBone>,
	/// `(entity key, property)` pairs driven by curves.
	pub animated: HashSet<(String, String)>,
	/// The baked stack, if any.
	pub animations: Option<AnimStack>,
	/// Absolute paths already embedded.
	pub embedded: HashSet<PathBuf>,
	/// Non-fatal problems encountered while assembling.
	pub warnings: Vec<String>,
}

/// The assembled document plus everything worth reporting about the run.
pub struct ExportOutcome {
	/// The finished document.
	pub document: Document,
	/// Non-fatal problems, e.g. unreadable embedded files.
	pub warnings: Vec<String>,
}

/// A wall-clock timestamp broken into FBX header fields.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
	/// Four-digit year.
	pub year: i32,
	/// 1-12.
	pub month: u32,
	/// 1-31.
	pub day: u32,
	/// 0-23.
	pub hour: u32,
	/// 0-59.
	pub minute: u32,
	/// 0-59.
	pub second: u32,
	/// 0-999.
	pub millisecond: u32,
}

impl Timestamp {
	/// Current UTC time.
	pub fn now() -> Self {
		let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
		let secs = since_epoch.as_secs() as i64;
		let millis = since_epoch.subsec_millis();

		let days = secs.div_euclid(86_400);
		let rem = secs.rem_euclid(86_400);
		let (year, month, day) = civil_from_days(days);
		Self {
			year,
			month,
			day,
			hour: (rem / 3600) as u32,
			minute: (rem / 60 % 60) as u32,
			second: (rem % 60) as u32,
			millisecond: millis,
		}
	}
}

// Gregorian date from days since 1970-01-01.
fn civil_from_days(z: i64) -> (i32, u32, u32) {
	let z = z + 719_468;
	let era = z.div_euclid(146_097);
	let doe = z.rem_euclid(146_097);
	let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
	let y = yoe + era * 400;
	let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
	let mp = (5 * doy + 2) / 153;
	let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
	let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
	((y + i64::from(m <= 2)) as i32, m, d)
}

/// Assemble a scene into a document.
///
/// The sampler is only consulted when animation baking is enabled; pass
/// `None` for a static export.
pub fn assemble(scene: &Scene, settings: &ExportSettings, sampler: Option<&mut dyn FrameSampler>) -> ExportOutcome {
	let mut ctx = AssemblerContext {
		scene,
		settings,
		uids: UidRegistry::new(),
		templates: TemplateRegistry::new(),
		connections: Vec::new(),
		done_meshes: HashSet::new(),
		mesh_materials: HashMap::new(),
		skins: Vec::new(),
		leaf_bones: Vec::new(),
		animated: HashSet::new(),
		animations: None,
		embedded: HashSet::new(),
		warnings: Vec::new(),
	};

	prepare(&mut ctx, sampler);

	let time = Timestamp::now();
	let mut doc = Document::new(FBX_VERSION);

	doc.root.push_child(header_extension_element(&time));
	doc.root.data_bytes(&b"FileId"[..], FILE_ID.to_vec());
	doc.root.data_str(
		&b"CreationTime"[..],
		format!(
			"{:04}-{:02}-{:02} {:02}:{:02}:{:02}:{:03}",
			time.year, time.month, time.day, time.hour, time.minute, time.second, time.millisecond
		),
	);
	doc.root.data_str(&b"Creator"[..], APP_NAME);
	doc.root.push_child(global_settings_element(&ctx));
	doc.root.push_child(documents_element(&mut ctx));
	doc.root.push_child(Element::new(&b"References"[..]));
	doc.root.push_child(ctx.templates.definitions_element());
	doc.root.push_child(objects_element(&mut ctx));
	doc.root.push_child(connections_element(&ctx.connections));
	doc.root.push_child(takes_element(&ctx));

	ExportOutcome {
		document: doc,
		warnings: ctx.warnings,
	}
}

/// Assemble a scene and write it straight to a file.
pub fn export_to_path(
	path: impl AsRef<Path>,
	scene: &Scene,
	settings: &ExportSettings,
	sampler: Option<&mut dyn FrameSampler>,
) -> Result<ExportOutcome> {
	let outcome = assemble(scene, settings, sampler);
	write_file(path, &outcome.document, &EncodeOptions::default())?;
	Ok(outcome)
}

/// Everything that must be known before the first element goes out: template
/// counts, skin bindings, leaf bones, baked animation, material ordering, and
/// the full connection list.
fn prepare(ctx: &mut AssemblerContext<'_>, sampler: Option<&mut dyn FrameSampler>) {
	let scene = ctx.scene;
	let settings = ctx.settings;

	ctx.skins = skin_bindings(scene);
	if settings.add_leaf_bones {
		ctx.leaf_bones = generate_leaf_bones(scene, settings.global_scale);
	}

	if settings.bake_anim
		&& let Some(sampler) = sampler
	{
		ctx.animations = bake_animations(scene, settings, sampler);
	}
	if let Some(stack) = &ctx.animations {
		for node in &stack.nodes {
			ctx.animated.insert((node.entity_key.clone(), node.prop.clone()));
		}
	}

	// Ordered data-block usage, derived from the object list. Geometry usage
	// is keyed per instance so evaluated copies count separately.
	let mut used_meshes: Vec<(usize, String)> = Vec::new();
	let mut used_materials: Vec<MaterialId> = Vec::new();
	let mut nulls = 0_u32;
	let mut lights = 0_u32;
	let mut cameras = 0_u32;
	let mut bones = 0_u32;
	for obj in &scene.objects {
		match &obj.kind {
			ObjectKind::Empty | ObjectKind::Armature(_) => nulls += 1,
			ObjectKind::Light(_) => lights += 1,
			ObjectKind::Camera(_) => cameras += 1,
			ObjectKind::Mesh(inst) => {
				let gkey = geometry_key(obj, inst, &scene.meshes[inst.mesh.0]);
				if !used_meshes.iter().any(|(_, key)| *key == gkey) {
					used_meshes.push((inst.mesh.0, gkey));
				}
			}
		}
		if let ObjectKind::Armature(arm) = &obj.kind {
			bones += arm.bones.len() as u32;
		}
		for &mat in &obj.materials {
			if !used_materials.contains(&mat) {
				used_materials.push(mat);
			}
		}
	}

	let used_textures: Vec<TextureId> = (0..scene.textures.len())
		.map(TextureId)
		.filter(|&tex_id| {
			scene.textures[tex_id.0]
				.slots
				.iter()
				.any(|slot| used_materials.contains(&slot.material) && !slot.influences.is_empty())
		})
		.collect();
	let mut used_images: Vec<usize> = Vec::new();
	for &tex_id in &used_textures {
		let img = scene.textures[tex_id.0].image.0;
		if !used_images.contains(&img) {
			used_images.push(img);
		}
	}

	// Shape keys live on the base data block only, never on evaluated copies.
	let shape_count: u32 = used_meshes
		.iter()
		.filter(|(m, key)| *key == scene.meshes[*m].key)
		.map(|(m, _)| scene.meshes[*m].shape_keys.len() as u32)
		.sum();
	let shaped_meshes: u32 = used_meshes
		.iter()
		.filter(|(m, key)| *key == scene.meshes[*m].key && !scene.meshes[*m].shape_keys.is_empty())
		.count() as u32;

	// Template usage counters, all registered before any element goes out.
	let tpl = &mut ctx.templates;
	tpl.user(TemplateId::GlobalSettings);
	tpl.add_users(TemplateId::Null, nulls);
	tpl.add_users(TemplateId::Light, lights);
	tpl.add_users(TemplateId::Camera, cameras);
	tpl.add_users(TemplateId::Bone, bones);
	tpl.add_users(TemplateId::Geometry, used_meshes.len() as u32 + shape_count);
	tpl.add_users(TemplateId::Model, scene.objects.len() as u32 + bones);
	tpl.add_users(TemplateId::BindPose, ctx.skins.len() as u32);
	let mut deformers = shaped_meshes + shape_count;
	for binding in &ctx.skins {
		let ObjectKind::Armature(arm) = &scene.objects[binding.armature.0].kind else {
			continue;
		};
		deformers += 1 + arm.bones.len() as u32;
	}
	tpl.add_users(TemplateId::Deformer, deformers);
	tpl.add_users(TemplateId::Material, used_materials.len() as u32);
	tpl.add_users(TemplateId::TextureFile, used_textures.len() as u32);
	tpl.add_users(TemplateId::Video, used_images.len() as u32);
	if let Some(stack) = &ctx.animations {
		tpl.user(TemplateId::AnimationStack);
		tpl.user(TemplateId::AnimationLayer);
		tpl.add_users(TemplateId::AnimationCurveNode, stack.nodes.len() as u32);
		let curves: u32 = stack
			.nodes
			.iter()
			.map(|n| n.channels.iter().filter(|c| !c.keys.is_empty()).count() as u32)
			.sum();
		tpl.add_users(TemplateId::AnimationCurve, curves);
	}

	// Material connection order per mesh; polygon material indices follow it.
	for obj in &scene.objects {
		let ObjectKind::Mesh(inst) = &obj.kind else {
			continue;
		};
		let mesh_key = &scene.meshes[inst.mesh.0].key;
		let mm = ctx.mesh_materials.entry(mesh_key.clone()).or_default();
		let first_user = mm.order.is_empty();
		for &mat in &obj.materials {
			let idx = match mm.order.iter().position(|&m| m == mat) {
				Some(idx) => idx,
				None => {
					mm.order.push(mat);
					mm.order.len() - 1
				}
			};
			if first_user {
				mm.slot_to_index.push(idx as i32);
			}
		}
	}

	build_connections(ctx, &used_meshes, &used_materials, &used_textures, &used_images);
}

fn build_connections(
	ctx: &mut AssemblerContext<'_>,
	used_meshes: &[(usize, String)],
	used_materials: &[MaterialId],
	used_textures: &[TextureId],
	used_images: &[usize],
) {
	let scene = ctx.scene;
	let arm_parents: HashSet<(ObjectId, ObjectId)> = ctx.skins.iter().map(|b| (b.armature, b.object)).collect();

	let mut connections = Vec::new();
	let uids = &mut ctx.uids;

	// Object hierarchy. A mesh deformed by its parent armature hangs off the
	// root instead; the skin chain already ties it to the armature.
	for (idx, obj) in scene.objects.iter().enumerate() {
		let obj_uid = uids.uid(&obj.key);
		let parent = obj
			.parent
			.filter(|&par| !arm_parents.contains(&(par, ObjectId(idx))))
			.map_or(0, |par| uids.uid(&scene.objects[par.0].key));
		connections.push(Connection::object(obj_uid, parent));
	}

	// Bone chains.
	for obj in &scene.objects {
		let ObjectKind::Armature(arm) = &obj.kind else {
			continue;
		};
		let arm_uid = uids.uid(&obj.key);
		for bone in &arm.bones {
			let bone_uid = uids.uid(&bone.key);
			let parent = bone.parent.map_or(arm_uid, |p| uids.uid(&arm.bones[p].key));
			connections.push(Connection::object(bone_uid, parent));
		}
	}

	// Data blocks to their owners.
	for obj in &scene.objects {
		let obj_uid = uids.uid(&obj.key);
		match &obj.kind {
			ObjectKind::Empty | ObjectKind::Light(_) | ObjectKind::Camera(_) => {
				connections.push(Connection::object(uids.uid(&attribute_key(&obj.key)), obj_uid));
			}
			ObjectKind::Mesh(inst) => {
				let mesh = &scene.meshes[inst.mesh.0];
				connections.push(Connection::object(uids.uid(&geometry_key(obj, inst, mesh)), obj_uid));
			}
			ObjectKind::Armature(arm) => {
				connections.push(Connection::object(uids.uid(&attribute_key(&obj.key)), obj_uid));
				for bone in &arm.bones {
					let bone_uid = uids.uid(&bone.key);
					connections.push(Connection::object(uids.uid(&attribute_key(&bone.key)), bone_uid));
				}
			}
		}
	}

	// Leaf bones.
	for leaf in &ctx.leaf_bones {
		let node_uid = uids.uid(&leaf.node_key);
		connections.push(Connection::object(node_uid, uids.uid(&leaf.parent_key)));
		connections.push(Connection::object(uids.uid(&leaf.attr_key), node_uid));
	}

	// Blend shape chains, on base data blocks only.
	for (mesh_idx, gkey) in used_meshes {
		let mesh = &scene.meshes[*mesh_idx];
		if mesh.shape_keys.is_empty() || *gkey != mesh.key {
			continue;
		}
		let shapes_uid = uids.uid(&shapes_key(mesh));
		connections.push(Connection::object(shapes_uid, uids.uid(&mesh.key)));
		for channel in shape_channels(mesh) {
			let channel_uid = uids.uid(&shape_channel_key(mesh, &channel.name));
			connections.push(Connection::object(channel_uid, shapes_uid));
			connections.push(Connection::object(uids.uid(&shape_geometry_key(mesh, &channel.name)), channel_uid));
		}
	}

	// Skin chains, bound to the geometry rather than the model.
	for binding in &ctx.skins {
		let arm_obj = &scene.objects[binding.armature.0];
		let ObjectKind::Armature(arm) = &arm_obj.kind else {
			continue;
		};
		let mesh = &scene.meshes[binding.mesh];
		let deformed = &scene.objects[binding.object.0];
		let geom_uid = match &deformed.kind {
			ObjectKind::Mesh(inst) => uids.uid(&geometry_key(deformed, inst, mesh)),
			_ => uids.uid(&mesh.key),
		};
		let skin_uid = uids.uid(&skin_key(&arm_obj.key, mesh));
		connections.push(Connection::object(skin_uid, geom_uid));
		for bone in &arm.bones {
			let cluster_uid = uids.uid(&cluster_key(&arm_obj.key, mesh, &bone.key));
			connections.push(Connection::object(cluster_uid, skin_uid));
			connections.push(Connection::object(uids.uid(&bone.key), cluster_uid));
		}
	}

	// Materials to their user objects.
	for &mat_id in used_materials {
		let mat_uid = uids.uid(&scene.materials[mat_id.0].key);
		for obj in &scene.objects {
			if obj.materials.contains(&mat_id) {
				connections.push(Connection::object(mat_uid, uids.uid(&obj.key)));
			}
		}
	}

	// Textures to the material properties they drive.
	for &tex_id in used_textures {
		let tex = &scene.textures[tex_id.0];
		let tex_uid = uids.uid(&tex.key);
		for slot in &tex.slots {
			if !used_materials.contains(&slot.material) {
				continue;
			}
			let mat_uid = uids.uid(&scene.materials[slot.material.0].key);
			let mut done_props: HashSet<&'static str> = HashSet::new();
			for &channel in &slot.influences {
				for &prop in map_channel_props(channel) {
					if done_props.insert(prop) {
						connections.push(Connection::property(tex_uid, mat_uid, prop));
					}
				}
			}
		}
	}

	// Videos to their textures.
	for &img_idx in used_images {
		let vid_uid = uids.uid(&scene.images[img_idx].key);
		for &tex_id in used_textures {
			if scene.textures[tex_id.0].image.0 == img_idx {
				connections.push(Connection::object(vid_uid, uids.uid(&scene.textures[tex_id.0].key)));
			}
		}
	}

	// Animation: layer under stack, curve nodes under the layer and onto
	// their driven properties, curves onto their node components.
	if let Some(stack) = &ctx.animations {
		let stack_uid = uids.uid(&stack.key);
		let layer_uid = uids.uid(&stack.layer_key);
		connections.push(Connection::object(layer_uid, stack_uid));
		for node in &stack.nodes {
			let node_uid = uids.uid(&node.key);
			connections.push(Connection::object(node_uid, layer_uid));
			connections.push(Connection::property(node_uid, uids.uid(&node.entity_key), node.prop.clone()));
			for channel in &node.channels {
				if !channel.keys.is_empty() {
					connections.push(Connection::property(uids.uid(&channel.key), node_uid, channel.item.clone()));
				}
			}
		}
	}

	ctx.connections = connections;
}

fn header_extension_element(time: &Timestamp) -> Element {
	let mut header = Element::new(&b"FBXHeaderExtension"[..]);
	header.data_i32(&b"FBXHeaderVersion"[..], HEADER_VERSION);
	header.data_i32(&b"FBXVersion"[..], FBX_VERSION as i32);
	header.data_i32(&b"EncryptionType"[..], 0);

	let stamp = header.child(&b"CreationTimeStamp"[..]);
	stamp.data_i32(&b"Version"[..], CREATION_TIMESTAMP_VERSION);
	stamp.data_i32(&b"Year"[..], time.year);
	stamp.data_i32(&b"Month"[..], time.month as i32);
	stamp.data_i32(&b"Day"[..], time.day as i32);
	stamp.data_i32(&b"Hour"[..], time.hour as i32);
	stamp.data_i32(&b"Minute"[..], time.minute as i32);
	stamp.data_i32(&b"Second"[..], time.second as i32);
	stamp.data_i32(&b"Millisecond"[..], time.millisecond as i32);

	header.data_str(&b"Creator"[..], APP_NAME);

	// A SceneInfo block is mandatory for a valid file.
	let scene_info = header.data_str(&b"SceneInfo"[..], name_class("GlobalInfo", b"SceneInfo"));
	scene_info.add_string(&b"UserData"[..]);
	scene_info.data_str(&b"Type"[..], &b"UserData"[..]);
	scene_info.data_i32(&b"Version"[..], SCENEINFO_VERSION);
	let meta = scene_info.child(&b"MetaData"[..]);
	meta.data_i32(&b"Version"[..], SCENEINFO_VERSION);
	meta.data_str(&b"Title"[..], &b""[..]);
	meta.data_str(&b"Subject"[..], &b""[..]);
	meta.data_str(&b"Author"[..], &b""[..]);
	meta.data_str(&b"Keywords"[..], &b""[..]);
	meta.data_str(&b"Revision"[..], &b""[..]);
	meta.data_str(&b"Comment"[..], &b""[..]);

	let p70 = props70(scene_info);
	let doc_url = PropValue::Str("/foobar.fbx".to_owned());
	prop_element(p70, "DocumentUrl", PropKind::Url, &doc_url, false, false);
	prop_element(p70, "SrcDocumentUrl", PropKind::Url, &doc_url, false, false);
	for section in ["Original", "LastSaved"] {
		prop_element(p70, section, PropKind::Compound, &PropValue::None, false, false);
		let sub = |name: &str| format!("{section}|{name}");
		prop_element(
			p70,
			&sub("ApplicationVendor"),
			PropKind::KString,
			&PropValue::Str(APP_VENDOR.to_owned()),
			false,
			false,
		);
		prop_element(
			p70,
			&sub("ApplicationName"),
			PropKind::KString,
			&PropValue::Str(APP_NAME.to_owned()),
			false,
			false,
		);
		prop_element(
			p70,
			&sub("ApplicationVersion"),
			PropKind::KString,
			&PropValue::Str(env!("CARGO_PKG_VERSION").to_owned()),
			false,
			false,
		);
		prop_element(
			p70,
			&sub("DateTime_GMT"),
			PropKind::DateTime,
			&PropValue::Str("01/01/1970 00:00:00.000".to_owned()),
			false,
			false,
		);
		if section == "Original" {
			prop_element(
				p70,
				&sub("FileName"),
				PropKind::KString,
				&PropValue::Str("/foobar.fbx".to_owned()),
				false,
				false,
			);
		}
	}

	header
}

fn global_settings_element(ctx: &AssemblerContext<'_>) -> Element {
	let scene = ctx.scene;
	let mut gs = Element::new(&b"GlobalSettings"[..]);
	gs.data_i32(&b"Version"[..], GLOBAL_SETTINGS_VERSION);

	let fps = scene.fps;
	let (mut fbx_fps, mut time_mode) = FRAMERATES[0];
	for &(ref_fps, mode) in FRAMERATES {
		if (fps - ref_fps).abs() < 1e-4 {
			fbx_fps = ref_fps;
			time_mode = mode;
		}
	}
	if fbx_fps < 0.0 {
		fbx_fps = fps;
	}

	let p70 = props70(&mut gs);
	let set = |p70: &mut Element, name: &str, kind: PropKind, value: PropValue| {
		prop_element(p70, name, kind, &value, false, false);
	};
	// Y up, right handed.
	set(p70, "UpAxis", PropKind::Integer, PropValue::I32(1));
	set(p70, "UpAxisSign", PropKind::Integer, PropValue::I32(1));
	set(p70, "FrontAxis", PropKind::Integer, PropValue::I32(2));
	set(p70, "FrontAxisSign", PropKind::Integer, PropValue::I32(1));
	set(p70, "CoordAxis", PropKind::Integer, PropValue::I32(0));
	set(p70, "CoordAxisSign", PropKind::Integer, PropValue::I32(1));
	set(p70, "OriginalUpAxis", PropKind::Integer, PropValue::I32(-1));
	set(p70, "OriginalUpAxisSign", PropKind::Integer, PropValue::I32(1));
	set(p70, "UnitScaleFactor", PropKind::Double, PropValue::F64(ctx.settings.global_scale));
	set(p70, "OriginalUnitScaleFactor", PropKind::Double, PropValue::F64(1.0));
	set(p70, "AmbientColor", PropKind::ColorRgb, PropValue::Vec3([0.0; 3]));
	set(p70, "DefaultCamera", PropKind::KString, PropValue::Str("Producer Perspective".to_owned()));
	set(p70, "TimeMode", PropKind::Enum, PropValue::I32(time_mode));
	set(p70, "TimeSpanStart", PropKind::Timestamp, PropValue::I64(0));
	set(p70, "TimeSpanStop", PropKind::Timestamp, PropValue::I64(KTIME_PER_SECOND));
	set(p70, "CustomFrameRate", PropKind::Double, PropValue::F64(fbx_fps));

	gs
}

fn documents_element(ctx: &mut AssemblerContext<'_>) -> Element {
	let name = &ctx.scene.name;
	let mut docs = Element::new(&b"Documents"[..]);
	docs.data_i32(&b"Count"[..], 1);

	let doc_uid = ctx.uids.uid(&format!("__FBX_Document__{name}"));
	let doc = docs.data_i64(&b"Document"[..], doc_uid);
	doc.add_string(name.as_bytes().to_vec());
	doc.add_string(name.as_bytes().to_vec());
	let p70 = props70(doc);
	prop_element(p70, "SourceObject", PropKind::Object, &PropValue::None, false, false);
	prop_element(p70, "ActiveAnimStackName", PropKind::KString, &PropValue::Str(String::new()), false, false);
	doc.data_i64(&b"RootNode"[..], 0);

	docs
}

fn objects_element(ctx: &mut AssemblerContext<'_>) -> Element {
	let mut objects = Element::new(&b"Objects"[..]);

	let object_ids: Vec<ObjectId> = (0..ctx.scene.objects.len()).map(ObjectId).collect();

	for &obj_id in &object_ids {
		if matches!(ctx.scene.objects[obj_id.0].kind, ObjectKind::Empty | ObjectKind::Armature(_)) {
			empty_attribute_elements(&mut objects, ctx, obj_id);
		}
	}
	for &obj_id in &object_ids {
		if matches!(ctx.scene.objects[obj_id.0].kind, ObjectKind::Light(_)) {
			light_attribute_elements(&mut objects, ctx, obj_id);
		}
	}
	for &obj_id in &object_ids {
		if matches!(ctx.scene.objects[obj_id.0].kind, ObjectKind::Camera(_)) {
			camera_attribute_elements(&mut objects, ctx, obj_id);
		}
	}
	for &obj_id in &object_ids {
		mesh_elements(&mut objects, ctx, obj_id);
	}
	for &obj_id in &object_ids {
		model_elements(&mut objects, ctx, obj_id);
		if matches!(ctx.scene.objects[obj_id.0].kind, ObjectKind::Armature(_)) {
			bone_model_elements(&mut objects, ctx, obj_id);
		}
	}
	for &obj_id in &object_ids {
		if matches!(ctx.scene.objects[obj_id.0].kind, ObjectKind::Armature(_)) {
			armature_elements(&mut objects, ctx, obj_id);
		}
	}
	if !ctx.leaf_bones.is_empty() {
		leaf_bone_elements(&mut objects, ctx);
	}

	let mats: Vec<MaterialId> = ctx
		.mesh_materials
		.values()
		.flat_map(|mm| mm.order.iter().copied())
		.collect();
	let mut done_mats: HashSet<usize> = HashSet::new();
	let mut ordered_mats: Vec<MaterialId> = Vec::new();
	for obj in &ctx.scene.objects {
		for &mat in &obj.materials {
			if done_mats.insert(mat.0) {
				ordered_mats.push(mat);
			}
		}
	}
	// Materials only referenced through non-mesh objects still go out.
	for mat in mats {
		if done_mats.insert(mat.0) {
			ordered_mats.push(mat);
		}
	}
	for mat in ordered_mats {
		material_elements(&mut objects, ctx, mat);
	}

	let used_mats: HashSet<usize> = ctx
		.scene
		.objects
		.iter()
		.flat_map(|o| o.materials.iter().map(|m| m.0))
		.collect();
	let mut used_images: Vec<usize> = Vec::new();
	for (idx, tex) in ctx.scene.textures.iter().enumerate() {
		let used = tex
			.slots
			.iter()
			.any(|slot| used_mats.contains(&slot.material.0) && !slot.influences.is_empty());
		if !used {
			continue;
		}
		texture_elements(&mut objects, ctx, TextureId(idx));
		if !used_images.contains(&tex.image.0) {
			used_images.push(tex.image.0);
		}
	}
	for img in used_images {
		video_elements(&mut objects, ctx, img);
	}

	animation_elements(&mut objects, ctx);

	objects
}

fn takes_element(ctx: &AssemblerContext<'_>) -> Element {
	let mut takes = Element::new(&b"Takes"[..]);
	takes.data_str(&b"Current"[..], &b""[..]);

	if let Some(stack) = &ctx.animations {
		let fps = ctx.scene.fps;
		let start = frame_to_ktime(stack.frame_start, fps);
		let end = frame_to_ktime(stack.frame_end, fps);

		let take = takes.data_str(&b"Take"[..], stack.name.as_bytes().to_vec());
		take.data_str(&b"FileName"[..], format!("{}.tak", stack.name));
		let local = take.data_i64(&b"LocalTime"[..], start);
		local.add_i64(end);
		let reference = take.data_i64(&b"ReferenceTime"[..], start);
		reference.add_i64(end);
	}

	takes
}
