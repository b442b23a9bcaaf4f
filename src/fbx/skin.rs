use crate::fbx::element::{Element, name_class};
use crate::fbx::export::AssemblerContext;
use crate::fbx::objects::{MODELS_VERSION, attribute_key, model_extras};
use crate::fbx::props::{PropKind, PropValue};
use crate::fbx::scene::{ArmatureData, MAT4_IDENTITY, Mat4, MeshData, ObjectId, ObjectKind, Scene, mat4_invert_affine, mat4_mul};
use crate::fbx::templates::{TemplateId, TemplateProps};

const POSE_BIND_VERSION: i32 = 100;
const DEFORMER_SKIN_VERSION: i32 = 101;
const DEFORMER_CLUSTER_VERSION: i32 = 100;

/// Size factor applied to bone head radii.
const BONE_RADIUS_SCALE: f64 = 33.0;

/// Key of the skin deformer binding an armature to one mesh.
pub fn skin_key(arm_key: &str, mesh: &MeshData) -> String {
	format!("{arm_key}|{}|skin", mesh.key)
}

/// Key of one bone/mesh cluster.
pub fn cluster_key(arm_key: &str, mesh: &MeshData, bone_key: &str) -> String {
	format!("{arm_key}|{}|{bone_key}|cluster", mesh.key)
}

/// One mesh bound to an armature through a skin deformer.
#[derive(Debug, Clone)]
pub struct SkinBinding {
	/// Deforming armature object.
	pub armature: ObjectId,
	/// Deformed mesh object.
	pub object: ObjectId,
	/// Index of the mesh data block in [`Scene::meshes`].
	pub mesh: usize,
}

/// Collect the skin bindings of a scene, in object order.
pub fn skin_bindings(scene: &Scene) -> Vec<SkinBinding> {
	let mut bindings = Vec::new();
	for (idx, obj) in scene.objects.iter().enumerate() {
		let ObjectKind::Mesh(inst) = &obj.kind else {
			continue;
		};
		let Some(arm_id) = inst.armature else {
			continue;
		};
		if matches!(scene.objects[arm_id.0].kind, ObjectKind::Armature(_)) {
			bindings.push(SkinBinding {
				armature: arm_id,
				object: ObjectId(idx),
				mesh: inst.mesh.0,
			});
		}
	}
	bindings
}

/// A synthetic terminal bone, giving consumers the length of each chain end.
#[derive(Debug, Clone)]
pub struct LeafBone {
	/// Node name, the parent bone's name with an `_end` suffix.
	pub name: String,
	/// Key of the parent bone.
	pub parent_key: String,
	/// Key of the synthetic model node.
	pub node_key: String,
	/// Key of the synthetic limb attribute.
	pub attr_key: String,
	/// Local matrix, a translation along the parent bone.
	pub matrix: Mat4,
	/// Attribute size.
	pub size: f64,
}

/// Generate one leaf bone per childless bone of every armature.
pub fn generate_leaf_bones(scene: &Scene, global_scale: f64) -> Vec<LeafBone> {
	let mut leaves = Vec::new();
	for obj in &scene.objects {
		let ObjectKind::Armature(arm) = &obj.kind else {
			continue;
		};
		for (idx, bone) in arm.bones.iter().enumerate() {
			if arm.bones.iter().any(|b| b.parent == Some(idx)) {
				continue;
			}
			let name = format!("{}_end", bone.name);
			let mut matrix = MAT4_IDENTITY;
			matrix[13] = bone.length;
			leaves.push(LeafBone {
				parent_key: bone.key.clone(),
				node_key: format!("{}|end|node", bone.key),
				attr_key: format!("{}|end|attr", bone.key),
				name,
				matrix,
				size: bone.head_radius * global_scale * BONE_RADIUS_SCALE,
			});
		}
	}
	leaves
}

/// Write the bind pose of one deformed object: world matrices of the object,
/// the armature (when distinct), and every bone.
pub fn bindpose_element(root: &mut Element, ctx: &mut AssemblerContext, obj_id: ObjectId, mesh_idx: usize, armature: Option<ObjectId>) {
	let scene = ctx.scene;
	let obj = &scene.objects[obj_id.0];
	let mesh = &scene.meshes[mesh_idx];

	let owner_key = armature.map_or(obj.key.as_str(), |arm| scene.objects[arm.0].key.as_str());
	let bones: &[_] = match armature.map(|arm| &scene.objects[arm.0].kind) {
		Some(ObjectKind::Armature(ArmatureData { bones })) => bones,
		_ => &[],
	};

	let uid = ctx.uids.uid(&crate::fbx::geometry::bindpose_key(owner_key, mesh));
	let pose = root.data_i64(&b"Pose"[..], uid);
	pose.add_string(name_class(&mesh.name, b"Pose"));
	pose.add_string(&b"BindPose"[..]);
	pose.data_str(&b"Type"[..], &b"BindPose"[..]);
	pose.data_i32(&b"Version"[..], POSE_BIND_VERSION);
	let nbr = 1 + usize::from(armature.is_some_and(|arm| arm != obj_id)) + bones.len();
	pose.data_i32(&b"NbPoseNodes"[..], nbr as i32);

	let mut pose_node = |pose: &mut Element, uid: i64, matrix: &Mat4| {
		let node = pose.child(&b"PoseNode"[..]);
		node.data_i64(&b"Node"[..], uid);
		node.data_f64_array(&b"Matrix"[..], matrix.to_vec());
	};

	let obj_uid = ctx.uids.uid(&obj.key);
	pose_node(pose, obj_uid, &obj.world_matrix);
	if let Some(arm_id) = armature
		&& arm_id != obj_id
	{
		let arm = &scene.objects[arm_id.0];
		let arm_uid = ctx.uids.uid(&arm.key);
		pose_node(pose, arm_uid, &arm.world_matrix);
	}
	for bone in bones {
		let bone_uid = ctx.uids.uid(&bone.key);
		pose_node(pose, bone_uid, &bone.rest_matrix_world);
	}
}

/// Write one armature's skeleton data: limb attributes for every bone, then
/// a bind pose, skin deformer and per-bone clusters for each deformed mesh.
pub fn armature_elements(root: &mut Element, ctx: &mut AssemblerContext, arm_id: ObjectId) {
	let scene = ctx.scene;
	let arm_obj = &scene.objects[arm_id.0];
	let ObjectKind::Armature(arm) = &arm_obj.kind else {
		return;
	};

	for bone in &arm.bones {
		let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::Bone);
		let mut p70 = Element::new(&b"Properties70"[..]);
		tmpl.set(
			&mut p70,
			PropKind::Double,
			"Size",
			PropValue::F64(bone.head_radius * BONE_RADIUS_SCALE),
		);
		tmpl.finalize(&mut p70);

		let uid = ctx.uids.uid(&attribute_key(&bone.key));
		let attr = root.data_i64(&b"NodeAttribute"[..], uid);
		attr.add_string(name_class(&bone.name, b"NodeAttribute"));
		attr.add_string(&b"LimbNode"[..]);
		attr.data_str(&b"TypeFlags"[..], &b"Skeleton"[..]);
		attr.push_child(p70);
	}

	let bindings: Vec<_> = ctx.skins.iter().filter(|b| b.armature == arm_id).cloned().collect();
	for binding in bindings {
		bindpose_element(root, ctx, binding.object, binding.mesh, Some(arm_id));

		let mesh = &scene.meshes[binding.mesh];
		let skin_uid = ctx.uids.uid(&skin_key(&arm_obj.key, mesh));
		let skin = root.data_i64(&b"Deformer"[..], skin_uid);
		skin.add_string(name_class(&arm_obj.name, b"Deformer"));
		skin.add_string(&b"Skin"[..]);
		skin.data_i32(&b"Version"[..], DEFORMER_SKIN_VERSION);
		skin.data_f64(&b"Link_DeformAcuracy"[..], 50.0);

		let obj_world = scene.objects[binding.object.0].world_matrix;
		for bone in &arm.bones {
			// A cluster goes out even for bones without any weight; consumers
			// read rest pose matrices from it.
			let (indexes, weights) = bone_weights(mesh, &bone.name);

			let uid = ctx.uids.uid(&cluster_key(&arm_obj.key, mesh, &bone.key));
			let cluster = root.data_i64(&b"Deformer"[..], uid);
			cluster.add_string(name_class(&bone.name, b"SubDeformer"));
			cluster.add_string(&b"Cluster"[..]);
			cluster.data_i32(&b"Version"[..], DEFORMER_CLUSTER_VERSION);
			let userdata = cluster.data_str(&b"UserData"[..], &b""[..]);
			userdata.add_string(&b""[..]);
			if !indexes.is_empty() {
				cluster.data_i32_array(&b"Indexes"[..], indexes);
				cluster.data_f64_array(&b"Weights"[..], weights);
			}

			let bone_world = bone.rest_matrix_world;
			let transform = match mat4_invert_affine(&bone_world) {
				Some(inv) => mat4_mul(&inv, &obj_world),
				None => {
					ctx.warnings
						.push(format!("bone {} has a singular rest matrix, using identity bind transform", bone.name));
					MAT4_IDENTITY
				}
			};
			cluster.data_f64_array(&b"Transform"[..], transform.to_vec());
			cluster.data_f64_array(&b"TransformLink"[..], bone_world.to_vec());
			cluster.data_f64_array(&b"TransformAssociateModel"[..], arm_obj.world_matrix.to_vec());
		}
	}
}

/// Skin weights of one bone, matched to the vertex group sharing its name.
fn bone_weights(mesh: &MeshData, bone_name: &str) -> (Vec<i32>, Vec<f64>) {
	let Some(group) = mesh.vertex_groups.iter().find(|vg| vg.name == bone_name) else {
		return (Vec::new(), Vec::new());
	};
	let mut pairs: Vec<_> = group.weights.iter().filter(|(_, w)| *w != 0.0).collect();
	pairs.sort_by_key(|(v, _)| *v);
	let indexes = pairs.iter().map(|(v, _)| *v as i32).collect();
	let weights = pairs.iter().map(|(_, w)| *w).collect();
	(indexes, weights)
}

/// Write the synthetic leaf bones: one limb attribute and one model each.
pub fn leaf_bone_elements(root: &mut Element, ctx: &mut AssemblerContext) {
	let leaves = ctx.leaf_bones.clone();
	for leaf in &leaves {
		let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::Bone);
		let mut p70 = Element::new(&b"Properties70"[..]);
		tmpl.set(&mut p70, PropKind::Double, "Size", PropValue::F64(leaf.size));
		tmpl.finalize(&mut p70);

		let attr_uid = ctx.uids.uid(&leaf.attr_key);
		let attr = root.data_i64(&b"NodeAttribute"[..], attr_uid);
		attr.add_string(name_class(&leaf.name, b"NodeAttribute"));
		attr.add_string(&b"LimbNode"[..]);
		attr.data_str(&b"TypeFlags"[..], &b"Skeleton"[..]);
		attr.push_child(p70);

		let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::Model);
		let mut p70 = Element::new(&b"Properties70"[..]);
		let loc = [leaf.matrix[12], leaf.matrix[13], leaf.matrix[14]];
		tmpl.set(&mut p70, PropKind::LclTranslation, "Lcl Translation", PropValue::Vec3(loc));
		tmpl.set(&mut p70, PropKind::LclRotation, "Lcl Rotation", PropValue::Vec3([0.0; 3]));
		tmpl.set(&mut p70, PropKind::LclScaling, "Lcl Scaling", PropValue::Vec3([1.0; 3]));
		tmpl.set(&mut p70, PropKind::Visibility, "Visibility", PropValue::F64(1.0));
		tmpl.set(&mut p70, PropKind::Integer, "DefaultAttributeIndex", PropValue::I32(0));
		tmpl.set(&mut p70, PropKind::Enum, "InheritType", PropValue::I32(1));
		tmpl.finalize(&mut p70);

		let node_uid = ctx.uids.uid(&leaf.node_key);
		let model = root.data_i64(&b"Model"[..], node_uid);
		model.add_string(name_class(&leaf.name, b"Model"));
		model.add_string(&b"LimbNode"[..]);
		model.data_i32(&b"Version"[..], MODELS_VERSION);
		model.push_child(p70);
		model_extras(model);
	}
}
