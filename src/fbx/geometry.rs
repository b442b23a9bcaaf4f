use std::collections::{HashMap, HashSet};

use crate::fbx::element::{Element, name_class};
use crate::fbx::export::{AssemblerContext, SmoothType};
use crate::fbx::props::{PropKind, PropValue::F64};
use crate::fbx::scene::{MeshData, MeshInstance, ObjectId, ObjectKind, SceneObject};
use crate::fbx::skin::bindpose_element;
use crate::fbx::templates::{TemplateId, TemplateProps};

/// `GeometryVersion` of mesh blocks.
pub const GEOMETRY_VERSION: i32 = 124;
/// `Version` of shape geometry blocks.
pub const GEOMETRY_SHAPE_VERSION: i32 = 100;

const NORMAL_LAYER_VERSION: i32 = 101;
const BINORMAL_LAYER_VERSION: i32 = 101;
const TANGENT_LAYER_VERSION: i32 = 101;
const VCOLOR_LAYER_VERSION: i32 = 101;
const UV_LAYER_VERSION: i32 = 101;
const MATERIAL_LAYER_VERSION: i32 = 101;
const SMOOTHING_LAYER_VERSION: i32 = 102;
const LAYER_VERSION: i32 = 100;

const DEFORMER_SHAPE_VERSION: i32 = 100;
const DEFORMER_SHAPECHANNEL_VERSION: i32 = 100;

/// Per-component threshold below which a shape vertex counts as unmoved.
const SHAPE_SIMILARITY_EPSILON: f64 = 1e-6;

/// Identity key of the `Geometry` element one instance emits. An evaluated
/// per-instance copy gets a key prefixed with its object, so it never shares
/// a data block with other users of the same mesh.
pub fn geometry_key(obj: &SceneObject, inst: &MeshInstance, mesh: &MeshData) -> String {
	if inst.modified {
		format!("{}|{}", obj.key, mesh.key)
	} else {
		mesh.key.clone()
	}
}

/// Key of the blend shape deformer owned by a mesh.
pub fn shapes_key(mesh: &MeshData) -> String {
	format!("{}|shapes", mesh.key)
}

/// Key of one blend shape channel.
pub fn shape_channel_key(mesh: &MeshData, shape: &str) -> String {
	format!("{}|{shape}|channel", mesh.key)
}

/// Key of one shape's geometry block.
pub fn shape_geometry_key(mesh: &MeshData, shape: &str) -> String {
	format!("{}|{shape}|shape", mesh.key)
}

/// Key of the bind pose attached to a mesh and its deforming object.
pub fn bindpose_key(owner_key: &str, mesh: &MeshData) -> String {
	format!("{owner_key}|{}|bindpose", mesh.key)
}

/// One shape key reduced to the vertices that actually moved.
#[derive(Debug, Clone)]
pub struct ShapeChannel {
	/// Shape name.
	pub name: String,
	/// Current influence in 0..1.
	pub value: f64,
	/// Indices of moved vertices.
	pub indexes: Vec<i32>,
	/// Per-moved-vertex position deltas against the base mesh.
	pub deltas: Vec<[f64; 3]>,
	/// Per-moved-vertex weights, in percent.
	pub weights: Vec<f64>,
}

/// Reduce a mesh's shape keys to delta channels.
///
/// A shape whose every vertex stays within the similarity threshold still
/// yields a channel with empty arrays; some consumers choke on a channel
/// missing its geometry, so it is emitted rather than skipped.
pub fn shape_channels(mesh: &MeshData) -> Vec<ShapeChannel> {
	let mut channels = Vec::with_capacity(mesh.shape_keys.len());
	for shape in &mesh.shape_keys {
		let mut indexes = Vec::new();
		let mut deltas = Vec::new();
		for (idx, (pos, base)) in shape.positions.iter().zip(&mesh.vertices).enumerate() {
			let delta = [pos[0] - base[0], pos[1] - base[1], pos[2] - base[2]];
			if delta.iter().all(|d| d.abs() <= SHAPE_SIMILARITY_EPSILON) {
				continue;
			}
			indexes.push(idx as i32);
			deltas.push(delta);
		}

		let group = shape
			.vertex_group
			.as_deref()
			.and_then(|name| mesh.vertex_groups.iter().find(|vg| vg.name == name));
		let weights = match group {
			Some(vg) => indexes
				.iter()
				.map(|&idx| {
					vg.weights
						.iter()
						.find(|(v, _)| *v == idx as u32)
						.map_or(0.0, |(_, w)| w * 100.0)
				})
				.collect(),
			None => vec![100.0; indexes.len()],
		};

		channels.push(ShapeChannel {
			name: shape.name.clone(),
			value: shape.value,
			indexes,
			deltas,
			weights,
		});
	}
	channels
}

/// Write the `Geometry` block of a mesh, plus its shape geometry, bind pose
/// and blend shape deformers when it carries shape keys.
///
/// Instances sharing one unmodified mesh data block emit the block once; the
/// dedup set lives in the context.
pub fn mesh_elements(root: &mut Element, ctx: &mut AssemblerContext, obj_id: ObjectId) {
	let obj = &ctx.scene.objects[obj_id.0];
	let ObjectKind::Mesh(inst) = &obj.kind else {
		return;
	};
	let mesh = &ctx.scene.meshes[inst.mesh.0];
	let geom_key = geometry_key(obj, inst, mesh);
	if !ctx.done_meshes.insert(geom_key.clone()) {
		return;
	}

	// Evaluated copies carry no shape keys; those stay on the base data block.
	let channels = if inst.modified { Vec::new() } else { shape_channels(mesh) };

	// Properties are collected up front so the container can sit at its
	// conventional spot before the data arrays.
	let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::Geometry);
	let mut p70 = Element::new(&b"Properties70"[..]);
	for channel in &channels {
		tmpl.set(&mut p70, PropKind::Number, &channel.name, F64(channel.value * 100.0));
	}
	tmpl.finalize(&mut p70);

	let uid = ctx.uids.uid(&geom_key);
	let geom = root.data_i64(&b"Geometry"[..], uid);
	geom.add_string(name_class(&mesh.name, b"Geometry"));
	geom.add_string(&b"Mesh"[..]);
	geom.push_child(p70);
	geom.data_i32(&b"GeometryVersion"[..], GEOMETRY_VERSION);

	// Vertices.
	let mut verts = Vec::with_capacity(mesh.vertices.len() * 3);
	for v in &mesh.vertices {
		verts.extend_from_slice(v);
	}
	geom.data_f64_array(&b"Vertices"[..], verts);

	// Polygon loops, with each loop's last index bit-inverted, and edges as
	// indices into the loop array (one index per edge, pointing at the loop
	// where the edge first occurs).
	let mut pvi: Vec<i32> = Vec::new();
	let mut eli: Vec<i32> = Vec::new();
	let mut edges_map: HashMap<(u32, u32), usize> = HashMap::new();
	let mut todo_edges: HashSet<(u32, u32)> = mesh.edges.iter().map(|e| edge_key(e.vertices.0, e.vertices.1)).collect();
	let mut li = 0_i32;
	for poly in &mesh.polygons {
		let start = pvi.len();
		for (k, &vi) in poly.iter().enumerate() {
			let vi_next = poly[(k + 1) % poly.len()];
			let key = edge_key(vi, vi_next);
			if todo_edges.remove(&key) {
				eli.push(li);
				edges_map.insert(key, edges_map.len());
			}
			pvi.push(vi as i32);
			li += 1;
		}
		if pvi.len() > start {
			let last = pvi.len() - 1;
			pvi[last] = !pvi[last];
		}
	}
	let edges_nbr = edges_map.len();
	geom.data_i32_array(&b"PolygonVertexIndex"[..], pvi);
	geom.data_i32_array(&b"Edges"[..], eli);

	// Smoothing layer.
	let smoothing: Option<(&[u8], Vec<i32>)> = match ctx.settings.smooth_type {
		SmoothType::Off => None,
		SmoothType::Face => {
			let flags = (0..mesh.polygons.len())
				.map(|p| i32::from(mesh.polygon_smooth.get(p).copied().unwrap_or(false)))
				.collect();
			Some((&b"ByPolygon"[..], flags))
		}
		SmoothType::Edge => Some((&b"ByEdge"[..], edge_smoothing(mesh, &edges_map, edges_nbr))),
	};
	if let Some((mapping, flags)) = smoothing {
		let lay = geom.data_i32(&b"LayerElementSmoothing"[..], 0);
		lay.data_i32(&b"Version"[..], SMOOTHING_LAYER_VERSION);
		lay.data_str(&b"Name"[..], &b""[..]);
		lay.data_str(&b"MappingInformationType"[..], mapping);
		lay.data_str(&b"ReferenceInformationType"[..], &b"Direct"[..]);
		lay.data_i32_array(&b"Smoothing"[..], flags);
	}

	// Split normals, one triple per loop.
	let write_normals = !mesh.normals.is_empty();
	if write_normals {
		let mut flat = Vec::with_capacity(mesh.normals.len() * 3);
		for n in &mesh.normals {
			flat.extend_from_slice(n);
		}
		let lay = geom.data_i32(&b"LayerElementNormal"[..], 0);
		lay.data_i32(&b"Version"[..], NORMAL_LAYER_VERSION);
		lay.data_str(&b"Name"[..], &b""[..]);
		lay.data_str(&b"MappingInformationType"[..], &b"ByPolygonVertex"[..]);
		lay.data_str(&b"ReferenceInformationType"[..], &b"Direct"[..]);
		lay.data_f64_array(&b"Normals"[..], flat);
	}

	// Tangent space, per UV layer that carries it.
	let tspacenumber = mesh.uv_layers.iter().filter(|uv| !uv.tangents.is_empty()).count();
	for (idx, uv) in mesh.uv_layers.iter().enumerate() {
		if uv.tangents.is_empty() {
			continue;
		}
		let mut binormals = Vec::with_capacity(uv.binormals.len() * 3);
		for n in &uv.binormals {
			binormals.extend_from_slice(n);
		}
		let lay = geom.data_i32(&b"LayerElementBinormal"[..], idx as i32);
		lay.data_i32(&b"Version"[..], BINORMAL_LAYER_VERSION);
		lay.data_str(&b"Name"[..], uv.name.as_bytes().to_vec());
		lay.data_str(&b"MappingInformationType"[..], &b"ByPolygonVertex"[..]);
		lay.data_str(&b"ReferenceInformationType"[..], &b"Direct"[..]);
		lay.data_f64_array(&b"Binormals"[..], binormals);

		let mut tangents = Vec::with_capacity(uv.tangents.len() * 3);
		for n in &uv.tangents {
			tangents.extend_from_slice(n);
		}
		let lay = geom.data_i32(&b"LayerElementTangent"[..], idx as i32);
		lay.data_i32(&b"Version"[..], TANGENT_LAYER_VERSION);
		lay.data_str(&b"Name"[..], uv.name.as_bytes().to_vec());
		lay.data_str(&b"MappingInformationType"[..], &b"ByPolygonVertex"[..]);
		lay.data_str(&b"ReferenceInformationType"[..], &b"Direct"[..]);
		lay.data_f64_array(&b"Tangents"[..], tangents);
	}

	// Vertex colors, deduplicated through an index array; alpha is faked.
	for (idx, layer) in mesh.color_layers.iter().enumerate() {
		let mut table: Vec<[f64; 4]> = Vec::new();
		let mut lookup: HashMap<[u64; 4], i32> = HashMap::new();
		let mut indices = Vec::with_capacity(layer.data.len());
		for col in &layer.data {
			let rgba = [col[0], col[1], col[2], 1.0];
			let bits = [rgba[0].to_bits(), rgba[1].to_bits(), rgba[2].to_bits(), rgba[3].to_bits()];
			let next = table.len() as i32;
			let entry = *lookup.entry(bits).or_insert_with(|| {
				table.push(rgba);
				next
			});
			indices.push(entry);
		}
		let mut flat = Vec::with_capacity(table.len() * 4);
		for col in &table {
			flat.extend_from_slice(col);
		}
		let lay = geom.data_i32(&b"LayerElementColor"[..], idx as i32);
		lay.data_i32(&b"Version"[..], VCOLOR_LAYER_VERSION);
		lay.data_str(&b"Name"[..], layer.name.as_bytes().to_vec());
		lay.data_str(&b"MappingInformationType"[..], &b"ByPolygonVertex"[..]);
		lay.data_str(&b"ReferenceInformationType"[..], &b"IndexToDirect"[..]);
		lay.data_f64_array(&b"Colors"[..], flat);
		lay.data_i32_array(&b"ColorIndex"[..], indices);
	}

	// UV layers, same dedup scheme.
	for (idx, layer) in mesh.uv_layers.iter().enumerate() {
		let mut table: Vec<[f64; 2]> = Vec::new();
		let mut lookup: HashMap<[u64; 2], i32> = HashMap::new();
		let mut indices = Vec::with_capacity(layer.data.len());
		for uv in &layer.data {
			let bits = [uv[0].to_bits(), uv[1].to_bits()];
			let next = table.len() as i32;
			let entry = *lookup.entry(bits).or_insert_with(|| {
				table.push(*uv);
				next
			});
			indices.push(entry);
		}
		let mut flat = Vec::with_capacity(table.len() * 2);
		for uv in &table {
			flat.extend_from_slice(uv);
		}
		let lay = geom.data_i32(&b"LayerElementUV"[..], idx as i32);
		lay.data_i32(&b"Version"[..], UV_LAYER_VERSION);
		lay.data_str(&b"Name"[..], layer.name.as_bytes().to_vec());
		lay.data_str(&b"MappingInformationType"[..], &b"ByPolygonVertex"[..]);
		lay.data_str(&b"ReferenceInformationType"[..], &b"IndexToDirect"[..]);
		lay.data_f64_array(&b"UV"[..], flat);
		lay.data_i32_array(&b"UVIndex"[..], indices);
	}

	// Material layer, present only when materials are connected to users of
	// this mesh.
	let mesh_mats = ctx.mesh_materials.get(&mesh.key);
	if let Some(mats) = mesh_mats {
		let lay = geom.data_i32(&b"LayerElementMaterial"[..], 0);
		lay.data_i32(&b"Version"[..], MATERIAL_LAYER_VERSION);
		lay.data_str(&b"Name"[..], &b""[..]);
		if mats.order.len() > 1 {
			let default = mats.slot_to_index.first().copied().unwrap_or(0);
			let per_poly: Vec<i32> = (0..mesh.polygons.len())
				.map(|p| {
					let slot = mesh.polygon_materials.get(p).copied().unwrap_or(0) as usize;
					mats.slot_to_index.get(slot).copied().unwrap_or(default)
				})
				.collect();
			lay.data_str(&b"MappingInformationType"[..], &b"ByPolygon"[..]);
			lay.data_str(&b"ReferenceInformationType"[..], &b"IndexToDirect"[..]);
			lay.data_i32_array(&b"Materials"[..], per_poly);
		} else {
			lay.data_str(&b"MappingInformationType"[..], &b"AllSame"[..]);
			lay.data_str(&b"ReferenceInformationType"[..], &b"IndexToDirect"[..]);
			lay.data_i32_array(&b"Materials"[..], vec![0]);
		}
	}

	// Layer table of contents.
	let vcolnumber = mesh.color_layers.len();
	let uvnumber = mesh.uv_layers.len();
	let layer = geom.data_i32(&b"Layer"[..], 0);
	layer.data_i32(&b"Version"[..], LAYER_VERSION);
	if write_normals {
		layer_entry(layer, b"LayerElementNormal", 0);
	}
	if tspacenumber > 0 {
		layer_entry(layer, b"LayerElementBinormal", 0);
		layer_entry(layer, b"LayerElementTangent", 0);
	}
	if ctx.settings.smooth_type != SmoothType::Off {
		layer_entry(layer, b"LayerElementSmoothing", 0);
	}
	if vcolnumber > 0 {
		layer_entry(layer, b"LayerElementColor", 0);
	}
	if uvnumber > 0 {
		layer_entry(layer, b"LayerElementUV", 0);
	}
	if mesh_mats.is_some() {
		layer_entry(layer, b"LayerElementMaterial", 0);
	}

	// Secondary layers for additional color/UV/tangent-space indices.
	let extra = vcolnumber.max(uvnumber).max(tspacenumber);
	for idx in 1..extra {
		let layer = geom.data_i32(&b"Layer"[..], idx as i32);
		layer.data_i32(&b"Version"[..], LAYER_VERSION);
		if idx < vcolnumber {
			layer_entry(layer, b"LayerElementColor", idx as i32);
		}
		if idx < uvnumber {
			layer_entry(layer, b"LayerElementUV", idx as i32);
		}
		if idx < tspacenumber {
			layer_entry(layer, b"LayerElementBinormal", idx as i32);
			layer_entry(layer, b"LayerElementTangent", idx as i32);
		}
	}

	if !channels.is_empty() {
		shape_elements(root, ctx, obj_id, inst.mesh.0, &channels);
	}
}

fn layer_entry(layer: &mut Element, kind: &[u8], typed_index: i32) {
	let entry = layer.child(&b"LayerElement"[..]);
	entry.data_str(&b"Type"[..], kind);
	entry.data_i32(&b"TypedIndex"[..], typed_index);
}

fn edge_key(a: u32, b: u32) -> (u32, u32) {
	if a < b { (a, b) } else { (b, a) }
}

/// Per-edge smoothing flags: an edge is sharp when marked sharp, used by a
/// flat polygon, or shared by more than two smooth polygons.
fn edge_smoothing(mesh: &MeshData, edges_map: &HashMap<(u32, u32), usize>, edges_nbr: usize) -> Vec<i32> {
	let mut sharp_edges: HashSet<(u32, u32)> = HashSet::new();
	let mut seen: HashMap<(u32, u32), u32> = HashMap::new();
	for (p, poly) in mesh.polygons.iter().enumerate() {
		let smooth = mesh.polygon_smooth.get(p).copied().unwrap_or(false);
		for k in 0..poly.len() {
			let key = edge_key(poly[k], poly[(k + 1) % poly.len()]);
			if !smooth {
				sharp_edges.insert(key);
			} else {
				let count = seen.entry(key).or_insert(0);
				if *count > 1 {
					sharp_edges.insert(key);
				} else {
					*count += 1;
				}
			}
		}
	}

	let mut flags = vec![0_i32; edges_nbr];
	for edge in &mesh.edges {
		let key = edge_key(edge.vertices.0, edge.vertices.1);
		let Some(&idx) = edges_map.get(&key) else {
			continue;
		};
		flags[idx] = i32::from(!(edge.sharp || sharp_edges.contains(&key)));
	}
	flags
}

/// Write shape geometry, the shared bind pose, and the blend shape deformer
/// chain of one mesh.
fn shape_elements(root: &mut Element, ctx: &mut AssemblerContext, obj_id: ObjectId, mesh_idx: usize, channels: &[ShapeChannel]) {
	let mesh = &ctx.scene.meshes[mesh_idx];

	for channel in channels {
		let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::Geometry);
		let mut p70 = Element::new(&b"Properties70"[..]);
		tmpl.finalize(&mut p70);

		let uid = ctx.uids.uid(&shape_geometry_key(mesh, &channel.name));
		let geom = root.data_i64(&b"Geometry"[..], uid);
		geom.add_string(name_class(&channel.name, b"Geometry"));
		geom.add_string(&b"Shape"[..]);
		geom.push_child(p70);
		geom.data_i32(&b"Version"[..], GEOMETRY_SHAPE_VERSION);
		geom.data_i32_array(&b"Indexes"[..], channel.indexes.clone());
		let mut deltas = Vec::with_capacity(channel.deltas.len() * 3);
		for d in &channel.deltas {
			deltas.extend_from_slice(d);
		}
		let normals = vec![0.0; deltas.len()];
		geom.data_f64_array(&b"Vertices"[..], deltas);
		geom.data_f64_array(&b"Normals"[..], normals);
	}

	bindpose_element(root, ctx, obj_id, mesh_idx, None);

	let mesh = &ctx.scene.meshes[mesh_idx];
	let shapes_uid = ctx.uids.uid(&shapes_key(mesh));
	let deformer = root.data_i64(&b"Deformer"[..], shapes_uid);
	deformer.add_string(name_class(&mesh.name, b"Deformer"));
	deformer.add_string(&b"BlendShape"[..]);
	deformer.data_i32(&b"Version"[..], DEFORMER_SHAPE_VERSION);

	for channel in channels {
		let uid = ctx.uids.uid(&shape_channel_key(mesh, &channel.name));
		let elem = root.data_i64(&b"Deformer"[..], uid);
		elem.add_string(name_class(&channel.name, b"SubDeformer"));
		elem.add_string(&b"BlendShapeChannel"[..]);
		elem.data_i32(&b"Version"[..], DEFORMER_SHAPECHANNEL_VERSION);
		elem.data_f64(&b"DeformPercent"[..], channel.value * 100.0);
		elem.data_f64_array(&b"FullWeights"[..], channel.weights.clone());
	}
}
