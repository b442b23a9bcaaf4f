use std::path::PathBuf;

/// Column-major 4x4 matrix, flattened to sixteen values.
pub type Mat4 = [f64; 16];

/// Identity matrix.
pub const MAT4_IDENTITY: Mat4 = [
	1.0, 0.0, 0.0, 0.0, //
	0.0, 1.0, 0.0, 0.0, //
	0.0, 0.0, 1.0, 0.0, //
	0.0, 0.0, 0.0, 1.0,
];

/// Multiply two column-major matrices, `a * b`.
pub fn mat4_mul(a: &Mat4, b: &Mat4) -> Mat4 {
	let mut out = [0.0; 16];
	for col in 0..4 {
		for row in 0..4 {
			let mut acc = 0.0;
			for k in 0..4 {
				acc += a[k * 4 + row] * b[col * 4 + k];
			}
			out[col * 4 + row] = acc;
		}
	}
	out
}

/// Invert an affine transform matrix (rotation/scale/translation).
///
/// Returns `None` when the linear part is singular.
pub fn mat4_invert_affine(m: &Mat4) -> Option<Mat4> {
	// Upper-left 3x3, column-major.
	let r = [
		m[0], m[1], m[2], //
		m[4], m[5], m[6], //
		m[8], m[9], m[10],
	];

	let cof = [
		r[4] * r[8] - r[5] * r[7],
		r[5] * r[6] - r[3] * r[8],
		r[3] * r[7] - r[4] * r[6],
		r[2] * r[7] - r[1] * r[8],
		r[0] * r[8] - r[2] * r[6],
		r[1] * r[6] - r[0] * r[7],
		r[1] * r[5] - r[2] * r[4],
		r[2] * r[3] - r[0] * r[5],
		r[0] * r[4] - r[1] * r[3],
	];

	let det = r[0] * cof[0] + r[1] * cof[1] + r[2] * cof[2];
	if det.abs() < 1e-12 {
		return None;
	}

	let inv3 = |col: usize, row: usize| cof[row * 3 + col] / det;

	let t = [m[12], m[13], m[14]];
	let mut out = MAT4_IDENTITY;
	for col in 0..3 {
		for row in 0..3 {
			out[col * 4 + row] = inv3(col, row);
		}
	}
	for row in 0..3 {
		out[12 + row] = -(inv3(0, row) * t[0] + inv3(1, row) * t[1] + inv3(2, row) * t[2]);
	}
	Some(out)
}

/// Decomposed local transform: translation, XYZ euler rotation in degrees,
/// and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
	/// Local translation.
	pub translation: [f64; 3],
	/// Local rotation, XYZ euler, degrees.
	pub rotation_euler_deg: [f64; 3],
	/// Local scale.
	pub scale: [f64; 3],
}

impl Default for Transform {
	fn default() -> Self {
		Self {
			translation: [0.0; 3],
			rotation_euler_deg: [0.0; 3],
			scale: [1.0; 3],
		}
	}
}

/// Index of an object within [`Scene::objects`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// Index of a mesh within [`Scene::meshes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

/// Index of a material within [`Scene::materials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// Index of a texture within [`Scene::textures`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// Index of an image within [`Scene::images`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub usize);

/// One immutable scene snapshot handed to the assembler.
///
/// Everything is plain data captured from the provider before export starts;
/// the assembler only reads it.
#[derive(Debug, Clone)]
pub struct Scene {
	/// Scene name, used for document metadata and the default take.
	pub name: String,
	/// All exportable objects, parents before children not required.
	pub objects: Vec<SceneObject>,
	/// Mesh data blocks, shared between object instances.
	pub meshes: Vec<MeshData>,
	/// Material data blocks.
	pub materials: Vec<MaterialData>,
	/// Texture data blocks.
	pub textures: Vec<TextureData>,
	/// Backing images for textures.
	pub images: Vec<ImageData>,
	/// World ambient color.
	pub ambient_color: [f64; 3],
	/// First frame of the scene range.
	pub frame_start: f64,
	/// Last frame of the scene range.
	pub frame_end: f64,
	/// Frames per second.
	pub fps: f64,
	/// Render pixel width.
	pub resolution_x: u32,
	/// Render pixel height.
	pub resolution_y: u32,
	/// Render pixel aspect ratio (x / y).
	pub pixel_aspect: f64,
}

impl Scene {
	/// Create an empty scene with default timing and render settings.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			objects: Vec::new(),
			meshes: Vec::new(),
			materials: Vec::new(),
			textures: Vec::new(),
			images: Vec::new(),
			ambient_color: [0.0; 3],
			frame_start: 1.0,
			frame_end: 250.0,
			fps: 24.0,
			resolution_x: 1920,
			resolution_y: 1080,
			pixel_aspect: 1.0,
		}
	}
}

/// One logical scene entity: a transform node plus kind-specific data.
#[derive(Debug, Clone)]
pub struct SceneObject {
	/// Stable string key, unique across the scene (and across bone keys).
	pub key: String,
	/// Display name.
	pub name: String,
	/// Transform parent, if any.
	pub parent: Option<ObjectId>,
	/// Local transform relative to the parent.
	pub transform: Transform,
	/// World-space matrix at snapshot time.
	pub world_matrix: Mat4,
	/// Visibility flag.
	pub visible: bool,
	/// Kind-specific payload.
	pub kind: ObjectKind,
	/// Bound material slots, in slot order.
	pub materials: Vec<MaterialId>,
	/// Provider-defined custom properties.
	pub custom_props: Vec<(String, CustomValue)>,
}

impl SceneObject {
	/// Create a node with identity transform and no payload.
	pub fn empty(key: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			name: name.into(),
			parent: None,
			transform: Transform::default(),
			world_matrix: MAT4_IDENTITY,
			visible: true,
			kind: ObjectKind::Empty,
			materials: Vec::new(),
			custom_props: Vec::new(),
		}
	}
}

/// Closed set of entity kinds the assembler understands.
#[derive(Debug, Clone)]
pub enum ObjectKind {
	/// Plain transform node, exported as a Null attribute.
	Empty,
	/// Light source.
	Light(LightData),
	/// Camera.
	Camera(CameraData),
	/// Mesh instance.
	Mesh(MeshInstance),
	/// Armature holding a bone hierarchy.
	Armature(ArmatureData),
}

/// A provider-defined custom property value.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomValue {
	/// Boolean flag.
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Floating point value.
	Float(f64),
	/// String value.
	Str(String),
}

/// Mesh usage by one object.
#[derive(Debug, Clone)]
pub struct MeshInstance {
	/// Referenced mesh data.
	pub mesh: MeshId,
	/// Deforming armature object, when skinned.
	pub armature: Option<ObjectId>,
	/// True when the mesh is a per-instance evaluated copy that must not be
	/// shared with other users of the same data block.
	pub modified: bool,
}

/// Bone hierarchy payload of an armature object.
#[derive(Debug, Clone)]
pub struct ArmatureData {
	/// Bones, parents at lower indices than their children.
	pub bones: Vec<BoneData>,
}

/// One bone, treated as a pseudo-object with its own stable key.
#[derive(Debug, Clone)]
pub struct BoneData {
	/// Stable string key, unique across the scene.
	pub key: String,
	/// Bone name, also the name of the matching vertex group.
	pub name: String,
	/// Parent bone index within the armature, `None` for root bones.
	pub parent: Option<usize>,
	/// Rest transform relative to the parent bone (or the armature).
	pub transform: Transform,
	/// World-space rest matrix at bind time.
	pub rest_matrix_world: Mat4,
	/// Bone length along its axis.
	pub length: f64,
	/// Head radius, used to size synthetic leaf bones.
	pub head_radius: f64,
}

/// Light payload.
#[derive(Debug, Clone)]
pub struct LightData {
	/// Light kind.
	pub kind: LightKind,
	/// Light color.
	pub color: [f64; 3],
	/// Energy; exported intensity is `energy * 100`.
	pub energy: f64,
	/// Falloff reference distance.
	pub distance: f64,
	/// Distance falloff model, ignored for kinds without falloff.
	pub falloff: Falloff,
	/// Full spot cone angle, radians; only meaningful for spots.
	pub spot_size: f64,
	/// Spot softness fraction in 0..1, shrinks the inner cone.
	pub spot_blend: f64,
	/// Whether the light casts shadows.
	pub cast_shadow: bool,
	/// Shadow color.
	pub shadow_color: [f64; 3],
}

/// Supported light kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
	/// Omnidirectional point light.
	Point,
	/// Directional sun light.
	Sun,
	/// Spot cone light.
	Spot,
	/// Hemispheric light, exported as directional.
	Hemi,
	/// Area light.
	Area,
}

/// Distance falloff models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Falloff {
	/// No decay with distance.
	Constant,
	/// Linear decay.
	InverseLinear,
	/// Quadratic decay.
	InverseSquare,
}

/// Camera payload.
#[derive(Debug, Clone)]
pub struct CameraData {
	/// Focal length in millimeters.
	pub lens_mm: f64,
	/// Sensor width in millimeters.
	pub sensor_width_mm: f64,
	/// Sensor height in millimeters.
	pub sensor_height_mm: f64,
	/// Horizontal lens shift as a fraction of sensor width.
	pub shift_x: f64,
	/// Vertical lens shift as a fraction of sensor height.
	pub shift_y: f64,
	/// Near clip plane.
	pub clip_start: f64,
	/// Far clip plane.
	pub clip_end: f64,
	/// Horizontal field of view, degrees.
	pub angle_x_deg: f64,
	/// Vertical field of view, degrees.
	pub angle_y_deg: f64,
	/// Orthographic projection flag.
	pub ortho: bool,
	/// Orthographic view scale.
	pub ortho_scale: f64,
}

/// One mesh data block.
#[derive(Debug, Clone)]
pub struct MeshData {
	/// Stable string key for deduplication; evaluated per-instance copies
	/// must carry a unique key.
	pub key: String,
	/// Display name.
	pub name: String,
	/// Vertex coordinates.
	pub vertices: Vec<[f64; 3]>,
	/// Polygons as vertex index loops, each with at least three entries.
	pub polygons: Vec<Vec<u32>>,
	/// Edges; loops reference vertices, not these records.
	pub edges: Vec<EdgeData>,
	/// Per-polygon smooth flags; empty means flat shading everywhere.
	pub polygon_smooth: Vec<bool>,
	/// Per-loop normals in polygon order; empty omits the normal layer.
	pub normals: Vec<[f64; 3]>,
	/// UV layers.
	pub uv_layers: Vec<UvLayer>,
	/// Vertex color layers.
	pub color_layers: Vec<ColorLayer>,
	/// Per-polygon material slot indices; empty means slot 0 everywhere.
	pub polygon_materials: Vec<u32>,
	/// Named vertex groups carrying skin weights.
	pub vertex_groups: Vec<VertexGroup>,
	/// Shape keys (morph targets) with absolute vertex positions.
	pub shape_keys: Vec<ShapeKeyData>,
}

impl MeshData {
	/// Create a mesh with only vertices and polygons set.
	pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			name: name.into(),
			vertices: Vec::new(),
			polygons: Vec::new(),
			edges: Vec::new(),
			polygon_smooth: Vec::new(),
			normals: Vec::new(),
			uv_layers: Vec::new(),
			color_layers: Vec::new(),
			polygon_materials: Vec::new(),
			vertex_groups: Vec::new(),
			shape_keys: Vec::new(),
		}
	}
}

/// One mesh edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeData {
	/// Endpoint vertex indices.
	pub vertices: (u32, u32),
	/// Sharp flag, used by edge smoothing.
	pub sharp: bool,
}

/// One UV layer with optional tangent space data.
#[derive(Debug, Clone)]
pub struct UvLayer {
	/// Layer name.
	pub name: String,
	/// Per-loop UV coordinates.
	pub data: Vec<[f64; 2]>,
	/// Per-loop tangents; empty omits the layer.
	pub tangents: Vec<[f64; 3]>,
	/// Per-loop binormals; empty omits the layer.
	pub binormals: Vec<[f64; 3]>,
}

/// One vertex color layer.
#[derive(Debug, Clone)]
pub struct ColorLayer {
	/// Layer name.
	pub name: String,
	/// Per-loop RGB colors; alpha is emitted as 1.
	pub data: Vec<[f64; 3]>,
}

/// Named vertex weights, matched to bones by name.
#[derive(Debug, Clone)]
pub struct VertexGroup {
	/// Group name.
	pub name: String,
	/// `(vertex index, weight)` pairs.
	pub weights: Vec<(u32, f64)>,
}

/// One shape key.
#[derive(Debug, Clone)]
pub struct ShapeKeyData {
	/// Shape name.
	pub name: String,
	/// Current influence in 0..1.
	pub value: f64,
	/// Absolute vertex positions, same length as the base mesh.
	pub positions: Vec<[f64; 3]>,
	/// Vertex group name blending the shape, if any.
	pub vertex_group: Option<String>,
}

/// One material data block.
#[derive(Debug, Clone)]
pub struct MaterialData {
	/// Stable string key.
	pub key: String,
	/// Display name.
	pub name: String,
	/// Surface parameters; `None` exports an empty placeholder material.
	pub surface: Option<SurfaceParams>,
}

/// Classic surface shading parameters.
#[derive(Debug, Clone)]
pub struct SurfaceParams {
	/// Specular model, selects the Phong or Lambert bucket.
	pub specular_model: SpecularModel,
	/// Base diffuse color.
	pub diffuse_color: [f64; 3],
	/// Diffuse intensity factor.
	pub diffuse_intensity: f64,
	/// Specular color.
	pub specular_color: [f64; 3],
	/// Specular intensity factor.
	pub specular_intensity: f64,
	/// Specular hardness (shininess exponent source).
	pub hardness: f64,
	/// Opacity in 0..1.
	pub alpha: f64,
	/// Whether alpha below 1 is treated as transparency.
	pub use_transparency: bool,
	/// Emission factor.
	pub emit: f64,
	/// Ambient factor.
	pub ambient: f64,
	/// Mirror reflection color.
	pub mirror_color: [f64; 3],
	/// Mirror reflectivity in 0..1.
	pub reflect_factor: f64,
	/// Whether raytraced reflection is enabled.
	pub use_mirror: bool,
}

/// Specular shading models; the first three map to the Phong bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecularModel {
	/// Cook-Torrance.
	CookTorr,
	/// Phong.
	Phong,
	/// Blinn.
	Blinn,
	/// Toon shading, Lambert bucket.
	Toon,
	/// Ward isotropic, Lambert bucket.
	WardIso,
}

/// Texture projection modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureMapping {
	/// UV coordinates from a named layer.
	Uv,
	/// Planar projection.
	Flat,
	/// Cubic projection.
	Cube,
	/// Tube projection.
	Tube,
	/// Spherical projection.
	Sphere,
}

/// One texture data block.
#[derive(Debug, Clone)]
pub struct TextureData {
	/// Stable string key.
	pub key: String,
	/// Display name.
	pub name: String,
	/// Backing image.
	pub image: ImageId,
	/// Projection mode.
	pub mapping: TextureMapping,
	/// UV layer name; empty selects the default layer.
	pub uv_layer: String,
	/// UV translation.
	pub translation: [f64; 3],
	/// UV scale.
	pub scale: [f64; 3],
	/// Clamp instead of repeat at UV borders.
	pub clamp: bool,
	/// Use the image alpha channel.
	pub use_alpha: bool,
	/// Material properties this texture drives.
	pub slots: Vec<TextureSlot>,
}

/// Binding of a texture to one material.
#[derive(Debug, Clone)]
pub struct TextureSlot {
	/// Target material.
	pub material: MaterialId,
	/// Influenced channels.
	pub influences: Vec<MapChannel>,
}

/// Material channels a texture can influence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapChannel {
	/// Diffuse factor.
	Diffuse,
	/// Diffuse color.
	Color,
	/// Transparency factor.
	Alpha,
	/// Emissive factor.
	Emit,
	/// Ambient factor.
	Ambient,
	/// Normal map.
	Normal,
	/// Specular factor.
	Specular,
	/// Specular color.
	SpecularColor,
	/// Shininess exponent.
	Hardness,
	/// Reflection color.
	Mirror,
	/// Reflection factor.
	RayMirror,
}

/// One backing image.
#[derive(Debug, Clone)]
pub struct ImageData {
	/// Stable string key.
	pub key: String,
	/// Display name.
	pub name: String,
	/// Source path; used for embedding and for filename metadata.
	pub path: PathBuf,
	/// In-memory payload for packed images, preferred over the path.
	pub packed: Option<Vec<u8>>,
}

/// Frame-scrubbing interface used while baking animation.
///
/// The export loop calls [`FrameSampler::scrub`] for every sampled frame in
/// ascending order, then reads values back through the accessors. Bones are
/// addressed by their own stable keys, like objects.
pub trait FrameSampler {
	/// Evaluate the scene at the given frame.
	fn scrub(&mut self, frame: f64);

	/// Local transform of the object or bone with this key at the current
	/// frame, or `None` when the entity is not animated.
	fn transform(&self, key: &str) -> Option<Transform>;

	/// Current value of a shape key on the given mesh, or `None` when the
	/// shape is not animated.
	fn shape_value(&self, mesh_key: &str, shape: &str) -> Option<f64>;
}
