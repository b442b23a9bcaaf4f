mod anim;
mod bytes;
mod connect;
mod element;
mod error;
mod export;
mod geometry;
mod json;
mod objects;
mod property;
mod props;
mod read;
mod scene;
mod skin;
mod templates;
mod uid;
mod write;

/// Animation baking and curve emission types.
pub use anim::{AnimStack, CurveChannel, CurveNode, bake_animations, frame_to_ktime};
/// Object and property link records.
pub use connect::{Connection, ConnectionKind};
/// Document tree node and id-string helpers.
pub use element::{Element, NAME_CLASS_SEP, name_class};
/// Error and result aliases.
pub use error::{FbxError, Result};
/// Scene assembler entry points, settings and shared state.
pub use export::{
	AssemblerContext, ExportOutcome, ExportSettings, FBX_VERSION, MeshMaterials, SmoothType, Timestamp, assemble,
	export_to_path,
};
/// JSON projection of parsed documents.
pub use json::{document_to_json, element_to_json};
/// Typed property values and encoding options.
pub use property::{EncodeOptions, Property};
/// Properties70 record kinds and writers.
pub use props::{PropKind, PropValue, prop_element, props70};
/// Binary parsing entry points and document container.
pub use read::{Document, MAGIC, parse_bytes, parse_file, parse_version};
/// Scene input model handed to the assembler.
pub use scene::{
	ArmatureData, BoneData, CameraData, ColorLayer, CustomValue, EdgeData, Falloff, FrameSampler, ImageData, ImageId,
	LightData, LightKind, MapChannel, Mat4, MaterialData, MaterialId, MeshData, MeshId, MeshInstance, ObjectId,
	ObjectKind, Scene, SceneObject, ShapeKeyData, SpecularModel, SurfaceParams, TextureData, TextureId, TextureMapping,
	TextureSlot, Transform, UvLayer, VertexGroup,
};
/// Skeleton binding records and leaf-bone synthesis.
pub use skin::{LeafBone, SkinBinding, generate_leaf_bones, skin_bindings};
/// Class template registry and per-element property writer.
pub use templates::{TemplateId, TemplateProp, TemplateProps, TemplateRegistry};
/// Stable key to uid registry.
pub use uid::UidRegistry;
/// Binary serialization entry points.
pub use write::{encode_bytes, write_file};
