use crate::fbx::element::Element;
use crate::fbx::props::{PropKind, PropValue, prop_element, props70};

/// `Definitions` block version.
pub const TEMPLATES_VERSION: i32 = 100;

/// Entity classes that participate in the `Definitions` section.
///
/// Several ids share one `ObjectType` class name (all the node attribute
/// subtypes collapse into `NodeAttribute`); the registry merges them when
/// emitting the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
	/// Scene-wide settings, always counted once.
	GlobalSettings,
	/// Transform nodes.
	Model,
	/// Null attribute (empties and armatures).
	Null,
	/// Light attribute.
	Light,
	/// Camera attribute.
	Camera,
	/// Skeleton limb attribute.
	Bone,
	/// Mesh and shape geometry.
	Geometry,
	/// Bind poses.
	BindPose,
	/// Skin, cluster, blend shape and channel deformers.
	Deformer,
	/// Surface materials.
	Material,
	/// File textures.
	TextureFile,
	/// Backing image clips.
	Video,
	/// Animation stacks.
	AnimationStack,
	/// Animation layers.
	AnimationLayer,
	/// Animation curve nodes.
	AnimationCurveNode,
	/// Animation curves.
	AnimationCurve,
}

impl TemplateId {
	/// `ObjectType` class name this id contributes to.
	pub fn class(self) -> &'static [u8] {
		match self {
			Self::GlobalSettings => b"GlobalSettings",
			Self::Model => b"Model",
			Self::Null | Self::Light | Self::Camera | Self::Bone => b"NodeAttribute",
			Self::Geometry => b"Geometry",
			Self::BindPose => b"Pose",
			Self::Deformer => b"Deformer",
			Self::Material => b"Material",
			Self::TextureFile => b"Texture",
			Self::Video => b"Video",
			Self::AnimationStack => b"AnimationStack",
			Self::AnimationLayer => b"AnimationLayer",
			Self::AnimationCurveNode => b"AnimationCurveNode",
			Self::AnimationCurve => b"AnimationCurve",
		}
	}

	/// `PropertyTemplate` subclass name; empty when the class carries none.
	pub fn subclass(self) -> &'static [u8] {
		match self {
			Self::GlobalSettings | Self::BindPose | Self::Deformer | Self::AnimationCurve => b"",
			Self::Model => b"FbxNode",
			Self::Null => b"FbxNull",
			Self::Light => b"FbxLight",
			Self::Camera => b"FbxCamera",
			Self::Bone => b"LimbNode",
			Self::Geometry => b"FbxMesh",
			Self::Material => b"FbxSurfacePhong",
			Self::TextureFile => b"FbxFileTexture",
			Self::Video => b"FbxVideo",
			Self::AnimationStack => b"FbxAnimStack",
			Self::AnimationLayer => b"FbxAnimLayer",
			Self::AnimationCurveNode => b"FbxAnimCurveNode",
		}
	}

	/// Default property table for this class.
	pub fn defaults(self) -> Vec<TemplateProp> {
		match self {
			Self::GlobalSettings | Self::Bone | Self::BindPose | Self::Deformer | Self::AnimationCurve => Vec::new(),
			Self::Model => model_defaults(),
			Self::Null => null_defaults(),
			Self::Light => light_defaults(),
			Self::Camera => camera_defaults(),
			Self::Geometry => geometry_defaults(),
			Self::Material => material_defaults(),
			Self::TextureFile => texture_defaults(),
			Self::Video => video_defaults(),
			Self::AnimationStack => animstack_defaults(),
			Self::AnimationLayer => animlayer_defaults(),
			Self::AnimationCurveNode => vec![tp("d", PropKind::Compound, PropValue::None)],
		}
	}
}

/// One default property carried by a class template.
#[derive(Debug, Clone)]
pub struct TemplateProp {
	/// Property name.
	pub name: &'static str,
	/// Property kind, fixing the `(type, label)` pair and the animatable flag.
	pub kind: PropKind,
	/// Default value.
	pub value: PropValue,
}

fn tp(name: &'static str, kind: PropKind, value: PropValue) -> TemplateProp {
	TemplateProp { name, kind, value }
}

fn v3(x: f64, y: f64, z: f64) -> PropValue {
	PropValue::Vec3([x, y, z])
}

/// Per-class usage counters, in first-use order.
///
/// The assembler registers every template user before any entity element is
/// emitted, so element emission can ask whether a class template's defaults
/// made it into `Definitions`.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
	entries: Vec<(TemplateId, u32)>,
}

impl TemplateRegistry {
	/// Empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Count one more user of the given class.
	pub fn user(&mut self, id: TemplateId) {
		self.add_users(id, 1);
	}

	/// Count `count` more users of the given class.
	pub fn add_users(&mut self, id: TemplateId, count: u32) {
		if count == 0 {
			return;
		}
		if let Some(entry) = self.entries.iter_mut().find(|(e, _)| *e == id) {
			entry.1 += count;
		} else {
			self.entries.push((id, count));
		}
	}

	/// Usage count of one class.
	pub fn users(&self, id: TemplateId) -> u32 {
		self.entries.iter().find(|(e, _)| *e == id).map_or(0, |(_, n)| *n)
	}

	/// Sum of all usage counters, across every registered class.
	pub fn total_users(&self) -> u32 {
		self.entries.iter().map(|(_, n)| n).sum()
	}

	/// Whether the default table of this id is the one written into the
	/// `Definitions` block.
	///
	/// Classes shared by several subtypes (`NodeAttribute`) can only carry
	/// one `PropertyTemplate`; when more than one subtype is in use, none is
	/// written and every element spells its defaults out instead.
	pub fn template_written(&self, id: TemplateId) -> bool {
		if self.users(id) == 0 || id.subclass().is_empty() || id.defaults().is_empty() {
			return false;
		}
		self.entries.iter().filter(|(e, _)| e.class() == id.class()).count() == 1
	}

	/// Emit the `Definitions` element: version, total count, and one
	/// `ObjectType` child per distinct class in first-use order.
	pub fn definitions_element(&self) -> Element {
		let mut defs = Element::new(&b"Definitions"[..]);
		defs.data_i32(&b"Version"[..], TEMPLATES_VERSION);
		defs.data_i32(&b"Count"[..], self.total_users() as i32);

		let mut done_classes: Vec<&'static [u8]> = Vec::new();
		for &(id, _) in &self.entries {
			let class = id.class();
			if done_classes.contains(&class) {
				continue;
			}
			done_classes.push(class);

			let class_users: u32 = self
				.entries
				.iter()
				.filter(|(e, _)| e.class() == class)
				.map(|(_, n)| n)
				.sum();

			let obj_type = defs.data_str(&b"ObjectType"[..], class);
			obj_type.data_i32(&b"Count"[..], class_users as i32);

			if self.template_written(id) {
				let tmpl = obj_type.data_str(&b"PropertyTemplate"[..], id.subclass());
				let p70 = props70(tmpl);
				for prop in id.defaults() {
					prop_element(p70, prop.name, prop.kind, &prop.value, false, false);
				}
			}
		}
		defs
	}
}

/// Per-element property writer backed by one class template.
///
/// Values equal to the template default are skipped when that default is
/// already carried by `Definitions`; [`TemplateProps::finalize`] then writes
/// out whatever defaults the element did not override itself.
#[derive(Debug)]
pub struct TemplateProps {
	defaults: Vec<TemplateProp>,
	written: Vec<bool>,
}

impl TemplateProps {
	/// Start writing one element's properties against the given class.
	pub fn init(registry: &TemplateRegistry, id: TemplateId) -> Self {
		let defaults = id.defaults();
		let written = vec![registry.template_written(id); defaults.len()];
		Self { defaults, written }
	}

	/// Write one property, skipping it when the template already carries the
	/// same value.
	pub fn set(&mut self, p70: &mut Element, kind: PropKind, name: &str, value: PropValue) {
		self.set_animated(p70, kind, name, value, false);
	}

	/// Like [`TemplateProps::set`], but animated properties are always
	/// written since a curve will drive them away from the default.
	pub fn set_animated(&mut self, p70: &mut Element, kind: PropKind, name: &str, value: PropValue, animated: bool) {
		if let Some(idx) = self.defaults.iter().position(|d| d.name == name) {
			let default = &self.defaults[idx];
			if !animated && self.written[idx] && default.kind == kind && default.value == value {
				return;
			}
			// Template kind wins over the caller's, matching the flags the
			// template itself was written with.
			let kind = default.kind;
			prop_element(p70, name, kind, &value, animated, false);
			self.written[idx] = true;
		} else {
			prop_element(p70, name, kind, &value, animated, false);
		}
	}

	/// Write every template default the element did not set explicitly.
	///
	/// Required for subtypes whose defaults were not written into
	/// `Definitions`; a no-op otherwise.
	pub fn finalize(&mut self, p70: &mut Element) {
		for (idx, default) in self.defaults.iter().enumerate() {
			if self.written[idx] {
				continue;
			}
			prop_element(p70, default.name, default.kind, &default.value, false, false);
			self.written[idx] = true;
		}
	}
}

fn model_defaults() -> Vec<TemplateProp> {
	use PropKind::{Bool, Double, Enum, Integer, LclRotation, LclScaling, LclTranslation, Object, Vector3D, Visibility, VisibilityInheritance};
	vec![
		tp("QuaternionInterpolate", Enum, PropValue::I32(0)),
		tp("RotationOffset", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("RotationPivot", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("ScalingOffset", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("ScalingPivot", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("TranslationActive", Bool, PropValue::Bool(false)),
		tp("TranslationMin", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("TranslationMax", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("TranslationMinX", Bool, PropValue::Bool(false)),
		tp("TranslationMinY", Bool, PropValue::Bool(false)),
		tp("TranslationMinZ", Bool, PropValue::Bool(false)),
		tp("TranslationMaxX", Bool, PropValue::Bool(false)),
		tp("TranslationMaxY", Bool, PropValue::Bool(false)),
		tp("TranslationMaxZ", Bool, PropValue::Bool(false)),
		tp("RotationOrder", Enum, PropValue::I32(0)),
		tp("RotationSpaceForLimitOnly", Bool, PropValue::Bool(false)),
		tp("RotationStiffnessX", Double, PropValue::F64(0.0)),
		tp("RotationStiffnessY", Double, PropValue::F64(0.0)),
		tp("RotationStiffnessZ", Double, PropValue::F64(0.0)),
		tp("AxisLen", Double, PropValue::F64(10.0)),
		tp("PreRotation", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("PostRotation", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("RotationActive", Bool, PropValue::Bool(false)),
		tp("RotationMin", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("RotationMax", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("RotationMinX", Bool, PropValue::Bool(false)),
		tp("RotationMinY", Bool, PropValue::Bool(false)),
		tp("RotationMinZ", Bool, PropValue::Bool(false)),
		tp("RotationMaxX", Bool, PropValue::Bool(false)),
		tp("RotationMaxY", Bool, PropValue::Bool(false)),
		tp("RotationMaxZ", Bool, PropValue::Bool(false)),
		tp("InheritType", Enum, PropValue::I32(0)),
		tp("ScalingActive", Bool, PropValue::Bool(false)),
		tp("ScalingMin", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("ScalingMax", Vector3D, v3(1.0, 1.0, 1.0)),
		tp("ScalingMinX", Bool, PropValue::Bool(false)),
		tp("ScalingMinY", Bool, PropValue::Bool(false)),
		tp("ScalingMinZ", Bool, PropValue::Bool(false)),
		tp("ScalingMaxX", Bool, PropValue::Bool(false)),
		tp("ScalingMaxY", Bool, PropValue::Bool(false)),
		tp("ScalingMaxZ", Bool, PropValue::Bool(false)),
		tp("GeometricTranslation", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("GeometricRotation", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("GeometricScaling", Vector3D, v3(1.0, 1.0, 1.0)),
		tp("MinDampRangeX", Double, PropValue::F64(0.0)),
		tp("MinDampRangeY", Double, PropValue::F64(0.0)),
		tp("MinDampRangeZ", Double, PropValue::F64(0.0)),
		tp("MaxDampRangeX", Double, PropValue::F64(0.0)),
		tp("MaxDampRangeY", Double, PropValue::F64(0.0)),
		tp("MaxDampRangeZ", Double, PropValue::F64(0.0)),
		tp("MinDampStrengthX", Double, PropValue::F64(0.0)),
		tp("MinDampStrengthY", Double, PropValue::F64(0.0)),
		tp("MinDampStrengthZ", Double, PropValue::F64(0.0)),
		tp("MaxDampStrengthX", Double, PropValue::F64(0.0)),
		tp("MaxDampStrengthY", Double, PropValue::F64(0.0)),
		tp("MaxDampStrengthZ", Double, PropValue::F64(0.0)),
		tp("PreferedAngleX", Double, PropValue::F64(0.0)),
		tp("PreferedAngleY", Double, PropValue::F64(0.0)),
		tp("PreferedAngleZ", Double, PropValue::F64(0.0)),
		tp("LookAtProperty", Object, PropValue::None),
		tp("UpVectorProperty", Object, PropValue::None),
		tp("Show", Bool, PropValue::Bool(true)),
		tp("NegativePercentShapeSupport", Bool, PropValue::Bool(true)),
		tp("DefaultAttributeIndex", Integer, PropValue::I32(-1)),
		tp("Freeze", Bool, PropValue::Bool(false)),
		tp("LODBox", Bool, PropValue::Bool(false)),
		tp("Lcl Translation", LclTranslation, v3(0.0, 0.0, 0.0)),
		tp("Lcl Rotation", LclRotation, v3(0.0, 0.0, 0.0)),
		tp("Lcl Scaling", LclScaling, v3(1.0, 1.0, 1.0)),
		tp("Visibility", Visibility, PropValue::F64(1.0)),
		tp("Visibility Inheritance", VisibilityInheritance, PropValue::I32(1)),
	]
}

fn null_defaults() -> Vec<TemplateProp> {
	use PropKind::{ColorRgb, Double, Enum};
	vec![
		tp("Color", ColorRgb, v3(0.8, 0.8, 0.8)),
		tp("Size", Double, PropValue::F64(100.0)),
		tp("Look", Enum, PropValue::I32(1)),
	]
}

fn light_defaults() -> Vec<TemplateProp> {
	use PropKind::{Bool, Color, Double, Enum, Number};
	vec![
		tp("LightType", Enum, PropValue::I32(0)),
		tp("CastLight", Bool, PropValue::Bool(true)),
		tp("Color", Color, v3(1.0, 1.0, 1.0)),
		tp("Intensity", Number, PropValue::F64(100.0)),
		tp("DecayType", Enum, PropValue::I32(2)),
		tp("DecayStart", Double, PropValue::F64(30.0)),
		tp("CastShadows", Bool, PropValue::Bool(true)),
		tp("ShadowColor", Color, v3(0.0, 0.0, 0.0)),
		tp("AreaLightShape", Enum, PropValue::I32(0)),
	]
}

fn camera_defaults() -> Vec<TemplateProp> {
	use PropKind::{
		Bool, Color, ColorRgb, Double, Enum, FieldOfView, FieldOfViewX, FieldOfViewY, Integer, Number, Object,
		OpticalCenterX, OpticalCenterY, Roll, Vector, Vector3D,
	};
	vec![
		tp("Color", ColorRgb, v3(0.8, 0.8, 0.8)),
		tp("Position", Vector, v3(0.0, 0.0, -50.0)),
		tp("UpVector", Vector, v3(0.0, 1.0, 0.0)),
		tp("InterestPosition", Vector, v3(0.0, 0.0, 0.0)),
		tp("Roll", Roll, PropValue::F64(0.0)),
		tp("OpticalCenterX", OpticalCenterX, PropValue::F64(0.0)),
		tp("OpticalCenterY", OpticalCenterY, PropValue::F64(0.0)),
		tp("BackgroundColor", Color, v3(0.63, 0.63, 0.63)),
		tp("TurnTable", Number, PropValue::F64(0.0)),
		tp("DisplayTurnTableIcon", Bool, PropValue::Bool(false)),
		tp("UseMotionBlur", Bool, PropValue::Bool(false)),
		tp("UseRealTimeMotionBlur", Bool, PropValue::Bool(true)),
		tp("Motion Blur Intensity", Number, PropValue::F64(1.0)),
		tp("AspectRatioMode", Enum, PropValue::I32(0)),
		tp("AspectWidth", Double, PropValue::F64(320.0)),
		tp("AspectHeight", Double, PropValue::F64(200.0)),
		tp("PixelAspectRatio", Double, PropValue::F64(1.0)),
		tp("FilmOffsetX", Number, PropValue::F64(0.0)),
		tp("FilmOffsetY", Number, PropValue::F64(0.0)),
		tp("FilmWidth", Double, PropValue::F64(0.816)),
		tp("FilmHeight", Double, PropValue::F64(0.612)),
		tp("FilmAspectRatio", Double, PropValue::F64(1.3333333333333333)),
		tp("FilmSqueezeRatio", Double, PropValue::F64(1.0)),
		tp("FilmFormatIndex", Enum, PropValue::I32(0)),
		tp("PreScale", Number, PropValue::F64(1.0)),
		tp("FilmTranslateX", Number, PropValue::F64(0.0)),
		tp("FilmTranslateY", Number, PropValue::F64(0.0)),
		tp("FilmRollPivotX", Number, PropValue::F64(0.0)),
		tp("FilmRollPivotY", Number, PropValue::F64(0.0)),
		tp("FilmRollValue", Number, PropValue::F64(0.0)),
		tp("FilmRollOrder", Enum, PropValue::I32(0)),
		tp("ApertureMode", Enum, PropValue::I32(2)),
		tp("GateFit", Enum, PropValue::I32(0)),
		tp("FieldOfView", FieldOfView, PropValue::F64(25.114999771118164)),
		tp("FieldOfViewX", FieldOfViewX, PropValue::F64(40.0)),
		tp("FieldOfViewY", FieldOfViewY, PropValue::F64(40.0)),
		tp("FocalLength", Number, PropValue::F64(34.89327621672628)),
		tp("CameraFormat", Enum, PropValue::I32(0)),
		tp("UseFrameColor", Bool, PropValue::Bool(false)),
		tp("FrameColor", ColorRgb, v3(0.3, 0.3, 0.3)),
		tp("ShowName", Bool, PropValue::Bool(true)),
		tp("ShowInfoOnMoving", Bool, PropValue::Bool(true)),
		tp("ShowGrid", Bool, PropValue::Bool(true)),
		tp("ShowOpticalCenter", Bool, PropValue::Bool(false)),
		tp("ShowAzimut", Bool, PropValue::Bool(true)),
		tp("ShowTimeCode", Bool, PropValue::Bool(false)),
		tp("ShowAudio", Bool, PropValue::Bool(false)),
		tp("AudioColor", Vector3D, v3(0.0, 1.0, 0.0)),
		tp("NearPlane", Double, PropValue::F64(10.0)),
		tp("FarPlane", Double, PropValue::F64(4000.0)),
		tp("AutoComputeClipPanes", Bool, PropValue::Bool(false)),
		tp("ViewCameraToLookAt", Bool, PropValue::Bool(true)),
		tp("ViewFrustumNearFarPlane", Bool, PropValue::Bool(false)),
		tp("ViewFrustumBackPlaneMode", Enum, PropValue::I32(2)),
		tp("BackPlaneDistance", Number, PropValue::F64(4000.0)),
		tp("BackPlaneDistanceMode", Enum, PropValue::I32(1)),
		tp("ViewFrustumFrontPlaneMode", Enum, PropValue::I32(2)),
		tp("FrontPlaneDistance", Number, PropValue::F64(10.0)),
		tp("FrontPlaneDistanceMode", Enum, PropValue::I32(1)),
		tp("LockMode", Bool, PropValue::Bool(false)),
		tp("LockInterestNavigation", Bool, PropValue::Bool(false)),
		tp("FitImage", Bool, PropValue::Bool(false)),
		tp("Crop", Bool, PropValue::Bool(false)),
		tp("Center", Bool, PropValue::Bool(true)),
		tp("KeepRatio", Bool, PropValue::Bool(true)),
		tp("BackgroundAlphaTreshold", Double, PropValue::F64(0.5)),
		tp("ShowBackplate", Bool, PropValue::Bool(true)),
		tp("BackPlaneOffsetX", Number, PropValue::F64(0.0)),
		tp("BackPlaneOffsetY", Number, PropValue::F64(0.0)),
		tp("BackPlaneRotation", Number, PropValue::F64(0.0)),
		tp("BackPlaneScaleX", Number, PropValue::F64(1.0)),
		tp("BackPlaneScaleY", Number, PropValue::F64(1.0)),
		tp("Background Texture", Object, PropValue::None),
		tp("FrontPlateFitImage", Bool, PropValue::Bool(true)),
		tp("FrontPlateCrop", Bool, PropValue::Bool(false)),
		tp("FrontPlateCenter", Bool, PropValue::Bool(true)),
		tp("FrontPlateKeepRatio", Bool, PropValue::Bool(true)),
		tp("Foreground Opacity", Double, PropValue::F64(1.0)),
		tp("ShowFrontplate", Bool, PropValue::Bool(true)),
		tp("FrontPlaneOffsetX", Number, PropValue::F64(0.0)),
		tp("FrontPlaneOffsetY", Number, PropValue::F64(0.0)),
		tp("FrontPlaneRotation", Number, PropValue::F64(0.0)),
		tp("FrontPlaneScaleX", Number, PropValue::F64(1.0)),
		tp("FrontPlaneScaleY", Number, PropValue::F64(1.0)),
		tp("Foreground Texture", Object, PropValue::None),
		tp("DisplaySafeArea", Bool, PropValue::Bool(false)),
		tp("DisplaySafeAreaOnRender", Bool, PropValue::Bool(false)),
		tp("SafeAreaDisplayStyle", Enum, PropValue::I32(1)),
		tp("SafeAreaAspectRatio", Double, PropValue::F64(1.3333333333333333)),
		tp("Use2DMagnifierZoom", Bool, PropValue::Bool(false)),
		tp("2D Magnifier Zoom", Number, PropValue::F64(100.0)),
		tp("2D Magnifier X", Number, PropValue::F64(50.0)),
		tp("2D Magnifier Y", Number, PropValue::F64(50.0)),
		tp("CameraProjectionType", Enum, PropValue::I32(0)),
		tp("OrthoZoom", Double, PropValue::F64(1.0)),
		tp("UseRealTimeDOFAndAA", Bool, PropValue::Bool(false)),
		tp("UseDepthOfField", Bool, PropValue::Bool(false)),
		tp("FocusSource", Enum, PropValue::I32(0)),
		tp("FocusAngle", Double, PropValue::F64(3.5)),
		tp("FocusDistance", Double, PropValue::F64(200.0)),
		tp("UseAntialiasing", Bool, PropValue::Bool(false)),
		tp("AntialiasingIntensity", Double, PropValue::F64(0.77777)),
		tp("AntialiasingMethod", Enum, PropValue::I32(0)),
		tp("UseAccumulationBuffer", Bool, PropValue::Bool(false)),
		tp("FrameSamplingCount", Integer, PropValue::I32(7)),
		tp("FrameSamplingType", Enum, PropValue::I32(1)),
	]
}

fn geometry_defaults() -> Vec<TemplateProp> {
	use PropKind::{Bool, ColorRgb, Vector3D};
	vec![
		tp("Color", ColorRgb, v3(0.8, 0.8, 0.8)),
		tp("BBoxMin", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("BBoxMax", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("Primary Visibility", Bool, PropValue::Bool(true)),
		tp("Casts Shadows", Bool, PropValue::Bool(true)),
		tp("Receive Shadows", Bool, PropValue::Bool(true)),
	]
}

fn material_defaults() -> Vec<TemplateProp> {
	use PropKind::{Bool, Color, ColorRgb, Double, KString, Number, Vector3D};
	vec![
		tp("ShadingModel", KString, PropValue::Str("Phong".to_owned())),
		tp("MultiLayer", Bool, PropValue::Bool(false)),
		tp("EmissiveColor", Color, v3(0.0, 0.0, 0.0)),
		tp("EmissiveFactor", Number, PropValue::F64(1.0)),
		tp("AmbientColor", Color, v3(0.2, 0.2, 0.2)),
		tp("AmbientFactor", Number, PropValue::F64(1.0)),
		tp("DiffuseColor", Color, v3(0.8, 0.8, 0.8)),
		tp("DiffuseFactor", Number, PropValue::F64(1.0)),
		tp("TransparentColor", Color, v3(0.0, 0.0, 0.0)),
		tp("TransparencyFactor", Number, PropValue::F64(0.0)),
		tp("Opacity", Number, PropValue::F64(1.0)),
		tp("NormalMap", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("Bump", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("BumpFactor", Double, PropValue::F64(1.0)),
		tp("DisplacementColor", ColorRgb, v3(0.0, 0.0, 0.0)),
		tp("DisplacementFactor", Double, PropValue::F64(1.0)),
		tp("VectorDisplacementColor", ColorRgb, v3(0.0, 0.0, 0.0)),
		tp("VectorDisplacementFactor", Double, PropValue::F64(1.0)),
		tp("SpecularColor", Color, v3(0.2, 0.2, 0.2)),
		tp("SpecularFactor", Number, PropValue::F64(1.0)),
		tp("Shininess", Number, PropValue::F64(20.0)),
		tp("ShininessExponent", Number, PropValue::F64(20.0)),
		tp("ReflectionColor", Color, v3(0.0, 0.0, 0.0)),
		tp("ReflectionFactor", Number, PropValue::F64(1.0)),
	]
}

fn texture_defaults() -> Vec<TemplateProp> {
	use PropKind::{Bool, Double, Enum, KString, Vector3D};
	vec![
		tp("TextureTypeUse", Enum, PropValue::I32(0)),
		tp("AlphaSource", Enum, PropValue::I32(2)),
		tp("Texture alpha", Double, PropValue::F64(1.0)),
		tp("PremultiplyAlpha", Bool, PropValue::Bool(true)),
		tp("CurrentTextureBlendMode", Enum, PropValue::I32(1)),
		tp("CurrentMappingType", Enum, PropValue::I32(0)),
		tp("UVSet", KString, PropValue::Str("default".to_owned())),
		tp("WrapModeU", Enum, PropValue::I32(0)),
		tp("WrapModeV", Enum, PropValue::I32(0)),
		tp("UVSwap", Bool, PropValue::Bool(false)),
		tp("Translation", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("Rotation", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("Scaling", Vector3D, v3(1.0, 1.0, 1.0)),
		tp("TextureRotationPivot", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("TextureScalingPivot", Vector3D, v3(0.0, 0.0, 0.0)),
		tp("UseMaterial", Bool, PropValue::Bool(false)),
		tp("UseMipMap", Bool, PropValue::Bool(false)),
	]
}

fn video_defaults() -> Vec<TemplateProp> {
	use PropKind::{Bool, Double, Enum, Integer, Timestamp, Url};
	vec![
		tp("Width", Integer, PropValue::I32(0)),
		tp("Height", Integer, PropValue::I32(0)),
		tp("Path", Url, PropValue::Str(String::new())),
		tp("AccessMode", Enum, PropValue::I32(0)),
		tp("StartFrame", Integer, PropValue::I32(0)),
		tp("StopFrame", Integer, PropValue::I32(0)),
		tp("Offset", Timestamp, PropValue::I64(0)),
		tp("PlaySpeed", Double, PropValue::F64(0.0)),
		tp("FreeRunning", Bool, PropValue::Bool(false)),
		tp("Loop", Bool, PropValue::Bool(false)),
		tp("InterlaceMode", Enum, PropValue::I32(0)),
		tp("ImageSequence", Bool, PropValue::Bool(false)),
		tp("ImageSequenceOffset", Integer, PropValue::I32(0)),
		tp("FrameRate", Double, PropValue::F64(0.0)),
		tp("LastFrame", Integer, PropValue::I32(0)),
	]
}

fn animstack_defaults() -> Vec<TemplateProp> {
	use PropKind::{KString, Timestamp};
	vec![
		tp("Description", KString, PropValue::Str(String::new())),
		tp("LocalStart", Timestamp, PropValue::I64(0)),
		tp("LocalStop", Timestamp, PropValue::I64(0)),
		tp("ReferenceStart", Timestamp, PropValue::I64(0)),
		tp("ReferenceStop", Timestamp, PropValue::I64(0)),
	]
}

fn animlayer_defaults() -> Vec<TemplateProp> {
	use PropKind::{Bool, ColorRgb, Enum, Number, ULongLong};
	vec![
		tp("Weight", Number, PropValue::F64(100.0)),
		tp("Mute", Bool, PropValue::Bool(false)),
		tp("Solo", Bool, PropValue::Bool(false)),
		tp("Lock", Bool, PropValue::Bool(false)),
		tp("Color", ColorRgb, v3(0.8, 0.8, 0.8)),
		tp("BlendMode", Enum, PropValue::I32(0)),
		tp("RotationAccumulationMode", Enum, PropValue::I32(0)),
		tp("ScaleAccumulationMode", Enum, PropValue::I32(0)),
		tp("BlendModeBypass", ULongLong, PropValue::I64(0)),
	]
}

#[cfg(test)]
mod tests;
