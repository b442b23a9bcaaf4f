use crate::fbx::element::{Element, name_class};
use crate::fbx::export::AssemblerContext;
use crate::fbx::props::{PropKind, PropValue, prop_element};
use crate::fbx::scene::{CustomValue, Falloff, LightKind, MapChannel, MaterialId, ObjectId, ObjectKind, SpecularModel, TextureId, TextureMapping};
use crate::fbx::templates::{TemplateId, TemplateProps};

/// `Version` of `Model` blocks.
pub const MODELS_VERSION: i32 = 232;
/// `Version` of `Material` blocks.
pub const MATERIAL_VERSION: i32 = 102;
/// `Version` of `Texture` blocks.
pub const TEXTURE_VERSION: i32 = 202;

/// `GeometryVersion` written on light and camera attributes, same as meshes.
const ATTRIBUTE_GEOMETRY_VERSION: i32 = 124;

const MM_TO_INCH: f64 = 0.0393700787;

/// Key of the node attribute block owned by an object or bone.
pub fn attribute_key(key: &str) -> String {
	format!("{key}|data")
}

/// The fixed trailing children every `Model` block carries.
pub fn model_extras(model: &mut Element) {
	model.data_i32(&b"MultiLayer"[..], 0);
	model.data_i32(&b"MultiTake"[..], 0);
	model.data_bool(&b"Shading"[..], true);
	model.data_str(&b"Culling"[..], &b"CullingOff"[..]);
}

/// FBX material property names a texture channel influences.
///
/// Factor and color are distinct FBX properties; some channels fan out to
/// several because the source model reuses one color for them.
pub fn map_channel_props(channel: MapChannel) -> &'static [&'static str] {
	match channel {
		MapChannel::Diffuse => &["DiffuseFactor", "TransparentColor", "EmissiveColor"],
		MapChannel::Color => &["DiffuseColor"],
		MapChannel::Alpha => &["TransparencyFactor"],
		MapChannel::Emit => &["EmissiveFactor"],
		MapChannel::Ambient => &["AmbientFactor"],
		MapChannel::Normal => &["NormalMap"],
		MapChannel::Specular => &["SpecularFactor"],
		MapChannel::SpecularColor => &["SpecularColor"],
		MapChannel::Hardness => &["Shininess", "ShininessExponent"],
		MapChannel::Mirror => &["ReflectionColor"],
		MapChannel::RayMirror => &["ReflectionFactor"],
	}
}

fn custom_properties(p70: &mut Element, props: &[(String, CustomValue)]) {
	for (name, value) in props {
		let (kind, value) = match value {
			CustomValue::Bool(v) => (PropKind::Bool, PropValue::Bool(*v)),
			CustomValue::Int(v) => (PropKind::Integer, PropValue::I32(*v as i32)),
			CustomValue::Float(v) => (PropKind::Double, PropValue::F64(*v)),
			CustomValue::Str(v) => (PropKind::KString, PropValue::Str(v.clone())),
		};
		prop_element(p70, name, kind, &value, false, true);
	}
}

fn data_vec3(parent: &mut Element, id: &[u8], v: [f64; 3]) {
	let child = parent.child(id);
	child.add_f64(v[0]).add_f64(v[1]).add_f64(v[2]);
}

/// Write the `Null` node attribute of an empty or armature object.
pub fn empty_attribute_elements(root: &mut Element, ctx: &mut AssemblerContext, obj_id: ObjectId) {
	let obj = &ctx.scene.objects[obj_id.0];

	let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::Null);
	let mut p70 = Element::new(&b"Properties70"[..]);
	tmpl.finalize(&mut p70);

	let uid = ctx.uids.uid(&attribute_key(&obj.key));
	let null = root.data_i64(&b"NodeAttribute"[..], uid);
	null.add_string(name_class(&obj.name, b"NodeAttribute"));
	null.add_string(&b"Null"[..]);
	null.data_str(&b"TypeFlags"[..], &b"Null"[..]);
	null.push_child(p70);
}

/// Write the `Light` node attribute of a light object.
pub fn light_attribute_elements(root: &mut Element, ctx: &mut AssemblerContext, obj_id: ObjectId) {
	let obj = &ctx.scene.objects[obj_id.0];
	let ObjectKind::Light(light) = &obj.kind else {
		return;
	};
	let gscale = ctx.settings.global_scale;

	let light_type = match light.kind {
		LightKind::Point => 0,
		LightKind::Sun | LightKind::Hemi => 1,
		LightKind::Spot => 2,
		LightKind::Area => 3,
	};
	// Hemi lights export as constant-decay, shadowless directionals.
	let (decay_type, cast_shadow, shadow_color) = match light.kind {
		LightKind::Hemi => (0, false, [0.0; 3]),
		LightKind::Sun | LightKind::Area => (0, light.cast_shadow, light.shadow_color),
		LightKind::Point | LightKind::Spot => {
			let decay = match light.falloff {
				Falloff::Constant => 0,
				Falloff::InverseLinear => 1,
				Falloff::InverseSquare => 2,
			};
			(decay, light.cast_shadow, light.shadow_color)
		}
	};

	let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::Light);
	let mut p70 = Element::new(&b"Properties70"[..]);
	tmpl.set(&mut p70, PropKind::Enum, "LightType", PropValue::I32(light_type));
	tmpl.set(&mut p70, PropKind::Bool, "CastLight", PropValue::Bool(true));
	tmpl.set(&mut p70, PropKind::Color, "Color", PropValue::Vec3(light.color));
	tmpl.set(&mut p70, PropKind::Number, "Intensity", PropValue::F64(light.energy * 100.0));
	tmpl.set(&mut p70, PropKind::Enum, "DecayType", PropValue::I32(decay_type));
	tmpl.set(&mut p70, PropKind::Double, "DecayStart", PropValue::F64(light.distance * gscale));
	tmpl.set(&mut p70, PropKind::Bool, "CastShadows", PropValue::Bool(cast_shadow));
	tmpl.set(&mut p70, PropKind::Color, "ShadowColor", PropValue::Vec3(shadow_color));
	if light.kind == LightKind::Spot {
		let outer = light.spot_size.to_degrees();
		let inner = (light.spot_size * (1.0 - light.spot_blend)).to_degrees();
		tmpl.set(&mut p70, PropKind::Double, "OuterAngle", PropValue::F64(outer));
		tmpl.set(&mut p70, PropKind::Double, "InnerAngle", PropValue::F64(inner));
	}
	tmpl.finalize(&mut p70);
	if ctx.settings.use_custom_props {
		custom_properties(&mut p70, &obj.custom_props);
	}

	let uid = ctx.uids.uid(&attribute_key(&obj.key));
	let attr = root.data_i64(&b"NodeAttribute"[..], uid);
	attr.add_string(name_class(&obj.name, b"NodeAttribute"));
	attr.add_string(&b"Light"[..]);
	attr.data_i32(&b"GeometryVersion"[..], ATTRIBUTE_GEOMETRY_VERSION);
	attr.push_child(p70);
}

fn normalized(v: [f64; 3]) -> [f64; 3] {
	let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
	if len < 1e-12 {
		return v;
	}
	[v[0] / len, v[1] / len, v[2] / len]
}

/// Write the `Camera` node attribute of a camera object.
pub fn camera_attribute_elements(root: &mut Element, ctx: &mut AssemblerContext, obj_id: ObjectId) {
	let scene = ctx.scene;
	let obj = &scene.objects[obj_id.0];
	let ObjectKind::Camera(cam) = &obj.kind else {
		return;
	};
	let gscale = ctx.settings.global_scale;

	let m = obj.world_matrix;
	let loc = [m[12], m[13], m[14]];
	let up = normalized([m[4], m[5], m[6]]);
	let to = normalized([-m[8], -m[9], -m[10]]);

	let aspect = f64::from(scene.resolution_x) / f64::from(scene.resolution_y);
	let filmwidth = cam.sensor_width_mm * MM_TO_INCH;
	let filmheight = cam.sensor_height_mm * MM_TO_INCH;
	let filmaspect = filmwidth / filmheight;
	let offsetx = filmwidth * cam.shift_x;
	let offsety = filmaspect * filmheight * cam.shift_y;

	let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::Camera);
	let mut p70 = Element::new(&b"Properties70"[..]);
	tmpl.set(&mut p70, PropKind::Vector, "Position", PropValue::Vec3(loc));
	tmpl.set(&mut p70, PropKind::Vector, "UpVector", PropValue::Vec3(up));
	// A point, not a direction.
	tmpl.set(
		&mut p70,
		PropKind::Vector,
		"InterestPosition",
		PropValue::Vec3([loc[0] + to[0], loc[1] + to[1], loc[2] + to[2]]),
	);
	tmpl.set(&mut p70, PropKind::Color, "BackgroundColor", PropValue::Vec3([0.0; 3]));
	tmpl.set(&mut p70, PropKind::Bool, "DisplayTurnTableIcon", PropValue::Bool(true));

	// FixedResolution.
	tmpl.set(&mut p70, PropKind::Enum, "AspectRatioMode", PropValue::I32(2));
	tmpl.set(&mut p70, PropKind::Double, "AspectWidth", PropValue::F64(f64::from(scene.resolution_x)));
	tmpl.set(&mut p70, PropKind::Double, "AspectHeight", PropValue::F64(f64::from(scene.resolution_y)));
	tmpl.set(&mut p70, PropKind::Double, "PixelAspectRatio", PropValue::F64(scene.pixel_aspect));

	tmpl.set(&mut p70, PropKind::Double, "FilmWidth", PropValue::F64(filmwidth));
	tmpl.set(&mut p70, PropKind::Double, "FilmHeight", PropValue::F64(filmheight));
	tmpl.set(&mut p70, PropKind::Double, "FilmAspectRatio", PropValue::F64(filmaspect));
	tmpl.set(&mut p70, PropKind::Double, "FilmOffsetX", PropValue::F64(offsetx));
	tmpl.set(&mut p70, PropKind::Double, "FilmOffsetY", PropValue::F64(offsety));

	// FocalLength aperture mode, horizontal gate fit.
	tmpl.set(&mut p70, PropKind::Enum, "ApertureMode", PropValue::I32(3));
	tmpl.set(&mut p70, PropKind::Enum, "GateFit", PropValue::I32(2));
	tmpl.set(&mut p70, PropKind::FieldOfView, "FieldOfView", PropValue::F64(cam.angle_x_deg));
	tmpl.set(&mut p70, PropKind::FieldOfViewX, "FieldOfViewX", PropValue::F64(cam.angle_x_deg));
	tmpl.set(&mut p70, PropKind::FieldOfViewY, "FieldOfViewY", PropValue::F64(cam.angle_y_deg));
	tmpl.set(&mut p70, PropKind::Double, "FocalLength", PropValue::F64(cam.lens_mm));
	tmpl.set(&mut p70, PropKind::Double, "SafeAreaAspectRatio", PropValue::F64(aspect));

	tmpl.set(
		&mut p70,
		PropKind::Enum,
		"CameraProjectionType",
		PropValue::I32(i32::from(cam.ortho)),
	);
	tmpl.set(&mut p70, PropKind::Double, "OrthoZoom", PropValue::F64(cam.ortho_scale));

	tmpl.set(&mut p70, PropKind::Double, "NearPlane", PropValue::F64(cam.clip_start * gscale));
	tmpl.set(&mut p70, PropKind::Double, "FarPlane", PropValue::F64(cam.clip_end * gscale));
	// RelativeToCamera.
	tmpl.set(&mut p70, PropKind::Enum, "BackPlaneDistanceMode", PropValue::I32(1));
	tmpl.set(&mut p70, PropKind::Double, "BackPlaneDistance", PropValue::F64(cam.clip_end * gscale));
	tmpl.finalize(&mut p70);
	if ctx.settings.use_custom_props {
		custom_properties(&mut p70, &obj.custom_props);
	}

	let uid = ctx.uids.uid(&attribute_key(&obj.key));
	let attr = root.data_i64(&b"NodeAttribute"[..], uid);
	attr.add_string(name_class(&obj.name, b"NodeAttribute"));
	attr.add_string(&b"Camera"[..]);
	attr.push_child(p70);

	attr.data_str(&b"TypeFlags"[..], &b"Camera"[..]);
	attr.data_i32(&b"GeometryVersion"[..], ATTRIBUTE_GEOMETRY_VERSION);
	data_vec3(attr, b"Position", loc);
	data_vec3(attr, b"Up", up);
	data_vec3(attr, b"LookAt", to);
	attr.data_i32(&b"ShowInfoOnMoving"[..], 1);
	attr.data_i32(&b"ShowAudio"[..], 0);
	data_vec3(attr, b"AudioColor", [0.0, 1.0, 0.0]);
	attr.data_f64(&b"CameraOrthoZoom"[..], 1.0);
}

/// Write the `Model` block of one scene object.
pub fn model_elements(root: &mut Element, ctx: &mut AssemblerContext, obj_id: ObjectId) {
	let obj = &ctx.scene.objects[obj_id.0];
	let obj_type: &[u8] = match &obj.kind {
		ObjectKind::Empty | ObjectKind::Armature(_) => b"Null",
		ObjectKind::Mesh(_) => b"Mesh",
		ObjectKind::Light(_) => b"Light",
		ObjectKind::Camera(_) => b"Camera",
	};

	let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::Model);
	let mut p70 = Element::new(&b"Properties70"[..]);
	write_lcl_props(&mut tmpl, &mut p70, ctx, &obj.key, &obj.transform, obj.visible);
	if ctx.settings.use_custom_props {
		custom_properties(&mut p70, &obj.custom_props);
	}
	if matches!(obj.kind, ObjectKind::Camera(_)) {
		let scene = ctx.scene;
		tmpl.set(&mut p70, PropKind::Enum, "ResolutionMode", PropValue::I32(0));
		tmpl.set(&mut p70, PropKind::Double, "AspectW", PropValue::F64(f64::from(scene.resolution_x)));
		tmpl.set(&mut p70, PropKind::Double, "AspectH", PropValue::F64(f64::from(scene.resolution_y)));
		tmpl.set(&mut p70, PropKind::Bool, "ViewFrustum", PropValue::Bool(true));
		tmpl.set(&mut p70, PropKind::Enum, "BackgroundMode", PropValue::I32(0));
		tmpl.set(&mut p70, PropKind::Bool, "ForegroundTransparent", PropValue::Bool(true));
	}
	tmpl.finalize(&mut p70);

	let uid = ctx.uids.uid(&obj.key);
	let model = root.data_i64(&b"Model"[..], uid);
	model.add_string(name_class(&obj.name, b"Model"));
	model.add_string(obj_type);
	model.data_i32(&b"Version"[..], MODELS_VERSION);
	model.push_child(p70);
	model_extras(model);
}

/// Write one `Model` block per bone of an armature.
pub fn bone_model_elements(root: &mut Element, ctx: &mut AssemblerContext, arm_id: ObjectId) {
	let scene = ctx.scene;
	let ObjectKind::Armature(arm) = &scene.objects[arm_id.0].kind else {
		return;
	};

	for bone in &arm.bones {
		let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::Model);
		let mut p70 = Element::new(&b"Properties70"[..]);
		write_lcl_props(&mut tmpl, &mut p70, ctx, &bone.key, &bone.transform, true);
		tmpl.finalize(&mut p70);

		let uid = ctx.uids.uid(&bone.key);
		let model = root.data_i64(&b"Model"[..], uid);
		model.add_string(name_class(&bone.name, b"Model"));
		model.add_string(&b"LimbNode"[..]);
		model.data_i32(&b"Version"[..], MODELS_VERSION);
		model.push_child(p70);
		model_extras(model);
	}
}

/// The local transform properties shared by every model-like block.
fn write_lcl_props(
	tmpl: &mut TemplateProps,
	p70: &mut Element,
	ctx: &AssemblerContext,
	key: &str,
	transform: &crate::fbx::scene::Transform,
	visible: bool,
) {
	let animated = |prop: &str| ctx.animated.contains(&(key.to_owned(), prop.to_owned()));
	tmpl.set_animated(
		p70,
		PropKind::LclTranslation,
		"Lcl Translation",
		PropValue::Vec3(transform.translation),
		animated("Lcl Translation"),
	);
	tmpl.set_animated(
		p70,
		PropKind::LclRotation,
		"Lcl Rotation",
		PropValue::Vec3(transform.rotation_euler_deg),
		animated("Lcl Rotation"),
	);
	tmpl.set_animated(
		p70,
		PropKind::LclScaling,
		"Lcl Scaling",
		PropValue::Vec3(transform.scale),
		animated("Lcl Scaling"),
	);
	tmpl.set(p70, PropKind::Visibility, "Visibility", PropValue::F64(if visible { 1.0 } else { 0.0 }));
	// Defaults to an invalid -1 in the template; consumers want 0.
	tmpl.set(p70, PropKind::Integer, "DefaultAttributeIndex", PropValue::I32(0));
	// RSrs inheritance.
	tmpl.set(p70, PropKind::Enum, "InheritType", PropValue::I32(1));
}

/// Write the `Material` block of one material.
pub fn material_elements(root: &mut Element, ctx: &mut AssemblerContext, mat_id: MaterialId) {
	let scene = ctx.scene;
	let mat = &scene.materials[mat_id.0];

	let phong_bucket = |model: SpecularModel| matches!(model, SpecularModel::CookTorr | SpecularModel::Phong | SpecularModel::Blinn);
	let mat_type: &str = match &mat.surface {
		Some(surface) if !phong_bucket(surface.specular_model) => "Lambert",
		_ => "Phong",
	};

	let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::Material);
	let mut p70 = Element::new(&b"Properties70"[..]);
	if let Some(s) = &mat.surface {
		tmpl.set(&mut p70, PropKind::KString, "ShadingModel", PropValue::Str(mat_type.to_owned()));
		tmpl.set(&mut p70, PropKind::Color, "EmissiveColor", PropValue::Vec3(s.diffuse_color));
		tmpl.set(&mut p70, PropKind::Number, "EmissiveFactor", PropValue::F64(s.emit));
		tmpl.set(&mut p70, PropKind::Color, "AmbientColor", PropValue::Vec3(scene.ambient_color));
		tmpl.set(&mut p70, PropKind::Number, "AmbientFactor", PropValue::F64(s.ambient));
		tmpl.set(&mut p70, PropKind::Color, "DiffuseColor", PropValue::Vec3(s.diffuse_color));
		tmpl.set(&mut p70, PropKind::Number, "DiffuseFactor", PropValue::F64(s.diffuse_intensity));
		let transparent = if s.use_transparency { s.diffuse_color } else { [1.0; 3] };
		tmpl.set(&mut p70, PropKind::Color, "TransparentColor", PropValue::Vec3(transparent));
		tmpl.set(
			&mut p70,
			PropKind::Number,
			"TransparencyFactor",
			PropValue::F64(if s.use_transparency { 1.0 - s.alpha } else { 0.0 }),
		);
		tmpl.set(
			&mut p70,
			PropKind::Number,
			"Opacity",
			PropValue::F64(if s.use_transparency { s.alpha } else { 1.0 }),
		);
		tmpl.set(&mut p70, PropKind::Vector3D, "NormalMap", PropValue::Vec3([0.0; 3]));
		if mat_type == "Phong" {
			tmpl.set(&mut p70, PropKind::Color, "SpecularColor", PropValue::Vec3(s.specular_color));
			tmpl.set(&mut p70, PropKind::Number, "SpecularFactor", PropValue::F64(s.specular_intensity / 2.0));
			// Hardness to shininess, both exponent flavors.
			let shininess = (s.hardness - 1.0) / 5.10;
			tmpl.set(&mut p70, PropKind::Number, "Shininess", PropValue::F64(shininess));
			tmpl.set(&mut p70, PropKind::Number, "ShininessExponent", PropValue::F64(shininess));
			tmpl.set(&mut p70, PropKind::Color, "ReflectionColor", PropValue::Vec3(s.mirror_color));
			tmpl.set(
				&mut p70,
				PropKind::Number,
				"ReflectionFactor",
				PropValue::F64(if s.use_mirror { s.reflect_factor } else { 0.0 }),
			);
		}
	}
	tmpl.finalize(&mut p70);

	let uid = ctx.uids.uid(&mat.key);
	let fbx_mat = root.data_i64(&b"Material"[..], uid);
	fbx_mat.add_string(name_class(&mat.name, b"Material"));
	fbx_mat.add_string(&b""[..]);
	fbx_mat.data_i32(&b"Version"[..], MATERIAL_VERSION);
	fbx_mat.data_str(&b"ShadingModel"[..], mat_type.as_bytes().to_vec());
	fbx_mat.data_i32(&b"MultiLayer"[..], 0);
	fbx_mat.push_child(p70);
}

fn image_paths(img: &crate::fbx::scene::ImageData) -> (Vec<u8>, Vec<u8>) {
	let abs = img.path.to_string_lossy().into_owned().into_bytes();
	let rel = img
		.path
		.file_name()
		.map_or_else(Vec::new, |n| n.to_string_lossy().into_owned().into_bytes());
	(abs, rel)
}

/// Write the `Texture` block of one file texture.
pub fn texture_elements(root: &mut Element, ctx: &mut AssemblerContext, tex_id: TextureId) {
	let scene = ctx.scene;
	let tex = &scene.textures[tex_id.0];
	let img = &scene.images[tex.image.0];
	let (fname_abs, fname_rel) = image_paths(img);

	let alpha_source = if tex.use_alpha { 2 } else { 0 };
	let mapping = match tex.mapping {
		TextureMapping::Uv => 0,
		TextureMapping::Flat => 1,
		TextureMapping::Sphere => 2,
		TextureMapping::Tube => 3,
		TextureMapping::Cube => 4,
	};
	let wrap_mode = i32::from(tex.clamp);

	let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::TextureFile);
	let mut p70 = Element::new(&b"Properties70"[..]);
	tmpl.set(&mut p70, PropKind::Enum, "AlphaSource", PropValue::I32(alpha_source));
	tmpl.set(&mut p70, PropKind::Bool, "PremultiplyAlpha", PropValue::Bool(true));
	tmpl.set(&mut p70, PropKind::Enum, "CurrentMappingType", PropValue::I32(mapping));
	if tex.mapping == TextureMapping::Uv && !tex.uv_layer.is_empty() {
		tmpl.set(&mut p70, PropKind::KString, "UVSet", PropValue::Str(tex.uv_layer.clone()));
	}
	tmpl.set(&mut p70, PropKind::Enum, "WrapModeU", PropValue::I32(wrap_mode));
	tmpl.set(&mut p70, PropKind::Enum, "WrapModeV", PropValue::I32(wrap_mode));
	tmpl.set(&mut p70, PropKind::Vector3D, "Translation", PropValue::Vec3(tex.translation));
	tmpl.set(&mut p70, PropKind::Vector3D, "Scaling", PropValue::Vec3(tex.scale));
	tmpl.set(&mut p70, PropKind::Bool, "UseMaterial", PropValue::Bool(true));
	tmpl.set(&mut p70, PropKind::Bool, "UseMipMap", PropValue::Bool(true));
	tmpl.finalize(&mut p70);

	let uid = ctx.uids.uid(&tex.key);
	let fbx_tex = root.data_i64(&b"Texture"[..], uid);
	fbx_tex.add_string(name_class(&tex.name, b"Texture"));
	fbx_tex.add_string(&b""[..]);
	fbx_tex.data_str(&b"Type"[..], &b"TextureVideoClip"[..]);
	fbx_tex.data_i32(&b"Version"[..], TEXTURE_VERSION);
	fbx_tex.data_str(&b"TextureName"[..], name_class(&tex.name, b"Texture"));
	fbx_tex.data_str(&b"Media"[..], name_class(&img.name, b"Video"));
	fbx_tex.data_str(&b"FileName"[..], fname_abs);
	fbx_tex.data_str(&b"RelativeFilename"[..], fname_rel);
	fbx_tex.push_child(p70);
}

/// Write the `Video` clip block of one image, embedding its payload when
/// requested.
pub fn video_elements(root: &mut Element, ctx: &mut AssemblerContext, image_idx: usize) {
	let scene = ctx.scene;
	let img = &scene.images[image_idx];
	let (fname_abs, fname_rel) = image_paths(img);

	let mut tmpl = TemplateProps::init(&ctx.templates, TemplateId::Video);
	let mut p70 = Element::new(&b"Properties70"[..]);
	tmpl.set(
		&mut p70,
		PropKind::Url,
		"Path",
		PropValue::Str(String::from_utf8_lossy(&fname_abs).into_owned()),
	);
	tmpl.finalize(&mut p70);

	let uid = ctx.uids.uid(&img.key);
	let vid = root.data_i64(&b"Video"[..], uid);
	vid.add_string(name_class(&img.name, b"Video"));
	vid.add_string(&b"Clip"[..]);
	vid.data_str(&b"Type"[..], &b"Clip"[..]);
	vid.push_child(p70);
	vid.data_i32(&b"UseMipMap"[..], 0);
	vid.data_str(&b"Filename"[..], fname_abs);
	vid.data_str(&b"RelativeFilename"[..], fname_rel);

	if ctx.settings.embed_textures {
		embed_content(vid, ctx_embed(ctx, image_idx));
	}
}

enum EmbedPayload {
	Skip,
	Bytes(Vec<u8>),
	Warn(String),
}

// Splitting the borrow: the payload lookup reads scene and the dedup set, the
// warning append mutates the context afterwards.
fn ctx_embed(ctx: &mut AssemblerContext, image_idx: usize) -> EmbedPayload {
	let img = &ctx.scene.images[image_idx];
	if !ctx.embedded.insert(img.path.clone()) {
		return EmbedPayload::Skip;
	}
	if let Some(data) = &img.packed {
		return EmbedPayload::Bytes(data.clone());
	}
	match std::fs::read(&img.path) {
		Ok(data) => EmbedPayload::Bytes(data),
		Err(err) => {
			let path = img.path.display().to_string();
			let warning = format!("embedding file {path} failed ({err})");
			ctx.warnings.push(warning.clone());
			EmbedPayload::Warn(warning)
		}
	}
}

fn embed_content(vid: &mut Element, payload: EmbedPayload) {
	match payload {
		EmbedPayload::Skip => {}
		EmbedPayload::Bytes(data) => {
			vid.data_bytes(&b"Content"[..], data);
		}
		EmbedPayload::Warn(_) => {
			vid.data_bytes(&b"Content"[..], Vec::new());
		}
	}
}

#[cfg(test)]
mod tests;
