use std::path::PathBuf;

use super::*;
use crate::fbx::export::{ExportSettings, assemble};
use crate::fbx::property::Property;
use crate::fbx::scene::{
	ImageData, ImageId, LightData, MaterialData, Scene, SceneObject, SurfaceParams, TextureData, TextureSlot,
};

fn spot_light() -> LightData {
	LightData {
		kind: LightKind::Spot,
		color: [1.0, 0.5, 0.25],
		energy: 1.5,
		distance: 30.0,
		falloff: Falloff::InverseLinear,
		spot_size: std::f64::consts::FRAC_PI_2,
		spot_blend: 0.5,
		cast_shadow: true,
		shadow_color: [0.1, 0.1, 0.1],
	}
}

fn light_scene(light: LightData) -> Scene {
	let mut scene = Scene::new("test");
	let mut obj = SceneObject::empty("ob:lamp", "Lamp");
	obj.kind = ObjectKind::Light(light);
	scene.objects.push(obj);
	scene
}

fn surface() -> SurfaceParams {
	SurfaceParams {
		specular_model: SpecularModel::Phong,
		diffuse_color: [0.8, 0.2, 0.2],
		diffuse_intensity: 0.9,
		specular_color: [1.0; 3],
		specular_intensity: 0.6,
		hardness: 51.0,
		alpha: 1.0,
		use_transparency: false,
		emit: 0.0,
		ambient: 1.0,
		mirror_color: [1.0; 3],
		reflect_factor: 0.4,
		use_mirror: false,
	}
}

fn objects_of(scene: &Scene, settings: &ExportSettings) -> Element {
	let outcome = assemble(scene, settings, None);
	outcome.document.root.find(b"Objects").expect("Objects section").clone()
}

fn p_values(p70: &Element, name: &str) -> Vec<Property> {
	let p = p70
		.find_all(b"P")
		.find(|p| p.props()[0] == Property::String(name.as_bytes().to_vec()))
		.unwrap_or_else(|| panic!("no P record named {name}"));
	p.props()[4..].to_vec()
}

#[test]
fn channel_props_fan_out() {
	assert_eq!(map_channel_props(MapChannel::Color), &["DiffuseColor"]);
	assert_eq!(
		map_channel_props(MapChannel::Diffuse),
		&["DiffuseFactor", "TransparentColor", "EmissiveColor"]
	);
	assert_eq!(map_channel_props(MapChannel::Hardness), &["Shininess", "ShininessExponent"]);
}

#[test]
fn spot_light_angles_come_from_size_and_blend() {
	let objects = objects_of(&light_scene(spot_light()), &ExportSettings::default());
	let attr = objects.find(b"NodeAttribute").expect("light attribute");
	assert_eq!(attr.props()[2], Property::String(b"Light".to_vec()));
	let p70 = attr.find(b"Properties70").expect("Properties70");

	assert_eq!(p_values(p70, "LightType"), vec![Property::I32(2)]);
	assert_eq!(p_values(p70, "DecayType"), vec![Property::I32(1)]);
	assert_eq!(p_values(p70, "Intensity"), vec![Property::F64(150.0)]);
	let angle = |name: &str| match p_values(p70, name).as_slice() {
		[Property::F64(v)] => *v,
		other => panic!("unexpected {name}: {other:?}"),
	};
	assert!((angle("OuterAngle") - 90.0).abs() < 1e-9);
	assert!((angle("InnerAngle") - 45.0).abs() < 1e-9);
}

#[test]
fn hemi_lights_become_shadowless_directionals() {
	let mut light = spot_light();
	light.kind = LightKind::Hemi;
	let objects = objects_of(&light_scene(light), &ExportSettings::default());
	let p70 = objects
		.find(b"NodeAttribute")
		.and_then(|attr| attr.find(b"Properties70"))
		.expect("Properties70");

	assert_eq!(p_values(p70, "LightType"), vec![Property::I32(1)]);
	assert_eq!(p_values(p70, "DecayType"), vec![Property::I32(0)]);
	assert_eq!(p_values(p70, "CastShadows"), vec![Property::I32(0)]);
	// Black matches the template default, so the record is suppressed.
	assert!(
		!p70.find_all(b"P")
			.any(|p| p.props()[0] == Property::String(b"ShadowColor".to_vec()))
	);
}

#[test]
fn light_range_scales_with_the_global_scale() {
	let settings = ExportSettings {
		global_scale: 0.5,
		..ExportSettings::default()
	};
	let objects = objects_of(&light_scene(spot_light()), &settings);
	let p70 = objects
		.find(b"NodeAttribute")
		.and_then(|attr| attr.find(b"Properties70"))
		.expect("Properties70");
	assert_eq!(p_values(p70, "DecayStart"), vec![Property::F64(15.0)]);
}

#[test]
fn models_end_with_the_fixed_extras() {
	let mut scene = Scene::new("test");
	scene.objects.push(SceneObject::empty("ob:empty", "Empty"));
	let objects = objects_of(&scene, &ExportSettings::default());

	let model = objects.find(b"Model").expect("Model block");
	assert_eq!(model.props()[2], Property::String(b"Null".to_vec()));
	let tail: Vec<&[u8]> = model.children().iter().map(|c| c.id()).rev().take(4).collect();
	assert_eq!(tail, vec![&b"Culling"[..], &b"Shading"[..], &b"MultiTake"[..], &b"MultiLayer"[..]]);
}

#[test]
fn custom_properties_carry_the_user_flag() {
	let mut scene = Scene::new("test");
	let mut obj = SceneObject::empty("ob:empty", "Empty");
	obj.custom_props.push(("tag".to_owned(), CustomValue::Str("hero".to_owned())));
	obj.custom_props.push(("level".to_owned(), CustomValue::Int(3)));
	scene.objects.push(obj);

	let settings = ExportSettings {
		use_custom_props: true,
		..ExportSettings::default()
	};
	let objects = objects_of(&scene, &settings);
	let p70 = objects
		.find(b"Model")
		.and_then(|m| m.find(b"Properties70"))
		.expect("Properties70");

	let tag = p70
		.find_all(b"P")
		.find(|p| p.props()[0] == Property::String(b"tag".to_vec()))
		.expect("custom P record");
	assert_eq!(tag.props()[3], Property::String(b"U".to_vec()));
	assert_eq!(tag.props()[4], Property::String(b"hero".to_vec()));
	assert_eq!(p_values(p70, "level"), vec![Property::I32(3)]);
}

#[test]
fn phong_materials_get_the_specular_block() {
	let mut scene = Scene::new("test");
	scene.materials.push(MaterialData {
		key: "ma:red".to_owned(),
		name: "Red".to_owned(),
		surface: Some(surface()),
	});
	let mut obj = SceneObject::empty("ob:holder", "Holder");
	obj.materials.push(crate::fbx::scene::MaterialId(0));
	scene.objects.push(obj);

	let objects = objects_of(&scene, &ExportSettings::default());
	let mat = objects.find(b"Material").expect("Material block");
	let shading = mat.find(b"ShadingModel").expect("ShadingModel");
	assert_eq!(shading.props(), &[Property::String(b"Phong".to_vec())]);

	let p70 = mat.find(b"Properties70").expect("Properties70");
	assert_eq!(p_values(p70, "SpecularFactor"), vec![Property::F64(0.3)]);
	// Hardness 51 lands at (51 - 1) / 5.10.
	assert_eq!(p_values(p70, "ShininessExponent"), vec![Property::F64((51.0 - 1.0) / 5.10)]);
	assert_eq!(p_values(p70, "ReflectionFactor"), vec![Property::F64(0.0)]);
}

#[test]
fn unrecognized_specular_models_fall_back_to_lambert() {
	let mut params = surface();
	params.specular_model = SpecularModel::Toon;
	let mut scene = Scene::new("test");
	scene.materials.push(MaterialData {
		key: "ma:toon".to_owned(),
		name: "Toon".to_owned(),
		surface: Some(params),
	});
	let mut obj = SceneObject::empty("ob:holder", "Holder");
	obj.materials.push(crate::fbx::scene::MaterialId(0));
	scene.objects.push(obj);

	let objects = objects_of(&scene, &ExportSettings::default());
	let mat = objects.find(b"Material").expect("Material block");
	let shading = mat.find(b"ShadingModel").expect("ShadingModel");
	assert_eq!(shading.props(), &[Property::String(b"Lambert".to_vec())]);

	let p70 = mat.find(b"Properties70").expect("Properties70");
	assert!(
		!p70.find_all(b"P")
			.any(|p| p.props()[0] == Property::String(b"SpecularFactor".to_vec()))
	);
}

#[test]
fn transparency_splits_into_factor_and_opacity() {
	let mut params = surface();
	params.use_transparency = true;
	params.alpha = 0.25;
	let mut scene = Scene::new("test");
	scene.materials.push(MaterialData {
		key: "ma:glass".to_owned(),
		name: "Glass".to_owned(),
		surface: Some(params),
	});
	let mut obj = SceneObject::empty("ob:holder", "Holder");
	obj.materials.push(crate::fbx::scene::MaterialId(0));
	scene.objects.push(obj);

	let objects = objects_of(&scene, &ExportSettings::default());
	let p70 = objects
		.find(b"Material")
		.and_then(|m| m.find(b"Properties70"))
		.expect("Properties70");
	assert_eq!(p_values(p70, "TransparencyFactor"), vec![Property::F64(0.75)]);
	assert_eq!(p_values(p70, "Opacity"), vec![Property::F64(0.25)]);
}

#[test]
fn camera_attribute_interleaves_p70_and_legacy_fields() {
	let mut scene = Scene::new("test");
	let mut obj = SceneObject::empty("ob:cam", "Cam");
	obj.kind = ObjectKind::Camera(crate::fbx::scene::CameraData {
		lens_mm: 35.0,
		sensor_width_mm: 36.0,
		sensor_height_mm: 24.0,
		shift_x: 0.0,
		shift_y: 0.0,
		clip_start: 0.1,
		clip_end: 100.0,
		angle_x_deg: 54.4,
		angle_y_deg: 37.8,
		ortho: true,
		ortho_scale: 7.0,
	});
	scene.objects.push(obj);

	let objects = objects_of(&scene, &ExportSettings::default());
	let attr = objects.find(b"NodeAttribute").expect("camera attribute");
	assert_eq!(attr.props()[2], Property::String(b"Camera".to_vec()));

	// Properties70 leads, the flattened legacy fields follow.
	let ids: Vec<&[u8]> = attr.children().iter().map(|c| c.id()).take(3).collect();
	assert_eq!(ids, vec![&b"Properties70"[..], &b"TypeFlags"[..], &b"GeometryVersion"[..]]);
	assert!(attr.find(b"LookAt").is_some());

	let p70 = attr.find(b"Properties70").expect("Properties70");
	assert_eq!(p_values(p70, "FocalLength"), vec![Property::F64(35.0)]);
	assert_eq!(p_values(p70, "CameraProjectionType"), vec![Property::I32(1)]);
}

fn face_texture(key: &str, mapping: TextureMapping) -> TextureData {
	TextureData {
		key: key.to_owned(),
		name: "Face".to_owned(),
		image: ImageId(0),
		mapping,
		uv_layer: "UVMap".to_owned(),
		translation: [0.0; 3],
		scale: [1.0; 3],
		clamp: false,
		use_alpha: false,
		slots: vec![TextureSlot {
			material: MaterialId(0),
			influences: vec![MapChannel::Color],
		}],
	}
}

fn textured_scene(mapping: TextureMapping) -> Scene {
	let mut scene = Scene::new("test");
	scene.materials.push(MaterialData {
		key: "ma:skin".to_owned(),
		name: "Skin".to_owned(),
		surface: Some(surface()),
	});
	scene.images.push(ImageData {
		key: "im:face".to_owned(),
		name: "Face".to_owned(),
		path: PathBuf::from("/textures/face.png"),
		packed: None,
	});
	scene.textures.push(face_texture("tx:face", mapping));
	let mut obj = SceneObject::empty("ob:holder", "Holder");
	obj.materials.push(MaterialId(0));
	scene.objects.push(obj);
	scene
}

fn str_child(elem: &Element, id: &[u8]) -> Vec<u8> {
	match elem.find(id).map(|c| &c.props()[0]) {
		Some(Property::String(value)) => value.clone(),
		other => panic!("unexpected {}: {other:?}", String::from_utf8_lossy(id)),
	}
}

#[test]
fn textures_carry_their_mapping_and_file_names() {
	let mut scene = textured_scene(TextureMapping::Sphere);
	scene.textures[0].clamp = true;

	let objects = objects_of(&scene, &ExportSettings::default());
	let tex = objects.find(b"Texture").expect("Texture block");
	assert_eq!(str_child(tex, b"Type"), b"TextureVideoClip".to_vec());
	assert_eq!(str_child(tex, b"FileName"), b"/textures/face.png".to_vec());
	assert_eq!(str_child(tex, b"RelativeFilename"), b"face.png".to_vec());
	assert_eq!(str_child(tex, b"Media"), name_class("Face", b"Video"));

	let p70 = tex.find(b"Properties70").expect("Properties70");
	assert_eq!(p_values(p70, "CurrentMappingType"), vec![Property::I32(2)]);
	assert_eq!(p_values(p70, "WrapModeU"), vec![Property::I32(1)]);
	assert_eq!(p_values(p70, "WrapModeV"), vec![Property::I32(1)]);
	// Non-UV projections name no UV layer.
	assert!(!p70.find_all(b"P").any(|p| p.props()[0] == Property::String(b"UVSet".to_vec())));
}

#[test]
fn uv_textures_name_their_layer() {
	let objects = objects_of(&textured_scene(TextureMapping::Uv), &ExportSettings::default());
	let tex = objects.find(b"Texture").expect("Texture block");
	let p70 = tex.find(b"Properties70").expect("Properties70");
	assert_eq!(p_values(p70, "UVSet"), vec![Property::String(b"UVMap".to_vec())]);
	// UV mapping matches the template default, so the record is suppressed.
	assert!(
		!p70.find_all(b"P")
			.any(|p| p.props()[0] == Property::String(b"CurrentMappingType".to_vec()))
	);
}

#[test]
fn one_video_per_image_feeds_every_texture() {
	let mut scene = textured_scene(TextureMapping::Uv);
	scene.textures.push(face_texture("tx:face.001", TextureMapping::Flat));

	let outcome = assemble(&scene, &ExportSettings::default(), None);
	let objects = outcome.document.root.find(b"Objects").expect("Objects section");
	let tex_uids: Vec<i64> = objects
		.find_all(b"Texture")
		.map(|t| match t.props()[0] {
			Property::I64(uid) => uid,
			ref other => panic!("unexpected Texture uid: {other:?}"),
		})
		.collect();
	assert_eq!(tex_uids.len(), 2);
	let videos: Vec<_> = objects.find_all(b"Video").collect();
	assert_eq!(videos.len(), 1);
	let Property::I64(vid_uid) = videos[0].props()[0] else {
		panic!("unexpected Video uid: {:?}", videos[0].props());
	};

	let connections = outcome.document.root.find(b"Connections").expect("Connections section");
	for tex_uid in tex_uids {
		let feeds = connections.find_all(b"C").any(|c| {
			c.props().first() == Some(&Property::String(b"OO".to_vec()))
				&& c.props().get(1) == Some(&Property::I64(vid_uid))
				&& c.props().get(2) == Some(&Property::I64(tex_uid))
		});
		assert!(feeds, "video does not feed texture {tex_uid}");
	}
}

#[test]
fn texture_links_drive_the_mapped_material_props() {
	let mut scene = textured_scene(TextureMapping::Uv);
	// The repeated channel must not double its connections.
	scene.textures[0].slots[0].influences = vec![MapChannel::Color, MapChannel::Diffuse, MapChannel::Diffuse];

	let outcome = assemble(&scene, &ExportSettings::default(), None);
	let objects = outcome.document.root.find(b"Objects").expect("Objects section");
	let Property::I64(tex_uid) = objects.find(b"Texture").expect("Texture block").props()[0] else {
		panic!("Texture uid expected");
	};
	let Property::I64(mat_uid) = objects.find(b"Material").expect("Material block").props()[0] else {
		panic!("Material uid expected");
	};

	let connections = outcome.document.root.find(b"Connections").expect("Connections section");
	let mut driven: Vec<Vec<u8>> = connections
		.find_all(b"C")
		.filter(|c| {
			c.props().first() == Some(&Property::String(b"OP".to_vec()))
				&& c.props().get(1) == Some(&Property::I64(tex_uid))
				&& c.props().get(2) == Some(&Property::I64(mat_uid))
		})
		.map(|c| match c.props().get(3) {
			Some(Property::String(prop)) => prop.clone(),
			other => panic!("unexpected OP target: {other:?}"),
		})
		.collect();
	driven.sort();
	assert_eq!(
		driven,
		vec![
			b"DiffuseColor".to_vec(),
			b"DiffuseFactor".to_vec(),
			b"EmissiveColor".to_vec(),
			b"TransparentColor".to_vec(),
		]
	);
}

#[test]
fn uninfluential_textures_stay_out_of_the_document() {
	let mut scene = textured_scene(TextureMapping::Uv);
	scene.textures[0].slots[0].influences.clear();

	let objects = objects_of(&scene, &ExportSettings::default());
	assert!(objects.find(b"Texture").is_none());
	assert!(objects.find(b"Video").is_none());
}

#[test]
fn packed_images_embed_their_payload() {
	let mut scene = textured_scene(TextureMapping::Uv);
	scene.images[0].packed = Some(vec![0x89, b'P', b'N', b'G']);
	let settings = ExportSettings {
		embed_textures: true,
		..ExportSettings::default()
	};

	let outcome = assemble(&scene, &settings, None);
	let objects = outcome.document.root.find(b"Objects").expect("Objects section");
	let vid = objects.find(b"Video").expect("Video block");
	match vid.find(b"Content").map(|c| &c.props()[0]) {
		Some(Property::Bytes(data)) => assert_eq!(data, &vec![0x89, b'P', b'N', b'G']),
		other => panic!("unexpected Content: {other:?}"),
	}
	assert!(outcome.warnings.is_empty(), "warnings: {:?}", outcome.warnings);
}

#[test]
fn missing_image_files_warn_and_embed_nothing() {
	let mut scene = textured_scene(TextureMapping::Uv);
	scene.images[0].path = PathBuf::from("/nonexistent/face.png");
	let settings = ExportSettings {
		embed_textures: true,
		..ExportSettings::default()
	};

	let outcome = assemble(&scene, &settings, None);
	let objects = outcome.document.root.find(b"Objects").expect("Objects section");
	let vid = objects.find(b"Video").expect("Video block");
	match vid.find(b"Content").map(|c| &c.props()[0]) {
		Some(Property::Bytes(data)) => assert!(data.is_empty()),
		other => panic!("unexpected Content: {other:?}"),
	}
	assert!(
		outcome.warnings.iter().any(|w| w.contains("embedding file")),
		"warnings: {:?}",
		outcome.warnings
	);
}
