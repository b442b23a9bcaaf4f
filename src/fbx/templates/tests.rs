use super::*;
use crate::fbx::property::Property;

fn prop_names(p70: &Element) -> Vec<String> {
	p70.find_all(b"P")
		.map(|p| match &p.props()[0] {
			Property::String(name) => String::from_utf8_lossy(name).into_owned(),
			other => panic!("unexpected name property: {other:?}"),
		})
		.collect()
}

fn count_of(obj_type: &Element) -> i32 {
	match obj_type.find(b"Count").map(|c| &c.props()[0]) {
		Some(Property::I32(n)) => *n,
		other => panic!("unexpected Count: {other:?}"),
	}
}

#[test]
fn definitions_count_sums_all_users() {
	let mut reg = TemplateRegistry::new();
	reg.user(TemplateId::GlobalSettings);
	reg.add_users(TemplateId::Model, 3);
	reg.add_users(TemplateId::Geometry, 2);
	assert_eq!(reg.total_users(), 6);

	let defs = reg.definitions_element();
	let count = defs.find(b"Count").expect("Count child");
	assert_eq!(count.props(), &[Property::I32(6)]);
	assert_eq!(defs.find_all(b"ObjectType").count(), 3);
}

#[test]
fn node_attribute_subtypes_share_one_class() {
	let mut reg = TemplateRegistry::new();
	reg.user(TemplateId::Null);
	reg.add_users(TemplateId::Light, 2);

	let defs = reg.definitions_element();
	let classes: Vec<_> = defs.find_all(b"ObjectType").collect();
	assert_eq!(classes.len(), 1);
	assert_eq!(count_of(classes[0]), 3);
	// Two subtypes in play, so neither default table can go into the block.
	assert!(classes[0].find(b"PropertyTemplate").is_none());
	assert!(!reg.template_written(TemplateId::Null));
	assert!(!reg.template_written(TemplateId::Light));
}

#[test]
fn lone_subtype_template_is_written() {
	let mut reg = TemplateRegistry::new();
	reg.user(TemplateId::Light);
	assert!(reg.template_written(TemplateId::Light));

	let defs = reg.definitions_element();
	let obj_type = defs.find(b"ObjectType").expect("ObjectType child");
	let tmpl = obj_type.find(b"PropertyTemplate").expect("PropertyTemplate child");
	assert_eq!(tmpl.props(), &[Property::String(b"FbxLight".to_vec())]);
	let p70 = tmpl.find(b"Properties70").expect("Properties70 child");
	assert_eq!(p70.find_all(b"P").count(), TemplateId::Light.defaults().len());
}

#[test]
fn written_template_skips_matching_values() {
	let mut reg = TemplateRegistry::new();
	reg.user(TemplateId::Null);

	let mut elem = Element::new(&b"NodeAttribute"[..]);
	let mut tmpl = TemplateProps::init(&reg, TemplateId::Null);
	let p70 = props70(&mut elem);
	tmpl.set(p70, PropKind::Double, "Size", PropValue::F64(100.0));
	tmpl.set(p70, PropKind::Double, "Size", PropValue::F64(42.0));
	tmpl.finalize(p70);

	// The default-valued write is elided, the overriding one is kept, and
	// finalize adds nothing since the template is in Definitions.
	assert_eq!(prop_names(p70), vec!["Size".to_owned()]);
}

#[test]
fn unwritten_template_defaults_are_spelled_out() {
	let mut reg = TemplateRegistry::new();
	reg.user(TemplateId::Null);
	reg.user(TemplateId::Camera);

	let mut elem = Element::new(&b"NodeAttribute"[..]);
	let mut tmpl = TemplateProps::init(&reg, TemplateId::Null);
	let p70 = props70(&mut elem);
	tmpl.set(p70, PropKind::Double, "Size", PropValue::F64(100.0));
	tmpl.finalize(p70);

	assert_eq!(prop_names(p70), vec!["Size".to_owned(), "Color".to_owned(), "Look".to_owned()]);
}
