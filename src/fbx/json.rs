use serde_json::{Value, json};

use crate::fbx::element::Element;
use crate::fbx::property::Property;
use crate::fbx::read::Document;

/// Project a document as a JSON array of its top-level elements.
///
/// Each element renders as `[id, [properties], "type_tags", [children]]`.
/// The projection is for diffing and inspection; string properties have the
/// embedded name/class separator rewritten as `::`.
pub fn document_to_json(doc: &Document) -> Value {
	Value::Array(doc.root.children().iter().map(element_to_json).collect())
}

/// Project one element recursively.
pub fn element_to_json(elem: &Element) -> Value {
	let props: Vec<Value> = elem.props().iter().map(property_to_json).collect();
	let children: Vec<Value> = elem.children().iter().map(element_to_json).collect();
	let tags: String = elem.props_type().iter().map(|tag| char::from(*tag)).collect();

	json!([String::from_utf8_lossy(elem.id()), props, tags, children])
}

fn property_to_json(prop: &Property) -> Value {
	match prop {
		Property::Bool(v) => json!(v),
		Property::I16(v) => json!(v),
		Property::I32(v) => json!(v),
		Property::I64(v) => json!(v),
		Property::F32(v) => json!(v),
		Property::F64(v) => json!(v),
		Property::Bytes(v) => Value::String(escape_bytes(v)),
		Property::String(v) => Value::String(decode_string(v)),
		Property::BoolArray(v) => json!(v),
		Property::ByteArray(v) => json!(v),
		Property::I32Array(v) => json!(v),
		Property::I64Array(v) => json!(v),
		Property::F32Array(v) => json!(v),
		Property::F64Array(v) => json!(v),
	}
}

fn decode_string(bytes: &[u8]) -> String {
	String::from_utf8_lossy(bytes).replace("\u{0}\u{1}", "::")
}

fn escape_bytes(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len());
	for byte in bytes {
		if byte.is_ascii_graphic() || *byte == b' ' {
			out.push(char::from(*byte));
		} else {
			out.push_str(&format!("\\x{byte:02x}"));
		}
	}
	out
}
