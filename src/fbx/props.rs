use crate::fbx::element::Element;

/// FBX property kinds, mapped to the `(type, label)` string pair written in
/// each `P` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
	/// `bool`, stored as int32 0/1.
	Bool,
	/// `int` / `Integer`.
	Integer,
	/// `enum`, stored as int32.
	Enum,
	/// `double` / `Number`, not animatable.
	Double,
	/// `double` / `Number`, animatable.
	Number,
	/// `KString`.
	KString,
	/// `KString` / `Url`.
	Url,
	/// `DateTime`.
	DateTime,
	/// `KTime` / `Time`, stored as int64.
	Timestamp,
	/// `ULongLong`, stored as int64.
	ULongLong,
	/// `object`, valueless.
	Object,
	/// `Compound`, valueless.
	Compound,
	/// `Color`, animatable triple.
	Color,
	/// `ColorRGB` / `Color` triple.
	ColorRgb,
	/// `Vector`, animatable triple.
	Vector,
	/// `Vector3D` / `Vector` triple.
	Vector3D,
	/// `Lcl Translation`, animatable triple.
	LclTranslation,
	/// `Lcl Rotation`, animatable triple.
	LclRotation,
	/// `Lcl Scaling`, animatable triple.
	LclScaling,
	/// `Visibility`, animatable scalar.
	Visibility,
	/// `Visibility Inheritance`, int32 flag.
	VisibilityInheritance,
	/// `Roll`, animatable scalar.
	Roll,
	/// `OpticalCenterX`, animatable scalar.
	OpticalCenterX,
	/// `OpticalCenterY`, animatable scalar.
	OpticalCenterY,
	/// `FieldOfView`, animatable scalar.
	FieldOfView,
	/// `FieldOfViewX`, animatable scalar.
	FieldOfViewX,
	/// `FieldOfViewY`, animatable scalar.
	FieldOfViewY,
}

impl PropKind {
	/// The `(type, label)` strings written after the property name.
	pub fn type_strings(self) -> (&'static [u8], &'static [u8]) {
		match self {
			Self::Bool => (b"bool", b""),
			Self::Integer => (b"int", b"Integer"),
			Self::Enum => (b"enum", b""),
			Self::Double | Self::Number => (b"double", b"Number"),
			Self::KString => (b"KString", b""),
			Self::Url => (b"KString", b"Url"),
			Self::DateTime => (b"DateTime", b""),
			Self::Timestamp => (b"KTime", b"Time"),
			Self::ULongLong => (b"ULongLong", b""),
			Self::Object => (b"object", b""),
			Self::Compound => (b"Compound", b""),
			Self::Color => (b"Color", b""),
			Self::ColorRgb => (b"ColorRGB", b"Color"),
			Self::Vector => (b"Vector", b""),
			Self::Vector3D => (b"Vector3D", b"Vector"),
			Self::LclTranslation => (b"Lcl Translation", b""),
			Self::LclRotation => (b"Lcl Rotation", b""),
			Self::LclScaling => (b"Lcl Scaling", b""),
			Self::Visibility => (b"Visibility", b""),
			Self::VisibilityInheritance => (b"Visibility Inheritance", b""),
			Self::Roll => (b"Roll", b""),
			Self::OpticalCenterX => (b"OpticalCenterX", b""),
			Self::OpticalCenterY => (b"OpticalCenterY", b""),
			Self::FieldOfView => (b"FieldOfView", b""),
			Self::FieldOfViewX => (b"FieldOfViewX", b""),
			Self::FieldOfViewY => (b"FieldOfViewY", b""),
		}
	}

	/// Whether curves may bind to properties of this kind.
	pub fn animatable(self) -> bool {
		matches!(
			self,
			Self::Number
				| Self::Color
				| Self::Vector
				| Self::LclTranslation
				| Self::LclRotation
				| Self::LclScaling
				| Self::Visibility
				| Self::Roll
				| Self::OpticalCenterX
				| Self::OpticalCenterY
				| Self::FieldOfView
				| Self::FieldOfViewX
				| Self::FieldOfViewY
		)
	}
}

/// A property value paired with the kinds above.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
	/// Boolean, serialized as int32.
	Bool(bool),
	/// 32-bit integer.
	I32(i32),
	/// 64-bit integer (timestamps).
	I64(i64),
	/// Scalar double.
	F64(f64),
	/// Double triple (colors, vectors, local transforms).
	Vec3([f64; 3]),
	/// String.
	Str(String),
	/// No value (object and compound properties).
	None,
}

/// Append the `Properties70` container to an element.
pub fn props70(elem: &mut Element) -> &mut Element {
	elem.child(&b"Properties70"[..])
}

/// Append one `P` record.
///
/// `animated` upgrades the animatable flag from `A` to `A+`; `user` marks a
/// provider-defined custom property with `U`.
pub fn prop_element(p70: &mut Element, name: &str, kind: PropKind, value: &PropValue, animated: bool, user: bool) {
	let (type_str, label) = kind.type_strings();

	let mut flags = Vec::new();
	if kind.animatable() {
		flags.push(b'A');
		if animated {
			flags.push(b'+');
		}
	}
	if user {
		flags.push(b'U');
	}

	let p = p70.child(&b"P"[..]);
	p.add_string(name.as_bytes().to_vec());
	p.add_string(type_str.to_vec());
	p.add_string(label.to_vec());
	p.add_string(flags);

	match value {
		PropValue::Bool(v) => {
			p.add_i32(i32::from(*v));
		}
		PropValue::I32(v) => {
			p.add_i32(*v);
		}
		PropValue::I64(v) => {
			p.add_i64(*v);
		}
		PropValue::F64(v) => {
			p.add_f64(*v);
		}
		PropValue::Vec3(v) => {
			p.add_f64(v[0]).add_f64(v[1]).add_f64(v[2]);
		}
		PropValue::Str(v) => {
			p.add_string(v.as_bytes().to_vec());
		}
		PropValue::None => {}
	}
}
