use crate::fbx::property::Property;

/// Separator between the name and class halves of an object-level id string.
pub const NAME_CLASS_SEP: &[u8] = b"\x00\x01";

/// Build a `name\x00\x01Class` string property value.
pub fn name_class(name: &str, class: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(name.len() + NAME_CLASS_SEP.len() + class.len());
	out.extend_from_slice(name.as_bytes());
	out.extend_from_slice(NAME_CLASS_SEP);
	out.extend_from_slice(class);
	out
}

/// One node of the document tree: a short byte-string tag, ordered typed
/// properties, and ordered children.
///
/// Insertion order of children is semantically meaningful and preserved
/// through the codec.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
	id: Vec<u8>,
	props: Vec<Property>,
	children: Vec<Element>,
}

impl Element {
	/// Create an empty element with the given tag.
	pub fn new(id: impl Into<Vec<u8>>) -> Self {
		Self {
			id: id.into(),
			props: Vec::new(),
			children: Vec::new(),
		}
	}

	/// Element tag bytes.
	pub fn id(&self) -> &[u8] {
		&self.id
	}

	/// Ordered property values.
	pub fn props(&self) -> &[Property] {
		&self.props
	}

	/// Ordered children.
	pub fn children(&self) -> &[Element] {
		&self.children
	}

	/// One type tag byte per property, in order.
	pub fn props_type(&self) -> Vec<u8> {
		self.props.iter().map(Property::type_tag).collect()
	}

	/// First child with the given tag.
	pub fn find(&self, id: &[u8]) -> Option<&Element> {
		self.children.iter().find(|child| child.id == id)
	}

	/// All children with the given tag.
	pub fn find_all<'a>(&'a self, id: &'a [u8]) -> impl Iterator<Item = &'a Element> {
		self.children.iter().filter(move |child| child.id == id)
	}

	/// Append a property value.
	pub fn add(&mut self, prop: Property) -> &mut Self {
		self.props.push(prop);
		self
	}

	/// Append a bool property.
	pub fn add_bool(&mut self, value: bool) -> &mut Self {
		self.add(Property::Bool(value))
	}

	/// Append an i16 property.
	pub fn add_i16(&mut self, value: i16) -> &mut Self {
		self.add(Property::I16(value))
	}

	/// Append an i32 property.
	pub fn add_i32(&mut self, value: i32) -> &mut Self {
		self.add(Property::I32(value))
	}

	/// Append an i64 property.
	pub fn add_i64(&mut self, value: i64) -> &mut Self {
		self.add(Property::I64(value))
	}

	/// Append an f32 property.
	pub fn add_f32(&mut self, value: f32) -> &mut Self {
		self.add(Property::F32(value))
	}

	/// Append an f64 property.
	pub fn add_f64(&mut self, value: f64) -> &mut Self {
		self.add(Property::F64(value))
	}

	/// Append a raw bytes property.
	pub fn add_bytes(&mut self, value: impl Into<Vec<u8>>) -> &mut Self {
		self.add(Property::Bytes(value.into()))
	}

	/// Append a string property.
	pub fn add_string(&mut self, value: impl Into<Vec<u8>>) -> &mut Self {
		self.add(Property::String(value.into()))
	}

	/// Append an i32 array property.
	pub fn add_i32_array(&mut self, value: impl Into<Vec<i32>>) -> &mut Self {
		self.add(Property::I32Array(value.into()))
	}

	/// Append an i64 array property.
	pub fn add_i64_array(&mut self, value: impl Into<Vec<i64>>) -> &mut Self {
		self.add(Property::I64Array(value.into()))
	}

	/// Append an f32 array property.
	pub fn add_f32_array(&mut self, value: impl Into<Vec<f32>>) -> &mut Self {
		self.add(Property::F32Array(value.into()))
	}

	/// Append an f64 array property.
	pub fn add_f64_array(&mut self, value: impl Into<Vec<f64>>) -> &mut Self {
		self.add(Property::F64Array(value.into()))
	}

	/// Append a bool array property.
	pub fn add_bool_array(&mut self, value: impl Into<Vec<bool>>) -> &mut Self {
		self.add(Property::BoolArray(value.into()))
	}

	/// Append a byte array property.
	pub fn add_byte_array(&mut self, value: impl Into<Vec<u8>>) -> &mut Self {
		self.add(Property::ByteArray(value.into()))
	}

	/// Append an already-built child.
	pub fn push_child(&mut self, child: Element) -> &mut Self {
		self.children.push(child);
		self
	}

	/// Append a new empty child and return it for further building.
	pub fn child(&mut self, id: impl Into<Vec<u8>>) -> &mut Element {
		self.children.push(Element::new(id));
		let last = self.children.len() - 1;
		&mut self.children[last]
	}

	/// Append a child holding a single bool property.
	pub fn data_bool(&mut self, id: impl Into<Vec<u8>>, value: bool) -> &mut Element {
		let child = self.child(id);
		child.add_bool(value);
		child
	}

	/// Append a child holding a single i32 property.
	pub fn data_i32(&mut self, id: impl Into<Vec<u8>>, value: i32) -> &mut Element {
		let child = self.child(id);
		child.add_i32(value);
		child
	}

	/// Append a child holding a single i64 property.
	pub fn data_i64(&mut self, id: impl Into<Vec<u8>>, value: i64) -> &mut Element {
		let child = self.child(id);
		child.add_i64(value);
		child
	}

	/// Append a child holding a single f64 property.
	pub fn data_f64(&mut self, id: impl Into<Vec<u8>>, value: f64) -> &mut Element {
		let child = self.child(id);
		child.add_f64(value);
		child
	}

	/// Append a child holding a single string property.
	pub fn data_str(&mut self, id: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> &mut Element {
		let child = self.child(id);
		child.add_string(value);
		child
	}

	/// Append a child holding a single raw bytes property.
	pub fn data_bytes(&mut self, id: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> &mut Element {
		let child = self.child(id);
		child.add_bytes(value);
		child
	}

	/// Append a child holding a single i32 array property.
	pub fn data_i32_array(&mut self, id: impl Into<Vec<u8>>, value: impl Into<Vec<i32>>) -> &mut Element {
		let child = self.child(id);
		child.add_i32_array(value);
		child
	}

	/// Append a child holding a single i64 array property.
	pub fn data_i64_array(&mut self, id: impl Into<Vec<u8>>, value: impl Into<Vec<i64>>) -> &mut Element {
		let child = self.child(id);
		child.add_i64_array(value);
		child
	}

	/// Append a child holding a single f32 array property.
	pub fn data_f32_array(&mut self, id: impl Into<Vec<u8>>, value: impl Into<Vec<f32>>) -> &mut Element {
		let child = self.child(id);
		child.add_f32_array(value);
		child
	}

	/// Append a child holding a single f64 array property.
	pub fn data_f64_array(&mut self, id: impl Into<Vec<u8>>, value: impl Into<Vec<f64>>) -> &mut Element {
		let child = self.child(id);
		child.add_f64_array(value);
		child
	}

	/// Append a child holding a single bool array property.
	pub fn data_bool_array(&mut self, id: impl Into<Vec<u8>>, value: impl Into<Vec<bool>>) -> &mut Element {
		let child = self.child(id);
		child.add_bool_array(value);
		child
	}
}
