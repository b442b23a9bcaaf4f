use crate::fbx::element::Element;

/// Connection kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
	/// `OO`, object to object.
	ObjectObject,
	/// `OP`, object to one named property of another object.
	ObjectProperty,
}

impl ConnectionKind {
	fn as_bytes(self) -> &'static [u8] {
		match self {
			Self::ObjectObject => b"OO",
			Self::ObjectProperty => b"OP",
		}
	}
}

/// One immutable edge of the connection graph, kept in emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
	/// Edge kind.
	pub kind: ConnectionKind,
	/// Source UID (the child side).
	pub src: i64,
	/// Destination UID; `0` is the implicit document root.
	pub dst: i64,
	/// Destination property name, for `OP` edges only.
	pub prop: Option<String>,
}

impl Connection {
	/// Build an `OO` edge.
	pub fn object(src: i64, dst: i64) -> Self {
		Self {
			kind: ConnectionKind::ObjectObject,
			src,
			dst,
			prop: None,
		}
	}

	/// Build an `OP` edge targeting a property.
	pub fn property(src: i64, dst: i64, prop: impl Into<String>) -> Self {
		Self {
			kind: ConnectionKind::ObjectProperty,
			src,
			dst,
			prop: Some(prop.into()),
		}
	}
}

/// Flatten the edge list into the `Connections` element.
pub fn connections_element(connections: &[Connection]) -> Element {
	let mut out = Element::new(&b"Connections"[..]);
	for conn in connections {
		let c = out.data_str(&b"C"[..], conn.kind.as_bytes());
		c.add_i64(conn.src).add_i64(conn.dst);
		if let Some(prop) = &conn.prop {
			c.add_string(prop.as_bytes().to_vec());
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fbx::property::Property;

	#[test]
	fn edges_flatten_in_order() {
		let edges = vec![
			Connection::object(11, 0),
			Connection::property(22, 33, "DiffuseColor"),
		];
		let elem = connections_element(&edges);

		let children: Vec<_> = elem.find_all(b"C").collect();
		assert_eq!(children.len(), 2);
		assert_eq!(
			children[0].props(),
			&[Property::String(b"OO".to_vec()), Property::I64(11), Property::I64(0)]
		);
		assert_eq!(
			children[1].props(),
			&[
				Property::String(b"OP".to_vec()),
				Property::I64(22),
				Property::I64(33),
				Property::String(b"DiffuseColor".to_vec()),
			]
		);
	}
}
