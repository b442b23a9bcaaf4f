use std::fs;
use std::path::Path;

use crate::fbx::bytes::Cursor;
use crate::fbx::element::Element;
use crate::fbx::property::read_property;
use crate::fbx::{FbxError, Result};

#[cfg(test)]
mod tests;

/// Fixed 23-byte file magic.
pub const MAGIC: &[u8; 23] = b"Kaydara FBX Binary  \x00\x1a\x00";

/// Zero bytes closing every element's child scope.
pub const SENTINEL_LENGTH: usize = 13;

/// A parsed or assembled document: format version plus an unnamed root
/// element whose children are the file's top-level elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
	/// Container format version, e.g. 7400.
	pub version: u32,
	/// Synthetic unnamed root; never serialized itself.
	pub root: Element,
}

impl Document {
	/// Create an empty document at the given format version.
	pub fn new(version: u32) -> Self {
		Self {
			version,
			root: Element::new(Vec::new()),
		}
	}
}

/// Read and parse a whole file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
	let bytes = fs::read(path)?;
	parse_bytes(&bytes)
}

/// Parse a document from memory.
///
/// Reads sibling elements at depth 0 until the zero-end-offset sentinel, then
/// ignores any trailing footer bytes.
pub fn parse_bytes(bytes: &[u8]) -> Result<Document> {
	let mut cursor = Cursor::new(bytes);
	let version = read_file_header(&mut cursor)?;

	let mut root = Element::new(Vec::new());
	while let Some(elem) = read_element(&mut cursor)? {
		root.push_child(elem);
	}

	Ok(Document { version, root })
}

/// Parse only the magic and version of a file.
pub fn parse_version(bytes: &[u8]) -> Result<u32> {
	let mut cursor = Cursor::new(bytes);
	read_file_header(&mut cursor)
}

fn read_file_header(cursor: &mut Cursor<'_>) -> Result<u32> {
	let head = first8(cursor.peek(8));
	if cursor.remaining() < MAGIC.len() {
		return Err(FbxError::UnknownMagic { magic: head });
	}

	let magic = cursor.read_exact(MAGIC.len())?;
	if magic != MAGIC {
		return Err(FbxError::UnknownMagic { magic: head });
	}

	cursor.read_u32_le()
}

fn read_element(cursor: &mut Cursor<'_>) -> Result<Option<Element>> {
	let end_offset = cursor.read_u32_le()? as usize;
	if end_offset == 0 {
		// End-of-siblings sentinel record, not an element.
		return Ok(None);
	}

	let prop_count = cursor.read_u32_le()? as usize;
	// Property section length is informational; property reads self-delimit.
	let _prop_len = cursor.read_u32_le()?;

	let id_len = cursor.read_u8()? as usize;
	let id = cursor.read_exact(id_len)?.to_vec();

	let mut elem = Element::new(id);
	for _ in 0..prop_count {
		elem.add(read_property(cursor)?);
	}

	if cursor.pos() < end_offset {
		while cursor.pos() < end_offset.saturating_sub(SENTINEL_LENGTH) {
			let Some(child) = read_element(cursor)? else {
				break;
			};
			elem.push_child(child);
		}

		let sentinel_at = cursor.pos();
		let sentinel = cursor.read_exact(SENTINEL_LENGTH)?;
		if sentinel.iter().any(|byte| *byte != 0) {
			return Err(FbxError::SentinelMismatch { at: sentinel_at });
		}
	}

	if cursor.pos() != end_offset {
		return Err(FbxError::ScopeLengthMismatch {
			at: cursor.pos(),
			expected: end_offset,
		});
	}

	Ok(Some(elem))
}

fn first8(bytes: &[u8]) -> [u8; 8] {
	let mut magic = [0_u8; 8];
	let take = bytes.len().min(8);
	magic[..take].copy_from_slice(&bytes[..take]);
	magic
}
