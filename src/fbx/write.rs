use std::fs;
use std::path::{Path, PathBuf};

use crate::fbx::Result;
use crate::fbx::element::Element;
use crate::fbx::property::{EncodeOptions, write_property};
use crate::fbx::read::{Document, MAGIC, SENTINEL_LENGTH};

#[cfg(test)]
mod tests;

/// Footer signature following the depth-0 sentinel.
const FOOTER_SIGNATURE: [u8; 4] = [0xFA, 0xBC, 0xAB, 0x09];

/// Serialize a whole document to bytes.
pub fn encode_bytes(doc: &Document, opts: &EncodeOptions) -> Result<Vec<u8>> {
	let mut out = Vec::new();
	out.extend_from_slice(MAGIC);
	out.extend_from_slice(&doc.version.to_le_bytes());

	for elem in doc.root.children() {
		write_element(&mut out, elem, opts)?;
	}
	out.extend_from_slice(&[0_u8; SENTINEL_LENGTH]);

	write_footer(&mut out);
	Ok(out)
}

/// Serialize a document and move it into place atomically.
///
/// The bytes land in a temporary sibling file first; the destination path is
/// only touched by the final rename, so a failed export never leaves a
/// partial file behind.
pub fn write_file(path: impl AsRef<Path>, doc: &Document, opts: &EncodeOptions) -> Result<()> {
	let path = path.as_ref();
	let bytes = encode_bytes(doc, opts)?;

	let tmp = temp_sibling(path);
	fs::write(&tmp, &bytes)?;
	if let Err(err) = fs::rename(&tmp, path) {
		let _ = fs::remove_file(&tmp);
		return Err(err.into());
	}

	Ok(())
}

/// Write one element with its children, then patch the three header fields
/// once their extents are known.
fn write_element(out: &mut Vec<u8>, elem: &Element, opts: &EncodeOptions) -> Result<()> {
	let header_at = out.len();
	// end_offset, prop_count, prop_section_len; patched below.
	out.extend_from_slice(&[0_u8; 12]);
	out.push(elem.id().len() as u8);
	out.extend_from_slice(elem.id());

	let props_at = out.len();
	for prop in elem.props() {
		write_property(out, prop, opts)?;
	}
	let props_len = (out.len() - props_at) as u32;

	for child in elem.children() {
		write_element(out, child, opts)?;
	}
	out.extend_from_slice(&[0_u8; SENTINEL_LENGTH]);

	let end_offset = out.len() as u32;
	out[header_at..header_at + 4].copy_from_slice(&end_offset.to_le_bytes());
	out[header_at + 4..header_at + 8].copy_from_slice(&(elem.props().len() as u32).to_le_bytes());
	out[header_at + 8..header_at + 12].copy_from_slice(&props_len.to_le_bytes());
	Ok(())
}

fn write_footer(out: &mut Vec<u8>) {
	out.extend_from_slice(&[0_u8; 20]);
	out.extend_from_slice(&FOOTER_SIGNATURE);

	let pad = (16 - out.len() % 16) % 16;
	out.resize(out.len() + pad, 0);
}

fn temp_sibling(path: &Path) -> PathBuf {
	let mut name = path.as_os_str().to_owned();
	name.push(".tmp");
	PathBuf::from(name)
}
