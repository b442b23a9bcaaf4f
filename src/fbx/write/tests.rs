use super::*;
use crate::fbx::read::parse_bytes;

#[test]
fn childless_element_still_carries_sentinel() {
	let mut doc = Document::new(7400);
	doc.root.data_i32(&b"V"[..], 232);

	let bytes = encode_bytes(&doc, &EncodeOptions::default()).expect("encode succeeds");

	// Element V: 12-byte header, 1-byte id length, "V", tagged i32, sentinel.
	let elem = &bytes[25..25 + 32];
	assert_eq!(&elem[32 - SENTINEL_LENGTH..], [0_u8; SENTINEL_LENGTH]);

	let end = u32::from_le_bytes([elem[0], elem[1], elem[2], elem[3]]);
	assert_eq!(end as usize, 25 + 32, "end offset is absolute");
	assert_eq!(parse_bytes(&bytes).expect("roundtrip"), doc);
}

#[test]
fn header_fields_are_patched() {
	let mut doc = Document::new(7400);
	let elem = doc.root.child(&b"AB"[..]);
	elem.add_i64(9);
	elem.add_string(&b"xyz"[..]);

	let bytes = encode_bytes(&doc, &EncodeOptions::default()).expect("encode succeeds");

	let prop_count = u32::from_le_bytes([bytes[29], bytes[30], bytes[31], bytes[32]]);
	let props_len = u32::from_le_bytes([bytes[33], bytes[34], bytes[35], bytes[36]]);
	assert_eq!(prop_count, 2);
	// L + 8 bytes, S + 4-byte length + 3 bytes.
	assert_eq!(props_len, 9 + 8);
}

#[test]
fn output_is_footer_aligned() {
	let mut doc = Document::new(7400);
	doc.root.child(&b"Objects"[..]);

	let bytes = encode_bytes(&doc, &EncodeOptions::default()).expect("encode succeeds");
	assert_eq!(bytes.len() % 16, 0, "footer pads to a 16-byte boundary");
	// Element "Objects" spans 33 bytes; the depth-0 sentinel follows.
	assert_eq!(bytes[58..71], [0_u8; SENTINEL_LENGTH]);
}

#[test]
fn write_file_replaces_destination_atomically() {
	let dir = std::env::temp_dir().join("fbxdoc-write-test");
	std::fs::create_dir_all(&dir).expect("temp dir");
	let path = dir.join("out.fbx");

	let mut doc = Document::new(7400);
	doc.root.child(&b"Objects"[..]);
	write_file(&path, &doc, &EncodeOptions::default()).expect("write succeeds");

	assert!(!temp_sibling(&path).exists(), "temp file is renamed away");
	let back = crate::fbx::read::parse_file(&path).expect("written file parses");
	assert_eq!(back, doc);

	let _ = std::fs::remove_file(&path);
}
