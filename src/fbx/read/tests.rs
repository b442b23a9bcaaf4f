use super::*;
use crate::fbx::FbxError;
use crate::fbx::property::EncodeOptions;
use crate::fbx::write::encode_bytes;

fn two_level_doc() -> Document {
	let mut doc = Document::new(7400);
	doc.root.child(&b"A"[..]).child(&b"B"[..]);
	doc
}

#[test]
fn magic_is_the_full_kaydara_string() {
	assert_eq!(MAGIC.len(), 23);
	assert_eq!(&MAGIC[..18], b"Kaydara FBX Binary");
	assert_eq!(&MAGIC[20..], b"\x00\x1a\x00");
}

#[test]
fn rejects_unknown_magic() {
	let err = parse_bytes(b"BLENDER-v500 not fbx").expect_err("non-fbx bytes should fail");
	assert!(matches!(err, FbxError::UnknownMagic { .. }));
}

#[test]
fn rejects_truncated_header() {
	let err = parse_bytes(&MAGIC[..10]).expect_err("short file should fail");
	assert!(matches!(err, FbxError::UnknownMagic { .. }));
}

#[test]
fn parses_version_without_body() {
	let mut bytes = MAGIC.to_vec();
	bytes.extend_from_slice(&7400_u32.to_le_bytes());
	assert_eq!(parse_version(&bytes).expect("header parses"), 7400);
}

#[test]
fn nested_elements_roundtrip() {
	let doc = two_level_doc();
	let bytes = encode_bytes(&doc, &EncodeOptions::default()).expect("encode succeeds");
	let back = parse_bytes(&bytes).expect("decode succeeds");
	assert_eq!(back, doc);
}

#[test]
fn corrupting_any_sentinel_byte_fails_decode() {
	let doc = two_level_doc();
	let bytes = encode_bytes(&doc, &EncodeOptions::default()).expect("encode succeeds");

	// Layout: 25-byte file header, element A spans [25, 79) with its child
	// sentinel occupying the final 13 bytes, [66, 79).
	for at in 66..79 {
		let mut corrupt = bytes.clone();
		corrupt[at] ^= 0xFF;
		let err = parse_bytes(&corrupt).expect_err("corrupt sentinel should fail");
		assert!(
			matches!(err, FbxError::SentinelMismatch { .. } | FbxError::ScopeLengthMismatch { .. }),
			"unexpected error at byte {at}: {err}"
		);
	}
}

#[test]
fn scope_length_mismatch_is_detected() {
	let doc = two_level_doc();
	let mut bytes = encode_bytes(&doc, &EncodeOptions::default()).expect("encode succeeds");

	// Shrink A's declared end offset by one byte.
	let end = u32::from_le_bytes([bytes[25], bytes[26], bytes[27], bytes[28]]);
	bytes[25..29].copy_from_slice(&(end - 1).to_le_bytes());

	let err = parse_bytes(&bytes).expect_err("bad end offset should fail");
	assert!(matches!(
		err,
		FbxError::ScopeLengthMismatch { .. } | FbxError::SentinelMismatch { .. }
	));
}

#[test]
fn trailing_footer_bytes_are_ignored() {
	let doc = two_level_doc();
	let mut bytes = encode_bytes(&doc, &EncodeOptions::default()).expect("encode succeeds");
	bytes.extend_from_slice(&[0xAB; 64]);

	let back = parse_bytes(&bytes).expect("decode succeeds with trailing junk");
	assert_eq!(back, doc);
}
