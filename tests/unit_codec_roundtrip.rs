#![allow(missing_docs)]

use fbxdoc::fbx::{Document, EncodeOptions, FbxError, encode_bytes, parse_bytes, parse_version};

fn sample_document() -> Document {
	let mut doc = Document::new(7400);

	let node = doc.root.child(&b"AllTypes"[..]);
	node.add_bool(true)
		.add_i16(-7)
		.add_i32(123_456)
		.add_i64(-9_000_000_000)
		.add_f32(1.5)
		.add_f64(-2.25)
		.add_string(&b"hello"[..])
		.add_bytes(vec![0x00, 0xff, 0x7f]);
	node.data_bool_array(&b"Bools"[..], vec![true, false, true]);
	node.data_i32_array(&b"Ints"[..], vec![-1, 0, 1]);
	node.data_i64_array(&b"Longs"[..], vec![i64::MIN, 0, i64::MAX]);
	node.data_f32_array(&b"Floats"[..], vec![0.5, -0.5]);
	node.data_f64_array(&b"Doubles"[..], vec![1.0, 2.0, 3.0]);

	let nested = doc.root.child(&b"Outer"[..]);
	nested.child(&b"Inner"[..]).add_i32(1);
	nested.child(&b"Inner"[..]).add_i32(2);

	doc
}

#[test]
fn documents_survive_a_write_read_cycle() {
	let doc = sample_document();
	let bytes = encode_bytes(&doc, &EncodeOptions::default()).expect("encode succeeds");
	let parsed = parse_bytes(&bytes).expect("parse succeeds");
	assert_eq!(parsed, doc);
}

#[test]
fn large_arrays_roundtrip_through_compression() {
	let mut doc = Document::new(7400);
	let values: Vec<f64> = (0..4096).map(|i| f64::from(i) * 0.25).collect();
	doc.root.data_f64_array(&b"Big"[..], values.clone());

	let opts = EncodeOptions::default();
	let bytes = encode_bytes(&doc, &opts).expect("encode succeeds");
	// 4096 doubles never fit uncompressed in this envelope.
	assert!(bytes.len() < values.len() * 8);

	let parsed = parse_bytes(&bytes).expect("parse succeeds");
	assert_eq!(parsed, doc);
}

#[test]
fn uncompressed_arrays_roundtrip_too() {
	let mut doc = Document::new(7400);
	doc.root.data_i64_array(&b"Big"[..], (0..1024).collect::<Vec<i64>>());

	let opts = EncodeOptions {
		compress_arrays: false,
		..EncodeOptions::default()
	};
	let bytes = encode_bytes(&doc, &opts).expect("encode succeeds");
	let parsed = parse_bytes(&bytes).expect("parse succeeds");
	assert_eq!(parsed, doc);
}

#[test]
fn version_reads_without_a_full_parse() {
	let doc = Document::new(7500);
	let bytes = encode_bytes(&doc, &EncodeOptions::default()).expect("encode succeeds");
	assert_eq!(parse_version(&bytes).expect("version parses"), 7500);
}

#[test]
fn foreign_bytes_are_rejected_by_magic() {
	let err = parse_bytes(b"Blender-v404RENDH...").expect_err("must fail");
	assert!(matches!(err, FbxError::UnknownMagic { .. }), "got {err:?}");
}

#[test]
fn truncated_files_fail_cleanly() {
	let doc = sample_document();
	let bytes = encode_bytes(&doc, &EncodeOptions::default()).expect("encode succeeds");
	let err = parse_bytes(&bytes[..bytes.len() / 2]).expect_err("must fail");
	assert!(matches!(err, FbxError::UnexpectedEof { .. } | FbxError::ScopeLengthMismatch { .. }), "got {err:?}");
}
