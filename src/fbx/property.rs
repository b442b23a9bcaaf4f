use std::io::{Read, Write};

use crate::fbx::bytes::Cursor;
use crate::fbx::{FbxError, Result};


const MAX_DECOMPRESSED_BYTES: usize = 512 * 1024 * 1024;

const ENCODING_RAW: u32 = 0;
const ENCODING_ZLIB: u32 = 1;

/// Options controlling how array properties are serialized.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
	/// Compress array payloads with zlib when they are large enough.
	pub compress_arrays: bool,
	/// Minimum raw payload size in bytes before compression is attempted.
	pub compression_threshold: usize,
	/// zlib compression level (0-9).
	pub compression_level: u32,
}

impl Default for EncodeOptions {
	fn default() -> Self {
		Self {
			compress_arrays: true,
			compression_threshold: 128,
			compression_level: 6,
		}
	}
}

/// One typed property value of an element.
///
/// The variants map one-to-one onto the format's 14 type tags: scalar tags
/// `Y C I F D L R S` and array tags `f i d l b c`.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
	/// `C`: single byte, nonzero means true.
	Bool(bool),
	/// `Y`: 16-bit signed integer.
	I16(i16),
	/// `I`: 32-bit signed integer.
	I32(i32),
	/// `L`: 64-bit signed integer.
	I64(i64),
	/// `F`: 32-bit float.
	F32(f32),
	/// `D`: 64-bit float.
	F64(f64),
	/// `R`: length-prefixed raw bytes.
	Bytes(Vec<u8>),
	/// `S`: length-prefixed string, may embed `\x00\x01` name/class pairs.
	String(Vec<u8>),
	/// `b`: bool array.
	BoolArray(Vec<bool>),
	/// `c`: byte array.
	ByteArray(Vec<u8>),
	/// `i`: 32-bit signed integer array.
	I32Array(Vec<i32>),
	/// `l`: 64-bit signed integer array.
	I64Array(Vec<i64>),
	/// `f`: 32-bit float array.
	F32Array(Vec<f32>),
	/// `d`: 64-bit float array.
	F64Array(Vec<f64>),
}

impl Property {
	/// Return the one-byte type tag for this value.
	pub fn type_tag(&self) -> u8 {
		match self {
			Self::Bool(_) => b'C',
			Self::I16(_) => b'Y',
			Self::I32(_) => b'I',
			Self::I64(_) => b'L',
			Self::F32(_) => b'F',
			Self::F64(_) => b'D',
			Self::Bytes(_) => b'R',
			Self::String(_) => b'S',
			Self::BoolArray(_) => b'b',
			Self::ByteArray(_) => b'c',
			Self::I32Array(_) => b'i',
			Self::I64Array(_) => b'l',
			Self::F32Array(_) => b'f',
			Self::F64Array(_) => b'd',
		}
	}
}

/// Read one tag byte plus its value.
pub fn read_property(cursor: &mut Cursor<'_>) -> Result<Property> {
	let tag_at = cursor.pos();
	let tag = cursor.read_u8()?;

	match tag {
		b'C' => Ok(Property::Bool(cursor.read_u8()? != 0)),
		b'Y' => Ok(Property::I16(cursor.read_i16_le()?)),
		b'I' => Ok(Property::I32(cursor.read_i32_le()?)),
		b'L' => Ok(Property::I64(cursor.read_i64_le()?)),
		b'F' => Ok(Property::F32(cursor.read_f32_le()?)),
		b'D' => Ok(Property::F64(cursor.read_f64_le()?)),
		b'R' => {
			let len = cursor.read_u32_le()? as usize;
			Ok(Property::Bytes(cursor.read_exact(len)?.to_vec()))
		}
		b'S' => {
			let len = cursor.read_u32_le()? as usize;
			Ok(Property::String(cursor.read_exact(len)?.to_vec()))
		}
		b'b' => {
			let raw = read_array_payload(cursor, 1)?;
			Ok(Property::BoolArray(raw.iter().map(|byte| *byte != 0).collect()))
		}
		b'c' => Ok(Property::ByteArray(read_array_payload(cursor, 1)?)),
		b'i' => {
			let raw = read_array_payload(cursor, 4)?;
			Ok(Property::I32Array(chunks4(&raw).map(i32::from_le_bytes).collect()))
		}
		b'l' => {
			let raw = read_array_payload(cursor, 8)?;
			Ok(Property::I64Array(chunks8(&raw).map(i64::from_le_bytes).collect()))
		}
		b'f' => {
			let raw = read_array_payload(cursor, 4)?;
			Ok(Property::F32Array(chunks4(&raw).map(f32::from_le_bytes).collect()))
		}
		b'd' => {
			let raw = read_array_payload(cursor, 8)?;
			Ok(Property::F64Array(chunks8(&raw).map(f64::from_le_bytes).collect()))
		}
		_ => Err(FbxError::UnknownPropertyType { tag, at: tag_at }),
	}
}

/// Append one tag byte plus its value to `out`.
pub fn write_property(out: &mut Vec<u8>, prop: &Property, opts: &EncodeOptions) -> Result<()> {
	out.push(prop.type_tag());

	match prop {
		Property::Bool(v) => out.push(u8::from(*v)),
		Property::I16(v) => out.extend_from_slice(&v.to_le_bytes()),
		Property::I32(v) => out.extend_from_slice(&v.to_le_bytes()),
		Property::I64(v) => out.extend_from_slice(&v.to_le_bytes()),
		Property::F32(v) => out.extend_from_slice(&v.to_le_bytes()),
		Property::F64(v) => out.extend_from_slice(&v.to_le_bytes()),
		Property::Bytes(v) | Property::String(v) => {
			out.extend_from_slice(&(v.len() as u32).to_le_bytes());
			out.extend_from_slice(v);
		}
		Property::BoolArray(v) => {
			let raw: Vec<u8> = v.iter().map(|item| u8::from(*item)).collect();
			write_array_payload(out, v.len(), &raw, opts)?;
		}
		Property::ByteArray(v) => write_array_payload(out, v.len(), v, opts)?,
		Property::I32Array(v) => {
			let raw = le_bytes(v.iter().map(|item| item.to_le_bytes()), 4);
			write_array_payload(out, v.len(), &raw, opts)?;
		}
		Property::I64Array(v) => {
			let raw = le_bytes(v.iter().map(|item| item.to_le_bytes()), 8);
			write_array_payload(out, v.len(), &raw, opts)?;
		}
		Property::F32Array(v) => {
			let raw = le_bytes(v.iter().map(|item| item.to_le_bytes()), 4);
			write_array_payload(out, v.len(), &raw, opts)?;
		}
		Property::F64Array(v) => {
			let raw = le_bytes(v.iter().map(|item| item.to_le_bytes()), 8);
			write_array_payload(out, v.len(), &raw, opts)?;
		}
	}

	Ok(())
}

/// Read the `(count, encoding, byte_length)` array header and return the raw
/// little-endian payload, decompressed if needed and length-validated.
fn read_array_payload(cursor: &mut Cursor<'_>, stride: usize) -> Result<Vec<u8>> {
	let header_at = cursor.pos();
	let count = cursor.read_u32_le()? as usize;
	let encoding = cursor.read_u32_le()?;
	let byte_len = cursor.read_u32_le()? as usize;

	let payload_at = cursor.pos();
	let stored = cursor.read_exact(byte_len)?;

	let raw = match encoding {
		ENCODING_RAW => stored.to_vec(),
		ENCODING_ZLIB => decompress_zlib(stored, payload_at)?,
		_ => {
			return Err(FbxError::UnknownArrayEncoding {
				encoding,
				at: header_at,
			});
		}
	};

	if raw.len() != count * stride {
		return Err(FbxError::ArrayLengthMismatch {
			count,
			stride,
			len: raw.len(),
		});
	}

	Ok(raw)
}

/// Emit the array header plus payload, compressing when it pays off.
fn write_array_payload(out: &mut Vec<u8>, count: usize, raw: &[u8], opts: &EncodeOptions) -> Result<()> {
	out.extend_from_slice(&(count as u32).to_le_bytes());

	if opts.compress_arrays && raw.len() >= opts.compression_threshold {
		let compressed = compress_zlib(raw, opts.compression_level)?;
		if compressed.len() < raw.len() {
			out.extend_from_slice(&ENCODING_ZLIB.to_le_bytes());
			out.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
			out.extend_from_slice(&compressed);
			return Ok(());
		}
	}

	out.extend_from_slice(&ENCODING_RAW.to_le_bytes());
	out.extend_from_slice(&(raw.len() as u32).to_le_bytes());
	out.extend_from_slice(raw);
	Ok(())
}

fn decompress_zlib(stored: &[u8], at: usize) -> Result<Vec<u8>> {
	let mut decoder = flate2::read::ZlibDecoder::new(stored);
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf).map_err(|_| FbxError::Decompress { at })?;
		if read == 0 {
			break;
		}

		if out.len() + read > MAX_DECOMPRESSED_BYTES {
			return Err(FbxError::DecompressedTooLarge { limit: MAX_DECOMPRESSED_BYTES });
		}

		out.extend_from_slice(&buf[..read]);
	}

	Ok(out)
}

fn compress_zlib(raw: &[u8], level: u32) -> Result<Vec<u8>> {
	let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::new(level));
	encoder.write_all(raw)?;
	Ok(encoder.finish()?)
}

fn le_bytes<const N: usize>(chunks: impl Iterator<Item = [u8; N]>, stride: usize) -> Vec<u8> {
	let mut out = Vec::with_capacity(chunks.size_hint().0 * stride);
	for chunk in chunks {
		out.extend_from_slice(&chunk);
	}
	out
}

fn chunks4(raw: &[u8]) -> impl Iterator<Item = [u8; 4]> + '_ {
	raw.chunks_exact(4).map(|chunk| {
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(chunk);
		buf
	})
}

fn chunks8(raw: &[u8]) -> impl Iterator<Item = [u8; 8]> + '_ {
	raw.chunks_exact(8).map(|chunk| {
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(chunk);
		buf
	})
}
