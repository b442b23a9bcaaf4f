use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, FbxError>;

/// Errors produced while reading, writing, and assembling FBX binary data.
#[derive(Debug, Error)]
pub enum FbxError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Leading bytes are not the FBX binary magic.
	#[error("not a binary FBX file (magic={magic:?})")]
	UnknownMagic {
		/// First up-to-8 bytes of the stream.
		magic: [u8; 8],
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Property type tag byte is not one of the 14 known codes.
	#[error("unknown property type tag 0x{tag:02x} at offset {at}")]
	UnknownPropertyType {
		/// Offending tag byte.
		tag: u8,
		/// Cursor offset of the tag.
		at: usize,
	},
	/// Array encoding flag is neither raw (0) nor zlib (1).
	#[error("unknown array encoding {encoding} at offset {at}")]
	UnknownArrayEncoding {
		/// Parsed encoding flag.
		encoding: u32,
		/// Cursor offset of the array header.
		at: usize,
	},
	/// Array payload length does not match the declared element count.
	#[error("array length mismatch: count={count}, stride={stride}, payload={len}")]
	ArrayLengthMismatch {
		/// Declared element count.
		count: usize,
		/// Byte stride of one element.
		stride: usize,
		/// Decoded payload length in bytes.
		len: usize,
	},
	/// zlib stream failed to decompress.
	#[error("zlib decompression failed at offset {at}")]
	Decompress {
		/// Cursor offset of the compressed payload.
		at: usize,
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Block sentinel bytes after a child list were not all zero.
	#[error("corrupt nested block: nonzero sentinel at offset {at}")]
	SentinelMismatch {
		/// File offset of the first sentinel byte.
		at: usize,
	},
	/// Cursor did not land exactly on the element's declared end offset.
	#[error("scope length mismatch: cursor at {at}, element ends at {expected}")]
	ScopeLengthMismatch {
		/// Actual cursor offset after reading the element.
		at: usize,
		/// Declared end offset.
		expected: usize,
	},
}
