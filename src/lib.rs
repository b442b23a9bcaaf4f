//! FBX binary document tools: a bit-exact container codec, a lossless JSON
//! projection for debugging, and a scene-graph-to-document assembler.

/// FBX container codec, document assembler, and scene input model.
pub mod fbx;
