//! Error types for the codec, following the taxonomy in the design
//! documentation: structural problems are hard errors, while the decoder's
//! permissive recoveries (missing EOI, an out-of-range LZW code, an
//! extension with an unexpected fixed-length payload) are surfaced as flags
//! on the returned value instead, so callers can assert on them without the
//! whole parse aborting.

use thiserror::Error;

use crate::color::ColorTableError;
use crate::lzw::LzwError;

#[derive(Error, Debug)]
pub enum GifError {
	#[error("not a GIF file (expected GIF87a or GIF89a signature)")]
	NotGif,

	#[error("color table error")]
	ColorTable(#[from] ColorTableError),

	#[error("block descriptor does not reference an image")]
	NotAnImage,

	#[error("LZW encoding/decoding error")]
	Lzw(#[from] LzwError),

	#[error("argument out of range: {0}")]
	InvalidArgument(String),

	#[error("I/O error")]
	Io(#[from] std::io::Error),
}
