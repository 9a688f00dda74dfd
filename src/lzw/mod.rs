//! The GIF dialect of LZW (Lempel-Ziv-Welch) compression, built on top of
//! [`crate::bitstream`] (bit packing) and [`crate::subblock`] (the GIF
//! sub-block chunking scheme).
//!
//! Differences from textbook LZW, all mandated by the GIF format:
//!
//! * A dedicated clear code resets the dictionary (and may appear anywhere
//!   in the stream, not only at the start); a dedicated end-of-information
//!   code terminates it.
//! * Code width starts at `min_code_size + 1` bits and grows dynamically up
//!   to 12 bits as the dictionary fills.
//! * `min_code_size` (2..=8) both sets the number of initial singleton
//!   codes and is stored as the first byte of the LZW payload.

mod decoder;
mod encoder;

pub use decoder::{decode, DecodedLzw};
pub use encoder::{encode, EncoderOptions};

use thiserror::Error;

pub const MIN_CODE_SIZE: u8 = 2;
pub const MAX_CODE_SIZE: u8 = 8;
pub const MAX_TABLE_SIZE: usize = 4095;

#[derive(Error, Debug)]
pub enum LzwError {
	#[error("LZW payload is empty (missing minimum code size byte)")]
	EmptyPayload,

	#[error("LZW minimum code size {0} is out of the supported range [2, 8]")]
	InvalidMinCodeSize(u8),

	#[error("LZW encoder max code size {0} is out of the supported range [3, 12]")]
	InvalidMaxCodeSize(u8),
}

pub(crate) fn validate_min_code_size(min_code_size: u8) -> Result<(), LzwError> {
	if (MIN_CODE_SIZE..=MAX_CODE_SIZE).contains(&min_code_size) {
		Ok(())
	} else {
		Err(LzwError::InvalidMinCodeSize(min_code_size))
	}
}
