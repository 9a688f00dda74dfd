//! The GIF header and logical screen descriptor: the fixed-size preamble
//! that precedes every block-structured body.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::color::ColorTable;
use crate::error::GifError;

pub const SIGNATURE_87A: &[u8; 6] = b"GIF87a";
pub const SIGNATURE_89A: &[u8; 6] = b"GIF89a";

/// Which version magic to emit. Decoding accepts either; this only matters
/// to the encoder, since a handful of extensions (graphic control,
/// application) are technically 89a-only.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GifVersion {
	Gif87a,
	Gif89a,
}

impl GifVersion {
	pub(crate) fn signature(self) -> &'static [u8; 6] {
		match self {
			GifVersion::Gif87a => SIGNATURE_87A,
			GifVersion::Gif89a => SIGNATURE_89A,
		}
	}

	pub(crate) fn from_signature(bytes: &[u8]) -> Result<Self, GifError> {
		if bytes == SIGNATURE_87A {
			Ok(GifVersion::Gif87a)
		} else if bytes == SIGNATURE_89A {
			Ok(GifVersion::Gif89a)
		} else {
			Err(GifError::NotGif)
		}
	}
}

/// The canvas every frame is composited onto, described once at the start
/// of the file. Created when the screen descriptor is parsed; never
/// mutated afterward.
#[derive(Debug, Clone)]
pub struct LogicalScreen {
	pub width: u16,
	pub height: u16,
	/// The color depth (in bits) the original image was authored at,
	/// independent of the global color table's actual size.
	pub original_depth: u8,
	pub background_index: u8,
	pub pixel_aspect_ratio: u8,
	pub global_color_table: Option<ColorTable>,
	pub color_table_sorted: bool,
}

impl LogicalScreen {
	pub(crate) fn read_descriptor<T: ReadBytesExt>(reader: &mut T) -> Result<(u16, u16, u8, u8, u8), std::io::Error> {
		let width = reader.read_u16::<LittleEndian>()?;
		let height = reader.read_u16::<LittleEndian>()?;
		let packed = reader.read_u8()?;
		let background_index = reader.read_u8()?;
		let pixel_aspect_ratio = reader.read_u8()?;
		Ok((width, height, packed, background_index, pixel_aspect_ratio))
	}

	pub(crate) fn has_global_color_table(packed: u8) -> bool {
		packed & 0b1000_0000 != 0
	}

	pub(crate) fn original_depth_from_packed(packed: u8) -> u8 {
		((packed & 0b0111_0000) >> 4) + 1
	}

	pub(crate) fn is_sorted(packed: u8) -> bool {
		packed & 0b0000_1000 != 0
	}

	pub(crate) fn global_color_table_len(packed: u8) -> usize {
		1usize << ((packed & 0b0000_0111) + 1)
	}

	pub(crate) fn write_descriptor<T: WriteBytesExt>(
		writer: &mut T,
		width: u16,
		height: u16,
		has_gct: bool,
		gct_size_bits: u8,
		original_depth: u8,
		sorted: bool,
		background_index: u8,
		pixel_aspect_ratio: u8,
	) -> Result<(), GifError> {
		if !(1..=8).contains(&original_depth) {
			return Err(GifError::InvalidArgument(format!("original_depth {} out of range [1, 8]", original_depth)));
		}
		let mut packed = 0u8;
		if has_gct {
			packed |= 0b1000_0000;
		}
		packed |= (original_depth - 1) << 4;
		if sorted {
			packed |= 0b0000_1000;
		}
		packed |= gct_size_bits & 0b0000_0111;

		writer.write_u16::<LittleEndian>(width)?;
		writer.write_u16::<LittleEndian>(height)?;
		writer.write_u8(packed)?;
		writer.write_u8(background_index)?;
		writer.write_u8(pixel_aspect_ratio)?;
		Ok(())
	}
}
