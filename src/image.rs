//! Image descriptor parsing/serialization and the interlace row ordering.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::color::ColorTable;
use crate::error::GifError;

/// The fixed 9-byte record following an image block's `0x2C` introducer,
/// plus whatever local color table it carries. The actual pixel data is
/// decoded separately (see [`crate::decoder::Decoder::decode_image`]) since
/// doing so requires running the LZW codec over the block's sub-blocks.
#[derive(Debug, Clone)]
pub struct ImageFrame {
	pub left: u16,
	pub top: u16,
	pub width: u16,
	pub height: u16,
	pub interlaced: bool,
	pub local_color_table: Option<ColorTable>,
	pub lzw_min_code_size: u8,
}

impl ImageFrame {
	pub(crate) fn read_descriptor<T: ReadBytesExt>(reader: &mut T) -> Result<(u16, u16, u16, u16, u8), std::io::Error> {
		let left = reader.read_u16::<LittleEndian>()?;
		let top = reader.read_u16::<LittleEndian>()?;
		let width = reader.read_u16::<LittleEndian>()?;
		let height = reader.read_u16::<LittleEndian>()?;
		let packed = reader.read_u8()?;
		Ok((left, top, width, height, packed))
	}

	pub(crate) fn has_local_color_table(packed: u8) -> bool {
		packed & 0b1000_0000 != 0
	}

	pub(crate) fn is_interlaced(packed: u8) -> bool {
		packed & 0b0100_0000 != 0
	}

	pub(crate) fn is_sorted(packed: u8) -> bool {
		packed & 0b0010_0000 != 0
	}

	pub(crate) fn local_color_table_len(packed: u8) -> usize {
		1usize << ((packed & 0b0000_0111) + 1)
	}

	#[allow(clippy::too_many_arguments)]
	pub(crate) fn write_descriptor<T: WriteBytesExt>(
		writer: &mut T,
		left: u16,
		top: u16,
		width: u16,
		height: u16,
		has_lct: bool,
		lct_size_bits: u8,
		interlaced: bool,
		sorted: bool,
	) -> Result<(), GifError> {
		let mut packed = 0u8;
		if has_lct {
			packed |= 0b1000_0000;
		}
		if interlaced {
			packed |= 0b0100_0000;
		}
		if sorted {
			packed |= 0b0010_0000;
		}
		packed |= lct_size_bits & 0b0000_0111;

		writer.write_u16::<LittleEndian>(left)?;
		writer.write_u16::<LittleEndian>(top)?;
		writer.write_u16::<LittleEndian>(width)?;
		writer.write_u16::<LittleEndian>(height)?;
		writer.write_u8(packed)?;
		Ok(())
	}
}

/// Returns the sequence of row indices in the order pixel rows appear
/// within an interlaced image's LZW-encoded pixel stream: pass 1 every 8th
/// row starting at 0, pass 2 every 8th starting at 4, pass 3 every 4th
/// starting at 2, pass 4 every 2nd starting at 1.
pub fn interlace_row_order(height: u16) -> Vec<u16> {
	const PASSES: [(u16, u16); 4] = [(0, 8), (4, 8), (2, 4), (1, 2)];
	let mut rows = Vec::with_capacity(height as usize);
	for &(start, step) in &PASSES {
		let mut row = start;
		while row < height {
			rows.push(row);
			row += step;
		}
	}
	rows
}

/// De-interlaces `pixels` (in the order they were decoded from the LZW
/// stream) into row-major order, given the image's `width`/`height`.
/// `pixels.len()` must equal `width as usize * height as usize`.
pub fn deinterlace(pixels: &[u8], width: u16, height: u16) -> Vec<u8> {
	let width = width as usize;
	let mut out = vec![0u8; pixels.len()];
	for (encoded_row, &dest_row) in interlace_row_order(height).iter().enumerate() {
		let src = encoded_row * width;
		let dst = dest_row as usize * width;
		out[dst..dst + width].copy_from_slice(&pixels[src..src + width]);
	}
	out
}

/// The inverse of [`deinterlace`]: rearranges row-major `pixels` into the
/// order an interlaced image's rows are written to the LZW stream in.
pub fn interlace_pixels(pixels: &[u8], width: u16, height: u16) -> Vec<u8> {
	let width = width as usize;
	let mut out = vec![0u8; pixels.len()];
	for (encoded_row, &src_row) in interlace_row_order(height).iter().enumerate() {
		let src = src_row as usize * width;
		let dst = encoded_row * width;
		out[dst..dst + width].copy_from_slice(&pixels[src..src + width]);
	}
	out
}
