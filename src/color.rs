//! RGB colors and color tables (GIF calls these "color tables"; other
//! formats call the same thing a palette).

use byteorder::{ReadBytesExt, WriteBytesExt};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColorTableError {
	#[error("color table I/O error")]
	Io(#[from] std::io::Error),

	#[error("color table size {0} is not a power of two in the range [2, 256]")]
	InvalidSize(usize),
}

/// A single 8-bit-per-channel RGB color. Immutable once read; GIF carries
/// no alpha channel of its own (transparency is expressed separately via
/// [`crate::extension::GraphicControl::transparent_index`]).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Color {
	pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

	#[inline]
	pub fn new(r: u8, g: u8, b: u8) -> Self {
		Color { r, g, b }
	}

	fn read<T: ReadBytesExt>(reader: &mut T) -> Result<Self, std::io::Error> {
		Ok(Color { r: reader.read_u8()?, g: reader.read_u8()?, b: reader.read_u8()? })
	}

	fn write<T: WriteBytesExt>(&self, writer: &mut T) -> Result<(), std::io::Error> {
		writer.write_u8(self.r)?;
		writer.write_u8(self.g)?;
		writer.write_u8(self.b)?;
		Ok(())
	}
}

/// An ordered set of [`Color`]s, whose length must be a power of two between
/// 2 and 256 inclusive. The `sorted` flag is preserved on round-trip but has
/// no effect on decoding (it is a hint some legacy encoders set to indicate
/// colors are ordered by decreasing importance).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ColorTable {
	colors: Vec<Color>,
	sorted: bool,
}

impl ColorTable {
	/// Creates a color table from an explicit list of colors. The length
	/// must already be a power of two in `[2, 256]`.
	pub fn new(colors: Vec<Color>, sorted: bool) -> Result<Self, ColorTableError> {
		let len = colors.len();
		if !(2..=256).contains(&len) || !len.is_power_of_two() {
			return Err(ColorTableError::InvalidSize(len));
		}
		Ok(ColorTable { colors, sorted })
	}

	/// Creates a table of `2.pow(depth_bits + 1)` colors, padding with
	/// `(0, 0, 0)` entries beyond `colors.len()`, matching the GIF writer
	/// contract for `write_color_table`.
	pub fn padded(colors: &[Color], depth_bits: u8, sorted: bool) -> Result<Self, ColorTableError> {
		let size = 1usize << (depth_bits as u32 + 1);
		if colors.len() > size {
			return Err(ColorTableError::InvalidSize(colors.len()));
		}
		let mut table = Vec::with_capacity(size);
		table.extend_from_slice(colors);
		table.resize(size, Color::BLACK);
		ColorTable::new(table, sorted)
	}

	pub fn colors(&self) -> &[Color] {
		&self.colors
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	pub fn sorted(&self) -> bool {
		self.sorted
	}

	/// The number of bits `n` such that `2.pow(n + 1) == self.len()`. This
	/// is the value stored directly in the 3-bit size field of the screen
	/// descriptor / image descriptor packed flags.
	pub fn size_bits(&self) -> u8 {
		(self.colors.len().trailing_zeros() - 1) as u8
	}

	/// The color depth in bits (`log2(len)`), used as the LZW minimum code
	/// size when no explicit depth is given to the encoder.
	pub fn depth_bits(&self) -> u8 {
		self.colors.len().trailing_zeros() as u8
	}

	pub(crate) fn read<T: ReadBytesExt>(reader: &mut T, num_colors: usize, sorted: bool) -> Result<Self, ColorTableError> {
		let mut colors = Vec::with_capacity(num_colors);
		for _ in 0..num_colors {
			colors.push(Color::read(reader)?);
		}
		ColorTable::new(colors, sorted)
	}

	pub(crate) fn write<T: WriteBytesExt>(&self, writer: &mut T) -> Result<(), std::io::Error> {
		for color in &self.colors {
			color.write(writer)?;
		}
		Ok(())
	}
}

impl std::ops::Index<u8> for ColorTable {
	type Output = Color;

	#[inline]
	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[index as usize]
	}
}
