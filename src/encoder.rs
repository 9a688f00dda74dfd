//! The container-level serializer. Unlike [`crate::decoder::Decoder`], the
//! encoder never suspends: every `write_*` method writes directly to its
//! sink and returns once done.

use std::io::Write;

use byteorder::WriteBytesExt;

use crate::color::ColorTable;
use crate::error::GifError;
use crate::extension;
use crate::extension::{Disposal, GraphicControl};
use crate::image;
use crate::image::ImageFrame;
use crate::lzw::{self, EncoderOptions};
use crate::screen::LogicalScreen;
use crate::subblock;

pub use crate::screen::GifVersion;

/// Serializes a GIF container to `writer`, one block at a time.
///
/// A pending graphic control extension is held in a single slot exactly
/// like the decoder's: [`Encoder::write_graphic_control_extension`] doesn't
/// write anything immediately, it just stages the extension to be flushed
/// ahead of the next image or plain-text block.
pub struct Encoder<'a, W: Write> {
	writer: &'a mut W,
	pending_graphic_control: Option<GraphicControl>,
}

impl<'a, W: Write> Encoder<'a, W> {
	pub fn new(writer: &'a mut W) -> Self {
		Encoder { writer, pending_graphic_control: None }
	}

	pub fn write_header(&mut self, version: GifVersion) -> Result<(), GifError> {
		self.writer.write_all(version.signature())?;
		Ok(())
	}

	#[allow(clippy::too_many_arguments)]
	pub fn write_screen_descriptor(
		&mut self,
		width: u16,
		height: u16,
		has_global_color_table: bool,
		depth: u8,
		original_depth: u8,
		sorted: bool,
		background_index: u8,
		pixel_aspect_ratio: u8,
	) -> Result<(), GifError> {
		let gct_size_bits = depth.saturating_sub(1);
		LogicalScreen::write_descriptor(
			self.writer,
			width,
			height,
			has_global_color_table,
			gct_size_bits,
			original_depth,
			sorted,
			background_index,
			pixel_aspect_ratio,
		)
	}

	/// Writes `table` as-is. Callers that need the GIF-mandated padding to
	/// `2.pow(depth)` entries should build it with [`ColorTable::padded`]
	/// first.
	pub fn write_color_table(&mut self, table: &ColorTable) -> Result<(), GifError> {
		table.write(self.writer)?;
		Ok(())
	}

	/// Writes one image block: descriptor, optional local color table, and
	/// LZW-compressed pixel data. `depth` is the LZW minimum code size
	/// (2..=8). Flushes any pending graphic control extension first.
	#[allow(clippy::too_many_arguments)]
	pub fn write_image(
		&mut self,
		left: u16,
		top: u16,
		width: u16,
		height: u16,
		depth: u8,
		pixels: &[u8],
		local_color_table: Option<&ColorTable>,
		interlace: bool,
		lzw_options: EncoderOptions,
	) -> Result<(), GifError> {
		if !(2..=8).contains(&depth) {
			return Err(GifError::InvalidArgument(format!("LZW min code size {} out of range [2, 8]", depth)));
		}
		self.flush_pending_graphic_control()?;

		self.writer.write_u8(0x2C)?;
		let has_lct = local_color_table.is_some();
		let lct_size_bits = local_color_table.map(|t| t.size_bits()).unwrap_or(0);
		let sorted = local_color_table.map(|t| t.sorted()).unwrap_or(false);
		ImageFrame::write_descriptor(self.writer, left, top, width, height, has_lct, lct_size_bits, interlace, sorted)?;
		if let Some(table) = local_color_table {
			table.write(self.writer)?;
		}

		let ordered = if interlace { image::interlace_pixels(pixels, width, height) } else { pixels.to_vec() };
		let payload = lzw::encode(&ordered, depth, &lzw_options)?;
		self.writer.write_all(&payload)?;
		Ok(())
	}

	/// Stages a graphic control extension to precede the next image or
	/// plain-text block; never fails.
	pub fn write_graphic_control_extension(
		&mut self,
		disposal: Disposal,
		delay_centiseconds: u16,
		user_input: bool,
		has_transparent: bool,
		transparent_index: u8,
	) -> Result<(), GifError> {
		self.pending_graphic_control = Some(GraphicControl {
			disposal,
			delay_centiseconds,
			user_input,
			transparent_index: if has_transparent { Some(transparent_index) } else { None },
		});
		Ok(())
	}

	#[allow(clippy::too_many_arguments)]
	pub fn write_plain_text_extension(
		&mut self,
		left: u16,
		top: u16,
		width: u16,
		height: u16,
		cell_width: u8,
		cell_height: u8,
		fg_color_index: u8,
		bg_color_index: u8,
		text: &[u8],
	) -> Result<(), GifError> {
		self.flush_pending_graphic_control()?;
		self.writer.write_u8(0x21)?;
		self.writer.write_u8(extension::LABEL_PLAIN_TEXT)?;
		self.writer.write_u8(12)?;
		self.writer.write_u16::<byteorder::LittleEndian>(left)?;
		self.writer.write_u16::<byteorder::LittleEndian>(top)?;
		self.writer.write_u16::<byteorder::LittleEndian>(width)?;
		self.writer.write_u16::<byteorder::LittleEndian>(height)?;
		self.writer.write_u8(cell_width)?;
		self.writer.write_u8(cell_height)?;
		self.writer.write_u8(fg_color_index)?;
		self.writer.write_u8(bg_color_index)?;
		subblock::write_all(self.writer, text)?;
		Ok(())
	}

	pub fn write_comment_extension(&mut self, text: &[u8]) -> Result<(), GifError> {
		self.writer.write_u8(0x21)?;
		self.writer.write_u8(extension::LABEL_COMMENT)?;
		subblock::write_all(self.writer, text)?;
		Ok(())
	}

	/// Writes an application extension verbatim, each entry in `sub_blocks`
	/// becoming its own length-prefixed record (each must be 1..=255
	/// bytes). Use the `write_netscape_extension`/`write_animexts_extension`/
	/// `write_xmp_extension`/`write_icc_extension` helpers for the
	/// recognized specializations instead of building their sub-blocks by
	/// hand here.
	pub fn write_application_extension(&mut self, identifier: &[u8; 8], auth_code: &[u8; 3], sub_blocks: &[Vec<u8>]) -> Result<(), GifError> {
		self.write_application_header(identifier, auth_code)?;
		self.write_raw_sub_blocks(sub_blocks)?;
		Ok(())
	}

	pub fn write_netscape_extension(&mut self, loop_count: Option<u16>) -> Result<(), GifError> {
		self.write_application_header(b"NETSCAPE", b"2.0")?;
		self.write_loop_sub_blocks(loop_count)
	}

	pub fn write_animexts_extension(&mut self, loop_count: Option<u16>) -> Result<(), GifError> {
		self.write_application_header(b"ANIMEXTS", b"1.0")?;
		self.write_loop_sub_blocks(loop_count)
	}

	/// Writes `payload` raw (not sub-block framed), followed by the
	/// magic ramp trailer that lets the same bytes also parse as a (vacuous)
	/// valid sub-block sequence.
	pub fn write_xmp_extension(&mut self, payload: &[u8]) -> Result<(), GifError> {
		self.write_application_header(b"XMP Data", b"XMP")?;
		self.writer.write_all(payload)?;
		self.writer.write_all(&xmp_magic_trailer())?;
		Ok(())
	}

	pub fn write_icc_extension(&mut self, payload: &[u8]) -> Result<(), GifError> {
		self.write_application_header(b"ICCRGBG1", b"012")?;
		subblock::write_all(self.writer, payload)?;
		Ok(())
	}

	pub fn write_trailer(&mut self) -> Result<(), GifError> {
		self.writer.write_u8(0x3B)?;
		Ok(())
	}

	fn write_application_header(&mut self, identifier: &[u8; 8], auth_code: &[u8; 3]) -> Result<(), GifError> {
		self.writer.write_u8(0x21)?;
		self.writer.write_u8(extension::LABEL_APPLICATION)?;
		self.writer.write_u8(11)?;
		self.writer.write_all(identifier)?;
		self.writer.write_all(auth_code)?;
		Ok(())
	}

	fn write_raw_sub_blocks(&mut self, sub_blocks: &[Vec<u8>]) -> Result<(), GifError> {
		for block in sub_blocks {
			if block.is_empty() || block.len() > 255 {
				return Err(GifError::InvalidArgument(format!("sub-block length {} out of range [1, 255]", block.len())));
			}
			self.writer.write_u8(block.len() as u8)?;
			self.writer.write_all(block)?;
		}
		self.writer.write_u8(0)?;
		Ok(())
	}

	fn write_loop_sub_blocks(&mut self, loop_count: Option<u16>) -> Result<(), GifError> {
		match loop_count {
			Some(count) => {
				let bytes = count.to_le_bytes();
				self.write_raw_sub_blocks(&[vec![1, bytes[0], bytes[1]]])
			}
			None => self.write_raw_sub_blocks(&[]),
		}
	}

	fn flush_pending_graphic_control(&mut self) -> Result<(), GifError> {
		if let Some(gc) = self.pending_graphic_control.take() {
			self.writer.write_u8(0x21)?;
			self.writer.write_u8(extension::LABEL_GRAPHIC_CONTROL)?;
			self.writer.write_u8(4)?;
			gc.write(self.writer)?;
			self.writer.write_u8(0)?;
		}
		Ok(())
	}
}

/// The 258-byte "magic ramp" appended after an XMP Data extension's raw
/// payload: a byte sequence engineered so it also parses as a sequence of
/// valid (if meaningless) GIF sub-block length prefixes, letting non-XMP-
/// aware decoders skip past it using ordinary sub-block scanning.
fn xmp_magic_trailer() -> Vec<u8> {
	let mut trailer = Vec::with_capacity(extension::XMP_MAGIC_TRAILER_LEN);
	trailer.push(0x01);
	trailer.extend((0..=0xFFu16).rev().map(|v| v as u8));
	trailer.push(0x00);
	trailer
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::color::Color;
	use crate::decoder::{BlockKind, Decoder};

	#[test]
	fn writes_and_decodes_round_trip() {
		let table = ColorTable::new(vec![Color::BLACK, Color::new(255, 0, 0)], false).unwrap();
		let mut out = Vec::new();
		let mut encoder = Encoder::new(&mut out);
		encoder.write_header(GifVersion::Gif89a).unwrap();
		encoder.write_screen_descriptor(4, 4, true, 1, 1, false, 0, 0).unwrap();
		encoder.write_color_table(&table).unwrap();
		let pixels = vec![1u8; 16];
		encoder.write_image(0, 0, 4, 4, 2, &pixels, None, false, EncoderOptions::default()).unwrap();
		encoder.write_trailer().unwrap();

		let mut decoder = Decoder::new();
		decoder.feed(&out);
		assert!(decoder.is_complete());
		assert_eq!(pixels, decoder.decode_image(0).unwrap().pixels);
	}

	#[test]
	fn graphic_control_attaches_to_next_image() {
		let table = ColorTable::new(vec![Color::BLACK, Color::new(255, 0, 0)], false).unwrap();
		let mut out = Vec::new();
		let mut encoder = Encoder::new(&mut out);
		encoder.write_header(GifVersion::Gif89a).unwrap();
		encoder.write_screen_descriptor(1, 1, true, 1, 1, false, 0, 0).unwrap();
		encoder.write_color_table(&table).unwrap();
		encoder.write_graphic_control_extension(Disposal::RestorePrevious, 10, false, true, 0).unwrap();
		encoder.write_image(0, 0, 1, 1, 2, &[0], None, false, EncoderOptions::default()).unwrap();
		encoder.write_trailer().unwrap();

		let mut decoder = Decoder::new();
		decoder.feed(&out);
		let block = &decoder.blocks()[0];
		assert!(matches!(block.kind, BlockKind::Image(_)));
		let gc = block.graphic_control.unwrap();
		assert_eq!(Disposal::RestorePrevious, gc.disposal);
		assert_eq!(Some(0), gc.transparent_index);
	}

	#[test]
	fn netscape_loop_extension_round_trips() {
		let mut out = Vec::new();
		let mut encoder = Encoder::new(&mut out);
		encoder.write_netscape_extension(Some(0)).unwrap();

		let mut decoder = Decoder::new();
		decoder.feed(b"GIF89a");
		decoder.feed(&[10, 0, 10, 0, 0, 0, 0]);
		decoder.feed(&out);
		decoder.feed(&[0x3B]);

		match &decoder.blocks()[0].kind {
			BlockKind::Extension(crate::extension::Extension::Application(crate::extension::ApplicationExtension::Netscape {
				loop_count,
				..
			})) => assert_eq!(Some(0), *loop_count),
			other => panic!("unexpected block: {:?}", other),
		}
	}

	#[test]
	fn rejects_out_of_range_depth() {
		let mut out = Vec::new();
		let mut encoder = Encoder::new(&mut out);
		let err = encoder.write_image(0, 0, 1, 1, 1, &[0], None, false, EncoderOptions::default()).unwrap_err();
		// depth=1 is below the minimum LZW code size of 2.
		assert!(matches!(err, GifError::InvalidArgument(_)));
	}
}
