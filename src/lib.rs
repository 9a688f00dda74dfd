//! A pure, dependency-light encoder and decoder for the GIF image container
//! and its embedded LZW bitstream.
//!
//! The crate is split the same way the format itself is layered:
//!
//! * [`bitstream`] packs/unpacks variable-width LZW codes LSB-first across
//!   byte boundaries.
//! * [`subblock`] handles the GIF "data sub-block" framing used by both LZW
//!   image data and extension payloads.
//! * [`lzw`] is the GIF dialect of LZW compression built on top of the two
//!   modules above.
//! * [`color`], [`screen`], [`image`] and [`extension`] hold the block-level
//!   data model.
//! * [`decoder`] and [`encoder`] drive the container-level state machine,
//!   wiring the sub-block stream into the LZW codec for image data.
//!
//! This crate stops at decoded indexed pixels plus frame metadata; it does
//! not render frames, composite them, or manage animation playback timing.

pub mod bitstream;
pub mod color;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod extension;
pub mod image;
pub mod lzw;
pub mod screen;
pub mod subblock;

pub mod prelude;

pub use error::GifError;

#[cfg(test)]
mod tests {
	use crate::color::{Color, ColorTable};
	use crate::encoder::{Encoder, GifVersion};

	/// Builds a minimal but complete GIF container in memory: header, screen
	/// descriptor with the given global color table, a single image frame
	/// covering the whole screen, and a trailer. Used throughout the crate's
	/// tests so they don't need on-disk fixtures.
	pub fn build_simple_gif(width: u16, height: u16, colors: &[(u8, u8, u8)], pixels: &[u8]) -> Vec<u8> {
		let mut out = Vec::new();
		let table =
			ColorTable::new(colors.iter().map(|&(r, g, b)| Color::new(r, g, b)).collect(), false).unwrap();
		let depth = table.depth_bits();

		let mut encoder = Encoder::new(&mut out);
		encoder.write_header(GifVersion::Gif89a).unwrap();
		encoder.write_screen_descriptor(width, height, true, depth, depth, false, 0, 0).unwrap();
		encoder.write_color_table(&table).unwrap();
		let lzw_depth = depth.max(crate::lzw::MIN_CODE_SIZE);
		encoder.write_image(0, 0, width, height, lzw_depth, pixels, None, false, crate::lzw::EncoderOptions::default()).unwrap();
		encoder.write_trailer().unwrap();
		out
	}
}
