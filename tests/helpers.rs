use gif_codec::color::{Color, ColorTable};
use gif_codec::encoder::{Encoder, GifVersion};
use gif_codec::lzw::EncoderOptions;

/// Builds a minimal but complete GIF container: header, screen descriptor
/// with a global color table sized to fit `colors`, a single image frame
/// covering the whole screen, and a trailer.
pub fn build_simple_gif(width: u16, height: u16, colors: &[(u8, u8, u8)], pixels: &[u8]) -> Vec<u8> {
	build_simple_gif_with_options(width, height, colors, pixels, EncoderOptions::default())
}

pub fn build_simple_gif_with_options(
	width: u16,
	height: u16,
	colors: &[(u8, u8, u8)],
	pixels: &[u8],
	lzw_options: EncoderOptions,
) -> Vec<u8> {
	let mut out = Vec::new();
	let table = ColorTable::new(colors.iter().map(|&(r, g, b)| Color::new(r, g, b)).collect(), false).unwrap();
	let depth = table.depth_bits();
	let lzw_depth = depth.max(gif_codec::lzw::MIN_CODE_SIZE);

	let mut encoder = Encoder::new(&mut out);
	encoder.write_header(GifVersion::Gif89a).unwrap();
	encoder.write_screen_descriptor(width, height, true, depth, depth, false, 0, 0).unwrap();
	encoder.write_color_table(&table).unwrap();
	encoder.write_image(0, 0, width, height, lzw_depth, pixels, None, false, lzw_options).unwrap();
	encoder.write_trailer().unwrap();
	out
}

/// A cheap, deterministic pseudo-random byte stream (no `rand` dependency
/// needed for a handful of property-style tests). Not cryptographically
/// meaningful — just varied enough to exercise LZW dictionary growth.
pub fn lcg_bytes(seed: u64, count: usize, modulus: u16) -> Vec<u8> {
	let mut state = seed;
	(0..count)
		.map(|_| {
			state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
			(((state >> 33) as u16) % modulus) as u8
		})
		.collect()
}
