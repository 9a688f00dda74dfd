//! Exercises the `feed`-driven streaming decoder: feeding the same bytes in
//! arbitrary partitions must produce the same parsed block sequence as
//! feeding the whole buffer at once.

mod helpers;

use gif_codec::decoder::Decoder;

use helpers::{build_simple_gif, lcg_bytes};

fn decode_whole(bytes: &[u8]) -> Decoder {
	let mut decoder = Decoder::new();
	decoder.feed(bytes);
	decoder
}

fn decode_in_chunks(bytes: &[u8], chunk_size: usize) -> Decoder {
	let mut decoder = Decoder::new();
	for chunk in bytes.chunks(chunk_size.max(1)) {
		decoder.feed(chunk);
	}
	decoder
}

fn decode_one_byte_at_a_time(bytes: &[u8]) -> Decoder {
	let mut decoder = Decoder::new();
	for &byte in bytes {
		decoder.feed(&[byte]);
	}
	decoder
}

#[test]
fn arbitrary_partitions_match_feeding_the_whole_buffer() {
	let pixels = lcg_bytes(7, 256, 4);
	let bytes = build_simple_gif(16, 16, &[(0, 0, 0), (255, 0, 0), (0, 255, 0), (0, 0, 255)], &pixels);

	let whole = decode_whole(&bytes);

	for chunk_size in [1, 2, 3, 5, 7, 11, 17, 64, 1000] {
		let chunked = decode_in_chunks(&bytes, chunk_size);

		assert_eq!(whole.blocks().len(), chunked.blocks().len(), "chunk_size={chunk_size}");
		assert_eq!(whole.is_complete(), chunked.is_complete(), "chunk_size={chunk_size}");
		assert_eq!(
			whole.decode_image(0).unwrap().pixels,
			chunked.decode_image(0).unwrap().pixels,
			"chunk_size={chunk_size}"
		);
	}
}

#[test]
fn byte_at_a_time_feeding_suspends_until_each_block_completes() {
	let bytes = build_simple_gif(4, 4, &[(0, 0, 0), (1, 1, 1)], &[0u8; 16]);
	let decoder = decode_one_byte_at_a_time(&bytes);

	assert!(decoder.is_complete());
	assert_eq!(2, decoder.blocks().len()); // the image frame, then the trailer
	assert_eq!(vec![0u8; 16], decoder.decode_image(0).unwrap().pixels);
}

#[test]
fn partial_feed_suspends_before_the_screen_descriptor_is_available() {
	let bytes = build_simple_gif(4, 4, &[(0, 0, 0), (1, 1, 1)], &[0u8; 16]);

	let mut decoder = Decoder::new();
	decoder.feed(&bytes[..4]); // not even the full 6-byte signature yet
	assert!(!decoder.is_gif());
	assert!(!decoder.has_screen_descriptor());

	decoder.feed(&bytes[4..10]); // signature complete, screen descriptor still incomplete
	assert!(decoder.is_gif());
	assert!(!decoder.has_screen_descriptor());

	decoder.feed(&bytes[10..]);
	assert!(decoder.has_screen_descriptor());
	assert!(decoder.is_complete());
}

#[test]
fn zero_sized_image_is_legal_and_decodes_to_no_pixels() {
	use gif_codec::color::{Color, ColorTable};
	use gif_codec::encoder::{Encoder, GifVersion};

	let table = ColorTable::new(vec![Color::BLACK, Color::new(255, 255, 255)], false).unwrap();
	let mut out = Vec::new();
	let mut encoder = Encoder::new(&mut out);
	encoder.write_header(GifVersion::Gif89a).unwrap();
	encoder.write_screen_descriptor(0, 0, true, 1, 1, false, 0, 0).unwrap();
	encoder.write_color_table(&table).unwrap();
	encoder.write_image(0, 0, 0, 0, 2, &[], None, false, Default::default()).unwrap();
	encoder.write_trailer().unwrap();

	let decoder = decode_whole(&out);
	assert!(decoder.is_complete());
	let frame = match &decoder.blocks()[0].kind {
		gif_codec::decoder::BlockKind::Image(frame) => frame,
		other => panic!("expected an image block, got {other:?}"),
	};
	assert_eq!((0, 0), (frame.width, frame.height));
	assert!(decoder.decode_image(0).unwrap().pixels.is_empty());
}

#[test]
fn missing_global_color_table_is_legal_when_every_frame_supplies_a_local_one() {
	use gif_codec::color::{Color, ColorTable};
	use gif_codec::encoder::{Encoder, GifVersion};

	let local = ColorTable::new(vec![Color::BLACK, Color::new(0, 255, 0)], false).unwrap();
	let mut out = Vec::new();
	let mut encoder = Encoder::new(&mut out);
	encoder.write_header(GifVersion::Gif89a).unwrap();
	encoder.write_screen_descriptor(1, 1, false, 1, 1, false, 0, 0).unwrap();
	encoder.write_image(0, 0, 1, 1, 2, &[1], Some(&local), false, Default::default()).unwrap();
	encoder.write_trailer().unwrap();

	let decoder = decode_whole(&out);
	assert!(decoder.screen().unwrap().global_color_table.is_none());
	assert!(decoder.is_complete());
	assert_eq!(vec![1u8], decoder.decode_image(0).unwrap().pixels);
}

#[test]
fn multi_frame_stream_preserves_wire_order() {
	use gif_codec::color::{Color, ColorTable};
	use gif_codec::encoder::{Encoder, GifVersion};
	use gif_codec::extension::Disposal;

	let table = ColorTable::new(vec![Color::BLACK, Color::new(255, 255, 255)], false).unwrap();
	let mut out = Vec::new();
	let mut encoder = Encoder::new(&mut out);
	encoder.write_header(GifVersion::Gif89a).unwrap();
	encoder.write_screen_descriptor(2, 2, true, 1, 1, false, 0, 0).unwrap();
	encoder.write_color_table(&table).unwrap();
	encoder.write_netscape_extension(Some(0)).unwrap();
	encoder.write_graphic_control_extension(Disposal::RestoreBackground, 10, false, false, 0).unwrap();
	encoder.write_image(0, 0, 2, 2, 1, &[0, 1, 1, 0], None, false, Default::default()).unwrap();
	encoder.write_graphic_control_extension(Disposal::None, 20, false, false, 0).unwrap();
	encoder.write_image(0, 0, 2, 2, 1, &[1, 0, 0, 1], None, false, Default::default()).unwrap();
	encoder.write_trailer().unwrap();

	let whole = decode_whole(&out);
	let chunked = decode_in_chunks(&out, 3);

	assert_eq!(whole.blocks().len(), chunked.blocks().len());
	assert_eq!(4, whole.blocks().len()); // netscape extension, frame 1, frame 2, trailer
	assert_eq!(
		whole.decode_image(1).unwrap().pixels,
		chunked.decode_image(1).unwrap().pixels,
	);
	assert_eq!(
		whole.decode_image(2).unwrap().pixels,
		chunked.decode_image(2).unwrap().pixels,
	);
}
