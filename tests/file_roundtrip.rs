//! A real on-disk round trip: the core codec only works with in-memory
//! `Read`/`Write` and doesn't offer file convenience methods of its own, but
//! a consumer writing encoded bytes straight to a file and reading them back
//! must still decode identically.

mod helpers;

use std::fs;

use gif_codec::decoder::Decoder;

use helpers::{build_simple_gif, lcg_bytes};

#[test]
fn bytes_written_to_disk_and_reread_decode_identically() {
	let pixels = lcg_bytes(1234, 64, 4);
	let bytes = build_simple_gif(8, 8, &[(0, 0, 0), (255, 0, 0), (0, 255, 0), (0, 0, 255)], &pixels);

	let dir = tempfile::TempDir::new().unwrap();
	let path = dir.path().join("roundtrip.gif");
	fs::write(&path, &bytes).unwrap();

	let reread = fs::read(&path).unwrap();
	assert_eq!(bytes, reread);

	let mut decoder = Decoder::new();
	decoder.feed(&reread);
	assert!(decoder.is_complete());
	assert_eq!(pixels, decoder.decode_image(0).unwrap().pixels);
}
