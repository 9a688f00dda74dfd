use crate::bitstream::BitReader;

use super::{validate_min_code_size, LzwError, MAX_TABLE_SIZE};

/// One entry in the decoder's dictionary: every code beyond the initial
/// singletons is represented as a link back to its prefix code plus one
/// trailing byte, rather than an owned `Vec<u8>`. Reconstructing a code's
/// full byte string means walking the chain back to a singleton (`prefix ==
/// None`). This keeps dictionary growth at O(1) per code instead of the
/// O(n^2) total memory a naive "clone the prefix and push a byte" dictionary
/// costs on pathological inputs.
#[derive(Debug, Clone, Copy)]
struct Entry {
	prefix: Option<u16>,
	byte: u8,
}

fn init_table(min_code_size: u8) -> Vec<Entry> {
	let singletons = 1usize << min_code_size;
	let mut table = Vec::with_capacity(MAX_TABLE_SIZE + 1);
	for i in 0..singletons {
		table.push(Entry { prefix: None, byte: i as u8 });
	}
	// Placeholders for the clear and EOI codes, so that table indices line
	// up with code values. Never read through `prefix`/`byte`.
	table.push(Entry { prefix: None, byte: 0 });
	table.push(Entry { prefix: None, byte: 0 });
	table
}

fn chain_first_byte(table: &[Entry], mut code: u16) -> u8 {
	loop {
		let entry = table[code as usize];
		match entry.prefix {
			Some(prefix) => code = prefix,
			None => return entry.byte,
		}
	}
}

/// Walks `code`'s prefix chain back to its root singleton, appending the
/// decoded byte string to `out` in the correct (forward) order.
fn emit_chain(table: &[Entry], mut code: u16, out: &mut Vec<u8>) {
	let start = out.len();
	loop {
		let entry = table[code as usize];
		out.push(entry.byte);
		match entry.prefix {
			Some(prefix) => code = prefix,
			None => break,
		}
	}
	out[start..].reverse();
}

fn maybe_grow_width(table_len: usize, width: &mut u8) {
	if table_len == (1usize << *width) && *width < 12 {
		*width += 1;
	}
}

/// The result of decoding one image's LZW-compressed pixel data.
#[derive(Debug, Clone)]
pub struct DecodedLzw {
	/// The decompressed color table indices, one per pixel, in the row-major
	/// (or interlaced-pass) order they were encoded.
	pub pixels: Vec<u8>,
	/// Whether an end-of-information code was read before the sub-block
	/// stream ran out. Encoders are not required to emit one; a decoder
	/// that stops at the last sub-block without seeing EOI still succeeds.
	pub eoi_seen: bool,
	/// Whether the very first code in the stream was a clear code. Some
	/// encoders omit the leading clear; both are legal.
	pub first_was_clear: bool,
	/// Bytes present in the sub-block payload after the code that produced
	/// `eoi_seen`, if any. Exists so conformance tests can assert that
	/// trailing application-specific padding is preserved rather than
	/// silently dropped.
	pub trailing_bytes: Vec<u8>,
}

/// Decodes one image's full LZW payload: a leading minimum-code-size byte
/// followed by the already-reassembled sub-block payload (see
/// [`crate::subblock::concat`]).
///
/// Deviations from a strict LZW reader are intentional: an out-of-range
/// code is logged and skipped rather than treated as fatal, and running out
/// of bits before an EOI code is reached simply ends decoding early. Both
/// match the tolerance real-world GIF decoders extend to non-conformant
/// encoders.
pub fn decode(data: &[u8]) -> Result<DecodedLzw, LzwError> {
	let min_code_size = *data.first().ok_or(LzwError::EmptyPayload)?;
	validate_min_code_size(min_code_size)?;

	let mut reader = BitReader::new(&data[1..]);

	let clear_code = 1u16 << min_code_size;
	let eoi_code = clear_code + 1;

	let mut table = init_table(min_code_size);
	let mut width = min_code_size + 1;
	let mut prev_code: Option<u16> = None;

	let mut pixels = Vec::new();
	let mut eoi_seen = false;
	let mut first_was_clear = false;
	let mut first_code_seen = false;

	loop {
		let code = match reader.read_code(width) {
			Some(code) => code,
			None => break,
		};

		if !first_code_seen {
			first_code_seen = true;
			first_was_clear = code == clear_code;
		}

		if code == eoi_code {
			eoi_seen = true;
			break;
		}

		if code == clear_code {
			table.truncate((1usize << min_code_size) + 2);
			width = min_code_size + 1;
			prev_code = None;
			continue;
		}

		if (code as usize) < table.len() {
			emit_chain(&table, code, &mut pixels);
			if let Some(prev) = prev_code {
				if table.len() < MAX_TABLE_SIZE {
					let first_byte = chain_first_byte(&table, code);
					table.push(Entry { prefix: Some(prev), byte: first_byte });
					maybe_grow_width(table.len(), &mut width);
				}
			}
			prev_code = Some(code);
		} else if code as usize == table.len() {
			match prev_code {
				Some(prev) if table.len() < MAX_TABLE_SIZE => {
					let first_byte = chain_first_byte(&table, prev);
					table.push(Entry { prefix: Some(prev), byte: first_byte });
					let new_code = (table.len() - 1) as u16;
					emit_chain(&table, new_code, &mut pixels);
					maybe_grow_width(table.len(), &mut width);
					prev_code = Some(code);
				}
				Some(_) => {
					log::warn!("lzw: dictionary frozen at {} entries, discarding code {}", table.len(), code);
				}
				None => {
					log::warn!("lzw: code {} references a pending entry with no previous code", code);
				}
			}
		} else {
			log::warn!("lzw: code {} is out of range (dictionary holds {} entries)", code, table.len());
		}
	}

	let trailing_bytes = reader.remaining().to_vec();

	Ok(DecodedLzw { pixels, eoi_seen, first_was_clear, trailing_bytes })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lzw::encoder::{encode, EncoderOptions};

	#[test]
	fn decodes_single_pixel() {
		let encoded = encode(&[0], 2, &EncoderOptions::default()).unwrap();
		let decoded = decode(&encoded).unwrap();
		assert_eq!(vec![0u8], decoded.pixels);
		assert!(decoded.eoi_seen);
		assert!(decoded.first_was_clear);
	}

	#[test]
	fn decodes_repeated_run_via_dictionary_growth() {
		let pixels: Vec<u8> = std::iter::repeat(3u8).take(300).collect();
		let encoded = encode(&pixels, 3, &EncoderOptions::default()).unwrap();
		let decoded = decode(&encoded).unwrap();
		assert_eq!(pixels, decoded.pixels);
	}

	#[test]
	fn decodes_without_eoi() {
		let options = EncoderOptions { end_with_eoi: false, ..EncoderOptions::default() };
		let pixels = vec![0u8, 1, 2, 3, 0, 1, 2, 3];
		let encoded = encode(&pixels, 2, &options).unwrap();
		let decoded = decode(&encoded).unwrap();
		assert_eq!(pixels, decoded.pixels);
		assert!(!decoded.eoi_seen);
	}

	#[test]
	fn rejects_empty_payload() {
		assert!(matches!(decode(&[]), Err(LzwError::EmptyPayload)));
	}

	#[test]
	fn rejects_out_of_range_min_code_size() {
		assert!(matches!(decode(&[1]), Err(LzwError::InvalidMinCodeSize(1))));
		assert!(matches!(decode(&[9]), Err(LzwError::InvalidMinCodeSize(9))));
	}

	#[test]
	fn empty_image_is_legal() {
		let encoded = encode(&[], 2, &EncoderOptions::default()).unwrap();
		let decoded = decode(&encoded).unwrap();
		assert!(decoded.pixels.is_empty());
		assert!(decoded.eoi_seen);
	}

	#[test]
	fn preserves_extra_trailing_bytes() {
		let options = EncoderOptions { extra_trailing_data: vec![0xAA, 0xBB, 0xCC], ..EncoderOptions::default() };
		let encoded = encode(&[1, 2, 3], 2, &options).unwrap();
		let decoded = decode(&encoded).unwrap();
		assert_eq!(vec![1u8, 2, 3], decoded.pixels);
		assert_eq!(vec![0xAAu8, 0xBB, 0xCC], decoded.trailing_bytes);
	}

	#[test]
	fn saturates_without_exceeding_4095_entries() {
		// A long, non-repetitive run forces continual dictionary growth.
		let pixels: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
		let encoded = encode(&pixels, 8, &EncoderOptions::default()).unwrap();
		let decoded = decode(&encoded).unwrap();
		assert_eq!(pixels, decoded.pixels);
	}
}
