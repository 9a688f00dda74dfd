use std::collections::HashMap;

use crate::bitstream::BitWriter;
use crate::subblock::SubBlockWriter;

use super::{validate_min_code_size, LzwError, MAX_TABLE_SIZE};

/// Knobs the container encoder can set to exercise non-default, still-legal
/// encodings (used heavily by the conformance tests; a plain image write
/// only ever needs the defaults).
#[derive(Debug, Clone)]
pub struct EncoderOptions {
	/// The highest code width the dictionary is allowed to grow to, 3..=12.
	/// Real GIF data always uses 12; a smaller ceiling is useful for testing
	/// dictionary saturation without generating huge pixel runs.
	pub max_code_size: u8,
	/// Emit a clear code as the very first code in the stream. Both `true`
	/// and `false` are legal to decoders.
	pub start_with_clear: bool,
	/// Emit an end-of-information code after the last data code. Decoders
	/// must tolerate its absence, so tests exercise `false` here.
	pub end_with_eoi: bool,
	/// Emit a clear code and reset the dictionary once it saturates, rather
	/// than freezing it and continuing to emit codes from the full table.
	pub clear_on_max_width: bool,
	/// Extra bytes appended to the sub-block stream after the last code
	/// (and its trailing bit-padding), to test that decoders preserve
	/// opaque application padding rather than choke on it.
	pub extra_trailing_data: Vec<u8>,
}

impl Default for EncoderOptions {
	fn default() -> Self {
		EncoderOptions {
			max_code_size: 12,
			start_with_clear: true,
			end_with_eoi: true,
			clear_on_max_width: true,
			extra_trailing_data: Vec::new(),
		}
	}
}

struct Dictionary {
	// Keyed by (prefix code, next byte); absent means "not yet in the
	// dictionary". Singleton codes (prefix-less, one byte each) are never
	// inserted here - they're implicit: the code for a lone byte `b` is
	// just `b` itself.
	entries: HashMap<(u16, u8), u16>,
	next_code: u16,
	max_entries: usize,
}

impl Dictionary {
	fn new(eoi_code: u16, max_code_size: u8) -> Self {
		Dictionary { entries: HashMap::new(), next_code: eoi_code + 1, max_entries: (1usize << max_code_size).min(MAX_TABLE_SIZE) }
	}

	fn reset(&mut self, eoi_code: u16) {
		self.entries.clear();
		self.next_code = eoi_code + 1;
	}

	fn lookup(&self, prefix: u16, next_byte: u8) -> Option<u16> {
		self.entries.get(&(prefix, next_byte)).copied()
	}

	/// Inserts `(prefix, next_byte) -> next_code` if the dictionary hasn't
	/// saturated, returning whether an entry was actually added.
	fn insert(&mut self, prefix: u16, next_byte: u8) -> bool {
		if self.next_code as usize >= self.max_entries {
			return false;
		}
		self.entries.insert((prefix, next_byte), self.next_code);
		self.next_code += 1;
		true
	}
}

/// Encodes `pixels` (color table indices) into a complete LZW payload: the
/// leading minimum-code-size byte followed by the sub-block-framed,
/// bit-packed code stream.
pub fn encode(pixels: &[u8], min_code_size: u8, options: &EncoderOptions) -> Result<Vec<u8>, LzwError> {
	validate_min_code_size(min_code_size)?;
	if !(3..=12).contains(&options.max_code_size) {
		return Err(LzwError::InvalidMaxCodeSize(options.max_code_size));
	}

	let clear_code = 1u16 << min_code_size;
	let eoi_code = clear_code + 1;

	let mut payload = vec![min_code_size];
	let mut sub_blocks = SubBlockWriter::new();
	let mut bits = BitWriter::new();
	let mut width = min_code_size + 1;
	let mut dictionary = Dictionary::new(eoi_code, options.max_code_size);

	let write_code = |bits: &mut BitWriter, sub_blocks: &mut SubBlockWriter, payload: &mut Vec<u8>, code: u16, width: u8| -> Result<(), LzwError> {
		bits.write_code(code, width);
		while let Some(byte) = bits.take_byte() {
			sub_blocks.push_byte(payload, byte).expect("writing to a Vec<u8> never fails");
		}
		Ok(())
	};

	if options.start_with_clear {
		write_code(&mut bits, &mut sub_blocks, &mut payload, clear_code, width)?;
	}

	let mut current: Option<u16> = None;

	for &byte in pixels {
		match current {
			None => current = Some(byte as u16),
			Some(prefix) => {
				if let Some(existing) = dictionary.lookup(prefix, byte) {
					current = Some(existing);
				} else {
					let added = dictionary.insert(prefix, byte);
					write_code(&mut bits, &mut sub_blocks, &mut payload, prefix, width)?;
					if added && dictionary.next_code as usize == (1usize << width) + 1 && width < options.max_code_size {
						width += 1;
					}
					if added && dictionary.next_code as usize == dictionary.max_entries && options.clear_on_max_width {
						write_code(&mut bits, &mut sub_blocks, &mut payload, clear_code, width)?;
						dictionary.reset(eoi_code);
						width = min_code_size + 1;
					}
					current = Some(byte as u16);
				}
			}
		}
	}

	if let Some(code) = current {
		write_code(&mut bits, &mut sub_blocks, &mut payload, code, width)?;
	}

	if options.end_with_eoi {
		write_code(&mut bits, &mut sub_blocks, &mut payload, eoi_code, width)?;
	}

	if let Some(byte) = bits.flush_byte() {
		sub_blocks.push_byte(&mut payload, byte).expect("writing to a Vec<u8> never fails");
	}

	for &byte in &options.extra_trailing_data {
		sub_blocks.push_byte(&mut payload, byte).expect("writing to a Vec<u8> never fails");
	}

	sub_blocks.finish(&mut payload).expect("writing to a Vec<u8> never fails");

	Ok(payload)
}
