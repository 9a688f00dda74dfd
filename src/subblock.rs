//! The GIF "data sub-block" framing: a stream is a concatenation of records
//! `<n: u8> <n bytes>` terminated by a zero-length record. Used both for
//! LZW-compressed image data and for extension payloads (plain text,
//! comment, application); this module knows nothing about what the bytes
//! mean.

use byteorder::WriteBytesExt;
use std::io::Write;

/// A `(offset, length)` span of one sub-block's payload within some shared
/// byte buffer, as produced by [`scan`].
pub type SubBlockSpan = (usize, u8);

/// Scans a sub-block sequence starting at `offset` within `data`, without
/// copying any payload bytes. Returns the list of payload spans and the
/// total number of bytes consumed (length prefixes, payloads, and the
/// trailing zero terminator), or `None` if `data` doesn't yet contain a
/// complete sequence (the caller should wait for more bytes before trying
/// again — this is what lets the container decoder suspend mid-block).
pub fn scan(data: &[u8], offset: usize) -> Option<(Vec<SubBlockSpan>, usize)> {
	let mut consumed = 0usize;
	let mut spans = Vec::new();
	loop {
		let length_pos = offset + consumed;
		if length_pos >= data.len() {
			return None;
		}
		let length = data[length_pos];
		consumed += 1;
		if length == 0 {
			return Some((spans, consumed));
		}
		let payload_start = offset + consumed;
		let payload_end = payload_start + length as usize;
		if payload_end > data.len() {
			return None;
		}
		spans.push((payload_start, length));
		consumed += length as usize;
	}
}

/// Concatenates every payload span's bytes into a single buffer, in order.
/// Used where a block's semantics don't care about individual sub-block
/// boundaries (LZW image data, comment text, ICC profiles).
pub fn concat(data: &[u8], spans: &[SubBlockSpan]) -> Vec<u8> {
	let mut out = Vec::with_capacity(spans.iter().map(|&(_, len)| len as usize).sum());
	for &(start, len) in spans {
		out.extend_from_slice(&data[start..start + len as usize]);
	}
	out
}

/// Extracts each sub-block's payload as its own `Vec<u8>`, preserving
/// boundaries. Used where individual sub-blocks carry distinct meaning
/// (the NETSCAPE/ANIMEXTS loop and buffer-size records, the fixed-length
/// first sub-block of PlainText/GraphicControl/Application extensions).
pub fn split(data: &[u8], spans: &[SubBlockSpan]) -> Vec<Vec<u8>> {
	spans.iter().map(|&(start, len)| data[start..start + len as usize].to_vec()).collect()
}

/// Packs an arbitrary byte buffer into a writer as a sequence of data
/// sub-blocks, each at most 255 bytes, followed by the zero-length
/// terminator. A single one-shot call for extension payloads that are
/// already fully known.
pub fn write_all<T: Write>(writer: &mut T, data: &[u8]) -> Result<(), std::io::Error> {
	let mut pos = 0;
	while pos < data.len() {
		let chunk_len = (data.len() - pos).min(255);
		writer.write_u8(chunk_len as u8)?;
		writer.write_all(&data[pos..pos + chunk_len])?;
		pos += chunk_len;
	}
	writer.write_u8(0)?;
	Ok(())
}

/// Incremental sub-block writer for producers (like the LZW encoder) that
/// generate bytes a few at a time rather than all at once. Never emits a
/// zero-length record except the final [`SubBlockWriter::finish`] call.
#[derive(Debug)]
pub struct SubBlockWriter {
	buffer: Vec<u8>,
}

impl SubBlockWriter {
	pub fn new() -> Self {
		SubBlockWriter { buffer: Vec::with_capacity(255) }
	}

	/// Buffers `byte`, flushing a full 255-byte record out to `writer`
	/// whenever the internal buffer fills up.
	pub fn push_byte<T: Write>(&mut self, writer: &mut T, byte: u8) -> Result<(), std::io::Error> {
		self.buffer.push(byte);
		if self.buffer.len() == 255 {
			self.flush_record(writer)?;
		}
		Ok(())
	}

	fn flush_record<T: Write>(&mut self, writer: &mut T) -> Result<(), std::io::Error> {
		if !self.buffer.is_empty() {
			writer.write_u8(self.buffer.len() as u8)?;
			writer.write_all(&self.buffer)?;
			self.buffer.clear();
		}
		Ok(())
	}

	/// Flushes any buffered partial record and writes the zero-length
	/// terminator. The writer may be reused for a fresh sub-block sequence
	/// afterward.
	pub fn finish<T: Write>(&mut self, writer: &mut T) -> Result<(), std::io::Error> {
		self.flush_record(writer)?;
		writer.write_u8(0)?;
		Ok(())
	}
}

impl Default for SubBlockWriter {
	fn default() -> Self {
		Self::new()
	}
}
