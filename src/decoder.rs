//! The feed-driven container state machine: callers push byte buffers in,
//! the decoder advances as far as the accumulated buffer allows and
//! suspends at the first incomplete block, preserving its parse cursor for
//! the next `feed` call.

use crate::color::ColorTable;
use crate::error::GifError;
use crate::extension::{self, Extension, GraphicControl};
use crate::image::ImageFrame;
use crate::lzw::{self, DecodedLzw};
use crate::screen::{GifVersion, LogicalScreen};
use crate::subblock;

/// What kind of block a [`BlockDescriptor`] describes.
#[derive(Debug, Clone)]
pub enum BlockKind {
	Image(ImageFrame),
	Extension(Extension),
	Trailer,
	/// A body octet that wasn't `0x2C`, `0x21`, or `0x3B`. Parsing stops
	/// here; see [`Decoder::has_unknown_block`].
	Unknown { byte: u8 },
}

/// One parsed block, in the order it appeared on the wire.
#[derive(Debug, Clone)]
pub struct BlockDescriptor {
	pub kind: BlockKind,
	/// The graphic control extension that immediately preceded this block
	/// in wire order, if any. Only ever set for `Image` and `PlainText`
	/// blocks — graphic control extensions themselves never appear as a
	/// standalone `BlockDescriptor`.
	pub graphic_control: Option<GraphicControl>,
}

/// Parses a GIF byte stream incrementally. Owns a single append-only
/// buffer; every [`BlockDescriptor`] it produces remains valid for the
/// decoder's lifetime.
#[derive(Debug, Default)]
pub struct Decoder {
	buffer: Vec<u8>,
	cursor: usize,
	screen: Option<LogicalScreen>,
	blocks: Vec<BlockDescriptor>,
	image_payloads: Vec<Option<Vec<u8>>>,
	pending_graphic_control: Option<GraphicControl>,
	complete: bool,
	unknown_block: bool,
	error: Option<GifError>,
}

impl Decoder {
	pub fn new() -> Self {
		Decoder::default()
	}

	/// Appends `bytes` to the internal buffer and parses as far as
	/// possible. Never blocks; returns as soon as the buffer is
	/// insufficient for the next block, a fatal error occurs, the trailer
	/// is seen, or an unrecognized block type is hit.
	pub fn feed(&mut self, bytes: &[u8]) {
		self.buffer.extend_from_slice(bytes);
		self.advance();
	}

	pub fn has_header(&self) -> bool {
		self.buffer.len() >= 6
	}

	pub fn is_gif(&self) -> bool {
		self.has_header() && GifVersion::from_signature(&self.buffer[0..6]).is_ok()
	}

	pub fn has_screen_descriptor(&self) -> bool {
		self.screen.is_some()
	}

	pub fn is_complete(&self) -> bool {
		self.complete
	}

	pub fn has_unknown_block(&self) -> bool {
		self.unknown_block
	}

	/// The first fatal error encountered, if any (a bad signature or an
	/// invalid color table size). Once set, parsing never advances further.
	pub fn error(&self) -> Option<&GifError> {
		self.error.as_ref()
	}

	pub fn screen(&self) -> Option<&LogicalScreen> {
		self.screen.as_ref()
	}

	pub fn blocks(&self) -> &[BlockDescriptor] {
		&self.blocks
	}

	/// Runs the LZW decoder over the `index`-th block's stored payload.
	/// Returns [`GifError::NotAnImage`] if that block isn't an image.
	pub fn decode_image(&self, index: usize) -> Result<DecodedLzw, GifError> {
		match self.blocks.get(index).map(|b| &b.kind) {
			Some(BlockKind::Image(_)) => {
				let payload = self.image_payloads[index].as_ref().expect("image blocks always carry a stored LZW payload");
				Ok(lzw::decode(payload)?)
			}
			_ => Err(GifError::NotAnImage),
		}
	}

	fn advance(&mut self) {
		if self.error.is_some() || self.complete || self.unknown_block {
			return;
		}
		if self.screen.is_none() {
			if self.buffer.len() < 6 {
				return;
			}
			if let Err(e) = GifVersion::from_signature(&self.buffer[0..6]) {
				self.error = Some(e);
				return;
			}
			self.cursor = 6;
			if !self.try_parse_screen() {
				return;
			}
		}
		loop {
			if self.error.is_some() || self.complete || self.unknown_block {
				return;
			}
			if !self.try_parse_next_block() {
				return;
			}
		}
	}

	fn try_parse_screen(&mut self) -> bool {
		let start = self.cursor;
		if self.buffer.len() - start < 7 {
			return false;
		}
		let mut desc_reader = &self.buffer[start..start + 7];
		let (width, height, packed, background_index, pixel_aspect_ratio) =
			LogicalScreen::read_descriptor(&mut desc_reader).expect("exactly 7 bytes available");
		let has_gct = LogicalScreen::has_global_color_table(packed);
		let gct_len = LogicalScreen::global_color_table_len(packed);
		let needed = 7 + if has_gct { gct_len * 3 } else { 0 };
		if self.buffer.len() - start < needed {
			return false;
		}

		let global_color_table = if has_gct {
			let mut reader = &self.buffer[start + 7..start + needed];
			match ColorTable::read(&mut reader, gct_len, LogicalScreen::is_sorted(packed)) {
				Ok(table) => Some(table),
				Err(e) => {
					self.error = Some(GifError::from(e));
					return false;
				}
			}
		} else {
			None
		};

		self.screen = Some(LogicalScreen {
			width,
			height,
			original_depth: LogicalScreen::original_depth_from_packed(packed),
			background_index,
			pixel_aspect_ratio,
			global_color_table,
			color_table_sorted: LogicalScreen::is_sorted(packed),
		});
		self.cursor = start + needed;
		true
	}

	fn try_parse_next_block(&mut self) -> bool {
		if self.buffer.len() <= self.cursor {
			return false;
		}
		match self.buffer[self.cursor] {
			0x2C => self.try_parse_image(),
			0x21 => self.try_parse_extension(),
			0x3B => {
				self.blocks.push(BlockDescriptor { kind: BlockKind::Trailer, graphic_control: None });
				self.image_payloads.push(None);
				self.complete = true;
				self.cursor += 1;
				true
			}
			other => {
				self.blocks.push(BlockDescriptor { kind: BlockKind::Unknown { byte: other }, graphic_control: None });
				self.image_payloads.push(None);
				self.unknown_block = true;
				self.cursor += 1;
				true
			}
		}
	}

	fn try_parse_image(&mut self) -> bool {
		let start = self.cursor;
		if self.buffer.len() - start < 10 {
			return false;
		}
		let mut desc_reader = &self.buffer[start + 1..start + 10];
		let (left, top, width, height, packed) = ImageFrame::read_descriptor(&mut desc_reader).expect("exactly 9 bytes available");
		let has_lct = ImageFrame::has_local_color_table(packed);
		let lct_len = ImageFrame::local_color_table_len(packed);
		let lct_bytes = if has_lct { lct_len * 3 } else { 0 };
		let header_len = 10 + lct_bytes + 1;
		if self.buffer.len() - start < header_len {
			return false;
		}

		let local_color_table = if has_lct {
			let lct_start = start + 10;
			let mut reader = &self.buffer[lct_start..lct_start + lct_bytes];
			match ColorTable::read(&mut reader, lct_len, ImageFrame::is_sorted(packed)) {
				Ok(table) => Some(table),
				Err(e) => {
					self.error = Some(GifError::from(e));
					return false;
				}
			}
		} else {
			None
		};

		let lzw_min_code_size = self.buffer[start + header_len - 1];
		let scan_offset = start + header_len;
		let (spans, consumed) = match subblock::scan(&self.buffer, scan_offset) {
			Some(result) => result,
			None => return false,
		};

		let mut payload = Vec::with_capacity(1 + spans.iter().map(|&(_, len)| len as usize).sum::<usize>());
		payload.push(lzw_min_code_size);
		payload.extend(subblock::concat(&self.buffer, &spans));

		let frame = ImageFrame {
			left,
			top,
			width,
			height,
			interlaced: ImageFrame::is_interlaced(packed),
			local_color_table,
			lzw_min_code_size,
		};
		let graphic_control = self.pending_graphic_control.take();
		self.blocks.push(BlockDescriptor { kind: BlockKind::Image(frame), graphic_control });
		self.image_payloads.push(Some(payload));
		self.cursor = scan_offset + consumed;
		true
	}

	fn try_parse_extension(&mut self) -> bool {
		let start = self.cursor;
		if self.buffer.len() - start < 2 {
			return false;
		}
		let label = self.buffer[start + 1];
		let scan_offset = start + 2;
		let (spans, consumed) = match subblock::scan(&self.buffer, scan_offset) {
			Some(result) => result,
			None => return false,
		};
		let sub_blocks = subblock::split(&self.buffer, &spans);

		match label {
			extension::LABEL_GRAPHIC_CONTROL => match sub_blocks.as_slice() {
				[only] => match GraphicControl::parse(only) {
					Some(gc) => self.pending_graphic_control = Some(gc),
					None => self.push_unknown_extension(label, sub_blocks),
				},
				_ => self.push_unknown_extension(label, sub_blocks),
			},
			extension::LABEL_PLAIN_TEXT => match sub_blocks.split_first() {
				Some((header, rest)) => {
					let text = rest.concat();
					match Extension::parse_plain_text(header, text) {
						Some(ext) => self.push_extension(ext, true),
						None => self.push_unknown_extension(label, sub_blocks),
					}
				}
				None => self.push_unknown_extension(label, sub_blocks),
			},
			extension::LABEL_COMMENT => {
				let text = sub_blocks.concat();
				self.push_extension(Extension::Comment { text }, false);
			}
			extension::LABEL_APPLICATION => match sub_blocks.split_first() {
				Some((header, rest)) if header.len() == 11 => {
					let mut identifier = [0u8; 8];
					identifier.copy_from_slice(&header[0..8]);
					let mut auth_code = [0u8; 3];
					auth_code.copy_from_slice(&header[8..11]);

					// XMP Data's payload is written raw, not sub-block framed: its
					// own bytes are engineered (via the trailing ramp) to also
					// parse as a valid sub-block sequence, so the generic `split`
					// above has already dropped bytes it mistook for length
					// prefixes. Recover the verbatim span instead of trusting it.
					let app = if &identifier == b"XMP Data" && &auth_code == b"XMP" {
						// The ramp's own final byte is 0x00, which doubles as both
						// its last content byte and the generic scanner's
						// terminator, so the raw span runs all the way to `consumed`.
						let raw_start = scan_offset + 12; // past the header's own length byte + 11-byte payload
						let raw_end = scan_offset + consumed;
						let raw = self.buffer[raw_start..raw_end].to_vec();
						extension::classify_application(identifier, auth_code, vec![raw])
					} else {
						extension::classify_application(identifier, auth_code, rest.to_vec())
					};
					self.push_extension(Extension::Application(app), false);
				}
				_ => self.push_unknown_extension(label, sub_blocks),
			},
			other => self.push_unknown_extension(other, sub_blocks),
		}

		self.cursor = scan_offset + consumed;
		true
	}

	fn push_extension(&mut self, extension: Extension, attach_pending_graphic_control: bool) {
		let graphic_control = if attach_pending_graphic_control { self.pending_graphic_control.take() } else { None };
		self.blocks.push(BlockDescriptor { kind: BlockKind::Extension(extension), graphic_control });
		self.image_payloads.push(None);
	}

	fn push_unknown_extension(&mut self, label: u8, sub_blocks: Vec<Vec<u8>>) {
		self.blocks.push(BlockDescriptor { kind: BlockKind::Extension(Extension::Unknown { label, sub_blocks }), graphic_control: None });
		self.image_payloads.push(None);
	}
}
