//! Extension block records: graphic control, plain text, comment, and the
//! application extension family (including its recognized specializations).

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

pub const LABEL_PLAIN_TEXT: u8 = 0x01;
pub const LABEL_GRAPHIC_CONTROL: u8 = 0xF9;
pub const LABEL_COMMENT: u8 = 0xFE;
pub const LABEL_APPLICATION: u8 = 0xFF;

/// The length of the magic "ramp" trailer XMP Data application extensions
/// append to their raw XML payload, chosen so the trailer's bytes also
/// parse as a valid (if nonsensical) sub-block length sequence: `0x01`,
/// then 256 descending bytes `0xff..=0x00`, then an explicit trailing
/// `0x00` (1 + 256 + 1 = 258).
pub const XMP_MAGIC_TRAILER_LEN: usize = 258;

/// How a decoder/compositor should treat the current frame's pixels before
/// drawing the next one. `Reserved` preserves values 4..=7, which the
/// format defines but never assigns meaning to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Disposal {
	None,
	Keep,
	RestoreBackground,
	RestorePrevious,
	Reserved(u8),
}

impl Disposal {
	fn from_bits(bits: u8) -> Self {
		match bits {
			0 => Disposal::None,
			1 => Disposal::Keep,
			2 => Disposal::RestoreBackground,
			3 => Disposal::RestorePrevious,
			other => Disposal::Reserved(other),
		}
	}

	fn to_bits(self) -> u8 {
		match self {
			Disposal::None => 0,
			Disposal::Keep => 1,
			Disposal::RestoreBackground => 2,
			Disposal::RestorePrevious => 3,
			Disposal::Reserved(bits) => bits,
		}
	}
}

/// Carries disposal/timing/transparency hints for the *next* image or
/// plain-text block. Single-slot and consumed on use: if a second graphic
/// control extension appears before any image or plain-text block consumes
/// the first, the first is silently discarded (last-writer-wins).
#[derive(Debug, Copy, Clone)]
pub struct GraphicControl {
	pub disposal: Disposal,
	pub delay_centiseconds: u16,
	pub user_input: bool,
	pub transparent_index: Option<u8>,
}

impl GraphicControl {
	pub(crate) fn parse(payload: &[u8]) -> Option<Self> {
		if payload.len() != 4 {
			return None;
		}
		let packed = payload[0];
		let delay_centiseconds = u16::from_le_bytes([payload[1], payload[2]]);
		let transparent_index = if packed & 0b0000_0001 != 0 { Some(payload[3]) } else { None };
		Some(GraphicControl {
			disposal: Disposal::from_bits((packed & 0b0001_1100) >> 2),
			delay_centiseconds,
			user_input: packed & 0b0000_0010 != 0,
			transparent_index,
		})
	}

	pub(crate) fn write<T: WriteBytesExt>(&self, writer: &mut T) -> Result<(), std::io::Error> {
		let mut packed = self.disposal.to_bits() << 2;
		if self.user_input {
			packed |= 0b0000_0010;
		}
		if self.transparent_index.is_some() {
			packed |= 0b0000_0001;
		}
		writer.write_u8(packed)?;
		writer.write_u16::<LittleEndian>(self.delay_centiseconds)?;
		writer.write_u8(self.transparent_index.unwrap_or(0))?;
		Ok(())
	}
}

/// The application extensions this codec assigns special meaning to,
/// recognized by `(identifier, auth_code)` after the generic application
/// extension's header is read.
#[derive(Debug, Clone)]
pub enum ApplicationExtension {
	/// Netscape's animation looping extension (`NETSCAPE2.0`).
	Netscape { loop_count: Option<u16>, unknown_sub_blocks: Vec<Vec<u8>> },
	/// An older, functionally identical looping extension some encoders
	/// emit instead (`ANIMEXTS1.0`).
	Animexts { loop_count: Option<u16>, unknown_sub_blocks: Vec<Vec<u8>> },
	/// Embedded XMP metadata (`XMP DataXMP`), carried opaquely.
	Xmp { payload: Vec<u8> },
	/// Embedded ICC color profile (`ICCRGBG1012`), carried opaquely.
	Icc { payload: Vec<u8> },
	/// Any application extension not recognized above.
	Generic { identifier: [u8; 8], auth_code: [u8; 3], sub_blocks: Vec<Vec<u8>> },
}

/// Inspects an application extension's identifier/auth code and upgrades it
/// to a recognized specialization if possible, otherwise keeps it generic.
pub(crate) fn classify_application(identifier: [u8; 8], auth_code: [u8; 3], sub_blocks: Vec<Vec<u8>>) -> ApplicationExtension {
	match (&identifier, &auth_code) {
		(b"NETSCAPE", b"2.0") => {
			let (loop_count, unknown_sub_blocks) = parse_loop_sub_blocks(&sub_blocks);
			ApplicationExtension::Netscape { loop_count, unknown_sub_blocks }
		}
		(b"ANIMEXTS", b"1.0") => {
			let (loop_count, unknown_sub_blocks) = parse_loop_sub_blocks(&sub_blocks);
			ApplicationExtension::Animexts { loop_count, unknown_sub_blocks }
		}
		(b"XMP Data", b"XMP") => {
			let mut payload: Vec<u8> = sub_blocks.into_iter().flatten().collect();
			let trailer_start = payload.len().saturating_sub(XMP_MAGIC_TRAILER_LEN);
			payload.truncate(trailer_start);
			ApplicationExtension::Xmp { payload }
		}
		(b"ICCRGBG1", b"012") => ApplicationExtension::Icc { payload: sub_blocks.into_iter().flatten().collect() },
		_ => ApplicationExtension::Generic { identifier, auth_code, sub_blocks },
	}
}

/// Parses the `id=1 length=3` (loop count) and `id=2 length=5` (buffer
/// size) sub-blocks NETSCAPE/ANIMEXTS extensions use, per §4.5. Buffer-size
/// sub-blocks aren't surfaced separately (nothing downstream needs them)
/// but are still recognized so they don't show up as "unknown". If more
/// than one loop sub-block appears, the last one wins.
fn parse_loop_sub_blocks(sub_blocks: &[Vec<u8>]) -> (Option<u16>, Vec<Vec<u8>>) {
	let mut loop_count = None;
	let mut unknown = Vec::new();
	for block in sub_blocks {
		match (block.first(), block.len()) {
			(Some(&1), 3) => loop_count = Some(u16::from_le_bytes([block[1], block[2]])),
			(Some(&2), 5) => {} // buffer size, recognized but not retained
			_ => unknown.push(block.clone()),
		}
	}
	(loop_count, unknown)
}

/// A parsed extension block, tagged by which kind of payload it carries.
#[derive(Debug, Clone)]
pub enum Extension {
	PlainText {
		left: u16,
		top: u16,
		width: u16,
		height: u16,
		cell_width: u8,
		cell_height: u8,
		fg_color_index: u8,
		bg_color_index: u8,
		text: Vec<u8>,
	},
	Comment {
		text: Vec<u8>,
	},
	Application(ApplicationExtension),
	Unknown {
		label: u8,
		sub_blocks: Vec<Vec<u8>>,
	},
}

impl Extension {
	pub(crate) fn parse_plain_text(first_sub_block: &[u8], text: Vec<u8>) -> Option<Self> {
		if first_sub_block.len() != 12 {
			return None;
		}
		let left = u16::from_le_bytes([first_sub_block[0], first_sub_block[1]]);
		let top = u16::from_le_bytes([first_sub_block[2], first_sub_block[3]]);
		let width = u16::from_le_bytes([first_sub_block[4], first_sub_block[5]]);
		let height = u16::from_le_bytes([first_sub_block[6], first_sub_block[7]]);
		Some(Extension::PlainText {
			left,
			top,
			width,
			height,
			cell_width: first_sub_block[8],
			cell_height: first_sub_block[9],
			fg_color_index: first_sub_block[10],
			bg_color_index: first_sub_block[11],
			text,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn graphic_control_round_trips() {
		let gc = GraphicControl { disposal: Disposal::RestoreBackground, delay_centiseconds: 50, user_input: true, transparent_index: Some(7) };
		let mut buf = Vec::new();
		gc.write(&mut buf).unwrap();
		let parsed = GraphicControl::parse(&buf).unwrap();
		assert_eq!(Disposal::RestoreBackground, parsed.disposal);
		assert_eq!(50, parsed.delay_centiseconds);
		assert!(parsed.user_input);
		assert_eq!(Some(7), parsed.transparent_index);
	}

	#[test]
	fn graphic_control_without_transparency() {
		let gc = GraphicControl { disposal: Disposal::None, delay_centiseconds: 0, user_input: false, transparent_index: None };
		let mut buf = Vec::new();
		gc.write(&mut buf).unwrap();
		let parsed = GraphicControl::parse(&buf).unwrap();
		assert_eq!(None, parsed.transparent_index);
	}

	#[test]
	fn netscape_loop_count_zero_means_infinite() {
		let sub_blocks = vec![vec![0x01u8, 0x00, 0x00]];
		let ext = classify_application(*b"NETSCAPE", *b"2.0", sub_blocks);
		match ext {
			ApplicationExtension::Netscape { loop_count, unknown_sub_blocks } => {
				assert_eq!(Some(0), loop_count);
				assert!(unknown_sub_blocks.is_empty());
			}
			_ => panic!("expected Netscape variant"),
		}
	}

	#[test]
	fn last_loop_sub_block_wins() {
		let sub_blocks = vec![vec![0x01u8, 0x05, 0x00], vec![0x01u8, 0x0A, 0x00]];
		let (loop_count, _) = parse_loop_sub_blocks(&sub_blocks);
		assert_eq!(Some(10), loop_count);
	}

	#[test]
	fn xmp_strips_magic_trailer() {
		let body = b"<xml>hi</xml>".to_vec();
		let mut raw = body.clone();
		raw.extend(std::iter::repeat(0xAAu8).take(XMP_MAGIC_TRAILER_LEN));
		let ext = classify_application(*b"XMP Data", *b"XMP", vec![raw]);
		match ext {
			ApplicationExtension::Xmp { payload } => assert_eq!(body, payload),
			_ => panic!("expected Xmp variant"),
		}
	}

	#[test]
	fn xmp_strips_hand_built_258_byte_ramp_trailer() {
		// Mirrors write_xmp_data_extension's exact byte sequence: 0x01, then
		// 256 descending bytes 0xff..=0x00, then an explicit trailing 0x00.
		// Built independently of XMP_MAGIC_TRAILER_LEN so a regression in
		// that constant doesn't also hide itself here.
		let body = b"<x:xmpmeta>hello</x:xmpmeta>".to_vec();
		let mut raw = body.clone();
		raw.push(0x01);
		for i in 0..=0xFFu16 {
			raw.push((0xFF - i) as u8);
		}
		raw.push(0x00);
		assert_eq!(258, raw.len() - body.len());

		let ext = classify_application(*b"XMP Data", *b"XMP", vec![raw]);
		match ext {
			ApplicationExtension::Xmp { payload } => assert_eq!(body, payload),
			_ => panic!("expected Xmp variant"),
		}
	}

	#[test]
	fn unrecognized_application_stays_generic() {
		let ext = classify_application(*b"UNKNOWN!", *b"xyz", vec![vec![1, 2, 3]]);
		assert!(matches!(ext, ApplicationExtension::Generic { .. }));
	}
}
