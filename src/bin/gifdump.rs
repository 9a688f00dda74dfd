//! A thin dump tool: reads a single GIF file and prints a human-readable
//! structural listing of its blocks. Not part of the core codec — it only
//! exercises the public `Decoder` API.
//!
//! Usage: `gifdump <file.gif>`

use std::fs;

use anyhow::{bail, Context};

use gif_codec::decoder::{BlockKind, Decoder};
use gif_codec::extension::{ApplicationExtension, Extension};

fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

	let path = match std::env::args().nth(1) {
		Some(path) => path,
		None => {
			eprintln!("usage: gifdump <file.gif>");
			std::process::exit(1);
		}
	};

	if let Err(err) = dump(&path) {
		eprintln!("gifdump: {err:#}");
		std::process::exit(1);
	}

	Ok(())
}

fn dump(path: &str) -> anyhow::Result<()> {
	let bytes = fs::read(path).with_context(|| format!("reading {path}"))?;

	let mut decoder = Decoder::new();
	decoder.feed(&bytes);

	if let Some(err) = decoder.error() {
		bail!("{err}");
	}
	if !decoder.is_gif() {
		bail!("not a GIF file");
	}

	let screen = decoder.screen().context("truncated before the logical screen descriptor")?;
	println!("logical screen: {}x{}", screen.width, screen.height);
	println!("  original depth: {} bits", screen.original_depth);
	println!("  background index: {}", screen.background_index);
	println!("  pixel aspect ratio: {}", screen.pixel_aspect_ratio);
	match &screen.global_color_table {
		Some(table) => println!("  global color table: {} colors (sorted={})", table.len(), table.sorted()),
		None => println!("  global color table: none"),
	}

	for (index, block) in decoder.blocks().iter().enumerate() {
		if let Some(gc) = &block.graphic_control {
			println!(
				"[{index}] graphic control: disposal={:?} delay={}cs user_input={} transparent={:?}",
				gc.disposal, gc.delay_centiseconds, gc.user_input, gc.transparent_index
			);
		}
		match &block.kind {
			BlockKind::Image(frame) => {
				println!(
					"[{index}] image: {}x{} at ({}, {}) interlaced={} lzw_min_code_size={}",
					frame.width, frame.height, frame.left, frame.top, frame.interlaced, frame.lzw_min_code_size
				);
				if let Some(table) = &frame.local_color_table {
					println!("       local color table: {} colors", table.len());
				}
				match decoder.decode_image(index) {
					Ok(decoded) => println!(
						"       {} pixels decoded (eoi_seen={}, first_was_clear={}, trailing_bytes={})",
						decoded.pixels.len(),
						decoded.eoi_seen,
						decoded.first_was_clear,
						decoded.trailing_bytes.len()
					),
					Err(err) => println!("       LZW decode failed: {err}"),
				}
			}
			BlockKind::Extension(extension) => print_extension(index, extension),
			BlockKind::Trailer => println!("[{index}] trailer"),
			BlockKind::Unknown { byte } => println!("[{index}] unknown block type: 0x{byte:02x}"),
		}
	}

	if !decoder.is_complete() {
		if decoder.has_unknown_block() {
			bail!("parsing stopped at an unrecognized block type before the trailer");
		}
		bail!("truncated: no trailer seen");
	}

	Ok(())
}

fn print_extension(index: usize, extension: &Extension) {
	match extension {
		Extension::PlainText { left, top, width, height, text, .. } => {
			println!("[{index}] plain text: {width}x{height} at ({left}, {top}), {} bytes of text", text.len());
		}
		Extension::Comment { text } => {
			println!("[{index}] comment: {} bytes ({:?})", text.len(), String::from_utf8_lossy(text));
		}
		Extension::Application(app) => match app {
			ApplicationExtension::Netscape { loop_count, .. } => {
				println!("[{index}] application: NETSCAPE2.0 loop_count={loop_count:?}");
			}
			ApplicationExtension::Animexts { loop_count, .. } => {
				println!("[{index}] application: ANIMEXTS1.0 loop_count={loop_count:?}");
			}
			ApplicationExtension::Xmp { payload } => {
				println!("[{index}] application: XMP Data, {} bytes", payload.len());
			}
			ApplicationExtension::Icc { payload } => {
				println!("[{index}] application: ICCRGBG1012, {} bytes", payload.len());
			}
			ApplicationExtension::Generic { identifier, auth_code, sub_blocks } => {
				println!(
					"[{index}] application: {}{} ({} sub-blocks)",
					String::from_utf8_lossy(identifier),
					String::from_utf8_lossy(auth_code),
					sub_blocks.len()
				);
			}
		},
		Extension::Unknown { label, sub_blocks } => {
			println!("[{index}] unknown extension: label=0x{label:02x} ({} sub-blocks)", sub_blocks.len());
		}
	}
}
