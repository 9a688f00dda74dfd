// everything needed to decode or encode a GIF container, re-exported from one place

pub use crate::{
	color::*,
	decoder::*,
	encoder::*,
	error::*,
	extension::*,
	image::*,
	lzw::*,
	screen::*,
};
