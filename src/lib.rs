/*!
# `JPEG Line`

Scanline-driven JPEG decoding and encoding into in-memory pixel buffers.

Decoding can target an aligned planar `YCbCr` buffer (the default), packed
RGB, packed RGBA, or single-plane greyscale, optionally downscaled in the DCT
domain. Encoding accepts any [`Raster`], with fast paths for the crate's own
buffer types.

Each call binds its byte stream to the engine through a source or
destination manager registered in a [`Registry`]. The entry is removed before
the call returns, however it returns.

## Examples

```no_run
use jpegline::{DecoderOptions, EncoderOptions, Raster};

let raw = std::fs::read("/path/to/my.jpg").unwrap();
let img = jpegline::decode(raw.as_slice(), &DecoderOptions::default()).unwrap();
let bounds = img.bounds();

let mut out: Vec<u8> = Vec::new();
jpegline::encode(&mut out, &img, &EncoderOptions::with_quality(90)).unwrap();
```
*/

#![forbid(unsafe_code)]

#![warn(clippy::filetype_is_file)]
#![warn(clippy::integer_division)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suboptimal_flops)]
#![warn(clippy::unneeded_field_pattern)]
#![warn(macro_use_extern_crate)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(non_ascii_idents)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_crate_dependencies)]
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]

#![allow(clippy::module_name_repetitions)]



mod codec;
mod dec;
mod enc;
mod error;
mod image;
mod jpeg;
mod manager;
mod matcher;

#[cfg(test)] use tracing_subscriber as _;

pub use dec::{
	Config,
	Decoded,
	options::DecoderOptions,
};
pub use enc::options::{
	ColorSpace,
	EncoderOptions,
};
pub use error::{
	JpegError,
	Warning,
};
pub use image::{
	Image,
	Native,
	Raster,
	RasterMut,
	color::{
		Color,
		ColorModel,
		RgbColor,
	},
	gray::GrayImage,
	rect::{
		Point,
		Rectangle,
	},
	rgb::RgbImage,
	rgba::RgbaImage,
	ycbcr::{
		Plane,
		SubsampleRatio,
		YCbCrImage,
	},
};
pub use jpeg::Jpeg;
pub use manager::{
	Entry,
	Handle,
	ManagerKind,
	Registry,
};
pub use matcher::{
	Mismatch,
	match_color,
	match_image,
};

use std::io::{
	Read,
	Write,
};



/// # DCT Block Size.
///
/// The edge length, in samples, of one DCT block.
pub const BLOCK_SIZE: usize = 8;

/// # Default Quality.
///
/// Encoding quality used when the caller leaves it unset (zero).
pub const DEFAULT_QUALITY: u8 = 75;

/// # Maximum Quality.
pub const MAX_QUALITY: u8 = 100;

/// # Maximum Dimension.
///
/// JPEG stores width and height as 16-bit values.
pub const MAX_DIMENSION: usize = 65_535;



#[must_use]
/// # Supports RGBA?
///
/// Returns `true` if this build can decode directly into [`RgbaImage`]
/// buffers. The path is controlled by the `rgba` crate feature.
pub const fn supports_rgba() -> bool { cfg!(feature = "rgba") }

/// # Decode Config.
///
/// Read just enough of the stream to report the dimensions and color model,
/// without allocating any pixel storage.
///
/// ## Errors
///
/// Returns [`JpegError::Format`] if the stream does not begin with a usable
/// JPEG header.
pub fn decode_config<R: Read>(src: R) -> Result<Config, JpegError> {
	Jpeg::global().decode_config(src)
}

/// # Decode.
///
/// Decode a JPEG stream into an aligned planar [`YCbCrImage`], or a
/// [`GrayImage`] for single-component sources.
///
/// See [`Jpeg::decode`] for details.
///
/// ## Errors
///
/// Returns an error if the stream is not a JPEG, the engine gives up, or the
/// underlying reader fails.
pub fn decode<R: Read>(src: R, opts: &DecoderOptions) -> Result<Image, JpegError> {
	Jpeg::global().decode(src, opts)
}

/// # Decode Into RGB.
///
/// ## Errors
///
/// See [`decode`].
pub fn decode_into_rgb<R: Read>(src: R, opts: &DecoderOptions)
-> Result<RgbImage, JpegError> {
	Jpeg::global().decode_into_rgb(src, opts)
}

/// # Decode Into RGBA.
///
/// ## Errors
///
/// In addition to the [`decode`] errors, this returns
/// [`JpegError::Unsupported`] when the build lacks the `rgba` feature.
pub fn decode_into_rgba<R: Read>(src: R, opts: &DecoderOptions)
-> Result<RgbaImage, JpegError> {
	Jpeg::global().decode_into_rgba(src, opts)
}

/// # Encode.
///
/// Encode any [`Raster`] as a JPEG stream.
///
/// ## Errors
///
/// Returns [`JpegError::EmptyImage`] for zero-area images, and engine or I/O
/// errors otherwise.
pub fn encode<W, I>(dst: W, img: &I, opts: &EncoderOptions)
-> Result<(), JpegError>
where W: Write, I: Raster + ?Sized {
	Jpeg::global().encode(dst, img, opts)
}
