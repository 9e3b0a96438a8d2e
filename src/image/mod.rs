/*!
# `JPEG Line` - Image Business
*/

pub(super) mod color;
pub(super) mod gray;
pub(super) mod rect;
pub(super) mod rgb;
pub(super) mod rgba;
pub(super) mod ycbcr;

use crate::{
	Color,
	ColorModel,
	GrayImage,
	Rectangle,
	RgbImage,
	RgbaImage,
	YCbCrImage,
};



/// # Raster.
///
/// The read-side capability every image exposes: a bounds rectangle and a
/// per-pixel [`Color`]. Coordinates outside the bounds read back as
/// transparent black rather than failing.
///
/// The crate's own buffer types also return themselves through
/// [`Raster::native`] so the encoder can skip per-pixel color conversion.
pub trait Raster {
	/// # Bounds.
	fn bounds(&self) -> Rectangle;

	/// # Color Model.
	fn color_model(&self) -> ColorModel;

	/// # Color At.
	fn at(&self, x: i32, y: i32) -> Color;

	/// # Native Layout.
	///
	/// Foreign implementations can leave this as `None`.
	fn native(&self) -> Option<Native<'_>> { None }
}

/// # Writable Raster.
pub trait RasterMut: Raster {
	/// # Set Color.
	///
	/// Out-of-bounds coordinates are silently ignored.
	fn set(&mut self, x: i32, y: i32, color: Color);
}



#[derive(Debug, Clone, Copy)]
/// # Native Layout.
///
/// A borrowed view of one of the crate's own buffer types.
pub enum Native<'a> {
	/// # Greyscale.
	Gray(&'a GrayImage),

	/// # Packed RGB.
	Rgb(&'a RgbImage),

	/// # Packed RGBA.
	Rgba(&'a RgbaImage),

	/// # Planar `YCbCr`.
	YCbCr(&'a YCbCrImage),
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Decoded Image.
///
/// [`decode`](crate::decode) returns one of these, holding whichever layout
/// matched the source and the request.
pub enum Image {
	/// # Greyscale.
	Gray(GrayImage),

	/// # Packed RGB.
	Rgb(RgbImage),

	/// # Packed RGBA.
	Rgba(RgbaImage),

	/// # Planar `YCbCr`.
	YCbCr(YCbCrImage),
}

impl From<GrayImage> for Image {
	#[inline]
	fn from(src: GrayImage) -> Self { Self::Gray(src) }
}

impl From<RgbImage> for Image {
	#[inline]
	fn from(src: RgbImage) -> Self { Self::Rgb(src) }
}

impl From<RgbaImage> for Image {
	#[inline]
	fn from(src: RgbaImage) -> Self { Self::Rgba(src) }
}

impl From<YCbCrImage> for Image {
	#[inline]
	fn from(src: YCbCrImage) -> Self { Self::YCbCr(src) }
}

impl Raster for Image {
	fn bounds(&self) -> Rectangle {
		match self {
			Self::Gray(i) => i.bounds(),
			Self::Rgb(i) => i.bounds(),
			Self::Rgba(i) => i.bounds(),
			Self::YCbCr(i) => i.bounds(),
		}
	}

	fn color_model(&self) -> ColorModel {
		match self {
			Self::Gray(i) => i.color_model(),
			Self::Rgb(i) => i.color_model(),
			Self::Rgba(i) => i.color_model(),
			Self::YCbCr(i) => i.color_model(),
		}
	}

	fn at(&self, x: i32, y: i32) -> Color {
		match self {
			Self::Gray(i) => i.at(x, y),
			Self::Rgb(i) => i.at(x, y),
			Self::Rgba(i) => i.at(x, y),
			Self::YCbCr(i) => i.at(x, y),
		}
	}

	fn native(&self) -> Option<Native<'_>> {
		match self {
			Self::Gray(i) => i.native(),
			Self::Rgb(i) => i.native(),
			Self::Rgba(i) => i.native(),
			Self::YCbCr(i) => i.native(),
		}
	}
}

impl RasterMut for Image {
	fn set(&mut self, x: i32, y: i32, color: Color) {
		match self {
			Self::Gray(i) => i.set(x, y, color),
			Self::Rgb(i) => i.set(x, y, color),
			Self::Rgba(i) => i.set(x, y, color),
			Self::YCbCr(i) => i.set(x, y, color),
		}
	}
}

/// ## Getters.
impl Image {
	#[must_use]
	/// # Width.
	pub fn width(&self) -> usize {
		usize::try_from(self.bounds().dx()).unwrap_or(0)
	}

	#[must_use]
	/// # Height.
	pub fn height(&self) -> usize {
		usize::try_from(self.bounds().dy()).unwrap_or(0)
	}

	#[must_use]
	/// # As `YCbCr`.
	pub const fn as_ycbcr(&self) -> Option<&YCbCrImage> {
		if let Self::YCbCr(i) = self { Some(i) }
		else { None }
	}

	#[must_use]
	/// # As Greyscale.
	pub const fn as_gray(&self) -> Option<&GrayImage> {
		if let Self::Gray(i) = self { Some(i) }
		else { None }
	}
}



/// # Pixel Offset.
///
/// Return the buffer offset of `(x, y)` in a packed buffer with the given
/// stride and bytes per pixel, or `None` if the point is out of bounds.
pub(crate) fn pix_offset(rect: Rectangle, stride: usize, bpp: usize, x: i32, y: i32)
-> Option<usize> {
	if rect.contains(x, y) {
		let col = usize::try_from(x.abs_diff(rect.min.x)).ok()?;
		let row = usize::try_from(y.abs_diff(rect.min.y)).ok()?;
		Some(row * stride + col * bpp)
	}
	else { None }
}

/// # Allocate.
///
/// Return a zeroed buffer for a packed image of the given bounds, along with
/// its stride.
///
/// ## Errors
///
/// Negative dimensions are rejected rather than clamped, and the size must
/// not overflow.
pub(crate) fn alloc(rect: Rectangle, bpp: usize)
-> Result<(Vec<u8>, usize), crate::JpegError> {
	let (w, h) = rect.size()?;
	let stride = w.checked_mul(bpp).ok_or(crate::JpegError::Overflow)?;
	let len = stride.checked_mul(h).ok_or(crate::JpegError::Overflow)?;
	Ok((vec![0; len], stride))
}
