/*!
# `JPEG Line` - Packed RGBA
*/

use crate::{
	Color,
	ColorModel,
	JpegError,
	Native,
	Raster,
	RasterMut,
	Rectangle,
};
use rgb::{
	FromSlice,
	RGBA8,
};
use std::ops::Deref;
use super::color::{
	narrow,
	widen,
};



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # RGBA Image.
///
/// Four bytes per pixel, alpha-premultiplied, in the usual `[R, G, B, A…]`
/// order. Freshly allocated buffers are transparent black.
///
/// JPEG has no alpha of its own, so decoded images are always fully opaque.
pub struct RgbaImage {
	pixels: Vec<u8>,
	stride: usize,
	rect: Rectangle,
}

impl Deref for RgbaImage {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &Self::Target { &self.pixels }
}

impl Raster for RgbaImage {
	#[inline]
	fn bounds(&self) -> Rectangle { self.rect }

	#[inline]
	fn color_model(&self) -> ColorModel { ColorModel::Rgba }

	fn at(&self, x: i32, y: i32) -> Color {
		let px = self.rgba_at(x, y);
		Color::new(widen(px.r), widen(px.g), widen(px.b), widen(px.a))
	}

	#[inline]
	fn native(&self) -> Option<Native<'_>> { Some(Native::Rgba(self)) }
}

impl RasterMut for RgbaImage {
	fn set(&mut self, x: i32, y: i32, color: Color) {
		self.set_rgba(
			x,
			y,
			RGBA8::new(narrow(color.r), narrow(color.g), narrow(color.b), narrow(color.a)),
		);
	}
}

impl RgbaImage {
	/// # New.
	///
	/// Allocate a transparent image covering `rect`.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Dimensions`] if the rectangle has negative size.
	pub fn new(rect: Rectangle) -> Result<Self, JpegError> {
		let (pixels, stride) = super::alloc(rect, 4)?;
		Ok(Self { pixels, stride, rect })
	}
}

/// ## Getters.
impl RgbaImage {
	#[must_use]
	/// # Stride.
	pub const fn stride(&self) -> usize { self.stride }

	#[must_use]
	/// # Pixel Offset.
	pub fn pix_offset(&self, x: i32, y: i32) -> Option<usize> {
		super::pix_offset(self.rect, self.stride, 4, x, y)
	}

	#[must_use]
	/// # RGBA At.
	///
	/// Return the stored (premultiplied) 8-bit pixel, or transparent black if
	/// out of bounds.
	pub fn rgba_at(&self, x: i32, y: i32) -> RGBA8 {
		self.pix_offset(x, y)
			.and_then(|i| self.pixels.get(i..i + 4))
			.map_or_else(RGBA8::default, |px| px.as_rgba()[0])
	}

	#[must_use]
	/// # Row.
	///
	/// Return the pixels of one row (relative to `rect.min.y`).
	pub fn row(&self, row: usize) -> Option<&[RGBA8]> {
		let start = row.checked_mul(self.stride)?;
		self.pixels.get(start..start + self.stride).map(FromSlice::as_rgba)
	}

	#[must_use]
	/// # Is Opaque?
	///
	/// Returns `true` if every pixel has full alpha.
	pub fn is_opaque(&self) -> bool {
		self.pixels.as_rgba().iter().all(|px| px.a == 255)
	}

	#[must_use]
	/// # Into Raw.
	pub fn into_raw(self) -> Vec<u8> { self.pixels }
}

/// ## Setters.
impl RgbaImage {
	/// # Set RGBA.
	///
	/// Out-of-bounds writes are ignored.
	pub fn set_rgba(&mut self, x: i32, y: i32, color: RGBA8) {
		if let Some(px) = self.pix_offset(x, y).and_then(|i| self.pixels.get_mut(i..i + 4)) {
			px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
		}
	}

	/// # Row (Mutable).
	pub(crate) fn row_mut(&mut self, row: usize) -> Option<&mut [u8]> {
		let start = row.checked_mul(self.stride)?;
		self.pixels.get_mut(start..start + self.stride)
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_rgba() {
		let mut img = RgbaImage::new(Rectangle::from_size(4, 8)).unwrap();
		assert_eq!(img.stride(), 16);
		assert_eq!(img.len(), 128);
		assert!(! img.is_opaque());
		assert_eq!(img.at(0, 0), Color::new(0, 0, 0, 0));

		let red = Color::new(0xFFFF, 0, 0, 0xFFFF);
		for y in 0..8 {
			for x in 0..4 { img.set(x, y, red); }
		}
		assert!(img.is_opaque());
		assert_eq!(img.at(3, 7), red);
		assert_eq!(img.rgba_at(3, 7), RGBA8::new(255, 0, 0, 255));
		assert_eq!(img.pix_offset(3, 7), Some(7 * 16 + 12));

		// Out of bounds.
		img.set(4, 0, Color::new(1, 1, 1, 1));
		assert_eq!(img.at(4, 0), Color::new(0, 0, 0, 0));
		assert_eq!(img.rgba_at(-1, 0), RGBA8::default());

		// Premultiplied values are kept as-is.
		img.set_rgba(1, 1, RGBA8::new(64, 32, 0, 128));
		assert_eq!(img.at(1, 1), Color::new(0x4040, 0x2020, 0, 0x8080));
		assert!(! img.is_opaque());
	}
}
