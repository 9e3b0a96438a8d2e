/*!
# `JPEG Line` - Greyscale
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
use std::ops::Deref;
use super::color::{
	gray16,
	gray_color,
	narrow,
};



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Greyscale Image.
///
/// One byte of luma per pixel. Single-component JPEGs decode to this.
pub struct GrayImage {
	pixels: Vec<u8>,
	stride: usize,
	rect: Rectangle,
}

impl Deref for GrayImage {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &Self::Target { &self.pixels }
}

impl Raster for GrayImage {
	#[inline]
	fn bounds(&self) -> Rectangle { self.rect }

	#[inline]
	fn color_model(&self) -> ColorModel { ColorModel::Gray }

	#[inline]
	fn at(&self, x: i32, y: i32) -> Color {
		self.gray_at(x, y).map_or(Color::new(0, 0, 0, 0), |v| gray_color(u16::from(v) * 0x101))
	}

	#[inline]
	fn native(&self) -> Option<Native<'_>> { Some(Native::Gray(self)) }
}

impl RasterMut for GrayImage {
	#[inline]
	fn set(&mut self, x: i32, y: i32, color: Color) {
		self.set_gray(x, y, narrow(gray16(color)));
	}
}

impl GrayImage {
	/// # New.
	///
	/// Allocate a black image covering `rect`.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Dimensions`] if the rectangle has negative size.
	pub fn new(rect: Rectangle) -> Result<Self, JpegError> {
		let (pixels, stride) = super::alloc(rect, 1)?;
		Ok(Self { pixels, stride, rect })
	}
}

/// ## Getters.
impl GrayImage {
	#[must_use]
	/// # Stride.
	pub const fn stride(&self) -> usize { self.stride }

	#[must_use]
	/// # Pixel Offset.
	pub fn pix_offset(&self, x: i32, y: i32) -> Option<usize> {
		super::pix_offset(self.rect, self.stride, 1, x, y)
	}

	#[must_use]
	/// # Luma At.
	///
	/// Returns `None` if the point is out of bounds.
	pub fn gray_at(&self, x: i32, y: i32) -> Option<u8> {
		self.pix_offset(x, y).and_then(|i| self.pixels.get(i).copied())
	}

	#[must_use]
	/// # Row.
	pub fn row(&self, row: usize) -> Option<&[u8]> {
		let start = row.checked_mul(self.stride)?;
		self.pixels.get(start..start + self.stride)
	}

	#[must_use]
	/// # Into Raw.
	pub fn into_raw(self) -> Vec<u8> { self.pixels }
}

/// ## Setters.
impl GrayImage {
	/// # Set Luma.
	///
	/// Out-of-bounds writes are ignored.
	pub fn set_gray(&mut self, x: i32, y: i32, v: u8) {
		if let Some(px) = self.pix_offset(x, y).and_then(|i| self.pixels.get_mut(i)) {
			*px = v;
		}
	}

	/// # Row (Mutable).
	pub(crate) fn row_mut(&mut self, row: usize) -> Option<&mut [u8]> {
		let start = row.checked_mul(self.stride)?;
		self.pixels.get_mut(start..start + self.stride)
	}
}
