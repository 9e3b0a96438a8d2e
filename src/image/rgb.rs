/*!
# `JPEG Line` - Packed RGB
*/

use crate::{
	Color,
	ColorModel,
	JpegError,
	Native,
	Raster,
	RasterMut,
	Rectangle,
	RgbColor,
};
use rgb::{
	FromSlice,
	RGB8,
};
use std::ops::Deref;



#[derive(Debug, Clone, Eq, PartialEq)]
/// # RGB Image.
///
/// Three bytes per pixel (`[R, G, B, R, G, B…]`), no alpha. The pixel at
/// `(x, y)` starts at `(y - rect.min.y) * stride + (x - rect.min.x) * 3`.
///
/// The shape (stride and bounds) is fixed at construction; only the pixel
/// values can change.
pub struct RgbImage {
	pixels: Vec<u8>,
	stride: usize,
	rect: Rectangle,
}

impl Deref for RgbImage {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &Self::Target { &self.pixels }
}

impl Raster for RgbImage {
	#[inline]
	fn bounds(&self) -> Rectangle { self.rect }

	#[inline]
	fn color_model(&self) -> ColorModel { ColorModel::Rgb }

	/// # Color At.
	///
	/// Out-of-bounds reads return black. Note that, unlike most rasters,
	/// even that black is opaque, as RGB has no alpha to speak of.
	#[inline]
	fn at(&self, x: i32, y: i32) -> Color { self.rgb_at(x, y).into() }

	#[inline]
	fn native(&self) -> Option<Native<'_>> { Some(Native::Rgb(self)) }
}

impl RasterMut for RgbImage {
	#[inline]
	fn set(&mut self, x: i32, y: i32, color: Color) {
		self.set_rgb(x, y, RgbColor::from(color));
	}
}

impl RgbImage {
	/// # New.
	///
	/// Allocate a zeroed (black) image covering `rect`.
	///
	/// ## Errors
	///
	/// Rectangles with negative dimensions (only possible when the fields
	/// were set by hand) return [`JpegError::Dimensions`]; they are not
	/// clamped.
	pub fn new(rect: Rectangle) -> Result<Self, JpegError> {
		let (pixels, stride) = super::alloc(rect, 3)?;
		Ok(Self { pixels, stride, rect })
	}

	/// # From Raw.
	///
	/// Wrap an existing buffer of tightly-packed rows.
	///
	/// ## Errors
	///
	/// Returns an error if the buffer length does not match the bounds.
	pub fn from_raw(rect: Rectangle, pixels: Vec<u8>) -> Result<Self, JpegError> {
		let (w, h) = rect.size()?;
		let stride = w.checked_mul(3).ok_or(JpegError::Overflow)?;
		if Some(pixels.len()) == stride.checked_mul(h) {
			Ok(Self { pixels, stride, rect })
		}
		else { Err(JpegError::Overflow) }
	}
}

/// ## Getters.
impl RgbImage {
	#[must_use]
	/// # Stride.
	///
	/// The distance in bytes between vertically adjacent pixels.
	pub const fn stride(&self) -> usize { self.stride }

	#[must_use]
	/// # Pixel Offset.
	///
	/// Return the index of the first byte of the pixel at `(x, y)`, or `None`
	/// if the point is out of bounds.
	pub fn pix_offset(&self, x: i32, y: i32) -> Option<usize> {
		super::pix_offset(self.rect, self.stride, 3, x, y)
	}

	#[must_use]
	/// # RGB At.
	///
	/// The same as [`Raster::at`], but returns the native [`RgbColor`].
	pub fn rgb_at(&self, x: i32, y: i32) -> RgbColor {
		self.pix_offset(x, y)
			.and_then(|i| self.pixels.get(i..i + 3))
			.map_or_else(RgbColor::default, |px| RgbColor::new(px[0], px[1], px[2]))
	}

	#[must_use]
	/// # Row.
	///
	/// Return the pixels of one row (relative to `rect.min.y`).
	pub fn row(&self, row: usize) -> Option<&[RGB8]> {
		let width = self.stride / 3;
		let start = row.checked_mul(self.stride)?;
		self.pixels.get(start..start + width * 3).map(FromSlice::as_rgb)
	}

	#[must_use]
	/// # Into Raw.
	pub fn into_raw(self) -> Vec<u8> { self.pixels }
}

/// ## Setters.
impl RgbImage {
	/// # Set RGB.
	///
	/// The same as [`RasterMut::set`], but takes a native [`RgbColor`],
	/// skipping the generic conversion. Out-of-bounds writes are ignored.
	pub fn set_rgb(&mut self, x: i32, y: i32, color: RgbColor) {
		if let Some(px) = self.pix_offset(x, y).and_then(|i| self.pixels.get_mut(i..i + 3)) {
			px[0] = color.r;
			px[1] = color.g;
			px[2] = color.b;
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
	fn t_new() {
		let img = RgbImage::new(Rectangle::new(2, 3, 12, 8)).unwrap();
		assert_eq!(img.stride(), 30);
		assert_eq!(img.len(), 30 * 5);
		assert!(img.iter().all(|&b| b == 0));

		// Zero-area is fine; it just has no storage.
		let empty = RgbImage::new(Rectangle::from_size(0, 100)).unwrap();
		assert!(empty.is_empty());

		// Negative is not.
		let bad = Rectangle {
			min: crate::Point::new(10, 0),
			max: crate::Point::new(0, 10),
		};
		assert!(matches!(RgbImage::new(bad), Err(JpegError::Dimensions)));
	}

	#[test]
	fn t_get_set() {
		let mut img = RgbImage::new(Rectangle::new(-2, -2, 2, 2)).unwrap();
		let teal = RgbColor::new(0, 128, 128);

		img.set_rgb(-2, -2, teal);
		assert_eq!(img.pix_offset(-2, -2), Some(0));
		assert_eq!(img.rgb_at(-2, -2), teal);
		assert_eq!(&img[..3], &[0, 128, 128]);

		img.set(1, 1, Color::new(0xFFFF, 0x0000, 0x8080, 0x8080));
		assert_eq!(img.rgb_at(1, 1), RgbColor::new(255, 0, 128));
		assert_eq!(img.at(1, 1), Color::new(0xFFFF, 0x0000, 0x8080, 0xFFFF));

		// Out of bounds.
		img.set_rgb(2, 2, teal);
		img.set(-3, 0, Color::new(1, 1, 1, 1));
		assert_eq!(img.rgb_at(2, 2), RgbColor::default());
		assert_eq!(img.at(50, 50), Color::new(0, 0, 0, 0xFFFF));
		assert_eq!(img.pix_offset(2, 0), None);

		let row = img.row(3).unwrap();
		assert_eq!(row.len(), 4);
		assert_eq!(row[3], RGB8::new(255, 0, 128));
		assert!(img.row(4).is_none());
	}

	#[test]
	fn t_from_raw() {
		assert!(RgbImage::from_raw(Rectangle::from_size(2, 2), vec![0; 12]).is_ok());
		assert!(RgbImage::from_raw(Rectangle::from_size(2, 2), vec![0; 11]).is_err());
	}
}
