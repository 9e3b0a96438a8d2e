/*!
# `JPEG Line` - Planar `YCbCr`
*/

use crate::{
	BLOCK_SIZE,
	Color,
	ColorModel,
	JpegError,
	Native,
	Raster,
	RasterMut,
	Rectangle,
	RgbColor,
};
use std::{
	fmt,
	ops::Deref,
};
use super::color::{
	rgb_to_ycbcr,
	ycbcr_color,
};



/// # Alignment.
///
/// Plane extents are rounded up to this many samples and then given one
/// extra block of slack, enough for the engine's widest (16×16) MCU.
const ALIGN: usize = 16;



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Chroma Subsampling.
///
/// The resolution of the two chroma planes relative to luma.
pub enum SubsampleRatio {
	#[default]
	/// # 4:4:4 (Full).
	R444,

	/// # 4:4:0 (Vertical Halved).
	R440,

	/// # 4:2:2 (Horizontal Halved).
	R422,

	/// # 4:2:0 (Both Halved).
	R420,
}

impl fmt::Display for SubsampleRatio {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl SubsampleRatio {
	/// # All Ratios.
	pub const ALL: [Self; 4] = [Self::R444, Self::R440, Self::R422, Self::R420];

	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::R444 => "4:4:4",
			Self::R440 => "4:4:0",
			Self::R422 => "4:2:2",
			Self::R420 => "4:2:0",
		}
	}

	#[must_use]
	/// # Horizontal Factor.
	///
	/// The number of luma columns sharing one chroma sample.
	pub const fn h_factor(self) -> usize {
		match self {
			Self::R444 | Self::R440 => 1,
			Self::R422 | Self::R420 => 2,
		}
	}

	#[must_use]
	/// # Vertical Factor.
	///
	/// The number of luma rows sharing one chroma sample.
	pub const fn v_factor(self) -> usize {
		match self {
			Self::R444 | Self::R422 => 1,
			Self::R440 | Self::R420 => 2,
		}
	}

	#[must_use]
	/// # Block Size.
	///
	/// The MCU width and height in luma samples: one [`BLOCK_SIZE`], doubled
	/// on each subsampled axis.
	pub const fn block_size(self) -> (usize, usize) {
		(BLOCK_SIZE * self.h_factor(), BLOCK_SIZE * self.v_factor())
	}
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Plane.
///
/// One channel of a [`YCbCrImage`].
///
/// The stride is the padded width, not the logical one. Index rows with
/// [`Plane::stride`], never with the image width.
pub struct Plane {
	samples: Vec<u8>,
	stride: usize,
}

impl Deref for Plane {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &Self::Target { &self.samples }
}

impl Plane {
	/// # New.
	fn new(stride: usize, height: usize) -> Result<Self, JpegError> {
		let len = stride.checked_mul(height).ok_or(JpegError::Overflow)?;
		Ok(Self { samples: vec![0; len], stride })
	}

	#[must_use]
	/// # Stride.
	pub const fn stride(&self) -> usize { self.stride }

	#[must_use]
	/// # Padded Height.
	pub fn height(&self) -> usize {
		if self.stride == 0 { 0 }
		else { self.samples.len().wrapping_div(self.stride) }
	}

	/// # Row (Mutable).
	pub(crate) fn row_mut(&mut self, row: usize) -> Option<&mut [u8]> {
		let start = row.checked_mul(self.stride)?;
		self.samples.get_mut(start..start + self.stride)
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Planar `YCbCr` Image.
///
/// Three separately-strided planes sharing one bounds rectangle. Use
/// [`YCbCrImage::new_aligned`] to build one; the planes are padded well past
/// the logical bounds so the codec can always read or write whole blocks.
pub struct YCbCrImage {
	y: Plane,
	cb: Plane,
	cr: Plane,
	ratio: SubsampleRatio,
	rect: Rectangle,
}

impl Raster for YCbCrImage {
	#[inline]
	fn bounds(&self) -> Rectangle { self.rect }

	#[inline]
	fn color_model(&self) -> ColorModel { ColorModel::YCbCr }

	fn at(&self, x: i32, y: i32) -> Color {
		self.ycbcr_at(x, y).map_or(
			Color::new(0, 0, 0, 0),
			|(y, cb, cr)| ycbcr_color(y, cb, cr),
		)
	}

	#[inline]
	fn native(&self) -> Option<Native<'_>> { Some(Native::YCbCr(self)) }
}

impl RasterMut for YCbCrImage {
	/// # Set Color.
	///
	/// Chroma samples are shared between neighbours on subsampled axes, so
	/// the last write to a block wins.
	fn set(&mut self, x: i32, y: i32, color: Color) {
		let RgbColor { r, g, b } = RgbColor::from(color);
		let (yy, cb, cr) = rgb_to_ycbcr(r, g, b);
		self.set_ycbcr(x, y, yy, cb, cr);
	}
}

impl YCbCrImage {
	/// # New (Aligned).
	///
	/// Allocate zeroed planes for `rect` at the given ratio. On each axis the
	/// luma extent is rounded up to a multiple of 16 with one more block of
	/// 16 on top, e.g. 125×25 becomes 144×48. The chroma planes take the luma
	/// extent divided by the subsampling factor on that axis.
	///
	/// Zero-area rectangles produce empty planes.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Dimensions`] for negative sizes or
	/// [`JpegError::Overflow`] if the planes would be too big to address.
	pub fn new_aligned(rect: Rectangle, ratio: SubsampleRatio) -> Result<Self, JpegError> {
		let (w, h) = rect.size()?;
		let (y_stride, y_height) =
			if w == 0 || h == 0 { (0, 0) }
			else { (pad(w)?, pad(h)?) };

		let c_stride = y_stride.wrapping_div(ratio.h_factor());
		let c_height = y_height.wrapping_div(ratio.v_factor());

		Ok(Self {
			y: Plane::new(y_stride, y_height)?,
			cb: Plane::new(c_stride, c_height)?,
			cr: Plane::new(c_stride, c_height)?,
			ratio,
			rect,
		})
	}
}

/// ## Getters.
impl YCbCrImage {
	#[must_use]
	/// # Luma Plane.
	pub const fn y(&self) -> &Plane { &self.y }

	#[must_use]
	/// # Blue-Difference Plane.
	pub const fn cb(&self) -> &Plane { &self.cb }

	#[must_use]
	/// # Red-Difference Plane.
	pub const fn cr(&self) -> &Plane { &self.cr }

	#[must_use]
	/// # Subsampling Ratio.
	pub const fn ratio(&self) -> SubsampleRatio { self.ratio }

	#[must_use]
	/// # Luma Offset.
	///
	/// Return the index into the luma plane for `(x, y)`, or `None` if out of
	/// bounds.
	pub fn y_offset(&self, x: i32, y: i32) -> Option<usize> {
		super::pix_offset(self.rect, self.y.stride, 1, x, y)
	}

	#[must_use]
	/// # Chroma Offset.
	///
	/// Return the index into either chroma plane for `(x, y)`, or `None` if
	/// out of bounds. Subsampled axes floor-divide both the point and the
	/// origin, so odd origins still line up with the codec's blocks.
	pub fn c_offset(&self, x: i32, y: i32) -> Option<usize> {
		if ! self.rect.contains(x, y) { return None; }
		let col = chroma_index(x, self.rect.min.x, self.ratio.h_factor())?;
		let row = chroma_index(y, self.rect.min.y, self.ratio.v_factor())?;
		Some(row * self.cb.stride + col)
	}

	#[must_use]
	/// # Chroma Size.
	///
	/// The number of chroma columns and rows actually covered by the bounds.
	pub fn chroma_size(&self) -> (usize, usize) {
		let (w, h) = self.rect.size().unwrap_or((0, 0));
		if w == 0 || h == 0 { return (0, 0); }

		let last_x = self.rect.max.x - 1;
		let last_y = self.rect.max.y - 1;
		let cw = chroma_index(last_x, self.rect.min.x, self.ratio.h_factor()).map_or(0, |v| v + 1);
		let ch = chroma_index(last_y, self.rect.min.y, self.ratio.v_factor()).map_or(0, |v| v + 1);
		(cw, ch)
	}

	#[must_use]
	/// # `YCbCr` At.
	///
	/// Return the raw samples for `(x, y)`, or `None` if out of bounds.
	pub fn ycbcr_at(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
		let yi = self.y_offset(x, y)?;
		let ci = self.c_offset(x, y)?;
		Some((
			self.y.get(yi).copied()?,
			self.cb.get(ci).copied()?,
			self.cr.get(ci).copied()?,
		))
	}
}

/// ## Setters.
impl YCbCrImage {
	/// # Set `YCbCr`.
	///
	/// Write raw samples for `(x, y)`. Out-of-bounds writes are ignored.
	pub fn set_ycbcr(&mut self, x: i32, y: i32, yy: u8, cb: u8, cr: u8) {
		if let (Some(yi), Some(ci)) = (self.y_offset(x, y), self.c_offset(x, y)) {
			if let Some(v) = self.y.samples.get_mut(yi) { *v = yy; }
			if let Some(v) = self.cb.samples.get_mut(ci) { *v = cb; }
			if let Some(v) = self.cr.samples.get_mut(ci) { *v = cr; }
		}
	}

	/// # Planes (Mutable).
	pub(crate) fn planes_mut(&mut self) -> (&mut Plane, &mut Plane, &mut Plane) {
		(&mut self.y, &mut self.cb, &mut self.cr)
	}
}



/// # Pad.
///
/// Round up to a multiple of [`ALIGN`], then add one more.
fn pad(v: usize) -> Result<usize, JpegError> {
	v.checked_next_multiple_of(ALIGN)
		.and_then(|v| v.checked_add(ALIGN))
		.ok_or(JpegError::Overflow)
}

/// # Chroma Index.
///
/// Map a luma coordinate to its chroma column or row relative to the origin.
fn chroma_index(v: i32, min: i32, factor: usize) -> Option<usize> {
	let factor = i32::try_from(factor).ok()?;
	let idx = v.div_euclid(factor) - min.div_euclid(factor);
	usize::try_from(idx).ok()
}
