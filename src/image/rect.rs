/*!
# `JPEG Line` - Rectangles
*/

use std::fmt;



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Point.
pub struct Point {
	/// # X.
	pub x: i32,

	/// # Y.
	pub y: i32,
}

impl Point {
	#[must_use]
	/// # New.
	pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }
}



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Rectangle.
///
/// A half-open pixel rectangle: `min` is inclusive, `max` exclusive. Every
/// buffer in this crate uses one to define its coordinate domain.
///
/// Zero-area rectangles are valid and simply contain no pixels.
pub struct Rectangle {
	/// # Top Left (Inclusive).
	pub min: Point,

	/// # Bottom Right (Exclusive).
	pub max: Point,
}

impl fmt::Display for Rectangle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"({},{})-({},{})",
			self.min.x, self.min.y, self.max.x, self.max.y,
		)
	}
}

impl Rectangle {
	#[must_use]
	/// # New.
	///
	/// Build a rectangle from two corners, swapping coordinates as needed so
	/// that `max` is never smaller than `min`.
	pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
		let (x0, x1) = if x0 > x1 { (x1, x0) } else { (x0, x1) };
		let (y0, y1) = if y0 > y1 { (y1, y0) } else { (y0, y1) };
		Self {
			min: Point::new(x0, y0),
			max: Point::new(x1, y1),
		}
	}

	#[must_use]
	/// # From Size.
	///
	/// A rectangle anchored at the origin.
	pub const fn from_size(width: i32, height: i32) -> Self {
		Self::new(0, 0, width, height)
	}
}

/// ## Getters.
impl Rectangle {
	#[must_use]
	/// # Width.
	///
	/// This can be negative if the fields were set by hand with `max < min`.
	pub const fn dx(&self) -> i32 { self.max.x.saturating_sub(self.min.x) }

	#[must_use]
	/// # Height.
	///
	/// This can be negative if the fields were set by hand with `max < min`.
	pub const fn dy(&self) -> i32 { self.max.y.saturating_sub(self.min.y) }

	#[must_use]
	/// # Is Empty?
	pub const fn is_empty(&self) -> bool {
		self.min.x >= self.max.x || self.min.y >= self.max.y
	}

	#[must_use]
	/// # Contains Point?
	pub const fn contains(&self, x: i32, y: i32) -> bool {
		self.min.x <= x && x < self.max.x && self.min.y <= y && y < self.max.y
	}

	/// # Dimensions.
	///
	/// Return the width and height as `usize`.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Dimensions`](crate::JpegError::Dimensions) if
	/// either axis is negative.
	pub fn size(&self) -> Result<(usize, usize), crate::JpegError> {
		let w = usize::try_from(self.dx()).map_err(|_| crate::JpegError::Dimensions)?;
		let h = usize::try_from(self.dy()).map_err(|_| crate::JpegError::Dimensions)?;
		Ok((w, h))
	}
}
