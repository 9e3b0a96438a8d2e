/*!
# `JPEG Line` - Color Matching
*/

use crate::{
	Color,
	image::color::narrow,
	Raster,
	RasterMut,
	Rectangle,
	RgbaImage,
};
use dactyl::traits::SaturatingFrom;
use std::{
	error::Error,
	fmt,
};



#[derive(Debug, Clone)]
/// # Image Mismatch.
///
/// The failure side of [`match_image`].
pub enum Mismatch {
	/// # Different Bounds.
	///
	/// The images do not cover the same rectangle, so their pixels were not
	/// compared.
	Bounds(Rectangle, Rectangle),

	/// # Different Pixel.
	///
	/// The first pixel (in row-major order) outside the tolerance, along with
	/// a difference image for visual inspection.
	Pixel {
		/// # X.
		x: i32,

		/// # Y.
		y: i32,

		/// # Difference Image.
		///
		/// Each channel holds the absolute 8-bit delta; alpha is opaque.
		diff: RgbaImage,
	},
}

impl Error for Mismatch {}

impl fmt::Display for Mismatch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bounds(a, b) => write!(f, "Bounds differ: {a} vs {b}."),
			Self::Pixel { x, y, .. } => write!(f, "Pixels differ at ({x}, {y})."),
		}
	}
}



#[must_use]
/// # Match Color.
///
/// Compare two colors channel by channel (alpha included), returning `true`
/// if no channel differs by more than the tolerance.
///
/// The colors are 16-bit, but the tolerance is counted in 8-bit steps: each
/// channel is narrowed to its high byte before the comparison.
pub fn match_color(a: Color, b: Color, tolerance: u16) -> bool {
	let close = |a: u16, b: u16| u16::from(narrow(a).abs_diff(narrow(b))) <= tolerance;
	close(a.r, b.r) && close(a.g, b.g) && close(a.b, b.b) && close(a.a, b.a)
}

/// # Match Image.
///
/// Compare two images pixel by pixel with [`match_color`].
///
/// ## Errors
///
/// Returns [`Mismatch::Bounds`] if the bounds differ, or [`Mismatch::Pixel`]
/// for the first pixel outside the tolerance.
pub fn match_image<A, B>(a: &A, b: &B, tolerance: u16) -> Result<(), Mismatch>
where A: Raster + ?Sized, B: Raster + ?Sized {
	let rect = a.bounds();
	if rect != b.bounds() { return Err(Mismatch::Bounds(rect, b.bounds())); }

	for y in rect.min.y..rect.max.y {
		for x in rect.min.x..rect.max.x {
			if ! match_color(a.at(x, y), b.at(x, y), tolerance) {
				return Err(Mismatch::Pixel { x, y, diff: diff_image(a, b) });
			}
		}
	}

	Ok(())
}

/// # Difference Image.
///
/// Build an opaque image holding the per-channel deltas of the color
/// channels.
fn diff_image<A, B>(a: &A, b: &B) -> RgbaImage
where A: Raster + ?Sized, B: Raster + ?Sized {
	let rect = a.bounds();

	let Ok(mut out) = RgbaImage::new(rect) else { return RgbaImage::default(); };

	for y in rect.min.y..rect.max.y {
		for x in rect.min.x..rect.max.x {
			let (ca, cb) = (a.at(x, y), b.at(x, y));
			out.set(x, y, Color::new(
				delta(ca.r, cb.r),
				delta(ca.g, cb.g),
				delta(ca.b, cb.b),
				0xFFFF,
			));
		}
	}

	out
}

#[inline]
/// # Channel Delta.
///
/// The absolute difference, reduced to 8 bits and widened back.
fn delta(a: u16, b: u16) -> u16 {
	u16::from(u8::saturating_from(a.abs_diff(b) >> 8)) * 0x101
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		GrayImage,
		RgbImage,
	};

	#[test]
	fn t_match_color() {
		let a = Color::new(0x1000, 0x2000, 0x3000, 0xFFFF);
		assert!(match_color(a, a, 0));
		assert!(match_color(a, Color::new(0x10FF, 0x2000, 0x3000, 0xFFFF), 0));
		assert!(! match_color(a, Color::new(0x1100, 0x2000, 0x3000, 0xFFFF), 0));
		assert!(match_color(a, Color::new(0x11FF, 0x2000, 0x3000, 0xFFFF), 1));
		assert!(! match_color(a, Color::new(0x1200, 0x2000, 0x3000, 0xFFFF), 1));
		assert!(! match_color(a, Color::new(0x1000, 0x2000, 0x3000, 0), 254));
		assert!(match_color(a, Color::new(0x1000, 0x2000, 0x3000, 0), 255));
	}

	#[test]
	fn t_match_color_steps() {
		// Close in 16 bits, two steps apart in 8.
		let a = Color::new(0x10FF, 0, 0, 0xFFFF);
		let b = Color::new(0x1200, 0, 0, 0xFFFF);
		assert_eq!(a.r.abs_diff(b.r), 0x101);
		assert!(! match_color(a, b, 1));
		assert!(! match_color(b, a, 1));
		assert!(match_color(a, b, 2));

		// Low bytes never matter.
		let c = Color::new(0x1000, 0x20FF, 0x3080, 0xFF00);
		let d = Color::new(0x10FF, 0x2000, 0x30FF, 0xFFFF);
		assert!(match_color(c, d, 0));
	}

	#[test]
	fn t_match_color_props() {
		arbtest::arbtest(|u| {
			let c = Color::new(u.arbitrary()?, u.arbitrary()?, u.arbitrary()?, u.arbitrary()?);
			let t: u8 = u.arbitrary()?;

			// Always equal to itself.
			assert!(match_color(c, c, u16::from(t)));

			// Push one channel's high byte just past the tolerance, if there
			// is room.
			let g = narrow(c.g);
			if let Some(far) = g.checked_add(t).and_then(|v| v.checked_add(1)) {
				let low: u8 = u.arbitrary()?;
				let d = Color::new(c.r, u16::from_be_bytes([far, low]), c.b, c.a);
				assert!(! match_color(c, d, u16::from(t)));
				assert!(! match_color(d, c, u16::from(t)));
			}

			// Anything within the tolerance passes, whatever the low byte.
			let near = g.saturating_add(t);
			let low: u8 = u.arbitrary()?;
			let d = Color::new(c.r, u16::from_be_bytes([near, low]), c.b, c.a);
			assert!(match_color(c, d, u16::from(t)));
			Ok(())
		});
	}

	#[test]
	fn t_match_image() {
		let rect = Rectangle::from_size(3, 2);
		let mut a = RgbImage::new(rect).unwrap();
		let b = GrayImage::new(rect).unwrap();

		// Black is black.
		assert!(match_image(&a, &b, 0).is_ok());

		a.set(2, 1, Color::new(0x3000, 0, 0, 0xFFFF));
		assert!(match_image(&a, &b, 0x30).is_ok());
		match match_image(&a, &b, 0x2F) {
			Err(Mismatch::Pixel { x, y, diff }) => {
				assert_eq!((x, y), (2, 1));
				assert_eq!(diff.bounds(), rect);
				assert_eq!(diff.at(2, 1), Color::new(0x3030, 0, 0, 0xFFFF));
				assert_eq!(diff.at(0, 0), Color::new(0, 0, 0, 0xFFFF));
			},
			e => panic!("Unexpected result: {e:?}"),
		}

		let c = GrayImage::new(Rectangle::from_size(2, 3)).unwrap();
		assert!(matches!(match_image(&a, &c, 255), Err(Mismatch::Bounds(_, _))));
	}
}
