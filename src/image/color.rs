/*!
# `JPEG Line` - Color
*/

use rgb::{
	RGB8,
	RGBA16,
};



/// # Generic Color.
///
/// Every [`Raster`](crate::Raster) reports pixels as 16-bit, alpha-premultiplied
/// RGBA. Eight-bit values are widened by byte replication, so `0xAB` becomes
/// `0xABAB`.
pub type Color = RGBA16;

/// # Opaque.
const OPAQUE: u16 = 0xFFFF;



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # RGB Color.
///
/// The native pixel value of [`RgbImage`](crate::RgbImage). It has no alpha
/// channel; converting it to a [`Color`] always yields full opacity, while
/// converting a [`Color`] into it simply drops the alpha.
pub struct RgbColor {
	/// # Red.
	pub r: u8,

	/// # Green.
	pub g: u8,

	/// # Blue.
	pub b: u8,
}

impl From<Color> for RgbColor {
	#[allow(clippy::cast_possible_truncation)] // Shifted into range.
	#[inline]
	fn from(src: Color) -> Self {
		Self {
			r: (src.r >> 8) as u8,
			g: (src.g >> 8) as u8,
			b: (src.b >> 8) as u8,
		}
	}
}

impl From<RgbColor> for Color {
	#[inline]
	fn from(src: RgbColor) -> Self {
		Self::new(widen(src.r), widen(src.g), widen(src.b), OPAQUE)
	}
}

impl From<RGB8> for RgbColor {
	#[inline]
	fn from(src: RGB8) -> Self { Self::new(src.r, src.g, src.b) }
}

impl From<RgbColor> for RGB8 {
	#[inline]
	fn from(src: RgbColor) -> Self { Self::new(src.r, src.g, src.b) }
}

impl RgbColor {
	#[must_use]
	/// # New.
	pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }
}



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Color Model.
///
/// Identifies how an image stores its pixels, and can coerce an arbitrary
/// [`Color`] into what that storage would hold.
pub enum ColorModel {
	/// # CMYK.
	Cmyk,

	/// # Greyscale.
	Gray,

	/// # Packed RGB.
	Rgb,

	/// # Packed RGBA.
	Rgba,

	/// # YCbCr.
	YCbCr,
}

impl ColorModel {
	#[must_use]
	/// # Convert.
	///
	/// Return the color as it would read back after being stored in an image
	/// of this model.
	pub fn convert(self, src: Color) -> Color {
		match self {
			Self::Cmyk => {
				let RgbColor { r, g, b } = RgbColor::from(src);
				let (c, m, y, k) = rgb_to_cmyk(r, g, b);
				let (r, g, b) = cmyk_to_rgb(c, m, y, k);
				Color::from(RgbColor::new(r, g, b))
			},
			Self::Gray => gray_color(gray16(src)),
			Self::Rgb => Color::from(RgbColor::from(src)),
			Self::Rgba => Color::new(
				widen(narrow(src.r)),
				widen(narrow(src.g)),
				widen(narrow(src.b)),
				widen(narrow(src.a)),
			),
			Self::YCbCr => {
				let RgbColor { r, g, b } = RgbColor::from(src);
				let (y, cb, cr) = rgb_to_ycbcr(r, g, b);
				ycbcr_color(y, cb, cr)
			},
		}
	}
}



#[inline]
/// # Widen.
///
/// Replicate an 8-bit channel across 16 bits.
pub(crate) const fn widen(v: u8) -> u16 { v as u16 * 0x101 }

#[allow(clippy::cast_possible_truncation)] // Shifted into range.
#[inline]
/// # Narrow.
///
/// Keep the high byte of a 16-bit channel.
pub(crate) const fn narrow(v: u16) -> u8 { (v >> 8) as u8 }

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped.
#[inline]
/// # Fixed-Point Descale.
///
/// Drop the 16 fractional bits and clamp the result to a byte.
const fn descale(v: i32) -> u8 {
	let v = v >> 16;
	if v < 0 { 0 }
	else if v > 255 { 255 }
	else { v as u8 }
}

#[must_use]
/// # RGB to `YCbCr`.
///
/// JFIF full-range conversion using 16-bit fixed-point coefficients.
pub(crate) const fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
	let r = r as i32;
	let g = g as i32;
	let b = b as i32;

	let y = 19_595 * r + 38_470 * g + 7_471 * b + (1 << 15);
	let cb = -11_056 * r - 21_712 * g + 32_768 * b + (257 << 15);
	let cr = 32_768 * r - 27_440 * g - 5_328 * b + (257 << 15);

	(descale(y), descale(cb), descale(cr))
}

#[must_use]
/// # `YCbCr` to RGB.
///
/// The inverse of [`rgb_to_ycbcr`].
pub(crate) const fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> (u8, u8, u8) {
	let y = y as i32 * 0x1_0101;
	let cb = cb as i32 - 128;
	let cr = cr as i32 - 128;

	let r = y + 91_881 * cr;
	let g = y - 22_554 * cb - 46_802 * cr;
	let b = y + 116_130 * cb;

	(descale(r), descale(g), descale(b))
}

#[must_use]
/// # RGB to Luma.
pub(crate) const fn rgb_to_gray(r: u8, g: u8, b: u8) -> u8 {
	let (y, _, _) = rgb_to_ycbcr(r, g, b);
	y
}

#[allow(clippy::cast_possible_truncation)] // Shifted into range.
#[must_use]
/// # Color to 16-bit Luma.
pub(crate) const fn gray16(src: Color) -> u16 {
	let y = 19_595 * src.r as u32 + 38_470 * src.g as u32 + 7_471 * src.b as u32 + (1 << 15);
	(y >> 16) as u16
}

#[allow(clippy::cast_possible_truncation, clippy::integer_division)] // Bounded.
#[must_use]
/// # CMYK to RGB.
pub(crate) const fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> (u8, u8, u8) {
	let w = 0xFFFF - widen(k) as u32;
	let r = (0xFFFF - widen(c) as u32) * w / 0xFFFF;
	let g = (0xFFFF - widen(m) as u32) * w / 0xFFFF;
	let b = (0xFFFF - widen(y) as u32) * w / 0xFFFF;
	((r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8)
}

#[allow(clippy::cast_possible_truncation, clippy::integer_division)] // Bounded.
#[must_use]
/// # RGB to CMYK.
pub(crate) const fn rgb_to_cmyk(r: u8, g: u8, b: u8) -> (u8, u8, u8, u8) {
	let (r, g, b) = (r as u32, g as u32, b as u32);
	let mut w = r;
	if g > w { w = g; }
	if b > w { w = b; }
	if w == 0 { return (0, 0, 0, 255); }

	let c = (w - r) * 255 / w;
	let m = (w - g) * 255 / w;
	let y = (w - b) * 255 / w;
	(c as u8, m as u8, y as u8, (255 - w) as u8)
}

#[must_use]
/// # Gray Color.
///
/// Widen a 16-bit luma value into an opaque [`Color`].
pub(crate) const fn gray_color(v: u16) -> Color {
	let v = widen(narrow(v));
	Color { r: v, g: v, b: v, a: OPAQUE }
}

#[must_use]
/// # `YCbCr` Color.
pub(crate) const fn ycbcr_color(y: u8, cb: u8, cr: u8) -> Color {
	let (r, g, b) = ycbcr_to_rgb(y, cb, cr);
	Color { r: widen(r), g: widen(g), b: widen(b), a: OPAQUE }
}
