/*!
# `JPEG Line` - Decompression
*/

use crate::{
	ColorModel,
	image::color::{
		cmyk_to_rgb,
		rgb_to_gray,
		rgb_to_ycbcr,
	},
	JpegError,
};
use jpeg_decoder::PixelFormat;
use super::{
	decode_error,
	Fill,
	Reader,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Output Color Space.
pub(crate) enum OutColor {
	/// # One Byte of Luma.
	Gray,

	/// # Packed RGB.
	Rgb,

	/// # Packed RGBA (Opaque).
	Rgba,

	/// # Interleaved `YCbCr` (Full Resolution).
	YCbCr,
}

impl OutColor {
	/// # Bytes Per Pixel.
	pub(crate) const fn channels(self) -> usize {
		match self {
			Self::Gray => 1,
			Self::Rgb | Self::YCbCr => 3,
			Self::Rgba => 4,
		}
	}
}



#[derive(Debug, Clone, Copy)]
/// # Decompression Settings.
pub(crate) struct DecompressSettings {
	/// # Scale Target.
	///
	/// The decoder picks the smallest eighth-scale whose output is at least
	/// this big on both axes.
	pub(crate) scale: Option<(u16, u16)>,

	/// # Output Color Space.
	pub(crate) color: OutColor,

	/// # Fancy Upsampling.
	pub(crate) fancy_upsampling: bool,

	/// # Block Smoothing.
	pub(crate) block_smoothing: bool,
}



/// # Decompression.
///
/// A decoder with its header read, handing out scanlines in order.
pub(crate) struct Decompress<'s, S: Fill> {
	decoder: jpeg_decoder::Decoder<Reader<'s, S>>,
	format: PixelFormat,
	color: OutColor,
	width: usize,
	height: usize,
	pixels: Option<Vec<u8>>,
	row: usize,
}

impl<'s, S: Fill> Decompress<'s, S> {
	/// # Begin.
	///
	/// Read the header and apply the scale target, if any.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Format`] if the header is missing or malformed.
	pub(crate) fn begin(source: &'s mut S, settings: DecompressSettings)
	-> Result<Self, JpegError> {
		let mut decoder = jpeg_decoder::Decoder::new(Reader(source));
		decoder.read_info().map_err(decode_error)?;
		let info = decoder.info()
			.ok_or_else(|| JpegError::Format("missing frame header".to_owned()))?;

		// The engine rounds its scale down as soon as either axis fits, so
		// work out the target where both fit and ask for exactly that.
		let (width, height) =
			if let Some((w, h)) = settings.scale {
				let (w, h) = scaled_size(info.width, info.height, w, h);
				decoder.scale(w, h).map_err(decode_error)?
			}
			else { (info.width, info.height) };

		if ! settings.fancy_upsampling || ! settings.block_smoothing {
			tracing::debug!(
				fancy_upsampling=settings.fancy_upsampling,
				block_smoothing=settings.block_smoothing,
				"The engine always upsamples and never smooths; flags ignored.",
			);
		}

		tracing::trace!(
			"Decompressing {}x{} ({width}x{height}) {:?} as {:?}.",
			info.width,
			info.height,
			info.pixel_format,
			settings.color,
		);

		Ok(Self {
			decoder,
			format: info.pixel_format,
			color: settings.color,
			width: usize::from(width),
			height: usize::from(height),
			pixels: None,
			row: 0,
		})
	}

	/// # Read Scanline.
	///
	/// Write the next row into `out`, which must hold exactly one row in the
	/// output color space.
	///
	/// The engine decodes the whole frame the first time this is called.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Scanline`] if `out` has the wrong length or every
	/// row has already been read, or the engine's error if decoding fails.
	pub(crate) fn read_scanline(&mut self, out: &mut [u8]) -> Result<(), JpegError> {
		if self.row >= self.height || out.len() != self.width * self.color.channels() {
			return Err(JpegError::Scanline);
		}

		if self.pixels.is_none() {
			let pixels = self.decoder.decode().map_err(decode_error)?;
			let expected = self.width
				.checked_mul(self.height)
				.and_then(|n| n.checked_mul(bytes_per_pixel(self.format)))
				.ok_or(JpegError::Overflow)?;
			if pixels.len() != expected {
				return Err(JpegError::Codec("decoded buffer has the wrong size".to_owned()));
			}
			self.pixels = Some(pixels);
		}

		let stride = self.width * bytes_per_pixel(self.format);
		let start = self.row * stride;
		let src = self.pixels.as_deref()
			.and_then(|p| p.get(start..start + stride))
			.ok_or(JpegError::Scanline)?;

		convert_row(src, self.format, self.color, out);
		self.row += 1;
		Ok(())
	}

	/// # Set Output Color Space.
	///
	/// This can be changed after the header has been inspected, but not once
	/// scanlines have started flowing.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Scanline`] if any row has already been read.
	pub(crate) fn set_color(&mut self, color: OutColor) -> Result<(), JpegError> {
		if self.row == 0 {
			self.color = color;
			Ok(())
		}
		else { Err(JpegError::Scanline) }
	}

	/// # Finish.
	///
	/// Walking away right after the header is fine; stopping partway through
	/// the scanlines is not.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Scanline`] if some, but not all, rows were read.
	pub(crate) fn finish(self) -> Result<(), JpegError> {
		if self.row == 0 || self.row == self.height { Ok(()) }
		else { Err(JpegError::Scanline) }
	}
}

/// ## Getters.
impl<S: Fill> Decompress<'_, S> {
	/// # Output Size.
	pub(crate) const fn size(&self) -> (usize, usize) { (self.width, self.height) }

	/// # Color Model.
	///
	/// How the source itself is stored.
	pub(crate) const fn color_model(&self) -> ColorModel {
		match self.format {
			PixelFormat::L8 | PixelFormat::L16 => ColorModel::Gray,
			PixelFormat::RGB24 => ColorModel::YCbCr,
			PixelFormat::CMYK32 => ColorModel::Cmyk,
		}
	}
}



/// # Scaled Size.
///
/// Return the output size of the smallest eighth-scale (1/8, 2/8, 4/8, 8/8)
/// that does not undershoot the request on either axis.
pub(crate) fn scaled_size(width: u16, height: u16, req_w: u16, req_h: u16) -> (u16, u16) {
	for num in [1_u32, 2, 4] {
		let w = (u32::from(width) * num).div_ceil(8);
		let h = (u32::from(height) * num).div_ceil(8);
		if u32::from(req_w) <= w && u32::from(req_h) <= h {
			// These are never larger than the originals.
			return (
				u16::try_from(w).unwrap_or(width),
				u16::try_from(h).unwrap_or(height),
			);
		}
	}
	(width, height)
}

/// # Engine Bytes Per Pixel.
const fn bytes_per_pixel(format: PixelFormat) -> usize {
	match format {
		PixelFormat::L8 => 1,
		PixelFormat::L16 => 2,
		PixelFormat::RGB24 => 3,
		PixelFormat::CMYK32 => 4,
	}
}

/// # Convert Row.
///
/// Translate one engine row into the requested color space. Sixteen-bit luma
/// is stored big-endian, so only the first byte of each sample is kept.
fn convert_row(src: &[u8], format: PixelFormat, color: OutColor, out: &mut [u8]) {
	let bpp = bytes_per_pixel(format);
	for (px, dst) in src.chunks_exact(bpp).zip(out.chunks_exact_mut(color.channels())) {
		let (r, g, b) = match format {
			PixelFormat::L8 | PixelFormat::L16 => {
				let v = px[0];
				match color {
					OutColor::Gray => { dst[0] = v; },
					OutColor::YCbCr => dst.copy_from_slice(&[v, 128, 128]),
					OutColor::Rgb => dst.copy_from_slice(&[v, v, v]),
					OutColor::Rgba => dst.copy_from_slice(&[v, v, v, 255]),
				}
				continue;
			},
			PixelFormat::RGB24 => (px[0], px[1], px[2]),
			PixelFormat::CMYK32 => cmyk_to_rgb(px[0], px[1], px[2], px[3]),
		};

		match color {
			OutColor::Gray => { dst[0] = rgb_to_gray(r, g, b); },
			OutColor::Rgb => dst.copy_from_slice(&[r, g, b]),
			OutColor::Rgba => dst.copy_from_slice(&[r, g, b, 255]),
			OutColor::YCbCr => {
				let (y, cb, cr) = rgb_to_ycbcr(r, g, b);
				dst.copy_from_slice(&[y, cb, cr]);
			},
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_scaled_size() {
		assert_eq!(scaled_size(1024, 768, 100, 100), (256, 192));
		assert_eq!(scaled_size(1024, 768, 128, 96), (128, 96));
		assert_eq!(scaled_size(1024, 768, 129, 96), (256, 192));
		assert_eq!(scaled_size(1024, 768, 600, 10), (1024, 768));
		assert_eq!(scaled_size(1024, 768, 2000, 2000), (1024, 768));
		assert_eq!(scaled_size(1024, 768, 0, 0), (128, 96));
		assert_eq!(scaled_size(15, 9, 1, 1), (2, 2));
	}

	#[test]
	fn t_convert_row() {
		let mut out = [0_u8; 8];
		convert_row(&[10, 20], PixelFormat::L8, OutColor::Rgba, &mut out);
		assert_eq!(out, [10, 10, 10, 255, 20, 20, 20, 255]);

		let mut out = [0_u8; 2];
		convert_row(&[0x12, 0x34, 0xAB, 0xCD], PixelFormat::L16, OutColor::Gray, &mut out);
		assert_eq!(out, [0x12, 0xAB]);

		let mut out = [0_u8; 3];
		convert_row(&[255, 0, 0], PixelFormat::RGB24, OutColor::YCbCr, &mut out);
		assert_eq!(out, [76, 85, 255]);
		convert_row(&[0, 0, 0, 0], PixelFormat::CMYK32, OutColor::Rgb, &mut out);
		assert_eq!(out, [255, 255, 255]);
		convert_row(&[9, 9], PixelFormat::L8, OutColor::YCbCr, &mut out);
		assert_eq!(out, [9, 128, 128]);

		let mut out = [0_u8; 1];
		convert_row(&[255, 255, 255], PixelFormat::RGB24, OutColor::Gray, &mut out);
		assert_eq!(out, [255]);
	}
}
