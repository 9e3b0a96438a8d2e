/*!
# `JPEG Line` - Encoding
*/

pub(super) mod options;

use crate::{
	codec::{
		Compress,
		CompressSettings,
		InColor,
	},
	ColorModel,
	ColorSpace,
	EncoderOptions,
	image::color::{
		gray16,
		narrow,
		rgb_to_ycbcr,
	},
	Jpeg,
	JpegError,
	manager::destination::DestinationManager,
	MAX_DIMENSION,
	Native,
	Raster,
	RgbColor,
};
use dactyl::NiceU64;
use rgb::bytemuck::cast_slice;
use std::io::Write;



/// ## Encoding.
impl Jpeg<'_> {
	/// # Encode.
	///
	/// Encode any [`Raster`] into `dst` as a baseline (or progressive) JFIF
	/// stream.
	///
	/// The crate's own buffers are fed to the engine in their native layout;
	/// planar input keeps its luma exactly and samples chroma once per pixel.
	/// Anything else goes through [`Raster::at`] one pixel at a time. Alpha
	/// is dropped; premultiplied RGBA input therefore ends up composited over
	/// black.
	///
	/// ## Errors
	///
	/// Zero-area images return [`JpegError::EmptyImage`] and oversized ones
	/// [`JpegError::Overflow`], both before anything is registered or
	/// written. Stream failures return [`JpegError::Write`].
	pub fn encode<W, I>(&self, dst: W, img: &I, opts: &EncoderOptions)
	-> Result<(), JpegError>
	where W: Write, I: Raster + ?Sized {
		let rect = img.bounds();
		let (width, height) = rect.size()?;
		if width == 0 || height == 0 { return Err(JpegError::EmptyImage); }
		if MAX_DIMENSION < width || MAX_DIMENSION < height {
			return Err(JpegError::Overflow);
		}

		let native = img.native();
		let color = in_color(img, native, opts.color_space);
		let settings = CompressSettings {
			width,
			height,
			color,
			quality: opts.effective_quality(),
			sampling: opts.effective_subsampling(
				if let Some(Native::YCbCr(i)) = native { Some(i.ratio()) }
				else { None }
			),
			progressive: opts.progressive,
			optimize: opts.optimize_coding,
		};

		let mut dest = DestinationManager::new(self.registry, dst)?;
		let res = Compress::begin(&mut dest, settings).and_then(|mut enc| {
			let mut row = vec![0_u8; width * color.channels()];
			for (idx, y) in (rect.min.y..rect.max.y).enumerate() {
				fill_row(img, native, color, idx, y, &mut row);
				enc.write_scanline(&row)?;
			}
			enc.finish()
		});

		if let Some(e) = dest.take_error() { return Err(JpegError::Write(e)); }
		res?;
		dest.finish()?;

		tracing::debug!(
			"Encoded {width}x{height} {color:?} at quality {} ({}): {} bytes.",
			settings.quality,
			settings.sampling,
			NiceU64::from(dest.transferred()),
		);
		Ok(())
	}
}



/// # Input Color.
///
/// Pick the layout to hand the engine.
fn in_color<I>(img: &I, native: Option<Native<'_>>, space: ColorSpace) -> InColor
where I: Raster + ?Sized {
	let gray = match space {
		ColorSpace::Auto =>
			matches!(native, Some(Native::Gray(_))) ||
			img.color_model() == ColorModel::Gray,
		ColorSpace::YCbCr => false,
		ColorSpace::Gray => true,
	};

	if gray { InColor::Luma }
	else {
		match native {
			Some(Native::YCbCr(_) | Native::Gray(_)) => InColor::YCbCr,
			Some(Native::Rgba(_)) => InColor::Rgba,
			Some(Native::Rgb(_)) | None => InColor::Rgb,
		}
	}
}

/// # Fill Row.
///
/// Write row `y` (the `idx`th from the top) of the image into `out` in the
/// chosen layout.
fn fill_row<I>(
	img: &I,
	native: Option<Native<'_>>,
	color: InColor,
	idx: usize,
	y: i32,
	out: &mut [u8],
)
where I: Raster + ?Sized {
	let xs = img.bounds().min.x..img.bounds().max.x;
	match (color, native) {
		// Straight copies.
		(InColor::Luma, Some(Native::Gray(src))) => copy_row(src.row(idx), out),
		(InColor::Rgb, Some(Native::Rgb(src))) =>
			copy_row(src.row(idx).map(cast_slice), out),
		(InColor::Rgba, Some(Native::Rgba(src))) =>
			copy_row(src.row(idx).map(cast_slice), out),

		// Planar.
		(InColor::Luma, Some(Native::YCbCr(src))) =>
			for (x, dst) in xs.zip(out.iter_mut()) {
				*dst = src.ycbcr_at(x, y).map_or(0, |(v, _, _)| v);
			},
		(InColor::YCbCr, Some(Native::YCbCr(src))) =>
			for (x, dst) in xs.zip(out.chunks_exact_mut(3)) {
				let (v, cb, cr) = src.ycbcr_at(x, y).unwrap_or((0, 128, 128));
				dst.copy_from_slice(&[v, cb, cr]);
			},
		(InColor::YCbCr, Some(Native::Gray(src))) =>
			for (x, dst) in xs.zip(out.chunks_exact_mut(3)) {
				dst.copy_from_slice(&[src.gray_at(x, y).unwrap_or(0), 128, 128]);
			},

		// Everything else goes through the generic color.
		(InColor::Luma, _) =>
			for (x, dst) in xs.zip(out.iter_mut()) {
				*dst = narrow(gray16(img.at(x, y)));
			},
		(InColor::Rgb, _) =>
			for (x, dst) in xs.zip(out.chunks_exact_mut(3)) {
				let RgbColor { r, g, b } = RgbColor::from(img.at(x, y));
				dst.copy_from_slice(&[r, g, b]);
			},
		(InColor::Rgba, _) =>
			for (x, dst) in xs.zip(out.chunks_exact_mut(4)) {
				let c = img.at(x, y);
				dst.copy_from_slice(&[narrow(c.r), narrow(c.g), narrow(c.b), narrow(c.a)]);
			},
		(InColor::YCbCr, _) =>
			for (x, dst) in xs.zip(out.chunks_exact_mut(3)) {
				let RgbColor { r, g, b } = RgbColor::from(img.at(x, y));
				let (v, cb, cr) = rgb_to_ycbcr(r, g, b);
				dst.copy_from_slice(&[v, cb, cr]);
			},
	}
}

/// # Copy Row.
fn copy_row(src: Option<&[u8]>, out: &mut [u8]) {
	if let Some(src) = src.and_then(|s| s.get(..out.len())) {
		out.copy_from_slice(src);
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		Color,
		GrayImage,
		Rectangle,
		Registry,
		RgbImage,
		YCbCrImage,
		SubsampleRatio,
	};
	use std::io;

	/// # A Raster That Is Not Ours.
	struct Checkers(Rectangle);

	impl Raster for Checkers {
		fn bounds(&self) -> Rectangle { self.0 }
		fn color_model(&self) -> ColorModel { ColorModel::Rgb }
		fn at(&self, x: i32, y: i32) -> Color {
			if (x + y) % 2 == 0 { Color::new(0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF) }
			else { Color::new(0, 0, 0, 0xFFFF) }
		}
	}

	/// # Writer That Always Fails.
	struct Closed;

	impl Write for Closed {
		fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
			Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
		}
		fn flush(&mut self) -> io::Result<()> { Ok(()) }
	}

	#[test]
	fn t_in_color() {
		let rect = Rectangle::from_size(2, 2);
		let gray = GrayImage::new(rect).unwrap();
		let rgb = RgbImage::new(rect).unwrap();
		let ycc = YCbCrImage::new_aligned(rect, SubsampleRatio::R420).unwrap();

		assert_eq!(in_color(&gray, gray.native(), ColorSpace::Auto), InColor::Luma);
		assert_eq!(in_color(&gray, gray.native(), ColorSpace::YCbCr), InColor::YCbCr);
		assert_eq!(in_color(&rgb, rgb.native(), ColorSpace::Auto), InColor::Rgb);
		assert_eq!(in_color(&rgb, rgb.native(), ColorSpace::Gray), InColor::Luma);
		assert_eq!(in_color(&ycc, ycc.native(), ColorSpace::Auto), InColor::YCbCr);
		assert_eq!(in_color(&Checkers(rect), None, ColorSpace::Auto), InColor::Rgb);
	}

	#[test]
	fn t_fill_row() {
		let img = Checkers(Rectangle::new(5, 5, 8, 7));
		let mut row = [0_u8; 9];
		fill_row(&img, None, InColor::Rgb, 0, 5, &mut row);
		assert_eq!(row, [255, 255, 255, 0, 0, 0, 255, 255, 255]);

		let mut row = [0_u8; 3];
		fill_row(&img, None, InColor::Luma, 1, 6, &mut row);
		assert_eq!(row, [0, 255, 0]);

		let mut ycc = YCbCrImage::new_aligned(Rectangle::from_size(2, 1), SubsampleRatio::R422).unwrap();
		ycc.set_ycbcr(0, 0, 10, 20, 30);
		ycc.set_ycbcr(1, 0, 11, 21, 31);
		let mut row = [0_u8; 6];
		fill_row(&ycc, ycc.native(), InColor::YCbCr, 0, 0, &mut row);
		assert_eq!(row, [10, 21, 31, 11, 21, 31]);
	}

	#[test]
	fn t_fill_row_packed() {
		let rect = Rectangle::new(-1, -1, 1, 1);
		let mut rgb = RgbImage::new(rect).unwrap();
		rgb.set_rgb(-1, 0, RgbColor::new(1, 2, 3));
		rgb.set_rgb(0, 0, RgbColor::new(4, 5, 6));
		let mut row = [0_u8; 6];
		fill_row(&rgb, rgb.native(), InColor::Rgb, 1, 0, &mut row);
		assert_eq!(row, [1, 2, 3, 4, 5, 6]);

		let mut rgba = crate::RgbaImage::new(rect).unwrap();
		rgba.set_rgba(0, -1, rgb::RGBA8::new(7, 8, 9, 10));
		let mut row = [0_u8; 8];
		fill_row(&rgba, rgba.native(), InColor::Rgba, 0, -1, &mut row);
		assert_eq!(row, [0, 0, 0, 0, 7, 8, 9, 10]);
	}

	#[test]
	fn t_empty() {
		let registry = Registry::new();
		let jpeg = Jpeg::new(&registry);
		let mut out = Vec::new();

		let empty = YCbCrImage::new_aligned(Rectangle::default(), SubsampleRatio::R444).unwrap();
		assert!(matches!(
			jpeg.encode(&mut out, &empty, &EncoderOptions::default()),
			Err(JpegError::EmptyImage),
		));
		assert!(matches!(
			jpeg.encode(&mut out, &Checkers(Rectangle::from_size(70_000, 1)), &EncoderOptions::default()),
			Err(JpegError::Overflow),
		));
		assert!(out.is_empty());
		assert!(registry.is_empty());
	}

	#[test]
	fn t_write_error() {
		let registry = Registry::new();
		let jpeg = Jpeg::new(&registry);
		let res = jpeg.encode(Closed, &Checkers(Rectangle::from_size(64, 64)), &EncoderOptions::default());
		match res {
			Err(JpegError::Write(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
			e => panic!("Unexpected: {e:?}"),
		}
		assert!(registry.is_empty());
	}

	#[test]
	fn t_generic() {
		let registry = Registry::new();
		let jpeg = Jpeg::new(&registry);
		let img = Checkers(Rectangle::new(-4, -4, 12, 12));

		let mut out = Vec::new();
		jpeg.encode(&mut out, &img, &EncoderOptions::with_quality(100).with_optimize_coding(true)).unwrap();
		let config = jpeg.decode_config(out.as_slice()).unwrap();
		assert_eq!((config.width, config.height), (16, 16));
		assert_eq!(config.color_model, ColorModel::YCbCr);

		let mut out = Vec::new();
		jpeg.encode(&mut out, &img, &EncoderOptions::default().with_color_space(ColorSpace::Gray)).unwrap();
		let config = jpeg.decode_config(out.as_slice()).unwrap();
		assert_eq!(config.color_model, ColorModel::Gray);
		assert!(registry.is_empty());
	}
}
