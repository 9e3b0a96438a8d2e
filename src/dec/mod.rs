/*!
# `JPEG Line` - Decoding
*/

pub(super) mod options;

use crate::{
	codec::{
		Decompress,
		DecompressSettings,
		OutColor,
	},
	ColorModel,
	DecoderOptions,
	GrayImage,
	Image,
	Jpeg,
	JpegError,
	manager::source::SourceManager,
	Rectangle,
	RgbaImage,
	RgbImage,
	SubsampleRatio,
	Warning,
	YCbCrImage,
};
use dactyl::NiceU64;
use std::io::Read;



/// # Decompression Over a Source Manager.
type Decompressor<'s, 'a, R> = Decompress<'s, SourceManager<'a, R>>;



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Image Configuration.
///
/// The header-level facts returned by [`Jpeg::decode_config`].
pub struct Config {
	/// # Width.
	pub width: usize,

	/// # Height.
	pub height: usize,

	/// # Color Model.
	///
	/// One of [`ColorModel::Gray`], [`ColorModel::YCbCr`] or
	/// [`ColorModel::Cmyk`].
	pub color_model: ColorModel,
}



#[derive(Debug, Clone)]
/// # Decoded Image With Warnings.
///
/// The result of [`Jpeg::decode_with_warnings`]: the image, plus whatever the
/// engine or source manager complained about along the way.
pub struct Decoded {
	/// # Image.
	pub image: Image,

	/// # Warnings.
	pub warnings: Vec<Warning>,
}

impl Decoded {
	#[must_use]
	/// # Is Truncated?
	pub fn is_truncated(&self) -> bool { self.warnings.contains(&Warning::Truncated) }
}



/// ## Decoding.
impl<'r> Jpeg<'r> {
	/// # Decode Config.
	///
	/// Read the header and return the dimensions and color model. No pixel
	/// storage is allocated.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Format`] if the stream does not start with a
	/// usable JPEG header, including when it is empty.
	pub fn decode_config<R: Read>(&self, src: R) -> Result<Config, JpegError> {
		let (config, _) = self.pull(src, &DecoderOptions::default(), OutColor::Rgb, |d| {
			let (width, height) = d.size();
			Ok(Config { width, height, color_model: d.color_model() })
		})?;

		tracing::debug!(
			"Read JPEG config: {}x{} {:?}.",
			config.width,
			config.height,
			config.color_model,
		);
		Ok(config)
	}

	/// # Decode.
	///
	/// Decode into an aligned planar [`YCbCrImage`] using the chroma layout
	/// from the options, or into a [`GrayImage`] if the source has only one
	/// component. CMYK sources are converted.
	///
	/// The planes are padded beyond the image bounds; always index them with
	/// their own strides.
	///
	/// Truncated streams still produce an image; use
	/// [`Jpeg::decode_with_warnings`] to find out about it.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Format`] for malformed or empty streams,
	/// [`JpegError::Read`] if the reader fails, or [`JpegError::Codec`] if
	/// the engine fails partway through.
	pub fn decode<R: Read>(&self, src: R, opts: &DecoderOptions)
	-> Result<Image, JpegError> {
		self.decode_with_warnings(src, opts).map(|d| d.image)
	}

	/// # Decode With Warnings.
	///
	/// This is the same as [`Jpeg::decode`], but also returns any non-fatal
	/// warnings raised along the way.
	///
	/// ## Errors
	///
	/// See [`Jpeg::decode`].
	pub fn decode_with_warnings<R: Read>(&self, src: R, opts: &DecoderOptions)
	-> Result<Decoded, JpegError> {
		let (image, warnings) = self.pull(src, opts, OutColor::YCbCr, |d| {
			let rect = output_rect(d)?;
			if d.color_model() == ColorModel::Gray {
				d.set_color(OutColor::Gray)?;
				read_gray(d, rect).map(Image::Gray)
			}
			else { read_planar(d, rect, opts.subsampling).map(Image::YCbCr) }
		})?;

		Ok(Decoded { image, warnings })
	}

	/// # Decode Into RGB.
	///
	/// Decode into a packed [`RgbImage`], whatever the source color model.
	///
	/// ## Errors
	///
	/// See [`Jpeg::decode`].
	pub fn decode_into_rgb<R: Read>(&self, src: R, opts: &DecoderOptions)
	-> Result<RgbImage, JpegError> {
		self.pull(src, opts, OutColor::Rgb, |d| {
			let mut img = RgbImage::new(output_rect(d)?)?;
			let (_, height) = d.size();
			for y in 0..height {
				d.read_scanline(img.row_mut(y).ok_or(JpegError::Scanline)?)?;
			}
			Ok(img)
		}).map(|(img, _)| img)
	}

	/// # Decode Into RGBA.
	///
	/// Decode into a packed, fully opaque [`RgbaImage`].
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Unsupported`] before reading anything if the
	/// build lacks the `rgba` feature; otherwise see [`Jpeg::decode`].
	pub fn decode_into_rgba<R: Read>(&self, src: R, opts: &DecoderOptions)
	-> Result<RgbaImage, JpegError> {
		if ! crate::supports_rgba() {
			return Err(JpegError::Unsupported("RGBA output"));
		}

		self.pull(src, opts, OutColor::Rgba, |d| {
			let mut img = RgbaImage::new(output_rect(d)?)?;
			let (_, height) = d.size();
			for y in 0..height {
				d.read_scanline(img.row_mut(y).ok_or(JpegError::Scanline)?)?;
			}
			Ok(img)
		}).map(|(img, _)| img)
	}

	/// # Pull.
	///
	/// Register a source manager, start the engine, run the callback, and
	/// tear everything down again.
	///
	/// Read failures recorded by the manager win over whatever the engine
	/// made of them.
	fn pull<R, T, F>(&self, src: R, opts: &DecoderOptions, color: OutColor, cb: F)
	-> Result<(T, Vec<Warning>), JpegError>
	where R: Read, F: FnOnce(&mut Decompressor<'_, 'r, R>) -> Result<T, JpegError> {
		let mut source = SourceManager::new(self.registry, src)?;
		let settings = DecompressSettings {
			scale: opts.scale_size(),
			color,
			fancy_upsampling: ! opts.disable_fancy_upsampling,
			block_smoothing: ! opts.disable_block_smoothing,
		};

		let res = Decompress::begin(&mut source, settings).and_then(|mut d| {
			let out = cb(&mut d)?;
			d.finish()?;
			Ok(out)
		});

		if let Some(e) = source.take_error() { return Err(JpegError::Read(e)); }
		let out = res?;

		tracing::trace!("Pulled {} bytes from the source.", NiceU64::from(source.transferred()));
		Ok((out, source.take_warnings()))
	}
}



/// # Output Rectangle.
fn output_rect<R: Read>(d: &Decompressor<'_, '_, R>) -> Result<Rectangle, JpegError> {
	let (w, h) = d.size();
	let w = i32::try_from(w).map_err(|_| JpegError::Overflow)?;
	let h = i32::try_from(h).map_err(|_| JpegError::Overflow)?;
	Ok(Rectangle::from_size(w, h))
}

/// # Read Greyscale.
fn read_gray<R: Read>(d: &mut Decompressor<'_, '_, R>, rect: Rectangle)
-> Result<GrayImage, JpegError> {
	let mut img = GrayImage::new(rect)?;
	let (_, height) = d.size();
	for y in 0..height {
		d.read_scanline(img.row_mut(y).ok_or(JpegError::Scanline)?)?;
	}
	Ok(img)
}

/// # Read Planar.
///
/// Luma is copied straight across. Chroma is averaged over each block of the
/// target ratio; blocks cut short by the image edge average what they have.
fn read_planar<R: Read>(
	d: &mut Decompressor<'_, '_, R>,
	rect: Rectangle,
	ratio: SubsampleRatio,
) -> Result<YCbCrImage, JpegError> {
	let mut img = YCbCrImage::new_aligned(rect, ratio)?;
	let (cw, _) = img.chroma_size();
	let (width, height) = d.size();
	let (hf, vf) = (ratio.h_factor(), ratio.v_factor());

	let mut row = vec![0_u8; width * 3];
	let mut sums = vec![[0_u32; 3]; cw];

	let (y_plane, cb_plane, cr_plane) = img.planes_mut();
	for y in 0..height {
		d.read_scanline(&mut row)?;

		let luma = y_plane.row_mut(y).ok_or(JpegError::Scanline)?;
		for (x, (px, dst)) in row.chunks_exact(3).zip(luma.iter_mut()).enumerate() {
			*dst = px[0];
			let acc = &mut sums[x.wrapping_div(hf)];
			acc[0] += u32::from(px[1]);
			acc[1] += u32::from(px[2]);
			acc[2] += 1;
		}

		// Close out the chroma row at the end of each block.
		if (y + 1) % vf == 0 || y + 1 == height {
			let cy = y.wrapping_div(vf);
			let cb = cb_plane.row_mut(cy).ok_or(JpegError::Scanline)?;
			let cr = cr_plane.row_mut(cy).ok_or(JpegError::Scanline)?;
			for ((acc, cb), cr) in sums.iter_mut().zip(cb.iter_mut()).zip(cr.iter_mut()) {
				*cb = average(acc[0], acc[2]);
				*cr = average(acc[1], acc[2]);
				*acc = [0; 3];
			}
		}
	}

	Ok(img)
}

#[allow(clippy::cast_possible_truncation)] // Averages of bytes are bytes.
/// # Rounded Average.
const fn average(sum: u32, count: u32) -> u8 {
	if count == 0 { 0 }
	else { (sum + count.wrapping_div(2)).wrapping_div(count) as u8 }
}
