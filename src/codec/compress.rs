/*!
# `JPEG Line` - Compression
*/

use crate::{
	JpegError,
	MAX_DIMENSION,
	SubsampleRatio,
};
use dactyl::NiceU64;
use jpeg_encoder::{
	ColorType,
	Encoder,
	SamplingFactor,
};
use super::{
	Flush,
	Writer,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Input Color Space.
pub(crate) enum InColor {
	/// # One Byte of Luma.
	Luma,

	/// # Packed RGB.
	Rgb,

	/// # Packed RGBA.
	///
	/// The alpha channel is ignored by the engine.
	Rgba,

	/// # Interleaved `YCbCr` (Full Resolution).
	YCbCr,
}

impl InColor {
	/// # Bytes Per Pixel.
	pub(crate) const fn channels(self) -> usize {
		match self {
			Self::Luma => 1,
			Self::Rgb | Self::YCbCr => 3,
			Self::Rgba => 4,
		}
	}

	/// # Engine Color Type.
	const fn color_type(self) -> ColorType {
		match self {
			Self::Luma => ColorType::Luma,
			Self::Rgb => ColorType::Rgb,
			Self::Rgba => ColorType::Rgba,
			Self::YCbCr => ColorType::Ycbcr,
		}
	}
}



#[derive(Debug, Clone, Copy)]
/// # Compression Settings.
pub(crate) struct CompressSettings {
	/// # Width.
	pub(crate) width: usize,

	/// # Height.
	pub(crate) height: usize,

	/// # Input Color Space.
	pub(crate) color: InColor,

	/// # Quality (1-100).
	pub(crate) quality: u8,

	/// # Chroma Subsampling.
	pub(crate) sampling: SubsampleRatio,

	/// # Progressive Scans.
	pub(crate) progressive: bool,

	/// # Optimized Huffman Tables.
	pub(crate) optimize: bool,
}



/// # Compression.
///
/// Scanlines are collected in order, then handed to the engine in one go on
/// [`Compress::finish`].
pub(crate) struct Compress<'d, D: Flush> {
	dest: &'d mut D,
	settings: CompressSettings,
	width: u16,
	height: u16,
	row_len: usize,
	data: Vec<u8>,
	row: usize,
}

impl<'d, D: Flush> Compress<'d, D> {
	/// # Begin.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::EmptyImage`] if either dimension is zero, or
	/// [`JpegError::Overflow`] if either is too big for a JPEG.
	pub(crate) fn begin(dest: &'d mut D, settings: CompressSettings)
	-> Result<Self, JpegError> {
		if settings.width == 0 || settings.height == 0 {
			return Err(JpegError::EmptyImage);
		}

		if MAX_DIMENSION < settings.width || MAX_DIMENSION < settings.height {
			return Err(JpegError::Overflow);
		}
		let width = u16::try_from(settings.width).map_err(|_| JpegError::Overflow)?;
		let height = u16::try_from(settings.height).map_err(|_| JpegError::Overflow)?;

		let row_len = settings.width * settings.color.channels();
		let size = row_len.checked_mul(settings.height).ok_or(JpegError::Overflow)?;

		tracing::trace!(
			"Compressing {width}x{height} {:?} at quality {} ({}).",
			settings.color,
			settings.quality,
			settings.sampling,
		);

		Ok(Self {
			dest,
			settings,
			width,
			height,
			row_len,
			data: Vec::with_capacity(size),
			row: 0,
		})
	}

	/// # Write Scanline.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Scanline`] if the row has the wrong length or all
	/// rows have already been written.
	pub(crate) fn write_scanline(&mut self, row: &[u8]) -> Result<(), JpegError> {
		if self.row >= self.settings.height || row.len() != self.row_len {
			return Err(JpegError::Scanline);
		}

		self.data.extend_from_slice(row);
		self.row += 1;
		Ok(())
	}

	/// # Finish.
	///
	/// Run the engine, pushing its output into the destination.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Scanline`] if rows are missing, or the engine's
	/// error if it fails.
	pub(crate) fn finish(self) -> Result<(), JpegError> {
		if self.row != self.settings.height { return Err(JpegError::Scanline); }

		let mut encoder = Encoder::new(Writer(self.dest), self.settings.quality);
		encoder.set_sampling_factor(sampling_factor(self.settings.sampling));
		encoder.set_progressive(self.settings.progressive);
		encoder.set_optimized_huffman_tables(self.settings.optimize);
		encoder.encode(&self.data, self.width, self.height, self.settings.color.color_type())
			.map_err(|e| JpegError::Codec(e.to_string()))?;

		tracing::trace!(
			"Compressed {} bytes of scanlines.",
			NiceU64::from(self.data.len() as u64),
		);
		Ok(())
	}
}

/// # Engine Sampling Factor.
const fn sampling_factor(ratio: SubsampleRatio) -> SamplingFactor {
	match ratio {
		SubsampleRatio::R444 => SamplingFactor::F_1_1,
		SubsampleRatio::R440 => SamplingFactor::F_1_2,
		SubsampleRatio::R422 => SamplingFactor::F_2_1,
		SubsampleRatio::R420 => SamplingFactor::F_2_2,
	}
}
