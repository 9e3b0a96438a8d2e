/*!
# `JPEG Line` - Encoder Options
*/

use crate::{
	DEFAULT_QUALITY,
	MAX_QUALITY,
	SubsampleRatio,
};



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Output Color Space.
pub enum ColorSpace {
	#[default]
	/// # Automatic.
	///
	/// Greyscale inputs produce single-component files; everything else is
	/// `YCbCr`.
	Auto,

	/// # `YCbCr`.
	///
	/// Always write three components, even for greyscale input.
	YCbCr,

	/// # Greyscale.
	///
	/// Always write a single luma component.
	Gray,
}



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Encoder Options.
///
/// Per-call encode settings.
///
/// ## Examples
///
/// ```
/// use jpegline::{ColorSpace, EncoderOptions, SubsampleRatio};
///
/// let opts = EncoderOptions::with_quality(85)
///     .with_subsampling(SubsampleRatio::R422)
///     .with_color_space(ColorSpace::YCbCr)
///     .with_progressive(true);
/// assert_eq!(opts.quality, 85);
/// ```
pub struct EncoderOptions {
	/// # Quality (0-100).
	///
	/// Zero means "use the default" (75), not "lowest". Values over 100 are
	/// treated as 100.
	pub quality: u8,

	/// # Chroma Subsampling.
	///
	/// When unset, planar inputs keep their own ratio, while everything else
	/// uses 4:4:4 at quality 90 and above, 4:2:0 below.
	pub subsampling: Option<SubsampleRatio>,

	/// # Output Color Space.
	pub color_space: ColorSpace,

	/// # Optimize Huffman Coding.
	pub optimize_coding: bool,

	/// # Progressive.
	pub progressive: bool,
}

impl EncoderOptions {
	#[must_use]
	/// # With Quality.
	pub const fn with_quality(quality: u8) -> Self {
		Self {
			quality,
			subsampling: None,
			color_space: ColorSpace::Auto,
			optimize_coding: false,
			progressive: false,
		}
	}

	#[must_use]
	/// # With Subsampling.
	pub const fn with_subsampling(mut self, ratio: SubsampleRatio) -> Self {
		self.subsampling = Some(ratio);
		self
	}

	#[must_use]
	/// # With Color Space.
	pub const fn with_color_space(mut self, color_space: ColorSpace) -> Self {
		self.color_space = color_space;
		self
	}

	#[must_use]
	/// # With Optimized Coding.
	pub const fn with_optimize_coding(mut self, optimize: bool) -> Self {
		self.optimize_coding = optimize;
		self
	}

	#[must_use]
	/// # With Progressive.
	pub const fn with_progressive(mut self, progressive: bool) -> Self {
		self.progressive = progressive;
		self
	}
}

/// ## Resolved Values.
impl EncoderOptions {
	/// # Effective Quality.
	pub(crate) const fn effective_quality(&self) -> u8 {
		if self.quality == 0 { DEFAULT_QUALITY }
		else if self.quality > MAX_QUALITY { MAX_QUALITY }
		else { self.quality }
	}

	/// # Effective Subsampling.
	///
	/// `native` is the input's own ratio, if it has one.
	pub(crate) const fn effective_subsampling(&self, native: Option<SubsampleRatio>)
	-> SubsampleRatio {
		if let Some(ratio) = self.subsampling { ratio }
		else if let Some(ratio) = native { ratio }
		else if self.effective_quality() >= 90 { SubsampleRatio::R444 }
		else { SubsampleRatio::R420 }
	}
}
