/*!
# `JPEG Line` - Decoder Options
*/

use crate::{
	Rectangle,
	SubsampleRatio,
};



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Decoder Options.
///
/// Per-call decode settings. The default decodes at full size into 4:4:4
/// planes.
///
/// ## Examples
///
/// ```
/// use jpegline::{DecoderOptions, Rectangle};
///
/// let opts = DecoderOptions::default()
///     .with_scale_target(Rectangle::from_size(100, 100));
/// assert!(opts.scale_target.is_some());
/// ```
pub struct DecoderOptions {
	/// # Scale Target.
	///
	/// When set, the engine downscales in the DCT domain by the smallest
	/// eighth-scale (1/8, 1/4, 1/2, 1/1) whose output is at least this large
	/// on both axes. This is not an exact resize: 1024×768 aimed at 100×100
	/// comes out 256×192. Empty rectangles are ignored.
	pub scale_target: Option<Rectangle>,

	/// # Disable Fancy Upsampling.
	///
	/// Requests plain pixel replication for subsampled chroma. The bundled
	/// engine has a single upsampler, so this is only logged.
	pub disable_fancy_upsampling: bool,

	/// # Disable Block Smoothing.
	///
	/// Requests no inter-block smoothing of progressive scans. The bundled
	/// engine never smooths, so this is only logged.
	pub disable_block_smoothing: bool,

	/// # Planar Subsampling.
	///
	/// The chroma layout of planar output. Chroma is box-averaged down from
	/// the engine's full-resolution samples.
	pub subsampling: SubsampleRatio,
}

impl DecoderOptions {
	#[must_use]
	/// # With Scale Target.
	pub const fn with_scale_target(mut self, target: Rectangle) -> Self {
		self.scale_target = Some(target);
		self
	}

	#[must_use]
	/// # With Subsampling.
	pub const fn with_subsampling(mut self, ratio: SubsampleRatio) -> Self {
		self.subsampling = ratio;
		self
	}

	/// # Scale Size.
	///
	/// Return the requested size for the engine, if there is one.
	pub(crate) fn scale_size(&self) -> Option<(u16, u16)> {
		let target = self.scale_target.filter(|r| ! r.is_empty())?;
		let w = u16::try_from(target.dx()).unwrap_or(u16::MAX);
		let h = u16::try_from(target.dy()).unwrap_or(u16::MAX);
		Some((w, h))
	}
}
