/*!
# `JPEG Line` - Entry Point
*/

use crate::Registry;



#[derive(Debug, Clone, Copy)]
/// # JPEG.
///
/// The decode and encode pipelines, bound to the [`Registry`] their managers
/// are listed in. The crate-level functions use [`Jpeg::global`]; build one
/// with [`Jpeg::new`] to keep a set of calls in a registry of their own.
///
/// The pipelines themselves are documented alongside their methods:
/// [`Jpeg::decode`], [`Jpeg::decode_config`], [`Jpeg::decode_into_rgb`],
/// [`Jpeg::decode_into_rgba`], [`Jpeg::decode_with_warnings`] and
/// [`Jpeg::encode`].
pub struct Jpeg<'a> {
	pub(crate) registry: &'a Registry,
}

impl Default for Jpeg<'static> {
	#[inline]
	fn default() -> Self { Self::global() }
}

impl<'a> Jpeg<'a> {
	#[must_use]
	/// # New.
	pub const fn new(registry: &'a Registry) -> Self { Self { registry } }

	#[must_use]
	/// # Registry.
	pub const fn registry(&self) -> &'a Registry { self.registry }
}

impl Jpeg<'static> {
	#[must_use]
	/// # Global.
	///
	/// Use the process-wide [`Registry::global`].
	pub fn global() -> Self { Self { registry: Registry::global() } }
}
